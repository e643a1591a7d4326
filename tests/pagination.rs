mod common;

use labsheet_pdf::{
    DocumentLayout, Language, SectionChunk, Side, TextMetrics, layout_record, line_height,
};

const DESCRIPTION: &str = "Description du laboratoire";
const TEAMS: &str = "Équipes de recherche";
const KEYWORDS: &str = "Mots-clés";

fn chunks_titled<'a>(layout: &'a DocumentLayout, title: &str) -> Vec<(usize, &'a SectionChunk)> {
    layout
        .pages
        .iter()
        .flat_map(|p| p.chunks.iter().map(move |c| (p.index, c)))
        .filter(|(_, c)| c.title == title)
        .collect()
}

fn print_layout(layout: &DocumentLayout) {
    println!();
    println!("| {:<4} | {:<28} | {:<5} | {:<5} | {:>7} | {:>7} |", "Page", "Section", "First", "Lines", "Top", "Bottom");
    for page in &layout.pages {
        for c in &page.chunks {
            println!(
                "| {:<4} | {:<28} | {:<5} | {:<5} | {:>7.1} | {:>7.1} |",
                page.index + 1,
                c.title,
                c.first,
                c.lines.len(),
                c.top,
                c.bottom
            );
        }
    }
}

#[test]
fn long_description_spans_pages_and_teams_placeholder_follows() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut fields = common::sample_fields();
    fields.description = common::long_paragraph(3000);
    assert_eq!(fields.description.chars().count(), 3000);
    assert!(!fields.description.contains('\n'));
    let record = common::record_with(fields);
    let layout = layout_record(&record, &common::options(std::path::Path::new(".")));
    print_layout(&layout);

    assert!(layout.pages.len() > 1, "expected more than one page, got {}", layout.pages.len());

    let description = chunks_titled(&layout, DESCRIPTION);
    assert!(description.len() > 1, "description should be split");
    assert_eq!(description.iter().filter(|(_, c)| c.first).count(), 1);
    assert!(description[0].1.first, "title bar belongs to the first chunk");
    // Card chrome on every page the block spans: one chunk per page, consecutive pages.
    for pair in description.windows(2) {
        assert_eq!(pair[1].0, pair[0].0 + 1);
    }
    // A split chunk runs down to the last whole line; the continuation opens the next page.
    let (_, head) = description[0];
    assert!(head.bottom <= layout.bottom_limit + 0.01);
    assert!(layout.bottom_limit - head.bottom < line_height(10.0));
    let continuation_top = description[1].1.top;
    assert!(description[1..].iter().all(|(_, c)| !c.first && c.top == continuation_top));
    assert!(continuation_top < head.top);

    let teams = chunks_titled(&layout, TEAMS);
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0].1.lines, vec!["Aucune équipe renseignée".to_string()]);

    let (last_page, last_desc) = description[description.len() - 1];
    let (team_page, team_chunk) = teams[0];
    assert!(team_page >= last_page);
    if team_page == last_page {
        assert!(team_chunk.top >= last_desc.bottom);
    }

    // Blank keywords produce no card at all.
    assert!(chunks_titled(&layout, KEYWORDS).is_empty());
}

#[test]
fn split_block_lines_equal_one_unbroken_wrap() {
    let metrics = TextMetrics::helvetica();
    for description in [common::long_paragraph(12_000), common::paragraphs(40)] {
        let mut fields = common::sample_fields();
        fields.description = description.clone();
        let layout = layout_record(&common::record_with(fields), &common::options(std::path::Path::new(".")));

        let chunks = chunks_titled(&layout, DESCRIPTION);
        assert!(chunks.len() > 1, "description should be split");
        let (_, first) = chunks[0];
        assert!(chunks
            .iter()
            .all(|(_, c)| c.text_left == first.text_left && c.text_right == first.text_right));

        // Chunks in page order rebuild the wrap line for line, blank lines included.
        let drawn: Vec<String> = chunks.iter().flat_map(|(_, c)| c.lines.clone()).collect();
        let expected = metrics.wrap(&description, first.text_right - first.text_left, 10.0);
        assert_eq!(drawn.len(), expected.len());
        assert_eq!(drawn, expected);
    }
}

#[test]
fn nothing_crosses_the_bottom_margin() {
    let mut fields = common::sample_fields();
    fields.description = common::long_paragraph(9_000);
    fields.keywords = common::long_paragraph(2_500);
    fields.teams = (1..=12)
        .map(|i| {
            common::team(
                &format!("Equipe {i}"),
                "Dr. Karim Haddad",
                &common::long_paragraph(400),
            )
        })
        .collect();
    let record = common::record_with(fields);
    let layout = layout_record(&record, &common::options(std::path::Path::new(".")));
    print_layout(&layout);

    for page in &layout.pages {
        for chunk in &page.chunks {
            assert!(!chunk.lines.is_empty(), "empty chunk on page {}", page.index + 1);
            assert!(
                chunk.bottom <= layout.bottom_limit + 0.01,
                "chunk '{}' ends at {} past {} on page {}",
                chunk.title,
                chunk.bottom,
                layout.bottom_limit,
                page.index + 1
            );
        }
        for row in &page.rows {
            assert!(row.top + row.height <= layout.bottom_limit + 0.01);
        }
    }
}

#[test]
fn chrome_is_drawn_on_every_page() {
    let mut fields = common::sample_fields();
    fields.faculty = "fst".to_string();
    fields.description = common::long_paragraph(15_000);
    let record = common::record_with(fields);
    let layout = layout_record(&record, &common::options(std::path::Path::new(".")));

    assert!(layout.pages.len() >= 3);
    assert_eq!(
        layout.pages[0].banner,
        vec![
            "ANNUAIRE DES LABORATOIRES DE RECHERCHE".to_string(),
            "Fiche d'information scientifique et administrative".to_string(),
        ]
    );
    for (i, page) in layout.pages.iter().enumerate() {
        assert_eq!(page.index, i);
        assert_eq!(page.banner.is_empty(), i > 0);
        let chrome = page.chrome.as_ref().expect("chrome on every page");
        assert_eq!(chrome.band_side, Side::Left);
        assert_eq!(chrome.badge, "FST");
    }
}

#[test]
fn secondary_language_mirrors_the_band() {
    let mut fields = common::sample_fields();
    fields.language = Language::Secondary;
    fields.name = "مخبر الرياضيات التطبيقية".to_string();
    fields.description = common::long_paragraph(9_000);
    let record = common::record_with(fields);
    let layout = layout_record(&record, &common::options(std::path::Path::new(".")));

    assert!(layout.pages.len() > 1);
    for page in &layout.pages {
        assert_eq!(page.chrome.as_ref().map(|c| c.band_side), Some(Side::Right));
    }
    assert_eq!(chunks_titled(&layout, "وصف المخبر").iter().filter(|(_, c)| c.first).count(), 1);
    assert_eq!(
        chunks_titled(&layout, "فرق البحث")[0].1.lines,
        vec!["لا توجد فرق مسجلة".to_string()]
    );
}

#[test]
fn info_grid_uses_placeholders_for_blank_values() {
    let mut fields = common::sample_fields();
    fields.email = "   ".to_string();
    fields.thematic_agency = String::new();
    let record = common::record_with(fields);
    let layout = layout_record(&record, &common::options(std::path::Path::new(".")));

    let first = &layout.pages[0];
    assert_eq!(first.rows.len(), 4);
    assert!(first.rows.iter().all(|r| r.cells.len() == 2));
    let cell = |label: &str| {
        first
            .rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .find(|c| c.label.starts_with(label))
            .map(|c| c.value_lines.join(" "))
    };
    assert_eq!(cell("E-mail").as_deref(), Some("N/A"));
    assert_eq!(cell("Agence thématique").as_deref(), Some("N/A"));
    assert_eq!(cell("Code").as_deref(), Some("L-0421"));
    assert!(first.title_lines.iter().any(|l| l.contains("Mathematiques")));
}

#[test]
fn teams_are_listed_with_leaders() {
    let mut fields = common::sample_fields();
    fields.keywords = "algebre, analyse".to_string();
    fields.teams = vec![
        common::team("Analyse numerique", "Dr. Rachid Omari", "Schemas d'ordre eleve."),
        common::team("", "", ""),
    ];
    let record = common::record_with(fields);
    let layout = layout_record(&record, &common::options(std::path::Path::new(".")));

    let lines: Vec<String> = chunks_titled(&layout, TEAMS)
        .iter()
        .flat_map(|(_, c)| c.lines.clone())
        .collect();
    assert_eq!(
        lines,
        vec![
            "1. Analyse numerique",
            "Responsable : Dr. Rachid Omari",
            "Schemas d'ordre eleve.",
            "",
            "2. Équipe 2",
            "Responsable : Non spécifié",
        ]
    );
    assert_eq!(chunks_titled(&layout, KEYWORDS).len(), 1);
}

#[test]
fn logo_and_faculty_graphic_appear_on_the_first_page_only() {
    let dir = tempfile::tempdir().unwrap();
    let logo = common::write_png(dir.path(), "logo.png", 40, 16);
    let assets = dir.path().join("faculties");
    std::fs::create_dir_all(&assets).unwrap();
    common::write_png(&assets, "FMED.png", 20, 20);

    let mut fields = common::sample_fields();
    fields.faculty = "MEDECINE".to_string();
    fields.description = common::long_paragraph(9_000);
    let record = common::record_with(fields);

    let mut options = common::options(dir.path());
    options.logo_path = Some(logo);
    options.faculty_assets_dir = Some(assets);
    let layout = layout_record(&record, &options);

    assert!(layout.pages.len() > 1);
    let first = layout.pages[0].chrome.as_ref().unwrap();
    assert!(first.logo);
    assert!(first.faculty_graphic);
    assert_eq!(first.badge, "FMED");
    for page in &layout.pages[1..] {
        let chrome = page.chrome.as_ref().unwrap();
        assert!(!chrome.logo && !chrome.faculty_graphic);
    }
}

#[test]
fn missing_logo_is_omitted() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = common::options(dir.path());
    options.logo_path = Some(dir.path().join("does-not-exist.png"));
    let layout = layout_record(&common::sample_record(), &options);

    let chrome = layout.pages[0].chrome.as_ref().unwrap();
    assert!(!chrome.logo);
    assert!(!chrome.faculty_graphic);
}
