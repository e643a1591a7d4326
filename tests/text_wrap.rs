use labsheet_pdf::{LINE_HEIGHT_FACTOR, PageCursor, TextMetrics, line_height};

const TEXT: &str = "Le laboratoire developpe des methodes numeriques pour l'etude des \
                    ecoulements en milieux poreux, en lien avec les besoins regionaux.";

#[test]
fn lines_fit_width_and_keep_words() {
    let m = TextMetrics::helvetica();
    for width in [80.0, 120.0, 250.0, 500.0] {
        let lines = m.wrap(TEXT, width, 10.0);
        for line in &lines {
            assert!(
                m.text_width(line, 10.0) <= width + 1e-3,
                "'{line}' wider than {width}"
            );
        }
        let rejoined = lines.join(" ");
        assert_eq!(
            rejoined.split_whitespace().collect::<Vec<_>>(),
            TEXT.split_whitespace().collect::<Vec<_>>()
        );
    }
}

#[test]
fn paragraphs_rebuild_from_their_own_lines() {
    let m = TextMetrics::helvetica();
    let text = format!("{TEXT}\n\n  Deuxieme   paragraphe,  court.\n{TEXT}\n");
    for width in [80.0, 150.0, 300.0] {
        let mut expected = Vec::new();
        for paragraph in text.split('\n') {
            let lines = m.wrap(paragraph, width, 10.0);
            let normalized = paragraph.split_whitespace().collect::<Vec<_>>().join(" ");
            assert_eq!(lines.join(" "), normalized);
            expected.extend(lines);
        }
        assert_eq!(m.wrap(&text, width, 10.0), expected);
    }
}

#[test]
fn narrower_width_never_gives_fewer_lines() {
    let m = TextMetrics::helvetica_bold();
    let mut previous = usize::MAX;
    for width in [80.0, 160.0, 320.0, 640.0, 2000.0] {
        let n = m.wrap(TEXT, width, 11.0).len();
        assert!(n <= previous);
        previous = n;
    }
    assert_eq!(previous, 1);
}

#[test]
fn newlines_are_hard_breaks() {
    let m = TextMetrics::helvetica();
    let lines = m.wrap("premier\n\nsecond  paragraphe", 400.0, 10.0);
    assert_eq!(lines, vec!["premier", "", "second paragraphe"]);
    assert_eq!(m.wrap("", 400.0, 10.0), vec![String::new()]);
}

#[test]
fn wrapping_is_deterministic() {
    let m = TextMetrics::helvetica();
    assert_eq!(m.wrap(TEXT, 150.0, 9.0), m.wrap(TEXT, 150.0, 9.0));
}

#[test]
fn line_height_scales_with_size() {
    assert!((line_height(10.0) - 10.0 * LINE_HEIGHT_FACTOR).abs() < 1e-4);
    assert!((line_height(20.0) - 2.0 * line_height(10.0)).abs() < 1e-4);
}

#[test]
fn cursor_is_the_single_fit_check() {
    let mut cursor = PageCursor::new(800.0, 50.0, 50.0);
    assert_eq!(cursor.limit(), 750.0);
    cursor.advance(695.0);
    assert!(!cursor.ensure_space(5.0));
    assert_eq!(cursor.page_index(), 0);
    assert!(cursor.ensure_space(5.5));
    assert_eq!(cursor.page_index(), 1);
    assert!(cursor.at_page_top());
    assert_eq!(cursor.available(), 700.0);
}
