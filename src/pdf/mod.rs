mod chrome;
mod compose;
mod context;
pub(crate) mod cursor;
pub(crate) mod metrics;
mod section;

use std::collections::HashSet;

use pdf_writer::{Filter, Name, Pdf, Rect, Ref, TextStr};

pub use context::{
    ChromeTrace, DocumentLayout, GridCell, GridRow, PageLayout, SectionChunk, Side,
};

use crate::assets::{ImageAsset, find_faculty_asset, load_optional};
use crate::error::Error;
use crate::export::ExportOptions;
use crate::fonts::{FontSet, register_fonts};
use crate::labels::labels;
use crate::model::LaboratoryRecord;
use crate::theme::resolve_theme;

use context::{ChromeAssets, PageGeometry, PlacedImage};

/// Every character the sheet can show, so embedded fonts are subset once.
fn collect_used_chars(record: &LaboratoryRecord) -> HashSet<char> {
    let f = &record.fields;
    let theme = resolve_theme(&f.faculty);
    let mut used: HashSet<char> = HashSet::new();

    let record_text = [
        &f.name,
        &f.description,
        &f.keywords,
        &f.director,
        &f.creation_decree,
        &f.code,
        &f.domiciliation,
        &f.thematic_agency,
        &f.email,
        &f.phone,
        &f.director_appointment_date,
    ];
    for s in record_text {
        used.extend(s.chars());
    }
    for team in &f.teams {
        used.extend(team.name.chars());
        used.extend(team.leader.chars());
        used.extend(team.description.chars());
    }
    for s in labels(f.language).all() {
        used.extend(s.chars());
    }
    used.extend(theme.full_name.chars());
    used.extend(theme.badge.chars());
    // Footer date, page numbers and separators
    used.extend("0123456789/·:. -".chars());
    used
}

/// Embed a decoded raster as a Flate-compressed RGB image XObject, with a soft
/// mask when the source has transparency.
fn embed_image(
    pdf: &mut Pdf,
    xobj_ref: Ref,
    img: &ImageAsset,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<(), Error> {
    let (Ok(w), Ok(h)) = (i32::try_from(img.pixel_width), i32::try_from(img.pixel_height)) else {
        return Err(Error::Pdf(format!(
            "image of {}x{} pixels is too large to embed",
            img.pixel_width, img.pixel_height
        )));
    };

    let smask_ref = img.alpha.as_ref().map(|alpha| {
        let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(alpha, 6);
        let mask_ref = alloc();
        let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
        mask.filter(Filter::FlateDecode);
        mask.width(w);
        mask.height(h);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        mask_ref
    });

    let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&img.rgb, 6);
    let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
    xobj.filter(Filter::FlateDecode);
    xobj.width(w);
    xobj.height(h);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    if let Some(mask_ref) = smask_ref {
        xobj.s_mask(mask_ref);
    }
    Ok(())
}

/// Logo and faculty graphic, each optional. A missing or broken file is skipped.
fn load_chrome_images(
    record: &LaboratoryRecord,
    options: &ExportOptions,
) -> (Option<ImageAsset>, Option<ImageAsset>) {
    let logo = load_optional(options.logo_path.as_deref(), "institution logo");
    let badge = resolve_theme(&record.fields.faculty).badge;
    let graphic_path = options
        .faculty_assets_dir
        .as_deref()
        .and_then(|dir| find_faculty_asset(dir, badge));
    let graphic = load_optional(graphic_path.as_deref(), "faculty graphic");
    (logo, graphic)
}

/// Compose and serialize one laboratory sheet.
pub(crate) fn render(record: &LaboratoryRecord, options: &ExportOptions) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    // Phase 1: fonts
    let used_chars = collect_used_chars(record);
    let t_collect = t0.elapsed();

    let registered = register_fonts(
        &mut pdf,
        options.font_family.as_deref(),
        record.language().is_rtl(),
        &used_chars,
        &mut alloc,
    );
    let font_pairs = registered.resources;
    let fonts = registered.set;
    let t_fonts = t0.elapsed();

    // Phase 2: images
    let (logo, graphic) = load_chrome_images(record, options);
    let mut image_xobjects: Vec<(String, Ref)> = Vec::new();
    let mut place = |img: Option<ImageAsset>, pdf: &mut Pdf| -> Result<Option<PlacedImage>, Error> {
        let Some(img) = img else {
            return Ok(None);
        };
        let xobj_ref = alloc();
        embed_image(pdf, xobj_ref, &img, &mut alloc)?;
        let name = format!("Im{}", image_xobjects.len() + 1);
        image_xobjects.push((name.clone(), xobj_ref));
        Ok(Some(PlacedImage {
            name,
            aspect: img.aspect(),
        }))
    };
    let assets = ChromeAssets {
        logo: place(logo, &mut pdf)?,
        faculty_graphic: place(graphic, &mut pdf)?,
    };
    drop(place);
    let t_images = t0.elapsed();

    // Phase 3: layout
    let generated_on = options
        .generated_on
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let pages = compose::compose(record, &fonts, &assets, generated_on);
    let t_layout = t0.elapsed();

    // Phase 4: assembly
    let geometry = PageGeometry::a4(record.language().is_rtl());
    let n = pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, (content, _)) in pages.into_iter().enumerate() {
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, geometry.width, geometry.height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut fonts = resources.fonts();
            for (name, font_ref) in &font_pairs {
                fonts.pair(Name(name.as_bytes()), *font_ref);
            }
        }
        if !image_xobjects.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, xobj_ref) in &image_xobjects {
                xobjects.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
    }

    let title = record.fields.name.trim();
    let mut info = pdf.document_info(info_id);
    if !title.is_empty() {
        info.title(TextStr(title));
    }
    info.creator(TextStr(concat!("labsheet-pdf ", env!("CARGO_PKG_VERSION"))));
    drop(info);

    let t_assembly = t0.elapsed();

    log::info!(
        "Render phases: collect_chars={:.1}ms, font_embed={:.1}ms, images={:.1}ms, layout={:.1}ms, assembly={:.1}ms ({n} pages)",
        t_collect.as_secs_f64() * 1000.0,
        (t_fonts - t_collect).as_secs_f64() * 1000.0,
        (t_images - t_fonts).as_secs_f64() * 1000.0,
        (t_layout - t_images).as_secs_f64() * 1000.0,
        (t_assembly - t_layout).as_secs_f64() * 1000.0,
    );

    Ok(pdf.finish())
}

/// Run the composer with built-in metrics and return where everything landed.
/// Images are decoded so the trace reflects which ones would be drawn.
pub(crate) fn layout(record: &LaboratoryRecord, options: &ExportOptions) -> DocumentLayout {
    let fonts = FontSet::builtin();
    let (logo, graphic) = load_chrome_images(record, options);
    let placed = |img: Option<ImageAsset>, name: &str| {
        img.map(|img| PlacedImage {
            name: name.to_string(),
            aspect: img.aspect(),
        })
    };
    let assets = ChromeAssets {
        logo: placed(logo, "Im1"),
        faculty_graphic: placed(graphic, "Im2"),
    };
    let generated_on = options
        .generated_on
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let geometry = PageGeometry::a4(record.language().is_rtl());
    let pages = compose::compose(record, &fonts, &assets, generated_on);
    DocumentLayout {
        page_height: geometry.height,
        bottom_limit: geometry.height - geometry.bottom_margin,
        pages: pages.into_iter().map(|(_, page)| page).collect(),
    }
}
