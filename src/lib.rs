mod assets;
mod error;
mod export;
mod fonts;
mod labels;
mod model;
mod pdf;
mod store;
mod theme;

pub use assets::ImageAsset;
pub use error::Error;
pub use export::{ExportOptions, Exporter, sanitize_file_name};
pub use model::{Language, LaboratoryRecord, RecordFields, Team};
pub use pdf::cursor::PageCursor;
pub use pdf::metrics::{LINE_HEIGHT_FACTOR, TextMetrics, line_height};
pub use pdf::{ChromeTrace, DocumentLayout, GridCell, GridRow, PageLayout, SectionChunk, Side};
pub use store::{
    RecordStore, fields_from_json, normalize_fields, normalize_record, normalize_teams,
    parse_collection,
};
pub use theme::{FacultyTheme, canonical_faculty, default_theme, resolve_theme, themes};

use std::time::Instant;

/// Render a record to PDF bytes without touching the filesystem (apart from
/// reading the logo, faculty graphic and fonts).
pub fn render_record(record: &LaboratoryRecord, options: &ExportOptions) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();
    let bytes = pdf::render(record, options)?;
    log::info!(
        "Timing: render={:.1}ms (record {}, output {} bytes)",
        t0.elapsed().as_secs_f64() * 1000.0,
        record.id,
        bytes.len(),
    );
    Ok(bytes)
}

/// Lay a record out with the built-in font metrics and return the page trace.
pub fn layout_record(record: &LaboratoryRecord, options: &ExportOptions) -> DocumentLayout {
    pdf::layout(record, options)
}
