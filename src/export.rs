use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;

use crate::error::Error;
use crate::model::LaboratoryRecord;

const DEFAULT_FILE_STEM: &str = "laboratoire";

/// Knobs for one export. Everything has a usable default.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// Directory the `.pdf` is written into.
    pub output_dir: PathBuf,
    /// Institution logo drawn on the first page. Missing or unreadable files are skipped.
    pub logo_path: Option<PathBuf>,
    /// Directory holding per-faculty graphics named after the faculty badge.
    pub faculty_assets_dir: Option<PathBuf>,
    /// System font family to embed instead of the built-in Helvetica.
    pub font_family: Option<String>,
    /// Date printed in the footer; today when unset.
    pub generated_on: Option<NaiveDate>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            logo_path: Some(PathBuf::from("assets/logo.png")),
            faculty_assets_dir: None,
            font_family: None,
            generated_on: None,
        }
    }
}

/// Lowercase `name` and collapse every run of characters outside `[a-z0-9]` into a
/// single `-`. Falls back to a fixed stem when nothing usable remains.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }
    if out.is_empty() {
        DEFAULT_FILE_STEM.to_string()
    } else {
        out
    }
}

/// Writes sheets to disk, one at a time.
///
/// A second `export` while one is running on the same exporter fails with
/// [`Error::ExportInProgress`] instead of racing it.
#[derive(Debug, Default)]
pub struct Exporter {
    busy: AtomicBool,
}

/// Clears the busy flag however the export ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Render `record` and write `<sanitized name>.pdf` into the output directory.
    /// No file is left behind when rendering or writing fails.
    pub fn export(&self, record: &LaboratoryRecord, options: &ExportOptions) -> Result<PathBuf, Error> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!("Export of '{}' refused: another export is running", record.id);
            return Err(Error::ExportInProgress);
        }
        let _guard = BusyGuard(&self.busy);

        let t0 = std::time::Instant::now();
        let bytes = crate::pdf::render(record, options)?;
        let t_render = t0.elapsed();

        let file_name = format!("{}.pdf", sanitize_file_name(&record.fields.name));
        let target = options.output_dir.join(file_name);
        write_atomically(&target, &bytes)?;
        let t_total = t0.elapsed();

        log::info!(
            "Timing: render={:.1}ms, write={:.1}ms, total={:.1}ms ({} -> {}, {} bytes)",
            t_render.as_secs_f64() * 1000.0,
            (t_total - t_render).as_secs_f64() * 1000.0,
            t_total.as_secs_f64() * 1000.0,
            record.id,
            target.display(),
            bytes.len(),
        );
        Ok(target)
    }
}

fn write_atomically(target: &Path, bytes: &[u8]) -> Result<(), Error> {
    let mut part = target.as_os_str().to_owned();
    part.push(".part");
    let part = PathBuf::from(part);

    let result = std::fs::write(&part, bytes).and_then(|()| std::fs::rename(&part, target));
    if let Err(e) = result {
        let _ = std::fs::remove_file(&part);
        return Err(Error::Io(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_only_safe_characters() {
        let s = sanitize_file_name("Laboratoire d'Étude #1!");
        assert_eq!(s, "laboratoire-d-tude-1");
        assert!(s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
    }

    #[test]
    fn sanitize_falls_back_when_nothing_remains() {
        assert_eq!(sanitize_file_name(""), DEFAULT_FILE_STEM);
        assert_eq!(sanitize_file_name("  ### "), DEFAULT_FILE_STEM);
        assert_eq!(sanitize_file_name("مخبر"), DEFAULT_FILE_STEM);
    }

    #[test]
    fn busy_exporter_refuses_second_export() {
        let exporter = Exporter::new();
        exporter.busy.store(true, Ordering::Release);
        let record = LaboratoryRecord::new("1".into(), String::new(), Default::default());
        let err = exporter.export(&record, &ExportOptions::default()).unwrap_err();
        assert!(matches!(err, Error::ExportInProgress));
        // The refused call must not clear the running export's flag.
        assert!(exporter.is_busy());
    }

    #[test]
    fn guard_releases_flag() {
        let exporter = Exporter::new();
        exporter.busy.store(true, Ordering::Release);
        {
            let _g = BusyGuard(&exporter.busy);
        }
        assert!(!exporter.is_busy());
    }
}
