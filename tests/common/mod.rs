#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use labsheet_pdf::{ExportOptions, LaboratoryRecord, Language, RecordFields, Team};

const SENTENCE: &str = "Les travaux du laboratoire portent sur la modelisation des systemes \
                        complexes et leurs applications en environnement semi-aride. ";

/// A fully populated record with the required fields set.
pub fn sample_fields() -> RecordFields {
    RecordFields {
        name: "Laboratoire de Mathematiques Appliquees".to_string(),
        faculty: "FSEI".to_string(),
        description: "Recherche fondamentale et appliquee.".to_string(),
        keywords: String::new(),
        director: "Pr. Amina Benali".to_string(),
        creation_decree: "Arrete n 123 du 12/03/2001".to_string(),
        code: "L-0421".to_string(),
        domiciliation: "Campus Nord, bloc C".to_string(),
        thematic_agency: "ATRST".to_string(),
        email: "contact@lab.example".to_string(),
        phone: "+213 45 00 00 00".to_string(),
        director_appointment_date: "2019-09-01".to_string(),
        language: Language::Primary,
        teams: Vec::new(),
    }
}

pub fn sample_record() -> LaboratoryRecord {
    record_with(sample_fields())
}

pub fn record_with(fields: RecordFields) -> LaboratoryRecord {
    LaboratoryRecord::new(
        "1700000000000".to_string(),
        "2023-11-14T22:13:20+00:00".to_string(),
        fields,
    )
}

pub fn team(name: &str, leader: &str, description: &str) -> Team {
    Team {
        name: name.to_string(),
        leader: leader.to_string(),
        description: description.to_string(),
    }
}

/// `count` paragraphs of one to four sentences, separated by blank lines.
pub fn paragraphs(count: usize) -> String {
    (0..count)
        .map(|i| SENTENCE.repeat(i % 4 + 1).trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// A single paragraph of `chars` characters with no hard breaks.
pub fn long_paragraph(chars: usize) -> String {
    let mut out = SENTENCE.repeat(chars / SENTENCE.len() + 1);
    out.truncate(chars);
    out
}

/// Options that never touch the working directory's assets, with a fixed footer date.
pub fn options(output_dir: &Path) -> ExportOptions {
    ExportOptions {
        output_dir: output_dir.to_path_buf(),
        logo_path: None,
        faculty_assets_dir: None,
        font_family: None,
        generated_on: NaiveDate::from_ymd_opt(2024, 5, 17),
    }
}

/// Write a small half-transparent PNG and return its path.
pub fn write_png(dir: &Path, file_name: &str, width: u32, height: u32) -> PathBuf {
    let img = image::RgbaImage::from_fn(width, height, |x, _| {
        if x % 2 == 0 {
            image::Rgba([200, 30, 30, 255])
        } else {
            image::Rgba([0, 0, 0, 0])
        }
    });
    let path = dir.join(file_name);
    img.save(&path).expect("write png");
    path
}

/// Count page objects in an uncompressed PDF object table.
pub fn count_pages(pdf: &[u8]) -> usize {
    count_token(pdf, b"/Type /Page") - count_token(pdf, b"/Type /Pages")
}

pub fn count_token(haystack: &[u8], needle: &[u8]) -> usize {
    haystack
        .windows(needle.len())
        .filter(|w| *w == needle)
        .count()
}
