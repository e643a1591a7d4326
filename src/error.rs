use std::fmt;

use crate::model::Language;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Json(serde_json::Error),
    Image(image::ImageError),
    /// A required field was left blank at entry time.
    MissingField(&'static str),
    RecordNotFound(String),
    /// Record input whose top level is not a JSON object.
    NotAnObject(&'static str),
    /// Another export is still running on the same exporter.
    ExportInProgress,
    Pdf(String),
}

impl Error {
    /// Message shown to the person who triggered an export, in the record's language.
    pub fn user_message(&self, language: Language) -> String {
        match language {
            Language::Primary => match self {
                Error::ExportInProgress => {
                    "Un export est déjà en cours, veuillez patienter.".to_string()
                }
                Error::MissingField(field) => {
                    format!("Le champ obligatoire « {field} » n'est pas renseigné.")
                }
                Error::NotAnObject(found) => {
                    format!("Le fichier doit contenir un objet JSON, pas {found}.")
                }
                other => format!("Échec de la génération du document PDF : {other}"),
            },
            Language::Secondary => match self {
                Error::ExportInProgress => "عملية تصدير جارية بالفعل، يرجى الانتظار.".to_string(),
                Error::MissingField(field) => format!("الحقل الإلزامي « {field} » غير مملوء."),
                Error::NotAnObject(_) => "يجب أن يحتوي الملف على كائن JSON.".to_string(),
                other => format!("تعذر إنشاء مستند PDF: {other}"),
            },
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Json(e) => write!(f, "invalid JSON: {e}"),
            Error::Image(e) => write!(f, "image decoding failed: {e}"),
            Error::MissingField(field) => write!(f, "required field `{field}` is blank"),
            Error::RecordNotFound(id) => write!(f, "no laboratory record with id `{id}`"),
            Error::NotAnObject(found) => write!(f, "expected a JSON object, found {found}"),
            Error::ExportInProgress => write!(f, "an export is already in progress"),
            Error::Pdf(msg) => write!(f, "PDF generation failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e)
    }
}
