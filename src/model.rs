use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Document language. Drives text direction and which edge carries the faculty band.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    /// French, left-to-right.
    #[default]
    #[serde(rename = "fr")]
    Primary,
    /// Arabic, right-to-left.
    #[serde(rename = "ar")]
    Secondary,
}

impl Language {
    pub fn is_rtl(self) -> bool {
        self == Language::Secondary
    }

    /// Unrecognized or absent tags fall back to the primary language.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "ar" | "ara" | "arabic" | "secondary" => Language::Secondary,
            _ => Language::Primary,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    #[serde(rename = "responsable")]
    pub leader: String,
    pub description: String,
}

/// Everything the entry form captures: a record without its identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordFields {
    pub name: String,
    pub faculty: String,
    pub description: String,
    pub keywords: String,
    pub director: String,
    #[serde(rename = "arreteCreation")]
    pub creation_decree: String,
    pub code: String,
    pub domiciliation: String,
    #[serde(rename = "agenceThematique")]
    pub thematic_agency: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "dateNomination")]
    pub director_appointment_date: String,
    pub language: Language,
    #[serde(rename = "equipes")]
    pub teams: Vec<Team>,
}

impl RecordFields {
    /// Reject blank required fields. Runs before anything reaches the store.
    pub fn validate(&self) -> Result<(), Error> {
        let required = [
            ("name", &self.name),
            ("faculty", &self.faculty),
            ("description", &self.description),
            ("director", &self.director),
            ("code", &self.code),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::MissingField(field));
            }
        }
        Ok(())
    }
}

/// One laboratory's persisted profile. `id` and `created_at` never change after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaboratoryRecord {
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(flatten)]
    pub fields: RecordFields,
}

impl LaboratoryRecord {
    pub fn new(id: String, created_at: String, fields: RecordFields) -> Self {
        Self {
            id,
            created_at,
            fields,
        }
    }

    pub fn language(&self) -> Language {
        self.fields.language
    }
}
