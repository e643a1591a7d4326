//! Persisted laboratory collection.
//!
//! The whole collection is read and written at once as a JSON array. Older shapes
//! (teams stored as a plain string, no language tag, missing optional fields) are
//! up-converted on load; nothing malformed ever aborts the load.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::Error;
use crate::model::{LaboratoryRecord, Language, RecordFields, Team};

pub struct RecordStore {
    path: PathBuf,
    records: Vec<LaboratoryRecord>,
}

impl RecordStore {
    /// Load the collection at `path`. A missing or unreadable file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match std::fs::read_to_string(&path) {
            Ok(text) => parse_collection(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                log::error!("Cannot read record collection {}: {e}", path.display());
                Vec::new()
            }
        };
        log::debug!("Loaded {} records from {}", records.len(), path.display());
        Self { path, records }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[LaboratoryRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&LaboratoryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Validate and insert a new record at the front of the collection, then persist.
    pub fn create(&mut self, fields: RecordFields) -> Result<&LaboratoryRecord, Error> {
        fields.validate()?;
        let now = chrono::Utc::now();
        let mut stamp = now.timestamp_millis();
        while self.records.iter().any(|r| r.id == stamp.to_string()) {
            stamp += 1;
        }
        let record = LaboratoryRecord::new(stamp.to_string(), now.to_rfc3339(), fields);
        let mut next = Vec::with_capacity(self.records.len() + 1);
        next.push(record);
        next.extend(self.records.iter().cloned());
        self.commit(next)?;
        Ok(&self.records[0])
    }

    /// Replace a record's fields in place. Identity and creation time are preserved.
    pub fn update(&mut self, id: &str, fields: RecordFields) -> Result<&LaboratoryRecord, Error> {
        fields.validate()?;
        let idx = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::RecordNotFound(id.to_string()))?;
        let mut next = self.records.clone();
        next[idx].fields = fields;
        self.commit(next)?;
        Ok(&self.records[idx])
    }

    /// Remove a record. Returns false when no record had that id.
    pub fn delete(&mut self, id: &str) -> Result<bool, Error> {
        if !self.records.iter().any(|r| r.id == id) {
            return Ok(false);
        }
        let next: Vec<LaboratoryRecord> =
            self.records.iter().filter(|r| r.id != id).cloned().collect();
        self.commit(next)?;
        Ok(true)
    }

    /// Write the whole collection to a sibling temp file, then rename over the target.
    pub fn save(&self) -> Result<(), Error> {
        write_collection(&self.path, &self.records)
    }

    /// Persist `next` and only then make it the in-memory collection, so a failed
    /// write leaves the store exactly as it was on disk.
    fn commit(&mut self, next: Vec<LaboratoryRecord>) -> Result<(), Error> {
        if let Err(e) = write_collection(&self.path, &next) {
            log::error!("Cannot save record collection {}: {e}", self.path.display());
            return Err(e);
        }
        self.records = next;
        Ok(())
    }
}

fn write_collection(path: &Path, records: &[LaboratoryRecord]) -> Result<(), Error> {
    let json = serde_json::to_vec_pretty(records)?;
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir)?;
    }
    let mut tmp = path.to_path_buf().into_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    if let Err(e) = std::fs::write(&tmp, &json).and_then(|_| std::fs::rename(&tmp, path)) {
        let _ = std::fs::remove_file(&tmp);
        return Err(Error::Io(e));
    }
    Ok(())
}

/// Parse a persisted collection. Malformed input is logged and treated as empty.
pub fn parse_collection(text: &str) -> Vec<LaboratoryRecord> {
    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            log::error!("Record collection is not valid JSON, starting empty: {e}");
            return Vec::new();
        }
    };
    let Value::Array(items) = value else {
        log::error!("Record collection is not a JSON array, starting empty");
        return Vec::new();
    };

    let mut records: Vec<LaboratoryRecord> = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match normalize_record(item) {
            Some(mut record) => {
                if record.id.is_empty() || records.iter().any(|r| r.id == record.id) {
                    record.id = format!("{}-{i}", chrono::Utc::now().timestamp_millis());
                    log::warn!("Record #{i} had no usable id, assigned {}", record.id);
                }
                if record.created_at.is_empty() {
                    record.created_at = chrono::Utc::now().to_rfc3339();
                }
                records.push(record);
            }
            None => log::warn!("Skipping record #{i}: not a JSON object"),
        }
    }
    records
}

fn str_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Bring one persisted entry into the canonical shape. `None` for non-objects.
/// Missing identity stays empty here; the collection loader assigns it.
pub fn normalize_record(value: &Value) -> Option<LaboratoryRecord> {
    let obj = value.as_object()?;
    Some(LaboratoryRecord::new(
        str_field(obj, "id"),
        str_field(obj, "createdAt"),
        normalize_fields(value)?,
    ))
}

/// Canonical form fields from a JSON object, with the same tolerance as the loader.
pub fn normalize_fields(value: &Value) -> Option<RecordFields> {
    let obj = value.as_object()?;
    let language = match obj.get("language") {
        Some(Value::String(tag)) => Language::from_tag(tag),
        _ => Language::Primary,
    };
    if matches!(obj.get("equipes"), Some(Value::String(_))) {
        log::warn!("Legacy string team list dropped; teams must be re-entered");
    }
    Some(RecordFields {
        name: str_field(obj, "name"),
        faculty: str_field(obj, "faculty"),
        description: str_field(obj, "description"),
        keywords: str_field(obj, "keywords"),
        director: str_field(obj, "director"),
        creation_decree: str_field(obj, "arreteCreation"),
        code: str_field(obj, "code"),
        domiciliation: str_field(obj, "domiciliation"),
        thematic_agency: str_field(obj, "agenceThematique"),
        email: str_field(obj, "email"),
        phone: str_field(obj, "phone"),
        director_appointment_date: str_field(obj, "dateNomination"),
        language,
        teams: obj.get("equipes").map(normalize_teams).unwrap_or_default(),
    })
}

/// Form fields from user-supplied JSON. Unlike [`normalize_fields`], a top level
/// that is not an object is an error naming what was found instead.
pub fn fields_from_json(value: &Value) -> Result<RecordFields, Error> {
    normalize_fields(value).ok_or(Error::NotAnObject(json_kind(value)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Fully-shaped team list from whatever was persisted. Anything that is not an
/// array of objects contributes nothing.
pub fn normalize_teams(value: &Value) -> Vec<Team> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_object)
        .map(|obj| Team {
            name: str_field(obj, "name"),
            leader: str_field(obj, "responsable"),
            description: str_field(obj, "description"),
        })
        .collect()
}
