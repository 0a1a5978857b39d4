//! Collection export and backup files.

use std::path::Path;

use schoolhub_models::{BackupBundle, Collection, SchoolData};
use serde_json::{Value, json};

/// A whole collection as JSON, unscoped. Fees are flattened to one row
/// per student.
pub fn collection_json(data: &SchoolData, collection: Collection) -> Result<Value, serde_json::Error> {
    match collection {
        Collection::Students => serde_json::to_value(&data.students),
        Collection::Teachers => serde_json::to_value(&data.teachers),
        Collection::Classes => serde_json::to_value(&data.classes),
        Collection::Fees => Ok(Value::Array(
            data.students
                .iter()
                .map(|s| {
                    json!({
                        "id": s.id,
                        "name": s.name,
                        "class": s.class_name,
                        "total": s.fees.total,
                        "paid": s.fees.paid,
                        "pending": s.fees.pending(),
                    })
                })
                .collect(),
        )),
        Collection::Announcements => serde_json::to_value(&data.announcements),
        Collection::Homework => serde_json::to_value(&data.homework),
        Collection::Messages => serde_json::to_value(&data.messages),
        Collection::Events => serde_json::to_value(&data.events),
        Collection::Library => serde_json::to_value(&data.library),
        Collection::Transport => serde_json::to_value(&data.transport),
        Collection::Exams => serde_json::to_value(&data.exams),
    }
}

pub fn write_json(path: &Path, value: &impl serde::Serialize) -> Result<(), Box<dyn std::error::Error>> {
    let raw = serde_json::to_string_pretty(value)?;
    std::fs::write(path, raw)?;
    Ok(())
}

pub fn read_backup(path: &Path) -> Result<BackupBundle, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| format!("Invalid backup file: {}", e).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_fees_export_has_pending() {
        let data = SchoolData::default_dataset();
        let value = collection_json(&data, Collection::Fees).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), data.students.len());
        let first = &rows[0];
        let expected = data.students[0].fees.pending();
        assert_eq!(first["pending"].as_f64(), Some(expected));
        assert_eq!(first["class"], json!(data.students[0].class_name));
    }

    #[test]
    fn test_backup_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        let bundle = BackupBundle {
            timestamp: Utc::now(),
            data: SchoolData::default_dataset(),
            users: Vec::new(),
            audit: Vec::new(),
        };
        write_json(&path, &bundle).unwrap();
        assert_eq!(read_backup(&path).unwrap(), bundle);
    }

    #[test]
    fn test_read_backup_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        std::fs::write(&path, "{\"nope\": true}").unwrap();
        let err = read_backup(&path).unwrap_err();
        assert!(err.to_string().starts_with("Invalid backup file"));
    }
}
