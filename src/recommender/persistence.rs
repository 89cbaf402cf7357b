//! Model file: the trained snapshot cached on disk.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{Snapshot, SCHEMA_VERSION};
use crate::error::AppError;

/// Location of the cached snapshot.
///
/// The file is an opaque JSON blob tagged with [`SCHEMA_VERSION`]; any
/// blob that fails to decode or validate is treated as absent by callers.
#[derive(Debug, Clone)]
pub struct ModelFile {
    path: PathBuf,
}

#[derive(Deserialize)]
struct VersionProbe {
    schema_version: Option<u32>,
}

impl ModelFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the snapshot atomically: temp file in the same directory, then rename.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), AppError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
            AppError::Persistence(format!("cannot create temp file in {}: {}", dir.display(), e))
        })?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut writer, snapshot)
                .map_err(|e| AppError::Persistence(format!("cannot encode snapshot: {}", e)))?;
            writer
                .flush()
                .map_err(|e| AppError::Persistence(format!("cannot write snapshot: {}", e)))?;
        }
        tmp.persist(&self.path).map_err(|e| {
            AppError::Persistence(format!("cannot replace {}: {}", self.path.display(), e))
        })?;

        tracing::info!("Model saved to {}", self.path.display());
        Ok(())
    }

    /// Read the snapshot back.
    ///
    /// Returns `Ok(None)` when no file exists, and an error when the file is
    /// unreadable, from another schema version, missing fields, or inconsistent.
    pub fn load(&self) -> Result<Option<Snapshot>, AppError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let bytes = std::fs::read(&self.path).map_err(|e| {
            AppError::Persistence(format!("cannot read {}: {}", self.path.display(), e))
        })?;

        let probe: VersionProbe = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::Persistence(format!("cannot decode model file: {}", e)))?;
        match probe.schema_version {
            Some(SCHEMA_VERSION) => {}
            Some(other) => {
                return Err(AppError::Persistence(format!(
                    "model file has schema version {}, expected {}",
                    other, SCHEMA_VERSION
                )))
            }
            None => {
                return Err(AppError::Persistence(
                    "model file has no schema version".to_string(),
                ))
            }
        }

        let snapshot: Snapshot = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::Persistence(format!("model file is incomplete: {}", e)))?;
        snapshot.validate()?;

        Ok(Some(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, ObjectId, User};
    use crate::recommender::{build_interaction_matrix, EventIdMap};

    fn snapshot() -> (Snapshot, Vec<Event>, Vec<User>) {
        let events: Vec<Event> = ["1", "2", "3"]
            .iter()
            .map(|id| Event::new(ObjectId::new(), *id))
            .collect();
        let users = vec![
            User::new(ObjectId::new(), vec![events[0].id]),
            User::new(ObjectId::new(), vec![events[0].id, events[1].id]),
            User::new(ObjectId::new(), vec![events[1].id, events[2].id]),
        ];
        let set = build_interaction_matrix(&events, &users).unwrap();
        (Snapshot::train(set), events, users)
    }

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let file = ModelFile::new(dir.path().join("model.json"));
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_round_trip_preserves_query_results() {
        let dir = tempfile::tempdir().unwrap();
        let file = ModelFile::new(dir.path().join("model.json"));
        let (original, events, users) = snapshot();

        file.save(&original).unwrap();
        let loaded = file.load().unwrap().unwrap();
        assert_eq!(loaded, original);

        let ids = EventIdMap::from_events(&events);
        let query = original.query_vector(&users[0].registered_events, &ids);
        let before = original.model.query(&query.vector, 3).unwrap();
        let after = loaded.model.query(&query.vector, 3).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = ModelFile::new(dir.path().join("model.json"));
        std::fs::write(file.path(), b"stale").unwrap();

        let (original, _, _) = snapshot();
        file.save(&original).unwrap();
        assert_eq!(file.load().unwrap().unwrap(), original);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = ModelFile::new(dir.path().join("model.json"));
        std::fs::write(file.path(), b"{not json").unwrap();
        assert!(matches!(file.load(), Err(AppError::Persistence(_))));
    }

    #[test]
    fn test_missing_fields_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = ModelFile::new(dir.path().join("model.json"));
        let (original, _, _) = snapshot();

        let mut value = serde_json::to_value(&original).unwrap();
        value.as_object_mut().unwrap().remove("user_ids");
        std::fs::write(file.path(), serde_json::to_vec(&value).unwrap()).unwrap();

        assert!(matches!(file.load(), Err(AppError::Persistence(_))));
    }

    #[test]
    fn test_other_schema_version_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = ModelFile::new(dir.path().join("model.json"));
        let (original, _, _) = snapshot();

        let mut value = serde_json::to_value(&original).unwrap();
        value["schema_version"] = serde_json::json!(SCHEMA_VERSION + 1);
        std::fs::write(file.path(), serde_json::to_vec(&value).unwrap()).unwrap();

        let err = file.load().unwrap_err();
        assert!(err.to_string().contains("schema version"));
    }
}
