//! Loading snapshots and rule overrides from JSON files.

use std::path::Path;

use serde::de::DeserializeOwned;
use sheetbldr_domain::{CharacterSnapshot, RulesConfig};

use super::ports::RepoError;

async fn read_json<T: DeserializeOwned>(path: &Path, operation: &'static str) -> Result<T, RepoError> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RepoError::not_found("File", path.display())
        } else {
            RepoError::storage(operation, format!("{}: {}", path.display(), e))
        }
    })?;
    serde_json::from_str(&text)
        .map_err(|e| RepoError::serialization(format!("{}: {}", path.display(), e)))
}

/// Read a stored character snapshot.
pub async fn load_snapshot(path: &Path) -> Result<CharacterSnapshot, RepoError> {
    read_json(path, "load_snapshot").await
}

/// Read rule overrides; omitted keys keep their D&D 5e defaults.
pub async fn load_rules(path: &Path) -> Result<RulesConfig, RepoError> {
    read_json(path, "load_rules").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn loads_snapshot_with_raw_items() {
        let file = write_temp(
            r#"{
                "character": {"id": "0b6f2d3a-4f3e-4d0e-9b7a-1c2d3e4f5a6b", "name": "Vistra"},
                "items": [
                    {"id": "8d1f0a52-2b6c-4a3e-9c11-5b7c8d9e0f12", "name": "Rope",
                     "type": "loot", "system": {"quantity": 1}}
                ]
            }"#,
        );
        let snapshot = load_snapshot(file.path()).await.unwrap();
        assert_eq!(snapshot.character.name.as_str(), "Vistra");
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].kind, "loot");
    }

    #[tokio::test]
    async fn rules_overrides_keep_defaults() {
        let file = write_temp(r#"{"maxLevel": 30}"#);
        let rules = load_rules(file.path()).await.unwrap();
        assert_eq!(rules.max_level, 30);
        assert_eq!(rules.xp_thresholds, RulesConfig::default().xp_thresholds);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_snapshot(&dir.path().join("absent.json")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn malformed_json_is_serialization_error() {
        let file = write_temp("{ not json");
        let err = load_snapshot(file.path()).await.unwrap_err();
        assert!(matches!(err, RepoError::Serialization(_)));
    }
}
