//! Engine configuration from the environment.
//!
//! | Variable             | Meaning                                        |
//! |----------------------|------------------------------------------------|
//! | `SHEETBLDR_SNAPSHOT` | Snapshot JSON to load (first CLI arg overrides) |
//! | `SHEETBLDR_RULES`    | Optional JSON file overriding the 5e rules     |
//! | `SHEETBLDR_FILTERS`  | e.g. `inventory=equipped;spellbook=prepared`   |
//! | `SHEETBLDR_PRETTY`   | Pretty-print the view (`true`/`1`)             |

use std::path::PathBuf;

use sheetbldr_domain::{DomainError, FilterSet};

pub const SNAPSHOT_VAR: &str = "SHEETBLDR_SNAPSHOT";
pub const RULES_VAR: &str = "SHEETBLDR_RULES";
pub const FILTERS_VAR: &str = "SHEETBLDR_FILTERS";
pub const PRETTY_VAR: &str = "SHEETBLDR_PRETTY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No snapshot given: pass a path or set SHEETBLDR_SNAPSHOT")]
    MissingSnapshot,

    #[error("Invalid SHEETBLDR_FILTERS: {0}")]
    Filters(#[from] DomainError),

    #[error("Invalid boolean for {key}: {value}")]
    InvalidFlag { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub snapshot_path: PathBuf,
    pub rules_path: Option<PathBuf>,
    pub filters: FilterSet,
    pub pretty: bool,
}

impl EngineConfig {
    /// Read the process environment; `cli_snapshot` wins over `SHEETBLDR_SNAPSHOT`.
    pub fn from_env(cli_snapshot: Option<String>) -> Result<Self, ConfigError> {
        Self::from_lookup(cli_snapshot, |key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(
        cli_snapshot: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let snapshot_path = cli_snapshot
            .filter(|arg| !arg.trim().is_empty())
            .or_else(|| var(SNAPSHOT_VAR))
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingSnapshot)?;
        let filters = match var(FILTERS_VAR) {
            Some(raw) => FilterSet::parse(&raw)?,
            None => FilterSet::default(),
        };
        let pretty = match var(PRETTY_VAR) {
            None => false,
            Some(value) => parse_flag(PRETTY_VAR, value)?,
        };

        Ok(Self {
            snapshot_path,
            rules_path: var(RULES_VAR).map(PathBuf::from),
            filters,
            pretty,
        })
    }
}

fn parse_flag(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { key, value }),
    }
}

/// Load `.env.local` then `.env` from the workspace root, if present.
pub fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
