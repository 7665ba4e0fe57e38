//! # Application Configuration
//!
//! Where the file-backed stores keep their data, loaded from a TOML file.
//! Every field has a default, so a missing file or a partial file both work:
//!
//! ```toml
//! data_dir = "/var/lib/pallet-quotes"
//! user_id = "sales@yard.example"
//! default_transportation_type = "Flatbed"
//!
//! [files]
//! settings = "settings.json"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{QuoteError, QuoteResult};

/// File names inside the data directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataFiles {
    pub settings: String,
    pub locations: String,
    /// Directory holding one JSON file per saved quote
    pub quotes: String,
    pub draft: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        DataFiles {
            settings: "settings.json".to_string(),
            locations: "locations.json".to_string(),
            quotes: "quotes".to_string(),
            draft: "draft.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    /// Recorded in lock files
    pub user_id: String,
    /// Vehicle type pre-selected for new pallets
    pub default_transportation_type: Option<String>,
    pub files: DataFiles,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_dir: PathBuf::from("pallet-data"),
            user_id: "quoting".to_string(),
            default_transportation_type: None,
            files: DataFiles::default(),
        }
    }
}

impl AppConfig {
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.settings)
    }

    pub fn locations_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.locations)
    }

    pub fn quotes_dir(&self) -> PathBuf {
        self.data_dir.join(&self.files.quotes)
    }

    pub fn draft_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.draft)
    }
}

/// Parse configuration from TOML text.
pub fn parse_config(text: &str) -> QuoteResult<AppConfig> {
    toml::from_str(text).map_err(|e| QuoteError::serialization(format!("Invalid config: {}", e)))
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist.
pub fn load_config(path: &Path) -> QuoteResult<AppConfig> {
    if !path.exists() {
        info!(path = %path.display(), "no config file, using defaults");
        return Ok(AppConfig::default());
    }
    let text = fs::read_to_string(path)
        .map_err(|e| QuoteError::file_error("read config", path.display().to_string(), e.to_string()))?;
    let config = parse_config(&text)?;
    debug!(path = %path.display(), data_dir = %config.data_dir.display(), "config loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config(
            r#"
            data_dir = "/srv/quotes"
            default_transportation_type = "Flatbed"

            [files]
            draft = "scratch.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/quotes"));
        assert_eq!(config.default_transportation_type.as_deref(), Some("Flatbed"));
        assert_eq!(config.user_id, "quoting");
        assert_eq!(config.draft_path(), PathBuf::from("/srv/quotes/scratch.json"));
        assert_eq!(config.settings_path(), PathBuf::from("/srv/quotes/settings.json"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = temp_dir().join(format!("pallet_quote_no_config_{}.toml", std::process::id()));
        let _ = fs::remove_file(&path);
        assert_eq!(load_config(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_invalid_config_is_serialization_error() {
        let err = parse_config("data_dir = [1, 2").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
