//! JSON-file stores.
//!
//! One data directory (see [`AppConfig`]) holds:
//!
//! - `settings.json` - every settings version ever saved; the latest wins
//! - `locations.json` - the shipping locations
//! - `quotes/<id>.json` - one file per saved quote
//! - `draft.json` - unsaved form state
//!
//! Every write takes the file's lock before reading what it will change,
//! and goes through [`write_json_atomic`], so a crash mid-save leaves the
//! previous document.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::errors::{QuoteError, QuoteResult};
use crate::file_io::{read_json_if_exists, validate_version, write_json_atomic, FileLock};
use crate::ids::{IdGenerator, UuidIds};
use crate::location::ShippingLocation;
use crate::quote::{Draft, Quote};
use crate::settings::{latest, GlobalSettings};
use crate::store::memory::validate_location;
use crate::store::{DraftRepository, LocationStore, QuoteStore, SettingsStore};

/// All four stores backed by one data directory.
#[derive(Debug, Clone)]
pub struct JsonDataDir {
    config: AppConfig,
    ids: UuidIds,
}

impl JsonDataDir {
    pub fn new(config: AppConfig) -> Self {
        JsonDataDir { config, ids: UuidIds }
    }

    /// Data directory with default file names.
    pub fn at(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(AppConfig::default().with_data_dir(data_dir))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn quote_path(&self, id: &str) -> QuoteResult<PathBuf> {
        let valid = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(QuoteError::invalid_input("quote_id", id, "Quote ids may only contain letters, digits, '-' and '_'"));
        }
        Ok(self.config.quotes_dir().join(format!("{}.json", id)))
    }

    /// Lock `path`, creating its directory first. Held until dropped.
    fn lock(&self, path: &Path) -> QuoteResult<FileLock> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| QuoteError::file_error("create directory", parent.display().to_string(), e.to_string()))?;
        }
        FileLock::acquire(path, self.config.user_id.clone())
    }

    fn locked_write<T: Serialize + ?Sized>(&self, value: &T, path: &Path) -> QuoteResult<()> {
        let _lock = self.lock(path)?;
        write_json_atomic(value, path)
    }
}

fn read_list<T: DeserializeOwned>(path: &Path) -> QuoteResult<Vec<T>> {
    Ok(read_json_if_exists(path)?.unwrap_or_default())
}

impl SettingsStore for JsonDataDir {
    fn current_settings(&self) -> QuoteResult<Option<GlobalSettings>> {
        let versions: Vec<GlobalSettings> = read_list(&self.config.settings_path())?;
        let current = latest(&versions).cloned();
        if let Some(settings) = &current {
            validate_version(&settings.version)?;
        }
        Ok(current)
    }

    fn save_settings(&mut self, settings: GlobalSettings) -> QuoteResult<()> {
        let path = self.config.settings_path();
        let _lock = self.lock(&path)?;
        let mut versions: Vec<GlobalSettings> = read_list(&path)?;
        info!(updated_at = %settings.updated_at, "saving settings version");
        versions.push(settings);
        write_json_atomic(&versions, &path)
    }
}

impl LocationStore for JsonDataDir {
    fn list_locations(&self) -> QuoteResult<Vec<ShippingLocation>> {
        read_list(&self.config.locations_path())
    }

    fn add_location(&mut self, name: &str, address: &str, distance_miles: f64) -> QuoteResult<ShippingLocation> {
        validate_location(name, distance_miles)?;
        let path = self.config.locations_path();
        let _lock = self.lock(&path)?;
        let mut locations: Vec<ShippingLocation> = read_list(&path)?;
        let location = ShippingLocation::new(self.ids.next_id(), name.trim(), address.trim(), distance_miles);
        locations.push(location.clone());
        write_json_atomic(&locations, &path)?;
        info!(id = %location.id, name = %location.name, "location added");
        Ok(location)
    }
}

impl QuoteStore for JsonDataDir {
    fn save_quote(&mut self, quote: &Quote) -> QuoteResult<String> {
        let path = self.quote_path(&quote.id)?;
        self.locked_write(quote, &path)?;
        info!(id = %quote.id, pallets = quote.pallet_count(), "quote saved");
        Ok(quote.id.clone())
    }

    fn load_quote(&self, id: &str) -> QuoteResult<Option<Quote>> {
        let quote: Option<Quote> = read_json_if_exists(&self.quote_path(id)?)?;
        if let Some(quote) = &quote {
            validate_version(&quote.version)?;
        }
        Ok(quote)
    }

    fn list_quote_ids(&self) -> QuoteResult<Vec<String>> {
        let dir = self.config.quotes_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&dir)
            .map_err(|e| QuoteError::file_error("list quotes", dir.display().to_string(), e.to_string()))?;

        let mut ids: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        ids.sort();
        Ok(ids)
    }
}

impl DraftRepository for JsonDataDir {
    fn load_draft(&self) -> QuoteResult<Option<Draft>> {
        let draft: Option<Draft> = read_json_if_exists(&self.config.draft_path())?;
        if let Some(draft) = &draft {
            validate_version(&draft.version)?;
        }
        Ok(draft)
    }

    fn save_draft(&mut self, draft: &Draft) -> QuoteResult<()> {
        self.locked_write(draft, &self.config.draft_path())?;
        debug!(pallets = draft.input.pallets.len(), "draft saved");
        Ok(())
    }

    fn clear_draft(&mut self) -> QuoteResult<()> {
        let path = self.config.draft_path();
        if path.exists() {
            let _lock = FileLock::acquire(&path, self.config.user_id.clone())?;
            fs::remove_file(&path)
                .map_err(|e| QuoteError::file_error("clear draft", path.display().to_string(), e.to_string()))?;
            debug!("draft cleared");
        }
        Ok(())
    }
}
