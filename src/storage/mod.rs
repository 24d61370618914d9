//! Local persistence
//!
//! The browser original kept a language preference and one timestamped
//! entry per successful field extraction in `localStorage`; here they live
//! as JSON files under the platform data directory.

use crate::api::ExtractedFields;
use crate::{PactumError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const PREFS_FILE: &str = "prefs.json";
const EXTRACTIONS_DIR: &str = "extractions";

/// Persisted user preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Prefs {
    /// Most recently detected language
    pub language: Option<String>,
}

/// File-backed store rooted at a single directory
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Open the store at the platform data directory
    pub fn open_default() -> Result<Self> {
        let base = dirs::data_dir().ok_or_else(|| {
            PactumError::StorageError("No data directory available on this platform".to_string())
        })?;
        Self::open(base.join("pactum"))
    }

    /// Open the store at an explicit root (used by tests)
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join(EXTRACTIONS_DIR))?;
        debug!("Store opened at {:?}", root);
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load preferences; a missing or unreadable file yields defaults
    pub fn load_prefs(&self) -> Prefs {
        let path = self.root.join(PREFS_FILE);
        match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!("Ignoring malformed prefs file {:?}: {}", path, e);
                Prefs::default()
            }),
            Err(_) => Prefs::default(),
        }
    }

    pub fn save_prefs(&self, prefs: &Prefs) -> Result<()> {
        let text = serde_json::to_string_pretty(prefs)
            .map_err(|e| PactumError::StorageError(e.to_string()))?;
        fs::write(self.root.join(PREFS_FILE), text)?;
        Ok(())
    }

    /// Persist the detected language preference
    pub fn save_language(&self, language: &str) -> Result<()> {
        let mut prefs = self.load_prefs();
        prefs.language = Some(language.to_string());
        self.save_prefs(&prefs)
    }

    /// Write one timestamped audit entry for a successful extraction.
    ///
    /// Returns the path of the written file.
    pub fn record_extraction(&self, fields: &ExtractedFields) -> Result<PathBuf> {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3f");
        let path = self
            .root
            .join(EXTRACTIONS_DIR)
            .join(format!("extraction-{}.json", stamp));

        let text = serde_json::to_string_pretty(fields)
            .map_err(|e| PactumError::StorageError(e.to_string()))?;
        fs::write(&path, text)?;
        debug!("Recorded extraction at {:?}", path);
        Ok(path)
    }

    /// List recorded extraction entries, oldest first
    pub fn extraction_entries(&self) -> Result<Vec<PathBuf>> {
        let mut entries: Vec<PathBuf> = fs::read_dir(self.root.join(EXTRACTIONS_DIR))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        entries.sort();
        Ok(entries)
    }
}
