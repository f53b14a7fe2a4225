// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application settings: a flat key/value store plus a typed view over it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::error::{GsError, Result};

/// Setting keys understood by [`AppSettings`].
pub mod keys {
    pub const LAST_FILE_PATH: &str = "last_file_path";
    pub const LIBRARY_DIR: &str = "library_dir";
    pub const ICC_DIR: &str = "icc_dir";
    pub const USER_ARGS: &str = "user_args";
    pub const DEVICE_INDEX: &str = "device_index";
}

/// Look up or persist named string/integer settings.
///
/// There is no schema beyond flat key/value pairs.
pub trait SettingsStore {
    fn get_string(&self, key: &str) -> Option<String>;
    fn set_string(&mut self, key: &str, value: &str);
    fn get_int(&self, key: &str) -> Option<i64>;
    fn set_int(&mut self, key: &str, value: i64);
    /// Flush pending changes to the backing medium.
    fn save(&self) -> Result<()>;
}

/// Settings persisted as a single JSON object on disk.
#[derive(Debug)]
pub struct JsonSettingsStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl JsonSettingsStore {
    /// Open the store at `path`. A missing file yields an empty store.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let text = fs::read_to_string(&path)?;
            match serde_json::from_str::<Value>(&text)? {
                Value::Object(map) => map.into_iter().collect(),
                other => {
                    return Err(GsError::Settings(format!(
                        "expected a JSON object in {}, found {}",
                        path.display(),
                        json_kind(&other)
                    )));
                }
            }
        } else {
            debug!("settings file absent, starting empty");
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get_string(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.values
            .insert(key.to_string(), Value::String(value.to_string()));
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get(key)?.as_i64()
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), Value::from(value));
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, text)?;
        info!(path = %self.path.display(), entries = self.values.len(), "settings saved");
        Ok(())
    }
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

/// Typed view of the persisted settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Last document opened for conversion.
    pub last_file_path: String,
    /// Directory holding the engine executable or library.
    pub library_dir: String,
    /// Directory last used to pick an ICC profile.
    pub icc_dir: String,
    /// Free-text extra arguments appended after the generated ones.
    pub user_args: String,
    /// Index into [`crate::types::DEVICES`]; `-1` means none selected.
    pub device_index: i64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            last_file_path: String::new(),
            library_dir: String::new(),
            icc_dir: String::new(),
            user_args: String::new(),
            device_index: -1,
        }
    }
}

impl AppSettings {
    pub fn load(store: &dyn SettingsStore) -> Self {
        let string = |key| store.get_string(key).unwrap_or_default();
        Self {
            last_file_path: string(keys::LAST_FILE_PATH),
            library_dir: string(keys::LIBRARY_DIR),
            icc_dir: string(keys::ICC_DIR),
            user_args: string(keys::USER_ARGS),
            device_index: store.get_int(keys::DEVICE_INDEX).unwrap_or(-1),
        }
    }

    pub fn store(&self, store: &mut dyn SettingsStore) {
        store.set_string(keys::LAST_FILE_PATH, &self.last_file_path);
        store.set_string(keys::LIBRARY_DIR, &self.library_dir);
        store.set_string(keys::ICC_DIR, &self.icc_dir);
        store.set_string(keys::USER_ARGS, &self.user_args);
        store.set_int(keys::DEVICE_INDEX, self.device_index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSettingsStore::open(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.get_string(keys::USER_ARGS), None);
        let settings = AppSettings::load(&store);
        assert_eq!(settings.device_index, -1);
        assert!(settings.library_dir.is_empty());
    }

    #[test]
    fn default_matches_an_empty_store() {
        let store = JsonSettingsStore::open("/nonexistent/settings.json").unwrap();
        assert_eq!(AppSettings::default(), AppSettings::load(&store));
        assert_eq!(AppSettings::default().device_index, -1);
    }

    #[test]
    fn values_survive_save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut store = JsonSettingsStore::open(&path).unwrap();
        let settings = AppSettings {
            last_file_path: "/docs/in.pdf".into(),
            library_dir: "/opt/gs/bin".into(),
            icc_dir: "/usr/share/color/icc".into(),
            user_args: "-dNOINTERPOLATE -r150".into(),
            device_index: 1,
        };
        settings.store(&mut store);
        store.save().unwrap();

        let reopened = JsonSettingsStore::open(&path).unwrap();
        assert_eq!(AppSettings::load(&reopened), settings);
    }

    #[test]
    fn wrong_type_reads_as_absent() {
        let mut store = JsonSettingsStore::open("/nonexistent/settings.json").unwrap();
        store.set_int(keys::USER_ARGS, 7);
        assert_eq!(store.get_string(keys::USER_ARGS), None);
        assert_eq!(store.get_int(keys::USER_ARGS), Some(7));
    }

    #[test]
    fn non_object_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(
            JsonSettingsStore::open(&path),
            Err(GsError::Settings(_))
        ));
    }
}
