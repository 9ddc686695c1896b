use std::fs;
use std::path::{Path, PathBuf};

use kifu_types::{Family, SettingEntry};
use log::debug;
use regex::Regex;

use crate::error::{Error, Result};

pub const DEFAULT_SETTINGS_PATH: &str = "setting.json";

/// `setting.json` with each pattern compiled once.
///
/// Expected layout:
///   [
///     {"pattern": "taro_shogi-.*\\.kif", "name": "24",
///      "player": "taro_shogi", "sql_file_path": "sql/24.sql"},
///     ...
///   ]
#[derive(Debug)]
pub struct Settings {
    entries: Vec<(SettingEntry, Regex)>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let unavailable = |reason: String| Error::ConfigUnavailable {
            path: path.to_path_buf(),
            reason,
        };

        let json = fs::read_to_string(path).map_err(|e| unavailable(e.to_string()))?;
        let entries: Vec<SettingEntry> =
            serde_json::from_str(&json).map_err(|e| unavailable(e.to_string()))?;

        let settings = Self::from_entries(entries).map_err(|e| unavailable(e.to_string()))?;
        debug!("{} setting(s) loaded from {}", settings.len(), path.display());
        Ok(settings)
    }

    /// Compile the patterns so that each one must match a whole file name.
    pub fn from_entries(entries: Vec<SettingEntry>) -> std::result::Result<Self, regex::Error> {
        let entries = entries
            .into_iter()
            .map(|entry| {
                let re = Regex::new(&format!("^(?:{})$", entry.pattern))?;
                Ok((entry, re))
            })
            .collect::<std::result::Result<Vec<_>, regex::Error>>()?;
        Ok(Self { entries })
    }

    /// First entry whose pattern matches `filename` in full.
    pub fn find(&self, filename: &str) -> Result<&SettingEntry> {
        self.entries
            .iter()
            .find(|(_, re)| re.is_match(filename))
            .map(|(entry, _)| entry)
            .ok_or_else(|| Error::SettingNotFound {
                filename: filename.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Family selected by the entry's `name`.
pub fn entry_family(entry: &SettingEntry) -> Result<Family> {
    Family::from_setting_name(&entry.name).ok_or_else(|| Error::UnknownFamily {
        name: entry.name.clone(),
    })
}

pub fn sql_path(entry: &SettingEntry) -> PathBuf {
    PathBuf::from(&entry.sql_file_path)
}
