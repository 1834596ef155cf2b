use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Settings;
use crate::entry::{default_entries, TimerEntry};
use crate::error::{AppError, AppResult};

const APP_DIR: &str = "productivity-timers";
const FILE_ENTRIES: &str = "timers.json";
const FILE_SETTINGS: &str = "settings.json";

pub struct TimerStorage {
    dir: PathBuf,
}

impl TimerStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage under the platform data directory.
    pub fn default_location() -> AppResult<Self> {
        dirs::data_dir()
            .map(|d| Self::new(d.join(APP_DIR)))
            .ok_or(AppError::NoDataDir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stored entries, or the single default stopwatch when nothing usable
    /// is on disk.
    pub fn load_entries(&self) -> Vec<TimerEntry> {
        let entries: Vec<TimerEntry> = match self.read_json(FILE_ENTRIES) {
            Ok(Some(entries)) => entries,
            Ok(None) => return default_entries(),
            Err(e) => {
                log::warn!("Stored timers unreadable, using defaults: {}", e);
                return default_entries();
            }
        };

        let mut seen = HashSet::new();
        let entries: Vec<TimerEntry> = entries
            .into_iter()
            .filter(|e| {
                let fresh = seen.insert(e.id);
                if !fresh {
                    log::warn!("Dropping stored timer with duplicate id {}", e.id);
                }
                fresh
            })
            .collect();

        if entries.is_empty() {
            default_entries()
        } else {
            entries
        }
    }

    pub fn save_entries(&self, entries: &[TimerEntry]) {
        if let Err(e) = self.write_json(FILE_ENTRIES, entries) {
            log::error!("Failed to save timers: {}", e);
        }
    }

    pub fn load_settings(&self) -> Settings {
        match self.read_json(FILE_SETTINGS) {
            Ok(Some(settings)) => settings,
            Ok(None) => Settings::default(),
            Err(e) => {
                log::warn!("Stored settings unreadable, using defaults: {}", e);
                Settings::default()
            }
        }
    }

    pub fn save_settings(&self, settings: &Settings) {
        if let Err(e) = self.write_json(FILE_SETTINGS, settings) {
            log::error!("Failed to save settings: {}", e);
        }
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> AppResult<Option<T>> {
        let data = match fs::read(self.dir.join(name)) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&data)?))
    }

    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> AppResult<()> {
        fs::create_dir_all(&self.dir)?;
        let data = serde_json::to_vec_pretty(value)?;
        // replace atomically
        let tmp = self.dir.join(format!("{}.tmp", name));
        fs::write(&tmp, data)?;
        fs::rename(&tmp, self.dir.join(name))?;
        Ok(())
    }
}
