use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::{Preferences, Theme, Units};

pub const PREFS_FILE_NAME: &str = "preferences.json";

/// Durable theme/units/last-place storage. Injected into the refresh engine
/// so tests can substitute an in-memory store; writes take effect for the
/// next read.
pub trait PreferenceStore {
    fn theme(&self) -> Theme;
    fn set_theme(&self, theme: Theme);
    fn units(&self) -> Units;
    fn set_units(&self, units: Units);
    fn last_location_label(&self) -> String;
    fn set_last_location_label(&self, label: &str);
}

/// Preference store backed by one JSON file. Loaded once at open; every
/// setter rewrites the file atomically. Storage failures are logged and
/// swallowed, the in-memory state stays authoritative for the session.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    state: RefCell<Preferences>,
}

impl FilePreferenceStore {
    pub fn open(config_dir: &Path) -> Self {
        let path = config_dir.join(PREFS_FILE_NAME);
        let state = read_preferences(&path);
        Self {
            path,
            state: RefCell::new(state),
        }
    }

    fn persist(&self) {
        let state = self.state.borrow();
        match serde_json::to_vec_pretty(&*state) {
            Ok(payload) => {
                if let Err(error) = write_atomic(&self.path, &payload) {
                    tracing::warn!(%error, path = %self.path.display(), "preference write failed");
                }
            }
            Err(error) => {
                tracing::warn!(%error, "preference serialization failed");
            }
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn theme(&self) -> Theme {
        self.state.borrow().theme
    }

    fn set_theme(&self, theme: Theme) {
        self.state.borrow_mut().theme = theme;
        self.persist();
    }

    fn units(&self) -> Units {
        self.state.borrow().units
    }

    fn set_units(&self, units: Units) {
        self.state.borrow_mut().units = units;
        self.persist();
    }

    fn last_location_label(&self) -> String {
        self.state.borrow().last_location_label.clone()
    }

    fn set_last_location_label(&self, label: &str) {
        self.state.borrow_mut().last_location_label = label.to_string();
        self.persist();
    }
}

fn read_preferences(path: &Path) -> Preferences {
    if !path.exists() {
        return Preferences::default();
    }

    let payload = match fs::read_to_string(path) {
        Ok(payload) => payload,
        Err(error) => {
            tracing::warn!(%error, path = %path.display(), "preference read failed");
            return Preferences::default();
        }
    };

    match serde_json::from_str(&payload) {
        Ok(prefs) => prefs,
        Err(error) => {
            tracing::warn!(%error, path = %path.display(), "preference file unreadable, using defaults");
            Preferences::default()
        }
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "preference path must have a parent directory",
        )
    })?;
    fs::create_dir_all(parent)?;

    let tmp_path = path.with_extension(format!("{}.tmp", std::process::id()));
    fs::write(&tmp_path, bytes)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
