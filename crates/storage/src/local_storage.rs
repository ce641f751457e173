use std::{
    collections::VecDeque,
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use evolve_app::{Settings, SettingsRepository, log as app_log};
use evolve_domain::{
    AppState, ReadError, StateObserver, StateRepository, StorageError, WriteError,
};
use log::{debug, error};
use serde::{Serialize, de::DeserializeOwned};

use crate::document::{CURRENT_VERSION, Document, DocumentError};

pub const DATA_DIR_VAR: &str = "EVOLVE_DATA_DIR";
pub const DEFAULT_DATA_DIR: &str = ".evolve";

/// Key-value storage backed by one JSON file per key.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

#[derive(strum::AsRefStr, Debug, Clone, Copy)]
enum Key {
    #[strum(serialize = "evolve-storage")]
    State,
    #[strum(serialize = "settings")]
    Settings,
    #[strum(serialize = "log")]
    Log,
}

impl LocalStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        if fs::create_dir_all(&dir).is_err() || !dir.is_dir() {
            return Err(StorageError::NoStorage);
        }
        Ok(Self { dir })
    }

    /// Opens the directory named by `EVOLVE_DATA_DIR`, or `.evolve` in the working directory.
    pub fn from_env() -> anyhow::Result<Self> {
        let dir = std::env::var_os(DATA_DIR_VAR)
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);
        Self::new(dir.clone())
            .with_context(|| format!("failed to open data directory {}", dir.display()))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: Key) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_ref()))
    }

    fn get<T: DeserializeOwned>(&self, key: Key) -> Result<Option<T>, LocalStorageError> {
        match fs::read(self.path(key)) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Replaces the value atomically, so a crash never leaves a partially written file.
    fn set<T: Serialize + ?Sized>(&self, key: Key, value: &T) -> Result<(), LocalStorageError> {
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(value)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LocalStorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl From<LocalStorageError> for ReadError {
    fn from(value: LocalStorageError) -> Self {
        match value {
            LocalStorageError::Document(DocumentError::UnsupportedVersion(found)) => {
                ReadError::Storage(StorageError::UnsupportedVersion {
                    found,
                    supported: CURRENT_VERSION,
                })
            }
            err => ReadError::Other(Box::new(err)),
        }
    }
}

impl From<LocalStorageError> for WriteError {
    fn from(value: LocalStorageError) -> Self {
        WriteError::Other(Box::new(value))
    }
}

impl StateRepository for LocalStorage {
    fn read_state(&self) -> Result<Option<AppState>, ReadError> {
        let Some(document) = self.get::<Document>(Key::State)? else {
            return Ok(None);
        };
        let state = AppState::try_from(document).map_err(LocalStorageError::from)?;
        Ok(Some(state))
    }

    fn write_state(&self, state: &AppState) -> Result<(), WriteError> {
        Ok(self.set(Key::State, &Document::from(state))?)
    }
}

impl StateObserver for LocalStorage {
    fn state_changed(&self, state: &AppState) {
        match self.write_state(state) {
            Ok(()) => debug!("state persisted"),
            Err(err) => error!("failed to persist state: {err}"),
        }
    }
}

impl SettingsRepository for LocalStorage {
    fn read_settings(&self) -> Result<Settings, ReadError> {
        Ok(self.get(Key::Settings)?.unwrap_or_default())
    }

    fn write_settings(&self, settings: Settings) -> Result<(), WriteError> {
        Ok(self.set(Key::Settings, &settings)?)
    }
}

impl app_log::Repository for LocalStorage {
    fn read_entries(&self) -> Result<VecDeque<app_log::Entry>, app_log::Error> {
        self.get(Key::Log)
            .map(Option::unwrap_or_default)
            .map_err(|err| app_log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: app_log::Entry) -> Result<(), app_log::Error> {
        let mut entries = self.read_entries()?;
        app_log::push_entry(&mut entries, entry);
        self.set(Key::Log, &entries)
            .map_err(|err| app_log::Error::Unknown(err.to_string()))
    }
}
