use crate::error::AppResult;
use crate::models::User;
use crate::store::AppState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

pub const USER_KEY: &str = "vit_user";
pub const THEME_KEY: &str = "vit_theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Default for Theme {
    fn default() -> Theme {
        Theme::Light
    }
}

/// Minimal on-device key-value storage. Two keys exist today (`vit_user`,
/// `vit_theme`); writes are fire-and-forget from the caller's point of view.
pub trait KeyValue {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&mut self, key: &str) -> AppResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore(HashMap<String, String>);

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl KeyValue for MemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.0.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        self.0.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        self.0.remove(key);
        Ok(())
    }
}

/// One file per key under the configured data directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> AppResult<FileStore> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(FileStore { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValue for FileStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        Ok(fs::write(self.path(key), value)?)
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Persists the current session user and the theme preference, and restores
/// them on startup. Malformed persisted data is treated as "no session",
/// never an error.
pub struct SessionStore<S: KeyValue> {
    backend: S,
}

impl<S: KeyValue> SessionStore<S> {
    pub fn new(backend: S) -> SessionStore<S> {
        SessionStore { backend }
    }

    /// Load the persisted user, if any. Invalid records are dropped so a
    /// corrupt write can never wedge startup. Array fields missing from an
    /// older record default to empty via serde.
    pub fn load_user(&mut self) -> Option<User> {
        let raw = match self.backend.get(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("failed to read persisted session: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("failed to parse persisted session, clearing it: {e}");
                let _ = self.backend.remove(USER_KEY);
                None
            }
        }
    }

    /// Mirror the session slice of the state: serialize the current user,
    /// or clear the key on logout.
    pub fn persist(&mut self, state: &AppState) -> AppResult<()> {
        match state.current_user() {
            Some(user) => {
                let raw = serde_json::to_string(user)?;
                self.backend.set(USER_KEY, &raw)
            }
            None => self.backend.remove(USER_KEY),
        }
    }

    pub fn save_theme(&mut self, theme: Theme) -> AppResult<()> {
        let literal = match theme {
            Theme::Dark => "dark",
            Theme::Light => "light",
        };
        self.backend.set(THEME_KEY, literal)
    }

    pub fn load_theme(&self) -> Theme {
        match self.backend.get(THEME_KEY) {
            Ok(Some(s)) if s == "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }
}
