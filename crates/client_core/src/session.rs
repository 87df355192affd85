//! Persisted session identity (bearer token + user id) and the store it lives in.

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use shared::domain::UserId;
use thiserror::Error;
use tracing::warn;

pub const TOKEN_KEY: &str = "loginToken";
pub const USER_ID_KEY: &str = "user_id";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read session store '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write session store '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("session store '{path}' is not a JSON object of strings: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    token: Option<String>,
    user_id: Option<UserId>,
}

impl SessionContext {
    pub fn new(token: Option<String>, user_id: Option<UserId>) -> Self {
        Self { token, user_id }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn is_logged_in(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn from_entries(entries: &BTreeMap<String, String>) -> Self {
        let token = entries
            .get(TOKEN_KEY)
            .filter(|token| !token.is_empty())
            .cloned();
        let user_id = entries.get(USER_ID_KEY).and_then(|raw| match raw.parse() {
            Ok(user_id) => Some(user_id),
            Err(err) => {
                warn!(value = %raw, "ignoring non-numeric stored user id: {err}");
                None
            }
        });
        Self { token, user_id }
    }

    pub fn to_entries(&self) -> BTreeMap<String, String> {
        let mut entries = BTreeMap::new();
        if let Some(token) = &self.token {
            entries.insert(TOKEN_KEY.to_string(), token.clone());
        }
        if let Some(user_id) = self.user_id {
            entries.insert(USER_ID_KEY.to_string(), user_id.to_string());
        }
        entries
    }
}

/// JSON key/value file holding the session, shared by every front end on the machine.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing store is an anonymous session.
    pub fn load(&self) -> Result<SessionContext, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(SessionContext::anonymous())
            }
            Err(source) => {
                return Err(SessionError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(SessionContext::anonymous());
        }
        let entries: BTreeMap<String, String> =
            serde_json::from_str(&raw).map_err(|source| SessionError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        Ok(SessionContext::from_entries(&entries))
    }

    pub fn save(&self, session: &SessionContext) -> Result<(), SessionError> {
        let write_err = |source| SessionError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let raw = serde_json::to_string_pretty(&session.to_entries())
            .map_err(|err| write_err(std::io::Error::other(err)))?;
        fs::write(&self.path, raw).map_err(write_err)
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Write {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
