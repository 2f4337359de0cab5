//! Session persistence and the cached current-user lookup.
//!
//! The browser client kept its session in the cookie jar and fetched the
//! current user once per page load. Here the cookie is persisted to a small
//! JSON file between invocations, and [`Session`] caches the `/auth/me`
//! lookup for the lifetime of the process.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::error::{Error, Result};
use crate::models::User;

/// The persisted session: the cookie value and the server it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSession {
    /// Value of the `logsys-session` cookie.
    pub cookie: String,
    /// Server URL the cookie was issued by.
    pub server_url: String,
}

/// On-disk store for the session cookie.
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Path to the session file.
    path: PathBuf,
}

impl SessionStore {
    /// Create a store backed by the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved session, if one exists.
    ///
    /// A missing or unreadable file means "no session"; a corrupt file is
    /// logged and likewise treated as absent.
    #[must_use]
    pub fn load(&self) -> Option<SavedSession> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!("failed to read session file {}: {err}", self.path.display());
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(
                    "ignoring corrupt session file {}: {err}",
                    self.path.display()
                );
                None
            }
        }
    }

    /// Save a session, creating parent directories as needed.
    ///
    /// The file is written with owner-only permissions on unix.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self, session: &SavedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let contents = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, contents).map_err(|source| Error::SessionWrite {
            path: self.path.clone(),
            source,
        })?;

        #[cfg(unix)]
        restrict_permissions(&self.path).map_err(|source| Error::SessionWrite {
            path: self.path.clone(),
            source,
        })?;

        debug!("session saved to {}", self.path.display());
        Ok(())
    }

    /// Remove the saved session. Removing an absent file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(Error::SessionWrite {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

/// Per-process cache of the current-user lookup.
///
/// The first call to [`Session::current_user`] hits `GET /auth/me`; later
/// calls return the cached answer. A failed lookup is cached as "no
/// session" rather than surfaced as an error.
#[derive(Debug, Default)]
pub struct Session {
    /// `None` until the first lookup; then `Some(result)`.
    cached: Option<Option<User>>,
}

impl Session {
    /// Create a session with no cached lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current user, fetching it on first call.
    pub async fn current_user(&mut self, client: &ApiClient) -> Option<&User> {
        if self.cached.is_none() {
            let user = match client.me().await {
                Ok(user) => user,
                Err(err) => {
                    debug!("current-user lookup failed, treating as no session: {err}");
                    None
                }
            };
            self.cached = Some(user);
        }

        match &self.cached {
            Some(Some(user)) => Some(user),
            _ => None,
        }
    }

    /// Drop the cached lookup so the next call fetches again.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Log out: best-effort remote call, then always clear the saved
    /// session and the cache.
    ///
    /// A failed remote logout is logged, never propagated.
    ///
    /// # Errors
    ///
    /// Returns an error only if the local session file cannot be cleared.
    pub async fn logout(&mut self, client: &ApiClient, store: &SessionStore) -> Result<()> {
        if let Err(err) = client.logout().await {
            warn!("remote logout failed: {err}");
        }
        self.cached = Some(None);
        store.clear()
    }
}
