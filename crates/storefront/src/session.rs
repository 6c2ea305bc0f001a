//! Persisted session identity.
//!
//! The authenticated identity and its bearer credential survive process
//! restarts in a single JSON file with the fixed keys `token` and `user`.
//! The file is replaced wholesale on every change - login, register, and
//! logout swap the entire session rather than patching it, so there is no
//! partially updated state to race on.
//!
//! Restoring from a missing or corrupt file yields an unauthenticated
//! session, never an error: the worst case of damaged storage is having to
//! sign in again.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use lotus_core::{Email, UserId};

use crate::api::ApiClient;
use crate::error::StoreError;

/// Minimum password length accepted at registration.
const MIN_PASSWORD_LENGTH: usize = 6;

/// The authenticated user context gating all cart and order access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: UserId,
    pub email: Email,
    #[serde(default)]
    pub is_admin: bool,
}

/// On-disk shape of the session file.
#[derive(Serialize, Deserialize)]
struct PersistedSession {
    token: String,
    user: Identity,
}

/// In-memory session: identity plus its bearer credential.
#[derive(Debug)]
struct ActiveSession {
    identity: Identity,
    token: SecretString,
}

/// Holds the at-most-one active [`Identity`] and its credential.
///
/// Cheaply cloneable; all clones observe the same session. Only `login`,
/// `register`, and `logout` mutate it - cart and order operations read it
/// through [`SessionStore::bearer`] and never write.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

#[derive(Debug)]
struct SessionStoreInner {
    path: PathBuf,
    current: RwLock<Option<ActiveSession>>,
}

impl SessionStore {
    /// Create a store persisting to `path`. Does no I/O; call
    /// [`SessionStore::restore`] at startup.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                path,
                current: RwLock::new(None),
            }),
        }
    }

    /// Load a previously persisted session, if any.
    ///
    /// Missing or malformed storage leaves the session unauthenticated and
    /// is logged at `warn` - it is never an error.
    #[instrument(skip(self))]
    pub fn restore(&self) -> Option<Identity> {
        let raw = match std::fs::read_to_string(&self.inner.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(error = %err, "could not read session file");
                return None;
            }
        };

        let persisted: PersistedSession = match serde_json::from_str(&raw) {
            Ok(persisted) => persisted,
            Err(err) => {
                warn!(error = %err, "ignoring corrupt session file");
                return None;
            }
        };

        let identity = persisted.user.clone();
        *self.write_guard() = Some(ActiveSession {
            identity: persisted.user,
            token: SecretString::from(persisted.token),
        });

        Some(identity)
    }

    /// Exchange credentials for a session via `POST /auth/login`.
    ///
    /// Replaces any prior identity. Credential and identity are persisted
    /// together or not at all.
    ///
    /// # Errors
    ///
    /// Propagates the backend's rejection; on failure neither memory nor
    /// storage changes.
    pub async fn login(
        &self,
        api: &ApiClient,
        email: &str,
        password: &str,
    ) -> Result<Identity, StoreError> {
        let payload = api.login(email, password).await?;
        self.establish(payload.access_token, payload.user)
    }

    /// Create an account and establish its session via `POST /auth/register`.
    ///
    /// Validates the email shape and password length locally first; the
    /// account-creation rules themselves (uniqueness etc.) are the
    /// backend's.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for local failures without touching the
    /// network, otherwise as [`SessionStore::login`].
    pub async fn register(
        &self,
        api: &ApiClient,
        email: &str,
        password: &str,
    ) -> Result<Identity, StoreError> {
        Email::parse(email).map_err(|err| StoreError::Validation(err.to_string()))?;
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(StoreError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let payload = api.register(email, password).await?;
        self.establish(payload.access_token, payload.user)
    }

    /// Drop the identity from memory and storage unconditionally.
    /// Idempotent: signing out twice is fine.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        *self.write_guard() = None;

        if let Err(err) = std::fs::remove_file(&self.inner.path)
            && err.kind() != std::io::ErrorKind::NotFound
        {
            warn!(error = %err, "could not remove session file");
        }
    }

    /// The active identity, if signed in.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.read_guard()
            .as_ref()
            .map(|session| session.identity.clone())
    }

    /// The bearer credential for authenticated calls.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` when signed out.
    pub fn bearer(&self) -> Result<SecretString, StoreError> {
        self.read_guard()
            .as_ref()
            .map(|session| session.token.clone())
            .ok_or(StoreError::Unauthenticated)
    }

    /// Persist and activate a new session, replacing any prior one.
    ///
    /// Writes go through a temp file + rename so storage holds either the
    /// old session or the new one, never a torn write. Memory is updated
    /// only after storage succeeds.
    fn establish(&self, token: String, identity: Identity) -> Result<Identity, StoreError> {
        let persisted = PersistedSession {
            token,
            user: identity,
        };
        let body = serde_json::to_string_pretty(&persisted)?;

        let tmp = self.inner.path.with_extension("json.tmp");
        std::fs::write(&tmp, body)?;
        std::fs::rename(&tmp, &self.inner.path)?;

        let identity = persisted.user.clone();
        *self.write_guard() = Some(ActiveSession {
            identity: persisted.user,
            token: SecretString::from(persisted.token),
        });

        Ok(identity)
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, Option<ActiveSession>> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Option<ActiveSession>> {
        self.inner
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn session_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("session.json")
    }

    #[test]
    fn test_restore_missing_file_is_unauthenticated() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::new(session_path(&dir));

        assert!(store.restore().is_none());
        assert!(store.identity().is_none());
        assert!(matches!(store.bearer(), Err(StoreError::Unauthenticated)));
    }

    #[test]
    fn test_restore_corrupt_file_is_unauthenticated() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = session_path(&dir);
        std::fs::write(&path, "{not json at all").expect("write");

        let store = SessionStore::new(path);
        assert!(store.restore().is_none());
        assert!(store.identity().is_none());
    }

    #[test]
    fn test_establish_then_restore_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = session_path(&dir);

        let store = SessionStore::new(path.clone());
        let identity = Identity {
            id: UserId::new(7),
            email: Email::parse("user@example.com").expect("valid"),
            is_admin: false,
        };
        store
            .establish("tok-123".to_string(), identity)
            .expect("persist");

        // A fresh store (new process) sees the same session.
        let restored_store = SessionStore::new(path);
        let restored = restored_store.restore().expect("session on disk");
        assert_eq!(restored.id, UserId::new(7));
        assert_eq!(
            restored_store.bearer().expect("signed in").expose_secret(),
            "tok-123"
        );
    }

    #[test]
    fn test_session_file_uses_fixed_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = session_path(&dir);

        let store = SessionStore::new(path.clone());
        let identity = Identity {
            id: UserId::new(1),
            email: Email::parse("user@example.com").expect("valid"),
            is_admin: true,
        };
        store.establish("tok".to_string(), identity).expect("persist");

        let raw = std::fs::read_to_string(&path).expect("file exists");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
        assert!(value.get("token").is_some());
        assert!(value.get("user").is_some());
        assert_eq!(value["user"]["isAdmin"], serde_json::Value::Bool(true));
    }

    #[test]
    fn test_logout_is_idempotent_and_clears_storage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = session_path(&dir);

        let store = SessionStore::new(path.clone());
        let identity = Identity {
            id: UserId::new(2),
            email: Email::parse("user@example.com").expect("valid"),
            is_admin: false,
        };
        store.establish("tok".to_string(), identity).expect("persist");

        store.logout();
        assert!(store.identity().is_none());
        assert!(!path.exists());
        assert!(matches!(store.bearer(), Err(StoreError::Unauthenticated)));

        // Second logout is a no-op, not an error.
        store.logout();
    }
}
