//! Durable session store.
//!
//! Holds the authenticated identity and bearer token, persisted as JSON
//! so a session survives process restarts. The store is explicitly
//! injected (`Arc<SessionStore>`) into the gateway and every view that
//! needs it; there is no ambient global. The gateway routes every 401
//! through [`SessionStore::handle_unauthorized`] before the originating
//! caller sees the response.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use devmart_core::user::User;

/// Screen the user is currently on. Mirrors the route table of the web
/// client; the 401 expiry handler is suppressed on auth screens so a
/// failed login does not trigger a redirect loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Login,
    Signup,
    ForgotPassword,
    ResetPassword,
    VerifyEmail,
    Projects,
    ProjectDetail,
    Dashboard,
    Profile,
    Admin,
}

impl Screen {
    /// Screens where a 401 means "bad credentials", not "session
    /// expired": login, signup, and forgot-password.
    pub fn is_auth_screen(self) -> bool {
        matches!(self, Screen::Login | Screen::Signup | Screen::ForgotPassword)
    }
}

/// What gets persisted: token and user, both present or both absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    user: User,
}

type ExpiryHook = Box<dyn Fn() + Send + Sync>;

/// Current authenticated identity plus the durable file backing it.
pub struct SessionStore {
    path: PathBuf,
    inner: Mutex<Option<StoredSession>>,
    screen: Mutex<Screen>,
    on_expire: Mutex<Option<ExpiryHook>>,
}

impl SessionStore {
    /// Read the persisted session from `path`. A well-formed file marks
    /// the session authenticated; a malformed one is cleared so the next
    /// start is clean. Runs once at process start and is not retried.
    pub fn initialize(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let stored = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<StoredSession>(&contents) {
                Ok(stored) => {
                    tracing::debug!(user = %stored.user.username, "Restored persisted session");
                    Some(stored)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Persisted session is malformed; clearing");
                    let _ = std::fs::remove_file(&path);
                    None
                }
            },
            Err(_) => None,
        };

        Self {
            path,
            inner: Mutex::new(stored),
            screen: Mutex::new(Screen::Home),
            on_expire: Mutex::new(None),
        }
    }

    /// Bearer token for outbound calls, when authenticated.
    pub fn token(&self) -> Option<String> {
        self.inner
            .lock()
            .expect("session lock poisoned")
            .as_ref()
            .map(|s| s.token.clone())
    }

    /// The authenticated user, when present.
    pub fn current_user(&self) -> Option<User> {
        self.inner
            .lock()
            .expect("session lock poisoned")
            .as_ref()
            .map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.lock().expect("session lock poisoned").is_some()
    }

    /// Register the hook fired when the server signals expiry. The view
    /// layer uses this to navigate back to the login entry point.
    pub fn on_expire(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_expire.lock().expect("session lock poisoned") = Some(Box::new(hook));
    }

    pub fn set_screen(&self, screen: Screen) {
        *self.screen.lock().expect("session lock poisoned") = screen;
    }

    pub fn screen(&self) -> Screen {
        *self.screen.lock().expect("session lock poisoned")
    }

    /// Persist a fresh token and user after login, arming the gateway's
    /// auth header for subsequent calls.
    pub(crate) fn store(&self, token: String, user: User) -> std::io::Result<()> {
        let stored = StoredSession { token, user };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&stored).expect("session is always serialisable");
        std::fs::write(&self.path, json)?;
        *self.inner.lock().expect("session lock poisoned") = Some(stored);
        Ok(())
    }

    /// Clear token and user, locally and on disk. Always succeeds; a
    /// failed file removal is logged and ignored.
    pub fn clear(&self) {
        *self.inner.lock().expect("session lock poisoned") = None;
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(error = %err, "Failed to remove session file");
            }
        }
    }

    /// Server-signalled expiry: clear the session and fire the expiry
    /// hook, unless the user is on an auth screen (a login attempt that
    /// returns 401 is a credential failure, not an expired session) or
    /// there is no session to expire.
    ///
    /// Returns whether the session was cleared.
    pub(crate) fn handle_unauthorized(&self) -> bool {
        if self.screen().is_auth_screen() {
            return false;
        }
        if !self.is_authenticated() {
            return false;
        }

        tracing::warn!("Session expired; clearing stored credentials");
        self.clear();
        if let Some(hook) = self.on_expire.lock().expect("session lock poisoned").as_ref() {
            hook();
        }
        true
    }

    /// Path of the durable session file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devmart_core::user::Role;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn user() -> User {
        User {
            id: "u1".into(),
            username: "asha".into(),
            email: "asha@example.com".into(),
            role: Role::User,
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::initialize(dir.path().join("session.json"))
    }

    #[test]
    fn test_starts_unauthenticated_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(!store.is_authenticated());
        assert!(store.token().is_none());
        assert!(store.current_user().is_none());
    }

    #[test]
    fn test_store_persists_across_initialize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::initialize(&path);
        store.store("tok-123".into(), user()).unwrap();

        let reloaded = SessionStore::initialize(&path);
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.token().as_deref(), Some("tok-123"));
        assert_eq!(reloaded.current_user().unwrap().username, "asha");
    }

    #[test]
    fn test_malformed_file_is_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = SessionStore::initialize(&path);
        assert!(!store.is_authenticated());
        assert!(!path.exists(), "malformed session file must be removed");
    }

    #[test]
    fn test_clear_removes_file_and_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.store("tok".into(), user()).unwrap();
        assert!(store.path().exists());

        store.clear();
        assert!(!store.is_authenticated());
        assert!(!store.path().exists());
        // Clearing twice is harmless.
        store.clear();
    }

    #[test]
    fn test_unauthorized_on_dashboard_expires_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.store("tok".into(), user()).unwrap();
        store.set_screen(Screen::Dashboard);

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        store.on_expire(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(store.handle_unauthorized());
        assert!(!store.is_authenticated());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unauthorized_on_login_screen_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.store("tok".into(), user()).unwrap();
        store.set_screen(Screen::Login);

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        store.on_expire(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!store.handle_unauthorized());
        // Credentials failure during login must not destroy the session.
        assert!(store.is_authenticated());
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unauthorized_without_session_does_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set_screen(Screen::Dashboard);
        assert!(!store.handle_unauthorized());
    }

    #[test]
    fn test_auth_screens() {
        assert!(Screen::Login.is_auth_screen());
        assert!(Screen::Signup.is_auth_screen());
        assert!(Screen::ForgotPassword.is_auth_screen());
        assert!(!Screen::ResetPassword.is_auth_screen());
        assert!(!Screen::Dashboard.is_auth_screen());
    }
}
