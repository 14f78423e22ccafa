//! Session controller
//!
//! Owns the in-memory session for the lifetime of the application shell and
//! publishes every change through a [`watch`] channel, so any consumer can
//! read a snapshot or subscribe to updates.
//!
//! `signin` flips the session to [`SessionPhase::Pending`] immediately and
//! confirms the profile in a background task. Each signin and signout
//! advances the session generation; a fetch that resolves after the
//! generation has moved on is discarded.

use crate::auth::models::{SessionPhase, SessionState, User};
use crate::auth::navigation::{LoginPrompt, MemoryNavigator, Navigator};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::identity::{HttpIdentityClient, IdentityProvider};
use crate::storage::keys::{DEFAULT_REMEMBER_ME_KEY, DEFAULT_TOKEN_KEY};
use crate::storage::{FileStorage, RememberMeStore, Storage, TokenStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Shared handle to the session. Clones observe and mutate the same state.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
}

struct Inner {
    state: watch::Sender<SessionState>,
    tokens: TokenStore,
    remember: RememberMeStore,
    identity: Arc<dyn IdentityProvider>,
    navigator: Arc<dyn Navigator>,
    prompt: Arc<dyn LoginPrompt>,
    root_route: String,
    mounted: AtomicBool,
}

/// Builder for [`SessionController`]
pub struct SessionControllerBuilder {
    storage: Arc<dyn Storage>,
    identity: Arc<dyn IdentityProvider>,
    navigator: Option<Arc<dyn Navigator>>,
    prompt: Option<Arc<dyn LoginPrompt>>,
    root_route: String,
    token_key: String,
    remember_me_key: String,
}

impl SessionControllerBuilder {
    pub fn new(storage: Arc<dyn Storage>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            storage,
            identity,
            navigator: None,
            prompt: None,
            root_route: "/".to_string(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            remember_me_key: DEFAULT_REMEMBER_ME_KEY.to_string(),
        }
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn login_prompt(mut self, prompt: Arc<dyn LoginPrompt>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    pub fn root_route(mut self, route: impl Into<String>) -> Self {
        self.root_route = route.into();
        self
    }

    pub fn token_key(mut self, key: impl Into<String>) -> Self {
        self.token_key = key.into();
        self
    }

    pub fn remember_me_key(mut self, key: impl Into<String>) -> Self {
        self.remember_me_key = key.into();
        self
    }

    pub fn build(self) -> SessionController {
        let tokens = TokenStore::with_key(Arc::clone(&self.storage), self.token_key);
        let remember = RememberMeStore::with_key(self.storage, self.remember_me_key);

        let has_token = read_token(&tokens).is_some();
        let (state, _) = watch::channel(SessionState::initial(has_token));

        let navigator = self.navigator.unwrap_or_else(|| {
            Arc::new(MemoryNavigator::new(self.root_route.clone())) as Arc<dyn Navigator>
        });
        let prompt = self.prompt.unwrap_or_else(|| {
            Arc::new(|| tracing::info!("Login required")) as Arc<dyn LoginPrompt>
        });

        SessionController {
            inner: Arc::new(Inner {
                state,
                tokens,
                remember,
                identity: self.identity,
                navigator,
                prompt,
                root_route: self.root_route,
                mounted: AtomicBool::new(false),
            }),
        }
    }
}

impl SessionController {
    pub fn builder(
        storage: Arc<dyn Storage>,
        identity: Arc<dyn IdentityProvider>,
    ) -> SessionControllerBuilder {
        SessionControllerBuilder::new(storage, identity)
    }

    /// Controller backed by file storage and the HTTP identity endpoint
    pub fn from_config(
        config: &Config,
        navigator: Arc<dyn Navigator>,
        prompt: Arc<dyn LoginPrompt>,
    ) -> Result<Self> {
        let storage = Arc::new(FileStorage::open(&config.storage.dir)?);
        let identity = Arc::new(HttpIdentityClient::new(&config.identity)?);

        Ok(SessionControllerBuilder::new(storage, identity)
            .token_key(config.storage.token_key.clone())
            .remember_me_key(config.storage.remember_me_key.clone())
            .root_route(config.routes.root.clone())
            .navigator(navigator)
            .login_prompt(prompt)
            .build())
    }

    /// Current session snapshot
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that is notified on every session change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub fn user(&self) -> User {
        self.inner.state.borrow().user.clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.inner.state.borrow().phase
    }

    pub fn is_login(&self) -> bool {
        self.inner.state.borrow().is_login()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    pub fn has_token(&self) -> bool {
        read_token(&self.inner.tokens).is_some()
    }

    /// Replace the current user. A non-anonymous user also marks the session authenticated.
    pub fn set_auth_user(&self, user: User) {
        self.inner.state.send_modify(|state| apply_user(state, user));
    }

    /// Sign out and navigate to the root route
    pub fn signout(&self) {
        self.inner.reset(None);
        self.inner.navigator.push(&self.inner.root_route);
    }

    /// Sign out and run `on_complete` instead of navigating
    pub fn signout_with<F>(&self, on_complete: F)
    where
        F: FnOnce(),
    {
        self.inner.reset(None);
        on_complete();
    }

    /// Optimistically sign in and confirm the profile in the background.
    ///
    /// Must be called from within a Tokio runtime. Dropping the returned
    /// handle detaches the fetch.
    pub fn signin(&self) -> JoinHandle<()> {
        self.signin_with(|| {})
    }

    /// Like [`signin`](Self::signin), running `on_complete` once the profile is applied
    pub fn signin_with<F>(&self, on_complete: F) -> JoinHandle<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut generation = 0;
        self.inner.state.send_modify(|state| {
            state.generation += 1;
            state.phase = SessionPhase::Pending;
            generation = state.generation;
        });
        tracing::debug!(generation, "Sign-in started");

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.confirm_profile(generation, on_complete).await })
    }

    /// Persist `token` and the remember-me choice, then sign in
    pub fn login(&self, token: &str, remember: bool) -> Result<JoinHandle<()>> {
        self.inner.tokens.set_token(token)?;
        self.inner.remember.set(remember)?;
        Ok(self.signin())
    }

    /// Startup synchronization: restores the session from a persisted token.
    ///
    /// Only the first call has any effect. Returns the sign-in handle when a
    /// restore was started.
    pub fn mount(&self) -> Option<JoinHandle<()>> {
        if self.inner.mounted.swap(true, Ordering::SeqCst) {
            return None;
        }

        let anonymous = self.inner.state.borrow().user.is_anonymous();
        if anonymous && self.has_token() {
            tracing::info!("Restoring session from persisted token");
            Some(self.signin())
        } else {
            None
        }
    }

    pub fn is_remember_me_set(&self) -> Result<bool> {
        self.inner.remember.is_set()
    }

    pub fn set_remember_me(&self, on: bool) -> Result<()> {
        self.inner.remember.set(on)
    }
}

impl Inner {
    async fn confirm_profile<F>(&self, generation: u64, on_complete: F)
    where
        F: FnOnce(),
    {
        let token = read_token(&self.tokens);
        let result = match self.identity.fetch_profile(token.as_deref()).await {
            Ok(profile) if profile.id == 0 => Err(Error::AnonymousProfile),
            other => other,
        };

        match result {
            Ok(profile) => {
                let user = User::from(profile);
                let user_id = user.id;
                let applied = self.state.send_if_modified(|state| {
                    if state.generation != generation {
                        return false;
                    }
                    apply_user(state, user);
                    true
                });

                if applied {
                    tracing::info!(user_id, "Signed in");
                    on_complete();
                } else {
                    tracing::debug!(generation, "Discarding stale profile");
                }
            }
            Err(e) => {
                if self.reset(Some(generation)) {
                    tracing::warn!(error = %e, "Profile fetch failed, signing out");
                    self.prompt.show_login_modal();
                    self.navigator.push(&self.root_route);
                } else {
                    tracing::debug!(generation, error = %e, "Discarding stale fetch failure");
                }
            }
        }
    }

    /// Reset to anonymous and clear persisted credentials.
    ///
    /// With `expected` set, nothing happens unless the session is still on
    /// that generation. Returns whether the reset was performed.
    fn reset(&self, expected: Option<u64>) -> bool {
        let mut performed = false;
        self.state.send_if_modified(|state| {
            if expected.is_some_and(|g| g != state.generation) {
                return false;
            }
            performed = true;

            if state.phase == SessionPhase::Anonymous && state.user.is_anonymous() {
                return false;
            }
            state.phase = SessionPhase::Anonymous;
            state.user = User::anonymous();
            state.generation += 1;
            state.authenticated_at = None;
            true
        });

        if performed {
            if let Err(e) = self.tokens.remove_token() {
                tracing::warn!(error = %e, "Failed to remove auth token");
            }
            if let Err(e) = self.remember.remove() {
                tracing::warn!(error = %e, "Failed to remove remember-me flag");
            }
            tracing::info!("Signed out");
        }
        performed
    }
}

fn apply_user(state: &mut SessionState, user: User) {
    if !user.is_anonymous() {
        state.phase = SessionPhase::Authenticated;
        state.authenticated_at = Some(chrono::Utc::now());
    }
    state.user = user;
}

fn read_token(tokens: &TokenStore) -> Option<String> {
    tokens.get_token().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to read auth token");
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ProfilePayload;
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl IdentityProvider for Unreachable {
        async fn fetch_profile(&self, _token: Option<&str>) -> Result<ProfilePayload> {
            Err(Error::Other("identity endpoint unavailable".to_string()))
        }
    }

    fn controller() -> SessionController {
        SessionController::builder(Arc::new(MemoryStorage::new()), Arc::new(Unreachable)).build()
    }

    fn named(id: u64) -> User {
        User {
            id,
            name: format!("user-{}", id),
            ..User::anonymous()
        }
    }

    #[test]
    fn test_set_auth_user_marks_login() {
        let session = controller();
        assert!(!session.is_login());

        session.set_auth_user(named(7));

        assert!(session.is_login());
        assert!(session.is_authenticated());
        assert_eq!(session.user().id, 7);
        assert!(session.state().authenticated_at.is_some());
    }

    #[test]
    fn test_set_auth_user_anonymous_keeps_flag() {
        let session = controller();
        session.set_auth_user(User::anonymous());
        assert!(!session.is_login());

        session.set_auth_user(named(7));
        session.set_auth_user(User::anonymous());
        assert!(session.is_login());
        assert!(session.user().is_anonymous());
    }

    #[test]
    fn test_signout_with_skips_navigation() {
        let nav = Arc::new(MemoryNavigator::new("/profile"));
        let session = SessionController::builder(Arc::new(MemoryStorage::new()), Arc::new(Unreachable))
            .navigator(nav.clone())
            .build();
        session.set_auth_user(named(1));

        let mut called = false;
        session.signout_with(|| called = true);

        assert!(called);
        assert_eq!(nav.current(), "/profile");
        assert!(!session.is_login());
    }

    #[test]
    fn test_subscribers_see_changes() {
        let session = controller();
        let mut rx = session.subscribe();
        assert!(!rx.has_changed().unwrap());

        session.set_auth_user(named(3));

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().user.id, 3);
    }

    #[tokio::test]
    async fn test_mount_runs_once() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set("token", "abc").unwrap();
        let session = SessionController::builder(storage, Arc::new(Unreachable)).build();

        let first = session.mount();
        assert!(first.is_some());
        assert!(session.mount().is_none());
        first.unwrap().await.unwrap();
    }
}
