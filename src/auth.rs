//! Authentication Module
//!
//! Handles session state: who is logged in, with which token.

use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

use crate::http::UnauthorizedHandler;
use crate::jwt;
use crate::models::UserProfile;
use crate::navigation::{Navigator, LOGIN_ROUTE};
use crate::token_store::TokenStore;

/// In-memory session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }
}

/// Owns the session and its persisted token.
///
/// A user is only ever set together with a token, so `user.is_some()`
/// implies `token.is_some()`.
pub struct SessionState {
    session: Mutex<Session>,
    tokens: TokenStore,
    navigator: Arc<dyn Navigator>,
}

impl SessionState {
    pub fn new(tokens: TokenStore, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            session: Mutex::new(Session::default()),
            tokens,
            navigator,
        }
    }

    /// Start an authenticated session and persist its token
    pub fn login(&self, user: UserProfile, token: String) {
        info!("Session set for user: {}", user.user_id);
        self.tokens.set(&token);
        self.tokens.cache_profile(&user);

        *self.lock() = Session {
            user: Some(user),
            token: Some(token),
        };
    }

    /// Restore a persisted session. Expired tokens are discarded.
    pub fn hydrate(&self) -> bool {
        let Some(token) = self.tokens.get() else {
            return false;
        };

        if jwt::is_expired(&token) {
            info!("Stored session is expired");
            self.tokens.remove();
            return false;
        }

        let user = self.tokens.cached_profile();
        if let Some(user) = &user {
            info!("Restored session for user: {}", user.user_id);
        }
        *self.lock() = Session {
            user,
            token: Some(token),
        };
        true
    }

    /// End the session because the backend rejected our credentials
    pub fn force_logout(&self) {
        warn!("Forcing logout");
        self.clear();
        self.navigator.navigate(LOGIN_ROUTE);
    }

    /// End the session at the user's request
    pub fn logout(&self) {
        info!("Logging out");
        self.clear();
        self.navigator.navigate(LOGIN_ROUTE);
    }

    /// Drop in-memory state, leaving persisted credentials in place
    pub fn teardown(&self) {
        *self.lock() = Session::default();
    }

    /// Whether the stored token exists and has not expired
    pub fn is_token_valid(&self) -> bool {
        self.tokens.get().map(|t| !jwt::is_expired(&t)).unwrap_or(false)
    }

    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.lock().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated()
    }

    fn clear(&self) {
        *self.lock() = Session::default();
        self.tokens.remove();
        info!("Session cleared");
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl UnauthorizedHandler for SessionState {
    fn on_unauthorized(&self) {
        self.force_logout();
    }
}
