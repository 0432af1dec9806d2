//! SkillBridge Client Library
//!
//! Request pipeline, session lifecycle and backend services for the
//! SkillBridge tutoring marketplace.

pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod envelope;
pub mod http;
pub mod jwt;
pub mod logging;
pub mod models;
pub mod navigation;
pub mod notifications;
pub mod services;
pub mod storage;
pub mod token_store;

use std::sync::Arc;
use tracing::debug;

use api::ApiClient;
use auth::SessionState;
use config::Config;
use http::{ApiError, HttpClient};
use navigation::Router;
use notifications::NotificationState;
use services::{AuthService, JobService, ProfileService, WalletService};
use storage::SecureStorage;
use token_store::TokenStore;

/// Application state shared across commands.
///
/// Created once at start-up and passed to whatever needs it.
pub struct AppContext {
    pub config: Config,
    pub tokens: TokenStore,
    pub router: Arc<Router>,
    pub session: Arc<SessionState>,
    pub notifications: Arc<NotificationState>,
    pub api: ApiClient,
    pub auth: AuthService,
    pub profile: ProfileService,
    pub jobs: JobService,
    pub wallet: WalletService,
}

impl AppContext {
    /// Build the context with storage under the configured data directory
    pub fn create(config: Config) -> Result<Self, ApiError> {
        let storage = SecureStorage::open(config.data_root());
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: Config, storage: SecureStorage) -> Result<Self, ApiError> {
        let tokens = TokenStore::new(storage);
        let router = Arc::new(Router::new());
        let session = Arc::new(SessionState::new(tokens.clone(), router.clone()));

        let http = HttpClient::new(&config, tokens.clone())?.with_unauthorized_handler(session.clone());
        debug!("API root: {}", http.api_root());
        let api = ApiClient::new(http);

        Ok(Self {
            auth: AuthService::new(api.clone()),
            profile: ProfileService::new(api.clone()),
            jobs: JobService::new(api.clone()),
            wallet: WalletService::new(api.clone(), tokens.clone()),
            notifications: Arc::new(NotificationState::new()),
            config,
            tokens,
            router,
            session,
            api,
        })
    }

    /// Drop in-memory session and notifications; persisted credentials stay
    pub fn teardown(&self) {
        self.session.teardown();
        self.notifications.clear_notifications();
    }
}
