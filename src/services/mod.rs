//! Per-entity services over the backend REST API.
//!
//! Each service is a cheap clone over the shared [`ApiClient`](crate::api::ApiClient)
//! and returns typed [`ApiResult`](crate::http::ApiResult)s.

pub mod auth;
pub mod jobs;
pub mod profile;
pub mod wallet;

pub use auth::AuthService;
pub use jobs::JobService;
pub use profile::ProfileService;
pub use wallet::WalletService;

#[cfg(test)]
pub(crate) mod testing {
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use wiremock::ResponseTemplate;

    use crate::api::ApiClient;
    use crate::config::Config;
    use crate::http::HttpClient;
    use crate::storage::SecureStorage;
    use crate::token_store::TokenStore;

    /// API client pointed at `uri` with its own temporary storage
    pub fn api_for(uri: &str) -> (ApiClient, TokenStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let tokens = TokenStore::new(SecureStorage::open(dir.path()));
        let config = Config {
            backend_base_url: uri.to_string(),
            ..Config::default()
        };
        let http = HttpClient::new(&config, tokens.clone()).unwrap();
        (ApiClient::new(http), tokens, dir)
    }

    /// Successful backend envelope around `data`
    pub fn envelope(data: Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "headers": { "responseCode": 200, "customerMessage": "Success" },
            "body": { "data": data }
        }))
    }
}
