//! Login against `auth/login`.

use tracing::info;

use crate::api::ApiClient;
use crate::envelope;
use crate::http::{ApiError, ApiResult};
use crate::models::{LoginRequest, LoginResponse};

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Exchange credentials for a token and the user's profile.
    ///
    /// Does not touch the session; the caller decides what to do with the token.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ApiError::Validation("Email is required".into()));
        }
        if password.is_empty() {
            return Err(ApiError::Validation("Password is required".into()));
        }

        let response: ApiResult<LoginResponse> =
            envelope::unwrap(self.api.post("/auth/login", &LoginRequest { email, password }).await);

        if let Ok(ok) = &response {
            info!("Login succeeded for user: {}", ok.data.user.user_id);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{api_for, envelope};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn login_unwraps_token_and_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .respond_with(envelope(json!({
                "token": "jwt-token",
                "user": { "userId": 3, "roleName": "ROLE_STUDENT", "stepName": "REQUIREMENT" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (api, _tokens, _dir) = api_for(&server.uri());
        let response = AuthService::new(api).login(" s@x.io ", "pw").await.unwrap();

        assert_eq!(response.data.token, "jwt-token");
        assert_eq!(response.data.user.user_id, 3);
    }

    #[tokio::test]
    async fn empty_credentials_never_reach_network() {
        let server = MockServer::start().await;
        let (api, _tokens, _dir) = api_for(&server.uri());
        let service = AuthService::new(api);

        assert!(matches!(service.login("  ", "pw").await, Err(ApiError::Validation(_))));
        assert!(matches!(service.login("a@b.c", "").await, Err(ApiError::Validation(_))));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_credentials_surface_customer_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "headers": { "responseCode": 400, "customerMessage": "Invalid email or password" },
                "body": { "data": null }
            })))
            .mount(&server)
            .await;

        let (api, _tokens, _dir) = api_for(&server.uri());
        let err = AuthService::new(api).login("a@b.c", "nope").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");
        assert_eq!(err.status_code(), Some(400));
    }
}
