//! Authentication against the control plane's auth server
//!
//! Login is plain REST: `POST {endpoint}/auth/login` with a username/password
//! payload and no bearer token. The returned access token seeds the
//! [`Credentials`](domain::Credentials) value every other operation carries.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ApiError, require_non_empty};
use crate::transport::{HttpMethod, Transport, TransportRequest};

#[derive(Debug, Serialize)]
struct LoginPayload<'a> {
    username: &'a str,
    password: &'a str,
}

/// Successful login response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Bearer token for subsequent calls
    pub access_token: String,
    /// Default project scope, when the server assigns one at login
    #[serde(rename = "projectID", default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub project_role: Option<String>,
    /// Token lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Exchange a username/password for an access token.
#[instrument(skip(transport, password), fields(endpoint = %endpoint, username = %username))]
pub async fn login(
    transport: &dyn Transport,
    endpoint: &str,
    username: &str,
    password: &str,
) -> Result<AuthResponse, ApiError> {
    require_non_empty(endpoint, "endpoint")?;
    require_non_empty(username, "username")?;

    let body = serde_json::to_vec(&LoginPayload { username, password })
        .map_err(|e| ApiError::Serialization(e.to_string()))?;

    let response = transport
        .send(TransportRequest {
            url: format!("{endpoint}/auth/login"),
            method: HttpMethod::Post,
            // The auth server validates the payload itself; no token yet
            bearer_token: None,
            body: Some(body),
        })
        .await?;

    if !response.is_success() {
        return Err(ApiError::Remote {
            status: response.status,
            body: response.body_text(),
        });
    }

    serde_json::from_slice(&response.body).map_err(|e| ApiError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::transport::test_support::RecordingTransport;

    #[tokio::test]
    async fn login_posts_credentials_without_token() {
        let transport = RecordingTransport::respond_with(
            200,
            &json!({"accessToken": "jwt-abc", "projectID": "p-1", "expiresIn": 86400}).to_string(),
        );

        let auth = login(&transport, "http://localhost:8080", "admin", "secret")
            .await
            .unwrap();
        assert_eq!(auth.access_token, "jwt-abc");
        assert_eq!(auth.project_id.as_deref(), Some("p-1"));
        assert_eq!(auth.expires_in, Some(86400));

        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "http://localhost:8080/auth/login");
        assert!(request.bearer_token.is_none());

        let payload: serde_json::Value =
            serde_json::from_slice(&request.body.unwrap()).unwrap();
        assert_eq!(payload["username"], "admin");
        assert_eq!(payload["password"], "secret");
    }

    #[tokio::test]
    async fn login_failure_surfaces_status_and_body() {
        let transport = RecordingTransport::respond_with(401, "invalid credentials");

        let err = login(&transport, "http://localhost:8080", "admin", "wrong")
            .await
            .unwrap_err();
        match err {
            ApiError::Remote { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid credentials");
            }
            other => unreachable!("expected remote error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_rejects_empty_endpoint_locally() {
        let transport = RecordingTransport::respond_with(200, "{}");

        let err = login(&transport, "", "admin", "secret").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn minimal_response_parses() {
        let transport =
            RecordingTransport::respond_with(200, &json!({"accessToken": "jwt"}).to_string());

        let auth = login(&transport, "http://localhost:8080", "admin", "secret")
            .await
            .unwrap();
        assert_eq!(auth.access_token, "jwt");
        assert!(auth.project_id.is_none());
        assert!(auth.project_role.is_none());
    }
}
