//! GraphQL envelope handling
//!
//! Every resource operation except auth and project CRUD goes through a single
//! `POST {endpoint}/api/query` call carrying `{query, variables}`. Responses
//! wrap their payload in `{data, errors?}`; per the GraphQL convention a
//! non-empty `errors` array is a remote failure even when the HTTP status is
//! 200, and it is surfaced as [`ApiError::Remote`] with the serialized errors
//! as the body.

use domain::Credentials;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::transport::{HttpMethod, Transport, TransportRequest};

/// Outgoing GraphQL call
#[derive(Debug, Serialize)]
pub(crate) struct GraphqlRequest<'a, V: Serialize> {
    pub query: &'a str,
    pub variables: V,
}

/// Incoming GraphQL envelope
#[derive(Debug, Deserialize)]
pub(crate) struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

/// One entry of a GraphQL `errors` array
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<serde_json::Value>>,
}

/// Issue a GraphQL operation and unwrap its envelope.
pub(crate) async fn execute<T, V>(
    transport: &dyn Transport,
    credentials: &Credentials,
    query: &str,
    variables: V,
) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    V: Serialize,
{
    let body = serde_json::to_vec(&GraphqlRequest { query, variables })
        .map_err(|e| ApiError::Serialization(e.to_string()))?;

    let url = format!("{}/api/query", credentials.endpoint());
    debug!(url = %url, "Executing GraphQL operation");

    let response = transport
        .send(TransportRequest {
            url,
            method: HttpMethod::Post,
            bearer_token: Some(credentials.token().to_string()),
            body: Some(body),
        })
        .await?;

    if !response.is_success() {
        return Err(ApiError::Remote {
            status: response.status,
            body: response.body_text(),
        });
    }

    let envelope: GraphqlResponse<T> = serde_json::from_slice(&response.body)
        .map_err(|e| ApiError::Serialization(e.to_string()))?;

    if !envelope.errors.is_empty() {
        let body = serde_json::to_string(&envelope.errors)
            .unwrap_or_else(|_| "unserializable GraphQL errors".to_string());
        return Err(ApiError::Remote {
            status: response.status,
            body,
        });
    }

    envelope.data.ok_or_else(|| {
        ApiError::Serialization("GraphQL response carried neither data nor errors".to_string())
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::transport::test_support::RecordingTransport;

    fn credentials() -> Credentials {
        Credentials::new("http://localhost:8080", "token-123").with_project("project-1")
    }

    #[derive(Debug, Deserialize, PartialEq, Eq)]
    struct Payload {
        value: String,
    }

    #[tokio::test]
    async fn unwraps_data_on_success() {
        let transport = RecordingTransport::respond_with(
            200,
            &json!({"data": {"value": "ok"}}).to_string(),
        );

        let payload: Payload = execute(&transport, &credentials(), "query {}", json!({}))
            .await
            .unwrap();
        assert_eq!(payload.value, "ok");

        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "http://localhost:8080/api/query");
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.bearer_token.as_deref(), Some("token-123"));
    }

    #[tokio::test]
    async fn errors_array_is_remote_failure_despite_200() {
        let transport = RecordingTransport::respond_with(
            200,
            &json!({
                "data": null,
                "errors": [{"message": "probe not found", "path": ["getProbe"]}]
            })
            .to_string(),
        );

        let result: Result<Payload, _> =
            execute(&transport, &credentials(), "query {}", json!({})).await;

        match result {
            Err(ApiError::Remote { status, body }) => {
                assert_eq!(status, 200);
                assert!(body.contains("probe not found"));
            }
            other => unreachable!("expected remote error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_success_status_is_remote_failure() {
        let transport = RecordingTransport::respond_with(500, "internal server error");

        let result: Result<Payload, _> =
            execute(&transport, &credentials(), "query {}", json!({})).await;

        match result {
            Err(ApiError::Remote { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal server error");
            }
            other => unreachable!("expected remote error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_serialization_failure() {
        let transport = RecordingTransport::respond_with(200, "not json");

        let result: Result<Payload, _> =
            execute(&transport, &credentials(), "query {}", json!({})).await;
        assert!(matches!(result, Err(ApiError::Serialization(_))));
    }

    #[tokio::test]
    async fn missing_data_and_errors_is_serialization_failure() {
        let transport = RecordingTransport::respond_with(200, "{}");

        let result: Result<Payload, _> =
            execute(&transport, &credentials(), "query {}", json!({})).await;
        assert!(matches!(result, Err(ApiError::Serialization(_))));
    }
}
