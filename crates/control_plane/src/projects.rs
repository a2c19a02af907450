//! Project operations
//!
//! Projects live on the auth server rather than behind the GraphQL gateway,
//! so these are plain REST calls with a `{data: ...}` response envelope.

use std::fmt;
use std::sync::Arc;

use domain::Credentials;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ApiError, require_non_empty};
use crate::transport::{HttpMethod, Transport, TransportRequest, TransportResponse};

/// A project as the auth server reports it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "projectID", alias = "id")]
    pub project_id: String,
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectListData {
    #[serde(default)]
    projects: Vec<Project>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateProjectPayload<'a> {
    project_name: &'a str,
}

/// Project service bound to one credentials value
pub struct Projects {
    transport: Arc<dyn Transport>,
    credentials: Credentials,
}

impl fmt::Debug for Projects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projects")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl Projects {
    /// Bind the service to a transport and credentials.
    pub fn with_transport(transport: Arc<dyn Transport>, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/{path}", self.credentials.endpoint())
    }

    fn decode<T: serde::de::DeserializeOwned>(
        response: &TransportResponse,
    ) -> Result<T, ApiError> {
        if !response.is_success() {
            return Err(ApiError::Remote {
                status: response.status,
                body: response.body_text(),
            });
        }
        let envelope: DataEnvelope<T> = serde_json::from_slice(&response.body)
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(envelope.data)
    }

    /// List all projects visible to the session.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Project>, ApiError> {
        let response = self
            .transport
            .send(TransportRequest {
                url: self.auth_url("list_projects"),
                method: HttpMethod::Get,
                bearer_token: Some(self.credentials.token().to_string()),
                body: None,
            })
            .await?;

        let data: ProjectListData = Self::decode(&response)?;
        Ok(data.projects)
    }

    /// Create a project with the given name.
    #[instrument(skip(self))]
    pub async fn create(&self, name: &str) -> Result<Project, ApiError> {
        require_non_empty(name, "project name")?;

        let body = serde_json::to_vec(&CreateProjectPayload { project_name: name })
            .map_err(|e| ApiError::Serialization(e.to_string()))?;

        let response = self
            .transport
            .send(TransportRequest {
                url: self.auth_url("create_project"),
                method: HttpMethod::Post,
                bearer_token: Some(self.credentials.token().to_string()),
                body: Some(body),
            })
            .await?;

        Self::decode(&response)
    }

    /// Delete a project by identifier.
    #[instrument(skip(self))]
    pub async fn delete(&self, project_id: &str) -> Result<(), ApiError> {
        require_non_empty(project_id, "project id")?;

        let response = self
            .transport
            .send(TransportRequest {
                url: self.auth_url(&format!("delete_project/{project_id}")),
                method: HttpMethod::Post,
                bearer_token: Some(self.credentials.token().to_string()),
                body: None,
            })
            .await?;

        if !response.is_success() {
            return Err(ApiError::Remote {
                status: response.status,
                body: response.body_text(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::transport::test_support::RecordingTransport;

    fn credentials() -> Credentials {
        Credentials::new("http://localhost:8080", "token-123")
    }

    fn service(transport: Arc<RecordingTransport>) -> Projects {
        Projects::with_transport(transport, credentials())
    }

    #[tokio::test]
    async fn list_decodes_projects_from_envelope() {
        let transport = Arc::new(RecordingTransport::respond_with(
            200,
            &json!({
                "data": {
                    "projects": [
                        {"projectID": "p-1", "name": "alpha", "state": "active"},
                        {"projectID": "p-2", "name": "beta"}
                    ],
                    "totalNumberOfProjects": 2
                }
            })
            .to_string(),
        ));
        let projects = service(Arc::clone(&transport));

        let listed = projects.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].project_id, "p-1");
        assert_eq!(listed[1].name, "beta");

        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "http://localhost:8080/auth/list_projects");
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.bearer_token.as_deref(), Some("token-123"));
    }

    #[tokio::test]
    async fn list_with_no_projects_is_empty_not_absent() {
        let transport = Arc::new(RecordingTransport::respond_with(
            200,
            &json!({"data": {}}).to_string(),
        ));
        let projects = service(transport);

        let listed = projects.list().await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn create_posts_project_name() {
        let transport = Arc::new(RecordingTransport::respond_with(
            200,
            &json!({"data": {"projectID": "p-3", "name": "gamma"}}).to_string(),
        ));
        let projects = service(Arc::clone(&transport));

        let project = projects.create("gamma").await.unwrap();
        assert_eq!(project.project_id, "p-3");

        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "http://localhost:8080/auth/create_project");
        let payload: serde_json::Value = serde_json::from_slice(&request.body.unwrap()).unwrap();
        assert_eq!(payload["projectName"], "gamma");
    }

    #[tokio::test]
    async fn create_rejects_empty_name_without_network() {
        let transport = Arc::new(RecordingTransport::respond_with(200, "{}"));
        let projects = service(Arc::clone(&transport));

        let err = projects.create("").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn delete_targets_the_project_path() {
        let transport = Arc::new(RecordingTransport::respond_with(200, "{\"data\": {}}"));
        let projects = service(Arc::clone(&transport));

        projects.delete("p-1").await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(
            request.url,
            "http://localhost:8080/auth/delete_project/p-1"
        );
    }

    #[tokio::test]
    async fn remote_failure_preserves_body() {
        let transport = Arc::new(RecordingTransport::respond_with(403, "forbidden"));
        let projects = service(transport);

        let err = projects.list().await.unwrap_err();
        match err {
            ApiError::Remote { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "forbidden");
            }
            other => unreachable!("expected remote error, got {other:?}"),
        }
    }
}
