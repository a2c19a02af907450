//! Client facade
//!
//! [`ControlPlaneClient::connect`] authenticates once and resolves a default
//! project scope; the resulting client hands out per-resource services bound
//! to an immutable [`Credentials`] value. Nothing here holds shared mutable
//! state, so a client (and its services) can be used from concurrent tasks.

use std::fmt;
use std::sync::Arc;

use domain::Credentials;
use tracing::{debug, instrument, warn};

use crate::auth;
use crate::config::ClientOptions;
use crate::environments::Environments;
use crate::error::ApiError;
use crate::experiments::Experiments;
use crate::infrastructure::Infrastructure;
use crate::probes::Probes;
use crate::projects::Projects;
use crate::transport::{HttpTransport, Transport};

/// Authenticated handle to the control plane
pub struct ControlPlaneClient {
    transport: Arc<dyn Transport>,
    credentials: Credentials,
}

impl fmt::Debug for ControlPlaneClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlPlaneClient")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl ControlPlaneClient {
    /// Authenticate and build a client over the default HTTP transport.
    #[instrument(skip(options), fields(endpoint = %options.endpoint))]
    pub async fn connect(options: ClientOptions) -> Result<Self, ApiError> {
        options.validate().map_err(ApiError::InvalidArgument)?;
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(options.timeout_secs)?);
        Self::connect_with_transport(transport, &options).await
    }

    /// Authenticate over a caller-supplied transport.
    ///
    /// The login response may already carry a project scope; otherwise the
    /// first project visible to the session becomes the default. A session
    /// without any project stays unscoped, and callers pass project ids
    /// explicitly anyway.
    pub async fn connect_with_transport(
        transport: Arc<dyn Transport>,
        options: &ClientOptions,
    ) -> Result<Self, ApiError> {
        let endpoint = options.normalized_endpoint();
        let auth = auth::login(
            transport.as_ref(),
            &endpoint,
            &options.username,
            &options.password,
        )
        .await?;

        let credentials = Credentials::new(endpoint, auth.access_token);

        let project_id = match auth.project_id {
            Some(id) if !id.is_empty() => Some(id),
            _ => {
                let projects =
                    Projects::with_transport(Arc::clone(&transport), credentials.clone())
                        .list()
                        .await?;
                projects.first().map(|p| p.project_id.clone())
            }
        };

        let credentials = match project_id {
            Some(id) => {
                debug!(project_id = %id, "Resolved default project");
                credentials.with_project(id)
            }
            None => {
                warn!("Session has no projects; client is unscoped");
                credentials
            }
        };

        Ok(Self {
            transport,
            credentials,
        })
    }

    /// The session's credentials
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Default project scope resolved at connect time
    pub fn project_id(&self) -> &str {
        self.credentials.project_id()
    }

    /// A client for the same session scoped to another project.
    ///
    /// Builds fresh credentials; the original client keeps its scope.
    #[must_use]
    pub fn with_project(&self, project_id: impl Into<String>) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            credentials: self.credentials.with_project(project_id),
        }
    }

    /// Probe operations
    pub fn probes(&self) -> Probes {
        Probes::with_transport(Arc::clone(&self.transport), self.credentials.clone())
    }

    /// Project operations
    pub fn projects(&self) -> Projects {
        Projects::with_transport(Arc::clone(&self.transport), self.credentials.clone())
    }

    /// Environment operations
    pub fn environments(&self) -> Environments {
        Environments::with_transport(Arc::clone(&self.transport), self.credentials.clone())
    }

    /// Experiment operations
    pub fn experiments(&self) -> Experiments {
        Experiments::with_transport(Arc::clone(&self.transport), self.credentials.clone())
    }

    /// Infrastructure agent operations
    pub fn infrastructure(&self) -> Infrastructure {
        Infrastructure::with_transport(Arc::clone(&self.transport), self.credentials.clone())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::transport::test_support::RecordingTransport;

    #[tokio::test]
    async fn connect_adopts_project_from_login() {
        let transport = Arc::new(RecordingTransport::respond_with(
            200,
            &json!({"accessToken": "jwt", "projectID": "p-login"}).to_string(),
        ));

        let client = ControlPlaneClient::connect_with_transport(
            transport.clone(),
            &ClientOptions::for_testing("http://localhost:8080"),
        )
        .await
        .unwrap();

        assert_eq!(client.project_id(), "p-login");
        // login only; no project listing needed
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn with_project_does_not_touch_the_original() {
        let transport = Arc::new(RecordingTransport::respond_with(
            200,
            &json!({"accessToken": "jwt", "projectID": "p-1"}).to_string(),
        ));

        let client = ControlPlaneClient::connect_with_transport(
            transport,
            &ClientOptions::for_testing("http://localhost:8080"),
        )
        .await
        .unwrap();

        let scoped = client.with_project("p-2");
        assert_eq!(scoped.project_id(), "p-2");
        assert_eq!(client.project_id(), "p-1");
    }

    #[tokio::test]
    async fn connect_normalizes_trailing_slash() {
        let transport = Arc::new(RecordingTransport::respond_with(
            200,
            &json!({"accessToken": "jwt", "projectID": "p-1"}).to_string(),
        ));

        let client = ControlPlaneClient::connect_with_transport(
            transport.clone(),
            &ClientOptions::for_testing("http://localhost:8080/"),
        )
        .await
        .unwrap();

        assert_eq!(client.credentials().endpoint(), "http://localhost:8080");
        let login = transport.last_request().unwrap();
        assert_eq!(login.url, "http://localhost:8080/auth/login");
    }

    #[tokio::test]
    async fn failed_login_propagates_remote_error() {
        let transport = Arc::new(RecordingTransport::respond_with(401, "unauthorized"));

        let err = ControlPlaneClient::connect_with_transport(
            transport,
            &ClientOptions::for_testing("http://localhost:8080"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Remote { status: 401, .. }));
    }
}
