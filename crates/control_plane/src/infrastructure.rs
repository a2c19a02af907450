//! Infrastructure agent operations
//!
//! Infrastructure agents are the registered execution targets (Kubernetes
//! clusters or namespaces) where experiments and probes actually run.
//! Registration hands back a token and a connection manifest for the agent.

use std::fmt;
use std::sync::Arc;

use domain::Credentials;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ApiError, require_non_empty};
use crate::graphql;
use crate::transport::Transport;

/// Agent installation scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfraScope {
    #[serde(rename = "cluster")]
    Cluster,
    #[serde(rename = "namespace")]
    Namespace,
}

/// Request payload for registering an infrastructure agent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInfraRequest {
    pub name: String,
    #[serde(rename = "environmentID")]
    pub environment_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub platform_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infra_namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account: Option<String>,
    pub infra_scope: InfraScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infra_ns_exists: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infra_sa_exists: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_ssl: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Registration confirmation with the agent's bootstrap material
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInfraResponse {
    pub token: String,
    #[serde(rename = "infraID")]
    pub infra_id: String,
    pub name: String,
    #[serde(default)]
    pub manifest: Option<String>,
}

/// A registered infrastructure agent
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Infra {
    #[serde(rename = "infraID")]
    pub infra_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub platform_name: Option<String>,
    #[serde(rename = "environmentID", default)]
    pub environment_id: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_infra_confirmed: Option<bool>,
}

const INFRA_FIELDS: &str = "\
infraID
name
description
platformName
environmentID
isActive
isInfraConfirmed";

/// Infrastructure service bound to one credentials value
pub struct Infrastructure {
    transport: Arc<dyn Transport>,
    credentials: Credentials,
}

impl fmt::Debug for Infrastructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Infrastructure")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl Infrastructure {
    /// Bind the service to a transport and credentials.
    pub fn with_transport(transport: Arc<dyn Transport>, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// Register a new infrastructure agent.
    #[instrument(skip(self, request), fields(infra = %request.name))]
    pub async fn register(
        &self,
        project_id: &str,
        request: &RegisterInfraRequest,
    ) -> Result<RegisterInfraResponse, ApiError> {
        require_non_empty(project_id, "project id")?;

        #[derive(Serialize)]
        struct Vars<'a> {
            #[serde(rename = "projectID")]
            project_id: &'a str,
            request: &'a RegisterInfraRequest,
        }

        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "registerInfra")]
            register_infra: RegisterInfraResponse,
        }

        let query = "mutation RegisterInfra($projectID: ID!, $request: RegisterInfraRequest!) {\n\
                     registerInfra(projectID: $projectID, request: $request) {\n\
                     token infraID name manifest\n}\n}";

        let data: Data = graphql::execute(
            self.transport.as_ref(),
            &self.credentials,
            query,
            Vars {
                project_id,
                request,
            },
        )
        .await?;
        Ok(data.register_infra)
    }

    /// List infrastructure agents in a project.
    #[instrument(skip(self))]
    pub async fn list(&self, project_id: &str) -> Result<Vec<Infra>, ApiError> {
        require_non_empty(project_id, "project id")?;

        #[derive(Serialize)]
        struct Vars<'a> {
            #[serde(rename = "projectID")]
            project_id: &'a str,
        }

        // Both the wrapper and the inner list may come back as explicit null;
        // either way the result is an empty list
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct InfraList {
            #[serde(default)]
            infras: Option<Vec<Infra>>,
        }

        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "listInfras", default)]
            list_infras: Option<InfraList>,
        }

        let query = format!(
            "query ListInfras($projectID: ID!) {{\n\
             listInfras(projectID: $projectID) {{\n\
             totalNoOfInfras\n\
             infras {{\n{INFRA_FIELDS}\n}}\n}}\n}}"
        );

        let data: Data = graphql::execute(
            self.transport.as_ref(),
            &self.credentials,
            &query,
            Vars { project_id },
        )
        .await?;
        Ok(data
            .list_infras
            .and_then(|list| list.infras)
            .unwrap_or_default())
    }

    /// Remove a registered agent by identifier.
    #[instrument(skip(self))]
    pub async fn delete(&self, project_id: &str, infra_id: &str) -> Result<(), ApiError> {
        require_non_empty(infra_id, "infra id")?;

        #[derive(Serialize)]
        struct Vars<'a> {
            #[serde(rename = "projectID")]
            project_id: &'a str,
            #[serde(rename = "infraID")]
            infra_id: &'a str,
        }

        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "deleteInfra")]
            #[allow(dead_code)]
            delete_infra: String,
        }

        let query = "mutation DeleteInfra($projectID: ID!, $infraID: String!) {\n\
                     deleteInfra(projectID: $projectID, infraID: $infraID)\n}";

        let _: Data = graphql::execute(
            self.transport.as_ref(),
            &self.credentials,
            query,
            Vars {
                project_id,
                infra_id,
            },
        )
        .await?;
        Ok(())
    }
}
