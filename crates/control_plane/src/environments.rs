//! Environment operations
//!
//! Environments group infrastructure agents by deployment stage. Thin GraphQL
//! glue: marshal the request, unwrap the envelope, decode the typed response.

use std::fmt;
use std::sync::Arc;

use domain::Credentials;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ApiError, require_non_empty};
use crate::graphql;
use crate::transport::Transport;

/// Deployment stage of an environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvironmentType {
    #[serde(rename = "PROD")]
    Prod,
    #[serde(rename = "NON_PROD")]
    NonProd,
}

/// Request payload for creating an environment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentRequest {
    #[serde(rename = "environmentID")]
    pub environment_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub environment_type: EnvironmentType,
}

/// A registered environment
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    #[serde(rename = "environmentID")]
    pub environment_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub environment_type: EnvironmentType,
    #[serde(rename = "infraIDs", default)]
    pub infra_ids: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

const ENVIRONMENT_FIELDS: &str = "\
environmentID
name
description
tags
type
infraIDs
createdAt
updatedAt";

/// Environment service bound to one credentials value
pub struct Environments {
    transport: Arc<dyn Transport>,
    credentials: Credentials,
}

impl fmt::Debug for Environments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environments")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl Environments {
    /// Bind the service to a transport and credentials.
    pub fn with_transport(transport: Arc<dyn Transport>, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// Register a new environment.
    #[instrument(skip(self, request), fields(environment = %request.name))]
    pub async fn create(
        &self,
        project_id: &str,
        request: &EnvironmentRequest,
    ) -> Result<Environment, ApiError> {
        require_non_empty(project_id, "project id")?;

        #[derive(Serialize)]
        struct Vars<'a> {
            #[serde(rename = "projectID")]
            project_id: &'a str,
            request: &'a EnvironmentRequest,
        }

        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "createEnvironment")]
            create_environment: Environment,
        }

        let query = format!(
            "mutation CreateEnvironment($projectID: ID!, $request: CreateEnvironmentRequest!) {{\n\
             createEnvironment(projectID: $projectID, request: $request) {{\n{ENVIRONMENT_FIELDS}\n}}\n}}"
        );

        let data: Data = graphql::execute(
            self.transport.as_ref(),
            &self.credentials,
            &query,
            Vars {
                project_id,
                request,
            },
        )
        .await?;
        Ok(data.create_environment)
    }

    /// List environments in a project.
    #[instrument(skip(self))]
    pub async fn list(&self, project_id: &str) -> Result<Vec<Environment>, ApiError> {
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
        struct EnvironmentList {
            #[serde(default)]
            environments: Option<Vec<Environment>>,
        }

        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "listEnvironments", default)]
            list_environments: Option<EnvironmentList>,
        }

        let query = format!(
            "query ListEnvironments($projectID: ID!) {{\n\
             listEnvironments(projectID: $projectID) {{\n\
             totalNoOfEnvironments\n\
             environments {{\n{ENVIRONMENT_FIELDS}\n}}\n}}\n}}"
        );

        let data: Data = graphql::execute(
            self.transport.as_ref(),
            &self.credentials,
            &query,
            Vars { project_id },
        )
        .await?;
        Ok(data
            .list_environments
            .and_then(|list| list.environments)
            .unwrap_or_default())
    }

    /// Delete an environment by identifier.
    #[instrument(skip(self))]
    pub async fn delete(&self, project_id: &str, environment_id: &str) -> Result<(), ApiError> {
        require_non_empty(environment_id, "environment id")?;

        #[derive(Serialize)]
        struct Vars<'a> {
            #[serde(rename = "projectID")]
            project_id: &'a str,
            #[serde(rename = "environmentID")]
            environment_id: &'a str,
        }

        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "deleteEnvironment")]
            #[allow(dead_code)]
            delete_environment: String,
        }

        let query = "mutation DeleteEnvironment($projectID: ID!, $environmentID: ID!) {\n\
                     deleteEnvironment(projectID: $projectID, environmentID: $environmentID)\n}";

        let _: Data = graphql::execute(
            self.transport.as_ref(),
            &self.credentials,
            query,
            Vars {
                project_id,
                environment_id,
            },
        )
        .await?;
        Ok(())
    }
}
