//! Experiment operations
//!
//! Chaos experiments are saved as manifests and launched by the control plane.
//! Thin GraphQL glue around save/list/run/delete.

use std::fmt;
use std::sync::Arc;

use domain::Credentials;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ApiError, require_non_empty};
use crate::graphql;
use crate::transport::Transport;

/// Request payload for saving an experiment manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveExperimentRequest {
    #[serde(rename = "id")]
    pub experiment_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(rename = "infraID", default, skip_serializing_if = "String::is_empty")]
    pub infra_id: String,
    /// Rendered experiment manifest the agent will execute
    pub manifest: String,
}

/// Experiment summary as the list endpoint reports it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    #[serde(rename = "experimentID")]
    pub experiment_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Confirmation of a launched experiment run
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunExperimentResponse {
    #[serde(rename = "notifyID")]
    pub notify_id: String,
}

/// Experiment service bound to one credentials value
pub struct Experiments {
    transport: Arc<dyn Transport>,
    credentials: Credentials,
}

impl fmt::Debug for Experiments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Experiments")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl Experiments {
    /// Bind the service to a transport and credentials.
    pub fn with_transport(transport: Arc<dyn Transport>, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// Save (create or update) an experiment manifest.
    #[instrument(skip(self, request), fields(experiment = %request.name))]
    pub async fn save(
        &self,
        project_id: &str,
        request: &SaveExperimentRequest,
    ) -> Result<String, ApiError> {
        require_non_empty(project_id, "project id")?;

        #[derive(Serialize)]
        struct Vars<'a> {
            #[serde(rename = "projectID")]
            project_id: &'a str,
            request: &'a SaveExperimentRequest,
        }

        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "saveChaosExperiment")]
            save_chaos_experiment: String,
        }

        let query =
            "mutation SaveChaosExperiment($request: SaveChaosExperimentRequest!, $projectID: ID!) {\n\
             saveChaosExperiment(request: $request, projectID: $projectID)\n}";

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
        Ok(data.save_chaos_experiment)
    }

    /// List experiments in a project.
    #[instrument(skip(self))]
    pub async fn list(&self, project_id: &str) -> Result<Vec<Experiment>, ApiError> {
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
        struct ExperimentList {
            #[serde(default)]
            experiments: Option<Vec<Experiment>>,
        }

        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "listExperiment", default)]
            list_experiment: Option<ExperimentList>,
        }

        let query = "query ListExperiment($projectID: ID!) {\n\
                     listExperiment(projectID: $projectID) {\n\
                     totalNoOfExperiments\n\
                     experiments {\n\
                     experimentID name description tags createdAt updatedAt\n}\n}\n}";

        let data: Data = graphql::execute(
            self.transport.as_ref(),
            &self.credentials,
            query,
            Vars { project_id },
        )
        .await?;
        Ok(data
            .list_experiment
            .and_then(|list| list.experiments)
            .unwrap_or_default())
    }

    /// Launch a saved experiment.
    #[instrument(skip(self))]
    pub async fn run(
        &self,
        project_id: &str,
        experiment_id: &str,
    ) -> Result<RunExperimentResponse, ApiError> {
        require_non_empty(experiment_id, "experiment id")?;

        #[derive(Serialize)]
        struct Vars<'a> {
            #[serde(rename = "projectID")]
            project_id: &'a str,
            #[serde(rename = "experimentID")]
            experiment_id: &'a str,
        }

        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "runChaosExperiment")]
            run_chaos_experiment: RunExperimentResponse,
        }

        let query = "mutation RunChaosExperiment($experimentID: String!, $projectID: ID!) {\n\
                     runChaosExperiment(experimentID: $experimentID, projectID: $projectID) {\n\
                     notifyID\n}\n}";

        let data: Data = graphql::execute(
            self.transport.as_ref(),
            &self.credentials,
            query,
            Vars {
                project_id,
                experiment_id,
            },
        )
        .await?;
        Ok(data.run_chaos_experiment)
    }

    /// Delete an experiment by identifier.
    #[instrument(skip(self))]
    pub async fn delete(&self, project_id: &str, experiment_id: &str) -> Result<bool, ApiError> {
        require_non_empty(experiment_id, "experiment id")?;

        #[derive(Serialize)]
        struct Vars<'a> {
            #[serde(rename = "projectID")]
            project_id: &'a str,
            #[serde(rename = "experimentID")]
            experiment_id: &'a str,
        }

        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "deleteChaosExperiment")]
            delete_chaos_experiment: bool,
        }

        let query = "mutation DeleteChaosExperiment($experimentID: String!, $projectID: ID!) {\n\
                     deleteChaosExperiment(experimentID: $experimentID, projectID: $projectID)\n}";

        let data: Data = graphql::execute(
            self.transport.as_ref(),
            &self.credentials,
            query,
            Vars {
                project_id,
                experiment_id,
            },
        )
        .await?;
        Ok(data.delete_chaos_experiment)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::transport::test_support::RecordingTransport;

    fn credentials() -> Credentials {
        Credentials::new("http://localhost:8080", "token-123").with_project("project-1")
    }

    fn service(transport: Arc<RecordingTransport>) -> Experiments {
        Experiments::with_transport(transport, credentials())
    }

    fn save_request() -> SaveExperimentRequest {
        SaveExperimentRequest {
            experiment_id: "exp-1".to_string(),
            name: "pod-delete-availability".to_string(),
            description: Some("availability under pod loss".to_string()),
            tags: vec!["availability".to_string()],
            infra_id: String::new(),
            manifest: "kind: Workflow".to_string(),
        }
    }

    #[tokio::test]
    async fn save_returns_server_acknowledgement() {
        let transport = Arc::new(RecordingTransport::respond_with(
            200,
            &json!({"data": {"saveChaosExperiment": "experiment saved"}}).to_string(),
        ));
        let experiments = service(Arc::clone(&transport));

        let ack = experiments
            .save("project-1", &save_request())
            .await
            .unwrap();
        assert_eq!(ack, "experiment saved");

        let request = transport.last_request().unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&request.body.unwrap()).unwrap();
        assert_eq!(payload["variables"]["request"]["id"], "exp-1");
        assert_eq!(payload["variables"]["request"]["manifest"], "kind: Workflow");
        // empty infraID is omitted
        assert!(payload["variables"]["request"].get("infraID").is_none());
    }

    #[tokio::test]
    async fn run_returns_notify_id() {
        let transport = Arc::new(RecordingTransport::respond_with(
            200,
            &json!({"data": {"runChaosExperiment": {"notifyID": "notify-42"}}}).to_string(),
        ));
        let experiments = service(transport);

        let run = experiments.run("project-1", "exp-1").await.unwrap();
        assert_eq!(run.notify_id, "notify-42");
    }

    #[tokio::test]
    async fn run_rejects_empty_experiment_id_without_network() {
        let transport = Arc::new(RecordingTransport::respond_with(200, "{}"));
        let experiments = service(Arc::clone(&transport));

        let err = experiments.run("project-1", "").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn list_defaults_to_empty() {
        let transport = Arc::new(RecordingTransport::respond_with(
            200,
            &json!({"data": {"listExperiment": {"totalNoOfExperiments": 0}}}).to_string(),
        ));
        let experiments = service(transport);

        let listed = experiments.list("project-1").await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn list_treats_null_result_as_empty() {
        let transport = Arc::new(RecordingTransport::respond_with(
            200,
            &json!({"data": {"listExperiment": {"totalNoOfExperiments": 0, "experiments": null}}})
                .to_string(),
        ));
        let experiments = service(transport);

        let listed = experiments.list("project-1").await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn delete_returns_confirmation() {
        let transport = Arc::new(RecordingTransport::respond_with(
            200,
            &json!({"data": {"deleteChaosExperiment": true}}).to_string(),
        ));
        let experiments = service(transport);

        assert!(experiments.delete("project-1", "exp-1").await.unwrap());
    }
}
