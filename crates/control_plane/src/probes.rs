//! Probe operations
//!
//! Create runs the structural validator before anything touches the wire; a
//! request the client can reject itself never costs a round trip. The control
//! plane addresses probes by name, so the `probe_id` parameters here carry the
//! probe name.

use std::fmt;
use std::sync::Arc;

use domain::{Credentials, GetProbeYamlRequest, Probe, ProbeRequest, ProbeType};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{ApiError, require_non_empty};
use crate::graphql;
use crate::transport::Transport;

/// Selection set shared by every probe-returning operation
const PROBE_FIELDS: &str = "\
name
description
type
infrastructureType
tags
kubernetesHTTPProperties {
  probeTimeout interval attempt retry probePollingInterval evaluationTimeout initialDelay stopOnFailure
  url
  method {
    get { criteria responseCode }
    post { contentType body bodyPath criteria responseCode }
  }
  insecureSkipVerify
}
kubernetesCMDProperties {
  probeTimeout interval attempt retry probePollingInterval evaluationTimeout initialDelay stopOnFailure
  command
  comparator { type criteria value }
  source
}
promProperties {
  probeTimeout interval attempt retry probePollingInterval evaluationTimeout initialDelay stopOnFailure
  endpoint query queryPath
  comparator { type criteria value }
}
k8sProperties {
  probeTimeout interval attempt retry probePollingInterval evaluationTimeout initialDelay stopOnFailure
  group version resource namespace resourceNames fieldSelector labelSelector operation
}
updatedAt
createdAt
referencedBy";

/// Probe service bound to one credentials value
pub struct Probes {
    transport: Arc<dyn Transport>,
    credentials: Credentials,
}

impl fmt::Debug for Probes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Probes")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl Probes {
    /// Bind the service to a transport and credentials.
    ///
    /// Useful for custom transports and test doubles; the usual path is
    /// [`ControlPlaneClient::probes`](crate::ControlPlaneClient::probes).
    pub fn with_transport(transport: Arc<dyn Transport>, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// Create a probe.
    ///
    /// The request is validated first; a structural violation returns
    /// immediately without any network call.
    #[instrument(skip(self, request), fields(probe = %request.name))]
    pub async fn create(&self, project_id: &str, request: ProbeRequest) -> Result<Probe, ApiError> {
        let validated = request.into_validated()?;
        let wire: ProbeRequest = validated.into();

        #[derive(Serialize)]
        struct Vars<'a> {
            #[serde(rename = "projectID")]
            project_id: &'a str,
            #[serde(rename = "probeRequest")]
            request: &'a ProbeRequest,
        }

        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "addProbe")]
            add_probe: Probe,
        }

        let query = format!(
            "mutation AddProbe($probeRequest: ProbeRequest!, $projectID: ID!) {{\n\
             addProbe(probeRequest: $probeRequest, projectID: $projectID) {{\n{PROBE_FIELDS}\n}}\n}}"
        );

        debug!(probe_type = %wire.probe_type, "Creating probe");

        let data: Data = graphql::execute(
            self.transport.as_ref(),
            &self.credentials,
            &query,
            Vars {
                project_id,
                request: &wire,
            },
        )
        .await?;
        Ok(data.add_probe)
    }

    /// Fetch one probe by name.
    #[instrument(skip(self))]
    pub async fn get(&self, project_id: &str, probe_id: &str) -> Result<Probe, ApiError> {
        require_non_empty(probe_id, "probe id")?;

        #[derive(Serialize)]
        struct Vars<'a> {
            #[serde(rename = "projectID")]
            project_id: &'a str,
            #[serde(rename = "probeName")]
            probe_name: &'a str,
        }

        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "getProbe")]
            get_probe: Probe,
        }

        let query = format!(
            "query GetProbe($projectID: ID!, $probeName: ID!) {{\n\
             getProbe(projectID: $projectID, probeName: $probeName) {{\n{PROBE_FIELDS}\n}}\n}}"
        );

        let data: Data = graphql::execute(
            self.transport.as_ref(),
            &self.credentials,
            &query,
            Vars {
                project_id,
                probe_name: probe_id,
            },
        )
        .await?;
        Ok(data.get_probe)
    }

    /// List probes in a project, optionally filtered by type.
    ///
    /// Always returns a list; an empty project yields an empty vector, never
    /// an absent one.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        project_id: &str,
        probe_types: Option<&[ProbeType]>,
    ) -> Result<Vec<Probe>, ApiError> {
        require_non_empty(project_id, "project id")?;

        #[derive(Serialize)]
        struct Vars<'a> {
            #[serde(rename = "projectID")]
            project_id: &'a str,
            #[serde(rename = "probeTypes", skip_serializing_if = "Option::is_none")]
            probe_types: Option<&'a [ProbeType]>,
        }

        // The server answers an empty project with either an absent field or
        // an explicit null; both decode to an empty list
        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "listProbes", default)]
            list_probes: Option<Vec<Probe>>,
        }

        let query = format!(
            "query ListProbes($projectID: ID!, $probeTypes: [ProbeType]) {{\n\
             listProbes(projectID: $projectID, probeTypes: $probeTypes) {{\n{PROBE_FIELDS}\n}}\n}}"
        );

        let data: Data = graphql::execute(
            self.transport.as_ref(),
            &self.credentials,
            &query,
            Vars {
                project_id,
                probe_types,
            },
        )
        .await?;
        Ok(data.list_probes.unwrap_or_default())
    }

    /// Delete a probe by name.
    ///
    /// Delete-of-nonexistent semantics are the server's; no special casing
    /// here.
    #[instrument(skip(self))]
    pub async fn delete(&self, project_id: &str, probe_id: &str) -> Result<bool, ApiError> {
        require_non_empty(probe_id, "probe id")?;

        #[derive(Serialize)]
        struct Vars<'a> {
            #[serde(rename = "projectID")]
            project_id: &'a str,
            #[serde(rename = "probeName")]
            probe_name: &'a str,
        }

        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "deleteProbe")]
            delete_probe: bool,
        }

        let query = "mutation DeleteProbe($probeName: ID!, $projectID: ID!) {\n\
                     deleteProbe(probeName: $probeName, projectID: $projectID)\n}";

        let data: Data = graphql::execute(
            self.transport.as_ref(),
            &self.credentials,
            query,
            Vars {
                project_id,
                probe_name: probe_id,
            },
        )
        .await?;
        Ok(data.delete_probe)
    }

    /// Fetch a probe's rendered YAML manifest.
    #[instrument(skip(self, request), fields(probe = %request.probe_name))]
    pub async fn get_yaml(
        &self,
        project_id: &str,
        request: &GetProbeYamlRequest,
    ) -> Result<String, ApiError> {
        require_non_empty(&request.probe_name, "probe name")?;

        #[derive(Serialize)]
        struct Vars<'a> {
            #[serde(rename = "projectID")]
            project_id: &'a str,
            request: &'a GetProbeYamlRequest,
        }

        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "getProbeYAML")]
            get_probe_yaml: String,
        }

        let query = "query GetProbeYAML($projectID: ID!, $request: GetProbeYAMLRequest!) {\n\
                     getProbeYAML(projectID: $projectID, request: $request)\n}";

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
        Ok(data.get_probe_yaml)
    }
}
