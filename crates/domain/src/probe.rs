//! Probe data model
//!
//! Wire-shaped types for the control plane's probe API. A probe is a remote
//! check (HTTP call, shell command, Prometheus query, Kubernetes resource
//! lookup) attached to a chaos experiment to verify system health around fault
//! injection. The control plane addresses probes by name; there is no separate
//! server-assigned identifier.
//!
//! Field names follow the control plane's JSON schema (`camelCase`, with the
//! historical `kubernetesHTTPProperties` / `kubernetesCMDProperties` spellings
//! kept verbatim).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of check a probe performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProbeType {
    /// HTTP request with a response-code criterion
    #[serde(rename = "httpProbe")]
    Http,
    /// Shell command with an output comparator
    #[serde(rename = "cmdProbe")]
    Cmd,
    /// Prometheus query with a value comparator
    #[serde(rename = "promProbe")]
    Prom,
    /// Kubernetes resource presence/absence check
    #[serde(rename = "k8sProbe")]
    K8s,
}

impl ProbeType {
    /// Wire name of this probe type
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Http => "httpProbe",
            Self::Cmd => "cmdProbe",
            Self::Prom => "promProbe",
            Self::K8s => "k8sProbe",
        }
    }

    /// Wire name of the property block this probe type requires
    pub const fn required_block(self) -> &'static str {
        match self {
            Self::Http => "kubernetesHTTPProperties",
            Self::Cmd => "kubernetesCMDProperties",
            Self::Prom => "promProperties",
            Self::K8s => "k8sProperties",
        }
    }
}

impl fmt::Display for ProbeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Execution environment a probe runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfrastructureType {
    /// A registered Kubernetes cluster/namespace
    Kubernetes,
}

/// Probe manifest resolution mode for YAML export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Start of test
    #[serde(rename = "SOT")]
    Sot,
    /// End of test
    #[serde(rename = "EOT")]
    Eot,
    /// Both edges
    Edge,
    /// Continuously during the experiment
    Continuous,
    /// While chaos is injected
    OnChaos,
}

/// Comparison applied to a probe's observed value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparator {
    /// Value interpretation: `int`, `float`, `string`, `Contains`, ...
    #[serde(rename = "type")]
    pub kind: String,
    /// Comparison operator, e.g. `==`, `!=`, `>=`
    pub criteria: String,
    /// Expected value
    pub value: String,
}

/// HTTP GET check: response code compared against a criterion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMethod {
    pub criteria: String,
    pub response_code: String,
}

/// HTTP POST check: optional payload, response code compared against a criterion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMethod {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_path: Option<String>,
    pub criteria: String,
    pub response_code: String,
}

/// HTTP method selector; the control plane accepts exactly one of `get`/`post`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Method {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<GetMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<PostMethod>,
}

/// Properties for an HTTP probe on Kubernetes infrastructure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesHttpProperties {
    pub probe_timeout: String,
    pub interval: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempt: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_polling_interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_delay: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_on_failure: Option<bool>,
    pub url: String,
    pub method: Method,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure_skip_verify: Option<bool>,
}

/// Properties for a command probe on Kubernetes infrastructure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesCmdProperties {
    pub probe_timeout: String,
    pub interval: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempt: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_polling_interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_delay: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_on_failure: Option<bool>,
    pub command: String,
    pub comparator: Comparator,
    /// Inline source pod spec for commands that need a dedicated image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Properties for a Prometheus probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromProperties {
    pub probe_timeout: String,
    pub interval: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempt: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_polling_interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_delay: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_on_failure: Option<bool>,
    pub endpoint: String,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_path: Option<String>,
    pub comparator: Comparator,
}

/// Properties for a Kubernetes resource probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct K8sProperties {
    pub probe_timeout: String,
    pub interval: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempt: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_polling_interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_delay: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_on_failure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub version: String,
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_names: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_selector: Option<String>,
    /// `create`, `delete`, `present` or `absent`
    pub operation: String,
}

/// A probe definition as callers assemble it and as it travels on the wire.
///
/// The four property block fields are mutually exclusive: a well-formed request
/// sets exactly one, and its kind must agree with `probe_type`. That invariant
/// is enforced by [`validate`](Self::validate) /
/// [`into_validated`](Self::into_validated) before any network call, never by
/// the type system here, because this struct mirrors the wire schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeRequest {
    /// Unique within a project; doubles as the probe's identifier
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub probe_type: ProbeType,
    pub infrastructure_type: InfrastructureType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(
        rename = "kubernetesHTTPProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub kubernetes_http_properties: Option<KubernetesHttpProperties>,
    #[serde(
        rename = "kubernetesCMDProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub kubernetes_cmd_properties: Option<KubernetesCmdProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prom_properties: Option<PromProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k8s_properties: Option<K8sProperties>,
}

/// Server-confirmed probe representation.
///
/// Same shape as [`ProbeRequest`] plus server-assigned metadata. The property
/// blocks stay optional here because this is the server's truth, not a request
/// under validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Probe {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub probe_type: ProbeType,
    pub infrastructure_type: InfrastructureType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(
        rename = "kubernetesHTTPProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub kubernetes_http_properties: Option<KubernetesHttpProperties>,
    #[serde(
        rename = "kubernetesCMDProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub kubernetes_cmd_properties: Option<KubernetesCmdProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prom_properties: Option<PromProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k8s_properties: Option<K8sProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_by: Option<i32>,
}

/// Request payload for fetching a probe's rendered YAML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProbeYamlRequest {
    pub probe_name: String,
    pub mode: Mode,
}
