//! Domain layer for the Faultline SDK
//!
//! Contains the probe data model, the probe request validator, the credentials
//! value object, and domain errors. This layer has no I/O and no async code;
//! everything here is pure data and pure functions over it.

pub mod credentials;
pub mod errors;
pub mod probe;
pub mod validation;

pub use credentials::Credentials;
pub use errors::ProbeValidationError;
pub use probe::{
    Comparator, GetMethod, GetProbeYamlRequest, InfrastructureType, K8sProperties,
    KubernetesCmdProperties, KubernetesHttpProperties, Method, Mode, PostMethod, Probe,
    ProbeRequest, ProbeType, PromProperties,
};
pub use validation::{ProbeProperties, ValidatedProbeRequest};
