//! Probe request validation
//!
//! The wire schema models the type-specific payload as four sibling optional
//! fields, so "no block", "several blocks" and "wrong block" are all
//! representable in a [`ProbeRequest`]. Validation funnels a request into
//! [`ValidatedProbeRequest`], whose [`ProbeProperties`] sum type makes those
//! malformed states unrepresentable for everything downstream.
//!
//! Validation is pure: no I/O, no side effects. Probe name emptiness is
//! deliberately not checked here; only the property-shape rules are local
//! concerns, the rest is the server's to judge.

use crate::errors::ProbeValidationError;
use crate::probe::{
    InfrastructureType, K8sProperties, KubernetesCmdProperties, KubernetesHttpProperties,
    ProbeRequest, ProbeType, PromProperties,
};

/// The type-specific payload of a validated probe, exactly one of a kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeProperties {
    Http(KubernetesHttpProperties),
    Cmd(KubernetesCmdProperties),
    Prom(PromProperties),
    K8s(K8sProperties),
}

impl ProbeProperties {
    /// The probe type this payload belongs to
    pub const fn probe_type(&self) -> ProbeType {
        match self {
            Self::Http(_) => ProbeType::Http,
            Self::Cmd(_) => ProbeType::Cmd,
            Self::Prom(_) => ProbeType::Prom,
            Self::K8s(_) => ProbeType::K8s,
        }
    }

    /// Wire field name this payload serializes under
    pub const fn wire_field(&self) -> &'static str {
        self.probe_type().required_block()
    }
}

/// A probe request that passed validation.
///
/// Carries the same scalar fields as [`ProbeRequest`] but holds its payload as
/// a [`ProbeProperties`] value, so the declared type and the payload cannot
/// disagree. Convert back with [`From`] for wire serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProbeRequest {
    pub name: String,
    pub description: Option<String>,
    pub infrastructure_type: InfrastructureType,
    pub tags: Vec<String>,
    pub properties: ProbeProperties,
}

impl ValidatedProbeRequest {
    /// The probe type, derived from the payload
    pub const fn probe_type(&self) -> ProbeType {
        self.properties.probe_type()
    }
}

impl From<ValidatedProbeRequest> for ProbeRequest {
    fn from(validated: ValidatedProbeRequest) -> Self {
        let probe_type = validated.probe_type();
        let mut request = Self {
            name: validated.name,
            description: validated.description,
            probe_type,
            infrastructure_type: validated.infrastructure_type,
            tags: validated.tags,
            kubernetes_http_properties: None,
            kubernetes_cmd_properties: None,
            prom_properties: None,
            k8s_properties: None,
        };
        match validated.properties {
            ProbeProperties::Http(p) => request.kubernetes_http_properties = Some(p),
            ProbeProperties::Cmd(p) => request.kubernetes_cmd_properties = Some(p),
            ProbeProperties::Prom(p) => request.prom_properties = Some(p),
            ProbeProperties::K8s(p) => request.k8s_properties = Some(p),
        }
        request
    }
}

impl ProbeRequest {
    /// Kinds of property blocks that are set on this request
    fn provided_kinds(&self) -> Vec<ProbeType> {
        let mut kinds = Vec::with_capacity(1);
        if self.kubernetes_http_properties.is_some() {
            kinds.push(ProbeType::Http);
        }
        if self.kubernetes_cmd_properties.is_some() {
            kinds.push(ProbeType::Cmd);
        }
        if self.prom_properties.is_some() {
            kinds.push(ProbeType::Prom);
        }
        if self.k8s_properties.is_some() {
            kinds.push(ProbeType::K8s);
        }
        kinds
    }

    /// Check the property-shape rules without consuming the request.
    ///
    /// Block count is judged first (zero and two-or-more are disjoint by
    /// construction); the type/block cross-check only applies to a single
    /// block. Success leaves the request untouched.
    pub fn validate(&self) -> Result<(), ProbeValidationError> {
        match self.provided_kinds().as_slice() {
            [] => Err(ProbeValidationError::NoPropertiesProvided),
            [kind] if *kind == self.probe_type => Ok(()),
            [_] => Err(ProbeValidationError::mismatch_for(self.probe_type)),
            _ => Err(ProbeValidationError::MultiplePropertiesProvided),
        }
    }

    /// Validate and convert into the sum-typed representation
    pub fn into_validated(self) -> Result<ValidatedProbeRequest, ProbeValidationError> {
        self.validate()?;

        // validate() guarantees exactly one block is set and it matches
        let properties = if let Some(p) = self.kubernetes_http_properties {
            ProbeProperties::Http(p)
        } else if let Some(p) = self.kubernetes_cmd_properties {
            ProbeProperties::Cmd(p)
        } else if let Some(p) = self.prom_properties {
            ProbeProperties::Prom(p)
        } else if let Some(p) = self.k8s_properties {
            ProbeProperties::K8s(p)
        } else {
            return Err(ProbeValidationError::NoPropertiesProvided);
        };

        Ok(ValidatedProbeRequest {
            name: self.name,
            description: self.description,
            infrastructure_type: self.infrastructure_type,
            tags: self.tags,
            properties,
        })
    }
}
