//! Domain-level errors

use thiserror::Error;

use crate::probe::ProbeType;

/// Structural violations in a probe request, detected before any network call.
///
/// A probe request carries at most one type-specific property block, and that
/// block must correspond to the declared probe type. The rules are checked in
/// order: block count first, then type/block agreement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeValidationError {
    /// None of the type-specific property blocks were set
    #[error("no probe properties provided")]
    NoPropertiesProvided,

    /// Two or more property blocks were set simultaneously
    #[error("multiple probe property types provided")]
    MultiplePropertiesProvided,

    /// Exactly one block was set, but it does not match the declared type
    #[error("{probe_type} type requires {required_block}")]
    TypePropertyMismatch {
        /// The declared probe type
        probe_type: ProbeType,
        /// The wire name of the block that type requires
        required_block: &'static str,
    },
}

impl ProbeValidationError {
    /// Build the mismatch error for a declared probe type
    pub fn mismatch_for(probe_type: ProbeType) -> Self {
        Self::TypePropertyMismatch {
            probe_type,
            required_block: probe_type.required_block(),
        }
    }
}
