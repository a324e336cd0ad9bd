//! Descriptor validation orchestration and shared helpers.

pub mod naming;
pub mod relation;

use crate::{error::ErrorTree, node::DescriptorSet};
use thiserror::Error as ThisError;

///
/// ValidateError
///

#[derive(Debug, ThisError)]
pub enum ValidateError {
    #[error("descriptor validation failed: {0}")]
    Validation(ErrorTree),
}

/// Run full descriptor validation in a staged, deterministic order.
///
/// Synthesis over an invalid descriptor set would register dangling
/// cross-references, so every failure here is fatal for the run.
pub fn validate_descriptors(set: &DescriptorSet) -> Result<(), ValidateError> {
    let mut errs = ErrorTree::new();

    // Phase 1: local invariants (names, bounds, duplicates).
    naming::validate_naming(set, &mut errs);

    // Phase 2: cross-descriptor invariants (targets must resolve).
    relation::validate_references(set, &mut errs);

    errs.result().map_err(ValidateError::Validation)
}

///
/// TESTS
///
