//! ## Crate layout
//! - `core`: the synthesis engine — annotation parsing, type mapping,
//!   optionality composition, filtering, cross-reference resolution, and
//!   variant/operation composition.
//! - `schema`: descriptor nodes for the normalized data model and the
//!   validation pass that runs before synthesis.
//!
//! The `prelude` module mirrors the surface an embedding host needs to run
//! one generation pass and hand the resulting forest to an emitter.

pub use zodgen_core as core;
pub use zodgen_schema as schema;

pub use core::{
    Error,
    generate::{Generated, generate, generate_with_config},
};

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        Error,
        config::{GeneratorConfig, RawConfig},
        expr::{ExpressionNode, Optionality, PrimitiveKind, Shape, ShapeKey, ShapeKind},
        generate::{Generated, generate, generate_with_config},
        naming::artifact_name,
        registry::ShapeForest,
        report::{Report, Warning, WarningKind},
    };
    pub use crate::schema::{
        node::{DescriptorSet, EnumDescriptor, FieldDescriptor, FieldList, ModelDescriptor},
        types::{DefaultValue, FieldType, LiteralValue, ScalarType},
        validate::validate_descriptors,
    };
}

///
/// TESTS
///
