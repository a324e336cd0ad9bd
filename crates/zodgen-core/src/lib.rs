pub mod annotate;
pub mod compose;
pub mod config;
pub mod expr;
pub mod filter;
pub mod generate;
pub mod merge;
pub mod naming;
pub mod optionality;
pub mod registry;
pub mod report;
pub mod typemap;

#[cfg(test)]
pub(crate) mod test_fixtures;

#[cfg(test)]
mod tests;

use crate::compose::ComposeError;
use thiserror::Error as ThisError;
use zodgen_schema::validate::ValidateError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        config::{GeneratorConfig, RawConfig},
        expr::{ExpressionNode, Optionality, Shape, ShapeKey, ShapeKind},
        generate::{Generated, generate},
        report::{Report, Warning, WarningKind},
    };
    pub use zodgen_schema::{
        node::{DescriptorSet, EnumDescriptor, FieldDescriptor, FieldList, ModelDescriptor},
        types::{DefaultValue, FieldType, LiteralValue, ScalarType},
    };
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    ComposeError(#[from] ComposeError),

    #[error(transparent)]
    ValidateError(#[from] ValidateError),
}
