pub mod error;
pub mod node;
pub mod types;
pub mod validate;

/// Maximum length for model identifiers.
pub const MAX_MODEL_NAME_LEN: usize = 64;

/// Maximum length for field identifiers.
pub const MAX_FIELD_NAME_LEN: usize = 64;

/// Maximum length for enum identifiers and enum values.
pub const MAX_ENUM_NAME_LEN: usize = 64;

use crate::validate::ValidateError;
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        err,
        error::ErrorTree,
        node::*,
        types::{DefaultValue, FieldType, LiteralValue, ScalarType},
    };
    pub use serde::{Deserialize, Serialize};
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    ValidateError(#[from] ValidateError),
}
