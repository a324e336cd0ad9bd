use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// ScalarType
///
/// Scalar vocabulary of the normalized data model. `Unsupported` carries a
/// native type name the host format exposes but the engine has no mapping
/// for; it is accepted here and rejected by the type mapper.
///

#[derive(Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum ScalarType {
    BigInt,
    Boolean,
    Bytes,
    DateTime,
    Decimal,
    Float,
    Int,
    Json,
    String,
    #[display("Unsupported({_0})")]
    Unsupported(std::string::String),
}

impl ScalarType {
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::BigInt | Self::Decimal | Self::Float | Self::Int)
    }

    #[must_use]
    pub const fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

///
/// FieldType
///
/// What a field's value is: a scalar, a reference to a declared enum, or a
/// relation to another model.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum FieldType {
    Enum(String),
    Relation(String),
    Scalar(ScalarType),
}

impl FieldType {
    #[must_use]
    pub const fn is_relation(&self) -> bool {
        matches!(self, Self::Relation(_))
    }

    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    #[must_use]
    pub fn relation_target(&self) -> Option<&str> {
        match self {
            Self::Relation(target) => Some(target),
            _ => None,
        }
    }

    #[must_use]
    pub fn enum_name(&self) -> Option<&str> {
        match self {
            Self::Enum(name) => Some(name),
            _ => None,
        }
    }
}

///
/// LiteralValue
///
/// Literal constants carried by defaults and literal expression nodes.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[remain::sorted]
pub enum LiteralValue {
    Bool(bool),
    Float(f64),
    Int(i64),
    String(String),
}

///
/// DefaultValue
///
/// A field default: either a literal the generated schema can attach, or a
/// generator the host runtime evaluates (autoincrement, now, uuid, ...) in
/// which case only the optionality lift applies.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[remain::sorted]
pub enum DefaultValue {
    Generated(String),
    Literal(LiteralValue),
}

impl DefaultValue {
    #[must_use]
    pub const fn literal(&self) -> Option<&LiteralValue> {
        match self {
            Self::Literal(value) => Some(value),
            Self::Generated(_) => None,
        }
    }

    #[must_use]
    pub const fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_scalar_displays_inner_name() {
        let ty = ScalarType::Unsupported("Geometry".to_string());
        assert_eq!(ty.to_string(), "Unsupported(Geometry)");
        assert!(!ty.is_supported());
    }

    #[test]
    fn numeric_scalars_are_closed_set() {
        assert!(ScalarType::Int.is_numeric());
        assert!(ScalarType::Decimal.is_numeric());
        assert!(!ScalarType::DateTime.is_numeric());
        assert!(!ScalarType::String.is_numeric());
    }

    #[test]
    fn generated_default_has_no_literal() {
        let default = DefaultValue::Generated("autoincrement".to_string());
        assert!(default.is_generated());
        assert!(default.literal().is_none());

        let default = DefaultValue::Literal(LiteralValue::Int(7));
        assert_eq!(default.literal(), Some(&LiteralValue::Int(7)));
    }
}
