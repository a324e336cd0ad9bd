use crate::{
    config::{BinaryMode, DateTimeStrategy, DecimalMode, GeneratorConfig},
    expr::{ExpressionNode, PrimitiveKind, RefinementCall, Shape, ShapeKey},
};
use derive_more::Display;
use thiserror::Error as ThisError;
use zodgen_schema::types::{FieldType, ScalarType};

/// Pattern attached to decimal-as-string primitives.
pub const DECIMAL_STRING_PATTERN: &str = r"^-?\d+(\.\d+)?([eE][+-]?\d+)?$";

///
/// TypeMapError
///
/// The fatal class: a kind with no mapping table entry reached the mapper.
/// Silently mis-typing a field would produce wrong validation and wrong
/// inferred types downstream, so there is no fallback here.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum TypeMapError {
    #[error("no schema mapping for unsupported scalar type '{ty}'")]
    UnsupportedScalar { ty: String },

    #[error("relation field (target '{target}') reached the scalar mapper")]
    RelationShape { target: String },
}

///
/// ModeOptions
/// The dialect mode axes threaded into every mapping decision.
///

#[derive(Clone, Copy, Debug)]
pub struct ModeOptions {
    pub decimal: DecimalMode,
    pub date_time: DateTimeStrategy,
    pub binary: BinaryMode,
}

impl ModeOptions {
    #[must_use]
    pub const fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            decimal: config.decimal_mode,
            date_time: config.date_time_strategy,
            binary: config.binary_mode,
        }
    }
}

/// Map a scalar kind under the given modes to its base primitive plus any
/// mode-implied literal constraints. Total over the supported vocabulary.
pub fn scalar_primitive(
    scalar: &ScalarType,
    modes: ModeOptions,
) -> Result<(PrimitiveKind, Vec<RefinementCall>), TypeMapError> {
    let mapped = match scalar {
        ScalarType::String => (PrimitiveKind::String, Vec::new()),
        ScalarType::Int => (PrimitiveKind::Int, Vec::new()),
        ScalarType::Float => (PrimitiveKind::Float, Vec::new()),
        ScalarType::Boolean => (PrimitiveKind::Boolean, Vec::new()),
        ScalarType::Json => (PrimitiveKind::Json, Vec::new()),
        ScalarType::BigInt => (PrimitiveKind::BigInt, Vec::new()),
        ScalarType::DateTime => match modes.date_time {
            DateTimeStrategy::Date => (PrimitiveKind::Date, Vec::new()),
            DateTimeStrategy::Coerce => (PrimitiveKind::CoercedDate, Vec::new()),
            DateTimeStrategy::IsoString => (
                PrimitiveKind::String,
                vec![RefinementCall::new("datetime", "")],
            ),
        },
        ScalarType::Bytes => match modes.binary {
            BinaryMode::Bytes => (PrimitiveKind::Bytes, Vec::new()),
            BinaryMode::Base64 => (
                PrimitiveKind::String,
                vec![RefinementCall::new("base64", "")],
            ),
        },
        ScalarType::Decimal => match modes.decimal {
            DecimalMode::Decimal => (PrimitiveKind::Decimal, Vec::new()),
            DecimalMode::Number => (PrimitiveKind::Float, Vec::new()),
            DecimalMode::String => (
                PrimitiveKind::String,
                vec![RefinementCall::new(
                    "regex",
                    format!("/{DECIMAL_STRING_PATTERN}/"),
                )],
            ),
        },
        ScalarType::Unsupported(name) => {
            return Err(TypeMapError::UnsupportedScalar { ty: name.clone() });
        }
    };

    Ok(mapped)
}

/// Build the base shape for a scalar or enum field: primitive or deferred
/// enum reference, wrapped in `ArrayOf` for list fields. Relations are
/// composed per variant and must not reach this mapper.
pub fn base_shape(ty: &FieldType, is_list: bool, modes: ModeOptions) -> Result<Shape, TypeMapError> {
    let item = match ty {
        FieldType::Scalar(scalar) => {
            let (kind, constraints) = scalar_primitive(scalar, modes)?;
            Shape::Primitive { kind, constraints }
        }
        FieldType::Enum(name) => Shape::Reference(ShapeKey::enumeration(name.clone())),
        FieldType::Relation(target) => {
            return Err(TypeMapError::RelationShape {
                target: target.clone(),
            });
        }
    };

    if is_list {
        Ok(Shape::ArrayOf(Box::new(ExpressionNode::required(item))))
    } else {
        Ok(item)
    }
}

///
/// AggregationKind
/// Numeric-aggregation selections exposed by aggregate/groupBy shapes.
/// Display strings are the selection slot names.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[remain::sorted]
pub enum AggregationKind {
    #[display("_avg")]
    Avg,
    #[display("_count")]
    Count,
    #[display("_max")]
    Max,
    #[display("_min")]
    Min,
    #[display("_sum")]
    Sum,
}

impl AggregationKind {
    pub const ALL: [Self; 5] = [Self::Count, Self::Avg, Self::Sum, Self::Min, Self::Max];
}

/// Per-aggregation applicability, keyed on the mapped base kind.
#[must_use]
pub const fn supports_aggregation(kind: PrimitiveKind, agg: AggregationKind) -> bool {
    match agg {
        AggregationKind::Count => true,
        AggregationKind::Avg | AggregationKind::Sum => kind.is_numeric(),
        AggregationKind::Max | AggregationKind::Min => kind.is_orderable(),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_MODES: ModeOptions = ModeOptions {
        decimal: DecimalMode::Decimal,
        date_time: DateTimeStrategy::Coerce,
        binary: BinaryMode::Bytes,
    };

    #[test]
    fn every_supported_scalar_maps_under_every_mode() {
        let scalars = [
            ScalarType::String,
            ScalarType::Int,
            ScalarType::Float,
            ScalarType::Boolean,
            ScalarType::DateTime,
            ScalarType::Json,
            ScalarType::Bytes,
            ScalarType::BigInt,
            ScalarType::Decimal,
        ];
        let decimals = [DecimalMode::Decimal, DecimalMode::Number, DecimalMode::String];
        let dates = [
            DateTimeStrategy::Coerce,
            DateTimeStrategy::Date,
            DateTimeStrategy::IsoString,
        ];
        let binaries = [BinaryMode::Bytes, BinaryMode::Base64];

        for scalar in &scalars {
            for &decimal in &decimals {
                for &date_time in &dates {
                    for &binary in &binaries {
                        let modes = ModeOptions {
                            decimal,
                            date_time,
                            binary,
                        };
                        assert!(scalar_primitive(scalar, modes).is_ok(), "{scalar} failed");
                    }
                }
            }
        }
    }

    #[test]
    fn unsupported_scalar_is_fatal() {
        let err = scalar_primitive(
            &ScalarType::Unsupported("Geometry".to_string()),
            DEFAULT_MODES,
        )
        .unwrap_err();

        assert_eq!(
            err,
            TypeMapError::UnsupportedScalar {
                ty: "Geometry".to_string()
            }
        );
    }

    #[test]
    fn iso_string_mode_adds_datetime_constraint() {
        let modes = ModeOptions {
            date_time: DateTimeStrategy::IsoString,
            ..DEFAULT_MODES
        };
        let (kind, constraints) = scalar_primitive(&ScalarType::DateTime, modes).unwrap();

        assert_eq!(kind, PrimitiveKind::String);
        assert_eq!(constraints, vec![RefinementCall::new("datetime", "")]);
    }

    #[test]
    fn list_modifier_wraps_in_array() {
        let shape = base_shape(
            &FieldType::Scalar(ScalarType::String),
            true,
            DEFAULT_MODES,
        )
        .unwrap();

        match shape {
            Shape::ArrayOf(inner) => {
                assert_eq!(inner.shape.primitive_kind(), Some(PrimitiveKind::String));
            }
            other => panic!("expected ArrayOf, got {other:?}"),
        }
    }

    #[test]
    fn enum_field_maps_to_deferred_reference() {
        let shape = base_shape(
            &FieldType::Enum("Role".to_string()),
            false,
            DEFAULT_MODES,
        )
        .unwrap();

        assert_eq!(shape, Shape::Reference(ShapeKey::enumeration("Role")));
    }

    #[test]
    fn aggregation_applicability_table() {
        assert!(supports_aggregation(PrimitiveKind::Int, AggregationKind::Avg));
        assert!(supports_aggregation(PrimitiveKind::Decimal, AggregationKind::Sum));
        assert!(!supports_aggregation(PrimitiveKind::String, AggregationKind::Sum));
        assert!(supports_aggregation(PrimitiveKind::String, AggregationKind::Max));
        assert!(supports_aggregation(PrimitiveKind::CoercedDate, AggregationKind::Min));
        assert!(!supports_aggregation(PrimitiveKind::Json, AggregationKind::Max));
        assert!(supports_aggregation(PrimitiveKind::Json, AggregationKind::Count));
        assert!(!supports_aggregation(PrimitiveKind::Boolean, AggregationKind::Min));
    }
}
