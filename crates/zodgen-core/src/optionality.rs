use crate::expr::Optionality;
use zodgen_schema::{node::FieldDescriptor, types::DefaultValue};

/// Optionality of every relation-operation sub-slot (create/connect/
/// connectOrCreate/update/upsert/disconnect/delete/set), regardless of the
/// parent relation's own optionality.
pub const RELATION_SLOT: Optionality = Optionality::OptionalOnly;

///
/// ResolvedOptionality
/// The node's optionality tag plus the default literal to attach, if any.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedOptionality {
    pub optionality: Optionality,
    pub default: Option<DefaultValue>,
}

/// Compose required/optional/nullable for one field.
///
/// Optional scalars and enums accept `null` in addition to omission;
/// relation-shaped fields are never nullable, even when the underlying
/// foreign key scalar is. A field with a default is always at least
/// omittable, independent of the nullability rule.
#[must_use]
pub fn resolve_field(field: &FieldDescriptor) -> ResolvedOptionality {
    let base = if field.is_relation_shaped() {
        if field.is_required {
            Optionality::Required
        } else {
            Optionality::OptionalOnly
        }
    } else if field.is_required {
        Optionality::Required
    } else {
        Optionality::OptionalNullable
    };

    let optionality = if field.has_default() && base == Optionality::Required {
        Optionality::OptionalOnly
    } else {
        base
    };

    ResolvedOptionality {
        optionality,
        default: field.default.clone(),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use zodgen_schema::types::{FieldType, LiteralValue, ScalarType};

    fn field(ty: FieldType, is_required: bool, default: Option<DefaultValue>) -> FieldDescriptor {
        FieldDescriptor {
            name: "f".to_string(),
            ty,
            is_list: false,
            is_required,
            is_unique: false,
            is_id: false,
            default,
            foreign_key_of: None,
            annotation: None,
        }
    }

    #[test]
    fn required_scalar_without_default_is_required() {
        let resolved = resolve_field(&field(FieldType::Scalar(ScalarType::String), true, None));
        assert_eq!(resolved.optionality, Optionality::Required);
        assert!(resolved.default.is_none());
    }

    #[test]
    fn optional_scalar_is_nullable() {
        let resolved = resolve_field(&field(FieldType::Scalar(ScalarType::String), false, None));
        assert_eq!(resolved.optionality, Optionality::OptionalNullable);
    }

    #[test]
    fn optional_relation_is_never_nullable() {
        let resolved = resolve_field(&field(FieldType::Relation("Post".to_string()), false, None));
        assert_eq!(resolved.optionality, Optionality::OptionalOnly);
    }

    #[test]
    fn required_relation_stays_required() {
        let resolved = resolve_field(&field(FieldType::Relation("Post".to_string()), true, None));
        assert_eq!(resolved.optionality, Optionality::Required);
    }

    #[test]
    fn default_lifts_required_to_optional_only() {
        let default = Some(DefaultValue::Literal(LiteralValue::Int(0)));
        let resolved = resolve_field(&field(FieldType::Scalar(ScalarType::Int), true, default));

        assert_eq!(resolved.optionality, Optionality::OptionalOnly);
        assert!(resolved.default.is_some());
    }

    #[test]
    fn default_on_optional_scalar_keeps_nullability() {
        let default = Some(DefaultValue::Generated("now".to_string()));
        let resolved = resolve_field(&field(
            FieldType::Scalar(ScalarType::DateTime),
            false,
            default,
        ));

        assert_eq!(resolved.optionality, Optionality::OptionalNullable);
    }
}
