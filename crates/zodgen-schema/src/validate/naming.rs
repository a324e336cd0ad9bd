use crate::{
    MAX_ENUM_NAME_LEN, MAX_FIELD_NAME_LEN, MAX_MODEL_NAME_LEN, err, error::ErrorTree,
    node::DescriptorSet,
};
use std::collections::BTreeSet;

/// Validate identifier bounds and uniqueness across the descriptor set.
pub fn validate_naming(set: &DescriptorSet, errs: &mut ErrorTree) {
    let mut model_names = BTreeSet::new();
    for model in &set.models {
        check_ident(errs, "model", &model.name, MAX_MODEL_NAME_LEN);

        if !model_names.insert(model.name.as_str()) {
            err!(errs, "duplicate model name '{}'", model.name);
        }

        let mut field_names = BTreeSet::new();
        for field in &model.fields {
            check_ident(errs, "field", &field.name, MAX_FIELD_NAME_LEN);

            if !field_names.insert(field.name.as_str()) {
                errs.add_at(
                    format!("{}.{}", model.name, field.name),
                    "duplicate field name",
                );
            }
        }
    }

    let mut enum_names = BTreeSet::new();
    for decl in &set.enums {
        check_ident(errs, "enum", &decl.name, MAX_ENUM_NAME_LEN);

        if !enum_names.insert(decl.name.as_str()) {
            err!(errs, "duplicate enum name '{}'", decl.name);
        }
        if model_names.contains(decl.name.as_str()) {
            err!(errs, "enum '{}' collides with a model name", decl.name);
        }

        if decl.values.is_empty() {
            errs.add_at(decl.name.clone(), "enum declares no values");
        }
        let mut values = BTreeSet::new();
        for value in &decl.values {
            check_ident(errs, "enum value", value, MAX_ENUM_NAME_LEN);
            if !values.insert(value.as_str()) {
                errs.add_at(decl.name.clone(), format!("duplicate enum value '{value}'"));
            }
        }
    }
}

// Reject empty and over-long identifiers.
fn check_ident(errs: &mut ErrorTree, kind: &str, name: &str, max: usize) {
    if name.is_empty() {
        err!(errs, "{kind} name is empty");
    } else if name.len() > max {
        err!(errs, "{kind} name '{name}' exceeds {max} characters");
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{DescriptorSet, EnumDescriptor};

    #[test]
    fn over_long_enum_name_is_reported() {
        let set = DescriptorSet {
            models: Vec::new(),
            enums: vec![EnumDescriptor {
                name: "E".repeat(MAX_ENUM_NAME_LEN + 1),
                values: vec!["A".to_string()],
            }],
        };

        let mut errs = ErrorTree::new();
        validate_naming(&set, &mut errs);
        assert!(!errs.is_empty());
    }

    #[test]
    fn duplicate_enum_values_are_routed() {
        let set = DescriptorSet {
            models: Vec::new(),
            enums: vec![EnumDescriptor {
                name: "Role".to_string(),
                values: vec!["A".to_string(), "A".to_string()],
            }],
        };

        let mut errs = ErrorTree::new();
        validate_naming(&set, &mut errs);
        assert!(errs.result().unwrap_err().to_string().contains("Role"));
    }
}
