use crate::{error::ErrorTree, node::DescriptorSet, types::FieldType};
use std::collections::BTreeSet;

///
/// ReferenceEdge
/// A cross-descriptor reference captured during the collect phase.
///

struct ReferenceEdge<'a> {
    route: String,
    target: &'a str,
    kind: ReferenceKind,
}

enum ReferenceKind {
    Relation,
    Enum,
}

/// Validate that every relation target, enum reference, foreign-key
/// back-reference, and unique-group member resolves to a declaration.
pub fn validate_references(set: &DescriptorSet, errs: &mut ErrorTree) {
    // Phase 1: collect reference edges for each model.
    let mut edges = Vec::new();
    for model in &set.models {
        for field in &model.fields {
            let route = format!("{}.{}", model.name, field.name);
            match &field.ty {
                FieldType::Relation(target) => edges.push(ReferenceEdge {
                    route: route.clone(),
                    target,
                    kind: ReferenceKind::Relation,
                }),
                FieldType::Enum(target) => edges.push(ReferenceEdge {
                    route: route.clone(),
                    target,
                    kind: ReferenceKind::Enum,
                }),
                FieldType::Scalar(_) => {}
            }

            if let Some(rel_name) = &field.foreign_key_of {
                match model.get_field(rel_name) {
                    Some(rel) if rel.is_relation_shaped() => {}
                    Some(_) => errs.add_at(
                        route.clone(),
                        format!("foreign_key_of '{rel_name}' is not a relation field"),
                    ),
                    None => errs.add_at(
                        route.clone(),
                        format!("foreign_key_of '{rel_name}' does not exist on '{}'", model.name),
                    ),
                }
            }
        }

        for group in &model.unique_groups {
            for member in group {
                if model.get_field(member).is_none() {
                    errs.add_at(
                        model.name.clone(),
                        format!("unique group member '{member}' does not exist"),
                    );
                }
            }
        }
    }

    // Phase 2: resolve edges against the declared names.
    let model_names: BTreeSet<&str> = set.models.iter().map(|m| m.name.as_str()).collect();
    let enum_names: BTreeSet<&str> = set.enums.iter().map(|e| e.name.as_str()).collect();

    for edge in edges {
        let resolved = match edge.kind {
            ReferenceKind::Relation => model_names.contains(edge.target),
            ReferenceKind::Enum => enum_names.contains(edge.target),
        };
        if !resolved {
            let kind = match edge.kind {
                ReferenceKind::Relation => "relation target",
                ReferenceKind::Enum => "enum reference",
            };
            errs.add_at(edge.route, format!("{kind} '{}' is not declared", edge.target));
        }
    }
}

///
/// TESTS
///
