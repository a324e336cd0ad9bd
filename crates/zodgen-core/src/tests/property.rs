use crate::{
    expr::{Optionality, Shape},
    filter::{OperationKind, Pattern, build_plan},
    generate::generate_with_config,
    optionality::resolve_field,
    report::Report,
    test_fixtures::{configure, model, model_spec, scalar_with, set_of},
};
use proptest::prelude::*;
use zodgen_schema::{
    node::FieldDescriptor,
    types::{DefaultValue, FieldType, LiteralValue, ScalarType},
};

const FIELD_NAMES: [&str; 6] = ["id", "email", "name", "score", "createdAt", "payload"];

fn arb_field_name() -> impl Strategy<Value = String> {
    prop::sample::select(&FIELD_NAMES[..]).prop_map(str::to_string)
}

fn arb_scalar_type() -> impl Strategy<Value = ScalarType> {
    prop_oneof![
        Just(ScalarType::String),
        Just(ScalarType::Int),
        Just(ScalarType::Float),
        Just(ScalarType::Boolean),
        Just(ScalarType::DateTime),
        Just(ScalarType::Json),
        Just(ScalarType::Bytes),
        Just(ScalarType::BigInt),
        Just(ScalarType::Decimal),
    ]
}

fn arb_field_type() -> impl Strategy<Value = FieldType> {
    prop_oneof![
        arb_scalar_type().prop_map(FieldType::Scalar),
        Just(FieldType::Relation("Other".to_string())),
    ]
}

fn arb_default() -> impl Strategy<Value = Option<DefaultValue>> {
    prop_oneof![
        Just(None),
        Just(Some(DefaultValue::Generated("autoincrement".to_string()))),
        Just(Some(DefaultValue::Literal(LiteralValue::Int(1)))),
    ]
}

fn arb_field() -> impl Strategy<Value = FieldDescriptor> {
    (
        arb_field_name(),
        arb_field_type(),
        any::<bool>(),
        any::<bool>(),
        arb_default(),
    )
        .prop_map(|(name, ty, is_list, is_required, default)| {
            let default = if ty.is_relation() { None } else { default };
            FieldDescriptor {
                name,
                ty,
                is_list,
                is_required,
                is_unique: false,
                is_id: false,
                default,
                foreign_key_of: None,
                annotation: None,
            }
        })
}

proptest! {
    // Optional scalars/enums accept both omission and explicit null;
    // relation-shaped fields accept omission but never null.
    #[test]
    fn optional_vs_nullable_asymmetry(field in arb_field()) {
        let resolved = resolve_field(&field);

        if field.is_relation_shaped() {
            prop_assert!(!resolved.optionality.accepts_null());
            if !field.is_required {
                prop_assert!(resolved.optionality.accepts_omission());
            }
        } else if !field.is_required {
            prop_assert!(resolved.optionality.accepts_null());
            prop_assert!(resolved.optionality.accepts_omission());
        }

        // a default always makes the field omittable
        if field.default.is_some() {
            prop_assert!(resolved.optionality.accepts_omission());
        }
    }

    // Excluding a field by exact name and by an equivalent wildcard
    // produces identical surviving-field sets.
    #[test]
    fn exact_and_equivalent_wildcard_exclusions_agree(
        excluded in arb_field_name(),
        split in 1usize..5,
    ) {
        let fields: Vec<FieldDescriptor> = FIELD_NAMES
            .iter()
            .map(|name| scalar_with(name, ScalarType::String, |_| {}))
            .collect();

        let survivors = |pattern: String| {
            let set = set_of(vec![model("M", fields.clone())]);
            let config = configure(|raw| {
                raw.models.insert(
                    "M".to_string(),
                    model_spec(|m| m.fields.exclude = vec![pattern.clone()]),
                );
            });
            let plan = build_plan(&set, &config, &mut Report::new());
            plan.model("M")
                .unwrap()
                .fields
                .iter()
                .map(|f| f.name.clone())
                .collect::<Vec<_>>()
        };

        let exact = survivors(excluded.clone());

        // a prefix wildcard covering the whole name, unless the prefix
        // also matches another field name
        let cut = split.min(excluded.len());
        let prefix = &excluded[..cut];
        let prefix_is_equivalent = FIELD_NAMES
            .iter()
            .all(|name| name.starts_with(prefix) == (*name == excluded));
        if prefix_is_equivalent {
            prop_assert_eq!(&exact, &survivors(format!("{prefix}*")));
        }

        // the full name as a prefix pattern is always equivalent unless
        // another name extends it
        let full_prefix_equivalent = FIELD_NAMES
            .iter()
            .all(|name| name.starts_with(excluded.as_str()) == (*name == excluded));
        if full_prefix_equivalent {
            prop_assert_eq!(&exact, &survivors(format!("{excluded}*")));
        }
    }

    // Malformed patterns never panic and never exclude anything.
    #[test]
    fn malformed_patterns_match_nothing(raw in "[a-z*]{0,8}") {
        let stars = raw.matches('*').count();
        let malformed = stars > 1 || (stars == 1 && raw != "*" && !raw.starts_with('*') && !raw.ends_with('*'));

        match Pattern::parse(&raw) {
            None => prop_assert!(malformed),
            Some(pattern) => {
                prop_assert!(!malformed);
                // parsing is stable: the pattern matches a name iff the
                // raw form does under prefix/suffix semantics
                let _ = pattern.matches("email");
            }
        }
    }

    // Composition over a randomly filtered model set terminates and
    // yields a forest in which every deferred reference resolves.
    #[test]
    fn forests_are_closed_under_references(
        disable_user in any::<bool>(),
        exclude in prop::collection::vec(arb_field_name(), 0..3),
    ) {
        let config = configure(|raw| {
            if disable_user {
                raw.models.insert(
                    "User".to_string(),
                    model_spec(|m| m.enabled = Some(false)),
                );
            }
            raw.models.insert(
                "Post".to_string(),
                model_spec(|m| m.fields.exclude = exclude.clone()),
            );
        });

        let generated =
            generate_with_config(&crate::test_fixtures::user_post_set(), &config).unwrap();

        for (_, node) in generated.schemas.iter() {
            let mut ok = true;
            node.for_each_reference(&mut |key| {
                ok &= generated.schemas.get(key).is_some();
            });
            prop_assert!(ok, "dangling reference in forest");
        }
    }

    // The same (descriptors, config) input always produces the same
    // forest: memoized shapes cannot diverge between consumers.
    #[test]
    fn generation_is_deterministic(minimal in any::<bool>(), exclude_email in any::<bool>()) {
        let config = configure(|raw| {
            raw.minimal = minimal;
            if exclude_email {
                raw.global_exclusions = vec!["email".to_string()];
            }
        });
        let set = crate::test_fixtures::user_post_set();

        let first = generate_with_config(&set, &config).unwrap();
        let second = generate_with_config(&set, &config).unwrap();

        let left = serde_json::to_value(&first.schemas).unwrap();
        let right = serde_json::to_value(&second.schemas).unwrap();
        prop_assert_eq!(left, right);
    }

    // Relation sub-slots of input shapes are never nullable, whatever the
    // cardinality or requiredness of the underlying field.
    #[test]
    fn relation_sub_slots_never_accept_null(optional_parent in any::<bool>()) {
        let mut set = crate::test_fixtures::category_set();
        set.models[0]
            .fields
            .fields
            .iter_mut()
            .find(|f| f.name == "parent")
            .unwrap()
            .is_required = !optional_parent;

        let generated =
            generate_with_config(&set, &configure(|_| {})).unwrap();
        let input = generated
            .schemas
            .get(&crate::expr::ShapeKey::variant("Category", "input"))
            .unwrap();

        let Shape::ObjectOf(fields) = &input.shape else {
            panic!("expected object");
        };
        for field in fields {
            let Shape::ObjectOf(slots) = &field.node.shape else {
                continue;
            };
            prop_assert_ne!(field.node.optionality, Optionality::OptionalNullable);
            for slot in slots {
                prop_assert_eq!(slot.node.optionality, Optionality::OptionalOnly);
            }
        }
    }

    // Unknown operation names never abort and never produce artifacts.
    #[test]
    fn unknown_operations_degrade(name in "[a-zA-Z]{1,12}") {
        let config = configure(|raw| {
            raw.models.insert(
                "User".to_string(),
                model_spec(|m| m.operations = Some(vec![name.clone(), "findMany".to_string()])),
            );
        });
        let set = crate::test_fixtures::user_post_set();
        let generated = generate_with_config(&set, &config).unwrap();

        let known = name.parse::<OperationKind>().is_ok();
        let op_count = generated
            .schemas
            .keys()
            .filter(|key| {
                key.target == "User"
                    && matches!(key.kind, crate::expr::ShapeKind::Operation(_))
            })
            .count();
        prop_assert_eq!(op_count, if known && name != "findMany" { 2 } else { 1 });
    }
}
