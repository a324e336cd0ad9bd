//! Shared descriptor and configuration builders for the test tree.

use crate::{
    config::{GeneratorConfig, RawConfig, RawModelSpec},
    report::Report,
};
use zodgen_schema::{
    node::{DescriptorSet, EnumDescriptor, FieldDescriptor, FieldList, ModelDescriptor},
    types::{DefaultValue, FieldType, ScalarType},
};

pub fn scalar(name: &str, ty: ScalarType) -> FieldDescriptor {
    FieldDescriptor {
        name: name.to_string(),
        ty: FieldType::Scalar(ty),
        is_list: false,
        is_required: true,
        is_unique: false,
        is_id: false,
        default: None,
        foreign_key_of: None,
        annotation: None,
    }
}

pub fn scalar_with(
    name: &str,
    ty: ScalarType,
    f: impl FnOnce(&mut FieldDescriptor),
) -> FieldDescriptor {
    let mut field = scalar(name, ty);
    f(&mut field);
    field
}

pub fn relation(name: &str, target: &str) -> FieldDescriptor {
    FieldDescriptor {
        name: name.to_string(),
        ty: FieldType::Relation(target.to_string()),
        is_list: false,
        is_required: true,
        is_unique: false,
        is_id: false,
        default: None,
        foreign_key_of: None,
        annotation: None,
    }
}

pub fn relation_with(
    name: &str,
    target: &str,
    f: impl FnOnce(&mut FieldDescriptor),
) -> FieldDescriptor {
    let mut field = relation(name, target);
    f(&mut field);
    field
}

pub fn enum_field(name: &str, enum_name: &str) -> FieldDescriptor {
    FieldDescriptor {
        name: name.to_string(),
        ty: FieldType::Enum(enum_name.to_string()),
        is_list: false,
        is_required: true,
        is_unique: false,
        is_id: false,
        default: None,
        foreign_key_of: None,
        annotation: None,
    }
}

pub fn id_field(name: &str) -> FieldDescriptor {
    scalar_with(name, ScalarType::Int, |f| {
        f.is_id = true;
        f.default = Some(DefaultValue::Generated("autoincrement".to_string()));
    })
}

pub fn model(name: &str, fields: Vec<FieldDescriptor>) -> ModelDescriptor {
    ModelDescriptor {
        name: name.to_string(),
        fields: FieldList { fields },
        unique_groups: Vec::new(),
    }
}

pub fn enum_decl(name: &str, values: &[&str]) -> EnumDescriptor {
    EnumDescriptor {
        name: name.to_string(),
        values: values.iter().map(ToString::to_string).collect(),
    }
}

pub fn set_of(models: Vec<ModelDescriptor>) -> DescriptorSet {
    DescriptorSet {
        models,
        enums: Vec::new(),
    }
}

pub fn set_with_enums(models: Vec<ModelDescriptor>, enums: Vec<EnumDescriptor>) -> DescriptorSet {
    DescriptorSet { models, enums }
}

/// Normalize a mutated raw configuration, discarding normalization
/// warnings (tests that assert on them normalize explicitly).
pub fn configure(f: impl FnOnce(&mut RawConfig)) -> GeneratorConfig {
    let mut raw = RawConfig::default();
    f(&mut raw);
    GeneratorConfig::from_raw(raw, &mut Report::new())
}

pub fn model_spec(f: impl FnOnce(&mut RawModelSpec)) -> RawModelSpec {
    let mut spec = RawModelSpec::default();
    f(&mut spec);
    spec
}

/// The classic mutually-referential pair: User ⇄ Post, with the post's
/// author key kept as an independent scalar.
pub fn user_post_set() -> DescriptorSet {
    let user = model(
        "User",
        vec![
            id_field("id"),
            scalar_with("email", ScalarType::String, |f| f.is_unique = true),
            scalar_with("name", ScalarType::String, |f| f.is_required = false),
            relation_with("posts", "Post", |f| f.is_list = true),
        ],
    );
    let post = model(
        "Post",
        vec![
            id_field("id"),
            scalar("title", ScalarType::String),
            relation("author", "User"),
            scalar_with("authorId", ScalarType::Int, |f| {
                f.foreign_key_of = Some("author".to_string());
            }),
        ],
    );

    set_of(vec![user, post])
}

/// A self-referential tree model.
pub fn category_set() -> DescriptorSet {
    let category = model(
        "Category",
        vec![
            id_field("id"),
            scalar("name", ScalarType::String),
            relation_with("parent", "Category", |f| f.is_required = false),
            relation_with("children", "Category", |f| f.is_list = true),
            scalar_with("parentId", ScalarType::Int, |f| {
                f.is_required = false;
                f.foreign_key_of = Some("parent".to_string());
            }),
        ],
    );

    set_of(vec![category])
}
