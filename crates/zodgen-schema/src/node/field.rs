use crate::types::{DefaultValue, FieldType};
use serde::{Deserialize, Serialize};

///
/// FieldList
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct FieldList {
    pub fields: Vec<FieldDescriptor>,
}

impl FieldList {
    // get
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a FieldList {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

///
/// FieldDescriptor
///
/// One field of a model. `foreign_key_of` back-references the relation
/// field this scalar is the key for; it keeps a nullable relation's
/// underlying key independently nullable while the relation object itself
/// is never marked nullable.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: FieldType,

    #[serde(default)]
    pub is_list: bool,

    #[serde(default = "default_true")]
    pub is_required: bool,

    #[serde(default)]
    pub is_unique: bool,

    #[serde(default)]
    pub is_id: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key_of: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

const fn default_true() -> bool {
    true
}

impl FieldDescriptor {
    #[must_use]
    pub const fn is_relation_shaped(&self) -> bool {
        self.ty.is_relation()
    }

    #[must_use]
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// True when the field can address a single row on its own.
    #[must_use]
    pub const fn is_unique_key(&self) -> bool {
        self.is_id || self.is_unique
    }
}
