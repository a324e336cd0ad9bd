use crate::node::{FieldDescriptor, FieldList};
use serde::{Deserialize, Serialize};

///
/// ModelDescriptor
///
/// One model of the data model. Field order is the emission order and is
/// preserved in every derived variant and operation shape. Unique groups
/// are carried opaquely for the downstream emitter.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ModelDescriptor {
    pub name: String,
    pub fields: FieldList,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unique_groups: Vec<Vec<String>>,
}

impl ModelDescriptor {
    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// Return the identity field if the model declares one.
    #[must_use]
    pub fn id_field(&self) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.is_id)
    }

    pub fn relation_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_relation_shaped())
    }
}
