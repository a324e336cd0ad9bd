mod r#enum;
mod field;
mod model;

pub use field::{FieldDescriptor, FieldList};
pub use model::ModelDescriptor;
pub use r#enum::EnumDescriptor;

use serde::{Deserialize, Serialize};

///
/// DescriptorSet
///
/// The complete normalized data model handed in by the host normalizer.
/// Model and enum order is declaration order and is preserved through
/// every derived artifact.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct DescriptorSet {
    pub models: Vec<ModelDescriptor>,

    #[serde(default)]
    pub enums: Vec<EnumDescriptor>,
}

impl DescriptorSet {
    #[must_use]
    pub fn get_model(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.name == name)
    }

    #[must_use]
    pub fn get_enum(&self, name: &str) -> Option<&EnumDescriptor> {
        self.enums.iter().find(|e| e.name == name)
    }
}
