use serde::{Deserialize, Serialize};

///
/// EnumDescriptor
///
/// Value order is insertion order; it is the wire/display order and must
/// be preserved in the generated enum schema.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EnumDescriptor {
    pub name: String,
    pub values: Vec<String>,
}

impl EnumDescriptor {
    #[must_use]
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}
