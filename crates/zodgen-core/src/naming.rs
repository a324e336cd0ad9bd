use crate::{
    config::GeneratorConfig,
    expr::{ShapeKey, ShapeKind},
};
use convert_case::{Case, Casing};

/// Derive the exported artifact identifier for a registry key.
///
/// Variant names use the configured suffix; auxiliary shapes carry fixed
/// suffixes; enum schemas keep the declared enum name.
#[must_use]
pub fn artifact_name(key: &ShapeKey, config: &GeneratorConfig) -> String {
    let target = key.target.to_case(Case::Pascal);

    match &key.kind {
        ShapeKind::Enum => key.target.clone(),
        ShapeKind::FieldEnum => format!("{target}ScalarFieldEnum"),
        ShapeKind::Include => format!("{target}Include"),
        ShapeKind::Operation(op) => {
            format!("{target}{}Args", op.to_string().to_case(Case::Pascal))
        }
        ShapeKind::OrderBy => format!("{target}OrderByInput"),
        ShapeKind::Select => format!("{target}Select"),
        ShapeKind::Variant(name) => {
            let suffix = config
                .variant(name)
                .map_or_else(|| name.to_case(Case::Pascal), |v| v.suffix.clone());
            format!("{target}{suffix}")
        }
        ShapeKind::Where => format!("{target}WhereInput"),
        ShapeKind::WhereUnique => format!("{target}WhereUniqueInput"),
    }
}

///
/// TESTS
///
