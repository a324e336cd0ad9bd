use crate::filter::OperationKind;
use derive_more::Display;
use serde::Serialize;
use std::fmt;
use zodgen_schema::types::{DefaultValue, LiteralValue};

///
/// Optionality
///
/// How a node composes into its parent object. `OptionalNullable` is
/// permitted only for non-relation shapes; relation-shaped nodes and every
/// relation-operation sub-slot are restricted to `Required`/`OptionalOnly`.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum Optionality {
    OptionalNullable,
    OptionalOnly,
    Required,
}

impl Optionality {
    #[must_use]
    pub const fn accepts_omission(self) -> bool {
        !matches!(self, Self::Required)
    }

    #[must_use]
    pub const fn accepts_null(self) -> bool {
        matches!(self, Self::OptionalNullable)
    }
}

///
/// RefinementCall
///
/// One chained validator call: method name plus its raw argument text,
/// opaque to the engine beyond bracket balancing.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RefinementCall {
    pub method: String,
    pub args: String,
}

impl RefinementCall {
    pub fn new(method: impl Into<String>, args: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            args: args.into(),
        }
    }
}

impl fmt::Display for RefinementCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}({})", self.method, self.args)
    }
}

///
/// OverrideExpression
///
/// A full-expression override: replaces the base shape and its refinements
/// while the node's optionality wrapper still applies. The expression text
/// is an opaque, already-valid fragment in the target dialect.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct OverrideExpression {
    pub expression: String,
    pub trailing: Vec<RefinementCall>,
}

///
/// PrimitiveKind
///
/// Dialect-neutral base kinds emitted by the type mapper. Mode choices are
/// folded in here (`CoercedDate` vs `Date`) or expressed as literal
/// constraints on a plainer kind (ISO strings, base64 blobs).
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum PrimitiveKind {
    BigInt,
    Boolean,
    Bytes,
    CoercedDate,
    Date,
    Decimal,
    Float,
    Int,
    Json,
    String,
}

impl PrimitiveKind {
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::BigInt | Self::Decimal | Self::Float | Self::Int)
    }

    #[must_use]
    pub const fn is_orderable(self) -> bool {
        self.is_numeric() || matches!(self, Self::CoercedDate | Self::Date | Self::String)
    }
}

///
/// ShapeKind
///
/// Which artifact of a target a key names. `Variant` carries the
/// configured variant name; `Enum` keys name enum schemas, including the
/// synthesized sort-order enum.
///

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[remain::sorted]
pub enum ShapeKind {
    Enum,
    FieldEnum,
    Include,
    Operation(OperationKind),
    OrderBy,
    Select,
    Variant(String),
    Where,
    WhereUnique,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum => write!(f, "enum"),
            Self::FieldEnum => write!(f, "fieldEnum"),
            Self::Include => write!(f, "include"),
            Self::Operation(op) => write!(f, "operation:{op}"),
            Self::OrderBy => write!(f, "orderBy"),
            Self::Select => write!(f, "select"),
            Self::Variant(name) => write!(f, "variant:{name}"),
            Self::Where => write!(f, "where"),
            Self::WhereUnique => write!(f, "whereUnique"),
        }
    }
}

///
/// ShapeKey
///
/// Registry key for one deferred cross-reference target: a model (or enum)
/// name plus the artifact kind.
///

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ShapeKey {
    pub target: String,
    pub kind: ShapeKind,
}

impl ShapeKey {
    pub fn new(target: impl Into<String>, kind: ShapeKind) -> Self {
        Self {
            target: target.into(),
            kind,
        }
    }

    pub fn variant(target: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(target, ShapeKind::Variant(name.into()))
    }

    pub fn operation(target: impl Into<String>, op: OperationKind) -> Self {
        Self::new(target, ShapeKind::Operation(op))
    }

    pub fn where_filter(target: impl Into<String>) -> Self {
        Self::new(target, ShapeKind::Where)
    }

    pub fn where_unique(target: impl Into<String>) -> Self {
        Self::new(target, ShapeKind::WhereUnique)
    }

    pub fn order_by(target: impl Into<String>) -> Self {
        Self::new(target, ShapeKind::OrderBy)
    }

    pub fn field_enum(target: impl Into<String>) -> Self {
        Self::new(target, ShapeKind::FieldEnum)
    }

    pub fn select(target: impl Into<String>) -> Self {
        Self::new(target, ShapeKind::Select)
    }

    pub fn include(target: impl Into<String>) -> Self {
        Self::new(target, ShapeKind::Include)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(name, ShapeKind::Enum)
    }
}

impl fmt::Display for ShapeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.target, self.kind)
    }
}

///
/// ObjectField
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ObjectField {
    pub name: String,
    pub node: ExpressionNode,
}

impl ObjectField {
    pub fn new(name: impl Into<String>, node: ExpressionNode) -> Self {
        Self {
            name: name.into(),
            node,
        }
    }
}

///
/// Shape
///
/// The structural half of an expression node. `Reference` is never
/// expanded inline; dereferencing happens only at emission time, which is
/// what makes self- and mutually-referential models terminate.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
#[remain::sorted]
pub enum Shape {
    ArrayOf(Box<ExpressionNode>),
    Literal(LiteralValue),
    ObjectOf(Vec<ObjectField>),
    Primitive {
        kind: PrimitiveKind,
        constraints: Vec<RefinementCall>,
    },
    Reference(ShapeKey),
    ReferenceWithDefault(ShapeKey, DefaultValue),
    UnionOf(Vec<ExpressionNode>),
}

impl Shape {
    #[must_use]
    pub const fn primitive(kind: PrimitiveKind) -> Self {
        Self::Primitive {
            kind,
            constraints: Vec::new(),
        }
    }

    #[must_use]
    pub fn object(fields: Vec<ObjectField>) -> Self {
        Self::ObjectOf(fields)
    }

    /// The base primitive kind, looking through list wrappers.
    #[must_use]
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Primitive { kind, .. } => Some(*kind),
            Self::ArrayOf(inner) => inner.shape.primitive_kind(),
            _ => None,
        }
    }
}

///
/// ExpressionNode
///
/// One synthesized validation expression: a base shape, the node's
/// optionality wrapper, appended refinements, and (rarely) a
/// full-expression override that supersedes shape and refinements.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExpressionNode {
    pub shape: Shape,
    pub optionality: Optionality,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub refinements: Vec<RefinementCall>,

    #[serde(rename = "override", skip_serializing_if = "Option::is_none")]
    pub override_expr: Option<OverrideExpression>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
}

impl ExpressionNode {
    #[must_use]
    pub const fn new(shape: Shape, optionality: Optionality) -> Self {
        Self {
            shape,
            optionality,
            refinements: Vec::new(),
            override_expr: None,
            default: None,
        }
    }

    #[must_use]
    pub const fn required(shape: Shape) -> Self {
        Self::new(shape, Optionality::Required)
    }

    #[must_use]
    pub const fn optional(shape: Shape) -> Self {
        Self::new(shape, Optionality::OptionalOnly)
    }

    #[must_use]
    pub const fn nullable(shape: Shape) -> Self {
        Self::new(shape, Optionality::OptionalNullable)
    }

    #[must_use]
    pub fn reference(key: ShapeKey, optionality: Optionality) -> Self {
        Self::new(Shape::Reference(key), optionality)
    }

    #[must_use]
    pub fn with_refinements(mut self, chain: Vec<RefinementCall>) -> Self {
        self.refinements = chain;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Walk every deferred reference embedded in this node, depth-first.
    pub fn for_each_reference<'a>(&'a self, f: &mut impl FnMut(&'a ShapeKey)) {
        match &self.shape {
            Shape::Reference(key) | Shape::ReferenceWithDefault(key, _) => f(key),
            Shape::ArrayOf(inner) => inner.for_each_reference(f),
            Shape::ObjectOf(fields) => {
                for field in fields {
                    field.node.for_each_reference(f);
                }
            }
            Shape::UnionOf(nodes) => {
                for node in nodes {
                    node.for_each_reference(f);
                }
            }
            Shape::Primitive { .. } | Shape::Literal(_) => {}
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_kind_looks_through_lists() {
        let node = ExpressionNode::required(Shape::ArrayOf(Box::new(ExpressionNode::required(
            Shape::primitive(PrimitiveKind::String),
        ))));
        assert_eq!(node.shape.primitive_kind(), Some(PrimitiveKind::String));
    }

    #[test]
    fn reference_walk_reaches_nested_keys() {
        let inner = ExpressionNode::reference(
            ShapeKey::where_unique("Post"),
            Optionality::Required,
        );
        let node = ExpressionNode::optional(Shape::UnionOf(vec![
            inner.clone(),
            ExpressionNode::required(Shape::ArrayOf(Box::new(inner))),
        ]));

        let mut seen = Vec::new();
        node.for_each_reference(&mut |key| seen.push(key.clone()));
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|k| k.target == "Post"));
    }

    #[test]
    fn optionality_predicates() {
        assert!(Optionality::OptionalNullable.accepts_null());
        assert!(Optionality::OptionalNullable.accepts_omission());
        assert!(!Optionality::OptionalOnly.accepts_null());
        assert!(Optionality::OptionalOnly.accepts_omission());
        assert!(!Optionality::Required.accepts_omission());
    }
}
