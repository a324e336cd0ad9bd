use crate::{
    compose::{ComposeError, Composer, SORT_ORDER_ENUM},
    expr::{ExpressionNode, ObjectField, Optionality, PrimitiveKind, Shape, ShapeKey},
    typemap::base_shape,
};
use zodgen_schema::types::LiteralValue;

impl Composer<'_> {
    // WhereInput: boolean combinators referencing the shape itself, one
    // equality slot per surviving field, and relation traversal slots
    // referencing the target's where shape. Self-reference through the
    // registry is what keeps recursive models finite here.
    pub(super) fn where_body(&self, model: &str) -> Result<ExpressionNode, ComposeError> {
        let mp = self.planned(model)?;
        let self_key = ShapeKey::where_filter(model);

        let mut fields = vec![
            ObjectField::new("AND", one_or_many(self_key.clone())),
            ObjectField::new(
                "OR",
                ExpressionNode::optional(Shape::ArrayOf(Box::new(ExpressionNode::required(
                    Shape::Reference(self_key.clone()),
                )))),
            ),
            ObjectField::new("NOT", one_or_many(self_key)),
        ];

        for field in &mp.fields {
            if let Some(target) = field.ty.relation_target() {
                let target_key = ShapeKey::where_filter(target);
                if !self.registry().contains(&target_key) {
                    continue;
                }
                fields.push(ObjectField::new(
                    field.name.clone(),
                    relation_filter(&target_key, field.is_list),
                ));
                continue;
            }

            let shape = base_shape(&field.ty, field.is_list, self.modes).map_err(|source| {
                ComposeError::Field {
                    model: model.to_string(),
                    field: field.name.clone(),
                    source,
                }
            })?;
            let optionality = if field.is_required {
                Optionality::OptionalOnly
            } else {
                // filtering an optional scalar by explicit null is allowed
                Optionality::OptionalNullable
            };
            fields.push(ObjectField::new(
                field.name.clone(),
                ExpressionNode::new(shape, optionality),
            ));
        }

        Ok(ExpressionNode::required(Shape::object(fields)))
    }

    // WhereUniqueInput: the id/unique fields, each omittable. The caller
    // contract (at least one member present) is an emitter-side refine.
    pub(super) fn where_unique_body(&self, model: &str) -> Result<ExpressionNode, ComposeError> {
        let mp = self.planned(model)?;

        let mut fields = Vec::new();
        for field in &mp.fields {
            if !field.is_unique_key() || field.is_relation_shaped() {
                continue;
            }
            let shape = base_shape(&field.ty, field.is_list, self.modes).map_err(|source| {
                ComposeError::Field {
                    model: model.to_string(),
                    field: field.name.clone(),
                    source,
                }
            })?;
            fields.push(ObjectField::new(
                field.name.clone(),
                ExpressionNode::optional(shape),
            ));
        }

        Ok(ExpressionNode::required(Shape::object(fields)))
    }

    // OrderByInput: every orderable field referencing the shared sort
    // order enum.
    pub(super) fn order_by_body(&self, model: &str) -> Result<ExpressionNode, ComposeError> {
        let mp = self.planned(model)?;
        let sort_order = ShapeKey::enumeration(SORT_ORDER_ENUM);

        let fields = mp
            .fields
            .iter()
            .filter(|f| !f.is_relation_shaped() && !f.is_list)
            .map(|f| {
                ObjectField::new(
                    f.name.clone(),
                    ExpressionNode::reference(sort_order.clone(), Optionality::OptionalOnly),
                )
            })
            .collect();

        Ok(ExpressionNode::required(Shape::ObjectOf(fields)))
    }

    // ScalarFieldEnum: the union of surviving scalar/enum field names,
    // used by groupBy `by` and find `distinct`.
    pub(super) fn field_enum_body(&self, model: &str) -> Result<ExpressionNode, ComposeError> {
        let mp = self.planned(model)?;

        let members = mp
            .fields
            .iter()
            .filter(|f| !f.is_relation_shaped())
            .map(|f| {
                ExpressionNode::required(Shape::Literal(LiteralValue::String(f.name.clone())))
            })
            .collect();

        Ok(ExpressionNode::required(Shape::UnionOf(members)))
    }

    // Select: a boolean map over every surviving field.
    pub(super) fn select_body(&self, model: &str) -> Result<ExpressionNode, ComposeError> {
        let mp = self.planned(model)?;

        let fields = mp
            .fields
            .iter()
            .filter(|f| {
                f.ty.relation_target()
                    .is_none_or(|target| self.plan_has(target))
            })
            .map(|f| ObjectField::new(f.name.clone(), boolean_slot()))
            .collect();

        Ok(ExpressionNode::required(Shape::ObjectOf(fields)))
    }

    // Include: a boolean map over the relation fields only.
    pub(super) fn include_body(&self, model: &str) -> Result<ExpressionNode, ComposeError> {
        let mp = self.planned(model)?;

        let fields = mp
            .fields
            .iter()
            .filter(|f| {
                f.ty.relation_target()
                    .is_some_and(|target| self.plan_has(target))
            })
            .map(|f| ObjectField::new(f.name.clone(), boolean_slot()))
            .collect();

        Ok(ExpressionNode::required(Shape::ObjectOf(fields)))
    }

    fn plan_has(&self, model: &str) -> bool {
        self.planned(model).is_ok()
    }
}

// `T | T[]`, each member required, the slot itself omittable.
fn one_or_many(key: ShapeKey) -> ExpressionNode {
    let single = ExpressionNode::required(Shape::Reference(key));
    ExpressionNode::optional(Shape::UnionOf(vec![
        single.clone(),
        ExpressionNode::required(Shape::ArrayOf(Box::new(single))),
    ]))
}

// Relation traversal slots: some/every/none for lists, is/isNot for
// to-one. Never nullable, like every relation-shaped node.
fn relation_filter(target_where: &ShapeKey, is_list: bool) -> ExpressionNode {
    let slot = || {
        ExpressionNode::reference(target_where.clone(), Optionality::OptionalOnly)
    };

    let names: &[&str] = if is_list {
        &["some", "every", "none"]
    } else {
        &["is", "isNot"]
    };

    ExpressionNode::optional(Shape::ObjectOf(
        names
            .iter()
            .map(|name| ObjectField::new(*name, slot()))
            .collect(),
    ))
}

fn boolean_slot() -> ExpressionNode {
    ExpressionNode::optional(Shape::primitive(PrimitiveKind::Boolean))
}
