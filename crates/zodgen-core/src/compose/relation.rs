use crate::{
    compose::Composer,
    expr::{ExpressionNode, ObjectField, PrimitiveKind, Shape, ShapeKey},
    optionality::{RELATION_SLOT, resolve_field},
};
use zodgen_schema::node::FieldDescriptor;

impl Composer<'_> {
    // The nested relation-operation object embedded in an input variant:
    // create/connect/connectOrCreate/update/upsert slots, plus set for
    // list relations and disconnect/delete where detaching is legal.
    // Every slot is optional-only and every cross-model use is a deferred
    // registry reference; a slot whose handles are not registered is
    // simply omitted. Returns None when nothing can be nested.
    pub(super) fn relation_input(
        &self,
        field: &FieldDescriptor,
        input_variant: &str,
    ) -> Option<ExpressionNode> {
        let target = field.ty.relation_target()?;
        if !self.plan.is_model_enabled(target) {
            return None;
        }

        let input_key = ShapeKey::variant(target, input_variant);
        let unique_key = ShapeKey::where_unique(target);
        let has_input = self.registry().contains(&input_key);
        let has_unique = self.registry().contains(&unique_key);

        let mut slots = Vec::new();

        if has_input {
            slots.push(slot("create", reference(&input_key), field.is_list));
        }
        if has_unique {
            slots.push(slot("connect", reference(&unique_key), field.is_list));
        }
        if has_input && has_unique {
            slots.push(slot(
                "connectOrCreate",
                object(vec![
                    ("where", reference(&unique_key)),
                    ("create", reference(&input_key)),
                ]),
                field.is_list,
            ));
            slots.push(slot(
                "update",
                object(vec![
                    ("where", reference(&unique_key)),
                    ("data", reference(&input_key)),
                ]),
                field.is_list,
            ));
            slots.push(slot(
                "upsert",
                object(vec![
                    ("where", reference(&unique_key)),
                    ("create", reference(&input_key)),
                    ("update", reference(&input_key)),
                ]),
                field.is_list,
            ));
        }

        if field.is_list {
            if has_unique {
                slots.push(slot("set", reference(&unique_key), true));
                slots.push(slot("disconnect", reference(&unique_key), true));
                slots.push(slot("delete", reference(&unique_key), true));
            }
        } else if !field.is_required {
            // detaching is only legal when the relation itself is optional
            slots.push(ObjectField::new(
                "disconnect",
                ExpressionNode::new(Shape::primitive(PrimitiveKind::Boolean), RELATION_SLOT),
            ));
            slots.push(ObjectField::new(
                "delete",
                ExpressionNode::new(Shape::primitive(PrimitiveKind::Boolean), RELATION_SLOT),
            ));
        }

        if slots.is_empty() {
            return None;
        }

        // a list relation is always omittable on input, whatever the
        // descriptor's requiredness says about the read side
        let optionality = if field.is_list {
            RELATION_SLOT
        } else {
            resolve_field(field).optionality
        };

        Some(ExpressionNode::new(Shape::ObjectOf(slots), optionality))
    }
}

// One relation-operation slot: `shape | shape[]` for list relations,
// always optional-only.
fn slot(name: &str, inner: ExpressionNode, is_list: bool) -> ObjectField {
    let shape = if is_list {
        Shape::UnionOf(vec![
            inner.clone(),
            ExpressionNode::required(Shape::ArrayOf(Box::new(inner))),
        ])
    } else {
        inner.shape
    };

    ObjectField::new(name, ExpressionNode::new(shape, RELATION_SLOT))
}

fn reference(key: &ShapeKey) -> ExpressionNode {
    ExpressionNode::required(Shape::Reference(key.clone()))
}

fn object(fields: Vec<(&str, ExpressionNode)>) -> ExpressionNode {
    ExpressionNode::required(Shape::ObjectOf(
        fields
            .into_iter()
            .map(|(name, node)| ObjectField::new(name, node))
            .collect(),
    ))
}
