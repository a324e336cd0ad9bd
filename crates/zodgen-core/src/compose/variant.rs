use crate::{
    compose::{ComposeError, Composer},
    config::VariantRole,
    expr::{ExpressionNode, ObjectField, Shape, ShapeKey},
    optionality::resolve_field,
    report::Report,
};
use zodgen_schema::node::FieldDescriptor;

impl Composer<'_> {
    // One (model, variant) object body over the plan's surviving fields,
    // minus the variant's own exclusions. Relation policy is the variant
    // role: bare omits, result defers to the target's result variant,
    // input expands into the nested relation-operation object.
    pub(super) fn variant_body(
        &mut self,
        model: &str,
        variant_name: &str,
        report: &mut Report,
    ) -> Result<ExpressionNode, ComposeError> {
        let spec = self
            .config
            .variant(variant_name)
            .ok_or_else(|| ComposeError::MissingSpec(variant_name.to_string()))?;
        let role = spec.role;
        let exclude = spec.exclude_fields.clone();

        let planned_fields: Vec<&FieldDescriptor> = self
            .planned(model)?
            .fields
            .iter()
            .copied()
            .filter(|f| !exclude.contains(&f.name))
            .collect();

        let mut fields = Vec::new();
        for field in planned_fields {
            let node = match role {
                VariantRole::Bare => {
                    if field.is_relation_shaped() {
                        continue;
                    }
                    self.field_expr(model, field, report)?
                }
                VariantRole::Result => {
                    if field.is_relation_shaped() {
                        match self.result_relation_node(field) {
                            Some(node) => node,
                            None => continue,
                        }
                    } else {
                        self.field_expr(model, field, report)?
                    }
                }
                VariantRole::Input => {
                    // generated identity is never client-supplied
                    if field.is_id {
                        continue;
                    }
                    if field.is_relation_shaped() {
                        match self.relation_input(field, variant_name) {
                            Some(node) => node,
                            None => continue,
                        }
                    } else {
                        self.field_expr(model, field, report)?
                    }
                }
            };

            fields.push(ObjectField::new(field.name.clone(), node));
        }

        Ok(ExpressionNode::required(Shape::ObjectOf(fields)))
    }

    // A result-variant relation: a deferred reference to the target's
    // result shape, wrapped in an array for list relations. Optionality
    // follows the field but is never nullable.
    fn result_relation_node(&self, field: &FieldDescriptor) -> Option<ExpressionNode> {
        let target = field.ty.relation_target()?;
        let result_name = self.config.result_variant()?.name.clone();

        let key = ShapeKey::variant(target, result_name);
        if !self.registry().contains(&key) {
            return None;
        }

        let optionality = resolve_field(field).optionality;
        let node = if field.is_list {
            ExpressionNode::new(
                Shape::ArrayOf(Box::new(ExpressionNode::required(Shape::Reference(key)))),
                optionality,
            )
        } else {
            ExpressionNode::reference(key, optionality)
        };

        Some(node)
    }
}
