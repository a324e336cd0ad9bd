use crate::{
    compose::{ComposeError, Composer},
    expr::{ExpressionNode, ObjectField, Optionality, PrimitiveKind, Shape, ShapeKey},
    filter::OperationKind,
    report::Report,
    typemap::{AggregationKind, scalar_primitive, supports_aggregation},
};
use zodgen_schema::{
    node::FieldDescriptor,
    types::{FieldType, LiteralValue},
};

impl Composer<'_> {
    // One (model, operation) argument object. Every piece is built from
    // the same plan and the same per-field pipeline as the variants, so
    // excluding a field or disabling a model propagates here identically.
    pub(super) fn operation_body(
        &mut self,
        model: &str,
        op: OperationKind,
        report: &mut Report,
    ) -> Result<ExpressionNode, ComposeError> {
        let mut fields = Vec::new();

        match op {
            OperationKind::FindMany | OperationKind::FindFirst => {
                self.selection_slots(model, &mut fields);
                fields.push(named("where", self.where_slot(model)));
                fields.push(named("orderBy", self.order_by_slot(model)));
                fields.push(named("cursor", self.cursor_slot(model)));
                fields.push(named("take", int_slot()));
                fields.push(named("skip", int_slot()));
                fields.push(named("distinct", self.distinct_slot(model)));
            }
            OperationKind::FindUnique | OperationKind::Delete => {
                self.selection_slots(model, &mut fields);
                fields.push(named("where", self.where_unique_slot(model)));
            }
            OperationKind::Create => {
                self.selection_slots(model, &mut fields);
                fields.push(named("data", self.input_slot(model)?));
            }
            OperationKind::CreateMany => {
                let row = self.scalar_input_object(model, false, report)?;
                fields.push(named(
                    "data",
                    ExpressionNode::required(one_or_many_node(row)),
                ));
                fields.push(named(
                    "skipDuplicates",
                    ExpressionNode::optional(Shape::primitive(PrimitiveKind::Boolean)),
                ));
            }
            OperationKind::Update => {
                self.selection_slots(model, &mut fields);
                fields.push(named("data", self.input_slot(model)?));
                fields.push(named("where", self.where_unique_slot(model)));
            }
            OperationKind::UpdateMany => {
                let row = self.scalar_input_object(model, true, report)?;
                fields.push(named("data", row));
                fields.push(named("where", self.where_slot(model)));
            }
            OperationKind::Upsert => {
                self.selection_slots(model, &mut fields);
                fields.push(named("where", self.where_unique_slot(model)));
                fields.push(named("create", self.input_slot(model)?));
                fields.push(named("update", self.input_slot(model)?));
            }
            OperationKind::DeleteMany => {
                fields.push(named("where", self.where_slot(model)));
            }
            OperationKind::Aggregate => {
                fields.push(named("where", self.where_slot(model)));
                fields.push(named("orderBy", self.order_by_slot(model)));
                fields.push(named("cursor", self.cursor_slot(model)));
                fields.push(named("take", int_slot()));
                fields.push(named("skip", int_slot()));
                fields.extend(self.aggregation_slots(model)?);
            }
            OperationKind::GroupBy => {
                fields.push(named("by", self.by_slot(model)));
                fields.push(named("where", self.where_slot(model)));
                fields.push(named(
                    "having",
                    ExpressionNode::optional(Shape::Reference(ShapeKey::where_filter(model))),
                ));
                fields.push(named("orderBy", self.order_by_slot(model)));
                fields.push(named("take", int_slot()));
                fields.push(named("skip", int_slot()));
                fields.extend(self.aggregation_slots(model)?);
            }
        }

        Ok(ExpressionNode::required(Shape::ObjectOf(fields)))
    }

    fn where_slot(&self, model: &str) -> ExpressionNode {
        ExpressionNode::optional(Shape::Reference(ShapeKey::where_filter(model)))
    }

    fn where_unique_slot(&self, model: &str) -> ExpressionNode {
        ExpressionNode::required(Shape::Reference(ShapeKey::where_unique(model)))
    }

    fn cursor_slot(&self, model: &str) -> ExpressionNode {
        ExpressionNode::optional(Shape::Reference(ShapeKey::where_unique(model)))
    }

    fn order_by_slot(&self, model: &str) -> ExpressionNode {
        let single = ExpressionNode::required(Shape::Reference(ShapeKey::order_by(model)));
        ExpressionNode::optional(one_or_many_node(single))
    }

    fn distinct_slot(&self, model: &str) -> ExpressionNode {
        let single = ExpressionNode::required(Shape::Reference(ShapeKey::field_enum(model)));
        ExpressionNode::optional(one_or_many_node(single))
    }

    // groupBy `by`: the field enum, alone or as a list, required.
    fn by_slot(&self, model: &str) -> ExpressionNode {
        let single = ExpressionNode::required(Shape::Reference(ShapeKey::field_enum(model)));
        ExpressionNode::required(one_or_many_node(single))
    }

    fn input_slot(&self, model: &str) -> Result<ExpressionNode, ComposeError> {
        let input = self
            .config
            .input_variant()
            .ok_or_else(|| ComposeError::MissingSpec("input variant".to_string()))?;

        Ok(ExpressionNode::required(Shape::Reference(
            ShapeKey::variant(model, input.name.clone()),
        )))
    }

    fn selection_slots(&self, model: &str, fields: &mut Vec<ObjectField>) {
        let select = ShapeKey::select(model);
        if self.registry().contains(&select) {
            fields.push(named(
                "select",
                ExpressionNode::optional(Shape::Reference(select)),
            ));
        }
        let include = ShapeKey::include(model);
        if self.registry().contains(&include) {
            fields.push(named(
                "include",
                ExpressionNode::optional(Shape::Reference(include)),
            ));
        }
    }

    // The scalar-only row object used by createMany/updateMany: the same
    // per-field expressions, relations and generated ids left out. With
    // `lift`, required fields become omittable (partial update rows).
    fn scalar_input_object(
        &mut self,
        model: &str,
        lift: bool,
        report: &mut Report,
    ) -> Result<ExpressionNode, ComposeError> {
        let row_fields: Vec<&FieldDescriptor> = self
            .planned(model)?
            .fields
            .iter()
            .copied()
            .filter(|f| !f.is_relation_shaped() && !f.is_id)
            .collect();

        let mut fields = Vec::new();
        for field in row_fields {
            let mut node = self.field_expr(model, field, report)?;
            if lift && node.optionality == Optionality::Required {
                node.optionality = Optionality::OptionalOnly;
            }
            fields.push(ObjectField::new(field.name.clone(), node));
        }

        Ok(ExpressionNode::required(Shape::ObjectOf(fields)))
    }

    // Aggregation selections over the fields whose mapped base kind
    // supports each aggregation, per the fixed applicability table.
    fn aggregation_slots(&self, model: &str) -> Result<Vec<ObjectField>, ComposeError> {
        let mp = self.planned(model)?;

        let mut slots = Vec::new();
        for agg in AggregationKind::ALL {
            let mut members: Vec<ObjectField> = Vec::new();
            if agg == AggregationKind::Count {
                members.push(ObjectField::new(
                    "_all",
                    ExpressionNode::optional(Shape::primitive(PrimitiveKind::Boolean)),
                ));
            }

            for field in &mp.fields {
                if self.field_supports_aggregation(model, field, agg)? {
                    members.push(ObjectField::new(
                        field.name.clone(),
                        ExpressionNode::optional(Shape::primitive(PrimitiveKind::Boolean)),
                    ));
                }
            }

            if members.is_empty() {
                continue;
            }

            slots.push(named(
                &agg.to_string(),
                ExpressionNode::optional(Shape::UnionOf(vec![
                    ExpressionNode::required(Shape::Literal(LiteralValue::Bool(true))),
                    ExpressionNode::required(Shape::ObjectOf(members)),
                ])),
            ));
        }

        Ok(slots)
    }

    fn field_supports_aggregation(
        &self,
        model: &str,
        field: &FieldDescriptor,
        agg: AggregationKind,
    ) -> Result<bool, ComposeError> {
        // list fields can only be counted
        if field.is_list && agg != AggregationKind::Count {
            return Ok(false);
        }

        match &field.ty {
            FieldType::Relation(_) => Ok(false),
            FieldType::Enum(_) => Ok(matches!(
                agg,
                AggregationKind::Count | AggregationKind::Max | AggregationKind::Min
            )),
            FieldType::Scalar(scalar) => {
                let (kind, _) =
                    scalar_primitive(scalar, self.modes).map_err(|source| ComposeError::Field {
                        model: model.to_string(),
                        field: field.name.clone(),
                        source,
                    })?;
                Ok(supports_aggregation(kind, agg))
            }
        }
    }
}

fn named(name: &str, node: ExpressionNode) -> ObjectField {
    ObjectField::new(name, node)
}

fn int_slot() -> ExpressionNode {
    ExpressionNode::optional(Shape::primitive(PrimitiveKind::Int))
}

// `T | T[]` with required members; callers wrap with the slot optionality.
fn one_or_many_node(single: ExpressionNode) -> Shape {
    Shape::UnionOf(vec![
        single.clone(),
        ExpressionNode::required(Shape::ArrayOf(Box::new(single))),
    ])
}
