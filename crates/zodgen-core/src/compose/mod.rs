mod operation;
mod query;
mod relation;
mod variant;


use crate::{
    annotate::{ParsedAnnotation, parse_annotation},
    config::GeneratorConfig,
    expr::{ExpressionNode, Shape, ShapeKey, ShapeKind},
    filter::{GenerationPlan, ModelPlan, OperationKind},
    merge::merge_directive,
    optionality::resolve_field,
    registry::{RegistryError, ShapeForest, ShapeRegistry},
    report::{Report, WarningKind},
    typemap::{ModeOptions, TypeMapError, base_shape},
};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;
use zodgen_schema::{
    node::{DescriptorSet, FieldDescriptor},
    types::{FieldType, LiteralValue},
};

/// Name of the synthesized ordering enum shared by every orderBy shape.
pub const SORT_ORDER_ENUM: &str = "SortOrder";

///
/// ComposeError
///
/// Fatal composition failures. Type-mapping errors carry the offending
/// model/field, attached here at the driver boundary; registry errors are
/// internal two-phase invariant violations.
///

#[derive(Debug, ThisError)]
pub enum ComposeError {
    #[error("model '{model}', field '{field}': {source}")]
    Field {
        model: String,
        field: String,
        #[source]
        source: TypeMapError,
    },

    #[error("no specification for shape '{0}'")]
    MissingSpec(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

///
/// Composer
///
/// Variant & operation composition over a filter plan. Construction is
/// two-phase: `register_shapes` reserves a registry slot for every shape
/// the plan will build (the barrier), then `build_shapes` fills each body,
/// embedding deferred references instead of inlining cross-model trees.
///

pub struct Composer<'a> {
    set: &'a DescriptorSet,
    config: &'a GeneratorConfig,
    plan: &'a GenerationPlan<'a>,
    modes: ModeOptions,
    registry: ShapeRegistry,

    /// Memoized final per-field expressions, keyed (model, field). Every
    /// variant and operation shape that includes a field shares this one
    /// derivation.
    field_cache: BTreeMap<(String, String), ExpressionNode>,
}

impl<'a> Composer<'a> {
    #[must_use]
    pub fn new(
        set: &'a DescriptorSet,
        config: &'a GeneratorConfig,
        plan: &'a GenerationPlan<'a>,
    ) -> Self {
        Self {
            set,
            config,
            plan,
            modes: ModeOptions::from_config(config),
            registry: ShapeRegistry::new(),
            field_cache: BTreeMap::new(),
        }
    }

    /// Phase 1: register a slot for every shape the plan will produce,
    /// then seal the registry. After this, every cross-reference any body
    /// can embed has a handle.
    pub fn register_shapes(&mut self, report: &mut Report) -> Result<(), ComposeError> {
        self.register_enums(report)?;

        let input_variant = self.config.input_variant().map(|v| v.name.clone());
        let connect_targets = self.connect_targets(input_variant.is_some());
        let mut any_crud = false;

        for mp in &self.plan.models {
            let name = mp.name().to_string();

            for spec in &self.config.variants {
                if self.config.variant_emitted(spec) {
                    self.registry
                        .register(ShapeKey::variant(&name, spec.name.clone()))?;
                }
            }

            let ops = self.resolve_model_ops(mp, input_variant.as_deref(), report);
            if ops.is_empty() {
                if connect_targets.contains(name.as_str()) {
                    self.registry.register(ShapeKey::where_unique(&name))?;
                }
            } else {
                any_crud = true;
                self.registry.register(ShapeKey::where_filter(&name))?;
                self.registry.register(ShapeKey::where_unique(&name))?;
                self.registry.register(ShapeKey::order_by(&name))?;
                self.registry.register(ShapeKey::field_enum(&name))?;
                if self.config.select_shapes {
                    self.registry.register(ShapeKey::select(&name))?;
                }
                if self.config.include_shapes && mp.has_relation_fields() {
                    self.registry.register(ShapeKey::include(&name))?;
                }
                for op in &ops {
                    self.registry.register(ShapeKey::operation(&name, *op))?;
                }
            }
        }

        if any_crud && !self.registry.contains(&ShapeKey::enumeration(SORT_ORDER_ENUM)) {
            self.registry.register(ShapeKey::enumeration(SORT_ORDER_ENUM))?;
        }

        self.registry.seal();

        Ok(())
    }

    /// Phase 2: build every registered body. The registry is read-only as
    /// a reference source here; each slot is written exactly once.
    pub fn build_shapes(&mut self, report: &mut Report) -> Result<(), ComposeError> {
        for key in self.registry.registered_keys() {
            let node = self.build_body(&key, report)?;
            self.registry.fill(&key, node)?;
        }

        Ok(())
    }

    /// Close composition and hand over the immutable forest.
    pub fn finish(self) -> Result<ShapeForest, ComposeError> {
        Ok(self.registry.finish()?)
    }

    // Dispatch one registered key to its body builder.
    fn build_body(
        &mut self,
        key: &ShapeKey,
        report: &mut Report,
    ) -> Result<ExpressionNode, ComposeError> {
        match &key.kind {
            ShapeKind::Enum => Ok(self.enum_body(&key.target)),
            ShapeKind::FieldEnum => self.field_enum_body(&key.target),
            ShapeKind::Include => self.include_body(&key.target),
            ShapeKind::Operation(op) => self.operation_body(&key.target, *op, report),
            ShapeKind::OrderBy => self.order_by_body(&key.target),
            ShapeKind::Select => self.select_body(&key.target),
            ShapeKind::Variant(name) => self.variant_body(&key.target, name, report),
            ShapeKind::Where => self.where_body(&key.target),
            ShapeKind::WhereUnique => self.where_unique_body(&key.target),
        }
    }

    // Enum schemas: the declared value list as a union of literals; the
    // only synthesized enum is the shared sort order.
    fn enum_body(&self, name: &str) -> ExpressionNode {
        let values = self.set.get_enum(name).map_or_else(
            || vec!["asc".to_string(), "desc".to_string()],
            |decl| decl.values.clone(),
        );

        ExpressionNode::required(Shape::UnionOf(
            values
                .into_iter()
                .map(|value| ExpressionNode::required(Shape::Literal(LiteralValue::String(value))))
                .collect(),
        ))
    }

    /// The memoized final expression for a non-relation field: type-mapped
    /// base shape, composed optionality, attached default, and the merged
    /// annotation directive.
    pub(super) fn field_expr(
        &mut self,
        model: &str,
        field: &FieldDescriptor,
        report: &mut Report,
    ) -> Result<ExpressionNode, ComposeError> {
        let cache_key = (model.to_string(), field.name.clone());
        if let Some(node) = self.field_cache.get(&cache_key) {
            return Ok(node.clone());
        }

        let route = format!("{model}.{}", field.name);
        let shape = base_shape(&field.ty, field.is_list, self.modes).map_err(|source| {
            ComposeError::Field {
                model: model.to_string(),
                field: field.name.clone(),
                source,
            }
        })?;

        let resolved = resolve_field(field);

        // A deferred enum reference carries its default on the reference
        // itself; scalar defaults ride on the node.
        let (shape, default) = match (shape, resolved.default) {
            (Shape::Reference(key), Some(default)) => {
                (Shape::ReferenceWithDefault(key, default), None)
            }
            (shape, default) => (shape, default),
        };

        let mut node = ExpressionNode::new(shape, resolved.optionality);
        node.default = default;

        let directive = match field.annotation.as_deref().map(parse_annotation) {
            Some(ParsedAnnotation::Directive(directive)) => Some(directive),
            Some(ParsedAnnotation::Malformed { reason }) => {
                report.warn(WarningKind::Annotation, &route, reason);
                None
            }
            Some(ParsedAnnotation::Missing) | None => None,
        };

        let outcome = merge_directive(node, directive);
        if let Some(reason) = outcome.degraded {
            report.warn(WarningKind::Annotation, &route, reason);
        }

        self.field_cache.insert(cache_key, outcome.node.clone());

        Ok(outcome.node)
    }

    // Look up a planned model for a registered key target.
    pub(super) fn planned(&self, model: &str) -> Result<&ModelPlan<'a>, ComposeError> {
        self.plan
            .model(model)
            .ok_or_else(|| ComposeError::MissingSpec(model.to_string()))
    }

    pub(super) const fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    // Register declared enum schemas: all of them under the enums gate,
    // or only the referenced ones (with a warning) when the gate is off.
    fn register_enums(&mut self, report: &mut Report) -> Result<(), ComposeError> {
        let mut referenced = BTreeSet::new();
        for mp in &self.plan.models {
            for field in &mp.fields {
                if let FieldType::Enum(name) = &field.ty {
                    referenced.insert(name.as_str());
                }
            }
        }

        for decl in &self.plan.enums {
            let used = referenced.contains(decl.name.as_str());
            if !self.config.emit.enums {
                if !used {
                    continue;
                }
                report.warn(
                    WarningKind::Config,
                    &decl.name,
                    "enum emission is disabled but the enum is referenced by an enabled field; keeping its schema",
                );
            }
            self.registry.register(ShapeKey::enumeration(&decl.name))?;
        }

        Ok(())
    }

    // Models that appear as relation targets of enabled models; their
    // whereUnique shape is needed as a connect handle even without crud.
    fn connect_targets(&self, input_emitted: bool) -> BTreeSet<String> {
        let mut targets = BTreeSet::new();
        if !input_emitted {
            return targets;
        }

        for mp in &self.plan.models {
            for field in &mp.fields {
                if let Some(target) = field.ty.relation_target()
                    && self.plan.is_model_enabled(target)
                {
                    targets.insert(target.to_string());
                }
            }
        }

        targets
    }

    // Apply emit gating and the input-variant dependency to one model's
    // planned operations.
    fn resolve_model_ops(
        &self,
        mp: &ModelPlan<'_>,
        input_variant: Option<&str>,
        report: &mut Report,
    ) -> BTreeSet<OperationKind> {
        if !self.config.emit.crud {
            return BTreeSet::new();
        }

        let mut ops = mp.operations.clone();
        if input_variant.is_none() {
            let dropped: Vec<OperationKind> = ops
                .iter()
                .copied()
                .filter(|op| op.requires_input_object())
                .collect();
            if !dropped.is_empty() {
                report.warn(
                    WarningKind::Operation,
                    mp.name(),
                    format!(
                        "operations [{}] require input objects, which are disabled; dropped",
                        dropped
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                );
                ops.retain(|op| !op.requires_input_object());
            }
        }

        ops
    }
}
