use crate::{
    config::GeneratorConfig,
    report::{Report, WarningKind},
};
use derive_more::Display;
use serde::Serialize;
use std::{collections::BTreeSet, str::FromStr};
use zodgen_schema::node::{DescriptorSet, EnumDescriptor, FieldDescriptor, ModelDescriptor};

///
/// OperationKind
///
/// The fixed known-operation vocabulary. Configuration may carry names
/// outside this set; those are dropped with a warning, never fatal.
///

#[derive(Clone, Copy, Debug, Display, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[remain::sorted]
pub enum OperationKind {
    #[display("aggregate")]
    Aggregate,
    #[display("create")]
    Create,
    #[display("createMany")]
    CreateMany,
    #[display("delete")]
    Delete,
    #[display("deleteMany")]
    DeleteMany,
    #[display("findFirst")]
    FindFirst,
    #[display("findMany")]
    FindMany,
    #[display("findUnique")]
    FindUnique,
    #[display("groupBy")]
    GroupBy,
    #[display("update")]
    Update,
    #[display("updateMany")]
    UpdateMany,
    #[display("upsert")]
    Upsert,
}

impl OperationKind {
    pub const ALL: [Self; 12] = [
        Self::Aggregate,
        Self::Create,
        Self::CreateMany,
        Self::Delete,
        Self::DeleteMany,
        Self::FindFirst,
        Self::FindMany,
        Self::FindUnique,
        Self::GroupBy,
        Self::Update,
        Self::UpdateMany,
        Self::Upsert,
    ];

    /// Reduced set forced by minimal mode.
    pub const MINIMAL: [Self; 6] = [
        Self::Create,
        Self::Delete,
        Self::FindFirst,
        Self::FindMany,
        Self::FindUnique,
        Self::Update,
    ];

    /// Operations whose argument shape embeds the model's input variant.
    #[must_use]
    pub const fn requires_input_object(self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Upsert)
    }
}

impl FromStr for OperationKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s {
            "aggregate" => Self::Aggregate,
            "create" => Self::Create,
            "createMany" => Self::CreateMany,
            "delete" => Self::Delete,
            "deleteMany" => Self::DeleteMany,
            "findFirst" => Self::FindFirst,
            "findMany" => Self::FindMany,
            "findUnique" => Self::FindUnique,
            "groupBy" => Self::GroupBy,
            "update" => Self::Update,
            "updateMany" => Self::UpdateMany,
            "upsert" => Self::Upsert,
            _ => return Err(()),
        };

        Ok(op)
    }
}

///
/// Pattern
///
/// Field-exclusion pattern: an exact name, or a single `*` bound to the
/// start or end of a literal. Anything else is malformed and matches
/// nothing.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Pattern {
    Exact(String),
    Prefix(String),
    Suffix(String),
}

impl Pattern {
    /// Parse a raw pattern; `None` for malformed wildcards (embedded or
    /// repeated `*`).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let stars = raw.matches('*').count();
        match stars {
            0 => Some(Self::Exact(raw.to_string())),
            1 if raw == "*" => Some(Self::Prefix(String::new())),
            1 if raw.ends_with('*') => Some(Self::Prefix(raw[..raw.len() - 1].to_string())),
            1 if raw.starts_with('*') => Some(Self::Suffix(raw[1..].to_string())),
            _ => None,
        }
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(exact) => name == exact,
            Self::Prefix(prefix) => name.starts_with(prefix),
            Self::Suffix(suffix) => name.ends_with(suffix),
        }
    }
}

///
/// ModelPlan
/// One enabled model with its surviving fields (order-preserving) and
/// resolved operation set.
///

#[derive(Debug)]
pub struct ModelPlan<'a> {
    pub model: &'a ModelDescriptor,
    pub fields: Vec<&'a FieldDescriptor>,
    pub operations: BTreeSet<OperationKind>,
}

impl ModelPlan<'_> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.model.name
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().copied().find(|f| f.name == name)
    }

    #[must_use]
    pub fn has_relation_fields(&self) -> bool {
        self.fields.iter().any(|f| f.is_relation_shaped())
    }
}

///
/// GenerationPlan
/// The filter engine's outcome: which models, fields, and operations the
/// composer will build, in declaration order.
///

#[derive(Debug)]
pub struct GenerationPlan<'a> {
    pub models: Vec<ModelPlan<'a>>,
    pub enums: Vec<&'a EnumDescriptor>,
}

impl GenerationPlan<'_> {
    #[must_use]
    pub fn model(&self, name: &str) -> Option<&ModelPlan<'_>> {
        self.models.iter().find(|m| m.name() == name)
    }

    #[must_use]
    pub fn is_model_enabled(&self, name: &str) -> bool {
        self.model(name).is_some()
    }
}

// A parsed pattern plus bookkeeping for matched-nothing warnings.
struct TrackedPattern {
    raw: String,
    pattern: Pattern,
    matched: bool,
}

fn parse_patterns(raws: &[String], context: &str, report: &mut Report) -> Vec<TrackedPattern> {
    let mut out = Vec::new();
    for raw in raws {
        match Pattern::parse(raw) {
            Some(pattern) => out.push(TrackedPattern {
                raw: raw.clone(),
                pattern,
                matched: false,
            }),
            None => report.warn(
                WarningKind::Pattern,
                context,
                format!("pattern '{raw}' is not an exact name or a single prefix/suffix wildcard; dropped"),
            ),
        }
    }

    out
}

fn any_match(patterns: &mut [TrackedPattern], name: &str) -> bool {
    let mut hit = false;
    for tracked in patterns.iter_mut() {
        if tracked.pattern.matches(name) {
            tracked.matched = true;
            hit = true;
        }
    }

    hit
}

fn warn_unmatched(patterns: &[TrackedPattern], context: &str, report: &mut Report) {
    for tracked in patterns {
        if !tracked.matched {
            report.warn(
                WarningKind::Pattern,
                context,
                format!("pattern '{}' matches no field", tracked.raw),
            );
        }
    }
}

/// Resolve per-model enablement, field survival under exclusion patterns,
/// and the enabled operation set. Never fails; every irregularity degrades
/// with a warning. Disabled models are skipped silently, stale
/// configuration and all.
#[must_use]
pub fn build_plan<'a>(
    set: &'a DescriptorSet,
    config: &GeneratorConfig,
    report: &mut Report,
) -> GenerationPlan<'a> {
    let mut global = parse_patterns(&config.global_exclusions, "globalExclusions", report);
    let mut models = Vec::new();

    for model in &set.models {
        let filter = config.model_filter(&model.name);
        if filter.is_some_and(|f| !f.enabled) {
            continue;
        }

        let mut excludes = filter.map_or_else(Vec::new, |f| {
            parse_patterns(&f.exclude_patterns, &model.name, report)
        });
        let mut includes = filter.and_then(|f| {
            f.include_patterns
                .as_ref()
                .map(|raws| parse_patterns(raws, &model.name, report))
        });

        let mut fields = Vec::new();
        for field in &model.fields {
            // exclusion takes precedence over inclusion
            if any_match(&mut global, &field.name) {
                continue;
            }
            if any_match(&mut excludes, &field.name) {
                continue;
            }
            if let Some(includes) = includes.as_mut()
                && !any_match(includes, &field.name)
            {
                continue;
            }

            fields.push(field);
        }

        warn_unmatched(&excludes, &model.name, report);
        if let Some(includes) = &includes {
            warn_unmatched(includes, &model.name, report);
        }

        let operations = resolve_operations(
            filter.and_then(|f| f.operations.as_deref()),
            &model.name,
            config.minimal,
            report,
        );

        models.push(ModelPlan {
            model,
            fields,
            operations,
        });
    }

    warn_unmatched(&global, "globalExclusions", report);

    GenerationPlan {
        models,
        enums: set.enums.iter().collect(),
    }
}

// Resolve the operation list for one enabled model: unknown names warn and
// drop; minimal mode intersects with its reduced set.
fn resolve_operations(
    raw: Option<&[String]>,
    model: &str,
    minimal: bool,
    report: &mut Report,
) -> BTreeSet<OperationKind> {
    let mut operations: BTreeSet<OperationKind> = match raw {
        None => OperationKind::ALL.into_iter().collect(),
        Some(names) => {
            let mut ops = BTreeSet::new();
            for name in names {
                match name.parse::<OperationKind>() {
                    Ok(op) => {
                        ops.insert(op);
                    }
                    Err(()) => report.warn(
                        WarningKind::Operation,
                        model,
                        format!("unknown operation '{name}'; dropped"),
                    ),
                }
            }
            ops
        }
    };

    if minimal {
        operations.retain(|op| OperationKind::MINIMAL.contains(op));
    }

    operations
}

///
/// TESTS
///
