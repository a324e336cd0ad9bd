use crate::{
    Error,
    compose::Composer,
    config::{GeneratorConfig, RawConfig},
    expr::ShapeKey,
    filter::build_plan,
    registry::ShapeForest,
    report::Report,
};
use serde::Serialize;
use zodgen_schema::{
    node::{DescriptorSet, EnumDescriptor},
    validate::validate_descriptors,
};

///
/// Generated
///
/// The outbound handoff for one run: the expression-tree forest (one
/// entry per enabled shape, in model-declaration order), the emitted enum
/// declarations, and the accumulated warning report.
///

#[derive(Debug, Serialize)]
pub struct Generated {
    pub schemas: ShapeForest,
    pub enums: Vec<EnumDescriptor>,
    pub report: Report,
}

/// Run the full synthesis pipeline over a descriptor set and a raw user
/// configuration.
///
/// A fatal error (invalid descriptors, unsupported scalar kind) aborts the
/// whole run; partial output is never emitted. Degraded events accumulate
/// on the returned report instead.
pub fn generate(set: &DescriptorSet, raw: RawConfig) -> Result<Generated, Error> {
    let mut report = Report::new();
    let config = GeneratorConfig::from_raw(raw, &mut report);

    run(set, &config, report)
}

/// Like [`generate`], for callers that already hold a normalized
/// configuration.
pub fn generate_with_config(
    set: &DescriptorSet,
    config: &GeneratorConfig,
) -> Result<Generated, Error> {
    run(set, config, Report::new())
}

fn run(
    set: &DescriptorSet,
    config: &GeneratorConfig,
    mut report: Report,
) -> Result<Generated, Error> {
    validate_descriptors(set)?;

    let plan = build_plan(set, config, &mut report);

    let mut composer = Composer::new(set, config, &plan);
    composer.register_shapes(&mut report)?;
    composer.build_shapes(&mut report)?;
    let schemas = composer.finish()?;

    // enum declarations whose schema made it into the forest, in order
    let enums = set
        .enums
        .iter()
        .filter(|decl| schemas.get(&ShapeKey::enumeration(&decl.name)).is_some())
        .cloned()
        .collect();

    Ok(Generated {
        schemas,
        enums,
        report,
    })
}
