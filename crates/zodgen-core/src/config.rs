use crate::report::{Report, WarningKind};
use convert_case::{Case, Casing};
use derive_more::Display;
use serde::Deserialize;
use std::{
    collections::{BTreeMap, BTreeSet},
    str::FromStr,
};

///
/// DecimalMode
/// How decimal scalars are represented in the generated dialect.
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
#[remain::sorted]
pub enum DecimalMode {
    #[default]
    #[display("decimal")]
    Decimal,
    #[display("number")]
    Number,
    #[display("string")]
    String,
}

impl FromStr for DecimalMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "decimal" => Ok(Self::Decimal),
            "number" => Ok(Self::Number),
            "string" => Ok(Self::String),
            _ => Err(()),
        }
    }
}

///
/// DateTimeStrategy
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
#[remain::sorted]
pub enum DateTimeStrategy {
    #[default]
    #[display("coerce")]
    Coerce,
    #[display("date")]
    Date,
    #[display("isoString")]
    IsoString,
}

impl FromStr for DateTimeStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "coerce" => Ok(Self::Coerce),
            "date" => Ok(Self::Date),
            "isoString" => Ok(Self::IsoString),
            _ => Err(()),
        }
    }
}

///
/// BinaryMode
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
#[remain::sorted]
pub enum BinaryMode {
    #[display("base64")]
    Base64,
    #[default]
    #[display("bytes")]
    Bytes,
}

impl FromStr for BinaryMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base64" => Ok(Self::Base64),
            "bytes" => Ok(Self::Bytes),
            _ => Err(()),
        }
    }
}

///
/// RawConfig
///
/// The configuration surface exactly as the user supplies it. Every field
/// is optional; unknown mode strings and conflicting flags degrade to
/// documented defaults during normalization rather than aborting the run.
///

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawConfig {
    pub variants: BTreeMap<String, RawVariantSpec>,
    pub emit: RawEmitFlags,
    pub models: BTreeMap<String, RawModelSpec>,
    pub global_exclusions: Vec<String>,
    pub decimal_mode: Option<String>,
    pub date_time_strategy: Option<String>,
    pub binary_mode: Option<String>,
    pub select_shapes: Option<bool>,
    pub include_shapes: Option<bool>,
    pub minimal: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawVariantSpec {
    pub enabled: Option<bool>,
    pub suffix: Option<String>,
    pub exclude_fields: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawEmitFlags {
    pub enums: Option<bool>,
    pub objects: Option<bool>,
    pub crud: Option<bool>,
    pub results: Option<bool>,
    pub pure_models: Option<bool>,
    pub variants: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawModelSpec {
    pub enabled: Option<bool>,
    pub operations: Option<Vec<String>>,
    pub fields: RawFieldSpec,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawFieldSpec {
    pub include: Option<Vec<String>>,
    pub exclude: Vec<String>,
}

///
/// VariantRole
///
/// Relation policy of a variant: bare shapes omit relations, input shapes
/// expand them into relation-operation objects, result shapes keep them as
/// deferred nested references.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[remain::sorted]
pub enum VariantRole {
    Bare,
    Input,
    Result,
}

///
/// VariantSpec
///

#[derive(Clone, Debug)]
pub struct VariantSpec {
    pub name: String,
    pub role: VariantRole,
    pub suffix: String,
    pub enabled: bool,
    pub exclude_fields: BTreeSet<String>,
}

///
/// ModelFilterSpec
///
/// Per-model filtering as normalized from configuration. Operation names
/// stay raw here: they are resolved (and unknown names warned about) only
/// for enabled models, so a disabled model's stale list stays silent.
///

#[derive(Clone, Debug, Default)]
pub struct ModelFilterSpec {
    pub enabled: bool,
    pub operations: Option<Vec<String>>,
    pub exclude_patterns: Vec<String>,
    pub include_patterns: Option<Vec<String>>,
}

///
/// EmitFlags
/// Category gates applied on top of per-model filtering.
///

#[derive(Clone, Copy, Debug)]
pub struct EmitFlags {
    pub enums: bool,
    pub objects: bool,
    pub crud: bool,
    pub results: bool,
    pub pure_models: bool,
    pub variants: bool,
}

impl Default for EmitFlags {
    fn default() -> Self {
        Self {
            enums: true,
            objects: true,
            crud: true,
            results: true,
            pure_models: true,
            variants: true,
        }
    }
}

///
/// GeneratorConfig
///
/// The single immutable configuration value threaded through every phase.
/// The whole pipeline is a pure function of (descriptors, config).
///

#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub variants: Vec<VariantSpec>,
    pub emit: EmitFlags,
    pub models: BTreeMap<String, ModelFilterSpec>,
    pub global_exclusions: Vec<String>,
    pub decimal_mode: DecimalMode,
    pub date_time_strategy: DateTimeStrategy,
    pub binary_mode: BinaryMode,
    pub select_shapes: bool,
    pub include_shapes: bool,
    pub minimal: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::from_raw(RawConfig::default(), &mut Report::new())
    }
}

impl GeneratorConfig {
    /// Normalize a raw configuration, degrading unknown or conflicting
    /// values to defaults and recording each degradation.
    #[must_use]
    pub fn from_raw(raw: RawConfig, report: &mut Report) -> Self {
        let decimal_mode = parse_mode(raw.decimal_mode, "decimalMode", report);
        let date_time_strategy = parse_mode(raw.date_time_strategy, "dateTimeStrategy", report);
        let binary_mode = parse_mode(raw.binary_mode, "binaryMode", report);

        // Minimal mode wins over explicitly enabled selection shapes.
        let mut select_shapes = raw.select_shapes.unwrap_or(true);
        let mut include_shapes = raw.include_shapes.unwrap_or(true);
        if raw.minimal {
            if raw.select_shapes == Some(true) {
                report.warn(
                    WarningKind::Minimal,
                    "selectShapes",
                    "minimal mode disables selection shapes; flag ignored",
                );
            }
            if raw.include_shapes == Some(true) {
                report.warn(
                    WarningKind::Minimal,
                    "includeShapes",
                    "minimal mode disables inclusion shapes; flag ignored",
                );
            }
            select_shapes = false;
            include_shapes = false;
        }

        let variants = build_variants(&raw.variants);

        let models = raw
            .models
            .into_iter()
            .map(|(name, spec)| {
                (
                    name,
                    ModelFilterSpec {
                        enabled: spec.enabled.unwrap_or(true),
                        operations: spec.operations,
                        exclude_patterns: spec.fields.exclude,
                        include_patterns: spec.fields.include,
                    },
                )
            })
            .collect();

        Self {
            variants,
            emit: EmitFlags {
                enums: raw.emit.enums.unwrap_or(true),
                objects: raw.emit.objects.unwrap_or(true),
                crud: raw.emit.crud.unwrap_or(true),
                results: raw.emit.results.unwrap_or(true),
                pure_models: raw.emit.pure_models.unwrap_or(true),
                variants: raw.emit.variants.unwrap_or(true),
            },
            models,
            global_exclusions: raw.global_exclusions,
            decimal_mode,
            date_time_strategy,
            binary_mode,
            select_shapes,
            include_shapes,
            minimal: raw.minimal,
        }
    }

    #[must_use]
    pub fn variant(&self, name: &str) -> Option<&VariantSpec> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// The enabled input-role variant, if any survives emit gating.
    #[must_use]
    pub fn input_variant(&self) -> Option<&VariantSpec> {
        self.variants
            .iter()
            .find(|v| v.role == VariantRole::Input && v.enabled && self.emit.objects)
    }

    /// The enabled result-role variant, if any survives emit gating.
    #[must_use]
    pub fn result_variant(&self) -> Option<&VariantSpec> {
        self.variants
            .iter()
            .find(|v| v.role == VariantRole::Result && v.enabled && self.emit.results)
    }

    /// Whether a variant survives both its own flag and the emit gates.
    #[must_use]
    pub fn variant_emitted(&self, spec: &VariantSpec) -> bool {
        if !spec.enabled {
            return false;
        }
        match spec.role {
            VariantRole::Input => self.emit.objects,
            VariantRole::Result => self.emit.results,
            VariantRole::Bare if spec.name == "pure" => self.emit.pure_models,
            VariantRole::Bare => self.emit.variants,
        }
    }

    #[must_use]
    pub fn model_filter(&self, name: &str) -> Option<&ModelFilterSpec> {
        self.models.get(name)
    }

    #[must_use]
    pub fn model_enabled(&self, name: &str) -> bool {
        self.models.get(name).is_none_or(|m| m.enabled)
    }
}

// Builtin variant definitions overlaid with user entries; unknown names
// become custom bare variants in deterministic (map) order.
fn build_variants(raw: &BTreeMap<String, RawVariantSpec>) -> Vec<VariantSpec> {
    const BUILTIN: [(&str, VariantRole, &str); 3] = [
        ("pure", VariantRole::Bare, ""),
        ("input", VariantRole::Input, "Input"),
        ("result", VariantRole::Result, "Result"),
    ];

    let mut variants: Vec<VariantSpec> = BUILTIN
        .iter()
        .map(|(name, role, suffix)| {
            let user = raw.get(*name);
            VariantSpec {
                name: (*name).to_string(),
                role: *role,
                suffix: user
                    .and_then(|u| u.suffix.clone())
                    .unwrap_or_else(|| (*suffix).to_string()),
                enabled: user.and_then(|u| u.enabled).unwrap_or(true),
                exclude_fields: user
                    .map(|u| u.exclude_fields.iter().cloned().collect())
                    .unwrap_or_default(),
            }
        })
        .collect();

    for (name, user) in raw {
        if BUILTIN.iter().any(|(builtin, ..)| builtin == name) {
            continue;
        }
        variants.push(VariantSpec {
            name: name.clone(),
            role: VariantRole::Bare,
            suffix: user
                .suffix
                .clone()
                .unwrap_or_else(|| name.to_case(Case::Pascal)),
            enabled: user.enabled.unwrap_or(true),
            exclude_fields: user.exclude_fields.iter().cloned().collect(),
        });
    }

    variants
}

// Parse an optional mode string, warning and defaulting on unknown values.
fn parse_mode<T>(raw: Option<String>, key: &str, report: &mut Report) -> T
where
    T: Default + FromStr + std::fmt::Display,
{
    let Some(raw) = raw else {
        return T::default();
    };

    raw.parse().unwrap_or_else(|_| {
        let fallback = T::default();
        report.warn(
            WarningKind::Config,
            key,
            format!("unknown value '{raw}', using '{fallback}'"),
        );
        fallback
    })
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_all_builtin_variants() {
        let config = GeneratorConfig::default();

        assert_eq!(config.variants.len(), 3);
        assert!(config.variants.iter().all(|v| v.enabled));
        assert_eq!(config.decimal_mode, DecimalMode::Decimal);
        assert_eq!(config.date_time_strategy, DateTimeStrategy::Coerce);
        assert_eq!(config.binary_mode, BinaryMode::Bytes);
        assert!(config.select_shapes);
    }

    #[test]
    fn unknown_mode_degrades_with_warning() {
        let raw = RawConfig {
            decimal_mode: Some("bignum".to_string()),
            ..RawConfig::default()
        };

        let mut report = Report::new();
        let config = GeneratorConfig::from_raw(raw, &mut report);

        assert_eq!(config.decimal_mode, DecimalMode::Decimal);
        assert_eq!(report.len(), 1);
        assert!(report.has_kind(WarningKind::Config));
    }

    #[test]
    fn minimal_overrides_explicit_selection_flags() {
        let raw = RawConfig {
            minimal: true,
            select_shapes: Some(true),
            ..RawConfig::default()
        };

        let mut report = Report::new();
        let config = GeneratorConfig::from_raw(raw, &mut report);

        assert!(!config.select_shapes);
        assert!(!config.include_shapes);
        assert!(report.has_kind(WarningKind::Minimal));
    }

    #[test]
    fn custom_variant_gets_pascal_suffix() {
        let mut variants = BTreeMap::new();
        variants.insert("trimmed".to_string(), RawVariantSpec::default());
        let raw = RawConfig {
            variants,
            ..RawConfig::default()
        };

        let config = GeneratorConfig::from_raw(raw, &mut Report::new());
        let custom = config.variant("trimmed").unwrap();

        assert_eq!(custom.role, VariantRole::Bare);
        assert_eq!(custom.suffix, "Trimmed");
    }

    #[test]
    fn config_round_trips_from_json() {
        let raw: RawConfig = serde_json::from_str(
            r#"{
                "variants": { "input": { "enabled": false } },
                "models": { "User": { "operations": ["findMany"], "fields": { "exclude": ["secret*"] } } },
                "globalExclusions": ["*Internal"],
                "dateTimeStrategy": "isoString",
                "minimal": false
            }"#,
        )
        .unwrap();

        let config = GeneratorConfig::from_raw(raw, &mut Report::new());
        assert!(!config.variant("input").unwrap().enabled);
        assert_eq!(config.date_time_strategy, DateTimeStrategy::IsoString);
        assert_eq!(config.global_exclusions, vec!["*Internal".to_string()]);
        assert_eq!(
            config.model_filter("User").unwrap().exclude_patterns,
            vec!["secret*".to_string()]
        );
    }
}
