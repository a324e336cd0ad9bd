use serde::Serialize;
use std::fmt;

///
/// WarningKind
///
/// Degraded-class events. Each proceeds with a documented fallback; none
/// aborts the run.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum WarningKind {
    Annotation,
    Config,
    Minimal,
    Operation,
    Pattern,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Annotation => "annotation",
            Self::Config => "config",
            Self::Minimal => "minimal",
            Self::Operation => "operation",
            Self::Pattern => "pattern",
        };
        write!(f, "{label}")
    }
}

///
/// Warning
///
/// One accumulated degradation: kind, the offending location (model,
/// model.field, or config key), and what fallback was taken.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub context: String,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}): {}", self.kind, self.context, self.message)
    }
}

///
/// Report
///
/// Warnings accumulated over a generation run, surfaced alongside
/// otherwise-successful output.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct Report {
    warnings: Vec<Warning>,
}

impl Report {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(
        &mut self,
        kind: WarningKind,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.warnings.push(Warning {
            kind,
            context: context.into(),
            message: message.into(),
        });
    }

    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// True when any accumulated warning is of the given kind.
    #[must_use]
    pub fn has_kind(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_accumulate_in_order() {
        let mut report = Report::new();
        report.warn(WarningKind::Pattern, "User", "pattern '*x*' is malformed");
        report.warn(WarningKind::Operation, "User", "unknown operation 'findAll'");

        assert_eq!(report.len(), 2);
        assert_eq!(report.warnings()[0].kind, WarningKind::Pattern);
        assert!(report.has_kind(WarningKind::Operation));
        assert!(!report.has_kind(WarningKind::Annotation));
    }

    #[test]
    fn warning_renders_kind_and_context() {
        let mut report = Report::new();
        report.warn(WarningKind::Annotation, "User.email", "unbalanced brackets");

        let rendered = report.warnings()[0].to_string();
        assert_eq!(rendered, "annotation(User.email): unbalanced brackets");
    }
}
