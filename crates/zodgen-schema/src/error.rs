use serde::Serialize;
use std::{collections::BTreeMap, fmt};

///
/// ErrorTree
///
/// Accumulates validation messages, optionally keyed by a route
/// (model, model.field, enum name). Callers collect every failure in a
/// pass and convert to a hard error once at the end via [`result`].
///
/// [`result`]: ErrorTree::result
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct ErrorTree {
    errors: Vec<String>,
    routes: BTreeMap<String, Vec<String>>,
}

impl ErrorTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an unrouted message.
    pub fn add(&mut self, message: impl fmt::Display) {
        self.errors.push(message.to_string());
    }

    /// Record a message under a route key.
    pub fn add_at(&mut self, route: impl Into<String>, message: impl fmt::Display) {
        self.routes
            .entry(route.into())
            .or_default()
            .push(message.to_string());
    }

    /// Fold another tree into this one, keeping route grouping.
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
        for (route, messages) in other.routes {
            self.routes.entry(route).or_default().extend(messages);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.routes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len() + self.routes.values().map(Vec::len).sum::<usize>()
    }

    /// Collapse into a result: `Ok` when nothing was recorded.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for message in &self.errors {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{message}")?;
            first = false;
        }
        for (route, messages) in &self.routes {
            for message in messages {
                if !first {
                    writeln!(f)?;
                }
                write!(f, "{route}: {message}")?;
                first = false;
            }
        }

        Ok(())
    }
}

impl std::error::Error for ErrorTree {}

///
/// err
/// Format a message and record it on an [`ErrorTree`].
///

#[macro_export]
macro_rules! err {
    ($errs:expr, $($arg:tt)+) => {
        $errs.add(format!($($arg)+))
    };
}

///
/// TESTS
///
