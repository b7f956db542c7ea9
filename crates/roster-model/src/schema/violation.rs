use std::fmt;

use thiserror::Error;

use crate::schema::KeyPath;

/// A single way in which a document failed to satisfy a [`Schema`](crate::Schema).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A required key is absent from the document.
    MissingKey { path: KeyPath },
    /// A mapping was required at this path but the document holds a non-mapping value.
    ShapeMismatch { path: KeyPath },
}

impl Violation {
    /// The path the violation refers to.
    pub fn path(&self) -> &KeyPath {
        match self {
            Violation::MissingKey { path } => path,
            Violation::ShapeMismatch { path } => path,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingKey { path } => write!(f, "required key '{path}' not found"),
            Violation::ShapeMismatch { path } => {
                write!(f, "'{path}' must be a mapping")
            }
        }
    }
}

/// Everything wrong with one document, collected in a single validation walk.
///
/// Validation never stops at the first problem: an operator fixing a
/// deployment file should see the complete list at once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.0))]
pub struct SchemaViolations(Vec<Violation>);

impl SchemaViolations {
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        Self(violations)
    }

    /// The individual violations, in document walk order.
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    /// Returns `true` if any violation refers to the given path.
    pub fn mentions(&self, path: &KeyPath) -> bool {
        self.0.iter().any(|v| v.path() == path)
    }
}

fn render(violations: &[Violation]) -> String {
    let parts: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
    parts.join("; ")
}
