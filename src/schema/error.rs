//! Error types for schema definition and validation.

use std::fmt;

use super::issue::{Issue, Path};

/// Source location attached to an options-document failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Source file or source identifier.
    pub source: String,
    /// 1-indexed line number.
    pub line: usize,
    /// 1-indexed column number.
    pub column: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.line, self.column)
    }
}

/// Errors raised while building a schema or loading validation options.
///
/// These are programmer errors: a schema that fails to build is
/// structurally invalid and no input can be validated against it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// An object schema declared the same field twice.
    #[error("duplicate field '{field}' in object schema")]
    DuplicateField {
        /// The repeated field name.
        field: String,
    },

    /// A union was given fewer than two members.
    #[error("union requires at least 2 members, got {members}")]
    UnionTooSmall {
        /// The number of members supplied.
        members: usize,
    },

    /// An enum was given no allowed values.
    #[error("enum requires at least one allowed value")]
    EmptyEnum,

    /// A built-in check was configured with contradictory bounds.
    #[error("invalid bound: {reason}")]
    InvalidBound {
        /// A human-readable explanation of the contradiction.
        reason: String,
    },

    /// A validation options document could not be loaded.
    #[error("invalid validation options: {message}")]
    Config {
        /// The parser's error message.
        message: String,
        /// Location of the failure when the parser reports one.
        location: Option<SourceLocation>,
    },
}

/// Issues collected by one validation call, in discovery order.
///
/// `Debug` prints the rendered issue lines, so an unwrapped failure reads
/// the same as its `Display` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Issues(Vec<Issue>);

impl Issues {
    pub(crate) const fn new(issues: Vec<Issue>) -> Self {
        Self(issues)
    }

    /// Returns the issues as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Issue] {
        &self.0
    }

    /// Returns the number of issues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no issue was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the issue paths rendered as strings, in order.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.0.iter().map(|issue| issue.path.to_string()).collect()
    }

    /// Consumes the collection, returning the issues.
    #[must_use]
    pub fn into_vec(self) -> Vec<Issue> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Issues {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Debug for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(Issue::render))
            .finish()
    }
}

impl fmt::Display for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(&issue.render())?;
        }
        Ok(())
    }
}

/// Failure outcome of a validation call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The value did not satisfy the schema.
    #[error("validation failed with {count} issue(s):\n{issues}", count = .0.len(), issues = .0)]
    Invalid(Issues),

    /// The schema graph nested deeper than the configured limit.
    #[error("schema nesting exceeded the maximum depth of {limit} at {path}")]
    SchemaTooDeep {
        /// The configured maximum depth.
        limit: usize,
        /// The path at which the limit was reached.
        path: Path,
    },
}

impl ValidationError {
    /// Returns the collected issues, or an empty slice when validation
    /// aborted on the depth limit.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        match self {
            Self::Invalid(issues) => issues.as_slice(),
            Self::SchemaTooDeep { .. } => &[],
        }
    }

    /// Returns `true` when validation aborted on the depth limit.
    #[must_use]
    pub const fn is_schema_too_deep(&self) -> bool {
        matches!(self, Self::SchemaTooDeep { .. })
    }
}

/// Outcome of a validation call: the output value or every issue found.
pub type ValidationResult<T = super::value::Value> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::{Issues, SchemaError, ValidationError};
    use crate::schema::issue::{Issue, IssueCode, Path};

    #[test]
    fn invalid_error_lists_every_issue() {
        let a: Path = ["a"].into_iter().collect();
        let b: Path = ["b"].into_iter().collect();
        let error = ValidationError::Invalid(Issues::new(vec![
            Issue::new(IssueCode::InvalidType, &a, "expected string"),
            Issue::new(IssueCode::InvalidType, &b, "expected number"),
        ]));
        assert_eq!(
            error.to_string(),
            concat!(
                "validation failed with 2 issue(s):\n",
                "schema.invalid_type | $.a | expected string\n",
                "schema.invalid_type | $.b | expected number",
            )
        );
    }

    #[test]
    fn debug_output_shows_rendered_issues() {
        let path: Path = ["rank"].into_iter().collect();
        let error = ValidationError::Invalid(Issues::new(vec![Issue::new(
            IssueCode::InvalidType,
            &path,
            "expected number",
        )]));
        assert_eq!(
            format!("{error:?}"),
            r#"Invalid(["schema.invalid_type | $.rank | expected number"])"#
        );
    }

    #[test]
    fn definition_errors_are_descriptive() {
        let error = SchemaError::UnionTooSmall { members: 1 };
        assert_eq!(
            error.to_string(),
            "union requires at least 2 members, got 1"
        );
    }
}
