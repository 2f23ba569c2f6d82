//! Structured validation issues.
//!
//! Every failed check produces one [`Issue`] carrying a stable
//! machine-readable code, the path of the offending value and a
//! human-readable message.

use std::fmt;

/// Stable issue classification codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueCode {
    /// The runtime type of the value did not match the schema.
    InvalidType,
    /// The value did not equal the expected literal.
    InvalidLiteral,
    /// The value was not one of the allowed enum values.
    InvalidEnumValue,
    /// A strict object received a key it does not declare.
    UnrecognizedKey,
    /// A tuple received a sequence of the wrong length.
    InvalidTupleLength,
    /// Both sides of an intersection succeeded but could not be merged.
    InvalidIntersection,
    /// A refinement predicate rejected the value.
    Custom,
    /// A transformation mapper failed.
    TransformFailed,
    /// A validated value could not be decoded into the typed output.
    OutputMismatch,
}

impl IssueCode {
    /// Returns the stable, machine-readable code string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidType => "schema.invalid_type",
            Self::InvalidLiteral => "schema.invalid_literal",
            Self::InvalidEnumValue => "schema.invalid_enum_value",
            Self::UnrecognizedKey => "schema.unrecognized_key",
            Self::InvalidTupleLength => "schema.invalid_tuple_length",
            Self::InvalidIntersection => "schema.invalid_intersection",
            Self::Custom => "schema.custom",
            Self::TransformFailed => "schema.transform_failed",
            Self::OutputMismatch => "schema.output_mismatch",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step from a parent value into a child value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object field name.
    Key(String),
    /// A sequence position (0-indexed).
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Location of a value relative to the validated root.
///
/// Renders as `$` for the root, `$.user.tags[2]` for nested values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<PathSegment>);

impl Path {
    /// The root path.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns the path segments in root-to-leaf order.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Returns `true` for the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Stable issue code for programmatic handling.
    pub code: IssueCode,
    /// Location of the offending value.
    pub path: Path,
    /// Deterministic human-readable message.
    pub message: String,
}

impl Issue {
    pub(crate) fn new(code: IssueCode, path: &Path, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.clone(),
            message: message.into(),
        }
    }

    /// Renders the issue into a deterministic single-line format suitable
    /// for snapshot tests.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{} | {} | {}", self.code.as_str(), self.path, self.message)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Issue, IssueCode, Path, PathSegment};

    #[rstest]
    #[case::root(Path::root(), "$")]
    #[case::field(["user"].into_iter().collect(), "$.user")]
    #[case::mixed(
        Path::from_iter([PathSegment::from("tags"), PathSegment::Index(2)]),
        "$.tags[2]"
    )]
    fn path_renders_with_dollar_root(#[case] path: Path, #[case] expected: &str) {
        assert_eq!(path.to_string(), expected);
    }

    #[test]
    fn issue_render_is_single_line() {
        let path: Path = ["rank"].into_iter().collect();
        let issue = Issue::new(IssueCode::InvalidType, &path, "expected number");
        assert_eq!(
            issue.render(),
            "schema.invalid_type | $.rank | expected number"
        );
    }
}
