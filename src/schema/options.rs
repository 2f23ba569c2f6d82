//! Per-call validation options and their YAML loader.
//!
//! Options are plain data: they can be built in code or loaded from a small
//! YAML document. Keys are accepted in `TitleCase` or lowercase and unknown
//! keys are rejected.
//!
//! ```yaml
//! Strict: true
//! MaxDepth: 64
//! ```

use serde::Deserialize;

use super::error::{SchemaError, SourceLocation};

/// Default maximum schema nesting depth for a validation call.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Synthetic source identifier used by [`ValidationOptions::from_yaml`].
const INLINE_SOURCE: &str = "<inline>";

/// Options controlling a single validation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ValidationOptions {
    /// When `true`, every object that would strip unknown keys rejects them
    /// instead.
    #[serde(rename = "Strict", alias = "strict")]
    pub strict: bool,

    /// Maximum number of nested schema nodes entered before validation
    /// aborts with [`super::ValidationError::SchemaTooDeep`].
    #[serde(rename = "MaxDepth", alias = "max_depth")]
    pub max_depth: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            strict: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ValidationOptions {
    /// Returns a copy with strict unknown-key handling set.
    #[must_use]
    pub const fn with_strict(self, strict: bool) -> Self {
        Self { strict, ..self }
    }

    /// Returns a copy with the given maximum depth.
    #[must_use]
    pub const fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    /// Loads options from a YAML document.
    ///
    /// Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Config`] if the YAML is malformed or contains
    /// unknown keys or wrongly-typed values.
    ///
    /// # Examples
    ///
    ///     use schemata::schema::ValidationOptions;
    ///
    ///     let options = ValidationOptions::from_yaml("strict: true").unwrap();
    ///     assert!(options.strict);
    ///     assert_eq!(options.max_depth, 128);
    pub fn from_yaml(input: &str) -> Result<Self, SchemaError> {
        Self::from_yaml_with_source(INLINE_SOURCE, input)
    }

    /// Loads options from YAML and records failures against an explicit
    /// source identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Config`] when parsing or deserialization
    /// fails.
    pub fn from_yaml_with_source(source: &str, input: &str) -> Result<Self, SchemaError> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_saphyr::from_str(input).map_err(|error| {
            let message = first_line(&error.to_string());
            let location = error
                .location()
                .map(|location| location_for_source(source, location));
            tracing::debug!(%source, %message, "rejected validation options");
            SchemaError::Config { message, location }
        })
    }
}

fn location_for_source(source: &str, location: serde_saphyr::Location) -> SourceLocation {
    let line = usize::try_from(location.line()).ok().unwrap_or(usize::MAX);
    let column = usize::try_from(location.column())
        .ok()
        .unwrap_or(usize::MAX);
    SourceLocation {
        source: source.to_owned(),
        line,
        column,
    }
}

fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or(message).to_owned()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{DEFAULT_MAX_DEPTH, ValidationOptions};
    use crate::schema::SchemaError;

    #[rstest]
    #[case::title_case("Strict: true\nMaxDepth: 8\n", true, 8)]
    #[case::lowercase("strict: false\nmax_depth: 16\n", false, 16)]
    #[case::partial("strict: true\n", true, DEFAULT_MAX_DEPTH)]
    #[case::empty("", false, DEFAULT_MAX_DEPTH)]
    fn options_load_from_yaml(
        #[case] yaml: &str,
        #[case] strict: bool,
        #[case] max_depth: usize,
    ) {
        let options = ValidationOptions::from_yaml(yaml).expect("should load");
        assert_eq!(options.strict, strict);
        assert_eq!(options.max_depth, max_depth);
    }

    #[test]
    fn unknown_option_key_is_rejected_with_location() {
        let result = ValidationOptions::from_yaml_with_source("opts.yaml", "strict: true\nverbose: 1\n");
        let Err(SchemaError::Config { message, location }) = result else {
            panic!("expected a config error");
        };
        assert!(message.contains("unknown field"), "got: {message}");
        if let Some(location) = location {
            assert_eq!(location.source, "opts.yaml");
            assert!(location.line > 0);
        }
    }

    #[test]
    fn builder_methods_override_defaults() {
        let options = ValidationOptions::default()
            .with_strict(true)
            .with_max_depth(4);
        assert!(options.strict);
        assert_eq!(options.max_depth, 4);
    }
}
