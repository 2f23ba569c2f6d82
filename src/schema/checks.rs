//! Built-in refinements for strings, arrays, and numbers.
//!
//! Each check wraps its inner node in a [`SchemaNode::Refine`] with a
//! standard message, so checks compose with every other combinator and
//! run only after the inner node has accepted the value.

use std::sync::LazyLock;

use regex::Regex;

use super::error::SchemaError;
use super::node::SchemaNode;
use super::value::Value;

/// Pragmatic address shape: one `@`, no whitespace, a dotted domain.
static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").ok());

/// Requires a string or array of at least `min` characters or elements.
#[must_use]
pub fn min_length(inner: SchemaNode, min: usize) -> SchemaNode {
    let message = format!("must contain at least {min} item(s)");
    inner.refine(move |value| value.len().is_some_and(|len| len >= min), message)
}

/// Requires a string or array of at most `max` characters or elements.
#[must_use]
pub fn max_length(inner: SchemaNode, max: usize) -> SchemaNode {
    let message = format!("must contain at most {max} item(s)");
    inner.refine(move |value| value.len().is_some_and(|len| len <= max), message)
}

/// Requires a string or array with length in `min..=max`.
///
/// # Errors
///
/// Returns [`SchemaError::InvalidBound`] if `max < min`.
pub fn length(inner: SchemaNode, min: usize, max: usize) -> Result<SchemaNode, SchemaError> {
    if max < min {
        return Err(SchemaError::InvalidBound {
            reason: format!("maximum length {max} is below minimum length {min}"),
        });
    }
    Ok(max_length(min_length(inner, min), max))
}

/// Requires a non-empty string or array.
#[must_use]
pub fn non_empty(inner: SchemaNode) -> SchemaNode {
    inner.refine(
        |value| value.len().is_some_and(|len| len > 0),
        "must not be empty",
    )
}

/// Requires a string that looks like an email address.
#[must_use]
pub fn email(inner: SchemaNode) -> SchemaNode {
    inner.refine(
        |value| {
            value
                .as_str()
                .zip(EMAIL.as_ref())
                .is_some_and(|(s, pattern)| pattern.is_match(s))
        },
        "invalid email",
    )
}

/// Requires a string matching `pattern`.
#[must_use]
pub fn matches(inner: SchemaNode, pattern: Regex, message: impl Into<String>) -> SchemaNode {
    inner.refine(
        move |value| value.as_str().is_some_and(|s| pattern.is_match(s)),
        message,
    )
}

/// Requires a number greater than or equal to `min`.
#[must_use]
pub fn min(inner: SchemaNode, min: f64) -> SchemaNode {
    let message = format!("must be greater than or equal to {min}");
    inner.refine(move |value| value.as_f64().is_some_and(|n| n >= min), message)
}

/// Requires a number less than or equal to `max`.
#[must_use]
pub fn max(inner: SchemaNode, max: f64) -> SchemaNode {
    let message = format!("must be less than or equal to {max}");
    inner.refine(move |value| value.as_f64().is_some_and(|n| n <= max), message)
}

/// Requires a number in `min..=max`.
///
/// # Errors
///
/// Returns [`SchemaError::InvalidBound`] if `max < min` or either bound is
/// NaN.
pub fn range(inner: SchemaNode, lo: f64, hi: f64) -> Result<SchemaNode, SchemaError> {
    if lo.is_nan() || hi.is_nan() || hi < lo {
        return Err(SchemaError::InvalidBound {
            reason: format!("range {lo}..={hi} is empty"),
        });
    }
    Ok(max(min(inner, lo), hi))
}

/// Requires a number strictly greater than zero.
#[must_use]
pub fn positive(inner: SchemaNode) -> SchemaNode {
    inner.refine(
        |value| value.as_f64().is_some_and(|n| n > 0.0),
        "must be positive",
    )
}

/// Requires an integral number. Floats with no fractional part are
/// accepted.
#[must_use]
pub fn int(inner: SchemaNode) -> SchemaNode {
    inner.refine(
        |value| match value {
            Value::Integer(_) => true,
            Value::Float(f) => f.is_finite() && f.fract() == 0.0,
            _ => false,
        },
        "expected integer",
    )
}

#[cfg(test)]
mod tests {
    use regex::Regex;
    use rstest::rstest;

    use super::{EMAIL, email, int, length, matches, min_length, positive, range};
    use crate::schema::{SchemaError, Value, number, string};

    #[test]
    fn email_pattern_compiles() {
        assert!(EMAIL.is_some());
    }

    #[rstest]
    #[case::long_enough("Passw0rdX", true)]
    #[case::too_short("Pass1", false)]
    fn min_length_counts_characters(#[case] input: &str, #[case] ok: bool) {
        let node = min_length(string(), 8);
        assert_eq!(node.validate(&Value::from(input)).is_ok(), ok);
    }

    #[test]
    fn min_length_reports_standard_message() {
        let error = min_length(string(), 8)
            .validate(&Value::from("short"))
            .expect_err("should fail");
        let messages: Vec<&str> = error.issues().iter().map(|i| i.message.as_str()).collect();
        assert_eq!(messages, vec!["must contain at least 8 item(s)"]);
    }

    #[rstest]
    #[case::plain("yash@example.com", true)]
    #[case::subdomain("a.b@mail.example.org", true)]
    #[case::missing_at("yash.example.com", false)]
    #[case::missing_tld("yash@example", false)]
    #[case::whitespace("ya sh@example.com", false)]
    fn email_accepts_common_addresses(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(email(string()).validate(&Value::from(input)).is_ok(), ok);
    }

    #[test]
    fn matches_uses_custom_message() {
        let capital = Regex::new("[A-Z]").expect("valid regex");
        let node = matches(string(), capital, "Must include a capital letter");
        let error = node
            .validate(&Value::from("lowercase"))
            .expect_err("should fail");
        assert_eq!(
            error.issues().first().map(|i| i.message.as_str()),
            Some("Must include a capital letter")
        );
    }

    #[rstest]
    #[case::integer(Value::Integer(3), true)]
    #[case::whole_float(Value::Float(3.0), true)]
    #[case::fraction(Value::Float(3.5), false)]
    fn int_rejects_fractions(#[case] input: Value, #[case] ok: bool) {
        assert_eq!(int(number()).validate(&input).is_ok(), ok);
    }

    #[test]
    fn positive_rejects_zero() {
        assert!(positive(number()).validate(&Value::Integer(0)).is_err());
        assert!(positive(number()).validate(&Value::Float(0.5)).is_ok());
    }

    #[test]
    fn contradictory_bounds_are_definition_errors() {
        assert!(matches!(
            length(string(), 5, 2),
            Err(SchemaError::InvalidBound { .. })
        ));
        assert!(matches!(
            range(number(), 10.0, 1.0),
            Err(SchemaError::InvalidBound { .. })
        ));
    }
}
