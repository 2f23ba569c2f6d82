//! Constructors for every [`SchemaNode`] case.
//!
//! Combinators only assemble structure; they never look at input values.
//! The three that can be given a structurally invalid definition (`object`
//! with a repeated field, `union` with fewer than two members, `enumeration`
//! with no values) return [`SchemaError`].

use std::sync::Arc;

use indexmap::IndexMap;
use indexmap::map::Entry;

use super::error::SchemaError;
use super::node::{ObjectShape, SchemaNode, UnknownKeys};
use super::value::Value;

/// Accepts string values.
#[must_use]
pub const fn string() -> SchemaNode {
    SchemaNode::String
}

/// Accepts integer and float values. Numeric strings are rejected.
#[must_use]
pub const fn number() -> SchemaNode {
    SchemaNode::Number
}

/// Accepts boolean values.
#[must_use]
pub const fn boolean() -> SchemaNode {
    SchemaNode::Boolean
}

/// Accepts only values equal to `value`.
#[must_use]
pub fn literal(value: impl Into<Value>) -> SchemaNode {
    SchemaNode::Literal(value.into())
}

/// Accepts only values equal to one of `values`.
///
/// # Errors
///
/// Returns [`SchemaError::EmptyEnum`] if `values` is empty.
///
/// # Examples
///
///     use schemata::schema::{enumeration, Value};
///
///     let role = enumeration(["admin", "user", "guest"]).unwrap();
///     assert!(role.validate(&Value::from("user")).is_ok());
///     assert!(role.validate(&Value::from("root")).is_err());
pub fn enumeration<I, V>(values: I) -> Result<SchemaNode, SchemaError>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    if values.is_empty() {
        tracing::debug!("rejected enum schema with no values");
        return Err(SchemaError::EmptyEnum);
    }
    Ok(SchemaNode::Enum(values))
}

/// Accepts mappings whose declared fields validate. Unknown keys are
/// stripped from the output; see [`SchemaNode::strict`] and
/// [`SchemaNode::passthrough`].
///
/// # Errors
///
/// Returns [`SchemaError::DuplicateField`] if a field name repeats.
///
/// # Examples
///
///     use schemata::schema::{number, object, string};
///
///     let user = object([("name", string()), ("rank", number())]).unwrap();
///     assert!(object([("a", string()), ("a", number())]).is_err());
pub fn object<I, K>(fields: I) -> Result<SchemaNode, SchemaError>
where
    I: IntoIterator<Item = (K, SchemaNode)>,
    K: Into<String>,
{
    let mut declared = IndexMap::new();
    for (name, node) in fields {
        match declared.entry(name.into()) {
            Entry::Occupied(entry) => {
                let field = entry.key().clone();
                tracing::debug!(%field, "rejected object schema with duplicate field");
                return Err(SchemaError::DuplicateField { field });
            }
            Entry::Vacant(entry) => {
                entry.insert(node);
            }
        }
    }
    Ok(SchemaNode::Object(ObjectShape {
        fields: declared,
        unknown_keys: UnknownKeys::Strip,
    }))
}

/// Accepts sequences whose every element matches `element`.
#[must_use]
pub fn array(element: SchemaNode) -> SchemaNode {
    SchemaNode::Array(Arc::new(element))
}

/// Accepts sequences of exactly `elements.len()` items, validated by
/// position.
#[must_use]
pub fn tuple(elements: impl IntoIterator<Item = SchemaNode>) -> SchemaNode {
    SchemaNode::Tuple(elements.into_iter().collect())
}

/// Accepts values matched by any of `members`, tried in order.
///
/// # Errors
///
/// Returns [`SchemaError::UnionTooSmall`] if fewer than two members are
/// given.
pub fn union(members: impl IntoIterator<Item = SchemaNode>) -> Result<SchemaNode, SchemaError> {
    let members: Vec<SchemaNode> = members.into_iter().collect();
    if members.len() < 2 {
        tracing::debug!(members = members.len(), "rejected undersized union schema");
        return Err(SchemaError::UnionTooSmall {
            members: members.len(),
        });
    }
    Ok(SchemaNode::Union(members))
}

/// Accepts values matched by both `left` and `right`. Object outputs are
/// merged field-wise with `right` winning on collisions.
#[must_use]
pub fn intersection(left: SchemaNode, right: SchemaNode) -> SchemaNode {
    left.and(right)
}

/// Accepts absence; otherwise delegates to `inner`.
#[must_use]
pub fn optional(inner: SchemaNode) -> SchemaNode {
    inner.optional()
}

/// Accepts null; otherwise delegates to `inner`.
#[must_use]
pub fn nullable(inner: SchemaNode) -> SchemaNode {
    inner.nullable()
}

/// Yields `default` for absence without consulting `inner`; otherwise
/// delegates to `inner`.
#[must_use]
pub fn with_default(inner: SchemaNode, default: impl Into<Value>) -> SchemaNode {
    inner.default_to(default)
}

/// Applies `predicate` after `inner` succeeds, failing with `message` when
/// it returns `false`.
#[must_use]
pub fn refine<F>(inner: SchemaNode, predicate: F, message: impl Into<String>) -> SchemaNode
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    inner.refine(predicate, message)
}

/// Replaces the output of `inner` with `mapper`'s result.
#[must_use]
pub fn transform<F>(inner: SchemaNode, mapper: F) -> SchemaNode
where
    F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
{
    inner.transform(mapper)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{enumeration, number, object, string, union};
    use crate::schema::{SchemaError, SchemaNode, UnknownKeys};

    #[test]
    fn object_keeps_declaration_order() {
        let node = object([("b", string()), ("a", number())]).expect("should build");
        let SchemaNode::Object(shape) = node else {
            panic!("expected an object node");
        };
        let names: Vec<&str> = shape.fields().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(shape.unknown_keys(), UnknownKeys::Strip);
    }

    #[test]
    fn object_rejects_duplicate_field() {
        let result = object([("a", string()), ("b", string()), ("a", number())]);
        assert_eq!(
            result.err(),
            Some(SchemaError::DuplicateField {
                field: "a".to_owned()
            })
        );
    }

    #[rstest]
    #[case::empty(Vec::new(), 0)]
    #[case::single(vec![string()], 1)]
    fn union_rejects_fewer_than_two_members(
        #[case] members: Vec<SchemaNode>,
        #[case] expected: usize,
    ) {
        let result = union(members);
        assert_eq!(
            result.err(),
            Some(SchemaError::UnionTooSmall { members: expected })
        );
    }

    #[test]
    fn enumeration_rejects_empty_set() {
        let result = enumeration(Vec::<&str>::new());
        assert_eq!(result.err(), Some(SchemaError::EmptyEnum));
    }

    #[test]
    fn strict_switches_object_policy_only() {
        let node = object([("a", string())]).expect("should build").strict();
        assert!(matches!(
            node,
            SchemaNode::Object(ref shape) if shape.unknown_keys() == UnknownKeys::Strict
        ));
        assert!(matches!(string().strict(), SchemaNode::String));
    }
}
