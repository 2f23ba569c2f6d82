//! The validator dispatcher.
//!
//! Validation walks the schema graph alongside the input, one exhaustive
//! `match` arm per [`SchemaNode`] case. Aggregating nodes (objects, arrays,
//! tuples, intersections) collect every child issue instead of stopping at
//! the first. Absence is modelled as `None` and is distinct from
//! [`Value::Null`].
//!
//! The entry points are the `validate*` methods on [`SchemaNode`].

use std::panic::{self, AssertUnwindSafe};

use indexmap::IndexMap;

use super::error::{Issues, ValidationError, ValidationResult};
use super::issue::{Issue, IssueCode, Path, PathSegment};
use super::node::{ObjectShape, Refinement, SchemaNode, Transformation, UnknownKeys};
use super::options::ValidationOptions;
use super::value::Value;

/// Output of one node: the validated value (`None` for absence) or the
/// issues it produced.
type Outcome = Result<Option<Value>, Vec<Issue>>;

/// Raised when the walk enters more nested nodes than allowed.
struct TooDeep {
    path: Path,
}

/// Per-call walk state.
struct Walker<'o> {
    options: &'o ValidationOptions,
    path: Path,
    /// Keys declared by enclosing intersections at the current value, which
    /// an object on one side must not treat as unknown.
    sibling_keys: Vec<String>,
}

// ── Public entry points ─────────────────────────────────────────────

impl SchemaNode {
    /// Validates `value` with default options.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Invalid`] carrying every issue found, or
    /// [`ValidationError::SchemaTooDeep`] if the schema nests deeper than
    /// the default limit.
    ///
    /// # Examples
    ///
    ///     use schemata::schema::{number, object, string, Value};
    ///
    ///     let user = object([("name", string()), ("rank", number())]).unwrap();
    ///     let input: Value = [("name", Value::from("yash")), ("rank", Value::from("123"))]
    ///         .into_iter()
    ///         .collect();
    ///     let error = user.validate(&input).unwrap_err();
    ///     assert_eq!(error.issues().len(), 1);
    pub fn validate(&self, value: &Value) -> ValidationResult {
        self.validate_with(value, &ValidationOptions::default())
    }

    /// Validates `value` with explicit options.
    ///
    /// # Errors
    ///
    /// See [`SchemaNode::validate`].
    pub fn validate_with(&self, value: &Value, options: &ValidationOptions) -> ValidationResult {
        // A present input is never turned into absence by any node.
        self.validate_field(Some(value), options)
            .map(Option::unwrap_or_default)
    }

    /// Validates a possibly-absent value, as an object would validate one
    /// of its fields. `Ok(None)` means the schema accepted absence.
    ///
    /// # Errors
    ///
    /// See [`SchemaNode::validate`].
    pub fn validate_field(
        &self,
        value: Option<&Value>,
        options: &ValidationOptions,
    ) -> ValidationResult<Option<Value>> {
        let mut walker = Walker {
            options,
            path: Path::root(),
            sibling_keys: Vec::new(),
        };
        match walker.walk(self, value, 1) {
            Ok(Ok(output)) => {
                tracing::debug!(kind = self.kind(), "validation succeeded");
                Ok(output)
            }
            Ok(Err(issues)) => {
                tracing::debug!(
                    kind = self.kind(),
                    issues = issues.len(),
                    "validation failed"
                );
                Err(ValidationError::Invalid(Issues::new(issues)))
            }
            Err(TooDeep { path }) => {
                tracing::warn!(
                    limit = options.max_depth,
                    %path,
                    "schema nesting exceeded maximum depth"
                );
                Err(ValidationError::SchemaTooDeep {
                    limit: options.max_depth,
                    path,
                })
            }
        }
    }
}

// ── Dispatch ────────────────────────────────────────────────────────

impl Walker<'_> {
    fn walk(
        &mut self,
        node: &SchemaNode,
        value: Option<&Value>,
        depth: usize,
    ) -> Result<Outcome, TooDeep> {
        if depth > self.options.max_depth {
            return Err(TooDeep {
                path: self.path.clone(),
            });
        }
        let next = depth + 1;
        let outcome = match node {
            SchemaNode::String => self.leaf(value, "string", |v| matches!(v, Value::String(_))),
            SchemaNode::Number => self.leaf(value, "number", |v| {
                matches!(v, Value::Integer(_) | Value::Float(_))
            }),
            SchemaNode::Boolean => self.leaf(value, "boolean", |v| matches!(v, Value::Bool(_))),
            SchemaNode::Literal(expected) => self.literal(expected, value),
            SchemaNode::Enum(allowed) => self.enumeration(allowed, value),
            SchemaNode::Object(shape) => self.object(shape, value, next)?,
            SchemaNode::Array(element) => self.array(element, value, next)?,
            SchemaNode::Tuple(elements) => self.tuple(elements, value, next)?,
            SchemaNode::Union(members) => self.union(members, value, next)?,
            SchemaNode::Intersection(left, right) => self.intersection(left, right, value, next)?,
            SchemaNode::Optional(inner) => match value {
                None => Ok(None),
                Some(_) => self.walk(inner, value, next)?,
            },
            SchemaNode::Nullable(inner) => match value {
                Some(Value::Null) => Ok(Some(Value::Null)),
                _ => self.walk(inner, value, next)?,
            },
            SchemaNode::Default(inner, default) => match value {
                None => Ok(Some(default.clone())),
                Some(_) => self.walk(inner, value, next)?,
            },
            SchemaNode::Refine(refinement) => self.refine(refinement, value, next)?,
            SchemaNode::Transform(transformation) => {
                self.transform(transformation, value, next)?
            }
        };
        Ok(outcome)
    }

    fn issue(&self, code: IssueCode, message: impl Into<String>) -> Vec<Issue> {
        vec![Issue::new(code, &self.path, message)]
    }

    // ── Leaves ──────────────────────────────────────────────────────

    fn leaf(
        &self,
        value: Option<&Value>,
        expected: &str,
        accepts: impl Fn(&Value) -> bool,
    ) -> Outcome {
        match value {
            Some(v) if accepts(v) => Ok(Some(v.clone())),
            _ => Err(self.issue(IssueCode::InvalidType, format!("expected {expected}"))),
        }
    }

    fn literal(&self, expected: &Value, value: Option<&Value>) -> Outcome {
        match value {
            Some(v) if v.same_as(expected) => Ok(Some(v.clone())),
            _ => Err(self.issue(
                IssueCode::InvalidLiteral,
                format!("expected literal {expected}"),
            )),
        }
    }

    fn enumeration(&self, allowed: &[Value], value: Option<&Value>) -> Outcome {
        match value {
            Some(v) if allowed.iter().any(|candidate| v.same_as(candidate)) => Ok(Some(v.clone())),
            _ => {
                let listed: Vec<String> = allowed.iter().map(ToString::to_string).collect();
                Err(self.issue(
                    IssueCode::InvalidEnumValue,
                    format!("expected one of {}", listed.join(" | ")),
                ))
            }
        }
    }

    // ── Aggregates ──────────────────────────────────────────────────

    /// Validates `value` against `node` one path segment deeper.
    fn child(
        &mut self,
        segment: PathSegment,
        node: &SchemaNode,
        value: Option<&Value>,
        depth: usize,
    ) -> Result<Outcome, TooDeep> {
        self.path.push(segment);
        let siblings = std::mem::take(&mut self.sibling_keys);
        let outcome = self.walk(node, value, depth);
        self.sibling_keys = siblings;
        self.path.pop();
        outcome
    }

    fn object(
        &mut self,
        shape: &ObjectShape,
        value: Option<&Value>,
        depth: usize,
    ) -> Result<Outcome, TooDeep> {
        let Some(Value::Mapping(entries)) = value else {
            return Ok(Err(self.issue(IssueCode::InvalidType, "expected object")));
        };

        let mut output = IndexMap::with_capacity(shape.fields.len());
        let mut issues = Vec::new();
        for (name, field) in &shape.fields {
            match self.child(name.as_str().into(), field, entries.get(name), depth)? {
                Ok(Some(v)) => {
                    output.insert(name.clone(), v);
                }
                Ok(None) => {}
                Err(found) => issues.extend(found),
            }
        }

        let policy = match shape.unknown_keys {
            UnknownKeys::Strip if self.options.strict => UnknownKeys::Strict,
            other => other,
        };
        let siblings = &self.sibling_keys;
        let unknown: Vec<(&String, &Value)> = entries
            .iter()
            .filter(|(key, _)| {
                !shape.fields.contains_key(key.as_str()) && !siblings.contains(*key)
            })
            .collect();
        match policy {
            UnknownKeys::Strip => {}
            UnknownKeys::Strict => {
                for (key, _) in unknown {
                    self.path.push(key.as_str().into());
                    issues.push(Issue::new(
                        IssueCode::UnrecognizedKey,
                        &self.path,
                        format!("unrecognized key {key:?}"),
                    ));
                    self.path.pop();
                }
            }
            UnknownKeys::Passthrough => {
                for (key, v) in unknown {
                    output.insert(key.clone(), v.clone());
                }
            }
        }

        if issues.is_empty() {
            Ok(Ok(Some(Value::Mapping(output))))
        } else {
            Ok(Err(issues))
        }
    }

    fn array(
        &mut self,
        element: &SchemaNode,
        value: Option<&Value>,
        depth: usize,
    ) -> Result<Outcome, TooDeep> {
        let Some(Value::Sequence(items)) = value else {
            return Ok(Err(self.issue(IssueCode::InvalidType, "expected array")));
        };
        self.sequence(items.iter().map(|item| (element, item)), items.len(), depth)
    }

    fn tuple(
        &mut self,
        elements: &[SchemaNode],
        value: Option<&Value>,
        depth: usize,
    ) -> Result<Outcome, TooDeep> {
        let Some(Value::Sequence(items)) = value else {
            return Ok(Err(self.issue(IssueCode::InvalidType, "expected array")));
        };
        if items.len() != elements.len() {
            return Ok(Err(self.issue(
                IssueCode::InvalidTupleLength,
                format!(
                    "expected tuple of length {}, received {}",
                    elements.len(),
                    items.len()
                ),
            )));
        }
        self.sequence(elements.iter().zip(items), items.len(), depth)
    }

    /// Validates position-wise pairs, collecting every issue.
    fn sequence<'a>(
        &mut self,
        pairs: impl Iterator<Item = (&'a SchemaNode, &'a Value)>,
        len: usize,
        depth: usize,
    ) -> Result<Outcome, TooDeep> {
        let mut output = Vec::with_capacity(len);
        let mut issues = Vec::new();
        for (index, (node, item)) in pairs.enumerate() {
            match self.child(PathSegment::Index(index), node, Some(item), depth)? {
                // An element schema that accepts absence still sees a
                // present element, so `None` cannot occur here.
                Ok(v) => output.push(v.unwrap_or_default()),
                Err(found) => issues.extend(found),
            }
        }
        if issues.is_empty() {
            Ok(Ok(Some(Value::Sequence(output))))
        } else {
            Ok(Err(issues))
        }
    }

    fn union(
        &mut self,
        members: &[SchemaNode],
        value: Option<&Value>,
        depth: usize,
    ) -> Result<Outcome, TooDeep> {
        let mut issues = Vec::new();
        for (index, member) in members.iter().enumerate() {
            match self.walk(member, value, depth)? {
                Ok(output) => return Ok(Ok(output)),
                Err(found) => issues.extend(found.into_iter().map(|issue| Issue {
                    message: format!("union member {index}: {}", issue.message),
                    ..issue
                })),
            }
        }
        Ok(Err(issues))
    }

    fn intersection(
        &mut self,
        left: &SchemaNode,
        right: &SchemaNode,
        value: Option<&Value>,
        depth: usize,
    ) -> Result<Outcome, TooDeep> {
        let mark = self.sibling_keys.len();
        declared_keys(left, &mut self.sibling_keys);
        declared_keys(right, &mut self.sibling_keys);
        let sides = match self.walk(left, value, depth) {
            Ok(lhs) => self.walk(right, value, depth).map(|rhs| (lhs, rhs)),
            Err(too_deep) => Err(too_deep),
        };
        self.sibling_keys.truncate(mark);
        let (lhs, rhs) = sides?;
        let outcome = match (lhs, rhs) {
            (Ok(a), Ok(b)) => merge(a, b)
                .ok_or_else(|| {
                    self.issue(
                        IssueCode::InvalidIntersection,
                        "intersection results could not be merged",
                    )
                }),
            (Err(mut a), Err(b)) => {
                // Both sides see the same value, so shared keys can fail twice.
                for issue in b {
                    if !a.contains(&issue) {
                        a.push(issue);
                    }
                }
                Err(a)
            }
            (Err(a), Ok(_)) | (Ok(_), Err(a)) => Err(a),
        };
        Ok(outcome)
    }

    // ── Refinements and transformations ─────────────────────────────

    fn refine(
        &mut self,
        refinement: &Refinement,
        value: Option<&Value>,
        depth: usize,
    ) -> Result<Outcome, TooDeep> {
        let output = match self.walk(&refinement.inner, value, depth)? {
            Ok(Some(output)) => output,
            other => return Ok(other),
        };
        let predicate = &refinement.predicate;
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| predicate(&output))) {
            Ok(true) => Ok(Some(output)),
            Ok(false) => Err(self.issue(IssueCode::Custom, refinement.message.as_str())),
            Err(_) => {
                tracing::warn!(path = %self.path, "refinement predicate panicked");
                Err(self.issue(IssueCode::Custom, "refinement failed"))
            }
        };
        Ok(outcome)
    }

    fn transform(
        &mut self,
        transformation: &Transformation,
        value: Option<&Value>,
        depth: usize,
    ) -> Result<Outcome, TooDeep> {
        let output = match self.walk(&transformation.inner, value, depth)? {
            Ok(Some(output)) => output,
            other => return Ok(other),
        };
        let mapper = &transformation.mapper;
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| mapper(output))) {
            Ok(Ok(mapped)) => Ok(Some(mapped)),
            Ok(Err(reason)) => {
                tracing::debug!(path = %self.path, %reason, "transform mapper failed");
                Err(self.issue(IssueCode::TransformFailed, "transform failed"))
            }
            Err(_) => {
                tracing::warn!(path = %self.path, "transform mapper panicked");
                Err(self.issue(IssueCode::TransformFailed, "transform failed"))
            }
        };
        Ok(outcome)
    }
}

/// Collects the object keys `node` declares for the value it is applied to,
/// looking through wrappers, unions and nested intersections.
fn declared_keys(node: &SchemaNode, keys: &mut Vec<String>) {
    match node {
        SchemaNode::Object(shape) => keys.extend(shape.fields.keys().cloned()),
        SchemaNode::Intersection(left, right) => {
            declared_keys(left, keys);
            declared_keys(right, keys);
        }
        SchemaNode::Union(members) => {
            for member in members {
                declared_keys(member, keys);
            }
        }
        SchemaNode::Optional(inner)
        | SchemaNode::Nullable(inner)
        | SchemaNode::Default(inner, _) => declared_keys(inner, keys),
        SchemaNode::Refine(refinement) => declared_keys(&refinement.inner, keys),
        SchemaNode::Transform(transformation) => declared_keys(&transformation.inner, keys),
        SchemaNode::String
        | SchemaNode::Number
        | SchemaNode::Boolean
        | SchemaNode::Literal(_)
        | SchemaNode::Enum(_)
        | SchemaNode::Array(_)
        | SchemaNode::Tuple(_) => {}
    }
}

/// Merges the outputs of both sides of an intersection. Mappings merge
/// field-wise with the right side winning; anything else must be equal.
fn merge(left: Option<Value>, right: Option<Value>) -> Option<Option<Value>> {
    match (left, right) {
        (None, None) => Some(None),
        (Some(Value::Mapping(mut a)), Some(Value::Mapping(b))) => {
            a.extend(b);
            Some(Some(Value::Mapping(a)))
        }
        (Some(a), Some(b)) if a.same_as(&b) => Some(Some(b)),
        _ => None,
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
