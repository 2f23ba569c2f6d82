//! Compile-time output types for schemas.
//!
//! A [`Typed<T>`] pairs a [`SchemaNode`] with the Rust type its validated
//! output decodes into. The constructors here mirror the untyped
//! combinators and compute `T` from the shape: `array(string())` is a
//! `Typed<Vec<String>>`, `optional(number())` a `Typed<Option<f64>>`.
//! Object, union and transform outputs are caller-declared record types
//! decoded through `serde`.
//!
//! [`Infer<S>`] names the output type of any schema, so a record type can be
//! referred to through the schema that produces it.

use std::fmt;
use std::marker::PhantomData;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::checks;
use super::combinators;
use super::error::{Issues, SchemaError, ValidationError, ValidationResult};
use super::issue::{Issue, IssueCode, Path};
use super::node::SchemaNode;
use super::options::ValidationOptions;
use super::value::Value;

/// A schema with a statically known output type.
pub trait Schema {
    /// The type a validated value decodes into.
    type Output: DeserializeOwned;

    /// Returns the untyped node this schema validates with.
    fn node(&self) -> &SchemaNode;

    /// Validates `value` with default options and decodes the output.
    ///
    /// # Errors
    ///
    /// Returns every validation issue, or a single
    /// `schema.output_mismatch` issue when the validated value does not
    /// decode into [`Schema::Output`].
    fn parse(&self, value: &Value) -> ValidationResult<Self::Output> {
        self.parse_with(value, &ValidationOptions::default())
    }

    /// Validates `value` with explicit options and decodes the output.
    ///
    /// # Errors
    ///
    /// See [`Schema::parse`].
    fn parse_with(
        &self,
        value: &Value,
        options: &ValidationOptions,
    ) -> ValidationResult<Self::Output> {
        let output = self.node().validate_with(value, options)?;
        <Self::Output as Deserialize>::deserialize(output).map_err(|error| {
            tracing::debug!(%error, "validated value did not decode into output type");
            ValidationError::Invalid(Issues::new(vec![Issue::new(
                IssueCode::OutputMismatch,
                &Path::root(),
                error.to_string(),
            )]))
        })
    }
}

/// The validated output type of schema `S`.
pub type Infer<S> = <S as Schema>::Output;

/// A schema node tagged with its output type `T`.
pub struct Typed<T> {
    node: SchemaNode,
    output: PhantomData<fn() -> T>,
}

impl<T> Typed<T> {
    /// Declares that `node` produces values decoding into `T`.
    ///
    /// Nothing checks the declaration up front; a mismatch surfaces as a
    /// `schema.output_mismatch` issue when parsing.
    #[must_use]
    pub const fn new(node: SchemaNode) -> Self {
        Self {
            node,
            output: PhantomData,
        }
    }

    /// Returns the untyped node.
    #[must_use]
    pub fn into_node(self) -> SchemaNode {
        self.node
    }

    /// Adds a predicate over the validated value.
    #[must_use]
    pub fn refine<F>(self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::new(self.node.refine(predicate, message))
    }

    /// Maps the validated value, declaring the mapped output type `U`.
    #[must_use]
    pub fn transform<U, F>(self, mapper: F) -> Typed<U>
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Typed::new(self.node.transform(mapper))
    }
}

impl<T: DeserializeOwned> Schema for Typed<T> {
    type Output = T;

    fn node(&self) -> &SchemaNode {
        &self.node
    }
}

impl<T> Clone for Typed<T> {
    fn clone(&self) -> Self {
        Self::new(self.node.clone())
    }
}

impl<T> fmt::Debug for Typed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typed")
            .field("node", &self.node)
            .field("output", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> From<Typed<T>> for SchemaNode {
    fn from(typed: Typed<T>) -> Self {
        typed.node
    }
}

// ── Constructors ────────────────────────────────────────────────────

/// A string schema producing `String`.
#[must_use]
pub const fn string() -> Typed<String> {
    Typed::new(combinators::string())
}

/// A number schema producing `f64`.
#[must_use]
pub const fn number() -> Typed<f64> {
    Typed::new(combinators::number())
}

/// An integral number schema producing `i64`.
///
/// Floats without a fractional part are accepted and normalised to
/// integers.
#[must_use]
pub fn integer() -> Typed<i64> {
    Typed::new(checks::int(combinators::number()).transform(normalise_integer))
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "the value is range-checked before the cast"
)]
fn normalise_integer(value: Value) -> Result<Value, String> {
    match value {
        Value::Float(f) if f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(Value::Integer(f as i64))
        }
        Value::Float(f) => Err(format!("{f} is out of range for i64")),
        other => Ok(other),
    }
}

/// A boolean schema producing `bool`.
#[must_use]
pub const fn boolean() -> Typed<bool> {
    Typed::new(combinators::boolean())
}

/// A string literal schema producing `String`.
#[must_use]
pub fn literal(value: &str) -> Typed<String> {
    Typed::new(combinators::literal(value))
}

/// A string enum schema producing `T`, typically a unit-variant enum
/// deriving `Deserialize`.
///
/// # Errors
///
/// Returns [`SchemaError::EmptyEnum`] if `values` is empty.
pub fn enumeration<T, I, S>(values: I) -> Result<Typed<T>, SchemaError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    combinators::enumeration(values.into_iter().map(|value| Value::String(value.into())))
        .map(Typed::new)
}

/// An object schema producing the record type `R`.
///
/// # Errors
///
/// Returns [`SchemaError::DuplicateField`] if a field name repeats.
///
/// # Examples
///
///     use schemata::schema::typed::{self, Infer, Schema, Typed};
///     use schemata::schema::Value;
///     use serde::Deserialize;
///
///     #[derive(Deserialize)]
///     struct User {
///         name: String,
///         rank: f64,
///     }
///
///     type UserSchema = Typed<User>;
///
///     let schema: UserSchema = typed::object([
///         ("name", typed::string().into()),
///         ("rank", typed::number().into()),
///     ])
///     .unwrap();
///     let input: Value = [("name", Value::from("Rohit")), ("rank", Value::from(5))]
///         .into_iter()
///         .collect();
///     let user: Infer<UserSchema> = schema.parse(&input).unwrap();
///     assert_eq!(user.rank, 5.0);
///     assert_eq!(user.name, "Rohit");
pub fn object<R, I, K>(fields: I) -> Result<Typed<R>, SchemaError>
where
    I: IntoIterator<Item = (K, SchemaNode)>,
    K: Into<String>,
{
    combinators::object(fields).map(Typed::new)
}

/// An array schema producing `Vec<T>`.
#[must_use]
pub fn array<T>(element: Typed<T>) -> Typed<Vec<T>> {
    Typed::new(combinators::array(element.node))
}

/// A two-element tuple schema producing `(A, B)`.
#[must_use]
pub fn tuple2<A, B>(first: Typed<A>, second: Typed<B>) -> Typed<(A, B)> {
    Typed::new(combinators::tuple([first.node, second.node]))
}

/// A three-element tuple schema producing `(A, B, C)`.
#[must_use]
pub fn tuple3<A, B, C>(first: Typed<A>, second: Typed<B>, third: Typed<C>) -> Typed<(A, B, C)> {
    Typed::new(combinators::tuple([first.node, second.node, third.node]))
}

/// A union schema producing the caller-declared type `U`, typically an
/// `#[serde(untagged)]` enum.
///
/// # Errors
///
/// Returns [`SchemaError::UnionTooSmall`] if fewer than two members are
/// given.
pub fn union<U>(members: impl IntoIterator<Item = SchemaNode>) -> Result<Typed<U>, SchemaError> {
    combinators::union(members).map(Typed::new)
}

/// An intersection schema producing the caller-declared record type `R`.
#[must_use]
pub fn intersection<R>(left: SchemaNode, right: SchemaNode) -> Typed<R> {
    Typed::new(combinators::intersection(left, right))
}

/// An optional schema producing `Option<T>`.
#[must_use]
pub fn optional<T>(inner: Typed<T>) -> Typed<Option<T>> {
    Typed::new(inner.node.optional())
}

/// A nullable schema producing `Option<T>`.
#[must_use]
pub fn nullable<T>(inner: Typed<T>) -> Typed<Option<T>> {
    Typed::new(inner.node.nullable())
}

/// A defaulted schema producing `T`.
#[must_use]
pub fn with_default<T>(inner: Typed<T>, default: impl Into<Value>) -> Typed<T> {
    Typed::new(inner.node.default_to(default))
}
