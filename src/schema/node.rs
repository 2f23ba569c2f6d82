//! The schema node graph.
//!
//! A [`SchemaNode`] is an immutable description of a validation rule. Child
//! nodes are held behind `Arc`, so cloning a node shares its subtree and a
//! graph can be handed to any number of threads without locking.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::value::Value;

/// Predicate applied by a refinement after its inner schema succeeds.
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Mapper applied by a transformation after its inner schema succeeds.
///
/// An `Err` message is logged and reported as a `transform failed` issue.
pub type Mapper = Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>;

/// How an object schema treats keys it does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownKeys {
    /// Unknown keys are dropped from the output.
    #[default]
    Strip,
    /// Each unknown key is reported as an issue.
    Strict,
    /// Unknown keys are copied to the output without validation.
    Passthrough,
}

/// Declared fields of an object schema, in declaration order.
#[derive(Debug, Clone)]
pub struct ObjectShape {
    pub(crate) fields: IndexMap<String, SchemaNode>,
    pub(crate) unknown_keys: UnknownKeys,
}

impl ObjectShape {
    /// Returns the declared fields in declaration order.
    #[must_use]
    pub const fn fields(&self) -> &IndexMap<String, SchemaNode> {
        &self.fields
    }

    /// Returns the unknown-key policy.
    #[must_use]
    pub const fn unknown_keys(&self) -> UnknownKeys {
        self.unknown_keys
    }
}

/// A refinement: an inner schema plus a predicate over its output.
#[derive(Clone)]
pub struct Refinement {
    pub(crate) inner: Arc<SchemaNode>,
    pub(crate) predicate: Predicate,
    pub(crate) message: String,
}

impl fmt::Debug for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refinement")
            .field("inner", &self.inner)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// A transformation: an inner schema plus a mapper over its output.
#[derive(Clone)]
pub struct Transformation {
    pub(crate) inner: Arc<SchemaNode>,
    pub(crate) mapper: Mapper,
}

impl fmt::Debug for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformation")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

/// An immutable validation rule, either a leaf check or a composite of
/// other nodes.
///
/// Build nodes with the functions in [`super::combinators`] or the fluent
/// methods below; every method consumes `self` and returns a new node.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    /// Accepts string values.
    String,
    /// Accepts integer and float values.
    Number,
    /// Accepts boolean values.
    Boolean,
    /// Accepts values equal to the given value.
    Literal(Value),
    /// Accepts values equal to one of the given values.
    Enum(Vec<Value>),
    /// Accepts mappings whose declared fields validate.
    Object(ObjectShape),
    /// Accepts sequences whose every element validates.
    Array(Arc<Self>),
    /// Accepts sequences of exactly the given length, validated
    /// position-wise.
    Tuple(Vec<Self>),
    /// Accepts values accepted by any member, tried in order.
    Union(Vec<Self>),
    /// Accepts values accepted by both sides, merging their outputs.
    Intersection(Arc<Self>, Arc<Self>),
    /// Accepts absence, otherwise delegates.
    Optional(Arc<Self>),
    /// Accepts null, otherwise delegates.
    Nullable(Arc<Self>),
    /// Substitutes a default for absence, otherwise delegates.
    Default(Arc<Self>, Value),
    /// Applies a predicate after the inner schema succeeds.
    Refine(Refinement),
    /// Maps the output after the inner schema succeeds.
    Transform(Transformation),
}

impl SchemaNode {
    /// Wraps this node so that absence is accepted.
    #[must_use]
    pub fn optional(self) -> Self {
        Self::Optional(Arc::new(self))
    }

    /// Wraps this node so that null is accepted.
    #[must_use]
    pub fn nullable(self) -> Self {
        Self::Nullable(Arc::new(self))
    }

    /// Wraps this node so that absence yields `default`.
    #[must_use]
    pub fn default_to(self, default: impl Into<Value>) -> Self {
        Self::Default(Arc::new(self), default.into())
    }

    /// Adds a predicate that must hold for the validated value.
    #[must_use]
    pub fn refine<F>(self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Refine(Refinement {
            inner: Arc::new(self),
            predicate: Arc::new(predicate),
            message: message.into(),
        })
    }

    /// Replaces the validated value with the mapper's output.
    #[must_use]
    pub fn transform<F>(self, mapper: F) -> Self
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self::Transform(Transformation {
            inner: Arc::new(self),
            mapper: Arc::new(mapper),
        })
    }

    /// Intersects this node with `other`.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::Intersection(Arc::new(self), Arc::new(other))
    }

    /// Switches an object node to reject unknown keys.
    ///
    /// Other nodes are returned unchanged.
    #[must_use]
    pub fn strict(self) -> Self {
        self.with_unknown_keys(UnknownKeys::Strict)
    }

    /// Switches an object node to copy unknown keys to its output.
    ///
    /// Other nodes are returned unchanged.
    #[must_use]
    pub fn passthrough(self) -> Self {
        self.with_unknown_keys(UnknownKeys::Passthrough)
    }

    fn with_unknown_keys(self, unknown_keys: UnknownKeys) -> Self {
        match self {
            Self::Object(shape) => Self::Object(ObjectShape {
                unknown_keys,
                ..shape
            }),
            other => other,
        }
    }

    /// Returns a short name for the node's kind, used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Literal(_) => "literal",
            Self::Enum(_) => "enum",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
            Self::Tuple(_) => "tuple",
            Self::Union(_) => "union",
            Self::Intersection(..) => "intersection",
            Self::Optional(_) => "optional",
            Self::Nullable(_) => "nullable",
            Self::Default(..) => "default",
            Self::Refine(_) => "refine",
            Self::Transform(_) => "transform",
        }
    }
}
