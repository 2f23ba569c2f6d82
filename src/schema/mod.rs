//! Schema nodes, combinators, and the validator.
//!
//! Build a [`SchemaNode`] with the combinator functions (or the fluent
//! methods on `SchemaNode`), then call [`SchemaNode::validate`]. Validation
//! never panics on bad input: every problem is returned as an [`Issue`]
//! inside [`ValidationError::Invalid`]. The [`typed`] module layers
//! compile-time output types over the same nodes.

mod checks;
mod combinators;
mod error;
mod issue;
mod node;
mod options;
pub mod typed;
mod validate;
mod value;

pub use checks::{
    email, int, length, matches, max, max_length, min, min_length, non_empty, positive, range,
};
pub use combinators::{
    array, boolean, enumeration, intersection, literal, nullable, number, object, optional,
    refine, string, transform, tuple, union, with_default,
};
pub use error::{Issues, SchemaError, SourceLocation, ValidationError, ValidationResult};
pub use issue::{Issue, IssueCode, Path, PathSegment};
pub use node::{Mapper, ObjectShape, Predicate, Refinement, SchemaNode, Transformation, UnknownKeys};
pub use options::{DEFAULT_MAX_DEPTH, ValidationOptions};
pub use typed::{Infer, Schema, Typed};
pub use value::{DecodeError, Value};
