//! `schemata` — a composable runtime schema-validation engine.
//!
//! Schemas are immutable node graphs built from combinators (objects,
//! arrays, tuples, unions, intersections, optional and nullable wrappers,
//! defaults, refinements and transformations). Validating a dynamically
//! typed [`schema::Value`] yields either the validated output or every issue
//! found, each with a path and a message. Typed schemas additionally decode
//! the output into Rust types inferred from the schema's shape.

/// Schema construction, validation, and typed outputs.
pub mod schema;
