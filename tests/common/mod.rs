//! Shared test helpers for integration tests.

use schemata::schema::{SchemaNode, Value, boolean, object, optional, string};

/// Loads a fixture file from the `tests/fixtures/` directory.
///
/// # Panics
///
/// Panics if the file cannot be read.
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{name}"))
        .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
}

/// Decodes a YAML fixture into a [`Value`].
///
/// # Panics
///
/// Panics if the file cannot be read or is not valid YAML.
pub fn load_value(name: &str) -> Value {
    let yaml = load_fixture(name);
    serde_saphyr::from_str(&yaml).unwrap_or_else(|e| panic!("failed to decode fixture {name}: {e}"))
}

/// The shared blog-post schema exercised by the fixture corpus.
///
/// # Panics
///
/// Panics if the schema definition is rejected.
pub fn blog_schema() -> SchemaNode {
    object([
        ("blogId", string()),
        ("title", optional(string())),
        ("content", optional(string())),
        ("published", optional(boolean())),
    ])
    .unwrap_or_else(|e| panic!("blog schema should build: {e}"))
}
