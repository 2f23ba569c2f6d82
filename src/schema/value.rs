//! The dynamically-typed payload consumed and produced by validation.
//!
//! `Value` is decoded from any serde format through a hand-written visitor
//! and can be decoded back into caller types through its `Deserializer`
//! implementation. Mappings preserve insertion order via `IndexMap`.

use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::value::{MapDeserializer, SeqDeserializer};
use serde::de::{self, IntoDeserializer, MapAccess, SeqAccess, Visitor};
use std::fmt;

/// A dynamically-typed input or output value.
///
/// Absence is not a `Value`: an object field that is missing is modelled as
/// `None` by the validator, which keeps "absent" and `Null` distinct.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// An explicit null.
    #[default]
    Null,
    /// A boolean scalar.
    Bool(bool),
    /// A signed 64-bit integer scalar.
    Integer(i64),
    /// A floating-point scalar.
    Float(f64),
    /// A string scalar.
    String(String),
    /// An ordered sequence of values.
    Sequence(Vec<Self>),
    /// An ordered mapping of string keys to values.
    Mapping(IndexMap<String, Self>),
}

impl Value {
    /// Returns the stable type name used in issue messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) | Self::Float(_) => "number",
            Self::String(_) => "string",
            Self::Sequence(_) => "array",
            Self::Mapping(_) => "object",
        }
    }

    /// Returns the string slice if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric value widened to `f64` if this is a number.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "numeric comparison only needs f64 precision"
    )]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the number of elements of a sequence, or characters of a
    /// string.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::String(s) => Some(s.chars().count()),
            Self::Sequence(items) => Some(items.len()),
            Self::Mapping(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Structural equality where an integer and a float holding the same
    /// number compare equal.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Integer(i), Self::Float(f)) | (Self::Float(f), Self::Integer(i)) => {
                whole_float(*f) == Some(*i)
            }
            (Self::Sequence(a), Self::Sequence(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_as(y))
            }
            (Self::Mapping(a), Self::Mapping(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .all(|(key, x)| b.get(key).is_some_and(|y| x.same_as(y)))
            }
            _ => self == other,
        }
    }
}

/// Converts `f` to an integer only when it holds a whole number that `i64`
/// represents exactly.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "the float is checked to be whole and in range before the cast"
)]
fn whole_float(f: f64) -> Option<i64> {
    // `i64::MAX as f64` rounds up to 2^63, which is itself out of range.
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (in_range && f.fract() == 0.0).then(|| f as i64)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Mapping(entries) => {
                f.write_str("{")?;
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key:?}: {item}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::Sequence(items)
    }
}

impl From<IndexMap<String, Self>> for Value {
    fn from(entries: IndexMap<String, Self>) -> Self {
        Self::Mapping(entries)
    }
}

impl<K: Into<String>, V: Into<Self>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Mapping(
            iter.into_iter()
                .map(|(key, item)| (key.into(), item.into()))
                .collect(),
        )
    }
}

// ── Decoding into Value ─────────────────────────────────────────────

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

/// Visitor implementation for deserializing arbitrary values into `Value`.
struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(
            "a value (null, bool, integer, float, string, \
             sequence, or mapping)",
        )
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Value::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| de::Error::custom(format!("integer {v} is out of range for i64")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, val)) = map.next_entry()? {
            entries.insert(key, val);
        }
        Ok(Value::Mapping(entries))
    }
}

// ── Decoding out of Value ───────────────────────────────────────────

/// Error raised when a `Value` cannot be decoded into a caller type.
pub type DecodeError = de::value::Error;

impl<'de> de::Deserializer<'de> for Value {
    type Error = DecodeError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self {
            Self::Null => visitor.visit_unit(),
            Self::Bool(b) => visitor.visit_bool(b),
            Self::Integer(n) => visitor.visit_i64(n),
            Self::Float(x) => visitor.visit_f64(x),
            Self::String(s) => visitor.visit_string(s),
            Self::Sequence(items) => {
                let mut seq = SeqDeserializer::new(items.into_iter());
                let out = visitor.visit_seq(&mut seq)?;
                seq.end()?;
                Ok(out)
            }
            Self::Mapping(entries) => {
                let mut map = MapDeserializer::new(entries.into_iter());
                let out = visitor.visit_map(&mut map)?;
                map.end()?;
                Ok(out)
            }
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self {
            Self::Null => visitor.visit_none(),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self {
            Self::String(s) => visitor.visit_enum(s.into_deserializer()),
            other => other.deserialize_any(visitor),
        }
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

impl IntoDeserializer<'_, DecodeError> for Value {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self::Deserializer {
        self
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for value decoding and comparison.

    use rstest::rstest;
    use serde::Deserialize;

    use super::Value;

    #[rstest]
    #[case::int_and_float(Value::Integer(3), Value::Float(3.0), true)]
    #[case::different_numbers(Value::Integer(3), Value::Float(3.5), false)]
    #[case::string_vs_number(Value::from("3"), Value::Integer(3), false)]
    #[case::large_distinct_integers(
        Value::Integer(9_007_199_254_740_993),
        Value::Integer(9_007_199_254_740_992),
        false
    )]
    #[case::adjacent_max_integers(Value::Integer(i64::MAX), Value::Integer(i64::MAX - 1), false)]
    #[case::float_beyond_exact_integer(
        Value::Float(9_007_199_254_740_992.0),
        Value::Integer(9_007_199_254_740_993),
        false
    )]
    #[case::float_out_of_range(Value::Float(1e300), Value::Integer(i64::MAX), false)]
    #[case::fractional_float(Value::Float(2.5), Value::Integer(2), false)]
    #[case::nested(
        Value::Sequence(vec![Value::Integer(1)]),
        Value::Sequence(vec![Value::Float(1.0)]),
        true
    )]
    fn same_as_compares_numbers_numerically(
        #[case] left: Value,
        #[case] right: Value,
        #[case] expected: bool,
    ) {
        assert_eq!(left.same_as(&right), expected);
    }

    #[test]
    fn yaml_null_decodes_to_null() {
        let value: Value = serde_saphyr::from_str("~").expect("should decode");
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn yaml_mapping_preserves_key_order() {
        let value: Value = serde_saphyr::from_str("b: 1\na: two\n").expect("should decode");
        let Value::Mapping(entries) = value else {
            panic!("expected a mapping");
        };
        let keys: Vec<&str> = entries.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Blog {
        title: String,
        views: i64,
        published: Option<bool>,
    }

    #[test]
    fn mapping_decodes_into_record_type() {
        let value: Value = [
            ("title", Value::from("Intro")),
            ("views", Value::Integer(12)),
        ]
        .into_iter()
        .collect();
        let blog = Blog::deserialize(value).expect("should decode");
        assert_eq!(
            blog,
            Blog {
                title: "Intro".to_owned(),
                views: 12,
                published: None,
            }
        );
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "lowercase")]
    enum Role {
        Admin,
        Guest,
    }

    #[test]
    fn string_decodes_into_unit_enum() {
        let role = Role::deserialize(Value::from("guest")).expect("should decode");
        assert_eq!(role, Role::Guest);
        assert!(Role::deserialize(Value::from("root")).is_err());
        assert_ne!(Role::Admin, Role::Guest);
    }
}
