//! Dynamic runtime values consumed by the rendering engine.
//!
//! The engine never reflects over live objects. Data producers hand it a
//! self-describing [`Value`] tree instead: scalars, lists, maps, and
//! [`Record`]s that carry their own type identity and declared ancestor
//! chain. The `Display` impl is the generic string form used wherever the
//! engine falls back to plain stringification, so it is deterministic by
//! construction: no addresses, no hashes.

use std::fmt;

use serde::Serialize;

/// A runtime value: scalar, collection, associative map, or typed record.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Absent value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// Single character.
    Char(char),
    /// Text value.
    Text(String),
    /// Ordered list of values.
    List(Vec<Value>),
    /// Associative map in insertion order. Rendering sorts entries by the
    /// key's string form, so insertion order never leaks into output.
    Map(Vec<(Value, Value)>),
    /// A typed record with named fields.
    Record(Record),
}

/// Numeric value supporting the common numeric types.
///
/// Numbers are stored in one of three variants to preserve precision:
/// `I64` for signed integers, `U64` for unsigned integers, `F64` for
/// floating point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

/// A typed record: stable type name, declared ancestor chain, named fields.
///
/// The ancestor chain replaces runtime subtype checks: a record "is-a"
/// type `T` when its own name is `T` or `T` appears among its ancestors.
/// Fields keep declaration order; consumers needing determinism sort by
/// field name.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    type_name: String,
    ancestors: Vec<String>,
    fields: Vec<(String, Value)>,
}

/// Borrowed type identity used for registry resolution and common-type
/// narrowing.
#[derive(Clone, Copy, Debug)]
pub struct TypeRef<'a> {
    /// The type's own name.
    pub name: &'a str,
    /// Declared ancestor chain, most specific first.
    pub ancestors: &'a [String],
}

impl TypeRef<'_> {
    /// Whether this type is the named type or declares it as an ancestor.
    pub fn is_a(&self, type_name: &str) -> bool {
        self.name == type_name || self.ancestors.iter().any(|a| a == type_name)
    }
}

impl Record {
    /// Creates an empty record of the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Record {
            type_name: type_name.into(),
            ancestors: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Appends an ancestor to the declared "is-a" chain.
    pub fn ancestor(mut self, name: impl Into<String>) -> Self {
        self.ancestors.push(name.into());
        self
    }

    /// Appends a named field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// The record's type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The declared ancestor chain.
    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Looks a field up by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Borrowed type identity for resolution.
    pub fn type_ref(&self) -> TypeRef<'_> {
        TypeRef {
            name: &self.type_name,
            ancestors: &self.ancestors,
        }
    }
}

impl Value {
    /// Returns `true` for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Converts any `Serialize` value into a `Value` tree.
    ///
    /// Structs and maps arrive as [`Value::Map`] (serde erases type names),
    /// sequences as [`Value::List`], scalars as themselves. Producers that
    /// want per-type display rules build [`Record`]s instead.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Value, serde_json::Error> {
        serde_json::to_value(value).map(Value::from)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Char(c) => write!(f, "{}", c),
            Value::Text(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                let mut sorted: Vec<&(Value, Value)> = entries.iter().collect();
                sorted.sort_by_key(|(k, _)| k.to_string());
                write!(f, "{{")?;
                for (i, (k, v)) in sorted.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Record(record) => {
                let mut sorted: Vec<&(String, Value)> = record.fields.iter().collect();
                sorted.sort_by(|(a, _), (b, _)| a.cmp(b));
                write!(f, "{}{{", record.type_name)?;
                for (i, (name, value)) in sorted.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", name, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

macro_rules! impl_value_from_number {
    ($($ty:ty => $variant:ident as $cast:ty),* $(,)?) => {
        $(
            impl From<$ty> for Number {
                fn from(n: $ty) -> Self {
                    Number::$variant(n as $cast)
                }
            }

            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(Number::$variant(n as $cast))
                }
            }
        )*
    };
}

impl_value_from_number! {
    i8 => I64 as i64,
    i16 => I64 as i64,
    i32 => I64 as i64,
    i64 => I64 as i64,
    isize => I64 as i64,
    u8 => U64 as u64,
    u16 => U64 as u64,
    u32 => U64 as u64,
    u64 => U64 as u64,
    usize => U64 as u64,
    f32 => F64 as f64,
    f64 => F64 as f64,
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Number(Number::I64(i))
                } else if let Some(u) = n.as_u64() {
                    Value::Number(Number::U64(u))
                } else {
                    Value::Number(Number::F64(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (Value::Text(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_lookup_and_identity() {
        let cat = Record::new("cat")
            .ancestor("animal")
            .field("name", "whiskers")
            .field("lives", 9u32);

        assert_eq!(cat.type_name(), "cat");
        assert_eq!(cat.get("name"), Some(&Value::Text("whiskers".into())));
        assert_eq!(cat.get("missing"), None);
        assert!(cat.type_ref().is_a("cat"));
        assert!(cat.type_ref().is_a("animal"));
        assert!(!cat.type_ref().is_a("mineral"));
    }

    #[test]
    fn display_scalars() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(42i64).to_string(), "42");
        assert_eq!(Value::from(2.5f64).to_string(), "2.5");
        assert_eq!(Value::from('x').to_string(), "x");
        assert_eq!(Value::from("hi").to_string(), "hi");
    }

    #[test]
    fn display_list() {
        let list = Value::List(vec![Value::from(1i64), Value::from("a")]);
        assert_eq!(list.to_string(), "[1, a]");
    }

    #[test]
    fn display_map_sorts_by_key_string() {
        let map = Value::Map(vec![
            (Value::from("b"), Value::from(1i64)),
            (Value::from("a"), Value::from(2i64)),
        ]);
        assert_eq!(map.to_string(), "{a=2, b=1}");
    }

    #[test]
    fn display_record_sorts_fields() {
        let record = Record::new("thing").field("foo", 1i64).field("bar", 2i64);
        assert_eq!(Value::from(record).to_string(), "thing{bar=2, foo=1}");
    }

    #[test]
    fn option_conversion() {
        assert_eq!(Value::from(Some(3i64)), Value::from(3i64));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert!(Value::from(None::<i64>).is_null());
        assert!(!Value::from(0i64).is_null());
    }

    #[test]
    fn json_conversion_covers_shapes() {
        let json = serde_json::json!({
            "name": "svc",
            "ids": [1, 2],
            "active": true,
            "extra": null,
        });
        let value = Value::from(json);
        match value {
            Value::Map(entries) => {
                assert_eq!(entries.len(), 4);
                assert!(entries
                    .iter()
                    .any(|(k, v)| k == &Value::from("active") && v == &Value::from(true)));
            }
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn from_serialize_roundtrips_structs() {
        #[derive(Serialize)]
        struct Point {
            x: i32,
            y: i32,
        }

        let value = Value::from_serialize(&Point { x: 1, y: 2 }).unwrap();
        assert_eq!(value.to_string(), "{x=1, y=2}");
    }
}
