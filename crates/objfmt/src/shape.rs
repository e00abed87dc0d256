//! Declared type surfaces.
//!
//! A [`Shape`] is the capability-style replacement for class introspection:
//! it names the public data fields a record type carries and the derived
//! accessors callers may bind, so the configuration builder can validate
//! bindings and expand glob patterns once, at setup time. No type scanning
//! happens while rendering.

use std::fmt;
use std::sync::Arc;

use crate::error::ExtractError;
use crate::value::{Record, Value};

/// A named derived-value function over a record value.
pub type AccessorFn = Arc<dyn Fn(&Value) -> Result<Value, ExtractError> + Send + Sync>;

/// The declared surface of a record type: name, ancestor chain, public
/// fields, and named accessors.
#[derive(Clone)]
pub struct Shape {
    name: String,
    ancestors: Vec<String>,
    fields: Vec<String>,
    accessors: Vec<(String, AccessorFn)>,
}

impl Shape {
    /// Starts a shape for the given type name.
    pub fn new(name: impl Into<String>) -> Self {
        Shape {
            name: name.into(),
            ancestors: Vec::new(),
            fields: Vec::new(),
            accessors: Vec::new(),
        }
    }

    /// Appends an ancestor type name to the "is-a" chain.
    pub fn ancestor(mut self, name: impl Into<String>) -> Self {
        self.ancestors.push(name.into());
        self
    }

    /// Declares one public data field.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    /// Declares several public data fields at once.
    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(names.into_iter().map(Into::into));
        self
    }

    /// Declares a named accessor (the bean-property analogue).
    pub fn accessor<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, ExtractError> + Send + Sync + 'static,
    {
        self.accessors.push((name.into(), Arc::new(f)));
        self
    }

    /// Starts a record instance of this shaped type, pre-tagged with the
    /// declared ancestor chain.
    pub fn record(&self) -> Record {
        let mut record = Record::new(self.name.clone());
        for ancestor in &self.ancestors {
            record = record.ancestor(ancestor.clone());
        }
        record
    }

    /// The type name this shape describes.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared ancestor chain.
    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    /// Declared field names, in declaration order.
    pub fn field_names(&self) -> &[String] {
        &self.fields
    }

    /// Declared accessor names, in declaration order.
    pub fn accessor_names(&self) -> impl Iterator<Item = &str> {
        self.accessors.iter().map(|(n, _)| n.as_str())
    }

    /// Whether the shape declares the named field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    /// Looks a named accessor up.
    pub fn accessor_named(&self, name: &str) -> Option<&AccessorFn> {
        self.accessors
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f)
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("name", &self.name)
            .field("ancestors", &self.ancestors)
            .field("fields", &self.fields)
            .field(
                "accessors",
                &self
                    .accessors
                    .iter()
                    .map(|(n, _)| n.as_str())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_fields_and_accessors() {
        let shape = Shape::new("bundle")
            .ancestor("artifact")
            .fields(["id", "symbolic_name"])
            .field("state")
            .accessor("header_count", |_| Ok(Value::from(0u64)));

        assert_eq!(shape.name(), "bundle");
        assert_eq!(shape.ancestors(), &["artifact".to_string()]);
        assert!(shape.has_field("id"));
        assert!(shape.has_field("state"));
        assert!(!shape.has_field("bogus"));
        assert!(shape.accessor_named("header_count").is_some());
        assert!(shape.accessor_named("missing").is_none());
        assert_eq!(
            shape.accessor_names().collect::<Vec<_>>(),
            vec!["header_count"]
        );
    }

    #[test]
    fn record_carries_declared_ancestry() {
        let shape = Shape::new("cat").ancestor("animal").field("name");
        let record = shape.record().field("name", "whiskers");
        assert_eq!(record.type_name(), "cat");
        assert!(record.type_ref().is_a("animal"));
    }

    #[test]
    fn debug_lists_accessor_names_only() {
        let shape = Shape::new("t").accessor("a", |v| Ok(v.clone()));
        let debug = format!("{:?}", shape);
        assert!(debug.contains("\"a\""));
    }
}
