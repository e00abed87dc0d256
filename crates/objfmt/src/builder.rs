//! Fluent configuration of type descriptors.
//!
//! Configuration threads explicit context values instead of shared mutable
//! state: [`TypeConfig`] owns the descriptor draft, [`GroupConfig`] borrows
//! one group out of it, and [`ItemConfig`] borrows one item out of the
//! group. Binding mistakes (unknown field or accessor names, bad globs) are
//! recorded as they happen and surfaced by [`Registry::install`], which
//! fails fast on the first one; the `optional_*` variants drop the binding
//! silently instead.
//!
//! ```rust
//! use objfmt::{Registry, Shape};
//!
//! let shape = Shape::new("bundle").fields(["id", "symbolic_name", "state"]);
//!
//! let mut registry = Registry::new();
//! let mut cfg = registry.describe(shape);
//! cfg.line().field("id").width(4);
//! cfg.line().field("symbolic_name").label("name");
//! cfg.inspect().fields("*");
//! cfg.part().field("id");
//! registry.install(cfg).unwrap();
//!
//! assert_eq!(registry.get("bundle").unwrap().line.items().len(), 2);
//! ```
//!
//! [`Registry::install`]: crate::Registry::install

use std::sync::Arc;

use crate::descriptor::{GroupDescriptor, ItemDescriptor, ItemFormat, Member, TypeDescriptor};
use crate::error::{ConfigError, ExtractError};
use crate::glob::GlobPattern;
use crate::shape::Shape;
use crate::value::Value;

/// An in-progress configuration for one type.
#[derive(Debug)]
pub struct TypeConfig {
    shape: Shape,
    descriptor: TypeDescriptor,
    errors: Vec<ConfigError>,
}

impl TypeConfig {
    pub(crate) fn new(shape: Shape, descriptor: TypeDescriptor) -> Self {
        TypeConfig {
            shape,
            descriptor,
            errors: Vec::new(),
        }
    }

    /// Configuration handle for the `inspect` group.
    pub fn inspect(&mut self) -> GroupConfig<'_> {
        GroupConfig {
            shape: &self.shape,
            group: &mut self.descriptor.inspect,
            errors: &mut self.errors,
        }
    }

    /// Configuration handle for the `line` group.
    pub fn line(&mut self) -> GroupConfig<'_> {
        GroupConfig {
            shape: &self.shape,
            group: &mut self.descriptor.line,
            errors: &mut self.errors,
        }
    }

    /// Configuration handle for the `part` group.
    pub fn part(&mut self) -> GroupConfig<'_> {
        GroupConfig {
            shape: &self.shape,
            group: &mut self.descriptor.part,
            errors: &mut self.errors,
        }
    }

    /// The shape being configured against.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub(crate) fn finish(mut self) -> Result<TypeDescriptor, ConfigError> {
        if self.errors.is_empty() {
            Ok(self.descriptor)
        } else {
            Err(self.errors.remove(0))
        }
    }
}

/// Configuration handle for one group of a type configuration.
pub struct GroupConfig<'a> {
    shape: &'a Shape,
    group: &'a mut GroupDescriptor,
    errors: &'a mut Vec<ConfigError>,
}

impl<'a> GroupConfig<'a> {
    /// Sets the group heading.
    pub fn title(self, title: impl Into<String>) -> Self {
        self.group.title = Some(title.into());
        self
    }

    /// Sets the separator between items in the `part` string form.
    pub fn separator(self, separator: impl Into<String>) -> Self {
        self.group.separator = separator.into();
        self
    }

    /// Sets the prefix of the `part` string form.
    pub fn prefix(self, prefix: impl Into<String>) -> Self {
        self.group.prefix = prefix.into();
        self
    }

    /// Sets the suffix of the `part` string form.
    pub fn suffix(self, suffix: impl Into<String>) -> Self {
        self.group.suffix = suffix.into();
        self
    }

    /// Installs a whole-object format function. When present it overrides
    /// the group's item list entirely.
    pub fn as_format<F>(self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<String, ExtractError> + Send + Sync + 'static,
    {
        self.group.format = Some(Arc::new(f));
        self
    }

    /// Removes the item with the given label.
    pub fn remove(self, label: &str) -> Self {
        self.group.remove(label);
        self
    }

    /// Returns the item configuration for `label`, creating the item if
    /// needed. Labels are unique; reusing one resumes the existing item.
    pub fn item(self, label: &str) -> ItemConfig<'a> {
        let GroupConfig {
            shape,
            group,
            errors,
        } = self;
        ItemConfig {
            shape,
            item: group.entry(label),
            errors,
        }
    }

    /// Adds an item bound to the named field. Shorthand for
    /// `item(name).field(name)`.
    pub fn field(self, name: &str) -> ItemConfig<'a> {
        self.item(name).field(name)
    }

    /// Adds an item bound to the named accessor. Shorthand for
    /// `item(name).method(name)`.
    pub fn method(self, name: &str) -> ItemConfig<'a> {
        self.item(name).method(name)
    }

    /// Like [`field`](GroupConfig::field), but an unknown name adds no item
    /// and records no error.
    pub fn optional_field(self, name: &str) -> Self {
        if self.shape.has_field(name) {
            self.group.entry(name).member = Some(Member::Field(name.to_string()));
        }
        self
    }

    /// Like [`method`](GroupConfig::method), but an unknown name adds no
    /// item and records no error.
    pub fn optional_method(self, name: &str) -> Self {
        if let Some(func) = self.shape.accessor_named(name) {
            self.group.entry(name).member = Some(Member::Accessor {
                name: name.to_string(),
                func: func.clone(),
            });
        }
        self
    }

    /// Adds an item with an inline transform.
    pub fn format<F>(self, label: &str, f: F) -> ItemConfig<'a>
    where
        F: Fn(&Value) -> Result<Value, ExtractError> + Send + Sync + 'static,
    {
        let item = self.item(label);
        item.item.format = Some(ItemFormat::Func(Arc::new(f)));
        item
    }

    /// Adds one field-bound item per declared field matching the glob
    /// pattern, in declaration order.
    pub fn fields(self, pattern: &str) -> Self {
        match GlobPattern::new(pattern) {
            Ok(glob) => {
                let names: Vec<String> = self
                    .shape
                    .field_names()
                    .iter()
                    .filter(|name| glob.matches(name))
                    .cloned()
                    .collect();
                for name in names {
                    self.group.entry(&name).member = Some(Member::Field(name.clone()));
                }
            }
            Err(e) => self.errors.push(e),
        }
        self
    }

    /// Adds one accessor-bound item per declared accessor matching the glob
    /// pattern, in declaration order.
    pub fn methods(self, pattern: &str) -> Self {
        match GlobPattern::new(pattern) {
            Ok(glob) => {
                let names: Vec<String> = self
                    .shape
                    .accessor_names()
                    .filter(|name| glob.matches(name))
                    .map(str::to_string)
                    .collect();
                for name in names {
                    if let Some(func) = self.shape.accessor_named(&name) {
                        self.group.entry(&name).member = Some(Member::Accessor {
                            name: name.clone(),
                            func: func.clone(),
                        });
                    }
                }
            }
            Err(e) => self.errors.push(e),
        }
        self
    }
}

/// Configuration handle for one item of a group.
pub struct ItemConfig<'a> {
    shape: &'a Shape,
    item: &'a mut ItemDescriptor,
    errors: &'a mut Vec<ConfigError>,
}

impl ItemConfig<'_> {
    /// Binds the item to the named declared field. An unknown name is a
    /// configuration error surfaced at install time.
    pub fn field(self, name: &str) -> Self {
        if self.shape.has_field(name) {
            self.item.member = Some(Member::Field(name.to_string()));
        } else {
            self.errors.push(ConfigError::UnknownField {
                type_name: self.shape.name().to_string(),
                field: name.to_string(),
            });
        }
        self
    }

    /// Binds the item to the named declared accessor. An unknown name is a
    /// configuration error surfaced at install time.
    pub fn method(self, name: &str) -> Self {
        match self.shape.accessor_named(name) {
            Some(func) => {
                self.item.member = Some(Member::Accessor {
                    name: name.to_string(),
                    func: func.clone(),
                });
            }
            None => self.errors.push(ConfigError::UnknownAccessor {
                type_name: self.shape.name().to_string(),
                method: name.to_string(),
            }),
        }
        self
    }

    /// Binds the item to an explicit accessor closure.
    pub fn accessor<F>(self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, ExtractError> + Send + Sync + 'static,
    {
        self.item.member = Some(Member::Closure(Arc::new(f)));
        self
    }

    /// Overrides the display label.
    pub fn label(self, label: &str) -> Self {
        self.item.label = label.to_uppercase();
        self
    }

    /// Sets the minimum rendered width.
    pub fn min_width(self, width: usize) -> Self {
        self.item.min_width = Some(width);
        self
    }

    /// Sets the maximum rendered width.
    pub fn max_width(self, width: usize) -> Self {
        self.item.max_width = Some(width);
        self
    }

    /// Sets minimum and maximum rendered width at once.
    pub fn width(self, width: usize) -> Self {
        self.min_width(width).max_width(width)
    }

    /// Renders the element count of the bound member's collection value
    /// instead of the value itself.
    pub fn count(self) -> Self {
        self.item.format = Some(ItemFormat::Count);
        self
    }

    /// Renders the object itself rather than a member of it.
    pub fn self_value(self) -> Self {
        self.item.self_value = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    fn shape() -> Shape {
        Shape::new("component")
            .fields(["id", "name", "state"])
            .accessor("reference_count", |_| Ok(Value::from(3u64)))
            .accessor("service_count", |_| Ok(Value::from(1u64)))
    }

    #[test]
    fn install_publishes_configured_items() {
        let mut registry = Registry::new();
        let mut cfg = registry.describe(shape());
        assert_eq!(cfg.shape().name(), "component");
        cfg.line().field("id");
        cfg.line().field("name");
        registry.install(cfg).unwrap();

        let descriptor = registry.get("component").unwrap();
        let labels: Vec<&str> = descriptor
            .line
            .items()
            .iter()
            .map(|i| i.label.as_str())
            .collect();
        assert_eq!(labels, vec!["ID", "NAME"]);
    }

    #[test]
    fn unknown_field_fails_install() {
        let mut registry = Registry::new();
        let mut cfg = registry.describe(shape());
        cfg.line().field("bogus");
        let err = registry.install(cfg).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownField { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn unknown_method_fails_install() {
        let mut registry = Registry::new();
        let mut cfg = registry.describe(shape());
        cfg.inspect().method("bogus");
        assert!(matches!(
            registry.install(cfg),
            Err(ConfigError::UnknownAccessor { .. })
        ));
    }

    #[test]
    fn optional_bindings_drop_silently() {
        let mut registry = Registry::new();
        let mut cfg = registry.describe(shape());
        cfg.line().optional_field("bogus").optional_field("id");
        cfg.line().optional_method("missing").optional_method("reference_count");
        registry.install(cfg).unwrap();

        let descriptor = registry.get("component").unwrap();
        let labels: Vec<&str> = descriptor
            .line
            .items()
            .iter()
            .map(|i| i.label.as_str())
            .collect();
        assert_eq!(labels, vec!["ID", "REFERENCE_COUNT"]);
    }

    #[test]
    fn glob_bindings_follow_declaration_order() {
        let mut registry = Registry::new();
        let mut cfg = registry.describe(shape());
        cfg.inspect().fields("*");
        cfg.inspect().methods("*_count");
        registry.install(cfg).unwrap();

        let descriptor = registry.get("component").unwrap();
        let labels: Vec<&str> = descriptor
            .inspect
            .items()
            .iter()
            .map(|i| i.label.as_str())
            .collect();
        assert_eq!(
            labels,
            vec!["ID", "NAME", "STATE", "REFERENCE_COUNT", "SERVICE_COUNT"]
        );
    }

    #[test]
    fn remove_drops_bulk_added_items() {
        let mut registry = Registry::new();
        let mut cfg = registry.describe(shape());
        cfg.inspect().fields("*");
        cfg.inspect().remove("state");
        registry.install(cfg).unwrap();
        let labels: Vec<&str> = registry
            .get("component")
            .unwrap()
            .inspect
            .items()
            .iter()
            .map(|i| i.label.as_str())
            .collect();
        assert_eq!(labels, vec!["ID", "NAME"]);
    }

    #[test]
    fn describe_resumes_existing_descriptor() {
        let mut registry = Registry::new();
        let mut cfg = registry.describe(shape());
        cfg.line().field("id");
        registry.install(cfg).unwrap();

        let mut cfg = registry.describe(shape());
        cfg.line().field("name");
        cfg.line().remove("id");
        registry.install(cfg).unwrap();

        let labels: Vec<&str> = registry
            .get("component")
            .unwrap()
            .line
            .items()
            .iter()
            .map(|i| i.label.as_str())
            .collect();
        assert_eq!(labels, vec!["NAME"]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn part_presentation_options() {
        let mut registry = Registry::new();
        let mut cfg = registry.describe(shape());
        cfg.part()
            .title("Component")
            .prefix("(")
            .separator(":")
            .suffix(")")
            .field("id");
        registry.install(cfg).unwrap();

        let part = &registry.get("component").unwrap().part;
        assert_eq!(part.title.as_deref(), Some("Component"));
        assert_eq!(part.prefix, "(");
        assert_eq!(part.separator, ":");
        assert_eq!(part.suffix, ")");
    }

    #[test]
    fn count_requires_member_at_extraction_only() {
        let mut registry = Registry::new();
        let mut cfg = registry.describe(shape());
        cfg.line().item("services").accessor(|_| {
            Ok(Value::List(vec![Value::from(1i64), Value::from(2i64)]))
        }).count();
        registry.install(cfg).unwrap();

        let descriptor = registry.get("component").unwrap();
        let item = &descriptor.line.items()[0];
        let record = crate::value::Record::new("component");
        assert_eq!(
            item.extract(&Value::from(record)).unwrap(),
            Value::from(2usize)
        );
    }
}
