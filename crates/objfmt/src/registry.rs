//! The descriptor registry: exact-match lookup plus ordered ancestor scan.

use std::collections::HashMap;

use crate::builder::TypeConfig;
use crate::descriptor::TypeDescriptor;
use crate::error::ConfigError;
use crate::shape::Shape;
use crate::value::TypeRef;

/// Process-wide registry of per-type display rules.
///
/// Written during an explicit setup phase, read by arbitrarily many
/// renderers afterwards. Rust's aliasing rules make the split explicit:
/// registration needs `&mut Registry`, rendering only `&Registry`, so a
/// populated registry behind an `Arc` is safe to share across threads and
/// late registration requires taking exclusive access again.
#[derive(Debug, Default)]
pub struct Registry {
    order: Vec<TypeDescriptor>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Registry::default()
    }

    /// Begins (or, for an already-registered name, resumes) configuration
    /// of the shaped type. Nothing is visible to renderers until the
    /// returned configuration is [`install`](Registry::install)ed.
    pub fn describe(&self, shape: Shape) -> TypeConfig {
        let descriptor = self
            .get(shape.name())
            .cloned()
            .unwrap_or_else(|| TypeDescriptor::new(shape.name()));
        TypeConfig::new(shape, descriptor)
    }

    /// Installs a finished configuration, failing fast on the first
    /// configuration error recorded while building it.
    pub fn install(&mut self, config: TypeConfig) -> Result<(), ConfigError> {
        let descriptor = config.finish()?;
        self.register(descriptor);
        Ok(())
    }

    /// Inserts or overwrites a descriptor by exact type name. An overwrite
    /// keeps the original registration position, so the ancestor-scan order
    /// is stable across re-registration.
    pub fn register(&mut self, descriptor: TypeDescriptor) {
        match self.index.get(descriptor.type_name()) {
            Some(&i) => self.order[i] = descriptor,
            None => {
                self.index
                    .insert(descriptor.type_name().to_string(), self.order.len());
                self.order.push(descriptor);
            }
        }
    }

    /// Looks a descriptor up by exact type name.
    pub fn get(&self, type_name: &str) -> Option<&TypeDescriptor> {
        self.index.get(type_name).map(|&i| &self.order[i])
    }

    /// Resolves the descriptor for a runtime type.
    ///
    /// Exact name match wins; otherwise the first registered type, in
    /// registration order, that the runtime type "is-a" via its declared
    /// ancestor chain. First-match, not best-match: when two unrelated
    /// registered ancestors both apply, the earlier registration wins, so
    /// callers should register most-specific types first.
    pub fn resolve(&self, ty: TypeRef<'_>) -> Option<&TypeDescriptor> {
        if let Some(descriptor) = self.get(ty.name) {
            return Some(descriptor);
        }
        self.order.iter().find(|d| ty.is_a(d.type_name()))
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no types are registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
