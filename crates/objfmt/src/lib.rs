//! objfmt: render arbitrary runtime values as text tables.
//!
//! The engine takes a dynamic [`Value`] tree (records, maps, lists,
//! scalars, nested arbitrarily deep) and a registry of per-type display
//! rules, and produces human-readable monospaced output at one of three
//! granularities:
//!
//! - [`Level::Inspect`]: full vertical detail, one row per configured item
//! - [`Level::Line`]: one table row, used for elements of homogeneous lists
//! - [`Level::Part`]: a compact inline fragment for embedded values
//!
//! Types are registered once at startup through a fluent configuration
//! DSL; rendering afterwards is read-only, deterministic, and total:
//! extraction failures become error-marker cells instead of escaping to
//! the caller.
//!
//! # Quick start
//!
//! ```rust
//! use objfmt::{Level, Record, Registry, RenderOptions, Renderer, Shape, Value};
//!
//! // Declare the type surface and register display rules, once at setup.
//! let mut registry = Registry::new();
//! let mut cfg = registry.describe(Shape::new("bundle").fields(["id", "name"]));
//! cfg.line().field("id");
//! cfg.line().field("name");
//! registry.install(cfg).unwrap();
//!
//! // Any list of bundles now renders as a table with one header row.
//! let bundles = Value::List(vec![
//!     Value::from(Record::new("bundle").field("id", 0u64).field("name", "system")),
//!     Value::from(Record::new("bundle").field("id", 1u64).field("name", "scr")),
//! ]);
//!
//! let renderer = Renderer::with_options(&registry, RenderOptions::plain());
//! assert_eq!(
//!     renderer.format(&bundles, Level::Inspect),
//!     "ID  NAME\n0   system\n1   scr"
//! );
//! ```
//!
//! # Sharing the registry
//!
//! The registry is written during setup (`&mut Registry`) and read by any
//! number of concurrent renderers afterwards (`&Registry`); wrap it in an
//! `Arc` to share across threads. Registering after rendering has begun
//! requires exclusive access again, which the borrow checker enforces.

mod builder;
mod classify;
mod descriptor;
mod engine;
mod error;
mod glob;
mod registry;
mod shape;
mod value;

pub use builder::{GroupConfig, ItemConfig, TypeConfig};
pub use descriptor::{
    FormatFn, GroupDescriptor, GroupFormatFn, ItemDescriptor, ItemFormat, Member, TypeDescriptor,
};
pub use engine::{Level, RenderOptions, Renderer};
pub use error::{ConfigError, ExtractError, UnsupportedLevel};
pub use glob::GlobPattern;
pub use registry::Registry;
pub use shape::{AccessorFn, Shape};
pub use value::{Number, Record, TypeRef, Value};

// The layout collaborator, re-exported for callers that build or consume
// cells directly.
pub use objfmt_grid as grid;
pub use objfmt_grid::{BorderStyle, Cell};
