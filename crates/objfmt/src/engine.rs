//! The recursive rendering engine.
//!
//! One function, [`Renderer::render`], parameterized by an enumerated
//! [`Level`], walks the value tree and produces a [`Cell`]. Collections and
//! maps are classified independently of the requested level; registered
//! records render through their descriptor's group for that level;
//! unregistered records fall back to field-order reflection over the value
//! itself; everything else becomes a leaf via the generic string form.
//!
//! Rendering never fails: extraction and format errors are folded into
//! error-marker cells at the smallest granularity, and a depth guard turns
//! pathological nesting into a marker leaf instead of a stack overflow.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use objfmt_grid::{truncate_end, BorderStyle, Cell};

use crate::classify::{classify, ListClass};
use crate::descriptor::{GroupDescriptor, ItemDescriptor, TypeDescriptor};
use crate::error::{ExtractError, UnsupportedLevel};
use crate::registry::Registry;
use crate::value::{Record, Value};

/// Rendering granularity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Full structured rendering: one row per item, two columns.
    Inspect,
    /// Single-row rendering, one column per item.
    Line,
    /// Compact inline fragment.
    Part,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Inspect => "inspect",
            Level::Line => "line",
            Level::Part => "part",
        };
        f.write_str(name)
    }
}

impl FromStr for Level {
    type Err = UnsupportedLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inspect" => Ok(Level::Inspect),
            "line" => Ok(Level::Line),
            "part" => Ok(Level::Part),
            _ => Err(UnsupportedLevel(s.to_string())),
        }
    }
}

/// Options for one rendering pass.
///
/// The border choice travels with the call instead of living in
/// process-wide state.
#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    /// Border glyph set used when converting cells to text.
    pub border: BorderStyle,
    /// Maximum recursion depth before rendering degrades to a marker leaf.
    pub depth_limit: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            border: BorderStyle::Light,
            depth_limit: 64,
        }
    }
}

impl RenderOptions {
    /// Plain whitespace-aligned output, no border glyphs.
    pub fn plain() -> Self {
        RenderOptions {
            border: BorderStyle::None,
            ..RenderOptions::default()
        }
    }

    /// Boxed output with the given glyph set.
    pub fn boxed(border: BorderStyle) -> Self {
        RenderOptions {
            border,
            ..RenderOptions::default()
        }
    }
}

/// Generic-string fallback: only applied past this length.
const FOLD_LENGTH_THRESHOLD: usize = 25;
/// Generic-string fallback: only applied past this many comma segments.
const FOLD_SEGMENT_THRESHOLD: usize = 5;

/// Field names that qualify as a record's primary identifier, in priority
/// order, compared case-insensitively.
const ID_NAMES: [&str; 4] = ["id", "key", "name", "title"];

/// Renders values against a populated registry.
pub struct Renderer<'r> {
    registry: &'r Registry,
    options: RenderOptions,
}

impl<'r> Renderer<'r> {
    /// Creates a renderer with default options (light boxes).
    pub fn new(registry: &'r Registry) -> Self {
        Renderer {
            registry,
            options: RenderOptions::default(),
        }
    }

    /// Creates a renderer with explicit options.
    pub fn with_options(registry: &'r Registry, options: RenderOptions) -> Self {
        Renderer { registry, options }
    }

    /// The options this renderer applies.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Renders a value at the requested granularity to a cell tree.
    ///
    /// Never fails: errors are contained in the output.
    pub fn render(&self, value: &Value, level: Level) -> Cell {
        self.cell_at(value, level, 0)
    }

    /// Renders a value straight to displayable text.
    pub fn format(&self, value: &Value, level: Level) -> String {
        self.render(value, level).to_text(self.options.border)
    }

    /// Level-directed rendering: the entry for top-level calls and for
    /// positions that prescribe a granularity.
    fn cell_at(&self, value: &Value, level: Level, depth: usize) -> Cell {
        if depth > self.options.depth_limit {
            return self.depth_marker();
        }

        match value {
            Value::Null => {
                if depth == 0 {
                    Cell::text("null")
                } else {
                    Cell::Empty
                }
            }
            Value::List(_) | Value::Map(_) => self.cell_auto(value, depth),
            Value::Record(record) => match self.registry.resolve(record.type_ref()) {
                Some(descriptor) => match level {
                    Level::Inspect => self.inspect_cell(value, descriptor, depth),
                    Level::Line => self.line_cell(value, descriptor, depth),
                    Level::Part => self.part_cell(value, descriptor, depth),
                },
                None => self.reflective_cell(record, level, depth),
            },
            _ => generic_leaf(value),
        }
    }

    /// Value-position rendering: nulls collapse to the empty sentinel,
    /// collections classify themselves, records render compactly.
    fn cell_auto(&self, value: &Value, depth: usize) -> Cell {
        if depth > self.options.depth_limit {
            return self.depth_marker();
        }

        match value {
            Value::Null => Cell::Empty,
            Value::List(items) => self.list_cell(items, depth),
            Value::Map(entries) => self.map_cell(entries, depth),
            Value::Record(record) => match self.registry.resolve(record.type_ref()) {
                Some(descriptor) => self.part_cell(value, descriptor, depth),
                None => match self.reflective_part(record, depth) {
                    Some(cell) => cell,
                    None => generic_leaf(value),
                },
            },
            _ => generic_leaf(value),
        }
    }

    /// Two-column item table for a registered record.
    fn inspect_cell(&self, value: &Value, descriptor: &TypeDescriptor, depth: usize) -> Cell {
        if let Some(cell) = self.group_format_cell(value, &descriptor.inspect) {
            return cell;
        }
        let rows = descriptor
            .inspect
            .items()
            .iter()
            .map(|item| {
                vec![
                    Cell::text(item.label.clone()),
                    self.item_cell(value, item, depth),
                ]
            })
            .collect();
        Cell::grid(rows, 0)
    }

    /// Single-row item table for a registered record.
    fn line_cell(&self, value: &Value, descriptor: &TypeDescriptor, depth: usize) -> Cell {
        if let Some(cell) = self.group_format_cell(value, &descriptor.line) {
            return cell;
        }
        let row = descriptor
            .line
            .items()
            .iter()
            .map(|item| self.item_cell(value, item, depth))
            .collect();
        Cell::grid(vec![row], 0)
    }

    /// Compact inline fragment for a registered record.
    fn part_cell(&self, value: &Value, descriptor: &TypeDescriptor, depth: usize) -> Cell {
        let group = &descriptor.part;
        if let Some(cell) = self.group_format_cell(value, group) {
            return cell;
        }

        let mut out = String::new();
        out.push_str(&group.prefix);
        for (i, item) in group.items().iter().enumerate() {
            if i > 0 {
                out.push_str(&group.separator);
            }
            let cell = self.item_cell(value, item, depth);
            out.push_str(&inline_text(&cell));
        }
        out.push_str(&group.suffix);
        Cell::text(out)
    }

    /// Applies a group's whole-object format function, if any.
    fn group_format_cell(&self, value: &Value, group: &GroupDescriptor) -> Option<Cell> {
        let format = group.format.as_ref()?;
        Some(match format(value) {
            Ok(text) => Cell::text(text),
            Err(e) => self.error_cell(&e),
        })
    }

    /// Extracts one item's value and renders it in value position,
    /// containing any failure to this cell.
    fn item_cell(&self, value: &Value, item: &ItemDescriptor, depth: usize) -> Cell {
        match item.extract(value) {
            Ok(extracted) => apply_width_hints(self.cell_auto(&extracted, depth + 1), item),
            Err(ExtractError::MissingRule { label }) => {
                debug!("item '{}' has no extraction rule", label);
                Cell::text(format!("? {}", label))
            }
            Err(e) => self.error_cell(&e),
        }
    }

    /// Classified rendering of a list.
    fn list_cell(&self, items: &[Value], depth: usize) -> Cell {
        match classify(items, self.registry) {
            ListClass::Empty => Cell::text(""),
            ListClass::ShortStrings => {
                Cell::lines(items.iter().map(Value::to_string).collect())
            }
            ListClass::Scalars => {
                let joined = items
                    .iter()
                    .map(Value::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                Cell::text(joined)
            }
            ListClass::RowsAtLine => {
                let rows = items
                    .iter()
                    .map(|item| vec![self.cell_at(item, Level::Line, depth + 1)])
                    .collect();
                Cell::grid(rows, 0)
            }
            ListClass::Registered(descriptor) => self.line_table(items, descriptor, depth),
        }
    }

    /// Table of homogeneous registered elements, driven by the `line` group.
    fn line_table(&self, items: &[Value], descriptor: &TypeDescriptor, depth: usize) -> Cell {
        let group = &descriptor.line;

        if group.format.is_some() {
            let rows = items
                .iter()
                .map(|item| {
                    vec![self
                        .group_format_cell(item, group)
                        .unwrap_or(Cell::Empty)]
                })
                .collect();
            return Cell::grid(rows, 0);
        }

        if group.items().is_empty() {
            let rows = items
                .iter()
                .map(|item| vec![Cell::text(item.to_string())])
                .collect();
            return Cell::grid(rows, 0);
        }

        let mut rows = Vec::with_capacity(items.len() + 1);
        rows.push(
            group
                .items()
                .iter()
                .map(|item| Cell::text(item.label.clone()))
                .collect(),
        );
        for element in items {
            rows.push(
                group
                    .items()
                    .iter()
                    .map(|item| self.item_cell(element, item, depth))
                    .collect(),
            );
        }
        Cell::grid(rows, 1)
    }

    /// Two-column map table, entries sorted by the key's string form.
    fn map_cell(&self, entries: &[(Value, Value)], depth: usize) -> Cell {
        let mut sorted: Vec<&(Value, Value)> = entries.iter().collect();
        sorted.sort_by_key(|(k, _)| k.to_string());
        let rows = sorted
            .iter()
            .map(|(k, v)| {
                vec![
                    self.cell_auto(k, depth + 1),
                    self.cell_auto(v, depth + 1),
                ]
            })
            .collect();
        Cell::grid(rows, 0)
    }

    /// Default rendering for records with no registered descriptor: public
    /// fields in alphabetic order.
    fn reflective_cell(&self, record: &Record, level: Level, depth: usize) -> Cell {
        match level {
            Level::Inspect => {
                let rows = sorted_fields(record)
                    .into_iter()
                    .map(|(name, value)| {
                        vec![
                            Cell::text(name.to_string()),
                            self.cell_at(value, Level::Line, depth + 1),
                        ]
                    })
                    .collect();
                Cell::grid(rows, 0)
            }
            Level::Line => {
                let row = sorted_fields(record)
                    .into_iter()
                    .map(|(_, value)| self.cell_auto(value, depth + 1))
                    .collect();
                Cell::grid(vec![row], 0)
            }
            Level::Part => match self.reflective_part(record, depth) {
                Some(cell) => cell,
                None => generic_leaf(&Value::Record(record.clone())),
            },
        }
    }

    /// Compact form of an unregistered record: the highest-priority
    /// identifier-like field, or `None` when the record has none.
    fn reflective_part(&self, record: &Record, depth: usize) -> Option<Cell> {
        let mut primary: Option<&Value> = None;
        let mut priority = ID_NAMES.len();
        for (name, value) in record.fields() {
            for (i, candidate) in ID_NAMES.iter().enumerate().take(priority) {
                if name.eq_ignore_ascii_case(candidate) {
                    priority = i;
                    primary = Some(value);
                }
            }
        }
        primary.map(|value| self.cell_at(value, Level::Part, depth + 1))
    }

    fn error_cell(&self, error: &ExtractError) -> Cell {
        warn!("value extraction failed: {}", error);
        Cell::text(error.to_string())
    }

    fn depth_marker(&self) -> Cell {
        warn!(
            "render depth limit {} exceeded; output truncated",
            self.options.depth_limit
        );
        Cell::text("…")
    }
}

/// Renders a cell as a single inline string for the `part` concatenation.
fn inline_text(cell: &Cell) -> String {
    let text = cell.to_text(BorderStyle::None);
    if text.contains('\n') {
        text.split('\n').collect::<Vec<_>>().join(" ")
    } else {
        text
    }
}

/// Leaf for the generic string form, with the comma-fold heuristic applied.
fn generic_leaf(value: &Value) -> Cell {
    Cell::text(fold_long_csv(value.to_string()))
}

/// Rewrites long comma-heavy strings onto one line per segment. Purely
/// cosmetic; thresholds are part of the output contract.
fn fold_long_csv(text: String) -> String {
    if text.chars().count() > FOLD_LENGTH_THRESHOLD {
        let segments: Vec<&str> = text.split(',').collect();
        if segments.len() > FOLD_SEGMENT_THRESHOLD {
            return segments.join(",\n");
        }
    }
    text
}

/// Clamps a leaf cell to the item's width hints.
fn apply_width_hints(cell: Cell, item: &ItemDescriptor) -> Cell {
    match cell {
        Cell::Leaf(mut leaf) => {
            if let Some(max) = item.max_width {
                for line in &mut leaf.lines {
                    *line = truncate_end(line, max, "…");
                }
            }
            if let Some(min) = item.min_width {
                leaf.ensure_min_width(min);
            }
            Cell::Leaf(leaf)
        }
        other => other,
    }
}

fn sorted_fields(record: &Record) -> Vec<(&String, &Value)> {
    let mut fields: Vec<(&String, &Value)> = record
        .fields()
        .iter()
        .map(|(name, value)| (name, value))
        .collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));
    fields
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn fold_never_changes_short_strings(s in "[a-z,]{0,25}") {
            prop_assert_eq!(fold_long_csv(s.clone()), s);
        }

        #[test]
        fn fold_preserves_content_modulo_newlines(s in "[a-z,]{0,80}") {
            let folded = fold_long_csv(s.clone());
            prop_assert_eq!(folded.replace(",\n", ","), s);
        }

        #[test]
        fn scalar_list_rendering_is_deterministic(
            values in proptest::collection::vec(-1000i64..1000, 0..8),
        ) {
            let registry = Registry::new();
            let renderer = Renderer::with_options(&registry, RenderOptions::plain());
            let list = Value::List(values.iter().copied().map(Value::from).collect());
            prop_assert_eq!(
                renderer.format(&list, Level::Line),
                renderer.format(&list, Level::Line)
            );
        }
    }
}
