//! Collection classification.
//!
//! Given the elements of a list, infer the most specific common type and
//! pick one of five rendering strategies: nothing to show, a compact
//! string list, a joined scalar list, a one-column table of per-element
//! renderings, or, when a descriptor is registered for the common type,
//! a proper table driven by that type's `line` group.

use crate::descriptor::TypeDescriptor;
use crate::registry::Registry;
use crate::value::{TypeRef, Value};

/// Aggregate character budget under which a homogeneous string list is
/// rendered as a compact list-of-strings leaf instead of a table.
const SHORT_STRING_LIST_LIMIT: usize = 100;

/// The inferred common type of a list's non-null elements.
#[derive(Clone, Copy, Debug)]
pub(crate) enum CommonType<'a> {
    Text,
    Number,
    Bool,
    Char,
    List,
    Map,
    Record(TypeRef<'a>),
    /// Top type: the elements share no more specific ancestor.
    Any,
}

impl CommonType<'_> {
    fn same_kind(&self, other: &CommonType<'_>) -> bool {
        matches!(
            (self, other),
            (CommonType::Text, CommonType::Text)
                | (CommonType::Number, CommonType::Number)
                | (CommonType::Bool, CommonType::Bool)
                | (CommonType::Char, CommonType::Char)
                | (CommonType::List, CommonType::List)
                | (CommonType::Map, CommonType::Map)
                | (CommonType::Any, CommonType::Any)
        )
    }
}

/// The rendering strategy chosen for a list.
pub(crate) enum ListClass<'a> {
    /// Empty list, or all elements null.
    Empty,
    /// Homogeneous short strings; render as a compact list-of-strings leaf.
    ShortStrings,
    /// Numeric, boolean, or character elements; render joined by `", "`.
    Scalars,
    /// No usable descriptor; render one row per element at line granularity.
    RowsAtLine,
    /// A descriptor is registered for the common type; drive a table from
    /// its `line` group.
    Registered(&'a TypeDescriptor),
}

/// Classifies a list against the registry.
pub(crate) fn classify<'a>(elements: &'a [Value], registry: &'a Registry) -> ListClass<'a> {
    let common = match common_type(elements) {
        Some(common) => common,
        None => return ListClass::Empty,
    };

    if let CommonType::Record(ty) = common {
        if let Some(descriptor) = registry.resolve(ty) {
            return ListClass::Registered(descriptor);
        }
    }

    match common {
        CommonType::Text if aggregate_text_len(elements) < SHORT_STRING_LIST_LIMIT => {
            ListClass::ShortStrings
        }
        CommonType::Number | CommonType::Bool | CommonType::Char => ListClass::Scalars,
        _ => ListClass::RowsAtLine,
    }
}

/// Narrows the non-null elements to their most specific common type.
/// Returns `None` when the list is empty or all elements are null.
pub(crate) fn common_type(elements: &[Value]) -> Option<CommonType<'_>> {
    let mut common: Option<CommonType<'_>> = None;
    for element in elements {
        let ty = match element_type(element) {
            Some(ty) => ty,
            None => continue,
        };
        common = Some(match common {
            None => ty,
            Some(running) => merge(ty, running),
        });
    }
    common
}

fn element_type(value: &Value) -> Option<CommonType<'_>> {
    match value {
        Value::Null => None,
        Value::Bool(_) => Some(CommonType::Bool),
        Value::Number(_) => Some(CommonType::Number),
        Value::Char(_) => Some(CommonType::Char),
        Value::Text(_) => Some(CommonType::Text),
        Value::List(_) => Some(CommonType::List),
        Value::Map(_) => Some(CommonType::Map),
        Value::Record(record) => Some(CommonType::Record(record.type_ref())),
    }
}

/// Merges one element's type into the running common type: equal types
/// stay, related record types keep the more general one, anything else
/// widens to the top type.
fn merge<'a>(element: CommonType<'a>, running: CommonType<'a>) -> CommonType<'a> {
    if element.same_kind(&running) {
        return running;
    }
    if let (CommonType::Record(a), CommonType::Record(b)) = (&element, &running) {
        if a.name == b.name {
            return running;
        }
        if a.is_a(b.name) {
            return running;
        }
        if b.is_a(a.name) {
            return element;
        }
    }
    CommonType::Any
}

fn aggregate_text_len(elements: &[Value]) -> usize {
    elements
        .iter()
        .map(|e| match e {
            Value::Text(s) => s.chars().count(),
            _ => 0,
        })
        .sum()
}
