//! Display descriptors: the registered rendering recipe for a type.
//!
//! A [`TypeDescriptor`] carries one [`GroupDescriptor`] per rendering
//! granularity (`inspect`, `line`, `part`); each group holds an ordered
//! set of labeled [`ItemDescriptor`]s plus an optional whole-object format
//! function that overrides the item list entirely. Descriptors are plain
//! data: the builder writes them during setup, the engine only reads them.

use std::fmt;
use std::sync::Arc;

use crate::error::ExtractError;
use crate::shape::AccessorFn;
use crate::value::Value;

/// A caller-supplied item transform.
pub type FormatFn = Arc<dyn Fn(&Value) -> Result<Value, ExtractError> + Send + Sync>;

/// A caller-supplied whole-object format function.
pub type GroupFormatFn = Arc<dyn Fn(&Value) -> Result<String, ExtractError> + Send + Sync>;

/// How an item reaches its raw value on the source object.
#[derive(Clone)]
pub enum Member {
    /// Look a record field up by name.
    Field(String),
    /// Call a named accessor bound from the type's shape.
    Accessor { name: String, func: AccessorFn },
    /// Call an explicit closure.
    Closure(FormatFn),
}

impl Member {
    /// Applies this member to the source object.
    pub fn apply(&self, object: &Value) -> Result<Value, ExtractError> {
        match self {
            Member::Field(field) => match object {
                Value::Record(record) => {
                    record
                        .get(field)
                        .cloned()
                        .ok_or_else(|| ExtractError::NoSuchField {
                            type_name: record.type_name().to_string(),
                            field: field.clone(),
                        })
                }
                _ => Err(ExtractError::NotARecord {
                    field: field.clone(),
                }),
            },
            Member::Accessor { func, .. } => func(object),
            Member::Closure(func) => func(object),
        }
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Member::Accessor { name, .. } => f.debug_tuple("Accessor").field(name).finish(),
            Member::Closure(_) => f.write_str("Closure"),
        }
    }
}

/// An item-level transform that takes precedence over `member`.
#[derive(Clone)]
pub enum ItemFormat {
    /// Arbitrary caller-supplied transform.
    Func(FormatFn),
    /// Render the element count of the member's collection value.
    Count,
}

impl fmt::Debug for ItemFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemFormat::Func(_) => f.write_str("Func"),
            ItemFormat::Count => f.write_str("Count"),
        }
    }
}

/// One labeled column/row rule within a group.
#[derive(Clone, Debug)]
pub struct ItemDescriptor {
    /// Display label, case-normalized upper.
    pub label: String,
    /// Value accessor; may be absent for `self_value` or format-only items.
    pub member: Option<Member>,
    /// Transform taking precedence over `member`.
    pub format: Option<ItemFormat>,
    /// Minimum rendered width hint.
    pub min_width: Option<usize>,
    /// Maximum rendered width hint.
    pub max_width: Option<usize>,
    /// Render the object itself rather than a member of it.
    pub self_value: bool,
}

impl ItemDescriptor {
    pub(crate) fn new(label: String) -> Self {
        ItemDescriptor {
            label,
            member: None,
            format: None,
            min_width: None,
            max_width: None,
            self_value: false,
        }
    }

    /// Extracts this item's raw value from the source object.
    ///
    /// Precedence: `format` (including the count transform), then
    /// `self_value`, then `member`. An item with none of the three is a
    /// configuration gap surfaced as [`ExtractError::MissingRule`], a
    /// diagnostic the engine renders in place, never a crash.
    pub fn extract(&self, object: &Value) -> Result<Value, ExtractError> {
        if let Some(format) = &self.format {
            return match format {
                ItemFormat::Func(func) => func(object),
                ItemFormat::Count => {
                    let member = self.member.as_ref().ok_or_else(|| {
                        ExtractError::MissingRule {
                            label: self.label.clone(),
                        }
                    })?;
                    Ok(count_of(&member.apply(object)?))
                }
            };
        }

        if self.self_value {
            return Ok(object.clone());
        }

        match &self.member {
            Some(member) => member.apply(object),
            None => Err(ExtractError::MissingRule {
                label: self.label.clone(),
            }),
        }
    }
}

fn count_of(value: &Value) -> Value {
    match value {
        Value::List(items) => Value::from(items.len()),
        Value::Map(entries) => Value::from(entries.len()),
        _ => Value::from("?"),
    }
}

/// One rendering recipe: ordered items plus presentation options.
#[derive(Clone, Default)]
pub struct GroupDescriptor {
    /// Optional heading for hosting layers that print titles.
    pub title: Option<String>,
    /// Separator between items in the `part` string form.
    pub separator: String,
    /// Prefix of the `part` string form.
    pub prefix: String,
    /// Suffix of the `part` string form.
    pub suffix: String,
    /// Whole-object format function; overrides the item list when present.
    pub format: Option<GroupFormatFn>,
    items: Vec<ItemDescriptor>,
}

impl GroupDescriptor {
    /// Items in declared order.
    pub fn items(&self) -> &[ItemDescriptor] {
        &self.items
    }

    /// Returns the item for `label`, inserting it if absent. Labels are
    /// case-normalized upper and unique within the group.
    pub(crate) fn entry(&mut self, label: &str) -> &mut ItemDescriptor {
        let label = label.to_uppercase();
        let index = match self.items.iter().position(|item| item.label == label) {
            Some(i) => i,
            None => {
                self.items.push(ItemDescriptor::new(label));
                self.items.len() - 1
            }
        };
        &mut self.items[index]
    }

    /// Removes the item for `label`, if present.
    pub(crate) fn remove(&mut self, label: &str) {
        let label = label.to_uppercase();
        self.items.retain(|item| item.label != label);
    }
}

impl fmt::Debug for GroupDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupDescriptor")
            .field("title", &self.title)
            .field("separator", &self.separator)
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("format", &self.format.as_ref().map(|_| "<fn>"))
            .field("items", &self.items)
            .finish()
    }
}

/// The registered rendering recipe for one type: a group per granularity.
#[derive(Clone, Debug)]
pub struct TypeDescriptor {
    type_name: String,
    /// Full structured rendering: one row per item, two columns.
    pub inspect: GroupDescriptor,
    /// Single-row rendering used for elements of homogeneous lists.
    pub line: GroupDescriptor,
    /// Compact inline fragment used when embedded in another rendering.
    pub part: GroupDescriptor,
}

impl TypeDescriptor {
    /// Creates an empty descriptor for the given type name.
    pub fn new(type_name: impl Into<String>) -> Self {
        TypeDescriptor {
            type_name: type_name.into(),
            inspect: GroupDescriptor::default(),
            line: GroupDescriptor::default(),
            part: GroupDescriptor::default(),
        }
    }

    /// The type this descriptor is registered for.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Record;

    fn sample() -> Value {
        Value::from(
            Record::new("task")
                .field("id", 7u64)
                .field("tags", Value::List(vec![Value::from("a"), Value::from("b")])),
        )
    }

    #[test]
    fn entry_normalizes_and_deduplicates_labels() {
        let mut group = GroupDescriptor::default();
        group.entry("id").min_width = Some(3);
        group.entry("ID").max_width = Some(9);

        assert_eq!(group.items().len(), 1);
        assert_eq!(group.items()[0].label, "ID");
        assert_eq!(group.items()[0].min_width, Some(3));
        assert_eq!(group.items()[0].max_width, Some(9));
    }

    #[test]
    fn remove_is_case_insensitive() {
        let mut group = GroupDescriptor::default();
        group.entry("id");
        group.remove("Id");
        assert!(group.items().is_empty());
    }

    #[test]
    fn member_field_extraction() {
        let member = Member::Field("id".to_string());
        assert_eq!(member.apply(&sample()).unwrap(), Value::from(7u64));
    }

    #[test]
    fn member_field_on_missing_field_fails() {
        let member = Member::Field("nope".to_string());
        assert!(matches!(
            member.apply(&sample()),
            Err(ExtractError::NoSuchField { .. })
        ));
    }

    #[test]
    fn member_field_on_scalar_fails() {
        let member = Member::Field("id".to_string());
        assert!(matches!(
            member.apply(&Value::from(1i64)),
            Err(ExtractError::NotARecord { .. })
        ));
    }

    #[test]
    fn extract_precedence_format_over_member() {
        let mut item = ItemDescriptor::new("X".to_string());
        item.member = Some(Member::Field("id".to_string()));
        item.format = Some(ItemFormat::Func(Arc::new(|_| Ok(Value::from("override")))));
        assert_eq!(item.extract(&sample()).unwrap(), Value::from("override"));
    }

    #[test]
    fn extract_self_value() {
        let mut item = ItemDescriptor::new("X".to_string());
        item.self_value = true;
        assert_eq!(item.extract(&sample()).unwrap(), sample());
    }

    #[test]
    fn extract_count_of_member_list() {
        let mut item = ItemDescriptor::new("TAGS".to_string());
        item.member = Some(Member::Field("tags".to_string()));
        item.format = Some(ItemFormat::Count);
        assert_eq!(item.extract(&sample()).unwrap(), Value::from(2usize));
    }

    #[test]
    fn extract_count_of_scalar_is_unknown() {
        let mut item = ItemDescriptor::new("ID".to_string());
        item.member = Some(Member::Field("id".to_string()));
        item.format = Some(ItemFormat::Count);
        assert_eq!(item.extract(&sample()).unwrap(), Value::from("?"));
    }

    #[test]
    fn extract_without_any_rule_is_diagnostic() {
        let item = ItemDescriptor::new("PRICE".to_string());
        assert!(matches!(
            item.extract(&sample()),
            Err(ExtractError::MissingRule { .. })
        ));
    }
}
