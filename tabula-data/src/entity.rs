use serde::Serialize;

use crate::value::Value;

/// Trait representing a database entity with an explicit mapping descriptor:
/// table name, id column, data columns, and bind-value extraction.
///
/// The descriptor is resolved at compile time, so statements can be built
/// without any runtime introspection of the entity type.
///
/// Invariant: `columns()` never contains the id column, and `values()` yields
/// one value per entry of `columns()`, in the same order.
///
/// # Example
///
/// ```ignore
/// impl Entity for User {
///     fn table_name() -> &'static str { "users" }
///     fn columns() -> &'static [&'static str] { &["name", "email"] }
///     fn id_value(&self) -> Value { Value::Int(self.id) }
///     fn values(&self) -> Vec<Value> {
///         vec![self.name.clone().into(), self.email.clone().into()]
///     }
///     fn set_generated_id(&mut self, id: i64) { self.id = id; }
/// }
/// ```
pub trait Entity: Send + Sync + Unpin + 'static {
    fn table_name() -> &'static str;

    fn id_column() -> &'static str {
        "id"
    }

    /// Data columns, excluding the id column.
    fn columns() -> &'static [&'static str];

    /// The current primary key value.
    fn id_value(&self) -> Value;

    /// Bind values for the data columns, in `columns()` order.
    fn values(&self) -> Vec<Value>;

    /// Whether the store generates the primary key on insert.
    ///
    /// When true, inserts omit the id column and the generated key is written
    /// back via [`set_generated_id`](Entity::set_generated_id).
    fn id_is_generated() -> bool {
        true
    }

    /// Writeback hook for a store-generated integer key. No-op by default,
    /// for entities whose keys are not integers or not generated.
    fn set_generated_id(&mut self, _id: i64) {}
}

/// A single column in an [`EntityInfo`] field list.
#[derive(Debug, Clone, Serialize)]
pub struct FieldInfo {
    pub name: &'static str,
    pub primary_key: bool,
}

/// Type-level metadata about an entity, derived from its mapping descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct EntityInfo {
    pub name: String,
    pub table_name: &'static str,
    pub fields: Vec<FieldInfo>,
}

impl EntityInfo {
    pub fn of<T: Entity>() -> Self {
        let type_name = std::any::type_name::<T>();
        let name = type_name.rsplit("::").next().unwrap_or(type_name);
        let fields = std::iter::once(FieldInfo {
            name: T::id_column(),
            primary_key: true,
        })
        .chain(T::columns().iter().map(|column| FieldInfo {
            name: column,
            primary_key: false,
        }))
        .collect();
        Self {
            name: name.to_string(),
            table_name: T::table_name(),
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget {
        id: i64,
        label: String,
    }

    impl Entity for Widget {
        fn table_name() -> &'static str {
            "widgets"
        }

        fn columns() -> &'static [&'static str] {
            &["label"]
        }

        fn id_value(&self) -> Value {
            Value::Int(self.id)
        }

        fn values(&self) -> Vec<Value> {
            vec![self.label.clone().into()]
        }
    }

    #[test]
    fn test_entity_info_from_descriptor() {
        let info = EntityInfo::of::<Widget>();
        assert_eq!(info.name, "Widget");
        assert_eq!(info.table_name, "widgets");
        assert_eq!(info.fields.len(), 2);
        assert_eq!(info.fields[0].name, "id");
        assert!(info.fields[0].primary_key);
        assert_eq!(info.fields[1].name, "label");
        assert!(!info.fields[1].primary_key);
    }

    #[test]
    fn test_descriptor_defaults() {
        assert_eq!(Widget::id_column(), "id");
        assert!(Widget::id_is_generated());
        let mut widget = Widget {
            id: 1,
            label: "a".into(),
        };
        widget.set_generated_id(99);
        // Default writeback is a no-op.
        assert_eq!(widget.id, 1);
    }
}
