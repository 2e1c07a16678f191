//! The contract between mapped records and the mapping model.
//!
//! An [`Entity`] tells the schema extractor how its table is described
//! (see [`SchemaSource`]) and gives read/write access to its attributes by
//! id. Hydration creates instances through [`Default`] and fills them with
//! [`Entity::set`].
//!
//! The [`entity!`](crate::entity) macro writes the whole implementation for
//! a struct whose fields carry column annotations.

use crate::error::Result;
use crate::field::FieldDescriptor;
use crate::value::Value;

/// Declared kind of an entity attribute, inferred from its Rust type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Any signed integer, or an unsigned integer narrower than 64 bits.
    Integer,
    /// `u64`.
    Unsigned64,
    /// `String`.
    Text,
    /// `bool`.
    Boolean,
    /// `f32`.
    Float32,
    /// `chrono::NaiveDateTime`.
    DateTime,
    /// A type with no logical mapping; carries the type name.
    Other(&'static str),
}

/// Compile-time kind inference for attribute types.
pub trait FieldKind {
    const KIND: AttributeKind;
}

macro_rules! field_kind {
    ($kind:expr => $($ty:ty),*) => {
        $(
            impl FieldKind for $ty {
                const KIND: AttributeKind = $kind;
            }
        )*
    };
}

field_kind!(AttributeKind::Integer => i8, i16, i32, i64, isize, u8, u16, u32);
field_kind!(AttributeKind::Unsigned64 => u64);
field_kind!(AttributeKind::Text => String);
field_kind!(AttributeKind::Boolean => bool);
field_kind!(AttributeKind::Float32 => f32);
field_kind!(AttributeKind::DateTime => chrono::NaiveDateTime);
field_kind!(AttributeKind::Other("f64") => f64);

impl<T: FieldKind> FieldKind for Option<T> {
    const KIND: AttributeKind = T::KIND;
}

/// One declared attribute with its raw annotations.
///
/// Annotations are `(key, value)` string pairs. Recognized keys are
/// `name`, `primary_key`, `null`, and `length`; an attribute without a
/// non-empty `name` is not mapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub id: String,
    pub kind: AttributeKind,
    pub annotations: Vec<(String, String)>,
}

impl Attribute {
    pub fn new(id: impl Into<String>, kind: AttributeKind, annotations: &[(&str, &str)]) -> Self {
        Self {
            id: id.into(),
            kind,
            annotations: annotations
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Returns the value of the first annotation with the given key.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Where an entity's schema comes from. The two modes are exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    /// The entity lists its descriptors itself, in column order.
    Explicit(Vec<FieldDescriptor>),
    /// The extractor derives descriptors from annotated attributes.
    Annotated(Vec<Attribute>),
}

/// A record type that maps to one table.
///
/// # Examples
///
/// ```
/// use rowbind_core::{Entity, FieldDescriptor, Result, SchemaSource, Value, convert};
///
/// #[derive(Default)]
/// struct Tag {
///     id: i64,
///     label: String,
/// }
///
/// impl Entity for Tag {
///     fn schema_source() -> SchemaSource {
///         SchemaSource::Explicit(vec![
///             FieldDescriptor::int("id").primary_key(true),
///             FieldDescriptor::char("label", 32),
///         ])
///     }
///
///     fn get(&self, id: &str) -> Option<Value> {
///         match id {
///             "id" => Some(Value::Int(self.id)),
///             "label" => Some(Value::Text(self.label.clone())),
///             _ => None,
///         }
///     }
///
///     fn set(&mut self, id: &str, value: Value) -> Result<()> {
///         match id {
///             "id" => self.id = convert(id, &value)?,
///             "label" => self.label = convert(id, &value)?,
///             _ => {}
///         }
///         Ok(())
///     }
/// }
///
/// assert_eq!(Tag::table_name(), "Tag");
/// ```
pub trait Entity: Default {
    /// Table name. Defaults to the type's own name without its module path.
    fn table_name() -> &'static str {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Describes how the schema for this entity is built.
    fn schema_source() -> SchemaSource;

    /// Reads the attribute with the given id.
    fn get(&self, id: &str) -> Option<Value>;

    /// Writes the attribute with the given id.
    fn set(&mut self, id: &str, value: Value) -> Result<()>;
}

/// Declares a struct together with an annotated [`Entity`] implementation.
///
/// Each field lists its annotations after `=>`. A field with an empty list
/// is unmapped: it may have any type, is left out of the schema, and is not
/// reachable through `get`/`set`. Every annotated field type must implement
/// [`FieldKind`], [`IntoValue`](crate::IntoValue),
/// [`FromValue`](crate::FromValue), and `Clone`.
///
/// # Examples
///
/// ```
/// use rowbind_core::{Entity, Schema};
///
/// rowbind_core::entity! {
///     #[derive(Debug, Clone, Default, PartialEq)]
///     pub struct User {
///         pub id: i32 => [name = "id", primary_key = "true"],
///         pub username: String => [name = "username", length = "20"],
///         pub cache: Vec<u8> => [],
///     }
/// }
///
/// let schema = Schema::extract::<User>().unwrap();
/// assert_eq!(schema.table(), "User");
/// assert_eq!(schema.fields().len(), 2);
/// ```
#[macro_export]
macro_rules! entity {
    (@attr $field:ident : $ty:ty => []) => {
        $crate::Attribute::new(
            stringify!($field),
            $crate::AttributeKind::Other(stringify!($ty)),
            &[],
        )
    };
    (@attr $field:ident : $ty:ty => [$($key:ident = $val:literal),+ $(,)?]) => {
        $crate::Attribute::new(
            stringify!($field),
            <$ty as $crate::FieldKind>::KIND,
            &[$((stringify!($key), $val)),+],
        )
    };

    (@get $this:ident, $field:ident : $ty:ty => []) => {
        None
    };
    (@get $this:ident, $field:ident : $ty:ty => [$($ann:tt)+]) => {
        Some($crate::IntoValue::into_value(
            ::core::clone::Clone::clone(&$this.$field),
        ))
    };

    (@set $this:ident, $name:ident, $id:ident, $value:ident, $field:ident : $ty:ty => []) => {
        Err($crate::ModelError::MissingAttribute {
            table: stringify!($name).to_string(),
            attribute: $id.to_string(),
        })
    };
    (@set $this:ident, $name:ident, $id:ident, $value:ident, $field:ident : $ty:ty => [$($ann:tt)+]) => {{
        $this.$field = $crate::convert($id, &$value)?;
        Ok(())
    }};

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty => [$($ann:tt)*]
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::Entity for $name {
            fn table_name() -> &'static str {
                stringify!($name)
            }

            fn schema_source() -> $crate::SchemaSource {
                $crate::SchemaSource::Annotated(vec![
                    $($crate::entity!(@attr $field : $ty => [$($ann)*]),)*
                ])
            }

            fn get(&self, id: &str) -> Option<$crate::Value> {
                match id {
                    $(stringify!($field) => $crate::entity!(@get self, $field : $ty => [$($ann)*]),)*
                    _ => None,
                }
            }

            fn set(&mut self, id: &str, value: $crate::Value) -> $crate::Result<()> {
                match id {
                    $(
                        stringify!($field) => {
                            $crate::entity!(@set self, $name, id, value, $field : $ty => [$($ann)*])
                        }
                    )*
                    _ => Err($crate::ModelError::MissingAttribute {
                        table: stringify!($name).to_string(),
                        attribute: id.to_string(),
                    }),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::entity! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Sample {
            id: i32 => [name = "id", primary_key = "true"],
            note: Option<String> => [name = "note", length = "10"],
        }
    }

    #[test]
    fn test_macro_get_set() {
        let mut sample = Sample::default();
        sample.set("id", Value::Int(4)).unwrap();
        sample.set("note", Value::Text("hi".into())).unwrap();
        assert_eq!(sample.get("id"), Some(Value::Int(4)));
        assert_eq!(sample.get("note"), Some(Value::Text("hi".into())));

        sample.set("note", Value::Null).unwrap();
        assert_eq!(sample.note, None);
        assert!(sample.get("missing").is_none());
        assert!(sample.set("missing", Value::Null).is_err());
    }

    #[test]
    fn test_macro_schema_source() {
        let SchemaSource::Annotated(attrs) = Sample::schema_source() else {
            panic!("expected annotated source");
        };
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].kind, AttributeKind::Integer);
        assert_eq!(attrs[1].kind, AttributeKind::Text);
        assert_eq!(attrs[1].annotation("length"), Some("10"));
        assert_eq!(attrs[0].annotation("length"), None);
    }

    #[test]
    fn test_default_table_name_strips_path() {
        #[derive(Default)]
        struct Plain;

        impl Entity for Plain {
            fn schema_source() -> SchemaSource {
                SchemaSource::Explicit(Vec::new())
            }
            fn get(&self, _id: &str) -> Option<Value> {
                None
            }
            fn set(&mut self, _id: &str, _value: Value) -> Result<()> {
                Ok(())
            }
        }

        assert_eq!(Plain::table_name(), "Plain");
    }

    crate::entity! {
        #[derive(Debug, Clone, Default)]
        struct Cached {
            id: i32 => [name = "id", primary_key = "true"],
            cache: Vec<u8> => [],
        }
    }

    #[test]
    fn test_unmapped_field_may_have_any_type() {
        let SchemaSource::Annotated(attrs) = Cached::schema_source() else {
            panic!("expected annotated source");
        };
        assert!(matches!(attrs[1].kind, AttributeKind::Other(_)));
        assert!(attrs[1].annotations.is_empty());

        let schema = crate::Schema::extract::<Cached>().unwrap();
        assert_eq!(schema.column_names(), vec!["id"]);

        let mut cached = Cached {
            id: 1,
            cache: vec![1, 2, 3],
        };
        assert!(cached.get("cache").is_none());
        assert!(matches!(
            cached.set("cache", Value::Null),
            Err(crate::ModelError::MissingAttribute { ref attribute, .. }) if attribute == "cache"
        ));
        assert_eq!(cached.cache, vec![1, 2, 3]);
    }

    crate::entity! {
        #[derive(Debug, Clone, Default)]
        struct Measurement {
            id: i32 => [name = "id", primary_key = "true"],
            ratio: f64 => [name = "ratio"],
        }
    }

    #[test]
    fn test_named_unsupported_type_fails_extraction() {
        assert_eq!(
            crate::Schema::extract::<Measurement>().unwrap_err(),
            crate::ModelError::UnsupportedFieldType {
                attribute: "ratio".into(),
                kind: "f64".into(),
            }
        );
    }
}
