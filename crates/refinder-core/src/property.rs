//! Typed access to loosely-typed property bags.
//!
//! Every read from a [`Properties`] map goes through [`PropertyExt`]. An
//! absent property is `Ok(None)`; a present property of the wrong variant
//! is always [`ReconstructError::Parse`], never a silent default.

use refinder_types::{Archive, Container, Properties, Value};

use crate::error::{ReconstructError, Result};

/// Placeholder variant name reported when a required property is absent.
const ABSENT: &str = "nothing";

/// Read a property through `extract`, mapping a variant mismatch to a
/// parse error.
fn typed<'a, T>(
    props: &'a Properties,
    field: &str,
    expected: &'static str,
    extract: impl FnOnce(&'a Value) -> Option<T>,
) -> Result<Option<T>> {
    match props.get(field) {
        None => Ok(None),
        Some(value) => extract(value)
            .map(Some)
            .ok_or_else(|| ReconstructError::parse(field, expected, value.kind())),
    }
}

/// Turn an optional read into a required one.
fn required<T>(value: Option<T>, field: &str, expected: &'static str) -> Result<T> {
    value.ok_or_else(|| ReconstructError::parse(field, expected, ABSENT))
}

/// Typed getters over a property bag.
pub trait PropertyExt {
    /// Optional `Int32` property.
    fn opt_i32(&self, field: &str) -> Result<Option<i32>>;
    /// Optional `UInt64` property.
    fn opt_u64(&self, field: &str) -> Result<Option<u64>>;
    /// Optional `Bool` property.
    fn opt_bool(&self, field: &str) -> Result<Option<bool>>;
    /// Optional `String` property.
    fn opt_str(&self, field: &str) -> Result<Option<&str>>;
    /// Optional `Text` property, resolved to a display string.
    fn opt_text(&self, field: &str) -> Result<Option<&str>>;
    /// Optional `Enum` property, as its qualified value.
    fn opt_enum(&self, field: &str) -> Result<Option<&str>>;
    /// Optional `Object` property, as its class path.
    fn opt_object_class(&self, field: &str) -> Result<Option<&str>>;
    /// Optional plain `Struct` property.
    fn opt_struct(&self, field: &str) -> Result<Option<&Properties>>;
    /// Optional `ArrayOfStruct` property.
    fn opt_struct_array(&self, field: &str) -> Result<Option<&[Value]>>;
    /// Optional struct property nesting a blob archive.
    fn opt_blob(&self, field: &str) -> Result<Option<&Archive>>;
    /// Optional struct property nesting an actor container.
    fn opt_container(&self, field: &str) -> Result<Option<&Container>>;

    /// Required `Int32` property.
    fn req_i32(&self, field: &str) -> Result<i32> {
        required(self.opt_i32(field)?, field, "Int32")
    }

    /// Required `UInt64` property.
    fn req_u64(&self, field: &str) -> Result<u64> {
        required(self.opt_u64(field)?, field, "UInt64")
    }

    /// Required `String` property.
    fn req_str(&self, field: &str) -> Result<&str> {
        required(self.opt_str(field)?, field, "String")
    }

    /// Required plain `Struct` property.
    fn req_struct(&self, field: &str) -> Result<&Properties> {
        required(self.opt_struct(field)?, field, "Struct")
    }
}

impl PropertyExt for Properties {
    fn opt_i32(&self, field: &str) -> Result<Option<i32>> {
        typed(self, field, "Int32", Value::as_i32)
    }

    fn opt_u64(&self, field: &str) -> Result<Option<u64>> {
        typed(self, field, "UInt64", Value::as_u64)
    }

    fn opt_bool(&self, field: &str) -> Result<Option<bool>> {
        typed(self, field, "Bool", Value::as_bool)
    }

    fn opt_str(&self, field: &str) -> Result<Option<&str>> {
        typed(self, field, "String", Value::as_str)
    }

    fn opt_text(&self, field: &str) -> Result<Option<&str>> {
        typed(self, field, "Text", |v| v.as_text().map(|t| t.resolve()))
    }

    fn opt_enum(&self, field: &str) -> Result<Option<&str>> {
        typed(self, field, "Enum", |v| v.as_enum().map(|e| e.value.as_str()))
    }

    fn opt_object_class(&self, field: &str) -> Result<Option<&str>> {
        typed(self, field, "Object", |v| {
            v.as_object().map(|o| o.class_name.as_str())
        })
    }

    fn opt_struct(&self, field: &str) -> Result<Option<&Properties>> {
        typed(self, field, "Struct", Value::as_struct_map)
    }

    fn opt_struct_array(&self, field: &str) -> Result<Option<&[Value]>> {
        typed(self, field, "ArrayOfStruct", Value::as_struct_array)
    }

    fn opt_blob(&self, field: &str) -> Result<Option<&Archive>> {
        typed(self, field, "Struct(Blob)", Value::as_blob)
    }

    fn opt_container(&self, field: &str) -> Result<Option<&Container>> {
        typed(self, field, "Struct(Container)", Value::as_container)
    }
}

/// Interpret one element of an `ArrayOfStruct` as a property map.
pub fn element_struct<'a>(element: &'a Value, field: &str) -> Result<&'a Properties> {
    element
        .as_struct_map()
        .ok_or_else(|| ReconstructError::parse(field, "Struct", element.kind()))
}
