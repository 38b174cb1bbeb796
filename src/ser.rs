//! Scalar text serializer.
//!
//! Maps one scalar value onto the text that fills an element, attribute or
//! text node.
//!
//! ## Text format summary
//! - Integers and floats: their `Display` form (`3`, `-17`, `2.5`, `NaN`)
//! - `bool`: `true` / `false`
//! - `char` and strings: verbatim
//! - Unit enum variants: the variant name
//! - Newtype structs: the inner value
//! - `()` and unit structs: empty text
//!
//! Sequences, maps, structs and data-carrying variants have no scalar text
//! form and fail with [`BindingError::Unsupported`]; members of those shapes
//! go through a collection or bean binding instead.

use crate::error::{BindingError, Result};
use serde::ser::{self, Impossible, Serialize};

// ── Public entry point ─────────────────────────────────────────────────────

/// Serialize a scalar `value` into its text form.
///
/// ```rust
/// assert_eq!(xmlb::to_text(&42u32).unwrap(), "42");
/// assert_eq!(xmlb::to_text(&true).unwrap(), "true");
/// ```
pub fn to_text<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    value.serialize(TextSerializer)
}

// ── Serializer ─────────────────────────────────────────────────────────────

/// Serializer producing the text of one scalar value.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSerializer;

type Rejected = Impossible<String, BindingError>;

macro_rules! serialize_display {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, v: $ty) -> Result<String> {
                Ok(v.to_string())
            }
        )*
    };
}

impl ser::Serializer for TextSerializer {
    type Ok = String;
    type Error = BindingError;

    type SerializeSeq = Rejected;
    type SerializeTuple = Rejected;
    type SerializeTupleStruct = Rejected;
    type SerializeTupleVariant = Rejected;
    type SerializeMap = Rejected;
    type SerializeStruct = Rejected;
    type SerializeStructVariant = Rejected;

    // ── Primitives ─────────────────────────────────────────────────────────

    serialize_display! {
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_i128(i128),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_u128(u128),
        serialize_f32(f32),
        serialize_f64(f64),
        serialize_char(char),
    }

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_owned())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(BindingError::Unsupported("bytes"))
    }

    /// Absent values never reach the text codec: an `Option` member is
    /// handled by its own binding, which emits no node for `None`.
    fn serialize_none(self) -> Result<String> {
        Err(BindingError::Unsupported("option"))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String> {
        Ok(String::new())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Ok(String::new())
    }

    /// Unit enum variant → variant name
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_owned())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String> {
        Err(BindingError::Unsupported("newtype variant"))
    }

    // ── Compound shapes ────────────────────────────────────────────────────

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(BindingError::Unsupported("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(BindingError::Unsupported("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(BindingError::Unsupported("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(BindingError::Unsupported("tuple variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(BindingError::Unsupported("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(BindingError::Unsupported("struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(BindingError::Unsupported("struct variant"))
    }
}
