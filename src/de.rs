//! Scalar text deserializer.
//!
//! The inverse of [`crate::ser`]: parses the text of one node back into a
//! scalar value. Text is self-describing only as a string, so
//! `deserialize_any` hands the raw text to the visitor.

use crate::error::{BindingError, FormatError, Result};
use serde::de::{self, DeserializeOwned, IntoDeserializer, Visitor};
use std::str::FromStr;

/// Deserialize a scalar value from its text form.
///
/// ```rust
/// assert_eq!(xmlb::from_text::<i32>("-7").unwrap(), -7);
/// assert!(xmlb::from_text::<u8>("300").is_err());
/// ```
pub fn from_text<T: DeserializeOwned>(input: &str) -> Result<T> {
    T::deserialize(TextDeserializer::new(input))
}

/// Deserializer over the text of one node.
#[derive(Debug, Clone, Copy)]
pub struct TextDeserializer<'de> {
    input: &'de str,
}

impl<'de> TextDeserializer<'de> {
    pub fn new(input: &'de str) -> Self {
        TextDeserializer { input }
    }

    fn parse<T>(&self, expected: &'static str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.input.trim().parse::<T>().map_err(|e| {
            BindingError::Format(FormatError::InvalidValue {
                text: self.input.to_owned(),
                expected,
                reason: e.to_string(),
            })
        })
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                visitor.$visit(self.parse::<$ty>(stringify!($ty))?)
            }
        )*
    };
}

macro_rules! deserialize_unsupported {
    ($($method:ident($($arg:ident: $ty:ty),*) => $what:literal),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, $($arg: $ty,)* _visitor: V) -> Result<V::Value> {
                Err(BindingError::Unsupported($what))
            }
        )*
    };
}

// ── Main Deserializer impl ─────────────────────────────────────────────────

impl<'de> de::Deserializer<'de> for TextDeserializer<'de> {
    type Error = BindingError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_borrowed_str(self.input)
    }

    deserialize_parsed! {
        deserialize_bool => visit_bool(bool),
        deserialize_i8 => visit_i8(i8),
        deserialize_i16 => visit_i16(i16),
        deserialize_i32 => visit_i32(i32),
        deserialize_i64 => visit_i64(i64),
        deserialize_i128 => visit_i128(i128),
        deserialize_u8 => visit_u8(u8),
        deserialize_u16 => visit_u16(u16),
        deserialize_u32 => visit_u32(u32),
        deserialize_u64 => visit_u64(u64),
        deserialize_u128 => visit_u128(u128),
        deserialize_f32 => visit_f32(f32),
        deserialize_f64 => visit_f64(f64),
    }

    /// Exactly one character, untrimmed.
    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let mut chars = self.input.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(BindingError::Format(FormatError::InvalidValue {
                text: self.input.to_owned(),
                expected: "char",
                reason: "expected exactly one character".to_owned(),
            })),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_borrowed_str(self.input)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_string(self.input.to_owned())
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    /// Unit variants only: the text names the variant.
    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_enum(self.input.trim().into_deserializer())
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_borrowed_str(self.input)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    deserialize_unsupported! {
        deserialize_bytes() => "bytes",
        deserialize_byte_buf() => "bytes",
        deserialize_seq() => "sequence",
        deserialize_map() => "map",
        deserialize_tuple(_len: usize) => "tuple",
        deserialize_tuple_struct(_name: &'static str, _len: usize) => "tuple struct",
        deserialize_struct(_name: &'static str, _fields: &'static [&'static str]) => "struct",
    }
}
