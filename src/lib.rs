//! # xmlb
//!
//! Binds plain Rust structs ("beans") to XML-style element trees and back,
//! member by member.
//!
//! ## Overview
//!
//! A bean is encoded as one element tagged with its type name (or an explicit
//! tag). Each member becomes a child element named after the member, unless it
//! is declared as an attribute or as text content. Members are always emitted
//! sorted by name, so the output does not depend on declaration order.
//!
//! Decoding is strict. Every attribute and child of a bean's element must be
//! claimed by one of its members; anything else is a [`FormatError`]. Members
//! with no matching node keep the value the bean was constructed with.
//!
//! ## Type mapping
//!
//! | Member type | Encoding (element style) |
//! |-------------|--------------------------|
//! | integers, floats, `bool`, `char`, `String` | `<name>text</name>` |
//! | unit-variant enums via [`bindable_scalar!`] | `<name>Variant</name>` |
//! | `Option<T>` | as `T` when `Some`, absent when `None` |
//! | `Vec<T>` of scalars | `<name><item>..</item>..</name>` |
//! | `Vec<T>` of beans | `<name><Bean>..</Bean>..</name>` |
//! | nested bean | `<name><Bean>..</Bean></name>` |
//!
//! `Option<Option<T>>` and `Vec<Option<T>>` are rejected when the bean is
//! first bound: an absent inner value would leave no trace in the tree.
//!
//! ## Example
//!
//! ```rust
//! use xmlb::{bean, XmlSerializer};
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! bean! {
//!     Point {
//!         field y;
//!         field x;
//!     }
//! }
//!
//! let serializer = XmlSerializer::new();
//! let element = serializer.serialize(&Point { x: 3, y: 4 }).unwrap();
//! assert_eq!(element.to_string(), "<Point><x>3</x><y>4</y></Point>");
//!
//! let decoded: Point = serializer.deserialize(&element).unwrap();
//! assert_eq!(decoded, Point { x: 3, y: 4 });
//! ```

pub mod accessor;
pub mod bean;
pub mod binding;
pub mod collection;
pub mod de;
pub mod error;
pub mod filter;
pub mod node;
pub mod registry;
pub mod scalar;
pub mod ser;
pub mod serializer;

pub use accessor::{Accessor, AccessorKind, AccessorRef, MemberMeta, MemberStyle};
pub use bean::{Bean, BeanBinding, Members, NestedBean, PropertyBinding, TypeDescriptor, tag_name};
pub use binding::{Bindable, Binding, EncodeContext, ITEM_TAG};
pub use collection::{CollectionBinding, OptionBinding};
pub use de::{TextDeserializer, from_text};
pub use error::{BindingError, ConfigurationError, FormatError, Result};
pub use filter::{AcceptAll, ExcludeMembers, SerializationFilter};
pub use node::{Attribute, Element, Node, NodeKind, NodeRef, Pretty};
pub use scalar::{AttributeBinding, TagBinding, TextBinding};
pub use ser::{TextSerializer, to_text};
pub use serializer::{SerializerOptions, XmlSerializer};
