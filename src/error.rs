use serde::{de, ser};
use std::fmt;

use crate::node::NodeKind;

pub type Result<T> = std::result::Result<T, BindingError>;

/// A bean type or one of its members cannot be bound as declared.
///
/// Raised while a [`TypeDescriptor`](crate::TypeDescriptor) is built, or when
/// a bean instance cannot be constructed during decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// The bean's construction path failed.
    #[error("cannot instantiate bean `{bean}`: {reason}")]
    Instantiation { bean: &'static str, reason: String },

    /// A resolved tag or attribute name is not a valid element name.
    #[error("`{0}` is not a valid tag name")]
    InvalidTagName(String),

    /// A member declaration is malformed.
    #[error("invalid member `{member}` in bean `{bean}`: {reason}")]
    InvalidMember {
        bean: &'static str,
        member: String,
        reason: String,
    },

    /// Two members were declared under the same accessor name.
    #[error("member `{member}` is declared more than once in bean `{bean}`")]
    DuplicateMember { bean: &'static str, member: String },

    /// Two members of one bean would claim the same nodes during decode.
    #[error("members `{first}` and `{second}` of bean `{bean}` both bind to {kind} `{name}`")]
    AmbiguousBinding {
        bean: &'static str,
        first: String,
        second: String,
        kind: NodeKind,
        name: String,
    },

    /// The requested member style cannot represent values of this type.
    #[error("{style} style is not supported for values of type `{value_type}`")]
    UnsupportedStyle {
        style: &'static str,
        value_type: &'static str,
    },
}

/// The input tree does not match the bindings that decode it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// A node was claimed by no binding of its parent.
    #[error("format error: no binding in `{parent}` for {node} at position {position}")]
    UnboundNode {
        parent: String,
        node: String,
        position: usize,
    },

    /// A single-valued binding received the wrong number of nodes.
    #[error("format error: `{binding}` expects exactly one node, found {found}")]
    Cardinality { binding: String, found: usize },

    /// Text could not be converted to the member's value type.
    #[error("format error: `{text}` is not a valid {expected}: {reason}")]
    InvalidValue {
        text: String,
        expected: &'static str,
        reason: String,
    },

    /// A custom message raised through serde.
    #[error("format error: {0}")]
    Message(String),
}

/// Errors that can occur while encoding or decoding a bean.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Format(#[from] FormatError),

    /// A bean binding was handed nodes it does not own. The enclosing
    /// binding should have routed through `is_bound_to` first.
    #[error("misrouted input: expected a single <{expected}> element, found {found}")]
    Misrouted { expected: String, found: String },

    /// The scalar text codec cannot represent this serde data model type.
    #[error("text values do not support type: {0}")]
    Unsupported(&'static str),
}

impl BindingError {
    /// Returns the configuration error, if this is one.
    pub fn as_configuration(&self) -> Option<&ConfigurationError> {
        match self {
            BindingError::Configuration(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the format error, if this is one.
    pub fn as_format(&self) -> Option<&FormatError> {
        match self {
            BindingError::Format(e) => Some(e),
            _ => None,
        }
    }
}

impl ser::Error for BindingError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        BindingError::Format(FormatError::Message(msg.to_string()))
    }
}

impl de::Error for BindingError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        BindingError::Format(FormatError::Message(msg.to_string()))
    }
}
