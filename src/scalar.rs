//! Bindings for values with a text form.

use std::any::type_name;
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::accessor::MemberStyle;
use crate::binding::{Binding, EncodeContext, single};
use crate::de::from_text;
use crate::error::{BindingError, ConfigurationError, FormatError, Result};
use crate::node::{Element, Node, NodeKind, NodeRef};
use crate::ser::to_text;

/// A scalar stored as text content of its parent.
pub struct TextBinding<V> {
    _marker: PhantomData<fn() -> V>,
}

impl<V> TextBinding<V> {
    pub fn new() -> Self {
        TextBinding {
            _marker: PhantomData,
        }
    }
}

impl<V> Default for TextBinding<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Binding<V> for TextBinding<V>
where
    V: Serialize + DeserializeOwned,
{
    fn serialize(&self, value: &V, _parent: &mut Element, _cx: &EncodeContext<'_>) -> Result<Option<Node>> {
        Ok(Some(Node::Text(to_text(value)?)))
    }

    /// Adjacent text nodes are joined; no text at all reads as `""`.
    fn deserialize(&self, nodes: &[NodeRef<'_>]) -> Result<V> {
        let mut text = String::new();
        for node in nodes {
            match node {
                NodeRef::Text(t) => text.push_str(t),
                other => {
                    return Err(BindingError::Misrouted {
                        expected: "#text".to_owned(),
                        found: other.to_string(),
                    });
                }
            }
        }
        from_text(&text)
    }

    fn is_bound_to(&self, node: NodeRef<'_>) -> bool {
        matches!(node, NodeRef::Text(_))
    }

    fn bound_node_kind(&self) -> NodeKind {
        NodeKind::Text
    }
}

/// A scalar stored as an attribute of its parent.
pub struct AttributeBinding<V> {
    name: String,
    _marker: PhantomData<fn() -> V>,
}

impl<V> AttributeBinding<V> {
    pub fn new(name: impl Into<String>) -> Self {
        AttributeBinding {
            name: name.into(),
            _marker: PhantomData,
        }
    }
}

impl<V> Binding<V> for AttributeBinding<V>
where
    V: Serialize + DeserializeOwned,
{
    /// Writes straight into `parent`, so there is nothing to append.
    fn serialize(&self, value: &V, parent: &mut Element, _cx: &EncodeContext<'_>) -> Result<Option<Node>> {
        parent.set_attribute(self.name.as_str(), to_text(value)?);
        Ok(None)
    }

    fn deserialize(&self, nodes: &[NodeRef<'_>]) -> Result<V> {
        match single(&self.name, nodes)? {
            NodeRef::Attribute(a) => from_text(a.value()),
            other => Err(BindingError::Misrouted {
                expected: format!("@{}", self.name),
                found: other.to_string(),
            }),
        }
    }

    fn is_bound_to(&self, node: NodeRef<'_>) -> bool {
        matches!(node, NodeRef::Attribute(a) if a.name() == self.name)
    }

    fn bound_node_kind(&self) -> NodeKind {
        NodeKind::Attribute
    }

    fn bound_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

/// Wraps a content binding in `<tag>...</tag>`.
///
/// The wrapper is single-valued and closed: every node inside it must be
/// claimed by the content binding.
pub struct TagBinding<V> {
    tag: String,
    content: Box<dyn Binding<V>>,
}

impl<V> TagBinding<V> {
    pub fn new(tag: impl Into<String>, content: Box<dyn Binding<V>>) -> Self {
        TagBinding {
            tag: tag.into(),
            content,
        }
    }
}

impl<V: 'static> Binding<V> for TagBinding<V> {
    fn serialize(&self, value: &V, _parent: &mut Element, cx: &EncodeContext<'_>) -> Result<Option<Node>> {
        let mut element = Element::new(self.tag.as_str());
        if let Some(node) = self.content.serialize(value, &mut element, cx)? {
            element.append(node);
        }
        Ok(Some(Node::Element(element)))
    }

    fn deserialize(&self, nodes: &[NodeRef<'_>]) -> Result<V> {
        let element = match single(&self.tag, nodes)? {
            NodeRef::Element(e) if e.name() == self.tag => e,
            other => {
                return Err(BindingError::Misrouted {
                    expected: self.tag.clone(),
                    found: other.to_string(),
                });
            }
        };
        let mut content = Vec::new();
        for (position, node) in element.nodes().enumerate() {
            if !self.content.is_bound_to(node) {
                return Err(FormatError::UnboundNode {
                    parent: self.tag.clone(),
                    node: node.to_string(),
                    position,
                }
                .into());
            }
            content.push(node);
        }
        self.content.deserialize(&content)
    }

    fn is_bound_to(&self, node: NodeRef<'_>) -> bool {
        node.is_element_named(&self.tag)
    }

    fn bound_node_kind(&self) -> NodeKind {
        NodeKind::Element
    }

    fn bound_name(&self) -> Option<&str> {
        Some(&self.tag)
    }
}

/// Picks the scalar strategy for a member of type `V`.
pub fn member_binding<V>(
    tag: &str,
    style: MemberStyle,
) -> std::result::Result<Box<dyn Binding<V>>, ConfigurationError>
where
    V: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    Ok(match style {
        MemberStyle::Element => Box::new(TagBinding::new(tag, Box::new(TextBinding::<V>::new()))),
        MemberStyle::Attribute => Box::new(AttributeBinding::<V>::new(tag)),
        MemberStyle::Text => Box::new(TextBinding::<V>::new()),
    })
}

/// Reports that `style` cannot carry a `V`.
pub(crate) fn unsupported_style<V>(style: MemberStyle) -> ConfigurationError {
    ConfigurationError::UnsupportedStyle {
        style: style.as_str(),
        value_type: type_name::<V>(),
    }
}

/// Makes a `Serialize + DeserializeOwned + Clone` type usable as a scalar
/// member, stored through its text form.
///
/// ```rust
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// enum Mode { Fast, Safe }
///
/// xmlb::bindable_scalar!(Mode);
/// ```
#[macro_export]
macro_rules! bindable_scalar {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Bindable for $ty {
                fn member_binding(
                    tag: &str,
                    style: $crate::MemberStyle,
                ) -> ::std::result::Result<::std::boxed::Box<dyn $crate::Binding<Self>>, $crate::ConfigurationError> {
                    $crate::scalar::member_binding::<Self>(tag, style)
                }
            }
        )+
    };
}

bindable_scalar!(
    bool, char, String, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);
