//! Bindings for optional and repeated members.

use crate::accessor::MemberStyle;
use crate::binding::{Bindable, Binding, EncodeContext, single};
use crate::error::{BindingError, ConfigurationError, FormatError, Result};
use crate::node::{Element, Node, NodeKind, NodeRef};
use crate::scalar::unsupported_style;

/// `None` emits nothing, so an absent member decodes back to `None`.
pub struct OptionBinding<T> {
    inner: Box<dyn Binding<T>>,
}

impl<T> OptionBinding<T> {
    pub fn new(inner: Box<dyn Binding<T>>) -> Self {
        OptionBinding { inner }
    }
}

impl<T: 'static> Binding<Option<T>> for OptionBinding<T> {
    fn serialize(
        &self,
        value: &Option<T>,
        parent: &mut Element,
        cx: &EncodeContext<'_>,
    ) -> Result<Option<Node>> {
        match value {
            Some(v) => self.inner.serialize(v, parent, cx),
            None => Ok(None),
        }
    }

    fn deserialize(&self, nodes: &[NodeRef<'_>]) -> Result<Option<T>> {
        self.inner.deserialize(nodes).map(Some)
    }

    fn is_bound_to(&self, node: NodeRef<'_>) -> bool {
        self.inner.is_bound_to(node)
    }

    fn bound_node_kind(&self) -> NodeKind {
        self.inner.bound_node_kind()
    }

    fn bound_name(&self) -> Option<&str> {
        self.inner.bound_name()
    }
}

/// `Some(None)` and `None` would both encode to nothing, so `Option` may not
/// wrap another optional type. Collection items are positional and have no
/// way to mark a missing item, so `Option` is not a valid item type either.
impl<T: Bindable> Bindable for Option<T> {
    const OPTIONAL: bool = true;

    fn member_binding(
        tag: &str,
        style: MemberStyle,
    ) -> std::result::Result<Box<dyn Binding<Self>>, ConfigurationError> {
        if T::OPTIONAL {
            return Err(unsupported_style::<Self>(style));
        }
        Ok(Box::new(OptionBinding::new(T::member_binding(tag, style)?)))
    }

    fn item_binding() -> std::result::Result<Box<dyn Binding<Self>>, ConfigurationError> {
        Err(unsupported_style::<Self>(MemberStyle::Element))
    }
}

/// `<tag>` holding one node per item, in order.
pub struct CollectionBinding<T> {
    tag: String,
    item: Box<dyn Binding<T>>,
}

impl<T> CollectionBinding<T> {
    pub fn new(tag: impl Into<String>, item: Box<dyn Binding<T>>) -> Self {
        CollectionBinding {
            tag: tag.into(),
            item,
        }
    }
}

impl<T: 'static> Binding<Vec<T>> for CollectionBinding<T> {
    fn serialize(
        &self,
        value: &Vec<T>,
        _parent: &mut Element,
        cx: &EncodeContext<'_>,
    ) -> Result<Option<Node>> {
        let mut element = Element::new(self.tag.as_str());
        for item in value {
            if let Some(node) = self.item.serialize(item, &mut element, cx)? {
                element.append(node);
            }
        }
        Ok(Some(Node::Element(element)))
    }

    fn deserialize(&self, nodes: &[NodeRef<'_>]) -> Result<Vec<T>> {
        let element = match single(&self.tag, nodes)? {
            NodeRef::Element(e) if e.name() == self.tag => e,
            other => {
                return Err(BindingError::Misrouted {
                    expected: self.tag.clone(),
                    found: other.to_string(),
                });
            }
        };
        let mut items = Vec::with_capacity(element.children().len());
        for (position, node) in element.nodes().enumerate() {
            if !self.item.is_bound_to(node) {
                return Err(FormatError::UnboundNode {
                    parent: self.tag.clone(),
                    node: node.to_string(),
                    position,
                }
                .into());
            }
            items.push(self.item.deserialize(&[node])?);
        }
        Ok(items)
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

impl<T: Bindable> Bindable for Vec<T> {
    fn member_binding(
        tag: &str,
        style: MemberStyle,
    ) -> std::result::Result<Box<dyn Binding<Self>>, ConfigurationError> {
        match style {
            MemberStyle::Element => Ok(Box::new(CollectionBinding::new(tag, T::item_binding()?))),
            other => Err(unsupported_style::<Self>(other)),
        }
    }
}
