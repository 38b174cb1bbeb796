//! The binding capability shared by every encoding strategy.

use crate::accessor::MemberStyle;
use crate::error::{ConfigurationError, FormatError, Result};
use crate::filter::{AcceptAll, SerializationFilter};
use crate::node::{Element, Node, NodeKind, NodeRef};

/// Tag wrapping each scalar item of a collection.
pub const ITEM_TAG: &str = "item";

/// Translates between one in-memory value and its node representation.
pub trait Binding<V>: Send + Sync {
    /// Encodes `value` with `parent` as context.
    ///
    /// Returns the node to append to `parent`, or `None` when there is
    /// nothing to append: either the binding wrote into `parent` itself (an
    /// attribute, say) or the value is absent.
    fn serialize(&self, value: &V, parent: &mut Element, cx: &EncodeContext<'_>)
    -> Result<Option<Node>>;

    /// Decodes the group of nodes routed to this binding, in arrival order.
    fn deserialize(&self, nodes: &[NodeRef<'_>]) -> Result<V>;

    /// Whether this binding claims `node`. Must not inspect content.
    fn is_bound_to(&self, node: NodeRef<'_>) -> bool;

    fn bound_node_kind(&self) -> NodeKind;

    /// Tag or attribute name this binding matches, if it matches by name.
    fn bound_name(&self) -> Option<&str> {
        None
    }
}

/// Per-call state for an encode pass.
#[derive(Clone, Copy)]
pub struct EncodeContext<'a> {
    filter: &'a dyn SerializationFilter,
}

impl<'a> EncodeContext<'a> {
    pub fn new(filter: &'a dyn SerializationFilter) -> Self {
        EncodeContext { filter }
    }

    pub fn filter(&self) -> &'a dyn SerializationFilter {
        self.filter
    }
}

impl Default for EncodeContext<'_> {
    fn default() -> Self {
        EncodeContext { filter: &AcceptAll }
    }
}

/// Value types that can be bean members.
///
/// This is the binding factory: the strategy for a member is chosen from
/// its declared type once, when the owning bean's descriptor is built.
pub trait Bindable: Sized + Clone + Send + Sync + 'static {
    /// Whether an absent value encodes to no node at all. Such types cannot
    /// be nested where absence would be ambiguous.
    const OPTIONAL: bool = false;

    /// The binding for a member stored under `tag` in the given style.
    fn member_binding(
        tag: &str,
        style: MemberStyle,
    ) -> std::result::Result<Box<dyn Binding<Self>>, ConfigurationError>;

    /// The binding for one item of a collection of `Self`.
    fn item_binding() -> std::result::Result<Box<dyn Binding<Self>>, ConfigurationError> {
        Self::member_binding(ITEM_TAG, MemberStyle::Element)
    }
}

/// Fails unless `nodes` holds exactly one node.
pub(crate) fn single<'a>(binding: &str, nodes: &[NodeRef<'a>]) -> Result<NodeRef<'a>> {
    match nodes {
        [node] => Ok(*node),
        _ => Err(FormatError::Cardinality {
            binding: binding.to_owned(),
            found: nodes.len(),
        }
        .into()),
    }
}
