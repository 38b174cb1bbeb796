//! Bean binding: encodes a bean as one element whose children are its
//! members, and decodes such an element back into a fresh bean.
//!
//! ## Element layout
//! - The element is tagged with [`Bean::TAG_NAME`] when set and non-empty,
//!   otherwise with the bare type name (`Point` for `geometry::Point<T>`).
//! - Members are emitted sorted by accessor name, whatever order
//!   [`Bean::describe`] declared them in.
//! - Decoding is closed-world: every attribute and child of the element must
//!   be claimed by exactly one member binding, or the whole decode fails.

use std::any::{TypeId, type_name};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, trace};

use crate::accessor::{Accessor, AccessorRef, MemberMeta, MemberStyle};
use crate::binding::{Bindable, Binding, EncodeContext, single};
use crate::error::{BindingError, ConfigurationError, FormatError, Result};
use crate::node::{Element, Node, NodeKind, NodeRef, is_valid_name};
use crate::registry;
use crate::scalar::{TagBinding, unsupported_style};

/// The reserved pseudo-property name that is never bound.
pub const CLASS_PROPERTY: &str = "class";

/// A type that can be bound member by member.
///
/// `describe` is the accessor table for the type: it runs once, the first
/// time the type is bound, and its result is cached for the life of the
/// process. Member value types must be [`Bindable`]; the [`bean!`] macro
/// covers the common case of a `Default + Clone` struct with public fields.
///
/// [`bean!`]: crate::bean!
pub trait Bean: Sized + Send + Sync + 'static {
    /// Explicit tag name. `None` or `""` falls back to the bare type name.
    const TAG_NAME: Option<&'static str> = None;

    /// The no-argument construction path used for every decode.
    fn instantiate() -> std::result::Result<Self, ConfigurationError>;

    /// Declares the members that participate in binding.
    fn describe(members: &mut Members<Self>);
}

/// Resolved tag name of `B`.
pub fn tag_name<B: Bean>() -> &'static str {
    match B::TAG_NAME {
        Some(tag) if !tag.is_empty() => tag,
        _ => bare_type_name::<B>(),
    }
}

/// `type_name` without module path or generic arguments.
pub fn bare_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}

// ── Member declaration ─────────────────────────────────────────────────────

type BuildProperty<B> = Box<
    dyn FnOnce(&str, MemberStyle) -> std::result::Result<Box<dyn PropertyBinding<B>>, ConfigurationError>,
>;

struct Declared<B> {
    name: String,
    meta: MemberMeta,
    build: BuildProperty<B>,
}

/// Collects member declarations while [`Bean::describe`] runs.
pub struct Members<B> {
    declared: Vec<Declared<B>>,
}

impl<B: Bean> Members<B> {
    fn new() -> Self {
        Members {
            declared: Vec::new(),
        }
    }

    /// Declares a member reached directly through a field.
    pub fn field<V, G, M>(&mut self, name: &str, get: G, get_mut: M) -> &mut MemberMeta
    where
        V: Bindable,
        G: for<'a> Fn(&'a B) -> &'a V + Send + Sync + 'static,
        M: for<'a> Fn(&'a mut B) -> &'a mut V + Send + Sync + 'static,
    {
        self.declare(Accessor::field(name, get, get_mut))
    }

    /// Declares a member reached through a getter/setter pair.
    pub fn property<V, G, S>(&mut self, name: &str, getter: G, setter: S) -> &mut MemberMeta
    where
        V: Bindable,
        G: Fn(&B) -> V + Send + Sync + 'static,
        S: Fn(&mut B, V) + Send + Sync + 'static,
    {
        self.declare(Accessor::property(name, getter, setter))
    }

    fn declare<V: Bindable>(&mut self, accessor: Accessor<B, V>) -> &mut MemberMeta {
        let name = accessor.name().to_owned();
        let build: BuildProperty<B> = Box::new(move |tag: &str, style: MemberStyle| {
            let binding = V::member_binding(tag, style)?;
            Ok(Box::new(TypedProperty { accessor, binding }) as Box<dyn PropertyBinding<B>>)
        });
        self.declared.push(Declared {
            name,
            meta: MemberMeta::default(),
            build,
        });
        let last = self.declared.len() - 1;
        &mut self.declared[last].meta
    }

    fn len(&self) -> usize {
        self.declared.len()
    }
}

// ── Property bindings ──────────────────────────────────────────────────────

/// One member of a bean paired with the binding for its value type.
pub trait PropertyBinding<B>: Send + Sync {
    fn accessor(&self) -> AccessorRef<'_>;

    fn name(&self) -> &str {
        self.accessor().name
    }

    /// Encodes the member's current value.
    fn serialize(&self, bean: &B, parent: &mut Element, cx: &EncodeContext<'_>) -> Result<Option<Node>>;

    /// Decodes `nodes` and stores the result into `bean`.
    fn deserialize_into(&self, bean: &mut B, nodes: &[NodeRef<'_>]) -> Result<()>;

    fn is_bound_to(&self, node: NodeRef<'_>) -> bool;

    fn bound_node_kind(&self) -> NodeKind;

    fn bound_name(&self) -> Option<&str>;
}

struct TypedProperty<B, V> {
    accessor: Accessor<B, V>,
    binding: Box<dyn Binding<V>>,
}

impl<B: Bean, V: Bindable> PropertyBinding<B> for TypedProperty<B, V> {
    fn accessor(&self) -> AccessorRef<'_> {
        self.accessor.info()
    }

    fn serialize(&self, bean: &B, parent: &mut Element, cx: &EncodeContext<'_>) -> Result<Option<Node>> {
        let value = self.accessor.get(bean);
        self.binding.serialize(&*value, parent, cx)
    }

    fn deserialize_into(&self, bean: &mut B, nodes: &[NodeRef<'_>]) -> Result<()> {
        let value = self.binding.deserialize(nodes)?;
        self.accessor.set(bean, value);
        Ok(())
    }

    fn is_bound_to(&self, node: NodeRef<'_>) -> bool {
        self.binding.is_bound_to(node)
    }

    fn bound_node_kind(&self) -> NodeKind {
        self.binding.bound_node_kind()
    }

    fn bound_name(&self) -> Option<&str> {
        self.binding.bound_name()
    }
}

// ── Type descriptor ────────────────────────────────────────────────────────

/// The compiled, immutable binding table of one bean type.
pub struct TypeDescriptor<B> {
    bean_type: &'static str,
    tag_name: &'static str,
    properties: Vec<Box<dyn PropertyBinding<B>>>,
}

impl<B: Bean> TypeDescriptor<B> {
    /// Runs [`Bean::describe`] and builds a binding for every eligible
    /// member.
    ///
    /// Members named `class` and members marked transient are skipped.
    /// Fails on invalid names, duplicate members, and on two members that
    /// would claim the same nodes.
    pub fn discover() -> std::result::Result<Self, ConfigurationError> {
        let bean_type = bare_type_name::<B>();
        let tag_name = tag_name::<B>();
        if !is_valid_name(tag_name) {
            return Err(ConfigurationError::InvalidTagName(tag_name.to_owned()));
        }

        let _guard = DiscoveryGuard::enter::<B>();
        let mut members = Members::new();
        B::describe(&mut members);

        let mut seen = HashSet::with_capacity(members.len());
        let mut properties: Vec<Box<dyn PropertyBinding<B>>> = Vec::with_capacity(members.len());
        for declared in members.declared {
            if declared.name.is_empty() {
                return Err(ConfigurationError::InvalidMember {
                    bean: bean_type,
                    member: declared.name,
                    reason: "accessor name is empty".to_owned(),
                });
            }
            if !seen.insert(declared.name.clone()) {
                return Err(ConfigurationError::DuplicateMember {
                    bean: bean_type,
                    member: declared.name,
                });
            }
            if declared.name == CLASS_PROPERTY {
                trace!(bean = bean_type, "skipping reserved `class` member");
                continue;
            }
            if declared.meta.is_transient() {
                trace!(bean = bean_type, member = %declared.name, "skipping transient member");
                continue;
            }

            let style = declared.meta.style();
            let tag = declared
                .meta
                .tag_override()
                .unwrap_or(declared.name.as_str())
                .to_owned();
            if style != MemberStyle::Text && !is_valid_name(&tag) {
                return Err(ConfigurationError::InvalidTagName(tag));
            }

            let property = (declared.build)(&tag, style).map_err(|e| match e {
                e @ ConfigurationError::UnsupportedStyle { .. } => ConfigurationError::InvalidMember {
                    bean: bean_type,
                    member: declared.name.clone(),
                    reason: e.to_string(),
                },
                other => other,
            })?;

            let clash = properties.iter().find(|p| {
                p.bound_node_kind() == property.bound_node_kind() && p.bound_name() == property.bound_name()
            });
            if let Some(existing) = clash {
                return Err(ConfigurationError::AmbiguousBinding {
                    bean: bean_type,
                    first: existing.name().to_owned(),
                    second: declared.name,
                    kind: property.bound_node_kind(),
                    name: property.bound_name().unwrap_or("#text").to_owned(),
                });
            }
            properties.push(property);
        }

        properties.sort_by(|a, b| a.name().cmp(b.name()));
        debug!(
            bean = bean_type,
            tag = tag_name,
            members = properties.len(),
            "discovered bean type"
        );
        Ok(TypeDescriptor {
            bean_type,
            tag_name,
            properties,
        })
    }
}

impl<B> TypeDescriptor<B> {
    pub fn bean_type(&self) -> &'static str {
        self.bean_type
    }

    pub fn tag_name(&self) -> &'static str {
        self.tag_name
    }

    /// Property bindings in encode order (ascending accessor name).
    pub fn properties(&self) -> impl Iterator<Item = &dyn PropertyBinding<B>> {
        self.properties.iter().map(|p| &**p)
    }

    pub fn property(&self, name: &str) -> Option<&dyn PropertyBinding<B>> {
        self.properties().find(|p| p.name() == name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl<B> fmt::Debug for TypeDescriptor<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("bean_type", &self.bean_type)
            .field("tag_name", &self.tag_name)
            .field(
                "properties",
                &self.properties.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

thread_local! {
    static DISCOVERING: RefCell<HashSet<TypeId>> = RefCell::new(HashSet::new());
}

/// Marks `B` as being discovered on this thread until dropped.
struct DiscoveryGuard {
    type_id: TypeId,
    entered: bool,
}

impl DiscoveryGuard {
    fn enter<B: 'static>() -> Self {
        let type_id = TypeId::of::<B>();
        let entered = DISCOVERING.with(|set| set.borrow_mut().insert(type_id));
        DiscoveryGuard { type_id, entered }
    }
}

impl Drop for DiscoveryGuard {
    fn drop(&mut self) {
        if self.entered {
            DISCOVERING.with(|set| set.borrow_mut().remove(&self.type_id));
        }
    }
}

fn is_discovering<B: 'static>() -> bool {
    DISCOVERING.with(|set| set.borrow().contains(&TypeId::of::<B>()))
}

// ── Bean binding ───────────────────────────────────────────────────────────

/// [`Binding`] for a bean type, backed by its shared [`TypeDescriptor`].
pub struct BeanBinding<B> {
    descriptor: Arc<TypeDescriptor<B>>,
}

impl<B> Clone for BeanBinding<B> {
    fn clone(&self) -> Self {
        BeanBinding {
            descriptor: Arc::clone(&self.descriptor),
        }
    }
}

impl<B: Bean> BeanBinding<B> {
    /// Binding for `B`, discovering and caching its descriptor on first use.
    pub fn new() -> std::result::Result<Self, ConfigurationError> {
        Ok(BeanBinding {
            descriptor: registry::descriptor::<B>()?,
        })
    }

    pub fn from_descriptor(descriptor: Arc<TypeDescriptor<B>>) -> Self {
        BeanBinding { descriptor }
    }

    pub fn descriptor(&self) -> &TypeDescriptor<B> {
        &self.descriptor
    }

    pub fn tag_name(&self) -> &'static str {
        self.descriptor.tag_name
    }

    /// Encodes `bean` as an element tagged with the bean's tag name.
    pub fn encode(&self, bean: &B, cx: &EncodeContext<'_>) -> Result<Element> {
        trace!(bean = self.descriptor.bean_type, "encoding bean");
        let mut element = Element::new(self.descriptor.tag_name);
        for property in &self.descriptor.properties {
            if !cx.filter().accepts(&property.accessor(), bean) {
                continue;
            }
            if let Some(node) = property.serialize(bean, &mut element, cx)? {
                element.append(node);
            }
        }
        Ok(element)
    }

    /// Decodes `element` into a new bean.
    pub fn decode(&self, element: &Element) -> Result<B> {
        self.deserialize(&[NodeRef::Element(element)])
    }

    fn own_element<'a>(&self, nodes: &[NodeRef<'a>]) -> Result<&'a Element> {
        match nodes {
            [NodeRef::Element(e)] if e.name() == self.descriptor.tag_name => Ok(*e),
            [other] => Err(BindingError::Misrouted {
                expected: self.descriptor.tag_name.to_owned(),
                found: other.to_string(),
            }),
            _ => Err(BindingError::Misrouted {
                expected: self.descriptor.tag_name.to_owned(),
                found: format!("{} nodes", nodes.len()),
            }),
        }
    }
}

impl<B: Bean> Binding<B> for BeanBinding<B> {
    fn serialize(&self, bean: &B, _parent: &mut Element, cx: &EncodeContext<'_>) -> Result<Option<Node>> {
        self.encode(bean, cx).map(|e| Some(Node::Element(e)))
    }

    fn deserialize(&self, nodes: &[NodeRef<'_>]) -> Result<B> {
        let mut bean = B::instantiate()?;
        let element = self.own_element(nodes)?;
        trace!(bean = self.descriptor.bean_type, "decoding bean");

        let properties = &self.descriptor.properties;
        let mut groups: Vec<Vec<NodeRef<'_>>> = vec![Vec::new(); properties.len()];
        for (position, node) in element.nodes().enumerate() {
            let Some(index) = properties.iter().position(|p| p.is_bound_to(node)) else {
                return Err(FormatError::UnboundNode {
                    parent: self.descriptor.tag_name.to_owned(),
                    node: node.to_string(),
                    position,
                }
                .into());
            };
            groups[index].push(node);
        }

        for (property, group) in properties.iter().zip(&groups) {
            if !group.is_empty() {
                property.deserialize_into(&mut bean, group)?;
            }
        }
        Ok(bean)
    }

    fn is_bound_to(&self, node: NodeRef<'_>) -> bool {
        node.is_element_named(self.descriptor.tag_name)
    }

    fn bound_node_kind(&self) -> NodeKind {
        NodeKind::Element
    }

    fn bound_name(&self) -> Option<&str> {
        Some(self.descriptor.tag_name)
    }
}

// ── Beans as members ───────────────────────────────────────────────────────

/// A bean nested inside another binding.
///
/// Built through [`NestedBean::resolved`], the nested descriptor is
/// discovered together with the enclosing one, so its configuration errors
/// surface there. The one exception is a bean that reaches itself through a
/// `Vec` or `Option`: while its own discovery is under way the descriptor is
/// left to be resolved on first use. The tag is known up front and matching
/// never triggers discovery.
pub struct NestedBean<B> {
    tag: &'static str,
    binding: OnceCell<BeanBinding<B>>,
}

impl<B: Bean> NestedBean<B> {
    /// A binding that discovers `B` on first use.
    pub fn new() -> Self {
        NestedBean {
            tag: tag_name::<B>(),
            binding: OnceCell::new(),
        }
    }

    /// Resolves the descriptor now, unless `B` is already being discovered on
    /// this thread.
    pub fn resolved() -> std::result::Result<Self, ConfigurationError> {
        if is_discovering::<B>() {
            trace!(bean = bare_type_name::<B>(), "deferring recursive bean");
            return Ok(Self::new());
        }
        Ok(NestedBean {
            tag: tag_name::<B>(),
            binding: OnceCell::with_value(BeanBinding::new()?),
        })
    }

    fn resolve(&self) -> Result<&BeanBinding<B>> {
        Ok(self.binding.get_or_try_init(BeanBinding::new)?)
    }
}

impl<B: Bean> Default for NestedBean<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Bean> Binding<B> for NestedBean<B> {
    fn serialize(&self, bean: &B, parent: &mut Element, cx: &EncodeContext<'_>) -> Result<Option<Node>> {
        self.resolve()?.serialize(bean, parent, cx)
    }

    fn deserialize(&self, nodes: &[NodeRef<'_>]) -> Result<B> {
        let node = single(self.tag, nodes)?;
        self.resolve()?.deserialize(&[node])
    }

    fn is_bound_to(&self, node: NodeRef<'_>) -> bool {
        node.is_element_named(self.tag)
    }

    fn bound_node_kind(&self) -> NodeKind {
        NodeKind::Element
    }

    fn bound_name(&self) -> Option<&str> {
        Some(self.tag)
    }
}

/// Member binding for a bean-typed member: `<tag><Bean>...</Bean></tag>`.
pub fn member_binding<B: Bean>(
    tag: &str,
    style: MemberStyle,
) -> std::result::Result<Box<dyn Binding<B>>, ConfigurationError> {
    match style {
        MemberStyle::Element => Ok(Box::new(TagBinding::new(tag, Box::new(NestedBean::<B>::resolved()?)))),
        other => Err(unsupported_style::<B>(other)),
    }
}

/// Collection items of a bean type are the bean elements themselves.
pub fn item_binding<B: Bean>() -> std::result::Result<Box<dyn Binding<B>>, ConfigurationError> {
    Ok(Box::new(NestedBean::<B>::resolved()?))
}

// ── Declaration macros ─────────────────────────────────────────────────────

/// Implements [`Bindable`] for a type that implements [`Bean`] by hand.
#[macro_export]
macro_rules! bindable_bean {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Bindable for $ty {
                fn member_binding(
                    tag: &str,
                    style: $crate::MemberStyle,
                ) -> ::std::result::Result<::std::boxed::Box<dyn $crate::Binding<Self>>, $crate::ConfigurationError> {
                    $crate::bean::member_binding::<Self>(tag, style)
                }

                fn item_binding()
                -> ::std::result::Result<::std::boxed::Box<dyn $crate::Binding<Self>>, $crate::ConfigurationError> {
                    $crate::bean::item_binding::<Self>()
                }
            }
        )+
    };
}

/// Declares a `Default + Clone` struct as a bean.
///
/// ```rust
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Window {
///     title: String,
///     width: u32,
///     scratch: Vec<u8>,
/// }
///
/// impl Window {
///     fn id(&self) -> String { self.title.to_lowercase() }
///     fn set_id(&mut self, _id: String) {}
/// }
///
/// xmlb::bean! {
///     Window as "window" {
///         field title [attribute];
///         field width [tag = "w"];
///         field scratch [transient];
///         property id(Window::id, Window::set_id);
///     }
/// }
///
/// let window = Window { title: "Main".into(), width: 640, scratch: vec![] };
/// let element = xmlb::XmlSerializer::new().serialize(&window).unwrap();
/// assert_eq!(element.to_string(), r#"<window title="Main"><id>main</id><w>640</w></window>"#);
/// ```
#[macro_export]
macro_rules! bean {
    ($ty:ty $(as $tag:literal)? { $($members:tt)* }) => {
        impl $crate::Bean for $ty {
            $(const TAG_NAME: ::std::option::Option<&'static str> = ::std::option::Option::Some($tag);)?

            fn instantiate() -> ::std::result::Result<Self, $crate::ConfigurationError> {
                ::std::result::Result::Ok(<Self as ::std::default::Default>::default())
            }

            #[allow(unused_variables)]
            fn describe(members: &mut $crate::Members<Self>) {
                $crate::__bean_members!(members; $($members)*);
            }
        }

        $crate::bindable_bean!($ty);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __bean_members {
    ($members:ident;) => {};
    (
        $members:ident;
        field $name:ident $([$($opt:ident $(= $value:expr)?),* $(,)?])?;
        $($rest:tt)*
    ) => {
        #[allow(unused_variables)]
        let meta = $members.field(stringify!($name), |bean| &bean.$name, |bean| &mut bean.$name);
        $($(meta.$opt($($value)?);)*)?
        $crate::__bean_members!($members; $($rest)*);
    };
    (
        $members:ident;
        property $name:ident($get:expr, $set:expr) $([$($opt:ident $(= $value:expr)?),* $(,)?])?;
        $($rest:tt)*
    ) => {
        #[allow(unused_variables)]
        let meta = $members.property(stringify!($name), $get, $set);
        $($(meta.$opt($($value)?);)*)?
        $crate::__bean_members!($members; $($rest)*);
    };
}
