//! Named get/set access to one member of a bean.

use std::any::type_name;
use std::borrow::Cow;
use std::fmt;

type FieldRef<B, V> = Box<dyn for<'a> Fn(&'a B) -> &'a V + Send + Sync>;
type FieldMut<B, V> = Box<dyn for<'a> Fn(&'a mut B) -> &'a mut V + Send + Sync>;
type Getter<B, V> = Box<dyn Fn(&B) -> V + Send + Sync>;
type Setter<B, V> = Box<dyn Fn(&mut B, V) + Send + Sync>;

/// How an accessor reaches its member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    /// Direct field access through borrowed references.
    Field,
    /// A paired getter and setter.
    Property,
}

enum Access<B, V> {
    Field { get: FieldRef<B, V>, get_mut: FieldMut<B, V> },
    Property { getter: Getter<B, V>, setter: Setter<B, V> },
}

/// Get/set capability for one member of `B` holding a `V`.
pub struct Accessor<B, V> {
    name: String,
    access: Access<B, V>,
}

impl<B, V: Clone + 'static> Accessor<B, V> {
    /// A direct-field accessor.
    pub fn field<G, M>(name: impl Into<String>, get: G, get_mut: M) -> Self
    where
        G: for<'a> Fn(&'a B) -> &'a V + Send + Sync + 'static,
        M: for<'a> Fn(&'a mut B) -> &'a mut V + Send + Sync + 'static,
    {
        Accessor {
            name: name.into(),
            access: Access::Field {
                get: Box::new(get),
                get_mut: Box::new(get_mut),
            },
        }
    }

    /// A getter/setter accessor. The getter returns by value.
    pub fn property<G, S>(name: impl Into<String>, getter: G, setter: S) -> Self
    where
        G: Fn(&B) -> V + Send + Sync + 'static,
        S: Fn(&mut B, V) + Send + Sync + 'static,
    {
        Accessor {
            name: name.into(),
            access: Access::Property {
                getter: Box::new(getter),
                setter: Box::new(setter),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AccessorKind {
        match self.access {
            Access::Field { .. } => AccessorKind::Field,
            Access::Property { .. } => AccessorKind::Property,
        }
    }

    /// Reads the member. Fields are borrowed, properties are owned.
    pub fn get<'a>(&self, bean: &'a B) -> Cow<'a, V> {
        match &self.access {
            Access::Field { get, .. } => Cow::Borrowed(get(bean)),
            Access::Property { getter, .. } => Cow::Owned(getter(bean)),
        }
    }

    pub fn set(&self, bean: &mut B, value: V) {
        match &self.access {
            Access::Field { get_mut, .. } => *get_mut(bean) = value,
            Access::Property { setter, .. } => setter(bean, value),
        }
    }

    /// Type-erased view handed to filters.
    pub fn info(&self) -> AccessorRef<'_> {
        AccessorRef {
            name: &self.name,
            kind: self.kind(),
            value_type: type_name::<V>(),
        }
    }
}

impl<B, V: Clone + 'static> fmt::Debug for Accessor<B, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("value_type", &type_name::<V>())
            .finish()
    }
}

/// What a [`SerializationFilter`](crate::SerializationFilter) sees of an
/// accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessorRef<'a> {
    pub name: &'a str,
    pub kind: AccessorKind,
    pub value_type: &'static str,
}

/// Where a member's value lands inside its bean's element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MemberStyle {
    /// A child element named after the member.
    #[default]
    Element,
    /// An attribute on the bean's element.
    Attribute,
    /// Text content of the bean's element.
    Text,
}

impl MemberStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStyle::Element => "element",
            MemberStyle::Attribute => "attribute",
            MemberStyle::Text => "text",
        }
    }
}

/// Per-member metadata, set while a bean describes its members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberMeta {
    tag: Option<String>,
    style: MemberStyle,
    transient: bool,
}

impl MemberMeta {
    /// Overrides the tag (or attribute name). Defaults to the member name.
    pub fn tag(&mut self, tag: impl Into<String>) -> &mut Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn attribute(&mut self) -> &mut Self {
        self.style = MemberStyle::Attribute;
        self
    }

    pub fn text(&mut self) -> &mut Self {
        self.style = MemberStyle::Text;
        self
    }

    /// Excludes the member from binding entirely.
    pub fn transient(&mut self) -> &mut Self {
        self.transient = true;
        self
    }

    pub fn tag_override(&self) -> Option<&str> {
        self.tag.as_deref().filter(|t| !t.is_empty())
    }

    pub fn style(&self) -> MemberStyle {
        self.style
    }

    pub fn is_transient(&self) -> bool {
        self.transient
    }
}
