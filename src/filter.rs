//! Encode-time member filters.

use std::any::Any;
use std::collections::BTreeSet;

use crate::accessor::AccessorRef;

/// Decides whether a member of `bean` is emitted. Consulted only on encode.
pub trait SerializationFilter: Send + Sync {
    fn accepts(&self, accessor: &AccessorRef<'_>, bean: &dyn Any) -> bool;
}

/// Emits every member.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl SerializationFilter for AcceptAll {
    fn accepts(&self, _accessor: &AccessorRef<'_>, _bean: &dyn Any) -> bool {
        true
    }
}

/// Drops members by accessor name, in every bean.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludeMembers {
    names: BTreeSet<String>,
}

impl ExcludeMembers {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ExcludeMembers {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl SerializationFilter for ExcludeMembers {
    fn accepts(&self, accessor: &AccessorRef<'_>, _bean: &dyn Any) -> bool {
        !self.names.contains(accessor.name)
    }
}

impl<F> SerializationFilter for F
where
    F: Fn(&AccessorRef<'_>, &dyn Any) -> bool + Send + Sync,
{
    fn accepts(&self, accessor: &AccessorRef<'_>, bean: &dyn Any) -> bool {
        self(accessor, bean)
    }
}
