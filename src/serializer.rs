//! Top-level entry points and their configuration.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::bean::{Bean, BeanBinding};
use crate::binding::{Binding, EncodeContext};
use crate::error::{BindingError, Result};
use crate::filter::{AcceptAll, ExcludeMembers, SerializationFilter};
use crate::node::{Element, Node};

/// Serializer settings, loadable from any self-describing serde format.
///
/// ```rust
/// let options: xmlb::SerializerOptions =
///     serde_json::from_str(r#"{ "exclude_members": ["secret"], "indent": 2 }"#).unwrap();
/// assert_eq!(options.indent, Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerializerOptions {
    /// Accessor names never emitted, in any bean.
    pub exclude_members: Vec<String>,
    /// Indentation width for [`XmlSerializer::to_xml_string`]; compact when
    /// unset.
    pub indent: Option<usize>,
}

/// Encodes beans to element trees and decodes them back.
///
/// Cheap to clone; clones share the filter.
#[derive(Clone)]
pub struct XmlSerializer {
    filter: Arc<dyn SerializationFilter>,
    options: SerializerOptions,
}

impl XmlSerializer {
    /// A serializer that emits every member.
    pub fn new() -> Self {
        XmlSerializer {
            filter: Arc::new(AcceptAll),
            options: SerializerOptions::default(),
        }
    }

    /// Replaces the member filter.
    pub fn with_filter(mut self, filter: impl SerializationFilter + 'static) -> Self {
        self.filter = Arc::new(filter);
        self
    }

    pub fn from_options(options: &SerializerOptions) -> Self {
        let exclude = ExcludeMembers::new(options.exclude_members.iter().cloned());
        let filter: Arc<dyn SerializationFilter> = if exclude.is_empty() {
            Arc::new(AcceptAll)
        } else {
            Arc::new(exclude)
        };
        XmlSerializer {
            filter,
            options: options.clone(),
        }
    }

    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    /// The bean binding for `B`, discovering its descriptor if needed.
    pub fn binding<B: Bean>(&self) -> Result<BeanBinding<B>> {
        Ok(BeanBinding::new()?)
    }

    pub fn serialize<B: Bean>(&self, bean: &B) -> Result<Element> {
        let binding = self.binding::<B>()?;
        trace!(bean = binding.tag_name(), "serialize");
        let cx = EncodeContext::new(&*self.filter);
        let mut document = Element::document();
        match binding.serialize(bean, &mut document, &cx)? {
            Some(Node::Element(element)) => Ok(element),
            Some(other) => Err(BindingError::Misrouted {
                expected: binding.tag_name().to_owned(),
                found: other.as_node_ref().to_string(),
            }),
            None => Err(BindingError::Misrouted {
                expected: binding.tag_name().to_owned(),
                found: "nothing".to_owned(),
            }),
        }
    }

    pub fn deserialize<B: Bean>(&self, element: &Element) -> Result<B> {
        let binding = self.binding::<B>()?;
        trace!(bean = binding.tag_name(), "deserialize");
        binding.decode(element)
    }

    /// Serializes `bean` and renders it, indented when configured.
    pub fn to_xml_string<B: Bean>(&self, bean: &B) -> Result<String> {
        let element = self.serialize(bean)?;
        Ok(match self.options.indent {
            Some(indent) => element.to_pretty_string(indent),
            None => element.to_string(),
        })
    }
}

impl Default for XmlSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for XmlSerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlSerializer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
