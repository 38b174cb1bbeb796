//! Process-wide cache of type descriptors.
//!
//! Each bean type is discovered at most once per process, modulo a benign
//! race: two threads may discover the same type concurrently, and the first
//! descriptor inserted is the one everybody keeps. Descriptors are immutable
//! once published, so readers never take the write lock after warm-up.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::bean::{Bean, TypeDescriptor};
use crate::error::ConfigurationError;

type Erased = Arc<dyn Any + Send + Sync>;

static DESCRIPTORS: Lazy<RwLock<HashMap<TypeId, Erased>>> = Lazy::new(|| RwLock::new(HashMap::new()));

/// Shared descriptor for `B`, discovering it on first request.
///
/// Discovery runs without holding the lock, so a bean whose members refer
/// back to itself does not deadlock. A failed discovery is not cached.
pub fn descriptor<B: Bean>() -> Result<Arc<TypeDescriptor<B>>, ConfigurationError> {
    let key = TypeId::of::<B>();
    if let Some(found) = DESCRIPTORS.read().get(&key) {
        return Ok(downcast(Arc::clone(found)));
    }

    let discovered: Erased = Arc::new(TypeDescriptor::<B>::discover()?);
    let mut map = DESCRIPTORS.write();
    let entry = map.entry(key).or_insert_with(|| {
        debug!(bean = std::any::type_name::<B>(), "caching type descriptor");
        discovered
    });
    Ok(downcast(Arc::clone(entry)))
}

/// Number of descriptors currently cached.
pub fn cached_len() -> usize {
    DESCRIPTORS.read().len()
}

fn downcast<B: Bean>(erased: Erased) -> Arc<TypeDescriptor<B>> {
    erased
        .downcast::<TypeDescriptor<B>>()
        .unwrap_or_else(|_| unreachable!("descriptor cache keyed by TypeId holds a foreign type"))
}
