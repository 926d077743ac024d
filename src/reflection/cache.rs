//! Per-type memo of public member lists.
//!
//! Projecting an object into a string mapping needs the ordered list of its public members.
//! Computing that list means a registry lookup (and on first use, describing the type), so the
//! [`MemberCache`] keeps the result per concrete type for the lifetime of its context. Entries
//! are never evicted.
//!
//! Hit and miss counters are kept so callers can confirm that a type was introspected once.

use std::{
    any::TypeId,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use dashmap::DashMap;
use log::{debug, trace};

use crate::reflection::{member::MemberDescriptor, typesystem::TypeRegistry, Reflected};

/// Shared, ordered list of the public members of one type
pub type MemberList = Arc<[MemberDescriptor]>;

/// Concurrent per-type cache of public member lists
#[derive(Default)]
pub struct MemberCache {
    entries: DashMap<TypeId, MemberList>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemberCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Public members of the concrete type behind `object`
    ///
    /// A cached list is returned without consulting `registry`. Otherwise the list is computed
    /// from the registry and, if `store` is set, kept for later calls. Two threads missing at
    /// once may both compute the list; the first stored one wins.
    pub fn members(
        &self,
        registry: &TypeRegistry,
        object: &dyn Reflected,
        store: bool,
    ) -> MemberList {
        let handle = object.type_handle();
        if store {
            if let Some(cached) = self.entries.get(&handle.id()) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!("Member list of '{}' served from cache", handle.name());
                return Arc::clone(cached.value());
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let info = registry.info_of(object);
        let members: MemberList = info.public_members().cloned().collect();
        debug!(
            "Computed {} public member(s) of '{}'",
            members.len(),
            handle.name()
        );

        if !store {
            return members;
        }
        Arc::clone(self.entries.entry(handle.id()).or_insert(members).value())
    }

    /// Number of lookups answered from the cache
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of lookups that computed a member list
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Number of cached types
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
