// Copyright 2025 Cowboy AI, LLC.

//! Storage for the constituent instances owned by a composite instance

use indexmap::{IndexMap, IndexSet};
use std::fmt;

use crate::descriptor::TypeDescriptor;
use crate::identifiers::TypeIdentity;
use crate::object::ObjectRef;

/// Constituent instances keyed by type name, plus the identities of the
/// constituent types
///
/// Names and identities are tracked separately: two distinct types sharing
/// a name overwrite each other's instance entry, but both identities stay
/// recorded.
#[derive(Default, Clone)]
pub struct ConstituentStorage {
    instances: IndexMap<String, ObjectRef>,
    identities: IndexSet<TypeIdentity>,
}

impl ConstituentStorage {
    /// Create a new empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `instance` as the constituent created for `ty`
    pub fn insert(&mut self, ty: &TypeDescriptor, instance: ObjectRef) {
        self.instances.insert(ty.name().to_string(), instance);
        self.identities.insert(ty.identity());
    }

    /// Get the instance recorded under a type name
    pub fn get(&self, name: &str) -> Option<&ObjectRef> {
        self.instances.get(name)
    }

    /// Whether a type identity was recorded directly in this storage
    pub fn has_identity(&self, identity: TypeIdentity) -> bool {
        self.identities.contains(&identity)
    }

    /// Recorded type identities, in recording order
    pub fn identities(&self) -> impl Iterator<Item = TypeIdentity> + '_ {
        self.identities.iter().copied()
    }

    /// Recorded instances, in recording order
    pub fn instances(&self) -> impl Iterator<Item = &ObjectRef> {
        self.instances.values()
    }

    /// Type names with a recorded instance
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.instances.keys().map(String::as_str)
    }

    /// Number of recorded instances
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl fmt::Debug for ConstituentStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.names().collect();
        f.debug_struct("ConstituentStorage")
            .field("constituents", &names)
            .field("identities", &self.identities.len())
            .finish()
    }
}
