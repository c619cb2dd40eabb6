// Copyright 2025 Cowboy AI, LLC.

//! Identifier types for type descriptors

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Type identity - a unique, comparable handle for a type descriptor
///
/// Identities are assigned when a descriptor is built and never reused.
/// Two descriptors sharing a name still have distinct identities, so
/// membership checks stay correct even when names collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeIdentity(Uuid);

impl TypeIdentity {
    /// Create a new random type identity
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from a UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TypeIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TypeIdentity> for Uuid {
    fn from(id: TypeIdentity) -> Self {
        id.0
    }
}
