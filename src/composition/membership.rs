// Copyright 2025 Cowboy AI, LLC.

//! Constituent lookup and type membership for composite instances

use crate::constituents::ConstituentStorage;
use crate::descriptor::TypeDescriptor;
use crate::identifiers::TypeIdentity;
use crate::object::ObjectRef;

impl ObjectRef {
    /// The constituent instance created for `ty`, looked up by type name
    ///
    /// Returns `None` for types that were not constituents and for objects
    /// that are not composite instances.
    pub fn get_mixin(&self, ty: &TypeDescriptor) -> Option<ObjectRef> {
        self.with_constituents(|storage| storage?.get(ty.name()).cloned())
    }

    /// Whether this object counts as a member of `target`
    ///
    /// Checked in order:
    /// 1. the object's own type derives from `target`;
    /// 2. `target` was recorded as a constituent type, here or in the
    ///    recorded constituents of a nested composite constituent;
    /// 3. some constituent instance derives from `target`, including the
    ///    constituent instances held by a nested composite constituent.
    ///
    /// Nested composites contribute only what they recorded and how their
    /// constituent instances were derived; their own `is_of_type` is never
    /// consulted.
    pub fn is_of_type(&self, target: &TypeDescriptor) -> bool {
        if self.is_instance_of(target) {
            return true;
        }

        self.with_constituents(|storage| match storage {
            Some(storage) => {
                records_identity(storage, target.identity())
                    || records_instance_of(storage, target)
            }
            None => false,
        })
    }

    /// Type names of the recorded constituents, in construction order
    pub fn constituent_names(&self) -> Vec<String> {
        self.with_constituents(|storage| {
            storage
                .map(|s| s.names().map(str::to_string).collect())
                .unwrap_or_default()
        })
    }

    /// Identities of the directly recorded constituent types
    pub fn constituent_identities(&self) -> Vec<TypeIdentity> {
        self.with_constituents(|storage| {
            storage
                .map(|s| s.identities().collect())
                .unwrap_or_default()
        })
    }
}

fn records_identity(storage: &ConstituentStorage, identity: TypeIdentity) -> bool {
    storage.has_identity(identity)
        || storage.instances().any(|instance| {
            instance.with_constituents(|nested| {
                nested.is_some_and(|nested| records_identity(nested, identity))
            })
        })
}

fn records_instance_of(storage: &ConstituentStorage, target: &TypeDescriptor) -> bool {
    storage.instances().any(|instance| {
        instance.is_instance_of(target)
            || instance.with_constituents(|nested| {
                nested.is_some_and(|nested| records_instance_of(nested, target))
            })
    })
}
