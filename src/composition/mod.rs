// Copyright 2025 Cowboy AI, LLC.

//! Composition module for combining independent types into composites
//!
//! A composite type aggregates the fields and operations of its
//! constituents. Conflicts are resolved deterministically: operations keep
//! the first constituent's definition, fields keep the last constituent's
//! value. The two rules differ on purpose and are not unified.

pub(crate) mod composer;
mod membership;

pub use composer::Composer;

use crate::config::ComposeOptions;
use crate::descriptor::TypeDescriptor;
use crate::errors::MixinResult;

/// Compose `constituents`, in order, into a new composite type using the
/// default options
///
/// # Example
///
/// ```
/// use cim_mixin::{compose, TypeDescriptor, Value};
///
/// let can_attack = TypeDescriptor::builder("CanAttack")
///     .method("attack", |_this, _args| Ok(Value::from("attacks!")))
///     .build();
/// let can_cast = TypeDescriptor::builder("CanCastSpells")
///     .method("cast", |_this, _args| Ok(Value::from("casts a spell!")))
///     .build();
///
/// let hero = TypeDescriptor::builder("Hero")
///     .extends(&compose(&[can_attack, can_cast.clone()]).unwrap())
///     .field("hp", 100)
///     .build();
///
/// let h = hero.instantiate(&[]).unwrap();
/// assert_eq!(h.invoke("cast", &[]).unwrap(), Value::from("casts a spell!"));
/// assert!(h.is_of_type(&can_cast));
/// assert_eq!(h.get("hp"), Some(Value::from(100)));
/// ```
///
/// # Errors
///
/// Returns [`MixinError::EmptyComposition`](crate::MixinError::EmptyComposition)
/// if `constituents` is empty.
pub fn compose(constituents: &[TypeDescriptor]) -> MixinResult<TypeDescriptor> {
    Composer::new().compose(constituents)
}

/// Compose with explicit options
///
/// # Errors
///
/// Fails if the options are invalid or `constituents` is empty.
pub fn compose_with(
    constituents: &[TypeDescriptor],
    options: &ComposeOptions,
) -> MixinResult<TypeDescriptor> {
    Composer::with_options(options.clone())?.compose(constituents)
}
