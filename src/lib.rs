// Copyright 2025 Cowboy AI, LLC.

//! # CIM Mixin
//!
//! Runtime mixin composition for the Composable Information Machine.
//!
//! Given an ordered list of independently defined types, [`compose`]
//! synthesizes a composite type whose instances aggregate the fields and
//! operations of every constituent:
//! - **Type Descriptors**: blueprints with explicit, build-time capability tables
//! - **Objects**: instances with fields, attached operations and dispatch
//! - **Composer**: composite construction with deterministic conflict resolution
//! - **Membership**: `is_of_type` answers for constituents without real inheritance
//!
//! ## Resolution Rules
//!
//! 1. **Operations**: the first constituent declaring a name wins
//! 2. **Fields**: the last constituent declaring a name wins
//! 3. **Binding**: constituent operations always run against the constituent instance
//! 4. **Derived types**: operations declared by a type extending a composite are never
//!    shadowed by constituent operations
//!
//! The asymmetry between rules 1 and 2 is kept for compatibility with existing
//! composites.

#![warn(missing_docs)]

mod config;
mod constituents;
mod descriptor;
mod errors;
mod identifiers;
mod object;
mod operation;
mod value;
pub mod composition;

// Re-export core types
pub use composition::{compose, compose_with, Composer};
pub use config::ComposeOptions;
pub use constituents::ConstituentStorage;
pub use descriptor::{TypeDescriptor, TypeDescriptorBuilder};
pub use errors::{MixinError, MixinResult};
pub use identifiers::TypeIdentity;
pub use object::{ObjectRef, GET_MIXIN, IS_OF_TYPE};
pub use operation::{BoundOperation, Operation};
pub use value::Value;
