// Copyright 2025 Cowboy AI, LLC.

//! The composer and the composite construction procedure

use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, trace};

use crate::config::ComposeOptions;
use crate::constituents::ConstituentStorage;
use crate::descriptor::TypeDescriptor;
use crate::errors::{MixinError, MixinResult};
use crate::object::ObjectRef;
use crate::operation::BoundOperation;
use crate::value::Value;

/// Synthesizes composite types from ordered lists of constituent types
///
/// Instantiating a composite instantiates every constituent with the same
/// arguments, copies their fields onto the composite instance (later
/// constituents overwrite earlier ones) and attaches their operations bound
/// to the constituent instance (earlier constituents win).
#[derive(Debug, Clone, Default)]
pub struct Composer {
    options: ComposeOptions,
}

impl Composer {
    /// Create a composer with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a composer with the given options
    ///
    /// # Errors
    ///
    /// Returns [`MixinError::InvalidOptions`] if the options fail validation.
    pub fn with_options(options: ComposeOptions) -> MixinResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Options used for every composite this composer produces
    pub fn options(&self) -> &ComposeOptions {
        &self.options
    }

    /// Compose `constituents`, in order, into a new composite type
    ///
    /// # Errors
    ///
    /// Returns [`MixinError::EmptyComposition`] if `constituents` is empty.
    pub fn compose(&self, constituents: &[TypeDescriptor]) -> MixinResult<TypeDescriptor> {
        if constituents.is_empty() {
            return Err(MixinError::EmptyComposition);
        }

        let composite = TypeDescriptor::composite(constituents.to_vec(), self.options.clone());
        debug!(
            composite = %composite.name(),
            constituents = constituents.len(),
            "Composed mixin type"
        );
        Ok(composite)
    }
}

/// Runs the composite part of construction on `object`
///
/// Constituent errors propagate unchanged and leave `object` unreachable
/// to the caller.
pub(crate) fn construct(
    object: &ObjectRef,
    constituents: &[TypeDescriptor],
    options: &ComposeOptions,
    args: &[Value],
) -> MixinResult<()> {
    let mut storage = ConstituentStorage::new();
    let mut candidates = Vec::new();

    for ty in constituents {
        let instance = ty.instantiate(args)?;
        storage.insert(ty, instance.clone());

        // Unguarded: the last constituent to declare a field wins
        for (name, value) in instance.fields() {
            object.set(&name, value);
        }

        candidates.extend(discover(&instance, options));
    }

    object.install_constituents(storage);

    let total = candidates.len();
    let mut applied = HashSet::new();
    for (name, operation) in candidates {
        if applied.contains(&name) || object.has_attribute(&name) {
            continue;
        }
        object.attach_bound(&name, operation);
        applied.insert(name);
    }

    trace!(
        object = %object.type_name(),
        attached = applied.len(),
        skipped = total - applied.len(),
        "Constructed composite instance"
    );
    Ok(())
}

/// Every operation reachable from `instance`, bound to it
///
/// Operations attached directly to the instance come first (minus private
/// and excluded names), then its type's resolved table. Each name appears
/// once; the first occurrence wins.
fn discover(instance: &ObjectRef, options: &ComposeOptions) -> Vec<(String, BoundOperation)> {
    let mut found: IndexMap<String, BoundOperation> = IndexMap::new();

    for (name, attached) in instance.attached_operations() {
        if options.hides_attached(&name) {
            continue;
        }
        found.insert(name, attached.bound_to(instance));
    }

    let ty = instance.type_descriptor();
    for (name, operation) in ty.capabilities() {
        if options.is_excluded(name) || found.contains_key(name) {
            continue;
        }
        found.insert(name.to_string(), operation.bind(instance));
    }

    found.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Operation;
    use pretty_assertions::assert_eq;

    fn say(text: &'static str) -> Operation {
        Operation::new(move |_, _| Ok(Value::from(text)))
    }

    #[test]
    fn test_empty_composition_rejected() {
        let err = Composer::new().compose(&[]).unwrap_err();
        assert_eq!(err, MixinError::EmptyComposition);
    }

    #[test]
    fn test_with_options_validates() {
        let bad = ComposeOptions {
            reserved_prefix: String::new(),
            ..ComposeOptions::default()
        };
        assert!(Composer::with_options(bad).is_err());
        assert!(Composer::with_options(ComposeOptions::default()).is_ok());
    }

    #[test]
    fn test_composite_name_lists_constituents() {
        let a = TypeDescriptor::builder("A").build();
        let b = TypeDescriptor::builder("B").build();
        let ab = Composer::new().compose(&[a.clone(), b.clone()]).unwrap();

        assert_eq!(ab.name(), "Mixin(A, B)");
        assert!(ab.is_composite());
        assert_eq!(ab.constituents(), &[a, b]);
    }

    /// Test discovery order: attached operations, then the type's table
    ///
    /// ```mermaid
    /// graph LR
    ///     A[attached: _hidden, tool] --> D[discovered]
    ///     B[type: tool, act, inherited] --> D
    ///     D --> R[tool attached, act, inherited]
    /// ```
    #[test]
    fn test_discover_attached_then_capabilities() {
        let base = TypeDescriptor::builder("Base")
            .operation("inherited", say("base"))
            .build();
        let ty = TypeDescriptor::builder("Worker")
            .extends(&base)
            .operation("tool", say("type tool"))
            .operation("act", say("act"))
            .operation("_helper", say("helper"))
            .build();

        let instance = ty.instantiate(&[]).unwrap();
        instance.define_operation("_hidden", say("hidden"));
        instance.define_operation("tool", say("attached tool"));

        let found = discover(&instance, &ComposeOptions::default());
        let names: Vec<&str> = found.iter().map(|(n, _)| n.as_str()).collect();
        // The private prefix only filters operations attached to the instance
        assert_eq!(names, vec!["tool", "act", "_helper", "inherited"]);
        assert_eq!(found[0].1.call(&[]).unwrap(), Value::from("attached tool"));
        assert!(found.iter().all(|(_, op)| op.receiver().ptr_eq(&instance)));
    }

    #[test]
    fn test_discover_skips_excluded_names() {
        let ty = TypeDescriptor::builder("T")
            .operation("constructor", say("ctor"))
            .operation("run", say("run"))
            .build();
        let instance = ty.instantiate(&[]).unwrap();

        let found = discover(&instance, &ComposeOptions::default());
        let names: Vec<&str> = found.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["run"]);
    }

    #[test]
    fn test_constituents_receive_identical_arguments() {
        let recorder = |name: &'static str| {
            TypeDescriptor::builder(name)
                .on_construct(move |this, args| {
                    this.set(&format!("{name}_args"), Value::List(args.to_vec()));
                    Ok(())
                })
                .build()
        };
        let composite = Composer::new()
            .compose(&[recorder("A"), recorder("B")])
            .unwrap();

        let obj = composite.instantiate(&[Value::from(7), Value::from("x")]).unwrap();
        let expected = Value::List(vec![Value::from(7), Value::from("x")]);
        assert_eq!(obj.get("A_args"), Some(expected.clone()));
        assert_eq!(obj.get("B_args"), Some(expected));
    }

    #[test]
    fn test_field_blocks_same_named_operation() {
        let data = TypeDescriptor::builder("Data").field("run", 1).build();
        let behavior = TypeDescriptor::builder("Behavior")
            .operation("run", say("running"))
            .build();
        let composite = Composer::new().compose(&[data, behavior]).unwrap();

        let obj = composite.instantiate(&[]).unwrap();
        assert_eq!(obj.get("run"), Some(Value::from(1)));
        assert!(obj.operation_names().is_empty());
    }

    #[test]
    fn test_failing_constituent_aborts_composite() {
        let ok = TypeDescriptor::builder("Ok").build();
        let failing = TypeDescriptor::builder("Failing")
            .on_construct(|_, _| Err(MixinError::construction_failed("Failing", "no")))
            .build();
        let composite = Composer::new().compose(&[ok, failing]).unwrap();

        let err = composite.instantiate(&[]).unwrap_err();
        assert_eq!(err, MixinError::construction_failed("Failing", "no"));
    }
}
