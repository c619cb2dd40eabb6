// Copyright 2025 Cowboy AI, LLC.

//! Type descriptors: constructible blueprints with explicit capability tables
//!
//! A descriptor declares its operations and field defaults when it is built.
//! The operations reachable through the ancestor chain are merged into a
//! resolved capability table at that point (own definitions first, then each
//! ancestor's in order, first occurrence wins), so discovering what an
//! instance can do never walks the chain at runtime.

use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::rc::Rc;

use crate::composition::composer;
use crate::config::ComposeOptions;
use crate::errors::MixinResult;
use crate::identifiers::TypeIdentity;
use crate::object::ObjectRef;
use crate::operation::Operation;
use crate::value::Value;

type Initializer = dyn Fn(&ObjectRef, &[Value]) -> MixinResult<()>;
type ArgMapper = dyn Fn(&[Value]) -> Vec<Value>;

/// What kind of blueprint a descriptor is
#[derive(Clone)]
pub(crate) enum TypeKind {
    /// Ordinary type with its own fields and operations
    Plain,
    /// Synthesized from an ordered list of constituents
    Composite {
        constituents: Vec<TypeDescriptor>,
        options: ComposeOptions,
    },
}

struct TypeDef {
    name: String,
    identity: TypeIdentity,
    kind: TypeKind,
    parent: Option<TypeDescriptor>,
    operations: IndexMap<String, Operation>,
    capabilities: IndexMap<String, Operation>,
    fields: IndexMap<String, Value>,
    initializer: Option<Rc<Initializer>>,
    super_args: Option<Rc<ArgMapper>>,
}

/// A constructible blueprint for objects
///
/// Descriptors are cheap to clone and compare by identity. Composite
/// descriptors produced by [`compose`](crate::compose) are ordinary
/// descriptors and can be composed again or extended.
///
/// # Example
///
/// ```
/// use cim_mixin::{TypeDescriptor, Value};
///
/// let can_cast = TypeDescriptor::builder("CanCastSpells")
///     .method("cast", |_this, _args| Ok(Value::from("casts a spell!")))
///     .build();
///
/// let wizard = can_cast.instantiate(&[]).unwrap();
/// assert_eq!(wizard.invoke("cast", &[]).unwrap(), Value::from("casts a spell!"));
/// ```
#[derive(Clone)]
pub struct TypeDescriptor(Rc<TypeDef>);

impl TypeDescriptor {
    /// Start building a plain descriptor
    pub fn builder(name: impl Into<String>) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder::new(name)
    }

    pub(crate) fn composite(constituents: Vec<TypeDescriptor>, options: ComposeOptions) -> Self {
        let names: Vec<&str> = constituents.iter().map(|c| c.name()).collect();
        let name = format!("Mixin({})", names.join(", "));
        Self(Rc::new(TypeDef {
            name,
            identity: TypeIdentity::new(),
            kind: TypeKind::Composite {
                constituents,
                options,
            },
            parent: None,
            operations: IndexMap::new(),
            capabilities: IndexMap::new(),
            fields: IndexMap::new(),
            initializer: None,
            super_args: None,
        }))
    }

    /// Name of the type
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Unique identity of the type
    pub fn identity(&self) -> TypeIdentity {
        self.0.identity
    }

    /// Direct ancestor, if any
    pub fn parent(&self) -> Option<&TypeDescriptor> {
        self.0.parent.as_ref()
    }

    /// Whether this descriptor was produced by composition
    pub fn is_composite(&self) -> bool {
        matches!(self.0.kind, TypeKind::Composite { .. })
    }

    /// Constituents of a composite descriptor, empty for plain ones
    pub fn constituents(&self) -> &[TypeDescriptor] {
        match &self.0.kind {
            TypeKind::Composite { constituents, .. } => constituents,
            TypeKind::Plain => &[],
        }
    }

    /// This descriptor followed by each ancestor up to the root
    pub fn lineage(&self) -> impl Iterator<Item = &TypeDescriptor> {
        std::iter::successors(Some(self), |t| t.parent())
    }

    /// Whether `other` is this type or one of its ancestors
    pub fn is_subtype_of(&self, other: &TypeDescriptor) -> bool {
        self.lineage().any(|t| t.identity() == other.identity())
    }

    /// Operations declared directly on this type, in declaration order
    pub fn own_operations(&self) -> impl Iterator<Item = &str> {
        self.0.operations.keys().map(String::as_str)
    }

    /// Resolved operation table: own operations, then inherited ones not
    /// already shadowed, in method-resolution order
    pub fn capabilities(&self) -> impl Iterator<Item = (&str, &Operation)> {
        self.0.capabilities.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up an operation in the resolved table
    pub fn capability(&self, name: &str) -> Option<&Operation> {
        self.0.capabilities.get(name)
    }

    /// Whether the resolved table contains `name`
    pub fn has_capability(&self, name: &str) -> bool {
        self.0.capabilities.contains_key(name)
    }

    /// Every data attribute name an instance of this type is declared to
    /// carry. For composites this is the merge of the constituents' sets in
    /// constituent order.
    pub fn declared_fields(&self) -> Vec<String> {
        let mut names = IndexSet::new();
        self.collect_fields(&mut names);
        names.into_iter().collect()
    }

    fn collect_fields(&self, names: &mut IndexSet<String>) {
        if let Some(parent) = self.parent() {
            parent.collect_fields(names);
        }
        for constituent in self.constituents() {
            constituent.collect_fields(names);
        }
        names.extend(self.0.fields.keys().cloned());
    }

    /// Construct a new instance, forwarding `args` to every construction
    /// procedure along the ancestor chain
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any construction procedure. No
    /// instance is returned in that case.
    pub fn instantiate(&self, args: &[Value]) -> MixinResult<ObjectRef> {
        let object = ObjectRef::new(self.clone());
        self.construct_into(&object, args)?;
        Ok(object)
    }

    /// Runs construction root-first: the parent's procedure, then this
    /// type's composite procedure, field defaults and initializer.
    fn construct_into(&self, object: &ObjectRef, args: &[Value]) -> MixinResult<()> {
        if let Some(parent) = self.parent() {
            match &self.0.super_args {
                Some(map) => parent.construct_into(object, &map(args))?,
                None => parent.construct_into(object, args)?,
            }
        }

        if let TypeKind::Composite {
            constituents,
            options,
        } = &self.0.kind
        {
            composer::construct(object, constituents, options, args)?;
        }

        for (name, value) in &self.0.fields {
            object.set(name, value.clone());
        }

        if let Some(init) = &self.0.initializer {
            init(object, args)?;
        }
        Ok(())
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.0.name)
            .field("identity", &self.0.identity)
            .finish()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

/// Builder for plain type descriptors
pub struct TypeDescriptorBuilder {
    name: String,
    parent: Option<TypeDescriptor>,
    operations: IndexMap<String, Operation>,
    fields: IndexMap<String, Value>,
    initializer: Option<Rc<Initializer>>,
    super_args: Option<Rc<ArgMapper>>,
}

impl TypeDescriptorBuilder {
    /// Create a builder for a type with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            operations: IndexMap::new(),
            fields: IndexMap::new(),
            initializer: None,
            super_args: None,
        }
    }

    /// Derive from `parent`, inheriting its operations and construction
    pub fn extends(mut self, parent: &TypeDescriptor) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Declare a data field with its default value
    ///
    /// Defaults are cloned into each instance; object defaults are shared
    /// handles, so create per-instance objects in [`on_construct`](Self::on_construct).
    pub fn field(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), default.into());
        self
    }

    /// Declare an operation
    ///
    /// Declaring the same name twice keeps the later definition.
    pub fn method<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> MixinResult<Value> + 'static,
    {
        self.operations.insert(name.into(), Operation::new(func));
        self
    }

    /// Declare an already built operation
    pub fn operation(mut self, name: impl Into<String>, operation: Operation) -> Self {
        self.operations.insert(name.into(), operation);
        self
    }

    /// Run `init` after the parent's construction and the field defaults
    pub fn on_construct<F>(mut self, init: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> MixinResult<()> + 'static,
    {
        self.initializer = Some(Rc::new(init));
        self
    }

    /// Choose the arguments handed to the parent's construction instead of
    /// forwarding this type's arguments unchanged
    pub fn super_args<F>(mut self, map: F) -> Self
    where
        F: Fn(&[Value]) -> Vec<Value> + 'static,
    {
        self.super_args = Some(Rc::new(map));
        self
    }

    /// Finish the descriptor, resolving its capability table
    pub fn build(self) -> TypeDescriptor {
        let mut capabilities = self.operations.clone();
        if let Some(parent) = &self.parent {
            for (name, op) in parent.capabilities() {
                if !capabilities.contains_key(name) {
                    capabilities.insert(name.to_string(), op.clone());
                }
            }
        }

        TypeDescriptor(Rc::new(TypeDef {
            name: self.name,
            identity: TypeIdentity::new(),
            kind: TypeKind::Plain,
            parent: self.parent,
            operations: self.operations,
            capabilities,
            fields: self.fields,
            initializer: self.initializer,
            super_args: self.super_args,
        }))
    }
}
