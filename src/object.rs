// Copyright 2025 Cowboy AI, LLC.

//! Object instances: fields, attached operations and dispatch
//!
//! Objects are reference counted and interior mutable. They are meant for
//! single-threaded use; nothing here is synchronized.

use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::constituents::ConstituentStorage;
use crate::descriptor::TypeDescriptor;
use crate::errors::{MixinError, MixinResult};
use crate::operation::{BoundOperation, Operation};
use crate::value::Value;

/// Name of the built-in constituent lookup on composite instances
pub const GET_MIXIN: &str = "get_mixin";

/// Name of the built-in membership query on composite instances
pub const IS_OF_TYPE: &str = "is_of_type";

/// An operation attached directly to an object
#[derive(Clone, Debug)]
pub(crate) enum AttachedOperation {
    /// Bound to some other object, usually a constituent
    Bound(BoundOperation),
    /// Receives the object it is attached to
    Own(Operation),
}

impl AttachedOperation {
    /// Bind for the object that owns this slot; bound slots keep their receiver
    pub(crate) fn bound_to(&self, owner: &ObjectRef) -> BoundOperation {
        match self {
            AttachedOperation::Bound(bound) => bound.rebind(owner),
            AttachedOperation::Own(op) => op.bind(owner),
        }
    }
}

pub(crate) struct ObjectData {
    ty: TypeDescriptor,
    fields: IndexMap<String, Value>,
    operations: IndexMap<String, AttachedOperation>,
    constituents: Option<ConstituentStorage>,
}

/// Shared handle to an object
///
/// Cloning the handle does not copy the object. Equality is identity.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<ObjectData>>);

impl ObjectRef {
    pub(crate) fn new(ty: TypeDescriptor) -> Self {
        Self(Rc::new(RefCell::new(ObjectData {
            ty,
            fields: IndexMap::new(),
            operations: IndexMap::new(),
            constituents: None,
        })))
    }

    /// The type this object was instantiated from
    pub fn type_descriptor(&self) -> TypeDescriptor {
        self.0.borrow().ty.clone()
    }

    /// Name of the type this object was instantiated from
    pub fn type_name(&self) -> String {
        self.0.borrow().ty.name().to_string()
    }

    /// Whether both handles point to the same object
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Read a field
    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.borrow().fields.get(name).cloned()
    }

    /// Write a field, creating it if needed
    ///
    /// Writing over an attached operation replaces the operation.
    pub fn set(&self, name: &str, value: impl Into<Value>) {
        let mut data = self.0.borrow_mut();
        data.operations.shift_remove(name);
        data.fields.insert(name.to_string(), value.into());
    }

    /// Whether the object has a data field called `name`
    pub fn has_field(&self, name: &str) -> bool {
        self.0.borrow().fields.contains_key(name)
    }

    /// Names of the enumerable data fields, in insertion order
    pub fn field_names(&self) -> Vec<String> {
        self.0.borrow().fields.keys().cloned().collect()
    }

    /// Snapshot of the enumerable data fields
    pub fn fields(&self) -> Vec<(String, Value)> {
        self.0
            .borrow()
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Names of operations attached directly to this object
    ///
    /// Attached operations are not fields: they never show up in
    /// [`field_names`](Self::field_names) or [`fields`](Self::fields).
    pub fn operation_names(&self) -> Vec<String> {
        self.0.borrow().operations.keys().cloned().collect()
    }

    /// Attach an operation whose receiver is this object, replacing any
    /// attached operation or field of the same name
    pub fn define_operation(&self, name: &str, operation: Operation) {
        let mut data = self.0.borrow_mut();
        data.fields.shift_remove(name);
        data.operations
            .insert(name.to_string(), AttachedOperation::Own(operation));
    }

    /// Detach an operation, returning whether one was attached
    pub fn remove_operation(&self, name: &str) -> bool {
        self.0.borrow_mut().operations.shift_remove(name).is_some()
    }

    pub(crate) fn attach_bound(&self, name: &str, operation: BoundOperation) {
        self.0
            .borrow_mut()
            .operations
            .insert(name.to_string(), AttachedOperation::Bound(operation));
    }

    pub(crate) fn attached_operations(&self) -> Vec<(String, AttachedOperation)> {
        self.0
            .borrow()
            .operations
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Whether `name` resolves to anything on this object: a field, an
    /// attached operation, an operation of its type, or a built-in query of
    /// a composite instance
    pub fn has_attribute(&self, name: &str) -> bool {
        let data = self.0.borrow();
        data.fields.contains_key(name)
            || data.operations.contains_key(name)
            || data.ty.has_capability(name)
            || (data.constituents.is_some() && (name == GET_MIXIN || name == IS_OF_TYPE))
    }

    /// Whether some operation called `name` can be invoked on this object
    pub fn responds_to(&self, name: &str) -> bool {
        let data = self.0.borrow();
        data.operations.contains_key(name) || data.ty.has_capability(name)
    }

    /// Invoke an operation by name
    ///
    /// Operations attached to the object take precedence over those of its
    /// type. No borrow of the object is held while the operation runs.
    ///
    /// # Errors
    ///
    /// Returns [`MixinError::OperationNotFound`] if nothing called `name` is
    /// reachable, or whatever error the operation itself returns.
    pub fn invoke(&self, name: &str, args: &[Value]) -> MixinResult<Value> {
        let target = {
            let data = self.0.borrow();
            match data.operations.get(name) {
                Some(attached) => Some(attached.bound_to(self)),
                None => data.ty.capability(name).map(|op| op.bind(self)),
            }
        };

        match target {
            Some(bound) => bound.call(args),
            None => Err(MixinError::OperationNotFound {
                type_name: self.type_name(),
                operation: name.to_string(),
            }),
        }
    }

    /// Real inheritance check: whether `ty` is this object's type or one of
    /// its ancestors
    pub fn is_instance_of(&self, ty: &TypeDescriptor) -> bool {
        self.0.borrow().ty.is_subtype_of(ty)
    }

    /// Whether this object was built through a composite type
    pub fn is_composite(&self) -> bool {
        self.0.borrow().constituents.is_some()
    }

    pub(crate) fn install_constituents(&self, storage: ConstituentStorage) {
        self.0.borrow_mut().constituents = Some(storage);
    }

    pub(crate) fn with_constituents<R>(
        &self,
        f: impl FnOnce(Option<&ConstituentStorage>) -> R,
    ) -> R {
        f(self.0.borrow().constituents.as_ref())
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(data) => {
                let fields: Vec<&str> = data.fields.keys().map(String::as_str).collect();
                f.debug_struct("ObjectRef")
                    .field("type", &data.ty.name())
                    .field("fields", &fields)
                    .finish()
            }
            Err(_) => f.write_str("ObjectRef(<borrowed>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn counter_type() -> TypeDescriptor {
        TypeDescriptor::builder("Counter")
            .field("count", 0)
            .method("increment", |this, args| {
                let by = args.first().map(Value::expect_int).transpose()?.unwrap_or(1);
                let next = this.get("count").unwrap_or_default().expect_int()? + by;
                this.set("count", next);
                Ok(Value::from(next))
            })
            .build()
    }

    #[test]
    fn test_fields_read_write() {
        let obj = counter_type().instantiate(&[]).unwrap();
        assert_eq!(obj.get("count"), Some(Value::from(0)));
        assert!(obj.get("missing").is_none());

        obj.set("label", "c1");
        assert!(obj.has_field("label"));
        assert_eq!(obj.field_names(), vec!["count", "label"]);
        assert_eq!(
            obj.fields(),
            vec![
                ("count".to_string(), Value::from(0)),
                ("label".to_string(), Value::from("c1")),
            ]
        );
    }

    #[test]
    fn test_invoke_type_operation_mutates_receiver() {
        let obj = counter_type().instantiate(&[]).unwrap();
        assert_eq!(obj.invoke("increment", &[]).unwrap(), Value::from(1));
        assert_eq!(obj.invoke("increment", &[Value::from(5)]).unwrap(), Value::from(6));
        assert_eq!(obj.get("count"), Some(Value::from(6)));
    }

    #[test]
    fn test_invoke_unknown_operation() {
        let obj = counter_type().instantiate(&[]).unwrap();
        let err = obj.invoke("decrement", &[]).unwrap_err();
        assert_eq!(
            err,
            MixinError::OperationNotFound {
                type_name: "Counter".to_string(),
                operation: "decrement".to_string(),
            }
        );
    }

    /// Test attached operations shadow type operations and stay out of fields
    ///
    /// ```mermaid
    /// graph LR
    ///     A[invoke] --> B{attached?}
    ///     B -->|yes| C[attached operation]
    ///     B -->|no| D[type capability]
    /// ```
    #[test]
    fn test_attached_operation_precedence() {
        let obj = counter_type().instantiate(&[]).unwrap();
        obj.define_operation("increment", Operation::new(|_, _| Ok(Value::from("patched"))));

        assert_eq!(obj.invoke("increment", &[]).unwrap(), Value::from("patched"));
        assert_eq!(obj.operation_names(), vec!["increment"]);
        assert_eq!(obj.field_names(), vec!["count"]);

        assert!(obj.remove_operation("increment"));
        assert!(!obj.remove_operation("increment"));
        assert_eq!(obj.invoke("increment", &[]).unwrap(), Value::from(1));
    }

    #[test]
    fn test_set_replaces_attached_operation() {
        let obj = counter_type().instantiate(&[]).unwrap();
        obj.define_operation("shout", Operation::new(|_, _| Ok(Value::from("HEY"))));
        obj.set("shout", false);

        assert!(obj.operation_names().is_empty());
        assert_eq!(obj.get("shout"), Some(Value::from(false)));
        assert!(obj.invoke("shout", &[]).unwrap_err().is_not_found());
    }

    #[test]
    fn test_has_attribute_and_responds_to() {
        let obj = counter_type().instantiate(&[]).unwrap();
        assert!(obj.has_attribute("count"));
        assert!(obj.has_attribute("increment"));
        assert!(!obj.has_attribute("missing"));
        // Plain objects have no built-in composite queries
        assert!(!obj.has_attribute(IS_OF_TYPE));

        assert!(obj.responds_to("increment"));
        assert!(!obj.responds_to("count"));
    }

    #[test]
    fn test_operation_can_mutate_its_own_caller() {
        let fighter = TypeDescriptor::builder("Fighter")
            .field("hp", 20)
            .method("hit", |_this, args| {
                let target = args
                    .first()
                    .ok_or_else(|| MixinError::invalid_argument("hit", "missing target"))?
                    .expect_object()?;
                let hp = target.get("hp").unwrap_or_default().expect_int()?;
                target.set("hp", hp - 5);
                Ok(Value::Null)
            })
            .build();

        let f = fighter.instantiate(&[]).unwrap();
        f.invoke("hit", &[Value::from(&f)]).unwrap();
        assert_eq!(f.get("hp"), Some(Value::from(15)));
    }

    #[test]
    fn test_identity_equality_and_debug() {
        let ty = counter_type();
        let a = ty.instantiate(&[]).unwrap();
        let b = ty.instantiate(&[]).unwrap();

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert!(a.is_instance_of(&ty));
        assert!(!a.is_composite());

        let debug = format!("{:?}", a);
        assert!(debug.contains("Counter"));
        assert!(debug.contains("count"));
    }
}
