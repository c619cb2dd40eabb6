// Copyright 2025 Cowboy AI, LLC.

//! Invocable operations and receiver binding

use std::fmt;
use std::rc::Rc;

use crate::errors::MixinResult;
use crate::object::ObjectRef;
use crate::value::Value;

type OperationFn = dyn Fn(&ObjectRef, &[Value]) -> MixinResult<Value>;

/// A callable declared by a type descriptor
///
/// The first argument is the receiver the operation is invoked on. Cloning
/// an operation shares the underlying callable.
#[derive(Clone)]
pub struct Operation {
    func: Rc<OperationFn>,
}

impl Operation {
    /// Wrap a closure as an operation
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> MixinResult<Value> + 'static,
    {
        Self {
            func: Rc::new(func),
        }
    }

    /// Call the operation with an explicit receiver
    pub fn call(&self, receiver: &ObjectRef, args: &[Value]) -> MixinResult<Value> {
        (self.func)(receiver, args)
    }

    /// Fix the receiver, producing a bound operation
    pub fn bind(&self, receiver: &ObjectRef) -> BoundOperation {
        BoundOperation {
            receiver: receiver.clone(),
            operation: self.clone(),
        }
    }

    /// Check whether two operations share the same callable
    pub fn ptr_eq(&self, other: &Operation) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Operation(..)")
    }
}

/// An operation with its receiver fixed
///
/// Inside the operation the receiver is always the object it was bound to,
/// never the object it is later attached to.
#[derive(Clone)]
pub struct BoundOperation {
    receiver: ObjectRef,
    operation: Operation,
}

impl BoundOperation {
    /// Invoke with the bound receiver
    pub fn call(&self, args: &[Value]) -> MixinResult<Value> {
        self.operation.call(&self.receiver, args)
    }

    /// Binding an already bound operation keeps the original receiver
    pub fn rebind(&self, _receiver: &ObjectRef) -> BoundOperation {
        self.clone()
    }

    /// The object this operation is bound to
    pub fn receiver(&self) -> &ObjectRef {
        &self.receiver
    }

    /// The unbound operation
    pub fn operation(&self) -> &Operation {
        &self.operation
    }
}

impl fmt::Debug for BoundOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundOperation")
            .field("receiver", &self.receiver)
            .finish()
    }
}
