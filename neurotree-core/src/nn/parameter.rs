use crate::nn::value::Value;
use log::{trace, warn};
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A named, mutable cell holding a trainable value of a Module.
///
/// Whenever a value enters the cell (construction or [`Parameter::update`]) and it exposes the
/// gradient-tracking capability, that capability is invoked with `true`. Values without it are
/// stored unchanged.
pub struct Parameter {
    value: Box<dyn Value>,
    name: Option<String>,
}

fn enable_grad(value: &mut dyn Value) {
    match value.as_requires_grad() {
        Some(tracked) => tracked.requires_grad_(true),
        None => trace!("Parameter value {:?} has no gradient tracking, stored as is", value),
    }
}

impl Parameter {
    /// Creates a new Parameter, optionally named.
    pub fn new<V: Value>(value: V, name: Option<String>) -> Self {
        Self::from_boxed(Box::new(value), name)
    }

    /// Creates a new Parameter without a name.
    pub fn new_unnamed<V: Value>(value: V) -> Self {
        Self::new(value, None)
    }

    /// Creates a new Parameter from an already boxed value.
    pub fn from_boxed(mut value: Box<dyn Value>, name: Option<String>) -> Self {
        enable_grad(&mut *value);
        Parameter { value, name }
    }

    /// Replaces the stored value. No type compatibility with the previous value is required.
    pub fn update<V: Value>(&mut self, value: V) {
        self.update_boxed(Box::new(value));
    }

    /// Replaces the stored value with an already boxed one.
    pub fn update_boxed(&mut self, mut value: Box<dyn Value>) {
        enable_grad(&mut *value);
        self.value = value;
    }

    pub fn value(&self) -> &dyn Value {
        &*self.value
    }

    pub fn value_mut(&mut self) -> &mut dyn Value {
        &mut *self.value
    }

    /// Returns the stored value if it is of type `T`.
    pub fn value_as<T: Value>(&self) -> Option<&T> {
        (*self.value).downcast_ref::<T>()
    }

    pub fn value_as_mut<T: Value>(&mut self) -> Option<&mut T> {
        (*self.value).downcast_mut::<T>()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Consumes the Parameter and returns the underlying value.
    pub fn into_inner(self) -> Box<dyn Value> {
        self.value
    }

    /// Wraps the Parameter in a shared handle.
    pub fn into_shared(self) -> ParamRef {
        ParamRef::new(self)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{:?}", self.value),
        }
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "Parameter(name={}, value={:?})", name, self.value),
            None => write!(f, "Parameter({:?})", self.value),
        }
    }
}

/// Shared handle to a [`Parameter`].
///
/// Modules hand out clones of this handle, so every traversal result refers to the very
/// Parameter stored in the tree.
#[derive(Clone)]
pub struct ParamRef(Arc<RwLock<Parameter>>);

impl ParamRef {
    pub fn new(param: Parameter) -> Self {
        ParamRef(Arc::new(RwLock::new(param)))
    }

    /// Acquires read access. A poisoned lock is recovered, the Parameter has no invariant
    /// a panicking writer can break.
    pub fn read(&self) -> RwLockReadGuard<'_, Parameter> {
        self.0.read().unwrap_or_else(|poisoned| {
            warn!("RwLock for parameter was poisoned in read. Recovering reader guard.");
            poisoned.into_inner()
        })
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Parameter> {
        self.0.write().unwrap_or_else(|poisoned| {
            warn!("RwLock for parameter was poisoned in write. Recovering writer guard.");
            poisoned.into_inner()
        })
    }

    /// Replaces the value of the shared Parameter.
    pub fn update<V: Value>(&self, value: V) {
        self.write().update(value);
    }

    /// Returns a clone of the stored value if it is of type `T`.
    pub fn value_cloned<T: Value + Clone>(&self) -> Option<T> {
        self.read().value_as::<T>().cloned()
    }

    /// Whether both handles point to the same Parameter.
    pub fn ptr_eq(&self, other: &ParamRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn as_arc(&self) -> &Arc<RwLock<Parameter>> {
        &self.0
    }
}

impl From<Parameter> for ParamRef {
    fn from(param: Parameter) -> Self {
        ParamRef::new(param)
    }
}

impl fmt::Debug for ParamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.read(), f)
    }
}

impl fmt::Display for ParamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.read(), f)
    }
}

#[cfg(test)]
#[path = "parameter_test.rs"]
mod tests;
