use crate::nn::module::Module;
use crate::nn::parameter::{ParamRef, Parameter};
use crate::nn::value::Value;
use indexmap::IndexMap;
use log::{debug, warn};
use std::any::Any;
use std::fmt;

/// A value assigned to a named attribute of a module, routed by kind.
pub enum Attribute {
    /// Registered as a named child.
    Module(Box<dyn Module>),
    /// Registered as a named parameter.
    Parameter(ParamRef),
    /// Stored as ordinary state, never traversed.
    Plain(Box<dyn Any + Send + Sync>),
}

impl Attribute {
    pub fn module<M: Module>(module: M) -> Self {
        Attribute::Module(Box::new(module))
    }

    pub fn plain<T: Any + Send + Sync>(value: T) -> Self {
        Attribute::Plain(Box::new(value))
    }
}

impl From<Box<dyn Module>> for Attribute {
    fn from(module: Box<dyn Module>) -> Self {
        Attribute::Module(module)
    }
}

impl From<Parameter> for Attribute {
    fn from(param: Parameter) -> Self {
        Attribute::Parameter(ParamRef::new(param))
    }
}

impl From<ParamRef> for Attribute {
    fn from(param: ParamRef) -> Self {
        Attribute::Parameter(param)
    }
}

/// Bookkeeping owned by every module: its mode, its named children, its named parameters
/// and its plain attributes.
///
/// All three maps keep registration order. An attribute name lives in exactly one of them;
/// assigning a name moves it to the map matching the new value's kind.
pub struct ModuleState {
    training: bool,
    children: IndexMap<String, Box<dyn Module>>,
    parameters: IndexMap<String, ParamRef>,
    attributes: IndexMap<String, Box<dyn Any + Send + Sync>>,
}

impl Default for ModuleState {
    fn default() -> Self {
        Self::new()
    }
}

fn check_name(name: &str) {
    if name.is_empty() {
        warn!("Registering an attribute with an empty name; dotted names will be ambiguous.");
    } else if name.contains('.') {
        warn!("Attribute name '{}' contains '.', dotted names will be ambiguous.", name);
    }
}

impl ModuleState {
    /// Creates empty bookkeeping in training mode.
    pub fn new() -> Self {
        ModuleState {
            training: true,
            children: IndexMap::new(),
            parameters: IndexMap::new(),
            attributes: IndexMap::new(),
        }
    }

    pub fn training(&self) -> bool {
        self.training
    }

    pub(crate) fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    /// Assigns `value` to the attribute `name`, registering it as a child, a parameter or a
    /// plain attribute depending on its kind.
    pub fn assign(&mut self, name: &str, value: impl Into<Attribute>) {
        check_name(name);
        match value.into() {
            Attribute::Module(module) => {
                self.parameters.shift_remove(name);
                self.attributes.shift_remove(name);
                debug!("Registering child '{}' ({})", name, module.type_name());
                self.children.insert(name.to_string(), module);
            }
            Attribute::Parameter(param) => {
                self.children.shift_remove(name);
                self.attributes.shift_remove(name);
                debug!("Registering parameter '{}'", name);
                self.parameters.insert(name.to_string(), param);
            }
            Attribute::Plain(value) => {
                self.children.shift_remove(name);
                self.parameters.shift_remove(name);
                self.attributes.insert(name.to_string(), value);
            }
        }
    }

    /// Registers `module` as the child `name`.
    pub fn declare_child<M: Module>(&mut self, name: &str, module: M) -> &mut Self {
        self.assign(name, Attribute::module(module));
        self
    }

    pub fn declare_child_boxed(&mut self, name: &str, module: Box<dyn Module>) -> &mut Self {
        self.assign(name, module);
        self
    }

    /// Wraps `value` in a new Parameter registered under `name`, replacing any previous entry.
    pub fn add_parameter<V: Value>(&mut self, name: &str, value: V) -> ParamRef {
        self.register_parameter(name, Parameter::new_unnamed(value))
    }

    /// Same as [`ModuleState::add_parameter`]; reads better in constructors.
    pub fn declare_parameter<V: Value>(&mut self, name: &str, value: V) -> ParamRef {
        self.add_parameter(name, value)
    }

    /// Registers an existing Parameter (or shared handle) under `name`.
    pub fn register_parameter(&mut self, name: &str, param: impl Into<ParamRef>) -> ParamRef {
        let param = param.into();
        self.assign(name, param.clone());
        param
    }

    /// Stores `value` as a plain attribute.
    pub fn set_attr<T: Any + Send + Sync>(&mut self, name: &str, value: T) -> &mut Self {
        self.assign(name, Attribute::plain(value));
        self
    }

    pub fn child(&self, name: &str) -> Option<&dyn Module> {
        self.children.get(name).map(|module| &**module)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut (dyn Module + 'static)> {
        self.children.get_mut(name).map(|module| &mut **module)
    }

    /// Returns the child `name` if it is a `T`.
    pub fn child_as<T: Module>(&self, name: &str) -> Option<&T> {
        self.child(name).and_then(|module| module.downcast_ref::<T>())
    }

    pub fn child_as_mut<T: Module>(&mut self, name: &str) -> Option<&mut T> {
        self.child_mut(name).and_then(|module| module.downcast_mut::<T>())
    }

    /// Returns a handle to the direct parameter `name`.
    pub fn parameter(&self, name: &str) -> Option<ParamRef> {
        self.parameters.get(name).cloned()
    }

    /// Returns the plain attribute `name` if it is a `T`.
    pub fn attr<T: Any>(&self, name: &str) -> Option<&T> {
        self.attributes.get(name).and_then(|value| value.downcast_ref::<T>())
    }

    pub fn attr_mut<T: Any>(&mut self, name: &str) -> Option<&mut T> {
        self.attributes.get_mut(name).and_then(|value| value.downcast_mut::<T>())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.children.contains_key(name)
            || self.parameters.contains_key(name)
            || self.attributes.contains_key(name)
    }

    /// Direct children with their names, in registration order.
    pub fn named_children(&self) -> impl Iterator<Item = (&str, &dyn Module)> {
        self.children
            .iter()
            .map(|(name, module)| (name.as_str(), &**module))
    }

    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut (dyn Module + 'static)> {
        self.children.values_mut().map(|module| &mut **module)
    }

    /// Direct parameters with their names, in registration order.
    pub fn named_parameters(&self) -> impl Iterator<Item = (&str, &ParamRef)> {
        self.parameters
            .iter()
            .map(|(name, param)| (name.as_str(), param))
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }
}

impl fmt::Debug for ModuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleState")
            .field("training", &self.training)
            .field("children", &self.children)
            .field("parameters", &self.parameters)
            .field("attributes", &self.attributes.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
#[path = "module_state_test.rs"]
mod tests;
