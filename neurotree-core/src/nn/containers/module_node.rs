use crate::nn::forward::Forward;
use crate::nn::module::Module;
use crate::nn::module_state::ModuleState;
use crate::nn::value::Value;
use std::any::Any;

/// A module with no computation of its own.
///
/// Useful to assemble a tree at runtime; calling it fails because it has no `forward`.
#[derive(Debug, Default)]
pub struct ModuleNode {
    state: ModuleState,
}

impl ModuleNode {
    pub fn new() -> Self {
        ModuleNode {
            state: ModuleState::new(),
        }
    }

    pub fn with_child<M: Module>(mut self, name: &str, module: M) -> Self {
        self.state.declare_child(name, module);
        self
    }

    pub fn with_parameter<V: Value>(mut self, name: &str, value: V) -> Self {
        self.state.declare_parameter(name, value);
        self
    }

    pub fn with_attr<T: Any + Send + Sync>(mut self, name: &str, value: T) -> Self {
        self.state.set_attr(name, value);
        self
    }
}

impl Module for ModuleNode {
    fn state(&self) -> &ModuleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ModuleState {
        &mut self.state
    }
}

impl<I> Forward<I> for ModuleNode {
    type Output = ();
}
