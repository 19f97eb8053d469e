use crate::nn::forward::Forward;
use crate::nn::module::Module;
use crate::nn::module_state::ModuleState;

/// Holds modules in a list. Children are registered under their index (`"0"`, `"1"`, ...),
/// so their parameters are named `"0.weight"`, `"1.weight"`, ...
#[derive(Debug, Default)]
pub struct ModuleList {
    state: ModuleState,
}

impl ModuleList {
    pub fn new() -> Self {
        ModuleList {
            state: ModuleState::new(),
        }
    }

    pub fn push<M: Module>(&mut self, module: M) {
        self.push_boxed(Box::new(module));
    }

    pub fn push_boxed(&mut self, module: Box<dyn Module>) {
        let index = self.len().to_string();
        self.state.declare_child_boxed(&index, module);
    }

    pub fn len(&self) -> usize {
        self.state.num_children()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<&dyn Module> {
        self.state.child(&index.to_string())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut dyn Module> {
        self.state.child_mut(&index.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Module> {
        self.state.named_children().map(|(_, module)| module)
    }
}

impl FromIterator<Box<dyn Module>> for ModuleList {
    fn from_iter<T: IntoIterator<Item = Box<dyn Module>>>(iter: T) -> Self {
        let mut list = ModuleList::new();
        for module in iter {
            list.push_boxed(module);
        }
        list
    }
}

impl Module for ModuleList {
    fn state(&self) -> &ModuleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ModuleState {
        &mut self.state
    }
}

// A list only holds modules; callers iterate it and invoke each entry.
impl<I> Forward<I> for ModuleList {
    type Output = ();
}
