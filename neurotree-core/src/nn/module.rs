use crate::error::NeuroTreeError;
use crate::nn::display::{render, FormatConfig};
use crate::nn::module_state::ModuleState;
use crate::nn::parameter::ParamRef;
use crate::nn::value::{AsAny, Value};
use indexmap::IndexMap;
use log::{debug, trace};
use std::fmt;

/// Views any module as a trait object, including from provided methods of [`Module`].
pub trait AsModule {
    fn as_module(&self) -> &dyn Module;
    fn as_module_mut(&mut self) -> &mut dyn Module;
}

impl<T: Module> AsModule for T {
    fn as_module(&self) -> &dyn Module {
        self
    }

    fn as_module_mut(&mut self) -> &mut dyn Module {
        self
    }
}

/// The base trait for all modules (layers, containers, whole models).
///
/// A module owns its bookkeeping in a [`ModuleState`]: the training flag, the named child
/// modules and the named parameters. Implementors only expose that state; traversal,
/// dotted-name flattening and mode propagation are provided on top of it.
///
/// ```ignore
/// #[derive(Debug)]
/// struct Mlp {
///     state: ModuleState,
/// }
///
/// impl Mlp {
///     fn new() -> Self {
///         let mut state = ModuleState::new();
///         state.declare_child("fc1", Linear::new(4, 8));
///         state.declare_child("fc2", Linear::new(8, 1));
///         state.set_attr("dropout", 0.1f32);
///         Mlp { state }
///     }
/// }
///
/// impl Module for Mlp {
///     fn state(&self) -> &ModuleState { &self.state }
///     fn state_mut(&mut self) -> &mut ModuleState { &mut self.state }
/// }
/// ```
pub trait Module: AsAny + AsModule + fmt::Debug + Send + Sync + 'static {
    fn state(&self) -> &ModuleState;

    fn state_mut(&mut self) -> &mut ModuleState;

    /// Short type name of the module, used when rendering the tree.
    fn type_name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Whether the module is in training mode.
    fn training(&self) -> bool {
        self.state().training()
    }

    /// Puts this module and its whole subtree in training mode.
    fn train(&mut self) {
        set_mode(self.as_module_mut(), true);
    }

    /// Puts this module and its whole subtree in evaluation mode.
    fn eval(&mut self) {
        set_mode(self.as_module_mut(), false);
    }

    /// Returns the direct children, in registration order.
    fn modules(&self) -> Vec<&dyn Module> {
        self.state().named_children().map(|(_, module)| module).collect()
    }

    fn children(&self) -> Vec<&dyn Module> {
        self.modules()
    }

    fn named_children(&self) -> Vec<(String, &dyn Module)> {
        self.state()
            .named_children()
            .map(|(name, module)| (name.to_string(), module))
            .collect()
    }

    /// Returns this module (under `""`) and every descendant under its dotted path, pre-order.
    fn named_modules(&self) -> Vec<(String, &dyn Module)> {
        let mut named = Vec::new();
        walk_modules(self.as_module(), &mut |path, module| {
            named.push((path.to_string(), module));
        });
        named
    }

    /// Returns every parameter reachable from this module, keyed by dotted name.
    ///
    /// Own parameters come first in registration order, then each child's contribution in
    /// child registration order, built by the same rule.
    fn named_parameters(&self) -> IndexMap<String, ParamRef> {
        let mut named = IndexMap::new();
        walk_modules(self.as_module(), &mut |path, module| {
            for (name, param) in module.state().named_parameters() {
                named.insert(join_path(path, name), param.clone());
            }
        });
        named
    }

    /// Same traversal and order as [`Module::named_parameters`], without the names.
    fn parameters(&self) -> Vec<ParamRef> {
        self.named_parameters().into_values().collect()
    }

    fn num_parameters(&self) -> usize {
        self.named_parameters().len()
    }

    /// Wraps `value` in a new Parameter registered under `name` on this module.
    fn add_parameter<V: Value>(&mut self, name: &str, value: V) -> ParamRef
    where
        Self: Sized,
    {
        self.state_mut().add_parameter(name, value)
    }

    /// Looks up a descendant by dotted path. The empty path is this module.
    fn get_submodule(&self, path: &str) -> Result<&dyn Module, NeuroTreeError> {
        let mut current = self.as_module();
        if path.is_empty() {
            return Ok(current);
        }
        for segment in path.split('.') {
            current = current
                .state()
                .child(segment)
                .ok_or_else(|| NeuroTreeError::ModuleNotFound {
                    path: path.to_string(),
                })?;
        }
        Ok(current)
    }

    /// Looks up a parameter by dotted path, e.g. `"b.c.p3"`.
    fn get_parameter(&self, path: &str) -> Result<ParamRef, NeuroTreeError> {
        let not_found = || NeuroTreeError::ParameterNotFound {
            path: path.to_string(),
        };
        let (owner_path, name) = path.rsplit_once('.').unwrap_or(("", path));
        let owner = self.get_submodule(owner_path).map_err(|_| not_found())?;
        owner.state().parameter(name).ok_or_else(not_found)
    }

    /// Applies `f` to every descendant (children first) and then to this module.
    fn apply(&mut self, f: &mut dyn FnMut(&mut dyn Module)) {
        for child in self.state_mut().children_mut() {
            child.apply(f);
        }
        f(self.as_module_mut());
    }

    /// Snapshot of every parameter value, keyed by dotted name.
    fn state_dict(&self) -> IndexMap<String, Box<dyn Value>> {
        self.named_parameters()
            .into_iter()
            .map(|(name, param)| {
                let value = param.read().value().clone_value();
                (name, value)
            })
            .collect()
    }

    /// Loads values produced by [`Module::state_dict`] into the matching parameters.
    ///
    /// In strict mode any missing or unexpected key fails the whole load before a single
    /// parameter is touched.
    fn load_state_dict(
        &mut self,
        state: IndexMap<String, Box<dyn Value>>,
        strict: bool,
    ) -> Result<LoadReport, NeuroTreeError> {
        let named = self.named_parameters();
        let missing: Vec<String> = named
            .keys()
            .filter(|name| !state.contains_key(*name))
            .cloned()
            .collect();
        let unexpected: Vec<String> = state
            .keys()
            .filter(|name| !named.contains_key(*name))
            .cloned()
            .collect();
        if strict && (!missing.is_empty() || !unexpected.is_empty()) {
            return Err(NeuroTreeError::StateDictMismatch {
                missing,
                unexpected,
            });
        }

        let mut loaded = 0;
        for (name, value) in state {
            if let Some(param) = named.get(&name) {
                param.write().update_boxed(value);
                loaded += 1;
            }
        }
        debug!(
            "{}: loaded {} parameter(s) ({} missing, {} unexpected)",
            self.type_name(),
            loaded,
            missing.len(),
            unexpected.len()
        );
        Ok(LoadReport {
            loaded,
            missing,
            unexpected,
        })
    }

    /// Multi-line rendering of the module tree with the default [`FormatConfig`].
    fn repr(&self) -> String {
        render(self.as_module(), &FormatConfig::default())
    }
}

/// Outcome of a non-strict [`Module::load_state_dict`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub missing: Vec<String>,
    pub unexpected: Vec<String>,
}

impl dyn Module {
    /// Returns the module as a `T` if it is one.
    pub fn downcast_ref<T: Module>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Module>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    pub fn is<T: Module>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

impl fmt::Display for dyn Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self, &FormatConfig::default()))
    }
}

// Sets the flag of `module`, then calls `train()` or `eval()` on every direct child so
// overriding modules see the transition.
fn set_mode(module: &mut dyn Module, training: bool) {
    trace!("{}: training = {}", module.type_name(), training);
    module.state_mut().set_training(training);
    for child in module.state_mut().children_mut() {
        if training {
            child.train();
        } else {
            child.eval();
        }
    }
}

/// Pre-order walk over `root` and all its descendants.
///
/// `visit` receives the dotted path of each module relative to `root` (`""` for `root`
/// itself). Children are owned, so a module tree has no cycles and the walk terminates.
pub fn walk_modules<'a, F>(root: &'a dyn Module, visit: &mut F)
where
    F: FnMut(&str, &'a dyn Module),
{
    walk_from(root, "", visit);
}

fn walk_from<'a, F>(module: &'a dyn Module, path: &str, visit: &mut F)
where
    F: FnMut(&str, &'a dyn Module),
{
    visit(path, module);
    for (name, child) in module.state().named_children() {
        walk_from(child, &join_path(path, name), visit);
    }
}

/// Joins a module path and an attribute name with `.`.
pub fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
#[path = "module_test.rs"]
mod tests;
