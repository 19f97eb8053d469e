use crate::error::NeuroTreeError;
use crate::nn::module::Module;
use log::trace;

/// The computation of a module.
///
/// `Input` is whatever the caller passes (a tensor, a tuple of arguments, `()`), `Output`
/// whatever the module produces. A module that does not override [`Forward::forward`] fails
/// with [`NeuroTreeError::NotImplemented`].
pub trait Forward<Input>: Module {
    type Output;

    fn forward(&self, _input: Input) -> Result<Self::Output, NeuroTreeError> {
        Err(NeuroTreeError::not_implemented(self.type_name(), "forward"))
    }

    /// Invokes the module. This is the call boundary: it dispatches to `forward`.
    fn call(&self, input: Input) -> Result<Self::Output, NeuroTreeError> {
        trace!("{}: call -> forward", self.type_name());
        self.forward(input)
    }
}

#[cfg(test)]
#[path = "forward_test.rs"]
mod tests;
