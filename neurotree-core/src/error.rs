use thiserror::Error;

/// Custom error type for the NeuroTree framework.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum NeuroTreeError {
    #[error("Module '{module}' does not implement `{method}`")]
    NotImplemented { module: String, method: String },

    #[error("No submodule found at path '{path}'")]
    ModuleNotFound { path: String },

    #[error("No parameter found at path '{path}'")]
    ParameterNotFound { path: String },

    #[error("Error(s) loading state dict: missing keys {missing:?}, unexpected keys {unexpected:?}")]
    StateDictMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("Computation error: {0}")]
    Computation(String),
}

impl NeuroTreeError {
    /// Shorthand for the error raised by a module that does not provide `method`.
    pub fn not_implemented(module: &str, method: &str) -> Self {
        NeuroTreeError::NotImplemented {
            module: module.to_string(),
            method: method.to_string(),
        }
    }
}
