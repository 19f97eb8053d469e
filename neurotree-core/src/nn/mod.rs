// src/nn/mod.rs
// Module tree: parameters, modules, call dispatch and containers.

pub mod containers;
pub mod display;
pub mod forward;
pub mod module; // Trait Module
pub mod module_state; // struct ModuleState
pub mod parameter; // struct Parameter
pub mod value; // Trainable value traits

// Re-export common items
pub use containers::{ModuleList, ModuleNode};
pub use display::{render, FormatConfig};
pub use forward::Forward;
pub use module::{join_path, walk_modules, AsModule, LoadReport, Module};
pub use module_state::{Attribute, ModuleState};
pub use parameter::{ParamRef, Parameter};
pub use value::{AsAny, CloneValue, RequiresGrad, Value};
