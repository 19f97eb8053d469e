//! Module and parameter tree of NeuroTree.
//!
//! A [`Module`](nn::Module) owns named child modules and named [`Parameter`](nn::Parameter)s.
//! The tree can be flattened into dotted names (`"b.c.p3"`), switched between training and
//! evaluation mode as a whole, and invoked through [`Forward::call`](nn::Forward::call).
//! Gradient computation and optimizers live outside this crate; they consume the parameters
//! exposed here.

pub mod error;
pub mod nn;

pub use error::NeuroTreeError;
pub use nn::{Forward, Module, ModuleState, ParamRef, Parameter, Value};
