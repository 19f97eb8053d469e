// src/nn/containers/mod.rs
// Generic containers: the bare module and an indexed list of modules.

pub mod module_list;
pub mod module_node;

pub use module_list::ModuleList;
pub use module_node::ModuleNode;
