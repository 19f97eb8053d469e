// Fixture modules shared by the integration tests.
// Added allow(dead_code) because each test crate only uses part of them.
#![allow(dead_code)]

use neurotree_core::nn::{Forward, Module, ModuleState, RequiresGrad, Value};
use neurotree_core::NeuroTreeError;
use std::sync::Once;

static LOGGER_INIT: Once = Once::new();

pub fn setup_logger() {
    LOGGER_INIT.call_once(|| {
        // If it fails (e.g., already initialized), that's okay.
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

macro_rules! module_state_accessors {
    () => {
        fn state(&self) -> &ModuleState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut ModuleState {
            &mut self.state
        }
    };
}

// A1 -> { p1, non_param, a: A2 { p2 }, b: A3 { c: A4 { p3 } } }

#[derive(Debug)]
pub struct ModuleA1 {
    state: ModuleState,
}

impl ModuleA1 {
    pub fn new() -> Self {
        let mut state = ModuleState::new();
        state.declare_parameter("p1", 5);
        state.set_attr("non_param", 10);
        state.declare_child("a", ModuleA2::new());
        state.declare_child("b", ModuleA3::new());
        ModuleA1 { state }
    }
}

impl Module for ModuleA1 {
    module_state_accessors!();
}

#[derive(Debug)]
pub struct ModuleA2 {
    state: ModuleState,
}

impl ModuleA2 {
    pub fn new() -> Self {
        let mut state = ModuleState::new();
        state.declare_parameter("p2", 10);
        ModuleA2 { state }
    }
}

impl Module for ModuleA2 {
    module_state_accessors!();
}

#[derive(Debug)]
pub struct ModuleA3 {
    state: ModuleState,
}

impl ModuleA3 {
    pub fn new() -> Self {
        let mut state = ModuleState::new();
        state.declare_child("c", ModuleA4::new());
        ModuleA3 { state }
    }
}

impl Module for ModuleA3 {
    module_state_accessors!();
}

#[derive(Debug)]
pub struct ModuleA4 {
    state: ModuleState,
}

impl ModuleA4 {
    pub fn new() -> Self {
        let mut state = ModuleState::new();
        state.declare_parameter("p3", 15);
        ModuleA4 { state }
    }
}

impl Module for ModuleA4 {
    module_state_accessors!();
}

// Stacked modules of varying sizes.

pub const VAL_A: f64 = 50.0;
pub const VAL_B: f64 = 100.0;

#[derive(Debug)]
pub struct Module1 {
    state: ModuleState,
}

impl Module1 {
    pub fn new(size_a: usize, size_b: usize, val: f64) -> Self {
        let mut state = ModuleState::new();
        state.declare_child("module_a", Module2::new(size_a));
        state.declare_child("module_b", Module2::new(size_b));
        state.declare_parameter("parameter_a", val);
        Module1 { state }
    }
}

impl Module for Module1 {
    module_state_accessors!();
}

#[derive(Debug)]
pub struct Module2 {
    state: ModuleState,
}

impl Module2 {
    pub fn new(extra: usize) -> Self {
        let mut state = ModuleState::new();
        state.declare_parameter("parameter_a", VAL_A);
        state.declare_parameter("parameter_b", VAL_B);
        state.set_attr("non_parameter", 10);
        state.declare_child("module_c", Module3::new());
        let mut module = Module2 { state };
        for i in 0..extra {
            module.add_parameter(&format!("extra_parameter_{}", i), 0.0f64);
        }
        module
    }
}

impl Module for Module2 {
    module_state_accessors!();
}

#[derive(Debug)]
pub struct Module3 {
    state: ModuleState,
}

impl Module3 {
    pub fn new() -> Self {
        let mut state = ModuleState::new();
        state.declare_parameter("parameter_a", VAL_A);
        Module3 { state }
    }
}

impl Module for Module3 {
    module_state_accessors!();
}

// Overrides forward.

#[derive(Debug, Default)]
pub struct ModuleRun {
    state: ModuleState,
}

impl Module for ModuleRun {
    module_state_accessors!();
}

impl Forward<()> for ModuleRun {
    type Output = i32;

    fn forward(&self, _input: ()) -> Result<i32, NeuroTreeError> {
        Ok(10)
    }
}

// Stand-in for an autograd tensor.

#[derive(Debug, Clone, Default)]
pub struct MockParam {
    pub x: bool,
}

impl RequiresGrad for MockParam {
    fn requires_grad_(&mut self, x: bool) {
        self.x = x;
    }
}

impl Value for MockParam {
    fn as_requires_grad(&mut self) -> Option<&mut dyn RequiresGrad> {
        Some(self)
    }
}
