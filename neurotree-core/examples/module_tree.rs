// Builds a small model, inspects its parameter tree and toggles its mode.
// Run with `RUST_LOG=debug` to see registrations.

use neurotree_core::nn::{Forward, Module, ModuleList, ModuleState, RequiresGrad, Value};
use neurotree_core::NeuroTreeError;

/// Toy weight that records whether the autograd engine should track it.
#[derive(Debug, Clone)]
struct Weight {
    data: Vec<f32>,
    requires_grad: bool,
}

impl Weight {
    fn filled(len: usize, value: f32) -> Self {
        Weight {
            data: vec![value; len],
            requires_grad: false,
        }
    }
}

impl RequiresGrad for Weight {
    fn requires_grad_(&mut self, requires_grad: bool) {
        self.requires_grad = requires_grad;
    }
}

impl Value for Weight {
    fn as_requires_grad(&mut self) -> Option<&mut dyn RequiresGrad> {
        Some(self)
    }
}

#[derive(Debug)]
struct Scale {
    state: ModuleState,
}

impl Scale {
    fn new(len: usize, factor: f32) -> Self {
        let mut state = ModuleState::new();
        state.declare_parameter("weight", Weight::filled(len, factor));
        Scale { state }
    }
}

impl Module for Scale {
    fn state(&self) -> &ModuleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ModuleState {
        &mut self.state
    }
}

impl<'a> Forward<&'a [f32]> for Scale {
    type Output = Vec<f32>;

    fn forward(&self, input: &'a [f32]) -> Result<Vec<f32>, NeuroTreeError> {
        let param = self
            .state
            .parameter("weight")
            .ok_or_else(|| NeuroTreeError::ParameterNotFound {
                path: "weight".to_string(),
            })?;
        let guard = param.read();
        let weight = guard
            .value_as::<Weight>()
            .ok_or_else(|| NeuroTreeError::Computation("weight is not a Weight".to_string()))?;
        if weight.data.len() != input.len() {
            return Err(NeuroTreeError::Computation(format!(
                "expected {} inputs, got {}",
                weight.data.len(),
                input.len()
            )));
        }
        Ok(input.iter().zip(&weight.data).map(|(x, w)| x * w).collect())
    }
}

#[derive(Debug)]
struct Model {
    state: ModuleState,
}

impl Model {
    fn new() -> Self {
        let mut layers = ModuleList::new();
        layers.push(Scale::new(3, 2.0));
        layers.push(Scale::new(3, 0.5));

        let mut state = ModuleState::new();
        state.declare_child("layers", layers);
        state.declare_parameter("temperature", 1.0f32);
        state.set_attr("dropout", 0.1f32);
        Model { state }
    }
}

impl Module for Model {
    fn state(&self) -> &ModuleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ModuleState {
        &mut self.state
    }
}

impl<'a> Forward<&'a [f32]> for Model {
    type Output = Vec<f32>;

    fn forward(&self, input: &'a [f32]) -> Result<Vec<f32>, NeuroTreeError> {
        let layers = self
            .state
            .child_as::<ModuleList>("layers")
            .ok_or_else(|| NeuroTreeError::ModuleNotFound {
                path: "layers".to_string(),
            })?;
        let mut current = input.to_vec();
        for layer in layers.iter() {
            let scale = layer
                .downcast_ref::<Scale>()
                .ok_or_else(|| NeuroTreeError::Computation("unexpected layer".to_string()))?;
            current = scale.call(current.as_slice())?;
        }
        Ok(current)
    }
}

fn main() -> Result<(), NeuroTreeError> {
    env_logger::init();

    let mut model = Model::new();
    println!("{}", model.repr());

    for (name, param) in model.named_parameters() {
        println!("{:<20} {:?}", name, param);
    }

    let input = [1.0f32, 2.0, 3.0];
    let output = model.call(&input[..])?;
    println!("output: {:?}", output);

    model.eval();
    println!("training after eval(): {}", model.training());
    Ok(())
}
