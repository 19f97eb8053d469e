use crate::nn::containers::ModuleNode;
use crate::nn::module::Module;
use crate::nn::module_state::{Attribute, ModuleState};
use crate::nn::parameter::{ParamRef, Parameter};

fn names(state: &ModuleState) -> (Vec<String>, Vec<String>, Vec<String>) {
    let children = state.named_children().map(|(n, _)| n.to_string()).collect();
    let params = state.named_parameters().map(|(n, _)| n.to_string()).collect();
    let attrs = state.attribute_names().map(str::to_string).collect();
    (children, params, attrs)
}

#[test]
fn test_new_state_is_training_and_empty() {
    let state = ModuleState::new();
    assert!(state.training());
    assert_eq!(state.num_children(), 0);
    assert_eq!(state.named_parameters().count(), 0);
    assert!(!state.has_attr("anything"));
}

#[test]
fn test_assign_routes_by_kind() {
    let mut state = ModuleState::new();
    state.assign("p1", Parameter::new_unnamed(5));
    state.assign("a", Attribute::module(ModuleNode::new()));
    state.assign("non_param", Attribute::plain(10));

    let (children, params, attrs) = names(&state);
    assert_eq!(children, vec!["a"]);
    assert_eq!(params, vec!["p1"]);
    assert_eq!(attrs, vec!["non_param"]);

    assert_eq!(state.attr::<i32>("non_param"), Some(&10));
    assert_eq!(state.attr::<f32>("non_param"), None);
    assert!(state.child_as::<ModuleNode>("a").is_some());
    assert_eq!(state.parameter("p1").and_then(|p| p.value_cloned::<i32>()), Some(5));
}

#[test]
fn test_reassigning_a_name_moves_it_between_maps() {
    let mut state = ModuleState::new();
    state.declare_parameter("x", 1.0f64);
    state.declare_child("x", ModuleNode::new());
    let (children, params, _) = names(&state);
    assert_eq!(children, vec!["x"]);
    assert!(params.is_empty(), "a name lives in a single slot");

    state.set_attr("x", "plain");
    let (children, params, attrs) = names(&state);
    assert!(children.is_empty());
    assert!(params.is_empty());
    assert_eq!(attrs, vec!["x"]);
    assert_eq!(state.attr::<&str>("x"), Some(&"plain"));
}

#[test]
fn test_overwriting_keeps_registration_position() {
    let mut state = ModuleState::new();
    state.declare_parameter("first", 1);
    state.declare_parameter("second", 2);
    state.declare_parameter("first", 3);

    let entries: Vec<(String, i32)> = state
        .named_parameters()
        .map(|(n, p)| (n.to_string(), p.value_cloned::<i32>().unwrap()))
        .collect();
    assert_eq!(entries, vec![("first".to_string(), 3), ("second".to_string(), 2)]);
}

#[test]
fn test_register_parameter_keeps_identity() {
    let mut state = ModuleState::new();
    let shared = ParamRef::new(Parameter::new(0.5f32, Some("w".to_string())));
    let returned = state.register_parameter("w", shared.clone());
    assert!(returned.ptr_eq(&shared));
    assert!(state.parameter("w").unwrap().ptr_eq(&shared));
}

#[test]
fn test_add_parameter_returns_registered_handle() {
    let mut state = ModuleState::new();
    let param = state.add_parameter("x", 5);
    assert_eq!(param.value_cloned::<i32>(), Some(5));
    assert!(state.parameter("x").unwrap().ptr_eq(&param));
}

#[test]
fn test_child_mut_and_attr_mut() {
    let mut state = ModuleState::new();
    state.declare_child("inner", ModuleNode::new());
    state.set_attr("count", 1usize);

    if let Some(count) = state.attr_mut::<usize>("count") {
        *count += 1;
    }
    assert_eq!(state.attr::<usize>("count"), Some(&2));

    let inner = state.child_as_mut::<ModuleNode>("inner").unwrap();
    inner.state_mut().declare_parameter("p", 7);
    assert!(state.child("inner").unwrap().state().parameter("p").is_some());
    assert!(state.child("missing").is_none());
}

#[test]
fn test_dotted_names_are_accepted() {
    let mut state = ModuleState::new();
    state.declare_parameter("a.b", 1);
    assert!(state.parameter("a.b").is_some());
}
