use std::any::Any;
use std::fmt::Debug;

/// Upcast helper so trait objects can be downcast back to their concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The gradient-tracking capability of a trainable value.
///
/// Implemented by values (typically tensors owned by the autograd engine) that can be told
/// to record operations for differentiation.
pub trait RequiresGrad {
    fn requires_grad_(&mut self, requires_grad: bool);
}

/// Clones a value into a fresh trait object.
pub trait CloneValue {
    fn clone_value(&self) -> Box<dyn Value>;
}

impl<T: Value + Clone> CloneValue for T {
    fn clone_value(&self) -> Box<dyn Value> {
        Box::new(self.clone())
    }
}

/// Anything that can be stored inside a [`Parameter`](crate::nn::Parameter).
///
/// The store is opaque: scalars, vectors, tensors or any nested structure qualify.
/// Types that support gradient tracking advertise it by overriding [`Value::as_requires_grad`].
pub trait Value: AsAny + CloneValue + Debug + Send + Sync + 'static {
    /// Returns the gradient-tracking capability of this value, if it has one.
    fn as_requires_grad(&mut self) -> Option<&mut dyn RequiresGrad> {
        None
    }
}

impl Clone for Box<dyn Value> {
    fn clone(&self) -> Self {
        (**self).clone_value()
    }
}

macro_rules! impl_plain_value {
    ($($t:ty),* $(,)?) => {
        $(impl Value for $t {})*
    };
}

impl_plain_value!(
    f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, bool, String
);

impl<T: Value + Clone> Value for Vec<T> {}

impl dyn Value {
    /// Returns a reference to the concrete value if it is of type `T`.
    pub fn downcast_ref<T: Value>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Returns a mutable reference to the concrete value if it is of type `T`.
    pub fn downcast_mut<T: Value>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Whether the value exposes the gradient-tracking capability.
    pub fn supports_grad(&mut self) -> bool {
        self.as_requires_grad().is_some()
    }
}
