//! Hand-off of accepted instances to the host that turns them into scene objects.
use crate::scatter::runner::PlacedInstance;

/// Receives every accepted instance, in placement order.
pub trait InstanceMaterializer {
    fn materialize(&mut self, instance: &PlacedInstance);
}

/// Discards instances; the pass result still carries them.
impl InstanceMaterializer for () {
    #[inline]
    fn materialize(&mut self, _instance: &PlacedInstance) {}
}

impl InstanceMaterializer for Vec<PlacedInstance> {
    #[inline]
    fn materialize(&mut self, instance: &PlacedInstance) {
        self.push(instance.clone());
    }
}

/// Forwards instances to a closure.
pub struct FnMaterializer<F>
where
    F: FnMut(&PlacedInstance),
{
    f: F,
}

impl<F> FnMaterializer<F>
where
    F: FnMut(&PlacedInstance),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> InstanceMaterializer for FnMaterializer<F>
where
    F: FnMut(&PlacedInstance),
{
    #[inline]
    fn materialize(&mut self, instance: &PlacedInstance) {
        (self.f)(instance);
    }
}
