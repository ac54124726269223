/// A type that collects the steps of an algorithm.
///
/// [`StepCollector`] is also implemented for the unit type `()`. This is useful when you don't
/// want to know the steps taken by an algorithm, such as when the solver simplifies intermediate
/// expressions nobody will look at.
pub trait StepCollector<S> {
    /// Adds a step to the collector.
    fn push(&mut self, step: S);
}

impl<S> StepCollector<S> for () {
    #[inline]
    fn push(&mut self, _: S) {}
}

impl<S> StepCollector<S> for Vec<S> {
    #[inline]
    fn push(&mut self, step: S) {
        Vec::push(self, step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(collector: &mut dyn StepCollector<u8>) {
        collector.push(1);
        collector.push(2);
    }

    #[test]
    fn vec_collects_in_order() {
        let mut steps = Vec::new();
        record(&mut steps);
        assert_eq!(steps, vec![1, 2]);
        record(&mut ());
    }
}
