use rand::{rngs::StdRng, Rng, SeedableRng};

////////////////////////////////////////////////////////////////////////////////

/// Supplies the site indices a trial opens.
pub trait RandomSource {
    /// Returns an index in `[0, bound)`. `bound` is always positive.
    fn next_index(&mut self, bound: usize) -> usize;
}

impl<F> RandomSource for F
where
    F: FnMut(usize) -> usize,
{
    fn next_index(&mut self, bound: usize) -> usize {
        self(bound)
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Uniform draws from any [`rand::Rng`].
#[derive(Debug, Clone)]
pub struct UniformSource<R> {
    rng: R,
}

impl<R: Rng> UniformSource<R> {
    /// Wraps `rng`; every index is drawn with `gen_range(0..bound)`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl UniformSource<StdRng> {
    /// Reproducible source, the same `seed` gives the same indices.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for UniformSource<R> {
    fn next_index(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound)
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Plays back a fixed sequence of indices, cycling when it runs out.
///
/// Values are reduced modulo the requested bound.
#[derive(Debug, Clone)]
pub struct Replay {
    indices: Vec<usize>,
    pos: usize,
}

impl Replay {
    /// # Panics
    ///
    /// If `indices` is empty.
    pub fn new(indices: Vec<usize>) -> Self {
        assert!(!indices.is_empty(), "replay needs at least one index");
        Self { indices, pos: 0 }
    }
}

impl RandomSource for Replay {
    fn next_index(&mut self, bound: usize) -> usize {
        let value = self.indices[self.pos];
        self.pos = (self.pos + 1) % self.indices.len();
        value % bound
    }
}

////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_is_a_source() {
        let mut next = 0;
        let mut source = |bound: usize| {
            next = (next + 1) % bound;
            next
        };
        assert_eq!(source.next_index(3), 1);
        assert_eq!(source.next_index(3), 2);
        assert_eq!(source.next_index(3), 0);
    }

    #[test]
    fn replay_cycles_and_wraps() {
        let mut source = Replay::new(vec![1, 7]);
        assert_eq!(source.next_index(4), 1);
        assert_eq!(source.next_index(4), 3);
        assert_eq!(source.next_index(4), 1);
    }

    #[test]
    fn uniform_stays_in_bounds() {
        let mut source = UniformSource::seeded(7);
        for bound in 1..50 {
            assert!(source.next_index(bound) < bound);
        }
    }

    #[test]
    fn seeded_sources_agree() {
        let mut a = UniformSource::seeded(42);
        let mut b = UniformSource::seeded(42);
        for _ in 0..100 {
            assert_eq!(a.next_index(1000), b.next_index(1000));
        }
    }
}
