use crate::{Error, Result};

////////////////////////////////////////////////////////////////////////////////

/// Parameters of a percolation experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperimentConfig {
    pub size: usize,
    pub trials: usize,
    /// Trial `i` draws from a generator seeded with `seed + i`.
    /// `None` seeds every trial from OS entropy.
    pub seed: Option<u64>,
    /// Run trials on the rayon thread pool.
    pub parallel: bool,
}

impl ExperimentConfig {
    pub fn new(size: usize, trials: usize) -> Self {
        Self {
            size,
            trials,
            seed: None,
            parallel: false,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 || self.trials == 0 || self.size.checked_mul(self.size).is_none() {
            return Err(Error::InvalidParameters {
                size: self.size,
                trials: self.trials,
            });
        }
        Ok(())
    }

    pub(crate) fn trial_seed(&self, trial: usize) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(trial as u64))
    }
}

////////////////////////////////////////////////////////////////////////////////
