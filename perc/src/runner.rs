use std::fmt::{self, Display};

use log::{debug, info};
use rayon::prelude::*;

use crate::{
    config::ExperimentConfig,
    grid::ConnectivityGrid,
    source::{RandomSource, UniformSource},
    Result,
};

////////////////////////////////////////////////////////////////////////////////

/// z-score of the two-sided 95% confidence interval.
const CONFIDENCE_95: f64 = 1.96;

/// Percolation threshold estimate over a series of trials.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    size: usize,
    fractions: Vec<f64>,
    mean: f64,
    stddev: f64,
    confidence_lo: f64,
    confidence_hi: f64,
}

impl Stats {
    /// Derives the statistics of the given per-trial open fractions.
    ///
    /// The standard deviation uses the `n - 1` denominator, so a single
    /// fraction gives NaN for it and for both interval bounds.
    ///
    /// # Panics
    ///
    /// If `fractions` is empty.
    pub(crate) fn from_fractions(size: usize, fractions: Vec<f64>) -> Self {
        assert!(!fractions.is_empty(), "no trials to aggregate");

        let trials = fractions.len() as f64;
        let mean = fractions.iter().sum::<f64>() / trials;
        let squares = fractions.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
        let stddev = (squares / (trials - 1.0)).sqrt();
        let margin = CONFIDENCE_95 * stddev / trials.sqrt();

        Self {
            size,
            fractions,
            mean,
            stddev,
            confidence_lo: mean - margin,
            confidence_hi: mean + margin,
        }
    }

    /// Returns the side length of the grids the trials ran on.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of trials.
    pub fn trials(&self) -> usize {
        self.fractions.len()
    }

    /// Open fraction of every trial, in the order the trials were run.
    pub fn fractions(&self) -> &[f64] {
        &self.fractions
    }

    /// Sample mean of the open fractions.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample standard deviation, NaN for a single trial.
    pub fn stddev(&self) -> f64 {
        self.stddev
    }

    /// Low end of the 95% confidence interval of the mean.
    pub fn confidence_lo(&self) -> f64 {
        self.confidence_lo
    }

    /// High end of the 95% confidence interval of the mean.
    pub fn confidence_hi(&self) -> f64 {
        self.confidence_hi
    }

    /// Returns `(confidence_lo, confidence_hi)`.
    pub fn confidence_interval(&self) -> (f64, f64) {
        (self.confidence_lo, self.confidence_hi)
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "n and tries               = {} / {}", self.size, self.trials())?;
        writeln!(f, "mean                      = {}", self.mean)?;
        writeln!(f, "stddev                    = {}", self.stddev)?;
        write!(
            f,
            "95% confidence interval =[{}, {}]",
            self.confidence_lo, self.confidence_hi
        )
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Runs Monte Carlo percolation experiments.
#[derive(Debug, Clone)]
pub struct TrialRunner {
    config: ExperimentConfig,
}

impl TrialRunner {
    /// Fails with [`crate::Error::InvalidParameters`] if `config` does not
    /// validate.
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Runs the configured experiment. Each trial gets its own generator,
    /// so with a fixed seed the result does not depend on `parallel`.
    pub fn run(&self) -> Result<Stats> {
        if self.config.parallel {
            return Self::run_experiment_parallel(&self.config);
        }

        let fractions = (0..self.config.trials)
            .map(|trial| {
                let mut source = trial_source(&self.config, trial);
                Self::run_trial(self.config.size, &mut source)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(aggregate(&self.config, fractions))
    }

    /// Opens random sites of a fresh `size`x`size` grid until it percolates
    /// and returns the share of sites that ended up open.
    ///
    /// Draws that hit an already open site are wasted, not retried. An index
    /// outside `[0, size * size)` fails with [`crate::Error::OutOfRange`].
    ///
    /// The call only returns once the grid percolates, so `source` must
    /// eventually produce every index of some top-to-bottom path. A source
    /// stuck on a set of indices that never percolates, such as a constant
    /// closure on a grid larger than 1x1, makes this loop forever.
    pub fn run_trial<S>(size: usize, source: &mut S) -> Result<f64>
    where
        S: RandomSource + ?Sized,
    {
        let mut grid = ConnectivityGrid::new(size)?;
        let sites = size * size;
        let mut draws = 0usize;

        while !grid.percolates() {
            let idx = source.next_index(sites);
            grid.open(idx / size + 1, idx % size + 1)?;
            draws += 1;
        }

        debug!(
            "trial on {size}x{size} grid percolated with {} open sites after {draws} draws",
            grid.number_of_open_sites()
        );
        Ok(grid.open_fraction())
    }

    /// Runs `trials` trials one after another, all drawing from `source`.
    pub fn run_experiment<S>(size: usize, trials: usize, source: &mut S) -> Result<Stats>
    where
        S: RandomSource + ?Sized,
    {
        let config = ExperimentConfig::new(size, trials);
        config.validate()?;

        let fractions = (0..trials)
            .map(|_| Self::run_trial(size, source))
            .collect::<Result<Vec<_>>>()?;
        Ok(aggregate(&config, fractions))
    }

    /// Runs the trials of `config` on the rayon thread pool and aggregates
    /// them once all of them are done.
    pub fn run_experiment_parallel(config: &ExperimentConfig) -> Result<Stats> {
        config.validate()?;

        let fractions = (0..config.trials)
            .into_par_iter()
            .map(|trial| {
                let mut source = trial_source(config, trial);
                Self::run_trial(config.size, &mut source)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(aggregate(config, fractions))
    }
}

fn trial_source(config: &ExperimentConfig, trial: usize) -> UniformSource<rand::rngs::StdRng> {
    match config.trial_seed(trial) {
        Some(seed) => UniformSource::seeded(seed),
        None => UniformSource::from_entropy(),
    }
}

fn aggregate(config: &ExperimentConfig, fractions: Vec<f64>) -> Stats {
    let stats = Stats::from_fractions(config.size, fractions);
    info!(
        "{} trials on {}x{} grid: mean {}, stddev {}",
        stats.trials(),
        config.size,
        config.size,
        stats.mean(),
        stats.stddev()
    );
    stats
}

////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_constant_fractions() {
        let stats = Stats::from_fractions(3, vec![0.5; 4]);
        assert_eq!(stats.mean(), 0.5);
        assert_eq!(stats.stddev(), 0.0);
        assert_eq!(stats.confidence_interval(), (0.5, 0.5));
        assert_eq!(stats.trials(), 4);
        assert_eq!(stats.size(), 3);
    }

    #[test]
    fn stats_use_sample_deviation() {
        let stats = Stats::from_fractions(2, vec![0.25, 0.75]);
        assert_eq!(stats.mean(), 0.5);
        let expected = (0.125f64).sqrt();
        assert!((stats.stddev() - expected).abs() < 1e-12);
        let margin = 1.96 * expected / 2f64.sqrt();
        assert!((stats.confidence_lo() - (0.5 - margin)).abs() < 1e-12);
        assert!((stats.confidence_hi() - (0.5 + margin)).abs() < 1e-12);
    }

    #[test]
    fn single_trial_has_no_interval() {
        let stats = Stats::from_fractions(5, vec![0.6]);
        assert_eq!(stats.mean(), 0.6);
        assert!(stats.stddev().is_nan());
        assert!(stats.confidence_lo().is_nan());
        assert!(stats.confidence_hi().is_nan());
    }

    #[test]
    fn report_layout() {
        let stats = Stats::from_fractions(4, vec![0.5, 0.5]);
        assert_eq!(
            stats.to_string(),
            "n and tries               = 4 / 2\n\
             mean                      = 0.5\n\
             stddev                    = 0\n\
             95% confidence interval =[0.5, 0.5]"
        );
    }
}
