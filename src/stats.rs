use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Params, Sampling};
use crate::error::{PercolationError, Result};
use crate::percolation::Percolation;
use crate::rng::{Rng, trial_seed};

pub const SALT_TRIAL: u64 = 0x7045_7263_0000_0001;

/// z-score for a two-sided 95% interval.
const CONFIDENCE_95: f64 = 1.96;

/// Monte Carlo estimate of the percolation threshold.
#[derive(Clone, Debug)]
pub struct PercolationStats {
    params: Params,
    thresholds: Vec<f64>,
}

/// Reduced result of a batch of trials.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub n: usize,
    pub trials: usize,
    pub mean: f64,
    pub stddev: f64,
    pub confidence_lo: f64,
    pub confidence_hi: f64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mean                    = {}", self.mean)?;
        writeln!(f, "stddev                  = {}", self.stddev)?;
        write!(
            f,
            "95% confidence interval = [{}, {}]",
            self.confidence_lo, self.confidence_hi
        )
    }
}

impl PercolationStats {
    pub fn new(n: usize, trials: usize) -> Result<Self> {
        Self::with_params(&Params {
            grid_size: n,
            trials,
            ..Params::default()
        })
    }

    pub fn with_params(params: &Params) -> Result<Self> {
        if params.grid_size == 0 {
            return Err(PercolationError::InvalidGridSize { n: params.grid_size });
        }
        if params.trials == 0 {
            return Err(PercolationError::InvalidTrialCount {
                trials: params.trials,
            });
        }
        Ok(Self {
            params: params.clone(),
            thresholds: Vec::with_capacity(params.trials),
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Run every trial and record its threshold. Replaces earlier samples.
    ///
    /// Each trial gets its own engine and RNG. Slot `i` always holds trial
    /// `i`, so sequential and parallel runs with one seed agree exactly.
    pub fn run_experiments(&mut self) -> Result<()> {
        let n = self.params.grid_size;
        let seed = self.params.seed;
        let sampling = self.params.sampling;
        let trials = self.params.trials;

        let run = |t: usize| run_trial(n, trial_seed(seed, SALT_TRIAL, t as u64), sampling);
        self.thresholds = if self.params.parallel {
            (0..trials).into_par_iter().map(run).collect::<Result<Vec<_>>>()?
        } else {
            (0..trials).map(run).collect::<Result<Vec<_>>>()?
        };
        Ok(())
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn mean(&self) -> f64 {
        if self.thresholds.is_empty() {
            return 0.0;
        }
        self.thresholds.iter().sum::<f64>() / self.thresholds.len() as f64
    }

    /// Sample standard deviation (divisor `T - 1`).
    pub fn stddev(&self) -> f64 {
        if self.thresholds.len() <= 1 {
            return 0.0;
        }
        let m = self.mean();
        let acc: f64 = self.thresholds.iter().map(|x| (x - m) * (x - m)).sum();
        (acc / (self.thresholds.len() - 1) as f64).sqrt()
    }

    pub fn confidence95(&self) -> (f64, f64) {
        if self.thresholds.is_empty() {
            return (0.0, 0.0);
        }
        let m = self.mean();
        let margin = CONFIDENCE_95 * self.stddev() / (self.thresholds.len() as f64).sqrt();
        (m - margin, m + margin)
    }

    pub fn summary(&self) -> Summary {
        let (confidence_lo, confidence_hi) = self.confidence95();
        Summary {
            n: self.params.grid_size,
            trials: self.thresholds.len(),
            mean: self.mean(),
            stddev: self.stddev(),
            confidence_lo,
            confidence_hi,
        }
    }
}

/// Open random blocked sites on a fresh `n` x `n` grid until it percolates.
pub fn percolate_randomly(n: usize, seed: u64, sampling: Sampling) -> Result<Percolation> {
    open_random_sites(n, seed, sampling, usize::MAX)
}

/// Like [`percolate_randomly`] but also stops once `limit` sites are open.
/// The same seed and sampling always open sites in the same order, so a
/// replay with `limit = k` reproduces the first `k` steps of a full run.
pub fn open_random_sites(
    n: usize,
    seed: u64,
    sampling: Sampling,
    limit: usize,
) -> Result<Percolation> {
    let mut perc = Percolation::new(n)?;
    let mut rng = Rng::new(seed);
    let running = |p: &Percolation| !p.percolates() && p.number_of_open_sites() < limit;

    match sampling {
        Sampling::Rejection => {
            while running(&perc) {
                let row = rng.range_inclusive(1, n);
                let col = rng.range_inclusive(1, n);
                if !perc.is_open(row, col)? {
                    perc.open(row, col)?;
                }
            }
        }
        Sampling::BlockedSet => {
            let mut blocked: Vec<(usize, usize)> = (1..=n)
                .flat_map(|row| (1..=n).map(move |col| (row, col)))
                .collect();
            // Every site open always percolates, so `blocked` never runs dry first.
            while running(&perc) && !blocked.is_empty() {
                let i = rng.range_usize(blocked.len());
                let (row, col) = blocked.swap_remove(i);
                perc.open(row, col)?;
            }
        }
    }
    Ok(perc)
}

/// One trial: the open fraction at the moment the grid first percolates.
pub fn run_trial(n: usize, seed: u64, sampling: Sampling) -> Result<f64> {
    let threshold = percolate_randomly(n, seed, sampling)?.open_fraction();
    debug!(n, seed, threshold, "trial percolated");
    Ok(threshold)
}
