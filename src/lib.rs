pub mod config;
pub mod error;
pub mod grid;
pub mod percolation;
pub mod render;
pub mod rng;
pub mod stats;
pub mod union_find;

use std::time::Instant;

use tracing::info;

pub use config::{Params, Sampling};
pub use error::{PercolationError, Result};
pub use percolation::Percolation;
pub use stats::{PercolationStats, Summary};

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

/// Run a full threshold estimate and report how long each phase took.
pub fn estimate(params: &Params) -> Result<(PercolationStats, Vec<Timing>)> {
    let mut timings = Vec::new();
    let total_start = Instant::now();

    let mut stats = PercolationStats::with_params(params)?;

    // 1. Trials (fan out on rayon when enabled)
    let t = Instant::now();
    stats.run_experiments()?;
    timings.push(Timing {
        name: "trials",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    // 2. Reduce
    let t = Instant::now();
    let summary = stats.summary();
    timings.push(Timing {
        name: "reduce",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    let total_ms = total_start.elapsed().as_secs_f64() * 1000.0;
    timings.push(Timing {
        name: "TOTAL",
        ms: total_ms,
    });

    info!(
        n = params.grid_size,
        trials = params.trials,
        mean = summary.mean,
        stddev = summary.stddev,
        ms = total_ms,
        "threshold estimate complete"
    );

    Ok((stats, timings))
}
