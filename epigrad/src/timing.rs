//! Wall-clock comparison of the plain forward solve against the
//! gradient-augmented solve.
//!
//! This is a smoke check, not a benchmark: it answers "how much does the
//! sensitivity integration cost on top of the forward solve" with a mean over
//! a handful of runs. Use the criterion bench for real measurements.

use std::time::{Duration, Instant};

use crate::config::SolveConfig;
use crate::error::EpigradError;
use crate::solve::{solve, solve_with_sensitivities};

/// Mean/min/max wall-clock time over `reps` runs, after one warmup run.
#[derive(Clone, Copy, Debug)]
pub struct TimingStats {
    pub mean: Duration,
    pub min: Duration,
    pub max: Duration,
    pub reps: usize,
}

/// Time `reps` runs of `f`, discarding one warmup run.
pub fn time_runs<F>(reps: usize, mut f: F) -> Result<TimingStats, EpigradError>
where
    F: FnMut() -> Result<(), EpigradError>,
{
    let reps = reps.max(1);
    f()?;
    let mut total = Duration::ZERO;
    let mut min = Duration::MAX;
    let mut max = Duration::ZERO;
    for _ in 0..reps {
        let start = Instant::now();
        f()?;
        let elapsed = start.elapsed();
        total += elapsed;
        min = min.min(elapsed);
        max = max.max(elapsed);
    }
    Ok(TimingStats {
        mean: total / reps as u32,
        min,
        max,
        reps,
    })
}

/// Timings of the two evaluation paths for the same config.
#[derive(Clone, Copy, Debug)]
pub struct TimingComparison {
    pub forward: TimingStats,
    pub gradient: TimingStats,
}

impl TimingComparison {
    /// The gradient path integrates the augmented system, so its mean time is
    /// expected to be at least the forward mean.
    pub fn gradient_at_least_forward(&self) -> bool {
        self.gradient.mean >= self.forward.mean
    }

    /// Mean slowdown factor of the gradient path over the forward path.
    pub fn slowdown(&self) -> f64 {
        self.gradient.mean.as_secs_f64() / self.forward.mean.as_secs_f64()
    }
}

/// Time the forward and gradient-augmented paths over `reps` runs each.
pub fn compare(config: &SolveConfig, reps: usize) -> Result<TimingComparison, EpigradError> {
    let forward = time_runs(reps, || solve(config).map(|_| ()))?;
    let gradient = time_runs(reps, || solve_with_sensitivities(config).map(|_| ()))?;
    Ok(TimingComparison { forward, gradient })
}
