use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::SirParams;

/// Solver method used for the forward and sensitivity solves.
///
/// `Tsit45` is an explicit Runge-Kutta pair and the default for this non-stiff
/// model. The implicit methods are available for comparison and for configs
/// that push the model into stiffer regimes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverKind {
    #[default]
    Tsit45,
    TrBdf2,
    Esdirk34,
    Bdf,
}

/// Everything needed to run a solve: initial compartments, time span, output
/// sampling, tolerances, solver method and model parameters.
///
/// The default is the standard demonstration scenario: `u0 = [999, 1, 0]`,
/// `t` from 0 to 160 sampled every 1.0 time units, `rtol = atol = 1e-8`,
/// `beta = 0.3`, `gamma = 0.1`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolveConfig {
    /// Initial `[S, I, R]` compartments.
    pub u0: [f64; 3],
    pub t0: f64,
    pub t_final: f64,
    /// Interval between output samples.
    pub saveat: f64,
    pub rtol: f64,
    pub atol: f64,
    pub solver: SolverKind,
    pub params: SirParams,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            u0: [999.0, 1.0, 0.0],
            t0: 0.0,
            t_final: 160.0,
            saveat: 1.0,
            rtol: 1e-8,
            atol: 1e-8,
            solver: SolverKind::default(),
            params: SirParams::default(),
        }
    }
}

impl SolveConfig {
    /// Total population `N = S0 + I0 + R0`, conserved by the model.
    pub fn population(&self) -> f64 {
        self.u0.iter().sum()
    }

    /// Output times `t0, t0 + saveat, ...`, with `t_final` always included as
    /// the last sample.
    pub fn t_eval(&self) -> Vec<f64> {
        let n = ((self.t_final - self.t0) / self.saveat).floor() as usize;
        let mut ts: Vec<f64> = (0..=n)
            .map(|i| (self.t0 + i as f64 * self.saveat).min(self.t_final))
            .collect();
        let last = ts[ts.len() - 1];
        if self.t_final - last > 1e-10 * self.saveat {
            ts.push(self.t_final);
        }
        ts
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.saveat.is_finite() || self.saveat <= 0.0 {
            return Err(ConfigError::InvalidSaveat(self.saveat));
        }
        if !self.t0.is_finite() || !self.t_final.is_finite() || self.t_final <= self.t0 {
            return Err(ConfigError::EmptyTimeSpan {
                t0: self.t0,
                t_final: self.t_final,
            });
        }
        if !self.rtol.is_finite() || self.rtol <= 0.0 || !self.atol.is_finite() || self.atol <= 0.0
        {
            return Err(ConfigError::InvalidTolerance {
                rtol: self.rtol,
                atol: self.atol,
            });
        }
        if self.u0.iter().any(|&u| !u.is_finite() || u < 0.0) || self.population() <= 0.0 {
            return Err(ConfigError::InvalidInitialState(self.u0));
        }
        let SirParams { beta, gamma } = self.params;
        if !beta.is_finite() || beta < 0.0 || !gamma.is_finite() || gamma < 0.0 {
            return Err(ConfigError::InvalidRates { beta, gamma });
        }
        Ok(())
    }
}
