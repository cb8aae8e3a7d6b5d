//! The SIR compartmental model and its derivatives, in the closure form
//! consumed by diffsol's [OdeBuilder].
//!
//! The state is `u = [S, I, R]` with a fixed population `N = S + I + R`:
//!
//! ```text
//! dS/dt = -beta * S * I / N
//! dI/dt =  beta * S * I / N - gamma * I
//! dR/dt =  gamma * I
//! ```
//!
//! Forward sensitivity analysis needs two extra operators beyond the vector
//! field: the Jacobian-vector product `(df/du) v` and the parameter-derivative
//! product `(df/dp) v`. Both are given in closed form below, so the solver
//! never falls back to finite differencing the model.

use diffsol::{OdeBuilder, OdeEquationsImplicitSens, OdeSolverProblem, Vector};
use serde::{Deserialize, Serialize};

use crate::config::SolveConfig;
use crate::error::EpigradError;
use crate::{C, M, T, V};

/// Rate parameters of the SIR model: `beta` is the contact rate, `gamma` the
/// recovery rate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SirParams {
    pub beta: f64,
    pub gamma: f64,
}

impl Default for SirParams {
    fn default() -> Self {
        Self {
            beta: 0.3,
            gamma: 0.1,
        }
    }
}

impl SirParams {
    /// Parameters in the order the solver sees them: `[beta, gamma]`.
    pub fn to_vec(self) -> Vec<f64> {
        vec![self.beta, self.gamma]
    }

    pub fn from_slice(p: &[f64]) -> Self {
        Self {
            beta: p[0],
            gamma: p[1],
        }
    }
}

/// Assemble the SIR equations into a solvable problem.
///
/// The returned problem carries the analytic Jacobian and parameter-derivative
/// operators, so it supports both the plain forward solve and the
/// forward-sensitivity solve.
pub fn problem(
    config: &SolveConfig,
) -> Result<OdeSolverProblem<impl OdeEquationsImplicitSens<M = M, V = V, T = T, C = C>>, EpigradError>
{
    config.validate()?;
    let n = config.population();
    let u0 = config.u0;
    let problem = OdeBuilder::<M>::new()
        .t0(config.t0)
        .rtol(config.rtol)
        .atol([config.atol])
        .p(config.params.to_vec())
        .rhs_sens_implicit(
            // f(u, p)
            move |u, p, _t, du| {
                let transmission = p[0] * u[0] * u[1] / n;
                du[0] = -transmission;
                du[1] = transmission - p[1] * u[1];
                du[2] = p[1] * u[1];
            },
            // (df/du) v
            move |u, p, _t, v, jv| {
                let dtransmission = p[0] * (u[1] * v[0] + u[0] * v[1]) / n;
                jv[0] = -dtransmission;
                jv[1] = dtransmission - p[1] * v[1];
                jv[2] = p[1] * v[1];
            },
            // (df/dp) v
            move |u, _p, _t, v, sv| {
                let si = u[0] * u[1] / n;
                sv[0] = -si * v[0];
                sv[1] = si * v[0] - u[1] * v[1];
                sv[2] = u[1] * v[1];
            },
        )
        .init_sens(
            move |_p, _t, u| {
                u[0] = u0[0];
                u[1] = u0[1];
                u[2] = u0[2];
            },
            // u0 does not depend on p
            |_p, _t, _v, du0| du0.fill(0.0),
            3,
        )
        .build()?;
    Ok(problem)
}
