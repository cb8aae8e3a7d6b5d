//! # Epigrad
//!
//! Epigrad computes parameter gradients of the SIR compartmental epidemic model by
//! solving the model and its forward sensitivity equations with the
//! [diffsol](https://docs.rs/diffsol) ODE solver.
//!
//! The SIR model partitions a fixed population `N` into susceptible, infectious and
//! recovered compartments, governed by a contact rate `beta` and a recovery rate
//! `gamma` (see [SirParams]). A solve is described by a [SolveConfig]: the initial
//! compartments, the time span, the output sampling interval, the solver tolerances
//! and the solver method. The default configuration is the classic demonstration
//! scenario of a population of 1000 with a single initial infection, solved over 160
//! time units and sampled once per time unit.
//!
//! ## Solving
//!
//! [solve] runs the forward problem and returns a [Trajectory] of compartment values
//! at the sampled times. [solve_with_sensitivities] additionally integrates the
//! forward sensitivity equations, returning the derivatives of every compartment with
//! respect to `beta` and `gamma` at every sample (see [Sensitivities]).
//!
//! ## Gradients
//!
//! [loss::sum_squares] is the scalar loss `L = sum(u^2)` over the whole trajectory,
//! and [loss::loss_and_gradient] evaluates both the loss and its analytic gradient
//! `dL/d(beta, gamma)` by chaining the loss through the forward sensitivities.
//! [gradcheck::check] validates an analytic gradient against a central
//! finite-difference estimate, and [timing::compare] measures the wall-clock cost of
//! the plain forward path against the gradient-augmented path.
//!
//! ```no_run
//! use epigrad::{gradcheck, loss, timing, SolveConfig};
//!
//! # fn main() -> Result<(), epigrad::EpigradError> {
//! let config = SolveConfig::default();
//! let (l, grad) = loss::loss_and_gradient(&config)?;
//! println!("loss = {l}, dl/dbeta = {}, dl/dgamma = {}", grad[0], grad[1]);
//!
//! let check = gradcheck::check(
//!     |p| loss::loss_at(&config, p),
//!     &config.params.to_vec(),
//!     &grad,
//!     &gradcheck::GradCheckSettings::default(),
//! )?;
//! assert!(check.pass());
//!
//! let comparison = timing::compare(&config, 10)?;
//! println!("forward: {:?}, gradient: {:?}", comparison.forward.mean, comparison.gradient.mean);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod gradcheck;
pub mod loss;
pub mod model;
pub mod solve;
pub mod timing;

pub use config::{SolveConfig, SolverKind};
pub use error::{ConfigError, EpigradError, GradCheckError};
pub use gradcheck::{GradCheck, GradCheckSettings};
pub use model::SirParams;
pub use solve::{solve, solve_with_sensitivities, Sensitivities, Trajectory};
pub use timing::{TimingComparison, TimingStats};

use diffsol::{MatrixCommon, NalgebraLU, NalgebraMat};

/// Matrix type used for trajectories and sensitivities.
pub type M = NalgebraMat<f64>;
/// Vector type of the solver state.
pub type V = <M as MatrixCommon>::V;
/// Scalar type.
pub type T = <M as MatrixCommon>::T;
/// Execution context of the linear algebra backend.
pub type C = <M as MatrixCommon>::C;
/// Linear solver used by the implicit methods.
pub type LS = NalgebraLU<f64>;
