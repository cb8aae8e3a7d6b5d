//! Forward and gradient-augmented solves.
//!
//! [solve] integrates the model and samples it at the configured output times.
//! [solve_with_sensitivities] additionally integrates the forward sensitivity
//! equations, one augmented state block per parameter, and returns the
//! derivatives of the trajectory with respect to `beta` and `gamma`.

use diffsol::{DenseMatrix, MatrixCommon, OdeSolverMethod, SensitivitiesOdeSolverMethod};
use nalgebra::DMatrix;

use crate::config::{SolveConfig, SolverKind};
use crate::error::EpigradError;
use crate::{model, LS, M, T};

/// A sampled solution: one column per output time, rows are `[S, I, R]`.
#[derive(Clone, Debug)]
pub struct Trajectory {
    pub ts: Vec<T>,
    pub ys: M,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.ts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ts.is_empty()
    }

    pub fn susceptible(&self) -> Vec<T> {
        self.compartment(0)
    }

    pub fn infectious(&self) -> Vec<T> {
        self.compartment(1)
    }

    pub fn recovered(&self) -> Vec<T> {
        self.compartment(2)
    }

    fn compartment(&self, i: usize) -> Vec<T> {
        self.ys.inner().row(i).iter().copied().collect()
    }

    /// The raw samples as a dense matrix, rows `[S, I, R]`, one column per
    /// output time.
    pub fn as_matrix(&self) -> &DMatrix<T> {
        self.ys.inner()
    }

    /// The `[S, I, R]` state at sample `i`.
    pub fn state(&self, i: usize) -> [T; 3] {
        [
            self.ys.get_index(0, i),
            self.ys.get_index(1, i),
            self.ys.get_index(2, i),
        ]
    }

    /// `S + I + R` at every sample. Conserved by the model up to solver
    /// tolerance.
    pub fn totals(&self) -> Vec<T> {
        self.ys.inner().column_iter().map(|c| c.sum()).collect()
    }
}

/// Derivatives of the trajectory with respect to each parameter: `dydp[j]` has
/// the same shape as the trajectory matrix and holds `du_i/dp_j` at every
/// sample.
#[derive(Clone, Debug)]
pub struct Sensitivities {
    pub ts: Vec<T>,
    pub dydp: Vec<M>,
}

impl Sensitivities {
    pub fn nparams(&self) -> usize {
        self.dydp.len()
    }
}

/// Solve the model forward and sample it at `config.t_eval()`.
pub fn solve(config: &SolveConfig) -> Result<Trajectory, EpigradError> {
    let problem = model::problem(config)?;
    let t_eval = config.t_eval();
    let ys = match config.solver {
        SolverKind::Tsit45 => {
            let mut solver = problem.tsit45()?;
            solver.solve_dense(&t_eval)?
        }
        SolverKind::TrBdf2 => {
            let mut solver = problem.tr_bdf2::<LS>()?;
            solver.solve_dense(&t_eval)?
        }
        SolverKind::Esdirk34 => {
            let mut solver = problem.esdirk34::<LS>()?;
            solver.solve_dense(&t_eval)?
        }
        SolverKind::Bdf => {
            let mut solver = problem.bdf::<LS>()?;
            solver.solve_dense(&t_eval)?
        }
    };
    Ok(Trajectory { ts: t_eval, ys })
}

/// Solve the model together with its forward sensitivity equations.
pub fn solve_with_sensitivities(
    config: &SolveConfig,
) -> Result<(Trajectory, Sensitivities), EpigradError> {
    let problem = model::problem(config)?;
    let t_eval = config.t_eval();
    let (ys, dydp) = match config.solver {
        SolverKind::Tsit45 => {
            let mut solver = problem.tsit45_sens()?;
            solver.solve_dense_sensitivities(&t_eval)?
        }
        SolverKind::TrBdf2 => {
            let mut solver = problem.tr_bdf2_sens::<LS>()?;
            solver.solve_dense_sensitivities(&t_eval)?
        }
        SolverKind::Esdirk34 => {
            let mut solver = problem.esdirk34_sens::<LS>()?;
            solver.solve_dense_sensitivities(&t_eval)?
        }
        SolverKind::Bdf => {
            let mut solver = problem.bdf_sens::<LS>()?;
            solver.solve_dense_sensitivities(&t_eval)?
        }
    };
    let trajectory = Trajectory {
        ts: t_eval.clone(),
        ys,
    };
    let sensitivities = Sensitivities { ts: t_eval, dydp };
    Ok((trajectory, sensitivities))
}

#[cfg(test)]
mod test {
    use super::*;

    fn solved(kind: SolverKind) -> Trajectory {
        let config = SolveConfig {
            solver: kind,
            ..SolveConfig::default()
        };
        solve(&config).unwrap()
    }

    #[test]
    fn first_sample_is_the_initial_state() {
        for kind in [SolverKind::Tsit45, SolverKind::Bdf] {
            let trajectory = solved(kind);
            let u0 = trajectory.state(0);
            for (got, expected) in u0.iter().zip([999.0, 1.0, 0.0]) {
                assert!((got - expected).abs() < 1e-8, "{kind:?}: {got} vs {expected}");
            }
            assert_eq!(trajectory.ts[0], 0.0);
        }
    }

    #[test]
    fn population_is_conserved_at_every_sample() {
        let trajectory = solved(SolverKind::Tsit45);
        assert_eq!(trajectory.len(), 161);
        for total in trajectory.totals() {
            assert!(
                (total - 1000.0).abs() < 1e-6,
                "population drifted to {total}"
            );
        }
    }

    #[test]
    fn susceptible_decreases_and_recovered_increases() {
        let trajectory = solved(SolverKind::Tsit45);
        let s = trajectory.susceptible();
        let r = trajectory.recovered();
        assert!(s.windows(2).all(|w| w[1] <= w[0] + 1e-9));
        assert!(r.windows(2).all(|w| w[1] >= w[0] - 1e-9));
    }

    #[test]
    fn infection_peaks_and_subsides() {
        let trajectory = solved(SolverKind::Tsit45);
        let i = trajectory.infectious();
        let peak = i.iter().cloned().fold(f64::MIN, f64::max);
        // With beta/gamma = 3 the outbreak takes off and dies out within the
        // 160 unit horizon.
        assert!(peak > 100.0, "peak infections {peak} too low");
        assert!(*i.last().unwrap() < 1.0);
    }

    #[test]
    fn repeated_solves_are_identical() {
        let config = SolveConfig::default();
        let a = solve(&config).unwrap();
        let b = solve(&config).unwrap();
        assert_eq!(a.ts, b.ts);
        assert_eq!(a.ys.inner(), b.ys.inner());
    }

    #[test]
    fn solver_methods_agree() {
        let reference = solved(SolverKind::Tsit45);
        for kind in [SolverKind::TrBdf2, SolverKind::Esdirk34, SolverKind::Bdf] {
            let other = solved(kind);
            for (a, b) in reference
                .ys
                .inner()
                .iter()
                .zip(other.ys.inner().iter())
            {
                assert!((a - b).abs() < 1e-3, "{kind:?} disagrees: {a} vs {b}");
            }
        }
    }

    #[test]
    fn sensitivities_have_one_block_per_parameter() {
        let config = SolveConfig::default();
        let (trajectory, sens) = solve_with_sensitivities(&config).unwrap();
        assert_eq!(sens.nparams(), 2);
        for dydp in &sens.dydp {
            assert_eq!(dydp.inner().nrows(), 3);
            assert_eq!(dydp.inner().ncols(), trajectory.len());
        }
        // Initial state does not depend on the parameters.
        for dydp in &sens.dydp {
            for i in 0..3 {
                assert!(dydp.get_index(i, 0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn sensitivity_augmented_trajectory_matches_plain_solve() {
        let config = SolveConfig::default();
        let plain = solve(&config).unwrap();
        let (augmented, _) = solve_with_sensitivities(&config).unwrap();
        for (a, b) in plain
            .ys
            .inner()
            .iter()
            .zip(augmented.ys.inner().iter())
        {
            assert!((a - b).abs() < 1e-4, "{a} vs {b}");
        }
    }
}
