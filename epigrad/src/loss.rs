//! Scalar loss over a trajectory and its analytic gradient.
//!
//! The loss is the one from the demonstration workflow: the sum of squares of
//! every compartment at every sample, `L = sum_t sum_i u_i(t)^2`. Its gradient
//! with respect to the parameters follows from the chain rule through the
//! forward sensitivities: `dL/dp_j = sum_t sum_i 2 u_i(t) du_i(t)/dp_j`.

use diffsol::MatrixCommon;

use crate::config::SolveConfig;
use crate::error::EpigradError;
use crate::model::SirParams;
use crate::solve::{solve, solve_with_sensitivities, Sensitivities, Trajectory};

/// `L = sum(u^2)` over the whole trajectory.
pub fn sum_squares(trajectory: &Trajectory) -> f64 {
    trajectory.ys.inner().iter().map(|u| u * u).sum()
}

/// Gradient of [sum_squares] with respect to the parameters, one entry per
/// sensitivity block.
pub fn gradient(trajectory: &Trajectory, sensitivities: &Sensitivities) -> Vec<f64> {
    sensitivities
        .dydp
        .iter()
        .map(|dydp| {
            2.0 * trajectory
                .ys
                .inner()
                .iter()
                .zip(dydp.inner().iter())
                .map(|(u, du)| u * du)
                .sum::<f64>()
        })
        .collect()
}

/// The gradient-augmented evaluation: solve with sensitivities, then reduce to
/// the loss and its gradient `[dL/dbeta, dL/dgamma]`.
pub fn loss_and_gradient(config: &SolveConfig) -> Result<(f64, Vec<f64>), EpigradError> {
    let (trajectory, sensitivities) = solve_with_sensitivities(config)?;
    Ok((
        sum_squares(&trajectory),
        gradient(&trajectory, &sensitivities),
    ))
}

/// The loss as a function of a raw `[beta, gamma]` slice, for
/// finite-difference checks against [loss_and_gradient].
pub fn loss_at(config: &SolveConfig, p: &[f64]) -> Result<f64, EpigradError> {
    let perturbed = SolveConfig {
        params: SirParams::from_slice(p),
        ..config.clone()
    };
    Ok(sum_squares(&solve(&perturbed)?))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::gradcheck::{check, GradCheckSettings};

    #[test]
    fn loss_is_positive_and_dominated_by_the_population_scale() {
        let config = SolveConfig::default();
        let trajectory = solve(&config).unwrap();
        let loss = sum_squares(&trajectory);
        // 161 samples of compartments that each stay within [0, 1000].
        assert!(loss > 0.0);
        assert!(loss < 161.0 * 3.0 * 1000.0 * 1000.0);
        // The t = 0 sample alone contributes 999^2 + 1.
        assert!(loss > 999.0 * 999.0 + 1.0);
    }

    #[test]
    fn analytic_gradient_matches_finite_differences() {
        let config = SolveConfig::default();
        let (_, grad) = loss_and_gradient(&config).unwrap();
        let report = check(
            |p| loss_at(&config, p),
            &config.params.to_vec(),
            &grad,
            &GradCheckSettings::default(),
        )
        .unwrap();
        assert!(report.pass(), "{report:?}");
    }

    #[test]
    fn gradient_signs_follow_the_final_size() {
        // On this horizon the epidemic runs to completion, so the loss is
        // dominated by the squared final sizes. More contact moves more of the
        // population into a single compartment (R), growing sum(u^2); faster
        // recovery shrinks the outbreak and splits the total between S and R.
        let config = SolveConfig::default();
        let (_, grad) = loss_and_gradient(&config).unwrap();
        assert!(grad[0] > 0.0, "dL/dbeta = {}", grad[0]);
        assert!(grad[1] < 0.0, "dL/dgamma = {}", grad[1]);
    }
}
