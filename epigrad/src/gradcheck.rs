//! Validation of an analytic gradient against a central finite-difference
//! estimate, in the style of torch's `gradcheck`.

use crate::error::{EpigradError, GradCheckError};

/// Tolerances for [check]. A parameter passes when
/// `|analytic - numerical| <= atol + rtol * |numerical|`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradCheckSettings {
    /// Central-difference step.
    pub eps: f64,
    pub atol: f64,
    pub rtol: f64,
}

impl Default for GradCheckSettings {
    fn default() -> Self {
        Self {
            eps: 1e-4,
            atol: 1e-4,
            rtol: 1e-3,
        }
    }
}

/// Per-parameter comparison of the analytic and numerical gradients.
#[derive(Clone, Copy, Debug)]
pub struct ParamCheck {
    pub analytic: f64,
    pub numerical: f64,
    pub abs_err: f64,
    pub rel_err: f64,
    pub pass: bool,
}

/// Result of [check]: one [ParamCheck] per parameter.
#[derive(Clone, Debug)]
pub struct GradCheck {
    pub params: Vec<ParamCheck>,
}

impl GradCheck {
    pub fn pass(&self) -> bool {
        self.params.iter().all(|p| p.pass)
    }

    /// Largest absolute error across parameters.
    pub fn max_abs_err(&self) -> f64 {
        self.params.iter().fold(0.0, |m, p| m.max(p.abs_err))
    }
}

/// Central finite-difference gradient of a scalar function of the parameters.
pub fn central_difference<F>(f: F, p: &[f64], eps: f64) -> Result<Vec<f64>, EpigradError>
where
    F: Fn(&[f64]) -> Result<f64, EpigradError>,
{
    if p.is_empty() {
        return Err(GradCheckError::EmptyParameters.into());
    }
    if !eps.is_finite() || eps <= 0.0 {
        return Err(GradCheckError::InvalidStep(eps).into());
    }
    let mut grad = Vec::with_capacity(p.len());
    let mut work = p.to_vec();
    for i in 0..p.len() {
        work[i] = p[i] + eps;
        let fp = f(&work)?;
        work[i] = p[i] - eps;
        let fm = f(&work)?;
        work[i] = p[i];
        grad.push((fp - fm) / (2.0 * eps));
    }
    Ok(grad)
}

/// Compare an analytic gradient of `f` at `p` against the central
/// finite-difference estimate.
pub fn check<F>(
    f: F,
    p: &[f64],
    analytic: &[f64],
    settings: &GradCheckSettings,
) -> Result<GradCheck, EpigradError>
where
    F: Fn(&[f64]) -> Result<f64, EpigradError>,
{
    if analytic.len() != p.len() {
        return Err(GradCheckError::GradientLengthMismatch {
            expected: p.len(),
            found: analytic.len(),
        }
        .into());
    }
    let numerical = central_difference(f, p, settings.eps)?;
    let params = analytic
        .iter()
        .zip(numerical.iter())
        .map(|(&a, &n)| {
            let abs_err = (a - n).abs();
            let rel_err = if n != 0.0 { abs_err / n.abs() } else { abs_err };
            ParamCheck {
                analytic: a,
                numerical: n,
                abs_err,
                rel_err,
                pass: abs_err <= settings.atol + settings.rtol * n.abs(),
            }
        })
        .collect();
    Ok(GradCheck { params })
}

#[cfg(test)]
mod test {
    use super::*;

    fn quadratic(p: &[f64]) -> Result<f64, EpigradError> {
        Ok(p[0] * p[0] + 3.0 * p[0] * p[1] - 2.0 * p[1])
    }

    fn quadratic_grad(p: &[f64]) -> Vec<f64> {
        vec![2.0 * p[0] + 3.0 * p[1], 3.0 * p[0] - 2.0]
    }

    #[test]
    fn central_difference_is_exact_for_quadratics() {
        let p = [1.5, -0.7];
        let grad = central_difference(quadratic, &p, 1e-4).unwrap();
        let expected = quadratic_grad(&p);
        for (g, e) in grad.iter().zip(expected.iter()) {
            assert!((g - e).abs() < 1e-7, "{g} vs {e}");
        }
    }

    #[test]
    fn check_accepts_a_correct_gradient() {
        let p = [0.3, 0.1];
        let report = check(
            quadratic,
            &p,
            &quadratic_grad(&p),
            &GradCheckSettings::default(),
        )
        .unwrap();
        assert!(report.pass());
        assert!(report.max_abs_err() < 1e-4);
    }

    #[test]
    fn check_rejects_a_wrong_gradient() {
        let p = [0.3, 0.1];
        let mut grad = quadratic_grad(&p);
        grad[1] += 1.0;
        let report = check(quadratic, &p, &grad, &GradCheckSettings::default()).unwrap();
        assert!(!report.pass());
        assert!(report.params[0].pass);
        assert!(!report.params[1].pass);
    }

    #[test]
    fn invalid_inputs_are_reported() {
        assert!(matches!(
            central_difference(quadratic, &[], 1e-4),
            Err(EpigradError::GradCheck(GradCheckError::EmptyParameters))
        ));
        assert!(matches!(
            central_difference(quadratic, &[1.0], 0.0),
            Err(EpigradError::GradCheck(GradCheckError::InvalidStep(_)))
        ));
        assert!(matches!(
            check(quadratic, &[1.0, 2.0], &[0.0], &GradCheckSettings::default()),
            Err(EpigradError::GradCheck(
                GradCheckError::GradientLengthMismatch { .. }
            ))
        ));
    }
}
