use diffsol::error::DiffsolError;
use thiserror::Error;

/// Error type for everything that can go wrong when solving the model or
/// computing gradients.
#[derive(Error, Debug)]
pub enum EpigradError {
    #[error("ODE solver error: {0}")]
    Solver(#[from] DiffsolError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Gradient check error: {0}")]
    GradCheck(#[from] GradCheckError),
}

/// Possible errors when validating a [SolveConfig](crate::SolveConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("saveat must be positive and finite, got {0}")]
    InvalidSaveat(f64),
    #[error("time span is empty: t0 = {t0}, t_final = {t_final}")]
    EmptyTimeSpan { t0: f64, t_final: f64 },
    #[error("tolerances must be positive and finite: rtol = {rtol}, atol = {atol}")]
    InvalidTolerance { rtol: f64, atol: f64 },
    #[error("initial compartments must be non-negative with a positive total, got {0:?}")]
    InvalidInitialState([f64; 3]),
    #[error("rate parameters must be non-negative and finite: beta = {beta}, gamma = {gamma}")]
    InvalidRates { beta: f64, gamma: f64 },
}

/// Possible errors when running a finite-difference gradient check.
#[derive(Error, Debug)]
pub enum GradCheckError {
    #[error("parameter vector is empty")]
    EmptyParameters,
    #[error("finite-difference step must be positive and finite, got {0}")]
    InvalidStep(f64),
    #[error("gradient length mismatch: expected {expected}, got {found}")]
    GradientLengthMismatch { expected: usize, found: usize },
}
