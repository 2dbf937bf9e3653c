//! Equivalent representations of a linear prediction model.
//!
//! Every type here is a validated, immutable vector. Conversions between them
//! are pure functions; the per-frame aggregate that caches them lives in
//! [`crate::spectral_model`].

#[macro_use]
mod buffer;

pub mod cepstrum;
pub mod lattice;
pub mod levinson;
pub mod lpc;
pub mod lsf;
pub mod reflection;

pub use self::cepstrum::LpcCepstrum;
pub use self::lattice::LatticeSynthesisFilter;
pub use self::levinson::levinson_durbin;
pub use self::lpc::{LpcCoefficients, one_minus_a_from_predictor, predictor_from_one_minus_a};
pub use self::lsf::LineSpectralFrequencies;
pub use self::reflection::ReflectionCoefficients;

/// Errors in constructing or converting coefficient vectors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoefficientError {
    /// The prediction order is zero.
    #[error("Prediction order must be at least 1")]
    ZeroOrder,
    /// The cepstrum order is zero.
    #[error("Cepstrum order must be at least 1")]
    ZeroCepstrumOrder,
    /// No lag-0 value was supplied.
    #[error("Autocorrelation sequence is empty")]
    EmptyAutocorrelation,
    /// `oneMinusA[0]` is not 1.0.
    #[error("Leading LPC coefficient must be 1.0, got {0}")]
    LeadingCoefficient(f64),
    /// Gain must not be negative.
    #[error("Gain must not be negative, got {0}")]
    NegativeGain(f64),
    /// Coefficient index outside `1..=order`.
    #[error("Coefficient index {index} is out of range for order {order}")]
    IndexOutOfRange { index: usize, order: usize },
    /// Line spectral frequencies are only defined here for even orders.
    #[error("Line spectral frequencies require an even order, got {0}")]
    OddOrder(usize),
    /// A line spectral frequency lies outside the open interval (0, 0.5).
    #[error("Line spectral frequency {index} is out of (0, 0.5): {value}")]
    LsfOutOfRange { index: usize, value: f64 },
    /// Line spectral frequencies must be strictly increasing.
    #[error("Line spectral frequencies are not strictly increasing at index {0}")]
    NonMonotonicLsf(usize),
    /// The polynomial root search diverged.
    #[error("Root search for line spectral frequencies did not converge")]
    RootSearch,
}
