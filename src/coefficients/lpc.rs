use serde::{Deserialize, Serialize};

use super::{CoefficientError, buffer::*};

/// Converts the stored `oneMinusA` vector into predictor coefficients.
///
/// `A(z) = 1 - Σ a_i z^-i` and `oneMinusA = [1, -a_1, ..., -a_p]`, so the
/// result is `[a_1, ..., a_p]` (`a_i = -oneMinusA[i]`). This is the only place
/// the sign flip between the two conventions is written down.
pub fn predictor_from_one_minus_a(one_minus_a: &[f64]) -> Vec<f64> {
    one_minus_a.iter().skip(1).map(|x| -x).collect()
}

/// Inverse of [`predictor_from_one_minus_a`]: `[a_1, ..., a_p]` becomes
/// `[1, -a_1, ..., -a_p]`.
pub fn one_minus_a_from_predictor(predictor: &[f64]) -> Vec<f64> {
    std::iter::once(1.0)
        .chain(predictor.iter().map(|x| -x))
        .collect()
}

/// LPC direct-form coefficients in the `oneMinusA` layout.
///
/// Invariants: `len() == order() + 1`, `order() >= 1`, `self[0] == 1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct LpcCoefficients {
    buffer: Box<[f64]>,
}

coefficient_buffer!(LpcCoefficients);

impl LpcCoefficients {
    /// Wrap a `oneMinusA` vector.
    ///
    /// Conditions:
    /// - one_minus_a.len() >= 2
    /// - one_minus_a[0] == 1.0 (within float epsilon; stored as exactly 1.0)
    pub fn new(one_minus_a: &[f64]) -> Result<Self, CoefficientError> {
        if one_minus_a.len() < 2 {
            return Err(CoefficientError::ZeroOrder);
        }
        if approx::abs_diff_ne!(one_minus_a[0], 1.0) {
            return Err(CoefficientError::LeadingCoefficient(one_minus_a[0]));
        }
        let mut buffer: Box<[f64]> = one_minus_a.into();
        buffer[0] = 1.0;
        Ok(Self { buffer })
    }

    /// Build from predictor coefficients `[a_1, ..., a_p]`.
    pub fn from_predictor(predictor: &[f64]) -> Result<Self, CoefficientError> {
        if predictor.is_empty() {
            return Err(CoefficientError::ZeroOrder);
        }
        Ok(Self {
            buffer: one_minus_a_from_predictor(predictor).into(),
        })
    }

    /// The trivial predictor `[1, 0, ..., 0]` of the given order.
    pub fn identity(order: usize) -> Result<Self, CoefficientError> {
        if order == 0 {
            return Err(CoefficientError::ZeroOrder);
        }
        let mut buffer = vec![0.0; order + 1];
        buffer[0] = 1.0;
        Ok(Self {
            buffer: buffer.into(),
        })
    }

    /// Construct without validation; callers guarantee the invariants.
    pub(crate) fn from_raw(buffer: Vec<f64>) -> Self {
        debug_assert!(buffer.len() >= 2 && buffer[0] == 1.0);
        Self {
            buffer: buffer.into(),
        }
    }

    /// Prediction order `p`.
    pub fn order(&self) -> usize {
        self.len() - 1
    }

    /// Predictor coefficients `[a_1, ..., a_p]`.
    pub fn predictor(&self) -> Vec<f64> {
        predictor_from_one_minus_a(self)
    }

    /// Copy with `oneMinusA[index]` replaced. `index` must be in `1..=order`.
    pub fn with_coefficient(&self, index: usize, value: f64) -> Result<Self, CoefficientError> {
        if index == 0 || index > self.order() {
            return Err(CoefficientError::IndexOutOfRange {
                index,
                order: self.order(),
            });
        }
        let mut buffer = self.buffer.clone();
        buffer[index] = value;
        Ok(Self { buffer })
    }

    /// Direct-form all-pole synthesis `1 / A(z)` with zero initial state.
    ///
    /// `y[n] = x[n] - Σ_{i=1}^{p} oneMinusA[i] · y[n-i]`
    pub fn synthesize(&self, excitation: &[f64]) -> Vec<f64> {
        let mut output = vec![0.0; excitation.len()];
        for n in 0..excitation.len() {
            let mut y = excitation[n];
            for i in 1..self.len().min(n + 1) {
                y -= self[i] * output[n - i];
            }
            output[n] = y;
        }
        output
    }

    /// Prediction residual through the whitening filter `A(z)`.
    ///
    /// `e[n] = Σ_{i=0}^{p} oneMinusA[i] · x[n-i]`, samples before the start are zero.
    pub fn residual(&self, signal: &[f64]) -> Vec<f64> {
        (0..signal.len())
            .map(|n| {
                self.iter()
                    .take(n + 1)
                    .enumerate()
                    .map(|(i, a)| a * signal[n - i])
                    .sum::<f64>()
            })
            .collect()
    }

    /// Ratio of signal energy to residual energy, in dB.
    pub fn prediction_gain_db(&self, signal: &[f64]) -> f64 {
        let residual = self.residual(signal);
        let signal_energy: f64 = signal.iter().map(|x| x * x).sum();
        let residual_energy: f64 = residual.iter().map(|x| x * x).sum();
        10.0 * (signal_energy / residual_energy).log10()
    }
}
