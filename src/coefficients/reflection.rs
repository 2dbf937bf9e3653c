use serde::{Deserialize, Serialize};

use super::{CoefficientError, LpcCoefficients, buffer::*, lpc::one_minus_a_from_predictor};

/// Reflection (PARCOR) coefficients `k_1, ..., k_p`.
///
/// `k_i` is the last predictor coefficient of the order-`i` predictor, in the
/// `A(z) = 1 - Σ a_j z^-j` convention; a first-order model estimated from
/// `r` has `k_1 = r[1] / r[0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct ReflectionCoefficients {
    buffer: Box<[f64]>,
}

coefficient_buffer!(ReflectionCoefficients);

impl ReflectionCoefficients {
    pub fn new(k: &[f64]) -> Result<Self, CoefficientError> {
        if k.is_empty() {
            return Err(CoefficientError::ZeroOrder);
        }
        Ok(Self { buffer: k.into() })
    }

    pub fn order(&self) -> usize {
        self.len()
    }

    /// Step-down recursion.
    ///
    /// For `i = p..1`: `k_i = A_i[i]`, then
    /// `A_{i-1}[j] = (A_i[j] + k_i · A_i[i-j]) / (1 - k_i²)` for `j = 1..i-1`.
    /// Divides by zero when some `|k_i| == 1`; that boundary case is not guarded.
    pub fn from_lpc(lpc: &LpcCoefficients) -> Self {
        let p = lpc.order();
        // 1-based predictor coefficients; index 0 is unused.
        let mut a = vec![0.0; p + 1];
        a[1..].copy_from_slice(&lpc.predictor());

        let mut k = vec![0.0; p];
        let mut previous = vec![0.0; p + 1];
        for i in (1..=p).rev() {
            let ki = a[i];
            k[i - 1] = ki;
            let denominator = 1.0 - ki * ki;
            previous[..i].copy_from_slice(&a[..i]);
            for j in 1..i {
                a[j] = (previous[j] + ki * previous[i - j]) / denominator;
            }
        }

        Self { buffer: k.into() }
    }

    /// Step-up recursion.
    ///
    /// For `i = 1..p`: `A_i[i] = k_i` and `A_i[j] = A_{i-1}[j] - k_i · A_{i-1}[i-j]`.
    pub fn to_lpc(&self) -> LpcCoefficients {
        let p = self.order();
        let mut a = vec![0.0; p + 1];
        let mut previous = vec![0.0; p + 1];
        for i in 1..=p {
            let ki = self[i - 1];
            previous[..i].copy_from_slice(&a[..i]);
            for j in 1..i {
                a[j] = previous[j] - ki * previous[i - j];
            }
            a[i] = ki;
        }

        LpcCoefficients::from_raw(one_minus_a_from_predictor(&a[1..]))
    }

    /// `true` iff every coefficient lies in `[-1, 1]`.
    ///
    /// Advisory only; no converter enforces it. A model with a root exactly on
    /// the unit circle, such as `oneMinusA = [1, 0, -1]`, steps down through a
    /// division by zero: the lower coefficients come out NaN (`[NaN, 1.0]`
    /// here) and the model is reported unstable even though `|k[p-1]| = 1`.
    pub fn is_stable(&self) -> bool {
        self.iter().all(|k| (-1.0..=1.0).contains(k))
    }
}
