use serde::{Deserialize, Serialize};

use super::{CoefficientError, LpcCoefficients, buffer::*, lpc::one_minus_a_from_predictor};

/// LPC-derived cepstrum `c[0..=m]`; `c[0] = ln(gain)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct LpcCepstrum {
    buffer: Box<[f64]>,
}

coefficient_buffer!(LpcCepstrum);

impl LpcCepstrum {
    /// Conditions:
    /// - c.len() >= 2 (cepstrum order at least 1)
    pub fn new(c: &[f64]) -> Result<Self, CoefficientError> {
        if c.len() < 2 {
            return Err(CoefficientError::ZeroCepstrumOrder);
        }
        Ok(Self { buffer: c.into() })
    }

    /// Cepstrum order `m`.
    pub fn order(&self) -> usize {
        self.len() - 1
    }

    /// `exp(c[0])`.
    pub fn gain(&self) -> f64 {
        self[0].exp()
    }

    /// Cepstrum of order `order` from `oneMinusA` and gain.
    ///
    /// `c[0] = ln(gain)`; for `n = 1..=m`,
    /// `c[n] = a[n] + (1/n) Σ_{k=1}^{n-1} (n-k) a[k] c[n-k]` while `n <= p`, and
    /// `c[n] = (1/n) Σ_{k=1}^{p} (n-k) a[k] c[n-k]` beyond the LPC order,
    /// where `a[k] = -oneMinusA[k]` are the predictor coefficients. The result
    /// satisfies `ln|H(ω)| = c[0] + Σ_{n>=1} c[n] cos(nω)` as `m` grows.
    /// A zero gain gives `c[0] = -inf`.
    pub fn from_lpc(
        lpc: &LpcCoefficients,
        gain: f64,
        order: usize,
    ) -> Result<Self, CoefficientError> {
        if order == 0 {
            return Err(CoefficientError::ZeroCepstrumOrder);
        }
        let alpha = lpc.predictor();
        let p = alpha.len();

        let mut c = vec![0.0; order + 1];
        c[0] = gain.ln();
        for n in 1..=order {
            let mut sum = 0.0;
            for k in 1..n.min(p + 1) {
                sum += (n - k) as f64 * alpha[k - 1] * c[n - k];
            }
            c[n] = sum / n as f64;
            if n <= p {
                c[n] += alpha[n - 1];
            }
        }

        Ok(Self { buffer: c.into() })
    }

    /// `oneMinusA` of order `order` from this cepstrum.
    ///
    /// Predictor coefficients follow, for `i = 1..=p`,
    /// `a[i] = c[i] - (1/i) Σ_{k=1}^{i-1} k a[i-k] c[k]` while `i <= m`, and
    /// `a[i] = -(1/i) Σ_{k=1}^{m} k a[i-k] c[k]` beyond the cepstrum order,
    /// then `oneMinusA = [1, -a[1], .., -a[p]]`.
    /// The gain is recovered separately with [`gain`](Self::gain).
    pub fn to_lpc(&self, order: usize) -> Result<LpcCoefficients, CoefficientError> {
        if order == 0 {
            return Err(CoefficientError::ZeroOrder);
        }
        let m = self.order();

        let mut a = vec![0.0; order + 1];
        for i in 1..=order {
            let mut sum = 0.0;
            for k in 1..i.min(m + 1) {
                sum += k as f64 * a[i - k] * self[k];
            }
            a[i] = -sum / i as f64;
            if i <= m {
                a[i] += self[i];
            }
        }

        Ok(LpcCoefficients::from_raw(one_minus_a_from_predictor(&a[1..])))
    }
}
