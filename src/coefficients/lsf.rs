use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::{CoefficientError, LpcCoefficients, buffer::*};

const ROOT_TOLERANCE: f64 = 1.0e-12;
const MAX_ROOT_SWEEPS: usize = 10_000;

/// Line spectral frequencies, normalised to the open interval `(0, 0.5)`
/// (multiply by the sampling rate for Hz).
///
/// Even element indices come from the sum polynomial `P(z)`, odd ones from the
/// difference polynomial `Q(z)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct LineSpectralFrequencies {
    buffer: Box<[f64]>,
}

coefficient_buffer!(LineSpectralFrequencies);

impl LineSpectralFrequencies {
    /// Conditions:
    /// - lsf.len() is even and non-zero
    /// - 0 < lsf[i] < 0.5
    /// - lsf is strictly increasing
    pub fn new(lsf: &[f64]) -> Result<Self, CoefficientError> {
        if lsf.is_empty() {
            return Err(CoefficientError::ZeroOrder);
        }
        if lsf.len() % 2 != 0 {
            return Err(CoefficientError::OddOrder(lsf.len()));
        }
        for (index, &value) in lsf.iter().enumerate() {
            if !(value > 0.0 && value < 0.5) {
                return Err(CoefficientError::LsfOutOfRange { index, value });
            }
            if index > 0 && value <= lsf[index - 1] {
                return Err(CoefficientError::NonMonotonicLsf(index));
            }
        }
        Ok(Self { buffer: lsf.into() })
    }

    /// Frequencies given in Hz.
    pub fn from_hz(lsf: &[f64], sampling_rate: f64) -> Result<Self, CoefficientError> {
        let normalised: Vec<f64> = lsf.iter().map(|f| f / sampling_rate).collect();
        Self::new(&normalised)
    }

    pub fn to_hz(&self, sampling_rate: f64) -> Vec<f64> {
        self.iter().map(|f| f * sampling_rate).collect()
    }

    pub fn order(&self) -> usize {
        self.len()
    }

    /// Roots of the sum and difference polynomials of `A(z)`.
    ///
    /// Only even orders are supported. After removing the trivial roots at
    /// `z = -1` and `z = +1`, each half polynomial is rewritten in
    /// `x = 2cos(ω)` and its roots are found by simultaneous Newton iteration
    /// (CACM algorithm 283).
    pub fn from_lpc(lpc: &LpcCoefficients) -> Result<Self, CoefficientError> {
        let order = lpc.order();
        if order % 2 != 0 {
            return Err(CoefficientError::OddOrder(order));
        }
        let half = order / 2;

        // g[i] is the coefficient of x^i once reduced; g[half] is the leading one.
        let mut sum = vec![0.0; half + 1];
        let mut difference = vec![0.0; half + 1];
        sum[half] = lpc[0];
        difference[half] = lpc[0];
        for i in 1..=half {
            sum[half - i] = lpc[i] + lpc[order + 1 - i];
            difference[half - i] = lpc[i] - lpc[order + 1 - i];
        }
        // Divide P by (1 + z^-1) and Q by (1 - z^-1).
        for i in 1..=half {
            sum[half - i] -= sum[half - i + 1];
            difference[half - i] += difference[half - i + 1];
        }

        chebyshev_reduce(&mut sum);
        chebyshev_reduce(&mut difference);

        let sum_roots = find_roots(&sum)?;
        let difference_roots = find_roots(&difference)?;

        let to_frequency = |x: f64| (0.5 * x).clamp(-1.0, 1.0).acos() / (2.0 * PI);
        let buffer: Vec<f64> = sum_roots
            .iter()
            .zip(&difference_roots)
            .flat_map(|(&p, &q)| [to_frequency(p), to_frequency(q)])
            .collect();

        Ok(Self {
            buffer: buffer.into(),
        })
    }

    /// Rebuild `A(z) = (P(z) + Q(z)) / 2` from its unit-circle roots.
    ///
    /// An impulse is run through `(1 + z^-1) Π (1 - 2cos(2π f_P) z^-1 + z^-2)` and
    /// `(1 - z^-1) Π (1 - 2cos(2π f_Q) z^-1 + z^-2)`, and the outputs are averaged.
    pub fn to_lpc(&self) -> LpcCoefficients {
        let order = self.order();
        let half = order / 2;

        let p: Vec<f64> = self
            .iter()
            .step_by(2)
            .map(|f| -2.0 * (2.0 * PI * f).cos())
            .collect();
        let q: Vec<f64> = self
            .iter()
            .skip(1)
            .step_by(2)
            .map(|f| -2.0 * (2.0 * PI * f).cos())
            .collect();

        let mut a0 = vec![0.0; half + 1];
        let mut a1 = vec![0.0; half + 1];
        let mut a2 = vec![0.0; half + 1];
        let mut b0 = vec![0.0; half + 1];
        let mut b1 = vec![0.0; half + 1];
        let mut b2 = vec![0.0; half + 1];

        let mut one_minus_a = vec![0.0; order + 1];
        one_minus_a[0] = 1.0;

        let mut xf = 0.0;
        for n in 0..=order {
            let xx = if n == 0 { 1.0 } else { 0.0 };
            a0[0] = xx + xf;
            b0[0] = xx - xf;
            xf = xx;
            for j in 0..half {
                a0[j + 1] = a0[j] + p[j] * a1[j] + a2[j];
                b0[j + 1] = b0[j] + q[j] * b1[j] + b2[j];
                a2[j] = a1[j];
                a1[j] = a0[j];
                b2[j] = b1[j];
                b1[j] = b0[j];
            }
            if n > 0 {
                one_minus_a[n] = 0.5 * (a0[half] + b0[half]);
            }
        }

        LpcCoefficients::from_raw(one_minus_a)
    }
}

/// Rewrite `Σ g[i] (z^i + z^-i)` (with `g[0]` the constant term) as a
/// polynomial in `x = z + z^-1`, in place.
fn chebyshev_reduce(g: &mut [f64]) {
    let n = g.len() - 1;
    for i in 2..=n {
        for j in (i + 1..=n).rev() {
            g[j - 2] -= g[j];
        }
        g[i - 2] -= 2.0 * g[i];
    }
}

/// Real roots of `Σ g[i] x^i`, sorted in descending order.
fn find_roots(g: &[f64]) -> Result<Vec<f64>, CoefficientError> {
    let n = g.len() - 1;
    let mut roots: Vec<f64> = (0..n)
        .map(|i| 2.0 * (i as f64 + 0.5) / n as f64 - 1.0)
        .collect();

    let mut sweeps = 0;
    loop {
        let mut error = 0.0;
        for i in 0..n {
            let x = roots[i];
            let mut value = g[n];
            let mut derivative = g[n];
            for k in (0..n).rev() {
                value = value * x + g[k];
                if k != i {
                    derivative *= x - roots[k];
                }
            }
            let delta = value / derivative;
            roots[i] -= delta;
            error += delta * delta;
        }
        sweeps += 1;

        if !error.is_finite() {
            return Err(CoefficientError::RootSearch);
        }
        if error <= ROOT_TOLERANCE {
            break;
        }
        if sweeps >= MAX_ROOT_SWEEPS {
            return Err(CoefficientError::RootSearch);
        }
    }
    tracing::debug!(sweeps, degree = n, "line spectral frequency roots converged");

    roots.sort_by(|a, b| b.total_cmp(a));
    Ok(roots)
}

#[cfg(test)]
mod tests {
    use super::{LineSpectralFrequencies, chebyshev_reduce, find_roots};
    use crate::coefficients::{CoefficientError, LpcCoefficients, ReflectionCoefficients};

    #[test]
    fn chebyshev_identities() {
        // z^2 + z^-2 = x^2 - 2
        let mut g = vec![0.0, 0.0, 1.0];
        chebyshev_reduce(&mut g);
        assert_eq!(g, vec![-2.0, 0.0, 1.0]);
        // z^3 + z^-3 = x^3 - 3x
        let mut g = vec![0.0, 0.0, 0.0, 1.0];
        chebyshev_reduce(&mut g);
        assert_eq!(g, vec![0.0, -3.0, 0.0, 1.0]);
    }

    #[test]
    fn roots_of_known_polynomial() {
        // (x - 1.5)(x + 0.5)(x - 0.25)
        let g = [0.1875, -0.5, -1.25, 1.0];
        let roots = find_roots(&g).unwrap();
        let expected = [1.5, 0.25, -0.5];
        for (r, e) in roots.iter().zip(&expected) {
            approx::assert_abs_diff_eq!(r, e, epsilon = 1.0e-9);
        }
    }

    #[test]
    fn second_order_closed_form() {
        // 2cos(2π f_P) = 1 - a1 - a2 and 2cos(2π f_Q) = -(1 + a1 - a2)
        let lpc = LpcCoefficients::new(&[1.0, -0.9, 0.4]).unwrap();
        let lsf = LineSpectralFrequencies::from_lpc(&lpc).unwrap();
        let expected_p = (0.5 * (1.0 + 0.9 - 0.4f64)).acos() / (2.0 * std::f64::consts::PI);
        let expected_q = (-0.5 * (1.0 - 0.9 - 0.4f64)).acos() / (2.0 * std::f64::consts::PI);
        approx::assert_abs_diff_eq!(lsf[0], expected_p, epsilon = 1.0e-9);
        approx::assert_abs_diff_eq!(lsf[1], expected_q, epsilon = 1.0e-9);
    }

    #[test]
    fn round_trip() {
        let k = ReflectionCoefficients::new(&[0.9, -0.6, 0.4, -0.3, 0.2, 0.1, -0.15, 0.05, 0.3, -0.2])
            .unwrap();
        let lpc = k.to_lpc();
        let lsf = LineSpectralFrequencies::from_lpc(&lpc).unwrap();
        assert_eq!(lsf.order(), 10);
        for pair in lsf.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!(lsf.iter().all(|&f| f > 0.0 && f < 0.5));
        let back = lsf.to_lpc();
        for (a, b) in lpc.iter().zip(back.iter()) {
            approx::assert_abs_diff_eq!(a, b, epsilon = 1.0e-7);
        }
    }

    #[test]
    fn flat_model_is_uniform() {
        // A(z) = 1 spreads the frequencies evenly: (i + 1) / (2 (p + 1)).
        let lpc = LpcCoefficients::identity(4).unwrap();
        let lsf = LineSpectralFrequencies::from_lpc(&lpc).unwrap();
        for (i, f) in lsf.iter().enumerate() {
            approx::assert_abs_diff_eq!(*f, (i + 1) as f64 / 10.0, epsilon = 1.0e-9);
        }
    }

    #[test]
    fn odd_order_is_rejected() {
        let lpc = LpcCoefficients::identity(3).unwrap();
        assert_eq!(
            LineSpectralFrequencies::from_lpc(&lpc),
            Err(CoefficientError::OddOrder(3))
        );
    }

    #[test]
    fn validation() {
        assert_eq!(
            LineSpectralFrequencies::new(&[0.1, 0.05]),
            Err(CoefficientError::NonMonotonicLsf(1))
        );
        assert_eq!(
            LineSpectralFrequencies::new(&[0.0, 0.2]),
            Err(CoefficientError::LsfOutOfRange {
                index: 0,
                value: 0.0
            })
        );
        assert_eq!(
            LineSpectralFrequencies::new(&[0.1, 0.5]),
            Err(CoefficientError::LsfOutOfRange {
                index: 1,
                value: 0.5
            })
        );
        assert_eq!(
            LineSpectralFrequencies::new(&[0.1, 0.2, 0.3]),
            Err(CoefficientError::OddOrder(3))
        );
    }

    #[test]
    fn hz_scaling() {
        let lsf = LineSpectralFrequencies::from_hz(&[500.0, 1500.0], 16000.0).unwrap();
        approx::assert_abs_diff_eq!(lsf[0], 500.0 / 16000.0);
        let hz = lsf.to_hz(16000.0);
        approx::assert_abs_diff_eq!(hz[1], 1500.0, epsilon = 1.0e-9);
    }
}
