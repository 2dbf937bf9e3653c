//! Magnitude response of an all-pole model.
//!
//! `H(ω) = sqrtGain / |1 - Σ_{i=1}^{p} alpha_i e^{-jωi}|`, where `alpha` are the
//! predictor coefficients (see [`LpcCoefficients::predictor`](crate::coefficients::LpcCoefficients::predictor)).

use std::{
    collections::HashMap,
    f64::consts::PI,
    sync::Arc,
};

use num_complex::Complex;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpectrumError {
    #[error("FFT size must be at least 1")]
    ZeroFftSize,
    #[error("Prediction order must be at least 1")]
    ZeroOrder,
    /// The predictor does not have the order the basis was built for.
    #[error("Basis was built for order {expected}, got {actual} coefficients")]
    OrderMismatch { expected: usize, actual: usize },
}

/// Number of bins from DC to Nyquist inclusive, `fft_size / 2 + 1`.
///
/// For odd `fft_size` there is no bin at Nyquist and the grid stops at bin
/// `fft_size / 2`. That is one bin fewer than `floor(fft_size / 2 + 1.5)`,
/// which would reach past Nyquist.
pub fn bin_count(fft_size: usize) -> usize {
    fft_size / 2 + 1
}

/// Angular frequency of bin `k` on an `fft_size`-point grid.
pub fn bin_frequency(k: usize, fft_size: usize) -> f64 {
    2.0 * PI * k as f64 / fft_size as f64
}

/// Precomputed `cos(ω_k i)` and `sin(ω_k i)` for every bin `k` and lag `i = 1..=p`.
///
/// Depends only on `(fft_size, order)` and can be shared across frames.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralBasis {
    fft_size: usize,
    order: usize,
    bins: usize,
    /// `cos[(i - 1) * bins + k]`
    cos: Vec<f64>,
    /// `sin[(i - 1) * bins + k]`
    sin: Vec<f64>,
}

impl SpectralBasis {
    pub fn new(fft_size: usize, order: usize) -> Result<Self, SpectrumError> {
        if fft_size == 0 {
            return Err(SpectrumError::ZeroFftSize);
        }
        if order == 0 {
            return Err(SpectrumError::ZeroOrder);
        }
        let bins = bin_count(fft_size);

        let mut cos = vec![0.0; order * bins];
        let mut sin = vec![0.0; order * bins];
        for k in 0..bins {
            let omega = bin_frequency(k, fft_size);
            for i in 0..order {
                let (s, c) = (omega * (i + 1) as f64).sin_cos();
                cos[i * bins + k] = c;
                sin[i * bins + k] = s;
            }
        }

        Ok(Self {
            fft_size,
            order,
            bins,
            cos,
            sin,
        })
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
    pub fn order(&self) -> usize {
        self.order
    }
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Linear magnitude at every bin.
    pub fn evaluate(&self, alpha: &[f64], sqrt_gain: f64) -> Result<Vec<f64>, SpectrumError> {
        if alpha.len() != self.order {
            return Err(SpectrumError::OrderMismatch {
                expected: self.order,
                actual: alpha.len(),
            });
        }

        let spectrum = (0..self.bins)
            .map(|k| {
                let mut re = 1.0;
                let mut im = 0.0;
                for (i, a) in alpha.iter().enumerate() {
                    re -= a * self.cos[i * self.bins + k];
                    im += a * self.sin[i * self.bins + k];
                }
                sqrt_gain / re.hypot(im)
            })
            .collect();
        Ok(spectrum)
    }
}

/// Linear magnitude at a single angular frequency `omega`.
pub fn evaluate_at(alpha: &[f64], sqrt_gain: f64, omega: f64) -> Result<f64, SpectrumError> {
    if alpha.is_empty() {
        return Err(SpectrumError::ZeroOrder);
    }
    let denominator = alpha
        .iter()
        .enumerate()
        .fold(Complex::new(1.0, 0.0), |acc, (i, a)| {
            acc - *a * Complex::from_polar(1.0, -omega * (i + 1) as f64)
        });
    Ok(sqrt_gain / denominator.norm())
}

/// [`evaluate_at`] with the frequency given in Hz.
pub fn evaluate_at_hz(
    alpha: &[f64],
    sqrt_gain: f64,
    frequency: f64,
    sampling_rate: f64,
) -> Result<f64, SpectrumError> {
    evaluate_at(alpha, sqrt_gain, 2.0 * PI * frequency / sampling_rate)
}

/// `20 log10` of each magnitude.
pub fn to_db(spectrum: &[f64]) -> Vec<f64> {
    spectrum.iter().map(|x| 20.0 * x.log10()).collect()
}

/// One-off evaluation without keeping the basis.
pub fn envelope(alpha: &[f64], sqrt_gain: f64, fft_size: usize) -> Result<Vec<f64>, SpectrumError> {
    SpectralBasis::new(fft_size, alpha.len())?.evaluate(alpha, sqrt_gain)
}

/// Caller-owned store of bases keyed by `(fft_size, order)`.
#[derive(Debug, Default, Clone)]
pub struct BasisCache {
    bases: HashMap<(usize, usize), Arc<SpectralBasis>>,
}

impl BasisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The basis for `(fft_size, order)`, built on first use.
    pub fn get(&mut self, fft_size: usize, order: usize) -> Result<Arc<SpectralBasis>, SpectrumError> {
        if let Some(basis) = self.bases.get(&(fft_size, order)) {
            return Ok(Arc::clone(basis));
        }
        let basis = Arc::new(SpectralBasis::new(fft_size, order)?);
        self.bases.insert((fft_size, order), Arc::clone(&basis));
        Ok(basis)
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::{f64::consts::PI, sync::Arc};

    use super::{
        BasisCache, SpectralBasis, SpectrumError, bin_count, bin_frequency, envelope,
        evaluate_at, evaluate_at_hz, to_db,
    };

    #[test]
    fn bin_counts() {
        assert_eq!(bin_count(256), 129);
        assert_eq!(bin_count(1), 1);
        // Odd sizes stop below Nyquist.
        assert_eq!(bin_count(101), 51);
        assert!(bin_frequency(bin_count(101) - 1, 101) < PI);
        assert_eq!(bin_frequency(bin_count(256) - 1, 256), PI);
    }

    #[test]
    fn grid_matches_single_frequency() {
        let cases: [(&[f64], usize); 4] = [
            (&[0.9], 64),
            (&[1.3, -0.6, 0.1, 0.05], 256),
            (&[0.5, -0.2, 0.3, -0.1, 0.05, 0.02, -0.03, 0.01, 0.0, 0.04], 512),
            (&[0.7, -0.3, 0.2], 101),
        ];
        for (alpha, fft_size) in cases {
            let basis = SpectralBasis::new(fft_size, alpha.len()).unwrap();
            let grid = basis.evaluate(alpha, 0.3).unwrap();
            assert_eq!(grid.len(), fft_size / 2 + 1);
            for (k, value) in grid.iter().enumerate() {
                let single = evaluate_at(alpha, 0.3, bin_frequency(k, fft_size)).unwrap();
                approx::assert_abs_diff_eq!(*value, single, epsilon = 1.0e-9);
            }
        }
    }

    #[test]
    fn first_order_closed_form() {
        // |1 - a e^{-jω}|² = 1 - 2a cos ω + a²
        let a = 0.8;
        let spectrum = envelope(&[a], 1.0, 8).unwrap();
        approx::assert_abs_diff_eq!(spectrum[0], 1.0 / (1.0 - a), epsilon = 1.0e-12);
        approx::assert_abs_diff_eq!(spectrum[4], 1.0 / (1.0 + a), epsilon = 1.0e-12);
        let omega = bin_frequency(2, 8);
        let expected = 1.0 / (1.0 - 2.0 * a * omega.cos() + a * a).sqrt();
        approx::assert_abs_diff_eq!(spectrum[2], expected, epsilon = 1.0e-12);
    }

    #[test]
    fn gain_scales_linearly() {
        let alpha = [1.1, -0.4];
        let unit = envelope(&alpha, 1.0, 32).unwrap();
        let scaled = envelope(&alpha, 2.5, 32).unwrap();
        for (u, s) in unit.iter().zip(&scaled) {
            approx::assert_abs_diff_eq!(2.5 * u, *s, epsilon = 1.0e-12);
        }
    }

    #[test]
    fn hz_is_converted_to_radians() {
        let alpha = [0.4, 0.2];
        let at_hz = evaluate_at_hz(&alpha, 1.0, 2000.0, 16000.0).unwrap();
        let at_radian = evaluate_at(&alpha, 1.0, PI / 4.0).unwrap();
        approx::assert_abs_diff_eq!(at_hz, at_radian, epsilon = 1.0e-12);
    }

    #[test]
    fn decibels() {
        let db = to_db(&[1.0, 10.0, 0.1]);
        approx::assert_abs_diff_eq!(db[0], 0.0);
        approx::assert_abs_diff_eq!(db[1], 20.0, epsilon = 1.0e-12);
        approx::assert_abs_diff_eq!(db[2], -20.0, epsilon = 1.0e-12);
    }

    #[test]
    fn invalid_arguments() {
        assert_eq!(SpectralBasis::new(0, 4), Err(SpectrumError::ZeroFftSize));
        assert_eq!(SpectralBasis::new(64, 0), Err(SpectrumError::ZeroOrder));
        assert_eq!(evaluate_at(&[], 1.0, 0.5), Err(SpectrumError::ZeroOrder));
        let basis = SpectralBasis::new(64, 3).unwrap();
        assert_eq!(
            basis.evaluate(&[0.1, 0.2], 1.0),
            Err(SpectrumError::OrderMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn cache_shares_bases() {
        let mut cache = BasisCache::new();
        let a = cache.get(256, 10).unwrap();
        let b = cache.get(256, 10).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        let c = cache.get(512, 10).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);
        assert!(cache.get(0, 10).is_err());
        assert_eq!(cache.len(), 2);
    }
}
