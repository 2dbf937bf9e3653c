//! Levinson-Durbin estimation of LPC coefficients from an autocorrelation sequence.

use super::{CoefficientError, LpcCoefficients};

/// Solve the order-`order` Toeplitz normal equations for the prediction error filter.
///
/// Returns `oneMinusA` together with the gain `sqrt(Σ oneMinusA[i] · r[i])`.
///
/// Lags beyond `autocorrelation.len() - 1` are taken as zero, so short frames
/// still produce a full order-`order` model. An all-zero sequence is not
/// special-cased and yields non-finite coefficients; callers perturb silent
/// frames upstream.
pub fn levinson_durbin(
    autocorrelation: &[f64],
    order: usize,
) -> Result<(LpcCoefficients, f64), CoefficientError> {
    if order == 0 {
        return Err(CoefficientError::ZeroOrder);
    }
    if autocorrelation.is_empty() {
        return Err(CoefficientError::EmptyAutocorrelation);
    }

    let mut r = vec![0.0; order + 1];
    let available = autocorrelation.len().min(order + 1);
    r[..available].copy_from_slice(&autocorrelation[..available]);

    let mut a = vec![0.0; order + 1];
    a[0] = 1.0;
    let mut error = r[0];

    for i in 1..=order {
        let gap: f64 = (0..i).map(|j| a[j] * r[i - j]).sum();
        let k = -gap / error;

        // A_i[j] = A_{i-1}[j] + k · A_{i-1}[i-j], updated pairwise in place.
        for j in 1..=i / 2 {
            let lo = a[j];
            let hi = a[i - j];
            a[j] = lo + k * hi;
            if j != i - j {
                a[i - j] = hi + k * lo;
            }
        }
        a[i] = k;

        error *= 1.0 - k * k;
    }

    let energy: f64 = a.iter().zip(&r).map(|(a, r)| a * r).sum();

    Ok((LpcCoefficients::from_raw(a), energy.sqrt()))
}
