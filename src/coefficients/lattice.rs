use super::ReflectionCoefficients;

/// All-pole lattice synthesis filter driven by reflection coefficients.
///
/// Stage `i` (from `p` down to `1`) computes
/// `f_{i-1}(n) = f_i(n) + k_i · b_{i-1}(n-1)` and
/// `b_i(n) = b_{i-1}(n-1) - k_i · f_{i-1}(n)`, with `f_p(n)` the excitation
/// and `y(n) = f_0(n) = b_0(n)`. The transfer function equals `1 / A(z)` of
/// the equivalent [`LpcCoefficients`](super::LpcCoefficients).
#[derive(Debug, Clone)]
pub struct LatticeSynthesisFilter {
    reflection: ReflectionCoefficients,
    /// `backward[i]` holds `b_i(n-1)`; `backward.len() == order + 1`.
    backward: Vec<f64>,
}

impl LatticeSynthesisFilter {
    /// Create a filter with zero initial state.
    pub fn new(reflection: ReflectionCoefficients) -> Self {
        let backward = vec![0.0; reflection.order() + 1];
        Self {
            reflection,
            backward,
        }
    }

    pub fn reflection(&self) -> &ReflectionCoefficients {
        &self.reflection
    }

    /// Clear the delay line.
    pub fn reset(&mut self) {
        self.backward.fill(0.0);
    }

    /// Filter one sample.
    #[inline]
    pub fn filter(&mut self, x: f64) -> f64 {
        let mut forward = x;
        for i in (1..=self.reflection.order()).rev() {
            let k = self.reflection[i - 1];
            forward += k * self.backward[i - 1];
            self.backward[i] = self.backward[i - 1] - k * forward;
        }
        self.backward[0] = forward;
        forward
    }

    /// Filter a whole excitation sequence from zero state.
    ///
    /// The output has the same length as `excitation`.
    pub fn synthesize(reflection: &ReflectionCoefficients, excitation: &[f64]) -> Vec<f64> {
        let mut lattice = Self::new(reflection.clone());
        excitation.iter().map(|&x| lattice.filter(x)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::LatticeSynthesisFilter;
    use crate::coefficients::ReflectionCoefficients;

    fn excitation(len: usize) -> Vec<f64> {
        // Pulse train with period 40 plus a deterministic ripple.
        (0..len)
            .map(|n| {
                let pulse = if n % 40 == 0 { 1.0 } else { 0.0 };
                pulse + 0.01 * ((n * 13 % 17) as f64 - 8.0)
            })
            .collect()
    }

    #[test]
    fn first_order_recursion() {
        let k = ReflectionCoefficients::new(&[0.5]).unwrap();
        let mut impulse = vec![0.0; 6];
        impulse[0] = 1.0;
        let y = LatticeSynthesisFilter::synthesize(&k, &impulse);
        for (n, y) in y.iter().enumerate() {
            approx::assert_abs_diff_eq!(*y, 0.5f64.powi(n as i32), epsilon = 1.0e-12);
        }
    }

    #[test]
    fn matches_direct_form() {
        let k = ReflectionCoefficients::new(&[0.95, -0.7, 0.4, 0.2, -0.1, 0.3, -0.25, 0.15])
            .unwrap();
        let x = excitation(400);
        let lattice = LatticeSynthesisFilter::synthesize(&k, &x);
        let direct = k.to_lpc().synthesize(&x);
        assert_eq!(lattice.len(), x.len());
        for (l, d) in lattice.iter().zip(&direct) {
            approx::assert_abs_diff_eq!(l, d, epsilon = 1.0e-9);
        }
    }

    #[test]
    fn reset_restores_zero_state() {
        let k = ReflectionCoefficients::new(&[0.6, -0.2, 0.1]).unwrap();
        let x = excitation(64);
        let mut lattice = LatticeSynthesisFilter::new(k.clone());
        let first: Vec<f64> = x.iter().map(|&v| lattice.filter(v)).collect();
        lattice.reset();
        let second: Vec<f64> = x.iter().map(|&v| lattice.filter(v)).collect();
        assert_eq!(first, second);
        assert_eq!(lattice.reflection(), &k);
    }

    #[test]
    fn empty_excitation() {
        let k = ReflectionCoefficients::new(&[0.3]).unwrap();
        assert!(LatticeSynthesisFilter::synthesize(&k, &[]).is_empty());
    }
}
