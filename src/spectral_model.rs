//! Per-frame spectral model with lazily derived representations.

use serde::{Deserialize, Serialize};

use crate::{
    coefficients::{
        CoefficientError, LineSpectralFrequencies, LpcCepstrum, LpcCoefficients,
        ReflectionCoefficients, levinson_durbin,
    },
    spectrum::{SpectralBasis, SpectrumError},
};

/// Which authoritative field a setter touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Lpc,
    Gain,
}

#[derive(Debug, Clone, Default)]
struct Cache {
    reflection: Option<ReflectionCoefficients>,
    /// Remembers its own order; a request for another order recomputes.
    cepstrum: Option<LpcCepstrum>,
    lsf: Option<LineSpectralFrequencies>,
}

impl Cache {
    /// | change | reflection | cepstrum | lsf  |
    /// |--------|------------|----------|------|
    /// | Lpc    | drop       | drop     | drop |
    /// | Gain   | keep       | drop     | keep |
    fn invalidate(&mut self, change: Change) {
        match change {
            Change::Lpc => *self = Self::default(),
            Change::Gain => self.cepstrum = None,
        }
    }
}

/// The authoritative `(oneMinusA, gain)` pair of one analysis frame, plus
/// memoized reflection, cepstrum and LSF views of it.
///
/// Every setter clears the caches that depend on what it changed. Accessors
/// for derived forms fill the cache on first use and return owned copies.
///
/// The lazy fill needs `&mut self`; call [`fill_caches`](Self::fill_caches)
/// before sharing a model across threads read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StoredModel", into = "StoredModel")]
pub struct SpectralModel {
    lpc: LpcCoefficients,
    gain: f64,
    cache: Cache,
}

#[derive(Serialize, Deserialize)]
struct StoredModel {
    lpc: LpcCoefficients,
    gain: f64,
}

impl TryFrom<StoredModel> for SpectralModel {
    type Error = CoefficientError;
    fn try_from(value: StoredModel) -> Result<Self, Self::Error> {
        Self::new(value.lpc, value.gain)
    }
}

impl From<SpectralModel> for StoredModel {
    fn from(value: SpectralModel) -> Self {
        Self {
            lpc: value.lpc,
            gain: value.gain,
        }
    }
}

impl PartialEq for SpectralModel {
    fn eq(&self, other: &Self) -> bool {
        self.lpc == other.lpc && self.gain == other.gain
    }
}

fn check_gain(gain: f64) -> Result<f64, CoefficientError> {
    // NaN passes; non-finite gains are reported downstream, not rejected.
    if gain < 0.0 {
        Err(CoefficientError::NegativeGain(gain))
    } else {
        Ok(gain)
    }
}

impl SpectralModel {
    pub fn new(lpc: LpcCoefficients, gain: f64) -> Result<Self, CoefficientError> {
        Ok(Self {
            lpc,
            gain: check_gain(gain)?,
            cache: Cache::default(),
        })
    }

    pub fn from_one_minus_a(one_minus_a: &[f64], gain: f64) -> Result<Self, CoefficientError> {
        Self::new(LpcCoefficients::new(one_minus_a)?, gain)
    }

    /// Estimate an order-`order` model with [`levinson_durbin`].
    pub fn from_autocorrelation(
        autocorrelation: &[f64],
        order: usize,
    ) -> Result<Self, CoefficientError> {
        let (lpc, gain) = levinson_durbin(autocorrelation, order)?;
        // The estimated gain is a square root and may only be NaN, never negative.
        Ok(Self {
            lpc,
            gain,
            cache: Cache::default(),
        })
    }

    fn apply(&mut self, change: Change) {
        self.cache.invalidate(change);
    }

    pub fn lpc(&self) -> &LpcCoefficients {
        &self.lpc
    }
    pub fn gain(&self) -> f64 {
        self.gain
    }
    /// Prediction order `p`.
    pub fn order(&self) -> usize {
        self.lpc.order()
    }
    /// Predictor coefficients `[a_1, ..., a_p]`.
    pub fn predictor(&self) -> Vec<f64> {
        self.lpc.predictor()
    }

    pub fn set_lpc(&mut self, lpc: LpcCoefficients) {
        self.lpc = lpc;
        self.apply(Change::Lpc);
    }

    pub fn set_predictor(&mut self, predictor: &[f64]) -> Result<(), CoefficientError> {
        self.set_lpc(LpcCoefficients::from_predictor(predictor)?);
        Ok(())
    }

    /// Replace `oneMinusA[index]`, `1 <= index <= order`.
    pub fn set_coefficient(&mut self, index: usize, value: f64) -> Result<(), CoefficientError> {
        let lpc = self.lpc.with_coefficient(index, value)?;
        self.set_lpc(lpc);
        Ok(())
    }

    pub fn set_gain(&mut self, gain: f64) -> Result<(), CoefficientError> {
        self.gain = check_gain(gain)?;
        self.apply(Change::Gain);
        Ok(())
    }

    /// Replace the model by the one the reflection coefficients describe.
    /// The order follows `reflection.order()`; the gain is kept.
    pub fn set_reflection(&mut self, reflection: &ReflectionCoefficients) {
        self.set_lpc(reflection.to_lpc());
    }

    /// Replace the model by an order-`order` fit of `cepstrum`, with
    /// `gain = exp(c[0])`.
    pub fn set_cepstrum(
        &mut self,
        cepstrum: &LpcCepstrum,
        order: usize,
    ) -> Result<(), CoefficientError> {
        let lpc = cepstrum.to_lpc(order)?;
        let gain = check_gain(cepstrum.gain())?;
        self.lpc = lpc;
        self.gain = gain;
        self.apply(Change::Lpc);
        Ok(())
    }

    /// Replace the model by the one the line spectral frequencies describe.
    /// The gain is kept.
    pub fn set_lsf(&mut self, lsf: &LineSpectralFrequencies) {
        self.set_lpc(lsf.to_lpc());
    }

    pub fn reflection(&mut self) -> ReflectionCoefficients {
        self.cache
            .reflection
            .get_or_insert_with(|| ReflectionCoefficients::from_lpc(&self.lpc))
            .clone()
    }

    /// Cepstrum of order `order`; `c[0] = ln(gain)`.
    pub fn cepstrum(&mut self, order: usize) -> Result<LpcCepstrum, CoefficientError> {
        if let Some(cepstrum) = &self.cache.cepstrum {
            if cepstrum.order() == order {
                return Ok(cepstrum.clone());
            }
        }
        let cepstrum = LpcCepstrum::from_lpc(&self.lpc, self.gain, order)?;
        self.cache.cepstrum = Some(cepstrum.clone());
        Ok(cepstrum)
    }

    /// Line spectral frequencies; fails for odd orders.
    pub fn lsf(&mut self) -> Result<LineSpectralFrequencies, CoefficientError> {
        if let Some(lsf) = &self.cache.lsf {
            return Ok(lsf.clone());
        }
        let lsf = LineSpectralFrequencies::from_lpc(&self.lpc)?;
        self.cache.lsf = Some(lsf.clone());
        Ok(lsf)
    }

    /// Whether every reflection coefficient is in `[-1, 1]`.
    pub fn is_stable(&mut self) -> bool {
        self.cache
            .reflection
            .get_or_insert_with(|| ReflectionCoefficients::from_lpc(&self.lpc))
            .is_stable()
    }

    /// Compute every derived form now.
    ///
    /// LSF is skipped for odd orders, where it is undefined.
    pub fn fill_caches(&mut self, cepstrum_order: usize) -> Result<(), CoefficientError> {
        self.reflection();
        self.cepstrum(cepstrum_order)?;
        if self.order() % 2 == 0 {
            self.lsf()?;
        }
        Ok(())
    }

    pub fn cached_reflection(&self) -> Option<&ReflectionCoefficients> {
        self.cache.reflection.as_ref()
    }
    pub fn cached_cepstrum(&self) -> Option<&LpcCepstrum> {
        self.cache.cepstrum.as_ref()
    }
    pub fn cached_lsf(&self) -> Option<&LineSpectralFrequencies> {
        self.cache.lsf.as_ref()
    }

    /// Linear magnitude envelope on `basis`'s grid.
    pub fn spectrum(&self, basis: &SpectralBasis) -> Result<Vec<f64>, SpectrumError> {
        basis.evaluate(&self.predictor(), self.gain)
    }
}
