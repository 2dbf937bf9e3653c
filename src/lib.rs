//! Linear prediction spectral models for voice building.
//!
//! A frame's autocorrelation is reduced to LPC coefficients and a gain by
//! [`coefficients::levinson_durbin`]. The result is held by a
//! [`SpectralModel`], which converts on demand to reflection coefficients,
//! LPC cepstrum and line spectral frequencies, and evaluates the smoothed
//! magnitude envelope through [`spectrum::SpectralBasis`].
//!
//! ```
//! use lpcenv::{SpectralModel, spectrum::SpectralBasis};
//!
//! let mut model = SpectralModel::from_autocorrelation(&[1.0, 0.8, 0.5, 0.2], 2)?;
//! assert!(model.is_stable());
//!
//! let cepstrum = model.cepstrum(12)?;
//! assert_eq!(cepstrum.order(), 12);
//!
//! let basis = SpectralBasis::new(256, model.order())?;
//! let envelope = model.spectrum(&basis)?;
//! assert_eq!(envelope.len(), 129);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod coefficients;
pub mod config;
pub mod spectral_model;
pub mod spectrum;
pub mod track;

pub use coefficients::{
    CoefficientError, LatticeSynthesisFilter, LineSpectralFrequencies, LpcCepstrum,
    LpcCoefficients, ReflectionCoefficients,
};
pub use config::AnalysisConfig;
pub use spectral_model::SpectralModel;
