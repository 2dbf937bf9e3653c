//! Analysis settings shared by a batch of frames.

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    /// A setting is zero or otherwise unusable
    #[error("invalid value for `{name}`: {value}")]
    InvalidValue { name: &'static str, value: usize },
}

/// LPC order for a sampling rate: `fs / 1000 + 2`, rounded up to even.
pub fn default_order(sampling_rate: usize) -> usize {
    let order = sampling_rate / 1000 + 2;
    order + order % 2
}

/// Spectrum FFT size for a sampling rate.
pub fn default_fft_size(sampling_rate: usize) -> usize {
    match sampling_rate {
        ..=8000 => 128,
        ..=16000 => 256,
        ..=22050 => 512,
        ..=32000 => 1024,
        ..=44100 => 2048,
        _ => 4096,
    }
}

const DEFAULT_SAMPLING_RATE: usize = 16000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ConfigFile", into = "ConfigFile")]
pub struct AnalysisConfig {
    /// Sampling frequency (Hz)
    sampling_rate: usize,
    /// LPC order
    order: usize,
    /// Cepstrum order
    cepstrum_order: usize,
    /// FFT size of the spectral envelope grid
    fft_size: usize,
}

/// On-disk form; omitted settings follow the sampling rate.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    sampling_rate: Option<usize>,
    order: Option<usize>,
    cepstrum_order: Option<usize>,
    fft_size: Option<usize>,
}

impl From<ConfigFile> for AnalysisConfig {
    fn from(file: ConfigFile) -> Self {
        let mut config = Self::for_sampling_rate(file.sampling_rate.unwrap_or(DEFAULT_SAMPLING_RATE));
        if let Some(order) = file.order {
            config.order = order;
            config.cepstrum_order = order;
        }
        if let Some(cepstrum_order) = file.cepstrum_order {
            config.cepstrum_order = cepstrum_order;
        }
        if let Some(fft_size) = file.fft_size {
            config.fft_size = fft_size;
        }
        config
    }
}

impl From<AnalysisConfig> for ConfigFile {
    fn from(config: AnalysisConfig) -> Self {
        Self {
            sampling_rate: Some(config.sampling_rate),
            order: Some(config.order),
            cepstrum_order: Some(config.cepstrum_order),
            fft_size: Some(config.fft_size),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::for_sampling_rate(DEFAULT_SAMPLING_RATE)
    }
}

impl AnalysisConfig {
    /// Defaults derived from the sampling rate.
    pub fn for_sampling_rate(sampling_rate: usize) -> Self {
        let order = default_order(sampling_rate);
        Self {
            sampling_rate,
            order,
            cepstrum_order: order,
            fft_size: default_fft_size(sampling_rate),
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("sampling_rate", self.sampling_rate),
            ("order", self.order),
            ("cepstrum_order", self.cepstrum_order),
            ("fft_size", self.fft_size),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue { name, value });
            }
        }
        Ok(())
    }

    /// Set sampling frequency (Hz), 1 <= i
    pub fn set_sampling_rate(&mut self, i: usize) {
        self.sampling_rate = i.max(1);
    }
    /// Get sampling frequency (Hz)
    pub fn get_sampling_rate(&self) -> usize {
        self.sampling_rate
    }

    /// Set LPC order, 1 <= i
    pub fn set_order(&mut self, i: usize) {
        self.order = i.max(1);
    }
    /// Get LPC order
    pub fn get_order(&self) -> usize {
        self.order
    }

    /// Set cepstrum order, 1 <= i
    pub fn set_cepstrum_order(&mut self, i: usize) {
        self.cepstrum_order = i.max(1);
    }
    /// Get cepstrum order
    pub fn get_cepstrum_order(&self) -> usize {
        self.cepstrum_order
    }

    /// Set FFT size, 2 <= i
    pub fn set_fft_size(&mut self, i: usize) {
        self.fft_size = i.max(2);
    }
    /// Get FFT size
    pub fn get_fft_size(&self) -> usize {
        self.fft_size
    }
}
