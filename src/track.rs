//! Flat per-frame vectors as stored in coefficient tracks.
//!
//! An LPC track frame of order `p` has `p + 1` slots: slot 0 holds the gain
//! and slots `1..=p` hold `oneMinusA[1..=p]`. A cepstrum track frame of order
//! `m` holds `c[0..=m]` directly, `c[0]` carrying the log gain.

use std::io::{self, Read, Write};

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use crate::{
    coefficients::{CoefficientError, LpcCoefficients},
    config::AnalysisConfig,
    spectral_model::SpectralModel,
};

#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Coefficient(#[from] CoefficientError),
    /// A frame in a batch could not be turned into a model.
    #[error("Frame {index} is invalid: {source}")]
    InvalidFrame {
        index: usize,
        #[source]
        source: CoefficientError,
    },
    #[error("Frame {index} has {actual} values; expected {expected}")]
    FrameLength {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Frame dimension must be at least 1")]
    ZeroDimension,
}

/// Read gain from slot 0 and `oneMinusA[1..=p]` from the remaining slots.
pub fn model_from_lpc_frame(frame: &[f64]) -> Result<SpectralModel, CoefficientError> {
    let Some((&gain, coefficients)) = frame.split_first() else {
        return Err(CoefficientError::ZeroOrder);
    };
    let mut one_minus_a = Vec::with_capacity(frame.len());
    one_minus_a.push(1.0);
    one_minus_a.extend_from_slice(coefficients);
    SpectralModel::new(LpcCoefficients::new(&one_minus_a)?, gain)
}

/// Inverse of [`model_from_lpc_frame`].
pub fn lpc_frame_from_model(model: &SpectralModel) -> Vec<f64> {
    let mut frame = model.lpc().to_vec();
    frame[0] = model.gain();
    frame
}

/// Cepstrum frame of order `cepstrum_order` for one LPC frame.
pub fn cepstrum_frame_from_lpc_frame(
    frame: &[f64],
    cepstrum_order: usize,
) -> Result<Vec<f64>, CoefficientError> {
    let mut model = model_from_lpc_frame(frame)?;
    Ok(model.cepstrum(cepstrum_order)?.into())
}

/// Convert a whole LPC track into a cepstrum track.
///
/// Every frame must have `order + 1` values. Unstable frames and frames with
/// a non-finite gain are converted anyway and reported through `tracing`.
pub fn convert_lpc_track(
    frames: &[Vec<f64>],
    config: &AnalysisConfig,
) -> Result<Vec<Vec<f64>>, TrackError> {
    let expected = config.get_order() + 1;
    let cepstrum_order = config.get_cepstrum_order();

    let mut unstable = 0;
    let cepstra = frames
        .iter()
        .enumerate()
        .map(|(index, frame)| {
            if frame.len() != expected {
                return Err(TrackError::FrameLength {
                    index,
                    expected,
                    actual: frame.len(),
                });
            }
            let mut model = model_from_lpc_frame(frame)
                .map_err(|source| TrackError::InvalidFrame { index, source })?;

            if !model.gain().is_finite() {
                tracing::warn!(frame = index, gain = model.gain(), "non-finite gain");
            }
            if !model.is_stable() {
                unstable += 1;
                tracing::warn!(frame = index, "unstable LPC model");
            }

            let cepstrum = model
                .cepstrum(cepstrum_order)
                .map_err(|source| TrackError::InvalidFrame { index, source })?;
            Ok(cepstrum.into())
        })
        .collect::<Result<Vec<Vec<f64>>, TrackError>>()?;

    tracing::debug!(frames = cepstra.len(), unstable, "converted LPC track");
    Ok(cepstra)
}

/// Write frames as consecutive big-endian `f32` values, without a header.
///
/// All frames must have the length of the first one.
pub fn write_frames(mut writer: impl Write, frames: &[Vec<f64>]) -> Result<(), TrackError> {
    let Some(first) = frames.first() else {
        return Ok(());
    };
    let dimension = first.len();
    if dimension == 0 {
        return Err(TrackError::ZeroDimension);
    }
    for (index, frame) in frames.iter().enumerate() {
        if frame.len() != dimension {
            return Err(TrackError::FrameLength {
                index,
                expected: dimension,
                actual: frame.len(),
            });
        }
        for &value in frame {
            writer.write_f32::<BigEndian>(value as f32)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Read frames of `dimension` big-endian `f32` values until the end of input.
///
/// A partial trailing frame is an [`io::ErrorKind::UnexpectedEof`] error.
pub fn read_frames(mut reader: impl Read, dimension: usize) -> Result<Vec<Vec<f64>>, TrackError> {
    if dimension == 0 {
        return Err(TrackError::ZeroDimension);
    }
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let frame_bytes = dimension * size_of::<f32>();
    if bytes.len() % frame_bytes != 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "{} trailing bytes do not make up a frame of {} values",
                bytes.len() % frame_bytes,
                dimension
            ),
        )
        .into());
    }

    Ok(bytes
        .chunks_exact(frame_bytes)
        .map(|frame| {
            frame
                .chunks_exact(size_of::<f32>())
                .map(|value| BigEndian::read_f32(value) as f64)
                .collect()
        })
        .collect())
}
