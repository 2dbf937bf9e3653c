use std::f64::consts::PI;

use lpcenv::{
    AnalysisConfig, LatticeSynthesisFilter, LpcCoefficients, SpectralModel,
    spectrum::{BasisCache, to_db},
};

/// Formant frequencies and bandwidths (Hz) of an /a/.
const FORMANTS: [(f64, f64); 4] = [(730.0, 90.0), (1090.0, 110.0), (2440.0, 170.0), (3400.0, 250.0)];
const PITCH: f64 = 120.0;

fn formant_filter(sampling_rate: f64) -> Result<LpcCoefficients, Box<dyn std::error::Error>> {
    let mut polynomial = vec![1.0];
    for (frequency, bandwidth) in FORMANTS {
        let radius = (-PI * bandwidth / sampling_rate).exp();
        let theta = 2.0 * PI * frequency / sampling_rate;
        let section = [1.0, -2.0 * radius * theta.cos(), radius * radius];
        let mut product = vec![0.0; polynomial.len() + 2];
        for (i, p) in polynomial.iter().enumerate() {
            for (j, s) in section.iter().enumerate() {
                product[i + j] += p * s;
            }
        }
        polynomial = product;
    }
    Ok(LpcCoefficients::new(&polynomial)?)
}

fn pulse_train(len: usize, sampling_rate: f64) -> Vec<f64> {
    let period = (sampling_rate / PITCH).round() as usize;
    (0..len)
        .map(|n| if n % period == 0 { 1.0 } else { 0.0 })
        .collect()
}

fn autocorrelation(frame: &[f64], lags: usize) -> Vec<f64> {
    (0..=lags)
        .map(|lag| frame.iter().zip(&frame[lag..]).map(|(a, b)| a * b).sum())
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let output = std::env::args().nth(1).unwrap_or_else(|| "vowel.wav".to_string());
    let config = AnalysisConfig::for_sampling_rate(16000);
    let sampling_rate = config.get_sampling_rate() as f64;

    // "Recorded" vowel and one Hann-windowed 32 ms analysis frame of it.
    let reference = formant_filter(sampling_rate)?;
    let speech = reference.synthesize(&pulse_train(8000, sampling_rate));
    let frame_len = (0.032 * sampling_rate) as usize;
    let frame: Vec<f64> = speech[4000..4000 + frame_len]
        .iter()
        .enumerate()
        .map(|(n, x)| x * (0.5 - 0.5 * (2.0 * PI * n as f64 / (frame_len - 1) as f64).cos()))
        .collect();

    let mut model =
        SpectralModel::from_autocorrelation(&autocorrelation(&frame, config.get_order()), config.get_order())?;
    tracing::info!(
        order = model.order(),
        gain = model.gain(),
        stable = model.is_stable(),
        prediction_gain_db = model.lpc().prediction_gain_db(&frame),
        "estimated model"
    );

    let mut bases = BasisCache::new();
    let basis = bases.get(config.get_fft_size(), model.order())?;
    let envelope = to_db(&model.spectrum(&basis)?);
    for bin in 1..envelope.len() - 1 {
        if envelope[bin] > envelope[bin - 1] && envelope[bin] > envelope[bin + 1] {
            let frequency = bin as f64 * sampling_rate / config.get_fft_size() as f64;
            tracing::info!(frequency, level_db = envelope[bin], "envelope peak");
        }
    }

    let cepstrum = model.cepstrum(config.get_cepstrum_order())?;
    tracing::info!(c0 = cepstrum[0], order = cepstrum.order(), "cepstrum");

    let excitation = pulse_train(2 * sampling_rate as usize, sampling_rate);
    let resynthesized = LatticeSynthesisFilter::synthesize(&model.reflection(), &excitation);
    let peak = resynthesized
        .iter()
        .fold(0.0f64, |peak, x| peak.max(x.abs()))
        .max(f64::EPSILON);

    let mut writer = hound::WavWriter::create(
        &output,
        hound::WavSpec {
            channels: 1,
            sample_rate: config.get_sampling_rate() as u32,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        },
    )?;
    for x in resynthesized {
        writer.write_sample((0.8 * x / peak * i16::MAX as f64) as i16)?;
    }
    writer.finalize()?;

    println!("Wrote {output}.");
    Ok(())
}
