#![feature(test)]

use lpcenv::{
    LatticeSynthesisFilter, LineSpectralFrequencies, LpcCepstrum, ReflectionCoefficients,
    coefficients::levinson_durbin, spectrum::SpectralBasis,
};
use test::Bencher;

extern crate test;

const REFLECTION: [f64; 18] = [
    0.92, -0.61, 0.33, -0.27, 0.18, 0.12, -0.2, 0.09, 0.05, -0.07, 0.11, -0.04, 0.03, 0.02,
    -0.05, 0.01, 0.02, -0.01,
];

fn autocorrelation() -> Vec<f64> {
    let signal = ReflectionCoefficients::new(&REFLECTION)
        .unwrap()
        .to_lpc()
        .synthesize(
            &(0..400)
                .map(|n| if n % 100 == 0 { 1.0 } else { 0.0 })
                .collect::<Vec<_>>(),
        );
    (0..=REFLECTION.len())
        .map(|lag| {
            signal
                .iter()
                .zip(&signal[lag..])
                .map(|(a, b)| a * b)
                .sum()
        })
        .collect()
}

#[bench]
fn levinson(bencher: &mut Bencher) {
    let r = autocorrelation();
    bencher.iter(|| levinson_durbin(&r, REFLECTION.len()).unwrap());
}

#[bench]
fn reflection_round_trip(bencher: &mut Bencher) {
    let lpc = ReflectionCoefficients::new(&REFLECTION).unwrap().to_lpc();
    bencher.iter(|| ReflectionCoefficients::from_lpc(&lpc).to_lpc());
}

#[bench]
fn cepstrum(bencher: &mut Bencher) {
    let lpc = ReflectionCoefficients::new(&REFLECTION).unwrap().to_lpc();
    bencher.iter(|| LpcCepstrum::from_lpc(&lpc, 0.5, 24).unwrap());
}

#[bench]
fn lsf(bencher: &mut Bencher) {
    let lpc = ReflectionCoefficients::new(&REFLECTION).unwrap().to_lpc();
    bencher.iter(|| LineSpectralFrequencies::from_lpc(&lpc).unwrap().to_lpc());
}

#[bench]
fn envelope_shared_basis(bencher: &mut Bencher) {
    let alpha = ReflectionCoefficients::new(&REFLECTION)
        .unwrap()
        .to_lpc()
        .predictor();
    let basis = SpectralBasis::new(512, alpha.len()).unwrap();
    bencher.iter(|| basis.evaluate(&alpha, 0.5).unwrap());
}

#[bench]
fn lattice(bencher: &mut Bencher) {
    let k = ReflectionCoefficients::new(&REFLECTION).unwrap();
    let excitation: Vec<f64> = (0..4800)
        .map(|n| if n % 120 == 0 { 1.0 } else { 0.0 })
        .collect();
    bencher.iter(|| LatticeSynthesisFilter::synthesize(&k, &excitation));
}
