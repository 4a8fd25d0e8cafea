//! Deterministic spectra shared by the tests.
use crate::Real;
use std::f64::consts::TAU;

fn gaussian(x: Real, height: Real, centre: Real, sd: Real) -> Real {
    height * (-0.5 * ((x - centre) / sd).powi(2)).exp()
}

/// A slowly varying background with narrow peaks every 150 samples.
///
/// No peak lies within 135 samples of either end.
pub(crate) fn peaked_spectrum(len: usize) -> Vec<Real> {
    let centres = (1..)
        .map(|k| 150 * k)
        .take_while(|centre| centre + 150 <= len)
        .collect::<Vec<_>>();
    (0..len)
        .map(|i| {
            let x = i as Real;
            let background = 1000.0 + 30.0 * (TAU * x / len as Real).sin();
            centres
                .iter()
                .map(|&centre| gaussian(x, 500.0, centre as Real, 3.0))
                .fold(background, |value, peak| value + peak)
        })
        .collect()
}

/// A decaying background with peaks 30 and 60 samples from either end,
/// and further peaks every 150 samples between them.
pub(crate) fn edge_peaked_spectrum(len: usize) -> Vec<Real> {
    let centres = [30, 60, len - 61, len - 31]
        .into_iter()
        .chain(
            (1..)
                .map(|k| 150 * k)
                .take_while(|centre| centre + 150 <= len),
        )
        .collect::<Vec<_>>();
    (0..len)
        .map(|i| {
            let x = i as Real;
            let background = 600.0 + 300.0 * (-x / 800.0).exp();
            centres
                .iter()
                .map(|&centre| gaussian(x, 400.0, centre as Real, 3.0))
                .fold(background, |value, peak| value + peak)
        })
        .collect()
}

/// A background fluctuating with a period of roughly 31 samples.
pub(crate) fn fluctuating_spectrum(len: usize) -> Vec<Real> {
    (0..len)
        .map(|i| 100.0 + 10.0 * (i as Real / 5.0).sin())
        .collect()
}
