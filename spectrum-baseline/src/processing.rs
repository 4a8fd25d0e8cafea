//! Applies the rolling ball to the spectra read from the input.
use crate::{
    parameters::OutputKind,
    spectra::{Output, Spectra},
};
use rolling_ball::{Correction, InvalidInput, RollingBall};

/// Computes the requested output for every spectrum.
///
/// # Parameters
/// - engine: the configured rolling ball.
/// - spectra: the spectra to process.
/// - kind: what is to be computed for each spectrum.
#[tracing::instrument(
    skip_all,
    fields(strategy = %engine.strategy(), num_spectra = spectra.num_spectra(), ?kind)
)]
pub(crate) fn process(
    engine: &RollingBall,
    spectra: &Spectra,
    kind: OutputKind,
) -> Result<Output, InvalidInput> {
    match (spectra, kind) {
        (Spectra::Single(signal), OutputKind::Baseline) => {
            engine.baseline(signal).map(Output::Single)
        }
        (Spectra::Single(signal), OutputKind::Corrected) => engine
            .correct(signal)
            .map(|correction| Output::Single(correction.corrected)),
        (Spectra::Single(signal), OutputKind::Stages) => engine.stages(signal).map(Output::Stages),
        (Spectra::Batch(spectra), OutputKind::Baseline) => {
            engine.baseline_batch(spectra).map(Output::Batch)
        }
        (Spectra::Batch(spectra), OutputKind::Corrected) => {
            engine.baseline_batch(spectra).map(|baselines| {
                Output::Batch(
                    spectra
                        .iter()
                        .zip(baselines)
                        .map(|(signal, baseline)| Correction::new(signal, baseline).corrected)
                        .collect(),
                )
            })
        }
        (Spectra::Batch(spectra), OutputKind::Stages) => spectra
            .iter()
            .map(|signal| engine.stages(signal))
            .collect::<Result<Vec<_>, _>>()
            .map(Output::StagesBatch),
    }
}
