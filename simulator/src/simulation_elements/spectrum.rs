use super::{
    NumExpression,
    background::{Background, BackgroundTemplate},
    noise::{Noise, NoiseSource},
    pulses::{PulseEvent, PulseTemplate},
    utils::JsonValueError,
};
use rand::Rng;
use rolling_ball_common::Real;
use serde::Deserialize;
use tracing::{instrument, trace};

/// Describes how one spectrum is generated.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct SpectrumTemplate {
    /// Number of samples in the spectrum.
    pub(crate) length: NumExpression<usize>,
    pub(crate) background: BackgroundTemplate,
    #[serde(default)]
    pub(crate) pulses: Vec<PulseTemplate>,
    #[serde(default)]
    pub(crate) noise: Option<NoiseSource>,
}

impl SpectrumTemplate {
    /// Draws the background and pulses, then evaluates them, with noise, at every sample.
    #[instrument(
        skip_all,
        level = "debug",
        fields(spectrum_index = spectrum_index, length),
        err(level = "error")
    )]
    pub(crate) fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        spectrum_index: usize,
    ) -> Result<Vec<Real>, JsonValueError> {
        let length = self.length.value(spectrum_index)?;
        tracing::Span::current().record("length", length);

        let background = Background::sample(&self.background, rng, spectrum_index)?;
        let pulses = self
            .pulses
            .iter()
            .map(|template| PulseEvent::sample(template, rng, spectrum_index))
            .collect::<Result<Vec<_>, _>>()?;
        trace!("Background: {background:?}, pulses: {pulses:?}");

        let mut noise = self.noise.as_ref().map(Noise::new);
        (0..length)
            .map(|position| {
                let x = position as Real;
                let value = background.value_at(x)
                    + pulses.iter().map(|pulse| pulse.value_at(x)).sum::<Real>();
                match noise.as_mut() {
                    Some(noise) => noise.noisify(rng, value, position, spectrum_index),
                    None => Ok(value),
                }
            })
            .collect()
    }
}
