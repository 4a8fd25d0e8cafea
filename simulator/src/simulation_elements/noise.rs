use super::{
    Interval, NumExpression,
    utils::{JsonValueError, normal},
};
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use rolling_ball_common::{Real, SampleIndex};
use serde::Deserialize;
use std::collections::VecDeque;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct NoiseSource {
    /// Sample positions to which noise is added. If absent, noise is added to the whole spectrum.
    #[serde(default)]
    bounds: Option<Interval<NumExpression<SampleIndex>>>,
    attributes: NoiseAttributes,
    /// Length of the moving average window to apply to the noise.
    /// If no smoothing is required, set this to
    /// ```json
    /// "smoothing-window-length": { "const": 1 }
    /// ```
    smoothing_window_length: NumExpression<usize>,
}

impl NoiseSource {
    pub(crate) fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        position: SampleIndex,
        spectrum_index: usize,
    ) -> Result<Real, JsonValueError> {
        let in_bounds = match &self.bounds {
            Some(bounds) => bounds.is_in(position, spectrum_index)?,
            None => true,
        };
        if !in_bounds {
            return Ok(Real::default());
        }
        match &self.attributes {
            NoiseAttributes::Uniform(Interval { min, max }) => Ok(Uniform::<Real>::new_inclusive(
                min.value(spectrum_index)?,
                max.value(spectrum_index)?,
            )?
            .sample(rng)),
            NoiseAttributes::Gaussian { mean, sd } => {
                Ok(normal(mean.value(spectrum_index)?, sd.value(spectrum_index)?)?.sample(rng))
            }
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "noise-type")]
pub(crate) enum NoiseAttributes {
    Uniform(Interval<NumExpression<Real>>),
    Gaussian {
        mean: NumExpression<Real>,
        sd: NumExpression<Real>,
    },
}

/// Adds smoothed noise to successive samples of one spectrum.
pub(crate) struct Noise<'a> {
    source: &'a NoiseSource,
    prev: VecDeque<Real>,
}

impl<'a> Noise<'a> {
    pub(crate) fn new(source: &'a NoiseSource) -> Self {
        Self {
            source,
            prev: Default::default(),
        }
    }

    pub(crate) fn noisify<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        value: Real,
        position: SampleIndex,
        spectrum_index: usize,
    ) -> Result<Real, JsonValueError> {
        let window_len = self
            .source
            .smoothing_window_length
            .value(spectrum_index)?
            .max(1);
        while self.prev.len() >= window_len {
            self.prev.pop_front();
        }
        self.prev
            .push_back(self.source.sample(rng, position, spectrum_index)?);
        Ok(value + self.prev.iter().sum::<Real>() / self.prev.len() as Real)
    }
}
