use super::{FloatRandomDistribution, utils::JsonValueError};
use rand::Rng;
use rolling_ball_common::Real;
use serde::Deserialize;
use std::f64::consts::TAU;

/// Describes the slowly varying background the pulses sit on. Lengths are in samples.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case", tag = "background-type")]
pub(crate) enum BackgroundTemplate {
    Constant {
        level: FloatRandomDistribution<Real>,
    },
    Linear {
        intercept: FloatRandomDistribution<Real>,
        slope: FloatRandomDistribution<Real>,
    },
    Sinusoidal {
        level: FloatRandomDistribution<Real>,
        amplitude: FloatRandomDistribution<Real>,
        period: FloatRandomDistribution<Real>,
        phase: FloatRandomDistribution<Real>,
    },
    ExponentialDecay {
        level: FloatRandomDistribution<Real>,
        amplitude: FloatRandomDistribution<Real>,
        decay_length: FloatRandomDistribution<Real>,
    },
}

/// A background whose parameters have been drawn from a [BackgroundTemplate].
#[derive(Debug)]
pub(crate) enum Background {
    Constant {
        level: Real,
    },
    Linear {
        intercept: Real,
        slope: Real,
    },
    Sinusoidal {
        level: Real,
        amplitude: Real,
        period: Real,
        phase: Real,
    },
    ExponentialDecay {
        level: Real,
        amplitude: Real,
        decay_length: Real,
    },
}

impl Background {
    pub(crate) fn sample<R: Rng + ?Sized>(
        template: &BackgroundTemplate,
        rng: &mut R,
        spectrum_index: usize,
    ) -> Result<Self, JsonValueError> {
        Ok(match template {
            BackgroundTemplate::Constant { level } => Self::Constant {
                level: level.sample(rng, spectrum_index)?,
            },
            BackgroundTemplate::Linear { intercept, slope } => Self::Linear {
                intercept: intercept.sample(rng, spectrum_index)?,
                slope: slope.sample(rng, spectrum_index)?,
            },
            BackgroundTemplate::Sinusoidal {
                level,
                amplitude,
                period,
                phase,
            } => Self::Sinusoidal {
                level: level.sample(rng, spectrum_index)?,
                amplitude: amplitude.sample(rng, spectrum_index)?,
                period: period.sample(rng, spectrum_index)?,
                phase: phase.sample(rng, spectrum_index)?,
            },
            BackgroundTemplate::ExponentialDecay {
                level,
                amplitude,
                decay_length,
            } => Self::ExponentialDecay {
                level: level.sample(rng, spectrum_index)?,
                amplitude: amplitude.sample(rng, spectrum_index)?,
                decay_length: decay_length.sample(rng, spectrum_index)?,
            },
        })
    }

    pub(crate) fn value_at(&self, position: Real) -> Real {
        match *self {
            Self::Constant { level } => level,
            Self::Linear { intercept, slope } => intercept + slope * position,
            Self::Sinusoidal {
                level,
                amplitude,
                period,
                phase,
            } => level + amplitude * Real::sin(TAU * position / period + phase),
            Self::ExponentialDecay {
                level,
                amplitude,
                decay_length,
            } => level + amplitude * Real::exp(-position / decay_length),
        }
    }
}
