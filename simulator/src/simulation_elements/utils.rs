use num::{
    Float, Num, NumCast,
    traits::{Inv, NumOps},
};
use rand::Rng;
use rand_distr::{Distribution, Exp, Normal, Uniform, uniform::SampleUniform};
use serde::Deserialize;
use std::{
    env::{self, VarError},
    num::{ParseFloatError, ParseIntError},
    str::FromStr,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum JsonValueError {
    #[error("Cannot Extract Environment Variable")]
    EnvVar(#[from] VarError),
    #[error("Invalid String to Float: {0}")]
    FloatFromStr(#[from] ParseFloatError),
    #[error("Invalid String to Int: {0}")]
    IntFromStr(#[from] ParseIntError),
    #[error("Cannot convert from usize")]
    UsizeConvert,
    #[error("Invalid Uniform Distribution: {0}")]
    UniformDistribution(#[from] rand_distr::uniform::Error),
    #[error("Invalid Normal Distribution: {0}")]
    NormalDistribution(#[from] rand_distr::NormalError),
    #[error("Standard Deviation Must Be Non-Negative")]
    NegativeStandardDeviation,
    #[error("Invalid Exponential Distribution: {0}")]
    ExpDistribution(#[from] rand_distr::ExpError),
}

/// A number which may depend on the index of the spectrum being generated.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum NumExpression<T> {
    Const(T),
    FromEnvVar(String),
    NumFunc(Transformation<T>),
}

impl<T> NumExpression<T>
where
    T: Num + NumCast + FromStr + Copy,
    JsonValueError: From<<T as FromStr>::Err>,
{
    pub(crate) fn value(&self, spectrum_index: usize) -> Result<T, JsonValueError> {
        match self {
            Self::Const(v) => Ok(*v),
            Self::FromEnvVar(environment_variable) => Ok(env::var(environment_variable)?.parse()?),
            Self::NumFunc(index_function) => Ok(index_function.transform(
                NumCast::from::<usize>(spectrum_index).ok_or(JsonValueError::UsizeConvert)?,
            )),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case", tag = "random-type")]
pub(crate) enum FloatRandomDistribution<T> {
    ConstantFloat {
        value: NumExpression<T>,
    },
    UniformFloat {
        min: NumExpression<T>,
        max: NumExpression<T>,
    },
    Normal {
        mean: NumExpression<T>,
        sd: NumExpression<T>,
    },
    Exponential {
        lifetime: NumExpression<T>,
    },
}

impl<T> FloatRandomDistribution<T>
where
    T: Float + Inv<Output = T> + FromStr + SampleUniform,
    JsonValueError: From<<T as FromStr>::Err>,
    rand_distr::StandardNormal: Distribution<T>,
    rand_distr::Exp1: Distribution<T>,
{
    /// Draws a value using the generator of the spectrum being generated.
    pub(crate) fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        spectrum_index: usize,
    ) -> Result<T, JsonValueError> {
        match self {
            Self::ConstantFloat { value } => value.value(spectrum_index),
            Self::UniformFloat { min, max } => Ok(Uniform::<T>::new(
                min.value(spectrum_index)?,
                max.value(spectrum_index)?,
            )?
            .sample(rng)),
            Self::Normal { mean, sd } => {
                Ok(normal(mean.value(spectrum_index)?, sd.value(spectrum_index)?)?.sample(rng))
            }
            Self::Exponential { lifetime } => {
                Ok(Exp::new(lifetime.value(spectrum_index)?.inv())?.sample(rng))
            }
        }
    }
}

/// A normal distribution. Unlike [Normal::new], a negative `sd` is rejected.
pub(crate) fn normal<T>(mean: T, sd: T) -> Result<Normal<T>, JsonValueError>
where
    T: Float,
    rand_distr::StandardNormal: Distribution<T>,
{
    if sd.is_nan() || sd < T::zero() {
        return Err(JsonValueError::NegativeStandardDeviation);
    }
    Ok(Normal::new(mean, sd)?)
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct Interval<T>
where
    T: Clone,
{
    pub(crate) min: T,
    pub(crate) max: T,
}

impl<T> Interval<NumExpression<T>>
where
    T: Num + NumCast + FromStr + Copy + PartialOrd,
    JsonValueError: From<<T as FromStr>::Err>,
{
    pub(crate) fn is_in(&self, value: T, spectrum_index: usize) -> Result<bool, JsonValueError> {
        Ok((self.min.value(spectrum_index)?..=self.max.value(spectrum_index)?).contains(&value))
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct Transformation<T> {
    pub(crate) scale: T,
    pub(crate) translate: T,
}

impl<T: NumOps + Copy> Transformation<T> {
    pub(crate) fn transform(&self, x: T) -> T {
        x * self.scale + self.translate
    }
}
