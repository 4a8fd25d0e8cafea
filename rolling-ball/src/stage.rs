//! The three stages of the rolling ball, and the arrays they produce.
use crate::{Real, parameters::Windows};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// A single pass of the rolling ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Local minima of the spectrum.
    Minimize,
    /// Local maxima of the minima.
    Maximize,
    /// Local means of the maxima.
    Smooth,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Minimize, Stage::Maximize, Stage::Smooth];
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Minimize => "minimization",
            Self::Maximize => "maximization",
            Self::Smooth => "smoothing",
        })
    }
}

/// The output of every stage for one spectrum.
///
/// All arrays have the length of the spectrum they were computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stages {
    /// The radii the stages were computed with.
    pub windows: Windows,
    pub minima: Vec<Real>,
    pub maxima: Vec<Real>,
    pub baseline: Vec<Real>,
}

impl Stages {
    /// The array produced by the given stage.
    pub fn output(&self, stage: Stage) -> &[Real] {
        match stage {
            Stage::Minimize => &self.minima,
            Stage::Maximize => &self.maxima,
            Stage::Smooth => &self.baseline,
        }
    }
}

/// A baseline, together with the spectrum after the baseline has been subtracted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correction {
    pub baseline: Vec<Real>,
    pub corrected: Vec<Real>,
}

impl Correction {
    /// Subtracts `baseline` from `signal`, sample by sample.
    pub fn new(signal: &[Real], baseline: Vec<Real>) -> Self {
        let corrected = signal
            .iter()
            .zip(&baseline)
            .map(|(value, background)| value - background)
            .collect();
        Self {
            baseline,
            corrected,
        }
    }
}
