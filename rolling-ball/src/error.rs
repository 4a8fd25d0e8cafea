//! Errors raised when a spectrum cannot be processed.
use crate::{Real, Stage};
use rolling_ball_common::metrics::failures::FailureKind;
use thiserror::Error;

/// Every way in which input to the rolling ball can be rejected.
///
/// These are detected once, before any stage runs, so no partial results exist on failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    #[error("Spectrum must not be empty")]
    EmptySequence,
    #[error("Spectrum must be a finite numeric sequence, found {value} at sample {index}")]
    NotASequence { index: usize, value: Real },
    #[error("Window radius {radius} of the {stage} stage is degenerate for a spectrum of length {len}")]
    DegenerateWindow {
        stage: Stage,
        radius: usize,
        len: usize,
    },
}

impl InvalidInput {
    pub(crate) fn failure_kind(&self) -> FailureKind {
        match self {
            Self::EmptySequence => FailureKind::EmptySequence,
            Self::NotASequence { .. } => FailureKind::NotASequence,
            Self::DegenerateWindow { .. } => FailureKind::DegenerateWindow,
        }
    }
}

/// Checks that `signal` is non-empty and contains only finite samples.
pub(crate) fn validate(signal: &[Real]) -> Result<(), InvalidInput> {
    if signal.is_empty() {
        return Err(InvalidInput::EmptySequence);
    }
    match signal.iter().position(|value| !value.is_finite()) {
        Some(index) => Err(InvalidInput::NotASequence {
            index,
            value: signal[index],
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_signal() {
        assert_eq!(validate(&[]), Err(InvalidInput::EmptySequence));
    }

    #[test]
    fn first_non_finite_sample_is_reported() {
        let signal = [1.0, 2.0, Real::INFINITY, Real::NAN];
        assert_eq!(
            validate(&signal),
            Err(InvalidInput::NotASequence {
                index: 2,
                value: Real::INFINITY
            })
        );
        assert!(matches!(
            validate(&[Real::NAN]),
            Err(InvalidInput::NotASequence { index: 0, .. })
        ));
    }

    #[test]
    fn finite_signal() {
        assert_eq!(validate(&[0.0, -1.5, 1e300]), Ok(()));
    }

    #[test]
    fn error_messages() {
        let error = InvalidInput::DegenerateWindow {
            stage: Stage::Smooth,
            radius: 10,
            len: 4,
        };
        assert_eq!(
            error.to_string(),
            "Window radius 10 of the smoothing stage is degenerate for a spectrum of length 4"
        );
    }
}
