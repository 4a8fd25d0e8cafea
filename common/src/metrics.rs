//! Metric names and labels emitted by the rolling ball components.
//!
//! No recorder is installed by the library itself, so these are no-ops unless the embedding
//! application installs one.
use ::metrics::{Unit, describe_counter};

pub mod names {
    use const_format::concatcp;

    pub const METRIC_NAME_PREFIX: &str = "rolling_ball_";

    pub const SPECTRA_PROCESSED: &str = concatcp!(METRIC_NAME_PREFIX, "spectra_processed");
    pub const FAILURES: &str = concatcp!(METRIC_NAME_PREFIX, "failures");
    pub const EXTREMUM_RESCANS: &str = concatcp!(METRIC_NAME_PREFIX, "extremum_rescans");
    pub const RUNNING_SUM_RESYNCS: &str = concatcp!(METRIC_NAME_PREFIX, "running_sum_resyncs");
}

pub mod failures {
    /// The reason a spectrum was rejected.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum FailureKind {
        EmptySequence,
        NotASequence,
        DegenerateWindow,
    }

    pub fn get_label(kind: FailureKind) -> (&'static str, &'static str) {
        let label = match kind {
            FailureKind::EmptySequence => "empty_sequence",
            FailureKind::NotASequence => "not_a_sequence",
            FailureKind::DegenerateWindow => "degenerate_window",
        };
        ("failure_kind", label)
    }
}

pub mod strategy {
    pub fn get_label(name: &'static str) -> (&'static str, &'static str) {
        ("strategy", name)
    }
}

/// Registers descriptions for every counter with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(
        names::SPECTRA_PROCESSED,
        Unit::Count,
        "Number of spectra for which a baseline was computed"
    );
    describe_counter!(
        names::FAILURES,
        Unit::Count,
        "Number of spectra rejected as invalid input"
    );
    describe_counter!(
        names::EXTREMUM_RESCANS,
        Unit::Count,
        "Number of full window re-scans performed by the incremental extremum passes"
    );
    describe_counter!(
        names::RUNNING_SUM_RESYNCS,
        Unit::Count,
        "Number of times the smoothing running sum was recomputed from scratch"
    );
}
