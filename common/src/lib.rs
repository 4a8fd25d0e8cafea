//! Types, tracing setup and metric names shared by the rolling ball components.
pub mod metrics;
pub mod tracer;

pub use git_version;
pub use tracer::{CommonTracerOpts, TracerError, TracerOptions, init_tracer};

/// The numeric type of spectrum samples and of every array derived from them.
pub type Real = f64;

/// The position of a sample in a spectrum.
pub type SampleIndex = usize;

/// Expands to the version string of the calling component, as reported by `git describe`.
#[macro_export]
macro_rules! version {
    () => {
        $crate::git_version::git_version!(
            args = ["--tags", "--always", "--dirty=-modified"],
            fallback = "unknown"
        )
    };
}
