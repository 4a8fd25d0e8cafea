//! Installs the global tracing subscriber used by the binaries.
use clap::Args;
use thiserror::Error;
use tracing_subscriber::{
    EnvFilter,
    filter::ParseError,
    fmt::format::FmtSpan,
    util::{SubscriberInitExt, TryInitError},
};

#[derive(Debug, Error)]
pub enum TracerError {
    #[error("Invalid log filter directive: {0}")]
    Filter(#[from] ParseError),
    #[error("Tracing subscriber already installed: {0}")]
    Init(#[from] TryInitError),
}

/// Logging options shared by every binary in the workspace.
#[derive(Debug, Clone, Args)]
pub struct CommonTracerOpts {
    /// Filter directive used when `RUST_LOG` is not set
    #[clap(long, env = "ROLLING_BALL_LOG", default_value = "info")]
    pub log_level: String,

    /// If set, span creation and closure are logged as well as events
    #[clap(long)]
    pub log_spans: bool,
}

/// Controls how [init_tracer] configures the subscriber.
#[derive(Debug, Clone)]
pub struct TracerOptions {
    /// Filter directive used when `RUST_LOG` is not set, e.g. `"info"` or `"rolling_ball=debug"`.
    pub default_directive: String,
    /// Emit span enter/exit events as well as ordinary events.
    pub log_spans: bool,
}

impl TracerOptions {
    pub fn new(default_directive: &str, log_spans: bool) -> Self {
        Self {
            default_directive: default_directive.to_owned(),
            log_spans,
        }
    }
}

impl Default for TracerOptions {
    fn default() -> Self {
        Self::new("info", false)
    }
}

impl From<&CommonTracerOpts> for TracerOptions {
    fn from(opts: &CommonTracerOpts) -> Self {
        Self::new(&opts.log_level, opts.log_spans)
    }
}

/// Installs a formatting subscriber writing to stderr.
///
/// Standard output is left untouched, as the binaries write their data there.
/// `RUST_LOG` takes precedence over [TracerOptions::default_directive].
pub fn init_tracer(options: &TracerOptions) -> Result<(), TracerError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&options.default_directive)?,
    };

    let span_events = if options.log_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(span_events)
        .with_writer(std::io::stderr)
        .finish()
        .try_init()?;
    Ok(())
}
