//! # Spectrum Baseline
//!
//! The Spectrum Baseline component performs the following functions:
//! * Reads one spectrum, or a batch of spectra, from a file or from stdin.
//! * Estimates the background of each spectrum with the rolling ball strategy chosen by the user.
//! * Writes the baseline, the corrected spectrum, or every intermediate stage, to a file or to stdout.
//!
mod parameters;
mod processing;
mod spectra;

use clap::Parser;
use miette::IntoDiagnostic;
use parameters::{Format, Mode, OutputKind};
use rolling_ball_common::{
    CommonTracerOpts, TracerOptions, init_tracer, metrics::describe_metrics,
};
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::PathBuf,
};
use tracing::{debug, info};

/// [clap] derived struct to handle command line parameters.
#[derive(Debug, Parser)]
#[clap(author, version = rolling_ball_common::version!(), about)]
struct Cli {
    #[clap(flatten)]
    tracer_options: CommonTracerOpts,

    /// File the spectra are read from. If absent, stdin is used.
    #[clap(long, short)]
    input: Option<PathBuf>,

    /// File the results are written to. If absent, stdout is used.
    #[clap(long, short)]
    output: Option<PathBuf>,

    /// Encoding of both the input and the output
    #[clap(long, default_value = "lines")]
    format: Format,

    /// For the lines format, the zero-based column holding the samples. Defaults to the last column.
    #[clap(long)]
    column: Option<usize>,

    /// What is written for each spectrum
    #[clap(long, default_value = "baseline")]
    output_kind: OutputKind,

    #[command(subcommand)]
    pub(crate) mode: Mode,
}

fn main() -> miette::Result<()> {
    let args = Cli::parse();

    init_tracer(&TracerOptions::from(&args.tracer_options)).into_diagnostic()?;
    describe_metrics();

    let engine = args.mode.engine().into_diagnostic()?;
    debug!("Engine: {engine:?}");

    let spectra = match &args.input {
        Some(path) => spectra::read_spectra(
            BufReader::new(File::open(path).into_diagnostic()?),
            args.format,
            args.column,
        ),
        None => spectra::read_spectra(std::io::stdin().lock(), args.format, args.column),
    }
    .into_diagnostic()?;
    info!(
        "Read {} spectra from {}",
        spectra.num_spectra(),
        args.input
            .as_ref()
            .map_or("stdin".to_owned(), |path| path.display().to_string())
    );

    let output = processing::process(&engine, &spectra, args.output_kind).into_diagnostic()?;

    match &args.output {
        Some(path) => spectra::write_output(
            BufWriter::new(File::create(path).into_diagnostic()?),
            args.format,
            &output,
        ),
        None => spectra::write_output(std::io::stdout().lock(), args.format, &output),
    }
    .into_diagnostic()?;
    info!("Wrote {:?} output", args.output_kind);
    Ok(())
}
