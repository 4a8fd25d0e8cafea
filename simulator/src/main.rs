//! # Simulator
//!
//! Generates synthetic spectra, a slowly varying background with pulses and noise on top,
//! for exercising the rolling ball baseline estimator. The spectra are described by a JSON
//! configuration file and written as a JSON array of arrays, which `spectrum-baseline`
//! accepts as a batch.
//!
mod simulation;
mod simulation_elements;

use clap::Parser;
use miette::IntoDiagnostic;
use rolling_ball_common::{CommonTracerOpts, Real, TracerOptions, init_tracer};
use simulation::Simulation;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::PathBuf,
};
use tracing::info;

/// [clap] derived struct to handle command line parameters.
#[derive(Debug, Parser)]
#[clap(author, version = rolling_ball_common::version!(), about)]
struct Cli {
    #[clap(flatten)]
    tracer_options: CommonTracerOpts,

    /// Path to the JSON file describing the spectra
    #[clap(long)]
    config: PathBuf,

    /// Seed of the random number generator. If absent, a random seed is used.
    #[clap(long)]
    seed: Option<u64>,

    /// Number of spectra generated from each template
    #[clap(long, default_value = "1")]
    count: usize,

    /// File the spectra are written to. If absent, stdout is used.
    #[clap(long, short)]
    output: Option<PathBuf>,
}

fn main() -> miette::Result<()> {
    let args = Cli::parse();

    init_tracer(&TracerOptions::from(&args.tracer_options)).into_diagnostic()?;

    let simulation: Simulation =
        serde_json::from_reader(BufReader::new(File::open(&args.config).into_diagnostic()?))
            .into_diagnostic()?;

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Generating {} spectra with seed {seed}", simulation.spectra.len() * args.count);

    let spectra = simulation.generate(seed, args.count).into_diagnostic()?;

    match &args.output {
        Some(path) => write_spectra(
            BufWriter::new(File::create(path).into_diagnostic()?),
            &spectra,
        ),
        None => write_spectra(std::io::stdout().lock(), &spectra),
    }
    .into_diagnostic()
}

fn write_spectra<W: Write>(mut writer: W, spectra: &[Vec<Real>]) -> std::io::Result<()> {
    serde_json::to_writer(&mut writer, spectra)?;
    writeln!(writer)?;
    writer.flush()
}
