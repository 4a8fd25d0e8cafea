//! Reads spectra from, and writes results to, text and JSON files.
use crate::parameters::Format;
use rolling_ball::{Real, Stages};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Read, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum InputError {
    #[error("Cannot read spectra: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line {line}: cannot parse \"{text}\" as a number")]
    NotANumber { line: usize, text: String },
    #[error("Line {line}: there is no column {column}")]
    MissingColumn { line: usize, column: usize },
    #[error("Malformed JSON spectra: {0}")]
    Json(#[from] serde_json::Error),
}

/// The spectra read from the input.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub(crate) enum Spectra {
    Single(Vec<Real>),
    Batch(Vec<Vec<Real>>),
}

impl Spectra {
    pub(crate) fn num_spectra(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Batch(spectra) => spectra.len(),
        }
    }
}

/// The results computed for the spectra.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub(crate) enum Output {
    Single(Vec<Real>),
    Batch(Vec<Vec<Real>>),
    Stages(Stages),
    StagesBatch(Vec<Stages>),
}

/// Reads spectra in the given format.
///
/// # Parameters
/// - reader: the source of the spectra.
/// - format: how the spectra are encoded.
/// - column: for [Format::Lines], the column holding the samples. If absent the last column is used.
pub(crate) fn read_spectra<R: BufRead>(
    reader: R,
    format: Format,
    column: Option<usize>,
) -> Result<Spectra, InputError> {
    match format {
        Format::Lines => read_lines(reader, column).map(Spectra::Single),
        Format::Json => read_json(reader),
    }
}

fn read_json<R: Read>(mut reader: R) -> Result<Spectra, InputError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(serde_json::from_str(&text)?)
}

fn read_lines<R: BufRead>(reader: R, column: Option<usize>) -> Result<Vec<Real>, InputError> {
    let mut samples = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let content = line.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        let fields = content
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|field| !field.is_empty())
            .collect::<Vec<_>>();
        let field = match column {
            Some(column) => fields.get(column),
            None => fields.last(),
        }
        .ok_or(InputError::MissingColumn {
            line: index + 1,
            column: column.unwrap_or_default(),
        })?;
        let sample = field.parse::<Real>().map_err(|_| InputError::NotANumber {
            line: index + 1,
            text: field.to_string(),
        })?;
        samples.push(sample);
    }
    Ok(samples)
}

/// Writes the output in the given format.
pub(crate) fn write_output<W: Write>(
    mut writer: W,
    format: Format,
    output: &Output,
) -> std::io::Result<()> {
    match format {
        Format::Json => {
            serde_json::to_writer(&mut writer, output)?;
            writeln!(writer)?;
        }
        Format::Lines => match output {
            Output::Single(values) => write_values(&mut writer, values)?,
            Output::Batch(spectra) => {
                for (index, values) in spectra.iter().enumerate() {
                    if index > 0 {
                        writeln!(writer)?;
                    }
                    write_values(&mut writer, values)?;
                }
            }
            Output::Stages(stages) => write_stages(&mut writer, stages)?,
            Output::StagesBatch(stages) => {
                for (index, stages) in stages.iter().enumerate() {
                    if index > 0 {
                        writeln!(writer)?;
                    }
                    write_stages(&mut writer, stages)?;
                }
            }
        },
    }
    writer.flush()
}

fn write_values<W: Write>(writer: &mut W, values: &[Real]) -> std::io::Result<()> {
    for value in values {
        writeln!(writer, "{value}")?;
    }
    Ok(())
}

fn write_stages<W: Write>(writer: &mut W, stages: &Stages) -> std::io::Result<()> {
    writeln!(
        writer,
        "# window-m={}, window-s={}",
        stages.windows.minmax, stages.windows.smoothing
    )?;
    writeln!(writer, "# minima,maxima,baseline")?;
    for ((minimum, maximum), baseline) in stages
        .minima
        .iter()
        .zip(&stages.maxima)
        .zip(&stages.baseline)
    {
        writeln!(writer, "{minimum},{maximum},{baseline}")?;
    }
    Ok(())
}
