use crate::simulation_elements::{spectrum::SpectrumTemplate, utils::JsonValueError};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
use rolling_ball_common::Real;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

///
/// This struct is created from the configuration JSON file.
///
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct Simulation {
    pub(crate) spectra: Vec<SpectrumTemplate>,
}

#[derive(Debug, Error)]
pub(crate) enum SimulationError {
    #[error("Spectrum {index}: {source}")]
    JsonValue {
        index: usize,
        source: JsonValueError,
    },
}

impl Simulation {
    /// Generates `count` spectra from each template, in template order.
    ///
    /// Each spectrum is drawn from its own generator, seeded from a master generator seeded
    /// with `seed`, so the output depends only on the configuration and the seed.
    #[instrument(
        skip_all,
        fields(num_templates = self.spectra.len(), seed = seed, count = count),
        err(level = "error")
    )]
    pub(crate) fn generate(
        &self,
        seed: u64,
        count: usize,
    ) -> Result<Vec<Vec<Real>>, SimulationError> {
        let mut master = StdRng::seed_from_u64(seed);
        let seeds = self
            .spectra
            .iter()
            .flat_map(|template| std::iter::repeat_n(template, count))
            .map(|template| (template, master.random::<u64>()))
            .collect::<Vec<_>>();

        let span = tracing::Span::current();
        seeds
            .into_par_iter()
            .enumerate()
            .map(|(index, (template, seed))| {
                span.in_scope(|| {
                    template
                        .generate(&mut StdRng::seed_from_u64(seed), index)
                        .map_err(|source| SimulationError::JsonValue { index, source })
                })
            })
            .collect()
    }
}
