use super::{FloatRandomDistribution, utils::JsonValueError};
use rand::Rng;
use rolling_ball_common::Real;
use serde::Deserialize;

/// Number of standard deviations either side of the mean outside which a gaussian pulse is zero.
const GAUSSIAN_SUPPORT_SDS: Real = 6.0;

/// Describes a peak added on top of the background. Positions and widths are in samples.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case", tag = "pulse-type")]
pub(crate) enum PulseTemplate {
    Flat {
        start: FloatRandomDistribution<Real>,
        width: FloatRandomDistribution<Real>,
        height: FloatRandomDistribution<Real>,
    },
    Triangular {
        start: FloatRandomDistribution<Real>,
        /// Position of the apex, as a fraction of the width.
        peak_time: FloatRandomDistribution<Real>,
        width: FloatRandomDistribution<Real>,
        height: FloatRandomDistribution<Real>,
    },
    Gaussian {
        height: FloatRandomDistribution<Real>,
        peak_time: FloatRandomDistribution<Real>,
        sd: FloatRandomDistribution<Real>,
    },
    BackToBackExp {
        peak_height: FloatRandomDistribution<Real>,
        peak_time: FloatRandomDistribution<Real>,
        spread: FloatRandomDistribution<Real>,
        falling: FloatRandomDistribution<Real>,
        rising: FloatRandomDistribution<Real>,
    },
}

/// A pulse whose parameters have been drawn from a [PulseTemplate].
#[derive(Debug)]
pub(crate) enum PulseEvent {
    Flat {
        start: Real,
        stop: Real,
        amplitude: Real,
    },
    Triangular {
        start: Real,
        peak_time: Real,
        stop: Real,
        amplitude: Real,
    },
    Gaussian {
        start: Real,
        stop: Real,
        mean: Real,
        sd: Real,
        peak_amplitude: Real,
    },
    BackToBackExp {
        start: Real,
        stop: Real,
        peak_time: Real,
        falling: Real,
        rising: Real,
        normalising_factor: Real,
        rising_spread: Real,
        falling_spread: Real,
        frac_1_sqrt_2_spread: Real,
    },
}

impl PulseEvent {
    pub(crate) fn sample<R: Rng + ?Sized>(
        template: &PulseTemplate,
        rng: &mut R,
        spectrum_index: usize,
    ) -> Result<Self, JsonValueError> {
        match template {
            PulseTemplate::Flat {
                start,
                width,
                height,
            } => {
                let start = start.sample(rng, spectrum_index)?;
                Ok(Self::Flat {
                    start,
                    stop: start + width.sample(rng, spectrum_index)?,
                    amplitude: height.sample(rng, spectrum_index)?,
                })
            }
            PulseTemplate::Triangular {
                start,
                peak_time,
                width,
                height,
            } => {
                let start = start.sample(rng, spectrum_index)?;
                let width = width.sample(rng, spectrum_index)?;
                Ok(Self::Triangular {
                    start,
                    peak_time: start + peak_time.sample(rng, spectrum_index)? * width,
                    stop: start + width,
                    amplitude: height.sample(rng, spectrum_index)?,
                })
            }
            PulseTemplate::Gaussian {
                height,
                peak_time,
                sd,
            } => {
                let mean = peak_time.sample(rng, spectrum_index)?;
                let sd = sd.sample(rng, spectrum_index)?;
                let peak_amplitude = height.sample(rng, spectrum_index)?;
                Ok(Self::Gaussian {
                    start: mean - GAUSSIAN_SUPPORT_SDS * sd,
                    stop: mean + GAUSSIAN_SUPPORT_SDS * sd,
                    mean,
                    sd,
                    peak_amplitude,
                })
            }
            PulseTemplate::BackToBackExp {
                peak_height,
                peak_time,
                spread,
                falling,
                rising,
            } => {
                let rising = rising.sample(rng, spectrum_index)?;
                let falling = falling.sample(rng, spectrum_index)?;
                let peak_height = peak_height.sample(rng, spectrum_index)?;
                let spread = spread.sample(rng, spectrum_index)?;
                let peak_time = peak_time.sample(rng, spectrum_index)?;

                let rising_spread = rising * spread.powi(2);
                let falling_spread = falling * spread.powi(2);
                let frac_1_sqrt_2_spread = std::f64::consts::FRAC_1_SQRT_2 / spread;

                let normalising_factor = {
                    let rising_erfc = libm::erfc(rising_spread * frac_1_sqrt_2_spread);
                    let rising_exp = if rising_erfc == 0.0 {
                        0.0
                    } else {
                        Real::exp(0.5 * rising * rising_spread)
                    };
                    let falling_erfc = libm::erfc(falling_spread * frac_1_sqrt_2_spread);
                    let falling_exp = if falling_erfc == 0.0 {
                        0.0
                    } else {
                        Real::exp(0.5 * falling * falling_spread)
                    };

                    peak_height / (rising_exp * rising_erfc + falling_exp * falling_erfc)
                };

                let start = peak_time - 0.5 * rising_spread - normalising_factor.ln() / rising;
                let stop = peak_time + 0.5 * falling_spread + normalising_factor.ln() / falling;

                Ok(Self::BackToBackExp {
                    start,
                    stop,
                    peak_time,
                    falling,
                    rising,
                    normalising_factor,
                    rising_spread,
                    falling_spread,
                    frac_1_sqrt_2_spread,
                })
            }
        }
    }

    pub(crate) fn start(&self) -> Real {
        match self {
            Self::Flat { start, .. }
            | Self::Triangular { start, .. }
            | Self::Gaussian { start, .. }
            | Self::BackToBackExp { start, .. } => *start,
        }
    }

    pub(crate) fn stop(&self) -> Real {
        match self {
            Self::Flat { stop, .. }
            | Self::Triangular { stop, .. }
            | Self::Gaussian { stop, .. }
            | Self::BackToBackExp { stop, .. } => *stop,
        }
    }

    /// Height of the pulse at the given sample position. Zero outside of the pulse.
    pub(crate) fn value_at(&self, position: Real) -> Real {
        if position < self.start() || self.stop() < position {
            return Default::default();
        }

        match *self {
            Self::Flat { amplitude, .. } => amplitude,
            Self::Triangular {
                start,
                peak_time,
                stop,
                amplitude,
            } => {
                if position < peak_time {
                    amplitude * (position - start) / (peak_time - start)
                } else if stop > peak_time {
                    amplitude * (stop - position) / (stop - peak_time)
                } else {
                    amplitude
                }
            }
            Self::Gaussian {
                mean,
                sd,
                peak_amplitude,
                ..
            } => peak_amplitude * Real::exp(-0.5 * Real::powi((position - mean) / sd, 2)),
            Self::BackToBackExp {
                peak_time,
                falling,
                rising,
                normalising_factor,
                rising_spread,
                falling_spread,
                frac_1_sqrt_2_spread,
                ..
            } => {
                let shift = position - peak_time;

                let rising_erfc = libm::erfc((rising_spread + shift) * frac_1_sqrt_2_spread);
                let rising_exp = (rising_erfc != 0.0) //  Guard against NaN
                    .then(|| Real::exp(rising * (0.5 * rising_spread + shift)))
                    .unwrap_or_default();

                let falling_erfc = libm::erfc((falling_spread - shift) * frac_1_sqrt_2_spread);
                let falling_exp = (falling_erfc != 0.0) //  Guard against NaN
                    .then(|| Real::exp(falling * (0.5 * falling_spread - shift)))
                    .unwrap_or_default();

                normalising_factor * (rising_exp * rising_erfc + falling_exp * falling_erfc)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation_elements::NumExpression;
    use assert_approx_eq::assert_approx_eq;
    use rand::{SeedableRng, rngs::StdRng};

    const fn constant(value: Real) -> FloatRandomDistribution<Real> {
        FloatRandomDistribution::ConstantFloat {
            value: NumExpression::Const(value),
        }
    }

    const TEMPLATE: PulseTemplate = PulseTemplate::BackToBackExp {
        peak_height: constant(2100.0),
        peak_time: constant(2200.0),
        spread: constant(3.0),
        falling: constant(2.5),
        rising: constant(1.5),
    };

    fn sample(template: &PulseTemplate) -> PulseEvent {
        PulseEvent::sample(template, &mut StdRng::seed_from_u64(0), 0).expect("valid template")
    }

    #[test]
    fn back_to_back_exp_template() {
        let pulse = sample(&TEMPLATE);
        assert_eq!(pulse.start() as i64, 2187);
        assert_eq!(pulse.stop() as i64, 2214);
    }

    #[test]
    fn back_to_back_exp_values() {
        let pulse = sample(&TEMPLATE);
        const VALUES: [i64; 27] = [
            0, 1, 5, 16, 41, 95, 199, 379, 651, 1011, 1418, 1793, 2044, 2100, 1942, 1616, 1211,
            816, 495, 270, 132, 58, 23, 8, 2, 0, 0,
        ];
        for (offset, &value) in VALUES.iter().enumerate() {
            assert_eq!(pulse.value_at((2187 + offset) as Real) as i64, value);
        }
    }

    #[test]
    fn gaussian_values() {
        let pulse = sample(&PulseTemplate::Gaussian {
            height: constant(100.0),
            peak_time: constant(50.0),
            sd: constant(2.0),
        });
        assert_approx_eq!(pulse.value_at(50.0), 100.0);
        assert_approx_eq!(pulse.value_at(52.0), 100.0 * (-0.5 as Real).exp());
        assert_approx_eq!(pulse.value_at(48.0), pulse.value_at(52.0));
        assert_eq!(pulse.start(), 38.0);
        assert_eq!(pulse.value_at(37.0), 0.0);
    }

    #[test]
    fn flat_and_triangular_values() {
        let flat = sample(&PulseTemplate::Flat {
            start: constant(10.0),
            width: constant(5.0),
            height: constant(3.0),
        });
        assert_eq!(flat.value_at(9.0), 0.0);
        assert_eq!(flat.value_at(12.0), 3.0);
        assert_eq!(flat.value_at(16.0), 0.0);

        let triangular = sample(&PulseTemplate::Triangular {
            start: constant(10.0),
            peak_time: constant(0.25),
            width: constant(8.0),
            height: constant(4.0),
        });
        assert_approx_eq!(triangular.value_at(11.0), 2.0);
        assert_approx_eq!(triangular.value_at(12.0), 4.0);
        assert_approx_eq!(triangular.value_at(15.0), 2.0);
        assert_eq!(triangular.value_at(18.5), 0.0);
    }
}
