pub(crate) mod background;
pub(crate) mod noise;
pub(crate) mod pulses;
pub(crate) mod spectrum;
pub(crate) mod utils;

pub(crate) use utils::{FloatRandomDistribution, Interval, NumExpression};
