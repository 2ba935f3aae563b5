//! Plan parameters, regulatory constants, and partial updates

mod params;
mod patch;

pub use params::{
    periods_per_year, PlanParameters, ANNUAL_CAP, GAIN_SHARE, MONTHS_IN_YEAR, SUPPORTED_CADENCES,
};
pub use patch::PlanParametersPatch;
