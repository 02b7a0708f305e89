pub mod series;
pub mod trend;

pub use crate::error::IndicatorError;
pub use series::IndicatorSeries;
pub use trend::*;
