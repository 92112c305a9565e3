pub mod chart;
pub mod etl;
pub mod pipeline;

pub use crate::domain::model::{RankedCountry, TransformResult, VaccineCount, VaccineRecord};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
