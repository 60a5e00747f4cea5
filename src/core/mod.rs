pub mod etl;
pub mod pipeline;

pub use crate::domain::model::{ClosePoint, CloseSeries, TransformResult};
pub use crate::domain::ports::{ConfigProvider, IntradaySource, Pipeline, Storage};
pub use crate::utils::error::Result;
