pub mod etl;
pub mod pipeline;

pub use crate::domain::model::{PlaceDetail, ResponseEnvelope, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
