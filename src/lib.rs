pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, CliConfig};
pub use core::{etl::EtlEngine, pipeline::PlacePipeline};
pub use domain::model::{AddressComponent, AddressGeometry, Coordinate, Photo, PlaceDetail};
pub use utils::error::{DumpError, Result};
