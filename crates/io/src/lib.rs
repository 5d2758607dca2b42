//! # pluvio-io
//!
//! Read and write rainfall series as Parquet and store calibrated
//! parameters as TOML or JSON. The only Pluvio library crate that touches
//! the filesystem.
//!
//! Series files have two columns: `timestamp` (Int64, seconds since the
//! Unix epoch, UTC) and `precip` (Float64, depth per step).

mod error;
mod params;
mod parquet_read;
mod parquet_write;
mod reader;
mod writer;

pub use error::IoError;
pub use params::{ParameterFormat, load_parameters, save_parameters};
pub use reader::{ReaderConfig, read_series};
pub use writer::{Compression, WriterConfig, write_series};
