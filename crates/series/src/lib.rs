//! # pluvio-series
//!
//! Uniformly sampled, non-negative rainfall series.
//!
//! A [`TimeSeries`] stores a start time, a fixed step, and one depth value
//! per step. Uniform spacing holds by construction; gaps in raw records
//! must be made explicit with
//! [`TimeSeries::from_records_zero_filled`].
//!
//! ```ignore
//! use chrono::TimeDelta;
//! use pluvio_series::TimeSeries;
//!
//! let fine = TimeSeries::new(start, TimeDelta::minutes(10), values)?;
//! let hourly = fine.aggregate_to(TimeDelta::hours(1))?;
//! ```

mod error;
mod series;

pub use error::SeriesError;
pub use series::{TimeSeries, steps_in};
