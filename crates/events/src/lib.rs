//! # pluvio-events
//!
//! Segments a fine-resolution rainfall series into discrete rain events
//! separated by dry spells of at least a configured inter-event gap.
//!
//! ## Rules
//!
//! | Situation | Outcome |
//! |-----------|---------|
//! | dry run shorter than the gap | stays inside the event |
//! | dry run reaching the gap | closes the event |
//! | event touching the series start | dropped unless `assume_dry_before_start` |
//! | event still open at the series end | dropped |
//!
//! ```
//! use chrono::{NaiveDate, TimeDelta};
//! use pluvio_events::{EventConfig, extract_events};
//! use pluvio_series::TimeSeries;
//!
//! let t0 = NaiveDate::from_ymd_opt(2024, 5, 1)
//!     .unwrap()
//!     .and_hms_opt(0, 0, 0)
//!     .unwrap();
//! let mut depths = vec![0.0; 6];
//! depths.extend([1.0, 2.5, 1.5]);
//! depths.extend([0.0; 6]);
//! let series = TimeSeries::new(t0, TimeDelta::minutes(10), depths).unwrap();
//!
//! let events = extract_events(&series, TimeDelta::minutes(60), &EventConfig::new()).unwrap();
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].duration(), TimeDelta::minutes(30));
//! assert_eq!(events[0].volume(), 5.0);
//! ```

mod config;
mod error;
mod extract;
mod summary;

pub use config::EventConfig;
pub use error::EventError;
pub use extract::{EventIter, RainEvent, events_iter, extract_events};
pub use summary::{EventSummary, summarize_events};
