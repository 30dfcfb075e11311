//! In-memory, time-indexed containers for financial records.
//!
//! A [`Series`] maps Unix timestamps to records of one schema ([`Bar`],
//! [`BarWithVolume`] or [`Quote`]). Records and timestamps can be walked
//! separately through borrowed views, and a series can be resampled to a
//! coarser frequency.

pub mod bucket;
pub mod errors;
pub mod frequency;
pub mod models;
pub mod series;
pub mod time;
pub mod timeframe;
pub mod views;

pub use errors::{Error, Result};
pub use frequency::Alignment;
pub use models::{Bar, BarWithVolume, Quote, Record};
pub use series::{Series, SeriesSummary};
pub use time::Timestamp;
pub use timeframe::{Timeframe, TimeframeUnit};
pub use views::{TimestampView, ValueView, ValueViewMut};
