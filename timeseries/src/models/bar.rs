//! Open/high/low/close bars, with and without traded volume.

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::models::record::{Record, ensure_width, sealed::Sealed};

/// A single OHLC bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Opening price.
    pub open: f64,

    /// Highest price during the bar interval.
    pub high: f64,

    /// Lowest price during the bar interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,
}

impl Bar {
    pub const fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
        }
    }

    /// Trading range of the interval (high - low).
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// True when the bar closed above its open.
    pub fn is_up(&self) -> bool {
        self.close > self.open
    }

    fn merge(&mut self, later: &Bar) {
        self.high = self.high.max(later.high);
        self.low = self.low.min(later.low);
        self.close = later.close;
    }
}

impl Sealed for Bar {}

impl Record for Bar {
    const SCHEMA: &'static str = "Bar";
    const FIELD_NAMES: &'static [&'static str] = &["open", "high", "low", "close"];

    fn from_values(values: &[f64]) -> Result<Self> {
        ensure_width::<Self>(values)?;
        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }

    fn field(&self, name: &str) -> Option<f64> {
        match name {
            "open" => Some(self.open),
            "high" => Some(self.high),
            "low" => Some(self.low),
            "close" => Some(self.close),
            _ => None,
        }
    }

    fn absorb(&mut self, later: &Self) {
        self.merge(later);
    }
}

/// An OHLC bar carrying the volume traded during the interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarWithVolume {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Units traded during the bar interval.
    pub volume: i64,
}

impl BarWithVolume {
    pub const fn new(open: f64, high: f64, low: f64, close: f64, volume: i64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// The price part of the bar.
    pub const fn bar(&self) -> Bar {
        Bar::new(self.open, self.high, self.low, self.close)
    }
}

impl Sealed for BarWithVolume {}

impl Record for BarWithVolume {
    const SCHEMA: &'static str = "BarWithVolume";
    const FIELD_NAMES: &'static [&'static str] = &["open", "high", "low", "close", "volume"];

    fn from_values(values: &[f64]) -> Result<Self> {
        ensure_width::<Self>(values)?;
        // volume arrives as a float column; truncate like an integer cast
        Ok(Self::new(
            values[0],
            values[1],
            values[2],
            values[3],
            values[4] as i64,
        ))
    }

    fn field(&self, name: &str) -> Option<f64> {
        match name {
            "volume" => Some(self.volume as f64),
            other => self.bar().field(other),
        }
    }

    fn absorb(&mut self, later: &Self) {
        let mut bar = self.bar();
        bar.merge(&later.bar());
        self.high = bar.high;
        self.low = bar.low;
        self.close = bar.close;
        self.volume = self.volume.saturating_add(later.volume);
    }
}
