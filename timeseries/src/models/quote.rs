use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::models::record::{Record, ensure_width, sealed::Sealed};

/// Top-of-book bid/ask quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub bid: f64,
    pub ask: f64,
}

impl Quote {
    pub const fn new(bid: f64, ask: f64) -> Self {
        Self { bid, ask }
    }

    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }

    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }
}

impl Sealed for Quote {}

impl Record for Quote {
    const SCHEMA: &'static str = "Quote";
    const FIELD_NAMES: &'static [&'static str] = &["bid", "ask"];

    fn from_values(values: &[f64]) -> Result<Self> {
        ensure_width::<Self>(values)?;
        Ok(Self::new(values[0], values[1]))
    }

    fn field(&self, name: &str) -> Option<f64> {
        match name {
            "bid" => Some(self.bid),
            "ask" => Some(self.ask),
            _ => None,
        }
    }

    // last quote in the bucket wins
    fn absorb(&mut self, later: &Self) {
        *self = *later;
    }
}
