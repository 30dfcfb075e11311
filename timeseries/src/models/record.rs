//! The record schema contract shared by every value type a [`Series`](crate::series::Series)
//! can hold.
//!
//! The set of schemas is closed: [`Record`] is sealed and only implemented for
//! [`Bar`](super::bar::Bar), [`BarWithVolume`](super::bar::BarWithVolume) and
//! [`Quote`](super::quote::Quote). Field order is part of each schema's contract:
//! it fixes both positional construction and the default column order used when
//! matching an external column source.

use std::fmt::Debug;

use crate::errors::{Error, Result};

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// A fixed-shape tuple of named numeric fields stored at one timestamp.
pub trait Record: sealed::Sealed + Copy + Debug + PartialEq + Send + Sync + 'static {
    /// Schema name, used in error messages and summaries.
    const SCHEMA: &'static str;

    /// Ordered field names of the schema.
    const FIELD_NAMES: &'static [&'static str];

    /// Build a record from values given in [`Self::FIELD_NAMES`] order.
    ///
    /// Trailing values beyond the schema width are ignored.
    ///
    /// Errors:
    /// - [`Error::InvalidRecordInit`] if `values` is shorter than the schema.
    fn from_values(values: &[f64]) -> Result<Self>;

    /// Read one field by name, widened to `f64`. `None` for names outside the schema.
    fn field(&self, name: &str) -> Option<f64>;

    /// Fold a later record of the same resampling bucket into `self`.
    fn absorb(&mut self, later: &Self);

    /// Owned copy of [`Self::FIELD_NAMES`].
    fn column_names() -> Vec<String> {
        Self::FIELD_NAMES.iter().map(|name| (*name).to_string()).collect()
    }
}

/// Reject positional input that cannot fill every field of `R`.
pub(crate) fn ensure_width<R: Record>(values: &[f64]) -> Result<()> {
    let expected = R::FIELD_NAMES.len();
    if values.len() < expected {
        return Err(Error::InvalidRecordInit {
            schema: R::SCHEMA,
            expected,
            actual: values.len(),
        });
    }
    Ok(())
}
