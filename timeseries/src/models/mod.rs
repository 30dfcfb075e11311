pub mod bar;
pub mod quote;
pub mod record;

pub use bar::{Bar, BarWithVolume};
pub use quote::Quote;
pub use record::Record;
