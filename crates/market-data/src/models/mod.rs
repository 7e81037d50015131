//! Core data types shared by providers and the aggregation layer.

mod classification;
mod history;
mod quote;

pub use classification::{AssetCategory, Classification, ClassifiedSymbol, Venue};
pub use history::{sort_ascending, HistoryPeriod, HistoryPoint, HistoryRange};
pub use quote::Quote;
