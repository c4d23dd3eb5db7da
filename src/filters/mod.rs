//! Reactive filters
//!
//! Pure functions from control values to table subsets:
//!
//! - **date_range**: slider indices → rows within the date range
//! - **selection**: dropdown values → normalized region order

pub mod date_range;
pub mod selection;

pub use date_range::DateRange;
pub use selection::{RegionSelection, AGGREGATE_REGION};
