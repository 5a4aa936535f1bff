//! Trip filtering and count aggregation.
//!
//! This module narrows enriched trips down to a dashboard selection and
//! groups them by station name or hour of day, producing the ordered
//! buckets the charts are drawn from.

pub mod aggregate;
pub mod filter;
pub mod types;
