//! Implementations that are useful across the whole project
//!
//! Timestamp parsing, row normalization and the two aggregations:
//! weekly averages and calorie sources

pub mod category;
pub mod date;
pub mod entry;
pub mod error;
pub mod summary;
