//! Aggregation services over auction collections

pub mod aggregate;

pub use aggregate::*;
