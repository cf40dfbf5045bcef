//! Batch input and report output adapters.

pub mod csv;
pub mod fixture;
pub mod json;
