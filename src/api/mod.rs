//! API Module - drivers around the prediction pipeline
//!
//! Any driver can be swapped without touching `logic`.

pub mod batch;
pub mod cli;
