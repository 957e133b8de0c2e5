//! Logic Module - Business Logic & Engines
//!
//! - `features/` - Observation encoding against the training schema
//! - `model/` - Oracle backends and startup artifact loading
//! - `safety/` - Visibility thresholds and labels
//! - `pipeline` - Composition of the three

pub mod config;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod safety;
