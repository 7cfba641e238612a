//! Transformation module.
//!
//! This module handles FDP to Babbage conversion:
//! - Builder: measures, dimensions and hierarchies of the model
//! - Labels: `labelfor` reverse index used by the builder

pub mod builder;
pub mod labels;

pub use builder::{build, fdp_to_model};
pub use labels::LabelResolver;
