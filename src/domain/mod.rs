//! Domain types used throughout the form pipeline.
//!
//! This module defines:
//!
//! - reference options (`ReferenceEntity`, `Category`)
//! - the fixed region choice and its one-hot encoding (`Region`)
//! - the prediction wire types (`PredictionRequest`, `PredictionResponse`)

pub mod types;

pub use types::*;
