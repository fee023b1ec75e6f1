//! Reference data for the categorical form fields.

pub mod entities;

pub use entities::{References, ReferenceData, fallback_entities, load_all, load_reference};
