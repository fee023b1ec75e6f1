//! `insurance-charges` library crate.
//!
//! The binary (`charges`) is a thin wrapper around this library so that:
//!
//! - the form logic and HTTP exchange are testable without a terminal
//! - the interactive form and the one-shot CLI share one submission path

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod form;
pub mod logging;
pub mod report;
pub mod tui;
