//! Command-line presentation

pub mod setup;
pub mod ui;
pub mod value;
