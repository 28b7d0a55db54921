//! Command implementations for the svdot CLI

pub mod check;
pub mod config;
pub mod pair;
pub mod plot;
