//! Aghamon Common - Shared types and configuration for the Aghamon dashboard

pub mod api;
pub mod config;

pub use api::*;
pub use config::*;
