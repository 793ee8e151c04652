//! Configuration and domain models

pub mod config;
pub mod models;
