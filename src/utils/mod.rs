//! Text utilities shared across modules

pub mod emoji;
pub mod text;
