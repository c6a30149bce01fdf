//! Command implementations

pub mod evaluate;
pub mod model;
pub mod pattern;
