//! Energy optimizer service: HTTP surface over `energy-lib`

pub mod api;
pub mod config;
