pub mod ai;
pub mod assessment;
pub mod config;
pub mod error;
pub mod telemetry;
