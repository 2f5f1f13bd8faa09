//! ReturnIQ: return risk scoring and resolution recommendations.

pub mod config;
pub mod error;
pub mod returns;
pub mod telemetry;
