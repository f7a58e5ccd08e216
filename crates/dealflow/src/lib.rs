pub mod audit;
pub mod columns;
pub mod config;
pub mod error;
pub mod format;
pub mod pipelines;
pub mod table;
pub mod telemetry;
pub mod underwriting;
