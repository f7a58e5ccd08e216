use crate::audit::AuditError;
use crate::config::ConfigError;
use crate::pipelines::outreach::OutreachError;
use crate::pipelines::scrub::ScrubError;
use crate::pipelines::skiptrace::SkiptraceError;
use crate::table::writer::WriteError;
use crate::table::TableError;
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Table(TableError),
    Write(WriteError),
    Audit(AuditError),
    Outreach(OutreachError),
    Scrub(ScrubError),
    Skiptrace(SkiptraceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Table(err) => write!(f, "input error: {}", err),
            AppError::Write(err) => write!(f, "export error: {}", err),
            AppError::Audit(err) => write!(f, "header audit error: {}", err),
            AppError::Outreach(err) => write!(f, "outreach error: {}", err),
            AppError::Scrub(err) => write!(f, "scrub error: {}", err),
            AppError::Skiptrace(err) => write!(f, "skip-trace error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Table(err) => Some(err),
            AppError::Write(err) => Some(err),
            AppError::Audit(err) => Some(err),
            AppError::Outreach(err) => Some(err),
            AppError::Scrub(err) => Some(err),
            AppError::Skiptrace(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<TableError> for AppError {
    fn from(value: TableError) -> Self {
        Self::Table(value)
    }
}

impl From<WriteError> for AppError {
    fn from(value: WriteError) -> Self {
        Self::Write(value)
    }
}

impl From<AuditError> for AppError {
    fn from(value: AuditError) -> Self {
        Self::Audit(value)
    }
}

impl From<OutreachError> for AppError {
    fn from(value: OutreachError) -> Self {
        Self::Outreach(value)
    }
}

impl From<ScrubError> for AppError {
    fn from(value: ScrubError) -> Self {
        Self::Scrub(value)
    }
}

impl From<SkiptraceError> for AppError {
    fn from(value: SkiptraceError) -> Self {
        Self::Skiptrace(value)
    }
}
