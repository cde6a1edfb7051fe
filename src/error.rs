// ============================================================
// Library Errors
// ============================================================
// Every invalid input the library itself rejects. Failures from
// file I/O, JSON parsing or burn are not translated here; the
// application layer wraps those in anyhow with file context.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrepError {
    /// Scheduler name not in the recognised set
    #[error("Invalid scheduler option provided: '{0}'")]
    UnknownScheduler(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{sequences} sequences but {labels} labels")]
    LengthMismatch { sequences: usize, labels: usize },

    #[error("Tried to step {step} times, schedule only covers {total} steps")]
    ScheduleExhausted { step: usize, total: usize },
}

impl PrepError {
    /// True for every variant that signals a bad configuration value
    pub fn is_config(&self) -> bool {
        matches!(self, Self::UnknownScheduler(_) | Self::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, PrepError>;
