//! Domain error types.

/// Top-level error type for replaylab.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("invalid bar at index {index}: {reason}")]
    InvalidBar { index: usize, reason: String },

    #[error("bar {index} out of order: time {time} precedes {previous}")]
    OutOfOrder {
        index: usize,
        previous: i64,
        time: i64,
    },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no bars in {origin}")]
    NoData { origin: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SimError {
    /// Process exit status for this error class.
    pub fn exit_status(&self) -> u8 {
        match self {
            SimError::Io(_) => 1,
            SimError::ConfigParse { .. }
            | SimError::ConfigMissing { .. }
            | SimError::ConfigInvalid { .. } => 2,
            SimError::InvalidBar { .. }
            | SimError::OutOfOrder { .. }
            | SimError::Data { .. }
            | SimError::Csv(_) => 3,
            SimError::NoData { .. } => 5,
        }
    }
}

impl From<&SimError> for std::process::ExitCode {
    fn from(err: &SimError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
