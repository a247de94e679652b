//! Domain error types shared by the feed server, the client adapter and the CLI.

/// Top-level error type for synthfeed.
///
/// A window with `to <= from` has no variant here; it is a valid empty result
/// and surfaces as the `no_data` outcome.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("missing required parameter: {name}")]
    MissingParameter { name: String },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("internal error: {reason}")]
    Upstream { reason: String },

    /// Error outcome reported by the feed server, carried verbatim.
    #[error("{message}")]
    Rejected { message: String },

    #[error("transport error: {reason}")]
    Transport { reason: String },

    #[error("protocol error: {reason}")]
    Protocol { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FeedError {
    pub fn missing(name: &str) -> Self {
        Self::MissingParameter {
            name: name.to_string(),
        }
    }

    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&FeedError> for std::process::ExitCode {
    fn from(err: &FeedError) -> Self {
        let code: u8 = match err {
            FeedError::Io(_) => 1,
            FeedError::ConfigParse { .. } | FeedError::ConfigInvalid { .. } => 2,
            FeedError::Upstream { .. }
            | FeedError::Rejected { .. }
            | FeedError::Transport { .. }
            | FeedError::Protocol { .. } => 3,
            FeedError::MissingParameter { .. } | FeedError::InvalidParameter { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
