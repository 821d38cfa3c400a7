use thiserror::Error;

/// Core failure kinds. Every variant maps to a stable wire code so the
/// frontend can branch on `error.code` without parsing messages.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidQuery(String),

    #[error("{0}")]
    NotFound(String),

    #[error("no students")]
    EmptyInput,

    #[error("{0}")]
    CapabilityUnavailable(String),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl RosterError {
    pub fn code(&self) -> &'static str {
        match self {
            RosterError::Validation(_) => "validation_error",
            RosterError::InvalidQuery(_) => "invalid_query",
            RosterError::NotFound(_) => "not_found",
            RosterError::EmptyInput => "empty_input",
            RosterError::CapabilityUnavailable(_) => "capability_unavailable",
            RosterError::Io(_) => "io_failure",
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        RosterError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        RosterError::NotFound(msg.into())
    }
}
