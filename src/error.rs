use thiserror::Error;

/// Failure taxonomy for the advisory core.
///
/// `Validation` is the only variant raised before the model backend is
/// contacted. `Transport` and `Backend` describe a failed exchange with the
/// backend, `Parse` and `Schema` a reply that came back but cannot be
/// trusted. `Storage` never escapes the history paths, which degrade to
/// best-effort instead.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// A local precondition failed; no remote call was made.
    #[error("{0}")]
    Validation(String),

    /// The model backend was unreachable or the request timed out.
    #[error("request to the model backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The model backend answered with a non-success status.
    #[error("model backend rejected the request ({status}): {message}")]
    Backend { status: u16, message: String },

    /// The model reply was not well-formed JSON.
    #[error("model reply was not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The model reply parsed but is missing or mistypes a required field.
    #[error("model reply does not match the expected shape: {0}")]
    Schema(String),

    /// Local persistence failed.
    #[error("local storage failed: {0}")]
    Storage(#[from] std::io::Error),

    /// The configuration file exists but cannot be parsed.
    #[error("configuration file is invalid: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl AdvisorError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// True when the failure is an input problem the user can fix directly,
    /// as opposed to a failed remote exchange or broken storage.
    pub fn is_user_input(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type AdvisorResult<T> = std::result::Result<T, AdvisorError>;
