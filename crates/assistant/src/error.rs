//! Classifier failure taxonomy.
//!
//! Raw classifier errors never reach the end user; each class maps to one
//! readable message via [`ClassifierError::user_message`].

use thiserror::Error;

/// Why a classifier call failed.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The service rejected our credentials.
    #[error("classifier authentication failed")]
    Auth,
    /// The service asked us to back off.
    #[error("classifier rate limit exceeded")]
    RateLimited,
    /// Timeout or transport failure before a response arrived.
    #[error("classifier request failed: {0}")]
    Network(String),
    /// The reply was empty, non-JSON, or did not match the expected shape.
    #[error("classifier returned an unusable reply: {0}")]
    Malformed(String),
    /// The service reported an internal failure.
    #[error("classifier service error: {0}")]
    Upstream(String),
}

impl ClassifierError {
    /// The message shown to the end user for this failure class.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Auth => "The assistant is not configured correctly. Check the API key.",
            Self::RateLimited => "The assistant is busy right now. Try again in a minute.",
            Self::Network(..) => {
                "Could not reach the assistant service. Check the network connection."
            }
            Self::Malformed(..) => "Could not make sense of the assistant reply. Try rephrasing.",
            Self::Upstream(..) => "The assistant service had a problem. Try again later.",
        }
    }
}
