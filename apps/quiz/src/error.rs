//! Error handling for the quiz application

use crate::services::store::StoreError;
use crate::speech::SpeechError;
use thiserror::Error;

/// Errors that end a quiz session early.
///
/// Everything else (silence, declined confirmations, failed saves, failed
/// speech output) is absorbed by the session and reported in its summary.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("speech input failed {attempts} times in a row: {source}")]
    ListenerUnavailable {
        attempts: u32,
        #[source]
        source: SpeechError,
    },

    #[error("could not load cards: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
