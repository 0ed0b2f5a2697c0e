//! Speech collaborators.
//!
//! The quiz talks to the learner only through [`SpeechOut`] and
//! [`SpeechIn`]. Speech input goes through a [`Listener`], which owns the
//! input device and tracks whether an utterance is in flight. Every listen
//! takes `&mut Listener`, so two listens can never overlap.

pub mod console;

use async_trait::async_trait;
use hanzi_core::matching::{normalize, split_transcript};
use std::time::Duration;
use thiserror::Error;

pub use console::{ConsoleEars, ConsoleVoice};

/// Words that count as a "yes" in a confirmation.
pub const YES_WORDS: &[&str] = &["yes", "yeah", "yep", "yup", "sure", "ok", "okay", "correct"];

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech device unavailable: {0}")]
    Unavailable(String),

    #[error("speech input closed")]
    Closed,

    #[error("listener is already waiting for speech")]
    Busy,
}

/// Speech output, e.g. a text-to-speech engine.
#[async_trait]
pub trait SpeechOut: Send {
    /// Say `text` and return once it has been said.
    async fn speak(&mut self, text: &str) -> Result<(), SpeechError>;
}

/// Speech input, e.g. a speech recognizer.
#[async_trait]
pub trait SpeechIn: Send {
    /// Wait for the next utterance and return its transcript.
    async fn listen(&mut self) -> Result<String, SpeechError>;

    /// Abandon an utterance that is no longer awaited.
    fn stop(&mut self) {}
}

/// Where the listener is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenState {
    Idle,
    Listening,
    Resolved,
    TimedOut,
}

/// Owns the speech input device and serializes access to it.
pub struct Listener {
    device: Box<dyn SpeechIn>,
    state: ListenState,
}

impl Listener {
    pub fn new(device: Box<dyn SpeechIn>) -> Self {
        Self {
            device,
            state: ListenState::Idle,
        }
    }

    pub fn state(&self) -> ListenState {
        self.state
    }

    fn begin(&mut self) -> Result<(), SpeechError> {
        if self.state == ListenState::Listening {
            return Err(SpeechError::Busy);
        }
        self.state = ListenState::Listening;
        Ok(())
    }

    /// Wait for an utterance with no time limit.
    ///
    /// If the returned future is dropped before it resolves, the device is
    /// told to stop and the listener goes back to `Idle`.
    pub async fn listen(&mut self) -> Result<String, SpeechError> {
        self.begin()?;
        let mut pending = PendingListen::new(self);
        let heard = pending.device().listen().await;
        pending.finish(ListenState::Resolved);
        heard
    }

    /// Wait for an utterance for at most `limit`; `None` on timeout.
    pub async fn listen_for(&mut self, limit: Duration) -> Result<Option<String>, SpeechError> {
        self.begin()?;
        let mut pending = PendingListen::new(self);
        let heard = tokio::time::timeout(limit, pending.device().listen()).await;
        match heard {
            Ok(heard) => {
                pending.finish(ListenState::Resolved);
                heard.map(Some)
            }
            Err(_) => {
                pending.device().stop();
                pending.finish(ListenState::TimedOut);
                Ok(None)
            }
        }
    }
}

/// A listen in flight. Dropping it unresolved stops the device.
struct PendingListen<'a> {
    listener: &'a mut Listener,
    done: bool,
}

impl<'a> PendingListen<'a> {
    fn new(listener: &'a mut Listener) -> Self {
        Self {
            listener,
            done: false,
        }
    }

    fn device(&mut self) -> &mut dyn SpeechIn {
        self.listener.device.as_mut()
    }

    fn finish(mut self, state: ListenState) {
        self.listener.state = state;
        self.done = true;
    }
}

impl Drop for PendingListen<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.listener.device.stop();
            self.listener.state = ListenState::Idle;
        }
    }
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Whether a confirmation transcript says yes.
pub fn has_yes(transcript: &str) -> bool {
    split_transcript(transcript)
        .iter()
        .map(|word| normalize(word))
        .any(|word| YES_WORDS.contains(&word.as_str()))
}

/// Drop parenthesised asides and surrounding whitespace before speaking.
pub fn clean_for_speech(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('(') {
        match rest[open..].find(')') {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

/// Speak `text`; a failure is logged and otherwise ignored.
pub async fn say(voice: &mut dyn SpeechOut, text: &str) {
    let text = clean_for_speech(text);
    if let Err(err) = voice.speak(&text).await {
        tracing::warn!("Could not speak {:?}: {}", text, err);
    }
}

/// Ask a yes/no question and wait at most `limit` for the answer.
///
/// Silence, unintelligible speech and device errors all count as "no".
pub async fn ask_yes_no(
    voice: &mut dyn SpeechOut,
    listener: &mut Listener,
    prompt: &str,
    limit: Duration,
) -> bool {
    say(voice, prompt).await;
    match listener.listen_for(limit).await {
        Ok(Some(transcript)) => {
            tracing::info!("Confirmation answer: \"{}\"", transcript);
            has_yes(&transcript)
        }
        Ok(None) => {
            tracing::debug!("No confirmation within {:?}", limit);
            false
        }
        Err(err) => {
            tracing::warn!("Confirmation failed: {}", err);
            false
        }
    }
}
