//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - Scripted speech input and recorded speech output
//! - An in-memory card store that can be told to fail
//! - TestContext wiring them into a session
//! - Card fixtures

pub mod fixtures;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;

use hanzi_core::{Catalogue, CharacterCard, QuizSettings, QuizStatus};
use hanzi_quiz::services::{CardStore, Collaborators, Session, StoreError};
use hanzi_quiz::speech::{Listener, SpeechError, SpeechIn, SpeechOut};

/// One scripted reply from the learner.
#[derive(Debug, Clone)]
pub enum Heard {
    Say(String),
    /// Never answers; only safe where the listen has a time limit.
    Silence,
    Fail,
    Closed,
}

pub fn say(text: &str) -> Heard {
    Heard::Say(text.to_string())
}

/// Speech input that plays back a script; an empty script is closed input.
#[derive(Clone, Default)]
pub struct ScriptedEars {
    script: Arc<Mutex<VecDeque<Heard>>>,
}

impl ScriptedEars {
    pub fn new(script: impl IntoIterator<Item = Heard>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into_iter().collect())),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

#[async_trait]
impl SpeechIn for ScriptedEars {
    async fn listen(&mut self) -> Result<String, SpeechError> {
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Heard::Say(text)) => Ok(text),
            Some(Heard::Silence) => std::future::pending().await,
            Some(Heard::Fail) => Err(SpeechError::Unavailable("microphone busy".to_string())),
            Some(Heard::Closed) | None => Err(SpeechError::Closed),
        }
    }
}

/// Speech output that records every utterance.
#[derive(Clone, Default)]
pub struct RecordingVoice {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl RecordingVoice {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn count(&self, text: &str) -> usize {
        self.spoken().iter().filter(|s| s.as_str() == text).count()
    }
}

#[async_trait]
impl SpeechOut for RecordingVoice {
    async fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct StoreState {
    pub catalogue: Catalogue,
    pub saved: Vec<(String, CharacterCard)>,
    pub statuses: Vec<QuizStatus>,
    pub fail_saves: bool,
    /// Card saves still to fail before saving works again.
    pub card_failures_left: usize,
}

/// In-memory card store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
    pub fn with_catalogue(catalogue: Catalogue) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().catalogue = catalogue;
        store
    }

    pub fn failing() -> Self {
        let store = Self::default();
        store.state.lock().unwrap().fail_saves = true;
        store
    }

    /// A store whose first `count` card saves fail.
    pub fn failing_first(count: usize) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().card_failures_left = count;
        store
    }

    pub fn saved_keys(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.saved.iter().map(|(key, _)| key.clone()).collect()
    }

    pub fn last_saved(&self, key: &str) -> Option<CharacterCard> {
        let state = self.state.lock().unwrap();
        state
            .saved
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, card)| card.clone())
    }

    pub fn saved_records(&self) -> Vec<CharacterCard> {
        let state = self.state.lock().unwrap();
        state.saved.iter().map(|(_, card)| card.clone()).collect()
    }

    pub fn status_count(&self) -> usize {
        self.state.lock().unwrap().statuses.len()
    }
}

fn write_failure() -> StoreError {
    StoreError::Io {
        path: "memory".into(),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
    }
}

#[async_trait]
impl CardStore for MemoryStore {
    async fn load_catalogue(&mut self) -> Result<Catalogue, StoreError> {
        Ok(self.state.lock().unwrap().catalogue.clone())
    }

    async fn save_card(&mut self, key: &str, card: &CharacterCard) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_saves {
            return Err(write_failure());
        }
        if state.card_failures_left > 0 {
            state.card_failures_left -= 1;
            return Err(write_failure());
        }
        state.saved.push((key.to_string(), card.clone()));
        Ok(())
    }

    async fn save_quiz_status(&mut self, status: &QuizStatus) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_saves {
            return Err(write_failure());
        }
        state.statuses.push(status.clone());
        Ok(())
    }
}

/// Test context holding handles to every fake a session talks to.
pub struct TestContext {
    pub voice: RecordingVoice,
    pub ears: ScriptedEars,
    pub store: MemoryStore,
}

impl TestContext {
    pub fn new(script: impl IntoIterator<Item = Heard>) -> Self {
        Self::with_store(script, MemoryStore::default())
    }

    pub fn with_store(script: impl IntoIterator<Item = Heard>, store: MemoryStore) -> Self {
        Self {
            voice: RecordingVoice::default(),
            ears: ScriptedEars::new(script),
            store,
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            voice: Box::new(self.voice.clone()),
            ears: Box::new(self.ears.clone()),
            store: Box::new(self.store.clone()),
        }
    }

    /// A listener over the scripted ears, for driving the evaluator directly.
    pub fn listener(&self) -> Listener {
        Listener::new(Box::new(self.ears.clone()))
    }

    /// A session with a fixed random seed.
    pub fn session(&self, catalogue: Catalogue, settings: QuizSettings) -> Session {
        Session::new(catalogue, self.collaborators(), settings).with_rng(StdRng::seed_from_u64(7))
    }
}
