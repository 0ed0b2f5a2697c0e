//! Quiz session loop.
//!
//! A session owns the catalogue and every collaborator for its whole run.
//! One question is in flight at a time: a card is picked, heard, evaluated
//! and scheduled before the next card is picked.

use crate::error::{Result, SessionError};
use crate::services::evaluator::{Evaluation, Evaluator};
use crate::services::store::CardStore;
use crate::speech::{ask_yes_no, say, Listener, SpeechError, SpeechIn, SpeechOut};
use chrono::Utc;
use hanzi_core::algorithm::sm2::Sm2;
use hanzi_core::{
    schedule_card, split_transcript, Catalogue, QuizSettings, QuizStatus,
    SpacedRepetitionAlgorithm,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

/// External collaborators a session talks to.
pub struct Collaborators {
    pub voice: Box<dyn SpeechOut>,
    pub ears: Box<dyn SpeechIn>,
    pub store: Box<dyn CardStore>,
}

/// Counts reported when a session ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub batches: usize,
    pub graded: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub false_negatives: usize,
    pub abandoned: usize,
    pub save_failures: usize,
    /// Speech input closed or failed before the last batch finished.
    pub stopped_early: bool,
}

enum Question {
    Answered(Evaluation),
    Abandoned,
    InputClosed,
}

#[derive(Debug, PartialEq, Eq)]
enum BatchEnd {
    Completed,
    InputClosed,
}

/// A quiz session over one catalogue.
pub struct Session {
    catalogue: Catalogue,
    settings: QuizSettings,
    scheduler: Box<dyn SpacedRepetitionAlgorithm>,
    evaluator: Evaluator,
    voice: Box<dyn SpeechOut>,
    listener: Listener,
    store: Box<dyn CardStore>,
    rng: StdRng,
    dirty: Vec<String>,
    listen_failures: u32,
    summary: SessionSummary,
}

impl Session {
    pub fn new(catalogue: Catalogue, collaborators: Collaborators, settings: QuizSettings) -> Self {
        let evaluator = Evaluator::new(Duration::from_millis(settings.confirm_timeout_ms));
        Self {
            catalogue,
            settings,
            scheduler: Box::new(Sm2::default()),
            evaluator,
            voice: collaborators.voice,
            listener: Listener::new(collaborators.ears),
            store: collaborators.store,
            rng: StdRng::from_entropy(),
            dirty: Vec::new(),
            listen_failures: 0,
            summary: SessionSummary::default(),
        }
    }

    /// Load the catalogue from the collaborators' store and build a session.
    pub async fn load(mut collaborators: Collaborators, settings: QuizSettings) -> Result<Self> {
        let catalogue = collaborators.store.load_catalogue().await?;
        Ok(Self::new(catalogue, collaborators, settings))
    }

    pub fn with_scheduler(mut self, scheduler: Box<dyn SpacedRepetitionAlgorithm>) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Keys changed since the last successful save.
    pub fn dirty_keys(&self) -> &[String] {
        &self.dirty
    }

    /// Counts so far; complete once `run` has returned, even with an error.
    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    /// Run batches until none are left or the learner stops.
    pub async fn run(&mut self) -> Result<SessionSummary> {
        let span = tracing::info_span!("session", id = %Uuid::new_v4());
        self.run_batches().instrument(span).await
    }

    async fn run_batches(&mut self) -> Result<SessionSummary> {
        // Session flags of unsaved cards must survive until they are written.
        self.catalogue.reset_transient();
        loop {
            self.catalogue.refresh_due(Utc::now());

            let remaining = self.catalogue.eligible_keys(self.settings.min_components);
            if remaining.is_empty() {
                tracing::info!("No cards are due");
                break;
            }

            let batch: Vec<String> = remaining
                .iter()
                .take(self.settings.batch_size)
                .cloned()
                .collect();
            self.summary.batches += 1;
            tracing::info!(
                "Starting batch {} with {} of {} due cards",
                self.summary.batches,
                batch.len(),
                remaining.len()
            );

            let end = match self.run_batch(batch).await {
                Ok(end) => end,
                Err(err) => {
                    tracing::error!("Stopping session: {}", err);
                    self.stop_early().await;
                    say(self.voice.as_mut(), "Quiz complete!").await;
                    return Err(err);
                }
            };
            if end == BatchEnd::InputClosed {
                tracing::info!("Speech input closed; saving and stopping");
                self.stop_early().await;
                break;
            }

            say(self.voice.as_mut(), "Batch complete!").await;
            self.finish_batch().await;

            if remaining.len() <= self.settings.batch_size {
                break;
            }
            let limit = Duration::from_millis(self.settings.continue_timeout_ms);
            let next = ask_yes_no(
                self.voice.as_mut(),
                &mut self.listener,
                "Do you want to continue with the next batch?",
                limit,
            )
            .await;
            if !next {
                break;
            }
        }

        say(self.voice.as_mut(), "Quiz complete!").await;
        tracing::info!(summary = ?self.summary, "Session finished");
        Ok(self.summary.clone())
    }

    async fn run_batch(&mut self, mut batch: Vec<String>) -> Result<BatchEnd> {
        while !batch.is_empty() {
            let index = self.rng.gen_range(0..batch.len());
            let key = batch[index].clone();

            let evaluation = match self.ask_question(&key).await? {
                Question::Answered(evaluation) => evaluation,
                Question::Abandoned => {
                    self.summary.abandoned += 1;
                    continue;
                }
                Question::InputClosed => return Ok(BatchEnd::InputClosed),
            };

            self.record(&key, &evaluation);
            if evaluation.removes_from_batch() {
                batch.swap_remove(index);
            }
        }
        Ok(BatchEnd::Completed)
    }

    /// Grade and count one evaluated answer. Skips are not graded.
    fn record(&mut self, key: &str, evaluation: &Evaluation) {
        match evaluation {
            Evaluation::Skipped => self.summary.skipped += 1,
            Evaluation::Graded(verdict) => {
                if let Some(card) = self.catalogue.get_mut(key) {
                    let next_due =
                        schedule_card(self.scheduler.as_ref(), card, verdict.passed, Utc::now());
                    tracing::debug!(
                        "{} next due {} (interval {}, ease {:.2})",
                        key,
                        next_due.to_rfc3339(),
                        card.review.interval,
                        card.review.ease
                    );
                }
                self.summary.graded += 1;
                if verdict.passed {
                    self.summary.passed += 1;
                } else {
                    self.summary.failed += 1;
                }
                if verdict.correction.is_some() {
                    self.summary.false_negatives += 1;
                }
            }
        }
        self.mark_dirty(key);
    }

    async fn ask_question(&mut self, key: &str) -> Result<Question> {
        say(
            self.voice.as_mut(),
            &format!("What are the components of '{key}'?"),
        )
        .await;

        loop {
            match self.listener.listen().await {
                Ok(transcript) => {
                    self.listen_failures = 0;
                    let words = split_transcript(&transcript);
                    if words.is_empty() {
                        tracing::debug!("Empty transcript; listening again");
                        continue;
                    }
                    tracing::info!("Heard \"{}\" for {}", transcript.trim(), key);
                    let evaluation = self
                        .evaluator
                        .evaluate(
                            &mut self.catalogue,
                            key,
                            &words,
                            self.voice.as_mut(),
                            &mut self.listener,
                        )
                        .await;
                    return Ok(Question::Answered(evaluation));
                }
                Err(SpeechError::Closed) => return Ok(Question::InputClosed),
                Err(err) => {
                    self.listen_failures += 1;
                    tracing::warn!("Could not listen for {}: {}", key, err);
                    if self.listen_failures >= self.settings.max_listen_failures {
                        return Err(SessionError::ListenerUnavailable {
                            attempts: self.listen_failures,
                            source: err,
                        });
                    }
                    return Ok(Question::Abandoned);
                }
            }
        }
    }

    async fn stop_early(&mut self) {
        self.summary.stopped_early = true;
        self.save_changes().await;
    }

    fn mark_dirty(&mut self, key: &str) {
        if !self.dirty.iter().any(|k| k == key) {
            self.dirty.push(key.to_string());
        }
    }

    async fn finish_batch(&mut self) {
        let status = QuizStatus::completed_on(Utc::now());
        if let Err(e) = self.store.save_quiz_status(&status).await {
            tracing::error!("Error saving quiz status: {}", e);
        }

        if self.save_changes().await {
            tracing::info!("Changes saved successfully");
            say(self.voice.as_mut(), "Data saved!").await;
        }
    }

    /// Save every dirty card once. Keys that fail stay dirty.
    async fn save_changes(&mut self) -> bool {
        let mut failed = Vec::new();
        for key in std::mem::take(&mut self.dirty) {
            let Some(card) = self.catalogue.get(&key) else {
                continue;
            };
            if let Err(e) = self.store.save_card(&key, card).await {
                tracing::error!("Error saving card {}: {}", key, e);
                self.summary.save_failures += 1;
                failed.push(key);
            }
        }
        let saved = failed.is_empty();
        self.dirty = failed;
        saved
    }
}
