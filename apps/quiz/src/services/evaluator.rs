//! Answer evaluation with a human override.
//!
//! Exact and phonetic matching decide most answers. When neither accepts,
//! the learner hears their answer next to a model answer and is asked
//! whether they were right anyway; a "yes" passes the answer and records it
//! as a false negative on the card.

use crate::speech::{ask_yes_no, say, Listener, SpeechOut};
use hanzi_core::{
    correct_sets, is_skip, AnswerChecker, Assessment, Catalogue, Correction, MatchKind, SpanMatch,
    Verdict,
};
use std::time::Duration;

/// Result of evaluating one spoken answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// The learner asked to skip; nothing was graded.
    Skipped,
    Graded(Verdict),
}

impl Evaluation {
    /// Whether the card leaves the current batch.
    pub fn removes_from_batch(&self) -> bool {
        match self {
            Self::Skipped => true,
            Self::Graded(verdict) => verdict.passed,
        }
    }
}

/// Evaluates spoken answers against the catalogue.
#[derive(Debug)]
pub struct Evaluator {
    checker: AnswerChecker,
    confirm_timeout: Duration,
}

impl Evaluator {
    pub fn new(confirm_timeout: Duration) -> Self {
        Self {
            checker: AnswerChecker::new(),
            confirm_timeout,
        }
    }

    /// Evaluate `spoken` as an answer for the card `key`.
    ///
    /// Writes only the card's session flags: `skipped` on a skip, and the
    /// false-negative pair, which is cleared first so it reflects this
    /// attempt alone.
    pub async fn evaluate(
        &self,
        catalogue: &mut Catalogue,
        key: &str,
        spoken: &[String],
        voice: &mut dyn SpeechOut,
        listener: &mut Listener,
    ) -> Evaluation {
        if !catalogue.contains(key) {
            tracing::warn!("Card {} is not in the catalogue", key);
            return Evaluation::Graded(Verdict::fail(MatchKind::NoCandidates));
        }

        if is_skip(spoken) {
            if let Some(card) = catalogue.get_mut(key) {
                card.skipped = true;
            }
            tracing::info!("Skipped {}", key);
            return Evaluation::Skipped;
        }

        if let Some(card) = catalogue.get_mut(key) {
            card.is_false_negative = false;
            card.false_negative_answer.clear();
        }

        let (glyph, candidates) = {
            let shared: &Catalogue = catalogue;
            shared
                .get(key)
                .map(|card| (card.hanzi.clone(), correct_sets(card, shared)))
                .unwrap_or_default()
        };

        let model_answer = match self.checker.assess_candidates(candidates, spoken) {
            Assessment::Exact { matches, .. } => {
                return accept(voice, key, MatchKind::Exact, &matches).await;
            }
            Assessment::Phonetic { matches, .. } => {
                return accept(voice, key, MatchKind::Phonetic, &matches).await;
            }
            Assessment::NoCandidates => {
                tracing::warn!("Card {} has no acceptable answers; counting as a fail", key);
                return Evaluation::Graded(Verdict::fail(MatchKind::NoCandidates));
            }
            Assessment::Unmatched { model_answer } => model_answer,
        };

        tracing::info!(
            "\"{}\" is incorrect for {} ({}). The correct answer is: {}",
            spoken.join(" "),
            key,
            glyph,
            model_answer.join(" ")
        );

        let prompt = format!(
            "You said: {}. The correct answer is: {}. Were you correct?",
            spoken.join(", "),
            model_answer.join(", and ")
        );
        if !ask_yes_no(voice, listener, &prompt, self.confirm_timeout).await {
            return Evaluation::Graded(Verdict::fail(MatchKind::Rejected));
        }

        tracing::info!("Learner confirmed \"{}\" for {}", spoken.join(" "), key);
        if let Some(card) = catalogue.get_mut(key) {
            card.is_false_negative = true;
            card.false_negative_answer = spoken.to_vec();
        }
        Evaluation::Graded(Verdict {
            passed: true,
            kind: MatchKind::Confirmed,
            correction: Some(Correction {
                spoken: spoken.to_vec(),
            }),
        })
    }
}

async fn accept(
    voice: &mut dyn SpeechOut,
    key: &str,
    kind: MatchKind,
    matches: &[SpanMatch],
) -> Evaluation {
    for m in matches {
        tracing::debug!("{}: heard \"{}\" as {}", key, m.spoken, m.target);
    }
    tracing::info!("Accepted answer for {} ({:?} match)", key, kind);
    say(voice, "Correct!").await;
    Evaluation::Graded(Verdict::pass(kind))
}
