//! Layered assessment of a spoken answer.
//!
//! The textual layer runs first; the phonetic layer only runs when no
//! candidate matched textually, and encodes candidates one at a time so a
//! match stops the work early. Whatever neither layer accepts is left to
//! the learner's own judgement by the caller.

use crate::answers::{correct_sets, Candidate};
use crate::catalogue::Catalogue;
use crate::matching::{remove_a_from_b, SpanMatch};
use crate::phonetic::PhoneticEncoder;
use crate::types::{CharacterCard, MatchKind};

/// What the matching layers concluded about a spoken answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Assessment {
    /// A candidate matched textually.
    Exact {
        candidate: Candidate,
        matches: Vec<SpanMatch>,
    },
    /// A candidate matched by phonetic code.
    Phonetic {
        candidate: Candidate,
        matches: Vec<SpanMatch>,
    },
    /// Nothing matched; `model_answer` is the first candidate.
    Unmatched { model_answer: Candidate },
    /// The card has no acceptable answers at all.
    NoCandidates,
}

impl Assessment {
    /// Matching layer that accepted the answer, if any.
    pub fn accepted_by(&self) -> Option<MatchKind> {
        match self {
            Self::Exact { .. } => Some(MatchKind::Exact),
            Self::Phonetic { .. } => Some(MatchKind::Phonetic),
            Self::Unmatched { .. } | Self::NoCandidates => None,
        }
    }
}

/// Runs the exact and phonetic matching layers.
#[derive(Debug, Default)]
pub struct AnswerChecker {
    encoder: PhoneticEncoder,
}

impl AnswerChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assess `spoken` against every acceptable answer of `card`.
    pub fn assess<S: AsRef<str>>(
        &self,
        card: &CharacterCard,
        catalogue: &Catalogue,
        spoken: &[S],
    ) -> Assessment {
        let candidates = correct_sets(card, catalogue);
        self.assess_candidates(candidates, spoken)
    }

    /// Assess `spoken` against an already built candidate list.
    pub fn assess_candidates<S: AsRef<str>>(
        &self,
        candidates: Vec<Candidate>,
        spoken: &[S],
    ) -> Assessment {
        if candidates.is_empty() {
            return Assessment::NoCandidates;
        }

        for candidate in &candidates {
            let cover = remove_a_from_b(spoken, candidate);
            if cover.is_complete() {
                return Assessment::Exact {
                    candidate: candidate.clone(),
                    matches: cover.matches,
                };
            }
        }

        let spoken_codes = self.encoder.encode_all(spoken);
        for candidate in &candidates {
            let codes: Vec<String> = candidate
                .iter()
                .map(|name| self.encoder.phrase_code(name))
                .collect();
            let cover = remove_a_from_b(&spoken_codes, &codes);
            if cover.is_complete() {
                return Assessment::Phonetic {
                    candidate: candidate.clone(),
                    matches: cover.matches,
                };
            }
        }

        let model_answer = candidates.into_iter().next().unwrap_or_default();
        Assessment::Unmatched { model_answer }
    }
}
