//! Core library for the spoken character-component quiz.
//!
//! Provides:
//! - Card catalogue loading with defaults for unscheduled cards
//! - Expansion of component groups into every acceptable answer
//! - Multiset matching of spoken words, textual and phonetic
//! - SM-2 style pass/fail scheduling
//! - Shared types (CharacterCard, ReviewState, Verdict, etc.)

pub mod algorithm;
pub mod answers;
pub mod assessment;
pub mod catalogue;
pub mod error;
pub mod lexicon;
pub mod matching;
pub mod phonetic;
pub mod types;

pub use algorithm::{schedule_card, SchedulingResult, SpacedRepetitionAlgorithm};
pub use answers::{correct_sets, expand_group, Candidate};
pub use assessment::{AnswerChecker, Assessment};
pub use catalogue::Catalogue;
pub use error::{CatalogueError, Result};
pub use lexicon::{guess_plurals, surface_forms};
pub use matching::{covers, is_skip, normalize, remove_a_from_b, split_transcript, Cover, SpanMatch};
pub use phonetic::PhoneticEncoder;
pub use types::{
    CharacterCard, ComponentGroup, Correction, MatchKind, QuizSettings, QuizStatus, ReviewState,
    Verdict,
};
