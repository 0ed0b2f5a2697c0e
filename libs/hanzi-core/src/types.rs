//! Core types for the character quiz.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ease never drops below this value.
pub const MIN_EASE: f64 = 1.3;

/// Ease given to cards that have never been scheduled.
pub const INITIAL_EASE: f64 = 2.5;

/// One acceptable answer group: every slot must be named.
pub type ComponentGroup = Vec<String>;

/// Scheduling state of a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    #[serde(default)]
    pub interval: u32,
    #[serde(default)]
    pub repetition: u32,
    #[serde(default = "default_ease")]
    pub ease: f64,
    #[serde(default = "Utc::now")]
    pub next_review: DateTime<Utc>,
}

fn default_ease() -> f64 {
    INITIAL_EASE
}

impl ReviewState {
    /// State for a card that is due right away.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            interval: 0,
            repetition: 0,
            ease: INITIAL_EASE,
            next_review: now,
        }
    }

    /// Whether the card should be reviewed at `now`.
    pub fn is_due_at(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }
}

impl Default for ReviewState {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

/// A quizzable character and its learning state.
///
/// Field names follow the stored database. Fields this crate does not know
/// about are kept in `extra` and written back untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterCard {
    /// Display glyph.
    #[serde(default)]
    pub hanzi: String,
    #[serde(rename = "Aliases", alias = "aliases", default)]
    pub aliases: Vec<String>,
    /// OR across groups, AND across the slots of one group.
    #[serde(
        rename = "expanded_components",
        alias = "expandedComponents",
        default
    )]
    pub expanded_components: Vec<ComponentGroup>,

    #[serde(flatten)]
    pub review: ReviewState,
    #[serde(rename = "isDue", default = "default_true")]
    pub is_due: bool,

    #[serde(default)]
    pub skipped: bool,
    #[serde(rename = "isMarked", default)]
    pub is_marked: bool,
    #[serde(rename = "isFalseNegative", default)]
    pub is_false_negative: bool,
    #[serde(rename = "falseNegativeAnswer", default)]
    pub false_negative_answer: Vec<String>,

    #[serde(rename = "isActive", default)]
    pub is_active: bool,
    #[serde(rename = "isHanzi", default)]
    pub is_hanzi: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_true() -> bool {
    true
}

impl CharacterCard {
    /// Create an active character card with the given answer groups.
    pub fn new(hanzi: impl Into<String>, expanded_components: Vec<ComponentGroup>) -> Self {
        Self {
            hanzi: hanzi.into(),
            aliases: Vec::new(),
            expanded_components,
            review: ReviewState::default(),
            is_due: true,
            skipped: false,
            is_marked: false,
            is_false_negative: false,
            false_negative_answer: Vec::new(),
            is_active: true,
            is_hanzi: true,
            extra: Map::new(),
        }
    }

    /// Total number of component slots across all groups.
    pub fn component_count(&self) -> usize {
        self.expanded_components.iter().map(Vec::len).sum()
    }

    /// Clear the flags that only live for one session.
    pub fn reset_transient(&mut self) {
        self.skipped = false;
        self.is_marked = false;
        self.is_false_negative = false;
        self.false_negative_answer.clear();
    }
}

/// Which matching layer accepted or rejected an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Spoken words cover a candidate textually.
    Exact,
    /// Spoken words cover a candidate by phonetic code.
    Phonetic,
    /// Learner confirmed a near miss.
    Confirmed,
    /// Learner declined, or did not answer, the confirmation.
    Rejected,
    /// Card has no candidate answers at all.
    NoCandidates,
}

/// Near miss accepted by the learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub spoken: Vec<String>,
}

/// Graded result of one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub passed: bool,
    pub kind: MatchKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correction: Option<Correction>,
}

impl Verdict {
    pub fn pass(kind: MatchKind) -> Self {
        Self {
            passed: true,
            kind,
            correction: None,
        }
    }

    pub fn fail(kind: MatchKind) -> Self {
        Self {
            passed: false,
            kind,
            correction: None,
        }
    }
}

/// Stamp written once a batch completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStatus {
    /// Date in `YYYY-MM-DD` form.
    pub last_completed: String,
}

impl QuizStatus {
    pub fn completed_on(now: DateTime<Utc>) -> Self {
        Self {
            last_completed: now.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Quiz session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSettings {
    /// Cards per batch.
    pub batch_size: usize,
    /// Cards with fewer component slots than this are never quizzed.
    pub min_components: usize,
    pub confirm_timeout_ms: u64,
    pub continue_timeout_ms: u64,
    /// Consecutive speech-in failures tolerated before the session ends.
    pub max_listen_failures: u32,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            batch_size: 10,
            min_components: 2,
            confirm_timeout_ms: 5_000,
            continue_timeout_ms: 20_000,
            max_listen_failures: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn card_defaults_missing_fields() {
        let card: CharacterCard = serde_json::from_value(json!({ "hanzi": "马" })).unwrap();
        assert_eq!(card.review.interval, 0);
        assert_eq!(card.review.repetition, 0);
        assert_eq!(card.review.ease, INITIAL_EASE);
        assert!(card.is_due);
        assert!(card.expanded_components.is_empty());
        assert!(card.aliases.is_empty());
    }

    #[test]
    fn card_keeps_unknown_fields() {
        let value = json!({
            "hanzi": "马",
            "Aliases": ["equine"],
            "Sequenz": "42",
            "nextReview": "2024-03-01T00:00:00Z",
        });
        let card: CharacterCard = serde_json::from_value(value).unwrap();
        assert_eq!(card.aliases, vec!["equine"]);
        assert_eq!(card.extra.get("Sequenz"), Some(&json!("42")));

        let written = serde_json::to_value(&card).unwrap();
        assert_eq!(written["Sequenz"], json!("42"));
        assert_eq!(written["Aliases"], json!(["equine"]));
        assert!(written.get("nextReview").is_some());
        assert!(written.get("isFalseNegative").is_some());
    }

    #[test]
    fn camel_case_components_alias() {
        let card: CharacterCard =
            serde_json::from_value(json!({ "expandedComponents": [["sun", "moon"]] })).unwrap();
        assert_eq!(card.component_count(), 2);
    }

    #[test]
    fn due_is_inclusive() {
        let now = Utc::now();
        let state = ReviewState::new(now);
        assert!(state.is_due_at(now));
        assert!(!state.is_due_at(now - Duration::seconds(1)));
    }

    #[test]
    fn reset_transient_clears_session_flags() {
        let mut card = CharacterCard::new("马", vec![vec!["horse".into()]]);
        card.skipped = true;
        card.is_marked = true;
        card.is_false_negative = true;
        card.false_negative_answer = vec!["hoarse".into()];
        card.reset_transient();
        assert!(!card.skipped && !card.is_marked && !card.is_false_negative);
        assert!(card.false_negative_answer.is_empty());
    }

    #[test]
    fn quiz_status_date_format() {
        let now = "2024-05-06T23:10:00Z".parse::<DateTime<Utc>>().unwrap();
        let status = QuizStatus::completed_on(now);
        assert_eq!(status.last_completed, "2024-05-06");
        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            json!({ "lastCompleted": "2024-05-06" })
        );
    }
}
