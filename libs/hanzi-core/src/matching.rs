//! Answer matching for spoken transcripts.
//!
//! A spoken answer is a word sequence; an acceptable answer is a multiset of
//! component names, some of which span several words ("walking stick").
//! Matching is order independent and insensitive to case and to punctuation
//! around words.

use serde::{Deserialize, Serialize};

/// Word that turns a graded question into a skip.
pub const SKIP_WORD: &str = "skip";

/// A spoken span paired with the target it satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanMatch {
    /// Normalized spoken text.
    pub spoken: String,
    /// Target as given by the caller.
    pub target: String,
}

/// Outcome of covering a target multiset with spoken spans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cover {
    /// Targets no spoken span could be assigned to.
    pub missing: Vec<String>,
    /// Assignments made, longest spans first.
    pub matches: Vec<SpanMatch>,
}

impl Cover {
    /// Whether every target was matched.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Normalize text for comparison: lower-case each word, strip punctuation
/// around it, and collapse whitespace.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a raw transcript into spoken words.
///
/// A comma directly before whitespace is treated as part of the separator.
pub fn split_transcript(transcript: &str) -> Vec<String> {
    transcript
        .trim()
        .to_lowercase()
        .split_whitespace()
        .map(|word| word.strip_suffix(',').unwrap_or(word).to_string())
        .filter(|word| !word.is_empty())
        .collect()
}

/// Whether the learner asked to skip the question.
///
/// Matches the whole word only: "skip" and "skip." count, "skipping" and
/// "skipped" do not, so component names containing the letters are safe.
pub fn is_skip<S: AsRef<str>>(words: &[S]) -> bool {
    words
        .iter()
        .any(|word| normalize(word.as_ref()).split(' ').any(|w| w == SKIP_WORD))
}

/// Try to assign every target a disjoint contiguous span of `spoken`.
///
/// Spans are tried longest first, then left to right, and each span is given
/// to the first still-needed target with the same normalized text. Spoken
/// words are retired once used. This greedy policy lets multi-word names
/// claim their words before single-word names can, but it is not an exact
/// cover search: a different grouping may succeed where this one reports
/// missing targets.
pub fn remove_a_from_b<A, B>(spoken: &[A], targets: &[B]) -> Cover
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let words: Vec<String> = spoken
        .iter()
        .map(|word| normalize(word.as_ref()))
        .filter(|word| !word.is_empty())
        .collect();
    let mut needed: Vec<(String, String)> = targets
        .iter()
        .map(|target| (normalize(target.as_ref()), target.as_ref().to_string()))
        .collect();

    let n = words.len();
    let mut used = vec![false; n];
    let mut matches = Vec::new();

    for len in (1..=n).rev() {
        for start in 0..=n - len {
            if needed.is_empty() {
                break;
            }
            let span = start..start + len;
            if used[span.clone()].iter().any(|&u| u) {
                continue;
            }
            let combo = words[span.clone()].join(" ");
            if let Some(i) = needed.iter().position(|(norm, _)| *norm == combo) {
                let (_, target) = needed.remove(i);
                matches.push(SpanMatch {
                    spoken: combo,
                    target,
                });
                used[span].iter_mut().for_each(|u| *u = true);
            }
        }
    }

    Cover {
        missing: needed.into_iter().map(|(_, target)| target).collect(),
        matches,
    }
}

/// Whether `spoken` covers every element of `targets`.
pub fn covers<A, B>(spoken: &[A], targets: &[B]) -> bool
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    remove_a_from_b(spoken, targets).is_complete()
}
