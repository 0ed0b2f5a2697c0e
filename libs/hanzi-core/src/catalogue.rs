//! In-memory card catalogue.
//!
//! The stored database is a JSON object keyed by card. Key order is kept as
//! received because batch selection takes the first due cards in that order.

use crate::error::{CatalogueError, Result};
use crate::types::{CharacterCard, MIN_EASE};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// All cards of one learner, keyed by a stable identifier.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    order: Vec<String>,
    cards: HashMap<String, CharacterCard>,
}

impl Catalogue {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalogue from the stored JSON document.
    pub fn from_json(content: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(content)?;
        match root {
            Value::Object(entries) => Self::from_map(entries),
            _ => Err(CatalogueError::NotAnObject),
        }
    }

    /// Build a catalogue from already parsed entries.
    ///
    /// Every entry is checked here so that malformed cards fail the load
    /// rather than a later question.
    pub fn from_map(entries: Map<String, Value>) -> Result<Self> {
        let mut catalogue = Self::new();
        for (key, value) in entries {
            let mut card: CharacterCard = serde_json::from_value(value)
                .map_err(|source| CatalogueError::InvalidCard {
                    key: key.clone(),
                    source,
                })?;
            if card.review.ease.is_nan() || card.review.ease < MIN_EASE {
                card.review.ease = MIN_EASE;
            }
            catalogue.insert(key, card);
        }
        Ok(catalogue)
    }

    /// Insert or replace a card. New keys go to the end of the order.
    pub fn insert(&mut self, key: impl Into<String>, card: CharacterCard) {
        let key = key.into();
        if self.cards.insert(key.clone(), card).is_none() {
            self.order.push(key);
        }
    }

    pub fn get(&self, key: &str) -> Option<&CharacterCard> {
        self.cards.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut CharacterCard> {
        self.cards.get_mut(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.cards.contains_key(key)
    }

    /// Aliases of a catalogue key, empty for names that are not keys.
    pub fn aliases(&self, key: &str) -> &[String] {
        self.cards
            .get(key)
            .map(|card| card.aliases.as_slice())
            .unwrap_or(&[])
    }

    /// Keys in the order they were received.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Clear session flags on every card.
    pub fn reset_transient(&mut self) {
        for card in self.cards.values_mut() {
            card.reset_transient();
        }
    }

    /// Recompute `is_due` for every card.
    pub fn refresh_due(&mut self, now: DateTime<Utc>) {
        for card in self.cards.values_mut() {
            card.is_due = card.review.is_due_at(now);
        }
    }

    /// Keys of cards that can be quizzed now, in catalogue order.
    pub fn eligible_keys(&self, min_components: usize) -> Vec<String> {
        self.order
            .iter()
            .filter(|key| {
                self.cards.get(key.as_str()).is_some_and(|card| {
                    card.is_due
                        && card.is_active
                        && card.is_hanzi
                        && card.component_count() >= min_components
                })
            })
            .cloned()
            .collect()
    }
}
