//! Card fixtures.

use chrono::{Duration, Utc};

use hanzi_core::{Catalogue, CharacterCard, ComponentGroup};

pub fn group(items: &[&str]) -> ComponentGroup {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn card(hanzi: &str, groups: &[&[&str]]) -> CharacterCard {
    CharacterCard::new(hanzi, groups.iter().map(|g| group(g)).collect())
}

/// A single "horse" card known also as "equine".
pub fn horse_catalogue() -> Catalogue {
    let mut catalogue = Catalogue::new();
    let mut horse = card("马", &[&["horse"]]);
    horse.aliases = vec!["equine".to_string()];
    catalogue.insert("horse", horse);
    catalogue
}

/// Component cards "sun" and "moon" plus the characters built from them.
pub fn sun_moon_catalogue(keys: &[&str]) -> Catalogue {
    let mut catalogue = Catalogue::new();
    catalogue.insert("sun", card("日", &[&["sun"]]));
    catalogue.insert("moon", card("月", &[&["moon"]]));
    for key in keys {
        catalogue.insert(*key, card("明", &[&["sun", "moon"]]));
    }
    catalogue
}

/// `count` quizzable cards named `card-0`, `card-1`, ...
pub fn numbered_catalogue(count: usize) -> Catalogue {
    let keys: Vec<String> = (0..count).map(|i| format!("card-{i}")).collect();
    let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
    sun_moon_catalogue(&keys)
}

/// A card that is scheduled for tomorrow.
pub fn not_due(mut card: CharacterCard) -> CharacterCard {
    card.review.next_review = Utc::now() + Duration::days(1);
    card.review.interval = 1;
    card.review.repetition = 1;
    card
}
