//! Acceptable answers of a card.

use crate::catalogue::Catalogue;
use crate::lexicon::surface_forms;
use crate::types::{CharacterCard, ComponentGroup};

/// One concrete acceptable phrasing, in slot order.
pub type Candidate = Vec<String>;

/// Expand one group into every combination of its slots' surface forms.
///
/// An empty group yields no candidates.
pub fn expand_group(group: &ComponentGroup, catalogue: &Catalogue) -> Vec<Candidate> {
    if group.is_empty() {
        return Vec::new();
    }

    let options: Vec<Vec<String>> = group
        .iter()
        .map(|slot| surface_forms(slot, catalogue))
        .collect();

    options.iter().fold(vec![Vec::new()], |partials, forms| {
        partials
            .iter()
            .flat_map(move |partial| {
                forms.iter().map(move |form| {
                    let mut next = partial.clone();
                    next.push(form.clone());
                    next
                })
            })
            .collect()
    })
}

/// All textually acceptable answers for `card`, group by group.
pub fn correct_sets(card: &CharacterCard, catalogue: &Catalogue) -> Vec<Candidate> {
    card.expanded_components
        .iter()
        .flat_map(|group| expand_group(group, catalogue))
        .collect()
}
