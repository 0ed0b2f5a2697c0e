//! Surface forms of component names.
//!
//! A learner may name a component by its catalogue name, by one of its
//! aliases, or by a plural of either ("three trees"). Plurals are guessed
//! with a few English spelling rules; wrong guesses are harmless because
//! they only widen the set of accepted words.

use crate::catalogue::Catalogue;

/// Upper bound on plural guesses per surface form.
pub const MAX_PLURAL_GUESSES: usize = 3;

/// Guess plural spellings of a word, most likely first.
///
/// Input without any letters or digits yields no guesses.
pub fn guess_plurals(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    if !chars.iter().any(|c| c.is_alphanumeric()) {
        return Vec::new();
    }
    let lower: Vec<char> = chars.iter().map(char::to_ascii_lowercase).collect();
    let n = chars.len();

    let mut guesses = Vec::new();
    let mut push = |guess: String| {
        if !guesses.contains(&guess) {
            guesses.push(guess);
        }
    };

    push(format!("{word}s"));

    if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| ends_with(&lower, suffix))
    {
        push(format!("{word}es"));
    }

    if n >= 2 && lower[n - 1] == 'y' && !is_vowel(lower[n - 2]) {
        push(format!("{}ies", stem(&chars, 1)));
    }

    if ends_with(&lower, "fe") {
        push(format!("{}ves", stem(&chars, 2)));
    } else if ends_with(&lower, "f") {
        push(format!("{}ves", stem(&chars, 1)));
    }

    guesses.truncate(MAX_PLURAL_GUESSES);
    guesses
}

/// Every way a learner may name `name`: the name, its aliases when `name`
/// is a catalogue key, then plural guesses of each of those.
///
/// The result is ordered and free of duplicates.
pub fn surface_forms(name: &str, catalogue: &Catalogue) -> Vec<String> {
    let mut forms = vec![name.to_string()];
    for alias in catalogue.aliases(name) {
        if !forms.contains(alias) {
            forms.push(alias.clone());
        }
    }

    let originals = forms.len();
    for i in 0..originals {
        for plural in guess_plurals(&forms[i]) {
            if !forms.contains(&plural) {
                forms.push(plural);
            }
        }
    }
    forms
}

fn ends_with(lower: &[char], suffix: &str) -> bool {
    let suffix: Vec<char> = suffix.chars().collect();
    lower.ends_with(&suffix)
}

fn stem(chars: &[char], drop: usize) -> String {
    chars[..chars.len() - drop].iter().collect()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}
