//! Disallowed-word detection and redaction for user-visible text.
//!
//! Matching is case-insensitive and anchored on word boundaries, so a
//! blocked four-letter word never fires inside an unrelated longer word.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::StoreError;

/// Vocabulary redacted from review text and rejected in submissions.
pub const DEFAULT_VOCABULARY: &[&str] = &[
    "damn", "hell", "crap", "shit", "fuck", "ass", "bitch", "bastard", "dick", "piss", "cock",
    "pussy", "whore", "slut", "fag", "dyke", "retard", "idiot", "stupid", "dumb", "moron",
    "imbecile",
];

lazy_static! {
    static ref DEFAULT_PATTERN: Regex =
        compile_vocabulary(DEFAULT_VOCABULARY).expect("default vocabulary compiles");
}

/// Outcome of checking a user-submitted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub message: String,
}

/// Whole-word matcher over a fixed disallowed vocabulary.
///
/// Construct one instance and inject it where needed (the review engine
/// takes one); there is no ambient global.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    pattern: Regex,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.clone(),
        }
    }
}

fn compile_vocabulary(words: &[&str]) -> Result<Regex, regex::Error> {
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))
}

/// Mask a matched word: keep the first and last character, replace the
/// interior with asterisks. Words of one or two characters are fully
/// masked. Output length always equals input length.
fn mask_word(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() <= 2 {
        return "*".repeat(chars.len());
    }
    let mut masked = String::with_capacity(word.len());
    masked.push(chars[0]);
    for _ in 0..chars.len() - 2 {
        masked.push('*');
    }
    masked.push(chars[chars.len() - 1]);
    masked
}

impl Sanitizer {
    /// Build a sanitizer over a custom vocabulary.
    pub fn new(words: &[&str]) -> Result<Self, StoreError> {
        let pattern = compile_vocabulary(words)
            .map_err(|e| StoreError::Parse(format!("invalid vocabulary: {}", e)))?;
        Ok(Self { pattern })
    }

    /// Does the text contain any disallowed word as a standalone token?
    pub fn contains(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        self.pattern.is_match(text)
    }

    /// Replace each disallowed word with its masked form. Text without
    /// matches passes through unchanged.
    pub fn redact(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, |caps: &regex::Captures| mask_word(&caps[0]))
            .into_owned()
    }

    /// Check a user-submitted field; the message references `field_label`
    /// so the UI can show it verbatim.
    pub fn validate(&self, text: &str, field_label: &str) -> Validation {
        if self.contains(text) {
            Validation {
                valid: false,
                message: format!(
                    "{} contains inappropriate language. Please revise your text.",
                    field_label
                ),
            }
        } else {
            Validation {
                valid: true,
                message: String::new(),
            }
        }
    }

    /// Split a comma-separated list, drop any entry containing a
    /// disallowed word, and rejoin with ", ".
    pub fn clean_list(&self, list: &str) -> String {
        list.split(',')
            .map(str::trim)
            .filter(|entry| !self.contains(entry))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
