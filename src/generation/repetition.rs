use std::collections::HashSet;

use serde::Serialize;

const MIN_TEXT_CHARS: usize = 100;
const MIN_SENTENCE_CHARS: usize = 10;
const MIN_SENTENCES: usize = 3;
const MIN_WORDS: usize = 20;
const PHRASE_WORDS: usize = 3;

/// Sentence-level duplicate fraction above which a text is repetitive.
pub const SENTENCE_THRESHOLD: f64 = 0.3;
/// Three-word phrase duplicate fraction above which a text is repetitive.
pub const PHRASE_THRESHOLD: f64 = 0.4;

/// Outcome of [`detect_repetition`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RepetitionReport {
    pub sentence_fraction: f64,
    pub phrase_fraction: f64,
    pub repetitive: bool,
}

/// Measures how much of `text` is repeated.
///
/// Short texts (under 100 characters, 3 sentences or 20 words) are never
/// considered repetitive.
pub fn detect_repetition(text: &str) -> RepetitionReport {
    if text.chars().count() < MIN_TEXT_CHARS {
        return RepetitionReport::default();
    }

    let sentences: Vec<&str> = text
        .split('.')
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        .collect();
    if sentences.len() < MIN_SENTENCES {
        return RepetitionReport::default();
    }

    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    if words.len() < MIN_WORDS {
        return RepetitionReport::default();
    }

    let sentence_fraction = duplicate_fraction(sentences.iter().copied());
    let phrase_fraction = duplicate_fraction(words.windows(PHRASE_WORDS));
    let repetitive = sentence_fraction > SENTENCE_THRESHOLD || phrase_fraction > PHRASE_THRESHOLD;
    if repetitive {
        log::warn!(
            "Repetition detected - sentences: {sentence_fraction:.2}, phrases: {phrase_fraction:.2}"
        );
    }

    RepetitionReport {
        sentence_fraction,
        phrase_fraction,
        repetitive,
    }
}

fn duplicate_fraction<I, T>(items: I) -> f64
where
    I: IntoIterator<Item = T>,
    T: Eq + std::hash::Hash,
{
    let mut seen = HashSet::new();
    let mut total = 0usize;
    for item in items {
        seen.insert(item);
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }
    1.0 - seen.len() as f64 / total as f64
}
