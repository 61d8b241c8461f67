use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::utils::{increment, increment_nested, is_capitalized, FreqDist};

/// Which of the two suffix models a word belongs to, decided by its first character.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CaseClass {
    Capitalized,
    Lowercase,
}

impl CaseClass {
    /// Case class of `word`. Words that do not start with an uppercase
    /// letter (digits, punctuation, the empty string) count as lowercase.
    pub fn of(word: &str) -> Self {
        if is_capitalized(word) {
            CaseClass::Capitalized
        } else {
            CaseClass::Lowercase
        }
    }
}

/// Frequency counts of a bigram hidden Markov model.
///
/// Counts are filled in during training through the `record_*` methods
/// and turned into maximum likelihood estimates by the `*_probability`
/// methods. Every map keeps keys in first-seen order, so the tag order
/// (and with it the decoder's tie-breaking) depends only on the order of
/// the training data.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct FrequencyModel {
    sentence_count: u64,
    tag_counts: FreqDist,
    tag_start_counts: FreqDist,
    word_counts: FreqDist,
    transition_counts: IndexMap<String, FreqDist>,
    tag_word_counts: IndexMap<String, FreqDist>,
    word_tag_counts: IndexMap<String, FreqDist>,
}

impl FrequencyModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the tag of the first word of a sentence.
    pub fn record_sentence_start(&mut self, tag: &str) {
        increment(&mut self.tag_start_counts, tag);
        self.sentence_count += 1;
    }

    /// Record two adjacent tags within one sentence.
    pub fn record_transition(&mut self, from_tag: &str, to_tag: &str) {
        increment_nested(&mut self.transition_counts, from_tag, to_tag);
    }

    /// Record one tagged token.
    ///
    /// The tag-by-word and word-by-tag tables are only ever updated here,
    /// together, so they always hold the same joint counts.
    pub fn record_emission(&mut self, tag: &str, word: &str) {
        increment(&mut self.tag_counts, tag);
        increment(&mut self.word_counts, word);
        increment_nested(&mut self.tag_word_counts, tag, word);
        increment_nested(&mut self.word_tag_counts, word, tag);
    }

    /// P(tag | sentence start).
    pub fn start_probability(&self, tag: &str) -> Result<f64, ModelError> {
        if self.sentence_count == 0 {
            return Err(ModelError::UndefinedProbability {
                estimator: "start",
                key: tag.to_owned(),
            });
        }

        Ok(self.tag_start_count(tag) as f64 / self.sentence_count as f64)
    }

    /// P(to_tag | from_tag).
    pub fn transition_probability(&self, from_tag: &str, to_tag: &str) -> Result<f64, ModelError> {
        let from_count = self.tag_count(from_tag);
        if from_count == 0 {
            return Err(ModelError::UndefinedProbability {
                estimator: "transition",
                key: format!("{} -> {}", from_tag, to_tag),
            });
        }

        Ok(self.transition_count(from_tag, to_tag) as f64 / from_count as f64)
    }

    /// P(word | tag). Only meaningful for words seen in training; unknown
    /// words get their estimate from the suffix models instead.
    pub fn emission_probability(&self, tag: &str, word: &str) -> Result<f64, ModelError> {
        let tag_count = self.tag_count(tag);
        if tag_count == 0 {
            return Err(ModelError::UndefinedProbability {
                estimator: "emission",
                key: format!("{} | {}", word, tag),
            });
        }

        Ok(self.tag_word_count(tag, word) as f64 / tag_count as f64)
    }

    /// Distinct words of the given case class.
    pub fn vocabulary(&self, case: CaseClass) -> impl Iterator<Item = &str> + '_ {
        self.word_counts
            .keys()
            .map(String::as_str)
            .filter(move |word| CaseClass::of(word) == case)
    }

    /// Tags observed with `word`, along with how often.
    pub fn tags_of<'a>(&'a self, word: &str) -> impl Iterator<Item = (&'a str, u64)> + 'a {
        self.word_tag_counts
            .get(word)
            .into_iter()
            .flat_map(|dist| dist.iter().map(|(tag, &count)| (tag.as_str(), count)))
    }

    /// All observed tags, in first-seen order.
    pub fn all_tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.tag_counts.keys().map(String::as_str)
    }

    pub fn sentence_count(&self) -> u64 {
        self.sentence_count
    }

    pub fn tag_count(&self, tag: &str) -> u64 {
        self.tag_counts.get(tag).copied().unwrap_or(0)
    }

    pub fn tag_start_count(&self, tag: &str) -> u64 {
        self.tag_start_counts.get(tag).copied().unwrap_or(0)
    }

    pub fn word_count(&self, word: &str) -> u64 {
        self.word_counts.get(word).copied().unwrap_or(0)
    }

    pub fn transition_count(&self, from_tag: &str, to_tag: &str) -> u64 {
        nested_count(&self.transition_counts, from_tag, to_tag)
    }

    pub fn tag_word_count(&self, tag: &str, word: &str) -> u64 {
        nested_count(&self.tag_word_counts, tag, word)
    }

    pub fn word_tag_count(&self, word: &str, tag: &str) -> u64 {
        nested_count(&self.word_tag_counts, word, tag)
    }

    pub fn num_tags(&self) -> usize {
        self.tag_counts.len()
    }

    pub fn num_words(&self) -> usize {
        self.word_counts.len()
    }

    /// Total number of training tokens.
    pub fn num_tokens(&self) -> u64 {
        self.tag_counts.values().sum()
    }
}

fn nested_count(dists: &IndexMap<String, FreqDist>, outer: &str, inner: &str) -> u64 {
    dists
        .get(outer)
        .and_then(|dist| dist.get(inner))
        .copied()
        .unwrap_or(0)
}
