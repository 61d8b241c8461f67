use log::{debug, warn};

use crate::errors::ModelError;
use crate::frequency::{CaseClass, FrequencyModel};
use crate::suffix_trie::SuffixTrie;
use crate::utils::{trailing_chars, FreqDist};

/// Builds suffix tries from the rare words of a trained model.
#[derive(Debug, Copy, Clone)]
pub struct SuffixTrieBuilder {
    max_suffix_length: usize,
    max_word_frequency: u64,
}

impl SuffixTrieBuilder {
    /// Only words seen fewer than `max_word_frequency` times contribute,
    /// each with at most its last `max_suffix_length` characters.
    pub fn new(max_suffix_length: usize, max_word_frequency: u64) -> Self {
        Self {
            max_suffix_length,
            max_word_frequency,
        }
    }

    pub fn build_upper_case_tree(&self, model: &FrequencyModel) -> Result<SuffixTrie, ModelError> {
        self.build(model, CaseClass::Capitalized)
    }

    pub fn build_lower_case_tree(&self, model: &FrequencyModel) -> Result<SuffixTrie, ModelError> {
        self.build(model, CaseClass::Lowercase)
    }

    /// Build the trie for one case class and set its smoothing weight.
    ///
    /// A case class without rare words yields an empty trie; lookups in it
    /// report `EmptySuffixModel`. Rare words that carry a single tag between
    /// them leave the smoothing weight undefined and fail with
    /// `InsufficientSuffixStatistics`.
    pub fn build(&self, model: &FrequencyModel, case: CaseClass) -> Result<SuffixTrie, ModelError> {
        let words: Vec<&str> = model
            .vocabulary(case)
            .filter(|word| model.word_count(word) < self.max_word_frequency)
            .collect();

        let mut suffix_tag_counts = FreqDist::new();
        let mut trie = SuffixTrie::new();
        for word in &words {
            let suffix = trailing_chars(word, self.max_suffix_length);
            for (tag, count) in model.tags_of(word) {
                *suffix_tag_counts.entry(tag.to_owned()).or_insert(0) += count;
                trie.insert(suffix, tag);
            }
        }

        if words.is_empty() {
            warn!("no rare {:?} words to build a suffix model from", case);
            return Ok(trie);
        }

        let theta = calculate_theta(&suffix_tag_counts)?;
        trie.set_theta(theta);

        debug!(
            "built {:?} suffix model: {} words, {} tags, {} suffixes, theta = {}",
            case,
            words.len(),
            suffix_tag_counts.len(),
            trie.len(),
            theta
        );

        Ok(trie)
    }
}

/// Sample variance of the tag distribution of the rare words.
fn calculate_theta(suffix_tag_counts: &FreqDist) -> Result<f64, ModelError> {
    let counts: Vec<u64> = suffix_tag_counts
        .values()
        .copied()
        .filter(|&count| count > 0)
        .collect();
    if counts.len() < 2 {
        return Err(ModelError::InsufficientSuffixStatistics { tags: counts.len() });
    }

    let total: u64 = counts.iter().sum();
    let probabilities: Vec<f64> = counts
        .iter()
        .map(|&count| count as f64 / total as f64)
        .collect();
    let n = probabilities.len() as f64;
    let mean = probabilities.iter().sum::<f64>() / n;
    let squared_diffs: f64 = probabilities.iter().map(|p| (p - mean).powi(2)).sum();

    Ok(squared_diffs / (n - 1.0))
}
