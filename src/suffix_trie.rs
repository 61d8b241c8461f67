use std::collections::HashMap;

use crate::errors::ModelError;
use crate::utils::{drop_first_char, increment, FreqDist};

type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Default, Clone)]
struct SuffixNode {
    occurrence_count: u64,
    tag_suffix_counts: FreqDist,
}

/// Tag statistics over word endings, used to guess tags of unknown words.
///
/// Nodes live in an arena and are addressed by index. The root stands for
/// the empty suffix; a child of the node for suffix `s` stands for `c + s`,
/// one more character of context read leftwards. Every occurrence of a
/// suffix is also an occurrence of all its shorter suffixes, so counts never
/// grow going down the trie.
///
/// The root's occurrence count is the total number of suffix occurrences
/// inserted, so it is positive as soon as anything has been inserted.
#[derive(Debug, Clone)]
pub struct SuffixTrie {
    nodes: Vec<SuffixNode>,
    children: HashMap<(NodeId, char), NodeId>,
    tag_counts: FreqDist,
    total_tag_occurrences: u64,
    theta: f64,
}

impl Default for SuffixTrie {
    fn default() -> Self {
        Self {
            nodes: vec![SuffixNode::default()],
            children: HashMap::new(),
            tag_counts: FreqDist::new(),
            total_tag_occurrences: 0,
            theta: 0.0,
        }
    }
}

impl SuffixTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one tagged occurrence of `suffix`, at every suffix length
    /// from 1 up to the whole string.
    pub fn insert(&mut self, suffix: &str, tag: &str) {
        increment(&mut self.tag_counts, tag);

        let mut node = ROOT;
        for c in suffix.chars().rev() {
            node = self.child_or_insert(node, c);

            let entry = &mut self.nodes[node];
            entry.occurrence_count += 1;
            increment(&mut entry.tag_suffix_counts, tag);

            self.nodes[ROOT].occurrence_count += 1;
            self.total_tag_occurrences += 1;
        }
    }

    /// Whether `suffix` has been seen at least once. The empty suffix is
    /// seen iff the trie is not empty.
    pub fn has_suffix(&self, suffix: &str) -> bool {
        self.occurrence_count(suffix) > 0
    }

    pub fn occurrence_count(&self, suffix: &str) -> u64 {
        self.find(suffix)
            .map_or(0, |node| self.nodes[node].occurrence_count)
    }

    /// Number of occurrences of `tag` at exactly the length of `suffix`.
    pub fn tag_suffix_count(&self, suffix: &str, tag: &str) -> u64 {
        self.find(suffix)
            .and_then(|node| self.nodes[node].tag_suffix_counts.get(tag))
            .copied()
            .unwrap_or(0)
    }

    /// Smoothed estimate of P(tag | suffix).
    ///
    /// Starting from 0, the estimates of the suffix's tails are folded in
    /// from the one-character tail up to the whole suffix:
    /// `p = (mle + theta * p) / (1 + theta)`, so longer and sparser
    /// suffixes are pulled towards their shorter tails. The empty suffix
    /// folds nothing and yields 0.
    ///
    /// Every tail of `suffix` must have been seen.
    pub fn tag_suffix_probability(&self, suffix: &str, tag: &str) -> Result<f64, ModelError> {
        let mut probability = 0.0;
        let mut node = ROOT;
        for c in suffix.chars().rev() {
            let entry = match self.children.get(&(node, c)) {
                Some(&child) if self.nodes[child].occurrence_count > 0 => {
                    node = child;
                    &self.nodes[child]
                }
                _ => {
                    return Err(ModelError::UndefinedProbability {
                        estimator: "tag-given-suffix",
                        key: suffix.to_owned(),
                    })
                }
            };

            let tag_suffix_count = entry.tag_suffix_counts.get(tag).copied().unwrap_or(0);
            let mle = tag_suffix_count as f64 / entry.occurrence_count as f64;
            probability = (mle + self.theta * probability) / (1.0 + self.theta);
        }

        Ok(probability)
    }

    /// P(suffix), relative to all suffix occurrences in the trie.
    pub fn suffix_probability(&self, suffix: &str) -> Result<f64, ModelError> {
        let total = self.nodes[ROOT].occurrence_count;
        if total == 0 {
            return Err(ModelError::EmptySuffixModel);
        }

        Ok(self.occurrence_count(suffix) as f64 / total as f64)
    }

    /// Prior P(tag) over all words of this trie. The same for every suffix.
    pub fn tag_probability(&self, tag: &str) -> Result<f64, ModelError> {
        if self.total_tag_occurrences == 0 {
            return Err(ModelError::EmptySuffixModel);
        }

        let tag_count = self.tag_counts.get(tag).copied().unwrap_or(0);
        Ok(tag_count as f64 / self.total_tag_occurrences as f64)
    }

    /// Longest tail of `suffix` that has been seen, dropping characters
    /// from the front until one is found.
    pub fn resolve_suffix<'s>(&self, mut suffix: &'s str) -> Result<&'s str, ModelError> {
        loop {
            if self.has_suffix(suffix) {
                return Ok(suffix);
            }
            if suffix.is_empty() {
                return Err(ModelError::EmptySuffixModel);
            }
            suffix = drop_first_char(suffix);
        }
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn set_theta(&mut self, theta: f64) {
        self.theta = theta;
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[ROOT].occurrence_count == 0
    }

    /// Number of distinct suffixes stored.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    fn find(&self, suffix: &str) -> Option<NodeId> {
        suffix
            .chars()
            .rev()
            .try_fold(ROOT, |node, c| self.children.get(&(node, c)).copied())
    }

    fn child_or_insert(&mut self, node: NodeId, c: char) -> NodeId {
        if let Some(&child) = self.children.get(&(node, c)) {
            return child;
        }

        let child = self.nodes.len();
        self.nodes.push(SuffixNode::default());
        self.children.insert((node, c), child);
        child
    }
}
