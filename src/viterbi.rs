use crate::errors::ModelError;
use crate::frequency::{CaseClass, FrequencyModel};
use crate::suffix_trie::SuffixTrie;
use crate::utils::trailing_chars;

/// Best path probabilities and backpointers of one decoding call,
/// indexed by (state, time step).
#[derive(Debug)]
struct ProbabilityPathMatrix {
    num_steps: usize,
    probabilities: Vec<f64>,
    backpointers: Vec<Option<usize>>,
}

impl ProbabilityPathMatrix {
    fn new(num_states: usize, num_steps: usize) -> Self {
        Self {
            num_steps,
            probabilities: vec![0.0; num_states * num_steps],
            backpointers: vec![None; num_states * num_steps],
        }
    }

    #[inline]
    fn index(&self, state: usize, t: usize) -> usize {
        state * self.num_steps + t
    }

    #[inline]
    fn probability(&self, state: usize, t: usize) -> f64 {
        self.probabilities[self.index(state, t)]
    }

    fn set(&mut self, state: usize, t: usize, probability: f64, backpointer: Option<usize>) {
        let index = self.index(state, t);
        self.probabilities[index] = probability;
        self.backpointers[index] = backpointer;
    }

    /// States of the path ending in `last_state`, in chronological order.
    fn backtrack(&self, last_state: usize) -> Vec<usize> {
        let mut path = Vec::with_capacity(self.num_steps);
        let mut state = last_state;
        path.push(state);
        for t in (1..self.num_steps).rev() {
            match self.backpointers[self.index(state, t)] {
                Some(previous) => {
                    state = previous;
                    path.push(state);
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}

/// Viterbi decoder over a trained bigram model.
///
/// States are the model's tags in first-seen order. Whenever two
/// candidates score the same, the one with the lower state index wins:
/// a running maximum starts at (probability 0, state 0) and is only
/// replaced by a strictly greater candidate.
///
/// The decoder only reads the model and the tries, so it can be shared
/// between threads and used to decode many sentences at once.
#[derive(Debug)]
pub struct ViterbiDecoder<'a> {
    model: &'a FrequencyModel,
    upper_case_trie: &'a SuffixTrie,
    lower_case_trie: &'a SuffixTrie,
    max_suffix_length: usize,
    tags: Vec<&'a str>,
    start_probabilities: Vec<f64>,
    // `None` where the transition was never observed, which rules it out
    // entirely instead of scoring it 0
    transitions: Vec<Option<f64>>,
}

impl<'a> ViterbiDecoder<'a> {
    pub fn new(
        model: &'a FrequencyModel,
        upper_case_trie: &'a SuffixTrie,
        lower_case_trie: &'a SuffixTrie,
        max_suffix_length: usize,
    ) -> Result<Self, ModelError> {
        if max_suffix_length == 0 {
            return Err(ModelError::InvalidSuffixLength);
        }

        let tags: Vec<&str> = model.all_tags().collect();
        let start_probabilities = tags
            .iter()
            .map(|tag| model.start_probability(tag))
            .collect::<Result<Vec<_>, _>>()?;

        let mut transitions = Vec::with_capacity(tags.len() * tags.len());
        for from_tag in &tags {
            for to_tag in &tags {
                let transition = if model.transition_count(from_tag, to_tag) > 0 {
                    Some(model.transition_probability(from_tag, to_tag)?)
                } else {
                    None
                };
                transitions.push(transition);
            }
        }

        Ok(Self {
            model,
            upper_case_trie,
            lower_case_trie,
            max_suffix_length,
            tags,
            start_probabilities,
            transitions,
        })
    }

    /// Tags in state order.
    pub fn tags(&self) -> &[&'a str] {
        &self.tags
    }

    /// P(word | tag of `state`).
    ///
    /// Words seen in training use the model's counts directly. Unknown
    /// words go to the suffix trie of their case class: their longest seen
    /// ending gives P(tag | suffix), which Bayes' rule turns into
    /// `P(tag | suffix) * P(suffix) / P(tag)`. A tag the trie never saw
    /// gets 0. A `state` past the last tag is an error.
    pub fn emission_probability(&self, state: usize, word: &str) -> Result<f64, ModelError> {
        let tag = *self.tags.get(state).ok_or(ModelError::UnknownState {
            state,
            num_states: self.tags.len(),
        })?;
        if self.model.word_count(word) > 0 {
            return self.model.emission_probability(tag, word);
        }

        let (trie, suffix) = self.resolve_unknown(word)?;
        suffix_emission(trie, suffix, tag)
    }

    /// Most probable tag sequence for `sentence`, one tag per word.
    pub fn decode<S: AsRef<str>>(&self, sentence: &[S]) -> Result<Vec<&'a str>, ModelError> {
        if sentence.is_empty() {
            return Ok(Vec::new());
        }
        if self.tags.is_empty() {
            return Err(ModelError::EmptyTagSet);
        }

        let num_states = self.tags.len();
        let num_steps = sentence.len();
        let mut matrix = ProbabilityPathMatrix::new(num_states, num_steps);

        let emissions = self.emission_probabilities(sentence[0].as_ref())?;
        for state in 0..num_states {
            let probability = self.start_probabilities[state] * emissions[state];
            matrix.set(state, 0, probability, None);
        }

        for t in 1..num_steps {
            let emissions = self.emission_probabilities(sentence[t].as_ref())?;
            for state in 0..num_states {
                let (probability, previous) = self.best_predecessor(&matrix, state, t);
                matrix.set(state, t, probability * emissions[state], Some(previous));
            }
        }

        let last = num_steps - 1;
        let mut best_final = 0;
        for state in 1..num_states {
            if matrix.probability(state, last) > matrix.probability(best_final, last) {
                best_final = state;
            }
        }

        Ok(matrix
            .backtrack(best_final)
            .into_iter()
            .map(|state| self.tags[state])
            .collect())
    }

    /// Best way into `state` at `t`, over previous states with an observed
    /// transition. Ties and the no-predecessor case keep (0, state 0).
    fn best_predecessor(
        &self,
        matrix: &ProbabilityPathMatrix,
        state: usize,
        t: usize,
    ) -> (f64, usize) {
        let num_states = self.tags.len();
        let mut best = (0.0, 0);
        for previous in 0..num_states {
            if let Some(transition) = self.transitions[previous * num_states + state] {
                let candidate = transition * matrix.probability(previous, t - 1);
                if candidate > best.0 {
                    best = (candidate, previous);
                }
            }
        }
        best
    }

    /// Emission probabilities of `word` for every state.
    fn emission_probabilities(&self, word: &str) -> Result<Vec<f64>, ModelError> {
        if self.model.word_count(word) > 0 {
            return self
                .tags
                .iter()
                .map(|tag| self.model.emission_probability(tag, word))
                .collect();
        }

        let (trie, suffix) = self.resolve_unknown(word)?;
        self.tags
            .iter()
            .map(|tag| suffix_emission(trie, suffix, tag))
            .collect()
    }

    fn resolve_unknown<'w>(&self, word: &'w str) -> Result<(&'a SuffixTrie, &'w str), ModelError> {
        let trie = match CaseClass::of(word) {
            CaseClass::Capitalized => self.upper_case_trie,
            CaseClass::Lowercase => self.lower_case_trie,
        };
        let suffix = trie.resolve_suffix(trailing_chars(word, self.max_suffix_length))?;
        Ok((trie, suffix))
    }
}

fn suffix_emission(trie: &SuffixTrie, suffix: &str, tag: &str) -> Result<f64, ModelError> {
    let tag_probability = trie.tag_probability(tag)?;
    if tag_probability == 0.0 {
        return Ok(0.0);
    }

    let tag_suffix_probability = trie.tag_suffix_probability(suffix, tag)?;
    let suffix_probability = trie.suffix_probability(suffix)?;
    Ok(tag_suffix_probability * suffix_probability / tag_probability)
}
