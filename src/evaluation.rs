use std::fmt::{self, Display};

use indexmap::IndexMap;

use crate::frequency::FrequencyModel;

/// Tag-wise counts.
#[derive(Debug, Default, Clone)]
struct TagMeasure {
    /// Number of correct predictions.
    num_correct: usize,
    /// Number of occurrences of the tag in the gold-standard data.
    num_observation: usize,
    /// Number of predictions.
    num_prediction: usize,
}

impl TagMeasure {
    fn precision(&self) -> f64 {
        ratio(self.num_correct, self.num_prediction)
    }

    fn recall(&self) -> f64 {
        ratio(self.num_correct, self.num_observation)
    }

    fn fmeasure(&self) -> f64 {
        let (precision, recall) = (self.precision(), self.recall());
        if precision + recall > 0.0 {
            precision * recall * 2.0 / (precision + recall)
        } else {
            0.0
        }
    }
}

/// Accuracy of predicted tags against gold-standard tags.
#[derive(Debug, Default)]
pub struct Evaluation {
    tags: IndexMap<String, TagMeasure>,
    token_correct: usize,
    token_total: usize,
    unknown_correct: usize,
    unknown_total: usize,
    sentence_correct: usize,
    sentence_total: usize,
}

impl Evaluation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sentence. Words the model never saw are also counted
    /// towards the unknown-word accuracy.
    pub fn accumulate<W, G, P>(
        &mut self,
        model: &FrequencyModel,
        words: &[W],
        gold: &[G],
        predicted: &[P],
    ) where
        W: AsRef<str>,
        G: AsRef<str>,
        P: AsRef<str>,
    {
        let mut matched = 0;
        for ((word, gold), predicted) in words.iter().zip(gold).zip(predicted) {
            let (gold, predicted) = (gold.as_ref(), predicted.as_ref());
            let correct = gold == predicted;

            self.measure(gold).num_observation += 1;
            self.measure(predicted).num_prediction += 1;
            if correct {
                self.measure(gold).num_correct += 1;
                matched += 1;
            }

            if model.word_count(word.as_ref()) == 0 {
                self.unknown_total += 1;
                if correct {
                    self.unknown_correct += 1;
                }
            }
        }

        self.token_correct += matched;
        self.token_total += gold.len();
        if matched == gold.len() && gold.len() == predicted.len() {
            self.sentence_correct += 1;
        }
        self.sentence_total += 1;
    }

    pub fn token_accuracy(&self) -> f64 {
        ratio(self.token_correct, self.token_total)
    }

    pub fn sentence_accuracy(&self) -> f64 {
        ratio(self.sentence_correct, self.sentence_total)
    }

    /// `None` if no unknown word was evaluated.
    pub fn unknown_word_accuracy(&self) -> Option<f64> {
        if self.unknown_total == 0 {
            None
        } else {
            Some(ratio(self.unknown_correct, self.unknown_total))
        }
    }

    pub fn precision(&self, tag: &str) -> Option<f64> {
        self.tags.get(tag).map(TagMeasure::precision)
    }

    pub fn recall(&self, tag: &str) -> Option<f64> {
        self.tags.get(tag).map(TagMeasure::recall)
    }

    pub fn fmeasure(&self, tag: &str) -> Option<f64> {
        self.tags.get(tag).map(TagMeasure::fmeasure)
    }

    /// F1 averaged over tags that occur in the gold standard.
    pub fn macro_fmeasure(&self) -> f64 {
        let observed: Vec<f64> = self
            .tags
            .values()
            .filter(|measure| measure.num_observation > 0)
            .map(TagMeasure::fmeasure)
            .collect();
        if observed.is_empty() {
            return 0.0;
        }
        observed.iter().sum::<f64>() / observed.len() as f64
    }

    fn measure(&mut self, tag: &str) -> &mut TagMeasure {
        if !self.tags.contains_key(tag) {
            self.tags.insert(tag.to_owned(), TagMeasure::default());
        }
        &mut self.tags[tag]
    }
}

impl Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Performance by tag (#match, #model, #ref) (precision, recall, F1):")?;
        for (tag, measure) in &self.tags {
            writeln!(
                f,
                "\t{}: ({}, {}, {}) ({:.4}, {:.4}, {:.4})",
                tag,
                measure.num_correct,
                measure.num_prediction,
                measure.num_observation,
                measure.precision(),
                measure.recall(),
                measure.fmeasure()
            )?;
        }
        writeln!(f, "Macro-average F1: {:.4}", self.macro_fmeasure())?;
        writeln!(
            f,
            "Token accuracy: {}/{} => {:.4}",
            self.token_correct,
            self.token_total,
            self.token_accuracy()
        )?;
        if let Some(accuracy) = self.unknown_word_accuracy() {
            writeln!(
                f,
                "Unknown word accuracy: {}/{} => {:.4}",
                self.unknown_correct, self.unknown_total, accuracy
            )?;
        }
        writeln!(
            f,
            "Sentence accuracy: {}/{} => {:.4}",
            self.sentence_correct,
            self.sentence_total,
            self.sentence_accuracy()
        )
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
