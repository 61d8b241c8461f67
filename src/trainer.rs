use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::info;

use crate::corpus::{read_tagged_corpus, TrainingRecord};
use crate::errors::{CorpusError, ModelError};
use crate::frequency::FrequencyModel;
use crate::tagger::{Tagger, TaggerConfig};

/// Trainer for new tagging models.
///
/// Feed it tagged sentences in corpus order; the order of tokens within a
/// sentence decides which tag transitions get counted.
/// See [crate documentation](index.html) for examples.
#[derive(Debug, Default)]
pub struct ModelTrainer {
    model: FrequencyModel,
    previous_tag: Option<String>,
}

impl ModelTrainer {
    /// Create a new model trainer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add sentences to the training set from a tagged corpus file.
    ///
    /// The file is assumed to have one `word<TAB>tag` pair per line and an
    /// empty line after each sentence.
    pub fn add_sentences_from_file<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Result<&mut Self, CorpusError> {
        let file = File::open(path)?;
        for record in read_tagged_corpus(BufReader::new(file)) {
            self.add_record(record?);
        }
        self.end_sentence();

        Ok(self)
    }

    /// Add a stream of tokens and sentence boundaries.
    pub fn add_records_from_iter<I>(&mut self, iter: I) -> &mut Self
    where
        I: IntoIterator<Item = TrainingRecord>,
    {
        for record in iter {
            self.add_record(record);
        }

        self
    }

    pub fn add_record(&mut self, record: TrainingRecord) -> &mut Self {
        match record {
            TrainingRecord::Token { word, tag } => self.add_token(&word, &tag),
            TrainingRecord::Boundary => self.end_sentence(),
        }
    }

    /// Add one complete sentence of `(word, tag)` pairs.
    pub fn add_sentence<I, W, T>(&mut self, sentence: I) -> &mut Self
    where
        I: IntoIterator<Item = (W, T)>,
        W: AsRef<str>,
        T: AsRef<str>,
    {
        for (word, tag) in sentence {
            self.add_token(word.as_ref(), tag.as_ref());
        }

        self.end_sentence()
    }

    /// Add the next token of the current sentence.
    pub fn add_token(&mut self, word: &str, tag: &str) -> &mut Self {
        self.model.record_emission(tag, word);
        match self.previous_tag.as_deref() {
            Some(previous_tag) => self.model.record_transition(previous_tag, tag),
            None => self.model.record_sentence_start(tag),
        }
        self.previous_tag = Some(tag.to_owned());

        self
    }

    /// Close the current sentence. Does nothing between sentences.
    pub fn end_sentence(&mut self) -> &mut Self {
        self.previous_tag = None;
        self
    }

    /// Counts gathered so far.
    pub fn model(&self) -> &FrequencyModel {
        &self.model
    }

    pub fn into_model(self) -> FrequencyModel {
        info!(
            "trained on {} sentences, {} tokens, {} tags, {} distinct words",
            self.model.sentence_count(),
            self.model.num_tokens(),
            self.model.num_tags(),
            self.model.num_words()
        );
        self.model
    }

    /// Build a tagger from all gathered statistics.
    pub fn into_tagger(self, config: TaggerConfig) -> Result<Tagger, ModelError> {
        Tagger::new(self.into_model(), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    fn token(word: &str, tag: &str) -> TrainingRecord {
        TrainingRecord::Token {
            word: word.to_owned(),
            tag: tag.to_owned(),
        }
    }

    #[test]
    fn two_sentences_from_records() {
        let mut trainer = ModelTrainer::new();
        trainer.add_records_from_iter(vec![
            token("the", "DT"),
            token("dog", "NN"),
            TrainingRecord::Boundary,
            token("a", "DT"),
            token("cat", "NN"),
        ]);
        let model = trainer.into_model();

        assert_eq!(model.tag_start_count("DT"), 2);
        assert_eq!(model.sentence_count(), 2);
        assert_eq!(model.transition_count("DT", "NN"), 2);
        assert_eq!(model.tag_count("DT"), 2);
        assert_eq!(model.tag_count("NN"), 2);
    }

    #[test]
    fn no_transitions_across_boundaries() {
        let mut trainer = ModelTrainer::new();
        trainer
            .add_sentence(vec![("Go", "VB")])
            .add_sentence(vec![("Stop", "VB"), ("now", "RB")]);

        let model = trainer.model();
        assert_eq!(model.transition_count("VB", "VB"), 0);
        assert_eq!(model.transition_count("VB", "RB"), 1);
        assert_eq!(model.tag_start_count("VB"), 2);
    }

    #[test]
    fn repeated_boundaries_are_harmless() {
        let mut trainer = ModelTrainer::new();
        trainer
            .end_sentence()
            .add_token("yes", "UH")
            .end_sentence()
            .end_sentence()
            .add_token("no", "UH");

        let model = trainer.model();
        assert_eq!(model.sentence_count(), 2);
        assert_eq!(model.transition_count("UH", "UH"), 0);
    }

    #[test]
    fn file_without_final_blank_line() {
        let path = std::env::temp_dir().join(format!("hmmtag-trainer-{}.tsv", std::process::id()));
        fs::write(&path, "the\tDT\ndog\tNN\n\nit\tPRP\nran\tVBD").unwrap();

        let mut trainer = ModelTrainer::new();
        let result = trainer.add_sentences_from_file(&path).map(|_| ());
        fs::remove_file(&path).unwrap();
        result.unwrap();

        let model = trainer.model();
        assert_eq!(model.sentence_count(), 2);
        assert_eq!(model.transition_count("DT", "NN"), 1);
        assert_eq!(model.transition_count("NN", "PRP"), 0);
        assert_eq!(model.transition_count("PRP", "VBD"), 1);

        // the last sentence was closed, so the next token starts a new one
        trainer.add_token("go", "VB");
        let model = trainer.model();
        assert_eq!(model.sentence_count(), 3);
        assert_eq!(model.tag_start_count("VB"), 1);
        assert_eq!(model.transition_count("VBD", "VB"), 0);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let path = std::env::temp_dir().join("hmmtag-trainer-does-not-exist.tsv");
        let mut trainer = ModelTrainer::new();
        match trainer.add_sentences_from_file(&path) {
            Err(CorpusError::Read(_)) => {}
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
        assert_eq!(trainer.model().sentence_count(), 0);
    }
}
