use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ModelError, ModelLoadingError, ModelSavingError};
use crate::frequency::FrequencyModel;
use crate::suffix_builder::SuffixTrieBuilder;
use crate::suffix_trie::SuffixTrie;
use crate::viterbi::ViterbiDecoder;

/// Settings of the unknown-word model.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct TaggerConfig {
    /// Longest word ending considered, both when building the suffix tries
    /// and when looking up unknown words.
    pub max_suffix_length: usize,
    /// Words seen this many times or more are left out of the suffix tries.
    pub max_word_frequency: u64,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            max_suffix_length: 10,
            max_word_frequency: 10,
        }
    }
}

impl TaggerConfig {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.max_suffix_length == 0 {
            return Err(ModelError::InvalidSuffixLength);
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct StoredTagger<'a> {
    config: &'a TaggerConfig,
    model: &'a FrequencyModel,
}

#[derive(Deserialize)]
struct LoadedTagger {
    config: TaggerConfig,
    model: FrequencyModel,
}

/// Trained tagger: the frequency model plus the suffix tries derived from it.
///
/// See [crate documentation](index.html) for examples.
#[derive(Debug, Clone)]
pub struct Tagger {
    config: TaggerConfig,
    model: FrequencyModel,
    upper_case_trie: SuffixTrie,
    lower_case_trie: SuffixTrie,
}

impl Tagger {
    /// Build the suffix tries for `model` and wrap everything up.
    pub fn new(model: FrequencyModel, config: TaggerConfig) -> Result<Self, ModelError> {
        config.validate()?;

        let builder = SuffixTrieBuilder::new(config.max_suffix_length, config.max_word_frequency);
        let upper_case_trie = builder.build_upper_case_tree(&model)?;
        let lower_case_trie = builder.build_lower_case_tree(&model)?;

        Ok(Self {
            config,
            model,
            upper_case_trie,
            lower_case_trie,
        })
    }

    /// Save this tagger into a file with the given filename.
    /// The format is simple JSON right now. Only the counts are stored,
    /// the suffix tries are rebuilt when loading.
    pub fn save_to_file<P: AsRef<Path>>(&self, filename: P) -> Result<(), ModelSavingError> {
        let stored = StoredTagger {
            config: &self.config,
            model: &self.model,
        };
        let serialized = serde_json::to_string(&stored)?;
        File::create(filename)?.write_all(serialized.as_bytes())?;

        Ok(())
    }

    /// Load a previously saved tagger from a file
    pub fn load_from_file<P: AsRef<Path>>(filename: P) -> Result<Self, ModelLoadingError> {
        let mut string = String::new();
        File::open(filename)?.read_to_string(&mut string)?;
        let LoadedTagger { config, model } = serde_json::from_str(&string)?;

        Ok(Self::new(model, config)?)
    }

    pub fn decoder(&self) -> Result<ViterbiDecoder<'_>, ModelError> {
        ViterbiDecoder::new(
            &self.model,
            &self.upper_case_trie,
            &self.lower_case_trie,
            self.config.max_suffix_length,
        )
    }

    /// Tag a single sentence.
    pub fn tag<S: AsRef<str>>(&self, sentence: &[S]) -> Result<Vec<&str>, ModelError> {
        self.decoder()?.decode(sentence)
    }

    /// Tag many sentences, stopping at the first failure.
    pub fn tag_sentences<I, S>(&self, sentences: I) -> Result<Vec<Vec<&str>>, ModelError>
    where
        I: IntoIterator,
        I::Item: AsRef<[S]>,
        S: AsRef<str>,
    {
        let decoder = self.decoder()?;
        sentences
            .into_iter()
            .map(|sentence| decoder.decode(sentence.as_ref()))
            .collect()
    }

    pub fn config(&self) -> &TaggerConfig {
        &self.config
    }

    pub fn model(&self) -> &FrequencyModel {
        &self.model
    }

    pub fn upper_case_trie(&self) -> &SuffixTrie {
        &self.upper_case_trie
    }

    pub fn lower_case_trie(&self) -> &SuffixTrie {
        &self.lower_case_trie
    }
}
