//! `hmmtag` assigns part-of-speech tags to tokenized sentences using a bigram
//! hidden Markov model decoded with the Viterbi algorithm.
//!
//! Words that never appeared in training get their emission estimates from
//! suffix tries built over the rare words of the training corpus: one for
//! capitalized words, one for everything else.
//!
//! # Usage
//!
//! Train a tagger on tagged sentences, then tag new ones:
//!
//! ```
//! use hmmtag::{ModelTrainer, TaggerConfig};
//!
//! let mut trainer = ModelTrainer::new();
//! trainer
//!     .add_sentence(vec![("the", "DT"), ("dog", "NN"), ("barked", "VBD")])
//!     .add_sentence(vec![("a", "DT"), ("cat", "NN"), ("jumped", "VBD")])
//!     .add_sentence(vec![("Rex", "NNP"), ("ran", "VBD")])
//!     .add_sentence(vec![("Big", "JJ"), ("dogs", "NNS"), ("ran", "VBD")]);
//!
//! let tagger = trainer.into_tagger(TaggerConfig::default())?;
//!
//! // "walked" was never seen, its ending "ed" was
//! let tags = tagger.tag(&["the", "cat", "walked"])?;
//! assert_eq!(tags, vec!["DT", "NN", "VBD"]);
//! # Ok::<(), hmmtag::ModelError>(())
//! ```
//!
//! Trained taggers can be saved with [`Tagger::save_to_file`] and loaded back
//! with [`Tagger::load_from_file`].
//!
//! The lower-level pieces ([`FrequencyModel`], [`SuffixTrieBuilder`],
//! [`SuffixTrie`], [`ViterbiDecoder`]) are public for callers that need to
//! assemble the pipeline themselves.
//!
//! # Command line
//!
//! With the `cli` feature enabled, the `hmmtag` binary trains, applies and
//! evaluates models on tab-separated corpus files.

mod corpus;
mod errors;
mod evaluation;
mod frequency;
mod suffix_builder;
mod suffix_trie;
mod tagger;
mod trainer;
mod utils;
mod viterbi;

pub use crate::corpus::{
    read_sentences, read_tagged_corpus, read_tagged_sentences, write_tagged_sentence, Sentences,
    TrainingRecord,
};
pub use crate::errors::{CorpusError, ModelError, ModelLoadingError, ModelSavingError};
pub use crate::evaluation::Evaluation;
pub use crate::frequency::{CaseClass, FrequencyModel};
pub use crate::suffix_builder::SuffixTrieBuilder;
pub use crate::suffix_trie::SuffixTrie;
pub use crate::tagger::{Tagger, TaggerConfig};
pub use crate::trainer::ModelTrainer;
pub use crate::viterbi::ViterbiDecoder;
