use thiserror::Error;

/// Failures of the statistical core: probability estimation, suffix
/// smoothing and decoding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("{estimator} probability is undefined for {key:?}: nothing was observed to divide by")]
    UndefinedProbability {
        estimator: &'static str,
        key: String,
    },
    #[error("cannot derive suffix smoothing weight from {tags} tag(s), at least 2 are required")]
    InsufficientSuffixStatistics { tags: usize },
    #[error("suffix model is empty, no rare words of this case were seen in training")]
    EmptySuffixModel,
    #[error("model has no tags to decode with")]
    EmptyTagSet,
    #[error("maximum suffix length must be positive")]
    InvalidSuffixLength,
    #[error("state {state} is out of range for a model with {num_states} tag(s)")]
    UnknownState { state: usize, num_states: usize },
}

#[derive(Error, Debug)]
pub enum ModelLoadingError {
    #[error("cannot read model from file: {0}")]
    ReadFile(#[from] std::io::Error),
    #[error("malformed model file: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error("cannot rebuild tagger from stored counts: {0}")]
    Model(#[from] ModelError),
}

#[derive(Error, Debug)]
pub enum ModelSavingError {
    #[error("cannot write model into file: {0}")]
    WriteFile(#[from] std::io::Error),
    #[error("can't serialize model: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("cannot read corpus: {0}")]
    Read(#[from] std::io::Error),
    #[error("malformed record on line {line_number}: {line:?}")]
    MalformedRecord { line_number: usize, line: String },
}
