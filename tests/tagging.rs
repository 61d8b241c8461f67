use hmmtag::{
    read_tagged_corpus, FrequencyModel, ModelError, ModelTrainer, SuffixTrie, Tagger, TaggerConfig,
    ViterbiDecoder,
};

const CORPUS: &str = "\
The\tDT
dog\tNN
barked\tVBD
.\t.

A\tDT
cat\tNN
jumped\tVBD
over\tIN
the\tDT
fence\tNN
.\t.

John\tNNP
walked\tVBD
home\tNN
.\t.

Mary\tNNP
was\tVBD
running\tVBG
.\t.

Big\tJJ
dogs\tNNS
ran\tVBD
quickly\tRB
.\t.
";

fn corpus_tagger() -> Tagger {
    let mut trainer = ModelTrainer::new();
    let records = read_tagged_corpus(CORPUS.as_bytes()).map(Result::unwrap);
    trainer.add_records_from_iter(records);
    trainer.into_tagger(TaggerConfig::default()).unwrap()
}

fn train(sentences: &[&[(&str, &str)]]) -> FrequencyModel {
    let mut trainer = ModelTrainer::new();
    for sentence in sentences {
        trainer.add_sentence(sentence.iter().copied());
    }
    trainer.into_model()
}

#[test]
fn two_sentence_scenario() {
    let model = train(&[&[("the", "DT"), ("dog", "NN")], &[("a", "DT"), ("cat", "NN")]]);
    assert_eq!(model.tag_start_count("DT"), 2);
    assert_eq!(model.sentence_count(), 2);
    assert_eq!(model.transition_count("DT", "NN"), 2);
    assert_eq!(model.tag_count("DT"), 2);
    assert_eq!(model.tag_count("NN"), 2);

    let tagger = Tagger::new(model, TaggerConfig::default()).unwrap();
    assert!(tagger.upper_case_trie().is_empty());
    assert_eq!(tagger.tag(&["the", "cat"]).unwrap(), vec!["DT", "NN"]);
}

#[test]
fn single_tag_vocabulary_cannot_be_smoothed() {
    let model = train(&[&[("running", "VBG")]]);
    let err = Tagger::new(model, TaggerConfig::default()).unwrap_err();
    assert_eq!(err, ModelError::InsufficientSuffixStatistics { tags: 1 });
}

#[test]
fn unknown_word_goes_through_lowercase_suffix_trie() {
    let model = train(&[&[("running", "VBG")]]);
    let mut lower = SuffixTrie::new();
    lower.insert("ing", "VBG");
    lower.set_theta(0.5);
    let upper = SuffixTrie::new();
    let decoder = ViterbiDecoder::new(&model, &upper, &lower, 3).unwrap();

    assert_eq!(model.word_count("runs"), 0);
    assert_eq!(decoder.decode(&["runs"]).unwrap(), vec!["VBG"]);

    // "runs" shares no ending with "running": the empty suffix folds no
    // estimates, so the back-off gives 0 even though VBG has a prior
    assert_eq!(decoder.emission_probability(0, "runs").unwrap(), 0.0);

    // "jumping" shares "ing"; the model itself would say 0 for it
    assert_eq!(model.emission_probability("VBG", "jumping").unwrap(), 0.0);
    let emission = decoder.emission_probability(0, "jumping").unwrap();
    assert!(emission > 0.0 && emission <= 1.0);

    // capitalized unknown words use the other, empty, trie
    assert_eq!(decoder.decode(&["Running"]), Err(ModelError::EmptySuffixModel));
}

// The emission used for unknown words is P(tag | suffix) * P(suffix) / P(tag),
// Bayes' rule applied to the back-off estimate. This pins the formula down
// as implemented; it is not claimed to be a calibrated P(word | tag).
#[test]
fn unknown_word_emission_formula() {
    let model = train(&[&[("talked", "VBD"), ("red", "JJ")]]);
    let mut lower = SuffixTrie::new();
    lower.insert("ked", "VBD");
    lower.insert("red", "JJ");
    lower.set_theta(1.0);
    let upper = SuffixTrie::new();
    let decoder = ViterbiDecoder::new(&model, &upper, &lower, 3).unwrap();

    let tag_suffix = lower.tag_suffix_probability("ed", "VBD").unwrap();
    let suffix = lower.suffix_probability("ed").unwrap();
    let tag = lower.tag_probability("VBD").unwrap();
    let vbd = decoder.tags().iter().position(|&t| t == "VBD").unwrap();

    // "bed" resolves to "ed"
    let emission = decoder.emission_probability(vbd, "bed").unwrap();
    assert!((emission - tag_suffix * suffix / tag).abs() < 1e-12);
}

#[test]
fn equal_predecessors_resolve_to_lower_index() {
    let model = train(&[
        &[("saw", "VBD"), ("it", "PRP")],
        &[("saw", "NN"), ("it", "PRP")],
    ]);
    let trie = SuffixTrie::new();
    let decoder = ViterbiDecoder::new(&model, &trie, &trie, 3).unwrap();
    assert_eq!(decoder.tags(), &["VBD", "PRP", "NN"]);
    assert_eq!(decoder.tags().iter().position(|&t| t == "VBD"), Some(0));
    assert_eq!(decoder.tags().iter().position(|&t| t == "NN"), Some(2));

    // both "saw" readings score 0.5 and lead to PRP with probability 1,
    // so PRP keeps the predecessor with the lower index
    assert_eq!(decoder.decode(&["saw", "it"]).unwrap(), vec!["VBD", "PRP"]);
}

#[test]
fn output_length_matches_input() {
    let tagger = corpus_tagger();
    let sentences: Vec<Vec<&str>> = vec![
        vec![],
        vec!["The"],
        vec!["A", "dog", "jumped", "."],
        vec!["Sally", "was", "walking", "home", "."],
        vec!["Zebras", "ate", "xylophones", "loudly", "."],
        vec!["the", "the", "the", "the", "the", "the"],
    ];

    for sentence in &sentences {
        let tags = tagger.tag(sentence).unwrap();
        assert_eq!(tags.len(), sentence.len());
    }
}

#[test]
fn decoding_is_idempotent() {
    let tagger = corpus_tagger();
    let decoder = tagger.decoder().unwrap();
    let sentence = ["Mary", "walked", "the", "dogs", "quickly", "."];

    let first = decoder.decode(&sentence).unwrap();
    let second = decoder.decode(&sentence).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, tagger.tag(&sentence).unwrap());
}

#[test]
fn corpus_tagging() {
    let tagger = corpus_tagger();
    assert_eq!(
        tagger.tag(&["The", "cat", "barked", "."]).unwrap(),
        vec!["DT", "NN", "VBD", "."]
    );
    // "Harry" and "talked" were never seen, they end like "Mary" and "walked"
    assert_eq!(
        tagger.tag(&["Harry", "talked", "."]).unwrap(),
        vec!["NNP", "VBD", "."]
    );
}

#[test]
fn concurrent_decoding_matches_sequential() {
    let tagger = corpus_tagger();
    let decoder = tagger.decoder().unwrap();
    let sentences = vec![
        vec!["The", "dog", "barked", "."],
        vec!["John", "walked", "home", "."],
        vec!["Big", "cats", "ran", "."],
        vec!["Mary", "was", "jumping", "."],
    ];
    let sequential: Vec<_> = sentences
        .iter()
        .map(|sentence| decoder.decode(sentence).unwrap())
        .collect();

    let concurrent: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = sentences
            .iter()
            .map(|sentence| {
                let decoder = &decoder;
                scope.spawn(move || decoder.decode(sentence).unwrap())
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(sequential, concurrent);
}

#[test]
fn saved_tagger_loads_identically() {
    let tagger = corpus_tagger();
    let path = std::env::temp_dir().join(format!("hmmtag-test-{}.json", std::process::id()));

    tagger.save_to_file(&path).unwrap();
    let loaded = Tagger::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.config(), tagger.config());
    assert_eq!(loaded.model(), tagger.model());
    assert_eq!(loaded.lower_case_trie().theta(), tagger.lower_case_trie().theta());
    assert_eq!(
        loaded.decoder().unwrap().tags(),
        tagger.decoder().unwrap().tags()
    );

    let sentence = ["Harry", "was", "jumping", "the", "fence", "."];
    assert_eq!(loaded.tag(&sentence).unwrap(), tagger.tag(&sentence).unwrap());
}

#[test]
fn missing_model_file_is_a_read_error() {
    let result = Tagger::load_from_file("does-not-exist.json");
    assert!(matches!(result, Err(hmmtag::ModelLoadingError::ReadFile(_))));
}
