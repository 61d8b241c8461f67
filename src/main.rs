use std::fs::File;
use std::io::{stdin, stdout, BufRead, BufReader, BufWriter, Write};

use anyhow::{Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::info;

use hmmtag::{
    read_sentences, read_tagged_sentences, write_tagged_sentence, Evaluation, ModelTrainer, Tagger,
    TaggerConfig,
};

fn main() -> Result<()> {
    env_logger::init();

    let defaults = TaggerConfig::default();
    let default_suffix_length = defaults.max_suffix_length.to_string();
    let default_word_frequency = defaults.max_word_frequency.to_string();

    let matches = App::new("hmmtag")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Train a part-of-speech tagging model, or use one to tag sentences.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("train")
                .about("Create a tagging model based on a tagged corpus")
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .value_name("FILE")
                        .help("File where the newly trained model will be written.")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::with_name("input")
                        .short("i")
                        .long("input")
                        .value_name("FILE")
                        .help("Tagged corpus, one word<TAB>tag per line, an empty line after each sentence.")
                        .takes_value(true)
                        .required(true)
                        .multiple(true),
                )
                .arg(
                    Arg::with_name("max-suffix-length")
                        .long("max-suffix-length")
                        .value_name("N")
                        .help("Longest word ending used to guess tags of unknown words.")
                        .takes_value(true)
                        .default_value(&default_suffix_length),
                )
                .arg(
                    Arg::with_name("max-word-frequency")
                        .long("max-word-frequency")
                        .value_name("N")
                        .help("Only words seen fewer times than this inform the unknown word model.")
                        .takes_value(true)
                        .default_value(&default_word_frequency),
                ),
        )
        .subcommand(
            SubCommand::with_name("tag")
                .about("Tag sentences with a trained model")
                .arg(
                    Arg::with_name("model")
                        .short("m")
                        .long("model")
                        .value_name("FILE")
                        .help("File containing the tagging model produced by `train` command")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::with_name("input")
                        .short("i")
                        .long("input")
                        .value_name("FILE")
                        .help("File containing one word per line, an empty line after each sentence. stdin by default.")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .value_name("FILE")
                        .help("File into which tagged sentences will be written. stdout by default.")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("evaluate")
                .about("Measure tagging accuracy against a tagged corpus")
                .arg(
                    Arg::with_name("model")
                        .short("m")
                        .long("model")
                        .value_name("FILE")
                        .help("File containing the tagging model produced by `train` command")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::with_name("input")
                        .short("i")
                        .long("input")
                        .value_name("FILE")
                        .help("Gold-standard tagged corpus in the training format.")
                        .takes_value(true)
                        .required(true),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        ("train", Some(matches)) => do_train(matches),
        ("tag", Some(matches)) => do_tag(matches),
        ("evaluate", Some(matches)) => do_evaluate(matches),
        _ => Ok(()),
    }
}

fn do_train(matches: &ArgMatches) -> Result<()> {
    // required arguments and arguments with defaults are always present
    let output_filename = matches.value_of("output").unwrap_or_default();
    let config = TaggerConfig {
        max_suffix_length: parse_number(matches, "max-suffix-length")?,
        max_word_frequency: parse_number(matches, "max-word-frequency")?,
    };

    let mut trainer = ModelTrainer::new();
    for filename in matches.values_of("input").into_iter().flatten() {
        info!("reading {}", filename);
        trainer
            .add_sentences_from_file(filename)
            .with_context(|| format!("cannot train on {}", filename))?;
    }

    let tagger = trainer.into_tagger(config)?;
    tagger
        .save_to_file(output_filename)
        .with_context(|| format!("cannot save model to {}", output_filename))?;

    Ok(())
}

fn do_tag(matches: &ArgMatches) -> Result<()> {
    let tagger = load_tagger(matches)?;
    let decoder = tagger.decoder()?;

    let input: Box<dyn BufRead> = match matches.value_of("input") {
        Some(filename) => Box::new(BufReader::new(File::open(filename)?)),
        None => Box::new(BufReader::new(stdin())),
    };

    let mut output: Box<dyn Write> = match matches.value_of("output") {
        Some(filename) => Box::new(BufWriter::new(File::create(filename)?)),
        None => Box::new(BufWriter::new(stdout())),
    };

    for sentence in read_sentences(input) {
        let sentence = sentence?;
        let tags = decoder.decode(&sentence)?;
        write_tagged_sentence(&mut output, &sentence, &tags)?;
    }
    output.flush()?;

    Ok(())
}

fn do_evaluate(matches: &ArgMatches) -> Result<()> {
    let tagger = load_tagger(matches)?;
    let decoder = tagger.decoder()?;

    let filename = matches.value_of("input").unwrap_or_default();
    let file = File::open(filename).with_context(|| format!("cannot open {}", filename))?;
    let sentences = read_tagged_sentences(BufReader::new(file))?;

    let mut evaluation = Evaluation::new();
    for sentence in &sentences {
        let (words, gold): (Vec<&str>, Vec<&str>) = sentence
            .iter()
            .map(|(word, tag)| (word.as_str(), tag.as_str()))
            .unzip();
        let predicted = decoder.decode(&words)?;
        evaluation.accumulate(tagger.model(), &words, &gold, &predicted);
    }
    print!("{}", evaluation);

    Ok(())
}

fn load_tagger(matches: &ArgMatches) -> Result<Tagger> {
    let filename = matches.value_of("model").unwrap_or_default();
    Tagger::load_from_file(filename).with_context(|| format!("cannot load model from {}", filename))
}

fn parse_number<T>(matches: &ArgMatches, name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = matches.value_of(name).unwrap_or_default();
    value
        .parse()
        .with_context(|| format!("invalid value for --{}: {:?}", name, value))
}
