//! Plain-text corpus formats.
//!
//! Tagged corpora have one `word<TAB>tag` pair per line, raw input has one
//! word per line. In both, an empty line ends a sentence.

use std::io::{self, BufRead, Write};

use crate::errors::CorpusError;

/// One entry of a tagged training stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainingRecord {
    Token { word: String, tag: String },
    Boundary,
}

/// Read a tagged corpus as a stream of tokens and sentence boundaries.
pub fn read_tagged_corpus<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = Result<TrainingRecord, CorpusError>> {
    reader
        .lines()
        .enumerate()
        .map(|(index, line)| parse_tagged_line(index + 1, line?))
}

fn parse_tagged_line(line_number: usize, line: String) -> Result<TrainingRecord, CorpusError> {
    if line.trim().is_empty() {
        return Ok(TrainingRecord::Boundary);
    }

    if let Some((word, tag)) = line.split_once('\t') {
        let extra_field = tag.contains('\t');
        let tag = tag.trim();
        if !word.is_empty() && !tag.is_empty() && !extra_field {
            return Ok(TrainingRecord::Token {
                word: word.to_owned(),
                tag: tag.to_owned(),
            });
        }
    }

    Err(CorpusError::MalformedRecord { line_number, line })
}

/// Read a tagged corpus grouped into sentences of `(word, tag)` pairs.
pub fn read_tagged_sentences<R: BufRead>(
    reader: R,
) -> Result<Vec<Vec<(String, String)>>, CorpusError> {
    let mut sentences = Vec::new();
    let mut current = Vec::new();
    for record in read_tagged_corpus(reader) {
        match record? {
            TrainingRecord::Token { word, tag } => current.push((word, tag)),
            TrainingRecord::Boundary => {
                if !current.is_empty() {
                    sentences.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        sentences.push(current);
    }

    Ok(sentences)
}

/// Sentences of a raw one-word-per-line input.
///
/// A last sentence that is not followed by an empty line is still yielded.
pub fn read_sentences<R: BufRead>(reader: R) -> Sentences<R> {
    Sentences {
        lines: reader.lines(),
    }
}

pub struct Sentences<R> {
    lines: io::Lines<R>,
}

impl<R: BufRead> Iterator for Sentences<R> {
    type Item = Result<Vec<String>, CorpusError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut sentence = Vec::new();
        for line in &mut self.lines {
            let line = match line {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };

            let word = line.trim();
            if word.is_empty() {
                if sentence.is_empty() {
                    continue;
                }
                return Some(Ok(sentence));
            }
            sentence.push(word.to_owned());
        }

        if sentence.is_empty() {
            None
        } else {
            Some(Ok(sentence))
        }
    }
}

/// Write one tagged sentence followed by an empty line.
pub fn write_tagged_sentence<W, S, T>(writer: &mut W, words: &[S], tags: &[T]) -> io::Result<()>
where
    W: Write,
    S: AsRef<str>,
    T: AsRef<str>,
{
    for (word, tag) in words.iter().zip(tags) {
        writeln!(writer, "{}\t{}", word.as_ref(), tag.as_ref())?;
    }
    writeln!(writer)
}
