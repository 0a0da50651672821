//! A lexical tagger assigning Penn Treebank part-of-speech tags.
//! Known words are looked up in a dump of `word<TAB>lemma<TAB>tag` lines, unknown words are tagged heuristically.

use fs_err::File;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::utils::{is_title_case, is_uppercase};
use crate::Error;

/// Tag of an opening quotation mark.
pub const OPENING_QUOTE: &str = "``";
/// Tag of a closing quotation mark.
pub const CLOSING_QUOTE: &str = "''";

/// Lemma and part-of-speech tag associated with a word.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct WordData {
    pub lemma: String,
    pub pos: String,
}

impl WordData {
    pub fn new(lemma: String, pos: String) -> Self {
        WordData { lemma, pos }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tagger {
    tags: HashMap<String, Vec<WordData>>,
}

impl Tagger {
    /// Reads a tagger from dump files.
    pub fn from_dumps<P: AsRef<Path>>(paths: &[P]) -> Result<Self, Error> {
        let mut tagger = Tagger::default();
        tagger.extend_from_dumps(paths)?;
        Ok(tagger)
    }

    /// Adds the entries of dump files.
    pub fn extend_from_dumps<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<(), Error> {
        for path in paths {
            let path = path.as_ref();
            let reader = BufReader::new(File::open(path)?);
            self.extend_from_reader(&path.display().to_string(), reader)?;
        }

        Ok(())
    }

    /// Adds the entries of one dump. Entries for a word already known are appended after the existing ones,
    /// so earlier dumps take precedence when a word is ambiguous.
    pub fn extend_from_reader<R: BufRead>(&mut self, name: &str, reader: R) -> Result<(), Error> {
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }

            let parts: Vec<_> = line.split('\t').collect();
            if parts.len() < 3 {
                return Err(Error::Resource {
                    source_name: name.to_owned(),
                    line: i + 1,
                    reason: format!("expected three tab-separated fields, found {}", parts.len()),
                });
            }

            let word = parts[0].to_string();
            let data = WordData::new(parts[1].to_string(), parts[2].trim().to_string());

            let entry = self.tags.entry(word).or_insert_with(Vec::new);
            if !entry.contains(&data) {
                entry.push(data);
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    fn get_strict_tags(&self, word: &str, add_lower: bool) -> Vec<&WordData> {
        let mut tags: Vec<_> = self.tags.get(word).map_or_else(Vec::new, |x| x.iter().collect());
        let lower = word.to_lowercase();

        if (add_lower || tags.is_empty())
            && word != lower
            && (is_title_case(word) || is_uppercase(word))
        {
            tags.extend(self.tags.get(&lower).into_iter().flatten());
        }

        tags
    }

    /// Gets all lexicon entries for a word. If `add_lower` is set, entries of the lowercase form are
    /// always included for title case words, otherwise only if the word itself is unknown.
    pub fn get_tags(&self, word: &str, add_lower: bool) -> Vec<WordData> {
        self.get_strict_tags(word, add_lower)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Assigns a single tag to a word: the first lexicon entry if there is one, a guess otherwise.
    pub fn tag(&self, word: &str, is_sentence_start: bool) -> String {
        if let Some(data) = self.get_strict_tags(word, is_sentence_start).first() {
            return data.pos.clone();
        }

        guess_tag(word, is_sentence_start).to_owned()
    }
}

fn punctuation_tag(word: &str) -> &'static str {
    match word {
        "." | "!" | "?" => ".",
        "," => ",",
        ":" | ";" | "-" | "--" | "…" | "–" | "—" => ":",
        "(" | "[" | "{" => "(",
        ")" | "]" | "}" => ")",
        "$" => "$",
        "#" => "#",
        _ => {
            if word.chars().all(|c| matches!(c, '.' | '!' | '?')) {
                "."
            } else {
                "SYM"
            }
        }
    }
}

const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ous", "ful", "able", "ible", "ive", "less", "ical", "ic", "ish", "ary", "al",
];

/// Tags a word which is not in the lexicon.
fn guess_tag(word: &str, is_sentence_start: bool) -> &'static str {
    if word.is_empty() {
        return "SYM";
    }

    if word.chars().any(|c| c.is_numeric())
        && word
            .chars()
            .all(|c| c.is_numeric() || matches!(c, '.' | ',' | '-' | '/'))
    {
        return "CD";
    }

    if !word.chars().any(char::is_alphanumeric) {
        return punctuation_tag(word);
    }

    if !is_sentence_start && word.chars().next().map_or(false, char::is_uppercase) {
        return if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
            "NNPS"
        } else {
            "NNP"
        };
    }

    let lower = word.to_lowercase();
    let n_chars = lower.chars().count();

    if n_chars > 4 && lower.ends_with("ly") {
        "RB"
    } else if n_chars > 4 && lower.ends_with("ing") {
        "VBG"
    } else if n_chars > 4 && lower.ends_with("ed") {
        "VBD"
    } else if n_chars > 5 && lower.ends_with("est") {
        "JJS"
    } else if n_chars > 5 && ADJECTIVE_SUFFIXES.iter().any(|x| lower.ends_with(x)) {
        "JJ"
    } else if n_chars > 3 && lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us")
    {
        "NNS"
    } else {
        if !word.chars().all(char::is_alphabetic) {
            debug!("no tag heuristic for {:?}, assuming a noun", word);
        }
        "NN"
    }
}
