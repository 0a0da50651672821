//! Structures and implementations related to spellchecking.
use fs_err::File;
use fst::{IntoStreamer, Map, MapBuilder, Streamer};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    collections::{BTreeMap, BinaryHeap, HashSet},
    io::{BufRead, BufReader},
    path::Path,
};
use unicode_categories::UnicodeCategories;

use crate::{utils::restore_case, Error};

mod levenshtein;

/// Frequencies are stored in buckets of this size so they fit in a byte.
const MAX_FREQ_BUCKET: usize = u8::MAX as usize - 1;

/// A dictionary answering which words are unknown and how to correct them.
pub trait Dictionary {
    /// Whether the word is known to be spelled correctly.
    fn is_known(&self, word: &str) -> bool;

    /// The subset of `words` which is unknown. Duplicates are removed, the order is unspecified.
    fn unknown<'a, I: IntoIterator<Item = &'a str>>(&self, words: I) -> HashSet<String> {
        words
            .into_iter()
            .filter(|x| !self.is_known(x))
            .map(|x| x.to_owned())
            .collect()
    }

    /// Ranked correction candidates for a word, best first. Empty if no candidate is close enough.
    fn candidates(&self, word: &str) -> Vec<String>;

    /// The single most likely spelling of a word. This is the word itself if there are no candidates.
    fn correction(&self, word: &str) -> String {
        self.candidates(word)
            .into_iter()
            .next()
            .unwrap_or_else(|| word.to_owned())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Candidate {
    score: f32,
    distance: usize,
    freq: usize,
    term: String,
}
impl Eq for Candidate {}
impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // higher score => lower order such that sorting puts highest scores first
        other
            .score
            .partial_cmp(&self.score)
            .expect("scores are never NaN")
            .then_with(|| self.distance.cmp(&other.distance))
            .then_with(|| other.freq.cmp(&self.freq))
            .then_with(|| self.term.cmp(&other.term))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Options to configure the spellchecker.
pub struct SpellOptions {
    /// The maximum edit distance to consider for corrections. Optimal String Alignment distance is used.
    pub max_distance: usize,
    /// A fixed prefix length for which to consider only edits with a distance of 1. This speeds up the search by pruning the tree early.
    pub prefix_length: usize,
    /// How high to weigh the frequency of a word compared to the edit distance when ranking correction candidates.
    /// Setting this to `x` makes the frequency make a difference of at most `x` edit distance.
    pub freq_weight: f32,
    /// The maximum number of correction candidates to return.
    pub top_n: usize,
    /// A set of words to always accept, compared case-insensitively.
    pub whitelist: HashSet<String>,
}

impl Default for SpellOptions {
    fn default() -> Self {
        SpellOptions {
            max_distance: 2,
            prefix_length: 2,
            freq_weight: 2.,
            top_n: 10,
            whitelist: [
                "http",
                "reflist",
                "café",
                "br",
                "s",
                "infobox",
                "imagesize",
                "defaultsort",
                "nbsp",
                "https",
                "km",
            ]
            .iter()
            .map(|x| x.to_string())
            .collect(),
        }
    }
}

/// Word frequencies read from word lists, before they are compiled into a [Spell].
#[derive(Debug, Clone, Default)]
pub struct WordCounts {
    counts: BTreeMap<String, u64>,
}

impl WordCounts {
    /// Reads word lists from files.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self, Error> {
        let mut counts = WordCounts::default();
        counts.extend_from_paths(paths)?;
        Ok(counts)
    }

    pub fn extend_from_paths<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<(), Error> {
        for path in paths {
            let path = path.as_ref();
            self.extend_from_reader(
                &path.display().to_string(),
                BufReader::new(File::open(path)?),
            )?;
        }

        Ok(())
    }

    /// Adds a word list. Each line is either `word` or `word<whitespace>count`.
    /// Lines without a count get a count decreasing with their position, so an unannotated list is read as
    /// ordered by frequency.
    pub fn extend_from_reader<R: BufRead>(&mut self, name: &str, reader: R) -> Result<(), Error> {
        let lines = reader
            .lines()
            .collect::<Result<Vec<_>, _>>()?;
        let n_lines = lines.len() as u64;

        for (i, line) in lines.iter().enumerate() {
            let line = line.trim();
            if line.starts_with('#') || line.is_empty() {
                continue;
            }

            let mut parts = line.split_whitespace();
            let word = parts.next().expect("line is not empty").to_lowercase();

            let count = match parts.next() {
                Some(count) => count.parse::<u64>().map_err(|e| Error::Resource {
                    source_name: name.to_owned(),
                    line: i + 1,
                    reason: format!("invalid count {:?}: {}", count, e),
                })?,
                None => n_lines - i as u64,
            };

            let entry = self.counts.entry(word).or_insert(0);
            *entry = (*entry).max(count);
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// A spellchecker searching an FST of known words with an edit-distance automaton, see
/// [Error-tolerant Finite State Recognition](https://www.aclweb.org/anthology/1995.iwpt-1.24/).
#[derive(Debug, Clone)]
pub struct Spell {
    /// An FST mapping valid lowercase words to a frequency bucket.
    fst: Map<Vec<u8>>,
    /// The maximum occuring frequency bucket. Used to normalize.
    max_freq: usize,
    options: SpellOptions,
}

impl Spell {
    /// Compiles word counts into a spellchecker.
    pub fn new(words: &WordCounts, mut options: SpellOptions) -> Result<Self, Error> {
        let max_count = words.counts.values().copied().max().unwrap_or(1).max(1) as f64;

        let mut builder = MapBuilder::memory();
        let mut max_freq = 1;

        // log scale so a handful of very common words do not squash everything else into the lowest bucket
        for (word, count) in words.counts.iter() {
            let freq = (((*count as f64).ln_1p() / max_count.ln_1p()) * MAX_FREQ_BUCKET as f64)
                .round() as usize;
            max_freq = max_freq.max(freq);
            builder.insert(word, freq as u64)?;
        }

        options.whitelist = options.whitelist.iter().map(|x| x.to_lowercase()).collect();

        let fst = Map::new(builder.into_inner()?)?;
        debug!("compiled spellchecker with {} words", fst.len());

        Ok(Spell {
            fst,
            max_freq,
            options,
        })
    }

    /// Gets the options.
    pub fn options(&self) -> &SpellOptions {
        &self.options
    }

    /// Adds words which are always accepted.
    pub fn load_words<I: IntoIterator<Item = S>, S: AsRef<str>>(&mut self, words: I) {
        self.options
            .whitelist
            .extend(words.into_iter().map(|x| x.as_ref().to_lowercase()));
    }

    /// Number of words in the dictionary, not counting the whitelist.
    pub fn len(&self) -> usize {
        self.fst.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fst.is_empty()
    }

    fn search(&self, word: &str) -> Vec<String> {
        let query = levenshtein::Levenshtein::new(
            word,
            self.options.max_distance,
            self.options.prefix_length,
        );

        let mut out = BinaryHeap::with_capacity(self.options.top_n + 1);

        let mut stream = self.fst.search_with_state(query).into_stream();
        while let Some((k, v, s)) = stream.next() {
            let state = s.expect("matching levenshtein state is always `Some`.");
            let term = String::from_utf8(k.to_vec()).expect("fst keys must be valid utf-8.");

            if term == word {
                continue;
            }

            out.push(Candidate {
                distance: state.dist(),
                freq: v as usize,
                score: (self.options.max_distance - state.dist()) as f32
                    + v as f32 / self.max_freq as f32 * self.options.freq_weight,
                term,
            });
            // the heap is a max-heap over the reversed order, so the worst candidate is on top
            if out.len() > self.options.top_n {
                out.pop();
            }
        }

        // `into_iter_sorted` is unstable - see https://github.com/rust-lang/rust/issues/59278
        out.into_sorted_vec().into_iter().map(|x| x.term).collect()
    }
}

impl Dictionary for Spell {
    fn is_known(&self, word: &str) -> bool {
        if word.is_empty()
            || word
                .chars()
                .all(|x| x.is_symbol() || x.is_punctuation() || x.is_numeric())
        {
            return true;
        }

        let lower = word.to_lowercase();
        self.options.whitelist.contains(&lower) || self.fst.contains_key(&lower)
    }

    /// Known words have themselves as only candidate. Candidates carry the casing of `word`.
    fn candidates(&self, word: &str) -> Vec<String> {
        if self.is_known(word) {
            return vec![word.to_owned()];
        }

        self.search(&word.to_lowercase())
            .into_iter()
            .map(|x| restore_case(word, &x))
            .collect()
    }
}
