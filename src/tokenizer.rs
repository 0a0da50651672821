//! A tokenizer to split raw text into sentences and tokens.
//! Tokens are assigned part-of-speech tags by lookup from a [Tagger][tag::Tagger].
//! Quotation marks are tagged as opening (``` `` ```) or closing (`''`) depending on their position,
//! wiki markup for italics and bold (`''`, `'''`) counts as a quotation mark.

use lazy_static::lazy_static;
use onig::Regex;
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

pub mod tag;

use tag::{Tagger, CLOSING_QUOTE, OPENING_QUOTE};

use crate::types::Token;
use crate::utils::{opening_brackets, quote_chars, split, splitting_chars};

fn get_token_strs(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();

    lazy_static! {
        // see https://stackoverflow.com/a/17773849
        static ref URL_REGEX: Regex = Regex::new(r"(https?:\/\/(?:www\.|(?!www))[a-zA-Z0-9][a-zA-Z0-9-]+[a-zA-Z0-9]\.[^\s|\]]{2,}|www\.[a-zA-Z0-9][a-zA-Z0-9-]+[a-zA-Z0-9]\.[^\s|\]]{2,}|https?:\/\/(?:www\.|(?!www))[a-zA-Z0-9]+\.[^\s|\]]{2,}|www\.[a-zA-Z0-9]+\.[^\s|\]]{2,})").unwrap();
    }

    let mut prev = 0;
    let split_func = |c: char| c.is_whitespace() || splitting_chars().contains(c);

    for (start, end) in URL_REGEX.find_iter(text) {
        tokens.extend(split(&text[prev..start], split_func));
        tokens.push(&text[start..end]);
        prev = end;
    }

    tokens.extend(split(&text[prev..text.len()], split_func));

    tokens
}

/// The character a token consists of if it is a run of one repeated quote character.
fn quote_run(token: &str) -> Option<char> {
    let first = token.chars().next()?;

    if quote_chars().contains(first) && token.chars().all(|c| c == first) {
        Some(first)
    } else {
        None
    }
}

fn is_apostrophe(token: &str) -> bool {
    token == "'" || token == "’"
}

fn is_word_part(token: &str) -> bool {
    token.chars().next().map_or(false, char::is_alphabetic)
        && token.chars().all(|c| c.is_alphabetic() || c == '\'' || c == '’')
}

/// Merges adjacent ranges which belong to one token:
/// - runs of the same quote character e. g. the wiki italics marker `''`,
/// - words joined by an apostrophe e. g. `don't` or `Rome's`.
fn merge_ranges(text: &str, ranges: Vec<Range<usize>>) -> Vec<Range<usize>> {
    let mut quotes_merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());

    for range in ranges {
        if let Some(last) = quotes_merged.last_mut() {
            let current = quote_run(&text[range.clone()]);
            if last.end == range.start
                && current.is_some()
                && current == quote_run(&text[last.clone()])
            {
                last.end = range.end;
                continue;
            }
        }
        quotes_merged.push(range);
    }

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(quotes_merged.len());

    for range in quotes_merged {
        let n = merged.len();
        if n >= 2 {
            let (word, apostrophe) = (&merged[n - 2], &merged[n - 1]);

            if word.end == apostrophe.start
                && apostrophe.end == range.start
                && is_word_part(&text[word.clone()])
                && is_apostrophe(&text[apostrophe.clone()])
                && is_word_part(&text[range.clone()])
            {
                let start = word.start;
                merged.truncate(n - 2);
                merged.push(start..range.end);
                continue;
            }
        }
        merged.push(range);
    }

    merged
}

/// Whether a quotation token opens a quotation. Mirrors the usual treebank convention: quotes at the
/// start of the text, after whitespace or after an opening bracket open, all others close.
/// Wiki template separators (`|`, `=`) also precede opening quotes.
fn is_opening(text: &str, range: &Range<usize>) -> bool {
    match text[..range.start].chars().next_back() {
        None => true,
        Some(c) => {
            c.is_whitespace()
                || opening_brackets().contains(c)
                || c == '|'
                || c == '='
                || c == '“'
                || c == '„'
        }
    }
}

fn quote_tag(token: &str, opening: bool) -> Option<&'static str> {
    let c = quote_run(token)?;
    let n = token.chars().count();

    match c {
        '"' => Some(if opening { OPENING_QUOTE } else { CLOSING_QUOTE }),
        '“' | '„' | '«' => Some(OPENING_QUOTE),
        '”' | '»' => Some(CLOSING_QUOTE),
        '`' if n >= 2 => Some(OPENING_QUOTE),
        '\'' if n >= 2 => Some(if opening { OPENING_QUOTE } else { CLOSING_QUOTE }),
        '\'' | '’' => Some(if opening { CLOSING_QUOTE } else { "POS" }),
        _ => None,
    }
}

/// The tokenizer. Splits text into sentences and tagged tokens.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    tagger: Tagger,
}

impl Tokenizer {
    pub fn new(tagger: Tagger) -> Self {
        Tokenizer { tagger }
    }

    /// Gets the lexical tagger.
    pub fn tagger(&self) -> &Tagger {
        &self.tagger
    }

    /// Mutably gets the lexical tagger e. g. to add entries from user dumps.
    pub fn tagger_mut(&mut self) -> &mut Tagger {
        &mut self.tagger
    }

    /// Splits a text into sentences. Sentences are trimmed, whitespace-only sentences are dropped.
    pub fn sentences<'t>(&self, text: &'t str) -> Vec<&'t str> {
        text.unicode_sentences()
            .map(str::trim)
            .filter(|x| !x.is_empty())
            .collect()
    }

    fn get_token_ranges(&self, text: &str) -> Vec<Range<usize>> {
        let ranges = get_token_strs(text)
            .into_iter()
            .filter(|token| !token.trim().is_empty())
            .map(|token| {
                let byte_start = (token.as_ptr() as usize)
                    .checked_sub(text.as_ptr() as usize)
                    .expect("Each token str is a slice of the text str.");

                byte_start..byte_start + token.len()
            })
            .collect();

        merge_ranges(text, ranges)
    }

    /// Splits a text into tokens and tags them.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut sentence_starts = text
            .split_sentence_bound_indices()
            .map(|(i, _)| i)
            .peekable();

        self.get_token_ranges(text)
            .into_iter()
            .map(|range| {
                let mut is_sentence_start = false;
                while sentence_starts.peek().map_or(false, |x| *x <= range.start) {
                    sentence_starts.next();
                    is_sentence_start = true;
                }

                let token_text = &text[range.clone()];
                let has_space_before = text[..range.start].ends_with(char::is_whitespace);

                let pos = match quote_tag(token_text, is_opening(text, &range)) {
                    Some(pos) => pos.to_owned(),
                    None => self.tagger.tag(token_text, is_sentence_start),
                };

                Token::new(token_text, pos, range, has_space_before)
            })
            .collect()
    }
}
