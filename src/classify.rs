//! Selects the tokens of an article which should be spellchecked.
//!
//! Tokens are routed by their part-of-speech tag: *checkable* tags go to the spellchecker, *flagged* tags
//! (superlatives, adverbs, interjections) go to the spellchecker and are also reported as possible style issues.
//! An opening quotation mark starts a suppression window: italicized text on wikis is frequently foreign, so the
//! tokens right after it are exempt. The window has a fixed length regardless of where the quotation actually ends.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::tokenizer::tag::OPENING_QUOTE;
use crate::types::Token;

/// Which tags are checked, which are flagged and how quotations are treated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryOptions {
    /// Nouns, comparative adjectives, adjectives, conjunctions, determiners, prepositions, predeterminers,
    /// pronouns, comparative adverbs, particles, verbs and plural nouns.
    pub checkable: HashSet<String>,
    /// Superlative adjectives, adverbs, superlative adverbs and interjections.
    pub flagged: HashSet<String>,
    /// The tag starting a suppression window.
    pub quote_tag: String,
    /// How many tokens after the quotation are exempt.
    pub window: usize,
}

impl Default for CategoryOptions {
    fn default() -> Self {
        CategoryOptions {
            checkable: [
                "NN", "JJR", "JJ", "CC", "DT", "IN", "PDT", "PRP", "RBR", "RP", "VB", "NNS",
            ]
            .iter()
            .map(|x| x.to_string())
            .collect(),
            flagged: ["JJS", "RB", "RBS", "UH"]
                .iter()
                .map(|x| x.to_string())
                .collect(),
            quote_tag: OPENING_QUOTE.to_owned(),
            window: 2,
        }
    }
}

/// A message for the human reviewer which does not change the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// A word with a tag which is often superfluous in encyclopedic text.
    Flagged { word: String, pos: String },
    /// A quotation started, the next tokens are not checked.
    Italics,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::Flagged { word, .. } => write!(f, "Bad: {}", word),
            Advisory::Italics => write!(f, "italics"),
        }
    }
}

/// The result of classifying the tokens of a text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    checks: Vec<Token>,
    advisories: Vec<Advisory>,
}

impl Classification {
    /// Tokens to spellcheck, in text order.
    pub fn checks(&self) -> &[Token] {
        &self.checks
    }

    /// Advisories, in the order they were raised.
    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.checks.iter().map(|x| x.text())
    }
}

/// Classifies tokens. Holds the suppression counter, so one classifier handles one text.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    options: CategoryOptions,
    suppression: usize,
}

impl Classifier {
    pub fn new(options: CategoryOptions) -> Self {
        Classifier {
            options,
            suppression: 0,
        }
    }

    pub fn options(&self) -> &CategoryOptions {
        &self.options
    }

    /// The number of upcoming tokens which are still exempt.
    pub fn suppression(&self) -> usize {
        self.suppression
    }

    /// Processes one token, adding it to `out` if it should be checked.
    pub fn push(&mut self, token: &Token, out: &mut Classification) {
        if self.suppression > 0 {
            self.suppression -= 1;
            return;
        }

        let pos = token.pos();

        if pos == self.options.quote_tag {
            out.advisories.push(Advisory::Italics);
            self.suppression = self.options.window;
        } else if token.is_alphabetic() {
            if self.options.checkable.contains(pos) {
                out.checks.push(token.clone());
            } else if self.options.flagged.contains(pos) {
                out.checks.push(token.clone());
                out.advisories.push(Advisory::Flagged {
                    word: token.text().to_owned(),
                    pos: pos.to_owned(),
                });
            }
        }
    }

    /// Classifies a sequence of tokens.
    pub fn classify(mut self, tokens: &[Token]) -> Classification {
        let mut out = Classification::default();

        for token in tokens {
            self.push(token, &mut out);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(pairs: &[(&str, &str)]) -> Vec<Token> {
        pairs.iter().map(|(t, p)| Token::tagged(*t, *p)).collect()
    }

    #[test]
    fn checkable_and_flagged_are_checked() {
        let classification =
            Classifier::default().classify(&tokens(&[("go", "VB"), ("quikly", "RB")]));

        assert_eq!(classification.words().collect::<Vec<_>>(), vec!["go", "quikly"]);
        assert_eq!(
            classification.advisories(),
            &[Advisory::Flagged {
                word: "quikly".into(),
                pos: "RB".into()
            }]
        );
        assert_eq!(classification.advisories()[0].to_string(), "Bad: quikly");
    }

    #[test]
    fn other_tags_and_non_alphabetic_tokens_are_ignored() {
        let classification = Classifier::default().classify(&tokens(&[
            ("Rome", "NNP"),
            ("went", "VBD"),
            ("don't", "VB"),
            ("1984", "NN"),
            ("[[", "SYM"),
            ("home", "NN"),
        ]));

        assert_eq!(classification.words().collect::<Vec<_>>(), vec!["home"]);
        assert!(classification.advisories().is_empty());
    }

    #[test]
    fn quotation_suppresses_next_two_tokens() {
        let classification = Classifier::default().classify(&tokens(&[
            ("''", "``"),
            ("dolce", "NN"),
            ("vita", "RB"),
            ("store", "NN"),
        ]));

        assert_eq!(classification.words().collect::<Vec<_>>(), vec!["store"]);
        assert_eq!(classification.advisories(), &[Advisory::Italics]);
    }

    #[test]
    fn suppression_counts_non_alphabetic_tokens() {
        let classification = Classifier::default().classify(&tokens(&[
            ("''", "``"),
            ("caffè", "NN"),
            (",", ","),
            ("latte", "NN"),
        ]));

        assert_eq!(classification.words().collect::<Vec<_>>(), vec!["latte"]);
    }

    #[test]
    fn quotation_inside_window_is_suppressed() {
        let classification = Classifier::default().classify(&tokens(&[
            ("''", "``"),
            ("''", "``"),
            ("one", "NN"),
            ("two", "NN"),
        ]));

        assert_eq!(classification.words().collect::<Vec<_>>(), vec!["two"]);
        assert_eq!(classification.advisories(), &[Advisory::Italics]);
    }

    #[test]
    fn suppression_counter_is_explicit_state() {
        let mut classifier = Classifier::default();
        let mut out = Classification::default();

        classifier.push(&Token::tagged("\"", "``"), &mut out);
        assert_eq!(classifier.suppression(), 2);
        classifier.push(&Token::tagged("a", "DT"), &mut out);
        assert_eq!(classifier.suppression(), 1);
        classifier.push(&Token::tagged("b", "DT"), &mut out);
        assert_eq!(classifier.suppression(), 0);
        classifier.push(&Token::tagged("c", "DT"), &mut out);

        assert_eq!(out.words().collect::<Vec<_>>(), vec!["c"]);
    }
}
