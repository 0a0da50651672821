//! The interactive correction loop.
//!
//! Every unknown word goes through a small state machine:
//! `Unknown -> Suggested -> {Accepted, Browsing, Skipped}` and `Browsing -> {Accepted, Skipped}`.
//! A word whose best suggestion is the word itself never reaches `Suggested`.

use log::{debug, info};
use std::collections::HashMap;
use std::io;

use crate::console::Console;
use crate::spell::Dictionary;
use crate::substitute::replace_all;

/// A decision of the human reviewer, parsed once from the raw answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Take the offered suggestion.
    Accept,
    /// Reject the offered suggestion and look at other candidates.
    Reject,
    /// Use a replacement typed in by hand.
    Manual(String),
    /// Leave the word as it is. Any unrecognized answer is a skip.
    Skip,
}

impl Decision {
    /// Parses an answer. `i` only asks for manual input if `allow_manual` is set, otherwise it is a skip.
    pub fn parse(answer: &str, allow_manual: bool) -> ParsedAnswer {
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => ParsedAnswer::Decision(Decision::Accept),
            "n" | "new" => ParsedAnswer::Decision(Decision::Reject),
            "i" if allow_manual => ParsedAnswer::NeedsInput,
            _ => ParsedAnswer::Decision(Decision::Skip),
        }
    }
}

/// The result of parsing one answer: either a complete decision or a request for the manual replacement text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedAnswer {
    Decision(Decision),
    NeedsInput,
}

/// Asks a question and turns the answer into a [Decision], reading the replacement text for manual input.
pub fn ask_decision<C: Console + ?Sized>(
    console: &mut C,
    question: &str,
    allow_manual: bool,
) -> io::Result<Decision> {
    let answer = console.ask(question)?;

    Ok(match Decision::parse(&answer, allow_manual) {
        ParsedAnswer::Decision(decision) => decision,
        ParsedAnswer::NeedsInput => Decision::Manual(console.ask("Input suggestion: ")?),
    })
}

/// Where a word ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The dictionary cannot improve the word, nobody was asked.
    Unchanged,
    /// The word is replaced by the given text.
    Accepted(String),
    /// The reviewer chose to leave the word.
    Skipped,
}

/// Misspelled word -> chosen replacement.
/// Applying the map consumes it, so corrections can only be applied once all decisions are made.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrectionMap(HashMap<String, String>);

impl CorrectionMap {
    pub fn new() -> Self {
        CorrectionMap::default()
    }

    /// Records a replacement. A later replacement for the same word overwrites the earlier one.
    pub fn insert(&mut self, word: String, replacement: String) {
        self.0.insert(word, replacement);
    }

    pub fn get(&self, word: &str) -> Option<&str> {
        self.0.get(word).map(|x| x.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replaces every occurrence of each word in `text`. Replacements are applied one after another in
    /// unspecified order; if a replacement contains another misspelled word the result depends on that order.
    pub fn apply(self, text: &str) -> String {
        replace_all(text, self.iter())
    }
}

/// Resolves unknown words by asking the reviewer.
pub struct CorrectionSession<'a, D: Dictionary, C: Console + ?Sized> {
    dictionary: &'a D,
    console: &'a mut C,
    corrections: CorrectionMap,
}

impl<'a, D: Dictionary, C: Console + ?Sized> CorrectionSession<'a, D, C> {
    pub fn new(dictionary: &'a D, console: &'a mut C) -> Self {
        CorrectionSession {
            dictionary,
            console,
            corrections: CorrectionMap::new(),
        }
    }

    /// The corrections recorded so far.
    pub fn corrections(&self) -> &CorrectionMap {
        &self.corrections
    }

    /// Runs the state machine for one unknown word.
    pub fn review(&mut self, word: &str) -> io::Result<Outcome> {
        let suggestion = self.dictionary.correction(word);
        if suggestion == word {
            debug!("no better spelling for {:?}", word);
            return Ok(Outcome::Unchanged);
        }

        self.console.show(&format!("{} TO {}", word, suggestion))?;

        let outcome = match ask_decision(
            self.console,
            "Do you like that suggestion? (yes/new/skip) ",
            false,
        )? {
            Decision::Accept => Outcome::Accepted(suggestion),
            Decision::Reject => self.browse(word)?,
            Decision::Manual(text) => Outcome::Accepted(text),
            Decision::Skip => Outcome::Skipped,
        };

        if let Outcome::Accepted(replacement) = &outcome {
            info!("{:?} will be replaced by {:?}", word, replacement);
            self.corrections
                .insert(word.to_owned(), replacement.to_owned());
        }

        Ok(outcome)
    }

    fn browse(&mut self, word: &str) -> io::Result<Outcome> {
        for candidate in self.dictionary.candidates(word) {
            self.console.show(&candidate)?;

            match ask_decision(
                self.console,
                "Do you like that suggestion? (yes/new/skip/i) ",
                true,
            )? {
                Decision::Accept => return Ok(Outcome::Accepted(candidate)),
                Decision::Manual(text) => return Ok(Outcome::Accepted(text)),
                Decision::Reject => continue,
                Decision::Skip => return Ok(Outcome::Skipped),
            }
        }

        Ok(Outcome::Skipped)
    }

    /// Reviews all unknown words among `words` and returns the finished corrections.
    pub fn run<'w, I: IntoIterator<Item = &'w str>>(mut self, words: I) -> io::Result<CorrectionMap> {
        let unknown = self.dictionary.unknown(words);
        debug!("{} unknown words", unknown.len());

        for word in unknown.iter() {
            self.review(word)?;
        }

        Ok(self.corrections)
    }
}
