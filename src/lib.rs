//! Interactive copy-editing of wiki articles.
//! # Overview
//!
//! copyedit has the following core abstractions:
//! - A [Tokenizer][tokenizer::Tokenizer] to split an article into sentences and part-of-speech tagged tokens.
//! - A [Classifier][classify::Classifier] selecting the tokens worth spellchecking and flagging stylistic issues.
//! - A [Spell][spell::Spell] dictionary producing ranked corrections for unknown words.
//! - A [CorrectionSession][correct::CorrectionSession] resolving every unknown word by asking a human through a [Console][console::Console].
//! - A [Wiki][wiki::Wiki] source and sink for articles, implemented for the MediaWiki Action API by [WikiClient][wiki::WikiClient].
//!
//! [Pipeline][pipeline::Pipeline] runs them in order: fetch, literal fixes, sentiment, classification, corrections, save.
//!
//! # Examples
//!
//! Classify the tokens of a text:
//!
//! ```
//! use copyedit::{classify::Classifier, lang::en};
//!
//! let tokenizer = en::tokenizer();
//! let tokens = tokenizer.tokenize("He walked quickly to the store.");
//!
//! let classification = Classifier::default().classify(&tokens);
//! let checks: Vec<_> = classification.checks().iter().map(|x| x.text()).collect();
//! assert!(checks.contains(&"quickly"));
//! ```
//!
//! Find corrections for a misspelled word:
//!
//! ```
//! use copyedit::{lang::en, spell::{Dictionary, SpellOptions}};
//!
//! let spell = en::spell(SpellOptions::default());
//! assert_eq!(spell.correction("teh"), "the");
//! ```

// #![warn(missing_docs)]
use std::io;

use thiserror::Error;

pub mod classify;
pub mod config;
pub mod console;
pub mod correct;
#[macro_use]
pub mod lang;
pub mod pipeline;
pub mod sentiment;
pub mod spell;
pub mod substitute;
pub mod tokenizer;
pub mod types;
pub(crate) mod utils;
pub mod wiki;

pub use config::Config;
pub use pipeline::Pipeline;
pub use tokenizer::Tokenizer;

#[derive(Error, Debug)]
#[allow(missing_docs)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error(transparent)]
    Url(#[from] url::ParseError),
    /// (De)serialization error of an API response or a configuration file.
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Fst(#[from] fst::Error),
    #[error("could not derive an article title from {0}")]
    Title(String),
    #[error("wiki API error {code}: {info}")]
    Api { code: String, info: String },
    #[error("article {0:?} does not exist")]
    MissingArticle(String),
    #[error("login failed: {0}")]
    Login(String),
    #[error("saving {title:?} failed: {reason}")]
    Save { title: String, reason: String },
    #[error("malformed line {line} in {source_name}: {reason}")]
    Resource {
        source_name: String,
        line: usize,
        reason: String,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
