//! Fundamental types used by this crate.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use url::Url;

/// A token of an article: the text and its part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    text: String,
    pos: String,
    byte_span: Range<usize>,
    has_space_before: bool,
}

impl Token {
    pub fn new<S: Into<String>, P: Into<String>>(
        text: S,
        pos: P,
        byte_span: Range<usize>,
        has_space_before: bool,
    ) -> Self {
        Token {
            text: text.into(),
            pos: pos.into(),
            byte_span,
            has_space_before,
        }
    }

    /// Creates a token without positional information, e. g. for tests or tokens produced by an external tagger.
    pub fn tagged<S: Into<String>, P: Into<String>>(text: S, pos: P) -> Self {
        Token::new(text, pos, 0..0, false)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The part-of-speech tag (Penn Treebank tagset).
    pub fn pos(&self) -> &str {
        &self.pos
    }

    pub fn byte_span(&self) -> &Range<usize> {
        &self.byte_span
    }

    pub fn has_space_before(&self) -> bool {
        self.has_space_before
    }

    /// Whether the text consists of alphabetic characters only. Empty tokens are not alphabetic.
    pub fn is_alphabetic(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(char::is_alphabetic)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Identifies an article on a wiki.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRef {
    pub title: String,
    /// The URL the article can be viewed at.
    pub url: Url,
}

/// An article with its current wikitext.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub url: Url,
    pub text: String,
    /// Timestamp of the revision `text` was read from. Sent back on save to detect edit conflicts.
    pub base_timestamp: Option<String>,
}

impl Article {
    pub fn new(article_ref: ArticleRef, text: String, base_timestamp: Option<String>) -> Self {
        Article {
            title: article_ref.title,
            url: article_ref.url,
            text,
            base_timestamp,
        }
    }
}
