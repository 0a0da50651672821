use super::ERROR_MSG;
use crate::{
    sentiment::SentimentAnalyzer,
    spell::{Spell, SpellOptions, WordCounts},
    tokenizer::{tag::Tagger, Tokenizer},
};

/// A tokenizer with the bundled English lexicon.
pub fn tokenizer() -> Tokenizer {
    let (name, bytes) = resource!("en", "tags.tsv");

    let mut tagger = Tagger::default();
    tagger.extend_from_reader(name, bytes).expect(ERROR_MSG);

    Tokenizer::new(tagger)
}

/// The bundled English word list, ordered by frequency.
pub fn word_counts() -> WordCounts {
    let (name, bytes) = resource!("en", "words.txt");

    let mut counts = WordCounts::default();
    counts.extend_from_reader(name, bytes).expect(ERROR_MSG);

    counts
}

/// A spellchecker knowing the bundled English words.
pub fn spell(options: SpellOptions) -> Spell {
    Spell::new(&word_counts(), options).expect(ERROR_MSG)
}

/// A sentiment analyzer with the bundled English valence lexicon.
pub fn sentiment() -> SentimentAnalyzer {
    let (name, bytes) = resource!("en", "sentiment.tsv");

    let mut analyzer = SentimentAnalyzer::default();
    analyzer.extend_from_reader(name, bytes).expect(ERROR_MSG);

    analyzer
}
