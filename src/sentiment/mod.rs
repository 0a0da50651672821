//! Sentence level sentiment and the article average used as a bias signal.
//!
//! The scorer is lexicon based: every known word contributes a valence which is modified by boosters,
//! negations, capitalization, a contrastive "but" and emphatic punctuation. The sum is normalized into a
//! compound score in `[-1, 1]`. See [VADER](https://ojs.aaai.org/index.php/ICWSM/article/view/14550) for
//! the approach and constants.

use fs_err::File;
use log::debug;
use std::{
    collections::HashMap,
    fmt,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{utils::is_uppercase, Error};

mod words;

use words::{BOOSTERS, DAMPENERS, NEGATORS};

/// Added for a booster, subtracted for a dampener.
const BOOSTER_INCREMENT: f32 = 0.293;
/// Added for an all-caps word in a sentence which is not all caps.
const CAPS_INCREMENT: f32 = 0.733;
const NEGATION_SCALAR: f32 = -0.74;
/// Booster effect by distance to the scored word.
const BOOSTER_DAMPING: [f32; 3] = [1.0, 0.95, 0.9];
const EXCLAMATION_INCREMENT: f32 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_INCREMENT: f32 = 0.18;
const MAX_QUESTION_EMPHASIS: f32 = 0.96;
/// Approximates the maximum expected sum, controls how fast the compound score saturates.
const NORMALIZATION_ALPHA: f32 = 15.;

/// Scores the sentiment of a sentence.
pub trait Score {
    /// Compound polarity of a sentence in `[-1, 1]`. Negative is negative sentiment, zero is neutral.
    fn polarity(&self, sentence: &str) -> f32;
}

impl<F: Fn(&str) -> f32> Score for F {
    fn polarity(&self, sentence: &str) -> f32 {
        self(sentence)
    }
}

/// A lexicon based sentiment scorer.
#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer {
    lexicon: HashMap<String, f32>,
}

impl SentimentAnalyzer {
    /// Reads valence lexicons from files.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self, Error> {
        let mut analyzer = SentimentAnalyzer::default();
        analyzer.extend_from_paths(paths)?;
        Ok(analyzer)
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

    /// Adds entries from a lexicon with one `word<TAB>valence` entry per line. Further columns are ignored,
    /// valences are expected on a scale from -4 to 4. Later entries overwrite earlier ones.
    pub fn extend_from_reader<R: BufRead>(&mut self, name: &str, reader: R) -> Result<(), Error> {
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }

            let mut parts = line.split('\t');
            let (word, valence) = match (parts.next(), parts.next()) {
                (Some(word), Some(valence)) => (word.trim(), valence.trim()),
                _ => {
                    return Err(Error::Resource {
                        source_name: name.to_owned(),
                        line: i + 1,
                        reason: "expected `word<TAB>valence`".into(),
                    })
                }
            };

            let valence = valence.parse::<f32>().map_err(|e| Error::Resource {
                source_name: name.to_owned(),
                line: i + 1,
                reason: format!("invalid valence {:?}: {}", valence, e),
            })?;

            self.lexicon.insert(word.to_lowercase(), valence);
        }

        debug!("sentiment lexicon has {} entries", self.lexicon.len());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lexicon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexicon.is_empty()
    }

    /// The valence of a single word, if it is in the lexicon.
    pub fn valence(&self, word: &str) -> Option<f32> {
        self.lexicon.get(&word.to_lowercase()).copied()
    }
}

fn is_negated(word: &str) -> bool {
    NEGATORS.contains(&word) || word.ends_with("n't")
}

/// The booster increment of `word` in the direction of `valence`, if it is a booster or dampener.
fn booster_scalar(word: &str, lower: &str, valence: f32, caps_differ: bool) -> Option<f32> {
    let scalar = if BOOSTERS.contains(&lower) {
        BOOSTER_INCREMENT
    } else if DAMPENERS.contains(&lower) {
        -BOOSTER_INCREMENT
    } else {
        return None;
    };

    let mut scalar = if valence < 0. { -scalar } else { scalar };
    if caps_differ && is_shouted(word) {
        scalar += CAPS_INCREMENT.copysign(valence);
    }

    Some(scalar)
}

fn is_shouted(word: &str) -> bool {
    word.chars().filter(|x| x.is_alphabetic()).count() > 1 && is_uppercase(word)
}

/// Emphasis added by exclamation and question marks.
fn punctuation_emphasis(sentence: &str) -> f32 {
    let exclamations = sentence.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = sentence.matches('?').count();

    let question_emphasis = if questions > 1 {
        (questions as f32 * QUESTION_INCREMENT).min(MAX_QUESTION_EMPHASIS)
    } else {
        0.
    };

    exclamations as f32 * EXCLAMATION_INCREMENT + question_emphasis
}

fn normalize(sum: f32) -> f32 {
    (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1., 1.)
}

impl Score for SentimentAnalyzer {
    fn polarity(&self, sentence: &str) -> f32 {
        let words: Vec<&str> = sentence
            .split_whitespace()
            .map(|x| x.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
            .filter(|x| !x.is_empty())
            .collect();
        let lowers: Vec<String> = words.iter().map(|x| x.to_lowercase()).collect();

        let n_shouted = words.iter().filter(|x| is_shouted(x)).count();
        let caps_differ = n_shouted > 0 && n_shouted < words.len();

        let mut valences = Vec::with_capacity(words.len());

        for (i, (word, lower)) in words.iter().zip(lowers.iter()).enumerate() {
            let mut valence = match self.lexicon.get(lower) {
                Some(valence) if !BOOSTERS.contains(&lower.as_str()) => *valence,
                _ => {
                    valences.push(0.);
                    continue;
                }
            };

            if caps_differ && is_shouted(word) {
                valence += CAPS_INCREMENT.copysign(valence);
            }

            for (distance, damping) in BOOSTER_DAMPING.iter().enumerate() {
                let j = match i.checked_sub(distance + 1) {
                    Some(j) => j,
                    None => break,
                };

                if let Some(scalar) = booster_scalar(words[j], &lowers[j], valence, caps_differ) {
                    valence += scalar * damping;
                }
                if is_negated(&lowers[j]) {
                    valence *= NEGATION_SCALAR;
                }
            }

            valences.push(valence);
        }

        if let Some(but) = lowers.iter().position(|x| x == "but") {
            for (i, valence) in valences.iter_mut().enumerate() {
                if i < but {
                    *valence *= 0.5;
                } else if i > but {
                    *valence *= 1.5;
                }
            }
        }

        let mut sum: f32 = valences.iter().sum();
        if sum != 0. {
            sum += punctuation_emphasis(sentence).copysign(sum);
        }

        normalize(sum)
    }
}

/// The sentiment of an article: one score per sentence and their mean.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentReport {
    scores: Vec<f32>,
    average: Option<f32>,
}

impl SentimentReport {
    /// Scores of the sentences, in order.
    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    /// The arithmetic mean of the scores. `None` if there were no sentences.
    pub fn average(&self) -> Option<f32> {
        self.average
    }

    /// Whether the average suggests a non-neutral point of view. `None` if there is no average.
    pub fn is_biased(&self, threshold: f32) -> Option<bool> {
        self.average.map(|x| x.abs() > threshold)
    }
}

impl fmt::Display for SentimentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.average {
            Some(average) => write!(f, "AVERAGE SENTIMENT FOR ARTICLE: \t{:.4}", average),
            None => write!(f, "no sentiment data available"),
        }
    }
}

/// Scores every sentence and averages the scores.
pub fn estimate<S: Score + ?Sized>(sentences: &[&str], scorer: &S) -> SentimentReport {
    let scores: Vec<f32> = sentences.iter().map(|x| scorer.polarity(x)).collect();

    let average = if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f32>() / scores.len() as f32)
    };

    SentimentReport { scores, average }
}
