//! One copy-editing run over one article.

use log::{debug, info};

use crate::{
    classify::{Advisory, Classifier},
    config::Config,
    console::Console,
    correct::CorrectionSession,
    lang::en,
    sentiment::{estimate, SentimentAnalyzer, SentimentReport},
    spell::Spell,
    tokenizer::Tokenizer,
    types::ArticleRef,
    wiki::Wiki,
    Error,
};

const SEPARATOR: &str = "----------------------------------------------------";

/// What a run did.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub title: String,
    /// Literal issues found in the fetched text with their number of occurrences.
    pub literal_fixes: Vec<(String, usize)>,
    pub sentiment: SentimentReport,
    pub advisories: Vec<Advisory>,
    /// Accepted corrections, sorted by the misspelled word.
    pub corrections: Vec<(String, String)>,
    /// The final text of the article.
    pub text: String,
    /// Whether the article was saved.
    pub saved: bool,
}

/// The components of a run, loaded once and reusable across articles.
pub struct Pipeline {
    tokenizer: Tokenizer,
    spell: Spell,
    sentiment: SentimentAnalyzer,
    config: Config,
}

impl Pipeline {
    /// Loads the bundled English resources extended by the resources named in the config.
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;

        let mut tokenizer = en::tokenizer();
        tokenizer
            .tagger_mut()
            .extend_from_dumps(&config.resources.lexicons)?;

        let mut counts = en::word_counts();
        counts.extend_from_paths(&config.resources.word_lists)?;
        let spell = Spell::new(&counts, config.spell.clone())?;

        let mut sentiment = en::sentiment();
        sentiment.extend_from_paths(&config.resources.sentiment_lexicons)?;

        debug!(
            "loaded {} lexicon entries, {} words, {} valences",
            tokenizer.tagger().len(),
            spell.len(),
            sentiment.len()
        );

        Ok(Pipeline::from_parts(tokenizer, spell, sentiment, config))
    }

    pub fn from_parts(
        tokenizer: Tokenizer,
        spell: Spell,
        sentiment: SentimentAnalyzer,
        config: Config,
    ) -> Self {
        Pipeline {
            tokenizer,
            spell,
            sentiment,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn spell(&self) -> &Spell {
        &self.spell
    }

    /// Copy-edits one article: fetch, literal fixes, sentiment, classification, interactive corrections and save.
    /// With `dry_run` the corrections are shown instead of saved. Unchanged articles are never saved.
    pub fn run<W: Wiki + ?Sized, C: Console + ?Sized>(
        &self,
        wiki: &W,
        console: &mut C,
        article: &ArticleRef,
        dry_run: bool,
    ) -> Result<RunReport, Error> {
        let mut article = wiki.fetch(article)?;
        let fetched = article.text.clone();

        let issues = self.config.literal_issues();
        let literal_fixes: Vec<(String, usize)> = issues
            .count(&article.text)
            .into_iter()
            .map(|(k, n)| (k.to_owned(), n))
            .collect();
        article.text = issues.apply(&article.text);
        info!("literal pass: {:?}", literal_fixes);

        if self.config.open_browser {
            console.open(article.url.as_str());
        }

        let sentiment = estimate(&self.tokenizer.sentences(&article.text), &self.sentiment);
        info!("{}", sentiment);
        console.show(&sentiment.to_string())?;
        if let Some(true) = sentiment.is_biased(self.config.bias_threshold) {
            console.show(&format!(
                "possibly biased (|average| > {})",
                self.config.bias_threshold
            ))?;
        }
        console.show(SEPARATOR)?;
        if self.config.pause_after_sentiment {
            console.ask("Press any key to continue: ")?;
        }

        let tokens = self.tokenizer.tokenize(&article.text);
        let classification =
            Classifier::new(self.config.categories.clone()).classify(&tokens);
        debug!(
            "{} tokens, {} to check",
            tokens.len(),
            classification.checks().len()
        );
        for advisory in classification.advisories() {
            console.show(&advisory.to_string())?;
        }

        let corrections =
            CorrectionSession::new(&self.spell, &mut *console).run(classification.words())?;

        let mut accepted: Vec<(String, String)> = corrections
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        accepted.sort();
        info!("{} corrections accepted", accepted.len());

        article.text = corrections.apply(&article.text);

        let saved = if article.text == fetched {
            info!("{:?} is unchanged, not saving", article.title);
            false
        } else if dry_run {
            for (word, replacement) in &accepted {
                console.show(&format!("would replace {} with {}", word, replacement))?;
            }
            info!("dry run, not saving {:?}", article.title);
            false
        } else {
            wiki.save(&article, &self.config.summary)?;
            true
        };

        Ok(RunReport {
            title: article.title,
            literal_fixes,
            sentiment,
            advisories: classification.advisories().to_vec(),
            corrections: accepted,
            text: article.text,
            saved,
        })
    }
}
