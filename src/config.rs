//! Configuration of a copy-editing run. Every field has a default, so an empty JSON object is a valid config.

use fs_err as fs;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::{classify::CategoryOptions, spell::SpellOptions, substitute::LiteralIssues, Error};

/// Additional resource files, appended to the bundled English resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    /// Tagger dumps with `word<TAB>lemma<TAB>tag` lines.
    pub lexicons: Vec<PathBuf>,
    /// Word lists for the spellchecker, `word` or `word count` per line.
    pub word_lists: Vec<PathBuf>,
    /// Valence lexicons with `word<TAB>valence` lines.
    pub sentiment_lexicons: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Endpoint of the MediaWiki Action API.
    pub api_url: String,
    /// A URL redirecting to a random article which should be copy-edited.
    pub random_url: String,
    /// The edit summary used when saving.
    pub summary: String,
    /// Exact substitutions applied before anything else, in order.
    pub literal_issues: IndexMap<String, String>,
    pub categories: CategoryOptions,
    pub spell: SpellOptions,
    pub resources: Resources,
    /// Average sentiment magnitude above which an article is reported as possibly biased.
    pub bias_threshold: f32,
    pub open_browser: bool,
    /// Wait for the reviewer to read the sentiment report before continuing.
    pub pause_after_sentiment: bool,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: "https://en.wikipedia.org/w/api.php".into(),
            random_url:
                "https://randomincategory.toolforge.org/All_articles_needing_copy_edit?site=en.wikipedia.org"
                    .into(),
            summary: "Checking spelling".into(),
            literal_issues: LiteralIssues::default()
                .iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
            categories: CategoryOptions::default(),
            spell: SpellOptions::default(),
            resources: Resources::default(),
            bias_threshold: 0.05,
            open_browser: true,
            pause_after_sentiment: true,
            user_agent: format!("copyedit/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Reads a config from a JSON file. Missing fields take their default.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let config: Config = serde_json::from_str(&fs::read_to_string(path.as_ref())?)?;
        config.validate()?;

        Ok(config)
    }

    /// Checks values serde cannot check.
    pub fn validate(&self) -> Result<(), Error> {
        for (name, url) in [("api_url", &self.api_url), ("random_url", &self.random_url)] {
            Url::parse(url).map_err(|e| Error::Config(format!("{} {:?}: {}", name, url, e)))?;
        }

        if let Some(checked) = self
            .categories
            .checkable
            .intersection(&self.categories.flagged)
            .next()
        {
            return Err(Error::Config(format!(
                "tag {:?} is both checkable and flagged",
                checked
            )));
        }

        if !self.bias_threshold.is_finite() || self.bias_threshold < 0. {
            return Err(Error::Config(format!(
                "bias_threshold must be a non-negative number, got {}",
                self.bias_threshold
            )));
        }

        Ok(())
    }

    pub fn literal_issues(&self) -> LiteralIssues {
        self.literal_issues.clone().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn write(content: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new("copyedit_config").unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn empty_object_is_default() {
        let (_dir, path) = write("{}");

        assert_eq!(Config::from_path(&path).unwrap(), Config::default());
    }

    #[test]
    fn defaults_are_set() {
        let config = Config::default();

        assert_eq!(config.summary, "Checking spelling");
        assert_eq!(config.categories.window, 2);
        assert_eq!(config.spell.max_distance, 2);
        assert!((config.bias_threshold - 0.05).abs() < f32::EPSILON);
        assert_eq!(
            config.literal_issues.iter().collect::<Vec<_>>(),
            vec![
                (&" .".to_string(), &".".to_string()),
                (&" ,".to_string(), &",".to_string())
            ]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let (_dir, path) = write(
            r#"{
                "summary": "Typo fixes",
                "literal_issues": {"  ": " ", " ;": ";"},
                "spell": {"max_distance": 1},
                "open_browser": false
            }"#,
        );
        let config = Config::from_path(&path).unwrap();

        assert_eq!(config.summary, "Typo fixes");
        assert!(!config.open_browser);
        assert_eq!(config.spell.max_distance, 1);
        assert_eq!(config.spell.top_n, 10);
        assert!(config.spell.whitelist.contains("infobox"));
        assert_eq!(config.categories, CategoryOptions::default());
        assert_eq!(
            config.literal_issues.keys().collect::<Vec<_>>(),
            vec!["  ", " ;"]
        );
        assert_eq!(config.literal_issues().apply("a ;  b"), "a; b");
    }

    #[test]
    fn invalid_json_is_an_error() {
        let (_dir, path) = write("{\"summary\": 1}");

        assert!(matches!(
            Config::from_path(&path),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(matches!(
            Config::from_path("/nonexistent/config.json"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn overlapping_categories_are_rejected() {
        let (_dir, path) = write(r#"{"categories": {"flagged": ["NN"]}}"#);

        assert!(matches!(Config::from_path(&path), Err(Error::Config(_))));
    }

    #[test]
    fn invalid_url_is_rejected() {
        let mut config = Config::default();
        config.api_url = "not a url".into();

        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
