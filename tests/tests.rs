use std::{cell::RefCell, collections::HashMap};

use copyedit::{
    classify::{Advisory, Classifier},
    console::Scripted,
    lang::en,
    sentiment::Score,
    types::{Article, ArticleRef},
    wiki::{title_from_url, Wiki},
    Config, Error, Pipeline, Tokenizer,
};
use lazy_static::lazy_static;
use quickcheck_macros::quickcheck;
use url::Url;

lazy_static! {
    static ref TOKENIZER: Tokenizer = en::tokenizer();
    static ref PIPELINE: Pipeline = Pipeline::new(Config::default()).unwrap();
}

const PAUSE: &str = "Press any key to continue: ";

/// A wiki holding articles in memory and recording saves.
#[derive(Default)]
struct MemoryWiki {
    articles: HashMap<String, String>,
    saved: RefCell<Vec<(Article, String)>>,
}

impl MemoryWiki {
    fn with_article(title: &str, text: &str) -> Self {
        let mut wiki = MemoryWiki::default();
        wiki.articles.insert(title.to_owned(), text.to_owned());
        wiki
    }

    fn article_ref(title: &str) -> ArticleRef {
        ArticleRef {
            title: title.to_owned(),
            url: Url::parse("https://en.wikipedia.org/wiki/")
                .unwrap()
                .join(&title.replace(' ', "_"))
                .unwrap(),
        }
    }
}

impl Wiki for MemoryWiki {
    fn resolve(&self, entry_url: &str) -> Result<ArticleRef, Error> {
        let url = Url::parse(entry_url)?;

        Ok(ArticleRef {
            title: title_from_url(&url)?,
            url,
        })
    }

    fn fetch(&self, article: &ArticleRef) -> Result<Article, Error> {
        let text = self
            .articles
            .get(&article.title)
            .ok_or_else(|| Error::MissingArticle(article.title.clone()))?;

        Ok(Article::new(
            article.clone(),
            text.clone(),
            Some("2021-02-01T10:00:00Z".into()),
        ))
    }

    fn save(&self, article: &Article, summary: &str) -> Result<(), Error> {
        self.saved
            .borrow_mut()
            .push((article.clone(), summary.to_owned()));
        Ok(())
    }
}

fn run(text: &str, answers: Vec<&str>, dry_run: bool) -> (copyedit::pipeline::RunReport, MemoryWiki, Scripted) {
    let wiki = MemoryWiki::with_article("Test article", text);
    let mut console = Scripted::new(answers);

    let report = PIPELINE
        .run(
            &wiki,
            &mut console,
            &MemoryWiki::article_ref("Test article"),
            dry_run,
        )
        .unwrap();

    (report, wiki, console)
}

#[test]
fn can_tokenize_empty_text() {
    assert!(TOKENIZER.tokenize("").is_empty());
}

#[quickcheck]
fn can_classify_anything(text: String) -> bool {
    let tokens = TOKENIZER.tokenize(&text);
    let classification = Classifier::default().classify(&tokens);

    classification.checks().len() <= tokens.len()
}

#[quickcheck]
fn bundled_sentiment_is_in_range(text: String) -> bool {
    let score = en::sentiment().polarity(&text);

    (-1. ..=1.).contains(&score)
}

#[test]
fn literal_issues_are_fixed_and_saved() {
    let (report, wiki, console) = run("He go to  the  store .", vec![""], false);

    assert_eq!(report.text, "He go to  the  store.");
    assert_eq!(report.literal_fixes, vec![(" .".to_string(), 1)]);
    assert!(report.corrections.is_empty());
    assert!(report.saved);

    let saved = wiki.saved.borrow();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0.text, "He go to  the  store.");
    assert_eq!(saved[0].0.base_timestamp.as_deref(), Some("2021-02-01T10:00:00Z"));
    assert_eq!(saved[0].1, "Checking spelling");

    assert_eq!(
        console.transcript(),
        &[
            "AVERAGE SENTIMENT FOR ARTICLE: \t0.0000",
            "----------------------------------------------------",
            "? Press any key to continue: ",
        ]
    );
    assert_eq!(
        console.opened(),
        &["https://en.wikipedia.org/wiki/Test_article"]
    );
}

#[test]
fn accepted_correction_replaces_every_occurrence() {
    let (report, wiki, console) = run(
        "I saw teh cat. The cat saw teh dog.",
        vec!["", "yes"],
        false,
    );

    assert_eq!(report.corrections, vec![("teh".to_string(), "the".to_string())]);
    assert_eq!(report.text, "I saw the cat. The cat saw the dog.");
    assert!(report.saved);
    assert_eq!(wiki.saved.borrow()[0].0.text, report.text);
    assert!(console.transcript().contains(&"teh TO the".to_string()));
    assert_eq!(console.remaining(), 0);
}

#[test]
fn dry_run_does_not_save() {
    let (report, wiki, console) = run("I saw teh cat.", vec!["", "y"], true);

    assert_eq!(report.text, "I saw the cat.");
    assert!(!report.saved);
    assert!(wiki.saved.borrow().is_empty());
    assert_eq!(
        console.transcript().last().map(|x| x.as_str()),
        Some("would replace teh with the")
    );
}

#[test]
fn skipped_correction_leaves_article_unchanged() {
    let (report, wiki, _) = run("I saw teh cat.", vec!["", "skip"], false);

    assert!(report.corrections.is_empty());
    assert_eq!(report.text, "I saw teh cat.");
    assert!(!report.saved);
    assert!(wiki.saved.borrow().is_empty());
}

#[test]
fn flagged_word_is_reported_and_corrected_by_hand() {
    let (report, _, console) = run("He walked quikly home.", vec!["", "n", "i", "quickly"], false);

    assert!(report.advisories.contains(&Advisory::Flagged {
        word: "quikly".into(),
        pos: "RB".into()
    }));
    assert_eq!(
        report.corrections,
        vec![("quikly".to_string(), "quickly".to_string())]
    );
    assert_eq!(report.text, "He walked quickly home.");

    // the advisory is shown before the spellchecker asks
    let transcript = console.transcript();
    let advisory = transcript.iter().position(|x| x == "Bad: quikly").unwrap();
    let suggestion = transcript
        .iter()
        .position(|x| x.starts_with("quikly TO "))
        .unwrap();
    assert!(advisory < suggestion);
    assert_eq!(console.questions().last(), Some("Input suggestion: "));
}

#[test]
fn quoted_words_are_not_checked() {
    let (report, wiki, console) = run("He visited the ''Caffe Nerro'' store.", vec![""], false);

    assert_eq!(report.advisories, vec![Advisory::Italics]);
    assert!(console.transcript().contains(&"italics".to_string()));
    assert_eq!(console.questions().collect::<Vec<_>>(), vec![PAUSE]);
    assert!(!report.saved);
    assert!(wiki.saved.borrow().is_empty());
}

#[test]
fn word_without_better_spelling_is_not_prompted() {
    let (report, _, console) = run("The zyxwv is old.", vec![""], false);

    assert!(report.corrections.is_empty());
    assert_eq!(console.questions().collect::<Vec<_>>(), vec![PAUSE]);
}

#[test]
fn biased_article_is_reported() {
    let (report, _, console) = run("This was a terrible and horrible disaster.", vec![""], false);

    assert!(report.sentiment.average().unwrap() < -0.05);
    assert!(console
        .transcript()
        .iter()
        .any(|x| x.starts_with("possibly biased")));
}

#[test]
fn missing_article_is_an_error() {
    let wiki = MemoryWiki::default();
    let mut console = Scripted::new(Vec::<String>::new());

    let result = PIPELINE.run(
        &wiki,
        &mut console,
        &MemoryWiki::article_ref("Nothing here"),
        false,
    );

    assert!(matches!(result, Err(Error::MissingArticle(_))));
    assert!(console.transcript().is_empty());
}

#[test]
fn closed_input_aborts_the_run() {
    let wiki = MemoryWiki::with_article("Test article", "I saw teh cat.");
    let mut console = Scripted::new(vec![""]);

    let result = PIPELINE.run(
        &wiki,
        &mut console,
        &MemoryWiki::article_ref("Test article"),
        false,
    );

    assert!(matches!(result, Err(Error::Io(_))));
    assert!(wiki.saved.borrow().is_empty());
}

#[test]
fn resolved_urls_give_titles() {
    let wiki = MemoryWiki::default();
    let article = wiki
        .resolve("https://en.wikipedia.org/wiki/Caff%C3%A8_latte")
        .unwrap();

    assert_eq!(article.title, "Caffè latte");
}

#[test]
fn quiet_config_does_not_pause_or_open() {
    let mut config = Config::default();
    config.open_browser = false;
    config.pause_after_sentiment = false;
    let pipeline = Pipeline::new(config).unwrap();

    let wiki = MemoryWiki::with_article("Test article", "He go to  the  store .");
    let mut console = Scripted::new(Vec::<String>::new());
    let report = pipeline
        .run(
            &wiki,
            &mut console,
            &MemoryWiki::article_ref("Test article"),
            false,
        )
        .unwrap();

    assert!(report.saved);
    assert!(console.opened().is_empty());
    assert_eq!(console.questions().count(), 0);
}

/// A wiki which serves articles but rejects every edit.
struct ReadOnlyWiki(MemoryWiki);

impl Wiki for ReadOnlyWiki {
    fn resolve(&self, entry_url: &str) -> Result<ArticleRef, Error> {
        self.0.resolve(entry_url)
    }

    fn fetch(&self, article: &ArticleRef) -> Result<Article, Error> {
        self.0.fetch(article)
    }

    fn save(&self, article: &Article, _summary: &str) -> Result<(), Error> {
        Err(Error::Save {
            title: article.title.clone(),
            reason: "protectedpage".into(),
        })
    }
}

#[test]
fn rejected_save_is_an_error() {
    let wiki = ReadOnlyWiki(MemoryWiki::with_article("Test article", "He go to the store ."));
    let mut console = Scripted::new(vec![""]);

    let result = PIPELINE.run(
        &wiki,
        &mut console,
        &MemoryWiki::article_ref("Test article"),
        false,
    );

    match result {
        Err(Error::Save { title, reason }) => {
            assert_eq!(title, "Test article");
            assert_eq!(reason, "protectedpage");
        }
        x => panic!("expected a save error, got {:?}", x),
    }
    assert!(wiki.0.saved.borrow().is_empty());
}
