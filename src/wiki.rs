//! Reading and writing articles, implemented for the MediaWiki Action API.

use log::{debug, info};
use percent_encoding::percent_decode_str;
use reqwest::blocking::Client;
use serde::{de::DeserializeOwned, Deserialize};
use url::Url;

use crate::{
    types::{Article, ArticleRef},
    Error,
};

/// A source and sink of articles.
pub trait Wiki {
    /// Follows the redirects of `entry_url` and identifies the article it ends up at.
    fn resolve(&self, entry_url: &str) -> Result<ArticleRef, Error>;

    /// Gets the current text of an article.
    fn fetch(&self, article: &ArticleRef) -> Result<Article, Error>;

    /// Saves the text of an article with an edit summary.
    fn save(&self, article: &Article, summary: &str) -> Result<(), Error>;
}

/// Extracts the article title from an article URL, either from a `title` query parameter or
/// from a `/wiki/<Title>` path. Underscores are read as spaces.
pub fn title_from_url(url: &Url) -> Result<String, Error> {
    let title = if let Some((_, title)) = url.query_pairs().find(|(key, _)| key == "title") {
        title.into_owned()
    } else {
        let path = url.path();
        let encoded = path
            .find("/wiki/")
            .map(|i| &path[i + "/wiki/".len()..])
            .ok_or_else(|| Error::Title(url.to_string()))?;

        percent_decode_str(encoded)
            .decode_utf8()
            .map_err(|_| Error::Title(url.to_string()))?
            .into_owned()
    };

    let title = title.replace('_', " ").trim().to_owned();
    if title.is_empty() {
        return Err(Error::Title(url.to_string()));
    }

    Ok(title)
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    info: String,
}

impl From<ApiError> for Error {
    fn from(error: ApiError) -> Self {
        Error::Api {
            code: error.code,
            info: error.info,
        }
    }
}

/// A response which may carry an `error` object instead of a result.
trait ApiResponse: DeserializeOwned {
    fn take_error(&mut self) -> Option<ApiError>;
}

macro_rules! api_response {
    ($name:ident { $($field:ident: $ty:ty),* $(,)? }) => {
        #[derive(Debug, Deserialize)]
        struct $name {
            error: Option<ApiError>,
            $($field: $ty),*
        }

        impl ApiResponse for $name {
            fn take_error(&mut self) -> Option<ApiError> {
                self.error.take()
            }
        }
    };
}

api_response!(QueryResponse { query: Option<Query> });
api_response!(LoginResponse { login: Option<LoginResult> });
api_response!(EditResponse { edit: Option<EditResult> });

#[derive(Debug, Deserialize)]
struct Query {
    #[serde(default)]
    pages: Vec<Page>,
    tokens: Option<Tokens>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    invalidreason: Option<String>,
    #[serde(default)]
    revisions: Vec<Revision>,
}

#[derive(Debug, Deserialize)]
struct Revision {
    timestamp: Option<String>,
    slots: Slots,
}

#[derive(Debug, Deserialize)]
struct Slots {
    main: Slot,
}

#[derive(Debug, Deserialize)]
struct Slot {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct Tokens {
    logintoken: Option<String>,
    csrftoken: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResult {
    result: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EditResult {
    result: String,
    #[serde(default)]
    nochange: bool,
    newrevid: Option<u64>,
}

fn into_result<T: ApiResponse>(mut response: T) -> Result<T, Error> {
    match response.take_error() {
        Some(error) => Err(error.into()),
        None => Ok(response),
    }
}

fn parse_article(article: &ArticleRef, response: QueryResponse) -> Result<Article, Error> {
    let page = into_result(response)?
        .query
        .and_then(|x| x.pages.into_iter().next())
        .ok_or_else(|| Error::MissingArticle(article.title.clone()))?;

    if page.invalid {
        return Err(Error::Title(format!(
            "{} ({})",
            page.title,
            page.invalidreason.unwrap_or_default()
        )));
    }
    if page.missing {
        return Err(Error::MissingArticle(page.title));
    }

    let revision = page
        .revisions
        .into_iter()
        .next()
        .ok_or_else(|| Error::MissingArticle(page.title.clone()))?;

    Ok(Article {
        title: page.title,
        url: article.url.clone(),
        text: revision.slots.main.content,
        base_timestamp: revision.timestamp,
    })
}

fn parse_token(response: QueryResponse, login: bool) -> Result<String, Error> {
    let tokens = into_result(response)?.query.and_then(|x| x.tokens);

    let token = if login {
        tokens.and_then(|x| x.logintoken)
    } else {
        tokens.and_then(|x| x.csrftoken)
    };

    token.ok_or_else(|| Error::Api {
        code: "notoken".into(),
        info: "the response did not contain a token".into(),
    })
}

fn parse_edit(title: &str, response: EditResponse) -> Result<(), Error> {
    let save_error = |reason: String| Error::Save {
        title: title.to_owned(),
        reason,
    };

    let response = into_result(response).map_err(|e| match e {
        Error::Api { code, info } => save_error(format!("{}: {}", code, info)),
        e => e,
    })?;

    let edit = response
        .edit
        .ok_or_else(|| save_error("the response did not contain an edit result".into()))?;

    if edit.result != "Success" {
        return Err(save_error(edit.result));
    }

    if edit.nochange {
        info!("{:?} was already up to date", title);
    } else {
        info!("saved {:?} as revision {:?}", title, edit.newrevid);
    }

    Ok(())
}

/// A client for the MediaWiki Action API. Keeps cookies, so a login persists for the lifetime of the client.
#[derive(Debug, Clone)]
pub struct WikiClient {
    client: Client,
    api_url: Url,
}

impl WikiClient {
    pub fn new(api_url: &str, user_agent: &str) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .cookie_store(true)
            .build()?;

        Ok(WikiClient {
            client,
            api_url: Url::parse(api_url)?,
        })
    }

    /// The reference of an article on this wiki, without checking that it exists.
    pub fn article_ref(&self, title: &str) -> Result<ArticleRef, Error> {
        let mut url = self.api_url.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|_| Error::Title(self.api_url.to_string()))?
            .clear()
            .push("wiki")
            .push(&title.replace(' ', "_"));

        Ok(ArticleRef {
            title: title.to_owned(),
            url,
        })
    }

    fn get<T: ApiResponse>(&self, params: &[(&str, &str)]) -> Result<T, Error> {
        debug!("GET {} {:?}", self.api_url, params);

        Ok(self
            .client
            .get(self.api_url.clone())
            .query(&[("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()?
            .error_for_status()?
            .json()?)
    }

    fn post<T: ApiResponse>(&self, params: &[(&str, &str)]) -> Result<T, Error> {
        debug!(
            "POST {} action={:?}",
            self.api_url,
            params.iter().find(|(k, _)| *k == "action").map(|(_, v)| v)
        );

        let mut form = vec![("format", "json"), ("formatversion", "2")];
        form.extend_from_slice(params);

        Ok(self
            .client
            .post(self.api_url.clone())
            .form(&form)
            .send()?
            .error_for_status()?
            .json()?)
    }

    fn token(&self, kind: &str) -> Result<String, Error> {
        parse_token(
            self.get(&[("action", "query"), ("meta", "tokens"), ("type", kind)])?,
            kind == "login",
        )
    }

    /// Logs in with a bot password.
    pub fn login(&self, username: &str, password: &str) -> Result<(), Error> {
        let token = self.token("login")?;

        let response: LoginResponse = self.post(&[
            ("action", "login"),
            ("lgname", username),
            ("lgpassword", password),
            ("lgtoken", token.as_str()),
        ])?;

        let login = into_result(response)?
            .login
            .ok_or_else(|| Error::Login("the response did not contain a login result".into()))?;

        if login.result != "Success" {
            return Err(Error::Login(login.reason.unwrap_or(login.result)));
        }

        info!("logged in as {}", username);
        Ok(())
    }
}

impl Wiki for WikiClient {
    fn resolve(&self, entry_url: &str) -> Result<ArticleRef, Error> {
        let response = self.client.get(entry_url).send()?.error_for_status()?;
        let url = response.url().clone();
        debug!("{} resolved to {}", entry_url, url);

        Ok(ArticleRef {
            title: title_from_url(&url)?,
            url,
        })
    }

    fn fetch(&self, article: &ArticleRef) -> Result<Article, Error> {
        let response = self.get(&[
            ("action", "query"),
            ("prop", "revisions"),
            ("rvprop", "content|timestamp"),
            ("rvslots", "main"),
            ("redirects", "1"),
            ("titles", article.title.as_str()),
        ])?;

        let article = parse_article(article, response)?;
        info!(
            "fetched {:?} ({} bytes, revision of {})",
            article.title,
            article.text.len(),
            article.base_timestamp.as_deref().unwrap_or("unknown time")
        );

        Ok(article)
    }

    fn save(&self, article: &Article, summary: &str) -> Result<(), Error> {
        let token = self.token("csrf")?;

        let mut params = vec![
            ("action", "edit"),
            ("title", article.title.as_str()),
            ("text", article.text.as_str()),
            ("summary", summary),
            ("nocreate", "1"),
            ("token", token.as_str()),
        ];
        if let Some(timestamp) = &article.base_timestamp {
            params.push(("basetimestamp", timestamp.as_str()));
        }

        let response = self.post(&params).map_err(|e| Error::Save {
            title: article.title.clone(),
            reason: e.to_string(),
        })?;

        parse_edit(&article.title, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article_ref() -> ArticleRef {
        ArticleRef {
            title: "Caffè latte".into(),
            url: Url::parse("https://en.wikipedia.org/wiki/Caff%C3%A8_latte").unwrap(),
        }
    }

    fn title(url: &str) -> Result<String, Error> {
        title_from_url(&Url::parse(url).unwrap())
    }

    #[test]
    fn title_from_path() {
        assert_eq!(
            title("https://en.wikipedia.org/wiki/Caff%C3%A8_latte").unwrap(),
            "Caffè latte"
        );
        assert_eq!(
            title("https://en.wikipedia.org/wiki/AC/DC_(band)").unwrap(),
            "AC/DC (band)"
        );
        assert_eq!(title("https://en.wikipedia.org/wiki/C%2B%2B").unwrap(), "C++");
    }

    #[test]
    fn title_from_query() {
        assert_eq!(
            title("https://en.wikipedia.org/w/index.php?title=Rome_(city)&action=edit").unwrap(),
            "Rome (city)"
        );
    }

    #[test]
    fn title_needs_article_url() {
        assert!(matches!(
            title("https://randomincategory.toolforge.org/"),
            Err(Error::Title(_))
        ));
        assert!(matches!(
            title("https://en.wikipedia.org/wiki/"),
            Err(Error::Title(_))
        ));
    }

    #[test]
    fn article_refs_point_at_the_wiki() {
        let client = WikiClient::new("https://en.wikipedia.org/w/api.php", "test").unwrap();
        let article = client.article_ref("Caffè latte").unwrap();

        assert_eq!(article.url.as_str(), "https://en.wikipedia.org/wiki/Caff%C3%A8_latte");
        assert_eq!(title_from_url(&article.url).unwrap(), article.title);
    }

    #[test]
    fn parses_article() {
        let response = serde_json::from_str(
            r#"{"batchcomplete": true, "query": {"pages": [{"pageid": 1, "ns": 0, "title": "Caffè latte",
                "revisions": [{"timestamp": "2021-02-01T10:00:00Z", "slots": {"main": {"contentmodel": "wikitext",
                "contentformat": "text/x-wiki", "content": "He go to  the  store ."}}}]}]}}"#,
        )
        .unwrap();
        let article = parse_article(&article_ref(), response).unwrap();

        assert_eq!(article.title, "Caffè latte");
        assert_eq!(article.text, "He go to  the  store .");
        assert_eq!(article.base_timestamp.as_deref(), Some("2021-02-01T10:00:00Z"));
        assert_eq!(article.url, article_ref().url);
    }

    #[test]
    fn missing_article_is_an_error() {
        let response = serde_json::from_str(
            r#"{"query": {"pages": [{"ns": 0, "title": "Caffè latte", "missing": true}]}}"#,
        )
        .unwrap();

        assert!(matches!(
            parse_article(&article_ref(), response),
            Err(Error::MissingArticle(_))
        ));
    }

    #[test]
    fn api_error_is_an_error() {
        let response = serde_json::from_str(
            r#"{"error": {"code": "readapidenied", "info": "You need read permission."}}"#,
        )
        .unwrap();

        match parse_article(&article_ref(), response) {
            Err(Error::Api { code, .. }) => assert_eq!(code, "readapidenied"),
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn parses_tokens() {
        let response = || {
            serde_json::from_str(r#"{"query": {"tokens": {"csrftoken": "abc+\\"}}}"#).unwrap()
        };

        assert_eq!(parse_token(response(), false).unwrap(), "abc+\\");
        assert!(parse_token(response(), true).is_err());
    }

    #[test]
    fn edit_conflict_is_a_save_error() {
        let response = serde_json::from_str(
            r#"{"error": {"code": "editconflict", "info": "Edit conflict."}}"#,
        )
        .unwrap();

        match parse_edit("Caffè latte", response) {
            Err(Error::Save { title, reason }) => {
                assert_eq!(title, "Caffè latte");
                assert!(reason.starts_with("editconflict"));
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn parses_edit_result() {
        let success = serde_json::from_str(
            r#"{"edit": {"result": "Success", "pageid": 1, "title": "Caffè latte", "newrevid": 42}}"#,
        )
        .unwrap();
        assert!(parse_edit("Caffè latte", success).is_ok());

        let failure = serde_json::from_str(r#"{"edit": {"result": "Failure"}}"#).unwrap();
        assert!(matches!(
            parse_edit("Caffè latte", failure),
            Err(Error::Save { .. })
        ));
    }
}
