//! Exact substring substitutions over article text.

use indexmap::IndexMap;

/// Replaces every occurrence of each key with its value. Keys are applied one after another in iteration order,
/// each over the result of the previous one. Keys absent from the text are no-ops.
pub fn replace_all<'a, I>(text: &str, replacements: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut text = text.to_owned();

    for (from, to) in replacements {
        if !from.is_empty() && text.contains(from) {
            text = text.replace(from, to);
        }
    }

    text
}

/// Fixed mapping of markup artifacts to their replacement, e. g. a stray space before punctuation.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralIssues(IndexMap<String, String>);

impl Default for LiteralIssues {
    fn default() -> Self {
        LiteralIssues(
            [(" .", "."), (" ,", ",")]
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl From<IndexMap<String, String>> for LiteralIssues {
    fn from(map: IndexMap<String, String>) -> Self {
        LiteralIssues(map)
    }
}

impl LiteralIssues {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Applies all issues to the text in a single pass. Occurrences created by a replacement are left
    /// as they are, so `"a  ."` becomes `"a ."`.
    pub fn apply(&self, text: &str) -> String {
        replace_all(text, self.iter())
    }

    /// Counts the occurrences of each key, in order. Used to report what the literal pass changes.
    pub fn count(&self, text: &str) -> Vec<(&str, usize)> {
        self.iter()
            .map(|(k, _)| (k, if k.is_empty() { 0 } else { text.matches(k).count() }))
            .filter(|(_, n)| *n > 0)
            .collect()
    }
}
