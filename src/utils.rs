// see https://stackoverflow.com/a/40296745
/// Split a text at the points where the given function is true. Keeps the separators.
pub fn split<F>(text: &str, split_func: F) -> Vec<&str>
where
    F: Fn(char) -> bool,
{
    let mut result = Vec::new();
    let mut last = 0;
    for (index, matched) in text.match_indices(split_func) {
        if last != index {
            result.push(&text[last..index]);
        }
        result.push(matched);
        last = index + matched.len();
    }
    if last < text.len() {
        result.push(&text[last..]);
    }

    result
}

// see https://stackoverflow.com/questions/38406793/why-is-capitalizing-the-first-letter-of-a-string-so-convoluted-in-rust
pub fn apply_to_first<F>(string: &str, func: F) -> String
where
    F: Fn(char) -> String,
{
    let mut c = string.chars();
    match c.next() {
        None => String::new(),
        Some(first) => func(first) + c.as_str(),
    }
}

pub fn is_title_case(string: &str) -> bool {
    let mut char_case = string.chars().map(|x| x.is_uppercase());

    char_case.next().unwrap_or(false) && !char_case.any(|x| x)
}

pub fn is_uppercase(string: &str) -> bool {
    !string.chars().any(|x| x.is_lowercase())
}

/// Gives `target` the casing pattern of `source` if `source` is title case or all uppercase.
pub fn restore_case(source: &str, target: &str) -> String {
    if source.chars().count() > 1 && is_uppercase(source) {
        target.to_uppercase()
    } else if is_title_case(source) {
        apply_to_first(target, |c| c.to_uppercase().collect())
    } else {
        target.to_owned()
    }
}

#[inline]
pub fn splitting_chars() -> &'static str {
    r##"«»'’`´‘],.:;!?/\()<=>„“”"+#…*[{}|"##
}

#[inline]
pub fn quote_chars() -> &'static str {
    r##"'`"“”„«»‘’"##
}

#[inline]
pub fn opening_brackets() -> &'static str {
    "([{<"
}
