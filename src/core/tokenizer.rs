use std::collections::HashSet;

/// Words too common in job titles to carry any signal
pub const STOPWORDS: [&str; 7] = ["the", "and", "for", "with", "part", "time", "full"];

/// Tokens shorter than this are ignored ("a", "of", "in", ...)
const MIN_TOKEN_LEN: usize = 3;

/// Split free text into significant lowercase tokens
///
/// Lower-cases the text, strips everything that is not an ASCII letter,
/// digit or whitespace, splits on whitespace and drops short tokens and
/// stopwords. Tokens keep their order of appearance and duplicates are
/// retained.
///
/// Whitespace is the ECMAScript `\s` set: a byte-order mark separates words,
/// NEL does not.
pub fn tokenize(text: Option<&str>) -> Vec<String> {
    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => return vec![],
    };

    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|&c| c.is_ascii_lowercase() || c.is_ascii_digit() || is_js_whitespace(c))
        .collect();

    cleaned
        .split(is_js_whitespace)
        .filter(|w| w.len() >= MIN_TOKEN_LEN)
        .filter(|w| !STOPWORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// ECMAScript WhiteSpace and LineTerminator code points
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'
            | '\u{000A}'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{000D}'
            | '\u{0020}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Tokenize and de-duplicate
#[inline]
pub fn token_set(text: Option<&str>) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

/// Union of the token sets of several texts
pub fn token_union<'a, I>(texts: I) -> HashSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    texts
        .into_iter()
        .flat_map(|t| tokenize(Some(t)))
        .collect()
}
