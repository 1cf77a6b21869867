//! Tokenizer: raw text to lowercase alphabetic words.

/// Split `text` into lowercase ASCII-alphabetic tokens.
///
/// The whole text is lowercased first, then every maximal run of non-letter
/// characters is a separator. Separators are dropped, so the output never
/// contains empty strings, digits, punctuation or non-ASCII characters.
/// Characters whose lowercase form is an ASCII letter (the Kelvin sign
/// lowercases to `k`) count as letters.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tokenize line-by-line input into one continuous token stream.
///
/// Word pairs span line boundaries: the last word of one line is followed by
/// the first word of the next.
pub fn tokenize_lines<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tokens = Vec::new();
    for line in lines {
        tokens.extend(tokenize(line.as_ref()));
    }
    tokens
}
