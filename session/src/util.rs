use crate::error::{Result, SessionError};

/// Normalize a user-typed word: trim surrounding whitespace and lowercase.
///
/// Graph words are lowercase, so "Fox " and "fox" name the same node.
pub fn normalize_word(input: &str) -> Result<String> {
    let word = input.trim().to_lowercase();
    if word.is_empty() {
        return Err(SessionError::EmptyWord);
    }
    Ok(word)
}

/// Validate that a numeric setting lies in `min..=max`.
pub fn check_range<T>(value: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min || value > max {
        return Err(SessionError::Config(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )));
    }
    Ok(value)
}

/// Parse a boolean setting. Accepts true/false, on/off, yes/no, 1/0.
pub fn parse_bool(raw: &str, name: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => Err(SessionError::Config(format!(
            "{} must be a boolean, got '{}'",
            name, other
        ))),
    }
}
