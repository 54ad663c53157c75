use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

pub const MAX_TITLE_CHARS: usize = 100;
pub const MIN_DURATION_MINUTES: i64 = 1;
pub const MAX_DURATION_MINUTES: i64 = 1440;

static MARKUP_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

const ENTITIES: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&#39;"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title is {len} characters long once escaped (at most {max} allowed)", max = MAX_TITLE_CHARS)]
    TitleTooLong { len: usize },
    #[error("title must not contain markup tags")]
    MarkupNotAllowed,
    #[error("duration '{0}' is not a whole number of minutes")]
    NotANumber(String),
    #[error("duration must be positive (got {0})")]
    NonPositiveDuration(i64),
    #[error("duration {0} exceeds {max} minutes", max = MAX_DURATION_MINUTES)]
    DurationTooLarge(i64),
    #[error("daily limit must be between 1 and {max} minutes (got {0})", max = MAX_DURATION_MINUTES)]
    InvalidDailyLimit(i64),
}

/// Trims, rejects markup and escapes `raw`. The length limit applies to the
/// escaped text, so a validated title validates again to itself.
pub fn validate_title(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if MARKUP_TAG_RE.is_match(trimmed) {
        return Err(ValidationError::MarkupNotAllowed);
    }
    let sanitized = sanitize(trimmed);
    let len = sanitized.chars().count();
    if len > MAX_TITLE_CHARS {
        return Err(ValidationError::TitleTooLong { len });
    }
    Ok(sanitized)
}

pub fn validate_duration(raw: &str) -> Result<u32, ValidationError> {
    let trimmed = raw.trim();
    let minutes: i64 = trimmed
        .parse()
        .map_err(|_| ValidationError::NotANumber(trimmed.to_string()))?;
    check_duration(minutes)
}

pub fn check_duration(minutes: i64) -> Result<u32, ValidationError> {
    if minutes < MIN_DURATION_MINUTES {
        return Err(ValidationError::NonPositiveDuration(minutes));
    }
    if minutes > MAX_DURATION_MINUTES {
        return Err(ValidationError::DurationTooLarge(minutes));
    }
    Ok(minutes as u32)
}

pub fn validate_daily_limit(minutes: i64) -> Result<u32, ValidationError> {
    if !(1..=MAX_DURATION_MINUTES).contains(&minutes) {
        return Err(ValidationError::InvalidDailyLimit(minutes));
    }
    Ok(minutes as u32)
}

/// Entity-escapes markup characters. Existing entities are kept as they are,
/// so `sanitize(sanitize(s)) == sanitize(s)`.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (idx, ch) in text.char_indices() {
        match ch {
            '&' if ENTITIES.iter().any(|entity| text[idx..].starts_with(entity)) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_is_idempotent() {
        for raw in ["Tom & Jerry's \"notes\"", "a < b", "x > y && z", "&amp; already"] {
            let once = sanitize(raw);
            assert_eq!(sanitize(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn sanitize_escapes_bare_ampersand_only() {
        assert_eq!(sanitize("R&D &lt;"), "R&amp;D &lt;");
    }
}
