use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::field::InputType;

/// Reasons an edit is refused by a typed text input.
///
/// Messages are shown next to the field that refused the edit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidityError {
    #[error("Please enter a number.")]
    Number,
    #[error("Please enter an email address.")]
    Email,
    #[error("Please enter a phone number.")]
    Tel,
    #[error("Please enter a valid time.")]
    Time,
    #[error("Please enter a URL.")]
    Url,
}

// Input is checked on every keystroke, so the patterns accept any prefix
// of a well-formed value, not just complete values.
// An exponent needs at least one mantissa digit before it.
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(\d*(\.\d*)?|(\d+(\.\d*)?|\.\d+)[eE][-+]?\d*)$")
        .expect("valid hardcoded regex")
});

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]*(@[^\s@]*)?$").expect("valid hardcoded regex"));

static TEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+\-(). ]*$").expect("valid hardcoded regex"));

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01]?\d?|2[0-3]?)(:([0-5]?\d?)(:([0-5]?\d?))?)?$").expect("valid hardcoded regex")
});

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S*$").expect("valid hardcoded regex"));

/// Checks a candidate text value against its input type.
pub fn check_validity(input: InputType, value: &str) -> Result<(), ValidityError> {
    let (re, err) = match input {
        InputType::Text => return Ok(()),
        InputType::Number => (&NUMBER_RE, ValidityError::Number),
        InputType::Email => (&EMAIL_RE, ValidityError::Email),
        InputType::Tel => (&TEL_RE, ValidityError::Tel),
        InputType::Time => (&TIME_RE, ValidityError::Time),
        InputType::Url => (&URL_RE, ValidityError::Url),
    };
    if re.is_match(value) { Ok(()) } else { Err(err) }
}
