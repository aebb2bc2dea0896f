use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;
use serde_json::Value;

/// A single contact form submission.
///
/// Values are kept exactly as submitted. Trimming only happens while checking
/// that a field is not blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: ContactSubmissionName,
    pub email: ContactSubmissionEmail,
    pub message: ContactSubmissionMessage,
}

impl ContactSubmission {
    /// Narrow an untyped JSON value into a [`ContactSubmission`].
    ///
    /// Returns `None` unless `value` is an object whose `name`, `email` and
    /// `message` properties are all strings that are not blank, with `email`
    /// matching [`CONTACT_EMAIL_REGEX`]. Additional properties are ignored.
    pub fn validate(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let field = |key: &str| object.get(key)?.as_str().map(str::to_owned);

        let name = field("name")?;
        let email = field("email")?;
        let message = field("message")?;

        Some(Self {
            name: name.try_into().ok()?,
            email: email.try_into().ok()?,
            message: message.try_into().ok()?,
        })
    }
}

#[nutype(
    validate(predicate = |name: &str| !is_blank(name)),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactSubmissionName(String);

#[nutype(
    validate(regex = CONTACT_EMAIL_REGEX),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactSubmissionEmail(String);

#[nutype(
    validate(predicate = |message: &str| !is_blank(message)),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactSubmissionMessage(String);

/// `local@domain.tld`, where no part contains whitespace or a second `@`.
///
/// The byte order mark (U+FEFF) counts as whitespace, like it does for
/// browsers.
pub static CONTACT_EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s\x{FEFF}@]+@[^\s\x{FEFF}@]+\.[^\s\x{FEFF}@]+$").unwrap()
});

fn is_blank(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_whitespace() || c == BYTE_ORDER_MARK)
}

const BYTE_ORDER_MARK: char = '\u{FEFF}';
