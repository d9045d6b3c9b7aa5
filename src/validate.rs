//! Per-row record validation.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::compose::Template;
use crate::roster::RecipientRecord;

// Local part of alphanumerics plus ._%+-, dot-separated domain labels, and
// an alphabetic top-level label of at least two characters. Syntax only, no
// deliverability check.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email pattern")
});

/// Reasons a row is skipped before any file or network activity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("missing value for required field {0}")]
    MissingField(&'static str),
}

/// Check one record against the active template variant.
///
/// Pure function of the record. Column presence is the loader's job; this
/// checks the per-row invariants: email syntax and non-empty identifiers.
pub fn validate(record: &RecipientRecord, template: Template) -> Result<(), ValidationError> {
    if !EMAIL_RE.is_match(&record.email) {
        return Err(ValidationError::InvalidEmail(record.email.clone()));
    }
    if record.full_name.is_empty() {
        return Err(ValidationError::MissingField("full_name"));
    }
    if record.cert_no.is_empty() {
        return Err(ValidationError::MissingField("cert_no"));
    }
    if template == Template::Course && record.roll_no.as_deref().unwrap_or("").is_empty() {
        return Err(ValidationError::MissingField("roll_no"));
    }
    Ok(())
}
