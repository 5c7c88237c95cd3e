//! Input validation and normalization
//!
//! Identifiers are normalized before any storage read or write so that two
//! differently-cased inputs resolve to the same patron and the same
//! active-loan lookup key.

use once_cell::sync::Lazy;
use regex::Regex;

use super::DomainError;

static ISBN10_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{9}[\dXx]$").unwrap());
static ISBN13_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{13}$").unwrap());
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());
static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z ]*$").unwrap());

/// Check ISBN format: hyphens and spaces are ignored; 10 digits with an
/// optional trailing X/x check character, or 13 digits.
pub fn is_valid_isbn(isbn: &str) -> bool {
    let stripped: String = isbn.chars().filter(|c| *c != '-' && *c != ' ').collect();
    ISBN10_RE.is_match(&stripped) || ISBN13_RE.is_match(&stripped)
}

pub fn validate_isbn(isbn: &str) -> Result<(), DomainError> {
    if isbn.trim().is_empty() {
        return Err(DomainError::Validation("ISBN is required".to_string()));
    }
    if !is_valid_isbn(isbn) {
        return Err(DomainError::Validation("invalid ISBN format".to_string()));
    }
    Ok(())
}

/// Lower-case and trim an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate an already-normalized email address.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if !EMAIL_RE.is_match(email) {
        return Err(DomainError::Validation(
            "invalid email address".to_string(),
        ));
    }
    Ok(())
}

/// Trim a display name; comparisons elsewhere are case-insensitive.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_string()
}

pub fn validate_name(name: &str) -> Result<(), DomainError> {
    if !NAME_RE.is_match(name) {
        return Err(DomainError::Validation("invalid name".to_string()));
    }
    Ok(())
}
