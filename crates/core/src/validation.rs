//! Input validation utilities.
//!
//! This module contains functions for validating free-text form inputs before they are
//! stored in a profile.

use crate::{AdvisorError, AdvisorResult};

const MAX_AGE: u32 = 130;
const BLOOD_TYPES: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

/// Parses an optional age. Blank input means "not given".
///
/// # Errors
///
/// Returns `AdvisorError::InvalidInput` if the value is not a whole number between 0 and 130.
pub fn validate_age(raw: &str) -> AdvisorResult<Option<u32>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<u32>() {
        Ok(age) if age <= MAX_AGE => Ok(Some(age)),
        _ => Err(AdvisorError::InvalidInput(format!(
            "age must be a whole number between 0 and {MAX_AGE}"
        ))),
    }
}

/// Normalises an ABO/Rh blood type (`ab+` → `AB+`). Blank input means "not given".
///
/// # Errors
///
/// Returns `AdvisorError::InvalidInput` for anything outside the eight ABO/Rh groups.
pub fn validate_blood_type(raw: &str) -> AdvisorResult<Option<String>> {
    let normalised: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();
    if normalised.is_empty() {
        return Ok(None);
    }
    if BLOOD_TYPES.contains(&normalised.as_str()) {
        Ok(Some(normalised))
    } else {
        Err(AdvisorError::InvalidInput(format!(
            "blood type must be one of {}",
            BLOOD_TYPES.join(", ")
        )))
    }
}

/// Checks that an emergency contact number only uses dialling characters.
///
/// Accepts digits, spaces, `+`, `-` and parentheses, and requires at least three digits.
/// Blank input means "not given".
pub fn validate_contact_number(raw: &str) -> AdvisorResult<Option<String>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let ok = raw
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'));
    let digits = raw.chars().filter(char::is_ascii_digit).count();

    if !ok || digits < 3 {
        return Err(AdvisorError::InvalidInput(
            "contact number may only contain digits, spaces, '+', '-' and parentheses".into(),
        ));
    }
    Ok(Some(raw.to_string()))
}
