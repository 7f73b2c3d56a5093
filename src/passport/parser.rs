//! Passport field extraction
//!
//! Recognized text has unreliable line segmentation, while the labels printed
//! on a passport are always upper case. The text is therefore flattened onto a
//! single upper-case line first, and every field rule below runs against that
//! normalized form independently of the others.

use std::sync::LazyLock;

use regex::Regex;

use super::record::PassportRecord;

// ============================================================================
// Patterns
// ============================================================================

static MRZ_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"P<IND([A-Z0-9<]+)").expect("valid MRZ pattern"));

static MRZ_SURNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"P<IND([A-Z]+)<<").expect("valid surname pattern"));

static MRZ_GIVEN_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<<([A-Z<]+)\s").expect("valid given name pattern"));

static DATE_FULL_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}/\d{2}/\d{4}").expect("valid date pattern"));

static DATE_SHORT_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}/\d{2}/\d{2}").expect("valid date pattern"));

static FILE_NUMBER_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"FILE NUMBER[:\s]*([A-Z0-9]+)").expect("valid file number pattern"));

static FILE_NUMBER_BEFORE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z0-9]{6,})\s+\d{2}/\d{2}/\d{4}").expect("valid file number pattern")
});

static SEX_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(M|F)\b").expect("valid sex pattern"));

static PLACE_OF_BIRTH_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PLACE OF BIRTH[:\s]*([A-Z\s]+)").expect("valid place pattern"));

/// MRZ filler character
const FILLER: char = '<';

/// Passport numbers are taken from the first characters after `P<IND`
const PASSPORT_NUMBER_LEN: usize = 8;

// ============================================================================
// Parser
// ============================================================================

/// Flatten line breaks into spaces and upper-case the whole text.
pub fn normalize(raw: &str) -> String {
    raw.replace(['\n', '\r'], " ").to_uppercase()
}

/// Parse aggregated recognized text into a [`PassportRecord`].
///
/// Never fails: a rule that does not match leaves its field empty.
pub fn parse_passport_text(raw: &str) -> PassportRecord {
    let text = normalize(raw);

    let (date_of_issue, date_of_expiry) = issue_and_expiry(&text);
    let place = place_of_birth(&text);

    PassportRecord {
        passport_number: passport_number(&text),
        surname: surname(&text),
        given_name: given_name(&text),
        nationality: nationality(&text),
        dob: date_of_birth(&text),
        sex: sex(&text),
        date_of_issue,
        date_of_expiry,
        place_of_issue: place.clone(),
        place_of_birth: place,
        file_number: file_number(&text),
    }
}

// ============================================================================
// Field rules
//
// Each rule expects text that has already gone through `normalize`.
// ============================================================================

/// First eight non-filler characters following the `P<IND` MRZ prefix.
pub fn passport_number(text: &str) -> String {
    MRZ_TAIL
        .captures(text)
        .map(|caps| {
            caps[1]
                .chars()
                .filter(|c| *c != FILLER)
                .take(PASSPORT_NUMBER_LEN)
                .collect()
        })
        .unwrap_or_default()
}

/// Letters between `P<IND` and the `<<` delimiter.
pub fn surname(text: &str) -> String {
    first_capture(&MRZ_SURNAME, text)
}

/// Run after the first `<<` delimiter, fillers turned into spaces.
pub fn given_name(text: &str) -> String {
    MRZ_GIVEN_NAME
        .captures(text)
        .map(|caps| caps[1].replace(FILLER, " ").trim().to_string())
        .unwrap_or_default()
}

/// `INDIAN` whenever the text mentions the Indian country code anywhere.
pub fn nationality(text: &str) -> String {
    if text.contains("INDIAN") || text.contains("IND") {
        "INDIAN".to_string()
    } else {
        String::new()
    }
}

/// First `DD/MM/YYYY` date, falling back to the first `DD/MM/YY` date.
pub fn date_of_birth(text: &str) -> String {
    DATE_FULL_YEAR
        .find(text)
        .or_else(|| DATE_SHORT_YEAR.find(text))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Issue and expiry dates, by position among all `DD/MM/YYYY` dates.
///
/// With two or more dates the last two are issue and expiry. A single date is
/// taken as the issue date. The date of birth is not excluded from the set.
pub fn issue_and_expiry(text: &str) -> (String, String) {
    let dates: Vec<&str> = DATE_FULL_YEAR.find_iter(text).map(|m| m.as_str()).collect();

    match dates.as_slice() {
        [] => (String::new(), String::new()),
        [only] => (only.to_string(), String::new()),
        [.., issue, expiry] => (issue.to_string(), expiry.to_string()),
    }
}

/// Labelled file number, or an alphanumeric run directly preceding a date.
pub fn file_number(text: &str) -> String {
    FILE_NUMBER_LABEL
        .captures(text)
        .or_else(|| FILE_NUMBER_BEFORE_DATE.captures(text))
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

/// First standalone `M` or `F` token.
pub fn sex(text: &str) -> String {
    first_capture(&SEX_TOKEN, text)
}

/// Labelled place of birth, or `DELHI` when there is no label but the city
/// appears anywhere.
///
/// A matched label always wins, even when its trimmed value is empty. The
/// same value is reported as place of issue.
pub fn place_of_birth(text: &str) -> String {
    match PLACE_OF_BIRTH_LABEL.captures(text) {
        Some(caps) => caps[1].trim().to_string(),
        None if text.contains("DELHI") => "DELHI".to_string(),
        None => String::new(),
    }
}

fn first_capture(pattern: &Regex, text: &str) -> String {
    pattern
        .captures(text)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}
