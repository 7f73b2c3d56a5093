//! Passport Module
//!
//! Structured passport data and the heuristics that recover it from
//! recognized text.
//!
//! The parser is a pure function: any string in, a complete eleven-field
//! [`PassportRecord`] out. Unmatched fields are empty strings.

mod parser;
mod record;

pub use parser::{
    date_of_birth, file_number, given_name, issue_and_expiry, nationality, normalize,
    parse_passport_text, passport_number, place_of_birth, sex, surname,
};
pub use record::PassportRecord;
