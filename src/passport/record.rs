//! Passport record type

use serde::{Deserialize, Serialize};

/// Structured passport fields extracted from one recognized document.
///
/// Every field is always present in the serialized form. An empty string
/// means the field was not found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassportRecord {
    pub passport_number: String,
    pub surname: String,
    pub given_name: String,
    pub nationality: String,
    pub dob: String,
    pub sex: String,
    pub date_of_issue: String,
    pub date_of_expiry: String,
    pub place_of_birth: String,
    pub place_of_issue: String,
    pub file_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_all_eleven_keys() {
        let value = serde_json::to_value(PassportRecord::default()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 11);
        for key in [
            "passportNumber",
            "surname",
            "givenName",
            "nationality",
            "dob",
            "sex",
            "dateOfIssue",
            "dateOfExpiry",
            "placeOfBirth",
            "placeOfIssue",
            "fileNumber",
        ] {
            assert_eq!(object.get(key), Some(&serde_json::Value::String(String::new())), "{key}");
        }
    }
}
