//! Opaque identifiers assigned by the active store.
//!
//! The relational backend hands out sequential integers while the document
//! backend hands out 24-character hexadecimal object ids. [`RecordId`] keeps
//! both as text so the domain never depends on either shape. Clients may send
//! an id back either as a JSON string or as a JSON integer.

use serde::{Deserialize, Serialize};

/// Validation errors raised by [`RecordId::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RecordIdValidationError {
    #[error("record id must not be empty")]
    Empty,
    #[error("record id must not contain whitespace")]
    ContainsWhitespace,
}

/// Store-assigned identifier of an account or host.
///
/// # Examples
/// ```
/// use hostwatch::domain::RecordId;
///
/// let from_int = RecordId::from(42_i64);
/// let from_text = RecordId::new("42").expect("valid id");
/// assert_eq!(from_int, from_text);
/// assert_eq!(from_int.as_i64(), Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RecordIdRepr", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Validate and wrap a textual identifier.
    ///
    /// Integer text is stored in canonical form, so `"+01"` and `"1"` name
    /// the same row.
    pub fn new(value: impl Into<String>) -> Result<Self, RecordIdValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(RecordIdValidationError::Empty);
        }
        if value.chars().any(char::is_whitespace) {
            return Err(RecordIdValidationError::ContainsWhitespace);
        }
        match value.parse::<i64>() {
            Ok(row) => Ok(Self::from(row)),
            Err(_) => Ok(Self(value)),
        }
    }

    /// Interpret the identifier as a relational row id.
    ///
    /// Returns `None` for ids minted by a store that does not use integers.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<RecordId> for String {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordIdRepr {
    Integer(i64),
    Text(String),
}

impl TryFrom<RecordIdRepr> for RecordId {
    type Error = RecordIdValidationError;

    fn try_from(value: RecordIdRepr) -> Result<Self, Self::Error> {
        match value {
            RecordIdRepr::Integer(id) => Ok(Self::from(id)),
            RecordIdRepr::Text(text) => Self::new(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(json!(7), "7")]
    #[case(json!("7"), "7")]
    #[case(json!("65f1c0ffee0123456789abcd"), "65f1c0ffee0123456789abcd")]
    fn accepts_integers_and_strings(#[case] input: serde_json::Value, #[case] expected: &str) {
        let id: RecordId = serde_json::from_value(input).expect("valid id");
        assert_eq!(id.as_ref(), expected);
    }

    #[rstest]
    #[case(json!(""))]
    #[case(json!("1 2"))]
    #[case(json!(1.5))]
    #[case(json!(null))]
    fn rejects_unusable_ids(#[case] input: serde_json::Value) {
        assert!(serde_json::from_value::<RecordId>(input).is_err());
    }

    #[rstest]
    fn serialises_as_a_string() {
        let id = RecordId::from(12_i64);
        assert_eq!(serde_json::to_value(&id).expect("serialise"), json!("12"));
    }

    #[rstest]
    #[case("+01")]
    #[case("001")]
    #[case("1")]
    fn integer_text_is_canonical(#[case] raw: &str) {
        let id = RecordId::new(raw).expect("valid id");
        assert_eq!(id, RecordId::from(1_i64));
        assert_eq!(id.as_ref(), "1");
    }

    #[rstest]
    fn object_ids_are_not_row_ids() {
        let id = RecordId::new("65f1c0ffee0123456789abcd").expect("valid id");
        assert_eq!(id.as_i64(), None);
    }
}
