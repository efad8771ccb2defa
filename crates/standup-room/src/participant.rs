//! Participant records and client-side name rules.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Minimum length of a display name, in characters.
pub const NAME_MIN_CHARS: usize = 1;
/// Maximum length of a display name, in characters.
pub const NAME_MAX_CHARS: usize = 30;

const PLACEHOLDER_SUFFIX_LEN: usize = 5;
const PLACEHOLDER_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Backend-assigned participant identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub i64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ParticipantId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ParticipantId)
    }
}

/// A row of the participants table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default)]
    pub has_talked: bool,
    #[serde(default)]
    pub has_issue: bool,
}

/// Fields sent when a participant joins.
#[derive(Debug, Clone, Serialize)]
pub struct NewParticipant {
    pub name: String,
}

/// Partial update of a participant; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParticipantPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_talked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_issue: Option<bool>,
}

impl ParticipantPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn has_talked(value: bool) -> Self {
        Self {
            has_talked: Some(value),
            ..Default::default()
        }
    }

    pub fn has_issue(value: bool) -> Self {
        Self {
            has_issue: Some(value),
            ..Default::default()
        }
    }
}

/// Field-level rejection of a display name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("Please enter a name")]
    Empty,
    #[error("Name must be less than 30 characters")]
    TooLong { chars: usize },
}

/// Check a display name against the 1..=30 character bounds.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    let chars = name.chars().count();
    if chars < NAME_MIN_CHARS {
        return Err(NameError::Empty);
    }
    if chars > NAME_MAX_CHARS {
        return Err(NameError::TooLong { chars });
    }
    Ok(())
}

/// Generate a join-time name such as `John Doe k3x9a`.
pub fn placeholder_name(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..PLACEHOLDER_SUFFIX_LEN)
        .map(|_| PLACEHOLDER_ALPHABET[rng.gen_range(0..PLACEHOLDER_ALPHABET.len())] as char)
        .collect();
    format!("{prefix} {suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_bounds() {
        assert_eq!(validate_name(""), Err(NameError::Empty));
        assert!(validate_name("A").is_ok());
        assert!(validate_name(&"x".repeat(30)).is_ok());
        assert_eq!(
            validate_name(&"x".repeat(31)),
            Err(NameError::TooLong { chars: 31 })
        );
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        let name = "é".repeat(30);
        assert!(name.len() > 30);
        assert!(validate_name(&name).is_ok());
    }

    #[test]
    fn name_error_messages() {
        assert_eq!(NameError::Empty.to_string(), "Please enter a name");
        assert_eq!(
            NameError::TooLong { chars: 31 }.to_string(),
            "Name must be less than 30 characters"
        );
    }

    #[test]
    fn placeholder_is_a_valid_name() {
        let name = placeholder_name("John Doe");
        assert!(name.starts_with("John Doe "));
        assert_eq!(name.chars().count(), "John Doe ".len() + 5);
        assert!(validate_name(&name).is_ok());
        assert!(name["John Doe ".len()..]
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn participant_ignores_unknown_columns() {
        let json = serde_json::json!({
            "id": 7,
            "name": "Ada",
            "has_talked": true,
            "has_issue": false,
            "created_at": "2024-01-01T09:00:00+00:00"
        });
        let p: Participant = serde_json::from_value(json).unwrap();
        assert_eq!(p.id, ParticipantId(7));
        assert!(p.has_talked);
    }

    #[test]
    fn patch_serializes_only_set_fields() {
        let json = serde_json::to_value(ParticipantPatch::has_issue(true)).unwrap();
        assert_eq!(json, serde_json::json!({ "has_issue": true }));
    }

    #[test]
    fn participant_id_parses_from_path_segment() {
        assert_eq!("42".parse::<ParticipantId>().unwrap(), ParticipantId(42));
        assert!("abc".parse::<ParticipantId>().is_err());
        assert_eq!(ParticipantId(42).to_string(), "42");
    }
}
