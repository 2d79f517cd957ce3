use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::utils::uuid::{is_short_form, is_standard_form};

/// Canonical profile identifier.
///
/// The public API addresses profiles in the hyphenated form while the auth
/// store and the identity provider use the 32 character short form. Both parse
/// to the same value, so every lookup keyed on a `ProfileId` agrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfileId(Uuid);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("expected a 36 character hyphenated or 32 character short UUID")]
pub struct InvalidProfileId;

impl ProfileId {
    pub fn parse(raw: &str) -> Result<Self, InvalidProfileId> {
        if !(is_standard_form(raw) || is_short_form(raw)) {
            return Err(InvalidProfileId);
        }
        Uuid::parse_str(raw).map(Self).map_err(|_| InvalidProfileId)
    }

    /// Store key: 32 lowercase hex characters.
    pub fn short(&self) -> String {
        self.0.simple().to_string()
    }

    /// API form: lowercase, hyphenated.
    pub fn standard(&self) -> String {
        self.0.hyphenated().to_string()
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.standard())
    }
}

impl FromStr for ProfileId {
    type Err = InvalidProfileId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ProfileId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.standard())
    }
}

impl<'de> Deserialize<'de> for ProfileId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
