use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a scheduled flight, e.g. `AI202`.
///
/// Flight codes are case-insensitive, so the value is normalised to upper
/// case on construction and on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FlightId(String);

impl FlightId {
    /// Creates a flight ID, trimming whitespace and upper-casing the code.
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_uppercase())
    }

    /// Returns the normalised flight code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FlightId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for FlightId {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<&str> for FlightId {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<FlightId> for String {
    fn from(id: FlightId) -> Self {
        id.0
    }
}

/// Opaque identifier of a seat hold.
///
/// Generated IDs are `hold_` followed by the 32 hex digits of a random v4
/// UUID, so every generated ID has the same width. Hold IDs are
/// case-insensitive and normalised to lower case, matching the form they
/// are generated in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct HoldId(String);

impl HoldId {
    /// Prefix carried by every generated hold ID.
    pub const PREFIX: &'static str = "hold_";

    /// Width of a generated hold ID in characters.
    pub const WIDTH: usize = Self::PREFIX.len() + 32;

    /// Creates a hold ID from client input, trimming whitespace and
    /// lower-casing it.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_lowercase())
    }

    /// Generates a fresh random hold ID.
    pub fn generate() -> Self {
        Self(format!("{}{}", Self::PREFIX, Uuid::new_v4().simple()))
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HoldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for HoldId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<&str> for HoldId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<HoldId> for String {
    fn from(id: HoldId) -> Self {
        id.0
    }
}
