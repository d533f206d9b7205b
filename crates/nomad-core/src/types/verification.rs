//! Remote verification result.

use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Decoded answer from the remote verification service.
///
/// The wire shape is `{"Result": true}`. Only a JSON object is accepted, and
/// `Result` must be a JSON boolean; arrays, bare scalars, strings, numbers
/// and `null` are rejected at decode time instead of being coerced into
/// success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    /// Whether the remote service accepted the credentials.
    #[serde(rename = "Result")]
    pub success: bool,
}

const RESULT_FIELD: &str = "Result";

impl<'de> Deserialize<'de> for VerificationResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(VerificationResultVisitor)
    }
}

struct VerificationResultVisitor;

impl<'de> Visitor<'de> for VerificationResultVisitor {
    type Value = VerificationResult;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with a boolean `Result` field")
    }

    // No visit_seq: a positional `[true]` must not decode.
    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut success = None;
        while let Some(key) = map.next_key::<String>()? {
            if key == RESULT_FIELD {
                if success.is_some() {
                    return Err(de::Error::duplicate_field(RESULT_FIELD));
                }
                success = Some(map.next_value::<bool>()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }

        success
            .map(|success| VerificationResult { success })
            .ok_or_else(|| de::Error::missing_field(RESULT_FIELD))
    }
}
