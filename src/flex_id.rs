use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Provider match identifier.
///
/// Understat sends ids as numeric strings (`"26602"`) in some payloads and as bare
/// numbers in others. The id is opaque: strings are kept byte for byte and numbers
/// are held in their decimal form, so `26602` and `"26602"` name the same match
/// while `"007"` stays `"007"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchId(String);

impl MatchId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for MatchId {
    fn from(n: i64) -> Self {
        MatchId(n.to_string())
    }
}

impl From<&str> for MatchId {
    fn from(s: &str) -> Self {
        MatchId(s.to_string())
    }
}

impl From<String> for MatchId {
    fn from(s: String) -> Self {
        MatchId(s)
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for MatchId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MatchId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct MatchIdVisitor;

        impl<'de> Visitor<'de> for MatchIdVisitor {
            type Value = MatchId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a match id as number or string")
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(MatchId::from(v))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(MatchId(v.to_string()))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if v.trim().is_empty() {
                    return Err(E::custom("empty match id"));
                }
                Ok(MatchId::from(v))
            }
        }

        deserializer.deserialize_any(MatchIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_deserialize() {
        let id: MatchId = serde_json::from_str("26602").unwrap();
        assert_eq!(id, MatchId::from("26602"));
        assert_eq!(id.to_string(), "26602");
    }

    #[test]
    fn test_numeric_string_matches_number() {
        let id: MatchId = serde_json::from_str(r#""26602""#).unwrap();
        assert_eq!(id, MatchId::from(26602_i64));
    }

    #[test]
    fn test_string_ids_keep_exact_text() {
        for raw in ["007", "+5", " 12", "m-17"] {
            let id: MatchId = serde_json::from_value(serde_json::json!(raw)).unwrap();
            assert_eq!(id.as_str(), raw);
            assert_eq!(id.to_string(), raw);
            assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!(raw));
        }
        let padded: MatchId = serde_json::from_str(r#""007""#).unwrap();
        assert_ne!(padded, MatchId::from(7_i64));
    }

    #[test]
    fn test_null_rejected() {
        assert!(serde_json::from_str::<MatchId>("null").is_err());
        assert!(serde_json::from_str::<MatchId>(r#""""#).is_err());
    }
}
