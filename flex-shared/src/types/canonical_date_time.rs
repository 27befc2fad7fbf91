//! Serde adapter for date-times stored in the canonical document format.
//!
//! Documents carry date-times as `YYYY-MM-DD HH:MM:SS`, which chrono's own
//! serde support does not accept. Entities that hydrate through serde tag
//! their date-time fields with this module:
//!
//! ```
//! use chrono::NaiveDateTime;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Article {
//!     #[serde(with = "flex_shared::canonical_date_time")]
//!     created_at: NaiveDateTime,
//!     #[serde(default, with = "flex_shared::canonical_date_time::option")]
//!     published_at: Option<NaiveDateTime>,
//! }
//! ```

use chrono::NaiveDateTime;
use serde::{de, Deserialize, Deserializer, Serializer};

use super::field_value::CANONICAL_DATE_TIME_FORMAT;

pub fn serialize<S>(at: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&at.format(CANONICAL_DATE_TIME_FORMAT))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(de::Error::custom)
}

fn parse(raw: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(raw, CANONICAL_DATE_TIME_FORMAT)
        .map_err(|e| format!("invalid date-time '{}': {}", raw, e))
}

/// The same format for optional fields; `null` maps to `None`.
pub mod option {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::CANONICAL_DATE_TIME_FORMAT;

    pub fn serialize<S>(at: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match at {
            Some(at) => serializer.collect_str(&at.format(CANONICAL_DATE_TIME_FORMAT)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => super::parse(&raw).map(Some).map_err(de::Error::custom),
            None => Ok(None),
        }
    }
}
