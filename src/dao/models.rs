use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::{Map, Value};
use time::{
    Duration, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};
use uuid::Uuid;

/// Field map carried by every document.
pub type Fields = Map<String, Value>;

/// ISO-8601 layout with millisecond precision and a literal `Z` suffix.
const ISO_MILLIS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");

/// Calendar-day layout used for dated records.
const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Server-stamped UTC instant, serialized as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp(OffsetDateTime);

impl Timestamp {
    /// Current wall-clock time truncated to milliseconds.
    pub fn now() -> Self {
        Self::from_datetime(OffsetDateTime::now_utc())
    }

    fn from_datetime(value: OffsetDateTime) -> Self {
        let millis = value.millisecond();
        // Stored precision is milliseconds; keep the in-memory value identical to what round-trips.
        let truncated = value
            .replace_nanosecond(u32::from(millis) * 1_000_000)
            .unwrap_or(value);
        Self(truncated)
    }

    /// Next stamp for a document last written at `previous`, never going backwards.
    pub fn next_after(previous: Timestamp) -> Self {
        let now = Self::now();
        if now > previous {
            now
        } else {
            Self(previous.0 + Duration::milliseconds(1))
        }
    }

    /// Calendar date (`YYYY-MM-DD`) of this instant.
    pub fn date_string(&self) -> String {
        self.0
            .format(ISO_DATE)
            .unwrap_or_else(|_| "invalid-date".into())
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self.0.format(ISO_MILLIS).map_err(|_| fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl FromStr for Timestamp {
    type Err = time::error::Parse;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parsed = time::PrimitiveDateTime::parse(value, ISO_MILLIS)?;
        Ok(Self(parsed.assume_utc()))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// One record in a collection, as stored by a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Store-assigned identifier, immutable for the document's lifetime.
    pub id: Uuid,
    /// Stamped once at creation.
    pub created_at: Timestamp,
    /// Refreshed on every update.
    pub updated_at: Timestamp,
    /// Schema-whitelisted payload.
    #[serde(flatten)]
    pub fields: Fields,
}

impl Document {
    /// Build a brand-new document with a fresh identifier and matching timestamps.
    pub fn new(fields: Fields) -> Self {
        let now = Timestamp::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            fields,
        }
    }

    /// Borrow a field as a string, if present and string-typed.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn timestamp_round_trips_through_iso_string() {
        let stamp: Timestamp = "2024-03-09T17:04:05.123Z".parse().unwrap();
        assert_eq!(stamp.to_string(), "2024-03-09T17:04:05.123Z");
        assert_eq!(stamp.date_string(), "2024-03-09");
    }

    #[test]
    fn next_after_is_strictly_greater() {
        let future: Timestamp = "2999-01-01T00:00:00.000Z".parse().unwrap();
        let next = Timestamp::next_after(future);
        assert!(next > future);
        assert_eq!(next.to_string(), "2999-01-01T00:00:00.001Z");
    }

    #[test]
    fn document_serializes_flat() {
        let mut fields = Fields::new();
        fields.insert("title".into(), json!("Hades"));
        let doc = Document::new(fields);

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["title"], "Hades");
        assert_eq!(value["id"], doc.id.to_string());
        assert_eq!(value["createdAt"], value["updatedAt"]);

        let back: Document = serde_json::from_value(value).unwrap();
        assert_eq!(back, doc);
    }
}
