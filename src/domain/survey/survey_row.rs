// ============================================================
// SURVEY ROW
// ============================================================
// One respondent: raw header -> trimmed answer, in column order

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single respondent row keyed by the raw CSV header.
///
/// Keys keep the position of their first insertion; inserting an existing
/// header again replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyRow {
    entries: Vec<(String, String)>,
}

impl SurveyRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the value stored under `header`
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        let header = header.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(key, _)| *key == header) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((header, value)),
        }
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == header)
            .map(|(_, value)| value.as_str())
    }

    /// Headers in column order
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for SurveyRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct SurveyRowVisitor;

impl<'de> Visitor<'de> for SurveyRowVisitor {
    type Value = SurveyRow;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of header to answer")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut row = SurveyRow::new();
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            row.insert(key, value);
        }
        Ok(row)
    }
}

impl<'de> Deserialize<'de> for SurveyRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SurveyRowVisitor)
    }
}
