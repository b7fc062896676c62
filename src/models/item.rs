//! Item entity
//!
//! `Item` is the stored record, `ItemData` is what clients send on create and
//! update. The id and creation time are owned by the store and never read from
//! a request body.

use chrono::{DateTime, Utc};
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Store-assigned item identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Replace the mutable fields, keeping id and creation time
    pub fn apply(&mut self, data: ItemData) {
        self.name = data.name;
        self.description = data.description;
    }
}

/// Client-supplied item fields
///
/// Missing fields decode as empty strings. Unknown fields, including `id`,
/// are ignored. Only a JSON object decodes; arrays are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemData {
    pub name: String,
    pub description: String,
}

impl<'de> Deserialize<'de> for ItemData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ItemDataVisitor)
    }
}

struct ItemDataVisitor;

impl<'de> Visitor<'de> for ItemDataVisitor {
    type Value = ItemData;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an item object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<ItemData, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut data = ItemData::default();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "name" => data.name = map.next_value()?,
                "description" => data.description = map.next_value()?,
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(data)
    }
}

impl ItemData {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}
