use serde::{Deserialize, Serialize};

/// A stored item: a schemaless map of attribute names to JSON values.
///
/// Key attributes are part of the item, the same way a document store keeps
/// them; the store itself only reads the `ItemKey` passed alongside.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Composite (partition, sort) key identifying an item within a table.
///
/// The partition groups related items; the sort key orders and disambiguates
/// within the partition. Tables keyed by a single attribute use an empty
/// sort component.
///
/// `Ord` compares partition first, then sort, so an ordered map of keys
/// yields items in sort-key lexical order within each partition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    pub partition: String,
    pub sort: String,
}

impl ItemKey {
    /// Creates a composite key from partition and sort components.
    pub fn new(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: sort.into(),
        }
    }

    /// Creates a key for a single-attribute table (empty sort component).
    pub fn partition_only(partition: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: String::new(),
        }
    }
}

impl std::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.sort.is_empty() {
            write!(f, "({})", self.partition)
        } else {
            write!(f, "({}, {})", self.partition, self.sort)
        }
    }
}
