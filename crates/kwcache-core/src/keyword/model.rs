//! Keyword domain models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A keyword as read from the relational source.
///
/// Immutable within a sync run. `subcategory_name`, `category` and
/// `connections` are derived by the reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub id: i64,
    pub text: String,
    /// Explicit display name, when the source carries one distinct from `text`.
    pub name: Option<String>,
    pub subcategory_id: i64,
    pub subcategory_name: String,
    /// Raw category letter produced by the classifier. Validated by the transformer.
    pub category: String,
    pub connections: i64,
    pub is_active: bool,
    /// Authoritative importance, if the source has one.
    pub weight: Option<f64>,
    /// Neighbour ids, when the reader resolved them.
    pub neighbors: Option<Vec<i64>>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl KeywordRecord {
    /// Minimal record with only the fields every source provides.
    pub fn new(
        id: i64,
        text: impl Into<String>,
        subcategory_id: i64,
        subcategory_name: impl Into<String>,
        category: impl Into<String>,
        connections: i64,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            name: None,
            subcategory_id,
            subcategory_name: subcategory_name.into(),
            category: category.into(),
            connections,
            is_active: true,
            weight: None,
            neighbors: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Classification letter of a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    A,
    B,
    C,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::A, Category::B, Category::C];

    /// Parse a category letter. Anything outside the known set is `None`.
    pub fn from_letter(s: &str) -> Option<Self> {
        match s {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }

    /// Presentation colour, one per category.
    pub fn color(&self) -> &'static str {
        match self {
            Self::A => "#3B82F6",
            Self::B => "#8B5CF6",
            Self::C => "#F97316",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword status as exposed to cache readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordStatus {
    Active,
    Inactive,
}

impl KeywordStatus {
    pub fn from_active(is_active: bool) -> Self {
        if is_active {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// A keyword in the shape published to the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedKeyword {
    pub id: i64,
    pub name: String,
    pub text: String,
    pub category: Category,
    pub subcategory: String,
    pub subcategory_name: String,
    pub weight: f64,
    pub connections: i64,
    pub status: KeywordStatus,
    pub dependencies: Vec<i64>,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
    pub created_at: String,
    pub updated_at: String,
}
