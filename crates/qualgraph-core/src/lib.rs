use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod error;
pub mod excerpt;
pub mod store;

pub use error::{GraphError, HierarchyError, StoreError};
pub use excerpt::{Excerpt, ImageExcerpt, ImageRegion, MediaExcerpt, TextExcerpt};
pub use store::CodingStore;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CategoryId(pub i64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CodeId(pub i64);

impl fmt::Display for CodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Category,
    Code,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Category => "Category",
            NodeKind::Code => "Code",
        }
    }
}

/// Identity of a node on the graph.
///
/// Category and code ids come from separate tables and may collide, so the
/// kind is part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeKey {
    Category(CategoryId),
    Code(CodeId),
}

impl NodeKey {
    pub fn kind(self) -> NodeKind {
        match self {
            NodeKey::Category(_) => NodeKind::Category,
            NodeKey::Code(_) => NodeKind::Code,
        }
    }

    pub fn as_category(self) -> Option<CategoryId> {
        match self {
            NodeKey::Category(id) => Some(id),
            NodeKey::Code(_) => None,
        }
    }

    pub fn as_code(self) -> Option<CodeId> {
        match self {
            NodeKey::Code(id) => Some(id),
            NodeKey::Category(_) => None,
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Category(id) => write!(f, "category:{id}"),
            NodeKey::Code(id) => write!(f, "code:{id}"),
        }
    }
}

impl From<CategoryId> for NodeKey {
    fn from(id: CategoryId) -> Self {
        NodeKey::Category(id)
    }
}

impl From<CodeId> for NodeKey {
    fn from(id: CodeId) -> Self {
        NodeKey::Code(id)
    }
}

/// A row of the category table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
    pub parent: Option<CategoryId>,
    pub memo: Option<String>,
    pub owner: String,
    pub date: String,
}

/// A row of the code table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CodeRecord {
    pub id: CodeId,
    pub name: String,
    pub category: Option<CategoryId>,
    pub color: Option<String>,
    pub memo: Option<String>,
    pub owner: String,
    pub date: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid color value: {0:?}")]
pub struct ColorParseError(pub String);

/// RGB color, written as `#RRGGBB` in the coding database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(value: &str) -> Result<Self, ColorParseError> {
        let digits = value.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return Err(ColorParseError(value.to_string()));
        }
        let expanded = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            _ => return Err(ColorParseError(value.to_string())),
        };
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&expanded[range], 16).map_err(|_| ColorParseError(value.to_string()))
        };
        Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
