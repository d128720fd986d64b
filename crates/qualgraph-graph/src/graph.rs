use qualgraph_core::{
    CategoryId, CategoryRecord, CodeRecord, Color, HierarchyError, NodeKey, NodeKind,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeIndex(pub usize);

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Create a new rectangle from position and size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: Vec2::new(pos.x + size.x, pos.y + size.y),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.min.x + self.width() * 0.5,
            self.min.y + self.height() * 0.5,
        )
    }

    /// Check if the rectangle contains a point
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// A category or code prepared for display.
///
/// `depth`, `angle` and `position` are filled in by the indexer, the angle
/// allocator and the layouter, in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub key: NodeKey,
    pub name: String,
    pub parent: Option<CategoryId>,
    /// Color assigned in the coding database. Categories never carry one.
    pub assigned_color: Option<Color>,
    /// Fill used when drawing the node.
    pub color: Color,
    pub memo: Option<String>,
    pub depth: u32,
    pub angle: Option<f32>,
    pub position: Option<Vec2>,
    pub font_size: f32,
}

impl GraphNode {
    pub const DEFAULT_FONT_SIZE: f32 = 8.0;

    pub fn from_category(record: &CategoryRecord) -> Self {
        Self {
            key: NodeKey::Category(record.id),
            name: record.name.clone(),
            parent: record.parent,
            assigned_color: None,
            color: Color::WHITE,
            memo: record.memo.clone(),
            depth: 0,
            angle: None,
            position: None,
            font_size: Self::DEFAULT_FONT_SIZE,
        }
    }

    pub fn from_code(record: &CodeRecord) -> Self {
        let assigned_color = record
            .color
            .as_deref()
            .and_then(|value| match Color::from_hex(value) {
                Ok(color) => Some(color),
                Err(err) => {
                    tracing::warn!("Code {} has an unusable color: {}", record.id, err);
                    None
                }
            });
        Self {
            key: NodeKey::Code(record.id),
            name: record.name.clone(),
            parent: record.category,
            assigned_color,
            color: assigned_color.unwrap_or(Color::WHITE),
            memo: record.memo.clone(),
            depth: 0,
            angle: None,
            position: None,
            font_size: Self::DEFAULT_FONT_SIZE,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.key.kind()
    }
}

/// The working set of nodes for one render, with keyed lookup.
///
/// `root` is the selected subtree root, if any. Its stored parent lies
/// outside the set, so it is laid out as a root.
#[derive(Debug, Clone, Default)]
pub struct NodeSet {
    nodes: Vec<GraphNode>,
    node_map: HashMap<NodeKey, NodeIndex>,
    root: Option<NodeKey>,
}

impl NodeSet {
    pub fn new(nodes: Vec<GraphNode>, root: Option<NodeKey>) -> Self {
        let mut set = Self {
            nodes: Vec::with_capacity(nodes.len()),
            node_map: HashMap::with_capacity(nodes.len()),
            root,
        };
        for node in nodes {
            set.push(node);
        }
        set
    }

    fn push(&mut self, node: GraphNode) {
        if self.node_map.contains_key(&node.key) {
            tracing::warn!("Ignoring duplicate node {}", node.key);
            return;
        }
        let idx = NodeIndex(self.nodes.len());
        self.node_map.insert(node.key, idx);
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<NodeKey> {
        self.root
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        (0..self.nodes.len()).map(NodeIndex)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut GraphNode> {
        self.nodes.iter_mut()
    }

    pub fn index_of(&self, key: NodeKey) -> Option<NodeIndex> {
        self.node_map.get(&key).copied()
    }

    pub fn get(&self, key: NodeKey) -> Option<&GraphNode> {
        self.index_of(key).map(|idx| &self.nodes[idx.0])
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut GraphNode> {
        self.index_of(key).map(|idx| &mut self.nodes[idx.0])
    }

    /// Parent of a node for layout purposes.
    ///
    /// `None` for root-level nodes and the subtree root. A parent id that is
    /// not in the set is an error.
    pub fn layout_parent(&self, idx: NodeIndex) -> Result<Option<NodeIndex>, HierarchyError> {
        let node = &self.nodes[idx.0];
        let Some(parent) = node.parent else {
            return Ok(None);
        };
        if self.root == Some(node.key) {
            return Ok(None);
        }
        match self.index_of(NodeKey::Category(parent)) {
            Some(parent_idx) => Ok(Some(parent_idx)),
            None => Err(HierarchyError::DanglingParent {
                node: node.key,
                parent,
            }),
        }
    }

    /// Layout parents for every node, in index order.
    pub fn layout_parents(&self) -> Result<Vec<Option<NodeIndex>>, HierarchyError> {
        self.node_indices()
            .map(|idx| self.layout_parent(idx))
            .collect()
    }

    pub fn into_nodes(self) -> Vec<GraphNode> {
        self.nodes
    }
}

impl Index<NodeIndex> for NodeSet {
    type Output = GraphNode;
    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index.0]
    }
}

impl IndexMut<NodeIndex> for NodeSet {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Self::Output {
        &mut self.nodes[index.0]
    }
}
