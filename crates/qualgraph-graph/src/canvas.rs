use crate::graph::{GraphNode, NodeSet, Rect, Vec2};
use crate::layout::{CanvasSize, RadialLayouter};
use crate::link_renderer::{LinkRenderer, Segment};
use crate::style::{ApproximateMetrics, MeasureText};
use qualgraph_core::{Color, GraphError, NodeKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A node as placed on the canvas, with its label box size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasNode {
    pub node: GraphNode,
    pub position: Vec2,
    pub size: Vec2,
}

impl CanvasNode {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }
}

/// Parent to child relation with the segment from the last redraw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub parent: NodeKey,
    pub child: NodeKey,
    pub segment: Segment,
    pub color: Color,
    pub width: f32,
}

/// The scene: owns the nodes and links of the current render.
///
/// Any node move triggers a full relink of every link.
pub struct GraphCanvas {
    size: CanvasSize,
    nodes: Vec<CanvasNode>,
    node_map: HashMap<NodeKey, usize>,
    links: Vec<GraphLink>,
    renderer: LinkRenderer,
    metrics: Box<dyn MeasureText>,
    redraw_count: u64,
}

impl GraphCanvas {
    /// Size of the scene in the original dialog layout.
    pub const DEFAULT_SIZE: CanvasSize = CanvasSize {
        width: 982.0,
        height: 647.0,
    };

    pub fn new(size: CanvasSize) -> Self {
        Self::with_metrics(size, Box::new(ApproximateMetrics::default()))
    }

    pub fn with_metrics(size: CanvasSize, metrics: Box<dyn MeasureText>) -> Self {
        Self {
            size,
            nodes: Vec::new(),
            node_map: HashMap::new(),
            links: Vec::new(),
            renderer: LinkRenderer::default(),
            metrics,
            redraw_count: 0,
        }
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    pub fn renderer(&self) -> &LinkRenderer {
        &self.renderer
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.node_map.clear();
        self.links.clear();
    }

    /// Add a node, replacing any node with the same key.
    pub fn add_node(&mut self, node: GraphNode) {
        let position = node.position.unwrap_or_else(|| {
            tracing::warn!("Node {} has no layout position; placing it at center", node.key);
            RadialLayouter::center(self.size)
        });
        let size = self.metrics.measure(&node.name, node.font_size);
        let entry = CanvasNode {
            node,
            position,
            size,
        };
        match self.node_map.get(&entry.node.key) {
            Some(&slot) => self.nodes[slot] = entry,
            None => {
                self.node_map.insert(entry.node.key, self.nodes.len());
                self.nodes.push(entry);
            }
        }
    }

    pub fn add_link(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), GraphError> {
        let segment = self.segment_between(parent, child)?;
        self.links.push(GraphLink {
            parent,
            child,
            segment,
            color: self.renderer.color,
            width: self.renderer.width,
        });
        Ok(())
    }

    /// Replace the scene with a laid-out node set, linking each node to its
    /// layout parent.
    pub fn populate(&mut self, nodes: NodeSet) -> Result<(), GraphError> {
        self.clear();
        let parents = nodes.layout_parents()?;
        let pairs: Vec<(NodeKey, NodeKey)> = nodes
            .node_indices()
            .filter_map(|idx| parents[idx.0].map(|parent| (nodes[parent].key, nodes[idx].key)))
            .collect();
        for node in nodes.into_nodes() {
            self.add_node(node);
        }
        for (parent, child) in pairs {
            self.add_link(parent, child)?;
        }
        tracing::debug!(
            "Canvas populated with {} nodes and {} links",
            self.nodes.len(),
            self.links.len()
        );
        Ok(())
    }

    pub fn node(&self, key: NodeKey) -> Option<&CanvasNode> {
        self.node_map.get(&key).map(|&slot| &self.nodes[slot])
    }

    fn node_mut(&mut self, key: NodeKey) -> Result<&mut CanvasNode, GraphError> {
        match self.node_map.get(&key) {
            Some(&slot) => Ok(&mut self.nodes[slot]),
            None => Err(GraphError::UnknownNode(key)),
        }
    }

    pub fn nodes(&self) -> &[CanvasNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[GraphLink] {
        &self.links
    }

    pub fn redraw_count(&self) -> u64 {
        self.redraw_count
    }

    /// Move one node and relink everything.
    pub fn drag_node(&mut self, key: NodeKey, position: Vec2) -> Result<(), GraphError> {
        if !(position.x.is_finite() && position.y.is_finite()) {
            tracing::warn!("Ignoring drag of {} to {:?}", key, position);
            return Err(GraphError::NonFinitePosition(key));
        }
        let entry = self.node_mut(key)?;
        entry.position = position;
        entry.node.position = Some(position);
        self.redraw_links()
    }

    /// Replace a node's label in memory and re-measure its box.
    pub fn set_node_text(&mut self, key: NodeKey, text: &str) -> Result<(), GraphError> {
        let font_size = {
            let entry = self.node_mut(key)?;
            entry.node.name = text.to_string();
            entry.node.font_size
        };
        let size = self.metrics.measure(text, font_size);
        self.node_mut(key)?.size = size;
        self.redraw_links()
    }

    pub fn set_node_memo(&mut self, key: NodeKey, memo: Option<String>) -> Result<(), GraphError> {
        self.node_mut(key)?.node.memo = memo;
        Ok(())
    }

    /// Recompute every link segment from current node boxes.
    pub fn redraw_links(&mut self) -> Result<(), GraphError> {
        let mut segments = Vec::with_capacity(self.links.len());
        for link in &self.links {
            segments.push(self.segment_between(link.parent, link.child)?);
        }
        for (link, segment) in self.links.iter_mut().zip(segments) {
            link.segment = segment;
        }
        self.redraw_count += 1;
        Ok(())
    }

    /// Topmost node whose box contains `point`.
    pub fn node_at(&self, point: Vec2) -> Option<NodeKey> {
        self.nodes
            .iter()
            .rev()
            .find(|entry| entry.rect().contains(point))
            .map(|entry| entry.node.key)
    }

    fn segment_between(&self, parent: NodeKey, child: NodeKey) -> Result<Segment, GraphError> {
        let parent_rect = self.node(parent).ok_or(GraphError::UnknownNode(parent))?.rect();
        let child_rect = self.node(child).ok_or(GraphError::UnknownNode(child))?.rect();
        Ok(self.renderer.compute_segment(parent_rect, child_rect))
    }
}

impl fmt::Debug for GraphCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphCanvas")
            .field("size", &self.size)
            .field("nodes", &self.nodes.len())
            .field("links", &self.links.len())
            .field("redraw_count", &self.redraw_count)
            .finish_non_exhaustive()
    }
}

impl Default for GraphCanvas {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE)
    }
}
