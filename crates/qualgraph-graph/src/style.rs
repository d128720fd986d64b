use crate::graph::{GraphNode, NodeSet, Vec2};
use qualgraph_core::{Color, NodeKind};
use serde::{Deserialize, Serialize};

/// Display toggles offered next to the graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeStyleOptions {
    /// Draw every node white, ignoring code colors.
    pub monochrome: bool,
    /// Draw categories in a larger font, top-level ones largest.
    pub enlarge_category_font: bool,
    pub base_font_size: f32,
}

impl Default for NodeStyleOptions {
    fn default() -> Self {
        Self {
            monochrome: false,
            enlarge_category_font: false,
            base_font_size: GraphNode::DEFAULT_FONT_SIZE,
        }
    }
}

pub fn font_size_for(kind: NodeKind, depth: u32, options: &NodeStyleOptions) -> f32 {
    match kind {
        NodeKind::Category if options.enlarge_category_font => {
            if depth == 0 {
                options.base_font_size + 2.0
            } else {
                options.base_font_size + 1.0
            }
        }
        _ => options.base_font_size,
    }
}

pub fn fill_color(node: &GraphNode, options: &NodeStyleOptions) -> Color {
    match node.kind() {
        NodeKind::Category => Color::WHITE,
        NodeKind::Code if options.monochrome => Color::WHITE,
        NodeKind::Code => node.assigned_color.unwrap_or(Color::WHITE),
    }
}

/// Set fill color and font size on every node. Depths must be computed.
pub fn apply_styles(nodes: &mut NodeSet, options: &NodeStyleOptions) {
    for node in nodes.iter_mut() {
        node.color = fill_color(node, options);
        node.font_size = font_size_for(node.kind(), node.depth, options);
    }
}

/// Measures the box a node label occupies.
pub trait MeasureText {
    fn measure(&self, text: &str, font_size: f32) -> Vec2;
}

/// Font-free estimate of label size from character and line counts.
#[derive(Debug, Clone, Copy)]
pub struct ApproximateMetrics {
    pub char_width: f32,
    pub line_height: f32,
    pub padding: f32,
}

impl Default for ApproximateMetrics {
    fn default() -> Self {
        Self {
            char_width: 0.6,
            line_height: 1.5,
            padding: 5.0,
        }
    }
}

impl MeasureText for ApproximateMetrics {
    fn measure(&self, text: &str, font_size: f32) -> Vec2 {
        let lines: Vec<&str> = text.split('\n').collect();
        let longest = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        Vec2::new(
            longest as f32 * font_size * self.char_width + 2.0 * self.padding,
            lines.len() as f32 * font_size * self.line_height + 2.0 * self.padding,
        )
    }
}
