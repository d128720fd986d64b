use crate::graph::{NodeSet, Vec2};
use qualgraph_core::HierarchyError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutReport {
    /// Relaxation passes needed to place every node.
    pub passes: usize,
}

pub trait Layouter {
    fn execute(&self, nodes: &mut NodeSet, canvas: CanvasSize)
    -> Result<LayoutReport, HierarchyError>;
}

/// Places each generation on a ring around its parent.
///
/// Rings shrink with depth so children stay close to their own parent. The
/// layout center sits left of the canvas middle because labels extend to the
/// right of their anchor.
#[derive(Debug, Clone, Copy)]
pub struct RadialLayouter {
    pub radius: f32,
    /// A child placed closer than this to its parent on both axes is pushed
    /// away by the same amount.
    pub min_separation: f32,
    pub max_passes: usize,
}

impl Default for RadialLayouter {
    fn default() -> Self {
        Self {
            radius: Self::DEFAULT_RADIUS,
            min_separation: Self::DEFAULT_MIN_SEPARATION,
            max_passes: Self::MAX_RELAXATION_PASSES,
        }
    }
}

impl RadialLayouter {
    pub const DEFAULT_RADIUS: f32 = 180.0;
    pub const DEFAULT_MIN_SEPARATION: f32 = 20.0;
    pub const MAX_RELAXATION_PASSES: usize = 1000;
    const EDGE_MIN: f32 = 2.0;
    const EDGE_MARGIN: f32 = 20.0;

    pub fn center(canvas: CanvasSize) -> Vec2 {
        Vec2::new(canvas.width / 3.0, canvas.height / 2.0)
    }

    /// Horizontal stretch applied to every ring on a landscape canvas.
    pub fn x_stretch(canvas: CanvasSize) -> f32 {
        if canvas.height > 0.0 && canvas.width > 0.0 {
            canvas.width / canvas.height
        } else {
            1.0
        }
    }

    fn root_position(&self, angle: f32, center: Vec2, stretch: f32, lone_root: bool) -> Vec2 {
        if lone_root {
            return center;
        }
        Vec2::new(
            center.x + angle.cos() * self.radius * stretch,
            center.y + angle.sin() * self.radius,
        )
    }

    fn child_position(&self, angle: f32, parent: Vec2, parent_depth: u32, stretch: f32) -> Vec2 {
        let ring = self.radius / (parent_depth as f32 + 2.0);
        let mut pos = Vec2::new(
            parent.x + angle.cos() * ring * stretch,
            parent.y + angle.sin() * ring,
        );
        if (pos.x - parent.x).abs() < self.min_separation
            && (pos.y - parent.y).abs() < self.min_separation
        {
            pos.x += self.min_separation;
            pos.y += self.min_separation;
        }
        pos
    }

    /// Keep a position inside the scrollable area of the canvas.
    pub fn clamp_to_canvas(pos: Vec2, canvas: CanvasSize) -> Vec2 {
        let max_x = (canvas.width * 2.0 - Self::EDGE_MARGIN).max(Self::EDGE_MIN);
        let max_y = (canvas.height * 2.0 - Self::EDGE_MARGIN).max(Self::EDGE_MIN);
        Vec2::new(
            pos.x.max(Self::EDGE_MIN).min(max_x),
            pos.y.max(Self::EDGE_MIN).min(max_y),
        )
    }
}

impl Layouter for RadialLayouter {
    fn execute(
        &self,
        nodes: &mut NodeSet,
        canvas: CanvasSize,
    ) -> Result<LayoutReport, HierarchyError> {
        let parents = nodes.layout_parents()?;
        let center = Self::center(canvas);
        let stretch = Self::x_stretch(canvas);
        let lone_root = parents.iter().filter(|p| p.is_none()).count() == 1;

        let mut positions: Vec<Option<Vec2>> = vec![None; nodes.len()];
        let mut passes = 0;

        while positions.iter().any(Option::is_none) && passes < self.max_passes {
            for idx in nodes.node_indices() {
                if positions[idx.0].is_some() {
                    continue;
                }
                let angle = nodes[idx].angle.unwrap_or(0.0);
                match parents[idx.0] {
                    None => {
                        positions[idx.0] =
                            Some(self.root_position(angle, center, stretch, lone_root));
                    }
                    Some(parent) => {
                        if let Some(parent_pos) = positions[parent.0] {
                            positions[idx.0] = Some(self.child_position(
                                angle,
                                parent_pos,
                                nodes[parent].depth,
                                stretch,
                            ));
                        }
                    }
                }
            }
            passes += 1;
        }

        let unpositioned: Vec<_> = nodes
            .node_indices()
            .filter(|idx| positions[idx.0].is_none())
            .map(|idx| nodes[idx].key)
            .collect();
        if !unpositioned.is_empty() {
            tracing::warn!(
                "Radial layout left {} nodes unplaced after {} passes",
                unpositioned.len(),
                passes
            );
            return Err(HierarchyError::Unpositioned {
                nodes: unpositioned,
            });
        }

        for idx in nodes.node_indices().collect::<Vec<_>>() {
            nodes[idx].position = positions[idx.0].map(|pos| Self::clamp_to_canvas(pos, canvas));
        }

        tracing::debug!("Radial layout placed {} nodes in {} passes", nodes.len(), passes);
        Ok(LayoutReport { passes })
    }
}
