use crate::graph::{Rect, Vec2};
use qualgraph_core::Color;
use serde::{Deserialize, Serialize};

/// A straight line between two node boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn to_tuple(&self) -> (f32, f32, f32, f32) {
        (self.start.x, self.start.y, self.end.x, self.end.y)
    }
}

/// Draws parent-child links so they meet box edges instead of crossing
/// box interiors.
#[derive(Debug, Clone, Copy)]
pub struct LinkRenderer {
    pub color: Color,
    pub width: f32,
}

impl Default for LinkRenderer {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

impl LinkRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compute_segment(&self, parent: Rect, child: Rect) -> Segment {
        let (x0, x1) = Self::axis_anchors(parent.min.x, parent.max.x, child.min.x, child.max.x);
        let (y0, y1) = Self::axis_anchors(parent.min.y, parent.max.y, child.min.y, child.max.y);
        Segment {
            start: Vec2::new(x0, y0),
            end: Vec2::new(x1, y1),
        }
    }

    /// Anchor coordinates on one axis for the spans `[a_min, a_max]` and
    /// `[b_min, b_max]`.
    ///
    /// Overlapping spans anchor at their midpoints. Otherwise the lower span
    /// anchors at its far edge and the upper span at its near edge.
    fn axis_anchors(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> (f32, f32) {
        if a_min < b_max && b_min < a_max {
            ((a_min + a_max) / 2.0, (b_min + b_max) / 2.0)
        } else if b_min >= a_max {
            (a_max, b_min)
        } else {
            (a_min, b_max)
        }
    }
}
