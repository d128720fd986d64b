pub mod angles;
pub mod canvas;
pub mod graph;
pub mod hierarchy;
pub mod layout;
pub mod link_renderer;
pub mod style;

pub use angles::AngleAllocator;
pub use canvas::{CanvasNode, GraphCanvas, GraphLink};
pub use graph::{GraphNode, NodeIndex, NodeSet, Rect, Vec2};
pub use hierarchy::{HierarchyIndexer, RootSelector};
pub use layout::{CanvasSize, LayoutReport, Layouter, RadialLayouter};
pub use link_renderer::{LinkRenderer, Segment};
pub use style::{ApproximateMetrics, MeasureText, NodeStyleOptions, apply_styles};
