use crate::graph::{NodeIndex, NodeSet};
use qualgraph_core::HierarchyError;
use std::collections::HashMap;
use std::f32::consts::TAU;

/// Splits the full circle around each parent among its direct children.
pub struct AngleAllocator;

impl AngleAllocator {
    /// Angle of the `index`-th of `count` siblings, in `[0, 2π)`.
    pub fn sibling_angle(index: usize, count: usize) -> f32 {
        if count == 0 {
            return 0.0;
        }
        ((TAU / count as f32) * (index + 1) as f32).rem_euclid(TAU)
    }

    /// Assign an angle to every node, grouping siblings by layout parent.
    ///
    /// Root-level nodes form one group under an implicit root. Members of a
    /// group are numbered in the order they appear in the set.
    pub fn assign_angles(nodes: &mut NodeSet) -> Result<(), HierarchyError> {
        let parents = nodes.layout_parents()?;

        let mut group_of: HashMap<Option<NodeIndex>, usize> = HashMap::new();
        let mut groups: Vec<Vec<NodeIndex>> = Vec::new();
        for idx in nodes.node_indices() {
            let slot = *group_of.entry(parents[idx.0]).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(idx);
        }

        for members in &groups {
            let count = members.len();
            for (i, &idx) in members.iter().enumerate() {
                nodes[idx].angle = Some(Self::sibling_angle(i, count));
            }
        }

        tracing::debug!(
            "Assigned angles to {} nodes in {} sibling groups",
            nodes.len(),
            groups.len()
        );
        Ok(())
    }
}
