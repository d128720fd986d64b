use crate::graph::{GraphNode, NodeIndex, NodeSet};
use qualgraph_core::{CategoryId, CategoryRecord, CodeRecord, HierarchyError, NodeKey};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Which slice of the hierarchy to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RootSelector {
    /// Every category and code.
    #[default]
    All,
    /// A node and everything below it.
    Subtree(NodeKey),
}

/// Builds the working node set for a render and annotates depths.
#[derive(Debug, Clone, Copy)]
pub struct HierarchyIndexer {
    /// Breadth-first rounds used to collect a subtree. Deeper levels are
    /// left out.
    pub max_expansion_rounds: usize,
}

impl Default for HierarchyIndexer {
    fn default() -> Self {
        Self {
            max_expansion_rounds: Self::DEFAULT_MAX_EXPANSION_ROUNDS,
        }
    }
}

impl HierarchyIndexer {
    pub const DEFAULT_MAX_EXPANSION_ROUNDS: usize = 10;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_subtree(
        &self,
        categories: &[CategoryRecord],
        codes: &[CodeRecord],
        selector: RootSelector,
    ) -> Result<NodeSet, HierarchyError> {
        let all_nodes: Vec<GraphNode> = categories
            .iter()
            .map(GraphNode::from_category)
            .chain(codes.iter().map(GraphNode::from_code))
            .collect();

        let root_key = match selector {
            RootSelector::All => return Ok(NodeSet::new(all_nodes, None)),
            RootSelector::Subtree(key) => key,
        };

        let Some(root_pos) = all_nodes.iter().position(|n| n.key == root_key) else {
            return Err(HierarchyError::UnknownRoot(root_key));
        };

        let mut children: HashMap<CategoryId, Vec<usize>> = HashMap::new();
        for (i, node) in all_nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                children.entry(parent).or_default().push(i);
            }
        }

        let mut selected = vec![root_pos];
        let mut visited: HashSet<usize> = HashSet::from([root_pos]);
        let mut frontier = vec![root_pos];
        let mut rounds = 0;

        while !frontier.is_empty() && rounds < self.max_expansion_rounds {
            let mut next = Vec::new();
            for &pos in &frontier {
                let Some(category) = all_nodes[pos].key.as_category() else {
                    continue;
                };
                for &child in children.get(&category).map(Vec::as_slice).unwrap_or(&[]) {
                    if visited.insert(child) {
                        next.push(child);
                    }
                }
            }
            selected.extend(next.iter().copied());
            frontier = next;
            rounds += 1;
        }

        let truncated = frontier.iter().any(|&pos| {
            all_nodes[pos]
                .key
                .as_category()
                .and_then(|id| children.get(&id))
                .is_some_and(|kids| kids.iter().any(|kid| !visited.contains(kid)))
        });
        if truncated {
            tracing::warn!(
                "Subtree below {} is deeper than {} levels; deeper nodes are not shown",
                root_key,
                self.max_expansion_rounds
            );
        }

        let mut slots: Vec<Option<GraphNode>> = all_nodes.into_iter().map(Some).collect();
        let nodes = selected
            .into_iter()
            .filter_map(|pos| slots[pos].take())
            .collect();
        Ok(NodeSet::new(nodes, Some(root_key)))
    }

    /// Annotate each node with its hop count from the nearest layout root.
    ///
    /// Fails on parents missing from the set and on parent cycles.
    pub fn compute_depths(&self, nodes: &mut NodeSet) -> Result<(), HierarchyError> {
        let parents = nodes.layout_parents()?;
        let mut depths: Vec<Option<u32>> = vec![None; nodes.len()];

        for start in nodes.node_indices() {
            let mut trail: Vec<NodeIndex> = Vec::new();
            let mut on_trail: HashSet<NodeIndex> = HashSet::new();
            let mut anchor = None;
            let mut current = start;

            loop {
                if let Some(depth) = depths[current.0] {
                    anchor = Some(depth);
                    break;
                }
                if !on_trail.insert(current) {
                    return Err(HierarchyError::Cycle {
                        node: nodes[current].key,
                    });
                }
                trail.push(current);
                match parents[current.0] {
                    Some(parent) => current = parent,
                    None => break,
                }
            }

            let mut depth = anchor.map_or(0, |d| d + 1);
            for &idx in trail.iter().rev() {
                depths[idx.0] = Some(depth);
                depth += 1;
            }
        }

        for idx in nodes.node_indices().collect::<Vec<_>>() {
            nodes[idx].depth = depths[idx.0].unwrap_or(0);
        }
        Ok(())
    }
}
