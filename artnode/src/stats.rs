//! Occupancy statistics for a node and everything below it.
//!
//! Useful for checking that grow/shrink keep representations within their bands and for
//! comparing memory use across workloads.

use std::collections::HashMap;

use crate::node::{Node, NodeKind};
use crate::partials::Partial;

pub trait TreeStatsTrait {
    fn get_tree_stats(&self) -> TreeStats;
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct NodeStats {
    pub width: usize,
    pub node_type: String,
    pub total_nodes: usize,
    pub total_children: usize,
    pub density: f64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TreeStats {
    pub node_stats: HashMap<String, NodeStats>,
    pub num_leaves: usize,
    pub num_values: usize,
    pub num_inner_nodes: usize,
    pub total_density: f64,
    pub max_height: usize,
}

impl TreeStats {
    pub fn for_kind(&self, kind: NodeKind) -> Option<&NodeStats> {
        self.node_stats.get(kind.name())
    }

    fn record<P: Partial, V>(&mut self, node: &Node<P, V>, height: usize) {
        self.max_height = self.max_height.max(height);
        if node.value().is_some() {
            self.num_values += 1;
        }
        if node.is_leaf() {
            self.num_leaves += 1;
            return;
        }
        self.num_inner_nodes += 1;

        let kind = node.kind();
        let num_children = node.n_children();
        self.node_stats
            .entry(kind.name().to_string())
            .and_modify(|e| {
                e.total_nodes += 1;
                e.total_children += num_children;
            })
            .or_insert(NodeStats {
                width: kind.capacity(),
                node_type: kind.name().to_string(),
                total_nodes: 1,
                total_children: num_children,
                density: 0.0,
            });
    }

    fn finish(&mut self) {
        let mut total_children = 0;
        let mut total_width = 0;
        for ns in self.node_stats.values_mut() {
            total_children += ns.total_children;
            total_width += ns.width * ns.total_nodes;
            ns.density = ns.total_children as f64 / (ns.width * ns.total_nodes) as f64;
        }
        if total_width > 0 {
            self.total_density = total_children as f64 / total_width as f64;
        }
    }
}

impl<P: Partial, V> TreeStatsTrait for Node<P, V> {
    fn get_tree_stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        let mut stack = vec![(self, 1)];
        while let Some((node, height)) = stack.pop() {
            stats.record(node, height);
            stack.extend(node.iter().map(|(_, child)| (child, height + 1)));
        }
        stats.finish();
        stats
    }
}
