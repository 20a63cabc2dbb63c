//! Breadth-first topological layering with an overflow layer for cycles.
//!
//! Layer 0 is every node without resolved parents. A child joins the next
//! layer once every one of its parents is layered. Nodes on a cycle never
//! satisfy that, so they are collected, in input order, into one final
//! overflow layer instead of stalling the pass.

use std::collections::HashSet;

use super::builder::DependencyGraph;

/// Layer assignment for every node of a graph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Layering<'a> {
    /// Regular layers followed by the overflow layer, if any.
    pub layers: Vec<Vec<&'a str>>,
    /// Whether the last entry of `layers` is the overflow layer.
    pub has_overflow: bool,
}

impl Layering<'_> {
    /// Number of layers produced by the main pass.
    #[must_use]
    pub fn regular_count(&self) -> usize {
        self.layers.len() - usize::from(self.has_overflow)
    }

    /// Index of the layer holding `id`.
    #[cfg(test)]
    #[must_use]
    pub fn layer_of(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.contains(&id))
    }
}

/// Assign every node of `graph` to exactly one layer.
#[must_use]
pub fn assign_layers<'a>(graph: &DependencyGraph<'a>) -> Layering<'a> {
    let mut layers: Vec<Vec<&'a str>> = Vec::new();
    let mut layered: HashSet<&'a str> = HashSet::with_capacity(graph.nodes.len());

    let mut frontier: Vec<&'a str> = graph
        .nodes
        .iter()
        .map(|node| node.id.as_str())
        .filter(|id| graph.parents_of(id).is_empty())
        .collect();

    while !frontier.is_empty() {
        layered.extend(frontier.iter().copied());

        let mut next: Vec<&'a str> = Vec::new();
        let mut queued: HashSet<&'a str> = HashSet::new();
        for &id in &frontier {
            for &child in graph.children_of(id) {
                if layered.contains(child) || queued.contains(child) {
                    continue;
                }
                if graph.parents_of(child).iter().all(|p| layered.contains(p)) {
                    queued.insert(child);
                    next.push(child);
                }
            }
        }

        layers.push(std::mem::replace(&mut frontier, next));
    }

    let leftover: Vec<&'a str> = graph
        .nodes
        .iter()
        .map(|node| node.id.as_str())
        .filter(|id| !layered.contains(id))
        .collect();
    let has_overflow = !leftover.is_empty();
    if has_overflow {
        layers.push(leftover);
    }

    Layering { layers, has_overflow }
}
