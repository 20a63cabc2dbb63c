//! Prompt dependency graph: builder, layering and coordinate layout.
//!
//! DESIGN
//! ======
//! `layout` is a pure function of the record slice. Callers recompute it
//! whenever they need it; nothing here caches or mutates shared state.
//! The three stages stay separate so each can be tested on its own:
//! `DependencyGraph::build` → `assign_layers` → `LayoutConfig` positions.

pub mod builder;
pub mod layering;
pub mod layout;

use std::collections::HashMap;

use serde::Serialize;

pub use builder::{DependencyGraph, Edge};
pub use layering::assign_layers;
pub use layout::{Connector, LayoutConfig, Point};

use crate::prompts::{self, PromptRecord};

/// A prompt record placed on the canvas.
#[derive(Debug, Clone, Serialize)]
pub struct PositionedNode {
    #[serde(flatten)]
    pub record: PromptRecord,
    pub label: String,
    pub path: String,
    pub directory: String,
    pub layer: usize,
    pub x: f64,
    pub y: f64,
}

/// An edge with the connector curve between its endpoint boxes.
#[derive(Debug, Clone, Serialize)]
pub struct PositionedEdge {
    #[serde(flatten)]
    pub edge: Edge,
    pub connector: Connector,
}

/// Everything the graph renderer needs.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutResult {
    /// Nodes in layer order, left to right within a layer.
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<PositionedEdge>,
    pub layers: Vec<Vec<String>>,
    pub regular_layers: usize,
    pub has_overflow: bool,
    pub width: f64,
    pub height: f64,
}

#[cfg(test)]
impl LayoutResult {
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.record.id == id)
    }
}

/// Build, layer and position the dependency graph of `records`.
#[must_use]
pub fn layout(records: &[PromptRecord], config: &LayoutConfig) -> LayoutResult {
    let graph = DependencyGraph::build(records);
    let layering = assign_layers(&graph);

    let sizes: Vec<usize> = layering.layers.iter().map(Vec::len).collect();
    let width = config.canvas_width(&sizes);
    let height = config.canvas_height(layering.layers.len());

    let mut nodes = Vec::with_capacity(graph.nodes.len());
    let mut corners: HashMap<&str, Point> = HashMap::with_capacity(graph.nodes.len());
    for (i, layer) in layering.layers.iter().enumerate() {
        for (j, &id) in layer.iter().enumerate() {
            let Some(record) = graph.node(id) else {
                continue;
            };
            let corner = config.position(width, i, layer.len(), j);
            corners.insert(id, corner);
            nodes.push(PositionedNode {
                record: record.clone(),
                label: prompts::label_for(id).to_owned(),
                path: id.to_owned(),
                directory: prompts::directory_for(id).to_owned(),
                layer: i,
                x: corner.x,
                y: corner.y,
            });
        }
    }

    let edges = graph
        .edges
        .iter()
        .filter_map(|edge| {
            let source = corners.get(edge.source.as_str())?;
            let target = corners.get(edge.target.as_str())?;
            Some(PositionedEdge { edge: edge.clone(), connector: config.connector(*source, *target) })
        })
        .collect();

    LayoutResult {
        nodes,
        edges,
        layers: layering
            .layers
            .iter()
            .map(|layer| layer.iter().map(|id| (*id).to_owned()).collect())
            .collect(),
        regular_layers: layering.regular_count(),
        has_overflow: layering.has_overflow,
        width,
        height,
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
