//! Graph builder: prompt records → nodes, adjacency maps and edges.

use std::collections::HashMap;

use serde::Serialize;

use crate::prompts::PromptRecord;

/// "`source` is included by `target`": dependency → dependent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    fn new(source: &str, target: &str) -> Self {
        Self { id: format!("{source}->{target}"), source: source.to_owned(), target: target.to_owned() }
    }
}

/// Dependency graph borrowed from a record slice.
#[derive(Debug, Default)]
pub struct DependencyGraph<'a> {
    /// Records in input order. A repeated id keeps only its first record.
    pub nodes: Vec<&'a PromptRecord>,
    /// id → position in `nodes`.
    pub lookup: HashMap<&'a str, usize>,
    /// id → ids that include it, in discovery order.
    pub children: HashMap<&'a str, Vec<&'a str>>,
    /// id → resolved ids it includes, in `includes` order.
    pub parents: HashMap<&'a str, Vec<&'a str>>,
    pub edges: Vec<Edge>,
}

impl<'a> DependencyGraph<'a> {
    /// Build the graph. Includes that name no known record are dropped, and a
    /// repeated include of the same id yields one edge.
    #[must_use]
    pub fn build(records: &'a [PromptRecord]) -> Self {
        let mut graph = Self::default();

        for record in records {
            let id = record.id.as_str();
            if graph.lookup.contains_key(id) {
                continue;
            }
            graph.lookup.insert(id, graph.nodes.len());
            graph.nodes.push(record);
            graph.children.insert(id, Vec::new());
            graph.parents.insert(id, Vec::new());
        }

        for &node in &graph.nodes {
            let target = node.id.as_str();
            for include in &node.includes {
                let Some(&source_idx) = graph.lookup.get(include.as_str()) else {
                    continue;
                };
                let source_record: &'a PromptRecord = graph.nodes[source_idx];
                let source = source_record.id.as_str();

                let parents = graph.parents.entry(target).or_default();
                if parents.contains(&source) {
                    continue;
                }
                parents.push(source);
                graph.children.entry(source).or_default().push(target);
                graph.edges.push(Edge::new(source, target));
            }
        }

        graph
    }

    #[must_use]
    pub fn parents_of(&self, id: &str) -> &[&'a str] {
        self.parents.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn children_of(&self, id: &str) -> &[&'a str] {
        self.children.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&'a PromptRecord> {
        self.lookup.get(id).map(|&i| self.nodes[i])
    }
}
