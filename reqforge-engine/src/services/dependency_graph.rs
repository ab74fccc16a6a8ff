//! Dependency Graph Walker
//!
//! Cycle detection over documents linked by their `dependencies` lists.
//!
//! # Algorithm
//! Iterative depth-first traversal from the start id, keeping an
//! "on stack" index and a "fully explored" set. The first edge that reaches
//! a node already on the stack closes a cycle, reported as the stack slice
//! from that node's first occurrence through the repeated node, in
//! traversal order (`[A, B, C, A]`).
//!
//! - Edges to ids the lookup does not know are ignored (dangling references
//!   are reported elsewhere).
//! - Explored nodes are never re-entered, so the walk is O(V + E).
//! - Edge targets go through `normalize_id` before lookup, so `" B"` and
//!   `"B"` name the same node.

use crate::models::{normalize_id, CorpusContext};
use std::collections::{HashMap, HashSet};

/// Cycle check outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleCheck {
    /// No cycle reachable from the start node
    Acyclic,
    /// Cycle path, first id repeated at the end
    Cycle { path: Vec<String> },
}

impl CycleCheck {
    pub fn is_cycle(&self) -> bool {
        matches!(self, CycleCheck::Cycle { .. })
    }

    pub fn path(&self) -> Option<&[String]> {
        match self {
            CycleCheck::Acyclic => None,
            CycleCheck::Cycle { path } => Some(path),
        }
    }
}

struct Frame<'a> {
    node: &'a str,
    dependencies: &'a [String],
    next: usize,
}

/// Detect a cycle reachable from `start`
///
/// `dependencies_of` returns a node's dependency list, or `None` for ids
/// that do not exist. An unknown start node has no edges.
pub fn detect_cycle<'a, F>(start: &'a str, dependencies_of: F) -> CycleCheck
where
    F: Fn(&str) -> Option<&'a [String]>,
{
    let mut path: Vec<&'a str> = vec![start];
    let mut on_stack: HashMap<&'a str, usize> = HashMap::from([(start, 0)]);
    let mut explored: HashSet<&'a str> = HashSet::new();
    let mut frames = vec![Frame {
        node: start,
        dependencies: dependencies_of(start).unwrap_or(&[]),
        next: 0,
    }];

    while let Some(frame) = frames.last_mut() {
        if frame.next >= frame.dependencies.len() {
            // All edges followed; node is fully explored
            let node = frame.node;
            frames.pop();
            path.pop();
            on_stack.remove(node);
            explored.insert(node);
            continue;
        }

        let dependencies: &'a [String] = frame.dependencies;
        let dependency = normalize_id(&dependencies[frame.next]);
        frame.next += 1;

        if let Some(&position) = on_stack.get(dependency) {
            let mut cycle: Vec<String> = path[position..].iter().map(|id| id.to_string()).collect();
            cycle.push(dependency.to_string());
            return CycleCheck::Cycle { path: cycle };
        }

        if explored.contains(dependency) {
            continue;
        }

        let Some(children) = dependencies_of(dependency) else {
            continue;
        };

        on_stack.insert(dependency, path.len());
        path.push(dependency);
        frames.push(Frame {
            node: dependency,
            dependencies: children,
            next: 0,
        });
    }

    CycleCheck::Acyclic
}

/// Detect a cycle reachable from `start` within a corpus
pub fn has_cycle<'a>(start: &'a str, corpus: &'a CorpusContext) -> CycleCheck {
    detect_cycle(start, |id| corpus.dependencies_of(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Capability, Document};
    use std::cell::Cell;

    fn doc(id: &str, deps: &[&str]) -> Document {
        Document::from(Capability {
            id: Some(id.to_string()),
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        })
    }

    #[test]
    fn test_three_node_cycle() {
        let corpus = CorpusContext::new(vec![
            doc("A", &["B"]),
            doc("B", &["C"]),
            doc("C", &["A"]),
        ]);

        let result = has_cycle("A", &corpus);
        assert_eq!(
            result,
            CycleCheck::Cycle {
                path: vec!["A".into(), "B".into(), "C".into(), "A".into()]
            }
        );
    }

    #[test]
    fn test_acyclic_chain() {
        let corpus = CorpusContext::new(vec![doc("A", &["B"]), doc("B", &["C"]), doc("C", &[])]);
        assert_eq!(has_cycle("A", &corpus), CycleCheck::Acyclic);
    }

    #[test]
    fn test_self_dependency() {
        let corpus = CorpusContext::new(vec![doc("A", &["A"])]);
        assert_eq!(has_cycle("A", &corpus).path(), Some(&["A".to_string(), "A".to_string()][..]));
    }

    #[test]
    fn test_cycle_not_through_start_reports_inner_loop() {
        // A -> B -> C -> B
        let corpus = CorpusContext::new(vec![doc("A", &["B"]), doc("B", &["C"]), doc("C", &["B"])]);
        assert_eq!(
            has_cycle("A", &corpus).path(),
            Some(&["B".to_string(), "C".to_string(), "B".to_string()][..])
        );
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        // A -> B, A -> C, B -> D, C -> D
        let corpus = CorpusContext::new(vec![
            doc("A", &["B", "C"]),
            doc("B", &["D"]),
            doc("C", &["D"]),
            doc("D", &[]),
        ]);
        assert!(!has_cycle("A", &corpus).is_cycle());
    }

    #[test]
    fn test_dangling_edges_ignored() {
        let corpus = CorpusContext::new(vec![doc("A", &["MISSING", "B"]), doc("B", &[])]);
        assert_eq!(has_cycle("A", &corpus), CycleCheck::Acyclic);
        assert_eq!(has_cycle("UNKNOWN", &corpus), CycleCheck::Acyclic);
    }

    #[test]
    fn test_padded_edge_ids_resolve() {
        let corpus = CorpusContext::new(vec![doc("A", &[" B"]), doc("B", &["A  "])]);
        assert_eq!(
            has_cycle("A", &corpus).path(),
            Some(&["A".to_string(), "B".to_string(), "A".to_string()][..])
        );
    }

    #[test]
    fn test_explored_nodes_visited_once() {
        // Every node depends on all later nodes: many paths, each node entered once
        let ids: Vec<String> = (0..30).map(|i| format!("N{}", i)).collect();
        let docs: Vec<Document> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let deps: Vec<&str> = ids[i + 1..].iter().map(String::as_str).collect();
                doc(id, &deps)
            })
            .collect();
        let corpus = CorpusContext::new(docs);

        let lookups = Cell::new(0usize);
        let result = detect_cycle("N0", |id| {
            lookups.set(lookups.get() + 1);
            corpus.dependencies_of(id)
        });

        assert_eq!(result, CycleCheck::Acyclic);
        // One lookup per node
        assert_eq!(lookups.get(), 30);
    }
}
