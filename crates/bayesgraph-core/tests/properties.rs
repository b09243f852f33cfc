//! Property tests: structural invariants hold across random edit sequences.

use std::collections::{HashMap, HashSet};

use bayesgraph_core::{BayesGraph, LayoutOnly, NodeId, VariableId};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Edit {
    Create,
    DeleteNode(usize),
    Arc(usize, usize),
    DeleteArc(usize, usize),
    Domain(usize, usize),
    Rename(usize, String),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        3 => Just(Edit::Create),
        1 => any::<usize>().prop_map(Edit::DeleteNode),
        4 => (any::<usize>(), any::<usize>()).prop_map(|(p, c)| Edit::Arc(p, c)),
        1 => (any::<usize>(), any::<usize>()).prop_map(|(p, c)| Edit::DeleteArc(p, c)),
        2 => (any::<usize>(), 1usize..4).prop_map(|(n, k)| Edit::Domain(n, k)),
        1 => (any::<usize>(), "[a-c ]{1,3}").prop_map(|(n, s)| Edit::Rename(n, s)),
    ]
}

fn pick(graph: &BayesGraph<LayoutOnly>, index: usize) -> Option<NodeId> {
    let count = graph.node_count();
    if count == 0 {
        return None;
    }
    graph.node_ids().nth(index % count)
}

/// Applies an edit, only adding arcs that pass the cycle query.
fn apply(graph: &mut BayesGraph<LayoutOnly>, edit: &Edit) {
    match edit {
        Edit::Create => {
            graph.create_node();
        }
        Edit::DeleteNode(n) => {
            if let Some(id) = pick(graph, *n) {
                graph.delete_node(id).unwrap();
            }
        }
        Edit::Arc(p, c) => {
            if let (Some(parent), Some(child)) = (pick(graph, *p), pick(graph, *c)) {
                if !graph.would_cycle(parent, child).unwrap() {
                    graph.create_arc(parent, child).unwrap();
                }
            }
        }
        Edit::DeleteArc(p, c) => {
            if let (Some(parent), Some(child)) = (pick(graph, *p), pick(graph, *c)) {
                graph.delete_arc(parent, child).unwrap();
            }
        }
        Edit::Domain(n, k) => {
            if let Some(id) = pick(graph, *n) {
                let values = (0..*k).map(|i| format!("v{i}")).collect();
                graph.change_domain(id, values).unwrap();
            }
        }
        Edit::Rename(n, name) => {
            if let Some(id) = pick(graph, *n) {
                graph.rename_node(id, name).unwrap();
            }
        }
    }
}

fn is_acyclic(graph: &BayesGraph<LayoutOnly>) -> bool {
    // Kahn's algorithm over the public parent lists.
    let mut in_degree: HashMap<NodeId, usize> = graph
        .node_ids()
        .map(|id| (id, graph.parents(id).len()))
        .collect();
    let mut ready: Vec<NodeId> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(&id, _)| id)
        .collect();
    let mut visited = 0;
    while let Some(id) = ready.pop() {
        visited += 1;
        for child in graph.children(id) {
            let degree = in_degree.get_mut(&child).unwrap();
            *degree -= 1;
            if *degree == 0 {
                ready.push(child);
            }
        }
    }
    visited == graph.node_count()
}

fn check_invariants(graph: &BayesGraph<LayoutOnly>) -> Result<(), TestCaseError> {
    prop_assert!(is_acyclic(graph));

    let mut names = HashSet::new();
    for (id, node) in graph.nodes() {
        prop_assert!(names.insert(node.name().to_string()), "duplicate name {}", node.name());
        prop_assert!(!node.name().contains(' '));

        for &parent in node.parents() {
            prop_assert!(graph.children(parent).contains(&id));
        }
        for child in graph.children(id) {
            prop_assert!(graph.parents(child).contains(&id));
        }

        let mut expected: Vec<VariableId> = vec![node.variable()];
        let mut cards = vec![node.cardinality()];
        for &parent in node.parents() {
            let parent = graph.node(parent).unwrap();
            expected.push(parent.variable());
            cards.push(parent.cardinality());
        }
        let layout = node.distribution().layout();
        prop_assert_eq!(layout.dependencies(), expected.as_slice());
        prop_assert_eq!(layout.cardinalities(), cards.as_slice());
    }

    let flat = graph.flat_model();
    prop_assert_eq!(flat.variables.len(), graph.node_count());
    prop_assert_eq!(flat.functions.len(), graph.node_count());
    for (variable, function) in flat.entries() {
        prop_assert_eq!(function.variable(), Some(variable.id));
    }
    prop_assert_eq!(flat, &graph.export());
    Ok(())
}

proptest! {
    #[test]
    fn invariants_hold_after_every_edit(edits in prop::collection::vec(edit(), 0..60)) {
        let mut graph = BayesGraph::new(LayoutOnly);
        for edit in &edits {
            apply(&mut graph, edit);
            check_invariants(&graph)?;
        }
    }

    #[test]
    fn roundtrip_preserves_structure(edits in prop::collection::vec(edit(), 0..40)) {
        let mut graph = BayesGraph::new(LayoutOnly);
        for edit in &edits {
            apply(&mut graph, edit);
        }

        let copy = BayesGraph::from_flat(graph.export(), LayoutOnly).unwrap();
        prop_assert_eq!(copy.node_count(), graph.node_count());
        for (id, node) in graph.nodes() {
            let twin_id = copy.node_by_name(node.name()).unwrap();
            let twin = copy.node(twin_id).unwrap();
            prop_assert_eq!(twin.domain(), node.domain());

            let names_of = |g: &BayesGraph<LayoutOnly>, ids: &[NodeId]| -> Vec<String> {
                ids.iter().map(|&p| g.node(p).unwrap().name().to_string()).collect()
            };
            prop_assert_eq!(names_of(&copy, twin.parents()), names_of(&graph, graph.parents(id)));
        }
        check_invariants(&copy)?;
    }

    #[test]
    fn generated_names_are_always_fresh(ops in prop::collection::vec(any::<Option<usize>>(), 0..80)) {
        let mut graph = BayesGraph::new(LayoutOnly);
        for op in ops {
            match op {
                Some(n) => {
                    if let Some(id) = pick(&graph, n) {
                        graph.delete_node(id).unwrap();
                    }
                }
                None => {
                    let before: HashSet<String> =
                        graph.nodes().map(|(_, n)| n.name().to_string()).collect();
                    let id = graph.create_node();
                    prop_assert!(!before.contains(graph.node(id).unwrap().name()));
                }
            }
        }
    }

    #[test]
    fn export_is_idempotent(edits in prop::collection::vec(edit(), 0..30)) {
        let mut graph = BayesGraph::new(LayoutOnly);
        for edit in &edits {
            apply(&mut graph, edit);
        }
        prop_assert_eq!(graph.export(), graph.export());
    }
}
