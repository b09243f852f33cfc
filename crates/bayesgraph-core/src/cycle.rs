//! Cycle query for candidate arcs.
//!
//! [`would_cycle`] is a read-only check. Mutating operations never call it
//! on their own (unless acyclicity is enforced through the config); callers
//! ask first and decide what to do.

use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::visit::Bfs;
use petgraph::Directed;

use crate::id::NodeId;

/// Returns `true` if adding the arc `parent -> child` would close a cycle,
/// i.e. if `parent` is reachable from `child` along child edges.
///
/// Breadth-first from `child`; every node is visited at most once, so the
/// cost is O(V + E). A self-arc (`parent == child`) counts as a cycle.
pub fn would_cycle<N, E>(
    dag: &StableGraph<N, E, Directed, u32>,
    parent: NodeId,
    child: NodeId,
) -> bool {
    let target: NodeIndex<u32> = parent.into();
    let mut bfs = Bfs::new(dag, child.into());
    while let Some(idx) = bfs.next(dag) {
        if idx == target {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(len: usize) -> (StableGraph<(), (), Directed, u32>, Vec<NodeId>) {
        let mut g = StableGraph::new();
        let ids: Vec<NodeId> = (0..len).map(|_| NodeId::from(g.add_node(()))).collect();
        for pair in ids.windows(2) {
            g.add_edge(pair[0].into(), pair[1].into(), ());
        }
        (g, ids)
    }

    #[test]
    fn closing_a_chain_is_a_cycle() {
        let (g, ids) = chain(4);
        // 0 -> 1 -> 2 -> 3; adding 3 -> 0 closes the loop.
        assert!(would_cycle(&g, ids[3], ids[0]));
    }

    #[test]
    fn forward_shortcut_is_not_a_cycle() {
        let (g, ids) = chain(4);
        assert!(!would_cycle(&g, ids[0], ids[3]));
        assert!(!would_cycle(&g, ids[1], ids[2]));
    }

    #[test]
    fn disconnected_nodes_never_cycle() {
        let mut g: StableGraph<(), (), Directed, u32> = StableGraph::new();
        let a = NodeId::from(g.add_node(()));
        let b = NodeId::from(g.add_node(()));
        assert!(!would_cycle(&g, a, b));
        assert!(!would_cycle(&g, b, a));
    }

    #[test]
    fn self_arc_is_a_cycle() {
        let (g, ids) = chain(1);
        assert!(would_cycle(&g, ids[0], ids[0]));
    }

    #[test]
    fn diamond_terminates_and_detects() {
        // a -> b, a -> c, b -> d, c -> d
        let mut g: StableGraph<(), (), Directed, u32> = StableGraph::new();
        let a = g.add_node(());
        let b = g.add_node(());
        let c = g.add_node(());
        let d = g.add_node(());
        g.add_edge(a, b, ());
        g.add_edge(a, c, ());
        g.add_edge(b, d, ());
        g.add_edge(c, d, ());

        assert!(would_cycle(&g, d.into(), a.into()));
        assert!(!would_cycle(&g, a.into(), d.into()));
        assert!(!would_cycle(&g, b.into(), c.into()));
    }
}
