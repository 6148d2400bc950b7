//! Property tests for the role hierarchy graph.
//!
//! Random edge-insertion sequences must never produce a cycle, and a
//! rejected mutation must leave every closure unchanged.

use proptest::prelude::*;
use rolegate_hierarchy::RoleGraph;
use std::collections::HashSet;

const ROLE_COUNT: usize = 8;

fn role_name(i: usize) -> String {
    format!("role{i}")
}

fn build(edges: &[(usize, usize)]) -> RoleGraph {
    let graph = RoleGraph::new();
    for i in 0..ROLE_COUNT {
        graph.add_role(&role_name(i)).unwrap();
    }
    for (parent, child) in edges {
        // Rejections (cycles, duplicates) are expected along the way.
        let _ = graph.add_inheritance(&role_name(*parent), &role_name(*child));
    }
    graph
}

proptest! {
    #[test]
    fn never_self_reachable(edges in proptest::collection::vec((0..ROLE_COUNT, 0..ROLE_COUNT), 0..40)) {
        let graph = build(&edges);
        for i in 0..ROLE_COUNT {
            let name = role_name(i);
            prop_assert!(!graph.ascendants(&name).unwrap().contains(&name));
            prop_assert!(!graph.descendants(&name).unwrap().contains(&name));
        }
    }

    #[test]
    fn accepted_edge_is_observable(edges in proptest::collection::vec((0..ROLE_COUNT, 0..ROLE_COUNT), 0..40)) {
        let graph = RoleGraph::new();
        for i in 0..ROLE_COUNT {
            graph.add_role(&role_name(i)).unwrap();
        }
        for (parent, child) in &edges {
            let parent = role_name(*parent);
            let child = role_name(*child);
            if graph.add_inheritance(&parent, &child).is_ok() {
                prop_assert!(graph.ascendants(&child).unwrap().contains(&parent));
                prop_assert!(graph.descendants(&parent).unwrap().contains(&child));
            }
        }
    }

    #[test]
    fn rejected_edge_changes_nothing(edges in proptest::collection::vec((0..ROLE_COUNT, 0..ROLE_COUNT), 0..40)) {
        let graph = RoleGraph::new();
        for i in 0..ROLE_COUNT {
            graph.add_role(&role_name(i)).unwrap();
        }
        for (parent, child) in &edges {
            let parent = role_name(*parent);
            let child = role_name(*child);

            let before: Vec<HashSet<String>> = (0..ROLE_COUNT)
                .map(|i| graph.ascendants(&role_name(i)).unwrap())
                .collect();

            if graph.add_inheritance(&parent, &child).is_err() {
                let after: Vec<HashSet<String>> = (0..ROLE_COUNT)
                    .map(|i| graph.ascendants(&role_name(i)).unwrap())
                    .collect();
                prop_assert_eq!(&before, &after);
            }
        }
    }
}

#[test]
fn reverse_orders_both_rejected() {
    // Cycle prevention must not depend on insertion order.
    let forward = build(&[(0, 1), (1, 0)]);
    assert!(forward.ascendants(&role_name(1)).unwrap().contains(&role_name(0)));
    assert!(!forward.ascendants(&role_name(0)).unwrap().contains(&role_name(1)));

    let backward = build(&[(1, 0), (0, 1)]);
    assert!(backward.ascendants(&role_name(0)).unwrap().contains(&role_name(1)));
    assert!(!backward.ascendants(&role_name(1)).unwrap().contains(&role_name(0)));
}
