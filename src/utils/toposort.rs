//! Generic dependency ordering.
//!
//! Used to rank feature-extraction handlers so that a handler never runs
//! before the handlers it depends on, but written against plain callbacks
//! so any edge relation can be ordered.

/// Order `nodes` so that every prerequisite precedes its dependents
/// (leaves-first). Reversing the result gives a roots-first order.
///
/// `count_edges(n)` returns the number of prerequisites of `n`;
/// zero-prerequisite nodes seed the depth-first visit. `has_edge(from,
/// to)` holds when `from` depends on `to`. Each node is appended only
/// after all of its prerequisites have been appended (post-order).
///
/// Disconnected graphs and diamonds are handled; the output of a cyclic
/// edge relation is unspecified, but the function always terminates and
/// emits every node exactly once.
pub fn topological_order<T, C, E>(nodes: &[T], count_edges: C, has_edge: E) -> Vec<T>
where
    T: Clone,
    C: Fn(&T) -> usize,
    E: Fn(&T, &T) -> bool,
{
    let n = nodes.len();
    let prerequisites: Vec<Vec<usize>> = (0..n)
        .map(|i| {
            (0..n)
                .filter(|&j| i != j && has_edge(&nodes[i], &nodes[j]))
                .collect()
        })
        .collect();

    let mut visited = vec![false; n];
    let mut order: Vec<usize> = Vec::with_capacity(n);

    let seeds = (0..n).filter(|&i| count_edges(&nodes[i]) == 0);
    let rest = 0..n;
    for start in seeds.chain(rest) {
        if visited[start] {
            continue;
        }
        // Iterative DFS; (node, next prerequisite to descend into)
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        visited[start] = true;
        while let Some((node, next)) = stack.pop() {
            if let Some(&prereq) = prerequisites[node].get(next) {
                stack.push((node, next + 1));
                if !visited[prereq] {
                    visited[prereq] = true;
                    stack.push((prereq, 0));
                }
            } else {
                order.push(node);
            }
        }
    }

    order.into_iter().map(|i| nodes[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// (node, prerequisites) pairs drive the callbacks in these tests.
    fn order(nodes: &[(&'static str, Vec<&'static str>)]) -> Vec<&'static str> {
        let ordered = topological_order(
            &nodes.iter().map(|(n, d)| (*n, d.clone())).collect::<Vec<_>>(),
            |(_, deps)| deps.len(),
            |(_, deps), (to, _)| deps.contains(to),
        );
        ordered.into_iter().map(|(n, _)| n).collect()
    }

    fn assert_deps_first(nodes: &[(&'static str, Vec<&'static str>)], ordered: &[&'static str]) {
        for (node, deps) in nodes {
            let node_pos = ordered.iter().position(|n| n == node).unwrap();
            for dep in deps {
                let dep_pos = ordered.iter().position(|n| n == dep).unwrap();
                assert!(
                    dep_pos < node_pos,
                    "{dep} must precede {node} in {ordered:?}"
                );
            }
        }
    }

    #[test]
    fn test_chain() {
        let nodes = [
            ("c", vec!["b"]),
            ("b", vec!["a"]),
            ("a", vec![]),
        ];
        let ordered = order(&nodes);
        assert_eq!(ordered, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_diamond() {
        let nodes = [
            ("top", vec!["left", "right"]),
            ("left", vec!["bottom"]),
            ("right", vec!["bottom"]),
            ("bottom", vec![]),
        ];
        let ordered = order(&nodes);
        assert_eq!(ordered.len(), 4);
        assert_deps_first(&nodes, &ordered);
        assert_eq!(ordered[0], "bottom");
        assert_eq!(ordered[3], "top");
    }

    #[test]
    fn test_disconnected_components() {
        let nodes = [
            ("b", vec!["a"]),
            ("a", vec![]),
            ("y", vec!["x"]),
            ("x", vec![]),
            ("lone", vec![]),
        ];
        let ordered = order(&nodes);
        assert_eq!(ordered.len(), 5);
        assert_deps_first(&nodes, &ordered);
    }

    #[test]
    fn test_cycle_terminates() {
        let nodes = [("a", vec!["b"]), ("b", vec!["a"])];
        let ordered = order(&nodes);
        // Order unspecified, but every node appears exactly once
        assert_eq!(ordered.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_any_permutation_orders_deps_first(seed in 0u64..256) {
            let mut nodes = vec![
                ("genes", vec![]),
                ("proteins", vec!["genes"]),
                ("transcripts", vec!["proteins"]),
                ("xrefs", vec!["genes", "proteins"]),
                ("features", vec!["proteins"]),
                ("standalone", vec![]),
            ];
            // Fisher-Yates with a deterministic seed per case
            let mut state = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
            for i in (1..nodes.len()).rev() {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                nodes.swap(i, (state as usize) % (i + 1));
            }
            let ordered = order(&nodes);
            prop_assert_eq!(ordered.len(), nodes.len());
            for (node, deps) in &nodes {
                let node_pos = ordered.iter().position(|n| n == node).unwrap();
                for dep in deps {
                    let dep_pos = ordered.iter().position(|n| n == dep).unwrap();
                    prop_assert!(dep_pos < node_pos);
                }
            }
        }
    }
}
