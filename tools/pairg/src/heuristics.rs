//! Matrix-free reachability check
//!
//! Level-limited BFS over the raw adjacency matrix. It answers one
//! `(src, target)` pair for the upper bound only, so it agrees with a
//! validity matrix built with `d_low = 0`.

use std::collections::VecDeque;
use tracing::warn;

use crate::matrix::BoolCsr;

/// True if `target` is reachable from `src` by a walk of at most `d_up` edges.
///
/// Out-of-range vertices and non-square matrices are logged and answer
/// `false`.
pub fn reachable_within_bound(a: &BoolCsr, d_up: u32, src: usize, target: usize) -> bool {
    if !a.is_square() {
        warn!(
            n_rows = a.n_rows(),
            n_cols = a.n_cols(),
            "bfs needs a square adjacency matrix"
        );
        return false;
    }
    if src >= a.n_rows() || target >= a.n_cols() {
        warn!(
            src,
            target,
            n_rows = a.n_rows(),
            n_cols = a.n_cols(),
            "bfs query out of range"
        );
        return false;
    }
    if src == target {
        return true;
    }

    let mut visited = vec![false; a.n_rows()];
    // None marks the end of a level
    let mut queue: VecDeque<Option<u32>> = VecDeque::new();
    visited[src] = true;
    queue.push_back(Some(src as u32));
    queue.push_back(None);

    let mut level = 0u32;
    while level <= d_up {
        let Some(front) = queue.pop_front() else {
            break;
        };
        match front {
            None => {
                level += 1;
                queue.push_back(None);
                if queue.front() == Some(&None) {
                    // nothing new discovered on the last level
                    break;
                }
            }
            Some(v) if v as usize == target => return true,
            Some(v) => {
                for &next in a.row(v as usize) {
                    let seen = &mut visited[next as usize];
                    if !*seen {
                        *seen = true;
                        queue.push_back(Some(next));
                    }
                }
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: usize) -> BoolCsr {
        let offsets = (0..=n as u64).map(|i| i.min(n as u64 - 1)).collect();
        let columns = (1..n as u32).collect();
        BoolCsr::from_parts(n, n, offsets, columns).unwrap()
    }

    #[test]
    fn test_chain_distances() {
        let a = chain(20);
        assert!(reachable_within_bound(&a, 5, 0, 5));
        assert!(!reachable_within_bound(&a, 4, 0, 5));
        assert!(reachable_within_bound(&a, 100, 3, 19));
        // edges are directed
        assert!(!reachable_within_bound(&a, 100, 5, 0));
    }

    #[test]
    fn test_self_pair_always_reachable() {
        let a = chain(3);
        assert!(reachable_within_bound(&a, 0, 2, 2));
        assert!(!reachable_within_bound(&a, 0, 0, 1));
    }

    #[test]
    fn test_cycle_terminates() {
        // 0 -> 1 -> 2 -> 0, 3 isolated
        let a = BoolCsr::from_parts(4, 4, vec![0, 1, 2, 3, 3], vec![1, 2, 0]).unwrap();
        assert!(reachable_within_bound(&a, 2, 1, 0));
        assert!(!reachable_within_bound(&a, 1_000_000, 0, 3));
    }

    #[test]
    fn test_shortest_walk_counts_not_first_discovery() {
        // 0 -> 1 -> 2 -> 3 and shortcut 0 -> 3
        let a = BoolCsr::from_parts(4, 4, vec![0, 2, 3, 4, 4], vec![1, 3, 2, 3]).unwrap();
        assert!(reachable_within_bound(&a, 1, 0, 3));
        assert!(!reachable_within_bound(&a, 1, 0, 2));
        assert!(reachable_within_bound(&a, 2, 0, 2));
    }

    #[test]
    fn test_non_square_matrix_is_false() {
        let a = BoolCsr::from_parts(1, 3, vec![0, 1], vec![2]).unwrap();
        assert!(!reachable_within_bound(&a, 3, 0, 1));
        assert!(!reachable_within_bound(&a, 3, 0, 0));
    }

    #[test]
    fn test_out_of_range_is_false() {
        let a = chain(3);
        assert!(!reachable_within_bound(&a, 5, 3, 0));
        assert!(!reachable_within_bound(&a, 5, 0, 7));
    }
}
