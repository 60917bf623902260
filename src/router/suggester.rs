//! Route discovery over the pool graph.

use std::collections::HashSet;
use std::sync::Arc;

use crate::pool::Pool;
use crate::types::{AssetId, Hop};

/// All simple paths from `asset_in` to `asset_out` of at most
/// `max_hops` hops.
///
/// A path never revisits a pool or an asset. Results are deterministic
/// for a fixed pool listing: depth-first in listing order, then stable
/// sorted by length so direct pools come first.
pub fn get_paths(
    asset_in: AssetId,
    asset_out: AssetId,
    pools: &[Arc<dyn Pool>],
    max_hops: usize,
) -> Vec<Vec<Hop>> {
    if asset_in == asset_out || max_hops == 0 {
        return Vec::new();
    }
    let mut paths = Vec::new();
    let mut current = Vec::new();
    let mut visited = HashSet::from([asset_in]);
    walk(asset_in, asset_out, pools, max_hops, &mut current, &mut visited, &mut paths);
    paths.sort_by_key(Vec::len);
    paths
}

fn walk(
    position: AssetId,
    target: AssetId,
    pools: &[Arc<dyn Pool>],
    max_hops: usize,
    current: &mut Vec<Hop>,
    visited: &mut HashSet<AssetId>,
    paths: &mut Vec<Vec<Hop>>,
) {
    if current.len() == max_hops {
        return;
    }
    for pool in pools {
        if current.iter().any(|hop| &hop.pool_id == pool.id()) {
            continue;
        }
        if !pool.tokens().iter().any(|token| token.id == position) {
            continue;
        }
        for token in pool.tokens() {
            let next = token.id;
            if next == position || visited.contains(&next) {
                continue;
            }
            current.push(Hop {
                pool_id: pool.id().clone(),
                pool_type: pool.pool_type(),
                asset_in: position,
                asset_out: next,
            });
            if next == target {
                paths.push(current.clone());
            } else {
                visited.insert(next);
                walk(next, target, pools, max_hops, current, visited, paths);
                visited.remove(&next);
            }
            current.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{PoolLimits, PoolToken, XykPool};

    fn token(id: u32) -> PoolToken {
        PoolToken { id, symbol: format!("TKN{id}"), decimals: 6, balance: 1_000_000 }
    }

    fn xyk(id: &str, a: u32, b: u32) -> Arc<dyn Pool> {
        Arc::new(XykPool::new(id, [token(a), token(b)], PoolLimits::default()))
    }

    #[test]
    fn test_direct_path_sorts_first() {
        let pools = vec![xyk("xyk-1-2", 1, 2), xyk("xyk-2-3", 2, 3), xyk("xyk-1-3", 1, 3)];
        let paths = get_paths(1, 3, &pools, 4);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].len(), 1);
        assert_eq!(paths[0][0].pool_id, "xyk-1-3");
        assert_eq!(paths[1].len(), 2);
        assert_eq!(paths[1][0].pool_id, "xyk-1-2");
        assert_eq!(paths[1][1].pool_id, "xyk-2-3");
    }

    #[test]
    fn test_hops_chain_assets() {
        let pools = vec![xyk("xyk-1-2", 1, 2), xyk("xyk-2-3", 2, 3)];
        let paths = get_paths(1, 3, &pools, 4);
        assert_eq!(paths.len(), 1);
        let path = &paths[0];
        assert_eq!(path[0].asset_in, 1);
        assert_eq!(path[0].asset_out, 2);
        assert_eq!(path[1].asset_in, 2);
        assert_eq!(path[1].asset_out, 3);
    }

    #[test]
    fn test_max_hops_bounds_search() {
        let pools = vec![xyk("xyk-1-2", 1, 2), xyk("xyk-2-3", 2, 3), xyk("xyk-1-3", 1, 3)];
        let paths = get_paths(1, 3, &pools, 1);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0][0].pool_id, "xyk-1-3");
    }

    #[test]
    fn test_no_asset_revisited() {
        // A diamond plus a shortcut: every discovered path must be
        // simple.
        let pools = vec![
            xyk("xyk-1-2", 1, 2),
            xyk("xyk-2-3", 2, 3),
            xyk("xyk-1-3", 1, 3),
            xyk("xyk-3-4", 3, 4),
        ];
        let paths = get_paths(1, 4, &pools, 4);
        assert_eq!(paths.len(), 2);
        for path in &paths {
            let mut seen = HashSet::from([1u32]);
            for hop in path {
                assert!(seen.insert(hop.asset_out));
            }
        }
    }

    #[test]
    fn test_same_asset_yields_nothing() {
        let pools = vec![xyk("xyk-1-2", 1, 2)];
        assert!(get_paths(1, 1, &pools, 4).is_empty());
    }

    #[test]
    fn test_disconnected_assets_yield_nothing() {
        let pools = vec![xyk("xyk-1-2", 1, 2), xyk("xyk-3-4", 3, 4)];
        assert!(get_paths(1, 4, &pools, 4).is_empty());
    }
}
