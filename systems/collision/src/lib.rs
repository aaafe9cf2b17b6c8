#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure collision system that turns stacked enemies into wrecks.

use std::collections::HashMap;

use droids_core::{Spot, SpotKey, WreckSet};

/// Outcome of resolving one turn of enemy movement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Enemies that survived, in input order.
    pub survivors: Vec<Spot>,
    /// Previous wrecks plus every cell where an enemy died this turn.
    pub wrecks: WreckSet,
    /// Number of enemies destroyed.
    pub destroyed: u32,
    /// Distinct cells where enemies died, in order of first occurrence.
    pub sites: Vec<Spot>,
}

/// Removes enemies that share a cell or drove into an existing wreck.
///
/// Resolution counts occupants per cell rather than processing enemies one
/// at a time, so the result does not depend on enemy order. Every enemy on a
/// shared cell is destroyed, and so is a lone enemy entering a wreck.
#[must_use]
pub fn resolve(moved: &[Spot], wrecks: &WreckSet) -> Resolution {
    let mut occupancy: HashMap<SpotKey, u32> = HashMap::with_capacity(moved.len());
    for enemy in moved {
        *occupancy.entry(enemy.key()).or_insert(0) += 1;
    }

    let mut survivors = Vec::with_capacity(moved.len());
    let mut fresh = WreckSet::new();
    let mut sites = Vec::new();
    let mut destroyed = 0;
    for enemy in moved {
        let stacked = occupancy.get(&enemy.key()).copied().unwrap_or(0) > 1;
        if stacked || wrecks.contains(*enemy) {
            destroyed += 1;
            if fresh.insert(*enemy) {
                sites.push(*enemy);
            }
        } else {
            survivors.push(*enemy);
        }
    }

    Resolution {
        survivors,
        wrecks: wrecks.union(&fresh),
        destroyed,
        sites,
    }
}
