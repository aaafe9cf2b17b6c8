#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Teleport system offering limited safe jumps and unlimited risky ones.

use std::collections::HashSet;

use droids_core::{Mulberry32, Spot, SpotKey, TeleportRefusal, WreckSet};

/// Result of a safe teleport request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SafeTeleport {
    /// A destination was drawn; the caller spends one charge.
    Landed(Spot),
    /// Nothing happened and no charge may be spent.
    Refused(TeleportRefusal),
}

/// Lists every cell free of enemies and wrecks, row by row.
///
/// The player's current cell is a valid destination.
#[must_use]
pub fn safe_destinations(enemies: &[Spot], wrecks: &WreckSet, board_size: u32) -> Vec<Spot> {
    let occupied: HashSet<SpotKey> = enemies.iter().map(|enemy| enemy.key()).collect();
    (0..board_size)
        .flat_map(|x| (0..board_size).map(move |y| Spot::new(x, y)))
        .filter(|spot| !occupied.contains(&spot.key()) && !wrecks.contains(*spot))
        .collect()
}

/// Draws a safe destination when a charge and a free cell are available.
///
/// A refusal consumes nothing from `rng`.
pub fn safe_teleport(
    teleports: u32,
    enemies: &[Spot],
    wrecks: &WreckSet,
    board_size: u32,
    rng: &mut Mulberry32,
) -> SafeTeleport {
    if teleports == 0 {
        return SafeTeleport::Refused(TeleportRefusal::NoCharges);
    }

    let candidates = safe_destinations(enemies, wrecks, board_size);
    if candidates.is_empty() {
        return SafeTeleport::Refused(TeleportRefusal::NoSafeCell);
    }

    let last = (candidates.len() - 1) as u32;
    let index = rng.random_int(0, last) as usize;
    SafeTeleport::Landed(candidates[index])
}

/// Draws any cell on the board, row first, regardless of what occupies it.
pub fn risky_teleport(board_size: u32, rng: &mut Mulberry32) -> Spot {
    let last = board_size.saturating_sub(1);
    let x = rng.random_int(0, last);
    let y = rng.random_int(0, last);
    Spot::new(x, y)
}
