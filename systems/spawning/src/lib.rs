#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that populates a level with enemies.

use std::collections::HashSet;

use droids_core::{Mulberry32, Spot, SpotKey};
use thiserror::Error;

/// Minimum number of enemies placed on any level.
const MIN_ENEMIES: u32 = 2;
/// Additional enemies per level number.
const ENEMIES_PER_LEVEL: u32 = 4;
/// Rejection-sampling budget per board cell used by [`spawn_enemies`].
pub const ATTEMPTS_PER_CELL: u64 = 64;

/// Reasons a level could not be populated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// The board has fewer free cells than the level requires.
    #[error("level needs {requested} enemies but the board only has {capacity} free cells")]
    BoardSaturated {
        /// Enemies required by the level.
        requested: u32,
        /// Cells available once the player's cell is excluded.
        capacity: u64,
    },
    /// Rejection sampling kept hitting occupied cells.
    #[error("placed {placed} of {requested} enemies before giving up after {attempts} draws")]
    AttemptsExhausted {
        /// Enemies placed before the budget ran out.
        placed: u32,
        /// Enemies required by the level.
        requested: u32,
        /// Coordinate draws performed.
        attempts: u64,
    },
}

/// Number of enemies spawned on the provided level.
#[must_use]
pub fn enemy_count(level: u32) -> u32 {
    level.saturating_mul(ENEMIES_PER_LEVEL).max(MIN_ENEMIES)
}

/// Places the level's enemies on distinct cells away from the player.
///
/// Coordinates are drawn row first, then column, and rejected while they hit
/// the player or an already placed enemy, so the same stream and level always
/// yield the same enemies in the same order. A board that cannot fit the
/// enemies is reported before any value is drawn from `rng`. Sampling gives
/// up after [`ATTEMPTS_PER_CELL`] draws per board cell.
pub fn spawn_enemies(
    level: u32,
    player: Spot,
    board_size: u32,
    rng: &mut Mulberry32,
) -> Result<Vec<Spot>, SpawnError> {
    let cells = u64::from(board_size) * u64::from(board_size);
    spawn_enemies_within(
        level,
        player,
        board_size,
        cells.saturating_mul(ATTEMPTS_PER_CELL),
        rng,
    )
}

/// [`spawn_enemies`] with an explicit limit on coordinate draws.
///
/// Fails with [`SpawnError::AttemptsExhausted`] once `max_attempts` draws
/// did not place every enemy.
pub fn spawn_enemies_within(
    level: u32,
    player: Spot,
    board_size: u32,
    max_attempts: u64,
    rng: &mut Mulberry32,
) -> Result<Vec<Spot>, SpawnError> {
    let requested = enemy_count(level);
    let cells = u64::from(board_size) * u64::from(board_size);
    let capacity = cells.saturating_sub(1);
    if u64::from(requested) > capacity {
        return Err(SpawnError::BoardSaturated {
            requested,
            capacity,
        });
    }

    let mut blocked: HashSet<SpotKey> = HashSet::with_capacity(requested as usize + 1);
    let _ = blocked.insert(player.key());
    let mut enemies = Vec::with_capacity(requested as usize);
    let mut attempts: u64 = 0;

    while enemies.len() < requested as usize {
        if attempts >= max_attempts {
            return Err(SpawnError::AttemptsExhausted {
                placed: enemies.len() as u32,
                requested,
                attempts,
            });
        }
        attempts += 1;

        let x = rng.random_int(0, board_size - 1);
        let y = rng.random_int(0, board_size - 1);
        let spot = Spot::new(x, y);
        if blocked.insert(spot.key()) {
            enemies.push(spot);
        }
    }

    Ok(enemies)
}
