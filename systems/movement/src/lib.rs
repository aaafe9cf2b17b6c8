#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement rules for the player and the chasing enemies.

use std::cmp::Ordering;

use droids_core::{Action, Spot};

/// Moves the player one step in the action's direction, clamped to the board.
///
/// Teleport actions leave the player in place; they are resolved by the
/// teleport system instead.
#[must_use]
pub fn move_player(player: Spot, action: Action, board_size: u32) -> Spot {
    match action.delta() {
        Some((dx, dy)) => player.offset(dx, dy, board_size),
        None => player,
    }
}

/// Steps an enemy one cell towards the player on each axis independently.
///
/// There is no obstacle avoidance: enemies may end up stacked on each other
/// or on the player, which the collision resolver and loss checks handle.
#[must_use]
pub fn move_enemy(player: Spot, enemy: Spot) -> Spot {
    Spot::new(
        step_towards(enemy.x(), player.x()),
        step_towards(enemy.y(), player.y()),
    )
}

/// Applies [`move_enemy`] to every enemy, preserving order.
#[must_use]
pub fn advance_enemies(player: Spot, enemies: &[Spot]) -> Vec<Spot> {
    enemies
        .iter()
        .map(|enemy| move_enemy(player, *enemy))
        .collect()
}

fn step_towards(from: u32, to: u32) -> u32 {
    match to.cmp(&from) {
        Ordering::Greater => from + 1,
        Ordering::Less => from - 1,
        Ordering::Equal => from,
    }
}
