//! Text rendering of the board and status line.

use droids_core::{GameState, Spot};
use droids_world::{
    query::{self, Cell},
    World,
};

const PLAYER: char = '@';
const ENEMY: char = 'X';
const WRECK: char = '*';
const EMPTY: char = '.';

/// Draws the board with a border; rows grow downwards, columns rightwards.
pub(crate) fn render(world: &World) -> String {
    let size = query::config(world).board_size();
    let width = usize::try_from(size).unwrap_or(0);
    let border = format!("+{}+\n", "-".repeat(width));

    let mut out = String::with_capacity((width + 3) * (width + 2));
    out.push_str(&border);
    for row in 0..size {
        out.push('|');
        for column in 0..size {
            out.push(glyph(query::cell_contents(world, Spot::new(row, column))));
        }
        out.push_str("|\n");
    }
    out.push_str(&border);
    out
}

/// Summary of the run shown under the board.
pub(crate) fn status_line(state: &GameState) -> String {
    format!(
        "Level {} | Score {} | Enemies {} | Teleports {} | Turn {} | Seed {}",
        state.level,
        state.score,
        state.enemies.len(),
        state.teleports,
        state.turns,
        state.seed
    )
}

fn glyph(cell: Cell) -> char {
    match cell {
        Cell::Empty => EMPTY,
        Cell::Player => PLAYER,
        Cell::Enemy => ENEMY,
        Cell::Wreck => WRECK,
    }
}
