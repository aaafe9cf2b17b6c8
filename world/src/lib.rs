#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state management for Droids.
//!
//! The [`World`] owns the [`GameState`] of a run together with the random
//! stream that drives teleports and level respawns. Every mutation goes
//! through [`apply`], which processes one [`Command`] and reports the outcome
//! as [`Event`] values; [`World::step`] and [`World::reset`] are shorthands
//! for callers that only care about the resulting state.

use droids_core::{
    Action, CalendarDate, CatchCause, Command, Event, GameState, GameStatus, Mulberry32,
    RunSummary, Spot, WreckSet, POINTS_PER_CLEARED_LEVEL, POINTS_PER_DESTROYED_ENEMY,
};
use droids_system_collision::resolve;
use droids_system_movement::{advance_enemies, move_player};
use droids_system_spawning::{spawn_enemies, SpawnError};
use droids_system_teleport::{risky_teleport, safe_teleport, SafeTeleport};
use thiserror::Error;
use tracing::{debug, info, warn};

const DEFAULT_BOARD_SIZE: u32 = 20;
const DEFAULT_SAFE_TELEPORTS: u32 = 3;

/// Board dimensions and per-run allowances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    board_size: u32,
    safe_teleports: u32,
}

impl Config {
    /// Creates a configuration for a square board.
    #[must_use]
    pub const fn new(board_size: u32, safe_teleports: u32) -> Self {
        Self {
            board_size,
            safe_teleports,
        }
    }

    /// Edge length of the square board.
    #[must_use]
    pub const fn board_size(&self) -> u32 {
        self.board_size
    }

    /// Safe teleport charges granted at the start of a run.
    #[must_use]
    pub const fn safe_teleports(&self) -> u32 {
        self.safe_teleports
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_SIZE, DEFAULT_SAFE_TELEPORTS)
    }
}

/// Failures surfaced by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum WorldError {
    /// The board must contain at least one cell.
    #[error("board size must be at least 1, got {0}")]
    InvalidBoardSize(u32),
    /// A level could not be populated.
    #[error("could not spawn enemies: {0}")]
    Spawn(#[from] SpawnError),
}

/// Represents the authoritative Droids world state.
#[derive(Clone, Debug)]
pub struct World {
    config: Config,
    state: GameState,
    rng: Mulberry32,
}

impl World {
    /// Starts a new run from the provided seed.
    pub fn new(seed: u64, config: Config) -> Result<Self, WorldError> {
        let state = initial_state(seed, config)?;
        info!(seed, board_size = config.board_size(), "run started");
        Ok(Self {
            config,
            state,
            rng: Mulberry32::from_seed(seed),
        })
    }

    /// Resumes a run from an existing state.
    ///
    /// The random stream restarts from `state.seed`. The caller is
    /// responsible for the state fitting the configured board.
    #[must_use]
    pub fn with_state(config: Config, state: GameState) -> Self {
        let rng = Mulberry32::from_seed(state.seed);
        Self { config, state, rng }
    }

    /// Processes one turn and returns the resulting state.
    pub fn step(&mut self, action: Action) -> Result<&GameState, WorldError> {
        let mut events = Vec::new();
        apply(
            self,
            Command::Step {
                action: Some(action),
            },
            &mut events,
        )?;
        Ok(&self.state)
    }

    /// Processes one turn from a keyboard symbol.
    ///
    /// Unrecognized symbols move nothing but still let the enemies advance.
    pub fn step_symbol(&mut self, symbol: char) -> Result<&GameState, WorldError> {
        let mut events = Vec::new();
        apply(
            self,
            Command::Step {
                action: Action::from_symbol(symbol),
            },
            &mut events,
        )?;
        Ok(&self.state)
    }

    /// Restarts the run at level 1 from the provided seed.
    ///
    /// The world is left untouched when the new run cannot be created.
    pub fn reset(&mut self, seed: u64) -> Result<(), WorldError> {
        let mut events = Vec::new();
        apply(self, Command::Reset { seed }, &mut events)
    }

    /// Read-only access to the current state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Configuration the world was created with.
    #[must_use]
    pub const fn config(&self) -> Config {
        self.config
    }

    /// Shareable projection of the current run.
    #[must_use]
    pub fn run_summary(&self) -> RunSummary {
        self.state.run_summary()
    }

    fn process_turn(
        &mut self,
        action: Option<Action>,
        out_events: &mut Vec<Event>,
    ) -> Result<(), WorldError> {
        if !self.state.is_playing() {
            return Ok(());
        }

        let board_size = self.config.board_size();
        self.state.turns = self.state.turns.saturating_add(1);
        debug!(turn = self.state.turns, action = ?action, "processing turn");

        match action {
            Some(Action::SafeTeleport) => self.safe_teleport(out_events),
            Some(Action::RiskyTeleport) => {
                let to = risky_teleport(board_size, &mut self.rng);
                self.state.player = to;
                debug!(to = %to, "risky teleport");
                out_events.push(Event::RiskyTeleported { to });
            }
            Some(action) => {
                let from = self.state.player;
                let to = move_player(from, action, board_size);
                self.state.player = to;
                out_events.push(Event::PlayerMoved { from, to });
            }
            None => {}
        }

        let player = self.state.player;
        if self.state.has_enemy_at(player) || self.state.wrecks.contains(player) {
            self.catch_player(CatchCause::PlayerEntered, out_events);
            return Ok(());
        }

        let moved = advance_enemies(player, &self.state.enemies);
        out_events.push(Event::EnemiesAdvanced { count: moved.len() });
        if moved.contains(&player) {
            self.catch_player(CatchCause::EnemyArrived, out_events);
            return Ok(());
        }

        let resolution = resolve(&moved, &self.state.wrecks);
        self.state.enemies = resolution.survivors;
        self.state.wrecks = resolution.wrecks;
        if resolution.destroyed > 0 {
            self.state.score = self
                .state
                .score
                .saturating_add(u64::from(resolution.destroyed) * POINTS_PER_DESTROYED_ENEMY);
            debug!(
                destroyed = resolution.destroyed,
                score = self.state.score,
                "enemies destroyed"
            );
            out_events.push(Event::EnemiesDestroyed {
                count: resolution.destroyed,
                cells: resolution.sites,
            });
        }

        if self.state.enemies.is_empty() {
            self.level_up(out_events)?;
        }

        Ok(())
    }

    fn safe_teleport(&mut self, out_events: &mut Vec<Event>) {
        let outcome = safe_teleport(
            self.state.teleports,
            &self.state.enemies,
            &self.state.wrecks,
            self.config.board_size(),
            &mut self.rng,
        );
        match outcome {
            SafeTeleport::Landed(to) => {
                self.state.player = to;
                self.state.teleports -= 1;
                debug!(to = %to, remaining = self.state.teleports, "safe teleport");
                out_events.push(Event::SafeTeleported {
                    to,
                    remaining: self.state.teleports,
                });
            }
            SafeTeleport::Refused(reason) => {
                debug!(?reason, "safe teleport refused");
                out_events.push(Event::SafeTeleportRefused { reason });
            }
        }
    }

    fn catch_player(&mut self, cause: CatchCause, out_events: &mut Vec<Event>) {
        self.state.status = GameStatus::Lost;
        let cell = self.state.player;
        info!(
            level = self.state.level,
            score = self.state.score,
            seed = self.state.seed,
            ?cause,
            "player caught"
        );
        out_events.push(Event::PlayerCaught { cell, cause });
    }

    /// Awards the clear bonus and populates the next level.
    ///
    /// Enemies are spawned before anything else changes, so a failed respawn
    /// leaves level, bonus and player position as they were.
    fn level_up(&mut self, out_events: &mut Vec<Event>) -> Result<(), WorldError> {
        let board_size = self.config.board_size();
        let cleared = self.state.level;
        let next_level = cleared.saturating_add(1);
        let center = Spot::center(board_size);

        let enemies = match spawn_enemies(next_level, center, board_size, &mut self.rng) {
            Ok(enemies) => enemies,
            Err(error) => {
                warn!(level = next_level, %error, "could not populate next level");
                return Err(error.into());
            }
        };

        let bonus = u64::from(cleared) * POINTS_PER_CLEARED_LEVEL;
        self.state.score = self.state.score.saturating_add(bonus);
        out_events.push(Event::LevelCleared {
            level: cleared,
            bonus,
        });

        self.state.level = next_level;
        self.state.player = center;
        self.state.enemies = enemies;
        self.state.wrecks.clear();
        info!(
            level = next_level,
            score = self.state.score,
            enemies = self.state.enemies.len(),
            "level started"
        );
        out_events.push(Event::LevelStarted {
            level: next_level,
            enemies: self.state.enemies.len(),
        });
        Ok(())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Turns submitted after the run was lost are ignored and emit no events.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), WorldError> {
    match command {
        Command::Step { action } => world.process_turn(action, out_events),
        Command::Reset { seed } => {
            let state = initial_state(seed, world.config)?;
            world.state = state;
            world.rng = Mulberry32::from_seed(seed);
            info!(seed, "run reset");
            out_events.push(Event::RunReset { seed });
            out_events.push(Event::LevelStarted {
                level: world.state.level,
                enemies: world.state.enemies.len(),
            });
            Ok(())
        }
    }
}

/// Seed shared by every player on the provided UTC date.
///
/// The date digits are read as a decimal number, so 2026-01-02 becomes
/// `20260102`.
#[must_use]
pub fn daily_seed(date: CalendarDate) -> u64 {
    // `CalendarDate` years never leave 0..=9999.
    let year = u64::from(date.year().unsigned_abs());
    year * 10_000 + u64::from(date.month()) * 100 + u64::from(date.day())
}

fn initial_state(seed: u64, config: Config) -> Result<GameState, WorldError> {
    let board_size = config.board_size();
    if board_size == 0 {
        return Err(WorldError::InvalidBoardSize(board_size));
    }

    let mut rng = Mulberry32::from_seed(seed);
    let player = Spot::center(board_size);
    let enemies = spawn_enemies(1, player, board_size, &mut rng)?;
    Ok(GameState {
        level: 1,
        score: 0,
        player,
        enemies,
        wrecks: WreckSet::new(),
        teleports: config.safe_teleports(),
        seed,
        status: GameStatus::Playing,
        turns: 0,
    })
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use droids_core::{GameState, RunSummary, Spot};
    use droids_system_teleport::safe_destinations;

    use super::{Config, World};

    /// What a board cell displays.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum Cell {
        /// Nothing occupies the cell.
        Empty,
        /// The player stands on the cell.
        Player,
        /// At least one live enemy occupies the cell.
        Enemy,
        /// Debris of destroyed enemies covers the cell.
        Wreck,
    }

    /// Provides read-only access to the current state.
    #[must_use]
    pub fn state(world: &World) -> &GameState {
        &world.state
    }

    /// Configuration of the running world.
    #[must_use]
    pub fn config(world: &World) -> Config {
        world.config
    }

    /// Shareable projection of the current run.
    #[must_use]
    pub fn run_summary(world: &World) -> RunSummary {
        world.state.run_summary()
    }

    /// Cells a safe teleport could currently land on.
    #[must_use]
    pub fn safe_teleport_destinations(world: &World) -> Vec<Spot> {
        safe_destinations(
            &world.state.enemies,
            &world.state.wrecks,
            world.config.board_size(),
        )
    }

    /// Contents of a cell, with the player drawn above enemies and enemies
    /// above wrecks.
    #[must_use]
    pub fn cell_contents(world: &World, spot: Spot) -> Cell {
        if world.state.player == spot {
            Cell::Player
        } else if world.state.has_enemy_at(spot) {
            Cell::Enemy
        } else if world.state.wrecks.contains(spot) {
            Cell::Wreck
        } else {
            Cell::Empty
        }
    }
}
