#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Droids engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative world, and the pure systems. Adapters submit [`Command`]
//! values describing a turn or a reset, the world executes those commands via
//! its `apply` entry point, and reports what happened as [`Event`] values.
//! Systems are pure functions over [`Spot`] collections, [`WreckSet`]s and a
//! [`Mulberry32`] stream, so identical seeds and inputs always replay
//! identically.

pub mod rng;

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub use rng::Mulberry32;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Droids.";

/// Points awarded for every enemy destroyed in a collision.
pub const POINTS_PER_DESTROYED_ENEMY: u64 = 10;

/// Points awarded per level number when a level is cleared.
pub const POINTS_PER_CLEARED_LEVEL: u64 = 25;

/// Clamps `value` into the inclusive range `[min, max]`.
///
/// Unlike [`Ord::clamp`] this never panics; when `min > max` the upper bound
/// wins, which keeps degenerate one-cell boards well defined.
#[must_use]
pub fn clamp(value: i64, min: i64, max: i64) -> i64 {
    value.max(min).min(max)
}

/// Returns the canonical set key for the provided spot.
#[must_use]
pub const fn spot_key(spot: Spot) -> SpotKey {
    SpotKey::from_spot(spot)
}

/// Location of a single board cell.
///
/// `x` is the row axis (north decreases it) and `y` is the column axis (west
/// decreases it).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Spot {
    x: u32,
    y: u32,
}

impl Spot {
    /// Creates a new board coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based row index of the spot.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based column index of the spot.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Center cell of a square board, rounding towards the origin.
    #[must_use]
    pub const fn center(board_size: u32) -> Self {
        Self::new(board_size / 2, board_size / 2)
    }

    /// Reports whether the spot lies on a board with the provided edge length.
    #[must_use]
    pub const fn is_within(&self, board_size: u32) -> bool {
        self.x < board_size && self.y < board_size
    }

    /// Applies a signed delta and clamps the result to the board.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32, board_size: u32) -> Self {
        let max = i64::from(board_size.saturating_sub(1));
        let x = clamp(i64::from(self.x) + i64::from(dx), 0, max);
        let y = clamp(i64::from(self.y) + i64::from(dy), 0, max);
        // Both coordinates are clamped into `0..board_size`, which fits u32.
        Self::new(x as u32, y as u32)
    }

    /// Canonical set key of the spot.
    #[must_use]
    pub const fn key(self) -> SpotKey {
        SpotKey::from_spot(self)
    }
}

impl fmt::Display for Spot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Injective encoding of a [`Spot`] used as a set or map key.
///
/// The row lives in the upper 32 bits and the column in the lower 32 bits, so
/// every representable spot maps to exactly one key and back. Keys order
/// row-major, matching the board enumeration order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SpotKey(u64);

impl SpotKey {
    /// Encodes the provided spot.
    #[must_use]
    pub const fn from_spot(spot: Spot) -> Self {
        Self(((spot.x as u64) << 32) | spot.y as u64)
    }

    /// Decodes the key back into the spot it was built from.
    #[must_use]
    pub const fn spot(self) -> Spot {
        Spot::new((self.0 >> 32) as u32, (self.0 & 0xffff_ffff) as u32)
    }

    /// Raw packed representation of the key.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<Spot> for SpotKey {
    fn from(spot: Spot) -> Self {
        Self::from_spot(spot)
    }
}

impl fmt::Display for SpotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spot = self.spot();
        write!(f, "{},{}", spot.x(), spot.y())
    }
}

/// Set of cells covered by the debris of destroyed enemies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WreckSet {
    keys: BTreeSet<SpotKey>,
}

impl WreckSet {
    /// Creates an empty wreck set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether the provided spot is covered by a wreck.
    #[must_use]
    pub fn contains(&self, spot: Spot) -> bool {
        self.keys.contains(&spot.key())
    }

    /// Marks the spot as wrecked. Returns `true` when the spot was not
    /// previously wrecked.
    pub fn insert(&mut self, spot: Spot) -> bool {
        self.keys.insert(spot.key())
    }

    /// Number of wrecked cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Reports whether no cell is wrecked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Wrecks present in either set.
    #[must_use]
    pub fn union(&self, other: &WreckSet) -> WreckSet {
        Self {
            keys: self.keys.union(&other.keys).copied().collect(),
        }
    }

    /// Removes every wreck.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Iterates wrecked cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Spot> + '_ {
        self.keys.iter().map(|key| key.spot())
    }

    /// Iterates the canonical keys of wrecked cells in row-major order.
    pub fn keys(&self) -> impl Iterator<Item = SpotKey> + '_ {
        self.keys.iter().copied()
    }
}

impl FromIterator<Spot> for WreckSet {
    fn from_iter<I: IntoIterator<Item = Spot>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Spot::key).collect(),
        }
    }
}

impl Extend<Spot> for WreckSet {
    fn extend<I: IntoIterator<Item = Spot>>(&mut self, iter: I) {
        self.keys.extend(iter.into_iter().map(Spot::key));
    }
}

/// Player actions accepted by the engine for a single turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Step towards decreasing rows (`w`).
    North,
    /// Step towards decreasing columns (`a`).
    West,
    /// Step towards increasing rows (`s`).
    South,
    /// Step towards increasing columns (`d`).
    East,
    /// Diagonal step up and left (`q`).
    NorthWest,
    /// Diagonal step up and right (`e`).
    NorthEast,
    /// Diagonal step down and left (`z`).
    SouthWest,
    /// Diagonal step down and right (`c`).
    SouthEast,
    /// Stay in place and let the enemies advance (`.`).
    Wait,
    /// Spend a charge to jump to a random unoccupied cell (`t`).
    SafeTeleport,
    /// Jump to any random cell without spending a charge (`r`).
    RiskyTeleport,
}

impl Action {
    /// Every action in keyboard layout order.
    pub const ALL: [Action; 11] = [
        Action::NorthWest,
        Action::North,
        Action::NorthEast,
        Action::West,
        Action::Wait,
        Action::East,
        Action::SouthWest,
        Action::South,
        Action::SouthEast,
        Action::SafeTeleport,
        Action::RiskyTeleport,
    ];

    /// Parses a keyboard symbol, ignoring case. Unknown symbols yield `None`.
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        let action = match symbol.to_ascii_lowercase() {
            'w' => Self::North,
            'a' => Self::West,
            's' => Self::South,
            'd' => Self::East,
            'q' => Self::NorthWest,
            'e' => Self::NorthEast,
            'z' => Self::SouthWest,
            'c' => Self::SouthEast,
            '.' => Self::Wait,
            't' => Self::SafeTeleport,
            'r' => Self::RiskyTeleport,
            _ => return None,
        };
        Some(action)
    }

    /// Keyboard symbol bound to the action.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::North => 'w',
            Self::West => 'a',
            Self::South => 's',
            Self::East => 'd',
            Self::NorthWest => 'q',
            Self::NorthEast => 'e',
            Self::SouthWest => 'z',
            Self::SouthEast => 'c',
            Self::Wait => '.',
            Self::SafeTeleport => 't',
            Self::RiskyTeleport => 'r',
        }
    }

    /// Unit delta `(dx, dy)` for movement actions, `None` for teleports.
    #[must_use]
    pub const fn delta(self) -> Option<(i32, i32)> {
        match self {
            Self::North => Some((-1, 0)),
            Self::West => Some((0, -1)),
            Self::South => Some((1, 0)),
            Self::East => Some((0, 1)),
            Self::NorthWest => Some((-1, -1)),
            Self::NorthEast => Some((-1, 1)),
            Self::SouthWest => Some((1, -1)),
            Self::SouthEast => Some((1, 1)),
            Self::Wait => Some((0, 0)),
            Self::SafeTeleport | Self::RiskyTeleport => None,
        }
    }
}

/// Lifecycle status of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// The run accepts turns.
    #[default]
    Playing,
    /// An enemy reached the player. Terminal.
    Lost,
}

/// Complete state of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Current level, starting at 1.
    pub level: u32,
    /// Accumulated score; never decreases during play.
    pub score: u64,
    /// Cell occupied by the player.
    pub player: Spot,
    /// Cells occupied by live enemies, in deterministic spawn order.
    pub enemies: Vec<Spot>,
    /// Debris left behind by destroyed enemies on this level.
    pub wrecks: WreckSet,
    /// Safe teleport charges remaining for the run.
    pub teleports: u32,
    /// Seed the run was started from.
    pub seed: u64,
    /// Whether the run is still in progress.
    pub status: GameStatus,
    /// Number of turns processed while playing.
    pub turns: u64,
}

impl GameState {
    /// Reports whether the run still accepts turns.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Reports whether a live enemy occupies the provided spot.
    #[must_use]
    pub fn has_enemy_at(&self, spot: Spot) -> bool {
        self.enemies.iter().any(|enemy| *enemy == spot)
    }

    /// Projects the fields needed to share a run.
    #[must_use]
    pub fn run_summary(&self) -> RunSummary {
        RunSummary {
            score: self.score,
            level: self.level,
            seed: self.seed,
            teleports: self.teleports,
        }
    }
}

/// Shareable projection of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunSummary {
    /// Final or current score.
    pub score: u64,
    /// Level reached.
    pub level: u32,
    /// Seed that reproduces the run's boards.
    pub seed: u64,
    /// Safe teleport charges left.
    pub teleports: u32,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Processes a single turn. `None` stands for unrecognized input, which
    /// still lets the enemies advance.
    Step {
        /// Action chosen by the player, if the input was recognized.
        action: Option<Action>,
    },
    /// Restarts the run from level 1 with the provided seed.
    Reset {
        /// Seed for the new run.
        seed: u64,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The player walked to a new cell (or bumped into the board edge).
    PlayerMoved {
        /// Cell occupied before the move.
        from: Spot,
        /// Cell occupied after the move.
        to: Spot,
    },
    /// A safe teleport succeeded.
    SafeTeleported {
        /// Destination cell.
        to: Spot,
        /// Charges left after the jump.
        remaining: u32,
    },
    /// A safe teleport was requested but not performed.
    SafeTeleportRefused {
        /// Why the teleport did not happen.
        reason: TeleportRefusal,
    },
    /// The player jumped to a random cell.
    RiskyTeleported {
        /// Destination cell.
        to: Spot,
    },
    /// Every enemy stepped towards the player.
    EnemiesAdvanced {
        /// Number of enemies that moved.
        count: usize,
    },
    /// Enemies collided with each other or with wrecks.
    EnemiesDestroyed {
        /// Number of enemies removed this turn.
        count: u32,
        /// Distinct cells where enemies were destroyed, in first-hit order.
        cells: Vec<Spot>,
    },
    /// The run ended.
    PlayerCaught {
        /// Cell where the player was caught.
        cell: Spot,
        /// Which loss check fired.
        cause: CatchCause,
    },
    /// The last enemy on a level was destroyed.
    LevelCleared {
        /// Level that was cleared.
        level: u32,
        /// Bonus points awarded for the clear.
        bonus: u64,
    },
    /// A level was populated with enemies.
    LevelStarted {
        /// Level number.
        level: u32,
        /// Number of enemies spawned.
        enemies: usize,
    },
    /// The run was restarted.
    RunReset {
        /// Seed of the new run.
        seed: u64,
    },
}

/// Loss checks performed during a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CatchCause {
    /// The player moved onto an enemy or a wreck.
    PlayerEntered,
    /// An enemy stepped onto the player.
    EnemyArrived,
}

/// Reasons a safe teleport request may be declined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeleportRefusal {
    /// No safe teleport charges remain.
    NoCharges,
    /// Every cell holds an enemy or a wreck.
    NoSafeCell,
}

/// Earliest year a [`CalendarDate`] can hold.
pub const MIN_YEAR: i32 = 0;
/// Latest year a [`CalendarDate`] can hold; keeps dates four digits wide.
pub const MAX_YEAR: i32 = 9_999;

/// UTC calendar date used to derive daily challenge seeds.
///
/// Years are limited to [`MIN_YEAR`]..=[`MAX_YEAR`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate {
    year: i32,
    month: u32,
    day: u32,
}

impl CalendarDate {
    /// Creates a date, returning `None` when any component is out of range.
    #[must_use]
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year)
            || !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return None;
        }
        Some(Self { year, month, day })
    }

    /// Civil UTC date containing the provided Unix timestamp, or `None`
    /// when that date falls outside the supported years.
    #[must_use]
    pub fn from_unix_seconds(seconds: i64) -> Option<Self> {
        let days = seconds.div_euclid(86_400);
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let day_of_era = z.rem_euclid(146_097);
        let year_of_era =
            (day_of_era - day_of_era / 1_460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
        let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
        let shifted_month = (5 * day_of_year + 2) / 153;
        let day = day_of_year - (153 * shifted_month + 2) / 5 + 1;
        let month = if shifted_month < 10 {
            shifted_month + 3
        } else {
            shifted_month - 9
        };
        let year = year_of_era + era * 400 + i64::from(month <= 2);
        let year = i32::try_from(year).ok()?;
        // Month and day come out of the conversion as 1..=12 and 1..=31.
        Self::new(year, month as u32, day as u32)
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month, 1 through 12.
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Day of the month, starting at 1.
    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// The day before this one, or `None` on the first supported day.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        if self.day > 1 {
            return Some(Self {
                day: self.day - 1,
                ..self
            });
        }
        if self.month > 1 {
            let month = self.month - 1;
            return Some(Self {
                year: self.year,
                month,
                day: days_in_month(self.year, month),
            });
        }
        Self::new(self.year - 1, 12, 31)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Error returned when a string is not an ISO `YYYY-MM-DD` date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseDateError(String);

impl fmt::Display for ParseDateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid YYYY-MM-DD date", self.0)
    }
}

impl std::error::Error for ParseDateError {}

impl FromStr for CalendarDate {
    type Err = ParseDateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseDateError(value.to_owned());
        let mut parts = value.trim().splitn(3, '-');
        let year = parts.next().and_then(|part| part.parse::<i32>().ok());
        let month = parts.next().and_then(|part| part.parse::<u32>().ok());
        let day = parts.next().and_then(|part| part.parse::<u32>().ok());
        match (year, month, day) {
            (Some(year), Some(month), Some(day)) => {
                Self::new(year, month, day).ok_or_else(invalid)
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = ParseDateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CalendarDate> for String {
    fn from(date: CalendarDate) -> Self {
        date.to_string()
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}
