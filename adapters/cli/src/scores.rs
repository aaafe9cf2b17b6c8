//! Persistent high-score table and daily challenge streak.

use std::{fs, io::ErrorKind, path::Path};

use anyhow::{Context, Result};
use droids_core::{CalendarDate, GameState};
use serde::{Deserialize, Serialize};
use tracing::warn;

const MAX_HIGH_SCORES: usize = 10;
const MAX_STREAK_HISTORY: usize = 30;

/// A finished run worth remembering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct HighScore {
    pub(crate) name: String,
    pub(crate) score: u64,
    pub(crate) level: u32,
    pub(crate) turns: u64,
    pub(crate) seed: u64,
    pub(crate) date: CalendarDate,
}

impl HighScore {
    pub(crate) fn from_state(state: &GameState, name: String, date: CalendarDate) -> Self {
        Self {
            name,
            score: state.score,
            level: state.level,
            turns: state.turns,
            seed: state.seed,
            date,
        }
    }
}

/// Consecutive days on which the daily seed was played.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct DailyStreak {
    pub(crate) last_date: Option<CalendarDate>,
    pub(crate) streak: u32,
    /// Most recent first.
    pub(crate) history: Vec<CalendarDate>,
}

impl DailyStreak {
    /// Registers a daily run played on `date` and returns the streak length.
    ///
    /// Repeated runs on the same date leave the streak unchanged.
    pub(crate) fn record(&mut self, date: CalendarDate) -> u32 {
        if self.last_date == Some(date) {
            return self.streak;
        }
        let continues = self.last_date.is_some() && self.last_date == date.previous();
        self.streak = if continues {
            self.streak.saturating_add(1)
        } else {
            1
        };
        self.last_date = Some(date);
        self.history.retain(|seen| *seen != date);
        self.history.insert(0, date);
        self.history.truncate(MAX_STREAK_HISTORY);
        self.streak
    }
}

/// Everything persisted between sessions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ScoreBook {
    pub(crate) high_scores: Vec<HighScore>,
    pub(crate) daily_streak: DailyStreak,
}

impl ScoreBook {
    /// Reads the score book, starting fresh when the file is absent or
    /// unreadable as JSON.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("failed to read scores at {}", path.display()))
            }
        };
        match serde_json::from_str(&contents) {
            Ok(book) => Ok(book),
            Err(error) => {
                warn!(path = %path.display(), %error, "discarding unreadable score book");
                Ok(Self::default())
            }
        }
    }

    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(self).context("failed to serialise score book")?;
        fs::write(path, contents)
            .with_context(|| format!("failed to write scores to {}", path.display()))
    }

    /// Inserts `entry` and returns its 1-based rank if it made the table.
    pub(crate) fn record(&mut self, entry: HighScore) -> Option<usize> {
        let position = self
            .high_scores
            .iter()
            .position(|kept| (entry.score, entry.level) > (kept.score, kept.level))
            .unwrap_or(self.high_scores.len());
        if position >= MAX_HIGH_SCORES {
            return None;
        }
        self.high_scores.insert(position, entry);
        self.high_scores.truncate(MAX_HIGH_SCORES);
        Some(position + 1)
    }

    /// Printable high-score table followed by the daily streak.
    pub(crate) fn render(&self) -> String {
        let mut out = String::from("High scores\n");
        if self.high_scores.is_empty() {
            out.push_str("  (none yet)\n");
        }
        for (rank, entry) in self.high_scores.iter().enumerate() {
            out.push_str(&format!(
                "{:>3}. {:<12} {:>6} pts  level {:>2}  turns {:>4}  seed {}  {}\n",
                rank + 1,
                entry.name,
                entry.score,
                entry.level,
                entry.turns,
                entry.seed,
                entry.date
            ));
        }

        let streak = &self.daily_streak;
        let recent = streak
            .history
            .iter()
            .take(5)
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        let recent = if recent.is_empty() {
            "none".to_owned()
        } else {
            recent.join(", ")
        };
        out.push_str(&format!(
            "Daily streak: {} day(s) | Recent: {recent}\n",
            streak.streak
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use droids_core::{GameStatus, Spot, WreckSet};

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> CalendarDate {
        CalendarDate::new(year, month, day).expect("valid date")
    }

    fn entry(score: u64, level: u32) -> HighScore {
        HighScore {
            name: "Player".to_owned(),
            score,
            level,
            turns: 30,
            seed: 1,
            date: date(2026, 10, 19),
        }
    }

    #[test]
    fn table_is_ordered_by_score_then_level() {
        let mut book = ScoreBook::default();
        assert_eq!(book.record(entry(50, 2)), Some(1));
        assert_eq!(book.record(entry(90, 3)), Some(1));
        assert_eq!(book.record(entry(50, 4)), Some(2));
        assert_eq!(book.record(entry(50, 2)), Some(4));

        let ranked: Vec<_> = book
            .high_scores
            .iter()
            .map(|kept| (kept.score, kept.level))
            .collect();
        assert_eq!(ranked, vec![(90, 3), (50, 4), (50, 2), (50, 2)]);
    }

    #[test]
    fn table_keeps_only_the_best_ten() {
        let mut book = ScoreBook::default();
        for score in 1..=10 {
            let _ = book.record(entry(score * 10, 1));
        }
        assert_eq!(book.record(entry(5, 1)), None);
        assert_eq!(book.record(entry(55, 1)), Some(6));
        assert_eq!(book.high_scores.len(), 10);
        assert_eq!(book.high_scores.last().map(|kept| kept.score), Some(20));
    }

    #[test]
    fn streak_grows_on_consecutive_days() {
        let mut streak = DailyStreak::default();
        assert_eq!(streak.record(date(2026, 2, 27)), 1);
        assert_eq!(streak.record(date(2026, 2, 28)), 2);
        assert_eq!(streak.record(date(2026, 3, 1)), 3);
        assert_eq!(streak.record(date(2026, 3, 1)), 3);
        assert_eq!(
            streak.history,
            vec![date(2026, 3, 1), date(2026, 2, 28), date(2026, 2, 27)]
        );
    }

    #[test]
    fn streak_restarts_after_a_gap() {
        let mut streak = DailyStreak::default();
        let _ = streak.record(date(2026, 10, 17));
        let _ = streak.record(date(2026, 10, 18));
        assert_eq!(streak.record(date(2026, 10, 20)), 1);
        assert_eq!(streak.last_date, Some(date(2026, 10, 20)));
    }

    #[test]
    fn streak_history_is_bounded() {
        let mut streak = DailyStreak::default();
        let mut day = date(2026, 10, 19);
        let mut days = Vec::new();
        for _ in 0..40 {
            days.push(day);
            day = day.previous().expect("date in range");
        }
        for played in days.iter().rev() {
            let _ = streak.record(*played);
        }
        assert_eq!(streak.streak, 40);
        assert_eq!(streak.history.len(), 30);
        assert_eq!(streak.history.first(), Some(&date(2026, 10, 19)));
    }

    #[test]
    fn rendered_table_lists_ranks_and_streak() {
        let mut book = ScoreBook::default();
        assert!(book.render().contains("(none yet)"));

        let _ = book.record(entry(120, 4));
        let _ = book.record(entry(80, 3));
        let _ = book.daily_streak.record(date(2026, 10, 18));
        let _ = book.daily_streak.record(date(2026, 10, 19));

        let table = book.render();
        assert_eq!(
            table,
            "High scores\n  1. Player          120 pts  level  4  turns   30  seed 1  2026-10-19\n  2. Player           80 pts  level  3  turns   30  seed 1  2026-10-19\nDaily streak: 2 day(s) | Recent: 2026-10-19, 2026-10-18\n"
        );
    }

    #[test]
    fn missing_file_yields_empty_book() {
        let dir = tempfile::tempdir().expect("tempdir");
        let book = ScoreBook::load(&dir.path().join("scores.json")).expect("load");
        assert_eq!(book, ScoreBook::default());
    }

    #[test]
    fn corrupt_file_yields_empty_book() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scores.json");
        fs::write(&path, "{ not json").expect("write");
        assert_eq!(ScoreBook::load(&path).expect("load"), ScoreBook::default());
    }

    #[test]
    fn saved_book_loads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scores.json");
        let mut book = ScoreBook::default();
        let _ = book.record(entry(120, 4));
        let _ = book.daily_streak.record(date(2026, 10, 19));

        book.save(&path).expect("save");

        let contents = fs::read_to_string(&path).expect("read");
        assert!(contents.contains("\"2026-10-19\""));
        assert!(contents.contains("\"name\": \"Player\""));
        assert!(contents.contains("\"turns\": 30"));
        assert_eq!(ScoreBook::load(&path).expect("load"), book);
    }

    #[test]
    fn entry_from_state_keeps_name_turns_and_full_seed() {
        let state = GameState {
            level: 3,
            score: 145,
            player: Spot::new(10, 10),
            enemies: Vec::new(),
            wrecks: WreckSet::new(),
            teleports: 1,
            seed: 1_739_999_999_999,
            status: GameStatus::Lost,
            turns: 57,
        };

        let entry = HighScore::from_state(&state, "Ada".to_owned(), date(2026, 10, 19));

        assert_eq!(entry.name, "Ada");
        assert_eq!(entry.turns, 57);
        assert_eq!(entry.seed, 1_739_999_999_999);
        assert_eq!((entry.score, entry.level), (145, 3));
    }

    #[test]
    fn streak_starts_fresh_on_the_earliest_date() {
        let mut streak = DailyStreak::default();
        assert_eq!(streak.record(date(0, 1, 1)), 1);
        assert_eq!(streak.record(date(0, 1, 2)), 2);
    }
}
