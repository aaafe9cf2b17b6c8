//! Interactive turn loop over line-oriented input.

use std::io::{BufRead, Write};

use anyhow::Result;
use droids_core::{Action, CatchCause, Command, Event, TeleportRefusal};
use droids_world::{self as world, World};

use crate::board;

const QUIT: &str = "x";
const PROMPT: &str = "Move [q w e / a . d / z s c], t safe teleport, r risky teleport, x quit: ";
const NAME_PROMPT: &str = "Name for the high-score table (blank for Player): ";
const DEFAULT_NAME: &str = "Player";
const MAX_NAME_CHARS: usize = 24;

/// How an interactive session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The player asked to stop.
    Quit,
    /// The player was caught.
    Lost,
    /// The next level does not fit on the board.
    Stalled,
    /// Input ended before the run did.
    InputClosed,
}

impl Outcome {
    /// Whether the run reached an end worth recording.
    pub(crate) const fn is_finished(self) -> bool {
        matches!(self, Self::Lost | Self::Stalled)
    }
}

/// Plays turns read from `input` until the run ends or the player quits.
pub(crate) fn run_session<R: BufRead, W: Write>(
    world: &mut World,
    input: &mut R,
    output: &mut W,
) -> Result<Outcome> {
    let mut events = Vec::new();
    loop {
        write!(output, "{}", board::render(world))?;
        writeln!(output, "{}", board::status_line(world.state()))?;
        if !world.state().is_playing() {
            return Ok(Outcome::Lost);
        }

        let action = match read_input(input, output)? {
            Input::Action(action) => action,
            Input::Quit => return Ok(Outcome::Quit),
            Input::Closed => return Ok(Outcome::InputClosed),
        };

        events.clear();
        let turn = world::apply(
            world,
            Command::Step {
                action: Some(action),
            },
            &mut events,
        );
        for message in events.iter().filter_map(describe) {
            writeln!(output, "{message}")?;
        }
        if let Err(error) = turn {
            writeln!(output, "The board cannot hold another level: {error}")?;
            return Ok(Outcome::Stalled);
        }
    }
}

/// Asks for the name stored with a high score.
///
/// Blank answers and closed input fall back to `Player`. Names are trimmed
/// and cut to their first 24 characters.
pub(crate) fn read_name<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    write!(output, "{NAME_PROMPT}")?;
    output.flush()?;

    let mut line = String::new();
    let _ = input.read_line(&mut line)?;
    let name: String = line.trim().chars().take(MAX_NAME_CHARS).collect();
    if name.is_empty() {
        Ok(DEFAULT_NAME.to_owned())
    } else {
        Ok(name)
    }
}

enum Input {
    Action(Action),
    Quit,
    Closed,
}

/// Prompts until a valid command arrives or input runs out.
fn read_input<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Input> {
    let mut line = String::new();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(Input::Closed);
        }
        let command = line.trim();
        if command.eq_ignore_ascii_case(QUIT) {
            return Ok(Input::Quit);
        }

        let mut symbols = command.chars();
        if let (Some(symbol), None) = (symbols.next(), symbols.next()) {
            if let Some(action) = Action::from_symbol(symbol) {
                return Ok(Input::Action(action));
            }
        }
        writeln!(output, "Unknown command {command:?}.")?;
    }
}

fn describe(event: &Event) -> Option<String> {
    let message = match event {
        Event::SafeTeleported { to, remaining } => {
            format!("Teleported safely to {to}. {remaining} safe teleport(s) left.")
        }
        Event::SafeTeleportRefused {
            reason: TeleportRefusal::NoCharges,
        } => "No safe teleports left.".to_owned(),
        Event::SafeTeleportRefused {
            reason: TeleportRefusal::NoSafeCell,
        } => "Nowhere safe to teleport.".to_owned(),
        Event::RiskyTeleported { to } => format!("Risky teleport to {to}."),
        Event::EnemiesDestroyed { count, .. } => format!("{count} droid(s) destroyed."),
        Event::PlayerCaught {
            cause: CatchCause::PlayerEntered,
            cell,
        } => format!("You ran into danger at {cell}. Game over."),
        Event::PlayerCaught {
            cause: CatchCause::EnemyArrived,
            cell,
        } => format!("A droid caught you at {cell}. Game over."),
        Event::LevelCleared { level, bonus } => {
            format!("Level {level} cleared! +{bonus} points.")
        }
        Event::LevelStarted { level, enemies } => {
            format!("Level {level}: {enemies} droids incoming.")
        }
        Event::PlayerMoved { .. } | Event::EnemiesAdvanced { .. } | Event::RunReset { .. } => {
            return None
        }
    };
    Some(message)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use droids_core::{GameState, GameStatus, Spot, WreckSet};
    use droids_world::Config;

    use super::*;

    fn scenario(player: Spot, enemies: Vec<Spot>) -> World {
        World::with_state(
            Config::new(5, 3),
            GameState {
                level: 1,
                score: 0,
                player,
                enemies,
                wrecks: WreckSet::new(),
                teleports: 3,
                seed: 1,
                status: GameStatus::Playing,
                turns: 0,
            },
        )
    }

    fn session(world: &mut World, input: &str) -> (Outcome, String) {
        let mut output = Vec::new();
        let outcome =
            run_session(world, &mut Cursor::new(input.to_owned()), &mut output).expect("session");
        (outcome, String::from_utf8(output).expect("utf8 output"))
    }

    #[test]
    fn quit_leaves_the_run_untouched() {
        let mut world = scenario(Spot::new(2, 2), vec![Spot::new(0, 0)]);
        let (outcome, _) = session(&mut world, "x\n");
        assert_eq!(outcome, Outcome::Quit);
        assert_eq!(world.state().turns, 0);
    }

    #[test]
    fn invalid_input_is_prompted_again_without_a_turn() {
        let mut world = scenario(Spot::new(2, 2), vec![Spot::new(0, 0), Spot::new(4, 4)]);
        let (outcome, output) = session(&mut world, "k\nww\n\nd\n");

        assert_eq!(outcome, Outcome::InputClosed);
        assert_eq!(world.state().turns, 1);
        assert_eq!(world.state().player, Spot::new(2, 3));
        assert_eq!(output.matches("Unknown command").count(), 3);
    }

    #[test]
    fn caught_player_ends_the_session() {
        let mut world = scenario(Spot::new(2, 2), vec![Spot::new(2, 4)]);
        let (outcome, output) = session(&mut world, ".\n.\n");

        assert_eq!(outcome, Outcome::Lost);
        assert!(outcome.is_finished());
        assert!(output.contains("A droid caught you at (2, 2). Game over."));
        assert!(output.ends_with("Turn 2 | Seed 1\n"));
    }

    #[test]
    fn level_clear_is_announced() {
        let mut world = scenario(Spot::new(2, 1), vec![Spot::new(1, 3), Spot::new(3, 3)]);
        let (_, output) = session(&mut world, ".\nx\n");

        assert!(output.contains("2 droid(s) destroyed."));
        assert!(output.contains("Level 1 cleared! +25 points."));
        assert!(output.contains("Level 2: 8 droids incoming."));
    }

    #[test]
    fn saturated_board_stalls_the_session() {
        let mut world = World::with_state(
            Config::new(3, 3),
            GameState {
                level: 2,
                score: 0,
                player: Spot::new(1, 0),
                enemies: vec![Spot::new(0, 2), Spot::new(2, 2)],
                wrecks: WreckSet::new(),
                teleports: 3,
                seed: 1,
                status: GameStatus::Playing,
                turns: 0,
            },
        );
        let (outcome, output) = session(&mut world, ".\n");

        assert_eq!(outcome, Outcome::Stalled);
        assert!(output.contains("cannot hold another level"));
    }

    fn name_from(input: &str) -> (String, String) {
        let mut output = Vec::new();
        let name = read_name(&mut Cursor::new(input.to_owned()), &mut output).expect("name");
        (name, String::from_utf8(output).expect("utf8 output"))
    }

    #[test]
    fn entered_name_is_trimmed() {
        let (name, output) = name_from("  Ada  \n");
        assert_eq!(name, "Ada");
        assert_eq!(output, NAME_PROMPT);
    }

    #[test]
    fn blank_or_missing_name_defaults_to_player() {
        assert_eq!(name_from("\n").0, "Player");
        assert_eq!(name_from("   \n").0, "Player");
        assert_eq!(name_from("").0, "Player");
    }

    #[test]
    fn long_names_are_cut() {
        let (name, _) = name_from(&format!("{}\n", "n".repeat(40)));
        assert_eq!(name.chars().count(), 24);
    }

    #[test]
    fn name_is_read_after_the_session_from_the_same_input() {
        let mut world = scenario(Spot::new(2, 2), vec![Spot::new(2, 4)]);
        let mut input = Cursor::new(".\n.\nGrace\n".to_owned());
        let mut output = Vec::new();

        let outcome = run_session(&mut world, &mut input, &mut output).expect("session");
        let name = read_name(&mut input, &mut output).expect("name");

        assert_eq!(outcome, Outcome::Lost);
        assert_eq!(name, "Grace");
    }
}
