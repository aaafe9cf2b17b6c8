//! Optional TOML configuration layered under command-line flags.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use droids_world::Config;
use serde::Deserialize;
use url::Url;

const DEFAULT_CONFIG_PATH: &str = "droids.toml";
const DEFAULT_SCORES_PATH: &str = "droids-scores.json";
const DEFAULT_SHARE_BASE_URL: &str = "https://droids.invalid/play";
const MIN_BOARD_SIZE: u32 = 5;

/// Values read from the configuration file. Every key is optional.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    board_size: Option<u32>,
    safe_teleports: Option<u32>,
    scores_path: Option<PathBuf>,
    share_base_url: Option<String>,
}

impl FileConfig {
    /// Loads `explicit`, or the default file when it exists.
    ///
    /// A missing default file yields an empty configuration; a missing
    /// explicit file is an error.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::read(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to load config at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) board_size: Option<u32>,
    pub(crate) safe_teleports: Option<u32>,
    pub(crate) scores_path: Option<PathBuf>,
}

/// Fully resolved adapter settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) world: Config,
    pub(crate) scores_path: PathBuf,
    pub(crate) share_base_url: Url,
}

impl Settings {
    pub(crate) fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self> {
        let defaults = Config::default();
        let board_size = overrides
            .board_size
            .or(file.board_size)
            .unwrap_or(defaults.board_size());
        if board_size < MIN_BOARD_SIZE {
            bail!("board size must be at least {MIN_BOARD_SIZE}, got {board_size}");
        }
        let safe_teleports = overrides
            .safe_teleports
            .or(file.safe_teleports)
            .unwrap_or(defaults.safe_teleports());

        let scores_path = overrides
            .scores_path
            .or(file.scores_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCORES_PATH));

        let raw_url = file
            .share_base_url
            .unwrap_or_else(|| DEFAULT_SHARE_BASE_URL.to_owned());
        let share_base_url = Url::parse(&raw_url)
            .with_context(|| format!("invalid share_base_url `{raw_url}`"))?;

        Ok(Self {
            world: Config::new(board_size, safe_teleports),
            scores_path,
            share_base_url,
        })
    }
}
