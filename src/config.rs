use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use tracing::warn;

const DEFAULT_RENDER_FPS: u64 = 60;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Hazard step interval at the start of a session.
    pub fn hazard_interval(self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_millis(800),
            Difficulty::Medium => Duration::from_millis(500),
            Difficulty::Hard => Duration::from_millis(300),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Lenient parse: unset or unrecognised input selects the default.
    pub fn parse_or_default(input: Option<&str>) -> Self {
        match input.map(str::parse::<Difficulty>) {
            None => Difficulty::default(),
            Some(Ok(difficulty)) => difficulty,
            Some(Err(err)) => {
                warn!(%err, "falling back to default difficulty");
                Difficulty::default()
            }
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty {0:?}, expected easy, medium or hard")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" | "e" | "1" => Ok(Difficulty::Easy),
            "medium" | "m" | "2" => Ok(Difficulty::Medium),
            "hard" | "h" | "3" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_owned())),
        }
    }
}

/// Terminal maze chase with glitching walls.
#[derive(Debug, Parser)]
#[command(name = "glitch-maze", version)]
pub struct Config {
    /// Preselected difficulty: easy, medium or hard.
    #[arg(long, env = "GLITCH_MAZE_DIFFICULTY")]
    pub difficulty: Option<String>,

    /// Seed for maze generation and every other random draw.
    #[arg(long, env = "GLITCH_MAZE_SEED")]
    pub seed: Option<u64>,

    /// Render rate in frames per second.
    #[arg(long, env = "GLITCH_MAZE_FPS", default_value_t = DEFAULT_RENDER_FPS,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub fps: u64,

    /// Write tracing output to this file (filtered by RUST_LOG).
    #[arg(long, env = "GLITCH_MAZE_LOG")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::parse_or_default(self.difficulty.as_deref())
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.fps.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Easy".parse(), Ok(Difficulty::Easy));
        assert_eq!(" HARD ".parse(), Ok(Difficulty::Hard));
        assert_eq!("m".parse(), Ok(Difficulty::Medium));
        assert!("nightmare".parse::<Difficulty>().is_err());
    }

    #[test]
    fn invalid_or_missing_selection_falls_back_to_medium() {
        assert_eq!(Difficulty::parse_or_default(None), Difficulty::Medium);
        assert_eq!(Difficulty::parse_or_default(Some("")), Difficulty::Medium);
        assert_eq!(Difficulty::parse_or_default(Some("insane")), Difficulty::Medium);
        assert_eq!(Difficulty::parse_or_default(Some("easy")), Difficulty::Easy);
    }

    #[test]
    fn step_intervals_match_difficulty() {
        assert_eq!(Difficulty::Easy.hazard_interval(), Duration::from_millis(800));
        assert_eq!(Difficulty::Medium.hazard_interval(), Duration::from_millis(500));
        assert_eq!(Difficulty::Hard.hazard_interval(), Duration::from_millis(300));
    }

    #[test]
    fn cli_flags_parse() {
        let config = Config::parse_from(["glitch-maze", "--difficulty", "hard", "--seed", "42"]);
        assert_eq!(config.difficulty(), Difficulty::Hard);
        assert_eq!(config.seed, Some(42));
        assert!(config.frame_time() > Duration::ZERO);
    }
}
