pub mod config;
pub mod game;
pub mod glitch;
pub mod grid;
pub mod hud;
pub mod maze;
pub mod powerup;
pub mod pursuit;
pub mod schedule;

pub use config::{Config, Difficulty};
pub use game::{Game, Outcome, OutcomeKind, Phase};
pub use grid::{Dir, Grid, Pos, Tile};
pub use maze::LevelSet;
