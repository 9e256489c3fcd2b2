use crate::config::Difficulty;
use crate::game::{Game, ROUND_SECS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerBand {
    Critical,
    Warning,
    Calm,
}

impl TimerBand {
    pub fn for_seconds(secs: u32) -> Self {
        if secs < 10 {
            TimerBand::Critical
        } else if secs < 20 {
            TimerBand::Warning
        } else {
            TimerBand::Calm
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub score: i64,
    /// 1-based for display.
    pub level: usize,
    pub levels: usize,
    pub paused: bool,
    pub difficulty: Difficulty,
    pub lives: u32,
    pub timer: u32,
    pub timer_fraction: f64,
    pub band: TimerBand,
}

impl Hud {
    pub fn of(game: &Game) -> Self {
        let timer = game.timer();
        Self {
            score: game.score(),
            level: game.level() + 1,
            levels: game.level_count(),
            paused: game.is_paused(),
            difficulty: game.difficulty(),
            lives: game.lives(),
            timer,
            timer_fraction: f64::from(timer) / f64::from(ROUND_SECS),
            band: TimerBand::for_seconds(timer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::LevelSet;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn band_edges() {
        assert_eq!(TimerBand::for_seconds(0), TimerBand::Critical);
        assert_eq!(TimerBand::for_seconds(9), TimerBand::Critical);
        assert_eq!(TimerBand::for_seconds(10), TimerBand::Warning);
        assert_eq!(TimerBand::for_seconds(19), TimerBand::Warning);
        assert_eq!(TimerBand::for_seconds(20), TimerBand::Calm);
        assert_eq!(TimerBand::for_seconds(30), TimerBand::Calm);
    }

    #[test]
    fn fresh_session_reads_full() {
        let mut rng = StdRng::seed_from_u64(5);
        let levels = LevelSet::generate(&mut rng);
        let mut game = Game::new(levels, rng);
        game.start(Difficulty::Hard);
        let hud = Hud::of(&game);
        assert_eq!(hud.level, 1);
        assert_eq!(hud.levels, 5);
        assert_eq!(hud.lives, 3);
        assert_eq!(hud.difficulty, Difficulty::Hard);
        assert!(!hud.paused);
        assert_eq!(hud.timer_fraction, 1.0);
        assert_eq!(hud.band, TimerBand::Calm);
    }
}
