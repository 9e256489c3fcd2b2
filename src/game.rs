use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::Difficulty;
use crate::glitch::roll_glitch_walls;
use crate::grid::{Dir, Grid, Pos};
use crate::maze::LevelSet;
use crate::powerup::{self, PowerUp};
use crate::pursuit;
use crate::schedule::{Chain, Event, Scheduler};

pub const START_SCORE: i64 = 1000;
pub const START_LIVES: u32 = 3;
pub const ROUND_SECS: u32 = 30;
const MOVE_COST: i64 = 1;
const LEVEL_BONUS: i64 = 500;
const LEVEL_SPEEDUP: Duration = Duration::from_millis(50);
const LEVEL_INTERVAL_FLOOR: Duration = Duration::from_millis(200);
const BOOST_CUT: Duration = Duration::from_millis(200);
const BOOST_INTERVAL_FLOOR: Duration = Duration::from_millis(100);
const TIMER_PERIOD: Duration = Duration::from_secs(1);
const GLITCH_PERIOD: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Ended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutcomeKind {
    Cleared,
    OutOfLives,
    TimeUp,
}

impl OutcomeKind {
    pub fn message(self) -> &'static str {
        match self {
            OutcomeKind::Cleared => "🎉 You completed all levels!",
            OutcomeKind::OutOfLives => "💀 Out of lives!",
            OutcomeKind::TimeUp => "⏳ Time's up!",
        }
    }

    pub fn is_win(self) -> bool {
        self == OutcomeKind::Cleared
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub score: i64,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Final Score: {}", self.kind.message(), self.score)
    }
}

pub struct Game {
    levels: LevelSet,
    rng: StdRng,
    schedule: Scheduler,
    phase: Phase,
    difficulty: Difficulty,
    level: usize,
    score: i64,
    lives: u32,
    timer: u32,
    hazard_interval: Duration,
    player: Pos,
    hazard: Pos,
    power_ups: Vec<PowerUp>,
    next_power_up: u64,
    glitch_walls: HashSet<Pos>,
    suspended: Vec<(Duration, Event)>,
    outcome: Option<Outcome>,
    redraw: bool,
}

impl Game {
    pub fn new(levels: LevelSet, rng: StdRng) -> Self {
        let maze = levels.clamped(0);
        let player = maze.start();
        let hazard = hazard_start(maze);
        Self {
            levels,
            rng,
            schedule: Scheduler::new(),
            phase: Phase::Idle,
            difficulty: Difficulty::default(),
            level: 0,
            score: START_SCORE,
            lives: START_LIVES,
            timer: ROUND_SECS,
            hazard_interval: Difficulty::default().hazard_interval(),
            player,
            hazard,
            power_ups: Vec::new(),
            next_power_up: 0,
            glitch_walls: HashSet::new(),
            suspended: Vec::new(),
            outcome: None,
            redraw: true,
        }
    }

    pub fn start(&mut self, difficulty: Difficulty) {
        self.schedule.clear();
        self.suspended.clear();
        self.difficulty = difficulty;
        self.level = 0;
        self.score = START_SCORE;
        self.lives = START_LIVES;
        self.timer = ROUND_SECS;
        self.hazard_interval = difficulty.hazard_interval();
        self.power_ups.clear();
        self.glitch_walls.clear();
        self.outcome = None;
        self.reset_positions();
        self.phase = Phase::Running;
        info!(%difficulty, "session started");

        self.schedule.launch(Chain::Glitch, Duration::ZERO);
        self.schedule.launch(Chain::Hazard, Duration::ZERO);
        self.schedule.launch(Chain::Spawn, Duration::ZERO);
        self.schedule.launch(Chain::Timer, TIMER_PERIOD);
        self.run_until(self.schedule.now());
        self.redraw = true;
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Running => {
                self.phase = Phase::Paused;
                self.suspended = self.schedule.take_one_shots();
                info!(suspended = self.suspended.len(), "paused");
            }
            Phase::Paused => {
                self.phase = Phase::Running;
                info!("resumed");
                for (remaining, event) in std::mem::take(&mut self.suspended) {
                    self.schedule.schedule_in(remaining, event);
                }
                self.schedule.launch(Chain::Glitch, Duration::ZERO);
                self.schedule.launch(Chain::Hazard, Duration::ZERO);
                self.run_until(self.schedule.now());
            }
            Phase::Idle | Phase::Ended => return,
        }
        self.redraw = true;
    }

    /// Blocked moves are silently dropped.
    pub fn move_player(&mut self, dir: Dir) {
        if self.phase != Phase::Running {
            return;
        }
        let Some(target) = self.current_maze().neighbor(self.player, dir) else {
            return;
        };
        if !self.can_enter(target.x as isize, target.y as isize) {
            return;
        }
        self.player = target;
        self.score -= MOVE_COST;

        self.check_goal();
        self.check_power_ups();
        self.check_hazard_collision();
        self.redraw = true;
    }

    pub fn advance(&mut self, dt: Duration) {
        let until = self.schedule.now() + dt;
        self.run_until(until);
    }

    pub fn can_enter(&self, x: isize, y: isize) -> bool {
        passable(self.current_maze(), &self.glitch_walls, x, y)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running | Phase::Paused)
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn level_count(&self) -> usize {
        self.levels.count()
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn hazard_interval(&self) -> Duration {
        self.hazard_interval
    }

    pub fn current_maze(&self) -> &Grid {
        self.levels.clamped(self.level)
    }

    pub fn player(&self) -> Pos {
        self.player
    }

    pub fn hazard(&self) -> Pos {
        self.hazard
    }

    pub fn goal(&self) -> Pos {
        self.current_maze().goal()
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn glitch_walls(&self) -> &HashSet<Pos> {
        &self.glitch_walls
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// True once per batch of state changes since the last call.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    fn run_until(&mut self, until: Duration) {
        while let Some(event) = self.schedule.pop_due(until) {
            self.fire(event);
        }
        self.schedule.settle(until);
    }

    fn fire(&mut self, event: Event) {
        match event {
            Event::Chain(chain, epoch) => {
                if !self.schedule.is_live(chain, epoch) || !self.is_running() {
                    return;
                }
                let paused = self.is_paused();
                match chain {
                    Chain::Timer => {
                        if paused {
                            self.schedule.continue_chain(Chain::Timer, TIMER_PERIOD);
                        } else {
                            self.timer_tick();
                        }
                    }
                    Chain::Glitch => {
                        if !paused {
                            self.glitch_cycle();
                        }
                        self.schedule.continue_chain(Chain::Glitch, GLITCH_PERIOD);
                    }
                    Chain::Hazard => {
                        if !paused {
                            self.hazard_step();
                        }
                        if self.is_running() {
                            self.schedule
                                .continue_chain(Chain::Hazard, self.hazard_interval);
                        }
                    }
                    Chain::Spawn => {
                        if !paused {
                            self.spawn_power_up();
                        }
                        self.schedule
                            .continue_chain(Chain::Spawn, powerup::SPAWN_PERIOD);
                    }
                }
            }
            Event::ExpirePowerUp(id) => {
                let before = self.power_ups.len();
                self.power_ups.retain(|p| p.id != id);
                if self.power_ups.len() != before {
                    debug!(id, "power-up expired");
                    self.redraw = true;
                }
            }
            Event::RestoreHazardInterval(interval) => {
                debug!(?interval, "hazard interval restored");
                self.hazard_interval = interval;
            }
        }
    }

    fn timer_tick(&mut self) {
        self.timer = self.timer.saturating_sub(1);
        self.redraw = true;
        if self.timer > 0 {
            self.schedule.continue_chain(Chain::Timer, TIMER_PERIOD);
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        info!(lives = self.lives, "round timer expired");
        if self.lives == 0 {
            self.end(OutcomeKind::TimeUp);
            return;
        }
        self.reset_positions();
        self.timer = ROUND_SECS;
        self.schedule.launch(Chain::Timer, TIMER_PERIOD);
    }

    fn glitch_cycle(&mut self) {
        let maze = self.levels.clamped(self.level);
        self.glitch_walls = roll_glitch_walls(maze, &mut self.rng);
        debug!(count = self.glitch_walls.len(), "glitch walls rolled");
        self.redraw = true;
    }

    fn hazard_step(&mut self) {
        let maze = self.levels.clamped(self.level);
        let glitch = &self.glitch_walls;
        let dir = pursuit::next_dir(self.hazard, self.player, &mut self.rng, |x, y| {
            passable(maze, glitch, x, y)
        });
        if let Some(next) = dir.and_then(|dir| maze.neighbor(self.hazard, dir)) {
            self.hazard = next;
        }
        self.check_hazard_collision();
        self.redraw = true;
    }

    fn spawn_power_up(&mut self) {
        let maze = self.levels.clamped(self.level);
        let Some(pos) =
            powerup::spawn_site(maze, self.player, self.hazard, &self.power_ups, &mut self.rng)
        else {
            return;
        };
        let id = self.next_power_up;
        self.next_power_up += 1;
        self.power_ups.push(PowerUp { id, pos });
        self.schedule
            .schedule_in(powerup::LIFETIME, Event::ExpirePowerUp(id));
        debug!(id, x = pos.x, y = pos.y, "power-up spawned");
        self.redraw = true;
    }

    fn check_goal(&mut self) {
        if self.player != self.goal() {
            return;
        }
        // A pickup lying on the goal is banked before the board is cleared.
        self.check_power_ups();

        self.level += 1;
        if self.level >= self.levels.count() {
            self.end(OutcomeKind::Cleared);
            return;
        }
        self.reset_positions();
        self.timer = ROUND_SECS;
        self.power_ups.clear();
        self.glitch_walls.clear();
        self.score += LEVEL_BONUS;
        self.hazard_interval = self
            .hazard_interval
            .saturating_sub(LEVEL_SPEEDUP)
            .max(LEVEL_INTERVAL_FLOOR);
        info!(level = self.level + 1, score = self.score, "level cleared");
    }

    fn check_power_ups(&mut self) {
        let Some(idx) = self.power_ups.iter().position(|p| p.pos == self.player) else {
            return;
        };
        self.power_ups.remove(idx);
        self.score += powerup::PICKUP_SCORE;
        let captured = self.hazard_interval;
        self.hazard_interval = captured.saturating_sub(BOOST_CUT).max(BOOST_INTERVAL_FLOOR);
        self.schedule.schedule_in(
            powerup::BOOST_DURATION,
            Event::RestoreHazardInterval(captured),
        );
        debug!(interval = ?self.hazard_interval, "power-up collected");
    }

    fn check_hazard_collision(&mut self) {
        if !self.is_running() || self.player != self.hazard {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        info!(lives = self.lives, "caught by hazard");
        if self.lives == 0 {
            self.end(OutcomeKind::OutOfLives);
            return;
        }
        self.reset_positions();
        self.timer = ROUND_SECS;
        self.redraw = true;
    }

    fn end(&mut self, kind: OutcomeKind) {
        self.phase = Phase::Ended;
        self.schedule.halt(Chain::Timer);
        let outcome = Outcome {
            kind,
            score: self.score,
        };
        info!(%outcome, "session ended");
        self.outcome = Some(outcome);
        self.redraw = true;
    }

    fn reset_positions(&mut self) {
        let maze = self.levels.clamped(self.level);
        self.player = maze.start();
        self.hazard = hazard_start(maze);
    }
}

fn hazard_start(maze: &Grid) -> Pos {
    Pos::new(maze.width() - 1, 0)
}

/// In bounds and either open or currently glitched open.
fn passable(maze: &Grid, glitch: &HashSet<Pos>, x: isize, y: isize) -> bool {
    match maze.cell_at(x, y) {
        Some(pos) => glitch.contains(&pos) || maze.is_open(pos),
        None => false,
    }
}
