use rand::Rng;
use tracing::debug;

use crate::grid::{is_reachable, Grid, Pos, Tile, GRID_H, GRID_W};

pub const LEVEL_COUNT: usize = 5;
const WALL_CHANCE: f64 = 0.3;

pub fn generate(rng: &mut impl Rng) -> Grid {
    generate_sized(rng, GRID_W, GRID_H)
}

pub(crate) fn generate_sized(rng: &mut impl Rng, width: usize, height: usize) -> Grid {
    // No attempt cap; rejection is rare at this density.
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        let grid = candidate(rng, width, height);
        if is_reachable(&grid, grid.start(), grid.goal()) {
            debug!(attempts, "maze accepted");
            return grid;
        }
    }
}

fn candidate(rng: &mut impl Rng, width: usize, height: usize) -> Grid {
    let mut grid = Grid::filled(width, height, Tile::Open);
    let start = Pos::new(0, 0);
    let goal = Pos::new(width - 1, height - 1);
    for y in 0..height {
        for x in 0..width {
            let pos = Pos { x, y };
            if pos == start || pos == goal {
                continue;
            }
            if rng.gen_bool(WALL_CHANCE) {
                grid.set(pos, Tile::Wall);
            }
        }
    }
    grid
}

#[derive(Clone, Debug)]
pub struct LevelSet {
    mazes: Vec<Grid>,
}

impl LevelSet {
    pub fn generate(rng: &mut impl Rng) -> Self {
        let mazes = (0..LEVEL_COUNT).map(|_| generate(rng)).collect();
        Self { mazes }
    }

    /// Panics on an empty list; a session needs at least one maze.
    pub fn from_mazes(mazes: Vec<Grid>) -> Self {
        assert!(!mazes.is_empty(), "level set needs at least one maze");
        Self { mazes }
    }

    pub fn count(&self) -> usize {
        self.mazes.len()
    }

    /// Maze for `level`, or the last maze once every level is cleared.
    pub fn clamped(&self, level: usize) -> &Grid {
        &self.mazes[level.min(self.mazes.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_mazes_are_solvable_with_open_corners() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let maze = generate(&mut rng);
            assert_eq!(maze.width(), GRID_W);
            assert_eq!(maze.height(), GRID_H);
            assert_eq!(maze.tile(Pos::new(0, 0)), Tile::Open);
            assert_eq!(maze.tile(Pos::new(GRID_W - 1, GRID_H - 1)), Tile::Open);
            assert!(is_reachable(&maze, maze.start(), maze.goal()));
        }
    }

    #[test]
    fn wall_density_is_near_thirty_percent() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut walls = 0;
        let mut cells = 0;
        for _ in 0..100 {
            let maze = candidate(&mut rng, GRID_W, GRID_H);
            walls += maze.cells_of(Tile::Wall).len();
            cells += GRID_W * GRID_H - 2;
        }
        let fraction = walls as f64 / cells as f64;
        assert!((0.25..0.35).contains(&fraction), "fraction {fraction}");
    }

    #[test]
    fn level_set_has_five_mazes() {
        let mut rng = StdRng::seed_from_u64(3);
        let levels = LevelSet::generate(&mut rng);
        assert_eq!(levels.count(), LEVEL_COUNT);
        assert_eq!(
            levels.clamped(LEVEL_COUNT),
            levels.clamped(LEVEL_COUNT - 1)
        );
    }
}
