use std::collections::HashSet;

use rand::Rng;

use crate::grid::{Grid, Pos, Tile};

const GLITCH_CHANCE: f64 = 0.1;

pub fn roll_glitch_walls(maze: &Grid, rng: &mut impl Rng) -> HashSet<Pos> {
    maze.cells_of(Tile::Wall)
        .into_iter()
        .filter(|_| rng.gen_bool(GLITCH_CHANCE))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn only_walls_glitch() {
        let mut rng = StdRng::seed_from_u64(9);
        let maze = crate::maze::generate(&mut rng);
        for _ in 0..100 {
            for pos in roll_glitch_walls(&maze, &mut rng) {
                assert_eq!(maze.tile(pos), Tile::Wall);
            }
        }
    }

    #[test]
    fn membership_rate_is_about_ten_percent() {
        let mut rng = StdRng::seed_from_u64(10);
        let maze = Grid::filled(10, 10, Tile::Wall);
        let mut hits = 0usize;
        let rounds = 100;
        for _ in 0..rounds {
            hits += roll_glitch_walls(&maze, &mut rng).len();
        }
        let fraction = hits as f64 / (rounds * 100) as f64;
        assert!((0.07..0.13).contains(&fraction), "fraction {fraction}");
    }

    #[test]
    fn open_maze_never_glitches() {
        let mut rng = StdRng::seed_from_u64(12);
        let maze = Grid::filled(10, 10, Tile::Open);
        assert!(roll_glitch_walls(&maze, &mut rng).is_empty());
    }
}
