use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Grid, Pos, Tile};

pub const SPAWN_PERIOD: Duration = Duration::from_secs(8);
pub const LIFETIME: Duration = Duration::from_secs(5);
pub const BOOST_DURATION: Duration = Duration::from_secs(5);
pub const PICKUP_SCORE: i64 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerUp {
    /// Distinguishes respawns on the same cell so expiry only removes its own pickup.
    pub id: u64,
    pub pos: Pos,
}

pub fn spawn_site(
    maze: &Grid,
    player: Pos,
    hazard: Pos,
    active: &[PowerUp],
    rng: &mut impl Rng,
) -> Option<Pos> {
    let candidates: Vec<Pos> = maze
        .cells_of(Tile::Open)
        .into_iter()
        .filter(|&pos| pos != player && pos != hazard)
        .filter(|&pos| !active.iter().any(|p| p.pos == pos))
        .collect();
    candidates.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn avoids_walls_and_actors() {
        let grid = Grid::from_rows(&["..#", "#..", "..."]);
        let mut rng = StdRng::seed_from_u64(20);
        let player = Pos::new(0, 0);
        let hazard = Pos::new(2, 1);
        for _ in 0..100 {
            let pos = spawn_site(&grid, player, hazard, &[], &mut rng).expect("free cells");
            assert!(grid.is_open(pos));
            assert_ne!(pos, player);
            assert_ne!(pos, hazard);
        }
    }

    #[test]
    fn full_board_yields_nothing() {
        let grid = Grid::from_rows(&["..", "##"]);
        let mut rng = StdRng::seed_from_u64(21);
        let taken = [PowerUp {
            id: 0,
            pos: Pos::new(1, 0),
        }];
        assert_eq!(
            spawn_site(&grid, Pos::new(0, 0), Pos::new(0, 0), &taken, &mut rng),
            None
        );
        assert_eq!(
            spawn_site(&grid, Pos::new(0, 0), Pos::new(0, 0), &[], &mut rng),
            Some(Pos::new(1, 0))
        );
    }
}
