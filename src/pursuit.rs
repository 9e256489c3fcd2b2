use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Dir, Pos};

/// Greedy, not shortest-path: a gap-closing step per axis, else any open step.
pub fn next_dir(
    from: Pos,
    target: Pos,
    rng: &mut impl Rng,
    can_enter: impl Fn(isize, isize) -> bool,
) -> Option<Dir> {
    let passable = |dir: Dir| {
        let (dx, dy) = dir.delta();
        can_enter(from.x as isize + dx, from.y as isize + dy)
    };

    let mut options = Vec::with_capacity(4);
    if from.x < target.x && passable(Dir::Right) {
        options.push(Dir::Right);
    } else if from.x > target.x && passable(Dir::Left) {
        options.push(Dir::Left);
    }
    if from.y < target.y && passable(Dir::Down) {
        options.push(Dir::Down);
    } else if from.y > target.y && passable(Dir::Up) {
        options.push(Dir::Up);
    }

    if options.is_empty() {
        options.extend(Dir::ALL.into_iter().filter(|&dir| passable(dir)));
    }
    options.choose(rng).copied()
}
