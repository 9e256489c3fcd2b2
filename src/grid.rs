use std::collections::VecDeque;

pub const GRID_W: usize = 10;
pub const GRID_H: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Open,
    Wall,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Down, Dir::Right, Dir::Up, Dir::Left];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<Tile>>,
}

impl Grid {
    pub fn filled(width: usize, height: usize, tile: Tile) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![tile; width]; height],
        }
    }

    /// Builds a grid from text rows, `#` for walls and anything else open.
    pub fn from_rows(rows: &[&str]) -> Self {
        let cells: Vec<Vec<Tile>> = rows
            .iter()
            .map(|row| {
                row.chars()
                    .map(|c| if c == '#' { Tile::Wall } else { Tile::Open })
                    .collect()
            })
            .collect();
        let height = cells.len();
        let width = cells.first().map_or(0, Vec::len);
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn start(&self) -> Pos {
        Pos::new(0, 0)
    }

    pub fn goal(&self) -> Pos {
        Pos::new(self.width - 1, self.height - 1)
    }

    pub fn tile(&self, pos: Pos) -> Tile {
        self.cells[pos.y][pos.x]
    }

    pub fn set(&mut self, pos: Pos, tile: Tile) {
        self.cells[pos.y][pos.x] = tile;
    }

    pub fn is_open(&self, pos: Pos) -> bool {
        self.tile(pos) == Tile::Open
    }

    pub fn cell_at(&self, x: isize, y: isize) -> Option<Pos> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Pos { x, y })
    }

    pub fn neighbor(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        self.cell_at(pos.x as isize + dx, pos.y as isize + dy)
    }

    pub fn cells_of(&self, tile: Tile) -> Vec<Pos> {
        let mut cells = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.cells[y][x] == tile {
                    cells.push(Pos { x, y });
                }
            }
        }
        cells
    }
}

/// Breadth-first search over open cells only.
pub fn is_reachable(grid: &Grid, start: Pos, end: Pos) -> bool {
    let mut seen = vec![vec![false; grid.width()]; grid.height()];
    let mut q = VecDeque::new();
    seen[start.y][start.x] = true;
    q.push_back(start);

    while let Some(pos) = q.pop_front() {
        if pos == end {
            return true;
        }
        for dir in Dir::ALL {
            let Some(next) = grid.neighbor(pos, dir) else {
                continue;
            };
            if seen[next.y][next.x] || !grid.is_open(next) {
                continue;
            }
            seen[next.y][next.x] = true;
            q.push_back(next);
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_grid_connects_every_pair() {
        let grid = Grid::filled(GRID_W, GRID_H, Tile::Open);
        for a in grid.cells_of(Tile::Open) {
            assert!(is_reachable(&grid, a, grid.goal()));
            assert!(is_reachable(&grid, grid.start(), a));
        }
    }

    #[test]
    fn wall_line_separates_halves() {
        let grid = Grid::from_rows(&["..#..", "..#..", "..#.."]);
        assert!(!is_reachable(&grid, Pos::new(0, 0), Pos::new(4, 2)));
        assert!(is_reachable(&grid, Pos::new(0, 0), Pos::new(1, 2)));
    }

    #[test]
    fn boxed_in_start_terminates() {
        let grid = Grid::from_rows(&[".#.", "##.", "..."]);
        assert!(!is_reachable(&grid, Pos::new(0, 0), Pos::new(2, 2)));
        assert!(is_reachable(&grid, Pos::new(0, 0), Pos::new(0, 0)));
    }

    #[test]
    fn cell_at_rejects_out_of_bounds() {
        let grid = Grid::filled(4, 3, Tile::Open);
        assert_eq!(grid.cell_at(-1, 0), None);
        assert_eq!(grid.cell_at(0, -1), None);
        assert_eq!(grid.cell_at(4, 0), None);
        assert_eq!(grid.cell_at(0, 3), None);
        assert_eq!(grid.cell_at(3, 2), Some(Pos::new(3, 2)));
    }
}
