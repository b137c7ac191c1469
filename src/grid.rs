use std::fmt;

use crate::entity::{Entity, EntityKind, Tile};

/// A cell coordinate on the board. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// One cell further in `direction`, without wrapping.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Folds the position back onto a `size` x `size` torus.
    pub fn wrapped(self, size: usize) -> Self {
        let size = size as i32;
        Self {
            x: self.x.rem_euclid(size),
            y: self.y.rem_euclid(size),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the `(dx, dy)` of one step. Rows grow downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Top => (0, -1),
            Direction::Bottom => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::Top => "top",
                Direction::Bottom => "bottom",
                Direction::Left => "left",
                Direction::Right => "right",
            }
        )
    }
}

/// Square board of neutral tiles. `rows[y][x]` is the tile at `(x, y)`.
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    rows: Vec<Vec<Tile>>,
}

impl Board {
    /// Builds `size` rows of `size` freshly identified tiles.
    pub fn generate(size: usize) -> Self {
        let rows = (0..size)
            .map(|y| {
                (0..size)
                    .map(|x| Entity::at(EntityKind::Tile, Position::new(x as i32, y as i32)))
                    .collect()
            })
            .collect();

        Self { size, rows }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.rows
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.rows.iter().flatten()
    }

    pub fn contains(&self, position: Position) -> bool {
        let size = self.size as i32;
        position.x >= 0 && position.y >= 0 && position.x < size && position.y < size
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_generate_board_shape() {
        let board = Board::generate(5);

        assert_eq!(board.size(), 5);
        assert_eq!(board.rows().len(), 5);
        for (y, row) in board.rows().iter().enumerate() {
            assert_eq!(row.len(), 5);
            for (x, tile) in row.iter().enumerate() {
                assert_eq!(tile.kind, EntityKind::Tile);
                assert_eq!(tile.position, Position::new(x as i32, y as i32));
            }
        }
    }

    #[test]
    fn test_tiles_have_distinct_ids() {
        let board = Board::generate(6);
        let ids: HashSet<_> = board.tiles().map(|tile| tile.id.clone()).collect();
        assert_eq!(ids.len(), 36);
    }

    #[test]
    fn test_contains() {
        let board = Board::generate(4);
        assert!(board.contains(Position::new(0, 0)));
        assert!(board.contains(Position::new(3, 3)));
        assert!(!board.contains(Position::new(-1, 0)));
        assert!(!board.contains(Position::new(0, 4)));
    }

    #[test]
    fn test_step_and_wrap() {
        let pos = Position::new(0, 4);
        assert_eq!(pos.step(Direction::Left), Position::new(-1, 4));
        assert_eq!(pos.step(Direction::Left).wrapped(5), Position::new(4, 4));
        assert_eq!(pos.step(Direction::Bottom).wrapped(5), Position::new(0, 0));
        assert_eq!(pos.step(Direction::Top), Position::new(0, 3));
    }

    #[test]
    fn test_opposites() {
        assert_eq!(Direction::Top.opposite(), Direction::Bottom);
        assert_eq!(Direction::Bottom.opposite(), Direction::Top);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }
}
