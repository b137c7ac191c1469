use rand::{seq::SliceRandom, Rng};

use crate::{
    entity::{Entity, Fruit},
    grid::{Board, Position},
    snake::Snake,
};

/// Picks a cell no snake segment is on, uniformly at random.
///
/// Returns `None` when the snake covers the whole board.
pub fn place_fruit<R: Rng + ?Sized>(board: &Board, snake: &Snake, rng: &mut R) -> Option<Fruit> {
    let free: Vec<Position> = board
        .tiles()
        .map(|tile| tile.position)
        .filter(|&position| !snake.occupies(position))
        .collect();

    free.choose(rng).map(|&position| Entity::fruit(position))
}
