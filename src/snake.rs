use std::iter;

use tracing::trace;

use crate::{
    entity::{Entity, EntityKind, Fruit, Segment},
    grid::{Direction, Position},
};

/// The snake, head first. The head lives apart from the body so a snake can
/// never be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    head: Segment,
    body: Vec<Segment>,
}

impl Snake {
    /// Starting snake for a fresh game: head near the centre, body trailing to
    /// the left.
    pub fn spawn(board_size: usize, length: usize) -> Self {
        let centre = ((board_size + 1) / 2) as i32;
        let head = Position::new(centre, centre).wrapped(board_size);
        let body = (1..length.max(1) as i32)
            .map(|i| Position::new(centre - i, centre).wrapped(board_size));

        Self::from_positions(head, body)
    }

    pub fn from_positions(head: Position, body: impl IntoIterator<Item = Position>) -> Self {
        Self {
            head: Entity::at(EntityKind::Head, head),
            body: body
                .into_iter()
                .map(|position| Entity::at(EntityKind::Body, position))
                .collect(),
        }
    }

    pub fn head(&self) -> &Segment {
        &self.head
    }

    pub fn body(&self) -> &[Segment] {
        &self.body
    }

    pub fn tail(&self) -> &Segment {
        self.body.last().unwrap_or(&self.head)
    }

    pub fn len(&self) -> usize {
        self.body.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        iter::once(&self.head).chain(self.body.iter())
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.segments().map(|segment| segment.position)
    }

    pub fn occupies(&self, position: Position) -> bool {
        self.positions().any(|p| p == position)
    }
}

/// Outcome of one simulation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    pub snake: Snake,
    pub ate_fruit: bool,
    pub game_over: bool,
}

/// Computes the snake one tick later.
///
/// Every segment is moved against the snake as it was *before* this tick, so
/// the result does not depend on the order segments are visited in. The input
/// is left untouched.
///
/// On a self-collision the moved snake is still returned (for the last frame)
/// with `game_over` set and no growth. Eating the fruit appends one segment
/// past the new tail in `direction`.
pub fn advance(snake: &Snake, direction: Direction, board_size: usize, fruit: &Fruit) -> Advance {
    let last = board_size as i32 - 1;

    let head = move_segment(&snake.head, None, direction, last);
    let mut body: Vec<Segment> = snake
        .body
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let leader = if i == 0 { &snake.head } else { &snake.body[i - 1] };
            move_segment(segment, Some(leader.position), direction, last)
        })
        .collect();

    if body.iter().any(|segment| segment.position == head.position) {
        trace!(head = %head.position, "head ran into the body");
        return Advance {
            snake: Snake { head, body },
            ate_fruit: false,
            game_over: true,
        };
    }

    let ate_fruit = head.position == fruit.position;
    if ate_fruit {
        let tail = body.last().unwrap_or(&head).position;
        let grown = tail.step(direction).wrapped(board_size);
        trace!(fruit = %fruit.position, tail = %grown, "fruit eaten");
        body.push(Entity::at(EntityKind::Body, grown));
    }

    Advance {
        snake: Snake { head, body },
        ate_fruit,
        game_over: false,
    }
}

fn move_segment(
    segment: &Segment,
    leader: Option<Position>,
    direction: Direction,
    last: i32,
) -> Segment {
    let position = segment.position;

    if let Some(teleport) = edge_teleport(position, leader, direction, last) {
        return Entity::at(segment.kind, teleport);
    }

    match leader {
        Some(leader) => segment.with_position(leader),
        None => segment.with_position(position.step(direction)),
    }
}

/// Where a segment lands when this tick carries it across an edge, if it does.
///
/// The head crosses when it sits on an edge and the committed direction points
/// off the board. A follower crosses when it sits on one edge while the
/// segment ahead of it sat on the opposite edge before the tick.
fn edge_teleport(
    position: Position,
    leader: Option<Position>,
    direction: Direction,
    last: i32,
) -> Option<Position> {
    let Position { x, y } = position;

    match leader {
        Some(leader) => {
            if y == 0 && leader.y == last {
                Some(Position::new(x, last))
            } else if y == last && leader.y == 0 {
                Some(Position::new(x, 0))
            } else if x == 0 && leader.x == last {
                Some(Position::new(last, y))
            } else if x == last && leader.x == 0 {
                Some(Position::new(0, y))
            } else {
                None
            }
        }
        None => match direction {
            Direction::Top if y == 0 => Some(Position::new(x, last)),
            Direction::Bottom if y == last => Some(Position::new(x, 0)),
            Direction::Left if x == 0 => Some(Position::new(last, y)),
            Direction::Right if x == last => Some(Position::new(0, y)),
            _ => None,
        },
    }
}
