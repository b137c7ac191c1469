use std::fmt;

use rand::{distributions::Alphanumeric, Rng};

use crate::grid::Position;

const ID_LEN: usize = 21;
const FRUIT_ID: &str = "fruit";

/// Rendering identity of an entity. Never derived from the position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityId(String);

impl EntityId {
    fn random() -> Self {
        let id = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(ID_LEN)
            .map(char::from)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Tile,
    Head,
    Body,
    Fruit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Position,
}

pub type Tile = Entity;
pub type Segment = Entity;
pub type Fruit = Entity;

impl Entity {
    /// Fresh entity at the origin.
    pub fn new(kind: EntityKind) -> Self {
        Self::at(kind, Position::default())
    }

    pub fn at(kind: EntityKind, position: Position) -> Self {
        Self {
            id: EntityId::random(),
            kind,
            position,
        }
    }

    /// The one fruit on the board. It always carries the same id so moving it
    /// reads as a reposition, not a new object.
    pub fn fruit(position: Position) -> Fruit {
        Self {
            id: EntityId(FRUIT_ID.to_owned()),
            kind: EntityKind::Fruit,
            position,
        }
    }

    /// Same identity and kind, new position.
    #[must_use]
    pub fn with_position(&self, position: Position) -> Self {
        Self {
            id: self.id.clone(),
            kind: self.kind,
            position,
        }
    }
}
