//! Snake on a wrap-around square board.
//!
//! The simulation ([`snake::advance`]) is a pure function of the previous
//! snake, the committed direction, the board size and the fruit. Everything
//! stateful lives in [`session::GameSession`]; the terminal front end in
//! [`app`] only feeds it keys and draws what it exposes.

pub mod app;
pub mod config;
pub mod entity;
pub mod fruit;
pub mod grid;
pub mod input;
pub mod logging;
pub mod render;
pub mod session;
pub mod snake;
pub mod store;
pub mod timer;

pub use entity::{Entity, EntityId, EntityKind, Fruit, Segment, Tile};
pub use grid::{Board, Direction, Position};
pub use session::{GameSession, SessionSettings, TickReport};
pub use snake::{advance, Advance, Snake};
