use std::time::{Duration, Instant};

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, error, info, warn};

use crate::{
    config::{Config, TimingConfig},
    entity::{Entity, Fruit},
    fruit::place_fruit,
    grid::{Board, Direction, Position},
    snake::{advance, Snake},
    store::{BestScore, ScoreStore},
    timer::TickTimer,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub initial_length: usize,
    pub timing: TimingConfig,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            initial_length: config.snake.initial_length,
            timing: config.timing.clone(),
        }
    }
}

/// What a tick did, beyond moving the snake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub ate_fruit: bool,
    pub game_over: bool,
    pub new_best: bool,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    pub board: &'a Board,
    pub snake: &'a Snake,
    pub fruit: &'a Fruit,
    pub paused: bool,
    pub lost: bool,
    pub score: u32,
    pub best_score: u32,
}

/// One player's game: the only owner and mutator of session state.
///
/// Ticks are driven through [`GameSession::poll`]; every transition that
/// changes the cadence cancels the pending tick before arming the next one.
pub struct GameSession<S> {
    settings: SessionSettings,
    board: Board,
    snake: Snake,
    fruit: Fruit,
    direction: Option<Direction>,
    score: u32,
    best: BestScore<S>,
    paused: bool,
    lost: bool,
    rng: StdRng,
    timer: TickTimer,
}

impl<S: ScoreStore> GameSession<S> {
    pub fn start(size: usize, settings: SessionSettings, store: S) -> Self {
        Self::start_with_rng(size, settings, store, StdRng::from_entropy())
    }

    pub fn start_with_rng(size: usize, settings: SessionSettings, store: S, mut rng: StdRng) -> Self {
        let board = Board::generate(size);
        let snake = Snake::spawn(size, settings.initial_length);
        let fruit = initial_fruit(&board, &snake, &mut rng);
        let best = BestScore::load(store);

        info!(size, best = best.value(), "session started");

        Self {
            settings,
            board,
            snake,
            fruit,
            direction: None,
            score: 0,
            best,
            paused: false,
            lost: false,
            rng,
            timer: TickTimer::new(),
        }
    }

    /// Commits `direction` unless it would turn the head straight back into
    /// the neck. Returns whether it was accepted.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if self.direction == Some(direction.opposite()) {
            debug!(%direction, "reversal ignored");
            return false;
        }

        if self.direction != Some(direction) {
            debug!(%direction, "direction committed");
            self.direction = Some(direction);
            self.rearm(Instant::now());
        }
        true
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        debug!(paused = self.paused, "pause toggled");
        self.rearm(Instant::now());
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.toggle_pause();
        }
    }

    /// Runs the tick if one is due at `now`, then arms the next.
    pub fn poll(&mut self, now: Instant) -> Option<TickReport> {
        if !self.timer.is_due(now) {
            return None;
        }

        let report = self.tick();
        self.rearm(now);
        report
    }

    /// Advances the game one step. Does nothing unless the snake is moving.
    pub fn tick(&mut self) -> Option<TickReport> {
        let direction = self.direction.filter(|_| self.is_running())?;

        let step = advance(&self.snake, direction, self.board.size(), &self.fruit);
        self.snake = step.snake;

        let mut report = TickReport {
            ate_fruit: step.ate_fruit,
            game_over: step.game_over,
            new_best: false,
        };

        if step.game_over {
            info!(score = self.score, "game over");
            self.lost = true;
            self.direction = None;
            self.timer.cancel();
            return Some(report);
        }

        if step.ate_fruit {
            match place_fruit(&self.board, &self.snake, &mut self.rng) {
                Some(fruit) => self.fruit = fruit,
                None => warn!("no free cell left for the fruit"),
            }
            self.score = self.snake.len().saturating_sub(self.settings.initial_length) as u32;
            report.new_best = self.best.record(self.score);
            debug!(score = self.score, fruit = %self.fruit.position, "fruit eaten");
        }

        Some(report)
    }

    /// New snake and fruit on the current board.
    pub fn restart(&mut self) {
        self.snake = Snake::spawn(self.board.size(), self.settings.initial_length);
        self.fruit = initial_fruit(&self.board, &self.snake, &mut self.rng);
        self.direction = None;
        self.score = 0;
        self.paused = false;
        self.lost = false;
        self.rearm(Instant::now());
        info!(size = self.board.size(), "session restarted");
    }

    /// Replaces the board and starts over on it.
    pub fn resize(&mut self, size: usize) {
        self.board = Board::generate(size);
        info!(size, "board resized");
        self.restart();
    }

    /// Stops any pending tick for good.
    pub fn dispose(&mut self) {
        self.timer.cancel();
        self.direction = None;
        debug!("session disposed");
    }

    /// Moving, not paused and not lost.
    pub fn is_running(&self) -> bool {
        self.direction.is_some() && !self.paused && !self.lost
    }

    pub fn tick_interval(&self) -> Duration {
        self.settings.timing.tick_interval(self.score)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// How long until the pending tick is due, if one is pending.
    pub fn time_to_next_tick(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn fruit(&self) -> &Fruit {
        &self.fruit
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best.value()
    }

    pub fn best(&self) -> &BestScore<S> {
        &self.best
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_lost(&self) -> bool {
        self.lost
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            board: &self.board,
            snake: &self.snake,
            fruit: &self.fruit,
            paused: self.paused,
            lost: self.lost,
            score: self.score,
            best_score: self.best.value(),
        }
    }

    fn rearm(&mut self, now: Instant) {
        if self.is_running() {
            self.timer.arm(now, self.tick_interval());
        } else {
            self.timer.cancel();
        }
    }

    #[cfg(test)]
    fn set_fruit(&mut self, position: Position) {
        self.fruit = Entity::fruit(position);
    }
}

fn initial_fruit(board: &Board, snake: &Snake, rng: &mut StdRng) -> Fruit {
    place_fruit(board, snake, rng).unwrap_or_else(|| {
        error!(size = board.size(), "snake covers the board, fruit placed at origin");
        Entity::fruit(Position::default())
    })
}
