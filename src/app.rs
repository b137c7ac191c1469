use std::{
    io::{stdout, Write},
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{debug, info, warn};

use crate::{
    input::{map_key, KeyAction},
    render::{Modal, Renderer},
    session::{GameSession, TickReport},
    store::ScoreStore,
};

/// Longest wait for input while no tick is pending.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// The terminal front end: routes keys into the session, drives its ticks and
/// redraws after every change.
pub struct App<S> {
    session: GameSession<S>,
    presets: Vec<usize>,
    renderer: Renderer,
    modal: Option<Modal>,
    should_quit: bool,
}

impl<S: ScoreStore> App<S> {
    pub fn new(session: GameSession<S>, presets: Vec<usize>) -> Self {
        Self {
            session,
            presets,
            renderer: Renderer::new(),
            modal: None,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &GameSession<S> {
        &self.session
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        execute!(stdout(), EnterAlternateScreen, Hide).context("failed to prepare terminal")?;

        let result = self.run_loop();

        self.session.dispose();
        let restored = restore_terminal();

        info!(best = self.session.best_score(), "exited");
        first_error(result, restored)
    }

    fn run_loop(&mut self) -> Result<()> {
        let mut out = stdout();
        self.draw(&mut out)?;

        while !self.should_quit {
            let wait = self
                .session
                .time_to_next_tick(Instant::now())
                .unwrap_or(IDLE_POLL);

            let mut dirty = false;
            if event::poll(wait).context("failed to poll terminal events")? {
                match event::read().context("failed to read terminal event")? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle(map_key(key));
                        dirty = true;
                    }
                    Event::Resize(..) => {
                        self.renderer.invalidate();
                        dirty = true;
                    }
                    _ => {}
                }
            }

            if let Some(report) = self.session.poll(Instant::now()) {
                self.on_tick(report);
                dirty = true;
            }

            if dirty {
                self.draw(&mut out)?;
            }
        }

        Ok(())
    }

    /// Applies one key to the app. Keys mean different things while a dialog
    /// is open.
    pub fn handle(&mut self, action: KeyAction) {
        if action == KeyAction::Quit {
            self.should_quit = true;
            return;
        }

        match (&self.modal, action) {
            (Some(Modal::BoardSelect { .. }), KeyAction::Digit(n)) => {
                if let Some(&size) = self.presets.get(usize::from(n).wrapping_sub(1)) {
                    self.close_modal();
                    self.session.resize(size);
                }
            }
            (Some(Modal::GameOver { .. }), KeyAction::Confirm | KeyAction::Restart) => {
                self.close_modal();
                self.session.restart();
            }
            (Some(_), KeyAction::TogglePause | KeyAction::Confirm) => self.close_modal(),
            (Some(_), _) => {}

            (None, KeyAction::Move(direction)) => {
                self.session.request_direction(direction);
                self.session.resume();
            }
            (None, KeyAction::TogglePause) => self.session.toggle_pause(),
            (None, KeyAction::Restart) => self.session.restart(),
            (None, KeyAction::BoardMenu) => {
                self.modal = Some(Modal::BoardSelect {
                    presets: self.presets.clone(),
                });
            }
            (None, KeyAction::Help) => self.modal = Some(Modal::HowToPlay),
            (None, _) => {}
        }
    }

    /// Reacts to a tick the session just ran.
    pub fn on_tick(&mut self, report: TickReport) {
        if report.game_over {
            self.modal = Some(Modal::GameOver {
                score: self.session.score(),
            });
        }
    }

    fn close_modal(&mut self) {
        if let Some(modal) = self.modal.take() {
            debug!(modal = modal.title(), "dialog closed");
        }
        self.renderer.invalidate();
    }

    fn draw<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.renderer
            .draw(out, &self.session.view(), self.modal.as_ref())
            .context("failed to draw frame")
    }
}

/// The loop's own failure wins over a teardown failure, which is only logged.
fn first_error(result: Result<()>, restored: Result<()>) -> Result<()> {
    match (result, restored) {
        (Err(e), Err(teardown)) => {
            warn!("failed to restore terminal: {teardown:#}");
            Err(e)
        }
        (result, restored) => result.and(restored),
    }
}

fn restore_terminal() -> Result<()> {
    let raw = terminal::disable_raw_mode().context("failed to disable raw mode");
    let screen =
        execute!(stdout(), Show, LeaveAlternateScreen).context("failed to leave alternate screen");
    raw.and(screen)
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        grid::Direction,
        session::SessionSettings,
        store::MemoryStore,
    };

    fn app_with_length(initial_length: usize) -> App<MemoryStore> {
        let session = GameSession::start_with_rng(
            17,
            SessionSettings {
                initial_length,
                ..SessionSettings::default()
            },
            MemoryStore::new(),
            StdRng::seed_from_u64(11),
        );
        App::new(session, vec![17, 19, 21, 23])
    }

    /// Curls a five-segment snake into itself and feeds every tick to the app.
    fn lose(app: &mut App<MemoryStore>) -> TickReport {
        let mut last = TickReport::default();
        for direction in [
            Direction::Right,
            Direction::Top,
            Direction::Left,
            Direction::Bottom,
        ] {
            app.handle(KeyAction::Move(direction));
            last = app.session.tick().unwrap();
            app.on_tick(last);
        }
        last
    }

    fn app() -> App<MemoryStore> {
        let session = GameSession::start_with_rng(
            17,
            SessionSettings::default(),
            MemoryStore::new(),
            StdRng::seed_from_u64(11),
        );
        App::new(session, vec![17, 19, 21, 23])
    }

    #[test]
    fn test_move_key_resumes() {
        let mut app = app();
        app.handle(KeyAction::Move(Direction::Right));
        app.handle(KeyAction::TogglePause);
        assert!(app.session().is_paused());

        app.handle(KeyAction::Move(Direction::Top));

        assert!(!app.session().is_paused());
        assert_eq!(app.session().direction(), Some(Direction::Top));
    }

    #[test]
    fn test_board_menu_resizes() {
        let mut app = app();
        app.handle(KeyAction::BoardMenu);
        assert!(matches!(app.modal(), Some(Modal::BoardSelect { .. })));

        app.handle(KeyAction::Digit(3));

        assert_eq!(app.modal(), None);
        assert_eq!(app.session().board().size(), 21);
    }

    #[test]
    fn test_board_menu_ignores_unknown_preset() {
        let mut app = app();
        app.handle(KeyAction::BoardMenu);
        app.handle(KeyAction::Digit(9));

        assert!(app.modal().is_some());
        assert_eq!(app.session().board().size(), 17);
    }

    #[test]
    fn test_moves_ignored_behind_dialog() {
        let mut app = app();
        app.handle(KeyAction::Help);
        app.handle(KeyAction::Move(Direction::Left));
        assert_eq!(app.session().direction(), None);

        app.handle(KeyAction::TogglePause);
        assert_eq!(app.modal(), None);
        assert!(!app.session().is_paused());
    }

    #[test]
    fn test_game_over_opens_dialog() {
        let mut app = app_with_length(5);

        let report = lose(&mut app);

        assert!(report.game_over);
        assert!(app.session().is_lost());
        assert_eq!(
            app.modal(),
            Some(&Modal::GameOver {
                score: app.session().score()
            })
        );
    }

    #[test]
    fn test_ticks_without_loss_keep_dialog_closed() {
        let mut app = app_with_length(5);
        app.handle(KeyAction::Move(Direction::Right));

        let report = app.session.tick().unwrap();
        app.on_tick(report);

        assert!(!report.game_over);
        assert_eq!(app.modal(), None);
    }

    #[test]
    fn test_game_over_retry_restarts() {
        for retry in [KeyAction::Confirm, KeyAction::Restart] {
            let mut app = app_with_length(5);
            lose(&mut app);

            app.handle(retry);

            assert_eq!(app.modal(), None);
            assert!(!app.session().is_lost());
            assert_eq!(app.session().score(), 0);
            assert_eq!(app.session().direction(), None);
            assert_eq!(app.session().snake().len(), 5);
            assert_eq!(app.session().next_deadline(), None);
        }
    }

    #[test]
    fn test_game_over_dialog_ignores_moves() {
        let mut app = app_with_length(5);
        lose(&mut app);

        app.handle(KeyAction::Move(Direction::Right));

        assert!(matches!(app.modal(), Some(Modal::GameOver { .. })));
        assert!(app.session().is_lost());
        assert_eq!(app.session().direction(), None);
    }

    #[test]
    fn test_loop_error_survives_teardown_error() {
        let err = first_error(Err(anyhow!("draw failed")), Err(anyhow!("raw mode stuck")))
            .unwrap_err();
        assert_eq!(err.to_string(), "draw failed");

        let err = first_error(Ok(()), Err(anyhow!("raw mode stuck"))).unwrap_err();
        assert_eq!(err.to_string(), "raw mode stuck");

        assert!(first_error(Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        app.handle(KeyAction::Help);
        app.handle(KeyAction::Quit);
        assert!(app.should_quit());
    }
}
