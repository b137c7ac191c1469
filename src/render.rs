use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::{entity::EntityKind, session::SessionView};

const ORIGIN_X: u16 = 2;
const ORIGIN_Y: u16 = 2;
/// Terminal columns per board cell, so cells come out roughly square.
const CELL_WIDTH: u16 = 2;
const PANEL_GAP: u16 = 4;

const TILE: Color = Color::Rgb { r: 0xFC, g: 0xFC, b: 0xFC };
const HEAD: Color = Color::Rgb { r: 0x12, g: 0x12, b: 0x14 };
const BODY: Color = Color::Rgb { r: 0x50, g: 0xFF, b: 0xB5 };
const FRUIT: Color = Color::Rgb { r: 0xD9, g: 0x2B, b: 0x2B };
const FRAME: Color = Color::Rgb { r: 0x9D, g: 0x8F, b: 0x84 };
const SHADE: Color = Color::Rgb { r: 0x2E, g: 0x6F, b: 0x7A };

/// Dialogs drawn over the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    GameOver { score: u32 },
    BoardSelect { presets: Vec<usize> },
    HowToPlay,
}

impl Modal {
    pub fn title(&self) -> &'static str {
        match self {
            Modal::GameOver { .. } => "Game over",
            Modal::BoardSelect { .. } => "Select board",
            Modal::HowToPlay => "How to play",
        }
    }

    pub fn lines(&self) -> Vec<String> {
        match self {
            Modal::GameOver { score } => vec![
                "The snake ran into itself.".to_owned(),
                format!("Final score: {score}"),
                String::new(),
                "Enter or r to try again".to_owned(),
            ],
            Modal::BoardSelect { presets } => {
                let mut lines: Vec<String> = presets
                    .iter()
                    .enumerate()
                    .map(|(i, size)| format!("{}  {size}x{size}", i + 1))
                    .collect();
                lines.push(String::new());
                lines.push("Esc to close".to_owned());
                lines
            }
            Modal::HowToPlay => vec![
                "Steer the snake to eat the fruit.".to_owned(),
                "Every fruit makes it longer and faster.".to_owned(),
                "Edges wrap around to the other side.".to_owned(),
                "The game ends when the snake bites itself.".to_owned(),
                String::new(),
                "Arrows / WASD  move".to_owned(),
                "Space / Esc    pause".to_owned(),
                "r restart  b board  q quit".to_owned(),
            ],
        }
    }
}

/// What ends up in each board cell once every layer is stacked, indexed
/// `[y][x]`. The snake is drawn over the fruit, the head over the body.
pub fn compose(view: &SessionView) -> Vec<Vec<EntityKind>> {
    let mut cells: Vec<Vec<EntityKind>> = view
        .board
        .rows()
        .iter()
        .map(|row| row.iter().map(|tile| tile.kind).collect())
        .collect();

    let mut paint = |x: i32, y: i32, kind: EntityKind| {
        if let Some(cell) = usize::try_from(y)
            .ok()
            .and_then(|y| cells.get_mut(y))
            .and_then(|row| usize::try_from(x).ok().and_then(|x| row.get_mut(x)))
        {
            *cell = kind;
        }
    };

    paint(view.fruit.position.x, view.fruit.position.y, EntityKind::Fruit);
    for segment in view.snake.segments().collect::<Vec<_>>().into_iter().rev() {
        paint(segment.position.x, segment.position.y, segment.kind);
    }

    cells
}

fn status(view: &SessionView) -> &'static str {
    if view.lost {
        "Game over"
    } else if view.paused {
        "Paused"
    } else {
        "Playing"
    }
}

/// Draws sessions into a terminal with crossterm commands.
#[derive(Debug)]
pub struct Renderer {
    stale: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self { stale: true }
    }

    /// Wipes the whole screen on the next frame, e.g. after the board shrank.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    pub fn draw<W: Write>(
        &mut self,
        out: &mut W,
        view: &SessionView,
        modal: Option<&Modal>,
    ) -> io::Result<()> {
        if self.stale {
            queue!(out, ResetColor, Clear(ClearType::All))?;
            self.stale = false;
        }

        let size = view.board.size() as u16;
        let inner_width = size * CELL_WIDTH;

        queue!(out, MoveTo(ORIGIN_X, 0), Print("S N A K E"))?;
        self.draw_frame(out, inner_width, size)?;

        for (y, row) in compose(view).iter().enumerate() {
            queue!(out, MoveTo(ORIGIN_X + 1, ORIGIN_Y + 1 + y as u16))?;
            for kind in row {
                let (background, foreground, glyph) = match kind {
                    EntityKind::Tile => (TILE, TILE, "  "),
                    EntityKind::Head => (HEAD, HEAD, "  "),
                    EntityKind::Body => (BODY, BODY, "  "),
                    EntityKind::Fruit => (TILE, FRUIT, "()"),
                };
                queue!(
                    out,
                    SetBackgroundColor(background),
                    SetForegroundColor(foreground),
                    Print(glyph)
                )?;
            }
            queue!(out, ResetColor)?;
        }

        let panel_x = ORIGIN_X + inner_width + 2 + PANEL_GAP;
        queue!(
            out,
            MoveTo(panel_x, ORIGIN_Y + 1),
            Print(format!("Score      {:<6}", view.score)),
            MoveTo(panel_x, ORIGIN_Y + 3),
            Print(format!("Best score {:<6}", view.best_score)),
            MoveTo(panel_x, ORIGIN_Y + 5),
            Print(format!("Board      {size}x{size}  ")),
            MoveTo(panel_x, ORIGIN_Y + 7),
            Print(format!("{:<16}", status(view))),
        )?;

        queue!(
            out,
            MoveTo(ORIGIN_X, ORIGIN_Y + size + 3),
            Print("arrows/WASD move  space pause  r restart  b board  h help  q quit")
        )?;

        if view.paused && modal.is_none() {
            self.draw_box(out, inner_width, size, "Paused", &["Press space to resume".to_owned()])?;
        }
        if let Some(modal) = modal {
            self.draw_box(out, inner_width, size, modal.title(), &modal.lines())?;
        }

        out.flush()
    }

    fn draw_frame<W: Write>(&self, out: &mut W, inner_width: u16, size: u16) -> io::Result<()> {
        let horizontal = " ".repeat(inner_width as usize + 2);
        queue!(out, SetBackgroundColor(FRAME))?;
        queue!(out, MoveTo(ORIGIN_X, ORIGIN_Y), Print(&horizontal))?;
        for y in 1..=size {
            queue!(
                out,
                MoveTo(ORIGIN_X, ORIGIN_Y + y),
                Print(" "),
                MoveTo(ORIGIN_X + inner_width + 1, ORIGIN_Y + y),
                Print(" ")
            )?;
        }
        queue!(out, MoveTo(ORIGIN_X, ORIGIN_Y + size + 1), Print(&horizontal), ResetColor)?;
        Ok(())
    }

    fn draw_box<W: Write>(
        &self,
        out: &mut W,
        inner_width: u16,
        size: u16,
        title: &str,
        lines: &[String],
    ) -> io::Result<()> {
        let width = lines
            .iter()
            .map(|line| line.chars().count())
            .chain(std::iter::once(title.chars().count()))
            .max()
            .unwrap_or(0)
            + 4;
        let height = lines.len() + 4;

        let left = (ORIGIN_X + 1 + inner_width / 2).saturating_sub(width as u16 / 2);
        let top = (ORIGIN_Y + 1 + size / 2).saturating_sub(height as u16 / 2);

        queue!(out, SetBackgroundColor(SHADE), SetForegroundColor(Color::White))?;
        let blank = " ".repeat(width);
        for row in 0..height as u16 {
            queue!(out, MoveTo(left, top + row), Print(&blank))?;
        }
        queue!(out, MoveTo(left + 2, top + 1), Print(title))?;
        for (i, line) in lines.iter().enumerate() {
            queue!(out, MoveTo(left + 2, top + 3 + i as u16), Print(line))?;
        }
        queue!(out, ResetColor)?;
        Ok(())
    }
}
