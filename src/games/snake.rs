use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::controls::ControlId;
use crate::games::canvas::Canvas;
use crate::games::{draw_frame, status_line, GameCtx, GameModule};

pub const GRID_SIZE: i32 = 10;
const TICK_MS: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn in_bounds(&self) -> bool {
        (0..GRID_SIZE).contains(&self.x) && (0..GRID_SIZE).contains(&self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    fn from_control(control: ControlId) -> Option<Self> {
        match control {
            ControlId::Up => Some(Heading::Up),
            ControlId::Down => Some(Heading::Down),
            ControlId::Left => Some(Heading::Left),
            ControlId::Right => Some(Heading::Right),
            ControlId::Action | ControlId::Tap => None,
        }
    }

    fn opposite(self) -> Self {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }

    fn step(self, from: Cell) -> Cell {
        match self {
            Heading::Up => Cell::new(from.x, from.y - 1),
            Heading::Down => Cell::new(from.x, from.y + 1),
            Heading::Left => Cell::new(from.x - 1, from.y),
            Heading::Right => Cell::new(from.x + 1, from.y),
        }
    }
}

pub struct SnakeGame {
    rng: StdRng,
    /// Tail at the front, head at the back.
    body: VecDeque<Cell>,
    /// Direction travelled on the last tick.
    travelled: Heading,
    /// Direction the next tick will take.
    heading: Heading,
    apple: Cell,
    score: u32,
    game_over: bool,
}

impl SnakeGame {
    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            rng: StdRng::seed_from_u64(seed),
            body: VecDeque::from([Cell::new(4, 5), Cell::new(5, 5)]),
            travelled: Heading::Right,
            heading: Heading::Right,
            apple: Cell::new(0, 0),
            score: 0,
            game_over: false,
        };
        if let Some(apple) = game.free_cell() {
            game.apple = apple;
        }
        game
    }

    pub fn head(&self) -> Cell {
        self.body.back().copied().unwrap_or(Cell::new(0, 0))
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn apple(&self) -> Cell {
        self.apple
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    fn free_cell(&mut self) -> Option<Cell> {
        let free: Vec<Cell> = (0..GRID_SIZE)
            .flat_map(|y| (0..GRID_SIZE).map(move |x| Cell::new(x, y)))
            .filter(|c| !self.body.contains(c))
            .collect();
        if free.is_empty() {
            None
        } else {
            Some(free[self.rng.gen_range(0..free.len())])
        }
    }

    #[cfg(test)]
    pub(crate) fn place_apple(&mut self, cell: Cell) {
        self.apple = cell;
    }

    fn finish(&mut self, ctx: &mut GameCtx) {
        self.game_over = true;
        tracing::debug!(score = self.score, len = self.body.len(), "snake finished");
        ctx.game_over(self.score);
    }
}

impl GameModule for SnakeGame {
    fn tick_interval_ms(&self) -> Option<u64> {
        Some(TICK_MS)
    }

    fn update(&mut self, ctx: &mut GameCtx) {
        if self.game_over {
            return;
        }

        let next = self.heading.step(self.head());
        if !next.in_bounds() || self.body.contains(&next) {
            self.finish(ctx);
            return;
        }

        self.travelled = self.heading;
        self.body.push_back(next);
        if next == self.apple {
            self.score += 1;
            match self.free_cell() {
                Some(cell) => self.apple = cell,
                None => {
                    // Board is full.
                    self.finish(ctx);
                }
            }
        } else {
            self.body.pop_front();
        }
    }

    fn handle_control(&mut self, control: ControlId, _ctx: &mut GameCtx) {
        if self.game_over {
            return;
        }
        let Some(wanted) = Heading::from_control(control) else {
            return;
        };
        if wanted == self.travelled.opposite() {
            return;
        }
        self.heading = wanted;
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let status = status_line(&[
            ("Length", self.body.len().to_string()),
            ("Score", self.score.to_string()),
        ]);
        let field = draw_frame(frame, area, "Micro Snake", Color::Rgb(80, 220, 80), status);

        let cell_w = 2;
        let board_w = (GRID_SIZE * cell_w) as usize;
        let board_h = GRID_SIZE as usize;
        let mut canvas = Canvas::new(
            board_w,
            board_h,
            Style::default().bg(Color::Rgb(11, 18, 32)),
        );

        for (i, c) in self.body.iter().enumerate() {
            let is_head = i + 1 == self.body.len();
            let color = if is_head {
                Color::Rgb(74, 222, 128)
            } else {
                Color::Rgb(34, 197, 94)
            };
            canvas.fill(c.x * cell_w, c.y, cell_w, 1, '█', Style::default().fg(color));
        }
        canvas.fill(
            self.apple.x * cell_w,
            self.apple.y,
            cell_w,
            1,
            '●',
            Style::default()
                .fg(Color::Rgb(239, 68, 68))
                .add_modifier(Modifier::BOLD),
        );

        let board = Rect {
            x: field.x + field.width.saturating_sub(board_w as u16) / 2,
            y: field.y,
            width: (board_w as u16).min(field.width),
            height: (board_h as u16).min(field.height),
        };
        frame.render_widget(Paragraph::new(canvas.into_lines()), board);
    }

    fn get_score(&self) -> u32 {
        self.score
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }
}
