use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::controls::ControlId;
use crate::games::canvas::{scale, Canvas};
use crate::games::{draw_frame, status_line, GameCtx, GameModule};

pub const FIELD_WIDTH: f32 = 220.0;
const BASE_WIDTH: f32 = 140.0;
const SPEED: f32 = 2.2;
pub const MAX_LEVELS: usize = 8;
const TICK_MS: u64 = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub x: f32,
    pub width: f32,
}

impl Span {
    fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Intersection with `other`, if it has positive width.
    pub fn overlap(&self, other: &Span) -> Option<Span> {
        let left = self.x.max(other.x);
        let right = self.right().min(other.right());
        (right - left > 0.0).then(|| Span {
            x: left,
            width: right - left,
        })
    }
}

pub struct StackTowerGame {
    /// Base first; every later entry is a placed level.
    tower: Vec<Span>,
    moving: Span,
    dir: f32,
    score: u32,
    game_over: bool,
}

impl StackTowerGame {
    pub fn new(_seed: u64) -> Self {
        let base = Span {
            x: (FIELD_WIDTH - BASE_WIDTH) / 2.0,
            width: BASE_WIDTH,
        };
        Self {
            tower: vec![base],
            moving: base,
            dir: 1.0,
            score: 0,
            game_over: false,
        }
    }

    pub fn moving(&self) -> Span {
        self.moving
    }

    pub fn top(&self) -> Span {
        self.tower[self.tower.len() - 1]
    }

    pub fn levels(&self) -> usize {
        self.tower.len() - 1
    }

    #[cfg(test)]
    pub(crate) fn set_moving_x(&mut self, x: f32) {
        self.moving.x = x;
    }

    fn place(&mut self, ctx: &mut GameCtx) {
        let Some(placed) = self.moving.overlap(&self.top()) else {
            self.game_over = true;
            tracing::debug!(score = self.score, "stack missed");
            ctx.game_over(self.score);
            return;
        };

        self.tower.push(placed);
        self.score += 1;
        if self.levels() >= MAX_LEVELS {
            self.game_over = true;
            tracing::debug!(score = self.score, "stack complete");
            ctx.game_over(self.score);
            return;
        }
        self.moving = placed;
        self.dir = 1.0;
    }
}

impl GameModule for StackTowerGame {
    fn tick_interval_ms(&self) -> Option<u64> {
        Some(TICK_MS)
    }

    fn update(&mut self, _ctx: &mut GameCtx) {
        if self.game_over {
            return;
        }
        let mut x = self.moving.x + SPEED * self.dir;
        if x < 0.0 {
            x = 0.0;
            self.dir = 1.0;
        } else if x + self.moving.width > FIELD_WIDTH {
            x = FIELD_WIDTH - self.moving.width;
            self.dir = -1.0;
        }
        self.moving.x = x;
    }

    fn handle_control(&mut self, control: ControlId, ctx: &mut GameCtx) {
        if !self.game_over && control == ControlId::Action {
            self.place(ctx);
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let status = status_line(&[
            ("Level", format!("{}/{}", self.levels(), MAX_LEVELS)),
            ("Score", self.score.to_string()),
        ]);
        let field = draw_frame(frame, area, "Stack Tower", Color::Rgb(250, 204, 21), status);
        let (w, h) = (field.width as usize, field.height as usize);
        if w == 0 || h == 0 {
            return;
        }

        let mut canvas = Canvas::new(w, h, Style::default().bg(Color::Rgb(2, 6, 23)));
        let row_for = |level: usize| h as i32 - 1 - level as i32;
        let draw = |canvas: &mut Canvas, span: &Span, row: i32, color: Color| {
            let x0 = scale(span.x, FIELD_WIDTH, w);
            let x1 = scale(span.right(), FIELD_WIDTH, w).max(x0 + 1);
            canvas.fill(x0, row, x1 - x0, 1, '▀', Style::default().fg(color));
        };

        for (level, span) in self.tower.iter().enumerate() {
            let shade = 120 + (level as u8).saturating_mul(16);
            draw(&mut canvas, span, row_for(level), Color::Rgb(shade, 90, 246));
        }
        if !self.game_over {
            draw(
                &mut canvas,
                &self.moving,
                row_for(self.tower.len()),
                Color::Rgb(250, 204, 21),
            );
        }
        frame.render_widget(Paragraph::new(canvas.into_lines()), field);
    }

    fn get_score(&self) -> u32 {
        self.score
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }
}
