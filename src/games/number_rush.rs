use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{draw_frame, field_rects, grid_cells, hit, status_line, GameCtx, GameModule};

const SIDE: u16 = 3;
const LAST: u8 = 9;

pub struct NumberRushGame {
    /// Row-major cell contents.
    numbers: Vec<u8>,
    next: u8,
    started_ms: Option<u64>,
    elapsed_ms: Option<u64>,
    score: u32,
    game_over: bool,
}

/// Faster runs score higher; never below one.
pub fn rush_score(elapsed_ms: u64) -> u32 {
    let seconds = elapsed_ms as f64 / 1000.0;
    (100.0 - seconds * 5.0).round().max(1.0) as u32
}

impl NumberRushGame {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut numbers: Vec<u8> = (1..=LAST).collect();
        numbers.shuffle(&mut rng);
        Self {
            numbers,
            next: 1,
            started_ms: None,
            elapsed_ms: None,
            score: 0,
            game_over: false,
        }
    }

    pub fn next_number(&self) -> u8 {
        self.next
    }

    /// Cell index holding `n`.
    pub fn position_of(&self, n: u8) -> Option<usize> {
        self.numbers.iter().position(|&v| v == n)
    }
}

impl GameModule for NumberRushGame {
    fn tick_interval_ms(&self) -> Option<u64> {
        None
    }

    fn handle_select(&mut self, index: usize, ctx: &mut GameCtx) {
        if self.game_over {
            return;
        }
        if self.numbers.get(index) != Some(&self.next) {
            return;
        }

        if self.next == 1 {
            self.started_ms = Some(ctx.now_ms());
        }
        if self.next == LAST {
            let elapsed = ctx.now_ms().saturating_sub(self.started_ms.unwrap_or(ctx.now_ms()));
            self.elapsed_ms = Some(elapsed);
            self.score = rush_score(elapsed);
            self.game_over = true;
            tracing::debug!(elapsed, score = self.score, "number rush finished");
            ctx.game_over(self.score);
            return;
        }
        self.next += 1;
    }

    fn targets(&self) -> usize {
        self.numbers.len()
    }

    fn target_at(&self, area: Rect, column: u16, row: u16) -> Option<usize> {
        let (_, field) = field_rects(area);
        grid_cells(field, SIDE, SIDE)
            .into_iter()
            .position(|cell| hit(cell, column, row))
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let mut items = vec![("Next", self.next.to_string())];
        if let Some(ms) = self.elapsed_ms {
            items.push(("Time", format!("{:.1} s", ms as f64 / 1000.0)));
        }
        let field = draw_frame(
            frame,
            area,
            "Number Rush",
            Color::Rgb(29, 78, 216),
            status_line(&items),
        );

        for (&n, cell) in self.numbers.iter().zip(grid_cells(field, SIDE, SIDE)) {
            let done = n < self.next || (self.game_over && n == LAST);
            let bg = if done {
                Color::Rgb(34, 197, 94)
            } else if n == self.next {
                Color::Rgb(29, 78, 216)
            } else {
                Color::Rgb(2, 6, 23)
            };
            let widget = Paragraph::new(n.to_string())
                .alignment(Alignment::Center)
                .style(
                    Style::default()
                        .bg(bg)
                        .fg(Color::Rgb(229, 231, 235))
                        .add_modifier(Modifier::BOLD),
                )
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(widget, cell);
        }
    }

    fn get_score(&self) -> u32 {
        self.score
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }
}
