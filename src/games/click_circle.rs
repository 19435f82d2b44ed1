use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{
    draw_frame, field_rects, hit, percent_rect, status_line, Countdown, GameCtx, GameModule,
};
use crate::scheduler::TimerKey;

const DURATION_SECS: u32 = 10;
const REAPPEAR_MS: u64 = 200;
const REAPPEAR: TimerKey = TimerKey(1);
const CIRCLE_W: u16 = 6;
const CIRCLE_H: u16 = 3;

pub struct ClickCircleGame {
    rng: StdRng,
    countdown: Countdown,
    /// Circle centre as percentages of the field.
    pos: (f32, f32),
    visible: bool,
    hits: u32,
    game_over: bool,
}

impl ClickCircleGame {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            countdown: Countdown::new(DURATION_SECS),
            pos: (50.0, 50.0),
            visible: true,
            hits: 0,
            game_over: false,
        }
    }

    pub fn is_circle_visible(&self) -> bool {
        self.visible
    }

    pub fn seconds_left(&self) -> u32 {
        self.countdown.seconds_left()
    }

    pub fn position(&self) -> (f32, f32) {
        self.pos
    }

    fn circle_rect(&self, area: Rect) -> Rect {
        let (_, field) = field_rects(area);
        percent_rect(field, self.pos.0, self.pos.1, CIRCLE_W, CIRCLE_H)
    }
}

impl GameModule for ClickCircleGame {
    fn tick_interval_ms(&self) -> Option<u64> {
        Some(1000)
    }

    fn update(&mut self, ctx: &mut GameCtx) {
        if self.game_over {
            return;
        }
        if self.countdown.tick() {
            self.game_over = true;
            ctx.game_over(self.hits);
        }
    }

    fn handle_select(&mut self, index: usize, ctx: &mut GameCtx) {
        if self.game_over || !self.visible || index != 0 {
            return;
        }
        self.hits += 1;
        self.visible = false;
        ctx.schedule(REAPPEAR_MS, REAPPEAR);
    }

    fn on_timer(&mut self, key: TimerKey, _ctx: &mut GameCtx) {
        if key != REAPPEAR || self.game_over {
            return;
        }
        self.pos = (
            self.rng.gen_range(10.0..90.0),
            self.rng.gen_range(10.0..90.0),
        );
        self.visible = true;
    }

    fn targets(&self) -> usize {
        usize::from(self.visible && !self.game_over)
    }

    fn target_at(&self, area: Rect, column: u16, row: u16) -> Option<usize> {
        if self.targets() == 0 {
            return None;
        }
        hit(self.circle_rect(area), column, row).then_some(0)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let status = status_line(&[
            ("Time", format!("{}s", self.countdown.seconds_left())),
            ("Hits", self.hits.to_string()),
        ]);
        draw_frame(frame, area, "Click the Circle", Color::Rgb(244, 114, 182), status);
        if !self.visible {
            return;
        }
        let circle = Paragraph::new("( )")
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(Color::Rgb(236, 72, 153))
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
        frame.render_widget(circle, self.circle_rect(area));
    }

    fn get_score(&self) -> u32 {
        self.hits
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }
}
