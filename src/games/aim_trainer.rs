use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{
    draw_frame, field_rects, hit, percent_rect, status_line, Countdown, GameCtx, GameModule,
};

const DURATION_SECS: u32 = 15;

pub struct AimTrainerGame {
    rng: StdRng,
    countdown: Countdown,
    target: (f32, f32),
    hits: u32,
    game_over: bool,
}

impl AimTrainerGame {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            countdown: Countdown::new(DURATION_SECS),
            target: (50.0, 50.0),
            hits: 0,
            game_over: false,
        }
    }

    pub fn target(&self) -> (f32, f32) {
        self.target
    }

    fn target_rect(&self, area: Rect) -> Rect {
        let (_, field) = field_rects(area);
        percent_rect(field, self.target.0, self.target.1, 5, 3)
    }
}

impl GameModule for AimTrainerGame {
    fn tick_interval_ms(&self) -> Option<u64> {
        Some(1000)
    }

    fn update(&mut self, ctx: &mut GameCtx) {
        if !self.game_over && self.countdown.tick() {
            self.game_over = true;
            ctx.game_over(self.hits);
        }
    }

    fn handle_select(&mut self, index: usize, _ctx: &mut GameCtx) {
        if self.game_over || index != 0 {
            return;
        }
        self.hits += 1;
        self.target = (
            self.rng.gen_range(10.0..90.0),
            self.rng.gen_range(10.0..80.0),
        );
    }

    fn targets(&self) -> usize {
        usize::from(!self.game_over)
    }

    fn target_at(&self, area: Rect, column: u16, row: u16) -> Option<usize> {
        (!self.game_over && hit(self.target_rect(area), column, row)).then_some(0)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let status = status_line(&[
            ("Time", format!("{}s", self.countdown.seconds_left())),
            ("Hits", self.hits.to_string()),
        ]);
        draw_frame(frame, area, "Aim Trainer", Color::Rgb(251, 146, 60), status);
        let rings = vec![
            Line::from(Span::styled("╭─╮", Style::default().fg(Color::Rgb(239, 68, 68)))),
            Line::from(vec![
                Span::styled("│", Style::default().fg(Color::Rgb(239, 68, 68))),
                Span::styled("◉", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
                Span::styled("│", Style::default().fg(Color::Rgb(239, 68, 68))),
            ]),
            Line::from(Span::styled("╰─╯", Style::default().fg(Color::Rgb(239, 68, 68)))),
        ];
        frame.render_widget(
            Paragraph::new(rings).alignment(Alignment::Center),
            self.target_rect(area),
        );
    }

    fn get_score(&self) -> u32 {
        self.hits
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }
}
