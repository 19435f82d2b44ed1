use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::controls::ControlId;
use crate::games::{draw_frame, status_line, GameCtx, GameModule};
use crate::scheduler::TimerKey;

const ROUNDS: u32 = 12;
const FEEDBACK_MS: u64 = 500;
const CLEAR_FEEDBACK: TimerKey = TimerKey(1);

const COLORS: [(&str, Color); 4] = [
    ("RED", Color::Rgb(239, 68, 68)),
    ("BLUE", Color::Rgb(59, 130, 246)),
    ("GREEN", Color::Rgb(34, 197, 94)),
    ("YELLOW", Color::Rgb(234, 179, 8)),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Wrong,
}

pub struct ColorMatchGame {
    rng: StdRng,
    round: u32,
    word: usize,
    ink: usize,
    feedback: Option<Feedback>,
    score: u32,
    game_over: bool,
}

impl ColorMatchGame {
    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            rng: StdRng::seed_from_u64(seed),
            round: 1,
            word: 0,
            ink: 0,
            feedback: None,
            score: 0,
            game_over: false,
        };
        game.deal();
        game
    }

    /// Pick a word and an ink colour; they agree half of the time.
    fn deal(&mut self) {
        self.word = self.rng.gen_range(0..COLORS.len());
        self.ink = if self.rng.gen_bool(0.5) {
            self.word
        } else {
            let other = self.rng.gen_range(0..COLORS.len() - 1);
            if other >= self.word {
                other + 1
            } else {
                other
            }
        };
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_match(&self) -> bool {
        self.word == self.ink
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }
}

impl GameModule for ColorMatchGame {
    fn tick_interval_ms(&self) -> Option<u64> {
        None
    }

    fn handle_control(&mut self, control: ControlId, ctx: &mut GameCtx) {
        if self.game_over {
            return;
        }
        let says_match = match control {
            ControlId::Right => true,
            ControlId::Left => false,
            _ => return,
        };

        let correct = says_match == self.is_match();
        if correct {
            self.score += 1;
        }
        self.feedback = Some(if correct {
            Feedback::Correct
        } else {
            Feedback::Wrong
        });

        if self.round >= ROUNDS {
            self.game_over = true;
            ctx.game_over(self.score);
            return;
        }

        self.round += 1;
        self.deal();
        ctx.cancel(CLEAR_FEEDBACK);
        ctx.schedule(FEEDBACK_MS, CLEAR_FEEDBACK);
    }

    fn on_timer(&mut self, key: TimerKey, _ctx: &mut GameCtx) {
        if key == CLEAR_FEEDBACK {
            self.feedback = None;
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let status = status_line(&[
            ("Round", format!("{}/{}", self.round, ROUNDS)),
            ("Score", self.score.to_string()),
        ]);
        let field = draw_frame(frame, area, "Color Match", Color::Rgb(232, 121, 249), status);

        let (word, _) = COLORS[self.word];
        let (_, ink) = COLORS[self.ink];
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                word,
                Style::default().fg(ink).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "◀ no match    match ▶",
                Style::default().fg(Color::Rgb(156, 163, 175)),
            )),
        ];
        match self.feedback {
            Some(Feedback::Correct) => lines.push(Line::from(Span::styled(
                "Correct!",
                Style::default().fg(Color::Rgb(34, 197, 94)),
            ))),
            Some(Feedback::Wrong) => lines.push(Line::from(Span::styled(
                "Wrong",
                Style::default().fg(Color::Rgb(249, 115, 22)),
            ))),
            None => {}
        }
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), field);
    }

    fn get_score(&self) -> u32 {
        self.score
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }
}
