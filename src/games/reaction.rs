use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::controls::ControlId;
use crate::games::{draw_frame, status_line, GameCtx, GameModule};
use crate::scheduler::TimerKey;

const GO: TimerKey = TimerKey(1);
const RETRY: TimerKey = TimerKey(2);
const REPORT: TimerKey = TimerKey(3);

const MIN_WAIT_MS: u64 = 1000;
const WAIT_SPREAD_MS: u64 = 2000;
const TOO_SOON_MS: u64 = 1000;
const REPORT_DELAY_MS: u64 = 700;
const BASELINE_MS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Waiting,
    TooSoon,
    Ready { since_ms: u64 },
    Clicked { reaction_ms: u64 },
}

pub struct ReactionGame {
    rng: StdRng,
    phase: Phase,
    false_starts: u32,
    score: u32,
    game_over: bool,
}

/// Score for a measured reaction: faster is better, never below one.
pub fn reaction_score(reaction_ms: u64) -> u32 {
    BASELINE_MS.saturating_sub(reaction_ms).max(1) as u32
}

impl ReactionGame {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            phase: Phase::Waiting,
            false_starts: 0,
            score: 0,
            game_over: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn false_starts(&self) -> u32 {
        self.false_starts
    }

    fn arm(&mut self, ctx: &mut GameCtx) {
        let wait = MIN_WAIT_MS + self.rng.gen_range(0..WAIT_SPREAD_MS);
        tracing::trace!(wait, "reaction armed");
        ctx.schedule(wait, GO);
    }
}

impl GameModule for ReactionGame {
    fn tick_interval_ms(&self) -> Option<u64> {
        None
    }

    fn start(&mut self, ctx: &mut GameCtx) {
        self.arm(ctx);
    }

    fn handle_control(&mut self, control: ControlId, ctx: &mut GameCtx) {
        if self.game_over || control != ControlId::Tap {
            return;
        }
        match self.phase {
            Phase::Waiting => {
                self.false_starts += 1;
                ctx.cancel(GO);
                self.phase = Phase::TooSoon;
                ctx.schedule(TOO_SOON_MS, RETRY);
            }
            Phase::Ready { since_ms } => {
                let reaction_ms = ctx.now_ms().saturating_sub(since_ms);
                self.phase = Phase::Clicked { reaction_ms };
                ctx.schedule(REPORT_DELAY_MS, REPORT);
            }
            Phase::TooSoon | Phase::Clicked { .. } => {}
        }
    }

    fn on_timer(&mut self, key: TimerKey, ctx: &mut GameCtx) {
        if self.game_over {
            return;
        }
        match (key, self.phase) {
            (GO, Phase::Waiting) => {
                self.phase = Phase::Ready {
                    since_ms: ctx.now_ms(),
                };
            }
            (RETRY, Phase::TooSoon) => {
                self.phase = Phase::Waiting;
                self.arm(ctx);
            }
            (REPORT, Phase::Clicked { reaction_ms }) => {
                self.score = reaction_score(reaction_ms);
                self.game_over = true;
                ctx.game_over(self.score);
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let status = status_line(&[("False starts", self.false_starts.to_string())]);
        let field = draw_frame(frame, area, "Reaction Time", Color::Rgb(96, 165, 250), status);

        let (message, color) = match self.phase {
            Phase::Waiting => ("Wait for green…".to_string(), Color::Rgb(248, 113, 113)),
            Phase::TooSoon => ("Too soon!".to_string(), Color::Rgb(249, 115, 22)),
            Phase::Ready { .. } => ("TAP!".to_string(), Color::Rgb(74, 222, 128)),
            Phase::Clicked { reaction_ms } => (
                format!("Reaction: {reaction_ms} ms"),
                Color::Rgb(96, 165, 250),
            ),
        };
        let top = field.height.saturating_sub(1) / 2;
        let mut lines = vec![Line::from(""); top as usize];
        lines.push(Line::from(Span::styled(
            message,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), field);
    }

    fn get_score(&self) -> u32 {
        self.score
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::Driver;

    /// Run until the "go" signal and return the time it fired.
    fn wait_for_go(d: &mut Driver<ReactionGame>) -> u64 {
        for _ in 0..4000 {
            if let Phase::Ready { since_ms } = d.game.phase() {
                return since_ms;
            }
            d.advance(1);
        }
        panic!("go never fired");
    }

    #[test]
    fn go_fires_between_one_and_three_seconds() {
        for seed in 0..20 {
            let mut d = Driver::new(ReactionGame::new(seed));
            let at = wait_for_go(&mut d);
            assert!((1000..3000).contains(&at), "seed {seed}: {at}");
        }
    }

    #[test]
    fn reaction_reported_after_delay() {
        let mut d = Driver::new(ReactionGame::new(5));
        wait_for_go(&mut d);
        d.advance(180);
        d.control(ControlId::Tap);
        assert_eq!(d.game.phase(), Phase::Clicked { reaction_ms: 180 });
        d.advance(699);
        assert!(d.outcome.is_none());
        d.advance(1);
        assert_eq!(d.outcome, Some(120));
    }

    #[test]
    fn slow_reaction_scores_one() {
        assert_eq!(reaction_score(0), 300);
        assert_eq!(reaction_score(299), 1);
        assert_eq!(reaction_score(300), 1);
        assert_eq!(reaction_score(5000), 1);
    }

    #[test]
    fn false_start_is_not_terminal() {
        let mut d = Driver::new(ReactionGame::new(8));
        d.advance(500);
        d.control(ControlId::Tap);
        assert_eq!(d.game.phase(), Phase::TooSoon);
        assert_eq!(d.game.false_starts(), 1);

        // Taps while "too soon" is showing do nothing.
        d.control(ControlId::Tap);
        assert_eq!(d.game.false_starts(), 1);

        // The cancelled go signal never fires.
        d.advance(999);
        assert_eq!(d.game.phase(), Phase::TooSoon);
        d.advance(1);
        assert_eq!(d.game.phase(), Phase::Waiting);

        let at = wait_for_go(&mut d);
        assert!((2500..4500).contains(&at));
        d.control(ControlId::Tap);
        d.advance(700);
        assert_eq!(d.outcome, Some(300));
    }

    #[test]
    fn extra_taps_after_click_are_ignored() {
        let mut d = Driver::new(ReactionGame::new(2));
        wait_for_go(&mut d);
        d.advance(50);
        d.control(ControlId::Tap);
        d.advance(100);
        d.control(ControlId::Tap);
        assert_eq!(d.game.phase(), Phase::Clicked { reaction_ms: 50 });
        d.advance(600);
        assert_eq!(d.outcome, Some(250));
        assert_eq!(d.reports, 1);
    }
}
