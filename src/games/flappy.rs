use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::controls::ControlId;
use crate::games::canvas::{scale, Canvas};
use crate::games::{draw_frame, status_line, GameCtx, GameModule};

pub const WIDTH: f32 = 220.0;
pub const HEIGHT: f32 = 320.0;
pub const PLAYER_X: f32 = 60.0;
const RADIUS: f32 = 12.0;
const GRAVITY: f32 = 0.6;
const JUMP: f32 = -6.0;
const PIPE_SPEED: f32 = 2.2;
const PIPE_GAP: f32 = 90.0;
const PIPE_WIDTH: f32 = 50.0;
const SPAWN_X: f32 = 260.0;
const SPAWN_WHEN_BEFORE: f32 = 80.0;
const TICK_MS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    pub x: f32,
    pub gap_y: f32,
}

impl Pipe {
    /// Closed-interval overlap with the dot's bounding box, outside the gap.
    fn hits(&self, y: f32) -> bool {
        let (left, right) = (PLAYER_X - RADIUS, PLAYER_X + RADIUS);
        let (top, bottom) = (y - RADIUS, y + RADIUS);
        let x_overlap = right >= self.x && left <= self.x + PIPE_WIDTH;
        x_overlap && (top < self.gap_y || bottom > self.gap_y + PIPE_GAP)
    }
}

pub struct FlappyGame {
    rng: StdRng,
    y: f32,
    velocity: f32,
    pipes: Vec<Pipe>,
    score: u32,
    game_over: bool,
}

impl FlappyGame {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            y: HEIGHT / 2.0,
            velocity: 0.0,
            pipes: vec![Pipe {
                x: SPAWN_X,
                gap_y: 80.0,
            }],
            score: 0,
            game_over: false,
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    fn crashed(&self) -> bool {
        self.y < 0.0 || self.y > HEIGHT || self.pipes.iter().any(|p| p.hits(self.y))
    }
}

impl GameModule for FlappyGame {
    fn tick_interval_ms(&self) -> Option<u64> {
        Some(TICK_MS)
    }

    fn update(&mut self, ctx: &mut GameCtx) {
        if self.game_over {
            return;
        }

        self.y += self.velocity;
        self.velocity += GRAVITY;

        for pipe in &mut self.pipes {
            pipe.x -= PIPE_SPEED;
        }
        if self.pipes.last().map_or(true, |p| p.x < SPAWN_WHEN_BEFORE) {
            let gap_y = 60.0 + self.rng.gen::<f32>() * 110.0;
            self.pipes.push(Pipe {
                x: SPAWN_X,
                gap_y,
            });
        }
        self.pipes.retain(|p| p.x + PIPE_WIDTH > -20.0);
        self.score += 1;

        if self.crashed() {
            self.game_over = true;
            tracing::debug!(score = self.score, y = self.y, "flappy crashed");
            ctx.game_over(self.score);
        }
    }

    fn handle_control(&mut self, control: ControlId, _ctx: &mut GameCtx) {
        if self.game_over || control != ControlId::Tap {
            return;
        }
        self.velocity = JUMP;
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let status = status_line(&[("Score", self.score.to_string())]);
        let field = draw_frame(frame, area, "Flappy Dot", Color::Rgb(56, 189, 248), status);
        let (w, h) = (field.width as usize, field.height as usize);
        if w == 0 || h == 0 {
            return;
        }

        let mut canvas = Canvas::new(w, h, Style::default().bg(Color::Rgb(8, 47, 73)));
        let pipe_style = Style::default().fg(Color::Rgb(34, 197, 94));
        for pipe in &self.pipes {
            let x0 = scale(pipe.x, WIDTH, w);
            let x1 = scale(pipe.x + PIPE_WIDTH, WIDTH, w).max(x0 + 1);
            let gap_top = scale(pipe.gap_y, HEIGHT, h);
            let gap_bottom = scale(pipe.gap_y + PIPE_GAP, HEIGHT, h);
            canvas.fill(x0, 0, x1 - x0, gap_top, '█', pipe_style);
            canvas.fill(x0, gap_bottom, x1 - x0, h as i32 - gap_bottom, '█', pipe_style);
        }
        canvas.put(
            scale(PLAYER_X, WIDTH, w),
            scale(self.y, HEIGHT, h),
            '●',
            Style::default()
                .fg(Color::Rgb(250, 204, 21))
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(Paragraph::new(canvas.into_lines()), field);
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

    #[test]
    fn falls_out_of_the_field_without_taps() {
        let mut d = Driver::new(FlappyGame::new(1));
        d.ticks(23);
        assert!(d.outcome.is_none());
        d.ticks(1);
        assert_eq!(d.outcome, Some(24));
        assert!(d.game.y() > HEIGHT);
    }

    #[test]
    fn tap_sets_upward_velocity() {
        let mut d = Driver::new(FlappyGame::new(1));
        d.ticks(3);
        d.control(ControlId::Tap);
        assert_eq!(d.game.velocity(), JUMP);
        let before = d.game.y();
        d.ticks(1);
        assert!(d.game.y() < before);
    }

    #[test]
    fn gravity_applies_after_moving() {
        let mut d = Driver::new(FlappyGame::new(1));
        d.ticks(1);
        assert_eq!(d.game.y(), HEIGHT / 2.0);
        assert_eq!(d.game.velocity(), GRAVITY);
        d.ticks(1);
        assert_eq!(d.game.y(), HEIGHT / 2.0 + GRAVITY);
    }

    #[test]
    fn pipes_scroll_and_respawn() {
        let mut d = Driver::new(FlappyGame::new(9));
        d.ticks(1);
        assert_eq!(d.game.pipes().len(), 1);
        assert!((d.game.pipes()[0].x - (SPAWN_X - PIPE_SPEED)).abs() < 1e-3);

        // Hold the dot in the middle of the field so only pipes matter.
        let mut spawned = false;
        for _ in 0..90 {
            d.game.y = HEIGHT / 2.0;
            d.game.velocity = 0.0;
            d.game.pipes.iter_mut().for_each(|p| p.gap_y = HEIGHT / 2.0 - 45.0);
            d.ticks(1);
            if d.game.pipes().len() > 1 {
                spawned = true;
                let newest = d.game.pipes().last().copied().unwrap();
                assert_eq!(newest.x, SPAWN_X);
                assert!((60.0..170.0).contains(&newest.gap_y));
                break;
            }
        }
        assert!(spawned);
    }

    #[test]
    fn pipe_outside_gap_ends_game() {
        let mut d = Driver::new(FlappyGame::new(1));
        d.game.pipes = vec![Pipe {
            x: PLAYER_X,
            gap_y: 0.0,
        }];
        d.ticks(1);
        assert_eq!(d.outcome, Some(1));
    }

    #[test]
    fn touching_edge_counts_as_overlap() {
        let pipe = Pipe {
            x: PLAYER_X + RADIUS,
            gap_y: 0.0,
        };
        assert!(pipe.hits(HEIGHT / 2.0));
        let trailing = Pipe {
            x: PLAYER_X - RADIUS - PIPE_WIDTH,
            gap_y: 0.0,
        };
        assert!(trailing.hits(HEIGHT / 2.0));
        let inside_gap = Pipe {
            x: PLAYER_X,
            gap_y: HEIGHT / 2.0 - 45.0,
        };
        assert!(!inside_gap.hits(HEIGHT / 2.0));
    }

    #[test]
    fn same_seed_same_game() {
        let mut a = Driver::new(FlappyGame::new(42));
        let mut b = Driver::new(FlappyGame::new(42));
        for _ in 0..40 {
            a.control(ControlId::Tap);
            b.control(ControlId::Tap);
            a.ticks(8);
            b.ticks(8);
        }
        assert_eq!(a.outcome, b.outcome);
        assert_eq!(a.game.get_score(), b.game.get_score());
    }
}
