use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::controls::ControlId;
use crate::games::canvas::Canvas;
use crate::games::{draw_frame, status_line, GameCtx, GameModule};

pub const COLUMNS: i32 = 3;
pub const ROWS: i32 = 6;
const SPAWN_CHANCE: f64 = 0.4;
const TICK_MS: u64 = 220;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallingBlock {
    pub x: i32,
    pub y: i32,
}

pub struct DodgeBlocksGame {
    rng: StdRng,
    player_x: i32,
    blocks: Vec<FallingBlock>,
    score: u32,
    game_over: bool,
}

impl DodgeBlocksGame {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            player_x: 1,
            blocks: Vec::new(),
            score: 0,
            game_over: false,
        }
    }

    pub fn player_x(&self) -> i32 {
        self.player_x
    }

    pub fn blocks(&self) -> &[FallingBlock] {
        &self.blocks
    }

    fn check_collision(&mut self, ctx: &mut GameCtx) {
        let hit = self
            .blocks
            .iter()
            .any(|b| b.y == ROWS - 1 && b.x == self.player_x);
        if hit {
            self.game_over = true;
            tracing::debug!(score = self.score, column = self.player_x, "dodge collision");
            ctx.game_over(self.score);
        }
    }
}

impl GameModule for DodgeBlocksGame {
    fn tick_interval_ms(&self) -> Option<u64> {
        Some(TICK_MS)
    }

    fn update(&mut self, ctx: &mut GameCtx) {
        if self.game_over {
            return;
        }

        for block in &mut self.blocks {
            block.y += 1;
        }
        self.blocks.retain(|b| b.y < ROWS);
        if self.rng.gen_bool(SPAWN_CHANCE) {
            let x = self.rng.gen_range(0..COLUMNS);
            self.blocks.push(FallingBlock { x, y: 0 });
        }
        self.score += 1;

        self.check_collision(ctx);
    }

    fn handle_control(&mut self, control: ControlId, ctx: &mut GameCtx) {
        if self.game_over {
            return;
        }
        match control {
            ControlId::Left => self.player_x = (self.player_x - 1).max(0),
            ControlId::Right => self.player_x = (self.player_x + 1).min(COLUMNS - 1),
            _ => return,
        }
        self.check_collision(ctx);
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let status = status_line(&[("Score", self.score.to_string())]);
        let field = draw_frame(frame, area, "Dodge Blocks", Color::Rgb(167, 139, 250), status);

        let cell_w = (field.width as i32 / COLUMNS).clamp(1, 8);
        let cell_h = (field.height as i32 / ROWS).clamp(1, 3);
        let (w, h) = ((cell_w * COLUMNS) as usize, (cell_h * ROWS) as usize);
        let mut canvas = Canvas::new(w, h, Style::default().bg(Color::Rgb(13, 15, 22)));

        for b in &self.blocks {
            canvas.fill(
                b.x * cell_w,
                b.y * cell_h,
                cell_w,
                cell_h,
                '█',
                Style::default().fg(Color::Rgb(249, 115, 22)),
            );
        }
        canvas.fill(
            self.player_x * cell_w,
            (ROWS - 1) * cell_h,
            cell_w,
            cell_h,
            '▓',
            Style::default().fg(Color::Rgb(34, 211, 238)),
        );

        let board = Rect {
            x: field.x + field.width.saturating_sub(w as u16) / 2,
            y: field.y,
            width: (w as u16).min(field.width),
            height: (h as u16).min(field.height),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::Driver;

    #[test]
    fn movement_is_clamped() {
        let mut d = Driver::new(DodgeBlocksGame::new(1));
        d.control(ControlId::Left);
        d.control(ControlId::Left);
        assert_eq!(d.game.player_x(), 0);
        d.control(ControlId::Right);
        d.control(ControlId::Right);
        d.control(ControlId::Right);
        assert_eq!(d.game.player_x(), COLUMNS - 1);
    }

    #[test]
    fn blocks_fall_and_leave() {
        let mut d = Driver::new(DodgeBlocksGame::new(1));
        d.game.blocks = vec![FallingBlock { x: 0, y: 4 }];
        d.game.player_x = 2;
        d.ticks(1);
        assert!(d.game.blocks().contains(&FallingBlock { x: 0, y: 5 }));
        d.game.blocks.retain(|b| b.y == 5);
        d.ticks(1);
        assert!(d.game.blocks().iter().all(|b| b.y == 0));
        assert_eq!(d.game.get_score(), 2);
    }

    #[test]
    fn block_landing_on_player_ends_game() {
        let mut d = Driver::new(DodgeBlocksGame::new(1));
        d.game.blocks = vec![FallingBlock { x: 1, y: 4 }];
        d.ticks(1);
        assert_eq!(d.outcome, Some(1));
    }

    #[test]
    fn stepping_under_a_block_ends_game() {
        let mut d = Driver::new(DodgeBlocksGame::new(1));
        d.game.blocks = vec![FallingBlock { x: 0, y: ROWS - 1 }];
        d.control(ControlId::Left);
        assert_eq!(d.outcome, Some(0));
        d.control(ControlId::Right);
        assert_eq!(d.game.player_x(), 0);
    }

    #[test]
    fn spawns_roughly_forty_percent() {
        let mut d = Driver::new(DodgeBlocksGame::new(77));
        let mut spawned = 0;
        for _ in 0..500 {
            d.game.blocks.clear();
            d.ticks(1);
            spawned += d.game.blocks().len();
        }
        assert!((150..250).contains(&spawned), "spawned {spawned}");
        assert!(d.outcome.is_none());
    }
}
