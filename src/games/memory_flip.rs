use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{draw_frame, field_rects, grid_cells, hit, status_line, GameCtx, GameModule};
use crate::scheduler::TimerKey;

const SYMBOLS: [char; 3] = ['◆', '●', '★'];
const HIDE_DELAY_MS: u64 = 700;
const HIDE: TimerKey = TimerKey(1);
const COLS: u16 = 3;
const ROWS: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub symbol: char,
    pub open: bool,
    pub matched: bool,
}

impl Card {
    fn face_down(symbol: char) -> Self {
        Self {
            symbol,
            open: false,
            matched: false,
        }
    }
}

pub struct MemoryFlipGame {
    cards: Vec<Card>,
    /// Indices of the cards revealed in the current move.
    picks: Vec<usize>,
    locked: bool,
    moves: u32,
    score: u32,
    game_over: bool,
}

/// Final score for a solved board.
pub fn memory_score(moves: u32) -> u32 {
    100u32.saturating_sub(moves.saturating_mul(10)).max(1)
}

impl MemoryFlipGame {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut deck: Vec<char> = SYMBOLS.iter().flat_map(|&s| [s, s]).collect();
        deck.shuffle(&mut rng);
        Self::with_deck(&deck)
    }

    /// Unshuffled board, for fixed layouts.
    pub fn with_deck(symbols: &[char]) -> Self {
        Self {
            cards: symbols.iter().map(|&s| Card::face_down(s)).collect(),
            picks: Vec::with_capacity(2),
            locked: false,
            moves: 0,
            score: 0,
            game_over: false,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn resolve_pair(&mut self, first: usize, second: usize, ctx: &mut GameCtx) {
        self.moves += 1;
        if self.cards[first].symbol == self.cards[second].symbol {
            self.cards[first].matched = true;
            self.cards[second].matched = true;
            self.picks.clear();
            if self.cards.iter().all(|c| c.matched) {
                self.score = memory_score(self.moves);
                self.game_over = true;
                tracing::debug!(moves = self.moves, score = self.score, "memory solved");
                ctx.game_over(self.score);
            }
        } else {
            self.locked = true;
            ctx.schedule(HIDE_DELAY_MS, HIDE);
        }
    }
}

impl GameModule for MemoryFlipGame {
    fn tick_interval_ms(&self) -> Option<u64> {
        None
    }

    fn handle_select(&mut self, index: usize, ctx: &mut GameCtx) {
        if self.game_over || self.locked {
            return;
        }
        let Some(card) = self.cards.get_mut(index) else {
            return;
        };
        if card.open || card.matched {
            return;
        }
        card.open = true;
        self.picks.push(index);

        if let &[first, second] = self.picks.as_slice() {
            self.resolve_pair(first, second, ctx);
        }
    }

    fn on_timer(&mut self, key: TimerKey, _ctx: &mut GameCtx) {
        if key != HIDE || self.game_over {
            return;
        }
        for i in self.picks.drain(..) {
            self.cards[i].open = false;
        }
        self.locked = false;
    }

    fn targets(&self) -> usize {
        self.cards.len()
    }

    fn target_at(&self, area: Rect, column: u16, row: u16) -> Option<usize> {
        let (_, field) = field_rects(area);
        grid_cells(field, COLS, ROWS)
            .into_iter()
            .position(|cell| hit(cell, column, row))
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let mut items = vec![("Moves", self.moves.to_string())];
        if self.game_over {
            items.push(("Done", "✓".to_string()));
        }
        let field = draw_frame(
            frame,
            area,
            "Memory Flip",
            Color::Rgb(45, 212, 191),
            status_line(&items),
        );

        for (i, (card, cell)) in self
            .cards
            .iter()
            .zip(grid_cells(field, COLS, ROWS))
            .enumerate()
        {
            let shown = card.open || card.matched;
            let (face, fg) = if shown {
                (card.symbol.to_string(), Color::Rgb(229, 231, 235))
            } else {
                ("?".to_string(), Color::Rgb(107, 114, 128))
            };
            let border = if card.matched {
                Color::Rgb(34, 197, 94)
            } else {
                Color::Rgb(75, 85, 99)
            };
            let widget = Paragraph::new(face)
                .alignment(Alignment::Center)
                .style(Style::default().fg(fg).add_modifier(Modifier::BOLD))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(border))
                        .title(format!("{}", i + 1)),
                );
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::Driver;

    const DECK: [char; 6] = ['◆', '●', '◆', '★', '●', '★'];

    #[test]
    fn shuffled_deck_has_three_pairs() {
        let game = MemoryFlipGame::new(4);
        for s in SYMBOLS {
            assert_eq!(game.cards().iter().filter(|c| c.symbol == s).count(), 2);
        }
    }

    #[test]
    fn match_unlocks_immediately() {
        let mut d = Driver::new(MemoryFlipGame::with_deck(&DECK));
        d.select(0);
        d.select(2);
        assert!(d.game.cards()[0].matched && d.game.cards()[2].matched);
        assert!(!d.game.is_locked());
        d.select(1);
        assert!(d.game.cards()[1].open);
    }

    #[test]
    fn mismatch_hides_after_delay() {
        let mut d = Driver::new(MemoryFlipGame::with_deck(&DECK));
        d.select(0);
        d.select(1);
        assert!(d.game.is_locked());
        assert_eq!(d.game.moves(), 1);

        d.select(3);
        assert!(!d.game.cards()[3].open);

        d.advance(699);
        assert!(d.game.cards()[0].open);
        d.advance(1);
        assert!(!d.game.cards()[0].open && !d.game.cards()[1].open);
        assert!(!d.game.is_locked());
    }

    #[test]
    fn reselecting_an_open_card_is_ignored() {
        let mut d = Driver::new(MemoryFlipGame::with_deck(&DECK));
        d.select(0);
        d.select(0);
        assert_eq!(d.game.moves(), 0);
        d.select(9);
        assert_eq!(d.game.moves(), 0);
    }

    #[test]
    fn perfect_game_scores_seventy() {
        let mut d = Driver::new(MemoryFlipGame::with_deck(&DECK));
        for (a, b) in [(0, 2), (1, 4), (3, 5)] {
            d.select(a);
            d.select(b);
        }
        assert_eq!(d.outcome, Some(70));
    }

    #[test]
    fn score_never_drops_below_one() {
        assert_eq!(memory_score(3), 70);
        assert_eq!(memory_score(9), 10);
        assert_eq!(memory_score(10), 1);
        assert_eq!(memory_score(40), 1);
    }

    #[test]
    fn target_at_maps_grid_cells() {
        let game = MemoryFlipGame::with_deck(&DECK);
        let area = Rect::new(0, 0, 32, 14);
        let (_, field) = field_rects(area);
        let cells = grid_cells(field, COLS, ROWS);
        assert_eq!(game.target_at(area, cells[4].x + 1, cells[4].y + 1), Some(4));
        assert_eq!(game.target_at(area, 0, 0), None);
    }
}
