pub mod aim_trainer;
pub mod canvas;
pub mod click_circle;
pub mod color_match;
pub mod dodge_blocks;
pub mod flappy;
pub mod memory_flip;
pub mod number_rush;
pub mod reaction;
pub mod snake;
pub mod stack_tower;
#[cfg(test)]
pub mod testing;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::controls::ControlId;
use crate::scheduler::TimerKey;

/// One game's rules.
///
/// A module is driven entirely by its host: periodic `update` calls at
/// `tick_interval_ms`, control pulses, selections and the one-shot timers it
/// requested through [`GameCtx`]. It ends by calling [`GameCtx::game_over`];
/// after that every callback is a no-op.
pub trait GameModule {
    /// Tick cadence, or `None` for games driven only by input and timers.
    fn tick_interval_ms(&self) -> Option<u64>;

    /// Called once right after the host mounts the module.
    fn start(&mut self, _ctx: &mut GameCtx) {}

    fn update(&mut self, _ctx: &mut GameCtx) {}

    fn handle_control(&mut self, _control: ControlId, _ctx: &mut GameCtx) {}

    /// Pointer pick of target `index` (card, cell, circle).
    fn handle_select(&mut self, _index: usize, _ctx: &mut GameCtx) {}

    fn on_timer(&mut self, _key: TimerKey, _ctx: &mut GameCtx) {}

    /// Number of currently selectable targets.
    fn targets(&self) -> usize {
        0
    }

    /// Target under a terminal cell, given the area passed to `render`.
    fn target_at(&self, _area: Rect, _column: u16, _row: u16) -> Option<usize> {
        None
    }

    fn render(&self, frame: &mut Frame, area: Rect);

    fn get_score(&self) -> u32;

    fn is_game_over(&self) -> bool;
}

/// A module's channel back to its host for the duration of one callback.
#[derive(Debug, Default)]
pub struct GameCtx {
    now_ms: u64,
    scheduled: Vec<(u64, TimerKey)>,
    cancelled: Vec<TimerKey>,
    outcome: Option<u32>,
}

impl GameCtx {
    pub fn new(now_ms: u64) -> Self {
        Self {
            now_ms,
            ..Self::default()
        }
    }

    /// Host clock in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Ask for `on_timer(key)` after `delay_ms`.
    pub fn schedule(&mut self, delay_ms: u64, key: TimerKey) {
        self.scheduled.push((delay_ms, key));
    }

    /// Drop pending timers with this key, including ones requested earlier in
    /// this same callback.
    pub fn cancel(&mut self, key: TimerKey) {
        self.scheduled.retain(|(_, k)| *k != key);
        self.cancelled.push(key);
    }

    /// Report the terminal score. Only the first report counts.
    pub fn game_over(&mut self, score: u32) {
        if self.outcome.is_none() {
            self.outcome = Some(score);
        } else {
            tracing::debug!(score, "ignoring second game over in one callback");
        }
    }

    pub fn outcome(&self) -> Option<u32> {
        self.outcome
    }

    pub fn scheduled(&self) -> &[(u64, TimerKey)] {
        &self.scheduled
    }

    pub fn cancelled(&self) -> &[TimerKey] {
        &self.cancelled
    }
}

/// Whole-second countdown shared by the timed target games.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    left: u32,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self { left: seconds }
    }

    pub fn seconds_left(&self) -> u32 {
        self.left
    }

    /// One second passes. Returns true when time has run out.
    pub fn tick(&mut self) -> bool {
        if self.left <= 1 {
            self.left = 0;
            true
        } else {
            self.left -= 1;
            false
        }
    }
}

/// Split a module's area into status line and play field. Pure so that hit
/// testing sees the same geometry as rendering.
pub fn field_rects(area: Rect) -> (Rect, Rect) {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);
    (chunks[0], chunks[1])
}

/// Draw the bordered frame and status line; returns the play field.
pub fn draw_frame(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    accent: Color,
    status: Line<'_>,
) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .title(format!(" {title} "))
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD));
    frame.render_widget(block, area);

    let (status_area, field) = field_rects(area);
    frame.render_widget(Paragraph::new(status), status_area);
    field
}

/// Status line in the arcade style: label/value pairs separated by bars.
pub fn status_line(items: &[(&str, String)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(items.len() * 2);
    for (i, (label, value)) in items.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            format!("{label}: "),
            Style::default().fg(Color::Rgb(140, 140, 160)),
        ));
        spans.push(Span::styled(
            value.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

/// Equal cells of a `cols × rows` grid, row-major.
pub fn grid_cells(field: Rect, cols: u16, rows: u16) -> Vec<Rect> {
    let row_constraints = vec![Constraint::Ratio(1, rows as u32); rows as usize];
    let col_constraints = vec![Constraint::Ratio(1, cols as u32); cols as usize];
    Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(field)
        .iter()
        .flat_map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints(col_constraints.clone())
                .split(*row)
                .to_vec()
        })
        .collect()
}

/// A `w × h` rect centered on a percentage position inside `field`,
/// clamped to stay inside it.
pub fn percent_rect(field: Rect, x_pct: f32, y_pct: f32, w: u16, h: u16) -> Rect {
    let w = w.min(field.width);
    let h = h.min(field.height);
    let cx = field.x as f32 + field.width as f32 * x_pct / 100.0;
    let cy = field.y as f32 + field.height as f32 * y_pct / 100.0;
    let max_x = field.x + field.width - w;
    let max_y = field.y + field.height - h;
    let x = ((cx - w as f32 / 2.0).round().max(field.x as f32) as u16).min(max_x);
    let y = ((cy - h as f32 / 2.0).round().max(field.y as f32) as u16).min(max_y);
    Rect::new(x, y, w, h)
}

pub fn hit(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctx_keeps_first_outcome() {
        let mut ctx = GameCtx::new(0);
        ctx.game_over(5);
        ctx.game_over(9);
        assert_eq!(ctx.outcome(), Some(5));
    }

    #[test]
    fn ctx_cancel_drops_same_callback_requests() {
        let mut ctx = GameCtx::new(100);
        ctx.schedule(50, TimerKey(1));
        ctx.schedule(70, TimerKey(2));
        ctx.cancel(TimerKey(1));
        assert_eq!(ctx.scheduled(), &[(70, TimerKey(2))]);
        assert_eq!(ctx.cancelled(), &[TimerKey(1)]);

        ctx.schedule(10, TimerKey(1));
        assert_eq!(ctx.scheduled().len(), 2);
    }

    #[test]
    fn countdown_expires_on_last_second() {
        let mut c = Countdown::new(3);
        assert!(!c.tick());
        assert!(!c.tick());
        assert!(c.tick());
        assert_eq!(c.seconds_left(), 0);
    }

    #[test]
    fn grid_cells_tile_the_field() {
        let field = Rect::new(0, 0, 30, 12);
        let cells = grid_cells(field, 3, 2);
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Rect::new(0, 0, 10, 6));
        assert_eq!(cells[5], Rect::new(20, 6, 10, 6));
    }

    #[test]
    fn percent_rect_stays_inside() {
        let field = Rect::new(2, 3, 20, 10);
        for (x, y) in [(0.0, 0.0), (100.0, 100.0), (50.0, 50.0)] {
            let r = percent_rect(field, x, y, 5, 3);
            assert!(r.x >= field.x && r.right() <= field.right());
            assert!(r.y >= field.y && r.bottom() <= field.bottom());
        }
    }

    #[test]
    fn hit_uses_half_open_bounds() {
        let r = Rect::new(4, 4, 2, 2);
        assert!(hit(r, 4, 4));
        assert!(hit(r, 5, 5));
        assert!(!hit(r, 6, 5));
        assert!(!hit(r, 3, 4));
    }
}
