use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::controls::{control_for_key, ControlId, PressFilter, PressSource};
use crate::games::hit;
use crate::host::{GameHost, HostPhase};
use crate::registry;
use crate::scores::{BestScores, SharedStore};

/// Screen geometry from the last frame, used for pointer hit testing.
#[derive(Debug, Clone, Default)]
pub struct ScreenLayout {
    /// Area handed to the current game's `render`.
    pub game_area: Option<Rect>,
    /// Pad buttons of the current game.
    pub buttons: Vec<(ControlId, Rect)>,
}

/// The feed: one host per registered game, exactly one of them on screen.
pub struct App {
    pub should_quit: bool,
    hosts: Vec<GameHost>,
    current: usize,
    presses: PressFilter,
    /// Wall-clock milliseconds since start, for press de-duplication.
    now_ms: u64,
    pub layout: ScreenLayout,
}

impl App {
    pub fn new(config: &AppConfig, store: SharedStore) -> Self {
        let mut seeds = StdRng::seed_from_u64(config.session_seed());
        let hosts: Vec<GameHost> = registry::games()
            .iter()
            .map(|descriptor| {
                GameHost::new(
                    descriptor,
                    BestScores::new(store.clone()),
                    seeds.gen(),
                    config.max_catch_up_ms,
                )
            })
            .collect();

        let mut app = Self {
            should_quit: false,
            hosts,
            current: config.start_index(),
            presses: PressFilter::new(config.dedupe_window_ms),
            now_ms: 0,
            layout: ScreenLayout::default(),
        };
        app.hosts[app.current].set_visible(true);
        app
    }

    pub fn hosts(&self) -> &[GameHost] {
        &self.hosts
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &GameHost {
        &self.hosts[self.current]
    }

    fn current_mut(&mut self) -> &mut GameHost {
        &mut self.hosts[self.current]
    }

    /// Time passes; only the game on screen sees it.
    pub fn on_tick(&mut self, elapsed_ms: u64) {
        self.now_ms += elapsed_ms;
        self.current_mut().advance(elapsed_ms);
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // A held key is one press: repeats and releases never reach a game.
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.swipe_prev();
                return;
            }
            KeyCode::PageDown | KeyCode::Tab | KeyCode::Char('n') => {
                self.swipe_next();
                return;
            }
            KeyCode::PageUp | KeyCode::BackTab | KeyCode::Char('p') => {
                self.swipe_prev();
                return;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.current_mut().restart();
                return;
            }
            KeyCode::Char(c @ '1'..='9') => {
                let target = c as usize - '1' as usize;
                self.select(target);
                return;
            }
            _ => {}
        }

        let declared = self.current().descriptor().controls;
        if declared.is_empty() && matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) {
            // Primary key picks the only target of single-target pointer games.
            if self.current_targets() == 1 {
                self.select(0);
            }
            return;
        }
        if let Some(control) = control_for_key(key.code, declared) {
            self.press(control, PressSource::Keyboard);
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.swipe_next(),
            MouseEventKind::ScrollUp => self.swipe_prev(),
            MouseEventKind::Down(MouseButton::Left) => self.click(mouse.column, mouse.row),
            _ => {}
        }
    }

    fn click(&mut self, column: u16, row: u16) {
        let button = self
            .layout
            .buttons
            .iter()
            .find(|(_, rect)| hit(*rect, column, row))
            .map(|(control, _)| *control);
        if let Some(control) = button {
            self.press(control, PressSource::Pointer);
            return;
        }

        let Some(area) = self.layout.game_area else {
            return;
        };
        if !hit(area, column, row) {
            return;
        }
        if self.current().descriptor().controls.contains(&ControlId::Tap) {
            self.press(ControlId::Tap, PressSource::Pointer);
            return;
        }
        let target = self
            .current()
            .module()
            .and_then(|m| m.target_at(area, column, row));
        if let Some(target) = target {
            self.select(target);
        }
    }

    fn current_targets(&self) -> usize {
        self.current().module().map_or(0, |m| m.targets())
    }

    /// One physical press, after cross-source de-duplication.
    pub fn press(&mut self, control: ControlId, source: PressSource) {
        if !self.current().descriptor().controls.contains(&control) {
            return;
        }
        if self.presses.accept(control, source, self.now_ms) {
            self.current_mut().dispatch_control(control);
        }
    }

    pub fn select(&mut self, target: usize) {
        if !self.current().descriptor().controls.is_empty() {
            return;
        }
        if target < self.current_targets() {
            self.current_mut().dispatch_select(target);
        }
    }

    pub fn swipe_next(&mut self) {
        if self.current + 1 < self.hosts.len() {
            self.show(self.current + 1);
        }
    }

    pub fn swipe_prev(&mut self) {
        if self.current > 0 {
            self.show(self.current - 1);
        }
    }

    fn show(&mut self, index: usize) {
        self.hosts[self.current].set_visible(false);
        self.current = index;
        self.layout = ScreenLayout::default();
        self.hosts[self.current].set_visible(true);
        tracing::debug!(game = self.current().descriptor().id, index, "swiped");
    }

    /// Whether the current game is showing its lost screen.
    pub fn is_over(&self) -> bool {
        self.current().phase() == HostPhase::Over
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scores::{shared, MemoryStore};

    fn app() -> App {
        let config = AppConfig {
            seed: Some(1),
            ..AppConfig::default()
        };
        App::new(&config, shared(MemoryStore::new()))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn go_to(app: &mut App, id: &str) {
        let target = registry::index_of(id).unwrap();
        while app.current_index() < target {
            app.swipe_next();
        }
    }

    #[test]
    fn starts_on_first_game_mounted() {
        let app = app();
        assert_eq!(app.current_index(), 0);
        assert_eq!(app.current().phase(), HostPhase::Running);
        assert!(app.hosts()[1..].iter().all(|h| h.phase() == HostPhase::Idle));
    }

    #[test]
    fn swiping_clamps_at_both_ends() {
        let mut app = app();
        app.on_key(key(KeyCode::PageUp));
        assert_eq!(app.current_index(), 0);
        for _ in 0..20 {
            app.on_key(key(KeyCode::Char('n')));
        }
        assert_eq!(app.current_index(), 9);
    }

    #[test]
    fn only_visible_host_ticks() {
        let mut app = app();
        app.on_tick(100);
        app.swipe_next();
        app.on_tick(100);
        assert_eq!(app.hosts()[0].clock_ms(), 100);
        assert_eq!(app.hosts()[1].clock_ms(), 100);
        app.swipe_prev();
        app.on_tick(50);
        assert_eq!(app.hosts()[0].clock_ms(), 150);
        assert_eq!(app.hosts()[1].clock_ms(), 100);
    }

    #[test]
    fn undeclared_keys_do_not_reach_the_game() {
        let mut app = app();
        go_to(&mut app, "stack-tower");
        app.on_key(key(KeyCode::Left));
        assert_eq!(app.current().last_control(), None);
        app.on_key(key(KeyCode::Char(' ')));
        assert_eq!(app.current().last_control(), Some(ControlId::Action));
        assert_eq!(app.current().live_score(), Some(1));
    }

    #[test]
    fn key_repeat_and_release_are_not_presses() {
        let mut app = app();
        go_to(&mut app, "stack-tower");
        app.on_key(key(KeyCode::Char(' ')));
        assert_eq!(app.current().live_score(), Some(1));

        for kind in [KeyEventKind::Repeat, KeyEventKind::Release] {
            app.on_key(KeyEvent::new_with_kind(
                KeyCode::Char(' '),
                KeyModifiers::NONE,
                kind,
            ));
        }
        assert_eq!(app.current().live_score(), Some(1));

        app.on_key(KeyEvent::new_with_kind(
            KeyCode::Char('n'),
            KeyModifiers::NONE,
            KeyEventKind::Repeat,
        ));
        assert_eq!(app.current_index(), registry::index_of("stack-tower").unwrap());
    }

    #[test]
    fn cross_source_duplicate_is_dropped() {
        let mut app = app();
        go_to(&mut app, "stack-tower");
        app.press(ControlId::Action, PressSource::Touch);
        app.press(ControlId::Action, PressSource::Pointer);
        assert_eq!(app.current().live_score(), Some(1));
        app.on_tick(400);
        app.press(ControlId::Action, PressSource::Pointer);
        assert_eq!(app.current().live_score(), Some(2));
    }

    #[test]
    fn digit_keys_select_targets() {
        let mut app = app();
        go_to(&mut app, "click-circle");
        app.on_key(key(KeyCode::Char('1')));
        assert_eq!(app.current().live_score(), Some(1));
        // Circle is hidden now; nothing to pick.
        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.current().live_score(), Some(1));
    }

    #[test]
    fn restart_key_restarts_current_game() {
        let mut app = app();
        go_to(&mut app, "stack-tower");
        app.on_key(key(KeyCode::Enter));
        let generation = app.current().generation();
        app.on_key(key(KeyCode::Char('r')));
        assert_eq!(app.current().generation(), generation.next());
        assert_eq!(app.current().live_score(), Some(0));
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        app.on_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app2 = self::app();
        app2.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app2.should_quit);
    }

    #[test]
    fn clicking_a_pad_button_presses_it() {
        let mut app = app();
        go_to(&mut app, "dodge-blocks");
        app.layout.buttons = vec![
            (ControlId::Left, Rect::new(0, 20, 10, 3)),
            (ControlId::Right, Rect::new(10, 20, 10, 3)),
        ];
        app.on_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 12,
            row: 21,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.current().last_control(), Some(ControlId::Right));
    }

    #[test]
    fn tap_anywhere_in_the_viewport() {
        let mut app = app();
        go_to(&mut app, "flappy");
        app.layout.game_area = Some(Rect::new(0, 3, 40, 15));
        app.on_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 5,
            row: 5,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.current().last_control(), Some(ControlId::Tap));
    }
}
