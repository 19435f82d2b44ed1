//! Minimal host stand-in for driving a concrete module in unit tests.

use crate::controls::ControlId;
use crate::games::{GameCtx, GameModule};
use crate::scheduler::{Generation, TimerKind, TimerTable};

const GEN: Generation = Generation(0);

pub struct Driver<M: GameModule> {
    pub game: M,
    timers: TimerTable,
    now_ms: u64,
    pub outcome: Option<u32>,
    pub reports: u32,
}

impl<M: GameModule> Driver<M> {
    pub fn new(game: M) -> Self {
        let mut driver = Self {
            game,
            timers: TimerTable::new(),
            now_ms: 0,
            outcome: None,
            reports: 0,
        };
        if let Some(interval) = driver.game.tick_interval_ms() {
            driver.timers.schedule(GEN, interval, TimerKind::Tick);
        }
        let mut ctx = GameCtx::new(0);
        driver.game.start(&mut ctx);
        driver.apply(ctx);
        driver
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn apply(&mut self, ctx: GameCtx) {
        for key in ctx.cancelled() {
            self.timers.cancel(GEN, *key);
        }
        for (delay, key) in ctx.scheduled() {
            self.timers
                .schedule(GEN, self.now_ms + delay, TimerKind::Module(*key));
        }
        if let Some(score) = ctx.outcome() {
            self.reports += 1;
            if self.outcome.is_none() {
                self.outcome = Some(score);
                self.timers.cancel_generation(GEN);
            }
        }
    }

    pub fn advance(&mut self, ms: u64) {
        let target = self.now_ms + ms;
        while let Some(entry) = self.timers.pop_due(target) {
            self.now_ms = entry.due_ms;
            let mut ctx = GameCtx::new(self.now_ms);
            match entry.kind {
                TimerKind::Tick => {
                    self.game.update(&mut ctx);
                    if let Some(interval) = self.game.tick_interval_ms() {
                        self.timers
                            .schedule(GEN, entry.due_ms + interval, TimerKind::Tick);
                    }
                }
                TimerKind::Module(key) => self.game.on_timer(key, &mut ctx),
            }
            self.apply(ctx);
        }
        self.now_ms = target;
    }

    /// Run exactly `n` ticks.
    pub fn ticks(&mut self, n: u64) {
        let interval = self
            .game
            .tick_interval_ms()
            .expect("module has no tick interval");
        self.advance(n * interval);
    }

    pub fn control(&mut self, control: ControlId) {
        let mut ctx = GameCtx::new(self.now_ms);
        self.game.handle_control(control, &mut ctx);
        self.apply(ctx);
    }

    pub fn select(&mut self, index: usize) {
        let mut ctx = GameCtx::new(self.now_ms);
        self.game.handle_select(index, &mut ctx);
        self.apply(ctx);
    }
}
