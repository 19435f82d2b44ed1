//! One game's lifecycle inside the feed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::controls::ControlId;
use crate::games::{GameCtx, GameModule};
use crate::registry::GameDescriptor;
use crate::scheduler::{Generation, TimerEntry, TimerKind, TimerTable};
use crate::scores::BestScores;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPhase {
    /// Not mounted yet; waiting for first visibility.
    Idle,
    Running,
    /// Terminal score received; waiting for a restart.
    Over,
}

/// A single-delivery input pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pulse {
    Control(ControlId),
    Select(usize),
}

pub struct GameHost {
    descriptor: &'static GameDescriptor,
    scores: BestScores,
    module: Option<Box<dyn GameModule>>,
    generation: Generation,
    timers: TimerTable,
    clock_ms: u64,
    phase: HostPhase,
    best: Option<u32>,
    last_score: Option<u32>,
    last_control: Option<ControlId>,
    mailbox: Option<Pulse>,
    visible: bool,
    seeds: StdRng,
    max_catch_up_ms: u64,
}

impl GameHost {
    pub fn new(
        descriptor: &'static GameDescriptor,
        scores: BestScores,
        seed: u64,
        max_catch_up_ms: u64,
    ) -> Self {
        Self {
            descriptor,
            scores,
            module: None,
            generation: Generation::default(),
            timers: TimerTable::new(),
            clock_ms: 0,
            phase: HostPhase::Idle,
            best: None,
            last_score: None,
            last_control: None,
            mailbox: None,
            visible: false,
            seeds: StdRng::seed_from_u64(seed),
            max_catch_up_ms,
        }
    }

    /// Mount the game. Only the first call from `Idle` does anything.
    pub fn activate(&mut self) {
        if self.phase != HostPhase::Idle {
            return;
        }
        self.best = self.scores.best(self.descriptor.id);
        tracing::info!(game = self.descriptor.id, best = ?self.best, "mounting game");
        self.mount();
    }

    /// Build a fresh module under the current generation and start it.
    fn mount(&mut self) {
        let seed = self.seeds.gen::<u64>();
        let mut module = self.descriptor.create(seed);
        self.phase = HostPhase::Running;

        if let Some(interval) = module.tick_interval_ms() {
            self.timers
                .schedule(self.generation, self.clock_ms + interval, TimerKind::Tick);
        }
        let mut ctx = GameCtx::new(self.clock_ms);
        module.start(&mut ctx);
        self.module = Some(module);
        self.apply(ctx);
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            tracing::debug!(game = self.descriptor.id, visible, "visibility changed");
        }
        self.visible = visible;
        if visible {
            self.activate();
        }
    }

    /// Deliver one control press to the running game.
    pub fn dispatch_control(&mut self, control: ControlId) {
        if self.phase != HostPhase::Running {
            return;
        }
        self.mailbox = Some(Pulse::Control(control));
        self.last_control = Some(control);
        self.deliver();
    }

    /// Deliver one pointer pick to the running game.
    pub fn dispatch_select(&mut self, target: usize) {
        if self.phase != HostPhase::Running {
            return;
        }
        self.mailbox = Some(Pulse::Select(target));
        self.deliver();
    }

    fn deliver(&mut self) {
        let Some(pulse) = self.mailbox.take() else {
            return;
        };
        let Some(module) = self.module.as_mut() else {
            return;
        };
        let mut ctx = GameCtx::new(self.clock_ms);
        match pulse {
            Pulse::Control(control) => module.handle_control(control, &mut ctx),
            Pulse::Select(target) => module.handle_select(target, &mut ctx),
        }
        self.apply(ctx);
    }

    /// Terminal score intake. Only the first report from a running module
    /// instance counts.
    pub fn report_game_over(&mut self, score: u32) {
        if self.phase != HostPhase::Running {
            tracing::debug!(game = self.descriptor.id, score, phase = ?self.phase, "game over ignored");
            return;
        }
        self.last_score = Some(score);
        self.phase = HostPhase::Over;
        let dropped = self.timers.cancel_generation(self.generation);

        let is_best = self.best.map_or(true, |best| score > best);
        tracing::info!(
            game = self.descriptor.id,
            score,
            new_best = is_best,
            dropped_timers = dropped,
            "game over"
        );
        if is_best {
            self.best = Some(score);
            if let Err(e) = self.scores.save(self.descriptor.id, score) {
                tracing::warn!(game = self.descriptor.id, error = %e, "failed to persist best score");
            }
        }
    }

    /// Throw the current instance away and start a fresh one.
    pub fn restart(&mut self) {
        if self.phase == HostPhase::Idle {
            self.activate();
            return;
        }
        self.timers.cancel_generation(self.generation);
        self.generation = self.generation.next();
        self.last_score = None;
        self.last_control = None;
        self.mailbox = None;
        self.module = None;
        tracing::info!(game = self.descriptor.id, generation = self.generation.0, "restarting game");
        self.mount();
    }

    /// Move the host clock forward and fire whatever falls due.
    pub fn advance(&mut self, elapsed_ms: u64) {
        if !self.visible || self.phase != HostPhase::Running {
            return;
        }
        let elapsed = elapsed_ms.min(self.max_catch_up_ms);
        let target = self.clock_ms + elapsed;

        while let Some(entry) = self.timers.pop_due(target) {
            if entry.generation != self.generation {
                tracing::trace!(
                    game = self.descriptor.id,
                    stale = entry.generation.0,
                    current = self.generation.0,
                    "dropping stale timer"
                );
                continue;
            }
            self.clock_ms = entry.due_ms;
            self.fire(entry);
        }
        self.clock_ms = target;
    }

    fn fire(&mut self, entry: TimerEntry) {
        let Some(module) = self.module.as_mut() else {
            return;
        };
        let mut ctx = GameCtx::new(self.clock_ms);
        match entry.kind {
            TimerKind::Tick => module.update(&mut ctx),
            TimerKind::Module(key) => module.on_timer(key, &mut ctx),
        }
        let next_tick = match entry.kind {
            TimerKind::Tick => module.tick_interval_ms(),
            TimerKind::Module(_) => None,
        };
        self.apply(ctx);

        if let Some(interval) = next_tick {
            if self.phase == HostPhase::Running {
                self.timers
                    .schedule(self.generation, entry.due_ms + interval, TimerKind::Tick);
            }
        }
    }

    /// Carry out what the module asked for during one callback.
    fn apply(&mut self, ctx: GameCtx) {
        for key in ctx.cancelled() {
            self.timers.cancel(self.generation, *key);
        }
        for (delay, key) in ctx.scheduled() {
            self.timers.schedule(
                self.generation,
                self.clock_ms + delay,
                TimerKind::Module(*key),
            );
        }
        if let Some(score) = ctx.outcome() {
            self.report_game_over(score);
        }
    }

    pub fn descriptor(&self) -> &'static GameDescriptor {
        self.descriptor
    }

    pub fn phase(&self) -> HostPhase {
        self.phase
    }

    pub fn best(&self) -> Option<u32> {
        self.best
    }

    pub fn last_score(&self) -> Option<u32> {
        self.last_score
    }

    pub fn last_control(&self) -> Option<ControlId> {
        self.last_control
    }

    /// Score of the running (or just finished) instance.
    pub fn live_score(&self) -> Option<u32> {
        self.module.as_ref().map(|m| m.get_score())
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending(self.generation)
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn module(&self) -> Option<&dyn GameModule> {
        self.module.as_deref()
    }
}
