//! The fixed, ordered catalogue of games in the feed.

use crate::controls::ControlId;
use crate::games::aim_trainer::AimTrainerGame;
use crate::games::click_circle::ClickCircleGame;
use crate::games::color_match::ColorMatchGame;
use crate::games::dodge_blocks::DodgeBlocksGame;
use crate::games::flappy::FlappyGame;
use crate::games::memory_flip::MemoryFlipGame;
use crate::games::number_rush::NumberRushGame;
use crate::games::reaction::ReactionGame;
use crate::games::snake::SnakeGame;
use crate::games::stack_tower::StackTowerGame;
use crate::games::GameModule;

pub type GameFactory = fn(seed: u64) -> Box<dyn GameModule>;

/// Static description of one game: identity, declared controls and how to
/// build a fresh instance.
#[derive(Clone, Copy)]
pub struct GameDescriptor {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub controls: &'static [ControlId],
    pub factory: GameFactory,
}

impl GameDescriptor {
    pub fn create(&self, seed: u64) -> Box<dyn GameModule> {
        (self.factory)(seed)
    }
}

impl std::fmt::Debug for GameDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameDescriptor")
            .field("id", &self.id)
            .field("controls", &self.controls)
            .finish_non_exhaustive()
    }
}

fn snake(seed: u64) -> Box<dyn GameModule> {
    Box::new(SnakeGame::new(seed))
}

fn flappy(seed: u64) -> Box<dyn GameModule> {
    Box::new(FlappyGame::new(seed))
}

fn click_circle(seed: u64) -> Box<dyn GameModule> {
    Box::new(ClickCircleGame::new(seed))
}

fn reaction(seed: u64) -> Box<dyn GameModule> {
    Box::new(ReactionGame::new(seed))
}

fn dodge_blocks(seed: u64) -> Box<dyn GameModule> {
    Box::new(DodgeBlocksGame::new(seed))
}

fn stack_tower(seed: u64) -> Box<dyn GameModule> {
    Box::new(StackTowerGame::new(seed))
}

fn memory_flip(seed: u64) -> Box<dyn GameModule> {
    Box::new(MemoryFlipGame::new(seed))
}

fn aim_trainer(seed: u64) -> Box<dyn GameModule> {
    Box::new(AimTrainerGame::new(seed))
}

fn color_match(seed: u64) -> Box<dyn GameModule> {
    Box::new(ColorMatchGame::new(seed))
}

fn number_rush(seed: u64) -> Box<dyn GameModule> {
    Box::new(NumberRushGame::new(seed))
}

static GAMES: [GameDescriptor; 10] = [
    GameDescriptor {
        id: "snake",
        title: "Micro Snake",
        description: "The classic: steer the snake around a tiny board.",
        controls: &[ControlId::Up, ControlId::Down, ControlId::Left, ControlId::Right],
        factory: snake,
    },
    GameDescriptor {
        id: "flappy",
        title: "Flappy Dot",
        description: "Hop the dot through the gaps.",
        controls: &[ControlId::Tap],
        factory: flappy,
    },
    GameDescriptor {
        id: "click-circle",
        title: "Click the Circle",
        description: "Hit the circle before it moves.",
        controls: &[],
        factory: click_circle,
    },
    GameDescriptor {
        id: "reaction",
        title: "Reaction Time",
        description: "Tap as soon as the screen turns green.",
        controls: &[ControlId::Tap],
        factory: reaction,
    },
    GameDescriptor {
        id: "dodge-blocks",
        title: "Dodge Blocks",
        description: "Step aside from the falling blocks.",
        controls: &[ControlId::Left, ControlId::Right],
        factory: dodge_blocks,
    },
    GameDescriptor {
        id: "stack-tower",
        title: "Stack Tower",
        description: "Drop each block right on top of the last one.",
        controls: &[ControlId::Action],
        factory: stack_tower,
    },
    GameDescriptor {
        id: "memory-flip",
        title: "Memory Flip",
        description: "Remember where the pairs are.",
        controls: &[],
        factory: memory_flip,
    },
    GameDescriptor {
        id: "aim-trainer",
        title: "Aim Trainer",
        description: "Click the targets as fast as you can.",
        controls: &[],
        factory: aim_trainer,
    },
    GameDescriptor {
        id: "color-match",
        title: "Color Match",
        description: "Does the ink colour match the word?",
        controls: &[ControlId::Left, ControlId::Right],
        factory: color_match,
    },
    GameDescriptor {
        id: "number-rush",
        title: "Number Rush",
        description: "Press the numbers in order, quickly.",
        controls: &[],
        factory: number_rush,
    },
];

/// All games, in feed order.
pub fn games() -> &'static [GameDescriptor] {
    &GAMES
}

pub fn find(id: &str) -> Option<&'static GameDescriptor> {
    GAMES.iter().find(|g| g.id == id)
}

/// Feed position of a game id.
pub fn index_of(id: &str) -> Option<usize> {
    GAMES.iter().position(|g| g.id == id)
}
