//! Abstract control vocabulary and the input surface rules built on it.
//!
//! Games never see keys or mouse buttons. They declare a subset of
//! [`ControlId`] and receive one pulse per physical press.

use std::fmt;

use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ControlId {
    Up,
    Down,
    Left,
    Right,
    Action,
    Tap,
}

impl ControlId {
    pub const ALL: [ControlId; 6] = [
        ControlId::Up,
        ControlId::Down,
        ControlId::Left,
        ControlId::Right,
        ControlId::Action,
        ControlId::Tap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlId::Up => "up",
            ControlId::Down => "down",
            ControlId::Left => "left",
            ControlId::Right => "right",
            ControlId::Action => "action",
            ControlId::Tap => "tap",
        }
    }

    pub fn is_direction(&self) -> bool {
        matches!(
            self,
            ControlId::Up | ControlId::Down | ControlId::Left | ControlId::Right
        )
    }

    /// Button caption used by the pad renderer.
    pub fn label(&self, layout: &ControlLayout) -> String {
        match layout {
            ControlLayout::Single(_) => self.as_str().to_uppercase(),
            ControlLayout::LeftRight => match self {
                ControlId::Left => "← LEFT".to_string(),
                _ => "RIGHT →".to_string(),
            },
            ControlLayout::DPad(_) => match self {
                ControlId::Up => "↑".to_string(),
                ControlId::Down => "↓".to_string(),
                ControlId::Left => "←".to_string(),
                _ => "→".to_string(),
            },
            ControlLayout::None | ControlLayout::Fallback(_) => self.as_str().to_uppercase(),
        }
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which directions a d-pad renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DPad {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Button arrangement derived from a game's declared controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlLayout {
    /// No discrete controls; nothing is rendered.
    None,
    /// One large button for `tap` or `action`.
    Single(ControlId),
    /// Two side-by-side buttons.
    LeftRight,
    /// Directional pad with only the declared directions.
    DPad(DPad),
    /// One labelled button per control, in declaration order.
    Fallback(Vec<ControlId>),
}

impl ControlLayout {
    pub fn for_controls(controls: &[ControlId]) -> Self {
        let mut unique: Vec<ControlId> = Vec::with_capacity(controls.len());
        for &c in controls {
            if !unique.contains(&c) {
                unique.push(c);
            }
        }

        match unique.as_slice() {
            [] => ControlLayout::None,
            [single @ (ControlId::Tap | ControlId::Action)] => ControlLayout::Single(*single),
            [a, b]
                if unique.contains(&ControlId::Left)
                    && unique.contains(&ControlId::Right)
                    && a != b =>
            {
                ControlLayout::LeftRight
            }
            dirs if dirs.len() >= 2 && dirs.iter().all(ControlId::is_direction) => {
                ControlLayout::DPad(DPad {
                    up: dirs.contains(&ControlId::Up),
                    down: dirs.contains(&ControlId::Down),
                    left: dirs.contains(&ControlId::Left),
                    right: dirs.contains(&ControlId::Right),
                })
            }
            other => ControlLayout::Fallback(other.to_vec()),
        }
    }

    /// Buttons in visual order (top to bottom, left to right).
    pub fn buttons(&self) -> Vec<ControlId> {
        match self {
            ControlLayout::None => Vec::new(),
            ControlLayout::Single(c) => vec![*c],
            ControlLayout::LeftRight => vec![ControlId::Left, ControlId::Right],
            ControlLayout::DPad(pad) => {
                let mut out = Vec::with_capacity(4);
                if pad.up {
                    out.push(ControlId::Up);
                }
                if pad.left {
                    out.push(ControlId::Left);
                }
                if pad.down {
                    out.push(ControlId::Down);
                }
                if pad.right {
                    out.push(ControlId::Right);
                }
                out
            }
            ControlLayout::Fallback(controls) => controls.clone(),
        }
    }
}

/// Map a pressed key onto one of the declared controls.
///
/// Space and Enter stand in for the primary button: `tap` when declared,
/// otherwise `action`.
pub fn control_for_key(code: KeyCode, declared: &[ControlId]) -> Option<ControlId> {
    let wanted = match code {
        KeyCode::Up => ControlId::Up,
        KeyCode::Down => ControlId::Down,
        KeyCode::Left => ControlId::Left,
        KeyCode::Right => ControlId::Right,
        KeyCode::Char(' ') | KeyCode::Enter => {
            if declared.contains(&ControlId::Tap) {
                ControlId::Tap
            } else {
                ControlId::Action
            }
        }
        _ => return None,
    };
    declared.contains(&wanted).then_some(wanted)
}

/// Physical path a press arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressSource {
    Touch,
    Pointer,
    Keyboard,
}

/// Collapses the duplicate events some platforms fire for one physical press
/// (a touch followed by an emulated pointer press, for example).
///
/// A press of the same control from a different source inside the window is
/// dropped. Presses from the same source always count.
#[derive(Debug, Clone)]
pub struct PressFilter {
    window_ms: u64,
    last: Option<(ControlId, PressSource, u64)>,
}

impl PressFilter {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last: None,
        }
    }

    /// Returns true when the press should be dispatched.
    pub fn accept(&mut self, control: ControlId, source: PressSource, now_ms: u64) -> bool {
        if let Some((prev_control, prev_source, at)) = self.last {
            if prev_control == control
                && prev_source != source
                && now_ms.saturating_sub(at) <= self.window_ms
            {
                tracing::trace!(%control, ?source, "dropped duplicate press");
                return false;
            }
        }
        self.last = Some((control, source, now_ms));
        true
    }
}
