//! All match entity types — pure data, no rules.

use crate::config::Settings;
use crate::geometry::Rect;
use crate::render::DrawCommand;

// ── Levels & skins ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    /// Brick walls that only block movement and shots.
    One,
    /// Lava pits: touching one is fatal.
    Two,
}

impl Level {
    pub fn from_id(id: u8) -> Option<Level> {
        match id {
            1 => Some(Level::One),
            2 => Some(Level::Two),
            _ => None,
        }
    }

    pub fn id(&self) -> u8 {
        match self {
            Level::One => 1,
            Level::Two => 2,
        }
    }

    /// Whether obstacle contact eliminates an actor on this map.
    pub fn is_hazard(&self) -> bool {
        matches!(self, Level::Two)
    }

    pub fn obstacle_skin(&self) -> Skin {
        match self {
            Level::One => Skin::Brick,
            Level::Two => Skin::Lava,
        }
    }
}

/// Visual identity of an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Skin {
    Brick,
    Lava,
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Logical key, independent of the terminal backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    /// Letter keys compare case-insensitively.
    Char(char),
}

impl Key {
    pub fn matches(&self, other: &Key) -> bool {
        match (self, other) {
            (Key::Char(a), Key::Char(b)) => a.eq_ignore_ascii_case(b),
            _ => self == other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEvent {
    pub key: Key,
    /// `true` for a press, `false` for a release.
    pub pressed: bool,
}

impl InputEvent {
    pub fn press(key: Key) -> Self {
        Self { key, pressed: true }
    }

    pub fn release(key: Key) -> Self {
        Self { key, pressed: false }
    }
}

/// Which keys drive an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlScheme {
    pub up: Key,
    pub down: Key,
    pub left: Key,
    pub right: Key,
    pub fire: Key,
}

impl ControlScheme {
    pub fn arrows() -> Self {
        Self {
            up: Key::Up,
            down: Key::Down,
            left: Key::Left,
            right: Key::Right,
            fire: Key::Space,
        }
    }

    pub fn wasd() -> Self {
        Self {
            up: Key::Char('w'),
            down: Key::Char('s'),
            left: Key::Char('a'),
            right: Key::Char('d'),
            fire: Key::Enter,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectionFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionFlags {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    /// Travels along `angle` (radians, screen y grows downward).
    Aimed { angle: f32, speed: f32 },
    /// Travels straight up the screen.
    Upward { speed: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    /// Top-left corner of the projectile's box.
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub motion: Motion,
    pub alive: bool,
}

// ── Actors & obstacles ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    One,
    Two,
}

impl Side {
    pub fn index(&self) -> usize {
        match self {
            Side::One => 0,
            Side::Two => 1,
        }
    }

    pub fn opponent(&self) -> Side {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Side::One => "Player 1",
            Side::Two => "Player 2",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    pub side: Side,
    /// Top-left corner of the actor's box.
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub alive: bool,
    /// Radians; kept while no direction is held.
    pub facing: f32,
    pub input: DirectionFlags,
    pub controls: ControlScheme,
    /// Shots in firing order.  Dead entries linger until the next step.
    pub projectiles: Vec<Projectile>,
    /// Set during a step when a move was refused because of an obstacle.
    pub touched_obstacle: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub bounds: Rect,
    pub skin: Skin,
}

// ── Match state ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum TerminalCause {
    /// Hit by the opponent's projectile.  Two losers means a double KO.
    Shot { losers: Vec<Side> },
    /// Touched an obstacle on a hazard map.
    Hazard { losers: Vec<Side> },
    /// The countdown ran out.
    Timeout,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MatchStatus {
    Running,
    Terminal(TerminalCause),
}

/// The entire match.  Cloneable so the tick can return a fresh snapshot
/// without touching the one it was given.
#[derive(Clone, Debug)]
pub struct MatchState {
    pub level: Level,
    pub settings: Settings,
    /// Indexed by [`Side::index`].
    pub actors: [Actor; 2],
    pub obstacles: Vec<Obstacle>,
    pub status: MatchStatus,
    /// Seconds left, when the round is timed.
    pub countdown: Option<u32>,
    pub frame: u64,
}

impl MatchState {
    pub fn actor(&self, side: Side) -> &Actor {
        &self.actors[side.index()]
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, MatchStatus::Terminal(_))
    }

    /// The sole surviving actor once the match is over, if there is exactly one.
    pub fn winner(&self) -> Option<Side> {
        if !self.is_terminal() {
            return None;
        }
        let mut alive = self.actors.iter().filter(|a| a.alive);
        match (alive.next(), alive.next()) {
            (Some(a), None) => Some(a.side),
            _ => None,
        }
    }
}

/// Output of one simulation tick.
#[derive(Clone, Debug)]
pub struct Frame {
    pub state: MatchState,
    pub commands: Vec<DrawCommand>,
}
