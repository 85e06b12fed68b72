//! Actor and projectile rules: input handling, movement with obstacle
//! collision, facing and firing.
//!
//! Both sides share this code; the only difference between them is the
//! [`ControlScheme`] they were built with.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::config::{ProjectileMotion, Settings};
use crate::entities::{
    Actor, ControlScheme, DirectionFlags, InputEvent, Motion, Obstacle, Projectile, Side,
};
use crate::geometry::Rect;

// ── Facing ────────────────────────────────────────────────────────────────────

pub const FACING_RIGHT: f32 = 0.0;
pub const FACING_DOWN_RIGHT: f32 = FRAC_PI_4;
pub const FACING_DOWN: f32 = FRAC_PI_2;
pub const FACING_DOWN_LEFT: f32 = 3.0 * FRAC_PI_4;
pub const FACING_LEFT: f32 = PI;
pub const FACING_UP_LEFT: f32 = -3.0 * FRAC_PI_4;
pub const FACING_UP: f32 = -FRAC_PI_2;
pub const FACING_UP_RIGHT: f32 = -FRAC_PI_4;

/// Compass angle for the net direction of `flags`.  Opposite keys cancel;
/// `None` when nothing is left, so the caller keeps its previous facing.
pub fn facing_for(flags: &DirectionFlags) -> Option<f32> {
    let dx = flags.right as i8 - flags.left as i8;
    let dy = flags.down as i8 - flags.up as i8;
    match (dx, dy) {
        (1, 0) => Some(FACING_RIGHT),
        (1, 1) => Some(FACING_DOWN_RIGHT),
        (0, 1) => Some(FACING_DOWN),
        (-1, 1) => Some(FACING_DOWN_LEFT),
        (-1, 0) => Some(FACING_LEFT),
        (-1, -1) => Some(FACING_UP_LEFT),
        (0, -1) => Some(FACING_UP),
        (1, -1) => Some(FACING_UP_RIGHT),
        _ => None,
    }
}

// ── Projectile ────────────────────────────────────────────────────────────────

impl Projectile {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.size, self.size)
    }

    /// Move one tick.  Leaving the arena kills the projectile on the spot.
    pub fn advance(&mut self, arena: &Rect) {
        if !self.alive {
            return;
        }
        let (dx, dy) = match self.motion {
            Motion::Aimed { angle, speed } => (speed * angle.cos(), speed * angle.sin()),
            Motion::Upward { speed } => (0.0, -speed),
        };
        self.x += dx;
        self.y += dy;
        if self.x < arena.x || self.x > arena.right() || self.y < arena.y || self.y > arena.bottom()
        {
            self.alive = false;
        }
    }
}

// ── Actor ─────────────────────────────────────────────────────────────────────

impl Actor {
    pub fn new(side: Side, x: f32, y: f32, controls: ControlScheme, settings: &Settings) -> Self {
        Self {
            side,
            x,
            y,
            size: settings.actor_size,
            alive: true,
            facing: FACING_UP,
            input: DirectionFlags::default(),
            controls,
            projectiles: Vec::new(),
            touched_obstacle: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.size, self.size)
    }

    /// Feed one key event.  Direction keys toggle their flag, a fire-key press
    /// shoots, anything else is ignored.  Dead actors ignore input.
    pub fn apply_input(&mut self, event: &InputEvent, settings: &Settings) {
        if !self.alive {
            return;
        }
        let key = event.key;
        let scheme = self.controls;
        if key.matches(&scheme.up) {
            self.input.up = event.pressed;
        } else if key.matches(&scheme.down) {
            self.input.down = event.pressed;
        } else if key.matches(&scheme.left) {
            self.input.left = event.pressed;
        } else if key.matches(&scheme.right) {
            self.input.right = event.pressed;
        } else if key.matches(&scheme.fire) {
            if event.pressed {
                self.fire(settings);
            }
            return;
        } else {
            return;
        }
        if let Some(angle) = facing_for(&self.input) {
            self.facing = angle;
        }
    }

    /// Spawn a projectile from the actor's centre along its current facing.
    pub fn fire(&mut self, settings: &Settings) {
        if !self.alive {
            return;
        }
        let (cx, cy) = self.bounds().center();
        let half = settings.projectile_size / 2.0;
        let motion = match settings.projectile_motion {
            ProjectileMotion::Aimed => Motion::Aimed {
                angle: self.facing,
                speed: settings.projectile_speed,
            },
            ProjectileMotion::Upward => Motion::Upward {
                speed: settings.projectile_speed,
            },
        };
        self.projectiles.push(Projectile {
            x: cx - half,
            y: cy - half,
            size: settings.projectile_size,
            motion,
            alive: true,
        });
    }

    /// One tick of movement followed by projectile flight.
    ///
    /// Each held direction is tried on its own and refused if it would leave
    /// the arena or overlap an obstacle, so a diagonal push against a wall
    /// still slides along it.  Dead actors stay put but their shots keep going.
    pub fn step(&mut self, obstacles: &[Obstacle], settings: &Settings) {
        let arena = settings.arena();
        self.touched_obstacle = false;

        if self.alive {
            let s = settings.move_step;
            let flags = self.input;
            let steps = [
                (flags.up, 0.0, -s),
                (flags.down, 0.0, s),
                (flags.left, -s, 0.0),
                (flags.right, s, 0.0),
            ];
            for (held, dx, dy) in steps {
                if held {
                    self.try_move(dx, dy, obstacles, &arena);
                }
            }
        }

        for projectile in &mut self.projectiles {
            projectile.advance(&arena);
        }
        self.projectiles.retain(|p| p.alive);
    }

    fn try_move(&mut self, dx: f32, dy: f32, obstacles: &[Obstacle], arena: &Rect) {
        let candidate = self.bounds().translated(dx, dy);
        if !arena.contains(&candidate) {
            return;
        }
        if obstacles.iter().any(|o| candidate.intersects(&o.bounds)) {
            self.touched_obstacle = true;
            return;
        }
        self.x = candidate.x;
        self.y = candidate.y;
    }

    pub fn live_projectiles(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter().filter(|p| p.alive)
    }
}
