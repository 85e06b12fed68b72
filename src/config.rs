//! Match tuning.
//!
//! Defaults reproduce the classic two-player arena: an 800×600 field, 50-unit
//! soldiers moving 5 units per tick, 10-unit shots at speed 10 and a
//! one-minute round.  Any field may be overridden from a JSON file.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// How a freshly fired projectile travels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectileMotion {
    /// Along the shooter's facing angle.
    #[default]
    Aimed,
    /// Straight up the screen regardless of facing.
    Upward,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub arena_width: f32,
    pub arena_height: f32,
    /// Side length of an actor's square bounding box.
    pub actor_size: f32,
    /// Side length of a projectile's square bounding box.
    pub projectile_size: f32,
    /// Distance covered per tick along each held direction.
    pub move_step: f32,
    pub projectile_speed: f32,
    pub projectile_motion: ProjectileMotion,
    /// Placement attempts per obstacle layout; rejected attempts are dropped.
    pub obstacle_attempts: u32,
    /// Obstacle sides are sampled from `obstacle_min_size..obstacle_max_size`.
    pub obstacle_min_size: f32,
    pub obstacle_max_size: f32,
    /// Round length in seconds.  `None` disables the timer.
    pub countdown_secs: Option<u32>,
    /// Simulation tick period in milliseconds.
    pub tick_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: 800.0,
            arena_height: 600.0,
            actor_size: 50.0,
            projectile_size: 10.0,
            move_step: 5.0,
            projectile_speed: 10.0,
            projectile_motion: ProjectileMotion::Aimed,
            obstacle_attempts: 10,
            obstacle_min_size: 20.0,
            obstacle_max_size: 120.0,
            countdown_secs: Some(60),
            tick_ms: 20,
        }
    }
}

impl Settings {
    /// Read, parse and validate a JSON settings file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(text).map_err(ConfigError::Parse)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arena_width <= 0.0 || self.arena_height <= 0.0 {
            return Err(ConfigError::Invalid("arena dimensions must be positive"));
        }
        if self.actor_size <= 0.0 || self.projectile_size <= 0.0 {
            return Err(ConfigError::Invalid("entity sizes must be positive"));
        }
        let arena = self.arena();
        let [one, two] = self.spawn_boxes();
        if !arena.contains(&one) || !arena.contains(&two) {
            return Err(ConfigError::Invalid("actors do not fit in the arena at their spawns"));
        }
        if one.intersects(&two) {
            return Err(ConfigError::Invalid("spawn positions overlap"));
        }
        if self.move_step <= 0.0 || self.projectile_speed <= 0.0 {
            return Err(ConfigError::Invalid("speeds must be positive"));
        }
        if self.obstacle_attempts == 0 {
            return Err(ConfigError::Invalid("obstacle_attempts must be at least 1"));
        }
        if self.obstacle_min_size <= 0.0 || self.obstacle_min_size >= self.obstacle_max_size {
            return Err(ConfigError::Invalid(
                "obstacle size range must be non-empty and positive",
            ));
        }
        if self.obstacle_max_size >= self.arena_width || self.obstacle_max_size >= self.arena_height
        {
            return Err(ConfigError::Invalid("obstacles must be smaller than the arena"));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be at least 1"));
        }
        Ok(())
    }

    pub fn arena(&self) -> Rect {
        Rect::new(0.0, 0.0, self.arena_width, self.arena_height)
    }

    /// Spawn origins: bottom-left for side one, top-right for side two.  On
    /// the default 800×600 arena these are (50, 450) and (700, 50).
    pub fn spawn_origins(&self) -> [(f32, f32); 2] {
        [
            (50.0, (self.arena_height - 150.0).max(0.0)),
            ((self.arena_width - 100.0).max(0.0), 50.0),
        ]
    }

    pub fn spawn_boxes(&self) -> [Rect; 2] {
        self.spawn_origins()
            .map(|(x, y)| Rect::new(x, y, self.actor_size, self.actor_size))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "cannot read settings: {err}"),
            Self::Parse(err) => write!(f, "malformed settings: {err}"),
            Self::Invalid(reason) => write!(f, "invalid settings: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}
