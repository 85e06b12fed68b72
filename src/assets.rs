//! Per-level glyph skins.
//!
//! Built-in skins are used unless a skin directory is given, in which case
//! `level<N>.json` is read from it.  A skin file that cannot be read or
//! parsed is logged and replaced by plain ASCII; the match itself never
//! depends on skins.

use std::f32::consts::FRAC_PI_4;
use std::fmt;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::entities::Level;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkinSet {
    /// Scattered over the empty arena.
    pub background: char,
    pub obstacle: char,
    pub projectile: char,
    /// Actor sprite per compass octant, clockwise from facing right.
    pub actor: [char; 8],
}

impl SkinSet {
    pub fn builtin(level: Level) -> Self {
        let actor = ['→', '↘', '↓', '↙', '←', '↖', '↑', '↗'];
        match level {
            Level::One => Self {
                background: '·',
                obstacle: '█',
                projectile: '•',
                actor,
            },
            Level::Two => Self {
                background: '~',
                obstacle: '▒',
                projectile: '•',
                actor,
            },
        }
    }

    /// Reduced skin used when the real one failed to load.
    pub fn blank() -> Self {
        Self {
            background: ' ',
            obstacle: '#',
            projectile: '*',
            actor: ['@'; 8],
        }
    }

    pub fn actor_glyph(&self, facing: f32) -> char {
        let octant = (facing / FRAC_PI_4).round() as i32;
        self.actor[octant.rem_euclid(8) as usize]
    }
}

#[derive(Debug)]
pub enum AssetError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, serde_json::Error),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(path, err) => write!(f, "cannot read skin {}: {err}", path.display()),
            Self::Parse(path, err) => write!(f, "malformed skin {}: {err}", path.display()),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(_, err) => Some(err),
            Self::Parse(_, err) => Some(err),
        }
    }
}

pub fn skin_path(dir: &Path, level: Level) -> PathBuf {
    dir.join(format!("level{}.json", level.id()))
}

pub fn read_skins(path: &Path) -> Result<SkinSet, AssetError> {
    let text =
        std::fs::read_to_string(path).map_err(|err| AssetError::Io(path.to_path_buf(), err))?;
    serde_json::from_str(&text).map_err(|err| AssetError::Parse(path.to_path_buf(), err))
}

/// Skins for `level`.  Never fails: load errors are logged and degrade to
/// [`SkinSet::blank`].
pub fn load_skins(dir: Option<&Path>, level: Level) -> SkinSet {
    let Some(dir) = dir else {
        return SkinSet::builtin(level);
    };
    match read_skins(&skin_path(dir, level)) {
        Ok(skins) => skins,
        Err(err) => {
            warn!("{err}; using plain glyphs");
            SkinSet::blank()
        }
    }
}
