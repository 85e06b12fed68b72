//! Display-free description of a frame.
//!
//! The simulation never talks to the terminal.  Each tick produces a list of
//! draw commands in arena units; the binary's display layer decides how they
//! look.

use crate::entities::{Level, MatchState, Side, Skin};
use crate::geometry::Rect;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Background(Level),
    Obstacle { rect: Rect, skin: Skin },
    Actor { side: Side, rect: Rect, facing: f32 },
    Projectile { side: Side, rect: Rect },
    /// Seconds left on the round clock.
    Timer(u32),
    Banner(String),
}

/// Background, obstacles, live actors, live projectiles, HUD, then the
/// end-of-match banner if there is one.
pub fn draw_commands(state: &MatchState) -> Vec<DrawCommand> {
    let mut commands = vec![DrawCommand::Background(state.level)];

    commands.extend(state.obstacles.iter().map(|o| DrawCommand::Obstacle {
        rect: o.bounds,
        skin: o.skin,
    }));

    for actor in &state.actors {
        if actor.alive {
            commands.push(DrawCommand::Actor {
                side: actor.side,
                rect: actor.bounds(),
                facing: actor.facing,
            });
        }
    }

    for actor in &state.actors {
        commands.extend(actor.live_projectiles().map(|p| DrawCommand::Projectile {
            side: actor.side,
            rect: p.bounds(),
        }));
    }

    if let Some(secs) = state.countdown {
        commands.push(DrawCommand::Timer(secs));
    }

    if let Some(text) = banner_text(state) {
        commands.push(DrawCommand::Banner(text));
    }

    commands
}

/// "Winner: Player N" once a single actor survives a finished match, "Draw"
/// when both or neither do.
pub fn banner_text(state: &MatchState) -> Option<String> {
    if !state.is_terminal() {
        return None;
    }
    Some(match state.winner() {
        Some(side) => format!("Winner: {}", side.label()),
        None => "Draw".to_string(),
    })
}
