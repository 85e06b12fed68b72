//! Match rules.
//!
//! Every public function takes an immutable reference to the current
//! `MatchState` (plus input or an RNG handle where needed) and returns a
//! brand-new value.  Side effects are limited to the injected RNG and logging.

use log::{debug, info};
use rand::Rng;

use crate::config::Settings;
use crate::entities::{
    Actor, ControlScheme, Frame, InputEvent, Level, MatchState, MatchStatus, Obstacle, Side,
    TerminalCause,
};
use crate::geometry::Rect;
use crate::render::draw_commands;

// ── Spawns ────────────────────────────────────────────────────────────────────

/// Spawn origin for `side`; see [`Settings::spawn_origins`].
pub fn spawn_point(side: Side, settings: &Settings) -> (f32, f32) {
    settings.spawn_origins()[side.index()]
}

fn spawn_actors(settings: &Settings) -> [Actor; 2] {
    let (x1, y1) = spawn_point(Side::One, settings);
    let (x2, y2) = spawn_point(Side::Two, settings);
    [
        Actor::new(Side::One, x1, y1, ControlScheme::arrows(), settings),
        Actor::new(Side::Two, x2, y2, ControlScheme::wasd(), settings),
    ]
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

/// Scatter up to `obstacle_attempts` random obstacles.  An attempt that would
/// overlap either actor is dropped, so fewer obstacles may come back.
/// Obstacles are allowed to overlap each other.
pub fn generate_obstacles(
    actors: &[Actor; 2],
    level: Level,
    settings: &Settings,
    rng: &mut impl Rng,
) -> Vec<Obstacle> {
    let max_x = settings.arena_width - settings.obstacle_max_size;
    let max_y = settings.arena_height - settings.obstacle_max_size;
    let size_range = settings.obstacle_min_size..settings.obstacle_max_size;

    let obstacles: Vec<Obstacle> = (0..settings.obstacle_attempts)
        .filter_map(|_| {
            let bounds = Rect::new(
                rng.gen_range(0.0..max_x),
                rng.gen_range(0.0..max_y),
                rng.gen_range(size_range.clone()),
                rng.gen_range(size_range.clone()),
            );
            let blocked = actors.iter().any(|a| a.bounds().intersects(&bounds));
            (!blocked).then_some(Obstacle {
                bounds,
                skin: level.obstacle_skin(),
            })
        })
        .collect();

    debug!(
        "placed {} of {} obstacles on level {}",
        obstacles.len(),
        settings.obstacle_attempts,
        level.id()
    );
    obstacles
}

// ── Constructors ──────────────────────────────────────────────────────────────

/// Build a running match: both actors at their spawns, fresh obstacles and a
/// full countdown.
pub fn new_match(level: Level, settings: Settings, rng: &mut impl Rng) -> MatchState {
    let actors = spawn_actors(&settings);
    let obstacles = generate_obstacles(&actors, level, &settings, rng);
    info!("match started on level {}", level.id());
    MatchState {
        level,
        countdown: settings.countdown_secs,
        settings,
        actors,
        obstacles,
        status: MatchStatus::Running,
        frame: 0,
    }
}

/// Start over on the same level with the same settings.
pub fn reset(state: &MatchState, rng: &mut impl Rng) -> MatchState {
    new_match(state.level, state.settings.clone(), rng)
}

// ── Clocks ────────────────────────────────────────────────────────────────────

/// One simulation tick.
///
/// Order: buffered input, actor movement and projectile flight, projectile
/// hits, then the hazard rule.  Hits are judged against the post-move
/// snapshot before anyone is marked dead, so two shots landing on the same
/// tick knock out both sides.  A terminal match is returned unchanged.
pub fn tick(state: &MatchState, input: &[InputEvent]) -> Frame {
    let mut next = state.clone();
    if next.is_terminal() {
        return finish(next);
    }
    next.frame += 1;

    // ── 1. Input ─────────────────────────────────────────────────────────────
    for event in input {
        for actor in next.actors.iter_mut() {
            actor.apply_input(event, &next.settings);
        }
    }

    // ── 2. Movement & projectile flight ──────────────────────────────────────
    for actor in next.actors.iter_mut() {
        actor.step(&next.obstacles, &next.settings);
    }

    // ── 3. Projectile hits ───────────────────────────────────────────────────
    let targets = next.actors.clone();
    let mut shot = [false; 2];
    for actor in next.actors.iter_mut() {
        let target = &targets[actor.side.opponent().index()];
        let target_bounds = target.bounds();
        for projectile in actor.projectiles.iter_mut().filter(|p| p.alive) {
            let bounds = projectile.bounds();
            if target.alive && bounds.intersects(&target_bounds) {
                shot[target.side.index()] = true;
                projectile.alive = false;
            }
            if next.obstacles.iter().any(|o| bounds.intersects(&o.bounds)) {
                projectile.alive = false;
            }
        }
    }

    let losers = eliminate(&mut next, |actor| shot[actor.side.index()]);
    if !losers.is_empty() {
        info!("frame {}: shot down {:?}", next.frame, losers);
        next.status = MatchStatus::Terminal(TerminalCause::Shot { losers });
        return finish(next);
    }

    // ── 4. Hazard contact ────────────────────────────────────────────────────
    if next.level.is_hazard() {
        let obstacles = next.obstacles.clone();
        let losers = eliminate(&mut next, |actor| {
            actor.touched_obstacle
                || obstacles
                    .iter()
                    .any(|o| actor.bounds().intersects(&o.bounds))
        });
        if !losers.is_empty() {
            info!("frame {}: hazard claimed {:?}", next.frame, losers);
            next.status = MatchStatus::Terminal(TerminalCause::Hazard { losers });
        }
    }

    finish(next)
}

/// One second of the round clock.  Reaching zero ends the match with no
/// specific loser.
pub fn countdown_tick(state: &MatchState) -> MatchState {
    let mut next = state.clone();
    if next.is_terminal() {
        return next;
    }
    if let Some(remaining) = next.countdown {
        let remaining = remaining.saturating_sub(1);
        next.countdown = Some(remaining);
        if remaining == 0 {
            info!("time is up");
            next.status = MatchStatus::Terminal(TerminalCause::Timeout);
        }
    }
    next
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Kill every live actor matching `doomed` and return their sides.
fn eliminate(state: &mut MatchState, doomed: impl Fn(&Actor) -> bool) -> Vec<Side> {
    let mut losers = Vec::new();
    for actor in state.actors.iter_mut() {
        if actor.alive && doomed(actor) {
            actor.alive = false;
            losers.push(actor.side);
        }
    }
    losers
}

fn finish(state: MatchState) -> Frame {
    Frame {
        commands: draw_commands(&state),
        state,
    }
}
