use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use arena_duel::actor::*;
use arena_duel::config::{ProjectileMotion, Settings};
use arena_duel::entities::*;
use arena_duel::geometry::Rect;

fn settings() -> Settings {
    Settings::default()
}

fn actor_one() -> Actor {
    Actor::new(Side::One, 50.0, 450.0, ControlScheme::arrows(), &settings())
}

fn actor_two() -> Actor {
    Actor::new(Side::Two, 700.0, 50.0, ControlScheme::wasd(), &settings())
}

fn flags(up: bool, down: bool, left: bool, right: bool) -> DirectionFlags {
    DirectionFlags {
        up,
        down,
        left,
        right,
    }
}

// ── facing_for ────────────────────────────────────────────────────────────────

#[test]
fn facing_covers_all_eight_directions() {
    assert_eq!(facing_for(&flags(false, false, false, true)), Some(0.0));
    assert_eq!(facing_for(&flags(false, true, false, true)), Some(FRAC_PI_4));
    assert_eq!(facing_for(&flags(false, true, false, false)), Some(FRAC_PI_2));
    assert_eq!(facing_for(&flags(false, true, true, false)), Some(3.0 * FRAC_PI_4));
    assert_eq!(facing_for(&flags(false, false, true, false)), Some(PI));
    assert_eq!(facing_for(&flags(true, false, true, false)), Some(-3.0 * FRAC_PI_4));
    assert_eq!(facing_for(&flags(true, false, false, false)), Some(-FRAC_PI_2));
    assert_eq!(facing_for(&flags(true, false, false, true)), Some(-FRAC_PI_4));
}

#[test]
fn opposite_keys_cancel() {
    assert_eq!(facing_for(&flags(false, false, false, false)), None);
    assert_eq!(facing_for(&flags(true, true, false, false)), None);
    assert_eq!(facing_for(&flags(true, true, true, true)), None);
    // Up+down cancel, right remains.
    assert_eq!(facing_for(&flags(true, true, false, true)), Some(FACING_RIGHT));
}

// ── apply_input ───────────────────────────────────────────────────────────────

#[test]
fn new_actor_faces_up() {
    let a = actor_one();
    assert_eq!(a.facing, FACING_UP);
    assert!(a.alive);
    assert!(!a.input.any());
}

#[test]
fn press_and_release_toggle_flags() {
    let s = settings();
    let mut a = actor_one();
    a.apply_input(&InputEvent::press(Key::Down), &s);
    a.apply_input(&InputEvent::press(Key::Left), &s);
    assert_eq!(a.input, flags(false, true, true, false));
    assert_eq!(a.facing, FACING_DOWN_LEFT);

    a.apply_input(&InputEvent::release(Key::Down), &s);
    assert_eq!(a.facing, FACING_LEFT);
    a.apply_input(&InputEvent::release(Key::Left), &s);
    assert!(!a.input.any());
    assert_eq!(a.facing, FACING_LEFT);
}

#[test]
fn wasd_is_case_insensitive() {
    let s = settings();
    let mut a = actor_two();
    a.apply_input(&InputEvent::press(Key::Char('D')), &s);
    assert!(a.input.right);
    a.apply_input(&InputEvent::release(Key::Char('d')), &s);
    assert!(!a.input.right);
}

#[test]
fn unmapped_keys_are_ignored() {
    let s = settings();
    let mut one = actor_one();
    let mut two = actor_two();
    let before_one = one.clone();
    let before_two = two.clone();

    one.apply_input(&InputEvent::press(Key::Char('w')), &s);
    one.apply_input(&InputEvent::press(Key::Enter), &s);
    two.apply_input(&InputEvent::press(Key::Up), &s);
    two.apply_input(&InputEvent::press(Key::Space), &s);
    two.apply_input(&InputEvent::press(Key::Char('x')), &s);

    assert_eq!(one, before_one);
    assert_eq!(two, before_two);
}

#[test]
fn fire_key_only_fires_on_press() {
    let s = settings();
    let mut a = actor_two();
    a.apply_input(&InputEvent::press(Key::Enter), &s);
    a.apply_input(&InputEvent::release(Key::Enter), &s);
    assert_eq!(a.projectiles.len(), 1);
}

#[test]
fn dead_actor_ignores_input() {
    let s = settings();
    let mut a = actor_one();
    a.alive = false;
    a.apply_input(&InputEvent::press(Key::Right), &s);
    a.apply_input(&InputEvent::press(Key::Space), &s);
    assert!(!a.input.right);
    assert!(a.projectiles.is_empty());
}

// ── fire ──────────────────────────────────────────────────────────────────────

#[test]
fn fire_spawns_at_centre_along_facing() {
    let s = settings();
    let mut a = actor_one();
    a.facing = FACING_RIGHT;
    a.fire(&s);
    let p = &a.projectiles[0];
    assert_eq!(p.bounds().center(), a.bounds().center());
    assert_eq!(p.size, 10.0);
    assert_eq!(
        p.motion,
        Motion::Aimed {
            angle: 0.0,
            speed: 10.0
        }
    );
    assert!(p.alive);
}

#[test]
fn fire_has_no_cooldown() {
    let s = settings();
    let mut a = actor_one();
    for _ in 0..5 {
        a.fire(&s);
    }
    assert_eq!(a.projectiles.len(), 5);
}

#[test]
fn upward_variant_ignores_facing() {
    let s = Settings {
        projectile_motion: ProjectileMotion::Upward,
        ..Settings::default()
    };
    let mut a = actor_one();
    a.facing = FACING_LEFT;
    a.fire(&s);
    assert_eq!(a.projectiles[0].motion, Motion::Upward { speed: 10.0 });
}

#[test]
fn dead_actor_cannot_fire() {
    let s = settings();
    let mut a = actor_one();
    a.alive = false;
    a.fire(&s);
    assert!(a.projectiles.is_empty());
}

// ── step ──────────────────────────────────────────────────────────────────────

#[test]
fn arena_edge_blocks_without_counting_as_contact() {
    let s = settings();
    let mut a = Actor::new(Side::One, 0.0, 550.0, ControlScheme::arrows(), &s);
    a.input = flags(false, true, true, false);
    a.step(&[], &s);
    assert_eq!((a.x, a.y), (0.0, 550.0));
    assert!(!a.touched_obstacle);
}

#[test]
fn partial_step_against_edge_is_refused() {
    let s = settings();
    let mut a = Actor::new(Side::One, 3.0, 100.0, ControlScheme::arrows(), &s);
    a.input = flags(false, false, true, false);
    a.step(&[], &s);
    assert_eq!(a.x, 3.0);
}

#[test]
fn obstacle_contact_flag_resets_each_step() {
    let s = settings();
    let wall = Obstacle {
        bounds: Rect::new(100.0, 450.0, 20.0, 50.0),
        skin: Skin::Brick,
    };
    let mut a = actor_one();
    a.input = flags(false, false, false, true);
    a.step(std::slice::from_ref(&wall), &s);
    assert!(a.touched_obstacle);
    assert_eq!(a.x, 50.0);

    a.input = flags(false, false, true, false);
    a.step(std::slice::from_ref(&wall), &s);
    assert!(!a.touched_obstacle);
    assert_eq!(a.x, 45.0);
}

#[test]
fn dead_actor_stays_put_but_shots_keep_flying() {
    let s = settings();
    let mut a = actor_one();
    a.fire(&s);
    a.alive = false;
    a.input = flags(true, false, false, false);
    let y_before = a.projectiles[0].y;
    a.step(&[], &s);
    assert_eq!((a.x, a.y), (50.0, 450.0));
    assert_eq!(a.projectiles[0].y, y_before - 10.0);
}

// ── Projectile::advance ───────────────────────────────────────────────────────

#[test]
fn projectile_moves_along_angle() {
    let arena = settings().arena();
    let mut p = Projectile {
        x: 100.0,
        y: 100.0,
        size: 10.0,
        motion: Motion::Aimed {
            angle: FACING_DOWN,
            speed: 10.0,
        },
        alive: true,
    };
    p.advance(&arena);
    assert!((p.x - 100.0).abs() < 1e-4);
    assert!((p.y - 110.0).abs() < 1e-4);
    assert!(p.alive);
}

#[test]
fn projectile_dies_past_each_edge() {
    let arena = settings().arena();
    let cases = [
        (5.0, 300.0, FACING_LEFT),
        (795.0, 300.0, FACING_RIGHT),
        (400.0, 5.0, FACING_UP),
        (400.0, 595.0, FACING_DOWN),
    ];
    for (x, y, angle) in cases {
        let mut p = Projectile {
            x,
            y,
            size: 10.0,
            motion: Motion::Aimed { angle, speed: 10.0 },
            alive: true,
        };
        p.advance(&arena);
        assert!(!p.alive, "({x}, {y}) heading {angle}");
    }
}

#[test]
fn dead_projectile_does_not_move() {
    let arena = settings().arena();
    let mut p = Projectile {
        x: 100.0,
        y: 100.0,
        size: 10.0,
        motion: Motion::Upward { speed: 10.0 },
        alive: false,
    };
    p.advance(&arena);
    assert_eq!((p.x, p.y), (100.0, 100.0));
}
