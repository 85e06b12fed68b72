mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use arena_duel::assets::{load_skins, SkinSet};
use arena_duel::compute::{countdown_tick, new_match, reset, tick};
use arena_duel::config::Settings;
use arena_duel::entities::{InputEvent, Key, Level, MatchState};

use display::Viewport;

const SECOND: Duration = Duration::from_secs(1);

/// A key is considered "held" if its last press/repeat event arrived within
/// this long.  Covers terminals that don't emit key-release events.  The OS
/// waits 250–600 ms before the first repeat, so the window must outlast that
/// gap or a held key stutters.  The cost is that a released key keeps the
/// actor moving for up to this long on such terminals.
const HOLD_WINDOW: Duration = Duration::from_millis(650);

#[derive(Parser, Debug)]
#[command(name = "arena_duel", about = "Two-player terminal arena shooter")]
struct Args {
    /// Start directly on this level (1 or 2) instead of showing the menu.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
    level: Option<u8>,

    /// JSON settings file; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for obstacle placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Directory holding level1.json / level2.json skin files.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Where to write logs (the terminal is busy drawing the game).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Logging ───────────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ── Input translation ─────────────────────────────────────────────────────────

fn to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) => Some(Key::Char(c.to_ascii_lowercase())),
        _ => None,
    }
}

fn is_fire_key(state: &MatchState, key: &Key) -> bool {
    state.actors.iter().any(|a| key.matches(&a.controls.fire))
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(Level),
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  ARENA  DUEL  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(14), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select map:"))?;

    let options: &[(&str, &str, Color, &str)] = &[
        ("1", "Level 1", Color::Green, "Brick walls block moves and shots"),
        ("2", "Level 2", Color::Red, "Lava pits: touch one and you're out"),
    ];

    for (i, (key, label, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(14), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<8}", label)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" — {}", desc)))?;
    }

    let controls: &[(&str, Color, &str)] = &[
        ("Player 1", Color::Blue, "  ← ↑ → ↓ move   SPACE fire"),
        ("Player 2", Color::Red, "  W A S D move   ENTER fire"),
    ];
    for (i, (who, color, keys)) in controls.iter().enumerate() {
        let row = cy + 3 + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(14), row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*who))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(*keys))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(14), cy + 6))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Q : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        if let Ok(Event::Key(KeyEvent { code, kind, .. })) = rx.recv() {
            if kind != KeyEventKind::Press {
                continue;
            }
            match code {
                KeyCode::Char('1') => return Ok(MenuResult::Start(Level::One)),
                KeyCode::Char('2') => return Ok(MenuResult::Start(Level::Two)),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

// ── Match loop ────────────────────────────────────────────────────────────────

enum MatchExit {
    Quit,
    Menu,
}

/// Run one level until the players quit or go back to the menu.
///
/// Input model: a `key_frame` map records the frame of the last press/repeat
/// for every held key.  A key newly entering the map becomes a press event
/// for the tick; a key released (keyboard-enhancement terminals) or silent
/// for longer than `HOLD_WINDOW` (classic terminals) becomes a release
/// event.  Fire keys bypass the map and fire once per `Press` event.
fn match_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    mut state: MatchState,
    skins: &SkinSet,
    rng: &mut StdRng,
) -> std::io::Result<MatchExit> {
    let frame_period = Duration::from_millis(state.settings.tick_ms);
    let hold_frames = (HOLD_WINDOW.as_millis() as u64).div_ceil(state.settings.tick_ms);
    let mut key_frame: HashMap<Key, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut second_start = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut events: Vec<InputEvent> = Vec::new();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            if kind == KeyEventKind::Press {
                match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        return Ok(MatchExit::Quit);
                    }
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(MatchExit::Quit);
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') if state.is_terminal() => {
                        info!("play again");
                        state = reset(&state, rng);
                        key_frame.clear();
                        events.clear();
                        second_start = Instant::now();
                        continue;
                    }
                    KeyCode::Char('m') | KeyCode::Char('M') if state.is_terminal() => {
                        return Ok(MatchExit::Menu);
                    }
                    _ => {}
                }
            }

            let Some(key) = to_key(code) else { continue };
            match kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    if is_fire_key(&state, &key) {
                        if kind == KeyEventKind::Press {
                            events.push(InputEvent::press(key));
                        }
                    } else if key_frame.insert(key, frame).is_none() {
                        events.push(InputEvent::press(key));
                    }
                }
                KeyEventKind::Release => {
                    if key_frame.remove(&key).is_some() {
                        events.push(InputEvent::release(key));
                    }
                }
            }
        }

        // Keys that went quiet count as released
        key_frame.retain(|key, last| {
            let live = frame.saturating_sub(*last) <= hold_frames;
            if !live {
                events.push(InputEvent::release(*key));
            }
            live
        });

        // ── Round clock ───────────────────────────────────────────────────────
        while second_start.elapsed() >= SECOND {
            second_start += SECOND;
            state = countdown_tick(&state);
        }

        // ── Simulate & draw ───────────────────────────────────────────────────
        let next = tick(&state, &events);
        state = next.state;

        let (width, height) = terminal::size()?;
        let view = Viewport {
            width,
            height,
            arena_width: state.settings.arena_width,
            arena_height: state.settings.arena_height,
        };
        display::render(out, &next.commands, skins, &view)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_period {
            thread::sleep(frame_period - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("arena_duel.log"));
    init_logging(&log_path)?;

    let settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    if !keyboard_enhanced {
        warn!("terminal does not report key releases; using hold window");
    }

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &args, settings);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.context("terminal I/O failed")
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    args: &Args,
    settings: Settings,
) -> std::io::Result<()> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut direct = args.level.and_then(Level::from_id);

    loop {
        let level = match direct.take() {
            Some(level) => level,
            None => match show_menu(out, rx)? {
                MenuResult::Quit => break,
                MenuResult::Start(level) => level,
            },
        };

        let skins = load_skins(args.assets.as_deref(), level);
        let state = new_match(level, settings.clone(), &mut rng);
        match match_loop(out, rx, state, &skins, &mut rng)? {
            MatchExit::Quit => break,
            MatchExit::Menu => {}
        }
    }
    info!("bye");
    Ok(())
}
