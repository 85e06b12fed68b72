//! Rendering layer — all terminal I/O lives here.
//!
//! Receives the draw commands produced by a tick and translates them into
//! terminal commands.  No game logic is performed; arena units are scaled to
//! the current terminal size on every frame.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use arena_duel::assets::SkinSet;
use arena_duel::entities::{Level, Side, Skin};
use arena_duel::geometry::Rect;
use arena_duel::render::DrawCommand;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_TIMER: Color = Color::White;
const C_BACKGROUND: Color = Color::DarkGrey;
const C_PLAYER_ONE: Color = Color::Blue;
const C_PLAYER_TWO: Color = Color::Red;
const C_BRICK: Color = Color::DarkYellow;
const C_LAVA: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

fn side_color(side: Side) -> Color {
    match side {
        Side::One => C_PLAYER_ONE,
        Side::Two => C_PLAYER_TWO,
    }
}

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps arena units onto the play area: columns `1..width-1`, rows
/// `2..height-2`.  Row 0 is the HUD and the last row the controls hint.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
    pub arena_width: f32,
    pub arena_height: f32,
}

impl Viewport {
    fn inner_cols(&self) -> u16 {
        self.width.saturating_sub(2).max(1)
    }

    fn inner_rows(&self) -> u16 {
        self.height.saturating_sub(4).max(1)
    }

    fn cell(&self, x: f32, y: f32) -> (u16, u16) {
        let cols = self.inner_cols();
        let rows = self.inner_rows();
        let col = ((x / self.arena_width) * cols as f32).floor().clamp(0.0, (cols - 1) as f32);
        let row = ((y / self.arena_height) * rows as f32).floor().clamp(0.0, (rows - 1) as f32);
        (1 + col as u16, 2 + row as u16)
    }

    /// Inclusive cell span covered by `rect`.
    fn span(&self, rect: &Rect) -> ((u16, u16), (u16, u16)) {
        let top_left = self.cell(rect.x, rect.y);
        let bottom_right = self.cell(rect.right() - 0.001, rect.bottom() - 0.001);
        (top_left, bottom_right)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    commands: &[DrawCommand],
    skins: &SkinSet,
    view: &Viewport,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;

    for command in commands {
        match command {
            DrawCommand::Background(level) => {
                draw_background(out, skins, view)?;
                draw_level_tag(out, *level, view)?;
            }
            DrawCommand::Obstacle { rect, skin } => draw_obstacle(out, rect, *skin, skins, view)?,
            DrawCommand::Actor { side, rect, facing } => {
                draw_actor(out, *side, rect, *facing, skins, view)?
            }
            DrawCommand::Projectile { side, rect } => {
                let (col, row) = view.cell(rect.center().0, rect.center().1);
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(style::SetForegroundColor(side_color(*side)))?;
                out.queue(Print(skins.projectile))?;
            }
            DrawCommand::Timer(secs) => draw_timer(out, *secs)?,
            DrawCommand::Banner(text) => draw_banner(out, text, view)?,
        }
    }

    draw_controls_hint(out, view)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border & background ───────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2 — bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

fn draw_background<W: Write>(out: &mut W, skins: &SkinSet, view: &Viewport) -> std::io::Result<()> {
    if skins.background == ' ' {
        return Ok(());
    }
    out.queue(style::SetForegroundColor(C_BACKGROUND))?;
    // Sparse pattern so the arena stays readable.
    for row in (3..view.height.saturating_sub(2)).step_by(3) {
        let offset = if row % 2 == 0 { 2 } else { 5 };
        for col in (offset..view.width.saturating_sub(1)).step_by(7) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print(skins.background))?;
        }
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

const TIMER_COL: u16 = 1;
/// Width of `Time Remaining: NNN`.
const TIMER_WIDTH: u16 = 19;

fn draw_timer<W: Write>(out: &mut W, secs: u32) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(TIMER_COL, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_TIMER))?;
    out.queue(Print(format!("Time Remaining: {:>3}", secs)))?;
    Ok(())
}

/// Centred column for the level tag, pushed right of the timer on narrow
/// terminals.
fn level_tag_column(width: u16, tag_len: u16) -> u16 {
    let centred = (width / 2).saturating_sub(tag_len / 2);
    centred.max(TIMER_COL + TIMER_WIDTH + 1)
}

fn draw_level_tag<W: Write>(out: &mut W, level: Level, view: &Viewport) -> std::io::Result<()> {
    let (tag, color) = match level {
        Level::One => ("[ LEVEL 1 ]", Color::Green),
        Level::Two => ("[ LEVEL 2 · LAVA ]", Color::Red),
    };
    let lx = level_tag_column(view.width, tag.chars().count() as u16);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(tag))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_obstacle<W: Write>(
    out: &mut W,
    rect: &Rect,
    skin: Skin,
    skins: &SkinSet,
    view: &Viewport,
) -> std::io::Result<()> {
    let color = match skin {
        Skin::Brick => C_BRICK,
        Skin::Lava => C_LAVA,
    };
    let ((c0, r0), (c1, r1)) = view.span(rect);
    let fill: String = std::iter::repeat(skins.obstacle)
        .take((c1 - c0 + 1) as usize)
        .collect();
    out.queue(style::SetForegroundColor(color))?;
    for row in r0..=r1 {
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print(&fill))?;
    }
    Ok(())
}

fn draw_actor<W: Write>(
    out: &mut W,
    side: Side,
    rect: &Rect,
    facing: f32,
    skins: &SkinSet,
    view: &Viewport,
) -> std::io::Result<()> {
    // Solid block in the side's colour with the facing arrow in the middle.
    let ((c0, r0), (c1, r1)) = view.span(rect);
    let blank = " ".repeat((c1 - c0 + 1) as usize);
    out.queue(style::SetBackgroundColor(side_color(side)))?;
    for row in r0..=r1 {
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print(&blank))?;
    }
    let (cx, cy) = rect.center();
    let (col, row) = view.cell(cx, cy);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(skins.actor_glyph(facing)))?;
    out.queue(style::SetBackgroundColor(Color::Reset))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "P1: ← ↑ → ↓ + SPACE   P2: W A S D + ENTER   Q : Quit",
    ))?;
    Ok(())
}

// ── End-of-match overlay ──────────────────────────────────────────────────────

fn draw_banner<W: Write>(out: &mut W, text: &str, view: &Viewport) -> std::io::Result<()> {
    let inner = 22.max(text.chars().count() + 4);
    let top = format!("╔{}╗", "═".repeat(inner));
    let middle = format!("║{:^inner$}║", text);
    let bottom = format!("╚{}╝", "═".repeat(inner));
    let hint = "R - Play Again  M - Select Map  Q - Quit";

    let lines: [(&str, Color); 4] = [
        (top.as_str(), Color::Yellow),
        (middle.as_str(), Color::Yellow),
        (bottom.as_str(), Color::Yellow),
        (hint, Color::White),
    ];

    let cx = view.width / 2;
    let start_row = (view.height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_tag_is_centred_on_wide_terminals() {
        assert_eq!(level_tag_column(120, 11), 55);
    }

    #[test]
    fn level_tag_clears_the_timer_on_narrow_terminals() {
        let timer_end = TIMER_COL + format!("Time Remaining: {:>3}", 60).len() as u16;
        assert_eq!(timer_end, TIMER_COL + TIMER_WIDTH);
        for width in [0, 20, 40, 50] {
            assert!(level_tag_column(width, 18) > timer_end);
        }
    }
}
