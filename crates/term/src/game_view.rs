//! GameView: maps a session snapshot into a terminal framebuffer.
//!
//! Pure (no I/O), so layouts can be unit-tested.

use crate::core::SessionSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::store::{format_elapsed, HistoryStats};
use crate::types::{GameSummary, Tile};

const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);
const BOARD_BG: Rgb = Rgb::new(187, 173, 160);
const EMPTY_BG: Rgb = Rgb::new(205, 193, 180);
const DARK_TEXT: Rgb = Rgb::new(119, 110, 101);
const LIGHT_TEXT: Rgb = Rgb::new(249, 246, 242);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Front-end data shown next to the board that the session does not own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HudInfo {
    pub best_score: u32,
    pub games_played: usize,
    pub sound_on: bool,
    /// Sound volume as a percentage
    pub volume_pct: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Terminal renderer for the 2048 board.
pub struct GameView {
    /// Tile width in terminal columns.
    cell_w: u16,
    /// Tile height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 7x3 keeps tiles roughly square and fits six digits.
        Self {
            cell_w: 7,
            cell_h: 3,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Top-left corner of the board frame and its outer size.
    fn frame(&self, grid_size: usize, viewport: Viewport) -> (u16, u16, u16, u16) {
        let n = u16::try_from(grid_size).unwrap_or(u16::MAX);
        let frame_w = n.saturating_mul(self.cell_w).saturating_add(2);
        let frame_h = n.saturating_mul(self.cell_h).saturating_add(2);
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };
        (start_x, start_y, frame_w, frame_h)
    }

    /// Render the game into an existing framebuffer.
    ///
    /// Callers reuse one framebuffer across frames; it is only resized when the
    /// viewport changes.
    pub fn render_into(
        &self,
        snap: &SessionSnapshot,
        hud: &HudInfo,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::new(SCREEN_BG, SCREEN_BG).cell(' '));

        let (start_x, start_y, frame_w, frame_h) = self.frame(snap.grid_size, viewport);
        let board = CellStyle::new(DARK_TEXT, BOARD_BG);
        fb.fill_rect(start_x, start_y, frame_w, frame_h, ' ', board);
        draw_border(fb, start_x, start_y, frame_w, frame_h, board.bold());

        for row in 0..snap.grid_size {
            for col in 0..snap.grid_size {
                self.draw_empty_cell(fb, start_x, start_y, row, col);
            }
        }

        // Fading merge sources sit under their merge result and are not drawn.
        for tile in snap.tiles.iter().filter(|t| !t.is_merging) {
            self.draw_tile(fb, start_x, start_y, tile);
        }

        let popup = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(246, 94, 59)).bold();
        for p in &snap.popups {
            let (px, py) = self.cell_origin(start_x, start_y, p.position.row, p.position.col);
            fb.put_char(px, py, '+', popup);
            fb.put_u32(px.saturating_add(1), py, p.value, popup);
        }

        self.draw_side_panel(fb, snap, hud, viewport, start_x, start_y, frame_w);

        if snap.is_paused {
            draw_overlay(fb, start_x, start_y, frame_w, frame_h, "PAUSED", "p to resume");
        } else if snap.is_game_over {
            draw_overlay(fb, start_x, start_y, frame_w, frame_h, "GAME OVER", "r to restart");
        } else if snap.state.is_not_started() {
            draw_overlay(fb, start_x, start_y, frame_w, frame_h, "2048", "r to start");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &SessionSnapshot, hud: &HudInfo, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, hud, viewport, &mut fb);
        fb
    }

    /// Render the history screen, newest game first.
    pub fn render_history_into(
        &self,
        entries: &[GameSummary],
        stats: &HistoryStats,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let title = CellStyle::default().bold();
        let text = CellStyle::default();
        let dim = text.dim();

        fb.put_str_centered(0, 0, viewport.width, "HISTORY", title);

        let x = 2;
        let mut y = 2;
        let end = fb.put_str(x, y, "games ", dim);
        let end = fb.put_u32(end, y, u32::try_from(stats.games_played).unwrap_or(u32::MAX), text);
        let end = fb.put_str(end.saturating_add(3), y, "best ", dim);
        let end = fb.put_u32(end, y, stats.best_score, text);
        let end = fb.put_str(end.saturating_add(3), y, "top tile ", dim);
        fb.put_u32(end, y, stats.best_tile, text);
        y += 2;

        if entries.is_empty() {
            fb.put_str(x, y, "No games yet.", dim);
        } else {
            fb.put_str(x, y, "  #      SCORE    TILE  TIME", title);
            y += 1;
            let rows = usize::from(viewport.height.saturating_sub(y + 1));
            for (i, entry) in entries.iter().take(rows).enumerate() {
                let line = format!(
                    "{:>3}  {:>9}  {:>6}  {}",
                    i + 1,
                    entry.score,
                    entry.max_tile_value,
                    format_elapsed(entry.elapsed_time_ms)
                );
                fb.put_str(x, y, &line, text);
                y += 1;
            }
        }

        let footer_y = viewport.height.saturating_sub(1);
        fb.put_str(x, footer_y, "? back   c clear   q quit", dim);
    }

    fn cell_origin(&self, start_x: u16, start_y: u16, row: usize, col: usize) -> (u16, u16) {
        let col = u16::try_from(col).unwrap_or(u16::MAX);
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        (
            start_x.saturating_add(1).saturating_add(col.saturating_mul(self.cell_w)),
            start_y.saturating_add(1).saturating_add(row.saturating_mul(self.cell_h)),
        )
    }

    fn draw_empty_cell(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        row: usize,
        col: usize,
    ) {
        let (px, py) = self.cell_origin(start_x, start_y, row, col);
        let style = CellStyle::new(BOARD_BG, EMPTY_BG);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);
        fb.put_str_centered(px, py + self.cell_h / 2, self.cell_w, "·", style);
    }

    fn draw_tile(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, tile: &Tile) {
        let (px, py) = self.cell_origin(start_x, start_y, tile.position.row, tile.position.col);
        let mut style = tile_style(tile.value);
        if tile.is_merged {
            style = style.bold();
        }
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);

        let label = tile_label(tile.value, self.cell_w);
        fb.put_str_centered(px, py + self.cell_h / 2, self.cell_w, &label, style.bold());
        if tile.is_new && self.cell_w >= 3 {
            fb.put_char(px + self.cell_w - 1, py, '*', style.dim());
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        hud: &HudInfo,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 14 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);

        let mut y = start_y;
        fb.put_str(panel_x, y, "SCORE", label);
        fb.put_u32(panel_x, y + 1, snap.score, value);
        y += 3;

        fb.put_str(panel_x, y, "BEST", label);
        fb.put_u32(panel_x, y + 1, hud.best_score.max(snap.score), value);
        y += 3;

        fb.put_str(panel_x, y, "TIME", label);
        fb.put_str(panel_x, y + 1, &format_elapsed(snap.elapsed_time_ms), value);
        y += 3;

        fb.put_str(panel_x, y, "GAMES", label);
        fb.put_u32(
            panel_x,
            y + 1,
            u32::try_from(hud.games_played).unwrap_or(u32::MAX),
            value,
        );
        y += 3;

        let dim = value.dim();
        let sound = if hud.sound_on {
            format!("sound {}%", hud.volume_pct)
        } else {
            "sound off".to_string()
        };
        fb.put_str(panel_x, y, &sound, dim);
        y += 2;
        for help in [
            "arrows move",
            "p pause",
            "r restart",
            "m sound +/- vol",
            "? history",
            "q quit",
        ] {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, help, dim);
            y += 1;
        }
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }
    let right = x + w - 1;
    let bottom = y + h - 1;

    fb.put_char(x, y, '╭', style);
    fb.put_char(right, y, '╮', style);
    fb.put_char(x, bottom, '╰', style);
    fb.put_char(right, bottom, '╯', style);
    for dx in x + 1..right {
        fb.put_char(dx, y, '─', style);
        fb.put_char(dx, bottom, '─', style);
    }
    for dy in y + 1..bottom {
        fb.put_char(x, dy, '│', style);
        fb.put_char(right, dy, '│', style);
    }
}

fn draw_overlay(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, title: &str, hint: &str) {
    let mid_y = y.saturating_add(h / 2);
    let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(60, 58, 50)).bold();
    let band_w = w.saturating_sub(4);
    fb.fill_rect(x + 2, mid_y.saturating_sub(1), band_w, 3, ' ', style);
    fb.put_str_centered(x, mid_y.saturating_sub(1), w, title, style);
    fb.put_str_centered(x, mid_y + 1, w, hint, CellStyle { bold: false, ..style });
}

/// Tile colors follow the classic 2048 palette.
fn tile_style(value: u32) -> CellStyle {
    let bg = match value {
        2 => Rgb::new(238, 228, 218),
        4 => Rgb::new(237, 224, 200),
        8 => Rgb::new(242, 177, 121),
        16 => Rgb::new(245, 149, 99),
        32 => Rgb::new(246, 124, 95),
        64 => Rgb::new(246, 94, 59),
        128 => Rgb::new(237, 207, 114),
        256 => Rgb::new(237, 204, 97),
        512 => Rgb::new(237, 200, 80),
        1024 => Rgb::new(237, 197, 63),
        2048 => Rgb::new(237, 194, 46),
        _ => Rgb::new(60, 58, 50),
    };
    let fg = if value <= 4 { DARK_TEXT } else { LIGHT_TEXT };
    CellStyle::new(fg, bg)
}

/// Decimal label, or `2^k` when the digits do not fit the tile.
fn tile_label(value: u32, width: u16) -> String {
    let label = value.to_string();
    if label.len() <= usize::from(width) {
        label
    } else {
        format!("2^{}", value.trailing_zeros())
    }
}
