/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws.
///
/// ## Canvas mapping
///
/// The game thinks in an 800×600 pixel canvas. One terminal cell stands for
/// a 16×32 pixel block, so a 32-pixel tile is two columns wide and one row
/// tall. The canvas starts at terminal row `MAP_ROW`. A cell is "inside" a
/// rectangle when its center pixel is; `cell_to_canvas` returns that same
/// center, so a click on a drawn button always hits the button.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{Anchor, Drawable};
use crate::domain::physics::{CANVAS_HEIGHT, CANVAS_WIDTH, TILE_SIZE};
use crate::sim::menu::{self, Button};
use crate::sim::world::{Phase, Session};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: [u8; 16], // up to 16 bytes (supports ZWJ emoji sequences)
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool, // true = this char occupies 2 terminal columns
    cont: bool, // true = continuation of previous wide char (skip render)
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells.
    ///
    /// Using the same RGB for `Clear(ClearType::All)` and every cell keeps
    /// the inter-row gap color on VTE terminals identical to the cells.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    const WIDE_CONT: Cell = Cell {
        ch: [0; 16],
        ch_len: 0,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: true,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: [b'?', 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    /// Normalize bg: Color::Reset → BASE_BG so that every cell gets an
    /// explicit background color (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.ch_len = len;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell
    }

    fn from_char_wide(c: char, bg: Color) -> Self {
        let mut cell = Self::from_char(c, Color::Reset, bg);
        cell.wide = true;
        cell
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or("?")
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width {
                break;
            }
            self.set(x + i, y, Cell::from_char(ch, fg, bg));
        }
    }

    /// Write text over existing cells, keeping each cell's background.
    fn overlay_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            let bg = self.get(x + i, y).bg;
            self.set(x + i, y, Cell::from_char(ch, fg, bg));
        }
    }
}

// ── Canvas geometry ──

/// Canvas pixels per terminal cell.
const CELL_PX_W: f32 = 16.0;
const CELL_PX_H: f32 = 32.0;

/// Vertical offsets
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const CANVAS_COLS: usize = (CANVAS_WIDTH / CELL_PX_W) as usize;
/// 600 / 32 = 18.75: the last row is partially on the canvas.
const CANVAS_ROWS: usize = ((CANVAS_HEIGHT + CELL_PX_H - 1.0) / CELL_PX_H) as usize;

const SOLID_BG: Color = Color::Rgb { r: 120, g: 72, b: 40 };
const SOLID_FG: Color = Color::Rgb { r: 160, g: 104, b: 64 };
const SKY_ALT: Color = Color::Rgb { r: 26, g: 26, b: 42 };
const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const PANEL_BG: Color = Color::Black;
const YELLOW: Color = Color::Rgb { r: 255, g: 220, b: 50 };

/// Terminal cell → canvas pixel at the cell's center.
/// `None` when the cell lies outside the canvas.
pub fn cell_to_canvas(col: u16, row: u16) -> Option<(f32, f32)> {
    let row = (row as usize).checked_sub(MAP_ROW)?;
    let x = col as f32 * CELL_PX_W + CELL_PX_W / 2.0;
    let y = row as f32 * CELL_PX_H + CELL_PX_H / 2.0;
    (x < CANVAS_WIDTH && y < CANVAS_HEIGHT).then_some((x, y))
}

/// Canvas pixel → (column, buffer row) of the cell containing it.
fn canvas_to_cell(x: f32, y: f32) -> Option<(usize, usize)> {
    if x < 0.0 || y < 0.0 || x >= CANVAS_WIDTH || y >= CANVAS_HEIGHT {
        return None;
    }
    Some(((x / CELL_PX_W) as usize, (y / CELL_PX_H) as usize + MAP_ROW))
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb { r, g, b }
}

/// Sprite key → glyph. Unknown keys still draw something.
fn glyph(sprite: &str) -> char {
    match sprite {
        "hero_idle_0" => '🧍',
        "hero_idle_1" => '🚶',
        "enemy_0" => '👾',
        "coin_0" => '💰',
        _ => '❓',
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, session: &Session) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Detect phase change → clear for clean transition
        if self.last_phase != Some(session.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(session.phase);
        }

        self.front.clear();
        compose(&mut self.front, session);

        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors; ResetColor would fall back to the terminal's
        // own default and show line artifacts.
        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                // Skip continuation cells (right half of wide emoji)
                if cell.cont {
                    if cell != prev {
                        need_move = true;
                    }
                    x += 1;
                    continue;
                }

                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;

                if cell.wide {
                    last_x = x + 1;
                    x += 2;
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }
}

// ── Compose: build front buffer content ──

fn compose(buf: &mut FrameBuffer, s: &Session) {
    match s.phase {
        Phase::Menu => compose_menu(buf, s),
        Phase::Playing => compose_game(buf, s),
        Phase::Victory | Phase::Defeat => {
            compose_game(buf, s);
            compose_end_panel(buf, s);
        }
    }
}

/// Paint every canvas cell whose center lies inside the rectangle.
fn fill_rect(buf: &mut FrameBuffer, left: f32, top: f32, width: f32, height: f32, bg: Color) {
    for row in 0..CANVAS_ROWS {
        for col in 0..CANVAS_COLS {
            let Some((x, y)) = cell_to_canvas(col as u16, (row + MAP_ROW) as u16) else {
                continue;
            };
            if x >= left && x < left + width && y >= top && y < top + height {
                buf.set(col, row + MAP_ROW, Cell::from_char(' ', Color::White, bg));
            }
        }
    }
}

/// Text centered on a canvas point, over whatever is already drawn.
fn text_centered(buf: &mut FrameBuffer, (cx, cy): (f32, f32), text: &str, fg: Color) {
    let Some((col, row)) = canvas_to_cell(cx, cy) else {
        return;
    };
    let start = col.saturating_sub(text.chars().count() / 2);
    buf.overlay_str(start, row, text, fg);
}

fn compose_button(buf: &mut FrameBuffer, button: &Button, caption: &str) {
    fill_rect(buf, button.left, button.top, button.width, button.height, rgb(button.fill));
    text_centered(buf, button.center(), caption, Color::White);
}

fn compose_menu(buf: &mut FrameBuffer, s: &Session) {
    fill_rect(buf, 0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT, PANEL_BG);
    text_centered(buf, menu::TITLE_CENTER, menu::TITLE, Color::White);

    for button in &menu::MENU_BUTTONS {
        compose_button(buf, button, menu::label(button.action, s));
    }

    let help_row = MAP_ROW + CANVAS_ROWS + 1;
    buf.put_str(0, help_row, " Click a button  │  ENTER Start  M Music  Q/ESC Exit", Color::DarkGrey, Color::Reset);
}

fn compose_game(buf: &mut FrameBuffer, s: &Session) {
    // ── HUD row ──
    let music = if s.music_on { "ON" } else { "OFF" };
    let hud = format!(
        " Coins {}/{}   Music: {} ",
        s.coins_collected(),
        s.coins.len(),
        music
    );
    for x in 0..buf.width {
        buf.set(x, HUD_ROW, Cell::from_char(' ', Color::White, HUD_BG));
    }
    buf.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);

    compose_background(buf);
    compose_tiles(buf, s);
    for actor in s.drawables() {
        compose_actor(buf, actor);
    }

    // ── Help bar ──
    let help_row = MAP_ROW + CANVAS_ROWS + 1;
    let help = " ←→/AD Move  Space/↑/W Jump  │  Pad: D-pad Move  A Jump  │  Ctrl+C Quit";
    buf.put_str(0, help_row, help, Color::DarkGrey, Color::Reset);
}

/// Tiled sky: alternate shade per 32-pixel tile.
fn compose_background(buf: &mut FrameBuffer) {
    for row in 0..CANVAS_ROWS {
        for col in 0..CANVAS_COLS {
            let tile_col = col * CELL_PX_W as usize / TILE_SIZE as usize;
            let bg = if (tile_col + row) % 2 == 0 { Cell::BASE_BG } else { SKY_ALT };
            buf.set(col, row + MAP_ROW, Cell::from_char(' ', Color::White, bg));
        }
    }
}

fn compose_tiles(buf: &mut FrameBuffer, s: &Session) {
    let per_tile = (TILE_SIZE / CELL_PX_W) as usize;
    for (c, r) in s.map.solid_cells() {
        if r >= CANVAS_ROWS {
            continue;
        }
        for dx in 0..per_tile {
            let col = c * per_tile + dx;
            if col < CANVAS_COLS {
                buf.set(col, r + MAP_ROW, Cell::from_char('▓', SOLID_FG, SOLID_BG));
            }
        }
    }
}

/// Wide glyph over the two cells nearest the actor's anchor point.
fn compose_actor(buf: &mut FrameBuffer, actor: &dyn Drawable) {
    let (x, y) = actor.position();
    let (gx, gy) = match actor.anchor() {
        Anchor::Center => (x - CELL_PX_W, y),
    };
    let Some((col, row)) = canvas_to_cell(gx.max(0.0), gy) else {
        return;
    };
    if col + 1 >= CANVAS_COLS {
        return;
    }
    let bg = buf.get(col, row).bg;
    buf.set(col, row, Cell::from_char_wide(glyph(actor.sprite()), bg));
    buf.set(col + 1, row, Cell::WIDE_CONT);
}

fn compose_end_panel(buf: &mut FrameBuffer, s: &Session) {
    let (left, top, width, height) = menu::END_PANEL;
    fill_rect(buf, left, top, width, height, PANEL_BG);
    if let Some(text) = menu::end_text(s.phase) {
        text_centered(buf, menu::END_TEXT_CENTER, text, Color::White);
    }
    let replay = menu::label(menu::Action::Replay, s);
    text_centered(buf, menu::REPLAY_TEXT_CENTER, replay, YELLOW);
}
