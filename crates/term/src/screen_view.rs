//! ScreenView: rasterizes a console [`DrawList`] into a framebuffer.
//!
//! This module is pure (no I/O). The 160x144 screen maps onto a 40x24 grid
//! of terminal cells (4x6 pixels per cell). Tetris blocks ignore the pixel
//! grid and use two cells per board column so the board keeps its shape.
//! The handheld bezel around the screen shows the power LED, the inserted
//! cartridge and the volume.

use crate::core::Console;
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{
    CartridgeKind, DrawIntent, DrawList, Facing, InvaderKind, PieceKind, Shade, SpriteId,
    BOARD_ORIGIN, MAX_VOLUME, SCREEN_HEIGHT, SCREEN_WIDTH,
};

const PX_PER_COL: i16 = 4;
const PX_PER_ROW: i16 = 6;

/// Screen size in terminal cells.
pub const SCREEN_COLS: u16 = (SCREEN_WIDTH / PX_PER_COL) as u16;
pub const SCREEN_ROWS: u16 = (SCREEN_HEIGHT / PX_PER_ROW) as u16;

/// Bezel margins around the screen, in cells.
const BEZEL_SIDE: u16 = 4;
const BEZEL_TOP: u16 = 2;
const BEZEL_BOTTOM: u16 = 6;

pub const BEZEL_WIDTH: u16 = SCREEN_COLS + 2 * BEZEL_SIDE;
pub const BEZEL_HEIGHT: u16 = SCREEN_ROWS + BEZEL_TOP + BEZEL_BOTTOM;

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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Console state shown on the bezel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BezelStatus {
    pub powered: bool,
    pub cartridge: Option<CartridgeKind>,
    pub volume: u8,
}

impl BezelStatus {
    pub fn from_console(console: &Console) -> Self {
        Self {
            powered: console.powered(),
            cartridge: console.cartridge(),
            volume: console.volume(),
        }
    }
}

/// The four LCD shades for one tint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    shades: [Rgb; 4],
}

impl Palette {
    /// Lightest shade is the tint itself; the others darken it.
    pub fn from_tint(tint: u32) -> Self {
        let base = Rgb::from_u32(tint);
        Self {
            shades: [base, base.scaled(168), base.scaled(84), base.scaled(30)],
        }
    }

    pub fn shade(&self, shade: Shade) -> Rgb {
        match shade {
            Shade::Lightest => self.shades[0],
            Shade::Light => self.shades[1],
            Shade::Dark => self.shades[2],
            Shade::Darkest => self.shades[3],
        }
    }
}

pub struct ScreenView {
    palette: Palette,
    anchor_y: AnchorY,
}

impl ScreenView {
    pub fn new(tint: u32) -> Self {
        Self {
            palette: Palette::from_tint(tint),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Top-left cell of the screen area for a viewport.
    pub fn screen_origin(&self, viewport: Viewport) -> (u16, u16) {
        let bx = viewport.width.saturating_sub(BEZEL_WIDTH) / 2;
        let by = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(BEZEL_HEIGHT) / 2,
            AnchorY::Top => 0,
        };
        (bx + BEZEL_SIDE, by + BEZEL_TOP)
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        list: &DrawList,
        status: &BezelStatus,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        let (sx, sy) = self.screen_origin(viewport);
        self.draw_bezel(fb, status, sx - BEZEL_SIDE, sy - BEZEL_TOP);

        let mut screen = Screen {
            fb,
            origin: (sx, sy),
            base: CellStyle::new(self.palette.shade(Shade::Darkest), self.palette.shade(Shade::Lightest)),
        };
        screen.fill(' ', screen.base);
        for intent in list.intents() {
            self.draw_intent(&mut screen, intent);
        }
        screen.fade(list.opacity());
    }

    pub fn render(&self, list: &DrawList, status: &BezelStatus, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(list, status, viewport, &mut fb);
        fb
    }

    fn draw_bezel(&self, fb: &mut FrameBuffer, status: &BezelStatus, x: u16, y: u16) {
        let body = CellStyle::new(Rgb::new(60, 60, 70), Rgb::new(190, 190, 180));
        let label = CellStyle::new(Rgb::new(40, 40, 120), Rgb::new(190, 190, 180)).bold();
        fb.fill_rect(x, y, BEZEL_WIDTH, BEZEL_HEIGHT, ' ', body);
        fb.draw_border(x, y, BEZEL_WIDTH, BEZEL_HEIGHT, body);

        let led = if status.powered {
            CellStyle::new(Rgb::new(230, 40, 40), body.bg)
        } else {
            CellStyle::new(Rgb::new(90, 60, 60), body.bg)
        };
        fb.put_char(x + 2, y + 1, '●', led);
        fb.put_str(x + 4, y + 1, "POWER", body);

        let bottom = y + BEZEL_TOP + SCREEN_ROWS;
        fb.put_str(x + BEZEL_SIDE, bottom + 1, "Nintendo GAME BOY", label);

        let cart = status.cartridge.map(cartridge_label).unwrap_or("EMPTY");
        fb.put_str(x + BEZEL_SIDE, bottom + 3, "[", body);
        fb.put_str(x + BEZEL_SIDE + 1, bottom + 3, cart, body);
        fb.put_str(x + BEZEL_SIDE + 1 + cart.len() as u16, bottom + 3, "]", body);

        let vol_x = x + BEZEL_WIDTH - BEZEL_SIDE - MAX_VOLUME as u16 - 4;
        fb.put_str(vol_x, bottom + 3, "VOL", body);
        for i in 0..MAX_VOLUME {
            let ch = if i < status.volume { '▮' } else { '▯' };
            fb.put_char(vol_x + 4 + i as u16, bottom + 3, ch, body);
        }
    }

    fn draw_intent(&self, screen: &mut Screen<'_>, intent: &DrawIntent) {
        match *intent {
            DrawIntent::Fill { shade } => {
                screen.fill(' ', self.style(Shade::Darkest, shade));
            }
            DrawIntent::Rect { x, y, w, h, shade } => {
                let (c0, r0, c1, r1) = px_rect(x, y, w, h);
                screen.fill_cells(c0, r0, c1, r1, ' ', self.style(Shade::Darkest, shade));
            }
            DrawIntent::Text { x, y, text, shade } => {
                let fg = self.palette.shade(shade);
                let (col, row) = (px_col(x), px_row(y));
                for (i, ch) in text.chars().enumerate() {
                    screen.put_fg(col + i as i32, row, ch, fg, false);
                }
            }
            DrawIntent::Sprite { x, y, sprite } => self.draw_sprite(screen, x, y, sprite),
            DrawIntent::Block {
                col,
                row,
                kind,
                ghost,
            } => {
                let c = px_col(BOARD_ORIGIN.0) + 2 * i32::from(col);
                let r = px_row(BOARD_ORIGIN.1) + i32::from(row);
                let (ch, shade) = if ghost {
                    ('░', Shade::Light)
                } else {
                    ('█', block_shade(kind))
                };
                let fg = self.palette.shade(shade);
                screen.put_fg(c, r, ch, fg, false);
                screen.put_fg(c + 1, r, ch, fg, false);
            }
        }
    }

    fn draw_sprite(&self, screen: &mut Screen<'_>, x: i16, y: i16, sprite: SpriteId) {
        let (w, h) = sprite.size();
        let fill = match sprite {
            SpriteId::Wall => Some(('▓', Shade::Darkest)),
            SpriteId::Bush => Some(('♣', Shade::Dark)),
            _ => None,
        };
        if let Some((ch, shade)) = fill {
            let (c0, r0, c1, r1) = px_rect(x, y, w, h);
            let fg = self.palette.shade(shade);
            for r in r0..r1 {
                for c in c0..c1 {
                    screen.put_fg(c, r, ch, fg, false);
                }
            }
            return;
        }

        let (glyph, shade, bold) = sprite_glyph(sprite);
        let fg = self.palette.shade(shade);
        let row = px_row(y + h / 2);
        let width = glyph.chars().count() as i32;
        // Center the glyph on the sprite.
        let col = px_col(x + w / 2) - width / 2;
        for (i, ch) in glyph.chars().enumerate() {
            screen.put_fg(col + i as i32, row, ch, fg, bold);
        }
    }

    fn style(&self, fg: Shade, bg: Shade) -> CellStyle {
        CellStyle::new(self.palette.shade(fg), self.palette.shade(bg))
    }
}

/// The screen area of a framebuffer; clips every write to 40x24 cells.
struct Screen<'a> {
    fb: &'a mut FrameBuffer,
    origin: (u16, u16),
    base: CellStyle,
}

impl Screen<'_> {
    fn cell_pos(&self, col: i32, row: i32) -> Option<(u16, u16)> {
        if col < 0 || row < 0 || col >= i32::from(SCREEN_COLS) || row >= i32::from(SCREEN_ROWS) {
            return None;
        }
        Some((self.origin.0 + col as u16, self.origin.1 + row as u16))
    }

    fn fill(&mut self, ch: char, style: CellStyle) {
        self.fill_cells(0, 0, i32::from(SCREEN_COLS), i32::from(SCREEN_ROWS), ch, style);
    }

    fn fill_cells(&mut self, c0: i32, r0: i32, c1: i32, r1: i32, ch: char, style: CellStyle) {
        for r in r0..r1 {
            for c in c0..c1 {
                if let Some((x, y)) = self.cell_pos(c, r) {
                    self.fb.put_char(x, y, ch, style);
                }
            }
        }
    }

    /// Draw a glyph over whatever background the cell already has.
    fn put_fg(&mut self, col: i32, row: i32, ch: char, fg: Rgb, bold: bool) {
        let Some((x, y)) = self.cell_pos(col, row) else {
            return;
        };
        let bg = self.fb.get(x, y).map_or(self.base.bg, |c| c.style.bg);
        let style = CellStyle { fg, bg, bold };
        self.fb.put_char(x, y, ch, style);
    }

    fn fade(&mut self, opacity: u8) {
        if opacity == u8::MAX {
            return;
        }
        for row in 0..i32::from(SCREEN_ROWS) {
            for col in 0..i32::from(SCREEN_COLS) {
                if let Some((x, y)) = self.cell_pos(col, row) {
                    if let Some(cell) = self.fb.get(x, y) {
                        let style = cell.style.faded(opacity);
                        self.fb.put_char(x, y, cell.ch, style);
                    }
                }
            }
        }
    }
}

fn px_col(x: i16) -> i32 {
    i32::from(x).div_euclid(i32::from(PX_PER_COL))
}

fn px_row(y: i16) -> i32 {
    i32::from(y).div_euclid(i32::from(PX_PER_ROW))
}

/// Cells covered by a pixel rectangle, as `[c0, c1) x [r0, r1)`.
fn px_rect(x: i16, y: i16, w: i16, h: i16) -> (i32, i32, i32, i32) {
    if w <= 0 || h <= 0 {
        return (0, 0, 0, 0);
    }
    let c0 = px_col(x);
    let r0 = px_row(y);
    let c1 = (i32::from(x) + i32::from(w) + i32::from(PX_PER_COL) - 1).div_euclid(i32::from(PX_PER_COL));
    let r1 = (i32::from(y) + i32::from(h) + i32::from(PX_PER_ROW) - 1).div_euclid(i32::from(PX_PER_ROW));
    (c0, r0, c1, r1)
}

fn block_shade(kind: PieceKind) -> Shade {
    match kind {
        PieceKind::I | PieceKind::O => Shade::Darkest,
        PieceKind::T | PieceKind::S | PieceKind::Z => Shade::Dark,
        PieceKind::J | PieceKind::L => Shade::Light,
    }
}

fn sprite_glyph(sprite: SpriteId) -> (&'static str, Shade, bool) {
    match sprite {
        SpriteId::NintendoLogo => ("Nintendo", Shade::Darkest, true),
        SpriteId::StartArrow => ("▶", Shade::Darkest, false),
        SpriteId::Invader { kind, frame } => {
            let glyph = match (kind, frame % 2) {
                (InvaderKind::Squid, 0) => "{}",
                (InvaderKind::Squid, _) => "}{",
                (InvaderKind::Crab, 0) => "/=\\",
                (InvaderKind::Crab, _) => "\\=/",
                (InvaderKind::Octopus, 0) => "<@>",
                (InvaderKind::Octopus, _) => ">@<",
            };
            (glyph, Shade::Darkest, false)
        }
        SpriteId::Cannon => ("_A_", Shade::Darkest, true),
        SpriteId::Shot => ("|", Shade::Darkest, false),
        SpriteId::Hero { facing } => {
            let glyph = match facing {
                Facing::Up => "^@",
                Facing::Down => "@v",
                Facing::Left => "<@",
                Facing::Right => "@>",
            };
            (glyph, Shade::Darkest, true)
        }
        SpriteId::Sword { facing } => match facing {
            Facing::Up | Facing::Down => ("|", Shade::Darkest, true),
            Facing::Left | Facing::Right => ("-", Shade::Darkest, true),
        },
        SpriteId::Rupee => ("◆", Shade::Dark, false),
        SpriteId::Wall => ("▓", Shade::Darkest, false),
        SpriteId::Bush => ("♣", Shade::Dark, false),
    }
}

fn cartridge_label(kind: CartridgeKind) -> &'static str {
    match kind {
        CartridgeKind::Tetris => "TETRIS",
        CartridgeKind::SpaceInvaders => "SPACE INVADERS",
        CartridgeKind::Zelda => "ZELDA",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px_rect_covers_partial_cells() {
        assert_eq!(px_rect(0, 0, 4, 6), (0, 0, 1, 1));
        assert_eq!(px_rect(2, 3, 4, 6), (0, 0, 2, 2));
        assert_eq!(px_rect(0, 0, 0, 6), (0, 0, 0, 0));
        assert_eq!(px_rect(-4, -6, 8, 12), (-1, -1, 1, 1));
    }

    #[test]
    fn test_palette_darkens_from_tint() {
        let p = Palette::from_tint(0xFF_FFFF);
        assert_eq!(p.shade(Shade::Lightest), Rgb::new(255, 255, 255));
        assert!(p.shade(Shade::Light).r > p.shade(Shade::Dark).r);
        assert!(p.shade(Shade::Dark).r > p.shade(Shade::Darkest).r);
    }

    #[test]
    fn test_screen_writes_are_clipped() {
        let view = ScreenView::new(0x9B_BC0F).with_anchor_y(AnchorY::Top);
        let mut list = DrawList::new();
        list.text(156, 0, "OVERFLOW", Shade::Darkest);
        list.rect(-20, -20, 10, 10, Shade::Darkest);
        let vp = Viewport::new(BEZEL_WIDTH, BEZEL_HEIGHT);
        let fb = view.render(&list, &BezelStatus { powered: true, cartridge: None, volume: 3 }, vp);
        let (sx, sy) = view.screen_origin(vp);
        assert_eq!(fb.get(sx + SCREEN_COLS - 1, sy).unwrap().ch, 'O');
        // The next cell is the bezel, not the text.
        assert_ne!(fb.get(sx + SCREEN_COLS, sy).unwrap().ch, 'V');
    }
}
