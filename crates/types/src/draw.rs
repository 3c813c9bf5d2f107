//! Draw intents - what a cartridge wants on screen, without owning pixels.
//!
//! Cartridges append [`DrawIntent`]s to a [`DrawList`] every frame. Positions
//! are in screen pixels (160x144) except [`DrawIntent::Block`], which uses
//! Tetris board cells. Colors are one of the four Game Boy shades; the
//! renderer maps them through whatever tint it was configured with.

use std::fmt;

use arrayvec::ArrayString;

use crate::PieceKind;

/// Fixed-capacity text run (no allocation per frame).
pub type TextRun = ArrayString<20>;

/// The four LCD shades, lightest to darkest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shade {
    Lightest,
    Light,
    Dark,
    Darkest,
}

/// Space Invaders enemy kinds (one per formation row band).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvaderKind {
    Squid,
    Crab,
    Octopus,
}

impl InvaderKind {
    /// Sprite size in pixels.
    pub fn size(&self) -> (i16, i16) {
        match self {
            InvaderKind::Squid => (8, 8),
            InvaderKind::Crab => (11, 8),
            InvaderKind::Octopus => (12, 8),
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            InvaderKind::Squid => 30,
            InvaderKind::Crab => 20,
            InvaderKind::Octopus => 10,
        }
    }
}

/// Direction a top-down character is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

impl Facing {
    pub fn delta(&self) -> (i8, i8) {
        match self {
            Facing::Up => (0, -1),
            Facing::Down => (0, 1),
            Facing::Left => (-1, 0),
            Facing::Right => (1, 0),
        }
    }
}

/// Sprite ids understood by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    NintendoLogo,
    StartArrow,
    Invader { kind: InvaderKind, frame: u8 },
    Cannon,
    Shot,
    Hero { facing: Facing },
    Sword { facing: Facing },
    Wall,
    Bush,
    Rupee,
}

impl SpriteId {
    /// Sprite size in pixels.
    pub fn size(&self) -> (i16, i16) {
        match self {
            SpriteId::NintendoLogo => (48, 16),
            SpriteId::StartArrow => (4, 6),
            SpriteId::Invader { kind, .. } => kind.size(),
            SpriteId::Cannon => (11, 6),
            SpriteId::Shot => (1, 4),
            SpriteId::Hero { .. } | SpriteId::Wall | SpriteId::Bush => (16, 16),
            SpriteId::Sword { facing } => match facing {
                Facing::Up | Facing::Down => (4, 12),
                Facing::Left | Facing::Right => (12, 4),
            },
            SpriteId::Rupee => (8, 8),
        }
    }
}

/// A single semantic draw request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawIntent {
    /// Fill the whole screen.
    Fill { shade: Shade },
    Rect {
        x: i16,
        y: i16,
        w: i16,
        h: i16,
        shade: Shade,
    },
    Sprite { x: i16, y: i16, sprite: SpriteId },
    Text {
        x: i16,
        y: i16,
        text: TextRun,
        shade: Shade,
    },
    /// A Tetris block in board coordinates.
    Block {
        col: i8,
        row: i8,
        kind: PieceKind,
        ghost: bool,
    },
}

/// Ordered draw requests for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DrawList {
    intents: Vec<DrawIntent>,
    /// 255 = fully visible, 0 = screen dark.
    opacity: u8,
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            intents: Vec::with_capacity(256),
            opacity: u8::MAX,
        }
    }

    /// Reset for the next frame, keeping the allocation.
    pub fn clear(&mut self) {
        self.intents.clear();
        self.opacity = u8::MAX;
    }

    pub fn push(&mut self, intent: DrawIntent) {
        self.intents.push(intent);
    }

    pub fn fill(&mut self, shade: Shade) {
        self.push(DrawIntent::Fill { shade });
    }

    pub fn rect(&mut self, x: i16, y: i16, w: i16, h: i16, shade: Shade) {
        self.push(DrawIntent::Rect { x, y, w, h, shade });
    }

    pub fn sprite(&mut self, x: i16, y: i16, sprite: SpriteId) {
        self.push(DrawIntent::Sprite { x, y, sprite });
    }

    /// Queue a text run. Text longer than the run capacity is truncated.
    pub fn text(&mut self, x: i16, y: i16, s: &str, shade: Shade) {
        self.push(DrawIntent::Text {
            x,
            y,
            text: text_run(s),
            shade,
        });
    }

    /// Like [`DrawList::text`], formatting straight into the run.
    pub fn text_fmt(&mut self, x: i16, y: i16, args: fmt::Arguments<'_>, shade: Shade) {
        let mut text = Truncating(TextRun::new());
        // Truncating never reports an error.
        let _ = fmt::Write::write_fmt(&mut text, args);
        self.push(DrawIntent::Text {
            x,
            y,
            text: text.0,
            shade,
        });
    }

    pub fn block(&mut self, col: i8, row: i8, kind: PieceKind, ghost: bool) {
        self.push(DrawIntent::Block {
            col,
            row,
            kind,
            ghost,
        });
    }

    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: u8) {
        self.opacity = opacity;
    }

    pub fn intents(&self) -> &[DrawIntent] {
        &self.intents
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// True when any intent of this list shows text equal to `s`.
    pub fn contains_text(&self, s: &str) -> bool {
        self.intents
            .iter()
            .any(|i| matches!(i, DrawIntent::Text { text, .. } if text.as_str() == s))
    }
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a [`TextRun`], truncating on a char boundary when `s` does not fit.
pub fn text_run(s: &str) -> TextRun {
    let mut out = Truncating(TextRun::new());
    out.push_str(s);
    out.0
}

/// Drops whatever does not fit.
struct Truncating(TextRun);

impl Truncating {
    fn push_str(&mut self, s: &str) {
        for ch in s.chars() {
            if self.0.try_push(ch).is_err() {
                break;
            }
        }
    }
}

impl fmt::Write for Truncating {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}
