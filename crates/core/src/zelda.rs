//! Zelda demo cartridge - one room, a hero, a sword and some bushes.
//!
//! The room is a 10x9 grid of 16 px tiles filling the screen. The hero moves
//! a whole tile per step and always faces the last direction pressed.

use crate::timer::{AutoRepeat, Countdown};
use crate::types::{
    Button, CartridgeKind, ConsoleEvent, DrawList, Facing, Shade, SoundCue, SpriteId,
};
use crate::Cartridge;

pub const ROOM_WIDTH: usize = 10;
pub const ROOM_HEIGHT: usize = 9;
pub const TILE_PX: i16 = 16;

const SWORD_SWING_MS: u32 = 250;
const HERO_REPEAT_DELAY_MS: u32 = 200;
const HERO_REPEAT_RATE_MS: u32 = 160;
const HERO_START: (usize, usize) = (4, 6);

const ROOM_LAYOUT: [&str; ROOM_HEIGHT] = [
    "##########",
    "#........#",
    "#.**..*..#",
    "#........#",
    "#..##....#",
    "#.....**.#",
    "#........#",
    "#*......*#",
    "##########",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Grass,
    Wall,
    Bush,
}

impl Tile {
    fn from_char(c: char) -> Self {
        match c {
            '#' => Tile::Wall,
            '*' => Tile::Bush,
            _ => Tile::Grass,
        }
    }

    pub fn is_walkable(&self) -> bool {
        *self == Tile::Grass
    }
}

fn direction_of(button: Button) -> Option<Facing> {
    match button {
        Button::Up => Some(Facing::Up),
        Button::Down => Some(Facing::Down),
        Button::Left => Some(Facing::Left),
        Button::Right => Some(Facing::Right),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct ZeldaGame {
    tiles: [[Tile; ROOM_WIDTH]; ROOM_HEIGHT],
    hero: (usize, usize),
    facing: Facing,
    held: Option<Facing>,
    repeat: AutoRepeat,
    sword: Countdown,
    rupees: u32,
    visible: bool,
    paused: bool,
    events: Vec<ConsoleEvent>,
}

impl ZeldaGame {
    pub fn new() -> Self {
        let mut game = Self {
            tiles: [[Tile::Grass; ROOM_WIDTH]; ROOM_HEIGHT],
            hero: HERO_START,
            facing: Facing::Down,
            held: None,
            repeat: AutoRepeat::new(HERO_REPEAT_DELAY_MS, HERO_REPEAT_RATE_MS),
            sword: Countdown::idle(),
            rupees: 0,
            visible: false,
            paused: false,
            events: Vec::new(),
        };
        game.reset();
        game
    }

    /// Restore the room, hero and rupee count.
    pub fn reset(&mut self) {
        for (y, row) in ROOM_LAYOUT.iter().enumerate() {
            for (x, c) in row.chars().enumerate().take(ROOM_WIDTH) {
                self.tiles[y][x] = Tile::from_char(c);
            }
        }
        self.hero = HERO_START;
        self.facing = Facing::Down;
        self.held = None;
        self.repeat.release();
        self.sword.cancel();
        self.rupees = 0;
        self.paused = false;
    }

    pub fn tile(&self, x: usize, y: usize) -> Option<Tile> {
        self.tiles.get(y).and_then(|row| row.get(x)).copied()
    }

    pub fn hero(&self) -> (usize, usize) {
        self.hero
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn rupees(&self) -> u32 {
        self.rupees
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn swinging(&self) -> bool {
        self.sword.is_running()
    }

    fn emit(&mut self, event: ConsoleEvent) {
        self.events.push(event);
    }

    fn tile_in_front(&self) -> Option<(usize, usize)> {
        let (dx, dy) = self.facing.delta();
        let x = self.hero.0.checked_add_signed(dx as isize)?;
        let y = self.hero.1.checked_add_signed(dy as isize)?;
        self.tile(x, y).map(|_| (x, y))
    }

    fn step(&mut self) {
        if self.swinging() {
            return;
        }
        if let Some((x, y)) = self.tile_in_front() {
            if self.tiles[y][x].is_walkable() {
                self.hero = (x, y);
            }
        }
    }

    fn swing(&mut self) {
        if self.swinging() {
            return;
        }
        self.sword.start(SWORD_SWING_MS);
        self.emit(ConsoleEvent::Sound(SoundCue::SwordSlash));
        if let Some((x, y)) = self.tile_in_front() {
            if self.tiles[y][x] == Tile::Bush {
                self.tiles[y][x] = Tile::Grass;
                self.rupees += 1;
                self.emit(ConsoleEvent::Sound(SoundCue::BushCut));
            }
        }
    }

    fn press_direction(&mut self, facing: Facing) {
        self.facing = facing;
        self.held = Some(facing);
        self.repeat.release();
        self.repeat.press();
        self.step();
    }

    fn sword_position(&self) -> (i16, i16) {
        let hx = self.hero.0 as i16 * TILE_PX;
        let hy = self.hero.1 as i16 * TILE_PX;
        match self.facing {
            Facing::Up => (hx + 6, hy - 12),
            Facing::Down => (hx + 6, hy + TILE_PX),
            Facing::Left => (hx - 12, hy + 6),
            Facing::Right => (hx + TILE_PX, hy + 6),
        }
    }
}

impl Default for ZeldaGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Cartridge for ZeldaGame {
    fn kind(&self) -> CartridgeKind {
        CartridgeKind::Zelda
    }

    fn show(&mut self) {
        self.visible = true;
        self.reset();
    }

    fn hide(&mut self) {
        self.visible = false;
        self.held = None;
        self.repeat.release();
        self.sword.cancel();
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn update(&mut self, dt_ms: u32) {
        if !self.visible || self.paused {
            return;
        }
        self.sword.tick(dt_ms);
        for _ in 0..self.repeat.update(dt_ms) {
            self.step();
        }
    }

    fn on_button_press(&mut self, button: Button) {
        if !self.visible {
            return;
        }
        if button == Button::Start {
            self.paused = !self.paused;
            self.held = None;
            self.repeat.release();
            return;
        }
        if self.paused {
            return;
        }
        if let Some(facing) = direction_of(button) {
            self.press_direction(facing);
        } else if button == Button::A {
            self.swing();
        }
    }

    fn on_button_up(&mut self, button: Button) {
        if direction_of(button).is_some() && direction_of(button) == self.held {
            self.held = None;
            self.repeat.release();
        }
    }

    fn render(&self, out: &mut DrawList) {
        if !self.visible {
            return;
        }
        out.fill(Shade::Light);
        for (y, row) in self.tiles.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                let sprite = match tile {
                    Tile::Wall => SpriteId::Wall,
                    Tile::Bush => SpriteId::Bush,
                    Tile::Grass => continue,
                };
                out.sprite(x as i16 * TILE_PX, y as i16 * TILE_PX, sprite);
            }
        }
        out.sprite(
            self.hero.0 as i16 * TILE_PX,
            self.hero.1 as i16 * TILE_PX,
            SpriteId::Hero {
                facing: self.facing,
            },
        );
        if self.swinging() {
            let (x, y) = self.sword_position();
            out.sprite(
                x,
                y,
                SpriteId::Sword {
                    facing: self.facing,
                },
            );
        }
        out.sprite(4, 4, SpriteId::Rupee);
        out.text_fmt(14, 4, format_args!("x{}", self.rupees), Shade::Lightest);
        if self.paused {
            out.rect(32, 56, 96, 32, Shade::Darkest);
            out.text(56, 68, "PAUSED", Shade::Lightest);
        }
    }

    fn drain_events(&mut self, out: &mut Vec<ConsoleEvent>) {
        out.append(&mut self.events);
    }
}
