//! Tetris cartridge - screens, input and gravity around a [`Playfield`]
//!
//! # Screens
//!
//! | Screen | Buttons |
//! |--------|---------|
//! | Title | Start/A/B start a game, Select toggles music |
//! | Playing | Left/Right move (auto-repeat), Down soft drop, Up hard drop, A/B rotate, Start pause, Select next-piece preview |
//! | Game over | Start/A restart at the last start level |
//!
//! While paused only Start is handled. Gravity runs from the per-frame delta
//! at the playfield's level interval and is suspended while Down is held
//! (soft drop repeats faster) or while falling is disabled.

use crate::config::TetrisConfig;
use crate::playfield::{LockReport, Playfield, Step};
use crate::snapshot::TetrisSnapshot;
use crate::timer::{AutoRepeat, Countdown};
use crate::types::{
    Button, CartridgeKind, ConsoleEvent, DrawList, Shade, SoundCue, SpriteId, BLOCK_PX,
    BOARD_HEIGHT, BOARD_ORIGIN, BOARD_WIDTH, DEFAULT_ARR_MS, DEFAULT_DAS_MS,
    SOFT_DROP_INTERVAL_MS, TITLE_BLINK_MS,
};
use crate::Cartridge;

/// Board column/row where the next-piece preview is drawn.
const PREVIEW_CELL: (i8, i8) = (12, 16);

/// Side panel x in screen pixels.
const PANEL_X: i16 = 88;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TetrisScreen {
    Title,
    Playing,
    GameOver,
}

#[derive(Debug, Clone)]
pub struct TetrisGame {
    playfield: Playfield,
    screen: TetrisScreen,
    visible: bool,
    paused: bool,
    falling_enabled: bool,
    music_allowed: bool,
    show_next: bool,
    start_level: u32,
    best_score: u32,
    arrow_visible: bool,
    blink: Countdown,
    gravity_ms: u32,
    left: AutoRepeat,
    right: AutoRepeat,
    down: AutoRepeat,
    events: Vec<ConsoleEvent>,
}

impl TetrisGame {
    pub fn new(config: TetrisConfig, seed: u32, best_score: u32) -> Self {
        Self {
            playfield: Playfield::new(seed),
            screen: TetrisScreen::Title,
            visible: false,
            paused: false,
            falling_enabled: true,
            music_allowed: config.music_allowed,
            show_next: config.show_next,
            start_level: config.start_level,
            best_score,
            arrow_visible: true,
            blink: Countdown::idle(),
            gravity_ms: 0,
            left: AutoRepeat::new(DEFAULT_DAS_MS, DEFAULT_ARR_MS),
            right: AutoRepeat::new(DEFAULT_DAS_MS, DEFAULT_ARR_MS),
            down: AutoRepeat::new(0, SOFT_DROP_INTERVAL_MS),
            events: Vec::new(),
        }
    }

    /// Start a fresh game at `level`, skipping the title screen.
    ///
    /// The falling flag is left as it is.
    pub fn start_at_level(&mut self, level: u32) {
        self.start_level = level;
        self.screen = TetrisScreen::Playing;
        self.paused = false;
        self.gravity_ms = 0;
        self.blink.cancel();
        self.release_all();
        self.playfield.start_at_level(level);
        tracing::debug!(level, "tetris game started");
        if self.playfield.game_over() {
            self.enter_game_over();
        }
    }

    /// Fresh game at the last start level.
    pub fn reset(&mut self) {
        self.start_at_level(self.start_level);
    }

    pub fn disable_falling(&mut self) {
        self.falling_enabled = false;
        self.gravity_ms = 0;
    }

    pub fn enable_falling(&mut self) {
        self.falling_enabled = true;
    }

    pub fn clear_bottom_line(&mut self) {
        self.playfield.clear_bottom_line();
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    pub fn playfield_mut(&mut self) -> &mut Playfield {
        &mut self.playfield
    }

    pub fn screen(&self) -> TetrisScreen {
        self.screen
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn falling_enabled(&self) -> bool {
        self.falling_enabled
    }

    pub fn music_allowed(&self) -> bool {
        self.music_allowed
    }

    pub fn show_next(&self) -> bool {
        self.show_next
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn arrow_visible(&self) -> bool {
        self.arrow_visible
    }

    pub fn score(&self) -> u32 {
        self.playfield.score()
    }

    pub fn level(&self) -> u32 {
        self.playfield.level()
    }

    pub fn game_over(&self) -> bool {
        self.screen == TetrisScreen::GameOver
    }

    pub fn snapshot(&self) -> TetrisSnapshot {
        let mut s = self.playfield.snapshot();
        s.paused = self.paused;
        s.best_score = self.best_score;
        s
    }

    fn emit(&mut self, event: ConsoleEvent) {
        self.events.push(event);
    }

    fn release_all(&mut self) {
        self.left.release();
        self.right.release();
        self.down.release();
    }

    fn enter_title(&mut self) {
        self.screen = TetrisScreen::Title;
        self.paused = false;
        self.arrow_visible = true;
        self.blink.start(TITLE_BLINK_MS);
        if self.music_allowed {
            self.emit(ConsoleEvent::Sound(SoundCue::TetrisMusic));
        }
    }

    fn enter_game_over(&mut self) {
        self.screen = TetrisScreen::GameOver;
        self.release_all();
        tracing::debug!(
            score = self.playfield.score(),
            lines = self.playfield.lines(),
            "tetris game over"
        );
        self.emit(ConsoleEvent::Sound(SoundCue::TetrisGameOver));
        self.emit(ConsoleEvent::GameOver(CartridgeKind::Tetris));
    }

    fn on_lock(&mut self, report: LockReport) {
        self.gravity_ms = 0;
        let cue = if report.lines_cleared > 0 {
            SoundCue::TetrisLineClear
        } else {
            SoundCue::TetrisLock
        };
        self.emit(ConsoleEvent::Sound(cue));
        if report.level_up {
            tracing::debug!(level = self.playfield.level(), "tetris level up");
        }

        let score = self.playfield.score();
        if score > self.best_score {
            self.best_score = score;
            self.emit(ConsoleEvent::BestScoreChanged(score));
        }

        if report.game_over {
            self.enter_game_over();
        }
    }

    fn shift(&mut self, dx: i8) {
        if self.playfield.try_shift(dx) {
            self.emit(ConsoleEvent::Sound(SoundCue::TetrisMove));
        }
    }

    fn rotate(&mut self, clockwise: bool) {
        if self.playfield.try_rotate(clockwise) {
            self.emit(ConsoleEvent::Sound(SoundCue::TetrisRotate));
        }
    }

    fn soft_drop(&mut self) {
        if let Step::Locked(report) = self.playfield.soft_drop() {
            self.on_lock(report);
        }
    }

    fn hard_drop(&mut self) {
        if let Some(report) = self.playfield.hard_drop() {
            self.on_lock(report);
        }
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.release_all();
        if self.paused {
            self.emit(ConsoleEvent::Sound(SoundCue::TetrisPause));
        }
    }

    fn update_title(&mut self, dt_ms: u32) {
        if self.blink.tick(dt_ms) {
            self.arrow_visible = !self.arrow_visible;
            self.blink.start(TITLE_BLINK_MS);
        }
    }

    fn update_playing(&mut self, dt_ms: u32) {
        if self.paused {
            return;
        }

        for _ in 0..self.left.update(dt_ms) {
            self.shift(-1);
        }
        for _ in 0..self.right.update(dt_ms) {
            self.shift(1);
        }
        for _ in 0..self.down.update(dt_ms) {
            if self.screen != TetrisScreen::Playing {
                return;
            }
            self.soft_drop();
        }

        if !self.falling_enabled || self.down.is_held() {
            self.gravity_ms = 0;
            return;
        }

        self.gravity_ms = self.gravity_ms.saturating_add(dt_ms);
        while self.screen == TetrisScreen::Playing {
            let interval = self.playfield.gravity_interval_ms();
            if self.gravity_ms < interval {
                break;
            }
            self.gravity_ms -= interval;
            match self.playfield.soft_drop() {
                Step::Moved => {}
                Step::Locked(report) => {
                    self.on_lock(report);
                    break;
                }
                Step::Idle => break,
            }
        }
    }

    fn press_title(&mut self, button: Button) {
        match button {
            Button::Start | Button::A | Button::B => self.reset(),
            Button::Select => {
                self.music_allowed = !self.music_allowed;
                self.emit(ConsoleEvent::MusicToggled(self.music_allowed));
                if self.music_allowed {
                    self.emit(ConsoleEvent::Sound(SoundCue::TetrisMusic));
                }
            }
            _ => {}
        }
    }

    fn press_playing(&mut self, button: Button) {
        if self.paused {
            if button == Button::Start {
                self.toggle_pause();
            }
            return;
        }
        match button {
            Button::Left => {
                if self.left.press() {
                    self.right.release();
                    self.shift(-1);
                }
            }
            Button::Right => {
                if self.right.press() {
                    self.left.release();
                    self.shift(1);
                }
            }
            Button::Down => {
                if self.down.press() {
                    self.soft_drop();
                }
            }
            Button::Up => self.hard_drop(),
            Button::A => self.rotate(true),
            Button::B => self.rotate(false),
            Button::Start => self.toggle_pause(),
            Button::Select => self.show_next = !self.show_next,
        }
    }

    fn render_title(&self, out: &mut DrawList) {
        out.fill(Shade::Lightest);
        out.rect(20, 16, 120, 48, Shade::Darkest);
        out.text(56, 34, "TETRIS", Shade::Lightest);
        out.text(60, 92, "START", Shade::Darkest);
        if self.arrow_visible {
            out.sprite(50, 92, SpriteId::StartArrow);
        }
        let music = if self.music_allowed { "MUSIC ON" } else { "MUSIC OFF" };
        out.text(52, 108, music, Shade::Dark);
        out.text(40, 128, "TOP", Shade::Darkest);
        out.text_fmt(72, 128, format_args!("{:05}", self.best_score), Shade::Darkest);
    }

    fn render_board(&self, out: &mut DrawList) {
        let (ox, oy) = BOARD_ORIGIN;
        let w = BOARD_WIDTH as i16 * BLOCK_PX;
        let h = BOARD_HEIGHT as i16 * BLOCK_PX;
        out.fill(Shade::Lightest);
        out.rect(ox - 2, oy - 2, w + 4, h + 4, Shade::Dark);
        out.rect(ox, oy, w, h, Shade::Lightest);

        let board = self.playfield.board();
        for y in 0..BOARD_HEIGHT as i8 {
            for x in 0..BOARD_WIDTH as i8 {
                if let Some(Some(kind)) = board.get(x, y) {
                    out.block(x, y, kind, false);
                }
            }
        }

        if let Some(active) = self.playfield.active() {
            if let Some(ghost_y) = self.playfield.ghost_y() {
                if ghost_y != active.y {
                    for (dx, dy) in active.shape() {
                        out.block(active.x + dx, ghost_y + dy, active.kind, true);
                    }
                }
            }
            for (x, y) in active.cells() {
                out.block(x, y, active.kind, false);
            }
        }
    }

    fn render_panel(&self, out: &mut DrawList) {
        out.text(PANEL_X, 8, "SCORE", Shade::Darkest);
        out.text_fmt(PANEL_X, 18, format_args!("{:05}", self.playfield.score()), Shade::Darkest);
        out.text(PANEL_X, 40, "LEVEL", Shade::Darkest);
        out.text_fmt(PANEL_X, 50, format_args!("{}", self.playfield.level()), Shade::Darkest);
        out.text(PANEL_X, 64, "LINES", Shade::Darkest);
        out.text_fmt(PANEL_X, 74, format_args!("{}", self.playfield.lines()), Shade::Darkest);
        if self.show_next {
            out.text(PANEL_X, 90, "NEXT", Shade::Darkest);
            let kind = self.playfield.next_kind();
            let shape = crate::pieces::get_shape(kind, crate::types::Rotation::North);
            for (dx, dy) in shape {
                out.block(PREVIEW_CELL.0 + dx, PREVIEW_CELL.1 + dy, kind, false);
            }
        }
    }

    fn render_playing(&self, out: &mut DrawList) {
        if self.paused {
            // The board is hidden while paused.
            out.fill(Shade::Lightest);
            out.rect(16, 44, 56, 48, Shade::Darkest);
            out.text(26, 52, "PAUSE", Shade::Lightest);
            out.text(22, 68, "PRESS", Shade::Lightest);
            out.text(22, 78, "START", Shade::Lightest);
            self.render_panel(out);
            return;
        }
        self.render_board(out);
        self.render_panel(out);
    }

    fn render_game_over(&self, out: &mut DrawList) {
        self.render_board(out);
        self.render_panel(out);
        out.rect(12, 50, 64, 44, Shade::Lightest);
        out.text(16, 56, "GAME OVER", Shade::Darkest);
        out.text(20, 72, "PLEASE", Shade::Darkest);
        out.text(16, 82, "TRY AGAIN", Shade::Darkest);
    }
}

impl Cartridge for TetrisGame {
    fn kind(&self) -> CartridgeKind {
        CartridgeKind::Tetris
    }

    fn show(&mut self) {
        self.visible = true;
        self.release_all();
        self.enter_title();
    }

    fn hide(&mut self) {
        self.visible = false;
        self.paused = false;
        self.blink.cancel();
        self.release_all();
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn update(&mut self, dt_ms: u32) {
        if !self.visible {
            return;
        }
        match self.screen {
            TetrisScreen::Title => self.update_title(dt_ms),
            TetrisScreen::Playing => self.update_playing(dt_ms),
            TetrisScreen::GameOver => {}
        }
    }

    fn on_button_press(&mut self, button: Button) {
        if !self.visible {
            return;
        }
        match self.screen {
            TetrisScreen::Title => self.press_title(button),
            TetrisScreen::Playing => self.press_playing(button),
            TetrisScreen::GameOver => {
                if matches!(button, Button::Start | Button::A) {
                    self.reset();
                }
            }
        }
    }

    fn on_button_up(&mut self, button: Button) {
        match button {
            Button::Left => self.left.release(),
            Button::Right => self.right.release(),
            Button::Down => self.down.release(),
            _ => {}
        }
    }

    fn render(&self, out: &mut DrawList) {
        if !self.visible {
            return;
        }
        match self.screen {
            TetrisScreen::Title => self.render_title(out),
            TetrisScreen::Playing => self.render_playing(out),
            TetrisScreen::GameOver => self.render_game_over(out),
        }
    }

    fn drain_events(&mut self, out: &mut Vec<ConsoleEvent>) {
        out.append(&mut self.events);
    }
}
