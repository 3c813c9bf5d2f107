//! Console orchestrator - power, loading screen, cartridge slot, volume
//!
//! Owns all three cartridges; at most one is visible at a time. Switching
//! hides the previous cartridge before the next one is shown.
//!
//! # Screens
//!
//! | Screen | Enters on | Leaves on |
//! |--------|-----------|-----------|
//! | `Off` | power-off fade done | `power_on` |
//! | `Loading` | `power_on` | logo slide (5000 ms) + chime + hold (1000 ms) |
//! | `NoCartridge` | loading done / eject with nothing inserted | `insert_cartridge` |
//! | `Game` | `start_game` with a cartridge | eject, `power_off` |
//! | `PoweringOff` | `power_off` | 500 ms fade |
//!
//! Every timer here is a [`Countdown`] advanced by [`Console::update`];
//! powering off cancels them all.

use std::f32::consts::FRAC_PI_2;

use crate::config::ConsoleConfig;
use crate::invaders::InvadersGame;
use crate::store::{ScoreStore, TETRIS_BEST_KEY};
use crate::tetris::TetrisGame;
use crate::timer::Countdown;
use crate::types::{
    Button, CartridgeKind, ConsoleEvent, DrawList, Shade, SoundCue, SpriteId, LOADING_HOLD_MS,
    LOADING_SLIDE_MS, MAX_VOLUME, POWER_OFF_FADE_MS, SCREEN_HEIGHT, SCREEN_WIDTH,
    VOLUME_OVERLAY_MS,
};
use crate::zelda::ZeldaGame;
use crate::Cartridge;

/// Logo y before the slide starts.
const LOGO_START_Y: i16 = -15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleScreen {
    Off,
    Loading,
    NoCartridge,
    Game,
    PoweringOff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadingPhase {
    Slide,
    Hold,
}

pub struct Console {
    config: ConsoleConfig,
    tetris: TetrisGame,
    invaders: InvadersGame,
    zelda: ZeldaGame,
    store: Box<dyn ScoreStore>,
    /// Inserted cartridge.
    cartridge: Option<CartridgeKind>,
    /// Cartridge currently shown.
    active: Option<CartridgeKind>,
    powered: bool,
    screen: ConsoleScreen,
    /// Screen being faded out while powering off.
    fading_from: ConsoleScreen,
    loading_phase: LoadingPhase,
    loading: Countdown,
    fade: Countdown,
    volume: u8,
    volume_overlay: Countdown,
    events: Vec<ConsoleEvent>,
}

impl Console {
    pub fn new(config: ConsoleConfig, store: Box<dyn ScoreStore>) -> Self {
        let config = config.sanitized();
        let best = store.load_best(TETRIS_BEST_KEY).unwrap_or(0);
        let mut console = Self {
            config,
            tetris: TetrisGame::new(config.tetris, config.seed, best),
            invaders: InvadersGame::new(),
            zelda: ZeldaGame::new(),
            store,
            cartridge: config.cartridge,
            active: None,
            powered: false,
            screen: ConsoleScreen::Off,
            fading_from: ConsoleScreen::Off,
            loading_phase: LoadingPhase::Slide,
            loading: Countdown::idle(),
            fade: Countdown::idle(),
            volume: config.volume,
            volume_overlay: Countdown::idle(),
            events: Vec::new(),
        };
        if config.power_on {
            console.power_on();
        }
        console
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn screen(&self) -> ConsoleScreen {
        self.screen
    }

    pub fn powered(&self) -> bool {
        self.powered
    }

    pub fn cartridge(&self) -> Option<CartridgeKind> {
        self.cartridge
    }

    pub fn active_game(&self) -> Option<CartridgeKind> {
        self.active
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn volume_overlay_visible(&self) -> bool {
        self.volume_overlay.is_running()
    }

    pub fn tetris(&self) -> &TetrisGame {
        &self.tetris
    }

    pub fn tetris_mut(&mut self) -> &mut TetrisGame {
        &mut self.tetris
    }

    pub fn invaders(&self) -> &InvadersGame {
        &self.invaders
    }

    pub fn invaders_mut(&mut self) -> &mut InvadersGame {
        &mut self.invaders
    }

    pub fn zelda(&self) -> &ZeldaGame {
        &self.zelda
    }

    fn game(&self, kind: CartridgeKind) -> &dyn Cartridge {
        match kind {
            CartridgeKind::Tetris => &self.tetris,
            CartridgeKind::SpaceInvaders => &self.invaders,
            CartridgeKind::Zelda => &self.zelda,
        }
    }

    fn game_mut(&mut self, kind: CartridgeKind) -> &mut dyn Cartridge {
        match kind {
            CartridgeKind::Tetris => &mut self.tetris,
            CartridgeKind::SpaceInvaders => &mut self.invaders,
            CartridgeKind::Zelda => &mut self.zelda,
        }
    }

    /// Logo position on the loading screen.
    pub fn logo_y(&self) -> i16 {
        let (_, logo_h) = SpriteId::NintendoLogo.size();
        let center = (SCREEN_HEIGHT - logo_h) / 2;
        match self.loading_phase {
            LoadingPhase::Hold => center,
            LoadingPhase::Slide => {
                let travel = f32::from(center - LOGO_START_Y);
                LOGO_START_Y + (travel * self.loading.progress()).round() as i16
            }
        }
    }

    /// Screen opacity, 0-255. Falls along a quarter sine while powering off.
    pub fn opacity(&self) -> u8 {
        match self.screen {
            ConsoleScreen::Off => 0,
            ConsoleScreen::PoweringOff => {
                let level = (self.fade.progress() * FRAC_PI_2).cos();
                (255.0 * level).round().clamp(0.0, 255.0) as u8
            }
            _ => 255,
        }
    }

    fn emit(&mut self, event: ConsoleEvent) {
        self.events.push(event);
    }

    /// Hide the visible cartridge, if any.
    fn stop_active(&mut self) {
        if let Some(kind) = self.active.take() {
            self.game_mut(kind).hide();
            tracing::debug!(cartridge = kind.as_str(), "game stopped");
            self.emit(ConsoleEvent::GameStopped(kind));
        }
    }

    pub fn power_on(&mut self) {
        self.powered = true;
        self.fade.cancel();
        self.stop_active();
        self.screen = ConsoleScreen::Loading;
        self.loading_phase = LoadingPhase::Slide;
        self.loading.start(LOADING_SLIDE_MS);
        tracing::info!("console powered on");
        self.emit(ConsoleEvent::PoweredOn);
    }

    pub fn power_off(&mut self) {
        if !self.powered {
            return;
        }
        self.powered = false;
        self.loading.cancel();
        self.volume_overlay.cancel();
        self.fading_from = self.screen;
        self.screen = ConsoleScreen::PoweringOff;
        self.fade.start(POWER_OFF_FADE_MS);
        tracing::info!("console powered off");
        self.emit(ConsoleEvent::PoweredOff);
    }

    pub fn toggle_power(&mut self) {
        if self.powered {
            self.power_off();
        } else {
            self.power_on();
        }
    }

    /// Select the cartridge `start_game` will run. A different visible game is stopped.
    pub fn set_game(&mut self, kind: CartridgeKind) {
        if self.active.is_some_and(|active| active != kind) {
            self.stop_active();
        }
        self.cartridge = Some(kind);
    }

    /// Empty the slot; a running game is stopped.
    pub fn set_no_game(&mut self) {
        self.stop_active();
        self.cartridge = None;
        if self.screen == ConsoleScreen::Game {
            self.screen = ConsoleScreen::NoCartridge;
        }
    }

    /// Show the inserted cartridge, or the no-cartridge screen when the slot is empty.
    pub fn start_game(&mut self) {
        if !self.powered {
            return;
        }
        self.loading.cancel();
        let Some(kind) = self.cartridge else {
            self.stop_active();
            self.screen = ConsoleScreen::NoCartridge;
            return;
        };
        self.stop_active();
        self.game_mut(kind).show();
        self.active = Some(kind);
        self.screen = ConsoleScreen::Game;
        tracing::debug!(cartridge = kind.as_str(), "game started");
        self.emit(ConsoleEvent::GameStarted(kind));
        self.collect_cartridge_events();
    }

    /// Swap cartridges. While loading, the new one starts when loading ends.
    pub fn insert_cartridge(&mut self, kind: CartridgeKind) {
        self.set_game(kind);
        if self.powered && self.screen != ConsoleScreen::Loading {
            self.start_game();
        }
    }

    pub fn eject_cartridge(&mut self) {
        self.set_no_game();
    }

    /// Clamp to 0..=10 and flash the volume bar.
    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(MAX_VOLUME);
        self.emit(ConsoleEvent::VolumeChanged(self.volume));
        if self.powered {
            self.volume_overlay.start(VOLUME_OVERLAY_MS);
        }
    }

    pub fn volume_up(&mut self) {
        self.set_volume(self.volume.saturating_add(1));
    }

    pub fn volume_down(&mut self) {
        self.set_volume(self.volume.saturating_sub(1));
    }

    pub fn on_button_press(&mut self, button: Button) {
        if !self.powered || self.screen != ConsoleScreen::Game {
            return;
        }
        if let Some(kind) = self.active {
            self.game_mut(kind).on_button_press(button);
            self.collect_cartridge_events();
        }
    }

    pub fn on_button_up(&mut self, button: Button) {
        if !self.powered {
            return;
        }
        if let Some(kind) = self.active {
            self.game_mut(kind).on_button_up(button);
        }
    }

    /// Fresh Tetris game at `level`, if Tetris is the running game.
    pub fn restart_tetris(&mut self, level: u32) {
        if self.active == Some(CartridgeKind::Tetris) && self.screen == ConsoleScreen::Game {
            self.tetris.start_at_level(level);
            self.collect_cartridge_events();
        }
    }

    pub fn disable_tetris_falling(&mut self) {
        self.tetris.disable_falling();
    }

    pub fn enable_tetris_falling(&mut self) {
        self.tetris.enable_falling();
    }

    pub fn clear_tetris_bottom_line(&mut self) {
        self.tetris.clear_bottom_line();
    }

    pub fn update(&mut self, dt_ms: u32) {
        self.volume_overlay.tick(dt_ms);

        match self.screen {
            ConsoleScreen::Off | ConsoleScreen::NoCartridge => {}
            ConsoleScreen::Loading => self.update_loading(dt_ms),
            ConsoleScreen::Game => {
                if let Some(kind) = self.active {
                    self.game_mut(kind).update(dt_ms);
                }
            }
            ConsoleScreen::PoweringOff => {
                if self.fade.tick(dt_ms) {
                    self.screen = ConsoleScreen::Off;
                    self.stop_active();
                }
            }
        }

        self.collect_cartridge_events();
    }

    fn update_loading(&mut self, dt_ms: u32) {
        if !self.loading.tick(dt_ms) {
            return;
        }
        match self.loading_phase {
            LoadingPhase::Slide => {
                self.emit(ConsoleEvent::Sound(SoundCue::GameBoyLoad));
                self.loading_phase = LoadingPhase::Hold;
                self.loading.start(LOADING_HOLD_MS);
            }
            LoadingPhase::Hold => self.start_game(),
        }
    }

    fn collect_cartridge_events(&mut self) {
        let start = self.events.len();
        self.tetris.drain_events(&mut self.events);
        self.invaders.drain_events(&mut self.events);
        self.zelda.drain_events(&mut self.events);

        for i in start..self.events.len() {
            if let ConsoleEvent::BestScoreChanged(score) = self.events[i] {
                if let Err(err) = self.store.save_best(TETRIS_BEST_KEY, score) {
                    tracing::warn!(%err, score, "failed to save best score");
                }
            }
        }
    }

    /// Events raised since the last call.
    pub fn take_events(&mut self) -> Vec<ConsoleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replace `out` with this frame's draw intents.
    pub fn render(&self, out: &mut DrawList) {
        out.clear();
        let screen = match self.screen {
            ConsoleScreen::PoweringOff => self.fading_from,
            other => other,
        };
        match screen {
            ConsoleScreen::Off | ConsoleScreen::PoweringOff => {}
            ConsoleScreen::Loading => {
                out.fill(Shade::Lightest);
                let (logo_w, _) = SpriteId::NintendoLogo.size();
                out.sprite((SCREEN_WIDTH - logo_w) / 2, self.logo_y(), SpriteId::NintendoLogo);
            }
            ConsoleScreen::NoCartridge => {
                out.fill(Shade::Lightest);
                out.text(32, 60, "NO CARTRIDGE", Shade::Darkest);
                out.text(28, 76, "INSERT A GAME", Shade::Dark);
            }
            ConsoleScreen::Game => {
                if let Some(kind) = self.active {
                    self.game(kind).render(out);
                }
            }
        }

        if self.volume_overlay.is_running() {
            out.rect(30, 120, 100, 16, Shade::Darkest);
            out.text(34, 124, "VOL", Shade::Lightest);
            for i in 0..self.volume as i16 {
                out.rect(60 + i * 6, 124, 4, 8, Shade::Lightest);
            }
        }
        out.set_opacity(self.opacity());
    }
}
