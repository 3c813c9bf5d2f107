//! The capability interface every cartridge implements.
//!
//! The console drives cartridges only through this trait: it shows and hides
//! them, ticks them with the frame delta, forwards buttons, asks for draw
//! intents and collects the events they raised since the last frame.

use crate::types::{Button, CartridgeKind, ConsoleEvent, DrawList};

pub trait Cartridge {
    fn kind(&self) -> CartridgeKind;

    /// Make the cartridge the visible game and enter its first screen.
    fn show(&mut self);

    /// Stop all timers and held input. A hidden cartridge ignores updates and input.
    fn hide(&mut self);

    fn is_visible(&self) -> bool;

    fn update(&mut self, dt_ms: u32);

    fn on_button_press(&mut self, button: Button);

    fn on_button_up(&mut self, button: Button);

    /// Append this frame's draw intents.
    fn render(&self, out: &mut DrawList);

    /// Move pending events into `out`.
    fn drain_events(&mut self, out: &mut Vec<ConsoleEvent>);
}
