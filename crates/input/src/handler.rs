//! Held-button tracking for terminal environments.
//!
//! Terminals without key-release events only repeat the press while a key is
//! held. A button that has not been seen for the release timeout is treated as
//! released, so a single tap never turns into a sustained hold.

use std::time::{Duration, Instant};

use arrayvec::ArrayVec;

use crate::types::Button;

const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Buttons released in one update; there are only eight buttons.
pub type Released = ArrayVec<Button, 8>;

#[derive(Debug, Clone)]
pub struct ButtonTracker {
    last_seen: [Option<Instant>; 8],
    key_release_timeout_ms: u32,
}

fn slot(button: Button) -> usize {
    match button {
        Button::Up => 0,
        Button::Down => 1,
        Button::Left => 2,
        Button::Right => 3,
        Button::A => 4,
        Button::B => 5,
        Button::Start => 6,
        Button::Select => 7,
    }
}

impl ButtonTracker {
    pub fn new() -> Self {
        Self {
            last_seen: [None; 8],
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn is_held(&self, button: Button) -> bool {
        self.last_seen[slot(button)].is_some()
    }

    /// Record a press. Returns true for a new press, false for a repeat.
    pub fn press(&mut self, button: Button) -> bool {
        self.press_at(button, Instant::now())
    }

    pub fn press_at(&mut self, button: Button, now: Instant) -> bool {
        self.last_seen[slot(button)].replace(now).is_none()
    }

    /// Record a real release. Returns true if the button was held.
    pub fn release(&mut self, button: Button) -> bool {
        self.last_seen[slot(button)].take().is_some()
    }

    /// Release every button not seen within the timeout.
    pub fn update(&mut self) -> Released {
        self.update_at(Instant::now())
    }

    pub fn update_at(&mut self, now: Instant) -> Released {
        let timeout = Duration::from_millis(u64::from(self.key_release_timeout_ms));
        let mut released = Released::new();
        for button in Button::ALL {
            let seen = &mut self.last_seen[slot(button)];
            if seen.is_some_and(|t| now.saturating_duration_since(t) > timeout) {
                *seen = None;
                released.push(button);
            }
        }
        released
    }

    /// Release everything; returns what was held.
    pub fn reset(&mut self) -> Released {
        let mut released = Released::new();
        for button in Button::ALL {
            if self.release(button) {
                released.push(button);
            }
        }
        released
    }
}

impl Default for ButtonTracker {
    fn default() -> Self {
        Self::new()
    }
}
