//! Frame-driven timers.
//!
//! Delayed transitions and blinking cues are plain values advanced by the
//! same per-frame delta as the rest of the game. Nothing is scheduled
//! elsewhere: a timer that is not ticked does not fire, and cancelling is a
//! state change with no side effects.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum CountdownState {
    #[default]
    Idle,
    Running,
    Fired,
    Cancelled,
}

/// A one-shot countdown.
///
/// `tick` returns `true` exactly once, on the tick that reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Countdown {
    duration_ms: u32,
    elapsed_ms: u32,
    state: CountdownState,
}

impl Countdown {
    /// A countdown that is not running.
    pub const fn idle() -> Self {
        Self {
            duration_ms: 0,
            elapsed_ms: 0,
            state: CountdownState::Idle,
        }
    }

    pub fn started(duration_ms: u32) -> Self {
        let mut c = Self::idle();
        c.start(duration_ms);
        c
    }

    /// (Re)start from zero.
    pub fn start(&mut self, duration_ms: u32) {
        self.duration_ms = duration_ms;
        self.elapsed_ms = 0;
        self.state = CountdownState::Running;
    }

    /// Stop a running countdown. Idle, fired or cancelled countdowns are left as they are.
    pub fn cancel(&mut self) {
        if self.state == CountdownState::Running {
            self.state = CountdownState::Cancelled;
        }
    }

    pub fn tick(&mut self, dt_ms: u32) -> bool {
        if self.state != CountdownState::Running {
            return false;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms).min(self.duration_ms);
        if self.elapsed_ms >= self.duration_ms {
            self.state = CountdownState::Fired;
            return true;
        }
        false
    }

    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    pub fn has_fired(&self) -> bool {
        self.state == CountdownState::Fired
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == CountdownState::Cancelled
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    pub fn remaining_ms(&self) -> u32 {
        self.duration_ms - self.elapsed_ms
    }

    /// Fraction of the duration elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        self.elapsed_ms as f32 / self.duration_ms as f32
    }
}

/// Held-button repeater: one action on press, then repeats after `delay_ms`
/// every `rate_ms` while held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoRepeat {
    delay_ms: u32,
    rate_ms: u32,
    held: bool,
    repeating: bool,
    acc_ms: u32,
}

impl AutoRepeat {
    pub fn new(delay_ms: u32, rate_ms: u32) -> Self {
        Self {
            delay_ms,
            rate_ms: rate_ms.max(1),
            held: false,
            repeating: false,
            acc_ms: 0,
        }
    }

    /// Returns true when this press starts a new hold.
    pub fn press(&mut self) -> bool {
        if self.held {
            return false;
        }
        self.held = true;
        self.repeating = false;
        self.acc_ms = 0;
        true
    }

    pub fn release(&mut self) {
        self.held = false;
        self.repeating = false;
        self.acc_ms = 0;
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Advance by `dt_ms` and return how many repeats fired.
    pub fn update(&mut self, dt_ms: u32) -> u32 {
        if !self.held {
            return 0;
        }
        self.acc_ms = self.acc_ms.saturating_add(dt_ms);
        if !self.repeating {
            if self.acc_ms < self.delay_ms {
                return 0;
            }
            self.repeating = true;
            self.acc_ms -= self.delay_ms;
        }
        let fires = self.acc_ms / self.rate_ms;
        self.acc_ms %= self.rate_ms;
        fires
    }
}
