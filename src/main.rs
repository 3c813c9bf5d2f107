//! Pocket console runner (default binary).
//!
//! Crossterm input, a fixed 16 ms timestep and the framebuffer renderer.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use pocket_console::core::{Console, MemoryScoreStore, ScoreStore};
use pocket_console::input::{map_key_event, ButtonTracker, ConsoleCommand};
use pocket_console::logging;
use pocket_console::settings::{apply_env_overrides, JsonScoreStore, SettingsStore};
use pocket_console::term::{
    fingerprint, BezelStatus, FrameBuffer, RenderThrottle, ScreenView, TerminalRenderer, Viewport,
};
use pocket_console::types::{DrawList, TICK_MS};

/// Unchanged frames are still redrawn this often.
const STATIC_REDRAW_MS: u64 = 500;

fn main() -> Result<()> {
    let log_path = logging::log_path_from_env();
    logging::init(log_path.as_deref())?;

    let settings = SettingsStore::from_env();
    let config = apply_env_overrides(settings.load());
    let store: Box<dyn ScoreStore> = match JsonScoreStore::open(settings.scores_path()) {
        Ok(store) => Box::new(store),
        Err(err) => {
            tracing::warn!(%err, "best scores unavailable, keeping them in memory");
            Box::new(MemoryScoreStore::new())
        }
    };
    tracing::info!(cartridge = ?config.cartridge, seed = config.seed, "starting");
    let mut console = Console::new(config, store);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut console);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, console: &mut Console) -> Result<()> {
    let view = ScreenView::new(console.config().tint);
    let mut tracker = ButtonTracker::new();
    let mut throttle = RenderThrottle::new(STATIC_REDRAW_MS);
    let mut list = DrawList::new();
    let mut fb = FrameBuffer::new(0, 0);

    let started = Instant::now();
    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(u64::from(TICK_MS));

    loop {
        // Render.
        console.render(&mut list);
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let status = BezelStatus::from_console(console);
        let frame_key = {
            let mut hasher = DefaultHasher::new();
            fingerprint(&list).hash(&mut hasher);
            status.hash(&mut hasher);
            (w, h).hash(&mut hasher);
            hasher.finish()
        };
        let now_ms = started.elapsed().as_millis() as u64;
        if throttle.should_render(now_ms, frame_key, true) {
            view.render_into(&list, &status, Viewport::new(w, h), &mut fb);
            term.draw_swap(&mut fb)?;
        }

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(command) = map_key_event(key) {
                        if !handle_key(console, &mut tracker, key.kind, command) {
                            return Ok(());
                        }
                    }
                }
                Event::Resize(_, _) => {
                    term.invalidate();
                    throttle.invalidate();
                }
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();

            for button in tracker.update() {
                console.on_button_up(button);
            }
            console.update(TICK_MS);
            for ev in console.take_events() {
                tracing::debug!(event = ?ev, "console event");
            }
        }
    }
}

/// Returns false when the runner should quit.
fn handle_key(
    console: &mut Console,
    tracker: &mut ButtonTracker,
    kind: KeyEventKind,
    command: ConsoleCommand,
) -> bool {
    match (kind, command) {
        (KeyEventKind::Release, ConsoleCommand::Button(button)) => {
            if tracker.release(button) {
                console.on_button_up(button);
            }
            true
        }
        // Terminal auto-repeat only keeps the button held.
        (KeyEventKind::Repeat, ConsoleCommand::Button(button)) => {
            tracker.press(button);
            true
        }
        (KeyEventKind::Press, command) => apply_command(console, tracker, command),
        _ => true,
    }
}

fn apply_command(console: &mut Console, tracker: &mut ButtonTracker, command: ConsoleCommand) -> bool {
    match command {
        ConsoleCommand::Button(button) => {
            if tracker.press(button) {
                console.on_button_press(button);
            }
        }
        ConsoleCommand::Power => {
            for button in tracker.reset() {
                console.on_button_up(button);
            }
            console.toggle_power();
        }
        ConsoleCommand::Insert(kind) => console.insert_cartridge(kind),
        ConsoleCommand::Eject => console.eject_cartridge(),
        ConsoleCommand::VolumeUp => console.volume_up(),
        ConsoleCommand::VolumeDown => console.volume_down(),
        ConsoleCommand::Quit => return false,
    }
    true
}
