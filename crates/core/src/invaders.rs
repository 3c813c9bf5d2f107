//! Space Invaders cartridge
//!
//! The formation moves in lockstep from one shared step timer and one shared
//! direction. When any active unit touches a horizontal screen edge, the next
//! step reverses the direction and moves every unit down instead of sideways.
//! The step interval is `500 / speed` ms; speed grows by 2 every 8 kills.
//!
//! Collisions are axis-aligned box overlaps. Dead units leave play and no
//! longer count for bounds, speed or game over.

use crate::timer::Countdown;
use crate::types::{
    Button, CartridgeKind, ConsoleEvent, DrawList, InvaderKind, Shade, SoundCue, SpriteId,
    GAME_OVER_SCREEN_MS, SCREEN_HEIGHT, SCREEN_WIDTH,
};
use crate::Cartridge;

pub const FORMATION_ROWS: usize = 5;
pub const FORMATION_COLS: usize = 8;
const COL_PITCH: i16 = 14;
const ROW_PITCH: i16 = 12;
const FORMATION_ORIGIN: (i16, i16) = (8, 16);

const BASE_STEP_MS: u32 = 500;
const MIN_STEP_MS: u32 = 16;
pub const STEP_DOWN_PX: i16 = 12;
const SPEED_GAIN: u32 = 2;
const KILLS_PER_SPEED_UP: u32 = 8;

/// Top of the player cannon; units reaching it end the game.
pub const PLAYER_Y: i16 = 132;
const PLAYER_MOVE_MS: u32 = 16;
const SHOT_MOVE_MS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aabb {
    pub x: i16,
    pub y: i16,
    pub w: i16,
    pub h: i16,
}

impl Aabb {
    pub fn new(x: i16, y: i16, w: i16, h: i16) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i16 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i16 {
        self.y + self.h
    }

    /// Touching edges do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enemy {
    pub kind: InvaderKind,
    pub x: i16,
    pub y: i16,
    pub alive: bool,
}

impl Enemy {
    pub fn new(kind: InvaderKind, x: i16, y: i16) -> Self {
        Self {
            kind,
            x,
            y,
            alive: true,
        }
    }

    pub fn bounds(&self) -> Aabb {
        let (w, h) = self.kind.size();
        Aabb::new(self.x, self.y, w, h)
    }
}

/// What one formation step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormationStep {
    Sideways,
    Reversed,
    /// Nothing alive to move.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formation {
    enemies: Vec<Enemy>,
    /// +1 right, -1 left.
    direction: i16,
    step_ms: u32,
    kills: u32,
    frame: u8,
}

fn row_kind(row: usize) -> InvaderKind {
    match row {
        0 => InvaderKind::Squid,
        1 | 2 => InvaderKind::Crab,
        _ => InvaderKind::Octopus,
    }
}

impl Formation {
    /// The standard 5x8 wave, moving right.
    pub fn new() -> Self {
        let mut enemies = Vec::with_capacity(FORMATION_ROWS * FORMATION_COLS);
        for row in 0..FORMATION_ROWS {
            let kind = row_kind(row);
            let (w, _) = kind.size();
            for col in 0..FORMATION_COLS {
                // Narrow sprites are centered in the 12 px column.
                let x = FORMATION_ORIGIN.0 + col as i16 * COL_PITCH + (12 - w) / 2;
                let y = FORMATION_ORIGIN.1 + row as i16 * ROW_PITCH;
                enemies.push(Enemy::new(kind, x, y));
            }
        }
        Self::from_enemies(enemies, 1)
    }

    /// A formation from explicit units; `direction` is +1 or -1.
    pub fn from_enemies(enemies: Vec<Enemy>, direction: i16) -> Self {
        Self {
            enemies,
            direction: if direction < 0 { -1 } else { 1 },
            step_ms: 0,
            kills: 0,
            frame: 0,
        }
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn direction(&self) -> i16 {
        self.direction
    }

    pub fn frame(&self) -> u8 {
        self.frame
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn speed(&self) -> u32 {
        1 + SPEED_GAIN * (self.kills / KILLS_PER_SPEED_UP)
    }

    pub fn step_interval_ms(&self) -> u32 {
        (BASE_STEP_MS / self.speed()).max(MIN_STEP_MS)
    }

    pub fn alive_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    pub fn is_cleared(&self) -> bool {
        self.alive_count() == 0
    }

    /// Box around every active unit.
    pub fn bounds(&self) -> Option<Aabb> {
        let mut alive = self.enemies.iter().filter(|e| e.alive).map(Enemy::bounds);
        let first = alive.next()?;
        let (mut left, mut top, mut right, mut bottom) =
            (first.x, first.y, first.right(), first.bottom());
        for b in alive {
            left = left.min(b.x);
            top = top.min(b.y);
            right = right.max(b.right());
            bottom = bottom.max(b.bottom());
        }
        Some(Aabb::new(left, top, right - left, bottom - top))
    }

    /// Advance the shared step timer; returns the steps taken.
    ///
    /// Stepping stops as soon as a unit reaches the player line, dropping
    /// whatever time is left.
    pub fn update(&mut self, dt_ms: u32) -> u32 {
        self.step_ms = self.step_ms.saturating_add(dt_ms);
        let mut steps = 0;
        loop {
            // Kills between steps change the interval, so re-read it each time.
            let interval = self.step_interval_ms();
            if self.step_ms < interval {
                break;
            }
            self.step_ms -= interval;
            if self.step() == FormationStep::Empty {
                self.step_ms = 0;
                break;
            }
            steps += 1;
            if self.reached_player_line() {
                self.step_ms = 0;
                break;
            }
        }
        steps
    }

    pub fn reached_player_line(&self) -> bool {
        self.lowest_edge().is_some_and(|bottom| bottom >= PLAYER_Y)
    }

    /// Move every active unit one step.
    pub fn step(&mut self) -> FormationStep {
        let Some(bounds) = self.bounds() else {
            return FormationStep::Empty;
        };
        let at_edge = if self.direction > 0 {
            bounds.right() >= SCREEN_WIDTH
        } else {
            bounds.x <= 0
        };

        let result = if at_edge {
            self.direction = -self.direction;
            for e in self.enemies.iter_mut().filter(|e| e.alive) {
                e.y += STEP_DOWN_PX;
            }
            FormationStep::Reversed
        } else {
            for e in self.enemies.iter_mut().filter(|e| e.alive) {
                e.x += self.direction;
            }
            FormationStep::Sideways
        };
        self.frame ^= 1;
        result
    }

    /// Kill the first active unit overlapping `shot`; returns its points.
    pub fn hit(&mut self, shot: &Aabb) -> Option<u32> {
        let enemy = self
            .enemies
            .iter_mut()
            .find(|e| e.alive && e.bounds().overlaps(shot))?;
        enemy.alive = false;
        self.kills += 1;
        Some(enemy.kind.points())
    }

    /// Bottom edge of the lowest active unit.
    pub fn lowest_edge(&self) -> Option<i16> {
        self.bounds().map(|b| b.bottom())
    }
}

impl Default for Formation {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvadersScreen {
    Playing,
    GameOver,
}

#[derive(Debug, Clone)]
pub struct InvadersGame {
    formation: Formation,
    screen: InvadersScreen,
    visible: bool,
    paused: bool,
    player_x: i16,
    move_ms: u32,
    left_held: bool,
    right_held: bool,
    shot: Option<(i16, i16)>,
    shot_ms: u32,
    score: u32,
    wave: u32,
    game_over_timer: Countdown,
    events: Vec<ConsoleEvent>,
}

impl InvadersGame {
    pub fn new() -> Self {
        Self {
            formation: Formation::new(),
            screen: InvadersScreen::Playing,
            visible: false,
            paused: false,
            player_x: player_start_x(),
            move_ms: 0,
            left_held: false,
            right_held: false,
            shot: None,
            shot_ms: 0,
            score: 0,
            wave: 1,
            game_over_timer: Countdown::idle(),
            events: Vec::new(),
        }
    }

    /// Fresh game: new formation, score 0, player centered.
    pub fn reset(&mut self) {
        self.formation = Formation::new();
        self.screen = InvadersScreen::Playing;
        self.paused = false;
        self.player_x = player_start_x();
        self.move_ms = 0;
        self.shot = None;
        self.shot_ms = 0;
        self.score = 0;
        self.wave = 1;
        self.game_over_timer.cancel();
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    /// Replace the formation, for scripted setups.
    pub fn set_formation(&mut self, formation: Formation) {
        self.formation = formation;
    }

    pub fn screen(&self) -> InvadersScreen {
        self.screen
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn player_x(&self) -> i16 {
        self.player_x
    }

    pub fn shot(&self) -> Option<(i16, i16)> {
        self.shot
    }

    pub fn player_bounds(&self) -> Aabb {
        let (w, h) = SpriteId::Cannon.size();
        Aabb::new(self.player_x, PLAYER_Y, w, h)
    }

    fn emit(&mut self, event: ConsoleEvent) {
        self.events.push(event);
    }

    fn fire(&mut self) {
        if self.shot.is_some() {
            return;
        }
        let (w, _) = SpriteId::Cannon.size();
        let (_, shot_h) = SpriteId::Shot.size();
        self.shot = Some((self.player_x + w / 2, PLAYER_Y - shot_h));
        self.shot_ms = 0;
        self.emit(ConsoleEvent::Sound(SoundCue::PlayerShoot));
    }

    fn update_player(&mut self, dt_ms: u32) {
        let dir = i16::from(self.right_held) - i16::from(self.left_held);
        if dir == 0 {
            self.move_ms = 0;
            return;
        }
        self.move_ms = self.move_ms.saturating_add(dt_ms);
        // Crossing the screen is the most a single frame can move.
        let steps = (self.move_ms / PLAYER_MOVE_MS).min(SCREEN_WIDTH as u32) as i16;
        self.move_ms %= PLAYER_MOVE_MS;
        let (w, _) = SpriteId::Cannon.size();
        self.player_x = (self.player_x + dir * steps).clamp(0, SCREEN_WIDTH - w);
    }

    fn update_shot(&mut self, dt_ms: u32) {
        let Some((x, mut y)) = self.shot else {
            return;
        };
        self.shot_ms = self.shot_ms.saturating_add(dt_ms);
        let steps = self.shot_ms / SHOT_MOVE_MS;
        self.shot_ms %= SHOT_MOVE_MS;
        let (w, h) = SpriteId::Shot.size();

        // One pixel at a time so a fast shot cannot pass through a unit.
        for _ in 0..steps {
            y -= 1;
            if y + h <= 0 {
                self.shot = None;
                return;
            }
            if let Some(points) = self.formation.hit(&Aabb::new(x, y, w, h)) {
                self.score = self.score.saturating_add(points);
                self.shot = None;
                self.emit(ConsoleEvent::Sound(SoundCue::InvaderKilled));
                return;
            }
        }
        self.shot = Some((x, y));
    }

    fn update_playing(&mut self, dt_ms: u32) {
        self.update_player(dt_ms);
        self.update_shot(dt_ms);

        if self.formation.is_cleared() {
            self.wave += 1;
            tracing::debug!(wave = self.wave, score = self.score, "invaders wave cleared");
            self.formation = Formation::new();
            return;
        }

        for _ in 0..self.formation.update(dt_ms) {
            self.emit(ConsoleEvent::Sound(SoundCue::InvaderStep));
        }

        if self.formation.reached_player_line() {
            self.screen = InvadersScreen::GameOver;
            self.shot = None;
            self.game_over_timer.start(GAME_OVER_SCREEN_MS);
            tracing::debug!(score = self.score, "invaders game over");
            self.emit(ConsoleEvent::GameOver(CartridgeKind::SpaceInvaders));
        }
    }

    fn render_playing(&self, out: &mut DrawList) {
        out.fill(Shade::Lightest);
        out.text(4, 2, "SCORE", Shade::Darkest);
        out.text_fmt(48, 2, format_args!("{:05}", self.score), Shade::Darkest);
        let frame = self.formation.frame();
        for e in self.formation.enemies().iter().filter(|e| e.alive) {
            out.sprite(e.x, e.y, SpriteId::Invader { kind: e.kind, frame });
        }
        out.sprite(self.player_x, PLAYER_Y, SpriteId::Cannon);
        if let Some((x, y)) = self.shot {
            out.sprite(x, y, SpriteId::Shot);
        }
        out.rect(0, SCREEN_HEIGHT - 4, SCREEN_WIDTH, 1, Shade::Dark);
        if self.paused {
            out.text(62, 70, "PAUSE", Shade::Darkest);
        }
    }

    fn render_game_over(&self, out: &mut DrawList) {
        out.fill(Shade::Darkest);
        out.text(44, 60, "GAME OVER", Shade::Lightest);
        out.text_fmt(44, 76, format_args!("SCORE {:05}", self.score), Shade::Light);
    }
}

fn player_start_x() -> i16 {
    let (w, _) = SpriteId::Cannon.size();
    (SCREEN_WIDTH - w) / 2
}

impl Default for InvadersGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Cartridge for InvadersGame {
    fn kind(&self) -> CartridgeKind {
        CartridgeKind::SpaceInvaders
    }

    fn show(&mut self) {
        self.visible = true;
        self.left_held = false;
        self.right_held = false;
        self.reset();
    }

    fn hide(&mut self) {
        self.visible = false;
        self.left_held = false;
        self.right_held = false;
        self.game_over_timer.cancel();
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn update(&mut self, dt_ms: u32) {
        if !self.visible || self.paused {
            return;
        }
        match self.screen {
            InvadersScreen::Playing => self.update_playing(dt_ms),
            InvadersScreen::GameOver => {
                if self.game_over_timer.tick(dt_ms) {
                    self.reset();
                }
            }
        }
    }

    fn on_button_press(&mut self, button: Button) {
        if !self.visible || self.screen != InvadersScreen::Playing {
            return;
        }
        if button == Button::Start {
            self.paused = !self.paused;
            self.left_held = false;
            self.right_held = false;
            return;
        }
        if self.paused {
            return;
        }
        match button {
            Button::Left => self.left_held = true,
            Button::Right => self.right_held = true,
            Button::A | Button::B => self.fire(),
            _ => {}
        }
    }

    fn on_button_up(&mut self, button: Button) {
        match button {
            Button::Left => self.left_held = false,
            Button::Right => self.right_held = false,
            _ => {}
        }
    }

    fn render(&self, out: &mut DrawList) {
        if !self.visible {
            return;
        }
        match self.screen {
            InvadersScreen::Playing => self.render_playing(out),
            InvadersScreen::GameOver => self.render_game_over(out),
        }
    }

    fn drain_events(&mut self, out: &mut Vec<ConsoleEvent>) {
        out.append(&mut self.events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shown() -> InvadersGame {
        let mut game = InvadersGame::new();
        game.show();
        game
    }

    #[test]
    fn test_aabb_overlap_excludes_touching_edges() {
        let a = Aabb::new(0, 0, 10, 10);
        assert!(a.overlaps(&Aabb::new(9, 9, 2, 2)));
        assert!(!a.overlaps(&Aabb::new(10, 0, 2, 2)));
        assert!(!a.overlaps(&Aabb::new(0, 10, 2, 2)));
        assert!(a.overlaps(&Aabb::new(-5, -5, 30, 30)));
    }

    #[test]
    fn test_standard_wave_layout() {
        let f = Formation::new();
        assert_eq!(f.enemies().len(), FORMATION_ROWS * FORMATION_COLS);
        assert_eq!(f.enemies()[0].kind, InvaderKind::Squid);
        assert_eq!(f.enemies()[FORMATION_COLS].kind, InvaderKind::Crab);
        assert_eq!(f.enemies()[4 * FORMATION_COLS].kind, InvaderKind::Octopus);
        let b = f.bounds().unwrap();
        assert!(b.x > 0 && b.right() < SCREEN_WIDTH);
    }

    #[test]
    fn test_formation_steps_on_shared_timer() {
        let mut f = Formation::new();
        let x0 = f.enemies()[0].x;
        assert_eq!(f.update(499), 0);
        assert_eq!(f.update(1), 1);
        assert_eq!(f.enemies()[0].x, x0 + 1);
        assert_eq!(f.frame(), 1);
    }

    #[test]
    fn test_reversal_at_right_edge_drops_one_row() {
        let units = vec![
            Enemy::new(InvaderKind::Octopus, SCREEN_WIDTH - 12, 40),
            Enemy::new(InvaderKind::Octopus, SCREEN_WIDTH - 40, 40),
            Enemy::new(InvaderKind::Crab, SCREEN_WIDTH - 30, 28),
        ];
        let mut f = Formation::from_enemies(units.clone(), 1);
        assert_eq!(f.step(), FormationStep::Reversed);
        assert_eq!(f.direction(), -1);
        for (before, after) in units.iter().zip(f.enemies()) {
            assert_eq!(after.x, before.x);
            assert_eq!(after.y, before.y + STEP_DOWN_PX);
        }
        assert_eq!(f.step(), FormationStep::Sideways);
        assert_eq!(f.enemies()[0].x, SCREEN_WIDTH - 13);
    }

    #[test]
    fn test_dead_units_do_not_count_for_bounds() {
        let mut units = vec![
            Enemy::new(InvaderKind::Octopus, SCREEN_WIDTH - 12, 40),
            Enemy::new(InvaderKind::Octopus, 50, 40),
        ];
        units[0].alive = false;
        let mut f = Formation::from_enemies(units, 1);
        assert_eq!(f.step(), FormationStep::Sideways);
        assert_eq!(f.enemies()[1].x, 51);
        // Dead units stay where they died.
        assert_eq!(f.enemies()[0].x, SCREEN_WIDTH - 12);
    }

    #[test]
    fn test_hit_kills_and_speeds_up_every_eight_kills() {
        let mut f = Formation::new();
        assert_eq!(f.step_interval_ms(), 500);
        for i in 0..8 {
            let b = f.enemies()[i].bounds();
            assert_eq!(f.hit(&b), Some(30));
        }
        assert_eq!(f.speed(), 3);
        assert_eq!(f.step_interval_ms(), 166);
        assert_eq!(f.alive_count(), 32);
        let first = f.enemies()[0].bounds();
        assert_eq!(f.hit(&first), None, "dead units cannot be hit again");
    }

    #[test]
    fn test_shot_travels_and_kills_unit_above_player() {
        let mut game = shown();
        let target = Enemy::new(InvaderKind::Crab, game.player_x(), 100);
        let other = Enemy::new(InvaderKind::Squid, 10, 10);
        game.set_formation(Formation::from_enemies(vec![target, other], 1));
        game.on_button_press(Button::A);
        assert!(game.shot().is_some());
        game.on_button_press(Button::B);
        for _ in 0..20 {
            game.update(16);
        }
        assert_eq!(game.score(), 20);
        assert!(game.shot().is_none());
        assert!(!game.formation().enemies()[0].alive);
    }

    #[test]
    fn test_player_moves_while_held_and_stays_on_screen() {
        let mut game = shown();
        let x0 = game.player_x();
        game.on_button_press(Button::Left);
        game.update(32);
        assert_eq!(game.player_x(), x0 - 2);
        game.update(10_000);
        assert_eq!(game.player_x(), 0);
        game.on_button_up(Button::Left);
        game.update(100);
        assert_eq!(game.player_x(), 0);
    }

    #[test]
    fn test_reaching_player_line_is_game_over_then_restart() {
        let mut game = shown();
        let low = Enemy::new(InvaderKind::Octopus, 60, PLAYER_Y - 8);
        game.set_formation(Formation::from_enemies(vec![low], 1));
        game.update(1);
        assert_eq!(game.screen(), InvadersScreen::GameOver);
        let mut events = Vec::new();
        game.drain_events(&mut events);
        assert!(events.contains(&ConsoleEvent::GameOver(CartridgeKind::SpaceInvaders)));

        game.update(1999);
        assert_eq!(game.screen(), InvadersScreen::GameOver);
        game.update(1);
        assert_eq!(game.screen(), InvadersScreen::Playing);
        assert_eq!(game.score(), 0);
        assert_eq!(game.formation().alive_count(), FORMATION_ROWS * FORMATION_COLS);
    }

    #[test]
    fn test_hide_cancels_game_over_timer() {
        let mut game = shown();
        let low = Enemy::new(InvaderKind::Octopus, 60, PLAYER_Y);
        game.set_formation(Formation::from_enemies(vec![low], 1));
        game.update(1);
        game.hide();
        game.update(5000);
        assert_eq!(game.screen(), InvadersScreen::GameOver);
    }

    #[test]
    fn test_cleared_wave_spawns_new_formation_keeping_score() {
        let mut game = shown();
        let mut lone = Enemy::new(InvaderKind::Squid, 60, 40);
        lone.alive = false;
        game.set_formation(Formation::from_enemies(vec![lone], 1));
        game.update(16);
        assert_eq!(game.wave(), 2);
        assert_eq!(game.formation().alive_count(), FORMATION_ROWS * FORMATION_COLS);
    }

    #[test]
    fn test_pause_freezes_formation() {
        let mut game = shown();
        game.on_button_press(Button::Start);
        let before = game.formation().clone();
        game.update(5000);
        assert_eq!(game.formation(), &before);
        let mut list = DrawList::new();
        game.render(&mut list);
        assert!(list.contains_text("PAUSE"));
    }
}
