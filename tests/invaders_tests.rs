//! Space Invaders formation and cartridge tests

use pocket_console::core::invaders::{PLAYER_Y, STEP_DOWN_PX};
use pocket_console::core::{
    Aabb, Cartridge, Enemy, Formation, FormationStep, InvadersGame, InvadersScreen,
};
use pocket_console::types::{
    Button, CartridgeKind, ConsoleEvent, InvaderKind, SoundCue, SpriteId, SCREEN_WIDTH,
};

fn positions(f: &Formation) -> Vec<(i16, i16)> {
    f.enemies().iter().map(|e| (e.x, e.y)).collect()
}

#[test]
fn test_formation_reverses_at_right_edge() {
    // Rightmost unit touches the right edge while moving right.
    let mut f = Formation::from_enemies(
        vec![
            Enemy::new(InvaderKind::Octopus, SCREEN_WIDTH - 12, 40),
            Enemy::new(InvaderKind::Crab, SCREEN_WIDTH - 40, 28),
            Enemy::new(InvaderKind::Squid, SCREEN_WIDTH - 70, 16),
        ],
        1,
    );
    let before = positions(&f);

    assert_eq!(f.step(), FormationStep::Reversed);
    assert_eq!(f.direction(), -1);
    let after = positions(&f);
    for ((bx, by), (ax, ay)) in before.iter().zip(&after) {
        assert_eq!(ax, bx, "reversal must not move sideways");
        assert_eq!(*ay, by + STEP_DOWN_PX);
    }

    // Then everyone resumes together, leftwards.
    assert_eq!(f.step(), FormationStep::Sideways);
    let resumed = positions(&f);
    for ((ax, ay), (rx, ry)) in after.iter().zip(&resumed) {
        assert_eq!(*rx, ax - 1);
        assert_eq!(ry, ay);
    }
}

#[test]
fn test_formation_reverses_at_left_edge() {
    let mut f = Formation::from_enemies(vec![Enemy::new(InvaderKind::Crab, 0, 20)], -1);
    assert_eq!(f.step(), FormationStep::Reversed);
    assert_eq!(f.direction(), 1);
    assert_eq!(positions(&f), vec![(0, 20 + STEP_DOWN_PX)]);
}

#[test]
fn test_dead_units_do_not_hold_the_edge() {
    let mut f = Formation::from_enemies(
        vec![
            Enemy::new(InvaderKind::Octopus, SCREEN_WIDTH - 12, 40),
            Enemy::new(InvaderKind::Octopus, 60, 40),
        ],
        1,
    );
    let right = f.enemies()[0].bounds();
    assert_eq!(f.hit(&right), Some(InvaderKind::Octopus.points()));
    assert_eq!(f.step(), FormationStep::Sideways);
    assert_eq!(f.enemies()[1].x, 61);
}

#[test]
fn test_shared_timer_and_speed_up() {
    let mut f = Formation::new();
    assert_eq!(f.step_interval_ms(), 500);
    assert_eq!(f.update(499), 0);
    assert_eq!(f.update(1), 1);

    for i in 0..8 {
        let target = f.enemies()[i].bounds();
        assert!(f.hit(&target).is_some());
    }
    assert_eq!(f.kills(), 8);
    assert_eq!(f.speed(), 3);
    assert!(f.step_interval_ms() < 500);
    assert_eq!(f.alive_count(), 32);
}

#[test]
fn test_aabb_overlap() {
    let a = Aabb::new(0, 0, 10, 10);
    assert!(a.overlaps(&Aabb::new(9, 9, 4, 4)));
    assert!(!a.overlaps(&Aabb::new(10, 0, 4, 4)), "touching edges do not overlap");
    assert!(!a.overlaps(&Aabb::new(0, -4, 4, 4)));
}

#[test]
fn test_shot_kills_unit_and_next_wave_starts() {
    let mut game = InvadersGame::new();
    game.show();
    let target_x = game.player_x();
    game.set_formation(Formation::from_enemies(
        vec![Enemy::new(InvaderKind::Octopus, target_x, 100)],
        1,
    ));

    game.on_button_press(Button::A);
    assert!(game.shot().is_some());
    // Only one projectile at a time.
    let first = game.shot();
    game.on_button_press(Button::B);
    assert_eq!(game.shot(), first);

    for _ in 0..20 {
        game.update(16);
    }
    assert_eq!(game.shot(), None);
    assert_eq!(game.score(), InvaderKind::Octopus.points());
    assert_eq!(game.wave(), 2);
    assert_eq!(game.formation().alive_count(), 40);

    let mut events = Vec::new();
    game.drain_events(&mut events);
    assert!(events.contains(&ConsoleEvent::Sound(SoundCue::PlayerShoot)));
    assert!(events.contains(&ConsoleEvent::Sound(SoundCue::InvaderKilled)));
}

#[test]
fn test_formation_reaching_player_line_is_game_over() {
    let mut game = InvadersGame::new();
    game.show();
    game.set_formation(Formation::from_enemies(
        vec![Enemy::new(InvaderKind::Squid, 0, PLAYER_Y - 8 - STEP_DOWN_PX)],
        -1,
    ));

    game.update(16);
    assert_eq!(game.screen(), InvadersScreen::Playing);

    // The next step is a reversal that moves the unit onto the player line.
    game.update(500);
    assert_eq!(game.screen(), InvadersScreen::GameOver);

    let mut events = Vec::new();
    game.drain_events(&mut events);
    assert!(events.contains(&ConsoleEvent::GameOver(CartridgeKind::SpaceInvaders)));

    // The game over screen lasts two seconds, then a fresh game starts.
    for _ in 0..124 {
        game.update(16);
    }
    assert_eq!(game.screen(), InvadersScreen::GameOver);
    game.update(16);
    assert_eq!(game.screen(), InvadersScreen::Playing);
    assert_eq!(game.score(), 0);
}

#[test]
fn test_start_pauses_everything() {
    let mut game = InvadersGame::new();
    game.show();
    let before = game.formation().clone();
    game.on_button_press(Button::Start);
    assert!(game.paused());
    game.update(5000);
    assert_eq!(game.formation(), &before);
    game.on_button_press(Button::Start);
    assert!(!game.paused());
}

#[test]
fn test_long_frame_moves_cannon_to_the_wall() {
    let mut game = InvadersGame::new();
    game.show();
    game.on_button_press(Button::Left);
    game.update(600_000);
    assert_eq!(game.player_x(), 0);

    let mut game = InvadersGame::new();
    game.show();
    game.on_button_press(Button::Right);
    game.update(32_767 * 16);
    let (w, _) = SpriteId::Cannon.size();
    assert_eq!(game.player_x(), SCREEN_WIDTH - w);
}

#[test]
fn test_long_frame_stops_formation_at_player_line() {
    let mut f = Formation::new();
    let steps = f.update(u32::MAX);
    assert!(steps > 0);
    assert!(f.reached_player_line());
    let bottom = f.lowest_edge().expect("units alive");
    assert!(bottom < PLAYER_Y + STEP_DOWN_PX, "overshot to {bottom}");

    let mut game = InvadersGame::new();
    game.show();
    game.update(10_000_000);
    assert_eq!(game.screen(), InvadersScreen::GameOver);
    let bottom = game.formation().lowest_edge().expect("units alive");
    assert!(bottom >= PLAYER_Y && bottom < PLAYER_Y + STEP_DOWN_PX);
}
