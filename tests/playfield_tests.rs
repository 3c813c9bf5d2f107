//! Playfield tests - piece state machine, scoring and the drop scenarios

use pocket_console::core::{
    calculate_line_score, drop_interval_ms, Board, Playfield, Step, Tetromino,
};
use pocket_console::types::{PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

const BOTTOM: i8 = BOARD_HEIGHT as i8 - 1;

fn fresh(kind: PieceKind) -> Playfield {
    let mut pf = Playfield::new(7);
    pf.start_at_level(0);
    assert!(pf.spawn(kind));
    pf
}

#[test]
fn test_i_piece_dropped_on_empty_board() {
    let mut pf = fresh(PieceKind::I);

    let report = pf.hard_drop().expect("piece should lock");
    assert_eq!(report.kind, PieceKind::I);
    assert_eq!(report.lines_cleared, 0);
    assert_eq!(pf.score(), 0);

    // Spawned flat at column 3, so it covers columns 3..=6 of the floor.
    let occupied: Vec<i8> = (0..BOARD_WIDTH as i8)
        .filter(|&x| pf.board().is_occupied(x, BOTTOM))
        .collect();
    assert_eq!(occupied, vec![3, 4, 5, 6]);
    for x in 3..=6 {
        assert_eq!(pf.board().get(x, BOTTOM), Some(Some(PieceKind::I)));
    }
    assert_eq!(pf.board().row_fill(BOTTOM as usize - 1), 0);
}

#[test]
fn test_single_line_clear_scores_and_shifts() {
    let mut pf = fresh(PieceKind::I);
    *pf.board_mut() = Board::from_rows(&["#.........", "#########."]);

    // Stand the I up (column x + 2) and walk it to the gap at column 9.
    assert!(pf.try_rotate(true));
    assert_eq!(pf.active().map(|p| p.rotation), Some(Rotation::East));
    for _ in 0..4 {
        assert!(pf.try_shift(1));
    }
    assert!(!pf.try_shift(1));

    let report = pf.hard_drop().expect("piece should lock");
    assert_eq!(report.lines_cleared, 1);
    assert_eq!(pf.score(), calculate_line_score(1, 0));
    assert_eq!(pf.lines(), 1);

    // The marker row and the rest of the I each moved down one row.
    assert_eq!(pf.board().get(0, BOTTOM), Some(Some(PieceKind::I)));
    assert_eq!(pf.board().get(9, BOTTOM), Some(Some(PieceKind::I)));
    assert_eq!(pf.board().row_fill(BOTTOM as usize), 2);
    assert_eq!(pf.board().row_fill(BOTTOM as usize - 1), 1);
    assert_eq!(pf.board().row_fill(BOTTOM as usize - 2), 1);
    assert_eq!(pf.board().row_fill(BOTTOM as usize - 3), 0);
}

#[test]
fn test_blocked_rotation_never_mutates_piece() {
    let mut pf = fresh(PieceKind::T);
    let piece = pf.active().expect("active piece");

    // Fill everything except the piece itself so no kick can succeed.
    let cells = piece.cells();
    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            if !cells.contains(&(x, y)) {
                pf.board_mut().set(x, y, Some(PieceKind::Z));
            }
        }
    }
    let board = pf.board().clone();

    assert!(!pf.try_rotate(true));
    assert!(!pf.try_rotate(false));
    assert_eq!(pf.active(), Some(piece));
    assert_eq!(pf.board(), &board);
}

#[test]
fn test_o_piece_never_rotates() {
    let mut pf = fresh(PieceKind::O);
    let before = pf.active();
    assert!(!pf.try_rotate(true));
    assert_eq!(pf.active(), before);
}

#[test]
fn test_rejected_shift_is_a_no_op() {
    let mut pf = fresh(PieceKind::L);
    while pf.try_shift(-1) {}
    let at_wall = pf.active();
    assert!(!pf.try_shift(-1));
    assert_eq!(pf.active(), at_wall);
    assert_eq!(at_wall.map(|p| p.x), Some(0));
}

/// Same seed, same inputs: hard drop and repeated soft drops end identically.
#[test]
fn test_hard_drop_matches_repeated_soft_drop() {
    let mut hard = Playfield::new(2024);
    let mut soft = Playfield::new(2024);
    hard.start_at_level(0);
    soft.start_at_level(0);

    let shifts = [-4, -2, 0, 2, 4, 1, -3, 3, -1, 0];
    for i in 0..40 {
        if hard.game_over() {
            break;
        }
        let dx: i8 = shifts[i % shifts.len()];
        for _ in 0..dx.unsigned_abs() {
            let a = hard.try_shift(dx.signum());
            let b = soft.try_shift(dx.signum());
            assert_eq!(a, b);
        }
        if i % 3 == 0 {
            assert_eq!(hard.try_rotate(true), soft.try_rotate(true));
        }

        let hard_report = hard.hard_drop();
        let soft_report = loop {
            match soft.soft_drop() {
                Step::Moved => continue,
                Step::Locked(report) => break Some(report),
                Step::Idle => break None,
            }
        };

        assert_eq!(hard_report, soft_report, "piece {i}");
        assert_eq!(hard.board(), soft.board(), "piece {i}");
        assert_eq!(hard.active(), soft.active());
        assert_eq!(hard.score(), soft.score());
    }
    assert_eq!(hard.game_over(), soft.game_over());
}

#[test]
fn test_score_tiers_strictly_increase() {
    for level in 0..=20 {
        let scores: Vec<u32> = (1..=4).map(|n| calculate_line_score(n, level)).collect();
        assert!(scores.windows(2).all(|w| w[0] < w[1]), "level {level}: {scores:?}");
    }
}

#[test]
fn test_gravity_never_speeds_up_below_floor() {
    let mut last = u32::MAX;
    for level in 0..40 {
        let ms = drop_interval_ms(level);
        assert!(ms <= last);
        assert!(ms >= 50);
        last = ms;
    }
}

#[test]
fn test_blocked_spawn_is_game_over() {
    let mut pf = Playfield::new(1);
    pf.start_at_level(0);
    for x in 0..BOARD_WIDTH as i8 {
        if x != 0 {
            pf.board_mut().set(x, 1, Some(PieceKind::S));
        }
    }
    assert!(!pf.spawn(PieceKind::T));
    assert!(pf.game_over());
    assert_eq!(pf.active(), None);
    assert_eq!(pf.soft_drop(), Step::Idle);
    assert!(!pf.try_shift(1));
}

#[test]
fn test_spawn_position_is_top_center() {
    let piece = Tetromino::new(PieceKind::I);
    assert_eq!((piece.x, piece.y), (3, 0));
    assert_eq!(piece.rotation, Rotation::North);
}

#[test]
fn test_level_up_after_ten_lines() {
    let mut pf = Playfield::new(3);
    pf.start_at_level(0);

    for _ in 0..10 {
        assert!(pf.spawn(PieceKind::I));
        // Pre-fill the bottom row except where the flat I lands.
        for x in 0..BOARD_WIDTH as i8 {
            if !(3..=6).contains(&x) {
                pf.board_mut().set(x, BOTTOM, Some(PieceKind::O));
            }
        }
        let report = pf.hard_drop().expect("lock");
        assert_eq!(report.lines_cleared, 1);
    }
    assert_eq!(pf.lines(), 10);
    assert_eq!(pf.level(), 1);
}

#[test]
fn test_i_piece_kicks_off_right_wall() {
    let mut pf = fresh(PieceKind::I);
    assert!(pf.try_rotate(true));
    while pf.try_shift(1) {}
    assert!(matches!(pf.soft_drop(), Step::Moved));
    assert!(matches!(pf.soft_drop(), Step::Moved));
    let upright = pf.active().expect("active piece");
    assert_eq!((upright.rotation, upright.x, upright.y), (Rotation::East, 7, 2));

    // Flat in place would poke out past column 9; the one-left kick fits.
    assert!(pf.try_rotate(false));
    let flat = pf.active().expect("active piece");
    assert_eq!((flat.rotation, flat.x, flat.y), (Rotation::North, 6, 2));
    let cells = flat.cells();
    assert_eq!(cells.iter().map(|c| c.0).max(), Some(9));
}

#[test]
fn test_t_rotation_uses_third_kick() {
    let mut pf = fresh(PieceKind::T);
    assert!(pf.try_shift(1));
    for _ in 0..5 {
        assert!(matches!(pf.soft_drop(), Step::Moved));
    }
    let start = pf.active().expect("active piece");
    assert_eq!((start.x, start.y), (4, 5));

    // Block the unkicked East position and the one-left kick.
    pf.board_mut().set(5, 7, Some(PieceKind::Z));
    pf.board_mut().set(4, 7, Some(PieceKind::Z));

    assert!(pf.try_rotate(true));
    let kicked = pf.active().expect("active piece");
    assert_eq!((kicked.rotation, kicked.x, kicked.y), (Rotation::East, 3, 4));
    assert!(kicked.is_valid(pf.board()));
}

fn count_cells(board: &Board, kind: PieceKind) -> usize {
    let mut n = 0;
    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            if board.get(x, y) == Some(Some(kind)) {
                n += 1;
            }
        }
    }
    n
}

#[test]
fn test_clear_bottom_line_under_overhang_keeps_piece() {
    let mut pf = fresh(PieceKind::T);
    // Ledge beside the T's nose, one row above its arms.
    pf.board_mut().set(5, 0, Some(PieceKind::L));

    pf.clear_bottom_line();

    let piece = pf.active().expect("piece survives the shift");
    assert!(piece.is_valid(pf.board()));
    assert_eq!((piece.x, piece.y), (3, 1));
    assert_eq!(pf.board().get(5, 1), Some(Some(PieceKind::L)));

    let report = pf.hard_drop().expect("piece should lock");
    assert_eq!(report.kind, PieceKind::T);
    assert_eq!(count_cells(pf.board(), PieceKind::T), 4);
}

#[test]
fn test_clear_bottom_line_leaves_fitting_piece_alone() {
    let mut pf = fresh(PieceKind::S);
    pf.board_mut().set(0, BOTTOM, Some(PieceKind::J));
    let before = pf.active();

    pf.clear_bottom_line();

    assert_eq!(pf.active(), before);
    assert_eq!(pf.board().row_fill(BOTTOM as usize), 0);
}

#[test]
fn test_lock_onto_occupied_cells_ends_game_without_losing_stack() {
    let mut pf = fresh(PieceKind::O);
    let piece = pf.active().expect("active piece");
    let (x, y) = piece.cells()[0];
    pf.board_mut().set(x, y, Some(PieceKind::J));

    let report = pf.lock().expect("lock reports");
    assert!(report.game_over);
    assert_eq!(report.points, 0);
    assert!(pf.game_over());
    assert!(pf.active().is_none());
    assert_eq!(count_cells(pf.board(), PieceKind::O), 0);
    assert_eq!(count_cells(pf.board(), PieceKind::J), 1);
}
