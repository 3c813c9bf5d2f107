//! Pieces module - Tetromino shapes and SRS rotation system
//!
//! Shapes are mino offsets inside each piece's bounding box, with y growing
//! downward. Rotation uses the Super Rotation System kick tables, converted
//! from the usual y-up notation into board coordinates.
//! Reference: https://tetris.wiki/Super_Rotation_System

use crate::types::{PieceKind, Rotation};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

/// Spawn position for new pieces (x, y)
pub const SPAWN_POSITION: (i8, i8) = (3, 0);

/// Shapes indexed by `[kind][rotation]`, rotation in N, E, S, W order.
const SHAPES: [[PieceShape; 4]; 7] = [
    // I
    [
        [(0, 1), (1, 1), (2, 1), (3, 1)],
        [(2, 0), (2, 1), (2, 2), (2, 3)],
        [(0, 2), (1, 2), (2, 2), (3, 2)],
        [(1, 0), (1, 1), (1, 2), (1, 3)],
    ],
    // O
    [[(1, 0), (2, 0), (1, 1), (2, 1)]; 4],
    // T
    [
        [(1, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (1, 2)],
        [(1, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // S
    [
        [(1, 0), (2, 0), (0, 1), (1, 1)],
        [(1, 0), (1, 1), (2, 1), (2, 2)],
        [(1, 1), (2, 1), (0, 2), (1, 2)],
        [(0, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // Z
    [
        [(0, 0), (1, 0), (1, 1), (2, 1)],
        [(2, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (1, 2), (2, 2)],
        [(1, 0), (0, 1), (1, 1), (0, 2)],
    ],
    // J
    [
        [(0, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (2, 2)],
        [(1, 0), (1, 1), (0, 2), (1, 2)],
    ],
    // L
    [
        [(2, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 2)],
        [(0, 1), (1, 1), (2, 1), (0, 2)],
        [(0, 0), (1, 0), (1, 1), (1, 2)],
    ],
];

fn kind_index(kind: PieceKind) -> usize {
    match kind {
        PieceKind::I => 0,
        PieceKind::O => 1,
        PieceKind::T => 2,
        PieceKind::S => 3,
        PieceKind::Z => 4,
        PieceKind::J => 5,
        PieceKind::L => 6,
    }
}

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    SHAPES[kind_index(kind)][rotation.index() as usize]
}

/// Absolute board cells of a piece whose origin is at (x, y).
pub fn cells_at(kind: PieceKind, rotation: Rotation, x: i8, y: i8) -> PieceShape {
    get_shape(kind, rotation).map(|(dx, dy)| (x + dx, y + dy))
}

/// Kick offsets to try, in order; the first entry is the unkicked rotation.
pub type KickTable = [[(i8, i8); 5]; 8];

/// J, L, S, T, Z kicks. Rows: N→E, N→W, E→N, E→S, S→E, S→W, W→S, W→N.
const JLSTZ_KICKS: KickTable = [
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
];

/// I kicks, same row order as [`JLSTZ_KICKS`].
const I_KICKS: KickTable = [
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
];

/// O never kicks.
const O_KICKS: KickTable = [[(0, 0); 5]; 8];

pub fn get_kick_table(kind: PieceKind) -> &'static KickTable {
    match kind {
        PieceKind::O => &O_KICKS,
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    }
}

fn kick_row(from: Rotation, clockwise: bool) -> usize {
    match (from, clockwise) {
        (Rotation::North, true) => 0,
        (Rotation::North, false) => 1,
        (Rotation::East, false) => 2,
        (Rotation::East, true) => 3,
        (Rotation::South, false) => 4,
        (Rotation::South, true) => 5,
        (Rotation::West, false) => 6,
        (Rotation::West, true) => 7,
    }
}

/// Try to rotate a piece with wall kicks
///
/// Returns the new rotation and the kick applied to the origin, or `None`
/// when the unkicked rotation and every kick collide. O pieces never rotate.
pub fn try_rotate(
    kind: PieceKind,
    rotation: Rotation,
    x: i8,
    y: i8,
    clockwise: bool,
    is_valid: impl Fn(i8, i8) -> bool,
) -> Option<(Rotation, (i8, i8))> {
    if kind == PieceKind::O {
        return None;
    }

    let new_rotation = if clockwise {
        rotation.rotate_cw()
    } else {
        rotation.rotate_ccw()
    };
    let new_shape = get_shape(kind, new_rotation);
    let kicks = &get_kick_table(kind)[kick_row(rotation, clockwise)];

    kicks
        .iter()
        .copied()
        .find(|&(dx, dy)| {
            new_shape
                .iter()
                .all(|&(mx, my)| is_valid(x + dx + mx, y + dy + my))
        })
        .map(|kick| (new_rotation, kick))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shape_has_four_distinct_minos_inside_4x4_box() {
        for kind in PieceKind::ALL {
            for rot in [Rotation::North, Rotation::East, Rotation::South, Rotation::West] {
                let shape = get_shape(kind, rot);
                for (i, a) in shape.iter().enumerate() {
                    assert!((0..4).contains(&a.0) && (0..4).contains(&a.1));
                    assert!(shape[i + 1..].iter().all(|b| b != a), "{kind:?} {rot:?}");
                }
            }
        }
    }

    #[test]
    fn kicks_start_with_identity() {
        for kind in PieceKind::ALL {
            assert!(get_kick_table(kind).iter().all(|row| row[0] == (0, 0)));
        }
    }

    #[test]
    fn jlstz_cw_and_back_ccw_kicks_are_opposite() {
        // N→E row and E→N row are negations of each other in SRS.
        for (a, b) in JLSTZ_KICKS[0].iter().zip(JLSTZ_KICKS[2].iter()) {
            assert_eq!((a.0, a.1), (-b.0, -b.1));
        }
        for (a, b) in I_KICKS[0].iter().zip(I_KICKS[2].iter()) {
            assert_eq!((a.0, a.1), (-b.0, -b.1));
        }
    }
}
