//! Attack patterns and the attack map.
//!
//! Leapers (knight, king, pawn captures) use tables computed at compile
//! time. Sliders walk each of their rays until the first occupied square,
//! which is included whatever its color: a piece defends its own men too.

use crate::{Board, SquareSet};
use chess_core::{Color, Piece, PieceKind, Square};

/// Orthogonal ray directions as (file, rank) deltas.
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Diagonal ray directions as (file, rank) deltas.
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Queen rays: the union of rook and bishop directions.
pub const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = QUEEN_DIRECTIONS;

/// Precomputed knight attack tables.
const KNIGHT_ATTACKS: [SquareSet; 64] = compute_leaper_attacks(&KNIGHT_OFFSETS);

/// Precomputed king attack tables.
const KING_ATTACKS: [SquareSet; 64] = compute_leaper_attacks(&KING_OFFSETS);

/// Precomputed pawn capture tables [color][square].
const PAWN_ATTACKS: [[SquareSet; 64]; 2] = [
    compute_leaper_attacks(&[(-1, 1), (1, 1)]),
    compute_leaper_attacks(&[(-1, -1), (1, -1)]),
];

/// Returns knight attacks from the given square.
#[inline]
pub fn knight_attacks(sq: Square) -> SquareSet {
    KNIGHT_ATTACKS[sq.index() as usize]
}

/// Returns king attacks from the given square (castling excluded).
#[inline]
pub fn king_attacks(sq: Square) -> SquareSet {
    KING_ATTACKS[sq.index() as usize]
}

/// Returns the two diagonal squares a pawn of `color` attacks from `sq`.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> SquareSet {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

/// Walks each ray from `from` and collects every square up to and
/// including the first occupied one.
pub fn ray_attacks(board: &Board, from: Square, directions: &[(i8, i8)]) -> SquareSet {
    let mut attacks = SquareSet::EMPTY;
    for &(df, dr) in directions {
        let mut current = from.offset(df, dr);
        while let Some(sq) = current {
            attacks.insert(sq);
            if board.piece_at(sq).is_some() {
                break;
            }
            current = sq.offset(df, dr);
        }
    }
    attacks
}

/// Returns the squares a piece standing on `sq` attacks.
///
/// Pawns attack only their two forward diagonals, never the push square.
pub fn piece_attacks(board: &Board, sq: Square, piece: Piece) -> SquareSet {
    match piece.kind {
        PieceKind::Pawn => pawn_attacks(sq, piece.color),
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::Bishop => ray_attacks(board, sq, &BISHOP_DIRECTIONS),
        PieceKind::Rook => ray_attacks(board, sq, &ROOK_DIRECTIONS),
        PieceKind::Queen => ray_attacks(board, sq, &QUEEN_DIRECTIONS),
        PieceKind::King => king_attacks(sq),
    }
}

/// Returns every square attacked by at least one piece of `by_color`.
///
/// This depends only on the board and the color; whose turn it is plays
/// no part.
pub fn attacked_squares(board: &Board, by_color: Color) -> SquareSet {
    let mut attacked = SquareSet::EMPTY;
    for (sq, piece) in board.pieces_of(by_color) {
        attacked |= piece_attacks(board, sq, piece);
    }
    attacked
}

/// Returns true if the given square is attacked by the given color.
///
/// Equivalent to `attacked_squares(board, by_color).contains(sq)`, but
/// looks outward from the target instead of building the whole map.
pub fn is_square_attacked(board: &Board, sq: Square, by_color: Color) -> bool {
    let holds = |target: Square, kinds: &[PieceKind]| {
        matches!(board.piece_at(target), Some(p) if p.color == by_color && kinds.contains(&p.kind))
    };

    // A pawn of `by_color` attacks `sq` from where a pawn of the other color
    // on `sq` would attack.
    if pawn_attacks(sq, by_color.opposite())
        .iter()
        .any(|from| holds(from, &[PieceKind::Pawn]))
    {
        return true;
    }
    if knight_attacks(sq)
        .iter()
        .any(|from| holds(from, &[PieceKind::Knight]))
    {
        return true;
    }
    if king_attacks(sq)
        .iter()
        .any(|from| holds(from, &[PieceKind::King]))
    {
        return true;
    }
    if ray_attacks(board, sq, &BISHOP_DIRECTIONS)
        .iter()
        .any(|from| holds(from, &[PieceKind::Bishop, PieceKind::Queen]))
    {
        return true;
    }
    ray_attacks(board, sq, &ROOK_DIRECTIONS)
        .iter()
        .any(|from| holds(from, &[PieceKind::Rook, PieceKind::Queen]))
}

/// Returns true if the king of the given color is attacked.
///
/// A board without that king is never in check.
pub fn is_king_attacked(board: &Board, king_color: Color) -> bool {
    match board.king_square(king_color) {
        Some(king_sq) => is_square_attacked(board, king_sq, king_color.opposite()),
        None => false,
    }
}

/// Computes leaper attacks for all squares at compile time.
const fn compute_leaper_attacks(offsets: &[(i8, i8)]) -> [SquareSet; 64] {
    let mut attacks = [SquareSet::EMPTY; 64];
    let mut sq = 0u8;

    while sq < 64 {
        let rank = (sq / 8) as i8;
        let file = (sq % 8) as i8;
        let mut bits = 0u64;

        let mut i = 0;
        while i < offsets.len() {
            let (df, dr) = offsets[i];
            let (f, r) = (file + df, rank + dr);
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                bits |= 1u64 << (r * 8 + f);
            }
            i += 1;
        }

        attacks[sq as usize] = SquareSet::from_bits(bits);
        sq += 1;
    }

    attacks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;
    use chess_core::{File, Rank};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn knight_attacks_center_corner_edge() {
        assert_eq!(knight_attacks(sq("d4")).len(), 8);
        assert_eq!(knight_attacks(Square::A1).len(), 2);
        assert_eq!(knight_attacks(sq("a4")).len(), 4);

        let attacks = knight_attacks(sq("e4"));
        for target in ["d6", "f6", "g5", "g3", "f2", "d2", "c3", "c5"] {
            assert!(attacks.contains(sq(target)), "missing {}", target);
        }
    }

    #[test]
    fn king_attacks_center_corner_edge() {
        assert_eq!(king_attacks(sq("d4")).len(), 8);
        assert_eq!(king_attacks(Square::A1).len(), 3);
        assert_eq!(king_attacks(sq("a4")).len(), 5);
    }

    #[test]
    fn pawn_attacks_by_color() {
        let white = pawn_attacks(sq("d4"), Color::White);
        assert_eq!(white.len(), 2);
        assert!(white.contains(sq("c5")));
        assert!(white.contains(sq("e5")));

        let black = pawn_attacks(sq("d4"), Color::Black);
        assert!(black.contains(sq("c3")));
        assert!(black.contains(sq("e3")));

        assert_eq!(pawn_attacks(sq("a4"), Color::White).len(), 1);
        assert!(pawn_attacks(Square::new(File::D, Rank::R8), Color::White).is_empty());
    }

    #[test]
    fn rays_stop_at_first_blocker() {
        let position = Position::from_fen("8/8/8/3p4/8/3R2P1/8/4K2k w - - 0 1").unwrap();
        let attacks = ray_attacks(position.board(), sq("d3"), &ROOK_DIRECTIONS);
        // Up the file: d4, then the enemy pawn on d5 and nothing beyond
        assert!(attacks.contains(sq("d4")));
        assert!(attacks.contains(sq("d5")));
        assert!(!attacks.contains(sq("d6")));
        // Along the rank the own pawn on g3 is included as a defended square
        assert!(attacks.contains(sq("g3")));
        assert!(!attacks.contains(sq("h3")));
        // Down to the edge
        assert!(attacks.contains(sq("d1")));
    }

    #[test]
    fn attacked_squares_startpos() {
        let position = Position::startpos();
        let white = attacked_squares(position.board(), Color::White);
        // Every third-rank square is covered by a pawn or knight
        for file in File::ALL {
            assert!(white.contains(Square::new(file, Rank::R3)));
        }
        assert!(!white.contains(sq("e4")));
        // Pawn push squares are not attacks
        let black = attacked_squares(position.board(), Color::Black);
        assert!(!black.contains(sq("e5")));
        assert!(black.contains(sq("e6")));
    }

    #[test]
    fn reverse_lookup_agrees_with_attack_map() {
        let position = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        for color in Color::BOTH {
            let map = attacked_squares(position.board(), color);
            for target in Square::all() {
                assert_eq!(
                    map.contains(target),
                    is_square_attacked(position.board(), target, color),
                    "{} attack on {}",
                    color,
                    target
                );
            }
        }
    }

    #[test]
    fn king_attacked() {
        let position = Position::startpos();
        assert!(!is_king_attacked(position.board(), Color::White));
        assert!(!is_king_attacked(position.board(), Color::Black));

        let checked = Position::from_fen("4k3/8/8/8/8/8/8/4K2r w - - 0 1").unwrap();
        assert!(is_king_attacked(checked.board(), Color::White));
    }
}
