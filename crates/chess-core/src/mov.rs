//! Move representation.

use crate::{PieceKind, Square};
use std::fmt;

/// Flags for special move types.
///
/// The variants are mutually exclusive: a promotion is never a double push,
/// and castling never captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    /// Normal move or capture.
    Normal = 0,
    /// Pawn double push from starting rank.
    DoublePush = 1,
    /// Kingside castling (O-O).
    CastleKingside = 2,
    /// Queenside castling (O-O-O).
    CastleQueenside = 3,
    /// En passant capture.
    EnPassant = 4,
    /// Pawn promotion to knight.
    PromoteKnight = 5,
    /// Pawn promotion to bishop.
    PromoteBishop = 6,
    /// Pawn promotion to rook.
    PromoteRook = 7,
    /// Pawn promotion to queen.
    PromoteQueen = 8,
}

impl MoveFlag {
    /// Returns the promotion flag for the given piece kind, if it is a
    /// legal promotion target.
    #[inline]
    pub const fn promotion(kind: PieceKind) -> Option<MoveFlag> {
        match kind {
            PieceKind::Knight => Some(MoveFlag::PromoteKnight),
            PieceKind::Bishop => Some(MoveFlag::PromoteBishop),
            PieceKind::Rook => Some(MoveFlag::PromoteRook),
            PieceKind::Queen => Some(MoveFlag::PromoteQueen),
            PieceKind::Pawn | PieceKind::King => None,
        }
    }

    /// Returns the promotion piece if this is a promotion move.
    #[inline]
    pub const fn promotion_piece(self) -> Option<PieceKind> {
        match self {
            MoveFlag::PromoteKnight => Some(PieceKind::Knight),
            MoveFlag::PromoteBishop => Some(PieceKind::Bishop),
            MoveFlag::PromoteRook => Some(PieceKind::Rook),
            MoveFlag::PromoteQueen => Some(PieceKind::Queen),
            _ => None,
        }
    }

    /// Returns true if this is a promotion move.
    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion_piece().is_some()
    }

    /// Returns true if this is a castling move.
    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveFlag::CastleKingside | MoveFlag::CastleQueenside)
    }
}

/// A chess move: source, destination and special-move flag.
///
/// Moves are plain values. The flag is set by the move generator; a move
/// built by hand (for instance from coordinate notation) only matches a
/// generated move when its flag agrees.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    flag: MoveFlag,
}

impl Move {
    /// Creates a new move.
    #[inline]
    pub const fn new(from: Square, to: Square, flag: MoveFlag) -> Self {
        Move { from, to, flag }
    }

    /// Creates a normal move (no special flags).
    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveFlag::Normal)
    }

    /// Creates a promotion move. Returns `None` for pawn or king targets.
    #[inline]
    pub const fn promoting(from: Square, to: Square, kind: PieceKind) -> Option<Self> {
        match MoveFlag::promotion(kind) {
            Some(flag) => Some(Self::new(from, to, flag)),
            None => None,
        }
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    /// Returns the move flag.
    #[inline]
    pub const fn flag(self) -> MoveFlag {
        self.flag
    }

    /// Returns the piece a pawn promotes to, if any.
    #[inline]
    pub const fn promotion(self) -> Option<PieceKind> {
        self.flag.promotion_piece()
    }

    /// Returns true for either castling move.
    #[inline]
    pub const fn is_castle(self) -> bool {
        self.flag.is_castling()
    }

    /// Returns true for an en passant capture.
    #[inline]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.flag, MoveFlag::EnPassant)
    }

    /// Returns true for a two-square pawn advance.
    #[inline]
    pub const fn is_double_push(self) -> bool {
        matches!(self.flag, MoveFlag::DoublePush)
    }

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        match self.promotion() {
            Some(kind) => format!(
                "{}{}{}",
                self.from,
                self.to,
                kind.letter().to_ascii_lowercase()
            ),
            None => format!("{}{}", self.from, self.to),
        }
    }

    /// Parses a move from UCI notation.
    ///
    /// Only the promotion flag can be read from the text. Double pushes,
    /// castling and en passant are recovered by matching against the legal
    /// moves of a position.
    pub fn from_uci(s: &str) -> Option<Self> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        match s[4..].chars().next() {
            Some(c) => Move::promoting(from, to, PieceKind::from_letter(c)?),
            None => Some(Move::normal(from, to)),
        }
    }

    /// A placeholder move, never legal.
    pub const NULL: Move = Move::normal(Square::A1, Square::A1);
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}, {:?})", self.to_uci(), self.flag)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, Rank};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn move_accessors() {
        let m = Move::new(sq("e2"), sq("e4"), MoveFlag::DoublePush);
        assert_eq!(m.from(), Square::new(File::E, Rank::R2));
        assert_eq!(m.to(), Square::new(File::E, Rank::R4));
        assert!(m.is_double_push());
        assert!(!m.is_castle());
        assert!(!m.is_en_passant());
        assert_eq!(m.promotion(), None);
    }

    #[test]
    fn move_uci() {
        assert_eq!(Move::normal(sq("e2"), sq("e4")).to_uci(), "e2e4");
        let promo = Move::promoting(sq("e7"), sq("e8"), PieceKind::Queen).unwrap();
        assert_eq!(promo.to_uci(), "e7e8q");
        let under = Move::promoting(sq("a2"), sq("a1"), PieceKind::Knight).unwrap();
        assert_eq!(under.to_uci(), "a2a1n");
    }

    #[test]
    fn move_from_uci() {
        let m = Move::from_uci("e2e4").unwrap();
        assert_eq!(m.from(), sq("e2"));
        assert_eq!(m.to(), sq("e4"));
        assert_eq!(m.flag(), MoveFlag::Normal);

        assert_eq!(
            Move::from_uci("e7e8q").unwrap().promotion(),
            Some(PieceKind::Queen)
        );
        assert_eq!(
            Move::from_uci("e7e8N").unwrap().promotion(),
            Some(PieceKind::Knight)
        );

        assert!(Move::from_uci("invalid").is_none());
        assert!(Move::from_uci("e2e9").is_none());
        assert!(Move::from_uci("e7e8k").is_none());
        assert!(Move::from_uci("e7e8x").is_none());
        assert!(Move::from_uci("e2").is_none());
        assert!(Move::from_uci("e2e4qq").is_none());
    }

    #[test]
    fn promoting_rejects_pawn_and_king() {
        assert!(Move::promoting(sq("e7"), sq("e8"), PieceKind::King).is_none());
        assert!(Move::promoting(sq("e7"), sq("e8"), PieceKind::Pawn).is_none());
    }

    #[test]
    fn move_flag_queries() {
        assert!(MoveFlag::CastleKingside.is_castling());
        assert!(MoveFlag::CastleQueenside.is_castling());
        assert!(!MoveFlag::EnPassant.is_castling());
        assert!(MoveFlag::PromoteRook.is_promotion());
        assert!(!MoveFlag::DoublePush.is_promotion());
        assert_eq!(
            MoveFlag::PromoteBishop.promotion_piece(),
            Some(PieceKind::Bishop)
        );
    }

    #[test]
    fn move_debug_display() {
        let m = Move::normal(sq("e2"), sq("e4"));
        assert_eq!(format!("{}", m), "e2e4");
        assert_eq!(format!("{:?}", m), "Move(e2e4, Normal)");
    }
}
