//! Move notation at the text boundary.
//!
//! Two formats are understood:
//!
//! - Coordinate notation: `e2e4`, `e7e8q`. A promotion without a suffix
//!   promotes to a queen.
//! - Standard Algebraic Notation (SAN): `e4`, `Nf3`, `Bxc6`, `O-O`, `e8=Q`,
//!   `Nbd2`, `R1e1`, with optional `+`/`#` suffixes.
//!
//! Parsing always resolves against the legal moves of a position, so the
//! returned [`Move`] carries the correct flags.

use crate::movegen::{has_legal_move, legal_moves_all};
use crate::Position;
use chess_core::{File, Move, MoveFlag, PieceKind, Rank, Square};
use thiserror::Error;

/// Errors produced while reading a move from text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("empty move text")]
    Empty,

    #[error("invalid move format: {0}")]
    InvalidFormat(String),

    #[error("no legal move matches: {0}")]
    NoMatchingMove(String),

    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
}

/// Resolves coordinate notation against the legal moves of the position.
pub fn parse_coordinate(position: &Position, text: &str) -> Result<Move, NotationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(NotationError::Empty);
    }
    let wanted =
        Move::from_uci(text).ok_or_else(|| NotationError::InvalidFormat(text.to_string()))?;
    let promotion = wanted.promotion().or(Some(PieceKind::Queen));

    legal_moves_all(position)
        .iter()
        .copied()
        .find(|m| {
            m.from() == wanted.from()
                && m.to() == wanted.to()
                && (!m.flag().is_promotion() || m.promotion() == promotion)
        })
        .ok_or_else(|| NotationError::NoMatchingMove(text.to_string()))
}

/// Reads a move in either coordinate notation or SAN.
pub fn parse_move(position: &Position, text: &str) -> Result<Move, NotationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(NotationError::Empty);
    }
    if Move::from_uci(text).is_some() {
        parse_coordinate(position, text)
    } else {
        san_to_move(position, text)
    }
}

/// Converts a legal move to SAN, given the position before the move.
///
/// A move whose source square is empty cannot be described in SAN and is
/// written in coordinate notation instead.
pub fn move_to_san(position: &Position, m: Move) -> String {
    let Some(piece) = position.piece_at(m.from()) else {
        return m.to_uci();
    };

    let mut san = match m.flag() {
        MoveFlag::CastleKingside => String::from("O-O"),
        MoveFlag::CastleQueenside => String::from("O-O-O"),
        _ => {
            let mut san = String::new();
            let is_capture = position.piece_at(m.to()).is_some() || m.is_en_passant();

            if piece.kind == PieceKind::Pawn {
                if is_capture {
                    san.push(m.from().file().to_char());
                }
            } else {
                san.push(piece.kind.letter());
                san.push_str(&disambiguation(position, m, piece.kind));
            }
            if is_capture {
                san.push('x');
            }
            san.push_str(&m.to().to_algebraic());
            if let Some(kind) = m.promotion() {
                san.push('=');
                san.push(kind.letter());
            }
            san
        }
    };

    let next = position.successor(m);
    if next.is_in_check() {
        san.push(if has_legal_move(&next) { '+' } else { '#' });
    }
    san
}

/// The file, rank or square prefix needed to tell `m` apart from other
/// pieces of the same kind that can reach the same square.
fn disambiguation(position: &Position, m: Move, kind: PieceKind) -> String {
    let from = m.from();
    let rivals: Vec<Square> = legal_moves_all(position)
        .iter()
        .filter(|o| o.to() == m.to() && o.from() != from)
        .filter(|o| matches!(position.piece_at(o.from()), Some(p) if p.kind == kind))
        .map(|o| o.from())
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|sq| sq.file() != from.file()) {
        from.file().to_char().to_string()
    } else if rivals.iter().all(|sq| sq.rank() != from.rank()) {
        from.rank().to_char().to_string()
    } else {
        from.to_algebraic()
    }
}

/// Components of a SAN move before it is matched to a legal move.
#[derive(Debug)]
struct SanParts {
    kind: PieceKind,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to: Square,
    promotion: Option<PieceKind>,
}

/// Parses SAN and returns the matching legal move.
///
/// A pawn reaching the last rank without a promotion piece promotes to a
/// queen.
pub fn san_to_move(position: &Position, san: &str) -> Result<Move, NotationError> {
    let text = san.trim();
    if text.is_empty() {
        return Err(NotationError::Empty);
    }
    let body = text.trim_end_matches(['+', '#', '!', '?']);

    let castle = match body {
        "O-O" | "0-0" => Some(MoveFlag::CastleKingside),
        "O-O-O" | "0-0-0" => Some(MoveFlag::CastleQueenside),
        _ => None,
    };
    if let Some(flag) = castle {
        return legal_moves_all(position)
            .iter()
            .copied()
            .find(|m| m.flag() == flag)
            .ok_or_else(|| NotationError::NoMatchingMove(text.to_string()));
    }

    let parts = split_san(body).ok_or_else(|| NotationError::InvalidFormat(text.to_string()))?;
    let promotion = match parts.promotion {
        Some(kind) => Some(kind),
        None if parts.kind == PieceKind::Pawn => Some(PieceKind::Queen),
        None => None,
    };

    let candidates: Vec<Move> = legal_moves_all(position)
        .iter()
        .copied()
        .filter(|m| m.to() == parts.to)
        .filter(|m| matches!(position.piece_at(m.from()), Some(p) if p.kind == parts.kind))
        .filter(|m| parts.from_file.map_or(true, |f| m.from().file() == f))
        .filter(|m| parts.from_rank.map_or(true, |r| m.from().rank() == r))
        .filter(|m| !m.flag().is_promotion() || m.promotion() == promotion)
        .collect();

    match candidates.as_slice() {
        [] => Err(NotationError::NoMatchingMove(text.to_string())),
        [m] => Ok(*m),
        _ => Err(NotationError::AmbiguousMove(text.to_string())),
    }
}

fn split_san(body: &str) -> Option<SanParts> {
    let mut chars: Vec<char> = body.chars().filter(|&c| c != 'x' && c != '-').collect();

    let kind = match chars.first() {
        Some(&c) if c.is_ascii_uppercase() => {
            let kind = PieceKind::from_letter(c)?;
            chars.remove(0);
            kind
        }
        _ => PieceKind::Pawn,
    };

    // Trailing promotion piece, with or without '='
    let mut promotion = None;
    if let Some(&last) = chars.last() {
        if last.is_ascii_uppercase() {
            let promo = PieceKind::from_letter(last).filter(|k| k.is_promotion_target())?;
            promotion = Some(promo);
            chars.pop();
            if chars.last() == Some(&'=') {
                chars.pop();
            }
        }
    }

    if chars.len() < 2 || chars.len() > 4 {
        return None;
    }
    let (prefix, dest) = chars.split_at(chars.len() - 2);
    let to = Square::new(File::from_char(dest[0])?, Rank::from_char(dest[1])?);

    let (from_file, from_rank) = match prefix {
        [] => (None, None),
        [c] => match (File::from_char(*c), Rank::from_char(*c)) {
            (Some(f), _) => (Some(f), None),
            (None, Some(r)) => (None, Some(r)),
            (None, None) => return None,
        },
        [f, r] => (Some(File::from_char(*f)?), Some(Rank::from_char(*r)?)),
        _ => return None,
    };
    // A pawn named without a source file pushes straight ahead
    let from_file = match (kind, from_file) {
        (PieceKind::Pawn, None) => Some(to.file()),
        _ => from_file,
    };

    Some(SanParts {
        kind,
        from_file,
        from_rank,
        to,
        promotion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn san_of(fen: &str, uci: &str) -> String {
        let pos = Position::from_fen(fen).unwrap();
        let m = parse_coordinate(&pos, uci).unwrap();
        move_to_san(&pos, m)
    }

    #[test]
    fn san_for_simple_moves() {
        let start = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert_eq!(san_of(start, "e2e4"), "e4");
        assert_eq!(san_of(start, "g1f3"), "Nf3");
    }

    #[test]
    fn san_for_captures() {
        let fen = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2";
        assert_eq!(san_of(fen, "e4d5"), "exd5");

        let ep = "rnbqkbnr/pppp1ppp/8/4pP2/8/8/PPPPP1PP/RNBQKBNR w KQkq e6 0 3";
        assert_eq!(san_of(ep, "f5e6"), "fxe6");
    }

    #[test]
    fn san_for_castling_and_promotion() {
        let fen = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1";
        assert_eq!(san_of(fen, "e1g1"), "O-O");
        assert_eq!(san_of(fen, "e1c1"), "O-O-O");

        let promo = "8/P7/8/8/8/8/8/4K1k1 w - - 0 1";
        assert_eq!(san_of(promo, "a7a8"), "a8=Q");
        assert_eq!(san_of(promo, "a7a8n"), "a8=N");
    }

    #[test]
    fn san_disambiguation() {
        // Knights on b1 and f1 both reach d2
        assert_eq!(san_of("8/8/8/8/8/8/8/1N1K1N1k w - - 0 1", "b1d2"), "Nbd2");
        // Rooks on a1 and a5 both reach a3
        assert_eq!(san_of("7k/8/8/R7/8/8/8/R3K3 w - - 0 1", "a1a3"), "R1a3");
        // Queens on a1, a3 and c1 all reach b2
        assert_eq!(san_of("6k1/8/8/8/8/Q7/8/Q1Q1K3 w - - 0 1", "a1b2"), "Qa1b2");
    }

    #[test]
    fn san_check_and_mate_marks() {
        assert_eq!(san_of("7k/8/8/8/8/8/8/4K1Q1 w - - 0 1", "g1h2"), "Qh2+");
        assert_eq!(san_of("6k1/5ppp/8/8/8/8/8/R3K3 w Q - 0 1", "a1a8"), "Ra8#");
    }

    #[test]
    fn parse_san_moves() {
        let pos = Position::startpos();
        let m = san_to_move(&pos, "e4").unwrap();
        assert!(m.is_double_push());
        let m = san_to_move(&pos, "Nf3").unwrap();
        assert_eq!((m.from(), m.to()), (Square::G1, sq("f3")));

        let castle = Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1")
            .unwrap();
        assert_eq!(
            san_to_move(&castle, "O-O").unwrap().flag(),
            MoveFlag::CastleKingside
        );
        assert_eq!(
            san_to_move(&castle, "0-0-0").unwrap().flag(),
            MoveFlag::CastleQueenside
        );

        let check = Position::from_fen("7k/8/8/8/8/8/8/4K1Q1 w - - 0 1").unwrap();
        assert_eq!(san_to_move(&check, "Qh2+").unwrap().to(), sq("h2"));
    }

    #[test]
    fn parse_san_promotion_defaults_to_queen() {
        let pos = Position::from_fen("8/P7/8/8/8/8/8/4K1k1 w - - 0 1").unwrap();
        assert_eq!(san_to_move(&pos, "a8").unwrap().promotion(), Some(PieceKind::Queen));
        assert_eq!(san_to_move(&pos, "a8=R").unwrap().promotion(), Some(PieceKind::Rook));
        assert_eq!(san_to_move(&pos, "a8N").unwrap().promotion(), Some(PieceKind::Knight));
        assert!(san_to_move(&pos, "a8=K").is_err());
    }

    #[test]
    fn parse_san_errors() {
        let pos = Position::startpos();
        assert_eq!(san_to_move(&pos, "  "), Err(NotationError::Empty));
        assert!(matches!(
            san_to_move(&pos, "Ke4"),
            Err(NotationError::NoMatchingMove(_))
        ));
        assert!(matches!(
            san_to_move(&pos, "xyz"),
            Err(NotationError::InvalidFormat(_))
        ));

        let two_knights = Position::from_fen("8/8/8/8/8/8/8/1N1K1N1k w - - 0 1").unwrap();
        assert!(matches!(
            san_to_move(&two_knights, "Nd2"),
            Err(NotationError::AmbiguousMove(_))
        ));
        assert!(san_to_move(&two_knights, "Nfd2").is_ok());
    }

    #[test]
    fn coordinate_notation_resolves_flags() {
        let pos = Position::startpos();
        assert!(parse_coordinate(&pos, "e2e4").unwrap().is_double_push());
        assert!(matches!(
            parse_coordinate(&pos, "e2e5"),
            Err(NotationError::NoMatchingMove(_))
        ));
        assert!(matches!(
            parse_coordinate(&pos, "e2"),
            Err(NotationError::InvalidFormat(_))
        ));

        let castle = Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1")
            .unwrap();
        assert!(parse_coordinate(&castle, "e1g1").unwrap().is_castle());
    }

    #[test]
    fn parse_move_accepts_both_formats() {
        let pos = Position::startpos();
        assert_eq!(parse_move(&pos, "g1f3"), parse_move(&pos, "Nf3"));
        assert_eq!(parse_move(&pos, ""), Err(NotationError::Empty));
    }

    #[test]
    fn san_of_every_opening_move_parses_back() {
        let pos = Position::startpos();
        for &m in legal_moves_all(&pos).iter() {
            let san = move_to_san(&pos, m);
            assert_eq!(san_to_move(&pos, &san), Ok(m), "{san}");
        }
    }
}
