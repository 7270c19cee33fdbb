//! Perft (performance test) for move generator validation.
//!
//! Perft counts the leaf nodes of the legal move tree to a given depth.
//! The totals for well-known positions are published, so any mismatch
//! points at a bug in generation, legality filtering or move application.

use super::legal_moves_all;
use crate::Position;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves_all(position);

    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|&m| perft(&position.successor(m), depth - 1))
        .sum()
}

/// Perft with divide: the node count below each root move, sorted by the
/// move's coordinate notation.
pub fn perft_divide(position: &Position, depth: u32) -> Vec<(String, u64)> {
    let moves = legal_moves_all(position);
    let mut results: Vec<(String, u64)> = moves
        .iter()
        .map(|&m| {
            let nodes = perft(&position.successor(m), depth.saturating_sub(1));
            (m.to_uci(), nodes)
        })
        .collect();

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 0 1";

    fn nodes(fen: &str, depth: u32) -> u64 {
        perft(&Position::from_fen(fen).unwrap(), depth)
    }

    #[test]
    fn startpos_counts() {
        let position = Position::startpos();
        for (depth, expected) in [(1, 20), (2, 400), (3, 8902), (4, 197_281)] {
            assert_eq!(perft(&position, depth), expected, "depth {depth}");
        }
    }

    #[test]
    #[ignore = "slow outside release builds"]
    fn startpos_depth_5() {
        assert_eq!(perft(&Position::startpos(), 5), 4_865_609);
    }

    // Castling through attacked squares, pins, promotions
    #[test]
    fn kiwipete_counts() {
        assert_eq!(nodes(KIWIPETE, 1), 48);
        assert_eq!(nodes(KIWIPETE, 2), 2039);
        assert_eq!(nodes(KIWIPETE, 3), 97_862);
    }

    // Check evasion and horizontally pinned en passant
    #[test]
    fn position3_counts() {
        assert_eq!(nodes(POSITION_3, 1), 14);
        assert_eq!(nodes(POSITION_3, 2), 191);
        assert_eq!(nodes(POSITION_3, 3), 2812);
    }

    #[test]
    fn position4_counts() {
        assert_eq!(nodes(POSITION_4, 1), 6);
        assert_eq!(nodes(POSITION_4, 2), 264);
        assert_eq!(nodes(POSITION_4, 3), 9467);
    }

    #[test]
    fn position5_counts() {
        assert_eq!(nodes(POSITION_5, 1), 44);
        assert_eq!(nodes(POSITION_5, 2), 1486);
        assert_eq!(nodes(POSITION_5, 3), 62_379);
    }

    #[test]
    fn perft_divide_sums_to_perft() {
        let position = Position::from_fen(KIWIPETE).unwrap();
        let results = perft_divide(&position, 2);
        assert_eq!(results.len(), 48);
        let total: u64 = results.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 2039);
        assert!(results.windows(2).all(|w| w[0].0 <= w[1].0));
        assert!(results.iter().any(|(uci, _)| uci == "e1g1"));
    }
}
