use rayon::prelude::*;

use crate::game::GameState;
use crate::types::*;

/// A root move in coordinate notation, `e2e4` or `e7e8q`
fn move_name(from: Square, to: Square, promotion: Option<PieceType>) -> String {
    match promotion {
        Some(pt) => format!("{from}{to}{}", pt.to_char().to_ascii_lowercase()),
        None => format!("{from}{to}"),
    }
}

fn is_promotion(state: &GameState, from: Square, to: Square) -> bool {
    state
        .piece_at(from)
        .is_some_and(|p| p.piece_type == PieceType::Pawn && to.row() == p.color.promotion_row())
}

/// Every position reachable by one full ply from `state`: a move, plus the
/// promotion choice when the move needs one.
fn children(state: &GameState) -> Vec<(String, GameState)> {
    let mut res = Vec::new();
    for (from, to) in state.legal_moves() {
        let mut next = state.clone();
        if next.apply_move(from, to).is_none() {
            continue;
        }
        if next.pending_promotion().is_none() {
            res.push((move_name(from, to, None), next));
            continue;
        }
        for piece_type in PIECES_CAN_PROMOTE_TO {
            let mut promoted = next.clone();
            if promoted.try_resolve_promotion(piece_type).is_ok() {
                res.push((move_name(from, to, Some(piece_type)), promoted));
            }
        }
    }
    res
}

/// Count the leaf nodes of the legal move tree `depth` plies deep.
///
/// Draw by material is ignored, as perft counts usually do. Promotion
/// choices are separate nodes.
pub fn perft(state: &GameState, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    if depth == 1 {
        // leaves don't need to be played out
        return state
            .legal_moves()
            .into_iter()
            .map(|(from, to)| {
                if is_promotion(state, from, to) {
                    PIECES_CAN_PROMOTE_TO.len() as u64
                } else {
                    1
                }
            })
            .sum();
    }
    children(state)
        .iter()
        .map(|(_, child)| perft(child, depth - 1))
        .sum()
}

/// Node count below each root move, sorted by move name. Root moves are
/// counted in parallel.
pub fn perft_divide(state: &GameState, depth: u8) -> Vec<(String, u64)> {
    if depth == 0 {
        return vec![];
    }
    let mut res: Vec<(String, u64)> = children(state)
        .into_par_iter()
        .map(|(name, child)| {
            let nodes = perft(&child, depth - 1);
            (name, nodes)
        })
        .collect();
    res.sort();
    res
}
