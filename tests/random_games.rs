//! Seeded random playouts, checking the game invariants after every ply
//!
//! Run with: cargo test --test random_games

use chess_rules::attacks::is_in_check;
use chess_rules::game::{GameState, PieceCounts};
use chess_rules::movegen::en_passant_victim;
use chess_rules::types::*;
use rand::prelude::*;

const GAMES: u64 = 8;
const MAX_PLIES: usize = 160;

fn check_invariants(state: &GameState) {
    let board = state.board();
    for color in [Color::White, Color::Black] {
        let kings = board
            .pieces_of(color)
            .filter(|(_, p)| p.piece_type == PieceType::King)
            .count();
        assert_eq!(kings, 1, "{color:?} kings in {}", state.to_fen());
    }

    assert_eq!(*state.piece_counts(), PieceCounts::from_board(board));

    let restored = GameState::from_fen(&state.to_fen()).unwrap();
    assert_eq!(&restored, state, "round trip of {}", state.to_fen());

    if state.pending_promotion().is_some() {
        assert!(!state.in_check());
        return;
    }
    assert_eq!(state.in_check(), is_in_check(board, state.side_to_move()));

    let moves = state.legal_moves();
    assert_eq!(state.has_legal_moves(), !moves.is_empty());
    for (from, to) in moves {
        let victim = en_passant_victim(board, from, to, state.last_pawn_double_step());
        let after = board.with_relocation(from, to, victim);
        assert!(
            !is_in_check(&after, state.side_to_move()),
            "{from}{to} leaves the king attacked in {}",
            state.to_fen()
        );
    }
}

fn rights_subset(after: &GameState, before: &GameState) -> bool {
    let (a, b) = (after.castling_rights(), before.castling_rights());
    (!a.white_kingside || b.white_kingside)
        && (!a.white_queenside || b.white_queenside)
        && (!a.black_kingside || b.black_kingside)
        && (!a.black_queenside || b.black_queenside)
}

fn play_random_game(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = GameState::new();

    for _ in 0..MAX_PLIES {
        check_invariants(&state);
        if state.is_terminal() {
            break;
        }

        let before = state.clone();
        if state.pending_promotion().is_some() {
            let choice = *PIECES_CAN_PROMOTE_TO.choose(&mut rng).unwrap();
            assert!(state.resolve_promotion(choice));
            continue;
        }

        let moves = state.legal_moves();
        let &(from, to) = moves.choose(&mut rng).unwrap();
        let report = state.try_move(from, to).unwrap();

        assert!(rights_subset(&state, &before));
        match report.move_flag {
            MoveFlag::DoublePawnPush => {
                assert_eq!(state.last_pawn_double_step(), Some(DoubleStep { from, to }))
            }
            _ => assert_eq!(state.last_pawn_double_step(), None),
        }
        if !report.promotion_pending {
            assert_eq!(state.side_to_move(), before.side_to_move().other_color());
            assert_eq!(report.gives_check, state.in_check());
        }
    }
}

#[test]
fn random_games_keep_invariants() {
    for seed in 0..GAMES {
        play_random_game(seed);
    }
}

#[test]
fn declined_calls_leave_the_state_alone() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut state = GameState::new();
    for _ in 0..40 {
        if state.is_terminal() {
            break;
        }
        if state.pending_promotion().is_some() {
            assert!(state.resolve_promotion(PieceType::Queen));
            continue;
        }

        // a random square pair is almost never legal
        let before = state.clone();
        let from = Square::from_index(rng.gen_range(0..64)).unwrap();
        let to = Square::from_index(rng.gen_range(0..64)).unwrap();
        if !state.legal_destinations(from).contains(&to) {
            assert!(!state.attempt_move(from, to));
            assert_eq!(state, before);
        }
        assert!(!state.resolve_promotion(PieceType::Queen));
        assert_eq!(state, before);

        let moves = state.legal_moves();
        let &(from, to) = moves.choose(&mut rng).unwrap();
        assert!(state.attempt_move(from, to));
    }
}
