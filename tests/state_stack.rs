//! Integration tests for saving and restoring position state around moves
//!
//! Run with: cargo test --test state_stack

use magic_movegen::attacks::AttackGenerator;
use magic_movegen::bitboard::pos_to_sq;
use magic_movegen::board::Board;
use magic_movegen::error::StateError;
use magic_movegen::moves::{encode_pawn_move, MoveKind};
use magic_movegen::state::{GameState, StateFlags};
use magic_movegen::tables::PRECOMPUTED_TABLES;
use magic_movegen::types::Color;
use pretty_assertions::assert_eq;

#[test]
fn save_mutate_all_flags_restore() {
    let mut state = GameState::new();
    state.flags = StateFlags {
        white_king_moved: true,
        black_kingside_rook_moved: true,
        ..Default::default()
    };
    state.en_passant = Some(pos_to_sq(6, 3));
    let flags_before = state.flags;
    let depth_before = state.depth();

    state.save_state();
    state.flags = StateFlags::unpack(!flags_before.pack());
    state.en_passant = None;

    state.restore_state().unwrap();
    assert_eq!(state.flags, flags_before);
    assert_eq!(state.en_passant, Some(pos_to_sq(6, 3)));
    assert_eq!(state.depth(), depth_before);
    assert_eq!(state.restore_state(), Err(StateError::Underflow));
}

#[test]
fn double_push_en_passant_round_trip() {
    let mut board = Board::new();
    let mut state = GameState::new();

    // 1. e4
    let e2 = pos_to_sq(2, 5);
    let e4 = pos_to_sq(4, 5);
    let white = encode_pawn_move(&board, e2, e4).unwrap();
    assert_eq!(white.moves[0].kind(), Some(MoveKind::DoublePawnPush));
    state.save_state();
    board.move_piece(e2, e4).unwrap();
    state.en_passant = white.en_passant;
    assert_eq!(state.en_passant, Some(pos_to_sq(3, 5)));

    // 1... d5 2. e5 f5: the f6 target is open to the e5 pawn
    let d7 = pos_to_sq(7, 4);
    let d5 = pos_to_sq(5, 4);
    let reply = encode_pawn_move(&board, d7, d5).unwrap();
    state.save_state();
    board.move_piece(d7, d5).unwrap();
    state.en_passant = reply.en_passant;
    assert_eq!(state.en_passant, Some(pos_to_sq(6, 4)));

    let e5 = pos_to_sq(5, 5);
    state.save_state();
    board.move_piece(e4, e5).unwrap();
    state.en_passant = None;

    let f7 = pos_to_sq(7, 6);
    let f5 = pos_to_sq(5, 6);
    let black = encode_pawn_move(&board, f7, f5).unwrap();
    state.save_state();
    board.move_piece(f7, f5).unwrap();
    state.en_passant = black.en_passant;
    assert_eq!(state.en_passant, Some(pos_to_sq(6, 6)));

    let gen = AttackGenerator::new(&PRECOMPUTED_TABLES, &board);
    assert_eq!(gen.en_passant(Color::White, state.en_passant), 1u64 << pos_to_sq(6, 6));
    assert_eq!(gen.en_passant(Color::Black, state.en_passant), 0);

    let take = encode_pawn_move(&board, e5, pos_to_sq(6, 6)).unwrap();
    assert_eq!(take.moves[0].kind(), Some(MoveKind::EnPassantCapture));

    assert_eq!(state.depth(), 4);
    state.restore_state().unwrap();
    assert_eq!(state.en_passant, None);
    state.restore_state().unwrap();
    assert_eq!(state.en_passant, Some(pos_to_sq(6, 4)));
    state.restore_state().unwrap();
    assert_eq!(state.en_passant, Some(pos_to_sq(3, 5)));
    state.restore_state().unwrap();
    assert_eq!(state.en_passant, None);
    assert_eq!(state.depth(), 0);
    assert!(board.is_consistent());
}
