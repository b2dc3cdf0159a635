pub mod attack_set;
pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod error;
pub mod magic;
pub mod moves;
pub mod occupancy;
pub mod state;
pub mod tables;
pub mod types;
