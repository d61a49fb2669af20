pub mod types;
pub mod tables;
pub mod board;
pub mod error;
pub mod attacks;
pub mod movegen;
pub mod castling;
pub mod game;
pub mod fen;
pub mod perft;
