// Sudoku: grid rules, puzzle generation and the per-cell play engine.
// The engine is stateless on the server; clients send the game back with each move.

pub mod engine;
pub mod generator;
pub mod grid;
pub mod handlers;
