// Browser mini-games backed by pure engines.

pub mod chess;
pub mod sudoku;
