// Chess against a random-move bot. The player is White; the bot answers
// every legal White move with a uniformly random legal Black move.
// Stateless like Sudoku: the client keeps the FEN and sends it with each move.

pub mod engine;
pub mod handlers;
