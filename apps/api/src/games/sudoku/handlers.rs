//! Axum route handlers for the Sudoku game.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::games::sudoku::engine::{Difficulty, DigitOutcome, SudokuError, SudokuGame};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewGameQuery {
    #[serde(default)]
    pub difficulty: Difficulty,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub game: SudokuGame,
    pub row: usize,
    pub col: usize,
    pub digit: u8,
}

#[derive(Debug, Serialize)]
pub struct MoveResponse {
    pub game: SudokuGame,
    pub outcome: DigitOutcome,
}

impl From<SudokuError> for AppError {
    fn from(e: SudokuError) -> Self {
        match e {
            SudokuError::InvalidGame(_) => AppError::Validation(e.to_string()),
            SudokuError::InvalidPuzzleSource(_) => AppError::Internal(e.into()),
        }
    }
}

/// GET /api/games/sudoku/new?difficulty=easy
///
/// Generation backtracks, so it runs on the blocking pool.
pub async fn handle_new_game(
    State(state): State<AppState>,
    Query(query): Query<NewGameQuery>,
) -> Result<Json<SudokuGame>, AppError> {
    let puzzles = state.puzzles.clone();
    let game = tokio::task::spawn_blocking(move || {
        SudokuGame::new_game(query.difficulty, puzzles.as_ref())
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))??;
    Ok(Json(game))
}

/// POST /api/games/sudoku/move
///
/// Stateless: the client sends the whole game back. It is checked for
/// integrity, then `(row, col)` is selected and `digit` applied. The check
/// cannot tell a given from an editable cell that already holds its
/// solution, so the result is only as trustworthy as the client's state.
pub async fn handle_move(Json(req): Json<MoveRequest>) -> Result<Json<MoveResponse>, AppError> {
    let MoveRequest {
        mut game,
        row,
        col,
        digit,
    } = req;

    game.check_integrity()?;
    game.select_cell(row, col);
    let outcome = game.apply_digit(digit);

    Ok(Json(MoveResponse { game, outcome }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::sudoku::engine::PuzzlePair;
    use crate::games::sudoku::grid::fixtures::{PUZZLE, SOLUTION};
    use axum::{http::StatusCode, response::IntoResponse};

    fn classic_game() -> SudokuGame {
        let pair = PuzzlePair {
            puzzle: PUZZLE.to_string(),
            solution: SOLUTION.to_string(),
        };
        SudokuGame::from_pair(Difficulty::Easy, &pair).unwrap()
    }

    #[tokio::test]
    async fn test_saturated_mistakes_do_not_overflow() {
        let mut game = classic_game();
        game.mistakes = u32::MAX;
        let Json(resp) = handle_move(Json(MoveRequest {
            game,
            row: 0,
            col: 2,
            digit: 1,
        }))
        .await
        .unwrap();
        assert_eq!(resp.outcome, DigitOutcome::Incorrect);
        assert_eq!(resp.game.mistakes, u32::MAX);
    }

    #[tokio::test]
    async fn test_tampered_game_is_bad_request() {
        let mut game = classic_game();
        game.board.0[4][4].solution = 0;
        let err = handle_move(Json(MoveRequest {
            game,
            row: 0,
            col: 2,
            digit: 4,
        }))
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_bad_puzzle_source_is_internal() {
        let err = AppError::from(SudokuError::InvalidPuzzleSource("offline".into()));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
