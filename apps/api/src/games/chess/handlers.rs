//! Axum route handlers for chess against the random-move bot.

use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::games::chess::engine::{play_turn, ChessError, GameStatus, TurnResult, START_FEN};

#[derive(Debug, Deserialize)]
pub struct ChessMoveRequest {
    pub fen: String,
    pub from: String,
    pub to: String,
    pub promotion: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NewChessGame {
    pub fen: &'static str,
    pub status: GameStatus,
}

impl From<ChessError> for AppError {
    fn from(e: ChessError) -> Self {
        match e {
            ChessError::InvalidFen(_)
            | ChessError::InvalidSquare(_)
            | ChessError::InvalidPromotion(_) => AppError::Validation(e.to_string()),
            ChessError::NotPlayersTurn | ChessError::GameOver | ChessError::IllegalMove(_) => {
                AppError::UnprocessableEntity(e.to_string())
            }
        }
    }
}

/// GET /api/games/chess/new
pub async fn handle_new_chess_game() -> Json<NewChessGame> {
    Json(NewChessGame {
        fen: START_FEN,
        status: GameStatus::Ongoing,
    })
}

/// POST /api/games/chess/move
///
/// Validates White's move, plays a random Black reply and returns the new FEN.
pub async fn handle_chess_move(
    Json(req): Json<ChessMoveRequest>,
) -> Result<Json<TurnResult>, AppError> {
    let result = play_turn(
        &req.fen,
        &req.from,
        &req.to,
        req.promotion.as_deref(),
        &mut rand::thread_rng(),
    )?;
    debug!(
        "Chess {}: {} / {:?} -> {:?}",
        req.fen, result.player_move, result.bot_move, result.status
    );
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, response::IntoResponse};

    #[test]
    fn test_input_errors_are_bad_requests() {
        let status = AppError::from(ChessError::InvalidFen("x".into()))
            .into_response()
            .status();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_rule_errors_are_unprocessable() {
        for err in [
            ChessError::IllegalMove("e2e5".into()),
            ChessError::NotPlayersTurn,
            ChessError::GameOver,
        ] {
            assert_eq!(
                AppError::from(err).into_response().status(),
                StatusCode::UNPROCESSABLE_ENTITY
            );
        }
    }

    #[tokio::test]
    async fn test_move_request_plays_a_reply() {
        let Json(result) = handle_chess_move(Json(ChessMoveRequest {
            fen: START_FEN.to_string(),
            from: "d2".to_string(),
            to: "d4".to_string(),
            promotion: None,
        }))
        .await
        .unwrap();
        assert_eq!(result.player_move, "d4");
        assert!(result.bot_move.is_some());
        assert!(result.fen.contains(" w "));
    }
}
