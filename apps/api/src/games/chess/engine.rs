//! Move validation and the random-reply bot over FEN positions.
//!
//! Legal move generation comes from `shakmaty`; this module only parses the
//! client's `(fen, from, to, promotion)`, plays it, and picks a reply.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use shakmaty::fen::{Fen, ParseFenError};
use shakmaty::san::SanPlus;
use shakmaty::{
    CastlingMode, Chess, Color, EnPassantMode, Move, Outcome, Position, Role, Square,
};
use thiserror::Error;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Fifty full moves without a capture or pawn move.
const FIFTY_MOVE_HALFMOVES: u32 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChessError {
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Invalid square: '{0}'")]
    InvalidSquare(String),

    #[error("Invalid promotion piece: '{0}'")]
    InvalidPromotion(String),

    #[error("It is not White's turn")]
    NotPlayersTurn,

    #[error("The game is already over")]
    GameOver,

    #[error("Illegal move: {0}")]
    IllegalMove(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Ongoing,
    WhiteWins,
    BlackWins,
    /// Stalemate, insufficient material or the fifty-move rule.
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResult {
    pub fen: String,
    pub status: GameStatus,
    /// Player's move in SAN.
    pub player_move: String,
    /// Bot's reply in SAN; absent when the player's move ended the game.
    pub bot_move: Option<String>,
}

pub fn parse_position(fen: &str) -> Result<Chess, ChessError> {
    let setup: Fen = fen
        .trim()
        .parse()
        .map_err(|e: ParseFenError| ChessError::InvalidFen(e.to_string()))?;
    setup
        .into_position(CastlingMode::Standard)
        .map_err(|e| ChessError::InvalidFen(e.to_string()))
}

pub fn to_fen(pos: &Chess) -> String {
    Fen::from_position(pos.clone(), EnPassantMode::Legal).to_string()
}

pub fn status(pos: &Chess) -> GameStatus {
    match pos.outcome() {
        Some(Outcome::Decisive {
            winner: Color::White,
        }) => GameStatus::WhiteWins,
        Some(Outcome::Decisive {
            winner: Color::Black,
        }) => GameStatus::BlackWins,
        Some(Outcome::Draw) => GameStatus::Draw,
        None if pos.halfmoves() >= FIFTY_MOVE_HALFMOVES => GameStatus::Draw,
        None => GameStatus::Ongoing,
    }
}

fn parse_square(raw: &str) -> Result<Square, ChessError> {
    raw.trim()
        .to_ascii_lowercase()
        .parse()
        .map_err(|_| ChessError::InvalidSquare(raw.to_string()))
}

fn parse_promotion(raw: &str) -> Result<Role, ChessError> {
    let mut chars = raw.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => match Role::from_char(c.to_ascii_lowercase()) {
            Some(role @ (Role::Queen | Role::Rook | Role::Bishop | Role::Knight)) => Ok(role),
            _ => Err(ChessError::InvalidPromotion(raw.to_string())),
        },
        _ => Err(ChessError::InvalidPromotion(raw.to_string())),
    }
}

/// Where the moving piece lands. Castling is addressed by the king's
/// destination (e1 to g1), not the rook square shakmaty stores.
fn destination(m: &Move, turn: Color) -> Square {
    match m.castling_side() {
        Some(side) => side.king_to(turn),
        None => m.to(),
    }
}

/// Finds the legal move from `from` to `to`. A pawn reaching the last rank
/// without an explicit piece promotes to a queen.
fn find_move(pos: &Chess, from: Square, to: Square, promotion: Option<Role>) -> Option<Move> {
    let turn = pos.turn();
    let candidates: Vec<Move> = pos
        .legal_moves()
        .into_iter()
        .filter(|m| m.from() == Some(from) && destination(m, turn) == to)
        .collect();

    match promotion {
        Some(role) => candidates.into_iter().find(|m| m.promotion() == Some(role)),
        None => candidates
            .iter()
            .find(|m| m.promotion().is_none())
            .or_else(|| candidates.iter().find(|m| m.promotion() == Some(Role::Queen)))
            .cloned(),
    }
}

/// A uniformly random legal move, or `None` when there is none.
pub fn random_reply<R: Rng + ?Sized>(pos: &Chess, rng: &mut R) -> Option<Move> {
    let moves = pos.legal_moves();
    moves.choose(rng).cloned()
}

/// Plays White's move, then one random Black reply if the game goes on.
pub fn play_turn<R: Rng + ?Sized>(
    fen: &str,
    from: &str,
    to: &str,
    promotion: Option<&str>,
    rng: &mut R,
) -> Result<TurnResult, ChessError> {
    let mut pos = parse_position(fen)?;
    if status(&pos) != GameStatus::Ongoing {
        return Err(ChessError::GameOver);
    }
    if pos.turn() != Color::White {
        return Err(ChessError::NotPlayersTurn);
    }

    let from_square = parse_square(from)?;
    let to_square = parse_square(to)?;
    let promotion = promotion.map(parse_promotion).transpose()?;

    let player = find_move(&pos, from_square, to_square, promotion)
        .ok_or_else(|| ChessError::IllegalMove(format!("{from_square}{to_square}")))?;
    let player_move = SanPlus::from_move_and_play_unchecked(&mut pos, &player).to_string();

    let bot_move = if status(&pos) == GameStatus::Ongoing {
        random_reply(&pos, rng)
            .map(|reply| SanPlus::from_move_and_play_unchecked(&mut pos, &reply).to_string())
    } else {
        None
    };

    Ok(TurnResult {
        fen: to_fen(&pos),
        status: status(&pos),
        player_move,
        bot_move,
    })
}
