//! Sudoku play engine.
//!
//! A `SudokuGame` wraps a `(puzzle, solution)` pair in per-cell state and
//! answers select/apply calls. Fixed cells and solutions never change after
//! construction; `is_error` is recomputed only from `value == solution`.
//! There is no randomness here: the same pair and edit sequence always
//! produce the same game.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::{is_valid_solution, Grid, CELL_COUNT, SIZE};

/// Marks an empty, editable position in a puzzle string.
pub const PLACEHOLDER: char = '-';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SudokuError {
    #[error("Invalid puzzle source: {0}")]
    InvalidPuzzleSource(String),

    /// A game submitted by a client that no puzzle could have produced.
    #[error("Invalid game state: {0}")]
    InvalidGame(String),
}

/// Two 81-character row-major strings; the puzzle uses `-` for blanks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzlePair {
    pub puzzle: String,
    pub solution: String,
}

/// Supplies puzzle/solution pairs keyed by difficulty.
pub trait PuzzleSource: Send + Sync {
    fn puzzle(&self, difficulty: Difficulty) -> Result<PuzzlePair, SudokuError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub value: Option<u8>,
    pub is_editable: bool,
    pub solution: u8,
    pub is_error: bool,
}

/// 9×9 grid of cells, rows 0-8 then columns 0-8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board(pub [[Cell; SIZE]; SIZE]);

impl Board {
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.0.get(row)?.get(col)
    }

    /// Won iff every cell is filled and none is marked as an error.
    pub fn is_solved(&self) -> bool {
        self.0
            .iter()
            .flatten()
            .all(|c| c.value.is_some() && !c.is_error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitOutcome {
    /// No selection, fixed cell, digit out of range, or game already won.
    Ignored,
    Correct,
    Incorrect,
    /// Correct, and the board is now complete.
    Solved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SudokuGame {
    pub difficulty: Difficulty,
    pub board: Board,
    pub selection: Option<Selection>,
    /// Counted but never capped; mistakes do not end the game.
    pub mistakes: u32,
    pub is_won: bool,
}

impl SudokuGame {
    /// Starts a fresh game from `source`. Fails without building a board
    /// when the source returns a malformed pair.
    pub fn new_game(
        difficulty: Difficulty,
        source: &dyn PuzzleSource,
    ) -> Result<Self, SudokuError> {
        let pair = source.puzzle(difficulty)?;
        Self::from_pair(difficulty, &pair)
    }

    pub fn from_pair(difficulty: Difficulty, pair: &PuzzlePair) -> Result<Self, SudokuError> {
        let givens = parse_line(&pair.puzzle, "puzzle", true)?;
        let solution = parse_line(&pair.solution, "solution", false)?;

        if !is_valid_solution(&solution) {
            return Err(invalid("solution is not a valid completed grid"));
        }
        if let Some(pos) = (0..CELL_COUNT).find(|&i| givens[i] != 0 && givens[i] != solution[i]) {
            return Err(invalid(format!(
                "given at row {} col {} disagrees with the solution",
                pos / SIZE,
                pos % SIZE
            )));
        }

        let mut cells = [[Cell {
            value: None,
            is_editable: true,
            solution: 0,
            is_error: false,
        }; SIZE]; SIZE];
        for (i, cell) in cells.iter_mut().flatten().enumerate() {
            let given = givens[i];
            *cell = Cell {
                value: (given != 0).then_some(given),
                is_editable: given == 0,
                solution: solution[i],
                is_error: false,
            };
        }

        Ok(Self {
            difficulty,
            board: Board(cells),
            selection: None,
            mistakes: 0,
            is_won: false,
        })
    }

    /// Selects an editable cell; fixed or out-of-range cells clear the
    /// selection. Does nothing once the game is won.
    pub fn select_cell(&mut self, row: usize, col: usize) -> Option<Selection> {
        if self.is_won {
            return self.selection;
        }
        self.selection = match self.board.cell(row, col) {
            Some(cell) if cell.is_editable => Some(Selection { row, col }),
            _ => None,
        };
        self.selection
    }

    /// Writes `digit` into the selected cell and checks it against the solution.
    pub fn apply_digit(&mut self, digit: u8) -> DigitOutcome {
        if self.is_won || !(1..=9).contains(&digit) {
            return DigitOutcome::Ignored;
        }
        let Some(Selection { row, col }) = self.selection else {
            return DigitOutcome::Ignored;
        };
        let Some(cell) = self.board.0.get_mut(row).and_then(|r| r.get_mut(col)) else {
            return DigitOutcome::Ignored;
        };
        if !cell.is_editable {
            return DigitOutcome::Ignored;
        }

        let correct = digit == cell.solution;
        cell.value = Some(digit);
        cell.is_error = !correct;

        if !correct {
            self.mistakes = self.mistakes.saturating_add(1);
            return DigitOutcome::Incorrect;
        }

        if self.board.is_solved() {
            self.is_won = true;
            DigitOutcome::Solved
        } else {
            DigitOutcome::Correct
        }
    }
}

impl SudokuGame {
    /// Checks a game received from a client before it is played on:
    /// digits in 1-9, solutions forming a valid grid, givens holding their
    /// solution, error flags matching values, and no win on an unfinished board.
    pub fn check_integrity(&self) -> Result<(), SudokuError> {
        let mut solution: Grid = [0u8; CELL_COUNT];
        for (i, cell) in self.board.0.iter().flatten().enumerate() {
            let (row, col) = (i / SIZE, i % SIZE);
            if !(1..=9).contains(&cell.solution) {
                return Err(tampered(format!("solution at row {row} col {col} is out of range")));
            }
            if cell.value.is_some_and(|v| !(1..=9).contains(&v)) {
                return Err(tampered(format!("value at row {row} col {col} is out of range")));
            }
            if !cell.is_editable && cell.value != Some(cell.solution) {
                return Err(tampered(format!("fixed cell at row {row} col {col} was altered")));
            }
            if cell.is_error != cell.value.is_some_and(|v| v != cell.solution) {
                return Err(tampered(format!("error flag at row {row} col {col} is inconsistent")));
            }
            solution[i] = cell.solution;
        }

        if !is_valid_solution(&solution) {
            return Err(tampered("solutions do not form a valid grid"));
        }
        if self.is_won && !self.board.is_solved() {
            return Err(tampered("game is marked won on an unfinished board"));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> SudokuError {
    SudokuError::InvalidPuzzleSource(reason.into())
}

fn tampered(reason: impl Into<String>) -> SudokuError {
    SudokuError::InvalidGame(reason.into())
}

fn parse_line(line: &str, label: &str, allow_placeholder: bool) -> Result<Grid, SudokuError> {
    let len = line.chars().count();
    if len != CELL_COUNT {
        return Err(invalid(format!(
            "{label} must have {CELL_COUNT} characters, got {len}"
        )));
    }

    let mut grid = [0u8; CELL_COUNT];
    for (i, c) in line.chars().enumerate() {
        grid[i] = match c {
            '1'..='9' => c as u8 - b'0',
            PLACEHOLDER if allow_placeholder => 0,
            _ => {
                return Err(invalid(format!(
                    "{label} has unexpected character '{c}' at position {i}"
                )))
            }
        };
    }
    Ok(grid)
}
