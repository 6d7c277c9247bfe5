//! Random puzzle generation: fill a complete grid by shuffled backtracking,
//! then blank cells in random order while the puzzle keeps exactly one solution.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::engine::{Difficulty, PuzzlePair, PuzzleSource, SudokuError, PLACEHOLDER};
use super::grid::{can_place, count_solutions, Grid, CELL_COUNT};

impl Difficulty {
    /// Number of pre-filled cells the generator aims for.
    pub fn target_givens(self) -> usize {
        match self {
            Difficulty::Easy => 40,
            Difficulty::Medium => 32,
            Difficulty::Hard => 26,
        }
    }
}

/// Default puzzle source backed by the thread-local RNG.
pub struct RandomPuzzleSource;

impl PuzzleSource for RandomPuzzleSource {
    fn puzzle(&self, difficulty: Difficulty) -> Result<PuzzlePair, SudokuError> {
        Ok(generate(&mut rand::thread_rng(), difficulty))
    }
}

pub fn generate<R: Rng + ?Sized>(rng: &mut R, difficulty: Difficulty) -> PuzzlePair {
    let solution = full_grid(rng);
    let mut puzzle = solution;

    let mut order: Vec<usize> = (0..CELL_COUNT).collect();
    order.shuffle(rng);

    let target = difficulty.target_givens();
    let mut givens = CELL_COUNT;
    for pos in order {
        if givens <= target {
            break;
        }
        let saved = puzzle[pos];
        puzzle[pos] = 0;
        if count_solutions(&mut puzzle, 2) == 1 {
            givens -= 1;
        } else {
            puzzle[pos] = saved;
        }
    }

    debug!("Generated {:?} sudoku with {} givens", difficulty, givens);

    PuzzlePair {
        puzzle: render(&puzzle),
        solution: render(&solution),
    }
}

fn full_grid<R: Rng + ?Sized>(rng: &mut R) -> Grid {
    let mut grid = [0u8; CELL_COUNT];
    // An empty grid always has a completion, so the fill cannot fail.
    fill(&mut grid, 0, rng);
    grid
}

fn fill<R: Rng + ?Sized>(grid: &mut Grid, pos: usize, rng: &mut R) -> bool {
    if pos == CELL_COUNT {
        return true;
    }
    let mut digits: [u8; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];
    digits.shuffle(rng);
    for digit in digits {
        if can_place(grid, pos, digit) {
            grid[pos] = digit;
            if fill(grid, pos + 1, rng) {
                return true;
            }
            grid[pos] = 0;
        }
    }
    false
}

fn render(grid: &Grid) -> String {
    grid.iter()
        .map(|&d| {
            if d == 0 {
                PLACEHOLDER
            } else {
                char::from(b'0' + d)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::engine::SudokuGame;
    use super::super::grid::fixtures::grid as to_grid;
    use super::super::grid::is_valid_solution;
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_pair_is_consistent_and_unique() {
        for (seed, difficulty) in [(1, Difficulty::Easy), (2, Difficulty::Medium), (3, Difficulty::Hard)] {
            let pair = generate(&mut StdRng::seed_from_u64(seed), difficulty);
            assert_eq!(pair.puzzle.len(), CELL_COUNT);
            assert_eq!(pair.solution.len(), CELL_COUNT);
            assert!(is_valid_solution(&to_grid(&pair.solution)));

            let mut puzzle = to_grid(&pair.puzzle);
            assert_eq!(count_solutions(&mut puzzle, 2), 1);

            let givens = pair.puzzle.chars().filter(|&c| c != PLACEHOLDER).count();
            assert!(givens >= difficulty.target_givens());
            assert!(givens < CELL_COUNT);

            assert!(SudokuGame::from_pair(difficulty, &pair).is_ok());
        }
    }

    #[test]
    fn test_easy_has_more_givens_than_hard() {
        let easy = generate(&mut StdRng::seed_from_u64(7), Difficulty::Easy);
        let hard = generate(&mut StdRng::seed_from_u64(7), Difficulty::Hard);
        let count = |p: &PuzzlePair| p.puzzle.chars().filter(|&c| c != PLACEHOLDER).count();
        assert!(count(&easy) > count(&hard));
    }

    #[test]
    fn test_same_seed_same_puzzle() {
        let a = generate(&mut StdRng::seed_from_u64(42), Difficulty::Medium);
        let b = generate(&mut StdRng::seed_from_u64(42), Difficulty::Medium);
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_source_builds_a_game() {
        let game = SudokuGame::new_game(Difficulty::Easy, &RandomPuzzleSource).unwrap();
        assert!(!game.is_won);
        assert_eq!(game.mistakes, 0);
    }
}
