//! Pure 9×9 grid rules over row-major `[u8; 81]` arrays, `0` meaning empty.

pub const SIZE: usize = 9;
pub const CELL_COUNT: usize = SIZE * SIZE;

pub type Grid = [u8; CELL_COUNT];

/// True when `digit` does not already appear in the row, column or box of `pos`.
pub fn can_place(grid: &Grid, pos: usize, digit: u8) -> bool {
    let (row, col) = (pos / SIZE, pos % SIZE);
    let (box_row, box_col) = (row / 3 * 3, col / 3 * 3);

    for i in 0..SIZE {
        let in_row = row * SIZE + i;
        let in_col = i * SIZE + col;
        let in_box = (box_row + i / 3) * SIZE + box_col + i % 3;
        for peer in [in_row, in_col, in_box] {
            if peer != pos && grid[peer] == digit {
                return false;
            }
        }
    }
    true
}

/// True when every cell holds 1-9 and no digit repeats in any row, column or box.
pub fn is_valid_solution(grid: &Grid) -> bool {
    grid.iter().all(|&d| (1..=9).contains(&d))
        && (0..CELL_COUNT).all(|pos| can_place(grid, pos, grid[pos]))
}

/// Counts solutions of `grid`, stopping once `limit` is reached.
/// The grid is restored before returning.
pub fn count_solutions(grid: &mut Grid, limit: usize) -> usize {
    if limit == 0 {
        return 0;
    }

    // Most-constrained empty cell first.
    let mut best: Option<(usize, Vec<u8>)> = None;
    for pos in (0..CELL_COUNT).filter(|&p| grid[p] == 0) {
        let candidates: Vec<u8> = (1..=9).filter(|&d| can_place(grid, pos, d)).collect();
        if candidates.is_empty() {
            return 0;
        }
        if best.as_ref().map_or(true, |(_, c)| candidates.len() < c.len()) {
            best = Some((pos, candidates));
        }
    }

    let Some((pos, candidates)) = best else {
        return 1;
    };

    let mut count = 0;
    for digit in candidates {
        grid[pos] = digit;
        count += count_solutions(grid, limit - count);
        grid[pos] = 0;
        if count >= limit {
            break;
        }
    }
    count
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const PUZZLE: &str =
        "53--7----6--195----98----6-8---6---34--8-3--17---2---6-6----28----419--5----8--79";
    pub const SOLUTION: &str =
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

    pub fn grid(s: &str) -> super::Grid {
        let mut grid = [0u8; super::CELL_COUNT];
        for (i, c) in s.chars().enumerate() {
            grid[i] = c.to_digit(10).map_or(0, |d| d as u8);
        }
        grid
    }
}
