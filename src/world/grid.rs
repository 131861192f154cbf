// Read-only 2-D cell grid the ray caster walks.
// Rows are stored contiguously (row-major); the grid is rectangular by
// construction, so every lookup is a single bounds check + index.

use std::fmt;

use thiserror::Error;

/// One grid cell code.
///
/// * `0`   – empty floor
/// * `1..` – wall type (selects the wall texture)
/// * [`Cell::DOOR`] is drawn like any other wall.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell(pub u8);

impl Cell {
    pub const EMPTY: Cell = Cell(0);
    /// Code reported for every lookup outside the grid.
    pub const SOLID: Cell = Cell(1);
    pub const DOOR: Cell = Cell(3);

    #[inline(always)]
    pub fn is_wall(self) -> bool {
        self.0 != 0
    }

    #[inline(always)]
    pub fn is_door(self) -> bool {
        self == Self::DOOR
    }
}

impl From<u8> for Cell {
    fn from(code: u8) -> Self {
        Cell(code)
    }
}

/// Things that can go wrong while building a grid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no cells")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unexpected character `{ch}` at row {row}, column {col}")]
    BadCell { row: usize, col: usize, ch: char },
}

/// Immutable rectangular grid of [`Cell`]s.
///
/// `(x, y)` addresses column `x` of row `y`. Out-of-range lookups are
/// answered with [`Cell::SOLID`] so a ray can never leave the map.
#[derive(Clone, PartialEq, Eq)]
pub struct GridMap {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl GridMap {
    /// Build from row vectors. Every row must have the same length.
    pub fn from_rows<R, C>(rows: R) -> Result<Self, GridError>
    where
        R: IntoIterator<Item = C>,
        C: AsRef<[u8]>,
    {
        let mut cells = Vec::new();
        let mut width = None;
        let mut height = 0;

        for (row_idx, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            match width {
                None => width = Some(row.len()),
                Some(expected) if expected != row.len() => {
                    return Err(GridError::Ragged {
                        row: row_idx,
                        expected,
                        found: row.len(),
                    });
                }
                Some(_) => {}
            }
            cells.extend(row.iter().copied().map(Cell));
            height += 1;
        }

        let width = width.unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Parse rows of ASCII digits. `.` and ` ` are empty floor.
    ///
    /// ```text
    /// 11111
    /// 1...1
    /// 1.3.1
    /// 11111
    /// ```
    pub fn from_ascii(src: &str) -> Result<Self, GridError> {
        let mut rows = Vec::new();
        for (row, line) in src
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .enumerate()
        {
            let mut codes = Vec::with_capacity(line.len());
            for (col, ch) in line.chars().enumerate() {
                let code = match ch {
                    '.' | ' ' => 0,
                    '0'..='9' => ch as u8 - b'0',
                    _ => return Err(GridError::BadCell { row, col, ch }),
                };
                codes.push(code);
            }
            rows.push(codes);
        }
        Self::from_rows(rows)
    }

    /// An open `w × h` room enclosed by a one-cell ring of `wall`.
    pub fn bordered(w: usize, h: usize, wall: Cell) -> Result<Self, GridError> {
        Self::from_rows((0..h).map(|y| {
            (0..w)
                .map(|x| {
                    if x == 0 || y == 0 || x + 1 == w || y + 1 == h {
                        wall.0
                    } else {
                        0
                    }
                })
                .collect::<Vec<u8>>()
        }))
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell code at `(x, y)`; [`Cell::SOLID`] when outside the grid.
    #[inline]
    pub fn cell_at(&self, x: i32, y: i32) -> Cell {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Cell::SOLID;
        }
        self.cells[y as usize * self.width + x as usize]
    }

    #[inline]
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.cell_at(x, y).is_wall()
    }

    /// Iterate `(x, y, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &c)| (i % self.width, i / self.width, c))
    }
}

impl fmt::Debug for GridMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GridMap {}x{}", self.width, self.height)?;
        for row in self.cells.chunks(self.width) {
            for c in row {
                let ch = if c.is_wall() {
                    char::from_digit(c.0 as u32 % 10, 10).unwrap_or('#')
                } else {
                    '.'
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_is_solid() {
        let g = GridMap::bordered(4, 3, Cell(2)).unwrap();
        assert_eq!(g.cell_at(-1, 0), Cell::SOLID);
        assert_eq!(g.cell_at(0, -1), Cell::SOLID);
        assert_eq!(g.cell_at(4, 0), Cell::SOLID);
        assert_eq!(g.cell_at(0, 3), Cell::SOLID);
        assert_eq!(g.cell_at(i32::MAX, i32::MIN), Cell::SOLID);
        assert_eq!(g.cell_at(0, 0), Cell(2));
        assert_eq!(g.cell_at(1, 1), Cell::EMPTY);
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = GridMap::from_rows([vec![1u8, 1, 1], vec![1, 0]]).unwrap_err();
        assert_eq!(
            err,
            GridError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(
            GridMap::from_rows(Vec::<Vec<u8>>::new()).unwrap_err(),
            GridError::Empty
        );
    }

    #[test]
    fn ascii_parse() {
        let g = GridMap::from_ascii("111\n1.3\n111\n").unwrap();
        assert_eq!((g.width(), g.height()), (3, 3));
        assert!(g.cell_at(2, 1).is_door());
        assert!(!g.is_wall(1, 1));

        let err = GridMap::from_ascii("11\n1x\n").unwrap_err();
        assert_eq!(
            err,
            GridError::BadCell {
                row: 1,
                col: 1,
                ch: 'x'
            }
        );
    }

    #[test]
    fn iter_is_row_major() {
        let g = GridMap::from_rows([[1u8, 2], [3, 4]]).unwrap();
        let v: Vec<_> = g.iter().collect();
        assert_eq!(v[1], (1, 0, Cell(2)));
        assert_eq!(v[2], (0, 1, Cell(3)));
    }
}
