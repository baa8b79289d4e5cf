use std::ops::{BitOr, BitOrAssign};

use log::trace;

use crate::{union_find::UnionFind, Error, Result};

////////////////////////////////////////////////////////////////////////////////

/// Which grid edges a component touches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Reach {
    pub top: bool,
    pub bottom: bool,
}

impl Reach {
    pub fn spans(self) -> bool {
        self.top && self.bottom
    }
}

impl BitOr for Reach {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            top: self.top || rhs.top,
            bottom: self.bottom || rhs.bottom,
        }
    }
}

impl BitOrAssign for Reach {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

////////////////////////////////////////////////////////////////////////////////

/// An `n`x`n` grid of sites that are opened one by one.
///
/// Rows and columns are 1-based. Row 1 is the top, row `n` the bottom.
/// Open neighbours are merged into components as sites open, and every
/// component root records whether the component touches the top and the
/// bottom row. There are no virtual top/bottom nodes, and a component that
/// only touches the bottom row is never reported full.
#[derive(Debug, Clone)]
pub struct ConnectivityGrid {
    size: usize,
    open: Vec<bool>,
    // Only meaningful at component roots of open sites.
    reach: Vec<Reach>,
    components: UnionFind,
    open_sites: usize,
    percolated: bool,
}

impl ConnectivityGrid {
    /// Creates a grid with all sites closed.
    ///
    /// Fails with [`Error::InvalidSize`] if `size` is zero or `size * size`
    /// does not fit in `usize`.
    pub fn new(size: usize) -> Result<Self> {
        let sites = match size.checked_mul(size) {
            Some(sites) if sites > 0 => sites,
            _ => return Err(Error::InvalidSize { size }),
        };

        Ok(Self {
            size,
            open: vec![false; sites],
            reach: vec![Reach::default(); sites],
            components: UnionFind::new(sites),
            open_sites: 0,
            percolated: false,
        })
    }

    /// Returns the side length `n` the grid was created with.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the site has been opened.
    ///
    /// # Arguments
    ///
    /// * `row` - must be >= 1 and <= grid size.
    /// * `col` - must be >= 1 and <= grid size.
    ///
    /// Fails with [`Error::OutOfRange`] otherwise.
    pub fn is_open(&self, row: usize, col: usize) -> Result<bool> {
        let idx = self.index(row, col)?;
        Ok(self.open[idx])
    }

    /// Returns `true` if the site is open and connected to the top row.
    /// A closed site is never full.
    ///
    /// Fails with [`Error::OutOfRange`] like [`is_open`](Self::is_open).
    pub fn is_full(&self, row: usize, col: usize) -> Result<bool> {
        let idx = self.index(row, col)?;
        if !self.open[idx] {
            return Ok(false);
        }
        Ok(self.reach[self.components.root(idx)].top)
    }

    /// Returns how many distinct sites have been opened so far.
    pub fn number_of_open_sites(&self) -> usize {
        self.open_sites
    }

    /// Share of open sites, in `[0, 1]`.
    pub fn open_fraction(&self) -> f64 {
        self.open_sites as f64 / self.open.len() as f64
    }

    /// Once this returns `true` it keeps returning `true`.
    pub fn percolates(&self) -> bool {
        self.percolated
    }

    /// Opens the site and joins it with its open neighbours.
    /// Opening an already open site does nothing.
    ///
    /// Fails with [`Error::OutOfRange`] before touching the grid if the
    /// coordinates are invalid.
    pub fn open(&mut self, row: usize, col: usize) -> Result<()> {
        let idx = self.index(row, col)?;
        if self.open[idx] {
            return Ok(());
        }

        self.open[idx] = true;
        self.open_sites += 1;

        let mut reach = Reach {
            top: row == 1,
            bottom: row == self.size,
        };

        for neighbour in self.neighbours(idx).into_iter().flatten() {
            if !self.open[neighbour] {
                continue;
            }

            let here = self.components.find(idx);
            let there = self.components.find(neighbour);
            if here == there {
                continue;
            }

            // Both roots are read before the union, one of them stops being a
            // root right after it.
            reach |= self.reach[here] | self.reach[there];
            if let Some(root) = self.components.union(here, there) {
                self.reach[root] = reach;
            }
        }

        let root = self.components.find(idx);
        self.reach[root] |= reach;

        if self.reach[root].spans() && !self.percolated {
            self.percolated = true;
            trace!(
                "{0}x{0} grid percolates after opening ({row}, {col}), {1} sites open",
                self.size,
                self.open_sites
            );
        }

        Ok(())
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        let in_range = |x: usize| (1..=self.size).contains(&x);
        if !in_range(row) || !in_range(col) {
            return Err(Error::OutOfRange {
                row,
                col,
                size: self.size,
            });
        }
        Ok((row - 1) * self.size + (col - 1))
    }

    /// Linear indices of the up, down, left and right neighbours of `idx`.
    fn neighbours(&self, idx: usize) -> [Option<usize>; 4] {
        let n = self.size;
        let (row, col) = (idx / n, idx % n);
        [
            (row > 0).then(|| idx - n),
            (row + 1 < n).then(|| idx + n),
            (col > 0).then(|| idx - 1),
            (col + 1 < n).then(|| idx + 1),
        ]
    }
}

////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reach_merges_flags() {
        let top = Reach {
            top: true,
            bottom: false,
        };
        let bottom = Reach {
            top: false,
            bottom: true,
        };
        assert!(!top.spans());
        assert!((top | bottom).spans());

        let mut acc = Reach::default();
        acc |= bottom;
        assert_eq!(acc, bottom);
    }

    #[test]
    fn neighbours_stay_inside_grid() {
        let grid = ConnectivityGrid::new(3).unwrap();
        assert_eq!(grid.neighbours(0), [None, Some(3), None, Some(1)]);
        assert_eq!(grid.neighbours(4), [Some(1), Some(7), Some(3), Some(5)]);
        assert_eq!(grid.neighbours(8), [Some(5), None, Some(7), None]);
    }

    #[test]
    fn neighbours_of_single_site() {
        let grid = ConnectivityGrid::new(1).unwrap();
        assert_eq!(grid.neighbours(0), [None; 4]);
    }

    #[test]
    fn index_is_row_major() {
        let grid = ConnectivityGrid::new(4).unwrap();
        assert_eq!(grid.index(1, 1), Ok(0));
        assert_eq!(grid.index(1, 4), Ok(3));
        assert_eq!(grid.index(2, 1), Ok(4));
        assert_eq!(grid.index(4, 4), Ok(15));
    }

    #[test]
    fn flags_survive_whichever_root_wins() {
        // Large bottom component absorbs a small top one through the last site.
        let mut grid = ConnectivityGrid::new(4).unwrap();
        for col in 1..=4 {
            grid.open(4, col).unwrap();
            grid.open(3, col).unwrap();
        }
        grid.open(1, 2).unwrap();
        assert!(!grid.percolates());
        grid.open(2, 2).unwrap();
        assert!(grid.percolates());
        assert!(grid.is_full(4, 4).unwrap());
    }
}
