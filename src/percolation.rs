use crate::error::{PercolationError, Result};
use crate::grid::{Grid, neighbors4};
use crate::union_find::DisjointSet;

/// N x N site-percolation state.
///
/// Sites are addressed by 1-based `(row, col)`. Internally site `(row, col)`
/// lives at node `(row - 1) * n + (col - 1) + 1`; node 0 is the virtual top
/// and node `n * n + 1` the virtual bottom.
///
/// Two disjoint sets are kept in lockstep:
/// - `main` has both virtual nodes and answers `percolates`.
/// - `full` has only the virtual top and answers `is_full`. Without it, once
///   the grid percolates every bottom-row site would look full through the
///   virtual bottom (backwash).
#[derive(Clone, Debug)]
pub struct Percolation {
    n: usize,
    open_sites: Grid<bool>,
    open_count: usize,
    main: DisjointSet,
    full: DisjointSet,
}

const VIRTUAL_TOP: usize = 0;

impl Percolation {
    pub fn new(n: usize) -> Result<Self> {
        let sites = n
            .checked_mul(n)
            .filter(|s| n > 0 && s.checked_add(2).is_some())
            .ok_or(PercolationError::InvalidGridSize { n })?;

        Ok(Self {
            n,
            open_sites: Grid::new(n, n),
            open_count: 0,
            main: DisjointSet::new(sites + 2),
            full: DisjointSet::new(sites + 1),
        })
    }

    pub fn size(&self) -> usize {
        self.n
    }

    #[inline]
    fn virtual_bottom(&self) -> usize {
        self.n * self.n + 1
    }

    #[inline]
    fn node(&self, row: usize, col: usize) -> usize {
        (row - 1) * self.n + (col - 1) + 1
    }

    fn validate(&self, row: usize, col: usize) -> Result<()> {
        if row < 1 || row > self.n || col < 1 || col > self.n {
            return Err(PercolationError::OutOfRange { row, col, n: self.n });
        }
        Ok(())
    }

    /// Open neighbours of an in-range site, as node indices.
    fn open_neighbors(&self, row: usize, col: usize) -> impl Iterator<Item = usize> + '_ {
        neighbors4(col - 1, row - 1, self.n, self.n)
            .filter(|&(x, y)| self.open_sites.get(x, y))
            .map(|(x, y)| self.node(y + 1, x + 1))
    }

    /// Open a site. Opening an already-open site changes nothing.
    pub fn open(&mut self, row: usize, col: usize) -> Result<()> {
        self.validate(row, col)?;
        if self.open_sites.get(col - 1, row - 1) {
            return Ok(());
        }
        self.open_sites.set(col - 1, row - 1, true);
        self.open_count += 1;

        let id = self.node(row, col);
        if row == 1 {
            self.main.union(id, VIRTUAL_TOP);
            self.full.union(id, VIRTUAL_TOP);
        }
        // Bottom link goes into `main` only.
        if row == self.n {
            let vb = self.virtual_bottom();
            self.main.union(id, vb);
        }

        let mut neighbors = [0usize; 4];
        let mut k = 0;
        for nb in self.open_neighbors(row, col) {
            neighbors[k] = nb;
            k += 1;
        }
        for &nb in &neighbors[..k] {
            self.main.union(id, nb);
            self.full.union(id, nb);
        }
        Ok(())
    }

    pub fn is_open(&self, row: usize, col: usize) -> Result<bool> {
        self.validate(row, col)?;
        Ok(self.open_sites.get(col - 1, row - 1))
    }

    /// Open and connected to the top row through open sites.
    pub fn is_full(&self, row: usize, col: usize) -> Result<bool> {
        if !self.is_open(row, col)? {
            return Ok(false);
        }
        Ok(self.full.connected(VIRTUAL_TOP, self.node(row, col)))
    }

    pub fn percolates(&self) -> bool {
        self.main.connected(VIRTUAL_TOP, self.virtual_bottom())
    }

    pub fn number_of_open_sites(&self) -> usize {
        self.open_count
    }

    /// Fraction of the grid that is open.
    pub fn open_fraction(&self) -> f64 {
        self.open_count as f64 / (self.n * self.n) as f64
    }

    /// Would opening this blocked site make the system percolate?
    ///
    /// Works on a throwaway clone of the percolation set; `self` is left
    /// exactly as it was. Returns `false` for a site that is already open.
    pub fn would_percolate_if_opened(&self, row: usize, col: usize) -> Result<bool> {
        if self.is_open(row, col)? {
            return Ok(false);
        }

        let mut scratch = self.main.clone();
        let id = self.node(row, col);
        let vb = self.virtual_bottom();
        if row == 1 {
            scratch.union(id, VIRTUAL_TOP);
        }
        if row == self.n {
            scratch.union(id, vb);
        }
        for nb in self.open_neighbors(row, col) {
            scratch.union(id, nb);
        }
        Ok(scratch.connected(VIRTUAL_TOP, vb))
    }

    /// Blocked sites whose opening alone would make the system percolate.
    ///
    /// Same answer as `would_percolate_if_opened` on every blocked site, without
    /// the per-site clone: a site is critical when it would touch both the top
    /// component and the bottom component of `main`.
    pub fn critical_sites(&self) -> usize {
        if self.percolates() {
            return 0;
        }
        let top = self.main.find(VIRTUAL_TOP);
        let bottom = self.main.find(self.virtual_bottom());

        let mut count = 0;
        for row in 1..=self.n {
            for col in 1..=self.n {
                if self.open_sites.get(col - 1, row - 1) {
                    continue;
                }
                let mut touches_top = row == 1;
                let mut touches_bottom = row == self.n;
                for nb in self.open_neighbors(row, col) {
                    let root = self.main.find(nb);
                    touches_top |= root == top;
                    touches_bottom |= root == bottom;
                }
                if touches_top && touches_bottom {
                    count += 1;
                }
            }
        }
        count
    }

    /// Probability that opening one uniformly chosen blocked site percolates.
    pub fn next_step_probability(&self) -> f64 {
        let blocked = self.n * self.n - self.open_count;
        if blocked == 0 {
            return 0.0;
        }
        self.critical_sites() as f64 / blocked as f64
    }
}
