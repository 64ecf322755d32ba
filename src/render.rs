use rayon::prelude::*;

use crate::grid::Grid;
use crate::percolation::Percolation;

const BLOCKED: [u8; 4] = [0, 0, 0, 255];
const OPEN: [u8; 4] = [255, 255, 255, 255];
const FULL: [u8; 4] = [100, 149, 237, 255];
const GUTTER: [u8; 4] = [30, 10, 30, 255];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SiteState {
    #[default]
    Blocked,
    Open,
    Full,
}

impl SiteState {
    #[inline]
    fn color(self) -> [u8; 4] {
        match self {
            SiteState::Blocked => BLOCKED,
            SiteState::Open => OPEN,
            SiteState::Full => FULL,
        }
    }
}

/// Snapshot of every site's state. Cell (x, y) is site (row y + 1, col x + 1).
///
/// The engine itself is not `Sync`, so rasterising reads this snapshot instead.
pub fn classify_sites(perc: &Percolation) -> Grid<SiteState> {
    let n = perc.size();
    let mut states = Grid::<SiteState>::new(n, n);
    for y in 0..n {
        for x in 0..n {
            let (row, col) = (y + 1, x + 1);
            let state = match (perc.is_full(row, col), perc.is_open(row, col)) {
                (Ok(true), _) => SiteState::Full,
                (_, Ok(true)) => SiteState::Open,
                _ => SiteState::Blocked,
            };
            states.set(x, y, state);
        }
    }
    states
}

/// RGBA image with each site drawn as a `cell_px` square.
/// Cells larger than 2px get a 1px gutter on their right and bottom edge.
pub fn render_sites(states: &Grid<SiteState>, cell_px: usize) -> Vec<u8> {
    let cell_px = cell_px.max(1);
    let w = states.w * cell_px;
    let h = states.h * cell_px;
    let mut rgba = vec![0u8; w * h * 4];
    if w == 0 || h == 0 {
        return rgba;
    }
    let gutter = cell_px > 2;

    rgba.par_chunks_mut(w * 4)
        .enumerate()
        .for_each(|(py, row)| {
            let y = py / cell_px;
            let edge_y = gutter && py % cell_px == cell_px - 1;
            for px in 0..w {
                let x = px / cell_px;
                let edge_x = gutter && px % cell_px == cell_px - 1;
                let color = if edge_x || edge_y {
                    GUTTER
                } else {
                    states.get(x, y).color()
                };
                row[px * 4..px * 4 + 4].copy_from_slice(&color);
            }
        });

    rgba
}
