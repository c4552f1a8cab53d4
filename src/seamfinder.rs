// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Find the cheapest vertical seam in an energy map
//!
//! Classic row-major dynamic programming.  The first row of the cost
//! table is the first row of the energy map; every later cell is its
//! own energy plus the cheapest of the (up to) three cells touching it
//! in the row above, and the backtrack table remembers which one that
//! was.  The seam's foot is the cheapest cell in the last row, and the
//! seam itself falls out of walking the backtrack table upward.
//!
//! Ties always go to the leftmost column, both when choosing a parent
//! and when choosing the foot.  Any other backend must break ties the
//! same way, and the simplest way to guarantee that is to call
//! `cheapest_parent` rather than reimplement it.

use crate::cq;
use crate::energy::EnergyMap;
use crate::twodmap::TwoDimensionalMap;

/// One column index per row, top to bottom.  Adjacent entries never
/// differ by more than one.
pub type Seam = Vec<u32>;

/// Minimum accumulated energy of any path from row 0 to each cell.
pub type CostTable = TwoDimensionalMap<u64>;

/// For each cell below row 0, the column of its parent in the row above.
pub type BacktrackTable = TwoDimensionalMap<u32>;

/// Given the finished cost row above, return the cheapest parent for
/// column `x` as (cost, column).  Candidates are `x-1`, `x`, `x+1`
/// clipped to the row; `min_by_key` keeps the first minimum it sees,
/// which is the leftmost.
#[inline]
pub fn cheapest_parent(above: &[u64], x: u32) -> (u64, u32) {
    let maxwidth = above.len() as u32 - 1;
    let range = cq!(x == 0, 0, x - 1)..=cq!(x >= maxwidth, maxwidth, x + 1);
    let parent = range.min_by_key(|px| above[*px as usize]).unwrap_or(x);
    (above[parent as usize], parent)
}

/// Fill a run of cells in one row.  `costs` and `parents` are the slice
/// of the row beginning at column `first`; `above` is the whole
/// finished row above and `energy` the whole energy row.  Every cell
/// only reads `above`, so disjoint runs of the same row can be filled
/// independently.
pub fn relax_columns(
    above: &[u64],
    energy: &[u32],
    first: u32,
    costs: &mut [u64],
    parents: &mut [u32],
) {
    for (offset, (cost, parent)) in costs.iter_mut().zip(parents.iter_mut()).enumerate() {
        let x = first + offset as u32;
        let (parent_cost, parent_x) = cheapest_parent(above, x);
        *cost = u64::from(energy[x as usize]) + parent_cost;
        *parent = parent_x;
    }
}

/// Set up empty tables with the first cost row copied from the energy map.
pub fn seed_tables(energy: &EnergyMap) -> (CostTable, BacktrackTable) {
    let (width, height) = (energy.width(), energy.height());
    let mut costs = CostTable::new(width, height);
    for (cost, e) in costs.as_mut_slice().iter_mut().zip(energy.row(0)) {
        *cost = u64::from(*e);
    }
    (costs, BacktrackTable::new(width, height))
}

/// The column of the cheapest cell in the last row, leftmost on ties.
pub fn lowest_foot(costs: &CostTable) -> u32 {
    let bottom = costs.row(costs.height() - 1);
    (0..costs.width())
        .min_by_key(|x| bottom[*x as usize])
        .unwrap_or(0)
}

/// Starting at `foot` in the bottom row, walk the backtrack table
/// upward and return the seam in top-to-bottom order.
pub fn backtrack(parents: &BacktrackTable, foot: u32) -> Seam {
    let height = parents.height();
    let mut seam_col = foot;
    (0..height)
        .rev()
        .fold(Seam::with_capacity(height as usize), |mut acc, y| {
            acc.push(seam_col);
            seam_col = parents[(seam_col, y)];
            acc
        })
        .into_iter()
        .rev()
        .collect()
}

/// Given an energy map, return the list of x-coordinates that, when
/// mapped with the range (0..height), give the XY coordinates for each
/// pixel in the seam to be removed.
pub fn energy_to_vertical_seam(energy: &EnergyMap) -> Seam {
    let (costs, parents) = vertical_tables(energy);
    backtrack(&parents, lowest_foot(&costs))
}

/// Build the full cost and backtrack tables, one row after another.
pub fn vertical_tables(energy: &EnergyMap) -> (CostTable, BacktrackTable) {
    let (mut costs, mut parents) = seed_tables(energy);
    for y in 1..energy.height() {
        let (finished, current) = costs.split_at_row_mut(y);
        let above = &finished[finished.len() - energy.width() as usize..];
        let (_, parent_row) = parents.split_at_row_mut(y);
        relax_columns(above, energy.row(y), 0, current, parent_row);
    }
    (costs, parents)
}

/// The total energy along a seam.
pub fn seam_energy(energy: &EnergyMap, seam: &[u32]) -> u64 {
    seam.iter()
        .enumerate()
        .map(|(y, x)| u64::from(energy[(*x, y as u32)]))
        .sum()
}
