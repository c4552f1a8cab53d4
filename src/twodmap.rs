// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The two-dimensional map
//!
//! Every derived table in the carver (the energy grid, the cumulative
//! cost table, and the backtrack table) is a width × height field of
//! small copyable values, stored row-major so that a whole row is one
//! contiguous slice.  That last property is what lets the threaded
//! backend hand out disjoint `chunks_mut` of a row to its workers.

use std::ops::{Index, IndexMut};

/// An addressable two-dimensional field.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoDimensionalMap<P: Default + Copy> {
    width: u32,
    height: u32,
    cells: Vec<P>,
}

impl<P: Default + Copy> TwoDimensionalMap<P> {
    /// Define a new map with every cell at its default value.
    pub fn new(width: u32, height: u32) -> Self {
        TwoDimensionalMap {
            width,
            height,
            cells: vec![P::default(); width as usize * height as usize],
        }
    }

    /// Wrap an existing row-major vector.  Returns `None` if the
    /// vector is not exactly `width * height` long.
    pub fn from_raw(width: u32, height: u32, cells: Vec<P>) -> Option<Self> {
        if cells.len() != width as usize * height as usize {
            return None;
        }
        Some(TwoDimensionalMap {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    // Absolutely, the number one name of this game is keep the index
    // math in a singular location and never, ever mess with it.
    fn get_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// One full row, left to right.
    pub fn row(&self, y: u32) -> &[P] {
        let start = self.get_index(0, y);
        &self.cells[start..start + self.width as usize]
    }

    /// The whole field, row-major.
    pub fn as_slice(&self) -> &[P] {
        &self.cells
    }

    /// The whole field, row-major and mutable.
    pub fn as_mut_slice(&mut self) -> &mut [P] {
        &mut self.cells
    }

    /// Split the field at row `y`, returning every row above it
    /// (read-only) and row `y` itself (mutable).  Dynamic programming
    /// passes read the finished rows while filling in the next one.
    pub fn split_at_row_mut(&mut self, y: u32) -> (&[P], &mut [P]) {
        let start = self.get_index(0, y);
        let width = self.width as usize;
        let (above, rest) = self.cells.split_at_mut(start);
        (above, &mut rest[..width])
    }
}

impl<P: Default + Copy> Index<(u32, u32)> for TwoDimensionalMap<P> {
    type Output = P;

    /// A convenience addressing mode for getting values.
    fn index(&self, (x, y): (u32, u32)) -> &P {
        let index = self.get_index(x, y);
        &self.cells[index]
    }
}

impl<P: Default + Copy> IndexMut<(u32, u32)> for TwoDimensionalMap<P> {
    /// A convenience addressing mode for setting values.
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut P {
        let index = self.get_index(x, y);
        &mut self.cells[index]
    }
}
