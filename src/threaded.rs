// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The threaded backend
//!
//! Two parts of each iteration parallelise cleanly.  The energy map is
//! one independent computation per pixel, so each row of the map is
//! handed to the pool with `par_chunks_mut`.  The cost table is not:
//! row y needs all of row y - 1.  But within a single row every cell
//! only reads the finished row above, so a wide row is cut into runs
//! of columns, and the parallel `for_each` returning is the barrier
//! that keeps row y + 1 from starting early.  Rows too narrow to split
//! are relaxed on the calling thread.  Backtracking is a single short
//! walk and stays on the calling thread.
//!
//! The pool is built once per `ComputeContext` and lives as long as
//! the backend does; no threads are started per row or per iteration.
//!
//! Both stages call the same per-pixel and per-cell functions as the
//! sequential backend, so the two produce identical maps and seams.

use crate::backend::SeamBackend;
use crate::energy::{dual_gradient_energy, EnergyMap};
use crate::error::{CarveError, Result};
use crate::raster::RasterImage;
use crate::seamfinder::{backtrack, energy_to_vertical_seam, lowest_foot, relax_columns, seed_tables, Seam};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::Arc;
use tracing::{debug, trace};

// Handing a run of cells to another worker costs about as much as
// relaxing a thousand of them.
const MIN_COLUMNS_PER_RUN: usize = 1024;

/// A prepared worker pool.  Cloning a context shares the pool.
#[derive(Debug, Clone)]
pub struct ComputeContext {
    pool: Arc<ThreadPool>,
}

impl ComputeContext {
    /// Start a pool of `workers` threads.  Fails if `workers` is zero
    /// or if the platform refuses to start the pool.
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(CarveError::BackendUnavailable(
                "threaded backend needs at least one worker".to_string(),
            ));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("seamcarver-{}", i))
            .build()
            .map_err(|e| CarveError::BackendUnavailable(format!("cannot start worker pool: {}", e)))?;
        debug!(workers, "worker pool ready");
        Ok(ComputeContext {
            pool: Arc::new(pool),
        })
    }

    /// One worker per logical CPU.
    pub fn detect() -> Result<Self> {
        ComputeContext::new(num_cpus::get())
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }
}

fn chunk_len(total: usize, workers: usize, minimum: usize) -> usize {
    let even = (total + workers - 1) / workers;
    even.max(minimum).max(1)
}

/// The data-parallel backend.
#[derive(Debug, Clone)]
pub struct Threaded {
    context: ComputeContext,
}

impl Threaded {
    pub fn new(context: ComputeContext) -> Self {
        Threaded { context }
    }

    /// How many columns of a `width`-wide row each worker relaxes.
    fn run_len(&self, width: u32) -> usize {
        chunk_len(width as usize, self.context.workers(), MIN_COLUMNS_PER_RUN)
    }
}

impl SeamBackend for Threaded {
    fn name(&self) -> &'static str {
        "threaded"
    }

    fn energy(&self, image: &RasterImage) -> EnergyMap {
        let (width, height) = image.dimensions();
        let mut emap = EnergyMap::new(width, height);
        self.context.pool.install(|| {
            emap.as_mut_slice()
                .par_chunks_mut(width as usize)
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, cell) in row.iter_mut().enumerate() {
                        *cell = dual_gradient_energy(image, x as u32, y as u32);
                    }
                });
        });
        emap
    }

    fn vertical_seam(&self, energy: &EnergyMap) -> Seam {
        let (width, height) = (energy.width(), energy.height());
        let run = self.run_len(width);
        if run >= width as usize {
            return energy_to_vertical_seam(energy);
        }

        let (mut costs, mut parents) = seed_tables(energy);
        self.context.pool.install(|| {
            for y in 1..height {
                let (finished, current) = costs.split_at_row_mut(y);
                let above = &finished[finished.len() - width as usize..];
                let (_, parent_row) = parents.split_at_row_mut(y);
                let energy_row = energy.row(y);
                trace!(row = y, run, "dispatching row");

                current
                    .par_chunks_mut(run)
                    .zip(parent_row.par_chunks_mut(run))
                    .enumerate()
                    .for_each(|(i, (cost_run, parent_run))| {
                        relax_columns(above, energy_row, (i * run) as u32, cost_run, parent_run);
                    });
            }
        });

        backtrack(&parents, lowest_foot(&costs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Sequential;

    fn striped(width: u32, height: u32) -> RasterImage {
        let size = (width * height) as usize;
        let red = (0..size).map(|i| ((i * 37) % 251) as u8).collect();
        let green = (0..size).map(|i| ((i * i) % 199) as u8).collect();
        let blue = (0..size).map(|i| ((i / 3) % 7 * 30) as u8).collect();
        RasterImage::new(width, height, red, green, blue).unwrap()
    }

    #[test]
    fn context_rejects_zero_workers() {
        assert!(ComputeContext::new(0).is_err());
        assert_eq!(ComputeContext::new(3).unwrap().workers(), 3);
    }

    #[test]
    fn chunk_len_covers_everything() {
        assert_eq!(chunk_len(10, 3, 1), 4);
        assert_eq!(chunk_len(10, 3, 64), 64);
        assert_eq!(chunk_len(1, 8, 1), 1);
    }

    #[test]
    fn clones_share_one_pool() {
        let context = ComputeContext::new(2).unwrap();
        let backend = Threaded::new(context.clone());
        assert!(Arc::ptr_eq(&context.pool, &backend.context.pool));
        assert_eq!(backend.context.workers(), 2);
    }

    #[test]
    fn narrow_rows_are_not_split() {
        let backend = Threaded::new(ComputeContext::new(8).unwrap());
        assert!(backend.run_len(400) >= 400);
        assert!(backend.run_len(1000) >= 1000);
        assert_eq!(backend.run_len(8192), 1024);
    }

    #[test]
    fn energy_matches_sequential() {
        let image = striped(13, 9);
        for workers in &[1, 2, 5, 32] {
            let threaded = Threaded::new(ComputeContext::new(*workers).unwrap());
            assert_eq!(threaded.energy(&image), Sequential.energy(&image));
        }
    }

    #[test]
    fn seam_matches_sequential_on_wide_rows() {
        // Wide enough that rows really are split between workers.
        let image = striped(2500, 7);
        let energy = Sequential.energy(&image);
        let threaded = Threaded::new(ComputeContext::new(4).unwrap());
        assert_eq!(threaded.vertical_seam(&energy), Sequential.vertical_seam(&energy));
    }

    #[test]
    fn ties_go_left_across_runs() {
        let energy = EnergyMap::new(3000, 5);
        let threaded = Threaded::new(ComputeContext::new(4).unwrap());
        assert_eq!(threaded.vertical_seam(&energy), [0, 0, 0, 0, 0]);
    }
}
