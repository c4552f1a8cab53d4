// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seamcarve - The main routines
//!
//! Seam removal, and the carver that repeats energy → seam → removal
//! until enough columns are gone.  Each iteration works on the image
//! the previous one produced, so iterations never overlap; the energy
//! map and DP tables are rebuilt every time because the image they
//! described no longer exists.

use crate::backend::{SeamBackend, Sequential};
use crate::error::{CarveError, Result};
use crate::raster::{Channel, RasterImage};
use crate::seamfinder::{seam_energy, Seam};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Return the cheapest vertical seam of an image, using the
/// sequential backend.
pub fn find_seam(image: &RasterImage) -> Seam {
    Sequential.find_seam(image)
}

// Copy one row of one plane, skipping the column on the seam.
fn remove_from_row(row: &[u8], column: usize, out: &mut Vec<u8>) {
    out.extend_from_slice(&row[..column]);
    out.extend_from_slice(&row[column + 1..]);
}

/// Build a new image, one column narrower, with the seam's pixel cut
/// out of every row of every plane.  Everything to the right of the
/// seam shifts left by one; nothing else moves.  The source image is
/// never touched, so on error the caller still holds a valid image.
pub fn remove_seam(image: &RasterImage, seam: &[u32]) -> Result<RasterImage> {
    let (width, height) = image.dimensions();
    if seam.len() != height as usize {
        return Err(CarveError::InvalidSeamLength {
            expected: height,
            actual: seam.len(),
        });
    }
    if width <= 1 {
        return Err(CarveError::DegenerateWidth(width));
    }
    if let Some((row, column)) = seam.iter().enumerate().find(|(_, x)| **x >= width) {
        return Err(CarveError::SeamOutOfBounds {
            row: row as u32,
            column: *column,
            width,
        });
    }

    let size = (width as usize - 1) * height as usize;
    let strip = |channel: Channel| {
        let mut plane = Vec::with_capacity(size);
        for (y, column) in seam.iter().enumerate() {
            remove_from_row(image.plane_row(channel, y as u32), *column as usize, &mut plane);
        }
        plane
    };
    RasterImage::new(
        width - 1,
        height,
        strip(Channel::Red),
        strip(Channel::Green),
        strip(Channel::Blue),
    )
}

/// Remove `columns` seams from an image with the given backend.
pub fn carve(image: RasterImage, columns: u32, backend: &dyn SeamBackend) -> Result<RasterImage> {
    SeamCarver::new(backend).carve(image, columns)
}

/// What one iteration did, for anyone watching.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationReport {
    /// Zero-based iteration number.
    pub iteration: u32,
    /// Dimensions of the image after the seam was removed.
    pub width: u32,
    pub height: u32,
    /// Total energy along the removed seam.
    pub seam_cost: u64,
    /// Wall-clock time for energy, search and removal together.
    pub elapsed: Duration,
}

type Observer<'a> = Box<dyn Fn(&IterationReport) + 'a>;

/// The carver.  It owns its backend for the whole run; to switch
/// backends, build another carver.
pub struct SeamCarver<'a, B: SeamBackend> {
    backend: B,
    observer: Option<Observer<'a>>,
}

impl<'a, B: SeamBackend> SeamCarver<'a, B> {
    pub fn new(backend: B) -> Self {
        SeamCarver {
            backend,
            observer: None,
        }
    }

    /// Call `observer` after every removal.
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&IterationReport) + 'a,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The next seam this carver would remove from `image`.
    pub fn find_seam(&self, image: &RasterImage) -> Seam {
        self.backend.find_seam(image)
    }

    /// Remove `columns` seams, one at a time.  `columns` must be less
    /// than the image's width.  On any error the run stops; no
    /// partially carved image is returned.
    pub fn carve(&self, image: RasterImage, columns: u32) -> Result<RasterImage> {
        let (width, height) = image.dimensions();
        if columns >= width {
            return Err(CarveError::TooManyColumns {
                requested: columns,
                width,
            });
        }
        info!(
            backend = self.backend.name(),
            width, height, columns, "carving"
        );

        let started = Instant::now();
        let mut scratch = image;
        for iteration in 0..columns {
            let begin = Instant::now();
            let energy = self.backend.energy(&scratch);
            let seam = self.backend.vertical_seam(&energy);
            let seam_cost = seam_energy(&energy, &seam);
            scratch = remove_seam(&scratch, &seam)?;

            debug!(iteration, width = scratch.width(), seam_cost, "removed seam");
            if let Some(observer) = &self.observer {
                observer(&IterationReport {
                    iteration,
                    width: scratch.width(),
                    height: scratch.height(),
                    seam_cost,
                    elapsed: begin.elapsed(),
                });
            }
        }

        info!(
            backend = self.backend.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            width = scratch.width(),
            "carving complete"
        );
        Ok(scratch)
    }

    /// Carve an image down to `new_width` columns.
    pub fn carve_to_width(&self, image: RasterImage, new_width: u32) -> Result<RasterImage> {
        let width = image.width();
        if new_width > width {
            return Err(CarveError::CannotUpscale {
                requested: new_width,
                width,
            });
        }
        self.carve(image, width - new_width)
    }
}
