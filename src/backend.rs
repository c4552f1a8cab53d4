// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seam backends
//!
//! A backend is the pair of operations that do the heavy lifting in
//! every iteration: turning an image into an energy map, and turning
//! an energy map into a seam.  The carver is handed one backend when
//! it is built and uses it for the whole run.  All backends must
//! return exactly the same energy maps and seams for the same input.

use crate::energy::{calculate_energy, EnergyMap};
use crate::error::{CarveError, Result};
use crate::raster::RasterImage;
use crate::seamfinder::{energy_to_vertical_seam, Seam};
use std::fmt;
use std::str::FromStr;

/// This trait defines how we will get seams out of an image.  It's a
/// primitive interface, just enough to make room for more than one
/// way of computing the same answer.
pub trait SeamBackend {
    /// A short name for logs.
    fn name(&self) -> &'static str;

    /// Compute the dual gradient energy of every pixel.
    fn energy(&self, image: &RasterImage) -> EnergyMap;

    /// Find the cheapest top-to-bottom seam through an energy map.
    fn vertical_seam(&self, energy: &EnergyMap) -> Seam;

    /// Both of the above, in order.
    fn find_seam(&self, image: &RasterImage) -> Seam {
        self.vertical_seam(&self.energy(image))
    }
}

impl<B: SeamBackend + ?Sized> SeamBackend for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn energy(&self, image: &RasterImage) -> EnergyMap {
        (**self).energy(image)
    }

    fn vertical_seam(&self, energy: &EnergyMap) -> Seam {
        (**self).vertical_seam(energy)
    }
}

impl<B: SeamBackend + ?Sized> SeamBackend for &B {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn energy(&self, image: &RasterImage) -> EnergyMap {
        (**self).energy(image)
    }

    fn vertical_seam(&self, energy: &EnergyMap) -> Seam {
        (**self).vertical_seam(energy)
    }
}

/// The plain single-threaded backend: one pixel, then one cell, at a time.
#[derive(Debug, Default, Copy, Clone)]
pub struct Sequential;

impl SeamBackend for Sequential {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn energy(&self, image: &RasterImage) -> EnergyMap {
        calculate_energy(image)
    }

    fn vertical_seam(&self, energy: &EnergyMap) -> Seam {
        energy_to_vertical_seam(energy)
    }
}

/// Which backend a run should use.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BackendKind {
    Sequential,
    Threaded,
}

impl FromStr for BackendKind {
    type Err = CarveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" | "cpu" => Ok(BackendKind::Sequential),
            "threaded" | "parallel" => Ok(BackendKind::Threaded),
            _ => Err(CarveError::UnknownBackend(s.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BackendKind::Sequential => write!(f, "sequential"),
            BackendKind::Threaded => write!(f, "threaded"),
        }
    }
}

/// Build the backend for a run.  `workers` only matters to the
/// threaded backend; `None` means one worker per CPU.  Any failure to
/// bring up the compute context is reported here, before carving.
pub fn build_backend(kind: BackendKind, workers: Option<usize>) -> Result<Box<dyn SeamBackend>> {
    match kind {
        BackendKind::Sequential => Ok(Box::new(Sequential)),
        BackendKind::Threaded => threaded_backend(workers),
    }
}

#[cfg(feature = "threaded")]
fn threaded_backend(workers: Option<usize>) -> Result<Box<dyn SeamBackend>> {
    use crate::threaded::{ComputeContext, Threaded};
    let context = match workers {
        Some(n) => ComputeContext::new(n)?,
        None => ComputeContext::detect()?,
    };
    Ok(Box::new(Threaded::new(context)))
}

#[cfg(not(feature = "threaded"))]
fn threaded_backend(_workers: Option<usize>) -> Result<Box<dyn SeamBackend>> {
    Err(CarveError::BackendUnavailable(
        "built without the `threaded` feature".to_string(),
    ))
}
