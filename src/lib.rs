//! Content-aware image narrowing.
//!
//! Repeatedly find the vertical seam of least dual-gradient energy and
//! cut it out, until the image is as narrow as requested.  The energy
//! map and seam search can run sequentially or across worker threads;
//! both give identical results.

pub mod ternary;

pub mod error;
pub use error::{CarveError, Result};

pub mod twodmap;

pub mod raster;
pub use raster::{Channel, RasterImage};

pub mod energy;
pub use energy::{calculate_energy, energy_to_image, EnergyMap};

pub mod seamfinder;
pub use seamfinder::{energy_to_vertical_seam, Seam};

pub mod backend;
pub use backend::{build_backend, BackendKind, SeamBackend, Sequential};

#[cfg(feature = "threaded")]
pub mod threaded;
#[cfg(feature = "threaded")]
pub use threaded::{ComputeContext, Threaded};

pub mod seamcarver;
pub use self::seamcarver::{carve, find_seam, remove_seam, IterationReport, SeamCarver};

pub mod logging;
