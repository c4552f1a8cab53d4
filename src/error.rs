// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors raised by the carver.
//!
//! Energy computation and seam search never fail; only building an
//! image, removing a seam, and setting up a backend can.  None of
//! these are retried: the run stops and the current image is left as
//! it was.

use failure::Fail;

#[derive(Debug, Fail, PartialEq)]
pub enum CarveError {
    /// Planes of the wrong size, or a zero dimension.
    #[fail(display = "invalid image dimensions: {}", _0)]
    InvalidDimensions(String),

    /// The seam does not have exactly one column per image row.
    #[fail(
        display = "invalid seam length {}, image height {}",
        actual, expected
    )]
    InvalidSeamLength { expected: u32, actual: usize },

    /// A seam entry points past the right edge of the image.
    #[fail(
        display = "seam column {} at row {} is outside an image {} wide",
        column, row, width
    )]
    SeamOutOfBounds { row: u32, column: u32, width: u32 },

    /// A one-column image has nothing left to remove.
    #[fail(display = "cannot remove a seam from an image {} wide", _0)]
    DegenerateWidth(u32),

    /// More columns were requested than the image can give up.
    #[fail(
        display = "cannot remove {} columns from an image {} wide",
        requested, width
    )]
    TooManyColumns { requested: u32, width: u32 },

    /// A target width wider than the image; seams can only be removed.
    #[fail(
        display = "seam carving cannot upscale an image from {} to {} columns",
        width, requested
    )]
    CannotUpscale { requested: u32, width: u32 },

    /// A backend name nobody recognises.
    #[fail(display = "unknown backend '{}'", _0)]
    UnknownBackend(String),

    /// The requested compute context could not be brought up.
    #[fail(display = "backend unavailable: {}", _0)]
    BackendUnavailable(String),
}

pub type Result<T> = std::result::Result<T, CarveError>;
