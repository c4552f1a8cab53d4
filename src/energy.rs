// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of an image
//!
//! The energy of a pixel is its dual gradient: the squared RGB
//! distance between its left and right neighbors plus the squared RGB
//! distance between its upper and lower neighbors.  Neighbors wrap
//! around the image borders, so column -1 is the rightmost column and
//! row -1 is the bottom row.  Most descriptions of seam carving clamp
//! at the border instead.  Switching to clamping would change the
//! energy of every border pixel, and with it the seams chosen.
//!
//! Each pixel's energy depends only on the source image, never on any
//! other energy value, so the whole grid can be computed in any order.

use crate::cq;
use crate::raster::RasterImage;
use crate::twodmap::TwoDimensionalMap;
use image::{GrayImage, ImageBuffer, Luma};
use itertools::iproduct;
use std::iter::zip;

/// A width × height grid of per-pixel energies.
pub type EnergyMap = TwoDimensionalMap<u32>;

// Takes the channels (R,G,B) from two pixels and maps the difference
// between each channel, squares it, and then sums them all up.  This
// is the rusty expression of:
//
//        |Δx|² = (Δrx)²+(Δgx)²+(Δbx)²
//        |Δy|² = (Δry)²+(Δgy)²+(Δby)²
//       e(x,y) = |Δx|²+|Δy|²
//
#[inline]
fn energy_of_pair(p1: &[u8; 3], p2: &[u8; 3]) -> u32 {
    zip(p1, p2)
        .map(|(c1, c2)| {
            let d = i32::from(*c1) - i32::from(*c2);
            (d * d) as u32
        })
        .sum()
}

/// The dual gradient energy of one pixel.  This is the only place the
/// energy formula lives; every backend calls it, which is what keeps
/// their grids bit-identical.
#[inline]
pub fn dual_gradient_energy(image: &RasterImage, x: u32, y: u32) -> u32 {
    let (mw, mh) = (image.width() - 1, image.height() - 1);
    let (left, right, up, down) = (
        cq!(x == 0, mw, x - 1),
        cq!(x >= mw, 0, x + 1),
        cq!(y == 0, mh, y - 1),
        cq!(y >= mh, 0, y + 1),
    );
    energy_of_pair(&image.sample(left, y), &image.sample(right, y))
        + energy_of_pair(&image.sample(x, up), &image.sample(x, down))
}

/// Compute the energy of every pixel in an image, one pixel at a time.
pub fn calculate_energy(image: &RasterImage) -> EnergyMap {
    let (width, height) = image.dimensions();
    let mut emap = EnergyMap::new(width, height);
    for (y, x) in iproduct!(0..height, 0..width) {
        emap[(x, y)] = dual_gradient_energy(image, x, y);
    }
    emap
}

/// Render an energy map as a grayscale image, scaled so the most
/// energetic pixel is white.  A flat map renders as solid black.
pub fn energy_to_image(energy: &EnergyMap) -> GrayImage {
    let (width, height) = (energy.width(), energy.height());
    let factor = u64::from(energy.as_slice().iter().copied().max().unwrap_or(0));
    let mut out: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::new(width, height);
    if factor == 0 {
        return out;
    }
    for (y, x) in iproduct!(0..height, 0..width) {
        let scaled = (u64::from(energy[(x, y)]) * 255 / factor).min(255);
        out.put_pixel(x, y, Luma([scaled as u8]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAY_DATA: [u8; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];
    const GRAY_ENERGY: [u32; 9] = [30, 39, 30, 111, 120, 111, 30, 39, 30];

    fn gray(width: u32, height: u32, data: &[u8]) -> RasterImage {
        RasterImage::new(width, height, data.to_vec(), data.to_vec(), data.to_vec()).unwrap()
    }

    #[test]
    fn energy_generator_works() {
        let energy = calculate_energy(&gray(3, 3, &GRAY_DATA));
        assert_eq!(energy.as_slice(), &GRAY_ENERGY);
    }

    #[test]
    fn energy_sums_all_three_channels() {
        let image = RasterImage::new(
            4,
            3,
            vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120],
            vec![0, 0, 0, 0, 0, 255, 0, 0, 0, 0, 0, 0],
            vec![5; 12],
        )
        .unwrap();
        let energy = calculate_energy(&image);
        assert_eq!(
            energy.as_slice(),
            &[2000, 67025, 2000, 2000, 71825, 6800, 71825, 6800, 2000, 67025, 2000, 2000]
        );
    }

    #[test]
    fn uniform_image_has_no_energy() {
        let image = RasterImage::new(5, 4, vec![200; 20], vec![13; 20], vec![77; 20]).unwrap();
        let energy = calculate_energy(&image);
        assert!(energy.as_slice().iter().all(|&e| e == 0));
    }

    // Two columns: both horizontal neighbors of column 0 are column 1,
    // so the horizontal gradient vanishes.  Clamping the border would
    // have compared column 0 against column 1 and produced 100².
    #[test]
    fn horizontal_neighbors_wrap_around() {
        let image = RasterImage::new(2, 2, vec![0, 100, 0, 100], vec![0; 4], vec![0; 4]).unwrap();
        let energy = calculate_energy(&image);
        assert_eq!(energy.as_slice(), &[0, 0, 0, 0]);
    }

    #[test]
    fn border_pixel_reads_the_opposite_edge() {
        // Left neighbor of column 0 is column 3, right neighbor is column 1.
        let image = gray(4, 1, &[0, 10, 0, 40]);
        assert_eq!(dual_gradient_energy(&image, 0, 0), 3 * 30 * 30);
        assert_eq!(dual_gradient_energy(&image, 3, 0), 0);
    }

    #[test]
    fn energy_image_is_normalised() {
        let energy = calculate_energy(&gray(3, 3, &GRAY_DATA));
        let img = energy_to_image(&energy);
        assert_eq!(img.get_pixel(1, 1), &Luma([255]));
        assert_eq!(img.get_pixel(0, 0), &Luma([(30 * 255 / 120) as u8]));
    }

    #[test]
    fn flat_energy_image_is_black() {
        let energy = EnergyMap::new(2, 2);
        assert!(energy_to_image(&energy).pixels().all(|p| p.0[0] == 0));
    }
}
