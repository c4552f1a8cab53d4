// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The raster image
//!
//! The carver works on three separate 8-bit planes rather than on an
//! interleaved pixel buffer.  Every plane is row-major and has exactly
//! `width * height` samples; nothing in the crate mutates a plane in
//! place.  Removing a seam builds a brand-new `RasterImage`.

use crate::error::{CarveError, Result};
use image::{GenericImageView, Pixel, Primitive, RgbImage};
use num_traits::NumCast;

/// Which of the three planes to address.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    red: Vec<u8>,
    green: Vec<u8>,
    blue: Vec<u8>,
}

impl RasterImage {
    /// Assemble an image from three row-major planes.
    pub fn new(width: u32, height: u32, red: Vec<u8>, green: Vec<u8>, blue: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CarveError::InvalidDimensions(format!(
                "{}x{} has no pixels",
                width, height
            )));
        }
        let expected = width as usize * height as usize;
        for (channel, plane) in Channel::ALL.iter().zip([&red, &green, &blue].iter()) {
            if plane.len() != expected {
                return Err(CarveError::InvalidDimensions(format!(
                    "{:?} plane has {} samples, {}x{} needs {}",
                    channel,
                    plane.len(),
                    width,
                    height,
                    expected
                )));
            }
        }
        Ok(RasterImage {
            width,
            height,
            red,
            green,
            blue,
        })
    }

    /// Convert any `image` view into planes.  Alpha is dropped, and
    /// subpixels wider than eight bits are rescaled onto 0..=255.
    pub fn from_view<I, P, S>(image: &I) -> Result<Self>
    where
        I: GenericImageView<Pixel = P>,
        P: Pixel<Subpixel = S> + 'static,
        S: Primitive + 'static,
    {
        let (width, height) = image.dimensions();
        let size = width as usize * height as usize;
        let (mut red, mut green, mut blue) = (
            Vec::with_capacity(size),
            Vec::with_capacity(size),
            Vec::with_capacity(size),
        );
        // `pixels()` walks in row-major order.
        for (_, _, pixel) in image.pixels() {
            let c = pixel.to_rgb().0;
            red.push(to_sample(c[0]));
            green.push(to_sample(c[1]));
            blue.push(to_sample(c[2]));
        }
        RasterImage::new(width, height, red, green, blue)
    }

    /// Interleave the planes back into an `image` buffer for encoding.
    pub fn to_rgb_image(&self) -> RgbImage {
        let mut raw = Vec::with_capacity(self.red.len() * 3);
        for i in 0..self.red.len() {
            raw.extend_from_slice(&[self.red[i], self.green[i], self.blue[i]]);
        }
        RgbImage::from_raw(self.width, self.height, raw)
            .expect("planes always hold width * height samples")
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The whole plane for one channel, row-major.
    pub fn plane(&self, channel: Channel) -> &[u8] {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
        }
    }

    /// One row of one channel.
    pub fn plane_row(&self, channel: Channel, y: u32) -> &[u8] {
        let width = self.width as usize;
        let start = y as usize * width;
        &self.plane(channel)[start..start + width]
    }

    /// The (red, green, blue) triple at a single pixel's address.
    pub fn sample(&self, x: u32, y: u32) -> [u8; 3] {
        let index = (y as usize) * (self.width as usize) + (x as usize);
        [self.red[index], self.green[index], self.blue[index]]
    }
}

fn to_sample<S: Primitive>(s: S) -> u8 {
    let value: f64 = NumCast::from(s).unwrap_or(0.0);
    let max: f64 = NumCast::from(S::DEFAULT_MAX_VALUE).unwrap_or(255.0);
    if max <= 0.0 {
        return 0;
    }
    (value / max * 255.0).round().max(0.0).min(255.0) as u8
}
