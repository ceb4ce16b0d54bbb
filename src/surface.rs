use std::path::Path;

use image::{Rgb as ImageRgb, RgbImage};

use crate::error::{MazeError, Result};

/// A pixel display the maze draws onto. Channels are 0-255.
pub trait Surface {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn set_pixel(&mut self, x: usize, y: usize, r: u8, g: u8, b: u8);
    fn fill(&mut self, r: u8, g: u8, b: u8);

    fn clear(&mut self) {
        self.fill(0, 0, 0);
    }
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn set_pixel(&mut self, x: usize, y: usize, r: u8, g: u8, b: u8) {
        (**self).set_pixel(x, y, r, g, b)
    }

    fn fill(&mut self, r: u8, g: u8, b: u8) {
        (**self).fill(r, g, b)
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}

/// In-memory surface backed by an RGB image.
#[derive(Clone, Debug)]
pub struct ImageSurface {
    image: RgbImage,
}

impl ImageSurface {
    /// Fails if either side does not fit the image's `u32` dimensions.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
            return Err(MazeError::InvalidParams("surface dimensions exceed u32"));
        };
        Ok(Self {
            image: RgbImage::new(w, h),
        })
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn to_rgba(&self) -> Vec<u8> {
        image::DynamicImage::ImageRgb8(self.image.clone())
            .to_rgba8()
            .into_raw()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        self.image.save(path)
    }
}

impl Surface for ImageSurface {
    fn width(&self) -> usize {
        self.image.width() as usize
    }

    fn height(&self) -> usize {
        self.image.height() as usize
    }

    fn set_pixel(&mut self, x: usize, y: usize, r: u8, g: u8, b: u8) {
        if x < self.width() && y < self.height() {
            self.image.put_pixel(x as u32, y as u32, ImageRgb([r, g, b]));
        }
    }

    fn fill(&mut self, r: u8, g: u8, b: u8) {
        for p in self.image.pixels_mut() {
            *p = ImageRgb([r, g, b]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn image_surface_round_trip() {
        let mut s = ImageSurface::new(4, 3).unwrap();
        assert_eq!((s.width(), s.height()), (4, 3));
        s.fill(1, 2, 3);
        s.set_pixel(3, 2, 9, 8, 7);
        // Out of bounds writes are dropped.
        s.set_pixel(4, 0, 9, 9, 9);
        assert_eq!(s.image().get_pixel(3, 2).0, [9, 8, 7]);
        assert_eq!(s.image().get_pixel(0, 0).0, [1, 2, 3]);
        let rgba = s.to_rgba();
        assert_eq!(rgba.len(), 4 * 3 * 4);
        assert_eq!(&rgba[0..4], &[1, 2, 3, 255]);

        s.clear();
        assert_eq!(s.image().get_pixel(3, 2).0, [0, 0, 0]);
    }

    #[test]
    fn oversized_side_is_rejected_not_truncated() {
        let too_wide = u32::MAX as usize + 1;
        assert!(matches!(
            ImageSurface::new(too_wide, 1),
            Err(MazeError::InvalidParams(_))
        ));
        assert!(matches!(
            ImageSurface::new(1, too_wide),
            Err(MazeError::InvalidParams(_))
        ));
    }
}
