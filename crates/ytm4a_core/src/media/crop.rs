//! Centered square crop for thumbnails.

use std::path::Path;

use image::ImageFormat;
use thiserror::Error;

/// Errors from cropping an image file.
#[derive(Error, Debug)]
pub enum CropError {
    #[error("Image decode/encode failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Image has an empty dimension ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

/// A crop rectangle as (left, top, right, bottom) edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropBox {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    pub fn as_tuple(&self) -> (u32, u32, u32, u32) {
        (self.left, self.top, self.right, self.bottom)
    }
}

/// Compute the square box centered on the longer axis.
///
/// The offset is half the excess, rounded half to even. The far edges are
/// always `size` past the near ones so the result is square even when the
/// excess is odd.
pub fn square_crop_box(width: u32, height: u32) -> CropBox {
    let size = width.min(height);
    let excess = width.max(height) - size;
    let offset = (f64::from(excess) / 2.0).round_ties_even() as u32;

    let left = width - width.saturating_sub(offset).max(size);
    let top = height - height.saturating_sub(offset).max(size);

    CropBox {
        left,
        top,
        right: left + size,
        bottom: top + size,
    }
}

/// Crop the image at `path` to a centered square, overwriting it.
///
/// Returns the box that was applied. The output format follows the file
/// extension, falling back to the decoded format.
pub fn crop_to_square(path: &Path) -> Result<CropBox, CropError> {
    let reader = image::ImageReader::open(path)
        .map_err(image::ImageError::IoError)?
        .with_guessed_format()
        .map_err(image::ImageError::IoError)?;
    let detected = reader.format();
    let img = reader.decode()?;

    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(CropError::EmptyImage { width, height });
    }

    let bounds = square_crop_box(width, height);
    tracing::debug!(
        "Cropping {} from {}x{} to {:?}",
        path.display(),
        width,
        height,
        bounds.as_tuple()
    );

    let cropped = img.crop_imm(bounds.left, bounds.top, bounds.width(), bounds.height());

    let format = ImageFormat::from_path(path)
        .ok()
        .or(detected)
        .unwrap_or(ImageFormat::Jpeg);
    // JPEG has no alpha channel
    let cropped = if format == ImageFormat::Jpeg {
        image::DynamicImage::ImageRgb8(cropped.to_rgb8())
    } else {
        cropped
    };
    cropped.save_with_format(path, format)?;

    Ok(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    #[test]
    fn landscape_box_is_centered() {
        let b = square_crop_box(1920, 1080);
        assert_eq!(b.as_tuple(), (420, 0, 1500, 1080));
    }

    #[test]
    fn portrait_box_is_centered() {
        let b = square_crop_box(1080, 1920);
        assert_eq!(b.as_tuple(), (0, 420, 1080, 1500));
    }

    #[test]
    fn square_is_unchanged() {
        assert_eq!(square_crop_box(720, 720).as_tuple(), (0, 0, 720, 720));
    }

    #[test]
    fn odd_excess_stays_square() {
        // excess 3 -> 1.5 rounds to 2; excess 5 -> 2.5 rounds to 2
        let b = square_crop_box(5, 2);
        assert_eq!(b.as_tuple(), (2, 0, 4, 2));
        let b = square_crop_box(4, 9);
        assert_eq!(b.as_tuple(), (0, 2, 4, 6));
        for (w, h) in [(5, 2), (4, 9), (1281, 720), (480, 361), (100, 1)] {
            let b = square_crop_box(w, h);
            assert_eq!(b.width(), w.min(h));
            assert_eq!(b.height(), w.min(h));
            assert!(b.right <= w && b.bottom <= h);
        }
    }

    #[test]
    fn crops_file_in_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("abc123.jpg");

        // Red band in the middle, blue on the sides.
        let img = RgbImage::from_fn(160, 90, |x, _| {
            if (35..125).contains(&x) {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        });
        img.save(&path).unwrap();

        let bounds = crop_to_square(&path).unwrap();
        assert_eq!(bounds.as_tuple(), (35, 0, 125, 90));

        let cropped = image::open(&path).unwrap().to_rgb8();
        assert_eq!(cropped.dimensions(), (90, 90));
        let center = cropped.get_pixel(45, 45);
        assert!(center[0] > 200 && center[2] < 60);
    }

    #[test]
    fn png_keeps_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("thumb.png");
        RgbImage::new(30, 40).save(&path).unwrap();

        crop_to_square(&path).unwrap();

        let reopened = image::ImageReader::open(&path)
            .unwrap()
            .with_guessed_format()
            .unwrap();
        assert_eq!(reopened.format(), Some(ImageFormat::Png));
        assert_eq!(reopened.decode().unwrap().width(), 30);
    }

    #[test]
    fn missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            crop_to_square(&dir.path().join("nope.jpg")),
            Err(CropError::Image(_))
        ));
    }

    #[test]
    fn undecodable_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(crop_to_square(&path).is_err());
    }
}
