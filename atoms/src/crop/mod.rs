//! Image crop workflow: centered-default crop geometry, the crop session
//! state machine, and rasterization of the selected region at native
//! resolution.
//!
//! The session covers `Idle -> ImageLoaded -> CropSelected -> Uploading ->
//! Succeeded | Failed`. Rasterization happens here; uploading the PNG bytes
//! and attaching the URL to a client document happens in `media`.

use std::io::Cursor;

use image::{DynamicImage, GenericImageView, ImageOutputFormat};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropUnit {
    Percent,
    Pixel,
}

/// Ephemeral crop selection. Lives for one crop session and is never
/// persisted; only the rasterized output is.
///
/// `Pixel` coordinates are in display space (the size the image was shown
/// at); `Percent` coordinates are relative to the source regardless of
/// display size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CropRegion {
    pub unit: CropUnit,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(alias = "aspectRatio")]
    pub aspect: f64,
}

/// Initial centered crop for a source image and target aspect ratio, in
/// pixel units of the source.
///
/// A source wider than the target shape gets a full-height crop centered
/// horizontally; otherwise a full-width crop centered vertically. Either way
/// the default never exceeds source bounds.
pub fn initial_crop(source_width: u32, source_height: u32, target_aspect: f64) -> CropRegion {
    let w = source_width as f64;
    let h = source_height as f64;
    let source_aspect = w / h;

    if source_aspect > target_aspect {
        let crop_w = h * target_aspect;
        CropRegion {
            unit: CropUnit::Pixel,
            x: (w - crop_w) / 2.0,
            y: 0.0,
            width: crop_w,
            height: h,
            aspect: target_aspect,
        }
    } else {
        let crop_h = w / target_aspect;
        CropRegion {
            unit: CropUnit::Pixel,
            x: 0.0,
            y: (h - crop_h) / 2.0,
            width: w,
            height: crop_h,
            aspect: target_aspect,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CropState {
    Idle,
    ImageLoaded,
    CropSelected,
    Uploading,
    Succeeded { url: String },
    Failed { message: String },
}

pub struct CropSession {
    image: Option<DynamicImage>,
    selection: Option<CropRegion>,
    state: CropState,
}

impl Default for CropSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CropSession {
    pub fn new() -> Self {
        Self {
            image: None,
            selection: None,
            state: CropState::Idle,
        }
    }

    pub fn state(&self) -> &CropState {
        &self.state
    }

    pub fn natural_dimensions(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|img| img.dimensions())
    }

    /// Decode the source image and seed the centered default selection.
    ///
    /// The default is stored in percent units. Pixel selections are display-
    /// space and get rescaled in [`CropSession::finalize`]; the default is
    /// computed against the source itself, so it must stay in a unit that the
    /// display size cannot shift.
    pub fn load_image(
        &mut self,
        bytes: &[u8],
        target_aspect: f64,
    ) -> Result<CropRegion, DomainError> {
        let img = image::load_from_memory(bytes).map_err(|e| {
            let err = DomainError::Render(format!("could not decode source image: {}", e));
            self.state = CropState::Failed {
                message: err.to_string(),
            };
            err
        })?;
        let (w, h) = img.dimensions();
        let crop = initial_crop(w, h, target_aspect);
        let selection = CropRegion {
            unit: CropUnit::Percent,
            x: crop.x / w as f64 * 100.0,
            y: crop.y / h as f64 * 100.0,
            width: crop.width / w as f64 * 100.0,
            height: crop.height / h as f64 * 100.0,
            aspect: target_aspect,
        };
        self.image = Some(img);
        self.selection = Some(selection);
        self.state = CropState::ImageLoaded;
        Ok(selection)
    }

    /// Record the user-adjusted selection.
    pub fn select(&mut self, region: CropRegion) {
        self.selection = Some(region);
        self.state = CropState::CropSelected;
    }

    /// Rasterize the current selection at native resolution and return
    /// lossless PNG bytes.
    ///
    /// `display_width`/`display_height` are the dimensions the selection was
    /// made against; pixel-unit selections are mapped back to natural
    /// resolution through the displayed/natural ratio. A zero-area selection
    /// is a validation failure and leaves the session state alone (no
    /// transition to uploading); render failures move the session to
    /// `Failed`.
    pub fn finalize(
        &mut self,
        display_width: f64,
        display_height: f64,
    ) -> Result<Vec<u8>, DomainError> {
        let Some((natural_w, natural_h)) = self.natural_dimensions() else {
            let err = DomainError::Render("no source image loaded".to_string());
            self.state = CropState::Failed {
                message: err.to_string(),
            };
            return Err(err);
        };
        let Some(region) = self.selection else {
            return Err(DomainError::Validation("no crop selected".to_string()));
        };

        if region.width <= 0.0 || region.height <= 0.0 {
            return Err(DomainError::Validation(
                "crop selection has zero area".to_string(),
            ));
        }
        let rect = match region.unit {
            CropUnit::Percent => pixel_rect(
                region.x / 100.0 * natural_w as f64,
                region.y / 100.0 * natural_h as f64,
                region.width / 100.0 * natural_w as f64,
                region.height / 100.0 * natural_h as f64,
                natural_w,
                natural_h,
            ),
            CropUnit::Pixel => {
                if display_width <= 0.0 || display_height <= 0.0 {
                    let err = DomainError::Render("zero-size canvas".to_string());
                    self.state = CropState::Failed {
                        message: err.to_string(),
                    };
                    return Err(err);
                }
                let scale_x = natural_w as f64 / display_width;
                let scale_y = natural_h as f64 / display_height;
                pixel_rect(
                    region.x * scale_x,
                    region.y * scale_y,
                    region.width * scale_x,
                    region.height * scale_y,
                    natural_w,
                    natural_h,
                )
            }
        };

        let Some((x, y, w, h)) = rect else {
            let err = DomainError::Render("crop resolves to a zero-area canvas".to_string());
            self.state = CropState::Failed {
                message: err.to_string(),
            };
            return Err(err);
        };

        let cropped = match self.image.as_ref() {
            Some(image) => image.crop_imm(x, y, w, h),
            None => {
                return Err(DomainError::Render("no source image loaded".to_string()));
            }
        };
        let mut out = Cursor::new(Vec::new());
        cropped
            .write_to(&mut out, ImageOutputFormat::Png)
            .map_err(|e| {
                let err = DomainError::Render(format!("PNG encode error: {}", e));
                self.state = CropState::Failed {
                    message: err.to_string(),
                };
                err
            })?;
        Ok(out.into_inner())
    }

    pub fn mark_uploading(&mut self) {
        self.state = CropState::Uploading;
    }

    pub fn mark_succeeded(&mut self, url: &str) {
        self.state = CropState::Succeeded {
            url: url.to_string(),
        };
    }

    pub fn mark_failed(&mut self, message: &str) {
        self.state = CropState::Failed {
            message: message.to_string(),
        };
    }
}

/// Clamp a float rect into source bounds and round to whole pixels.
/// `None` when nothing of the rect survives clamping.
fn pixel_rect(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    natural_w: u32,
    natural_h: u32,
) -> Option<(u32, u32, u32, u32)> {
    let x = x.max(0.0).min(natural_w as f64) as u32;
    let y = y.max(0.0).min(natural_h as f64) as u32;
    let w = (width.round() as u32).min(natural_w - x);
    let h = (height.round() as u32).min(natural_h - y);
    if w == 0 || h == 0 {
        return None;
    }
    Some((x, y, w, h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    const SIXTEEN_NINE: f64 = 16.0 / 9.0;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(width, height));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageOutputFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn matching_aspect_covers_full_image() {
        let crop = initial_crop(1920, 1080, SIXTEEN_NINE);
        assert!(crop.x.abs() < 1e-6);
        assert!(crop.y.abs() < 1e-6);
        assert!((crop.width - 1920.0).abs() < 1e-6);
        assert!((crop.height - 1080.0).abs() < 1e-6);
    }

    #[test]
    fn narrow_source_takes_full_width_branch() {
        // 1000x1000 against 16:9: the full-height branch would need a width
        // of 1000 * 16/9 and overflow the source, so full width wins.
        let crop = initial_crop(1000, 1000, SIXTEEN_NINE);
        assert!((crop.width - 1000.0).abs() < 1e-6);
        assert!((crop.height - 1000.0 / SIXTEEN_NINE).abs() < 1e-6);
        assert!(crop.x.abs() < 1e-6);
        assert!((crop.y - (1000.0 - 1000.0 / SIXTEEN_NINE) / 2.0).abs() < 1e-6);
    }

    #[test]
    fn wide_source_takes_full_height_branch() {
        let crop = initial_crop(4000, 1000, SIXTEEN_NINE);
        assert!((crop.height - 1000.0).abs() < 1e-6);
        assert!((crop.width - 1000.0 * SIXTEEN_NINE).abs() < 1e-6);
        assert!(crop.y.abs() < 1e-6);
    }

    #[test]
    fn zero_area_selection_fails_validation_before_upload() {
        let mut session = CropSession::new();
        session.load_image(&png_bytes(100, 100), 1.0).unwrap();
        session.select(CropRegion {
            unit: CropUnit::Pixel,
            x: 10.0,
            y: 10.0,
            width: 0.0,
            height: 50.0,
            aspect: 1.0,
        });
        let err = session.finalize(100.0, 100.0).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        // Validation failure never moves the session toward uploading.
        assert_eq!(session.state(), &CropState::CropSelected);
    }

    #[test]
    fn percent_selection_crops_relative_to_source() {
        let mut session = CropSession::new();
        session.load_image(&png_bytes(100, 50), 1.0).unwrap();
        session.select(CropRegion {
            unit: CropUnit::Percent,
            x: 25.0,
            y: 0.0,
            width: 50.0,
            height: 100.0,
            aspect: 1.0,
        });
        let png = session.finalize(100.0, 50.0).unwrap();
        let out = image::load_from_memory(&png).unwrap();
        assert_eq!(out.dimensions(), (50, 50));
    }

    #[test]
    fn pixel_selection_scales_display_to_natural() {
        // Natural 200x100 shown at 100x50: every display pixel is two
        // native pixels.
        let mut session = CropSession::new();
        session.load_image(&png_bytes(200, 100), 2.0).unwrap();
        session.select(CropRegion {
            unit: CropUnit::Pixel,
            x: 10.0,
            y: 5.0,
            width: 50.0,
            height: 25.0,
            aspect: 2.0,
        });
        let png = session.finalize(100.0, 50.0).unwrap();
        let out = image::load_from_memory(&png).unwrap();
        assert_eq!(out.dimensions(), (100, 50));
    }

    #[test]
    fn undecodable_source_is_a_render_failure() {
        let mut session = CropSession::new();
        let err = session.load_image(b"not an image", 1.0).unwrap_err();
        assert!(matches!(err, DomainError::Render(_)));
        assert!(matches!(session.state(), CropState::Failed { .. }));
    }

    #[test]
    fn default_selection_stays_centered_at_any_display_size() {
        // Top half white, bottom half black; a centered 16:9 default must
        // keep the crop straddling the boundary even when the image was
        // displayed smaller than its natural size.
        let source = RgbaImage::from_fn(1000, 1000, |_, y| {
            if y < 500 {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([0, 0, 0, 255])
            }
        });
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(source)
            .write_to(&mut bytes, ImageOutputFormat::Png)
            .unwrap();

        let mut session = CropSession::new();
        let seeded = session.load_image(&bytes.into_inner(), SIXTEEN_NINE).unwrap();
        assert_eq!(seeded.unit, CropUnit::Percent);

        // Shown at 500x500, but the default selection is source-relative.
        let png = session.finalize(500.0, 500.0).unwrap();
        let out = image::load_from_memory(&png).unwrap();
        assert_eq!(out.dimensions(), (1000, 563));
        // Rows above the source midline stay white, rows below stay black.
        assert_eq!(out.get_pixel(0, 200), image::Rgba([255, 255, 255, 255]));
        assert_eq!(out.get_pixel(0, 400), image::Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn default_selection_survives_finalize() {
        let mut session = CropSession::new();
        session.load_image(&png_bytes(1920, 1080), SIXTEEN_NINE).unwrap();
        // No explicit select: the centered default from load_image is used.
        let png = session.finalize(1920.0, 1080.0).unwrap();
        let out = image::load_from_memory(&png).unwrap();
        assert_eq!(out.dimensions(), (1920, 1080));
    }
}
