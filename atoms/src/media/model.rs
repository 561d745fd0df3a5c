use serde::Deserialize;

use crate::crop::CropRegion;

/// POST /clients/{id}/motions
///
/// Carries either base64 video bytes destined for the managed bucket or an
/// externally hosted URL stored as-is.
#[derive(Debug, Deserialize)]
pub struct UploadMotionPayload {
    pub video_data: Option<String>,
    pub content_type: Option<String>,
    pub video_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// PATCH /clients/{id}/motions/{motion_id}
///
/// Optional fields merge over the existing record; a new `video_data` blob
/// replaces the stored video URL.
#[derive(Debug, Deserialize)]
pub struct UpdateMotionPayload {
    pub video_data: Option<String>,
    pub content_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// POST /clients/{id}/stills
///
/// Source image plus the crop selection made in the admin UI. `crop` absent
/// means the centered default for `target_aspect` is used. `replace_index`
/// switches the workflow from append-new to update-existing.
#[derive(Debug, Deserialize)]
pub struct UploadStillPayload {
    pub image_data: String,
    pub target_aspect: f64,
    pub crop: Option<CropRegion>,
    pub display_width: Option<f64>,
    pub display_height: Option<f64>,
    pub replace_index: Option<usize>,
}
