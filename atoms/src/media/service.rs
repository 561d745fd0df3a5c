//! Motion and still workflows: blob upload composed with document mutation.
//!
//! Writes replace the whole embedded sequence on the client document, so
//! every operation reads the document, edits the sequence in memory and
//! writes it back. Failures abort before the document write; nothing is
//! partially committed.

use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::Client as S3Client;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use super::model::{UpdateMotionPayload, UploadMotionPayload, UploadStillPayload};
use crate::clients::model::{Motion, Still};
use crate::clients::service as clients;
use crate::crop::CropSession;
use crate::error::DomainError;
use crate::storage;

/// Upload a motion: resolve the video URL (managed upload or external link),
/// read the owning client, denormalize its logo onto the record, append and
/// write the sequence back. A missing client aborts before any document
/// write.
pub async fn upload_motion(
    dynamo: &DynamoClient,
    s3: &S3Client,
    table_name: &str,
    bucket: &str,
    region: &str,
    client_id: &str,
    payload: UploadMotionPayload,
) -> Result<Motion, DomainError> {
    let video = match (payload.video_data, payload.video_url) {
        (Some(data), _) => {
            let bytes = decode_base64(&data)?;
            let content_type = payload
                .content_type
                .unwrap_or_else(|| "video/mp4".to_string());
            let key = storage::blob_key("motions", client_id);
            storage::upload_blob(s3, bucket, region, &key, bytes, &content_type).await?
        }
        (None, Some(url)) => url,
        (None, None) => {
            return Err(DomainError::Validation(
                "either video_data or video_url is required".to_string(),
            ))
        }
    };

    let mut doc = clients::get_client(dynamo, table_name, client_id).await?;

    let motion = Motion {
        motion_id: uuid::Uuid::new_v4().to_string(),
        client_id: client_id.to_string(),
        video,
        logo: doc.image.clone(),
        title: payload.title,
        description: payload.description,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    doc.motions.push(motion.clone());
    clients::set_motions(dynamo, table_name, client_id, &doc.motions).await?;

    Ok(motion)
}

/// Update a motion located by id, merging the supplied fields over the
/// existing record and writing the full sequence back. An unknown id fails
/// before any upload or document write. When a new video blob replaces a
/// managed one, the stale blob is removed once the write has landed.
pub async fn update_motion(
    dynamo: &DynamoClient,
    s3: &S3Client,
    table_name: &str,
    bucket: &str,
    region: &str,
    client_id: &str,
    motion_id: &str,
    payload: UpdateMotionPayload,
) -> Result<Motion, DomainError> {
    let mut doc = clients::get_client(dynamo, table_name, client_id).await?;
    let pos = locate_motion(&doc.motions, motion_id)?;

    let mut replaced_video = None;
    if let Some(data) = payload.video_data {
        let bytes = decode_base64(&data)?;
        let content_type = payload
            .content_type
            .unwrap_or_else(|| "video/mp4".to_string());
        let key = storage::blob_key("motions", client_id);
        let video = storage::upload_blob(s3, bucket, region, &key, bytes, &content_type).await?;
        replaced_video = Some(std::mem::replace(&mut doc.motions[pos].video, video));
    }
    if let Some(title) = payload.title {
        doc.motions[pos].title = Some(title);
    }
    if let Some(description) = payload.description {
        doc.motions[pos].description = Some(description);
    }

    clients::set_motions(dynamo, table_name, client_id, &doc.motions).await?;

    if let Some(old) = replaced_video {
        if is_stale_managed_blob(&old, &doc.motions[pos].video, bucket) {
            storage::delete_by_url(s3, bucket, &old).await?;
        }
    }

    Ok(doc.motions[pos].clone())
}

/// Delete a motion located by id. The document write lands first; the blob
/// behind the video URL is then removed only when it lives in the managed
/// bucket - external URLs are never touched.
pub async fn delete_motion(
    dynamo: &DynamoClient,
    s3: &S3Client,
    table_name: &str,
    bucket: &str,
    client_id: &str,
    motion_id: &str,
) -> Result<(), DomainError> {
    let mut doc = clients::get_client(dynamo, table_name, client_id).await?;
    let pos = locate_motion(&doc.motions, motion_id)?;

    let removed = doc.motions.remove(pos);
    clients::set_motions(dynamo, table_name, client_id, &doc.motions).await?;

    if storage::is_managed_url(&removed.video, bucket) {
        storage::delete_by_url(s3, bucket, &removed.video).await?;
    }

    Ok(())
}

/// Run the crop-and-upload workflow for a still: decode, crop at native
/// resolution, upload the PNG, then either replace the still at
/// `replace_index` or append a new one.
pub async fn upload_still(
    dynamo: &DynamoClient,
    s3: &S3Client,
    table_name: &str,
    bucket: &str,
    region: &str,
    client_id: &str,
    payload: UploadStillPayload,
) -> Result<Still, DomainError> {
    let bytes = decode_base64(&payload.image_data)?;

    let mut session = CropSession::new();
    session.load_image(&bytes, payload.target_aspect)?;
    if let Some(region_sel) = payload.crop {
        session.select(region_sel);
    }

    // Selections default to natural coordinates when the admin UI did not
    // report its display size.
    let (natural_w, natural_h) = session
        .natural_dimensions()
        .ok_or_else(|| DomainError::Render("no source image loaded".to_string()))?;
    let display_w = payload.display_width.unwrap_or(natural_w as f64);
    let display_h = payload.display_height.unwrap_or(natural_h as f64);

    let png = session.finalize(display_w, display_h)?;

    session.mark_uploading();
    let key = storage::blob_key("stills", client_id);
    let url = match storage::upload_blob(s3, bucket, region, &key, png, "image/png").await {
        Ok(url) => url,
        Err(e) => {
            session.mark_failed(&e.to_string());
            return Err(e);
        }
    };

    let mut doc = match clients::get_client(dynamo, table_name, client_id).await {
        Ok(doc) => doc,
        Err(e) => {
            session.mark_failed(&e.to_string());
            return Err(e);
        }
    };

    let stills = match payload.replace_index {
        // Update-existing continuation: swap the image URL in place.
        Some(index) => {
            if let Err(e) = still_index_in_range(index, doc.stills.len()) {
                session.mark_failed(&e.to_string());
                return Err(e);
            }
            doc.stills[index].image = url.clone();
            doc.stills
        }
        // Create-new continuation: append at the end of the grid.
        None => {
            doc.stills.push(Still {
                image: url.clone(),
                index: doc.stills.len(),
            });
            doc.stills
        }
    };

    let written = match clients::set_stills(dynamo, table_name, client_id, stills).await {
        Ok(written) => written,
        Err(e) => {
            session.mark_failed(&e.to_string());
            return Err(e);
        }
    };

    session.mark_succeeded(&url);
    written
        .into_iter()
        .find(|s| s.image == url)
        .ok_or_else(|| DomainError::Upload("uploaded still missing after write".to_string()))
}

/// Delete the still at `index`. Out-of-range indexes fail up front and leave
/// the stored sequence unchanged.
pub async fn delete_still(
    dynamo: &DynamoClient,
    s3: &S3Client,
    table_name: &str,
    bucket: &str,
    client_id: &str,
    index: usize,
) -> Result<(), DomainError> {
    let mut doc = clients::get_client(dynamo, table_name, client_id).await?;
    still_index_in_range(index, doc.stills.len())?;

    let removed = doc.stills.remove(index);
    clients::set_stills(dynamo, table_name, client_id, doc.stills).await?;

    if storage::is_managed_url(&removed.image, bucket) {
        storage::delete_by_url(s3, bucket, &removed.image).await?;
    }

    Ok(())
}

/// Locate a motion by id. Runs before any upload or write so an unknown id
/// never touches the stored sequence.
fn locate_motion(motions: &[Motion], motion_id: &str) -> Result<usize, DomainError> {
    motions
        .iter()
        .position(|m| m.motion_id == motion_id)
        .ok_or_else(|| DomainError::not_found("motion", motion_id))
}

/// Bounds check for position-addressed stills, ahead of any mutation.
fn still_index_in_range(index: usize, len: usize) -> Result<(), DomainError> {
    if index >= len {
        return Err(DomainError::IndexOutOfRange { index, len });
    }
    Ok(())
}

/// Whether a replaced video URL points at a managed blob that is now
/// unreferenced and should be deleted.
fn is_stale_managed_blob(old_url: &str, new_url: &str, bucket: &str) -> bool {
    old_url != new_url && storage::is_managed_url(old_url, bucket)
}

fn decode_base64(data: &str) -> Result<Vec<u8>, DomainError> {
    BASE64
        .decode(data.trim())
        .map_err(|e| DomainError::Validation(format!("invalid base64 payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motion(id: &str) -> Motion {
        Motion {
            motion_id: id.to_string(),
            client_id: "c1".to_string(),
            video: format!("https://cdn.example.com/{}.mp4", id),
            logo: "https://cdn.example.com/logo.png".to_string(),
            title: None,
            description: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn base64_decoding_rejects_garbage() {
        assert!(decode_base64("aGVsbG8=").is_ok());
        assert!(matches!(
            decode_base64("!!not base64!!"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn unknown_motion_id_fails_and_names_the_id() {
        let motions = vec![motion("a"), motion("b")];
        assert_eq!(locate_motion(&motions, "b").ok(), Some(1));
        assert!(matches!(
            locate_motion(&motions, "zzz"),
            Err(DomainError::NotFound { entity: "motion", .. })
        ));
        // The lookup borrows the sequence; a miss cannot have edited it.
        assert_eq!(motions.len(), 2);
        assert_eq!(motions[0].motion_id, "a");
    }

    #[test]
    fn still_index_beyond_length_is_rejected() {
        assert!(still_index_in_range(1, 2).is_ok());
        assert!(matches!(
            still_index_in_range(2, 2),
            Err(DomainError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(matches!(
            still_index_in_range(0, 0),
            Err(DomainError::IndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn replaced_video_cleanup_only_targets_managed_blobs() {
        let managed =
            "https://showreel-media.s3.ap-southeast-2.amazonaws.com/motions/c1/1700000000000";
        let managed_new =
            "https://showreel-media.s3.ap-southeast-2.amazonaws.com/motions/c1/1700000000001";
        assert!(is_stale_managed_blob(managed, managed_new, "showreel-media"));
        // External links and unchanged URLs are left alone.
        assert!(!is_stale_managed_blob(
            "https://vimeo.com/12345",
            managed_new,
            "showreel-media"
        ));
        assert!(!is_stale_managed_blob(managed, managed, "showreel-media"));
    }
}
