//! Blob store adapter over S3: upload-and-get-URL plus delete-by-URL.
//!
//! Deletion only ever touches blobs that live in the managed bucket.
//! Externally hosted URLs (client-supplied video links) are left alone.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

use crate::error::DomainError;

/// Key under which a new blob lands: `{prefix}/{client_id}/{timestamp}`.
pub fn blob_key(prefix: &str, client_id: &str) -> String {
    format!(
        "{}/{}/{}",
        prefix,
        client_id,
        chrono::Utc::now().timestamp_millis()
    )
}

pub fn public_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
}

/// Upload bytes and hand back the publicly fetchable URL.
pub async fn upload_blob(
    client: &S3Client,
    bucket: &str,
    region: &str,
    key: &str,
    bytes: Vec<u8>,
    content_type: &str,
) -> Result<String, DomainError> {
    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(bytes))
        .content_type(content_type)
        .send()
        .await
        .map_err(|e| DomainError::Upload(format!("S3 put_object error: {}", e)))?;

    Ok(public_url(bucket, region, key))
}

/// Delete the blob behind `url` if it belongs to the managed bucket.
/// Returns whether a deletion was issued; external URLs are a no-op.
pub async fn delete_by_url(
    client: &S3Client,
    bucket: &str,
    url: &str,
) -> Result<bool, DomainError> {
    let Some((url_bucket, key)) = parse_bucket_and_key(url) else {
        return Ok(false);
    };
    if url_bucket != bucket {
        return Ok(false);
    }

    client
        .delete_object()
        .bucket(url_bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| DomainError::RemoteCall(format!("S3 delete_object error: {}", e)))?;

    Ok(true)
}

/// Whether `url` points into the managed bucket.
pub fn is_managed_url(url: &str, bucket: &str) -> bool {
    parse_bucket_and_key(url)
        .map(|(b, _)| b == bucket)
        .unwrap_or(false)
}

/// Parse bucket and key from an S3 URL like
/// `https://bucket.s3.<region>.amazonaws.com/key` or
/// `https://s3.<region>.amazonaws.com/bucket/key`.
pub fn parse_bucket_and_key(url: &str) -> Option<(String, String)> {
    let no_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let (host, path) = no_scheme.split_once('/')?;
    if !host.contains(".amazonaws.com") {
        return None;
    }

    if host.starts_with("s3.") {
        // Path-style: s3.region.amazonaws.com/bucket/key
        let (bucket, key) = path.split_once('/')?;
        if key.is_empty() {
            return None;
        }
        Some((bucket.to_string(), key.to_string()))
    } else {
        // Virtual-hosted: bucket.s3.region.amazonaws.com/key
        let bucket = host.split(".s3").next()?;
        if bucket.is_empty() || path.is_empty() {
            return None;
        }
        Some((bucket.to_string(), path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_virtual_hosted_urls() {
        let (bucket, key) = parse_bucket_and_key(
            "https://showreel-media.s3.ap-southeast-2.amazonaws.com/motions/c1/1700000000000",
        )
        .unwrap();
        assert_eq!(bucket, "showreel-media");
        assert_eq!(key, "motions/c1/1700000000000");
    }

    #[test]
    fn parses_path_style_urls() {
        let (bucket, key) =
            parse_bucket_and_key("https://s3.ap-southeast-2.amazonaws.com/showreel-media/stills/c1/1")
                .unwrap();
        assert_eq!(bucket, "showreel-media");
        assert_eq!(key, "stills/c1/1");
    }

    #[test]
    fn rejects_non_s3_urls() {
        assert!(parse_bucket_and_key("https://vimeo.com/12345").is_none());
        assert!(parse_bucket_and_key("not a url").is_none());
    }

    #[test]
    fn managed_check_requires_bucket_match() {
        let managed =
            "https://showreel-media.s3.ap-southeast-2.amazonaws.com/motions/c1/1700000000000";
        assert!(is_managed_url(managed, "showreel-media"));
        assert!(!is_managed_url(managed, "other-bucket"));
        assert!(!is_managed_url("https://vimeo.com/12345", "showreel-media"));
    }

    #[test]
    fn blob_keys_are_scoped_to_client() {
        let key = blob_key("motions", "c1");
        assert!(key.starts_with("motions/c1/"));
    }
}
