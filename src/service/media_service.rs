// service/media_service.rs
use serde_json::json;

use crate::config::Config;

/// Remote media storage client. Deletions are best-effort: a failed or
/// unreachable storage backend must never fail the job mutation that
/// triggered the cleanup, so every error path here is logged and swallowed.
#[derive(Debug, Clone)]
pub struct MediaService {
    http: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl MediaService {
    pub fn new(config: &Config) -> Self {
        MediaService {
            http: reqwest::Client::new(),
            cloud_name: config.media_cloud_name.clone(),
            api_key: config.media_api_key.clone(),
            api_secret: config.media_api_secret.clone(),
        }
    }

    fn is_configured(&self) -> bool {
        !self.cloud_name.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }

    /// Deletes the given attachment URLs from media storage. Attachments
    /// whose public id cannot be derived are skipped.
    pub async fn delete_attachments(&self, urls: &[String]) {
        if urls.is_empty() {
            return;
        }
        if !self.is_configured() {
            tracing::debug!(
                count = urls.len(),
                "media storage not configured, skipping attachment cleanup"
            );
            return;
        }

        for url in urls {
            let Some(public_id) = extract_public_id(url) else {
                tracing::warn!(%url, "could not derive media public id, skipping");
                continue;
            };
            if let Err(err) = self.destroy(&public_id).await {
                tracing::warn!(%url, %public_id, "media delete failed: {err}");
            }
        }
    }

    async fn destroy(&self, public_id: &str) -> Result<(), reqwest::Error> {
        let endpoint = format!(
            "https://api.cloudinary.com/v1_1/{}/image/destroy",
            self.cloud_name
        );

        let response = self
            .http
            .post(&endpoint)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .json(&json!({ "public_id": public_id }))
            .send()
            .await?;

        response.error_for_status()?;
        Ok(())
    }
}

/// Derives the storage public id from a delivery URL: the last two path
/// segments (folder and file name) with the file extension stripped.
pub fn extract_public_id(url: &str) -> Option<String> {
    let path = url.split('?').next()?;
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() < 2 {
        return None;
    }

    let folder = segments[segments.len() - 2];
    let file = segments[segments.len() - 1];
    let name = match file.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => file,
    };

    Some(format!("{}/{}", folder, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_id_uses_last_two_segments_without_extension() {
        let url = "https://res.cloudinary.com/demo/image/upload/v123/jobs/abc123.jpg";
        assert_eq!(extract_public_id(url).unwrap(), "jobs/abc123");
    }

    #[test]
    fn public_id_survives_query_strings_and_missing_extension() {
        let url = "https://res.cloudinary.com/demo/image/upload/v123/jobs/abc123?sig=x";
        assert_eq!(extract_public_id(url).unwrap(), "jobs/abc123");
    }

    #[test]
    fn public_id_rejects_too_short_urls() {
        assert_eq!(extract_public_id("abc123.jpg"), None);
        assert_eq!(extract_public_id(""), None);
    }
}
