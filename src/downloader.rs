use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::config::DownloaderConfig;

/// Candidate JSON fields probed for a download link, in priority order.
const LINK_FIELDS: &[&str] = &["url", "downloadUrl", "download_url", "video_url", "link"];

/// Preview length used when the response body carries no recognizable link.
const BODY_PREVIEW_BYTES: usize = 200;

/// Raw HTTP response from the download API. Non-2xx statuses are carried
/// here rather than surfaced as transport errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Outcome of one download-API invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadResult {
    Ready { link: String },
    Unsupported,
    Failed { reason: String },
}

/// Outbound call to the download API.
#[async_trait]
pub trait DownloadApi: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RawResponse>;
}

/// The real client: one GET per call against a fixed endpoint, with the
/// submitted URL as a query parameter. No retries, no caching.
pub struct HttpDownloadApi {
    client: reqwest::Client,
    api_url: String,
}

impl HttpDownloadApi {
    pub fn new(config: &DownloaderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }
}

#[async_trait]
impl DownloadApi for HttpDownloadApi {
    async fn fetch(&self, url: &str) -> Result<RawResponse> {
        debug!("Requesting download for {}", url);

        let response = self
            .client
            .get(&self.api_url)
            .query(&[("url", url)])
            .send()
            .await
            .context("Failed to reach the download API")?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("Failed to read the download API response")?;

        Ok(RawResponse { status, body })
    }
}

/// Interpret a raw API response into a download outcome.
///
/// Non-2xx statuses fail with the status code. A 2xx body is probed for a
/// link field; when nothing usable is found the raw body preview is passed
/// through as the link. Parse errors never escape this function.
pub fn interpret(raw: &RawResponse) -> DownloadResult {
    if !(200..300).contains(&raw.status) {
        return DownloadResult::Failed {
            reason: format!("status {}", raw.status),
        };
    }

    let link = probe_link(&raw.body)
        .unwrap_or_else(|| truncate(&raw.body, BODY_PREVIEW_BYTES).to_string());

    DownloadResult::Ready { link }
}

/// Probe the body's top-level JSON object for the first candidate field
/// holding a non-empty string.
fn probe_link(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    let object = parsed.as_object()?;

    LINK_FIELDS.iter().find_map(|field| {
        object
            .get(*field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Truncate to at most `max` bytes without splitting a UTF-8 char.
pub(crate) fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_json_url_field_becomes_link() {
        let result = interpret(&raw(200, r#"{"url": "https://cdn.example/video.mp4"}"#));
        assert_eq!(
            result,
            DownloadResult::Ready {
                link: "https://cdn.example/video.mp4".to_string()
            }
        );
    }

    #[test]
    fn test_candidate_fields_probed_in_order() {
        let body = r#"{"downloadUrl": "https://b.example/2", "url": "https://a.example/1"}"#;
        assert_eq!(
            interpret(&raw(200, body)),
            DownloadResult::Ready {
                link: "https://a.example/1".to_string()
            }
        );

        let body = r#"{"video_url": "https://c.example/3", "downloadUrl": "https://b.example/2"}"#;
        assert_eq!(
            interpret(&raw(200, body)),
            DownloadResult::Ready {
                link: "https://b.example/2".to_string()
            }
        );
    }

    #[test]
    fn test_empty_candidate_fields_are_skipped() {
        let body = r#"{"url": "", "link": "https://d.example/4"}"#;
        assert_eq!(
            interpret(&raw(200, body)),
            DownloadResult::Ready {
                link: "https://d.example/4".to_string()
            }
        );
    }

    #[test]
    fn test_non_json_body_falls_back_to_preview() {
        assert_eq!(
            interpret(&raw(200, "not json at all")),
            DownloadResult::Ready {
                link: "not json at all".to_string()
            }
        );
    }

    #[test]
    fn test_json_without_candidates_falls_back_to_preview() {
        let body = r#"{"title": "a video", "duration": 42}"#;
        assert_eq!(
            interpret(&raw(200, body)),
            DownloadResult::Ready {
                link: body.to_string()
            }
        );
    }

    #[test]
    fn test_non_object_json_falls_back_to_preview() {
        assert_eq!(
            interpret(&raw(200, "[1, 2, 3]")),
            DownloadResult::Ready {
                link: "[1, 2, 3]".to_string()
            }
        );
    }

    #[test]
    fn test_long_fallback_body_is_truncated() {
        let body = "x".repeat(500);
        match interpret(&raw(200, &body)) {
            DownloadResult::Ready { link } => assert_eq!(link.len(), BODY_PREVIEW_BYTES),
            other => panic!("expected Ready, got {:?}", other),
        }
    }

    #[test]
    fn test_non_success_status_fails_with_code() {
        assert_eq!(
            interpret(&raw(503, "...")),
            DownloadResult::Failed {
                reason: "status 503".to_string()
            }
        );
        assert_eq!(
            interpret(&raw(404, r#"{"url": "https://ignored.example"}"#)),
            DownloadResult::Failed {
                reason: "status 404".to_string()
            }
        );
    }

    #[test]
    fn test_interpret_is_idempotent() {
        let response = raw(200, r#"{"url": "https://cdn.example/v.mp4"}"#);
        assert_eq!(interpret(&response), interpret(&response));

        let failure = raw(500, "oops");
        assert_eq!(interpret(&failure), interpret(&failure));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "h");
        assert_eq!(truncate("héllo", 3), "hé");
        assert_eq!(truncate("short", 100), "short");
    }
}
