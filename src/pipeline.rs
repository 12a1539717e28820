use std::sync::Arc;

use tracing::{debug, warn};

use crate::downloader::{self, DownloadApi, DownloadResult};
use crate::platform::{Platform, PlatformTable};
use crate::reply::{self, ReplyPayload};

/// Diagnostic strings shown to users are capped at this many bytes.
const REASON_PREVIEW_BYTES: usize = 100;

/// The URL-to-reply pipeline: classify, invoke the download API, interpret
/// the response, compose a reply. Holds the immutable platform table and
/// the API client; carries no per-request state.
pub struct Pipeline {
    table: PlatformTable,
    api: Arc<dyn DownloadApi>,
}

impl Pipeline {
    pub fn new(table: PlatformTable, api: Arc<dyn DownloadApi>) -> Self {
        Self { table, api }
    }

    /// Run the full pipeline for an extracted URL. Unknown hosts
    /// short-circuit before any outbound call.
    pub async fn run(&self, url: &str) -> ReplyPayload {
        let platform = self.table.classify(url);
        if platform == Platform::Unknown {
            debug!("Unsupported host in {}", url);
            return reply::compose(platform, &DownloadResult::Unsupported, url);
        }

        self.fetch_and_compose(platform, url).await
    }

    /// Re-enter the pipeline at the invocation step with a previously
    /// extracted URL (the retry choice).
    pub async fn retry(&self, url: &str) -> ReplyPayload {
        let platform = self.table.classify(url);
        self.fetch_and_compose(platform, url).await
    }

    async fn fetch_and_compose(&self, platform: Platform, url: &str) -> ReplyPayload {
        let result = match self.api.fetch(url).await {
            Ok(raw) => downloader::interpret(&raw),
            Err(e) => {
                warn!("Download API call failed: {:#}", e);
                let diagnostic = format!("{:#}", e);
                DownloadResult::Failed {
                    reason: downloader::truncate(&diagnostic, REASON_PREVIEW_BYTES).to_string(),
                }
            }
        };

        reply::compose(platform, &result, url)
    }
}
