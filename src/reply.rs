use crate::downloader::DownloadResult;
use crate::platform::Platform;

/// Action carried by a reply choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceAction {
    /// Open an external link directly.
    DirectLink(String),
    /// Re-run the download for the original URL.
    Retry(String),
}

/// One actionable element attached to a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub action: ChoiceAction,
}

/// Final output of one pipeline invocation: display text plus choices in
/// the order they should be rendered. Immutable once composed; delivery is
/// the transport's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyPayload {
    pub text: String,
    pub choices: Vec<Choice>,
}

impl ReplyPayload {
    fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choices: Vec::new(),
        }
    }
}

/// Turn an interpreted download outcome into a user-facing reply.
pub fn compose(platform: Platform, result: &DownloadResult, original_url: &str) -> ReplyPayload {
    match result {
        DownloadResult::Unsupported => ReplyPayload::text_only(
            "❌ Sorry, this site is not supported.\n\n\
             Supported: YouTube, Instagram, Facebook, Twitter/X, TikTok and more.",
        ),
        DownloadResult::Ready { link } => ReplyPayload {
            text: format!(
                "✅ {} download link ready!\n\nClick here: {}",
                platform, link
            ),
            choices: vec![
                Choice {
                    label: "⬇️ Download".to_string(),
                    action: ChoiceAction::DirectLink(link.clone()),
                },
                Choice {
                    label: "🔄 Try again".to_string(),
                    action: ChoiceAction::Retry(original_url.to_string()),
                },
            ],
        },
        DownloadResult::Failed { reason } => ReplyPayload::text_only(format!(
            "❌ Could not download ({}).\n\nTry another URL or try again later.",
            reason
        )),
    }
}

/// Reply for messages that contain no URL at all.
pub fn compose_missing_url() -> ReplyPayload {
    ReplyPayload::text_only(
        "Please send a valid social media URL to download.\n\
         Example: https://www.youtube.com/watch?v=...",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_reply_links_and_retries() {
        let result = DownloadResult::Ready {
            link: "https://cdn.example/video.mp4".to_string(),
        };
        let payload = compose(Platform::Youtube, &result, "https://youtu.be/abc");

        assert!(payload.text.contains("YouTube"));
        assert!(payload.text.contains("https://cdn.example/video.mp4"));
        assert_eq!(payload.choices.len(), 2);
        assert_eq!(
            payload.choices[0].action,
            ChoiceAction::DirectLink("https://cdn.example/video.mp4".to_string())
        );
        assert_eq!(
            payload.choices[1].action,
            ChoiceAction::Retry("https://youtu.be/abc".to_string())
        );
    }

    #[test]
    fn test_unsupported_reply_has_no_choices() {
        let payload = compose(
            Platform::Unknown,
            &DownloadResult::Unsupported,
            "https://unknown-video-site.example/clip",
        );
        assert!(payload.text.contains("not supported"));
        assert!(payload.choices.is_empty());
    }

    #[test]
    fn test_failed_reply_embeds_reason() {
        let result = DownloadResult::Failed {
            reason: "status 503".to_string(),
        };
        let payload = compose(Platform::Tiktok, &result, "https://tiktok.com/v/1");
        assert!(payload.text.contains("status 503"));
        assert!(payload.choices.is_empty());
    }

    #[test]
    fn test_missing_url_reply_guides_user() {
        let payload = compose_missing_url();
        assert!(payload.text.contains("valid social media URL"));
        assert!(payload.choices.is_empty());
    }
}
