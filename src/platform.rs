use url::Url;

/// Social-media origin site of a submitted URL. Used for display text only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Youtube,
    Instagram,
    Facebook,
    Twitter,
    Tiktok,
    Snapchat,
    Pinterest,
    Linkedin,
    Reddit,
    Threads,
    Rumble,
    Twitch,
    Dailymotion,
    Vimeo,
    Unknown,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Platform::Youtube => "YouTube",
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::Twitter => "Twitter/X",
            Platform::Tiktok => "TikTok",
            Platform::Snapchat => "Snapchat",
            Platform::Pinterest => "Pinterest",
            Platform::Linkedin => "LinkedIn",
            Platform::Reddit => "Reddit",
            Platform::Threads => "Threads",
            Platform::Rumble => "Rumble",
            Platform::Twitch => "Twitch",
            Platform::Dailymotion => "Dailymotion",
            Platform::Vimeo => "Vimeo",
            Platform::Unknown => "Unknown",
        };
        write!(f, "{}", name)
    }
}

/// Ordered host-substring table mapping URL hosts to platforms.
///
/// Built once at startup and passed into the pipeline; iteration order is
/// significant because the first matching entry wins.
pub struct PlatformTable {
    entries: Vec<(&'static str, Platform)>,
}

impl Default for PlatformTable {
    fn default() -> Self {
        Self {
            entries: vec![
                ("youtube.com", Platform::Youtube),
                ("youtu.be", Platform::Youtube),
                ("instagram.com", Platform::Instagram),
                ("facebook.com", Platform::Facebook),
                ("fb.watch", Platform::Facebook),
                ("twitter.com", Platform::Twitter),
                ("x.com", Platform::Twitter),
                ("tiktok.com", Platform::Tiktok),
                ("snapchat.com", Platform::Snapchat),
                ("pinterest.com", Platform::Pinterest),
                ("pin.it", Platform::Pinterest),
                ("linkedin.com", Platform::Linkedin),
                ("reddit.com", Platform::Reddit),
                ("threads.net", Platform::Threads),
                ("rumble.com", Platform::Rumble),
                ("twitch.tv", Platform::Twitch),
                ("dailymotion.com", Platform::Dailymotion),
                ("dai.ly", Platform::Dailymotion),
                ("vimeo.com", Platform::Vimeo),
            ],
        }
    }
}

impl PlatformTable {
    /// Classify a URL by its host. Unparseable URLs and unregistered hosts
    /// both map to `Platform::Unknown`.
    pub fn classify(&self, url: &str) -> Platform {
        let host = match Url::parse(url) {
            Ok(parsed) => match parsed.host_str() {
                Some(h) => h.to_ascii_lowercase(),
                None => return Platform::Unknown,
            },
            Err(_) => return Platform::Unknown,
        };

        self.entries
            .iter()
            .find(|(pattern, _)| host.contains(pattern))
            .map(|(_, platform)| *platform)
            .unwrap_or(Platform::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_hosts_classify() {
        let table = PlatformTable::default();
        assert_eq!(
            table.classify("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Platform::Youtube
        );
        assert_eq!(table.classify("https://youtu.be/abc123"), Platform::Youtube);
        assert_eq!(
            table.classify("https://www.instagram.com/reel/xyz/"),
            Platform::Instagram
        );
        assert_eq!(table.classify("https://x.com/user/status/1"), Platform::Twitter);
        assert_eq!(table.classify("https://fb.watch/short"), Platform::Facebook);
        assert_eq!(table.classify("https://vm.tiktok.com/ZM1/"), Platform::Tiktok);
    }

    #[test]
    fn test_host_matching_is_case_insensitive() {
        let table = PlatformTable::default();
        assert_eq!(
            table.classify("https://WWW.YouTube.COM/watch?v=1"),
            Platform::Youtube
        );
    }

    #[test]
    fn test_unregistered_host_is_unknown() {
        let table = PlatformTable::default();
        assert_eq!(
            table.classify("https://unknown-video-site.example/clip/9"),
            Platform::Unknown
        );
    }

    #[test]
    fn test_unparseable_url_is_unknown() {
        let table = PlatformTable::default();
        assert_eq!(table.classify("https://"), Platform::Unknown);
        assert_eq!(table.classify("not a url at all"), Platform::Unknown);
    }

    #[test]
    fn test_table_order_decides_overlapping_matches() {
        // A host containing two registered substrings resolves to whichever
        // entry comes first in the table.
        let table = PlatformTable::default();
        assert_eq!(
            table.classify("https://youtube.com.x.com/v/1"),
            Platform::Youtube
        );
    }

    #[test]
    fn test_path_does_not_influence_classification() {
        let table = PlatformTable::default();
        assert_eq!(
            table.classify("https://cdn.example/youtube.com/video"),
            Platform::Unknown
        );
    }
}
