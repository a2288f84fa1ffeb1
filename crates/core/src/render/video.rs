//! Video URL classification for embeds.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static YOUTUBE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtube\.com/(?:watch\?(?:[^#]*&)?v=|embed/|shorts/)|youtu\.be/)([A-Za-z0-9_-]{6,})",
    )
    .expect("valid regex")
});

static VIMEO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"vimeo\.com/(?:video/|channels/[^/]+/)?(\d+)").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoProvider {
    YouTube,
    Vimeo,
    /// Any other `http` URL, embedded verbatim.
    Direct,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoEmbed {
    pub provider: VideoProvider,
    pub embed_url: String,
}

impl VideoEmbed {
    /// Direct links to a media file play in a `<video>` element rather than an iframe.
    pub fn is_media_file(&self) -> bool {
        let path = self
            .embed_url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        self.provider == VideoProvider::Direct
            && [".mp4", ".webm", ".ogg", ".mov"]
                .iter()
                .any(|ext| path.ends_with(ext))
    }
}

/// Classify a user-entered video reference.
///
/// Recognizes YouTube `watch?v=`, `embed/`, `shorts/` and `youtu.be/` links,
/// Vimeo `vimeo.com/<id>` links, a bare numeric string (a Vimeo id), and any
/// other `http`-prefixed URL used verbatim. Everything else is `None`.
pub fn parse_video_url(input: &str) -> Option<VideoEmbed> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(caps) = YOUTUBE_RE.captures(input) {
        return Some(VideoEmbed {
            provider: VideoProvider::YouTube,
            embed_url: format!("https://www.youtube.com/embed/{}", &caps[1]),
        });
    }
    if let Some(caps) = VIMEO_RE.captures(input) {
        return Some(vimeo(&caps[1]));
    }
    if input.chars().all(|c| c.is_ascii_digit()) {
        return Some(vimeo(input));
    }
    if input.starts_with("http") {
        return Some(VideoEmbed {
            provider: VideoProvider::Direct,
            embed_url: input.to_string(),
        });
    }
    None
}

fn vimeo(id: &str) -> VideoEmbed {
    VideoEmbed {
        provider: VideoProvider::Vimeo,
        embed_url: format!("https://player.vimeo.com/video/{id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_shapes() {
        for url in [
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=10",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "youtube.com/shorts/dQw4w9WgXcQ",
        ] {
            let embed = parse_video_url(url).unwrap();
            assert_eq!(embed.provider, VideoProvider::YouTube, "{url}");
            assert_eq!(embed.embed_url, "https://www.youtube.com/embed/dQw4w9WgXcQ");
        }
    }

    #[test]
    fn vimeo_shapes() {
        let bare = parse_video_url("76979871").unwrap();
        assert_eq!(bare.provider, VideoProvider::Vimeo);
        assert!(bare.embed_url.contains("76979871"));

        let linked = parse_video_url("https://vimeo.com/76979871").unwrap();
        assert_eq!(linked, bare);
    }

    #[test]
    fn other_http_urls_are_verbatim() {
        let embed = parse_video_url("https://cdn.example.com/intro.mp4?v=2").unwrap();
        assert_eq!(embed.provider, VideoProvider::Direct);
        assert_eq!(embed.embed_url, "https://cdn.example.com/intro.mp4?v=2");
        assert!(embed.is_media_file());
    }

    #[test]
    fn anything_else_is_no_video() {
        assert_eq!(parse_video_url("not a url"), None);
        assert_eq!(parse_video_url(""), None);
        assert_eq!(parse_video_url("   "), None);
        assert_eq!(parse_video_url("ftp://files/video"), None);
    }
}
