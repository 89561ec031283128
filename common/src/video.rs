use std::sync::LazyLock;

use constcat::concat;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

// youtube video ids are always eleven url-safe base64 characters
pub const VIDEO_ID_REGEX: &str = r"^[A-Za-z0-9_-]{11}$";

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(VIDEO_ID_REGEX).expect("video id regex is valid")
});

pub const EMBED_ROOT: &str = "//www.youtube.com/embed/";
pub const EMBED_QUERY: &str = concat!("?", "autoplay=1", "&", "rel=0");
pub const IFRAME_PREFIX: &str = "am-youtube-";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct VideoEntry {
    // id of the element that opens the video
    pub trigger: String,

    // youtube id
    pub video: String,
}

impl VideoEntry {
    pub fn embed_url(&self) -> String {
        embed_url(&self.video)
    }

    pub fn iframe_id(&self) -> String {
        format!("{IFRAME_PREFIX}{}", self.video)
    }
}

pub fn embed_url(video: &str) -> String {
    format!("{EMBED_ROOT}{video}{EMBED_QUERY}")
}

// video registry
//
// built once from configuration; entries with a malformed video id or a
// duplicate trigger are dropped (and logged) rather than failing the page
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VideoRegistry {
    entries: Vec<VideoEntry>,
}

impl VideoRegistry {
    pub fn new(entries: impl IntoIterator<Item = VideoEntry>) -> Self {
        let mut accepted: Vec<VideoEntry> = Vec::new();

        for entry in entries {
            if !VIDEO_ID.is_match(&entry.video) {
                warn!({ trigger = %entry.trigger, video = %entry.video }, "ignoring malformed video id");
                continue;
            }

            if accepted.iter().any(|e| e.trigger == entry.trigger) {
                warn!({ trigger = %entry.trigger }, "ignoring duplicate video trigger");
                continue;
            }

            accepted.push(entry);
        }

        VideoRegistry { entries: accepted }
    }

    pub fn entries(&self) -> &[VideoEntry] {
        &self.entries
    }
}

// the modal shows at most one video; opening another replaces it
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VideoModal {
    playing: Option<String>,
}

impl VideoModal {
    pub fn open(&mut self, video: &str) {
        self.playing = Some(video.to_owned());
    }

    // returns the video that was playing, if any; None means there is nothing
    // to tear down
    pub fn close(&mut self) -> Option<String> {
        self.playing.take()
    }

    pub fn playing(&self) -> Option<&str> {
        self.playing.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VideoConfig;

    fn entry(trigger: &str, video: &str) -> VideoEntry {
        VideoEntry {
            trigger: trigger.to_owned(),
            video: video.to_owned(),
        }
    }

    #[test]
    fn embed_url_has_autoplay_and_no_related() {
        assert_eq!(
            embed_url("uGmc8aE4_Ns"),
            "//www.youtube.com/embed/uGmc8aE4_Ns?autoplay=1&rel=0"
        );
        assert_eq!(entry("x", "uGmc8aE4_Ns").iframe_id(), "am-youtube-uGmc8aE4_Ns");
    }

    #[test]
    fn default_videos_are_valid() {
        let config = VideoConfig::default();
        let registry = VideoRegistry::new(config.videos.clone());

        assert_eq!(registry.entries(), config.videos.as_slice());
    }

    #[test]
    fn registry_drops_bad_entries() {
        let registry = VideoRegistry::new([
            entry("a", "L8rITVKba34"),
            entry("b", "short"),
            entry("c", "<script>al"),
            entry("a", "Piwxe9ze23w"),
        ]);

        assert_eq!(registry.entries(), &[entry("a", "L8rITVKba34")]);
    }

    #[test]
    fn modal_holds_one_video() {
        let mut modal = VideoModal::default();
        assert_eq!(modal.close(), None);

        modal.open("L8rITVKba34");
        modal.open("Piwxe9ze23w");
        assert_eq!(modal.playing(), Some("Piwxe9ze23w"));

        assert_eq!(modal.close().as_deref(), Some("Piwxe9ze23w"));
        assert_eq!(modal.playing(), None);
    }

    #[test]
    fn dismissing_twice_reports_once() {
        let mut modal = VideoModal::default();
        modal.open("GW4QvK7j6MY");

        assert!(modal.close().is_some());
        assert!(modal.close().is_none());
        assert!(modal.close().is_none());
    }
}
