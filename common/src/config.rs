use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::video::VideoEntry;

// site configuration
//
// every knob the page scripts need lives here.  the page may embed a json
// document overriding any subset of these; anything left out keeps the
// default below, so an empty object is a valid configuration
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    pub nav: NavConfig,
    pub to_top: ToTopConfig,
    pub video: VideoConfig,
    pub gallery: GalleryConfig,
    pub codeword: CodewordConfig,
}

impl SiteConfig {
    #[instrument(skip_all)]
    pub fn from_json(text: &str) -> Result<Self> {
        let config: SiteConfig = serde_json::from_str(text)?;

        debug!(breakpoint = config.nav.desktop_breakpoint, "parsed site config");
        Ok(config)
    }
}

// navigation subtable
//
// the selectors accept css selector lists, so a page may use either the
// bootstrap markup (.navbar, .navbar-toggler, .navbar-collapse) or the plain
// one (.header, #nav-toggle, #nav-menu)
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct NavConfig {
    pub header_selector: String,
    pub toggle_selector: String,
    pub menu_selector: String,

    // in-page links that take part in smooth scrolling and highlighting
    pub link_selector: String,

    // first match inside the open menu receives keyboard focus
    pub menu_link_selector: String,

    // sections considered for the active link, in document order
    pub section_selector: String,

    // marker classes
    pub active_class: String,
    pub scrolled_class: String,
    pub expanded_class: String,
    pub toggle_open_class: String,
    pub menu_open_classes: Vec<String>,

    // the pseudo-section reported while the page sits near the top, also
    // matched by links pointing at "#" or "#top"
    pub top_section_id: String,

    // pixel thresholds
    pub top_threshold: f64,
    pub scrolled_threshold: f64,
    pub hide_threshold: f64,
    pub direction_delta: f64,
    pub section_margin: f64,
    pub scroll_offset: f64,
    pub fallback_header_height: f64,
    pub desktop_breakpoint: f64,

    // timings in milliseconds
    pub scroll_duration_ms: u32,
    pub resize_debounce_ms: u32,
    pub focus_delay_ms: u32,
    pub highlight_ms: u32,
}

impl Default for NavConfig {
    fn default() -> Self {
        NavConfig {
            header_selector: String::from(".navbar, .header"),
            toggle_selector: String::from(".navbar-toggler, #nav-toggle"),
            menu_selector: String::from(".navbar-collapse, #nav-menu"),
            link_selector: String::from(".js-scroll-trigger"),
            menu_link_selector: String::from(".nav-link"),
            section_selector: String::from(
                "section[id], div.relevantInTopNavToStyleTheActiveNavElement[id]",
            ),
            active_class: String::from("active"),
            scrolled_class: String::from("scrolled"),
            expanded_class: String::from("expanded"),
            toggle_open_class: String::from("nav__toggle--open"),
            menu_open_classes: vec![String::from("show"), String::from("nav__menu--open")],
            top_section_id: String::from("top"),
            top_threshold: 100.0,
            scrolled_threshold: 50.0,
            hide_threshold: 200.0,
            direction_delta: 10.0,
            section_margin: 100.0,
            scroll_offset: 20.0,
            fallback_header_height: 80.0,
            desktop_breakpoint: 992.0,
            scroll_duration_ms: 800,
            resize_debounce_ms: 250,
            focus_delay_ms: 100,
            highlight_ms: 2000,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ToTopConfig {
    pub button_selector: String,
    pub duration_ms: u32,
}

impl Default for ToTopConfig {
    fn default() -> Self {
        ToTopConfig {
            button_selector: String::from(".am-button_toTop"),
            duration_ms: 600,
        }
    }
}

// video modal subtable
//
// triggers are matched by element id, which on the current site happens to be
// the youtube id of the video they open
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct VideoConfig {
    pub videos: Vec<VideoEntry>,
    pub modal_selector: String,
    pub shown_class: String,
    pub close_selector: String,
    pub overlay_class: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        let videos = [
            ("uGmc8aE4_Ns", "uGmc8aE4_Ns"),
            ("GW4QvK7j6MY", "GW4QvK7j6MY"),
            ("QgVv8NrJIe8", "QgVv8NrJIe8"),
            ("6XbqUUd1B1Y", "6XbqUUd1B1Y"),
            ("Piwxe9ze23w", "Piwxe9ze23w"),
            ("L8rITVKba34", "L8rITVKba34"),
        ]
        .into_iter()
        .map(|(trigger, video)| VideoEntry {
            trigger: String::from(trigger),
            video: String::from(video),
        })
        .collect();

        VideoConfig {
            videos,
            modal_selector: String::from("section.am-modal"),
            shown_class: String::from("show-am-modal"),
            close_selector: String::from(".close-am-modal"),
            overlay_class: String::from("am-overlay"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub parent_selector: String,
    pub item_selector: String,
    pub source_class: String,

    // fraction of the viewport the open image may cover
    pub viewport_fill: f64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        GalleryConfig {
            parent_selector: String::from("#gallery_parent"),
            item_selector: String::from(".anm-image"),
            source_class: String::from("anm-source"),
            viewport_fill: 0.9,
        }
    }
}

// codeword subtable
//
// when reveal_href is unset, the result element's data-href attribute is used
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct CodewordConfig {
    pub trigger_id: String,
    pub result_id: String,
    pub reveal_class: String,
    pub hide_class: String,
    pub expected: String,
    pub max_attempts: u32,
    pub max_len: usize,
    pub reveal_href: Option<String>,
}

impl Default for CodewordConfig {
    fn default() -> Self {
        CodewordConfig {
            trigger_id: String::from("verlinkung"),
            result_id: String::from("result"),
            reveal_class: String::from("code_for_url"),
            hide_class: String::from("hide"),
            expected: String::from("intern"),
            max_attempts: 3,
            max_len: 10,
            reveal_href: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let config = SiteConfig::from_json("{}").unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = SiteConfig::from_json(
            r#"{ "nav": { "desktop_breakpoint": 768, "link_selector": ".nav__link" } }"#,
        )
        .unwrap();

        assert_eq!(config.nav.desktop_breakpoint, 768.0);
        assert_eq!(config.nav.link_selector, ".nav__link");
        assert_eq!(config.nav.scroll_offset, 20.0);
        assert_eq!(config.video.videos.len(), 6);
        assert_eq!(config.codeword.max_attempts, 3);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(SiteConfig::from_json("{ nav: ").is_err());
        assert!(SiteConfig::from_json(r#"{ "nav": { "top_threshold": "high" } }"#).is_err());
    }

    #[test]
    fn video_list_replaces_defaults() {
        let config = SiteConfig::from_json(
            r#"{ "video": { "videos": [ { "trigger": "intro", "video": "dQw4w9WgXcQ" } ] } }"#,
        )
        .unwrap();

        assert_eq!(config.video.videos.len(), 1);
        assert_eq!(config.video.videos[0].trigger, "intro");
        assert_eq!(config.video.shown_class, "show-am-modal");
    }
}
