pub mod dom;
pub mod scroll;
pub mod style;

use gloo_console::error as console_error;
use tracing::{debug, error};
use web_sys::Document;

use site_common::config::SiteConfig;

// the page may carry <script type="application/json" id="site-config">
pub const CONFIG_ELEMENT_ID: &str = "site-config";

pub fn load_config(doc: &Document) -> SiteConfig {
    let Some(el) = doc.get_element_by_id(CONFIG_ELEMENT_ID) else {
        debug!("no site config on page, using defaults");
        return SiteConfig::default();
    };

    let text = el.text_content().unwrap_or_default();

    SiteConfig::from_json(&text).unwrap_or_else(|err| {
        console_error!(format!("Failed to parse #{CONFIG_ELEMENT_ID}: {err}"));
        error!({ error = %err }, "invalid site config, using defaults");
        SiteConfig::default()
    })
}
