use anyhow::Result;
use gloo_events::{EventListener, EventListenerOptions};
use tracing::debug;

use site_common::config::ToTopConfig;

use crate::{common::dom, components::navigation::NavigationController};

// the floating "back to top" button, if the page has one
pub fn bind(config: &ToTopConfig, nav: &NavigationController) -> Result<()> {
    let doc = dom::document()?;

    let Some(button) = dom::query::<web_sys::Element>(&doc, &config.button_selector) else {
        debug!({ selector = %config.button_selector }, "no to-top button on page");
        return Ok(());
    };

    let nav = nav.clone();
    let duration_ms = config.duration_ms;

    EventListener::new_with_options(
        &button,
        "click",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            event.prevent_default();
            nav.scroll_to_top(duration_ms);
        },
    )
    .forget();

    Ok(())
}
