use anyhow::Result;
use tracing::{Level, info, warn};

use site_common::nav::Anchor;

mod common;
use common::{dom, load_config, style};

mod components;
use components::{carousel, codeword, gallery, navigation::NavigationController, to_top, video};

fn main() {
    dioxus_logger::init(Level::DEBUG).expect("failed to init logger");

    if let Err(err) = dom::on_ready(|| {
        if let Err(err) = start() {
            warn!({ error = %err }, "site scripts failed to start");
        }
    }) {
        warn!({ error = %err }, "no document to attach to");
    }
}

// navigation first, since the to-top button borrows its scroller.  the
// widgets are independent of each other and a page may have none of them
fn start() -> Result<()> {
    let doc = dom::document()?;
    let config = load_config(&doc);

    style::inject(&doc)?;

    let nav = NavigationController::new(config.nav.clone())?;
    nav.initialize()?;

    // arriving through a deep link, point out where the visitor landed
    // location.hash comes percent-encoded, ids like #über-uns do not
    let fragment = dom::window()?.location().hash().unwrap_or_default();
    let fragment = js_sys::decode_uri_component(&fragment)
        .map(String::from)
        .unwrap_or(fragment);
    if let Some(anchor) = Anchor::parse(&fragment) {
        nav.highlight_section(anchor.id())?;
    }

    let widgets: [(&str, Result<()>); 5] = [
        ("to-top", to_top::bind(&config.to_top, &nav)),
        ("video", video::bind(&config.video)),
        ("carousel", carousel::bind_all()),
        ("gallery", gallery::bind(&config.gallery)),
        ("codeword", codeword::bind(&config.codeword)),
    ];

    for (name, result) in widgets {
        if let Err(err) = result {
            warn!({ widget = name, error = %err }, "widget failed to start");
        }
    }

    info!({ section = ?nav.current_section() }, "site scripts ready");
    Ok(())
}
