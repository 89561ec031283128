use std::{cell::RefCell, rc::Rc};

use anyhow::Result;
use gloo_events::{EventListener, EventListenerOptions};
use tracing::{debug, info};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, HtmlIFrameElement, KeyboardEvent};

use site_common::{
    config::VideoConfig,
    video::{VideoEntry, VideoModal, VideoRegistry},
};

use crate::common::dom;

struct VideoSlot {
    entry: VideoEntry,
    iframe: Option<HtmlIFrameElement>,
    modal: Option<HtmlElement>,
}

struct VideoInner {
    config: VideoConfig,
    slots: Vec<VideoSlot>,
    modals: Vec<HtmlElement>,
    state: RefCell<VideoModal>,
}

// video modals
//
// each trigger opens the modal section named after its video and starts the
// embedded player.  the iframe only gets a src while its modal is showing, so
// closing a modal also stops playback
pub fn bind(config: &VideoConfig) -> Result<()> {
    let doc = dom::document()?;
    let registry = VideoRegistry::new(config.videos.iter().cloned());

    let modals = dom::query_all::<HtmlElement>(&doc, &config.modal_selector);

    let slots: Vec<VideoSlot> = registry
        .entries()
        .iter()
        .map(|entry| VideoSlot {
            iframe: dom::by_id(&doc, &entry.iframe_id()),
            modal: modals
                .iter()
                .find(|m| dom::has_class(m, &entry.video))
                .cloned(),
            entry: entry.clone(),
        })
        .collect();

    let inner = Rc::new(VideoInner {
        config: config.clone(),
        slots,
        modals,
        state: RefCell::new(VideoModal::default()),
    });

    let mut bound = 0;
    for (index, slot) in inner.slots.iter().enumerate() {
        let Some(trigger) = dom::by_id::<Element>(&doc, &slot.entry.trigger) else {
            continue;
        };

        let inner = Rc::clone(&inner);
        EventListener::new_with_options(
            &trigger,
            "click",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                event.stop_propagation();
                inner.open(index);
            },
        )
        .forget();
        bound += 1;
    }

    if bound == 0 {
        debug!("no video triggers on page");
        return Ok(());
    }

    {
        let inner = Rc::clone(&inner);
        EventListener::new(&doc, "click", move |event| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };

            let on_close = target
                .closest(&inner.config.close_selector)
                .ok()
                .flatten()
                .is_some();

            let on_overlay = dom::has_class(&target, &inner.config.overlay_class);

            if on_close || on_overlay {
                inner.close();
            }
        })
        .forget();
    }

    {
        let inner = Rc::clone(&inner);
        EventListener::new(&doc, "keyup", move |event| {
            let escape = event
                .dyn_ref::<KeyboardEvent>()
                .is_some_and(|e| e.key() == "Escape");

            if escape {
                inner.close();
            }
        })
        .forget();
    }

    info!({ triggers = bound }, "video modals bound");
    Ok(())
}

impl VideoInner {
    fn open(&self, index: usize) {
        let Some(slot) = self.slots.get(index) else {
            return;
        };

        match &slot.iframe {
            Some(iframe) => iframe.set_src(&slot.entry.embed_url()),
            None => debug!({ video = %slot.entry.video }, "no player frame for video"),
        }

        if let Some(modal) = &slot.modal {
            dom::set_class(modal, &self.config.shown_class, true);
        }

        dom::lock_body_scroll(true);
        self.state.borrow_mut().open(&slot.entry.video);

        debug!({ video = %slot.entry.video }, "video opened");
    }

    // a no-op unless a video is up; the menu or the lightbox may hold the body
    // scroll lock in the meantime
    fn close(&self) {
        let Some(video) = self.state.borrow_mut().close() else {
            return;
        };

        for modal in &self.modals {
            dom::set_class(modal, &self.config.shown_class, false);
        }

        for iframe in self.slots.iter().filter_map(|s| s.iframe.as_ref()) {
            iframe.set_src("");
        }

        dom::lock_body_scroll(false);
        debug!({ video = %video }, "video closed");
    }
}
