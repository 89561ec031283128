use std::{cell::RefCell, rc::Rc};

use anyhow::Result;
use gloo_events::{EventListener, EventListenerOptions};
use tracing::{debug, info};
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlImageElement, KeyboardEvent, Node,
};

use site_common::{
    config::GalleryConfig,
    gallery::{ImageItem, Lightbox},
};

use crate::common::dom;

struct GalleryEntry {
    thumbnail: HtmlImageElement,
    source: HtmlImageElement,
}

impl GalleryEntry {
    fn find(container: &Element, index: usize, config: &GalleryConfig) -> Option<Self> {
        let thumbnail = dom::query_in::<HtmlImageElement>(container, &format!("#thumbnail-{index}"))
            .or_else(|| dom::query_in(container, "img"))?;

        let source = dom::query_in::<HtmlImageElement>(container, &format!("#source-{index}"))
            .or_else(|| dom::query_in(container, &format!(".{}", config.source_class)))
            .or_else(|| dom::query_in(container, "img"))?;

        Some(GalleryEntry { thumbnail, source })
    }

    // sizes are read at open time; the source may have finished loading since
    // the page came up
    fn item(&self) -> ImageItem {
        let source = &self.source;

        ImageItem::new(
            source.src(),
            (source.natural_width(), source.natural_height()),
            (source.width(), source.height()),
        )
    }
}

// the overlay, built once and reused for every image
struct LightboxDom {
    root: HtmlElement,
    background: HtmlElement,
    image: HtmlImageElement,
    counter: HtmlElement,
    close: HtmlButtonElement,
    prev: HtmlButtonElement,
    next: HtmlButtonElement,
}

impl LightboxDom {
    fn build(doc: &Document) -> Result<Self> {
        let root: HtmlElement = dom::create(doc, "div", "lightbox")?;
        dom::set_attr(&root, "role", "dialog");
        dom::set_attr(&root, "aria-hidden", "true");

        let background: HtmlElement = dom::create(doc, "div", "lightbox__bg")?;
        let image: HtmlImageElement = dom::create(doc, "img", "lightbox__image")?;
        let counter: HtmlElement = dom::create(doc, "span", "lightbox__counter")?;

        let close = button(doc, "close", "×", "Close (Esc)")?;
        let prev = button(doc, "prev", "‹", "Previous (arrow left)")?;
        let next = button(doc, "next", "›", "Next (arrow right)")?;

        let children: [&Node; 6] = [
            background.as_ref(),
            image.as_ref(),
            counter.as_ref(),
            close.as_ref(),
            prev.as_ref(),
            next.as_ref(),
        ];
        for child in children {
            root.append_child(child).map_err(dom::js_err)?;
        }

        dom::body()?.append_child(&root).map_err(dom::js_err)?;

        Ok(LightboxDom {
            root,
            background,
            image,
            counter,
            close,
            prev,
            next,
        })
    }
}

fn button(doc: &Document, kind: &str, glyph: &str, title: &str) -> Result<HtmlButtonElement> {
    let button: HtmlButtonElement = dom::create(
        doc,
        "button",
        &format!("lightbox__button lightbox__button--{kind}"),
    )?;

    button.set_type("button");
    button.set_title(title);
    button.set_text_content(Some(glyph));

    Ok(button)
}

struct GalleryInner {
    config: GalleryConfig,
    entries: Vec<GalleryEntry>,
    overlay: LightboxDom,
    state: RefCell<Lightbox>,
}

// gallery lightbox
//
// clicking a thumbnail inside the gallery parent opens that image full size.
// there is a single overlay per page no matter how many images there are
pub fn bind(config: &GalleryConfig) -> Result<()> {
    let doc = dom::document()?;

    let Some(parent) = dom::query::<Element>(&doc, &config.parent_selector) else {
        debug!({ selector = %config.parent_selector }, "no gallery on page");
        return Ok(());
    };

    let entries: Vec<GalleryEntry> = dom::query_all_in::<Element>(&parent, &config.item_selector)
        .iter()
        .enumerate()
        .filter_map(|(i, container)| GalleryEntry::find(container, i, config))
        .collect();

    if entries.is_empty() {
        debug!("gallery has no images");
        return Ok(());
    }

    let inner = Rc::new(GalleryInner {
        config: config.clone(),
        entries,
        overlay: LightboxDom::build(&doc)?,
        state: RefCell::new(Lightbox::default()),
    });

    inner.listen(&doc);

    info!({ images = inner.entries.len() }, "gallery bound");
    Ok(())
}

impl GalleryInner {
    fn listen(self: &Rc<Self>, doc: &Document) {
        let mut listeners = Vec::new();

        for (i, entry) in self.entries.iter().enumerate() {
            dom::set_style(&entry.thumbnail, "cursor", "pointer");
            entry.thumbnail.set_title(&format!("View image {}", i + 1));

            let inner = Rc::clone(self);
            listeners.push(EventListener::new_with_options(
                &entry.thumbnail,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    event.prevent_default();
                    inner.open(i);
                },
            ));
        }

        let overlay = &self.overlay;

        listeners.push({
            let inner = Rc::clone(self);
            EventListener::new(&overlay.close, "click", move |_| inner.close())
        });

        listeners.push({
            let inner = Rc::clone(self);
            EventListener::new(&overlay.background, "click", move |_| inner.close())
        });

        listeners.push({
            let inner = Rc::clone(self);
            EventListener::new(&overlay.prev, "click", move |_| {
                inner.state.borrow_mut().prev();
                inner.render();
            })
        });

        listeners.push({
            let inner = Rc::clone(self);
            EventListener::new(&overlay.next, "click", move |_| {
                inner.state.borrow_mut().next();
                inner.render();
            })
        });

        listeners.push({
            let inner = Rc::clone(self);
            EventListener::new(doc, "keydown", move |event| {
                if !inner.state.borrow().is_open() {
                    return;
                }

                let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|e| e.key()) else {
                    return;
                };

                match key.as_str() {
                    "Escape" => inner.close(),
                    "ArrowLeft" => {
                        inner.state.borrow_mut().prev();
                        inner.render();
                    }
                    "ArrowRight" => {
                        inner.state.borrow_mut().next();
                        inner.render();
                    }
                    _ => (),
                }
            })
        });

        for listener in listeners {
            listener.forget();
        }
    }

    fn open(&self, index: usize) {
        let items = self.entries.iter().map(GalleryEntry::item).collect();

        if !self.state.borrow_mut().open(items, index) {
            debug!({ index = index }, "no gallery image at index");
            return;
        }

        dom::set_class(&self.overlay.root, "lightbox--open", true);
        dom::set_attr(&self.overlay.root, "aria-hidden", "false");
        dom::lock_body_scroll(true);

        self.render();
    }

    fn close(&self) {
        self.state.borrow_mut().close();

        dom::set_class(&self.overlay.root, "lightbox--open", false);
        dom::set_attr(&self.overlay.root, "aria-hidden", "true");
        self.overlay.image.set_src("");
        dom::lock_body_scroll(false);
    }

    fn render(&self) {
        let state = self.state.borrow();
        let Some(item) = state.current() else {
            return;
        };

        let (max_width, max_height) = match dom::inner_size() {
            Ok((w, h)) => (w * self.config.viewport_fill, h * self.config.viewport_fill),
            Err(_) => (item.width as f64, item.height as f64),
        };
        let (width, height) = item.fit(max_width, max_height);

        let image = &self.overlay.image;
        image.set_src(&item.src);
        dom::set_style(image, "width", &format!("{width}px"));
        dom::set_style(image, "height", &format!("{height}px"));

        let counter = state.counter();
        self.overlay.counter.set_text_content(counter.as_deref());
    }
}
