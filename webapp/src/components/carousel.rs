use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use anyhow::Result;
use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Interval;
use js_sys::{Object, Reflect};
use tracing::{debug, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CustomEvent, CustomEventInit, Document, Event, HtmlButtonElement, HtmlElement, KeyboardEvent,
    TouchEvent,
};

use site_common::carousel::{Carousel, CarouselOptions, swipe};

use crate::common::dom;

const ATTRIBUTE: &str = "data-carousel";
const SLIDE_CHANGE: &str = "slideChange";

struct CarouselDom {
    root: HtmlElement,
    track: HtmlElement,
    slides: Vec<HtmlElement>,
    dots: Vec<HtmlButtonElement>,
    prev: Option<HtmlButtonElement>,
    next: Option<HtmlButtonElement>,
}

struct CarouselWidget {
    dom: CarouselDom,
    state: RefCell<Carousel>,
    autoplay: RefCell<Option<Interval>>,
    touch_start: Cell<Option<f64>>,
}

// turn every [data-carousel] element on the page into a carousel
pub fn bind_all() -> Result<()> {
    let doc = dom::document()?;
    let roots = dom::query_all::<HtmlElement>(&doc, &format!("[{ATTRIBUTE}]"));

    let mut bound = 0;
    for root in roots {
        match bind(&doc, root) {
            Ok(true) => bound += 1,
            Ok(false) => (),
            Err(err) => warn!({ error = %err }, "failed to set up carousel"),
        }
    }

    if bound > 0 {
        info!({ carousels = bound }, "carousels bound");
    }
    Ok(())
}

fn bind(doc: &Document, root: HtmlElement) -> Result<bool> {
    let options = match CarouselOptions::from_attr(root.get_attribute(ATTRIBUTE).as_deref()) {
        Ok(options) => options,
        Err(err) => {
            warn!({ id = %root.id(), error = %err }, "bad carousel options, using defaults");
            CarouselOptions::default()
        }
    };

    let Some((dom, state)) = build(doc, root, options)? else {
        return Ok(false);
    };

    let widget = Rc::new(CarouselWidget {
        dom,
        state: RefCell::new(state),
        autoplay: RefCell::new(None),
        touch_start: Cell::new(None),
    });

    widget.listen(doc);
    widget.update();

    if widget.state.borrow().options().auto_play {
        widget.start();
    }

    Ok(true)
}

// move the existing children into a track and add whatever controls the
// options ask for.  an empty element is left untouched
fn build(
    doc: &Document,
    root: HtmlElement,
    options: CarouselOptions,
) -> Result<Option<(CarouselDom, Carousel)>> {
    let children = root.children();
    let slides: Vec<HtmlElement> = (0..children.length())
        .filter_map(|i| children.item(i))
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .collect();

    if slides.is_empty() {
        debug!({ id = %root.id() }, "carousel has no slides");
        return Ok(None);
    }

    let state = Carousel::new(options, slides.len());
    let options = state.options();

    dom::set_class(&root, "carousel", true);

    // arrow keys only reach an element that can take focus
    if !root.has_attribute("tabindex") {
        dom::set_attr(&root, "tabindex", "0");
    }

    let track: HtmlElement = dom::create(doc, "div", "carousel__track")?;
    for (i, slide) in slides.iter().enumerate() {
        dom::set_class(slide, "carousel__slide", true);
        dom::set_attr(slide, "data-slide", &i.to_string());
        track.append_child(slide).map_err(dom::js_err)?;
    }
    root.append_child(&track).map_err(dom::js_err)?;

    let controls = state.has_controls();

    let (prev, next) = match controls && options.show_arrows {
        true => {
            let prev = arrow(doc, "prev", "‹", "Previous slide")?;
            let next = arrow(doc, "next", "›", "Next slide")?;
            root.append_child(&prev).map_err(dom::js_err)?;
            root.append_child(&next).map_err(dom::js_err)?;
            (Some(prev), Some(next))
        }
        false => (None, None),
    };

    let mut dots = Vec::new();
    if controls && options.show_dots {
        let container: HtmlElement = dom::create(doc, "div", "carousel__dots")?;

        for i in 0..slides.len() {
            let dot: HtmlButtonElement = dom::create(doc, "button", "carousel__dot")?;
            dot.set_type("button");
            dom::set_attr(&dot, "data-slide", &i.to_string());
            dom::set_attr(&dot, "aria-label", &format!("Go to slide {}", i + 1));
            container.append_child(&dot).map_err(dom::js_err)?;
            dots.push(dot);
        }

        root.append_child(&container).map_err(dom::js_err)?;
    }

    let dom = CarouselDom {
        root,
        track,
        slides,
        dots,
        prev,
        next,
    };

    Ok(Some((dom, state)))
}

fn arrow(doc: &Document, side: &str, glyph: &str, label: &str) -> Result<HtmlButtonElement> {
    let button: HtmlButtonElement =
        dom::create(doc, "button", &format!("carousel__arrow carousel__arrow--{side}"))?;

    button.set_type("button");
    button.set_text_content(Some(glyph));
    dom::set_attr(&button, "aria-label", label);

    Ok(button)
}

impl CarouselWidget {
    fn listen(self: &Rc<Self>, doc: &Document) {
        let root = &self.dom.root;
        let mut listeners = Vec::new();

        if let Some(prev) = &self.dom.prev {
            let widget = Rc::clone(self);
            listeners.push(EventListener::new(prev, "click", move |_| {
                widget.state.borrow_mut().prev();
                widget.update();
            }));
        }

        if let Some(next) = &self.dom.next {
            let widget = Rc::clone(self);
            listeners.push(EventListener::new(next, "click", move |_| {
                widget.state.borrow_mut().next();
                widget.update();
            }));
        }

        for (i, dot) in self.dom.dots.iter().enumerate() {
            let widget = Rc::clone(self);
            listeners.push(EventListener::new(dot, "click", move |_| {
                if widget.state.borrow_mut().go_to(i) {
                    widget.update();
                }
            }));
        }

        listeners.push({
            let widget = Rc::clone(self);
            EventListener::new_with_options(
                root,
                "keydown",
                EventListenerOptions::enable_prevent_default(),
                move |event| widget.on_key(event),
            )
        });

        listeners.push({
            let widget = Rc::clone(self);
            EventListener::new(root, "touchstart", move |event| {
                let x = event
                    .dyn_ref::<TouchEvent>()
                    .and_then(|e| e.touches().get(0))
                    .map(|t| t.client_x() as f64);
                widget.touch_start.set(x);
            })
        });

        listeners.push({
            let widget = Rc::clone(self);
            EventListener::new(root, "touchend", move |event| {
                let end = event
                    .dyn_ref::<TouchEvent>()
                    .and_then(|e| e.changed_touches().get(0))
                    .map(|t| t.client_x() as f64);

                let Some((start, end)) = widget.touch_start.take().zip(end) else {
                    return;
                };

                if let Some(direction) = swipe(start, end) {
                    widget.state.borrow_mut().apply_swipe(direction);
                    widget.update();
                }
            })
        });

        listeners.push({
            let widget = Rc::clone(self);
            EventListener::new(root, "mouseenter", move |_| {
                if widget.state.borrow().is_playing() {
                    widget.pause();
                }
            })
        });

        listeners.push({
            let widget = Rc::clone(self);
            EventListener::new(root, "mouseleave", move |_| {
                let resume = {
                    let state = widget.state.borrow();
                    state.options().auto_play && !state.is_playing()
                };

                if resume {
                    widget.start();
                }
            })
        });

        listeners.push({
            let widget = Rc::clone(self);
            let page = doc.clone();
            EventListener::new(doc, "visibilitychange", move |_| {
                if page.hidden() {
                    widget.pause();
                } else if widget.state.borrow().options().auto_play {
                    widget.start();
                }
            })
        });

        for listener in listeners {
            listener.forget();
        }
    }

    fn on_key(self: &Rc<Self>, event: &Event) {
        let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|e| e.key()) else {
            return;
        };

        match key.as_str() {
            "ArrowLeft" => {
                event.prevent_default();
                self.state.borrow_mut().prev();
                self.update();
            }
            "ArrowRight" => {
                event.prevent_default();
                self.state.borrow_mut().next();
                self.update();
            }
            " " => {
                event.prevent_default();
                self.toggle();
            }
            _ => (),
        }
    }

    // the interval is dropped, and so cleared, whenever playback stops
    fn start(self: &Rc<Self>) {
        let (started, interval) = {
            let mut state = self.state.borrow_mut();
            (state.start(), state.options().auto_play_interval)
        };

        if !started {
            return;
        }

        let widget = Rc::clone(self);
        let timer = Interval::new(interval, move || {
            widget.state.borrow_mut().next();
            widget.update();
        });

        *self.autoplay.borrow_mut() = Some(timer);
    }

    fn pause(&self) {
        self.state.borrow_mut().pause();
        self.autoplay.borrow_mut().take();
    }

    fn toggle(self: &Rc<Self>) {
        let playing = self.state.borrow().is_playing();

        match playing {
            true => self.pause(),
            false => self.start(),
        }
    }

    // the state borrow ends before any dom work, since slideChange listeners
    // run synchronously and may click an arrow
    fn update(&self) {
        let view = self.state.borrow().view();
        let current = view.current;

        dom::set_style(&self.dom.track, "transform", &view.translate);

        for (i, slide) in self.dom.slides.iter().enumerate() {
            let active = i == current;
            dom::set_class(slide, "carousel__slide--active", active);
            dom::set_attr(slide, "aria-hidden", if active { "false" } else { "true" });
        }

        for (i, dot) in self.dom.dots.iter().enumerate() {
            dom::set_class(dot, "carousel__dot--active", i == current);
        }

        if let Some(prev) = &self.dom.prev {
            prev.set_disabled(view.prev_disabled);
        }
        if let Some(next) = &self.dom.next {
            next.set_disabled(view.next_disabled);
        }

        if let Err(err) = self.announce(current, view.total) {
            debug!({ error = %err }, "failed to dispatch slide change");
        }
    }

    fn announce(&self, current: usize, total: usize) -> Result<()> {
        let detail = Object::new();
        Reflect::set(&detail, &"currentSlide".into(), &JsValue::from(current as u32))
            .map_err(dom::js_err)?;
        Reflect::set(&detail, &"totalSlides".into(), &JsValue::from(total as u32))
            .map_err(dom::js_err)?;

        let init = CustomEventInit::new();
        init.set_detail(&detail);

        let event = CustomEvent::new_with_event_init_dict(SLIDE_CHANGE, &init).map_err(dom::js_err)?;
        self.dom.root.dispatch_event(&event).map_err(dom::js_err)?;

        Ok(())
    }
}
