use std::{cell::RefCell, collections::HashMap, rc::Rc};

use anyhow::Result;
use gloo_events::{EventListener, EventListenerOptions};
use gloo_render::{AnimationFrame, request_animation_frame};
use gloo_timers::callback::Timeout;
use tracing::{debug, info, instrument, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Event, HtmlElement, KeyboardEvent};

use site_common::{
    config::NavConfig,
    nav::{Anchor, NavEffect, NavMsg, Navigation, PageLayout, SectionBox, link_matches},
};

use crate::common::{dom, scroll::SmoothScroller, style};

struct NavLink {
    element: HtmlElement,
    href: String,
}

struct Section {
    id: String,
    element: HtmlElement,
}

// element registry
//
// everything the controller touches, looked up once at startup.  link targets
// are resolved here too, so a click never has to go back to the document.
// any of it may be missing; the affected behavior just does nothing
struct NavDom {
    header: Option<HtmlElement>,
    toggle: Option<HtmlElement>,
    menu: Option<HtmlElement>,
    first_menu_link: Option<HtmlElement>,
    links: Vec<NavLink>,
    sections: Vec<Section>,
    targets: HashMap<String, HtmlElement>,
}

impl NavDom {
    fn build(doc: &Document, config: &NavConfig) -> Self {
        let header = dom::query::<HtmlElement>(doc, &config.header_selector);
        let toggle = dom::query::<HtmlElement>(doc, &config.toggle_selector);
        let menu = dom::query::<HtmlElement>(doc, &config.menu_selector);

        let first_menu_link = menu
            .as_ref()
            .and_then(|menu| dom::query_in::<HtmlElement>(menu, &config.menu_link_selector));

        let links: Vec<NavLink> = dom::query_all::<HtmlElement>(doc, &config.link_selector)
            .into_iter()
            .map(|element| NavLink {
                href: element.get_attribute("href").unwrap_or_default(),
                element,
            })
            .collect();

        let sections = dom::query_all::<HtmlElement>(doc, &config.section_selector)
            .into_iter()
            .filter_map(|element| {
                let id = element.id();
                (!id.is_empty()).then_some(Section { id, element })
            })
            .collect();

        let mut targets = HashMap::new();
        for link in &links {
            let Some(anchor) = Anchor::parse(&link.href) else {
                continue;
            };

            match dom::by_id::<HtmlElement>(doc, anchor.id()) {
                Some(target) => {
                    targets.insert(anchor.id().to_owned(), target);
                }
                None => warn!({ href = %link.href }, "nav link points at a missing element"),
            }
        }

        if header.is_none() {
            debug!({ selector = %config.header_selector }, "no header on page");
        }
        if toggle.is_none() || menu.is_none() {
            debug!("no mobile menu on page");
        }

        NavDom {
            header,
            toggle,
            menu,
            first_menu_link,
            links,
            sections,
            targets,
        }
    }

    fn header_height(&self, config: &NavConfig) -> f64 {
        self.header
            .as_ref()
            .map(|h| h.offset_height() as f64)
            .unwrap_or(config.fallback_header_height)
    }

    fn target_top(&self, href: &str) -> Option<f64> {
        let anchor = Anchor::parse(href)?;

        self.targets
            .get(anchor.id())
            .map(|target| target.offset_top() as f64)
    }

    fn measure(&self, config: &NavConfig) -> PageLayout {
        PageLayout {
            scroll_y: dom::scroll_y(),
            header_height: self.header_height(config),
            sections: self
                .sections
                .iter()
                .map(|s| {
                    SectionBox::new(
                        s.id.clone(),
                        s.element.offset_top() as f64,
                        s.element.offset_height() as f64,
                    )
                })
                .collect(),
        }
    }
}

struct NavInner {
    config: NavConfig,
    dom: NavDom,
    nav: RefCell<Navigation>,
    frame: RefCell<Option<AnimationFrame>>,
    resize: RefCell<Option<Timeout>>,
    scroller: SmoothScroller,
}

// NavigationController
//
// the one owner of navbar behavior on the page.  dom events are turned into
// NavMsg values for the state machine in site_common, and the effects it
// returns are applied here.  cloning hands out another reference to the same
// controller
#[derive(Clone)]
pub struct NavigationController {
    inner: Rc<NavInner>,
}

impl NavigationController {
    pub fn new(config: NavConfig) -> Result<Self> {
        let doc = dom::document()?;
        let registry = NavDom::build(&doc, &config);
        let nav = Navigation::new(config.clone(), dom::scroll_y());

        Ok(NavigationController {
            inner: Rc::new(NavInner {
                config,
                dom: registry,
                nav: RefCell::new(nav),
                frame: RefCell::new(None),
                resize: RefCell::new(None),
                scroller: SmoothScroller::default(),
            }),
        })
    }

    // attach every listener and sync the page with the current scroll offset
    //
    // listeners live for the rest of the page, so this must run only once
    #[instrument(skip_all)]
    pub fn initialize(&self) -> Result<()> {
        let window = dom::window()?;
        let doc = dom::document()?;
        let inner = &self.inner;

        let mut listeners = Vec::new();

        if let Some(toggle) = &inner.dom.toggle {
            let inner = Rc::clone(inner);
            listeners.push(EventListener::new_with_options(
                toggle,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event| inner.dispatch(NavMsg::ToggleClick, Some(event)),
            ));
        }

        for link in &inner.dom.links {
            let inner = Rc::clone(inner);
            let href = link.href.clone();
            listeners.push(EventListener::new_with_options(
                &link.element,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event| inner.on_link_click(&href, event),
            ));
        }

        listeners.push({
            let inner = Rc::clone(inner);
            EventListener::new(&window, "scroll", move |_| {
                inner.dispatch(NavMsg::Scroll, None)
            })
        });

        listeners.push({
            let inner = Rc::clone(inner);
            EventListener::new(&doc, "click", move |event| inner.on_document_click(event))
        });

        listeners.push({
            let inner = Rc::clone(inner);
            EventListener::new(&doc, "keydown", move |event| {
                if let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|e| e.key()) {
                    inner.dispatch(NavMsg::KeyDown { key }, Some(event));
                }
            })
        });

        listeners.push({
            let inner = Rc::clone(inner);
            EventListener::new(&window, "resize", move |_| inner.schedule_resize())
        });

        for listener in listeners {
            listener.forget();
        }

        inner.update_viewport_unit();

        let layout = inner.dom.measure(&inner.config);
        let effects = inner.nav.borrow_mut().initialize(&layout);
        inner.apply(effects, None);

        info!(
            {
                links = inner.dom.links.len(),
                sections = inner.dom.sections.len(),
                targets = inner.dom.targets.len()
            },
            "navigation initialized"
        );
        Ok(())
    }

    pub fn scroll_to_top(&self, duration_ms: u32) {
        self.inner.scroller.scroll_to(0.0, duration_ms);
    }

    pub fn current_section(&self) -> Option<String> {
        let layout = self.inner.dom.measure(&self.inner.config);
        self.inner.nav.borrow().current_section(&layout)
    }

    // briefly tint a section, e.g. after jumping to it from elsewhere
    pub fn highlight_section(&self, id: &str) -> Result<()> {
        let doc = dom::document()?;
        let Some(section) = dom::by_id::<HtmlElement>(&doc, id) else {
            debug!({ id = id }, "no section to highlight");
            return Ok(());
        };

        dom::set_style(&section, "transition", style::HIGHLIGHT_TRANSITION);
        dom::set_style(&section, "background-color", style::HIGHLIGHT_BACKGROUND);

        Timeout::new(self.inner.config.highlight_ms, move || {
            dom::set_style(&section, "background-color", "");
        })
        .forget();

        Ok(())
    }
}

impl NavInner {
    // all state changes go through here; the borrow on the state machine ends
    // before any dom work starts, since effects may trigger further events
    fn dispatch(self: &Rc<Self>, msg: NavMsg, event: Option<&Event>) {
        let effects = self.nav.borrow_mut().handle(msg);
        self.apply(effects, event);
    }

    fn apply(self: &Rc<Self>, effects: Vec<NavEffect>, event: Option<&Event>) {
        for effect in effects {
            match effect {
                NavEffect::RequestFrame => self.request_frame(),
                NavEffect::ActivateLink(active) => self.activate_link(active.as_deref()),
                NavEffect::HeaderScrolled(scrolled) => self.set_header_scrolled(scrolled),
                NavEffect::HeaderHidden(hidden) => self.set_header_hidden(hidden),
                NavEffect::OpenMenu => self.show_menu(true),
                NavEffect::CloseMenu => self.show_menu(false),
                NavEffect::PreventDefault => {
                    if let Some(event) = event {
                        event.prevent_default();
                    }
                }
                NavEffect::StopPropagation => {
                    if let Some(event) = event {
                        event.stop_propagation();
                    }
                }
                NavEffect::ScrollTo { top, duration_ms } => {
                    self.scroller.scroll_to(top, duration_ms)
                }
                NavEffect::ReplaceFragment(href) => {
                    if let Err(err) = replace_fragment(&href) {
                        debug!({ href = %href, error = %err }, "failed to update url fragment");
                    }
                }
            }
        }
    }

    fn request_frame(self: &Rc<Self>) {
        let inner = Rc::clone(self);
        let frame = request_animation_frame(move |_| inner.on_frame());

        *self.frame.borrow_mut() = Some(frame);
    }

    fn on_frame(self: &Rc<Self>) {
        let layout = self.dom.measure(&self.config);
        self.dispatch(NavMsg::Frame(layout), None);
    }

    fn on_link_click(self: &Rc<Self>, href: &str, event: &Event) {
        let msg = NavMsg::LinkClick {
            href: href.to_owned(),
            target_top: self.dom.target_top(href),
            header_height: self.dom.header_height(&self.config),
        };

        self.dispatch(msg, Some(event));
    }

    fn on_document_click(self: &Rc<Self>, event: &Event) {
        let target = event.target();

        let in_menu = self
            .dom
            .menu
            .as_ref()
            .is_some_and(|menu| dom::contains(menu, target.as_ref()));
        let in_toggle = self
            .dom
            .toggle
            .as_ref()
            .is_some_and(|toggle| dom::contains(toggle, target.as_ref()));

        self.dispatch(NavMsg::DocumentClick { in_menu, in_toggle }, Some(event));
    }

    // replacing the pending timeout drops, and so cancels, the previous one
    fn schedule_resize(self: &Rc<Self>) {
        let inner = Rc::clone(self);
        let timeout = Timeout::new(self.config.resize_debounce_ms, move || inner.on_resize());

        *self.resize.borrow_mut() = Some(timeout);
    }

    fn on_resize(self: &Rc<Self>) {
        self.update_viewport_unit();

        match dom::inner_size() {
            Ok((width, _)) => self.dispatch(NavMsg::Resize { width }, None),
            Err(err) => debug!({ error = %err }, "failed to read viewport size"),
        }
    }

    // --vh01 is one hundredth of the visible height, which mobile browsers
    // report differently from 1vh while their toolbars are showing
    fn update_viewport_unit(&self) {
        let Ok((_, height)) = dom::inner_size() else {
            return;
        };

        let root = dom::document()
            .ok()
            .and_then(|doc| doc.document_element())
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());

        if let Some(root) = root {
            dom::set_style(&root, "--vh01", &format!("{}px", height * 0.01));
        }
    }

    fn activate_link(&self, active: Option<&str>) {
        for link in &self.dom.links {
            let on = link_matches(&link.href, active, &self.config.top_section_id);
            dom::set_class(&link.element, &self.config.active_class, on);
        }
    }

    fn set_header_scrolled(&self, scrolled: bool) {
        let Some(header) = &self.dom.header else {
            return;
        };

        let look = match scrolled {
            true => &style::HEADER_SCROLLED,
            false => &style::HEADER_TOP,
        };

        dom::set_class(header, &self.config.scrolled_class, scrolled);
        dom::set_style(header, "background-color", look.background);
        dom::set_style(header, "box-shadow", look.shadow);
        dom::set_style(header, "backdrop-filter", look.backdrop);
    }

    fn set_header_hidden(&self, hidden: bool) {
        let Some(header) = &self.dom.header else {
            return;
        };

        let transform = match hidden {
            true => style::HEADER_HIDDEN,
            false => style::HEADER_SHOWN,
        };

        dom::set_style(header, "transform", transform);
        dom::set_style(header, "transition", style::HEADER_TRANSITION);
    }

    fn show_menu(&self, open: bool) {
        let config = &self.config;
        let (expanded, hidden) = match open {
            true => ("true", "false"),
            false => ("false", "true"),
        };

        if let Some(toggle) = &self.dom.toggle {
            dom::set_class(toggle, &config.toggle_open_class, open);
            dom::set_attr(toggle, "aria-expanded", expanded);
        }

        if let Some(menu) = &self.dom.menu {
            for class in &config.menu_open_classes {
                dom::set_class(menu, class, open);
            }
            dom::set_attr(menu, "aria-hidden", hidden);
        }

        if let Some(header) = &self.dom.header {
            dom::set_class(header, &config.expanded_class, open);
        }

        dom::lock_body_scroll(open);

        // the menu is still sliding in right after the class flips, and
        // focusing an element that is not yet visible does nothing
        if open {
            if let Some(link) = self.dom.first_menu_link.clone() {
                Timeout::new(config.focus_delay_ms, move || {
                    if let Err(err) = link.focus() {
                        debug!({ error = ?err }, "failed to focus menu link");
                    }
                })
                .forget();
            }
        }
    }
}

fn replace_fragment(href: &str) -> Result<()> {
    let history = dom::window()?.history().map_err(dom::js_err)?;

    history
        .replace_state_with_url(&JsValue::NULL, "", Some(href))
        .map_err(dom::js_err)
}
