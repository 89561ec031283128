use anyhow::Result;
use gloo_events::EventListener;
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, EventTarget, HtmlElement, Node, NodeList, Window};

// thin helpers over web_sys
//
// web_sys hands back Result<_, JsValue> and Option<Element> for nearly
// everything.  the page is allowed to be missing any piece of markup, so most
// of these collapse "not there" and "query failed" into None and let callers
// skip quietly

pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| anyhow::Error::msg("no global window exists"))
}

pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| anyhow::Error::msg("window has no document"))
}

pub fn body() -> Result<HtmlElement> {
    document()?
        .body()
        .ok_or_else(|| anyhow::Error::msg("document has no body"))
}

// JsValue errors carry no rust type, so keep their debug form
pub fn js_err(err: JsValue) -> anyhow::Error {
    anyhow::Error::msg(format!("{err:?}"))
}

pub fn query<T: JsCast>(doc: &Document, selector: &str) -> Option<T> {
    doc.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<T>().ok())
}

pub fn query_in<T: JsCast>(parent: &Element, selector: &str) -> Option<T> {
    parent
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<T>().ok())
}

pub fn query_all<T: JsCast>(doc: &Document, selector: &str) -> Vec<T> {
    collect(doc.query_selector_all(selector), selector)
}

pub fn query_all_in<T: JsCast>(parent: &Element, selector: &str) -> Vec<T> {
    collect(parent.query_selector_all(selector), selector)
}

fn collect<T: JsCast>(list: Result<NodeList, JsValue>, selector: &str) -> Vec<T> {
    let list = match list {
        Ok(list) => list,
        Err(err) => {
            debug!({ selector = selector, error = ?err }, "invalid selector");
            return Vec::new();
        }
    };

    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

pub fn by_id<T: JsCast>(doc: &Document, id: &str) -> Option<T> {
    doc.get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
}

pub fn set_class(el: &Element, class: &str, on: bool) {
    if let Err(err) = el.class_list().toggle_with_force(class, on) {
        debug!({ class = class, error = ?err }, "failed to toggle class");
    }
}

pub fn has_class(el: &Element, class: &str) -> bool {
    el.class_list().contains(class)
}

pub fn set_attr(el: &Element, name: &str, value: &str) {
    if let Err(err) = el.set_attribute(name, value) {
        debug!({ attribute = name, error = ?err }, "failed to set attribute");
    }
}

// an empty value removes the inline declaration
pub fn set_style(el: &HtmlElement, property: &str, value: &str) {
    if let Err(err) = el.style().set_property(property, value) {
        debug!({ property = property, error = ?err }, "failed to set style");
    }
}

pub fn lock_body_scroll(locked: bool) {
    match body() {
        Ok(body) => set_style(&body, "overflow", if locked { "hidden" } else { "" }),
        Err(err) => debug!({ error = %err }, "cannot lock body scroll"),
    }
}

// whether the event target sits inside el (or is el)
pub fn contains(el: &Element, target: Option<&EventTarget>) -> bool {
    target
        .and_then(|t| t.dyn_ref::<Node>())
        .is_some_and(|node| el.contains(Some(node)))
}

pub fn scroll_y() -> f64 {
    window()
        .and_then(|w| w.page_y_offset().map_err(js_err))
        .unwrap_or(0.0)
}

pub fn inner_size() -> Result<(f64, f64)> {
    let window = window()?;

    let width = window.inner_width().map_err(js_err)?.as_f64();
    let height = window.inner_height().map_err(js_err)?.as_f64();

    width
        .zip(height)
        .ok_or_else(|| anyhow::Error::msg("viewport size is not a number"))
}

pub fn create<T: JsCast>(doc: &Document, tag: &str, class: &str) -> Result<T> {
    let el = doc.create_element(tag).map_err(js_err)?;
    el.set_class_name(class);

    el.dyn_into::<T>()
        .map_err(|_| anyhow::Error::msg(format!("<{tag}> has an unexpected type")))
}

// run f once the document is parsed
//
// the module is usually loaded with the page already interactive, but a
// synchronous script tag in the head would otherwise see an empty body
pub fn on_ready(f: impl FnOnce() + 'static) -> Result<()> {
    let doc = document()?;

    match still_loading(&doc.ready_state()) {
        true => EventListener::once(&doc, "DOMContentLoaded", move |_| f()).forget(),
        false => f(),
    }
    Ok(())
}

// document.readyState is one of "loading", "interactive" or "complete"
fn still_loading(ready_state: &str) -> bool {
    ready_state == "loading"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_loading_defers() {
        assert!(still_loading("loading"));
        assert!(!still_loading("interactive"));
        assert!(!still_loading("complete"));
    }
}
