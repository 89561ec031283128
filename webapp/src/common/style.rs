use anyhow::Result;
use constcat::concat;
use web_sys::{Document, HtmlElement};

use crate::common::dom;

// inline header looks
//
// the site css handles layout; these are the few properties the scripts have
// always set inline, so they win over whatever the theme says
pub struct HeaderLook {
    pub background: &'static str,
    pub shadow: &'static str,
    pub backdrop: &'static str,
}

pub const HEADER_TOP: HeaderLook = HeaderLook {
    background: "rgba(255, 255, 255, 0.95)",
    shadow: "none",
    backdrop: "blur(5px)",
};

pub const HEADER_SCROLLED: HeaderLook = HeaderLook {
    background: "rgba(255, 255, 255, 0.98)",
    shadow: "0 2px 20px rgba(0, 0, 0, 0.1)",
    backdrop: "blur(10px)",
};

pub const HEADER_SHOWN: &str = "translateY(0)";
pub const HEADER_HIDDEN: &str = "translateY(-100%)";
pub const HEADER_TRANSITION: &str = "transform 0.3s ease-in-out";

pub const HIGHLIGHT_BACKGROUND: &str = "rgba(59, 130, 246, 0.1)";
pub const HIGHLIGHT_TRANSITION: &str = "background-color 0.3s ease";

pub const STYLE_ELEMENT_ID: &str = "site-widget-styles";

const CAROUSEL: &str = r#"
.carousel {
  position: relative;
  overflow: hidden;
  border-radius: var(--border-radius-lg, 8px);
}

.carousel__track {
  display: flex;
  transition: transform 0.3s ease-in-out;
}

.carousel__slide {
  min-width: 100%;
  flex-shrink: 0;
}

.carousel__arrow {
  position: absolute;
  top: 50%;
  transform: translateY(-50%);
  background-color: rgba(255, 255, 255, 0.9);
  border: none;
  border-radius: 50%;
  width: 40px;
  height: 40px;
  font-size: 18px;
  font-weight: bold;
  cursor: pointer;
  z-index: 10;
}

.carousel__arrow:hover {
  background-color: white;
}

.carousel__arrow:disabled {
  opacity: 0.4;
  cursor: default;
}

.carousel__arrow--prev {
  left: 10px;
}

.carousel__arrow--next {
  right: 10px;
}

.carousel__dots {
  display: flex;
  justify-content: center;
  gap: 8px;
  margin-top: 16px;
}

.carousel__dot {
  width: 12px;
  height: 12px;
  border-radius: 50%;
  border: none;
  background-color: #D1D5DB;
  cursor: pointer;
}

.carousel__dot--active,
.carousel__dot:hover {
  background-color: var(--primary-color, #3B82F6);
}
"#;

const LIGHTBOX: &str = r#"
.lightbox {
  display: none;
  position: fixed;
  inset: 0;
  z-index: 1500;
  align-items: center;
  justify-content: center;
}

.lightbox--open {
  display: flex;
}

.lightbox__bg {
  position: absolute;
  inset: 0;
  background: rgba(0, 0, 0, 0.8);
}

.lightbox__image {
  position: relative;
  max-width: 100%;
  max-height: 100%;
  object-fit: contain;
}

.lightbox__counter {
  position: absolute;
  top: 12px;
  left: 16px;
  color: #FFFFFF;
  font-size: 14px;
}

.lightbox__button {
  position: absolute;
  background: none;
  border: none;
  color: #FFFFFF;
  font-size: 32px;
  cursor: pointer;
  padding: 8px 14px;
}

.lightbox__button--close {
  top: 4px;
  right: 8px;
}

.lightbox__button--prev {
  left: 8px;
  top: 50%;
  transform: translateY(-50%);
}

.lightbox__button--next {
  right: 8px;
  top: 50%;
  transform: translateY(-50%);
}
"#;

pub const WIDGET_STYLES: &str = concat!(CAROUSEL, LIGHTBOX);

// widget css goes into the head once, ahead of any widget markup
pub fn inject(doc: &Document) -> Result<()> {
    if doc.get_element_by_id(STYLE_ELEMENT_ID).is_some() {
        return Ok(());
    }

    let style: HtmlElement = dom::create(doc, "style", "")?;
    style.set_id(STYLE_ELEMENT_ID);
    style.set_text_content(Some(WIDGET_STYLES));

    let head = doc
        .head()
        .ok_or_else(|| anyhow::Error::msg("document has no head"))?;
    head.append_child(&style).map_err(dom::js_err)?;

    Ok(())
}
