use std::sync::LazyLock;

use regex::Regex;

// the target is looked up by id, and an html id is any non-empty run of
// characters without whitespace
pub const ANCHOR_REGEX: &str = r"^#(\S+)$";

static ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(ANCHOR_REGEX).expect("anchor regex is valid")
});

// in-page anchor
//
// an href of the form "#section".  the bare "#" is deliberately not an anchor,
// since it is conventionally used for links that only carry a click handler
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Anchor {
    href: String,
}

impl Anchor {
    pub fn parse(href: &str) -> Option<Self> {
        let href = href.trim();

        ANCHOR.is_match(href).then(|| Anchor {
            href: href.to_owned(),
        })
    }

    pub fn id(&self) -> &str {
        &self.href[1..]
    }

    pub fn href(&self) -> &str {
        &self.href
    }
}

// whether a nav link should carry the active marker for the active section
//
// the top pseudo-section also claims links pointing at "#"
pub fn link_matches(href: &str, active: Option<&str>, top_id: &str) -> bool {
    let Some(active) = active else {
        return false;
    };

    let href = href.trim();

    match href.strip_prefix('#') {
        Some(id) if id == active => true,
        Some("") => active == top_id,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_anchors() {
        let anchor = Anchor::parse("#konzerte").unwrap();
        assert_eq!(anchor.id(), "konzerte");
        assert_eq!(anchor.href(), "#konzerte");

        assert_eq!(Anchor::parse(" #top ").unwrap().id(), "top");
    }

    #[test]
    fn rejects_non_anchors() {
        assert!(Anchor::parse("#").is_none());
        assert!(Anchor::parse("").is_none());
        assert!(Anchor::parse("impressum.html").is_none());
        assert!(Anchor::parse("https://example.org/#about").is_none());
        assert!(Anchor::parse("#a b").is_none());
    }

    #[test]
    fn accepts_any_html_id() {
        assert_eq!(Anchor::parse("#über-uns").unwrap().id(), "über-uns");
        assert_eq!(Anchor::parse("#2024").unwrap().id(), "2024");
        assert_eq!(Anchor::parse("#1st").unwrap().href(), "#1st");
    }

    #[test]
    fn matches_links_to_active_section() {
        assert!(link_matches("#about", Some("about"), "top"));
        assert!(!link_matches("#about", Some("contact"), "top"));
        assert!(!link_matches("#about", None, "top"));
    }

    #[test]
    fn top_claims_bare_hash() {
        assert!(link_matches("#", Some("top"), "top"));
        assert!(link_matches("#top", Some("top"), "top"));
        assert!(!link_matches("#", Some("about"), "top"));
        assert!(!link_matches("#", None, "top"));
    }
}
