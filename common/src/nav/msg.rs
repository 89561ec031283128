use crate::nav::layout::PageLayout;

// navigation messages
//
// everything the page can tell the navigation state machine.  the webapp
// translates raw dom events into these, measuring whatever the handler needs
// so that the state machine itself never touches the dom
#[derive(Clone, Debug, PartialEq)]
pub enum NavMsg {
    // one or more scroll events; cheap, may arrive many times per frame
    Scroll,

    // the coalesced frame requested by a Scroll, carrying fresh measurements
    Frame(PageLayout),

    // click on a nav link; target_top is the offset of the element the href
    // points at, if there is one
    LinkClick {
        href: String,
        target_top: Option<f64>,
        header_height: f64,
    },

    ToggleClick,

    // click anywhere else in the document
    DocumentClick { in_menu: bool, in_toggle: bool },

    KeyDown { key: String },

    // debounced viewport resize
    Resize { width: f64 },
}

// navigation effects
//
// the dom mutations a message produced, in the order they should be applied
#[derive(Clone, Debug, PartialEq)]
pub enum NavEffect {
    RequestFrame,
    ActivateLink(Option<String>),
    HeaderScrolled(bool),
    HeaderHidden(bool),
    OpenMenu,
    CloseMenu,
    PreventDefault,
    StopPropagation,
    ScrollTo { top: f64, duration_ms: u32 },
    ReplaceFragment(String),
}
