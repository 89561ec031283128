use tracing::{debug, trace};

use crate::config::NavConfig;
use crate::nav::{
    anchor::Anchor,
    layout::{PageLayout, anchor_offset},
    msg::{NavEffect, NavMsg},
};

// the transient navigation state, alive for one page view
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavigationState {
    pub is_menu_open: bool,
    pub last_scroll_y: f64,
    pub active_section_id: Option<String>,
    pub header_scrolled: bool,
    pub header_hidden: bool,
}

// frame gate
//
// scroll events can fire several times between two repaints.  the first one
// asks for an animation frame and closes the gate; the rest are dropped until
// that frame runs and opens it again
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameGate {
    pending: bool,
}

impl FrameGate {
    // true if the caller should schedule a frame
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    pub fn release(&mut self) {
        self.pending = false;
    }
}

// navigation state machine
//
// owns the state and turns messages into effects.  effects are only emitted
// when something actually changes, except during initialize(), which forces
// the link and header state so the page starts out consistent
#[derive(Clone, Debug)]
pub struct Navigation {
    config: NavConfig,
    state: NavigationState,
    gate: FrameGate,
    recomputations: u64,
}

impl Navigation {
    pub fn new(config: NavConfig, scroll_y: f64) -> Self {
        Navigation {
            config,
            state: NavigationState {
                last_scroll_y: scroll_y,
                ..NavigationState::default()
            },
            gate: FrameGate::default(),
            recomputations: 0,
        }
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    // number of frames that recomputed scroll state so far
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    pub fn initialize(&mut self, layout: &PageLayout) -> Vec<NavEffect> {
        let mut effects = Vec::new();

        self.update_active(layout, true, &mut effects);
        self.update_scrolled(layout, true, &mut effects);
        self.recomputations += 1;

        effects
    }

    pub fn handle(&mut self, msg: NavMsg) -> Vec<NavEffect> {
        trace!({ msg = ?msg }, "navigation message");

        match msg {
            NavMsg::Scroll => match self.gate.request() {
                true => vec![NavEffect::RequestFrame],
                false => Vec::new(),
            },
            NavMsg::Frame(layout) => {
                self.gate.release();
                self.on_frame(&layout)
            }
            NavMsg::LinkClick {
                href,
                target_top,
                header_height,
            } => self.on_link_click(&href, target_top, header_height),
            NavMsg::ToggleClick => {
                let mut effects = vec![NavEffect::PreventDefault, NavEffect::StopPropagation];
                effects.extend(self.toggle_menu());
                effects
            }
            NavMsg::DocumentClick { in_menu, in_toggle } => {
                if in_menu || in_toggle {
                    return Vec::new();
                }
                self.close_menu()
            }
            NavMsg::KeyDown { key } => match key.as_str() {
                "Escape" => self.close_menu(),
                _ => Vec::new(),
            },
            NavMsg::Resize { width } => {
                if width > self.config.desktop_breakpoint {
                    return self.close_menu();
                }
                Vec::new()
            }
        }
    }

    pub fn toggle_menu(&mut self) -> Vec<NavEffect> {
        match self.state.is_menu_open {
            true => self.close_menu(),
            false => self.open_menu(),
        }
    }

    pub fn open_menu(&mut self) -> Vec<NavEffect> {
        if self.state.is_menu_open {
            return Vec::new();
        }

        debug!("opening mobile menu");
        self.state.is_menu_open = true;
        vec![NavEffect::OpenMenu]
    }

    pub fn close_menu(&mut self) -> Vec<NavEffect> {
        if !self.state.is_menu_open {
            return Vec::new();
        }

        debug!("closing mobile menu");
        self.state.is_menu_open = false;
        vec![NavEffect::CloseMenu]
    }

    // the section under the scroll offset, with no top-of-page override and
    // the first match winning
    pub fn current_section(&self, layout: &PageLayout) -> Option<String> {
        layout
            .first_section_in_view(self.config.section_margin)
            .map(|s| s.id.clone())
    }

    // the section whose link should be highlighted
    pub fn active_section(&self, layout: &PageLayout) -> Option<String> {
        if layout.scroll_y < self.config.top_threshold {
            return Some(self.config.top_section_id.clone());
        }

        layout
            .section_in_view(self.config.section_margin)
            .map(|s| s.id.clone())
    }

    fn on_frame(&mut self, layout: &PageLayout) -> Vec<NavEffect> {
        let mut effects = Vec::new();

        self.update_active(layout, false, &mut effects);
        self.update_scrolled(layout, false, &mut effects);
        self.update_visibility(layout, &mut effects);
        self.recomputations += 1;

        effects
    }

    fn update_active(&mut self, layout: &PageLayout, force: bool, effects: &mut Vec<NavEffect>) {
        let active = self.active_section(layout);

        if force || active != self.state.active_section_id {
            effects.push(NavEffect::ActivateLink(active.clone()));
            self.state.active_section_id = active;
        }
    }

    fn update_scrolled(&mut self, layout: &PageLayout, force: bool, effects: &mut Vec<NavEffect>) {
        let scrolled = layout.scroll_y > self.config.scrolled_threshold;

        if force || scrolled != self.state.header_scrolled {
            effects.push(NavEffect::HeaderScrolled(scrolled));
            self.state.header_scrolled = scrolled;
        }
    }

    // sub-pixel and tiny scrolls are ignored entirely, including for the
    // purpose of remembering the last offset, so a slow drift still adds up
    fn update_visibility(&mut self, layout: &PageLayout, effects: &mut Vec<NavEffect>) {
        let scroll_y = layout.scroll_y;

        if (scroll_y - self.state.last_scroll_y).abs() <= self.config.direction_delta {
            return;
        }

        let hidden = scroll_y > self.state.last_scroll_y && scroll_y > self.config.hide_threshold;

        if hidden != self.state.header_hidden {
            effects.push(NavEffect::HeaderHidden(hidden));
            self.state.header_hidden = hidden;
        }
        self.state.last_scroll_y = scroll_y;
    }

    fn on_link_click(
        &mut self,
        href: &str,
        target_top: Option<f64>,
        header_height: f64,
    ) -> Vec<NavEffect> {
        let Some(anchor) = Anchor::parse(href) else {
            return Vec::new();
        };

        let mut effects = vec![NavEffect::PreventDefault];

        if let Some(target_top) = target_top {
            let top = anchor_offset(target_top, header_height, self.config.scroll_offset);

            effects.push(NavEffect::ScrollTo {
                top,
                duration_ms: self.config.scroll_duration_ms,
            });
        } else {
            debug!({ anchor = anchor.id() }, "anchor target not found");
        }

        effects.extend(self.close_menu());

        if target_top.is_some() {
            effects.push(NavEffect::ReplaceFragment(anchor.href().to_owned()));
        }

        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::layout::SectionBox;

    fn sections() -> Vec<SectionBox> {
        vec![
            SectionBox::new("top", 0.0, 700.0),
            SectionBox::new("about", 700.0, 900.0),
            SectionBox::new("concerts", 1600.0, 1200.0),
            SectionBox::new("contact", 2800.0, 600.0),
        ]
    }

    fn layout(scroll_y: f64) -> PageLayout {
        PageLayout {
            scroll_y,
            header_height: 80.0,
            sections: sections(),
        }
    }

    fn nav() -> Navigation {
        Navigation::new(NavConfig::default(), 0.0)
    }

    fn frame(nav: &mut Navigation, scroll_y: f64) -> Vec<NavEffect> {
        nav.handle(NavMsg::Scroll);
        nav.handle(NavMsg::Frame(layout(scroll_y)))
    }

    #[test]
    fn frame_gate_coalesces() {
        let mut gate = FrameGate::default();

        assert!(gate.request());
        assert!(!gate.request());

        gate.release();
        assert!(gate.request());
    }

    #[test]
    fn repeated_scrolls_request_one_frame() {
        let mut nav = nav();

        assert_eq!(nav.handle(NavMsg::Scroll), vec![NavEffect::RequestFrame]);
        for _ in 0..20 {
            assert!(nav.handle(NavMsg::Scroll).is_empty());
        }

        nav.handle(NavMsg::Frame(layout(500.0)));
        assert_eq!(nav.recomputations(), 1);

        assert_eq!(nav.handle(NavMsg::Scroll), vec![NavEffect::RequestFrame]);
    }

    #[test]
    fn initialize_forces_link_and_header() {
        let mut nav = nav();
        let effects = nav.initialize(&layout(0.0));

        assert_eq!(
            effects,
            vec![
                NavEffect::ActivateLink(Some(String::from("top"))),
                NavEffect::HeaderScrolled(false),
            ]
        );
    }

    #[test]
    fn near_the_top_is_always_top() {
        let nav = nav();

        let mut page = layout(0.0);
        page.sections = vec![SectionBox::new("about", 0.0, 50.0)];

        for y in [0.0, 40.0, 99.9] {
            page.scroll_y = y;
            assert_eq!(nav.active_section(&page).as_deref(), Some("top"));
        }

        page.scroll_y = 100.0;
        assert_eq!(nav.active_section(&page), None);
    }

    #[test]
    fn active_is_last_containing_section() {
        let nav = nav();

        // about starts at 700 - 80 - 100 = 520, concerts at 1420, contact at 2620
        assert_eq!(nav.active_section(&layout(519.0)).as_deref(), Some("top"));
        assert_eq!(nav.active_section(&layout(520.0)).as_deref(), Some("about"));
        assert_eq!(nav.active_section(&layout(1420.0)).as_deref(), Some("concerts"));
        assert_eq!(nav.active_section(&layout(3000.0)).as_deref(), Some("contact"));
        assert_eq!(nav.active_section(&layout(3220.0)), None);

        for y in (0..4000).step_by(37) {
            let page = layout(y as f64);
            let expected = match page.scroll_y < 100.0 {
                true => Some(String::from("top")),
                false => page
                    .sections
                    .iter()
                    .filter(|s| s.contains(page.scroll_y, 80.0, 100.0))
                    .last()
                    .map(|s| s.id.clone()),
            };
            assert_eq!(nav.active_section(&page), expected);
        }
    }

    #[test]
    fn current_section_prefers_first_match() {
        let nav = nav();

        let mut page = layout(600.0);
        page.sections[0].height = 5000.0;

        assert_eq!(nav.current_section(&page).as_deref(), Some("top"));
        assert_eq!(nav.active_section(&page).as_deref(), Some("about"));
    }

    #[test]
    fn frame_emits_only_changes() {
        let mut nav = nav();
        nav.initialize(&layout(0.0));

        assert!(frame(&mut nav, 5.0).is_empty());

        let effects = frame(&mut nav, 60.0);
        assert_eq!(effects, vec![NavEffect::HeaderScrolled(true)]);

        let effects = frame(&mut nav, 600.0);
        assert_eq!(
            effects,
            vec![
                NavEffect::ActivateLink(Some(String::from("about"))),
                NavEffect::HeaderHidden(true),
            ]
        );
        assert_eq!(nav.state().active_section_id.as_deref(), Some("about"));
    }

    #[test]
    fn header_hides_down_and_shows_up() {
        let mut nav = nav();
        nav.initialize(&layout(0.0));

        // below the hide threshold the header stays put
        frame(&mut nav, 150.0);
        assert!(!nav.state().header_hidden);

        frame(&mut nav, 400.0);
        assert!(nav.state().header_hidden);

        // jitter within the delta is ignored
        let effects = frame(&mut nav, 395.0);
        assert!(!effects.contains(&NavEffect::HeaderHidden(false)));
        assert_eq!(nav.state().last_scroll_y, 400.0);

        let effects = frame(&mut nav, 380.0);
        assert!(effects.contains(&NavEffect::HeaderHidden(false)));
        assert_eq!(nav.state().last_scroll_y, 380.0);
    }

    #[test]
    fn open_and_close_menu() {
        let mut nav = nav();

        assert_eq!(nav.open_menu(), vec![NavEffect::OpenMenu]);
        assert!(nav.state().is_menu_open);
        assert!(nav.open_menu().is_empty());

        assert_eq!(nav.close_menu(), vec![NavEffect::CloseMenu]);
        assert!(!nav.state().is_menu_open);
        assert!(nav.close_menu().is_empty());
    }

    #[test]
    fn toggle_click_does_not_propagate() {
        let mut nav = nav();

        assert_eq!(
            nav.handle(NavMsg::ToggleClick),
            vec![
                NavEffect::PreventDefault,
                NavEffect::StopPropagation,
                NavEffect::OpenMenu,
            ]
        );
        assert_eq!(
            nav.handle(NavMsg::ToggleClick),
            vec![
                NavEffect::PreventDefault,
                NavEffect::StopPropagation,
                NavEffect::CloseMenu,
            ]
        );
    }

    #[test]
    fn outside_click_and_escape_close() {
        let mut nav = nav();
        nav.open_menu();

        let inside = NavMsg::DocumentClick {
            in_menu: true,
            in_toggle: false,
        };
        assert!(nav.handle(inside).is_empty());
        assert!(nav.state().is_menu_open);

        let outside = NavMsg::DocumentClick {
            in_menu: false,
            in_toggle: false,
        };
        assert_eq!(nav.handle(outside.clone()), vec![NavEffect::CloseMenu]);
        assert!(nav.handle(outside).is_empty());

        nav.open_menu();
        let enter = NavMsg::KeyDown {
            key: String::from("Enter"),
        };
        assert!(nav.handle(enter).is_empty());

        let escape = NavMsg::KeyDown {
            key: String::from("Escape"),
        };
        assert_eq!(nav.handle(escape), vec![NavEffect::CloseMenu]);
    }

    #[test]
    fn resize_past_breakpoint_closes() {
        let mut nav = nav();
        nav.open_menu();

        assert!(nav.handle(NavMsg::Resize { width: 992.0 }).is_empty());
        assert!(nav.state().is_menu_open);

        assert_eq!(
            nav.handle(NavMsg::Resize { width: 1200.0 }),
            vec![NavEffect::CloseMenu]
        );
        assert!(!nav.state().is_menu_open);

        assert!(nav.handle(NavMsg::Resize { width: 1200.0 }).is_empty());
    }

    #[test]
    fn anchor_click_scrolls_and_closes() {
        let mut nav = nav();
        nav.open_menu();

        let effects = nav.handle(NavMsg::LinkClick {
            href: String::from("#concerts"),
            target_top: Some(1600.0),
            header_height: 80.0,
        });

        assert_eq!(
            effects,
            vec![
                NavEffect::PreventDefault,
                NavEffect::ScrollTo {
                    top: 1500.0,
                    duration_ms: 800,
                },
                NavEffect::CloseMenu,
                NavEffect::ReplaceFragment(String::from("#concerts")),
            ]
        );
        assert!(!nav.state().is_menu_open);
    }

    #[test]
    fn umlaut_and_numeric_ids_are_anchors() {
        for (href, target_top) in [("#über-uns", 700.0), ("#2024", 2800.0)] {
            let mut nav = nav();
            nav.open_menu();

            let effects = nav.handle(NavMsg::LinkClick {
                href: String::from(href),
                target_top: Some(target_top),
                header_height: 80.0,
            });

            assert_eq!(
                effects,
                vec![
                    NavEffect::PreventDefault,
                    NavEffect::ScrollTo {
                        top: target_top - 100.0,
                        duration_ms: 800,
                    },
                    NavEffect::CloseMenu,
                    NavEffect::ReplaceFragment(String::from(href)),
                ]
            );
            assert!(!nav.state().is_menu_open);
        }
    }

    #[test]
    fn anchor_click_near_top_clamps() {
        let mut nav = nav();

        let effects = nav.handle(NavMsg::LinkClick {
            href: String::from("#top"),
            target_top: Some(30.0),
            header_height: 80.0,
        });

        assert!(effects.contains(&NavEffect::ScrollTo {
            top: 0.0,
            duration_ms: 800
        }));
        assert!(!effects.contains(&NavEffect::CloseMenu));
    }

    #[test]
    fn missing_target_still_prevents_default() {
        let mut nav = nav();
        nav.open_menu();

        let effects = nav.handle(NavMsg::LinkClick {
            href: String::from("#gone"),
            target_top: None,
            header_height: 80.0,
        });

        assert_eq!(effects, vec![NavEffect::PreventDefault, NavEffect::CloseMenu]);
    }

    #[test]
    fn external_links_are_left_alone() {
        let mut nav = nav();
        nav.open_menu();

        for href in ["#", "impressum.html", "https://example.org/#x", ""] {
            let effects = nav.handle(NavMsg::LinkClick {
                href: String::from(href),
                target_top: Some(100.0),
                header_height: 80.0,
            });
            assert!(effects.is_empty());
        }
        assert!(nav.state().is_menu_open);
    }
}
