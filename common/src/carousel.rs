use anyhow::Result;
use serde::{Deserialize, Serialize};

// horizontal travel, in pixels, before a touch counts as a swipe
pub const SWIPE_THRESHOLD: f64 = 50.0;

// carousel options
//
// read from the data-carousel attribute, which uses the camelCase keys the
// page authors already know; unknown keys are ignored
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarouselOptions {
    pub auto_play: bool,
    pub auto_play_interval: u32,
    pub show_dots: bool,
    pub show_arrows: bool,
    pub infinite: bool,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        CarouselOptions {
            auto_play: false,
            auto_play_interval: 5000,
            show_dots: true,
            show_arrows: true,
            infinite: true,
        }
    }
}

impl CarouselOptions {
    // an empty or missing attribute means defaults
    pub fn from_attr(attr: Option<&str>) -> Result<Self> {
        match attr.map(str::trim) {
            None | Some("") => Ok(CarouselOptions::default()),
            Some(text) => Ok(serde_json::from_str(text)?),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Swipe {
    Next,
    Prev,
}

// positive delta means the finger moved left, i.e. towards the next slide
pub fn swipe(start_x: f64, end_x: f64) -> Option<Swipe> {
    let delta = start_x - end_x;

    if delta.abs() <= SWIPE_THRESHOLD {
        return None;
    }

    match delta > 0.0 {
        true => Some(Swipe::Next),
        false => Some(Swipe::Prev),
    }
}

// what the page needs to show for the current slide.  owns its data, so the
// caller can let go of the carousel before touching the dom
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlideView {
    pub current: usize,
    pub total: usize,
    pub translate: String,
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Carousel {
    options: CarouselOptions,
    current: usize,
    total: usize,
    playing: bool,
}

impl Carousel {
    pub fn new(options: CarouselOptions, total: usize) -> Self {
        Carousel {
            options,
            current: 0,
            total,
            playing: false,
        }
    }

    pub fn options(&self) -> &CarouselOptions {
        &self.options
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    // arrows and dots only make sense with something to move to
    pub fn has_controls(&self) -> bool {
        self.total > 1
    }

    pub fn next(&mut self) {
        if self.total == 0 {
            return;
        }

        self.current = match self.options.infinite {
            true => (self.current + 1) % self.total,
            false => (self.current + 1).min(self.total - 1),
        };
    }

    pub fn prev(&mut self) {
        if self.total == 0 {
            return;
        }

        self.current = match (self.options.infinite, self.current) {
            (true, 0) => self.total - 1,
            (_, 0) => 0,
            (_, c) => c - 1,
        };
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.total {
            return false;
        }

        self.current = index;
        true
    }

    pub fn apply_swipe(&mut self, swipe: Swipe) {
        match swipe {
            Swipe::Next => self.next(),
            Swipe::Prev => self.prev(),
        }
    }

    // returns whether autoplay actually started
    pub fn start(&mut self) -> bool {
        self.playing = self.total > 1;
        self.playing
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    // true if autoplay is running afterwards
    pub fn toggle(&mut self) -> bool {
        match self.playing {
            true => {
                self.pause();
                false
            }
            false => self.start(),
        }
    }

    pub fn translate(&self) -> String {
        format!("translateX(-{}%)", self.current * 100)
    }

    pub fn prev_disabled(&self) -> bool {
        !self.options.infinite && self.current == 0
    }

    pub fn next_disabled(&self) -> bool {
        !self.options.infinite && self.current + 1 >= self.total
    }

    pub fn view(&self) -> SlideView {
        SlideView {
            current: self.current,
            total: self.total,
            translate: self.translate(),
            prev_disabled: self.prev_disabled(),
            next_disabled: self.next_disabled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finite() -> CarouselOptions {
        CarouselOptions {
            infinite: false,
            ..CarouselOptions::default()
        }
    }

    #[test]
    fn options_from_attr() {
        assert_eq!(CarouselOptions::from_attr(None).unwrap(), CarouselOptions::default());
        assert_eq!(CarouselOptions::from_attr(Some("  ")).unwrap(), CarouselOptions::default());

        let options =
            CarouselOptions::from_attr(Some(r#"{"autoPlay": true, "infinite": false, "slidesToShow": 2}"#))
                .unwrap();
        assert!(options.auto_play);
        assert!(!options.infinite);
        assert_eq!(options.auto_play_interval, 5000);
        assert!(options.show_dots);

        assert!(CarouselOptions::from_attr(Some("{autoPlay}")).is_err());
    }

    #[test]
    fn infinite_wraps() {
        let mut carousel = Carousel::new(CarouselOptions::default(), 3);

        carousel.prev();
        assert_eq!(carousel.current(), 2);
        carousel.next();
        assert_eq!(carousel.current(), 0);
        carousel.next();
        carousel.next();
        assert_eq!(carousel.current(), 2);

        assert!(!carousel.prev_disabled());
        assert!(!carousel.next_disabled());
    }

    #[test]
    fn finite_clamps() {
        let mut carousel = Carousel::new(finite(), 3);

        assert!(carousel.prev_disabled());
        carousel.prev();
        assert_eq!(carousel.current(), 0);

        carousel.next();
        carousel.next();
        carousel.next();
        assert_eq!(carousel.current(), 2);
        assert!(carousel.next_disabled());
        assert!(!carousel.prev_disabled());
    }

    #[test]
    fn go_to_ignores_out_of_range() {
        let mut carousel = Carousel::new(CarouselOptions::default(), 4);

        assert!(carousel.go_to(3));
        assert_eq!(carousel.translate(), "translateX(-300%)");

        assert!(!carousel.go_to(4));
        assert_eq!(carousel.current(), 3);
    }

    #[test]
    fn empty_carousel_is_inert() {
        let mut carousel = Carousel::new(CarouselOptions::default(), 0);

        carousel.next();
        carousel.prev();
        assert_eq!(carousel.current(), 0);
        assert!(!carousel.start());
        assert!(!carousel.has_controls());
    }

    #[test]
    fn view_outlives_the_carousel() {
        let mut carousel = Carousel::new(finite(), 3);
        carousel.next();

        let view = carousel.view();
        carousel.next();

        assert_eq!(
            view,
            SlideView {
                current: 1,
                total: 3,
                translate: String::from("translateX(-100%)"),
                prev_disabled: false,
                next_disabled: false,
            }
        );
        assert!(carousel.view().next_disabled);
        assert!(!Carousel::new(CarouselOptions::default(), 3).view().prev_disabled);
    }

    #[test]
    fn controls_need_two_slides() {
        assert!(!Carousel::new(CarouselOptions::default(), 1).has_controls());
        assert!(Carousel::new(CarouselOptions::default(), 2).has_controls());
    }

    #[test]
    fn swipe_needs_threshold() {
        assert_eq!(swipe(300.0, 260.0), None);
        assert_eq!(swipe(300.0, 250.0), None);
        assert_eq!(swipe(300.0, 249.0), Some(Swipe::Next));
        assert_eq!(swipe(100.0, 180.0), Some(Swipe::Prev));

        let mut carousel = Carousel::new(CarouselOptions::default(), 2);
        carousel.apply_swipe(Swipe::Prev);
        assert_eq!(carousel.current(), 1);
    }

    #[test]
    fn autoplay_requires_two_slides() {
        let mut single = Carousel::new(CarouselOptions::default(), 1);
        assert!(!single.toggle());
        assert!(!single.is_playing());

        let mut pair = Carousel::new(CarouselOptions::default(), 2);
        assert!(pair.toggle());
        assert!(pair.is_playing());
        assert!(!pair.toggle());
        assert!(!pair.is_playing());
    }
}
