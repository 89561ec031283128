use std::{cell::RefCell, rc::Rc};

use gloo_render::{AnimationFrame, request_animation_frame};
use tracing::debug;

use site_common::nav::ScrollAnimation;

use crate::common::dom;

// smooth scroller
//
// drives a ScrollAnimation from animation frames.  only the handle of the
// next pending frame is kept, and replacing it cancels that frame, so starting
// a new scroll simply supersedes whatever was running
#[derive(Clone, Default)]
pub struct SmoothScroller {
    pending: Rc<RefCell<Option<AnimationFrame>>>,
}

impl SmoothScroller {
    pub fn scroll_to(&self, top: f64, duration_ms: u32) {
        let from = dom::scroll_y();

        debug!({ from = from, to = top, duration_ms = duration_ms }, "smooth scroll");
        self.step(ScrollAnimation::new(from, top, duration_ms));
    }

    pub fn cancel(&self) {
        self.pending.borrow_mut().take();
    }

    fn step(&self, mut animation: ScrollAnimation) {
        let scroller = self.clone();

        let frame = request_animation_frame(move |now| {
            let step = animation.sample(now);

            if let Ok(window) = dom::window() {
                window.scroll_to_with_x_and_y(0.0, step.position);
            }

            match step.done {
                true => scroller.cancel(),
                false => scroller.step(animation),
            }
        });

        *self.pending.borrow_mut() = Some(frame);
    }
}
