pub mod anchor;
pub mod anim;
pub mod layout;
pub mod msg;
pub mod state;

pub use anchor::{Anchor, link_matches};
pub use anim::{ScrollAnimation, ScrollStep, ease_in_out_cubic};
pub use layout::{PageLayout, SectionBox, anchor_offset};
pub use msg::{NavEffect, NavMsg};
pub use state::{FrameGate, Navigation, NavigationState};
