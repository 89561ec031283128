// page behavior for the choir site
//
// everything in this crate is plain rust with no dom access.  the webapp
// feeds it measurements and events and applies whatever the state machines
// here decide, so the interesting parts can be tested on the host

pub mod carousel;
pub mod codeword;
pub mod config;
pub mod gallery;
pub mod nav;
pub mod video;
