pub mod carousel;
pub mod codeword;
pub mod gallery;
pub mod navigation;
pub mod to_top;
pub mod video;
