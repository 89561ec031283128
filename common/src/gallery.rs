// photo gallery
//
// the lightbox opens over the page and shows one gallery image at a time.
// image sizes are resolved when it opens, because natural dimensions are only
// known once the browser has actually loaded the source image

pub const DEFAULT_SIZE: (u32, u32) = (1200, 800);
pub const MIN_SIZE: (u32, u32) = (400, 300);

#[derive(Clone, Debug, PartialEq)]
pub struct ImageItem {
    pub src: String,
    pub width: u32,
    pub height: u32,
}

impl ImageItem {
    // natural size wins over rendered size; a zero in either dimension means
    // the size is unknown
    pub fn new(src: impl Into<String>, natural: (u32, u32), rendered: (u32, u32)) -> Self {
        let known = |(w, h): (u32, u32)| (w > 0 && h > 0).then_some((w, h));

        let (width, height) = known(natural)
            .or_else(|| known(rendered))
            .unwrap_or(DEFAULT_SIZE);

        ImageItem {
            src: src.into(),
            width: width.max(MIN_SIZE.0),
            height: height.max(MIN_SIZE.1),
        }
    }

    // largest size with the same aspect ratio that fits the given box, never
    // scaling the image up
    pub fn fit(&self, max_width: f64, max_height: f64) -> (f64, f64) {
        let (w, h) = (self.width as f64, self.height as f64);
        let scale = (max_width / w).min(max_height / h).min(1.0).max(0.0);

        (w * scale, h * scale)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lightbox {
    items: Vec<ImageItem>,
    current: Option<usize>,
}

impl Lightbox {
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&ImageItem> {
        self.current.and_then(|i| self.items.get(i))
    }

    pub fn index(&self) -> Option<usize> {
        self.current
    }

    // replaces whatever was open before; an invalid index leaves the lightbox
    // closed
    pub fn open(&mut self, items: Vec<ImageItem>, index: usize) -> bool {
        self.close();

        if index >= items.len() {
            return false;
        }

        self.items = items;
        self.current = Some(index);
        true
    }

    pub fn close(&mut self) {
        self.items.clear();
        self.current = None;
    }

    pub fn next(&mut self) {
        let len = self.items.len();
        if let Some(i) = self.current.as_mut() {
            *i = (*i + 1) % len;
        }
    }

    pub fn prev(&mut self) {
        let len = self.items.len();
        if let Some(i) = self.current.as_mut() {
            *i = (*i + len - 1) % len;
        }
    }

    pub fn counter(&self) -> Option<String> {
        self.current
            .map(|i| format!("{} / {}", i + 1, self.items.len()))
    }
}
