// measured page geometry
//
// the webapp samples these from the dom once per animation frame; everything
// downstream is plain arithmetic so it can be tested without a browser
#[derive(Clone, Debug, PartialEq)]
pub struct SectionBox {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionBox {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        SectionBox {
            id: id.into(),
            top,
            height,
        }
    }

    // half-open scroll range in which this section counts as in view
    //
    // the start is pulled up by the header and a margin so the section lights
    // up slightly before its top edge reaches the header
    pub fn range(&self, header_height: f64, margin: f64) -> (f64, f64) {
        let start = self.top - header_height - margin;
        (start, start + self.height)
    }

    pub fn contains(&self, scroll_y: f64, header_height: f64, margin: f64) -> bool {
        let (start, end) = self.range(header_height, margin);
        scroll_y >= start && scroll_y < end
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageLayout {
    pub scroll_y: f64,
    pub header_height: f64,
    pub sections: Vec<SectionBox>,
}

impl PageLayout {
    // last section in document order whose range contains the scroll offset
    pub fn section_in_view(&self, margin: f64) -> Option<&SectionBox> {
        self.sections
            .iter()
            .rev()
            .find(|s| s.contains(self.scroll_y, self.header_height, margin))
    }

    // first section in document order whose range contains the scroll offset
    pub fn first_section_in_view(&self, margin: f64) -> Option<&SectionBox> {
        self.sections
            .iter()
            .find(|s| s.contains(self.scroll_y, self.header_height, margin))
    }
}

// scroll offset at which a target's top edge sits just below the header,
// never above the top of the page
pub fn anchor_offset(target_top: f64, header_height: f64, extra: f64) -> f64 {
    (target_top - header_height - extra).max(0.0)
}
