//! A rendered page: root element plus its location.

use url::Url;

use super::element::Element;
use super::select::Selector;

/// Root element of a (sub-)document together with its location URL.
#[derive(Clone, Debug)]
pub struct Document {
    root: Element,
    location: Url,
}

impl Document {
    #[must_use]
    pub fn new(location: Url, root: Element) -> Self {
        Self { root, location }
    }

    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    #[must_use]
    pub fn location(&self) -> &Url {
        &self.location
    }

    /// All descendants of the root matching `selector`, in document order.
    #[must_use]
    pub fn select(&self, selector: &Selector) -> Vec<Element> {
        self.root.select(selector)
    }

    /// First descendant of the root matching `selector`.
    #[must_use]
    pub fn select_first(&self, selector: &Selector) -> Option<Element> {
        self.root.select_first(selector)
    }
}
