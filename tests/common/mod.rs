//! Shared fixtures for the integration suites.

#![allow(dead_code)]

use std::sync::Mutex;

use cafelink::dom::parse_fragment;
use cafelink::{Element, Navigator, Options};

/// Initialize test logging once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Let spawned region handlers run to completion.
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

/// Parse a fragment and return its first top-level element.
pub fn fragment_first(html: &str) -> Element {
    parse_fragment(html)
        .children()
        .into_iter()
        .next()
        .expect("fragment has a top-level element")
}

/// Records replace-navigations instead of performing them.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    urls: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().expect("navigator lock").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn replace(&self, url: &str) {
        self.urls
            .lock()
            .expect("navigator lock")
            .push(url.to_string());
    }
}

/// Every feature flag switched on.
pub fn all_features() -> Options {
    Options {
        enable_app: true,
        remove_mobile_links: true,
        canonicalize_article_links: true,
        canonicalize_board_links: true,
        redirect_mobile_pages: true,
        redirect_mobile_new_tab: true,
        new_tab_article_only: false,
    }
}
