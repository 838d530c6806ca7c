//! Feature flags and the options storage boundary.
//!
//! The host environment keeps options in a flat map that is read once
//! at startup; [`OptionsStore`] models that one-time asynchronous read.
//! Every flag defaults to off, and a false flag fully disables its code
//! path, including watcher registration.

use std::future::Future;
use std::pin::Pin;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Feature flags controlling which page handlers are registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Master switch; nothing runs without it.
    pub enable_app: bool,
    /// Strip the mobile host label from links in article bodies.
    pub remove_mobile_links: bool,
    /// Rewrite legacy article links to the canonical scheme in article
    /// bodies.
    pub canonicalize_article_links: bool,
    /// Rewrite legacy article links in board and list renderings.
    pub canonicalize_board_links: bool,
    /// Redirect directly-opened mobile pages to the desktop site.
    pub redirect_mobile_pages: bool,
    /// Redirect mobile pages opened in a fresh tab.
    pub redirect_mobile_new_tab: bool,
    /// In the fresh-tab case, go straight to the canonical article URL.
    pub new_tab_article_only: bool,
}

impl Options {
    /// Deserialize from the flat storage map.
    pub fn from_flat_map(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).context("invalid options map")
    }

    /// Whether any DOM-rewriting feature is on.
    #[must_use]
    pub fn any_rewrite_enabled(&self) -> bool {
        self.remove_mobile_links || self.canonicalize_article_links || self.canonicalize_board_links
    }
}

/// One-time asynchronous read of the flat options map.
pub trait OptionsStore {
    fn load(&self) -> Pin<Box<dyn Future<Output = Result<Options>> + Send + '_>>;
}

/// In-memory store, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticOptionsStore {
    options: Options,
}

impl StaticOptionsStore {
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self { options }
    }
}

impl OptionsStore for StaticOptionsStore {
    fn load(&self) -> Pin<Box<dyn Future<Output = Result<Options>> + Send + '_>> {
        let options = self.options.clone();
        Box::pin(async move { Ok(options) })
    }
}
