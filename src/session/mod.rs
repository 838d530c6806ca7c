//! Page orchestrator: composes the watcher, resolver and cache to
//! rewrite links inside the regions of a rendered cafe page, and to
//! redirect directly-opened mobile pages.
//!
//! One session per attached page. The cafe-id cache is owned by the
//! session and discarded with it on navigation.

pub mod article;
pub mod board;
pub mod errors;
pub mod profile;

use std::sync::Arc;
use std::sync::LazyLock;

use url::Url;

use crate::dom::{selector, Document, Selector};
use crate::options::{Options, OptionsStore};
use crate::redirect::{self, Navigator};
use crate::resolver::{self, CafeIdCache};

pub use errors::SessionError;

static APP: LazyLock<Selector> = selector!("#app");
static MAIN_AREA: LazyLock<Selector> = selector!("#main-area");
static CAFE_MAIN_FRAME: LazyLock<Selector> = selector!("#cafe_main");
static FRONT_CAFE_LINK: LazyLock<Selector> = selector!("#front-cafe a");
static FOOTER_CAFE_LINK: LazyLock<Selector> = selector!("footer.footer a.cafe_link");

/// Shared state threaded through the region handlers.
#[derive(Clone)]
pub(crate) struct SessionCtx {
    pub(crate) options: Options,
    pub(crate) cache: Arc<CafeIdCache>,
}

/// Region kinds the handler index can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Article,
    MemberProfile,
    ArticleList,
}

/// Region handler lookup. A `None` here for a wired key is the one
/// fatal startup condition.
fn region_handler(key: &str) -> Option<Region> {
    match key {
        "article" => Some(Region::Article),
        "member-profile" => Some(Region::MemberProfile),
        "article-list" => Some(Region::ArticleList),
        _ => None,
    }
}

/// The startup wiring: every key must resolve to a handler even when
/// its feature is off.
fn handler_index(options: &Options) -> [(&'static str, bool); 3] {
    [
        (
            "article",
            options.remove_mobile_links || options.canonicalize_article_links,
        ),
        ("member-profile", options.canonicalize_board_links),
        ("article-list", options.canonicalize_board_links),
    ]
}

fn validate_handler_index(options: &Options) -> Result<Vec<Region>, SessionError> {
    let mut active = Vec::new();
    for (key, enabled) in handler_index(options) {
        let region = region_handler(key).ok_or(SessionError::MissingHandler(key))?;
        if enabled {
            active.push(region);
        }
    }
    Ok(active)
}

/// An attached page session.
pub struct PageSession {
    options: Options,
    cache: Arc<CafeIdCache>,
}

impl PageSession {
    /// Load options and attach to a page.
    ///
    /// Desktop pages get their region watchers registered; mobile pages
    /// get at most one replace-navigation. Disabled features register
    /// nothing at all.
    pub async fn start<S, N>(
        store: &S,
        document: &Document,
        navigator: &N,
    ) -> Result<PageSession, SessionError>
    where
        S: OptionsStore,
        N: Navigator,
    {
        let options = store.load().await?;
        let session = PageSession {
            options: options.clone(),
            cache: Arc::new(CafeIdCache::new()),
        };
        if !options.enable_app {
            log::debug!("cafelink disabled by options");
            return Ok(session);
        }
        let active = validate_handler_index(&options)?;

        let location = document.location().clone();
        let host = location.host_str().unwrap_or_default();
        if host == resolver::DESKTOP_HOST {
            if options.any_rewrite_enabled() {
                let ctx = SessionCtx {
                    options,
                    cache: session.cache.clone(),
                };
                discover_from_document(document, &ctx.cache);
                init_cafe(document, &ctx, &active);
                observe_main_document(document, ctx, active);
            }
        } else if host == resolver::MOBILE_HOST && options.redirect_mobile_pages {
            redirect::redirect_to_desktop(&location, navigator);
        }
        Ok(session)
    }

    /// Entry point for mobile pages opened in a fresh tab. The caller is
    /// responsible for the history-length check; this only consults the
    /// new-tab flags and the location.
    pub fn start_new_tab(options: &Options, location: &Url, navigator: &impl Navigator) -> bool {
        if !options.enable_app || !options.redirect_mobile_new_tab {
            return false;
        }
        if location.host_str() != Some(resolver::MOBILE_HOST) {
            return false;
        }
        let Some(target) =
            redirect::desktop_redirect_target_new_tab(location.path(), options.new_tab_article_only)
        else {
            return false;
        };
        log::debug!("redirecting new tab {location} to {target}");
        navigator.replace(&target);
        true
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The session-owned cafe-id cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<CafeIdCache> {
        &self.cache
    }
}

/// Register region handlers within one (sub-)document.
///
/// The application region (`#app`) takes precedence; board pages
/// without it fall back to an immediate `#main-area` rewrite.
fn init_cafe(document: &Document, ctx: &SessionCtx, active: &[Region]) {
    let wants_article = active.contains(&Region::Article);
    let wants_profile = active.contains(&Region::MemberProfile);
    let wants_list = active.contains(&Region::ArticleList);

    if (wants_article || wants_profile)
        && let Some(app) = document.select_first(&APP)
    {
        if wants_article {
            // The copy-URL repair needs the location of the document
            // the article renders in, which for frame-hosted articles
            // is not the top page's.
            article::watch_articles(&app, ctx.clone(), document.location().clone());
        }
        if wants_profile {
            profile::watch_member_profiles(&app);
        }
        return;
    }
    if wants_list
        && let Some(main_area) = document.select_first(&MAIN_AREA)
    {
        board::rewrite_board_region(&main_area);
    }
}

/// The main content frame renders sub-documents repeatedly; re-run
/// region registration on every load, and once immediately when content
/// is already attached.
fn observe_main_document(document: &Document, ctx: SessionCtx, active: Vec<Region>) {
    let Some(frame) = document.select_first(&CAFE_MAIN_FRAME) else {
        return;
    };
    {
        let ctx = ctx.clone();
        let active = active.clone();
        frame.on_content_load(move |sub_document| init_cafe(sub_document, &ctx, &active));
    }
    if let Some(sub_document) = frame.content_document() {
        init_cafe(&sub_document, &ctx, &active);
    }
}

/// Document-level cache population: the front gate link carries the
/// cafe id, the footer link's trailing path segment carries the name.
fn discover_from_document(document: &Document, cache: &CafeIdCache) {
    let Some(id_anchor) = document.select_first(&FRONT_CAFE_LINK) else {
        return;
    };
    let Some(href) = id_anchor.attr("href") else {
        return;
    };
    let Some(url) = resolver::parse_href(&href) else {
        return;
    };
    let Some(cafe_id) = resolver::cafe_id_from_front_link(&url) else {
        return;
    };
    let Some(name_anchor) = document.select_first(&FOOTER_CAFE_LINK) else {
        return;
    };
    let text = name_anchor.text();
    let cafe_name = text.rsplit('/').next().unwrap_or_default();
    if cafe_name.is_empty() {
        return;
    }
    log::debug!("discovered cafe id {cafe_id} for {cafe_name} from document footer");
    cache.insert_if_absent(cafe_name, &cafe_id);
}
