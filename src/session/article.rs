//! Article body handler: mobile-host stripping and legacy-link
//! canonicalization inside rendered articles.

use std::sync::LazyLock;

use url::Url;

use crate::dom::{selector, Element, Selector};
use crate::resolver::{self, CafeIdCache};
use crate::watcher::{self, ChildMatcher};

use super::SessionCtx;

static SE_LINK: LazyLock<Selector> = selector!("a.se-link");
static OGLINK_MODULE: LazyLock<Selector> = selector!(".se-module-oglink");
static OGLINK_THUMBNAIL: LazyLock<Selector> = selector!("a.se-oglink-thumbnail");
static OGLINK_INFO: LazyLock<Selector> = selector!("a.se-oglink-info");
static OGLINK_URL_TEXT: LazyLock<Selector> = selector!("p.se-oglink-url");
static GATE_ANCHOR: LazyLock<Selector> = selector!(".right_area a");
static COPY_URL_BUTTON: LazyLock<Selector> = selector!("a.button_url");

/// Articles re-render in place, so the watch is persistent. `location`
/// is the owning document's, not necessarily the top page's.
pub(crate) fn watch_articles(app: &Element, ctx: SessionCtx, location: Url) {
    watcher::watch_children(app, ChildMatcher::class("Article"), move |article| {
        tokio::spawn(handle_article(article, ctx.clone(), location.clone()));
    });
}

async fn handle_article(article: Element, ctx: SessionCtx, location: Url) {
    let wrap = watcher::next_child(&article, ChildMatcher::class("article_wrap")).await;
    let links = wrap.select(&SE_LINK);
    let oglinks = wrap.select(&OGLINK_MODULE);

    if ctx.options.remove_mobile_links {
        strip_mobile_links(&links);
        strip_mobile_oglinks(&oglinks);
    }

    if ctx.options.canonicalize_article_links {
        discover_cafe_info(&wrap, &ctx.cache).await;
        canonicalize_links(&links, &ctx.cache);
        canonicalize_oglinks(&oglinks, &ctx.cache);
        repair_copy_url_button(&wrap, &location).await;
    }
}

/// Opportunistic cache population from the article page's gate link.
/// Only runs while the cache is empty; a single cafe context per page
/// is assumed, so the first discovered mapping is the only one needed.
async fn discover_cafe_info(wrap: &Element, cache: &CafeIdCache) {
    if !cache.is_empty() {
        return;
    }
    let buttons = watcher::next_child(wrap, ChildMatcher::class("ArticleTopBtns")).await;
    let Some(gate) = buttons.select_first(&GATE_ANCHOR) else {
        return;
    };
    let Some(href) = gate.attr("href") else {
        return;
    };
    let Some(url) = resolver::parse_href(&href) else {
        return;
    };
    if let Some((cafe_name, cafe_id)) = resolver::cafe_info_from_gate_link(&url) {
        log::debug!("discovered cafe id {cafe_id} for {cafe_name} from article gate link");
        cache.insert_if_absent(&cafe_name, &cafe_id);
    }
}

fn strip_mobile_links(links: &[Element]) {
    for link in links {
        if let Some(href) = link.attr("href") {
            link.set_attr("href", &resolver::strip_mobile_host(&href));
        }
        if link.text().contains(resolver::MOBILE_HOST)
            && let Some(href) = link.attr("href")
        {
            link.set_text(&resolver::strip_mobile_host(&href));
        }
    }
}

fn strip_mobile_oglinks(oglinks: &[Element]) {
    for oglink in oglinks {
        let info = oglink.select_first(&OGLINK_INFO);
        for anchor in [oglink.select_first(&OGLINK_THUMBNAIL), info.clone()]
            .into_iter()
            .flatten()
        {
            if let Some(href) = anchor.attr("href") {
                anchor.set_attr("href", &resolver::strip_mobile_host(&href));
            }
        }
        if let Some(url_text) = info.and_then(|info| info.select_first(&OGLINK_URL_TEXT)) {
            url_text.set_text(&resolver::strip_mobile_host(&url_text.text()));
        }
    }
}

fn canonicalize_links(links: &[Element], cache: &CafeIdCache) {
    for link in links {
        let Some(href) = link.attr("href") else {
            continue;
        };
        if let Some(new_href) = canonical_article_href(&href, cache) {
            // Only mirror visible text that was the raw URL itself.
            if link.text() == href {
                link.set_text(&new_href);
            }
            link.set_attr("href", &new_href);
        }
    }
}

fn canonicalize_oglinks(oglinks: &[Element], cache: &CafeIdCache) {
    for oglink in oglinks {
        for anchor in [
            oglink.select_first(&OGLINK_THUMBNAIL),
            oglink.select_first(&OGLINK_INFO),
        ]
        .into_iter()
        .flatten()
        {
            if let Some(href) = anchor.attr("href")
                && let Some(new_href) = canonical_article_href(&href, cache)
            {
                anchor.set_attr("href", &new_href);
            }
        }
    }
}

fn canonical_article_href(href: &str, cache: &CafeIdCache) -> Option<String> {
    let url = resolver::parse_href(href)?;
    let article = resolver::resolve(&url, cache)?;
    Some(resolver::canonical_article_url(&article))
}

/// The copy-URL button carries a mobile share URL; point it at the
/// owning document's own location instead.
async fn repair_copy_url_button(wrap: &Element, location: &Url) {
    let content = watcher::next_child(wrap, ChildMatcher::class("ArticleContentBox")).await;
    if let Some(button) = content.select_first(&COPY_URL_BUTTON) {
        button.set_attr(
            "href",
            &format!("{}{}", location.origin().ascii_serialization(), location.path()),
        );
    }
}
