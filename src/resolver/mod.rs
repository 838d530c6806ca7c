//! URL identifier resolution: decodes the heterogeneous set of cafe
//! link encodings into a canonical (cafe id, article id) pair.
//!
//! Resolution is pure and synchronous; nothing here touches the page
//! model or performs I/O. Strategies are tried in a fixed priority
//! order and the first one yielding a complete pair wins. A partial
//! pair is never returned; callers leave unresolved hrefs untouched.

pub mod cache;

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

pub use cache::CafeIdCache;

/// Mobile site host label.
pub const MOBILE_HOST: &str = "m.cafe.naver.com";
/// Desktop site host label.
pub const DESKTOP_HOST: &str = "cafe.naver.com";
/// Desktop origin used as the base for relative hrefs and URL templates.
pub const DESKTOP_ORIGIN: &str = "https://cafe.naver.com";

/// A fully resolved article reference. Both ids are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRef {
    pub cafe_id: String,
    pub article_id: String,
}

impl ArticleRef {
    #[must_use]
    pub fn new(cafe_id: impl Into<String>, article_id: impl Into<String>) -> Self {
        Self {
            cafe_id: cafe_id.into(),
            article_id: article_id.into(),
        }
    }
}

static NAMED_ARTICLE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(?P<cafe_name>\w+)/(?P<article_id>\d+)")
        .expect("named article path pattern compiles")
});

static CANONICAL_ARTICLE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/ca-fe/cafes/(?P<cafe_id>\w+)/articles/(?P<article_id>\d+)")
        .expect("canonical article path pattern compiles")
});

static DESKTOP_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse(DESKTOP_ORIGIN).expect("desktop origin parses"));

/// Parse an href as found in the page, joining relative forms against
/// the desktop origin.
#[must_use]
pub fn parse_href(href: &str) -> Option<Url> {
    DESKTOP_BASE.join(href).ok()
}

/// A query parameter's value, if present and non-empty. Values are
/// percent-decoded once by the URL parser.
#[must_use]
pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Resolve a URL to an article reference.
///
/// Strategy order, first complete pair wins:
/// 1. `/{name}/{id}` path with a cache lookup of the cafe name;
/// 2. the legacy `/ArticleRead.nhn` read endpoint's query pair;
/// 3. a percent-encoded URL embedded in the `iframe_url_utf8` query
///    parameter, re-run through the legacy query extraction;
/// 4. the canonical `/ca-fe/cafes/{id}/articles/{id}` path.
#[must_use]
pub fn resolve(url: &Url, cache: &CafeIdCache) -> Option<ArticleRef> {
    resolve_named_path(url, cache)
        .or_else(|| resolve_legacy_read(url))
        .or_else(|| resolve_embedded_iframe(url))
        .or_else(|| resolve_canonical_path(url))
}

fn resolve_named_path(url: &Url, cache: &CafeIdCache) -> Option<ArticleRef> {
    let captures = NAMED_ARTICLE_PATH.captures(url.path())?;
    let cafe_id = cache.get(&captures["cafe_name"])?;
    Some(ArticleRef::new(cafe_id, &captures["article_id"]))
}

fn resolve_legacy_read(url: &Url) -> Option<ArticleRef> {
    if url.path() != "/ArticleRead.nhn" {
        return None;
    }
    let cafe_id = query_param(url, "clubid")?;
    let article_id = query_param(url, "articleid")?;
    Some(ArticleRef::new(cafe_id, article_id))
}

fn resolve_embedded_iframe(url: &Url) -> Option<ArticleRef> {
    let embedded = query_param(url, "iframe_url_utf8")?;
    let decoded = urlencoding::decode(&embedded).ok()?;
    let inner = reparse_with_suffix(url, &decoded)?;
    let cafe_id = query_param(&inner, "clubid")?;
    let article_id = query_param(&inner, "articleid")?;
    Some(ArticleRef::new(cafe_id, article_id))
}

fn resolve_canonical_path(url: &Url) -> Option<ArticleRef> {
    let captures = CANONICAL_ARTICLE_PATH.captures(url.path())?;
    Some(ArticleRef::new(
        &captures["cafe_id"],
        &captures["article_id"],
    ))
}

/// Rebuild a URL as `origin + path + suffix`, the way embedded iframe
/// links are reconstituted.
fn reparse_with_suffix(url: &Url, suffix: &str) -> Option<Url> {
    let origin = url.origin().ascii_serialization();
    Url::parse(&format!("{origin}{}{suffix}", url.path())).ok()
}

/// Canonical desktop article URL.
#[must_use]
pub fn canonical_article_url(article: &ArticleRef) -> String {
    format!(
        "{DESKTOP_ORIGIN}/ca-fe/cafes/{}/articles/{}",
        article.cafe_id, article.article_id
    )
}

/// Legacy desktop article read URL.
#[must_use]
pub fn legacy_read_url(article: &ArticleRef) -> String {
    format!(
        "{DESKTOP_ORIGIN}/ArticleRead.nhn?clubid={}&articleid={}",
        article.cafe_id, article.article_id
    )
}

/// Legacy desktop article list URL for a board menu.
#[must_use]
pub fn legacy_list_url(cafe_id: &str, menu_id: &str) -> String {
    format!("{DESKTOP_ORIGIN}/ArticleList.nhn?search.clubid={cafe_id}&search.menuid={menu_id}")
}

/// Bare cafe root URL.
#[must_use]
pub fn cafe_home_url(cafe_name: &str) -> String {
    format!("{DESKTOP_ORIGIN}/{cafe_name}")
}

/// Name-addressed article URL, resolvable once the cafe id is known.
#[must_use]
pub fn named_article_url(cafe_name: &str, article_id: &str) -> String {
    format!("{DESKTOP_ORIGIN}/{cafe_name}/{article_id}")
}

/// Board/list rewriting: these contexts expose the legacy query pair
/// directly, on whatever endpoint path, and the canonical URL keeps
/// the original query string.
#[must_use]
pub fn canonicalize_board_href(href: &str) -> Option<String> {
    let url = parse_href(href)?;
    let cafe_id = query_param(&url, "clubid")?;
    let article_id = query_param(&url, "articleid")?;
    let base = canonical_article_url(&ArticleRef::new(cafe_id, article_id));
    Some(match url.query() {
        Some(query) => format!("{base}?{query}"),
        None => base,
    })
}

/// Extract a (cafe name, cafe id) pair from the article page's gate
/// link: the name is the link's path, the id comes from the embedded
/// `iframe_url` parameter, trying the search-scoped parameter name
/// before the plain one.
#[must_use]
pub fn cafe_info_from_gate_link(url: &Url) -> Option<(String, String)> {
    let cafe_name = url.path().trim_start_matches('/').to_string();
    if cafe_name.is_empty() {
        return None;
    }
    let embedded = query_param(url, "iframe_url")?;
    let inner = reparse_with_suffix(url, &embedded)?;
    let cafe_id =
        query_param(&inner, "search.clubid").or_else(|| query_param(&inner, "clubid"))?;
    Some((cafe_name, cafe_id))
}

/// The cafe id carried by the front-page gate link.
#[must_use]
pub fn cafe_id_from_front_link(url: &Url) -> Option<String> {
    query_param(url, "clubid")
}

/// Replace the first occurrence of the mobile host label with the
/// desktop one. Applied to hrefs and to visible link text.
#[must_use]
pub fn strip_mobile_host(text: &str) -> String {
    text.replacen(MOBILE_HOST, DESKTOP_HOST, 1)
}
