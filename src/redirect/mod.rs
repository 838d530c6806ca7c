//! Mobile→desktop redirect resolution.
//!
//! Matches the current location's path against four fixed grammars, in
//! order, and maps the first hit onto a desktop URL template. No DOM
//! involvement; the navigation itself is behind the [`Navigator`]
//! boundary and always replaces the current history entry.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::resolver::{self, ArticleRef};

static CAFE_HOME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(?:ca-fe/)?(?P<cafe_name>\w+)/?$").expect("cafe home pattern compiles")
});

static MENU_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/ca-fe/web/cafes/(?P<cafe_id>\d+)/menus/(?P<menu_id>\d+)")
        .expect("menu list pattern compiles")
});

static ARTICLE_BY_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/ca-fe/web/cafes/(?P<cafe_id>\d+)/articles/(?P<article_id>\d+)")
        .expect("article by id pattern compiles")
});

static ARTICLE_BY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/ca-fe/web/cafes/(?P<cafe_name>\w+)/articles/(?P<article_id>\d+)")
        .expect("article by name pattern compiles")
});

/// Replace-style navigation boundary. Implementations must not push a
/// new history entry.
pub trait Navigator {
    fn replace(&self, url: &str);
}

/// Desktop URL for a mobile location path, if one of the four grammars
/// matches. Grammars are tried in order; the first match wins.
#[must_use]
pub fn desktop_redirect_target(path: &str) -> Option<String> {
    if let Some(captures) = CAFE_HOME.captures(path) {
        return Some(resolver::cafe_home_url(&captures["cafe_name"]));
    }
    if let Some(captures) = MENU_LIST.captures(path) {
        return Some(resolver::legacy_list_url(
            &captures["cafe_id"],
            &captures["menu_id"],
        ));
    }
    if let Some(captures) = ARTICLE_BY_ID.captures(path) {
        return Some(resolver::legacy_read_url(&ArticleRef::new(
            &captures["cafe_id"],
            &captures["article_id"],
        )));
    }
    if let Some(captures) = ARTICLE_BY_NAME.captures(path) {
        return Some(resolver::named_article_url(
            &captures["cafe_name"],
            &captures["article_id"],
        ));
    }
    // TODO: handle /ca-fe/web/cafes/{cafe}/members/{member} profile paths
    None
}

/// New-tab variant: article paths go straight to the canonical article
/// URL when `article_only` is set, to the legacy read URL otherwise.
#[must_use]
pub fn desktop_redirect_target_new_tab(path: &str, article_only: bool) -> Option<String> {
    if article_only
        && let Some(captures) = ARTICLE_BY_ID.captures(path)
    {
        return Some(resolver::canonical_article_url(&ArticleRef::new(
            &captures["cafe_id"],
            &captures["article_id"],
        )));
    }
    desktop_redirect_target(path)
}

/// Resolve the location and issue at most one replace-navigation.
/// Returns whether a navigation was issued.
pub fn redirect_to_desktop(location: &Url, navigator: &impl Navigator) -> bool {
    let Some(target) = desktop_redirect_target(location.path()) else {
        return false;
    };
    log::debug!("redirecting {location} to {target}");
    navigator.replace(&target);
    true
}
