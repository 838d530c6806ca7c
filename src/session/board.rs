//! Board and list handler: canonicalizes article links across the four
//! board renderings and neutralizes page-owned click behavior on the
//! main-page tiles.

use std::sync::LazyLock;

use crate::dom::{selector, Element, Selector};
use crate::resolver;

pub(crate) static LIST_ROWS: LazyLock<Selector> = selector!(".article-board .inner_list");
pub(crate) static ROW_TITLE: LazyLock<Selector> = selector!("a.article");
pub(crate) static ROW_COMMENT: LazyLock<Selector> = selector!("a.cmt");

static ALBUM_ITEMS: LazyLock<Selector> = selector!("ul.article-album-sub li");
static ALBUM_IMAGE: LazyLock<Selector> = selector!("a.album-img");
static ALBUM_TITLE: LazyLock<Selector> = selector!("a.tit");
static ALBUM_COMMENT: LazyLock<Selector> = selector!("a.m-tcol-p");

static DETAIL_CARDS: LazyLock<Selector> = selector!("ul.article-movie-sub .card_area");
static DETAIL_TEXT: LazyLock<Selector> = selector!("a.txt");
static DETAIL_IMAGE: LazyLock<Selector> = selector!(".movie-img a");

static MAIN_ITEMS: LazyLock<Selector> = selector!("ul.album-box li");
static MAIN_IMAGE: LazyLock<Selector> = selector!(".photo a");
static MAIN_TITLE: LazyLock<Selector> = selector!(".tit a.m-tcol-c");
static MAIN_COMMENT: LazyLock<Selector> = selector!(".tit a.m-tcol-p");
static MENU_TITLE_LINKS: LazyLock<Selector> = selector!(".list-tit a");

/// Rewrite every known board rendering inside `main_area`.
pub(crate) fn rewrite_board_region(main_area: &Element) {
    // List rendering.
    for row in main_area.select(&LIST_ROWS) {
        for anchor in [row.select_first(&ROW_TITLE), row.select_first(&ROW_COMMENT)]
            .into_iter()
            .flatten()
        {
            rewrite_board_anchor(&anchor);
        }
    }

    // Album rendering.
    for item in main_area.select(&ALBUM_ITEMS) {
        for anchor in [
            item.select_first(&ALBUM_IMAGE),
            item.select_first(&ALBUM_TITLE),
            item.select_first(&ALBUM_COMMENT),
        ]
        .into_iter()
        .flatten()
        {
            rewrite_board_anchor(&anchor);
        }
    }

    // Details rendering.
    for card in main_area.select(&DETAIL_CARDS) {
        for anchor in [
            card.select_first(&ALBUM_TITLE),
            card.select_first(&DETAIL_TEXT),
            card.select_first(&DETAIL_IMAGE),
        ]
        .into_iter()
        .flatten()
        {
            rewrite_board_anchor(&anchor);
        }
    }

    // Main-page tiles: image and title share one rewritten href, the
    // comment anchor gets the same href with comment focus, and the
    // page's own click interception is detached.
    for item in main_area.select(&MAIN_ITEMS) {
        let mut rewritten_href = None;
        for anchor in [item.select_first(&MAIN_IMAGE), item.select_first(&MAIN_TITLE)]
            .into_iter()
            .flatten()
        {
            if let Some(href) = anchor.attr("href")
                && let Some(new_href) = resolver::canonicalize_board_href(&href)
            {
                let new_href = format!("{new_href}&boardtype=I");
                anchor.set_attr("href", &new_href);
                anchor.detach_behavior();
                rewritten_href = Some(new_href);
            }
        }
        if let Some(href) = rewritten_href
            && let Some(comment) = item.select_first(&MAIN_COMMENT)
        {
            comment.set_attr("href", &format!("{href}&commentFocus=true"));
        }
    }

    // Main-page menu titles only need behavior detached.
    for anchor in main_area.select(&MENU_TITLE_LINKS) {
        anchor.detach_behavior();
    }
}

/// Rewrite a single board anchor; unresolved hrefs stay untouched.
pub(crate) fn rewrite_board_anchor(anchor: &Element) {
    let Some(href) = anchor.attr("href") else {
        return;
    };
    if let Some(new_href) = resolver::canonicalize_board_href(&href) {
        anchor.set_attr("href", &new_href);
    }
}
