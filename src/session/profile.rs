//! Member-profile handler: the profile's article board renders its
//! table repeatedly, so the table watch is persistent.

use std::sync::LazyLock;

use crate::dom::{selector, Element, Selector};
use crate::resolver;
use crate::watcher::{self, ChildMatcher};

use super::board::{ROW_COMMENT, ROW_TITLE};

static PROFILE_ROWS: LazyLock<Selector> = selector!(".inner_list");

pub(crate) fn watch_member_profiles(app: &Element) {
    watcher::watch_children(app, ChildMatcher::class("MemberProfile"), |profile| {
        tokio::spawn(handle_member_profile(profile));
    });
}

async fn handle_member_profile(profile: Element) {
    let board = watcher::next_child(&profile, ChildMatcher::class("article-board")).await;
    watcher::watch_children(&board, ChildMatcher::tag("TABLE"), |table| {
        for row in table.select(&PROFILE_ROWS) {
            for anchor in [row.select_first(&ROW_TITLE), row.select_first(&ROW_COMMENT)]
                .into_iter()
                .flatten()
            {
                rewrite_profile_anchor(&anchor);
            }
        }
    });
}

/// Rewritten profile anchors additionally open in the same tab and have
/// the page's own listeners detached.
fn rewrite_profile_anchor(anchor: &Element) {
    let Some(href) = anchor.attr("href") else {
        return;
    };
    if let Some(new_href) = resolver::canonicalize_board_href(&href) {
        anchor.set_attr("href", &new_href);
        anchor.set_attr("target", "_self");
        anchor.detach_behavior();
    }
}
