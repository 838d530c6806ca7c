//! Full page-session scenarios over parsed fixtures.

mod common;

use cafelink::dom::parse_document;
use cafelink::{Document, Options, PageSession, Selector, StaticOptionsStore};
use common::{all_features, fragment_first, settle, RecordingNavigator};
use url::Url;

const ARTICLE_LOCATION: &str = "https://cafe.naver.com/ca-fe/cafes/27842958/articles/101";

fn desktop_document(body: &str) -> Document {
    parse_document(
        Url::parse(ARTICLE_LOCATION).expect("test url parses"),
        &format!("<html><body>{body}</body></html>"),
    )
}

fn sel(input: &str) -> Selector {
    Selector::parse(input).expect("test selector parses")
}

async fn start(options: Options, document: &Document) -> PageSession {
    let navigator = RecordingNavigator::default();
    PageSession::start(&StaticOptionsStore::new(options), document, &navigator)
        .await
        .expect("session starts")
}

#[tokio::test]
async fn article_links_are_canonicalized_after_gate_discovery() {
    common::init_logging();
    let document = desktop_document(r#"<div id="app"></div>"#);
    let session = start(
        Options {
            enable_app: true,
            canonicalize_article_links: true,
            ..Options::default()
        },
        &document,
    )
    .await;

    let article = fragment_first(
        r#"<div class="Article"><div class="article_wrap">
            <div class="ArticleTopBtns"><div class="right_area">
                <a href="/steamindiegame?iframe_url=%2FArticleList.nhn%3Fsearch.clubid%3D27842958">gate</a>
            </div></div>
            <a class="se-link" href="/steamindiegame/42">/steamindiegame/42</a>
            <a class="se-link" href="https://cafe.naver.com/ArticleRead.nhn?clubid=5&articleid=6">read me</a>
        </div></div>"#,
    );
    let app = document.select_first(&sel("#app")).expect("app present");
    app.append_child(article);
    settle().await;

    assert_eq!(session.cache().get("steamindiegame").as_deref(), Some("27842958"));
    let links = document.select(&sel("a.se-link"));
    assert_eq!(
        links[0].attr("href").as_deref(),
        Some("https://cafe.naver.com/ca-fe/cafes/27842958/articles/42")
    );
    // Visible text that was not the raw href stays as written.
    assert_eq!(
        links[1].attr("href").as_deref(),
        Some("https://cafe.naver.com/ca-fe/cafes/5/articles/6")
    );
    assert_eq!(links[1].text(), "read me");
}

#[tokio::test]
async fn document_level_discovery_skips_the_gate_wait() {
    let document = desktop_document(
        r##"<div id="front-cafe"><a href="/MyCafeIntro.nhn?clubid=27842958">intro</a></div>
           <div id="app"></div>
           <footer class="footer"><a class="cafe_link" href="#">https://cafe.naver.com/steamindiegame</a></footer>"##,
    );
    let session = start(
        Options {
            enable_app: true,
            canonicalize_article_links: true,
            ..Options::default()
        },
        &document,
    )
    .await;
    assert_eq!(session.cache().get("steamindiegame").as_deref(), Some("27842958"));

    // No ArticleTopBtns anywhere; the pre-populated cache lets the
    // handler proceed straight to rewriting.
    let article = fragment_first(
        r#"<div class="Article"><div class="article_wrap">
            <a class="se-link" href="/steamindiegame/42">t</a>
        </div></div>"#,
    );
    let app = document.select_first(&sel("#app")).expect("app present");
    app.append_child(article);
    settle().await;

    let link = document.select_first(&sel("a.se-link")).expect("link present");
    assert_eq!(
        link.attr("href").as_deref(),
        Some("https://cafe.naver.com/ca-fe/cafes/27842958/articles/42")
    );
}

#[tokio::test]
async fn mobile_hosts_are_stripped_from_hrefs_and_raw_url_text() {
    let document = desktop_document(r#"<div id="app"></div>"#);
    start(
        Options {
            enable_app: true,
            remove_mobile_links: true,
            ..Options::default()
        },
        &document,
    )
    .await;

    let article = fragment_first(
        r#"<div class="Article"><div class="article_wrap">
            <a class="se-link" href="https://m.cafe.naver.com/other/page">https://m.cafe.naver.com/other/page</a>
            <div class="se-module-oglink">
                <a class="se-oglink-thumbnail" href="https://m.cafe.naver.com/other/page"></a>
                <a class="se-oglink-info" href="https://m.cafe.naver.com/other/page">
                    <p class="se-oglink-url">m.cafe.naver.com/other/page</p>
                </a>
            </div>
        </div></div>"#,
    );
    let app = document.select_first(&sel("#app")).expect("app present");
    app.append_child(article);
    settle().await;

    let link = document.select_first(&sel("a.se-link")).expect("link present");
    assert_eq!(
        link.attr("href").as_deref(),
        Some("https://cafe.naver.com/other/page")
    );
    assert_eq!(link.text(), "https://cafe.naver.com/other/page");

    let thumb = document
        .select_first(&sel("a.se-oglink-thumbnail"))
        .expect("thumbnail present");
    assert_eq!(
        thumb.attr("href").as_deref(),
        Some("https://cafe.naver.com/other/page")
    );
    let url_text = document
        .select_first(&sel("p.se-oglink-url"))
        .expect("url text present");
    assert_eq!(url_text.text(), "cafe.naver.com/other/page");
}

#[tokio::test]
async fn unresolved_article_links_stay_untouched() {
    let document = desktop_document(r#"<div id="app"></div>"#);
    start(
        Options {
            enable_app: true,
            canonicalize_article_links: true,
            ..Options::default()
        },
        &document,
    )
    .await;

    // The gate link carries no iframe_url, so nothing is discovered and
    // the named path cannot resolve.
    let article = fragment_first(
        r#"<div class="Article"><div class="article_wrap">
            <div class="ArticleTopBtns"><div class="right_area"><a href="/steamindiegame">gate</a></div></div>
            <a class="se-link" href="/steamindiegame/42">t</a>
        </div></div>"#,
    );
    let app = document.select_first(&sel("#app")).expect("app present");
    app.append_child(article);
    settle().await;

    let link = document.select_first(&sel("a.se-link")).expect("link present");
    assert_eq!(link.attr("href").as_deref(), Some("/steamindiegame/42"));
}

#[tokio::test]
async fn copy_url_button_points_at_the_page_location() {
    let document = desktop_document(
        r##"<div id="front-cafe"><a href="/MyCafeIntro.nhn?clubid=27842958">intro</a></div>
           <div id="app"></div>
           <footer class="footer"><a class="cafe_link" href="#">https://cafe.naver.com/steamindiegame</a></footer>"##,
    );
    start(
        Options {
            enable_app: true,
            canonicalize_article_links: true,
            ..Options::default()
        },
        &document,
    )
    .await;

    let article = fragment_first(
        r#"<div class="Article"><div class="article_wrap">
            <div class="ArticleContentBox">
                <a class="button_url" href="https://m.cafe.naver.com/share?x=1">copy</a>
            </div>
        </div></div>"#,
    );
    let app = document.select_first(&sel("#app")).expect("app present");
    app.append_child(article);
    settle().await;

    let button = document.select_first(&sel("a.button_url")).expect("button present");
    assert_eq!(button.attr("href").as_deref(), Some(ARTICLE_LOCATION));
}

#[tokio::test]
async fn frame_hosted_copy_url_button_uses_the_frame_location() {
    let document = parse_document(
        Url::parse("https://cafe.naver.com/steamindiegame").expect("url"),
        r#"<html><body><iframe id="cafe_main"></iframe></body></html>"#,
    );
    start(
        Options {
            enable_app: true,
            canonicalize_article_links: true,
            ..Options::default()
        },
        &document,
    )
    .await;

    let frame = document.select_first(&sel("#cafe_main")).expect("frame present");
    let sub = parse_document(
        Url::parse(ARTICLE_LOCATION).expect("url"),
        r#"<html><body><div id="app"></div></body></html>"#,
    );
    frame.attach_content_document(sub.clone());

    let article = fragment_first(
        r#"<div class="Article"><div class="article_wrap">
            <div class="ArticleTopBtns"></div>
            <div class="ArticleContentBox">
                <a class="button_url" href="https://m.cafe.naver.com/share?x=1">copy</a>
            </div>
        </div></div>"#,
    );
    let app = sub.select_first(&sel("#app")).expect("app present");
    app.append_child(article);
    settle().await;

    // The button reflects the article sub-document's location, not the
    // outer cafe-home page's.
    let button = sub.select_first(&sel("a.button_url")).expect("button present");
    assert_eq!(button.attr("href").as_deref(), Some(ARTICLE_LOCATION));
}

#[tokio::test]
async fn board_renderings_are_rewritten_in_place() {
    let document = desktop_document(
        r#"<div id="main-area">
            <div class="article-board"><div class="inner_list">
                <a class="article" href="/ArticleRead.nhn?clubid=11&articleid=22&page=3">title</a>
                <a class="cmt" href="/ArticleRead.nhn?clubid=11&articleid=22&commentAll=true">[5]</a>
            </div></div>
            <ul class="article-album-sub"><li>
                <a class="album-img" href="/ArticleRead.nhn?clubid=11&articleid=33">img</a>
                <a class="tit" href="/ArticleRead.nhn?clubid=11&articleid=33">album title</a>
            </li></ul>
            <ul class="article-movie-sub"><li class="card_area">
                <a class="txt" href="/ArticleRead.nhn?clubid=11&articleid=44">detail</a>
            </li></ul>
        </div>"#,
    );
    start(all_features(), &document).await;

    let title = document.select_first(&sel("a.article")).expect("title present");
    assert_eq!(
        title.attr("href").as_deref(),
        Some("https://cafe.naver.com/ca-fe/cafes/11/articles/22?clubid=11&articleid=22&page=3")
    );
    let comment = document.select_first(&sel("a.cmt")).expect("comment present");
    assert_eq!(
        comment.attr("href").as_deref(),
        Some(
            "https://cafe.naver.com/ca-fe/cafes/11/articles/22?clubid=11&articleid=22&commentAll=true"
        )
    );
    let album = document.select_first(&sel("a.tit")).expect("album title present");
    assert_eq!(
        album.attr("href").as_deref(),
        Some("https://cafe.naver.com/ca-fe/cafes/11/articles/33?clubid=11&articleid=33")
    );
    let detail = document.select_first(&sel("a.txt")).expect("detail present");
    assert_eq!(
        detail.attr("href").as_deref(),
        Some("https://cafe.naver.com/ca-fe/cafes/11/articles/44?clubid=11&articleid=44")
    );
}

#[tokio::test]
async fn main_page_tiles_get_board_type_and_comment_focus() {
    let document = desktop_document(
        r##"<div id="main-area">
            <ul class="album-box"><li>
                <div class="photo"><a href="/ArticleRead.nhn?clubid=11&articleid=33" onclick="intercept()">img</a></div>
                <div class="tit">
                    <a class="m-tcol-c" href="/ArticleRead.nhn?clubid=11&articleid=33">title</a>
                    <a class="m-tcol-p" href="#">[2]</a>
                </div>
            </ul>
            <div class="list-tit"><a href="/menu" onclick="intercept()">menu</a></div>
        </div>"##,
    );
    start(all_features(), &document).await;

    let expected = "https://cafe.naver.com/ca-fe/cafes/11/articles/33?clubid=11&articleid=33&boardtype=I";
    let photo = document.select_first(&sel(".photo a")).expect("photo present");
    assert_eq!(photo.attr("href").as_deref(), Some(expected));
    assert!(photo.attr("onclick").is_none());
    assert!(!photo.has_listeners());

    let title = document.select_first(&sel("a.m-tcol-c")).expect("title present");
    assert_eq!(title.attr("href").as_deref(), Some(expected));

    let comment = document.select_first(&sel("a.m-tcol-p")).expect("comment present");
    assert_eq!(
        comment.attr("href").as_deref(),
        Some(format!("{expected}&commentFocus=true").as_str())
    );

    let menu = document.select_first(&sel(".list-tit a")).expect("menu present");
    assert!(menu.attr("onclick").is_none());
    assert!(!menu.has_listeners());
    // Detachment does not rewrite the menu link itself.
    assert_eq!(menu.attr("href").as_deref(), Some("/menu"));
}

#[tokio::test]
async fn member_profile_tables_are_rewritten_on_every_render() {
    let document = desktop_document(r#"<div id="app"></div>"#);
    start(all_features(), &document).await;

    let profile = fragment_first(r#"<div class="MemberProfile"></div>"#);
    let app = document.select_first(&sel("#app")).expect("app present");
    app.append_child(profile.clone());
    settle().await;

    let board = fragment_first(r#"<div class="article-board"></div>"#);
    profile.append_child(board.clone());
    settle().await;

    let table = fragment_first(
        r#"<table><tbody><tr><td><div class="inner_list">
            <a class="article" href="/ArticleRead.nhn?clubid=11&articleid=22" target="_blank" onclick="intercept()">t</a>
        </div></td></tr></tbody></table>"#,
    );
    board.append_child(table);
    settle().await;

    let anchor = document.select_first(&sel("a.article")).expect("anchor present");
    assert_eq!(
        anchor.attr("href").as_deref(),
        Some("https://cafe.naver.com/ca-fe/cafes/11/articles/22?clubid=11&articleid=22")
    );
    assert_eq!(anchor.attr("target").as_deref(), Some("_self"));
    assert!(anchor.attr("onclick").is_none());
    assert!(!anchor.has_listeners());

    // The profile board re-renders its table wholesale; the watch is
    // persistent, so a second table is rewritten too.
    let second = fragment_first(
        r#"<table><tbody><tr><td><div class="inner_list">
            <a class="cmt" href="/ArticleRead.nhn?clubid=11&articleid=99">[3]</a>
        </div></td></tr></tbody></table>"#,
    );
    board.append_child(second);
    settle().await;

    let comment = document.select_first(&sel("a.cmt")).expect("comment present");
    assert_eq!(
        comment.attr("href").as_deref(),
        Some("https://cafe.naver.com/ca-fe/cafes/11/articles/99?clubid=11&articleid=99")
    );
}

#[tokio::test]
async fn frame_sub_documents_are_rewritten_on_load() {
    let document = desktop_document(r#"<iframe id="cafe_main"></iframe>"#);
    start(all_features(), &document).await;

    let frame = document.select_first(&sel("#cafe_main")).expect("frame present");
    let sub = parse_document(
        Url::parse("https://cafe.naver.com/ArticleList.nhn?search.clubid=11").expect("url"),
        r#"<html><body><div id="main-area">
            <div class="article-board"><div class="inner_list">
                <a class="article" href="/ArticleRead.nhn?clubid=11&articleid=22">t</a>
            </div></div>
        </div></body></html>"#,
    );
    frame.attach_content_document(sub.clone());

    let anchor = sub.select_first(&sel("a.article")).expect("anchor present");
    assert_eq!(
        anchor.attr("href").as_deref(),
        Some("https://cafe.naver.com/ca-fe/cafes/11/articles/22?clubid=11&articleid=22")
    );
}

#[tokio::test]
async fn frame_content_attached_before_start_is_rewritten_immediately() {
    let document = desktop_document(r#"<iframe id="cafe_main"></iframe>"#);
    let frame = document.select_first(&sel("#cafe_main")).expect("frame present");
    let sub = parse_document(
        Url::parse("https://cafe.naver.com/ArticleList.nhn?search.clubid=11").expect("url"),
        r#"<html><body><div id="main-area">
            <div class="article-board"><div class="inner_list">
                <a class="article" href="/ArticleRead.nhn?clubid=11&articleid=22">t</a>
            </div></div>
        </div></body></html>"#,
    );
    frame.attach_content_document(sub.clone());

    start(all_features(), &document).await;

    let anchor = sub.select_first(&sel("a.article")).expect("anchor present");
    assert_eq!(
        anchor.attr("href").as_deref(),
        Some("https://cafe.naver.com/ca-fe/cafes/11/articles/22?clubid=11&articleid=22")
    );
}

#[tokio::test]
async fn disabled_master_switch_registers_nothing() {
    let document = desktop_document(
        r#"<div id="app"></div>
           <div id="main-area"><div class="article-board"><div class="inner_list">
               <a class="article" href="/ArticleRead.nhn?clubid=11&articleid=22">t</a>
           </div></div></div>"#,
    );
    start(
        Options {
            enable_app: false,
            ..all_features()
        },
        &document,
    )
    .await;

    let article = fragment_first(
        r#"<div class="Article"><div class="article_wrap">
            <a class="se-link" href="https://m.cafe.naver.com/other/page">x</a>
        </div></div>"#,
    );
    let app = document.select_first(&sel("#app")).expect("app present");
    app.append_child(article);
    settle().await;

    let link = document.select_first(&sel("a.se-link")).expect("link present");
    assert_eq!(
        link.attr("href").as_deref(),
        Some("https://m.cafe.naver.com/other/page")
    );
    let row = document.select_first(&sel("a.article")).expect("row present");
    assert_eq!(
        row.attr("href").as_deref(),
        Some("/ArticleRead.nhn?clubid=11&articleid=22")
    );
}
