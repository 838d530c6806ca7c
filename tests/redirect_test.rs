//! Mobile→desktop redirects driven through the page session.

mod common;

use cafelink::{Document, Element, Options, PageSession, StaticOptionsStore};
use common::{all_features, RecordingNavigator};
use url::Url;

fn document_at(url: &str) -> Document {
    Document::new(
        Url::parse(url).expect("test url parses"),
        Element::new("html"),
    )
}

#[tokio::test]
async fn mobile_article_page_is_replaced_with_the_legacy_read_url() {
    common::init_logging();
    let navigator = RecordingNavigator::default();
    let document = document_at("https://m.cafe.naver.com/ca-fe/web/cafes/12345/articles/6789");
    PageSession::start(&StaticOptionsStore::new(all_features()), &document, &navigator)
        .await
        .expect("session starts");
    assert_eq!(
        navigator.urls(),
        vec!["https://cafe.naver.com/ArticleRead.nhn?clubid=12345&articleid=6789".to_string()]
    );
}

#[tokio::test]
async fn redirect_flag_off_leaves_the_page_alone() {
    let navigator = RecordingNavigator::default();
    let options = Options {
        redirect_mobile_pages: false,
        ..all_features()
    };
    let document = document_at("https://m.cafe.naver.com/ca-fe/web/cafes/12345/articles/6789");
    PageSession::start(&StaticOptionsStore::new(options), &document, &navigator)
        .await
        .expect("session starts");
    assert!(navigator.urls().is_empty());
}

#[tokio::test]
async fn unmatched_mobile_paths_are_not_redirected() {
    let navigator = RecordingNavigator::default();
    let document = document_at("https://m.cafe.naver.com/ca-fe/web/cafes/12345/members/abcdef");
    PageSession::start(&StaticOptionsStore::new(all_features()), &document, &navigator)
        .await
        .expect("session starts");
    assert!(navigator.urls().is_empty());
}

#[tokio::test]
async fn desktop_pages_never_redirect() {
    let navigator = RecordingNavigator::default();
    let document = document_at("https://cafe.naver.com/myclub/42");
    PageSession::start(&StaticOptionsStore::new(all_features()), &document, &navigator)
        .await
        .expect("session starts");
    assert!(navigator.urls().is_empty());
}

#[test]
fn new_tab_article_only_goes_straight_to_canonical() {
    let navigator = RecordingNavigator::default();
    let options = Options {
        new_tab_article_only: true,
        ..all_features()
    };
    let location =
        Url::parse("https://m.cafe.naver.com/ca-fe/web/cafes/12345/articles/6789").expect("url");
    assert!(PageSession::start_new_tab(&options, &location, &navigator));
    assert_eq!(
        navigator.urls(),
        vec!["https://cafe.naver.com/ca-fe/cafes/12345/articles/6789".to_string()]
    );
}

#[test]
fn new_tab_without_article_only_uses_the_standard_mapping() {
    let navigator = RecordingNavigator::default();
    let location =
        Url::parse("https://m.cafe.naver.com/ca-fe/web/cafes/12345/articles/6789").expect("url");
    assert!(PageSession::start_new_tab(&all_features(), &location, &navigator));
    assert_eq!(
        navigator.urls(),
        vec!["https://cafe.naver.com/ArticleRead.nhn?clubid=12345&articleid=6789".to_string()]
    );
}

#[test]
fn new_tab_redirect_requires_its_flags_and_the_mobile_host() {
    let navigator = RecordingNavigator::default();
    let mobile =
        Url::parse("https://m.cafe.naver.com/ca-fe/web/cafes/12345/articles/6789").expect("url");

    let disabled = Options {
        redirect_mobile_new_tab: false,
        ..all_features()
    };
    assert!(!PageSession::start_new_tab(&disabled, &mobile, &navigator));

    let off = Options {
        enable_app: false,
        ..all_features()
    };
    assert!(!PageSession::start_new_tab(&off, &mobile, &navigator));

    let desktop = Url::parse("https://cafe.naver.com/myclub/42").expect("url");
    assert!(!PageSession::start_new_tab(&all_features(), &desktop, &navigator));

    assert!(navigator.urls().is_empty());
}
