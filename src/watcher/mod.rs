//! Node arrival watcher: waits for structurally-identified children to
//! appear under a parent that is being populated incrementally.
//!
//! Two modes share one matching routine:
//!
//! - [`watch_children`] is persistent: it fires for already-present
//!   children and for every qualifying mutation batch afterwards, for
//!   the lifetime of the parent. It is never disconnected.
//! - [`next_child`] is one-shot: a future that settles with the first
//!   matching child, found either synchronously or on the next
//!   qualifying mutation, after which the observation is torn down.
//!
//! On every qualifying mutation the watcher re-scans the parent's full
//! current child list and reports the first match in document order,
//! which is not necessarily the node that was just added.

use tokio::sync::oneshot;

use crate::dom::element::ObserverVerdict;
use crate::dom::Element;

/// Predicate over a candidate child node.
///
/// The two variants are the two shapes the page model produces:
/// class-token containment and exact tag-name equality (tag names are
/// stored uppercase, so `tag` matchers are expected uppercase too).
#[derive(Debug, Clone)]
pub enum ChildMatcher {
    ClassToken(String),
    TagName(String),
}

impl ChildMatcher {
    #[must_use]
    pub fn class(token: impl Into<String>) -> Self {
        Self::ClassToken(token.into())
    }

    #[must_use]
    pub fn tag(name: impl Into<String>) -> Self {
        Self::TagName(name.into())
    }

    #[must_use]
    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Self::ClassToken(token) => element.has_class(token),
            Self::TagName(name) => element.tag() == name,
        }
    }
}

/// First direct child of `parent` satisfying `matcher`, in document
/// order.
#[must_use]
pub fn first_matching_child(parent: &Element, matcher: &ChildMatcher) -> Option<Element> {
    parent.children().into_iter().find(|c| matcher.matches(c))
}

/// Persistent watch: scan now, then observe `parent` forever.
///
/// The callback fires at most once per mutation batch, always with the
/// first matching child currently present. The observation is never
/// disconnected; a watch that never matches holds its observer for the
/// parent's lifetime.
pub fn watch_children<F>(parent: &Element, matcher: ChildMatcher, mut on_found: F)
where
    F: FnMut(Element) + Send + 'static,
{
    if let Some(found) = first_matching_child(parent, &matcher) {
        on_found(found);
    }
    log::trace!("persistent watch registered on {parent:?} for {matcher:?}");
    parent.observe_children(Box::new(move |mutation| {
        for added in &mutation.added {
            if matcher.matches(added) {
                if let Some(found) = first_matching_child(&mutation.target, &matcher) {
                    on_found(found);
                    return ObserverVerdict::Keep;
                }
            }
        }
        ObserverVerdict::Keep
    }));
}

/// One-shot watch: resolves with the first matching child.
///
/// When a match already exists the future settles synchronously and no
/// observer is ever registered. Otherwise the observer disconnects on
/// the first qualifying mutation. There is no timeout; if the parent is
/// torn down while the watch is pending, the future stays pending.
pub async fn next_child(parent: &Element, matcher: ChildMatcher) -> Element {
    if let Some(found) = first_matching_child(parent, &matcher) {
        return found;
    }
    let (tx, rx) = oneshot::channel();
    let mut tx = Some(tx);
    parent.observe_children(Box::new(move |mutation| {
        for added in &mutation.added {
            if matcher.matches(added) {
                if let Some(found) = first_matching_child(&mutation.target, &matcher) {
                    if let Some(tx) = tx.take() {
                        let _ = tx.send(found);
                    }
                    return ObserverVerdict::Disconnect;
                }
            }
        }
        ObserverVerdict::Keep
    }));
    match rx.await {
        Ok(found) => found,
        // The parent was dropped with the watch still pending. Matches
        // the no-timeout contract: this watch simply never resolves.
        Err(_) => std::future::pending().await,
    }
}
