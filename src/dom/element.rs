//! Mutable element tree with synchronous child-list mutation delivery.
//!
//! `Element` is a cheap-clone handle over a shared node. The tree is the
//! crate's stand-in for the host page's DOM: attributes, class tokens,
//! text content, child lists, frame content and synthetic listener
//! bindings. Child-list observers are invoked synchronously inside the
//! mutating call, in registration order, and only ever see added nodes.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use super::document::Document;

/// A batch of child-list changes on one parent.
///
/// Only added nodes are reported; removals are invisible to observers.
#[derive(Clone)]
pub struct ChildListMutation {
    /// The parent whose direct child list changed.
    pub target: Element,
    /// Nodes added in this batch, in insertion order.
    pub added: Vec<Element>,
}

/// What an observer wants to happen to itself after a delivery.
pub(crate) enum ObserverVerdict {
    Keep,
    Disconnect,
}

pub(crate) type ChildObserver = Box<dyn FnMut(&ChildListMutation) -> ObserverVerdict + Send>;

type LoadObserver = Box<dyn FnMut(&Document) + Send>;

struct Inner {
    /// Tag name, normalized to ASCII uppercase as the HTML DOM reports it.
    tag: String,
    attrs: RwLock<BTreeMap<String, String>>,
    /// Own text content, excluding descendants.
    text: RwLock<String>,
    children: RwLock<Vec<Element>>,
    parent: RwLock<Weak<Inner>>,
    /// Synthetic behavior bindings (event listener names).
    listeners: RwLock<Vec<String>>,
    observers: Mutex<Vec<ChildObserver>>,
    /// Sub-document for frame elements, attached after the fact.
    content: RwLock<Option<Document>>,
    load_observers: Mutex<Vec<LoadObserver>>,
}

/// Handle to a node in the element tree.
#[derive(Clone)]
pub struct Element(Arc<Inner>);

impl Element {
    /// Create a detached element. The tag name is uppercased.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self(Arc::new(Inner {
            tag: tag.to_ascii_uppercase(),
            attrs: RwLock::new(BTreeMap::new()),
            text: RwLock::new(String::new()),
            children: RwLock::new(Vec::new()),
            parent: RwLock::new(Weak::new()),
            listeners: RwLock::new(Vec::new()),
            observers: Mutex::new(Vec::new()),
            content: RwLock::new(None),
            load_observers: Mutex::new(Vec::new()),
        }))
    }

    /// Builder form of [`set_attr`](Self::set_attr), for fixtures.
    #[must_use]
    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder form appending a class token.
    #[must_use]
    pub fn with_class(self, token: &str) -> Self {
        let classes = match self.attr("class") {
            Some(existing) => format!("{existing} {token}"),
            None => token.to_string(),
        };
        self.set_attr("class", &classes);
        self
    }

    /// Builder form of [`set_text`](Self::set_text).
    #[must_use]
    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    /// Builder form of [`append_child`](Self::append_child).
    #[must_use]
    pub fn with_child(self, child: Element) -> Self {
        self.append_child(child);
        self
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.0.tag
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<String> {
        self.0.attrs.read().get(name).cloned()
    }

    pub fn set_attr(&self, name: &str, value: &str) {
        self.0
            .attrs
            .write()
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attr(&self, name: &str) {
        self.0.attrs.write().remove(name);
    }

    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.attr("id")
    }

    /// Class-token containment test over the `class` attribute.
    #[must_use]
    pub fn has_class(&self, token: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == token))
    }

    /// Concatenated text content: own text followed by descendants'.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = self.0.text.read().clone();
        for child in self.children() {
            out.push_str(&child.text());
        }
        out
    }

    /// Replace this element's own text content. Descendants are untouched.
    pub fn set_text(&self, text: &str) {
        *self.0.text.write() = text.to_string();
    }

    /// Snapshot of the direct children, in document order.
    #[must_use]
    pub fn children(&self) -> Vec<Element> {
        self.0.children.read().clone()
    }

    #[must_use]
    pub fn parent(&self) -> Option<Element> {
        self.0.parent.read().upgrade().map(Element)
    }

    /// Pointer identity, the DOM notion of "same node".
    #[must_use]
    pub fn same_node(&self, other: &Element) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Append a child and deliver one mutation batch for it.
    pub fn append_child(&self, child: Element) {
        *child.0.parent.write() = Arc::downgrade(&self.0);
        self.0.children.write().push(child.clone());
        self.deliver(&ChildListMutation {
            target: self.clone(),
            added: vec![child],
        });
    }

    /// Append several children as a single mutation batch.
    pub fn append_children(&self, children: Vec<Element>) {
        if children.is_empty() {
            return;
        }
        {
            let mut slot = self.0.children.write();
            for child in &children {
                *child.0.parent.write() = Arc::downgrade(&self.0);
                slot.push(child.clone());
            }
        }
        self.deliver(&ChildListMutation {
            target: self.clone(),
            added: children,
        });
    }

    /// Swap `old` for `new` in the child list. Observers see `new` as an
    /// added node. Returns false when `old` is not a direct child.
    pub fn replace_child(&self, old: &Element, new: Element) -> bool {
        let replaced = {
            let mut slot = self.0.children.write();
            match slot.iter().position(|c| c.same_node(old)) {
                Some(idx) => {
                    *new.0.parent.write() = Arc::downgrade(&self.0);
                    *old.0.parent.write() = Weak::new();
                    slot[idx] = new.clone();
                    true
                }
                None => false,
            }
        };
        if replaced {
            self.deliver(&ChildListMutation {
                target: self.clone(),
                added: vec![new],
            });
        }
        replaced
    }

    /// Register a named behavior binding (an event listener).
    pub fn add_listener(&self, name: &str) {
        self.0.listeners.write().push(name.to_string());
    }

    #[must_use]
    pub fn listeners(&self) -> Vec<String> {
        self.0.listeners.read().clone()
    }

    #[must_use]
    pub fn has_listeners(&self) -> bool {
        !self.0.listeners.read().is_empty()
    }

    /// Recursive copy of tag, attributes and text. Listener bindings are
    /// not copied, matching `cloneNode` semantics.
    #[must_use]
    pub fn deep_clone(&self) -> Element {
        let clone = Element::new(&self.0.tag);
        *clone.0.attrs.write() = self.0.attrs.read().clone();
        *clone.0.text.write() = self.0.text.read().clone();
        for child in self.children() {
            let child_clone = child.deep_clone();
            *child_clone.0.parent.write() = Arc::downgrade(&clone.0);
            clone.0.children.write().push(child_clone);
        }
        clone
    }

    /// Detach all externally-attached behavior: drop the inline `onclick`
    /// attribute and swap the node for a listener-free deep clone in its
    /// parent. Returns the replacement, or None for a parentless node.
    pub fn detach_behavior(&self) -> Option<Element> {
        self.remove_attr("onclick");
        let parent = self.parent()?;
        let clone = self.deep_clone();
        if parent.replace_child(self, clone.clone()) {
            Some(clone)
        } else {
            None
        }
    }

    /// Register a child-list observer. Observers added during a delivery
    /// only see later mutations.
    pub(crate) fn observe_children(&self, observer: ChildObserver) {
        self.0.observers.lock().push(observer);
    }

    fn deliver(&self, mutation: &ChildListMutation) {
        // Observers are taken out for the duration of the delivery so a
        // callback can register further observers without deadlocking.
        let current = std::mem::take(&mut *self.0.observers.lock());
        let mut kept: Vec<ChildObserver> = Vec::with_capacity(current.len());
        for mut observer in current {
            match observer(mutation) {
                ObserverVerdict::Keep => kept.push(observer),
                ObserverVerdict::Disconnect => {}
            }
        }
        let mut slot = self.0.observers.lock();
        let registered_during_delivery = std::mem::take(&mut *slot);
        *slot = kept;
        slot.extend(registered_during_delivery);
    }

    /// Attach a sub-document to a frame element and notify load observers.
    pub fn attach_content_document(&self, document: Document) {
        *self.0.content.write() = Some(document.clone());
        let mut current = std::mem::take(&mut *self.0.load_observers.lock());
        for observer in &mut current {
            observer(&document);
        }
        let mut slot = self.0.load_observers.lock();
        let registered_during_delivery = std::mem::take(&mut *slot);
        *slot = current;
        slot.extend(registered_during_delivery);
    }

    /// The currently attached sub-document, if any.
    #[must_use]
    pub fn content_document(&self) -> Option<Document> {
        self.0.content.read().clone()
    }

    /// Observe sub-document attachments. Load observers are persistent,
    /// like `load` event listeners.
    pub fn on_content_load(&self, observer: impl FnMut(&Document) + Send + 'static) {
        self.0.load_observers.lock().push(Box::new(observer));
    }

    #[cfg(test)]
    pub(crate) fn observer_count(&self) -> usize {
        self.0.observers.lock().len()
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.same_node(other)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("Element");
        dbg.field("tag", &self.0.tag);
        if let Some(id) = self.id() {
            dbg.field("id", &id);
        }
        if let Some(classes) = self.attr("class") {
            dbg.field("class", &classes);
        }
        dbg.field("children", &self.0.children.read().len());
        dbg.finish()
    }
}
