//! cafelink: canonicalizes Naver Cafe mobile and legacy links to the
//! desktop article URL scheme inside dynamically rendered pages.
//!
//! The host page renders its regions asynchronously, so link rewriting
//! reacts to child-list mutations instead of running once at load time:
//! the [`watcher`] waits for structurally-identified nodes to arrive,
//! the [`resolver`] decodes the zoo of legacy URL encodings into a
//! canonical (cafe id, article id) pair, and the [`session`]
//! orchestrator wires both into the page model in [`dom`]. Mobile pages
//! opened directly are redirected through [`redirect`].

pub mod dom;
pub mod options;
pub mod redirect;
pub mod resolver;
pub mod session;
pub mod watcher;

pub use dom::{parse_document, parse_fragment, Document, Element, Selector};
pub use options::{Options, OptionsStore, StaticOptionsStore};
pub use redirect::{desktop_redirect_target, redirect_to_desktop, Navigator};
pub use resolver::{resolve, ArticleRef, CafeIdCache};
pub use session::{PageSession, SessionError};
pub use watcher::{next_child, watch_children, ChildMatcher};
