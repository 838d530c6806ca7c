//! Small CSS selector subset: `tag`, `#id` and `.class` compounds joined
//! by descendant combinators. This covers every selector the page
//! handlers use; anything richer is rejected at parse time.

use super::element::Element;

/// Selector parse failure.
#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unsupported selector syntax: {0:?}")]
    Unsupported(String),
}

#[derive(Debug, Clone, Default)]
struct Compound {
    /// Uppercased at parse time to match stored tag names.
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag
            && element.tag() != tag
        {
            return false;
        }
        if let Some(id) = &self.id
            && element.id().as_deref() != Some(id.as_str())
        {
            return false;
        }
        self.classes.iter().all(|c| element.has_class(c))
    }
}

/// A parsed selector.
#[derive(Debug, Clone)]
pub struct Selector {
    parts: Vec<Compound>,
}

impl Selector {
    /// Parse a selector string. Whitespace separates descendant parts.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let parts = input
            .split_ascii_whitespace()
            .map(parse_compound)
            .collect::<Result<Vec<_>, _>>()?;
        if parts.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self { parts })
    }

    fn matches(&self, element: &Element) -> bool {
        let last = self
            .parts
            .last()
            .expect("selector parts are non-empty by construction");
        if !last.matches(element) {
            return false;
        }
        // Walk ancestors right to left; each earlier compound may match
        // any ancestor above the previous match.
        let mut remaining = self.parts.len() - 1;
        let mut cursor = element.parent();
        while remaining > 0 {
            let needed = &self.parts[remaining - 1];
            let ancestor = loop {
                match cursor {
                    Some(candidate) => {
                        cursor = candidate.parent();
                        if needed.matches(&candidate) {
                            break candidate;
                        }
                    }
                    None => return false,
                }
            };
            let _ = ancestor;
            remaining -= 1;
        }
        true
    }
}

fn parse_compound(part: &str) -> Result<Compound, SelectorError> {
    let mut compound = Compound::default();
    let mut rest = part;
    if rest.starts_with(|c: char| is_ident_char(c)) {
        let end = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
        compound.tag = Some(rest[..end].to_ascii_uppercase());
        rest = &rest[end..];
    }
    while !rest.is_empty() {
        let marker = rest
            .chars()
            .next()
            .expect("non-empty remainder has a first char");
        let body = &rest[1..];
        let end = body.find(|c: char| !is_ident_char(c)).unwrap_or(body.len());
        if end == 0 {
            return Err(SelectorError::Unsupported(part.to_string()));
        }
        let name = body[..end].to_string();
        match marker {
            '.' => compound.classes.push(name),
            '#' => {
                if compound.id.replace(name).is_some() {
                    return Err(SelectorError::Unsupported(part.to_string()));
                }
            }
            _ => return Err(SelectorError::Unsupported(part.to_string())),
        }
        rest = &body[end..];
    }
    if compound.tag.is_none() && compound.id.is_none() && compound.classes.is_empty() {
        return Err(SelectorError::Unsupported(part.to_string()));
    }
    Ok(compound)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Compile a fixed selector into a `LazyLock` static.
macro_rules! selector {
    ($input:expr) => {
        std::sync::LazyLock::new(|| {
            $crate::dom::Selector::parse($input)
                .unwrap_or_else(|e| panic!("fixed selector {:?}: {e}", $input))
        })
    };
}

pub(crate) use selector;

impl Element {
    /// All descendants (excluding `self`) matching `selector`, in
    /// document order.
    #[must_use]
    pub fn select(&self, selector: &Selector) -> Vec<Element> {
        let mut found = Vec::new();
        collect_matches(self, selector, &mut found);
        found
    }

    /// First descendant matching `selector`, if any.
    #[must_use]
    pub fn select_first(&self, selector: &Selector) -> Option<Element> {
        for child in self.children() {
            if selector.matches(&child) {
                return Some(child);
            }
            if let Some(found) = child.select_first(selector) {
                return Some(found);
            }
        }
        None
    }
}

fn collect_matches(scope: &Element, selector: &Selector, found: &mut Vec<Element>) {
    for child in scope.children() {
        if selector.matches(&child) {
            found.push(child.clone());
        }
        collect_matches(&child, selector, found);
    }
}
