//! A small CSS selector subset
//!
//! Supported: type selectors (`em`, `*`), `#id`, `.class`, compounds of those
//! (`p.intro#first`) and the descendant combinator (whitespace). Everything
//! else is rejected at parse time.

use crate::error::LegacyError;
use rich_value::{MarkupNode, NodeKind};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Outermost first.
    compounds: Vec<Compound>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, LegacyError> {
        let invalid = |reason: &str| LegacyError::InvalidSelector {
            selector: source.to_string(),
            reason: reason.to_string(),
        };

        let compounds = source
            .split_whitespace()
            .map(|part| Compound::parse(part).map_err(invalid))
            .collect::<Result<Vec<_>, _>>()?;
        if compounds.is_empty() {
            return Err(invalid("empty selector"));
        }
        Ok(Self { compounds })
    }

    /// First element under `root` (excluded) matching the selector, in
    /// document order.
    pub fn find_first<N: MarkupNode>(&self, root: &N) -> Option<N> {
        let mut ancestors = Vec::new();
        self.find_below(root, &mut ancestors)
    }

    fn find_below<N: MarkupNode>(&self, parent: &N, ancestors: &mut Vec<N>) -> Option<N> {
        for child in parent.children() {
            if child.kind() != NodeKind::Element {
                continue;
            }
            if self.matches(&child, ancestors) {
                return Some(child);
            }
            ancestors.push(child.clone());
            let found = self.find_below(&child, ancestors);
            ancestors.pop();
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// Whether `node` matches, given its ancestors outermost first.
    pub fn matches<N: MarkupNode>(&self, node: &N, ancestors: &[N]) -> bool {
        let Some((last, outer)) = self.compounds.split_last() else {
            return false;
        };
        if !last.matches(node) {
            return false;
        }

        let mut remaining = ancestors.iter().rev();
        outer
            .iter()
            .rev()
            .all(|compound| remaining.any(|ancestor| compound.matches(ancestor)))
    }
}

impl FromStr for Selector {
    type Err = LegacyError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Selector::parse(source)
    }
}

impl Compound {
    fn parse(part: &str) -> Result<Self, &'static str> {
        let mut compound = Compound::default();

        let split = part.find(['#', '.']).unwrap_or(part.len());
        let (tag, mut rest) = part.split_at(split);
        match tag {
            "" | "*" => {}
            tag if is_name(tag) => compound.tag = Some(tag.to_ascii_lowercase()),
            _ => return Err("unsupported selector syntax"),
        }

        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let end = body.find(['#', '.']).unwrap_or(body.len());
            let name = &body[..end];
            if !is_name(name) {
                return Err("expected a name after '#' or '.'");
            }
            match marker {
                '#' if compound.id.is_some() => return Err("more than one id"),
                '#' => compound.id = Some(name.to_string()),
                _ => compound.classes.push(name.to_string()),
            }
            rest = &body[end..];
        }
        Ok(compound)
    }

    fn matches<N: MarkupNode>(&self, node: &N) -> bool {
        if node.kind() != NodeKind::Element {
            return false;
        }
        if let Some(tag) = &self.tag {
            if node.tag_name().as_deref() != Some(tag.as_str()) {
                return false;
            }
        }
        if self.id.is_none() && self.classes.is_empty() {
            return true;
        }

        let attributes = node.attributes();
        let attribute = |name: &str| {
            attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        };
        if let Some(id) = &self.id {
            if attribute("id") != Some(id.as_str()) {
                return false;
            }
        }
        let classes: Vec<&str> = attribute("class")
            .map(|value| value.split_whitespace().collect())
            .unwrap_or_default();
        self.classes
            .iter()
            .all(|class| classes.contains(&class.as_str()))
    }
}

fn is_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
