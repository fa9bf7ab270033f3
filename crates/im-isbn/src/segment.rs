//! Splitting an EAN into hyphenation groups by walking the range tree

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IsbnError, Result};
use crate::ranges::{RangeNode, RangeTree};

/// Ordered hyphenation groups, check character last
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Groups(Vec<String>);

impl Groups {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Groups joined with hyphens, e.g. `978-2-8145-0715-9`
    pub fn joined(&self) -> String {
        self.0.join("-")
    }
}

impl fmt::Display for Groups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

impl From<Groups> for Vec<String> {
    fn from(groups: Groups) -> Self {
        groups.0
    }
}

/// Walk `nodes` over `digits`, first match per level.
///
/// Returns the matched prefixes, one per level, or `None` when some
/// level with candidate ranges has no match. A node without children
/// ends the walk successfully.
pub fn find_path(nodes: &[RangeNode], digits: &str) -> Option<Vec<String>> {
    if nodes.is_empty() {
        return None;
    }
    let mut path = Vec::new();
    descend(nodes, digits, &mut path).then_some(path)
}

fn descend(nodes: &[RangeNode], digits: &str, path: &mut Vec<String>) -> bool {
    if nodes.is_empty() {
        return true;
    }

    for node in nodes {
        let cut = node.length.min(digits.len());
        let (Some(prefix), Some(rest)) = (digits.get(..cut), digits.get(cut..)) else {
            continue;
        };
        let Some(value) = numeric(prefix) else {
            continue;
        };
        if node.contains(value) {
            path.push(prefix.to_string());
            return descend(&node.children, rest, path);
        }
    }

    tracing::trace!(remaining = digits, depth = path.len(), "no range matches");
    false
}

fn numeric(prefix: &str) -> Option<u32> {
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok()
}

/// Split a 13-character EAN into prefix, group, registrant, publication
/// and check character.
///
/// The publication group is whatever the tree did not consume of the
/// first twelve characters, possibly empty.
pub fn split_thirteen(tree: &RangeTree, ean: &str) -> Result<Groups> {
    let body = ean.get(..12).ok_or_else(|| IsbnError::NoMatchingRange(ean.to_string()))?;
    let mut groups = find_path(tree.roots(), body)
        .ok_or_else(|| IsbnError::NoMatchingRange(ean.to_string()))?;

    let consumed: usize = groups.iter().map(String::len).sum();
    let publication = body.get(consumed..).unwrap_or_default();
    groups.push(publication.to_string());
    groups.push(ean.get(12..).unwrap_or_default().to_string());

    Ok(Groups(groups))
}

/// Split an ISBN-10 into group, registrant, publication and check
/// character, using the 978 branch of the tree.
pub fn split_ten(tree: &RangeTree, ean10: &str) -> Result<Groups> {
    let mut groups = split_thirteen(tree, &format!("978{}", ean10))?.into_vec();
    groups.remove(0);
    Ok(Groups(groups))
}
