//! Hierarchical prefix-range table
//!
//! The tree has three levels:
//! - EAN prefix (`978`, `979`), fixed
//! - registration group, from the `EAN.UCC` rules of that prefix
//! - registrant, from the `Group` rules
//!
//! A `Group`'s rules are appended under every registration range that
//! covers it, so groups sharing a range (`978-0` .. `978-5`) share one
//! rule list and the first group's rules win. [`GroupLayout::PerGroup`]
//! gives each group its own node instead.
//!
//! Siblings keep document order; lookups take the first match.

mod data;
mod xml;

pub use data::{RangeData, RangeGroup, RangeRule};

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::RangeDataError;

/// EAN prefixes of the book numbering space
pub const BOOKLAND_PREFIXES: [&str; 2] = ["978", "979"];

/// One numeric range at a given segment length
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeNode {
    /// Number of digits this level consumes
    pub length: usize,
    pub start_range: u32,
    /// Inclusive
    pub end_range: u32,
    pub children: Vec<RangeNode>,
}

impl RangeNode {
    pub fn new(length: usize, start_range: u32, end_range: u32) -> Self {
        Self {
            length,
            start_range,
            end_range,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<RangeNode>) -> Self {
        self.children = children;
        self
    }

    /// Does a `length`-digit prefix with this value fall inside the range?
    pub fn contains(&self, value: u32) -> bool {
        value >= self.start_range && value <= self.end_range
    }
}

/// Where registrant rules are attached when building from [`RangeData`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupLayout {
    /// Append each group's rules under every registration range that
    /// covers the group, in document order
    #[default]
    SharedRange,
    /// One single-value node per group, holding only its own rules,
    /// placed ahead of the covering range
    PerGroup,
}

/// Read-only range table used for hyphenation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeTree {
    roots: Vec<RangeNode>,
}

static SHARED_TREE: OnceLock<Result<RangeTree, RangeDataError>> = OnceLock::new();

impl RangeTree {
    /// Wrap hand-built nodes, e.g. a small fixture table
    pub fn from_nodes(roots: Vec<RangeNode>) -> Self {
        Self { roots }
    }

    /// Build the tree from parsed range data with the default layout
    pub fn from_data(data: &RangeData) -> Result<Self, RangeDataError> {
        Self::from_data_with(data, GroupLayout::default())
    }

    /// Build the tree from parsed range data
    pub fn from_data_with(data: &RangeData, layout: GroupLayout) -> Result<Self, RangeDataError> {
        let mut roots: Vec<RangeNode> = BOOKLAND_PREFIXES
            .iter()
            .map(|p| {
                let value = p.parse().unwrap_or_default();
                RangeNode::new(3, value, value)
            })
            .collect();

        for prefix in &data.prefixes {
            let root = root_for(&mut roots, &prefix.prefix)?;
            for rule in &prefix.rules {
                if let Some((low, high)) = rule.bounds()? {
                    root.children.push(RangeNode::new(rule.length, low, high));
                }
            }
        }

        let mut orphans = 0usize;
        for group in &data.groups {
            let (ean, registration) = group
                .prefix
                .split_once('-')
                .filter(|(_, r)| !r.is_empty() && r.chars().all(|c| c.is_ascii_digit()))
                .ok_or_else(|| RangeDataError::InvalidPrefix(group.prefix.clone()))?;
            let value: u32 = registration
                .parse()
                .map_err(|_| RangeDataError::InvalidPrefix(group.prefix.clone()))?;

            let mut rules = Vec::with_capacity(group.rules.len());
            for rule in &group.rules {
                if let Some((low, high)) = rule.bounds()? {
                    rules.push(RangeNode::new(rule.length, low, high));
                }
            }

            let root = root_for(&mut roots, ean)?;
            let covers = |n: &RangeNode| n.length == registration.len() && n.contains(value);
            let attached = match layout {
                GroupLayout::SharedRange => {
                    let mut attached = false;
                    for node in root.children.iter_mut() {
                        if covers(node) {
                            node.children.extend(rules.iter().cloned());
                            attached = true;
                        }
                    }
                    attached
                }
                GroupLayout::PerGroup => match root.children.iter().position(covers) {
                    Some(index) => {
                        // ahead of the covering range, after groups already placed there
                        let node = RangeNode::new(registration.len(), value, value).with_children(rules);
                        root.children.insert(index, node);
                        true
                    }
                    None => false,
                },
            };

            if !attached {
                tracing::warn!(prefix = %group.prefix, "registration group matches no range, skipped");
                orphans += 1;
            }
        }

        tracing::debug!(
            ?layout,
            registration_nodes = roots.iter().map(|r| r.children.len()).sum::<usize>(),
            groups = data.groups.len() - orphans,
            orphans,
            "built ISBN range tree"
        );

        Ok(Self { roots })
    }

    /// Process-wide tree built from the embedded RangeMessage.
    ///
    /// Built on first call; later calls return the same tree, or the
    /// same error if the embedded data could not be loaded.
    pub fn shared() -> Result<&'static RangeTree, RangeDataError> {
        SHARED_TREE
            .get_or_init(|| RangeData::embedded().and_then(|data| RangeTree::from_data(&data)))
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn roots(&self) -> &[RangeNode] {
        &self.roots
    }
}

fn root_for<'a>(roots: &'a mut [RangeNode], prefix: &str) -> Result<&'a mut RangeNode, RangeDataError> {
    let value: Option<u32> = if prefix.len() == 3 { prefix.parse().ok() } else { None };
    value
        .and_then(|v| roots.iter_mut().find(|r| r.start_range == v))
        .ok_or_else(|| RangeDataError::UnknownPrefix(prefix.to_string()))
}
