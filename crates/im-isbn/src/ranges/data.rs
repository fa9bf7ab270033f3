//! Parsed range data as published by the International ISBN Agency
//!
//! This is the shape the tree builder consumes. Where it comes from
//! (the embedded RangeMessage, a file, a JSON fixture) does not matter.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RangeDataError;

/// RangeMessage compiled into the crate
const EMBEDDED_RANGE_MESSAGE: &str = include_str!("../../data/RangeMessage.xml");

/// One `<Rule>`: a seven-digit range and the segment length it implies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeRule {
    pub range_low: String,
    pub range_high: String,
    pub length: usize,
}

/// An `<EAN.UCC>` or `<Group>` element: a prefix and its rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeGroup {
    /// `978` for EAN.UCC entries, `978-2` style for registration groups
    pub prefix: String,
    pub rules: Vec<RangeRule>,
}

/// The full range table, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeData {
    /// EAN.UCC prefixes with their registration-group rules
    pub prefixes: Vec<RangeGroup>,
    /// Registration groups with their registrant rules
    pub groups: Vec<RangeGroup>,
}

impl RangeData {
    /// Parse the RangeMessage shipped with the crate
    pub fn embedded() -> Result<Self, RangeDataError> {
        Self::from_xml(EMBEDDED_RANGE_MESSAGE)
    }

    /// Read and parse a RangeMessage.xml file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RangeDataError> {
        let xml = std::fs::read_to_string(path.as_ref())?;
        Self::from_xml(&xml)
    }
}

impl RangeRule {
    /// Numeric bounds of this rule, cut to its length.
    ///
    /// `None` for zero-length rules, which mark unassigned ranges.
    pub fn bounds(&self) -> Result<Option<(u32, u32)>, RangeDataError> {
        if self.length == 0 {
            return Ok(None);
        }
        let low = leading_value(&self.range_low, self.length);
        let high = leading_value(&self.range_high, self.length);
        match (low, high) {
            (Some(low), Some(high)) if low <= high => Ok(Some((low, high))),
            _ => Err(RangeDataError::InvalidRange {
                range: format!("{}-{}", self.range_low, self.range_high),
                length: self.length,
            }),
        }
    }
}

fn leading_value(bound: &str, length: usize) -> Option<u32> {
    if length > 7 || bound.len() < length || !bound.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    bound[..length].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(low: &str, high: &str, length: usize) -> RangeRule {
        RangeRule {
            range_low: low.to_string(),
            range_high: high.to_string(),
            length,
        }
    }

    #[test]
    fn test_bounds_cut_to_length() {
        assert_eq!(rule("7000000", "8399999", 4).bounds(), Ok(Some((7000, 8399))));
        assert_eq!(rule("0000000", "5999999", 1).bounds(), Ok(Some((0, 5))));
    }

    #[test]
    fn test_zero_length_is_unassigned() {
        assert_eq!(rule("0000000", "0999999", 0).bounds(), Ok(None));
    }

    #[test]
    fn test_bad_bounds() {
        assert!(rule("70000A0", "8399999", 7).bounds().is_err());
        assert!(rule("7000000", "8399999", 8).bounds().is_err());
        assert!(rule("8400000", "8399999", 4).bounds().is_err());
    }

    #[test]
    fn test_embedded_data_parses() {
        let data = RangeData::embedded().unwrap();
        let prefixes: Vec<&str> = data.prefixes.iter().map(|p| p.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["978", "979"]);
        assert!(data.groups.iter().any(|g| g.prefix == "978-2"));
    }

    #[test]
    fn test_json_fixture() {
        let json = r#"{
            "prefixes": [
                {"prefix": "978", "rules": [
                    {"range_low": "0000000", "range_high": "5999999", "length": 1}
                ]}
            ],
            "groups": []
        }"#;
        let data: RangeData = serde_json::from_str(json).unwrap();
        assert_eq!(data.prefixes[0].rules[0], rule("0000000", "5999999", 1));
        assert!(data.groups.is_empty());
    }
}
