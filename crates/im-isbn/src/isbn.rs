//! The validated ISBN value object
//!
//! An [`Isbn`] always holds a normalized digit string whose last
//! character is the correct check digit. It can only be obtained through
//! [`Isbn::from_raw`] (and the wrappers around it) or [`Isbn::corrected`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::checksum::{is_ten_format, is_thirteen_format, ten_check_digit, thirteen_check_digit};
use crate::error::{IsbnError, Result};
use crate::ranges::{RangeTree, BOOKLAND_PREFIXES};
use crate::segment::{split_ten, split_thirteen, Groups};

/// EAN prefix used to lift an ISBN-10 into EAN-13
const ISBN10_PREFIX: &str = "978";

type CheckDigit = fn(&str) -> Option<char>;

/// Which of the two representations the number was given in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Width {
    Ten,
    Thirteen,
}

/// A validated ISBN-10 or EAN-13
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isbn {
    digits: String,
    width: Width,
    ean13: String,
    /// `None` outside the 978 space
    ean10: Option<String>,
}

impl Isbn {
    /// Parse any accepted form: ISBN-10 / EAN-13 with their check
    /// character, or (unless `exact`) the 9- and 12-digit bodies without
    /// it. Hyphens and spaces anywhere in the input are ignored.
    pub fn from_raw(input: Option<&str>, exact: bool) -> Result<Self> {
        let input = input.ok_or(IsbnError::NilInput)?;
        let ean: String = input.chars().filter(|c| *c != '-' && *c != ' ').collect();

        match ean.chars().count() {
            9 if !exact => {
                let body = format!("{}0", ean);
                if !is_ten_format(&body) {
                    return Err(IsbnError::InvalidFormat(ean));
                }
                Self::completed(ean, ten_check_digit, Width::Ten)
            }
            10 => {
                if !is_ten_format(&ean) {
                    return Err(IsbnError::InvalidFormat(ean));
                }
                Self::verified(ean, ten_check_digit, Width::Ten)
            }
            12 if !exact => {
                let body = format!("{}0", ean);
                if !is_thirteen_format(&body) {
                    return Err(IsbnError::InvalidFormat(ean));
                }
                Self::completed(ean, thirteen_check_digit, Width::Thirteen)
            }
            13 => {
                if !is_thirteen_format(&ean) {
                    return Err(IsbnError::InvalidFormat(ean));
                }
                Self::verified(ean, thirteen_check_digit, Width::Thirteen)
            }
            length => Err(IsbnError::InvalidLength { length }),
        }
    }

    /// Non-exact parse of a string
    pub fn parse(input: &str) -> Result<Self> {
        Self::from_raw(Some(input), false)
    }

    /// Parse requiring the check character to be present
    pub fn parse_exact(input: &str) -> Result<Self> {
        Self::from_raw(Some(input), true)
    }

    /// Drop the last character of `input` and recompute the check digit.
    ///
    /// The dropped character is not inspected; this never searches for
    /// a nearby valid number.
    pub fn corrected(input: Option<&str>) -> Result<Self> {
        let input = input.ok_or(IsbnError::NilInput)?;
        let mut chars = input.chars();
        chars.next_back();
        Self::from_raw(Some(chars.as_str()), false)
    }

    pub fn is_correctable(input: Option<&str>) -> bool {
        Self::corrected(input).is_ok()
    }

    pub fn is_valid(input: Option<&str>) -> bool {
        Self::from_raw(input, false).is_ok()
    }

    fn completed(mut body: String, check_digit: CheckDigit, width: Width) -> Result<Self> {
        let check = check_digit(&body).ok_or_else(|| IsbnError::InvalidFormat(body.clone()))?;
        body.push(check);
        Self::build(body, width)
    }

    fn verified(ean: String, check_digit: CheckDigit, width: Width) -> Result<Self> {
        let expected = check_digit(&ean).ok_or_else(|| IsbnError::InvalidFormat(ean.clone()))?;
        let given = ean.chars().last().unwrap_or_default();
        if given != expected {
            return Err(IsbnError::InvalidControlKey { given, expected });
        }
        Self::build(ean, width)
    }

    /// Derive both EAN forms from checked ASCII digits
    fn build(digits: String, width: Width) -> Result<Self> {
        let malformed = || IsbnError::InvalidFormat(digits.clone());
        let (ean13, ean10) = match width {
            Width::Ten => {
                let body = format!("{}{}", ISBN10_PREFIX, digits.get(..9).ok_or_else(malformed)?);
                let check = thirteen_check_digit(&body).ok_or_else(malformed)?;
                (format!("{}{}", body, check), Some(digits.clone()))
            }
            Width::Thirteen => {
                let ean10 = match digits.strip_prefix(ISBN10_PREFIX) {
                    Some(rest) => {
                        let body = rest.get(..9).ok_or_else(malformed)?;
                        let check = ten_check_digit(body).ok_or_else(malformed)?;
                        Some(format!("{}{}", body, check))
                    }
                    None => None,
                };
                (digits.clone(), ean10)
            }
        };
        Ok(Self {
            digits,
            width,
            ean13,
            ean10,
        })
    }

    pub fn width(&self) -> Width {
        self.width
    }

    /// Normalized digits in the width they were given
    pub fn as_str(&self) -> &str {
        &self.digits
    }

    /// `false` for EAN-13 numbers outside the 978/979 book space
    pub fn is_isbn(&self) -> bool {
        match self.width {
            Width::Ten => true,
            Width::Thirteen => BOOKLAND_PREFIXES.iter().any(|p| self.ean13.starts_with(p)),
        }
    }

    /// EAN-13 digits
    pub fn to_ean13(&self) -> String {
        self.ean13.clone()
    }

    /// ISBN-10 characters; only numbers in the 978 space have one
    pub fn to_ean10(&self) -> Result<String> {
        self.ean10.clone().ok_or_else(|| IsbnError::CannotConvertToTen {
            prefix: self.ean13.chars().take(3).collect(),
        })
    }

    /// ISBN-13 groups: prefix, group, registrant, publication, check
    pub fn isbn13_groups(&self, tree: &RangeTree) -> Result<Groups> {
        split_thirteen(tree, &self.to_ean13())
    }

    /// Hyphenated ISBN-13, e.g. `978-2-8145-0715-9`
    pub fn to_isbn13(&self, tree: &RangeTree) -> Result<String> {
        self.isbn13_groups(tree).map(|g| g.joined())
    }

    /// ISBN-10 groups: group, registrant, publication, check
    pub fn isbn10_groups(&self, tree: &RangeTree) -> Result<Groups> {
        split_ten(tree, &self.to_ean10()?)
    }

    /// Hyphenated ISBN-10, e.g. `2-8145-0715-X`
    pub fn to_isbn10(&self, tree: &RangeTree) -> Result<String> {
        self.isbn10_groups(tree).map(|g| g.joined())
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ean13)
    }
}

impl FromStr for Isbn {
    type Err = IsbnError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Isbn {
    type Error = IsbnError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Isbn {
    type Error = IsbnError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

/// Integers lose leading zeros, so only EAN-13 and zero-free ISBN-10
/// numbers survive this path.
impl TryFrom<u64> for Isbn {
    type Error = IsbnError;

    fn try_from(value: u64) -> Result<Self> {
        Self::parse(&value.to_string())
    }
}

impl From<Isbn> for String {
    fn from(isbn: Isbn) -> Self {
        isbn.digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED: &str = "9782814507159";

    #[test]
    fn test_parse_thirteen() {
        let isbn = Isbn::parse(EXPECTED).unwrap();
        assert_eq!(isbn.width(), Width::Thirteen);
        assert_eq!(isbn.as_str(), EXPECTED);
        assert_eq!(isbn.to_string(), EXPECTED);
    }

    #[test]
    fn test_parse_hyphenated() {
        assert_eq!(Isbn::parse("978-2-8145-0715-9").unwrap(), Isbn::parse(EXPECTED).unwrap());
    }

    #[test]
    fn test_parse_inner_spaces() {
        assert_eq!(Isbn::parse("978 2 8145 0715 9").unwrap().as_str(), EXPECTED);
        assert_eq!(Isbn::parse(" 978-2- 8145-0715-9 ").unwrap().as_str(), EXPECTED);
    }

    #[test]
    fn test_parse_ten() {
        let isbn = Isbn::parse("281450715X").unwrap();
        assert_eq!(isbn.width(), Width::Ten);
        assert_eq!(isbn.to_ean13(), EXPECTED);
    }

    #[test]
    fn test_completes_twelve() {
        assert_eq!(Isbn::parse("978281450715").unwrap().as_str(), EXPECTED);
    }

    #[test]
    fn test_completes_nine() {
        assert_eq!(Isbn::parse("281450715").unwrap().as_str(), "281450715X");
        assert_eq!(Isbn::parse("2-7654-1005").unwrap().to_ean10().unwrap(), "2765410054");
        assert_eq!(Isbn::parse("281121083").unwrap().to_ean10().unwrap(), "2811210830");
    }

    #[test]
    fn test_integer_input() {
        assert_eq!(Isbn::try_from(9782814507159u64).unwrap().as_str(), EXPECTED);
    }

    #[test]
    fn test_nil() {
        assert_eq!(Isbn::from_raw(None, false), Err(IsbnError::NilInput));
        assert_eq!(Isbn::corrected(None), Err(IsbnError::NilInput));
    }

    #[test]
    fn test_control_key_mismatch() {
        assert_eq!(
            Isbn::parse("9782814507151"),
            Err(IsbnError::InvalidControlKey { given: '1', expected: '9' })
        );
        assert_eq!(
            Isbn::parse("2814507150"),
            Err(IsbnError::InvalidControlKey { given: '0', expected: 'X' })
        );
    }

    #[test]
    fn test_control_key_message() {
        let err = Isbn::parse("9782814507151").unwrap_err();
        assert_eq!(err.to_string(), "given ISBN control key is 1, must be 9");
    }

    #[test]
    fn test_invalid_format() {
        for input in ["9782814507AAA", "9782814507AA", "2814507ABX", "2814507AB"] {
            assert!(
                matches!(Isbn::parse(input), Err(IsbnError::InvalidFormat(_))),
                "{} should be rejected as malformed",
                input
            );
        }
    }

    #[test]
    fn test_lowercase_x_rejected() {
        assert!(matches!(Isbn::parse("281450715x"), Err(IsbnError::InvalidFormat(_))));
    }

    #[test]
    fn test_invalid_length() {
        assert_eq!(
            Isbn::parse("97828145071534"),
            Err(IsbnError::InvalidLength { length: 14 })
        );
        assert_eq!(Isbn::parse(""), Err(IsbnError::InvalidLength { length: 0 }));
    }

    #[test]
    fn test_exact_rejects_bodies() {
        assert_eq!(
            Isbn::parse_exact("978281450715"),
            Err(IsbnError::InvalidLength { length: 12 })
        );
        assert_eq!(
            Isbn::parse_exact("281450715"),
            Err(IsbnError::InvalidLength { length: 9 })
        );
        assert!(Isbn::parse_exact(EXPECTED).is_ok());
    }

    #[test]
    fn test_corrected() {
        assert_eq!(Isbn::corrected(Some("9782814507151")).unwrap().as_str(), EXPECTED);
        assert_eq!(
            Isbn::corrected(Some("2814507150")).unwrap().to_ean10().unwrap(),
            "281450715X"
        );
        assert_eq!(
            Isbn::corrected(Some("2-8145-0715-X")).unwrap().to_ean10().unwrap(),
            "281450715X"
        );
    }

    #[test]
    fn test_corrected_drops_raw_last_char() {
        // trailing space is what gets dropped, the rest must validate
        assert_eq!(
            Isbn::corrected(Some("978-2-38211-293-9       ")).unwrap().as_str(),
            "9782382112939"
        );
        assert_eq!(
            Isbn::corrected(Some("978-2- 38211-293-9 ")).unwrap().as_str(),
            "9782382112939"
        );
    }

    #[test]
    fn test_correctable_and_valid() {
        assert!(Isbn::is_correctable(Some("9782814507151")));
        assert!(!Isbn::is_correctable(Some("97828145071")));
        assert!(!Isbn::is_correctable(None));
        assert!(Isbn::is_valid(Some(EXPECTED)));
        assert!(!Isbn::is_valid(Some("9782814507151")));
        assert!(!Isbn::is_valid(None));
    }

    #[test]
    fn test_is_isbn() {
        assert!(Isbn::parse(EXPECTED).unwrap().is_isbn());
        assert!(Isbn::parse("281450715X").unwrap().is_isbn());
        assert!(Isbn::parse("9791030001006").unwrap().is_isbn());
        assert!(!Isbn::parse("3612226273211").unwrap().is_isbn());
    }

    #[test]
    fn test_to_ean10() {
        assert_eq!(Isbn::parse(EXPECTED).unwrap().to_ean10().unwrap(), "281450715X");
        assert_eq!(Isbn::parse("281450715X").unwrap().to_ean10().unwrap(), "281450715X");
        assert_eq!(
            Isbn::parse("9791030001006").unwrap().to_ean10(),
            Err(IsbnError::CannotConvertToTen { prefix: "979".to_string() })
        );
    }

    #[test]
    fn test_non_ascii_digits_are_malformed() {
        // Arabic-Indic 978, fullwidth 5
        for input in [
            "\u{0669}\u{0667}\u{0668}\u{0662}\u{0668}\u{0661}\u{0664}\u{0665}\u{0660}\u{0667}\u{0661}\u{0665}",
            "97828145071\u{FF15}",
            "97828145071\u{FF15}9",
            "28145071\u{FF15}X",
            "28145071\u{FF15}",
        ] {
            assert!(
                matches!(Isbn::parse(input), Err(IsbnError::InvalidFormat(_))),
                "{} should be rejected as malformed",
                input
            );
        }
        assert!(!Isbn::is_correctable(Some("97828145071\u{FF15}0")));
    }

    #[test]
    fn test_stored_forms_agree() {
        let ten = Isbn::parse("281450715X").unwrap();
        let thirteen = Isbn::parse(EXPECTED).unwrap();
        assert_eq!(ten.to_ean13(), thirteen.as_str());
        assert_eq!(thirteen.to_ean10().unwrap(), ten.as_str());
        assert_eq!(ten.to_string(), thirteen.to_string());
    }

    #[test]
    fn test_serde_validates() {
        let isbn: Isbn = serde_json::from_str("\"978-2-8145-0715-9\"").unwrap();
        assert_eq!(serde_json::to_string(&isbn).unwrap(), format!("\"{}\"", EXPECTED));
        assert!(serde_json::from_str::<Isbn>("\"9782814507151\"").is_err());
    }
}
