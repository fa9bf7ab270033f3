//! Check digit computation and shape validation for ISBN-10 and EAN-13
//!
//! Only ASCII digits count. The check functions return `None` rather than
//! score anything else.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TEN_PATTERN: Regex = Regex::new(r"^[0-9]{9}[0-9X]$").unwrap();
    static ref THIRTEEN_PATTERN: Regex = Regex::new(r"^[0-9]{13}$").unwrap();
}

/// Does `ean` look like an ISBN-10 (nine digits, then a digit or `X`)?
pub fn is_ten_format(ean: &str) -> bool {
    TEN_PATTERN.is_match(ean)
}

/// Does `ean` look like an EAN-13 (thirteen digits)?
pub fn is_thirteen_format(ean: &str) -> bool {
    THIRTEEN_PATTERN.is_match(ean)
}

/// Values of the first `count` characters, if they are all ASCII digits
fn leading_digits(body: &str, count: usize) -> Option<Vec<u32>> {
    let digits = body
        .bytes()
        .take(count)
        .map(|b| b.is_ascii_digit().then(|| u32::from(b - b'0')))
        .collect::<Option<Vec<u32>>>()?;
    (digits.len() == count).then_some(digits)
}

/// ISBN-10 check character over the first nine body digits.
///
/// Weights run from 10 down to 2; a remainder of 10 is written `X`.
pub fn ten_check_digit(body: &str) -> Option<char> {
    let sum: u32 = leading_digits(body, 9)?
        .iter()
        .zip((2..=10u32).rev())
        .map(|(d, weight)| d * weight)
        .sum();

    let check = match 11 - sum % 11 {
        11 => '0',
        10 => 'X',
        r => char::from(b'0' + r as u8),
    };
    Some(check)
}

/// EAN-13 check digit over the first twelve digits.
///
/// Weights alternate 3, 1, 3, ... starting from the twelfth digit.
pub fn thirteen_check_digit(body: &str) -> Option<char> {
    let sum: u32 = leading_digits(body, 12)?
        .iter()
        .rev()
        .zip([3u32, 1].iter().cycle())
        .map(|(d, weight)| d * weight)
        .sum();

    Some(char::from(b'0' + ((1000 - sum) % 10) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_format() {
        assert!(is_ten_format("281450715X"));
        assert!(is_ten_format("2765410054"));
        assert!(!is_ten_format("2814507ABX"));
        assert!(!is_ten_format("28145071X5"));
        assert!(!is_ten_format("281450715x"));
        assert!(!is_ten_format("28145071"));
    }

    #[test]
    fn test_thirteen_format() {
        assert!(is_thirteen_format("9782814507159"));
        assert!(!is_thirteen_format("9782814507AAA"));
        assert!(!is_thirteen_format("978281450715"));
        assert!(!is_thirteen_format("97828145071534"));
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        // Arabic-Indic and fullwidth digits
        assert!(!is_thirteen_format("\u{0669}\u{0667}\u{0668}2814507159"));
        assert!(!is_thirteen_format("97828145071\u{FF15}9"));
        assert!(!is_ten_format("28145071\u{FF15}X"));
        assert_eq!(thirteen_check_digit("97828145071\u{FF15}"), None);
        assert_eq!(ten_check_digit("\u{0662}81450715"), None);
    }

    #[test]
    fn test_short_body() {
        assert_eq!(ten_check_digit("28145071"), None);
        assert_eq!(thirteen_check_digit("97828145071"), None);
    }

    #[test]
    fn test_ten_check_digit() {
        assert_eq!(ten_check_digit("281450715"), Some('X'));
        assert_eq!(ten_check_digit("276541005"), Some('4'));
        assert_eq!(ten_check_digit("281121083"), Some('0'));
        assert_eq!(ten_check_digit("030640615"), Some('2'));
    }

    #[test]
    fn test_thirteen_check_digit() {
        assert_eq!(thirteen_check_digit("978281450715"), Some('9'));
        assert_eq!(thirteen_check_digit("979103000100"), Some('6'));
        assert_eq!(thirteen_check_digit("978032112521"), Some('7'));
    }

    #[test]
    fn test_check_digit_ignores_trailing_check() {
        assert_eq!(
            thirteen_check_digit("9782814507151"),
            thirteen_check_digit("978281450715")
        );
        assert_eq!(ten_check_digit("2814507150"), ten_check_digit("281450715"));
    }
}
