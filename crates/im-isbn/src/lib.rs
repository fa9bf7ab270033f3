//! im-isbn: ISBN-10 / EAN-13 validation, correction, conversion and hyphenation
//!
//! - Check digit computation for both widths
//! - Parsing with separator stripping and optional check digit completion
//! - ISBN-10 <-> EAN-13 conversion
//! - Hyphenation driven by the International ISBN Agency range table
//!
//! ```no_run
//! use im_isbn::{Isbn, RangeTree};
//!
//! let isbn: Isbn = "281450715X".parse()?;
//! let tree = RangeTree::shared()?;
//! assert_eq!(isbn.to_isbn13(tree)?, "978-2-8145-0715-9");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod checksum;
#[cfg(feature = "cli")]
pub mod config;
pub mod error;
pub mod isbn;
pub mod ranges;
pub mod segment;

pub use error::{IsbnError, RangeDataError, Result};
pub use isbn::{Isbn, Width};
pub use ranges::{GroupLayout, RangeData, RangeNode, RangeTree};
pub use segment::Groups;
