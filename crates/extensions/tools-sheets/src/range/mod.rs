//! A1 range notation: parsing, normalization and the cell quota.
//!
//! ```text
//! range    := cell [ ":" cell ]
//! cell     := [ "$" ] letters [ "$" ] digits     ; letters A..Z, AA.., case-insensitive
//! ```
//!
//! Columns use bijective base-26 (no zero digit): `A` = 0, `Z` = 25,
//! `AA` = 26, `ZZ` = 701. Rows are 1-based in text and 0-based in memory.

mod address;
mod bound;

pub use address::{column_to_letters, letters_to_column, CellRef};
pub use bound::{RangeAddress, RangeBound, DEFAULT_CELL_QUOTA};

pub(crate) use bound::CellWindow;

#[cfg(test)]
#[path = "range_tests.rs"]
mod tests;
