//! Single cell references.

use std::fmt;

use crate::error::GatewayError;

/// Longest column label accepted. Seven letters already exceed any grid a
/// browser spreadsheet can render and keep the index well inside `u32`.
const MAX_COLUMN_LETTERS: usize = 7;

/// A 0-based cell reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    pub row: u32,
    pub column: u32,
}

impl CellRef {
    pub fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Parse an A1-style reference such as `B7` or `$AA$10`.
    pub fn parse(text: &str) -> Result<Self, GatewayError> {
        let s = text.trim();
        if s.is_empty() {
            return Err(GatewayError::syntax(text, "empty cell reference"));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }
        if pos == col_start {
            return Err(GatewayError::syntax(text, "missing column letters"));
        }
        let column = letters_to_column(&s[col_start..pos])
            .map_err(|e| match e {
                GatewayError::InvalidRangeSyntax { reason, .. } => GatewayError::syntax(text, reason),
                other => other,
            })?;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let row_str = &s[pos..];
        if row_str.is_empty() {
            return Err(GatewayError::syntax(text, "missing row number"));
        }
        if !row_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(GatewayError::syntax(
                text,
                format!("unexpected characters '{}' after column letters", row_str),
            ));
        }
        let row: u32 = row_str
            .parse()
            .map_err(|_| GatewayError::syntax(text, "row number out of range"))?;
        if row == 0 {
            return Err(GatewayError::syntax(text, "row numbers start at 1"));
        }

        Ok(Self {
            row: row - 1,
            column,
        })
    }

    /// Format as A1 notation.
    pub fn to_a1(&self) -> String {
        format!("{}{}", column_to_letters(self.column), self.row as u64 + 1)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}

/// Convert a 0-based column index to letters (0 = A, 25 = Z, 26 = AA).
pub fn column_to_letters(column: u32) -> String {
    let mut letters = Vec::new();
    let mut n = column as u64 + 1;

    while n > 0 {
        n -= 1;
        letters.push(b'A' + (n % 26) as u8);
        n /= 26;
    }

    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Convert column letters to a 0-based index (A = 0, Z = 25, AA = 26).
pub fn letters_to_column(letters: &str) -> Result<u32, GatewayError> {
    if letters.is_empty() {
        return Err(GatewayError::syntax(letters, "empty column letters"));
    }
    if letters.len() > MAX_COLUMN_LETTERS {
        return Err(GatewayError::syntax(letters, "column label too long"));
    }

    let mut value: u64 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(GatewayError::syntax(
                letters,
                format!("invalid column letter '{}'", c),
            ));
        }
        value = value * 26 + (c.to_ascii_uppercase() as u64 - 'A' as u64 + 1);
    }

    u32::try_from(value - 1).map_err(|_| GatewayError::syntax(letters, "column out of range"))
}
