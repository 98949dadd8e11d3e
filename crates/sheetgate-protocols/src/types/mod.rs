//! Common types shared across sheetgate crates.

mod common;
mod content;

pub use common::*;
pub use content::*;
