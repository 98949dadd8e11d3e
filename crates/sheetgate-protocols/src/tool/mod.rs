//! Tool protocol definitions.
//!
//! Tools are the only way an agent reaches the live spreadsheet.

mod traits;
mod definition;
mod context;
mod result;

pub use traits::*;
pub use definition::*;
pub use context::*;
pub use result::*;
