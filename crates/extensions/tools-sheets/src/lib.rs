//! Read-only spreadsheet tools over a CDP-driven browser session.
//!
//! ## Architecture
//!
//! ```text
//! Tool (get_range_data, ...)
//!   -> SheetQueryService      range parsing, quota, result shaping
//!     -> SearchEngine         tiled scan of the used range
//!     -> SheetPage            one page, one command in flight
//!       -> CdpPageBridge      Chrome over the DevTools Protocol
//!         -> window.univerAPI the in-page spreadsheet facade
//! ```
//!
//! The browser session is owned by one [`CdpPageBridge`] and released by
//! [`SheetPage::cleanup`]. Queries never mutate the workbook; the only
//! page-side effect is the selection change made by scrolling.
//!
//! ## Tools
//!
//! - `get_activity_status` - workbook summary, selection, optional screenshot
//! - `get_range_data` - values and formulas of up to 200 cells, optional styles
//! - `get_sheets` - every sheet in workbook order
//! - `search_cells` - keyword search over values or formulas
//! - `scroll_and_screenshot` - bring a cell into view and capture it

pub mod bridge;
pub mod cdp;
mod error;
pub mod query;
pub mod range;
mod tools;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use bridge::{evaluate_as, CdpPageBridge, SheetPage};
pub use error::{ErrorCode, GatewayError};
pub use query::{MatchKind, Operation, QueryResult, SheetQueryService};
pub use range::{CellRef, RangeAddress, RangeBound, DEFAULT_CELL_QUOTA};
pub use tools::*;
