//! Query operations over the live sheet.

mod result;
pub mod scripts;
mod search;
mod service;
mod types;

pub use result::{Operation, QueryFailure, QueryOutput, QueryResult};
pub use search::SearchEngine;
pub use service::SheetQueryService;
pub use types::{
    ActivityStatus, CellRecord, MatchKind, RangeData, RangeGrid, ScrollCapture, SearchMatch,
    SearchResults, SelectionInfo, SheetInfo, SheetList,
};
