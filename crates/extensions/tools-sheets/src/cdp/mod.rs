//! Chrome DevTools Protocol client.
//!
//! Talks to Chrome over the browser WebSocket advertised by
//! `/json/version`. Pages are attached with flattened sessions, so one
//! socket carries every command and the receive loop routes replies by id.
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222", Duration::from_secs(30)).await?;
//! let page = client.new_page("http://localhost:3002/sheets/").await?;
//! let title = page.evaluate("document.title").await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::{BrowserVersion, CdpRequest, CdpResponse, ExceptionDetails, PageInfo, RemoteObject};
pub use session::PageSession;
