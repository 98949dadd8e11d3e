//! Binary content carried alongside text results.

use serde::{Deserialize, Serialize};

/// A base64-encoded image attached to a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    /// MIME type, e.g. `image/png`.
    pub media_type: String,
    /// Base64 payload without a data-URL prefix.
    pub data: String,
}

impl ImageData {
    /// A PNG image from base64 data.
    pub fn png(data: impl Into<String>) -> Self {
        Self {
            media_type: "image/png".to_string(),
            data: data.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_constructor() {
        let image = ImageData::png("aGVsbG8=");
        assert_eq!(image.media_type, "image/png");
        assert_eq!(image.data, "aGVsbG8=");
    }
}
