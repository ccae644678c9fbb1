use scraper::Html;

use crate::decode::{decode_html, DecodeError};

/// The markup of a host page at one moment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageSnapshot {
    html: String,
}

impl PageSnapshot {
    pub fn from_html(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// Decodes saved page bytes; see [`decode_html`].
    pub fn from_bytes(bytes: &[u8], charset_hint: Option<&str>) -> Result<Self, DecodeError> {
        decode_html(bytes, charset_hint).map(|decoded| Self::from_html(decoded.html))
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub(crate) fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }
}
