/// Text source definitions for tracking how a bill's text was obtained
///
/// This module defines every outcome the text extraction chain can record.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Records which extraction strategy produced a bill's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    // ===== Textual Successes =====
    /// Text came from the page behind the "View Text" link
    ViewText,

    /// Text came from the page behind the "Print Preview" link
    PrintPreview,

    /// Text came from the detail page's own content region
    DirectPage,

    // ===== Reference Only =====
    /// Only a PDF link was found; its content is not extracted
    Pdf,

    // ===== Terminal Failures =====
    /// Every strategy ran without producing enough text
    Failed,

    /// A transport or parse error aborted extraction
    Error,
}

impl TextSource {
    /// All text sources, in the order the extraction chain tries them
    pub const ALL: [TextSource; 6] = [
        Self::ViewText,
        Self::PrintPreview,
        Self::Pdf,
        Self::DirectPage,
        Self::Failed,
        Self::Error,
    ];

    /// Returns true if real bill text was extracted
    pub fn is_success(&self) -> bool {
        matches!(self, Self::ViewText | Self::PrintPreview | Self::DirectPage)
    }

    /// Returns true if extraction ended without text
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Error)
    }

    /// Converts to the identifier used in records and exports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewText => "view_text",
            Self::PrintPreview => "print_preview",
            Self::DirectPage => "direct_page",
            Self::Pdf => "pdf",
            Self::Failed => "failed",
            Self::Error => "error",
        }
    }

    /// Parses an identifier written by [`TextSource::as_str`]
    pub fn from_identifier(s: &str) -> Option<Self> {
        match s {
            "view_text" => Some(Self::ViewText),
            "print_preview" => Some(Self::PrintPreview),
            "direct_page" => Some(Self::DirectPage),
            "pdf" => Some(Self::Pdf),
            "failed" => Some(Self::Failed),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for TextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
