//! Export renderer boundary.
//!
//! Rendering a deck to bytes is delegated to an external collaborator,
//! typically a headless browser. The core only defines the contract and
//! validates requests against it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::deck::Deck;
use crate::error::{DeckError, Result};

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Png,
    Svg,
}

impl ExportFormat {
    /// Whether the format can render the whole deck in one artifact.
    /// Png and Svg are per-slide only.
    pub fn supports_full_deck(&self) -> bool {
        matches!(self, ExportFormat::Pdf)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }
}

/// Checks an export request against the format's contract.
///
/// An absent `slide_index` renders the whole deck, which only PDF supports;
/// a present index must be within the deck.
pub fn validate_export_request(
    deck: &Deck,
    format: ExportFormat,
    slide_index: Option<usize>,
) -> Result<()> {
    match slide_index {
        None if !format.supports_full_deck() => Err(DeckError::invalid_input(format!(
            "{} export requires a slide index",
            format.extension()
        ))),
        Some(index) if index >= deck.slides.len() => {
            Err(DeckError::index_out_of_range(index, deck.slides.len()))
        }
        _ => Ok(()),
    }
}

/// Renders a deck (or one slide of it) to a byte buffer.
#[async_trait]
pub trait ExportRenderer: Send + Sync {
    async fn render(
        &self,
        deck: &Deck,
        format: ExportFormat,
        slide_index: Option<usize>,
    ) -> Result<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{DEFAULT_CONTACT_INFO, Slide};

    fn deck() -> Deck {
        Deck {
            title: "T".to_string(),
            subtitle: "S".to_string(),
            date: "2026年01月02日".to_string(),
            slides: vec![
                Slide::Title {
                    title: "T".to_string(),
                    subtitle: "S".to_string(),
                },
                Slide::End {
                    contact_info: DEFAULT_CONTACT_INFO.to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_full_deck_render_is_pdf_only() {
        assert!(validate_export_request(&deck(), ExportFormat::Pdf, None).is_ok());

        for format in [ExportFormat::Png, ExportFormat::Svg] {
            let err = validate_export_request(&deck(), format, None).unwrap_err();
            assert!(err.is_invalid_input());
        }
    }

    #[test]
    fn test_slide_index_bounds() {
        assert!(validate_export_request(&deck(), ExportFormat::Png, Some(1)).is_ok());

        let err = validate_export_request(&deck(), ExportFormat::Svg, Some(2)).unwrap_err();
        assert!(err.is_index_out_of_range());
    }
}
