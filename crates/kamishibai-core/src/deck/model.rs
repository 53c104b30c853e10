//! Deck domain model.
//!
//! This module contains the canonical slide-deck document: a `Deck` with
//! ordered `Slide` values. Slides are a closed tagged union; unrecognized
//! kind tags from provider output are coerced to `content` by the
//! normalizer rather than carried as untyped data.

use serde::{Deserialize, Serialize};

/// Default deck title when the model response has none.
pub const DEFAULT_TITLE: &str = "プレゼンテーション";
/// Default placeholder body for content slides.
pub const DEFAULT_CONTENT: &str = "<p>コンテンツがここに表示されます</p>";
/// Default placeholder body for image slides.
pub const DEFAULT_IMAGE_CONTENT: &str = "<p>画像の説明がここに表示されます</p>";
/// Default left column text.
pub const DEFAULT_LEFT_CONTENT: &str = "<p>左カラムのコンテンツ</p>";
/// Default right column text.
pub const DEFAULT_RIGHT_CONTENT: &str = "<p>右カラムのコンテンツ</p>";
/// Default quote body.
pub const DEFAULT_QUOTE: &str = "引用文がここに表示されます";
/// Default quote author.
pub const DEFAULT_AUTHOR: &str = "著者名";
/// Default contact line for the closing slide.
pub const DEFAULT_CONTACT_INFO: &str =
    "ご質問やお問い合わせはこちらまで: example@example.com";

/// Default bullet points for a bullet slide with no usable point list.
pub fn default_points() -> Vec<String> {
    vec![
        "ポイント1".to_string(),
        "ポイント2".to_string(),
        "ポイント3".to_string(),
    ]
}

/// Default per-slide title, 1-based on the slide's position.
pub fn default_slide_title(index: usize) -> String {
    format!("スライド {}", index + 1)
}

/// The canonical, normalized slide-deck document.
///
/// After normalization all metadata fields are non-empty and the slide
/// sequence is bookended: the first slide is a `title` slide, the last an
/// `end` slide. Presentation order is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    /// Localized date, `YYYY年MM月DD日`.
    #[serde(default)]
    pub date: String,
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Wraps an edited slide sequence without deck metadata.
    ///
    /// `finalize` on an edit session only knows the slides; the caller owns
    /// the deck's title/subtitle/date and merges them back itself.
    pub fn from_slides(slides: Vec<Slide>) -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            date: String::new(),
            slides,
        }
    }
}

/// One slide, discriminated by its `type` tag.
///
/// Slides are immutable values: editing never mutates a slide in place,
/// every change produces a new `Slide` inside a new history snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Slide {
    #[serde(rename = "title")]
    Title { title: String, subtitle: String },
    #[serde(rename = "bullet")]
    Bullet { title: String, points: Vec<String> },
    #[serde(rename = "content")]
    Content { title: String, content: String },
    #[serde(rename = "image")]
    Image { title: String, content: String },
    #[serde(rename = "two-column", alias = "twoColumn")]
    TwoColumn {
        title: String,
        #[serde(rename = "leftContent")]
        left_content: String,
        #[serde(rename = "rightContent")]
        right_content: String,
    },
    #[serde(rename = "quote")]
    Quote { quote: String, author: String },
    #[serde(rename = "end")]
    End {
        #[serde(rename = "contactInfo")]
        contact_info: String,
    },
}

impl Slide {
    pub fn is_title(&self) -> bool {
        matches!(self, Slide::Title { .. })
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Slide::End { .. })
    }

    /// The wire-format kind tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Slide::Title { .. } => "title",
            Slide::Bullet { .. } => "bullet",
            Slide::Content { .. } => "content",
            Slide::Image { .. } => "image",
            Slide::TwoColumn { .. } => "two-column",
            Slide::Quote { .. } => "quote",
            Slide::End { .. } => "end",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_kind_tags_round_trip() {
        let slide = Slide::TwoColumn {
            title: "比較".to_string(),
            left_content: "左".to_string(),
            right_content: "右".to_string(),
        };

        let json = serde_json::to_value(&slide).unwrap();
        assert_eq!(json["type"], "two-column");
        assert_eq!(json["leftContent"], "左");

        let back: Slide = serde_json::from_value(json).unwrap();
        assert_eq!(back, slide);
    }

    #[test]
    fn test_two_column_accepts_camel_case_tag() {
        let json = serde_json::json!({
            "type": "twoColumn",
            "title": "t",
            "leftContent": "l",
            "rightContent": "r",
        });

        let slide: Slide = serde_json::from_value(json).unwrap();
        assert_eq!(slide.kind(), "two-column");
    }

    #[test]
    fn test_deck_from_slides_has_blank_metadata() {
        let deck = Deck::from_slides(vec![Slide::End {
            contact_info: DEFAULT_CONTACT_INFO.to_string(),
        }]);
        assert!(deck.title.is_empty());
        assert_eq!(deck.slides.len(), 1);
    }
}
