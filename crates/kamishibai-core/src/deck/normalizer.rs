//! SlideSchema normalizer.
//!
//! Takes raw provider text (possibly embedding a JSON block), extracts the
//! JSON payload, and repairs it into a canonical [`Deck`]. This is a pure,
//! synchronous transform: it fails only when no JSON payload can be located
//! or decoded, or when the decoded document has no usable slide list. Every
//! field-level problem is repaired with a locale-appropriate default, never
//! rejected.

use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::deck::model::{
    DEFAULT_AUTHOR, DEFAULT_CONTACT_INFO, DEFAULT_CONTENT, DEFAULT_IMAGE_CONTENT,
    DEFAULT_LEFT_CONTENT, DEFAULT_QUOTE, DEFAULT_RIGHT_CONTENT, DEFAULT_TITLE, Deck, Slide,
    default_points, default_slide_title,
};
use crate::error::{DeckError, Result};
use crate::provider::ProviderTag;

static JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\n(.*?)\n```").expect("valid regex"));
static ANY_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```\n(.*?)\n```").expect("valid regex"));

/// Normalizes raw provider text into a canonical deck.
///
/// Payload location order: a fenced block tagged `json`, any fenced code
/// block, then the first balanced `{...}` span. The first matching strategy
/// wins; a decode failure on the located payload is a [`DeckError::Parse`],
/// there is no backtracking to the next strategy.
pub fn normalize(raw_text: &str, provider: ProviderTag) -> Result<Deck> {
    let payload = extract_payload(raw_text)
        .ok_or_else(|| DeckError::parse("no JSON payload found in provider response"))?;

    let value: Value = serde_json::from_str(payload)
        .map_err(|e| DeckError::parse(format!("could not parse response: {e}")))?;

    repair(value, provider)
}

/// Locates the JSON payload inside raw provider text.
fn extract_payload(raw_text: &str) -> Option<&str> {
    JSON_FENCE
        .captures(raw_text)
        .or_else(|| ANY_FENCE.captures(raw_text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .or_else(|| balanced_brace_span(raw_text))
}

/// Returns the first balanced `{...}` span, honoring JSON string syntax.
fn balanced_brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Repairs a decoded JSON document into a deck.
///
/// Raises only for a missing/empty slide list; every other defect is filled
/// with a default.
fn repair(value: Value, provider: ProviderTag) -> Result<Deck> {
    let mut obj = match value {
        Value::Object(map) => map,
        _ => return Err(DeckError::parse("response has no usable slide list")),
    };

    let raw_slides = obj.remove("slides");

    let title = string_field(&obj, "title").unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let subtitle =
        string_field(&obj, "subtitle").unwrap_or_else(|| provider.default_subtitle().to_string());
    let date = string_field(&obj, "date").unwrap_or_else(current_date);

    let raw_slides = match raw_slides {
        Some(Value::Array(entries)) if !entries.is_empty() => entries,
        _ => return Err(DeckError::parse("response has no usable slide list")),
    };

    let mut slides: Vec<Slide> = raw_slides
        .into_iter()
        .enumerate()
        .map(|(index, entry)| repair_slide(entry, index, &title, &subtitle))
        .collect();

    enforce_bookends(&mut slides, &title, &subtitle);

    Ok(Deck {
        title,
        subtitle,
        date,
        slides,
    })
}

/// Coerces one raw slide entry into a typed slide, filling kind-appropriate
/// placeholders for missing required fields.
fn repair_slide(entry: Value, index: usize, deck_title: &str, deck_subtitle: &str) -> Slide {
    let obj = match entry {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let kind = obj
        .get("type")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("content");

    let title_or_default =
        |obj: &Map<String, Value>| field_or(obj, "title", &default_slide_title(index));

    match kind {
        "title" => Slide::Title {
            title: field_or(&obj, "title", deck_title),
            subtitle: field_or(&obj, "subtitle", deck_subtitle),
        },
        "bullet" => Slide::Bullet {
            title: title_or_default(&obj),
            points: points_or_default(obj.get("points")),
        },
        "content" => Slide::Content {
            title: title_or_default(&obj),
            content: field_or(&obj, "content", DEFAULT_CONTENT),
        },
        "image" => Slide::Image {
            title: title_or_default(&obj),
            content: field_or(&obj, "content", DEFAULT_IMAGE_CONTENT),
        },
        "two-column" | "twoColumn" => Slide::TwoColumn {
            title: title_or_default(&obj),
            left_content: field_or(&obj, "leftContent", DEFAULT_LEFT_CONTENT),
            right_content: field_or(&obj, "rightContent", DEFAULT_RIGHT_CONTENT),
        },
        "quote" => Slide::Quote {
            quote: field_or(&obj, "quote", DEFAULT_QUOTE),
            author: field_or(&obj, "author", DEFAULT_AUTHOR),
        },
        "end" => Slide::End {
            contact_info: field_or(&obj, "contactInfo", DEFAULT_CONTACT_INFO),
        },
        other => {
            tracing::debug!("unrecognized slide type '{}', coercing to content", other);
            Slide::Content {
                title: title_or_default(&obj),
                content: field_or(&obj, "content", DEFAULT_CONTENT),
            }
        }
    }
}

/// Ensures the deck starts with a title slide and ends with an end slide.
///
/// Runs unconditionally, even on an otherwise well-formed deck; missing
/// bookends are inserted, never cause rejection.
fn enforce_bookends(slides: &mut Vec<Slide>, deck_title: &str, deck_subtitle: &str) {
    if !slides.first().map(Slide::is_title).unwrap_or(false) {
        slides.insert(
            0,
            Slide::Title {
                title: deck_title.to_string(),
                subtitle: deck_subtitle.to_string(),
            },
        );
    }
    if !slides.last().map(Slide::is_end).unwrap_or(false) {
        slides.push(Slide::End {
            contact_info: DEFAULT_CONTACT_INFO.to_string(),
        });
    }
}

/// Non-empty string field, or `None`.
fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn field_or(obj: &Map<String, Value>, key: &str, default: &str) -> String {
    string_field(obj, key).unwrap_or_else(|| default.to_string())
}

/// Bullet point list. A present array is kept as-is (stringifying non-string
/// entries); a missing or non-array value falls back to the defaults.
fn points_or_default(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| match entry {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => default_points(),
    }
}

/// Today formatted as `YYYY年MM月DD日`, zero-padded.
fn current_date() -> String {
    Local::now().format("%Y年%m月%d日").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize_json(json: serde_json::Value) -> Deck {
        normalize(&json.to_string(), ProviderTag::OpenAi).unwrap()
    }

    #[test]
    fn test_extracts_json_fenced_block() {
        let raw = "Here you go:\n```json\n{\"title\":\"T\",\"slides\":[{\"type\":\"content\"}]}\n```\nEnjoy!";
        let deck = normalize(raw, ProviderTag::OpenAi).unwrap();
        assert_eq!(deck.title, "T");
    }

    #[test]
    fn test_extracts_untagged_fenced_block() {
        let raw = "```\n{\"title\":\"T\",\"slides\":[{\"type\":\"content\"}]}\n```";
        let deck = normalize(raw, ProviderTag::OpenAi).unwrap();
        assert_eq!(deck.title, "T");
    }

    #[test]
    fn test_extracts_balanced_brace_span() {
        let raw = r#"here is json: {"title":"T","slides":[{"type":"quote"}]}"#;
        let deck = normalize(raw, ProviderTag::Gemini).unwrap();

        assert_eq!(deck.title, "T");
        assert_eq!(deck.subtitle, ProviderTag::Gemini.default_subtitle());
        // quote filled with placeholders plus both bookends
        assert_eq!(deck.slides.len(), 3);
        assert!(deck.slides[0].is_title());
        assert_eq!(
            deck.slides[1],
            Slide::Quote {
                quote: DEFAULT_QUOTE.to_string(),
                author: DEFAULT_AUTHOR.to_string(),
            }
        );
        assert!(deck.slides[2].is_end());
    }

    #[test]
    fn test_no_json_payload_is_parse_error() {
        let err = normalize("no structured data here", ProviderTag::OpenAi).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_no_strategy_backtracking_after_fence_match() {
        // The fenced block wins even though a decodable span follows it.
        let raw = "```json\nnot json at all\n```\n{\"title\":\"T\",\"slides\":[{\"type\":\"content\"}]}";
        let err = normalize(raw, ProviderTag::OpenAi).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_missing_or_empty_slides_is_parse_error() {
        for json in [
            serde_json::json!({"title": "T"}),
            serde_json::json!({"title": "T", "slides": []}),
            serde_json::json!({"title": "T", "slides": "oops"}),
        ] {
            let err = normalize(&json.to_string(), ProviderTag::OpenAi).unwrap_err();
            assert!(err.is_parse(), "expected parse error for {json}");
        }
    }

    #[test]
    fn test_defaults_for_missing_metadata() {
        let deck = normalize_json(serde_json::json!({"slides": [{"type": "content"}]}));

        assert_eq!(deck.title, DEFAULT_TITLE);
        assert_eq!(deck.subtitle, ProviderTag::OpenAi.default_subtitle());
        let re = Regex::new(r"^\d{4}年\d{2}月\d{2}日$").unwrap();
        assert!(re.is_match(&deck.date), "unexpected date: {}", deck.date);
    }

    #[test]
    fn test_bookends_added_once() {
        let deck = normalize_json(serde_json::json!({
            "title": "T",
            "slides": [
                {"type": "title", "title": "T", "subtitle": "S"},
                {"type": "content", "title": "A", "content": "<p>a</p>"},
                {"type": "end", "contactInfo": "c"},
            ],
        }));

        // already well-formed: no duplicate bookends
        assert_eq!(deck.slides.len(), 3);
        assert!(deck.slides[0].is_title());
        assert!(deck.slides[2].is_end());
    }

    #[test]
    fn test_single_content_slide_gains_both_bookends() {
        let deck = normalize_json(serde_json::json!({
            "slides": [{"type": "content", "title": "A"}],
        }));

        assert_eq!(deck.slides.len(), 3);
        assert!(deck.slides[0].is_title());
        assert_eq!(
            deck.slides[1],
            Slide::Content {
                title: "A".to_string(),
                content: DEFAULT_CONTENT.to_string(),
            }
        );
        assert!(deck.slides[2].is_end());
    }

    #[test]
    fn test_unknown_slide_type_coerced_to_content() {
        let deck = normalize_json(serde_json::json!({
            "slides": [{"type": "hologram", "title": "X"}],
        }));

        assert_eq!(
            deck.slides[1],
            Slide::Content {
                title: "X".to_string(),
                content: DEFAULT_CONTENT.to_string(),
            }
        );
    }

    #[test]
    fn test_missing_type_defaults_to_content() {
        let deck = normalize_json(serde_json::json!({"slides": [{"title": "X"}]}));
        assert_eq!(deck.slides[1].kind(), "content");
    }

    #[test]
    fn test_title_slide_inherits_deck_metadata() {
        let deck = normalize_json(serde_json::json!({
            "title": "発表",
            "subtitle": "副題",
            "slides": [{"type": "title"}, {"type": "content"}],
        }));

        assert_eq!(
            deck.slides[0],
            Slide::Title {
                title: "発表".to_string(),
                subtitle: "副題".to_string(),
            }
        );
    }

    #[test]
    fn test_bullet_defaults_and_kept_points() {
        let deck = normalize_json(serde_json::json!({
            "slides": [
                {"type": "bullet", "title": "B"},
                {"type": "bullet", "title": "C", "points": ["一", 2]},
            ],
        }));

        assert_eq!(
            deck.slides[1],
            Slide::Bullet {
                title: "B".to_string(),
                points: default_points(),
            }
        );
        assert_eq!(
            deck.slides[2],
            Slide::Bullet {
                title: "C".to_string(),
                points: vec!["一".to_string(), "2".to_string()],
            }
        );
    }

    #[test]
    fn test_empty_string_fields_are_repaired() {
        let deck = normalize_json(serde_json::json!({
            "title": "  ",
            "slides": [{"type": "quote", "quote": "", "author": "誰か"}],
        }));

        assert_eq!(deck.title, DEFAULT_TITLE);
        assert_eq!(
            deck.slides[1],
            Slide::Quote {
                quote: DEFAULT_QUOTE.to_string(),
                author: "誰か".to_string(),
            }
        );
    }

    #[test]
    fn test_renormalization_is_idempotent() {
        let first = normalize_json(serde_json::json!({
            "title": "T",
            "subtitle": "S",
            "date": "2026年01月02日",
            "slides": [
                {"type": "bullet", "title": "B", "points": ["p1"]},
                {"type": "two-column", "title": "TC"},
            ],
        }));

        let serialized = serde_json::to_string(&first).unwrap();
        let second = normalize(&serialized, ProviderTag::OpenAi).unwrap();

        assert_eq!(first, second);
    }
}
