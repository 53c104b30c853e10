//! Deck generation use case.
//!
//! Drives the full pipeline for one request: render the system prompt, call
//! the provider, normalize the raw text into a canonical deck, then reconcile
//! the slide count against what the caller asked for.

use kamishibai_core::deck::{
    self, DEFAULT_AUTHOR, DEFAULT_CONTACT_INFO, DEFAULT_CONTENT, DEFAULT_LEFT_CONTENT,
    DEFAULT_QUOTE, DEFAULT_RIGHT_CONTENT, Deck, Slide, default_points,
};
use kamishibai_core::provider::GenerationProvider;
use kamishibai_core::{DeckError, Result};
use kamishibai_interaction::prompt::{PromptRequest, render_system_prompt};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Smallest deck that still has bookends and one body slide.
const MIN_SLIDE_COUNT: usize = 3;

/// A generated deck together with its assigned presentation id.
#[derive(Debug, Clone)]
pub struct GeneratedDeck {
    pub id: String,
    pub deck: Deck,
}

/// Orchestrates prompt rendering, provider calls and normalization.
pub struct GenerationService {
    provider: Arc<dyn GenerationProvider>,
    fallback_to_placeholder: bool,
}

impl GenerationService {
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self {
            provider,
            fallback_to_placeholder: false,
        }
    }

    /// When enabled, an unusable provider response yields a placeholder deck
    /// of the requested size instead of a parse error.
    pub fn with_placeholder_fallback(mut self, enabled: bool) -> Self {
        self.fallback_to_placeholder = enabled;
        self
    }

    /// Generates a deck for the request.
    pub async fn generate(&self, request: &PromptRequest) -> Result<GeneratedDeck> {
        let target = request.slide_count.max(MIN_SLIDE_COUNT);
        let system_prompt = render_system_prompt(request)?;

        info!(provider = %self.provider.tag(), slide_count = target, "generating deck");

        let raw_text = self
            .provider
            .generate(&system_prompt, &request.prompt)
            .await
            .map_err(DeckError::from)?;

        let mut deck = match deck::normalize(&raw_text, self.provider.tag()) {
            Ok(deck) => deck,
            Err(err) if err.is_parse() && self.fallback_to_placeholder => {
                warn!(error = %err, "response unusable, falling back to placeholder deck");
                placeholder_deck(&request.prompt, target, self.provider.tag())
            }
            Err(err) => return Err(err),
        };

        reconcile_slide_count(&mut deck, target);

        Ok(GeneratedDeck {
            id: Uuid::new_v4().to_string(),
            deck,
        })
    }
}

/// Adjusts the deck to the requested slide count without touching the
/// bookends. Oversized decks keep the first and last slide and truncate the
/// middle; undersized decks get default content slides inserted before the
/// end slide.
pub fn reconcile_slide_count(deck: &mut Deck, requested: usize) {
    let target = requested.max(MIN_SLIDE_COUNT);
    let len = deck.slides.len();
    // Nothing to anchor on without at least one slide
    if len == 0 || len == target {
        return;
    }

    debug!(actual = len, target, "reconciling slide count");

    if len > target {
        let tail = deck.slides.split_off(len - 1);
        deck.slides.truncate(target - 1);
        deck.slides.extend(tail);
    } else {
        let insert_at = len - 1;
        for offset in 0..(target - len) {
            deck.slides.insert(
                insert_at + offset,
                Slide::Content {
                    title: format!("セクション {}", insert_at + offset),
                    content: DEFAULT_CONTENT.to_string(),
                },
            );
        }
    }
}

/// Synthesizes a deck of the requested size from the prompt alone.
fn placeholder_deck(
    prompt: &str,
    slide_count: usize,
    provider: kamishibai_core::provider::ProviderTag,
) -> Deck {
    let title: String = prompt
        .split_whitespace()
        .take(5)
        .collect::<Vec<_>>()
        .join(" ");
    let title = if title.is_empty() {
        deck::DEFAULT_TITLE.to_string()
    } else {
        title
    };

    let mut slides = vec![Slide::Title {
        title: title.clone(),
        subtitle: provider.default_subtitle().to_string(),
    }];

    for i in 1..slide_count.saturating_sub(1) {
        let slide = match i % 4 {
            0 => Slide::Quote {
                quote: DEFAULT_QUOTE.to_string(),
                author: DEFAULT_AUTHOR.to_string(),
            },
            1 => Slide::Content {
                title: format!("セクション {i}"),
                content: DEFAULT_CONTENT.to_string(),
            },
            2 => Slide::Bullet {
                title: format!("セクション {i}"),
                points: default_points(),
            },
            _ => Slide::TwoColumn {
                title: format!("セクション {i}"),
                left_content: DEFAULT_LEFT_CONTENT.to_string(),
                right_content: DEFAULT_RIGHT_CONTENT.to_string(),
            },
        };
        slides.push(slide);
    }

    slides.push(Slide::End {
        contact_info: DEFAULT_CONTACT_INFO.to_string(),
    });

    Deck {
        title,
        subtitle: provider.default_subtitle().to_string(),
        date: chrono::Local::now().format("%Y年%m月%d日").to_string(),
        slides,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kamishibai_core::provider::{ProviderError, ProviderTag};

    struct MockProvider {
        response: std::result::Result<String, String>,
    }

    impl MockProvider {
        fn returning(text: &str) -> Self {
            Self {
                response: Ok(text.to_string()),
            }
        }
    }

    #[async_trait]
    impl GenerationProvider for MockProvider {
        fn tag(&self) -> ProviderTag {
            ProviderTag::OpenAi
        }

        async fn generate(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
        ) -> std::result::Result<String, ProviderError> {
            self.response
                .clone()
                .map_err(ProviderError::ExecutionFailed)
        }
    }

    fn deck_of(n: usize) -> Deck {
        let mut slides = vec![Slide::Title {
            title: "T".to_string(),
            subtitle: "S".to_string(),
        }];
        for i in 1..n - 1 {
            slides.push(Slide::Content {
                title: format!("本文{i}"),
                content: "<p>x</p>".to_string(),
            });
        }
        slides.push(Slide::End {
            contact_info: "問い合わせ".to_string(),
        });
        Deck {
            title: "T".to_string(),
            subtitle: "S".to_string(),
            date: "2025年1月1日".to_string(),
            slides,
        }
    }

    #[test]
    fn test_reconcile_trims_middle_keeps_bookends() {
        let mut deck = deck_of(8);
        reconcile_slide_count(&mut deck, 5);

        assert_eq!(deck.slides.len(), 5);
        assert!(deck.slides[0].is_title());
        assert!(deck.slides[4].is_end());
        // Earliest body slides survive
        assert!(matches!(
            &deck.slides[1],
            Slide::Content { title, .. } if title == "本文1"
        ));
    }

    #[test]
    fn test_reconcile_pads_before_end_slide() {
        let mut deck = deck_of(3);
        reconcile_slide_count(&mut deck, 6);

        assert_eq!(deck.slides.len(), 6);
        assert!(deck.slides[0].is_title());
        assert!(deck.slides[5].is_end());
        assert!(matches!(&deck.slides[4], Slide::Content { .. }));
    }

    #[test]
    fn test_reconcile_clamps_target_to_minimum() {
        let mut deck = deck_of(5);
        reconcile_slide_count(&mut deck, 1);

        assert_eq!(deck.slides.len(), 3);
        assert!(deck.slides[0].is_title());
        assert!(deck.slides[2].is_end());
    }

    #[test]
    fn test_reconcile_empty_deck_is_untouched() {
        let mut deck = Deck::from_slides(Vec::new());
        reconcile_slide_count(&mut deck, 5);
        assert!(deck.slides.is_empty());
    }

    #[test]
    fn test_reconcile_exact_count_is_untouched() {
        let mut deck = deck_of(4);
        let before = deck.slides.clone();
        reconcile_slide_count(&mut deck, 4);
        assert_eq!(deck.slides, before);
    }

    #[test]
    fn test_placeholder_deck_shape() {
        let deck = placeholder_deck("猫の飼い方 入門 完全 ガイド 2025 追加語", 6, ProviderTag::Gemini);

        assert_eq!(deck.slides.len(), 6);
        assert_eq!(deck.title, "猫の飼い方 入門 完全 ガイド 2025");
        assert_eq!(deck.subtitle, ProviderTag::Gemini.default_subtitle());
        assert!(deck.slides[0].is_title());
        assert!(deck.slides[5].is_end());
    }

    #[tokio::test]
    async fn test_generate_normalizes_and_reconciles() {
        let raw = r#"```json
{"title":"AI入門","slides":[
  {"type":"title","title":"AI入門","subtitle":"概要"},
  {"type":"content","title":"第1章","content":"<p>a</p>"},
  {"type":"content","title":"第2章","content":"<p>b</p>"},
  {"type":"content","title":"第3章","content":"<p>c</p>"},
  {"type":"end","contactInfo":"contact@example.com"}
]}
```"#;
        let service = GenerationService::new(Arc::new(MockProvider::returning(raw)));
        let request = PromptRequest::new("AIについて", 4);

        let generated = service.generate(&request).await.unwrap();

        assert_eq!(generated.deck.slides.len(), 4);
        assert!(generated.deck.slides[0].is_title());
        assert!(generated.deck.slides[3].is_end());
        assert!(!generated.id.is_empty());
    }

    #[tokio::test]
    async fn test_generate_surfaces_parse_error_by_default() {
        let service =
            GenerationService::new(Arc::new(MockProvider::returning("まったくJSONではない")));
        let request = PromptRequest::new("AIについて", 5);

        let err = service.generate(&request).await.unwrap_err();
        assert!(err.is_parse());
    }

    #[tokio::test]
    async fn test_generate_placeholder_fallback_when_enabled() {
        let service =
            GenerationService::new(Arc::new(MockProvider::returning("まったくJSONではない")))
                .with_placeholder_fallback(true);
        let request = PromptRequest::new("四半期 決算 報告", 5);

        let generated = service.generate(&request).await.unwrap();

        assert_eq!(generated.deck.slides.len(), 5);
        assert_eq!(generated.deck.title, "四半期 決算 報告");
        assert!(generated.deck.slides[0].is_title());
        assert!(generated.deck.slides[4].is_end());
    }
}
