//! Prompt templating for deck generation.
//!
//! Renders the system prompt sent to either provider from a typed request.
//! The template demands the JSON deck shape the normalizer expects.

use kamishibai_core::{DeckError, Result};
use minijinja::{Environment, context};
use serde::{Deserialize, Serialize};

const SYSTEM_PROMPT_TEMPLATE: &str = r#"あなたはプレゼンテーション作成の専門家です。以下の要件に基づいて、{{ slide_count }}枚のスライドからなるプレゼンテーションを作成してください。
テーマ: {{ theme }}
スタイル: {{ style }}
詳細度: {{ detail_level }}
言語スタイル: {{ language_style }}
スライド構成: {{ slide_structure }}
タグ: {{ tags }}

以下のJSON形式で出力してください:
{
  "title": "プレゼンテーションのタイトル",
  "subtitle": "サブタイトル",
  "date": "作成日",
  "slides": [
    { "type": "title", "title": "...", "subtitle": "..." },
    { "type": "bullet", "title": "...", "points": ["...", "..."] },
    { "type": "content", "title": "...", "content": "..." },
    { "type": "image", "title": "...", "content": "..." },
    { "type": "two-column", "title": "...", "leftContent": "...", "rightContent": "..." },
    { "type": "quote", "quote": "...", "author": "..." },
    { "type": "end", "contactInfo": "..." }
  ]
}

最初のスライドはタイトルスライド、最後のスライドは終了スライドとしてください。
JSON以外のテキストは出力しないでください。"#;

/// Generation request, as collected from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRequest {
    /// Free-text topic prompt (becomes the user message).
    pub prompt: String,
    /// Requested number of slides, bookends included.
    pub slide_count: usize,
    pub theme: Option<String>,
    pub style: Option<String>,
    pub detail_level: Option<String>,
    pub language_style: Option<String>,
    pub slide_structure: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PromptRequest {
    pub fn new(prompt: impl Into<String>, slide_count: usize) -> Self {
        Self {
            prompt: prompt.into(),
            slide_count,
            theme: None,
            style: None,
            detail_level: None,
            language_style: None,
            slide_structure: None,
            tags: Vec::new(),
        }
    }
}

/// Renders the system prompt for a request, filling unset options with the
/// standard defaults.
pub fn render_system_prompt(request: &PromptRequest) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("system", SYSTEM_PROMPT_TEMPLATE)
        .map_err(|e| DeckError::internal(format!("invalid prompt template: {e}")))?;

    let template = env
        .get_template("system")
        .map_err(|e| DeckError::internal(e.to_string()))?;

    template
        .render(context! {
            slide_count => request.slide_count,
            theme => request.theme.as_deref().unwrap_or("モダン"),
            style => request.style.as_deref().unwrap_or("プロフェッショナル"),
            detail_level => request.detail_level.as_deref().unwrap_or("バランス"),
            language_style => request.language_style.as_deref().unwrap_or("標準"),
            slide_structure => request.slide_structure.as_deref().unwrap_or("自動"),
            tags => request.tags.join(", "),
        })
        .map_err(|e| DeckError::internal(format!("failed to render system prompt: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_defaults() {
        let request = PromptRequest::new("猫の飼い方", 8);
        let prompt = render_system_prompt(&request).unwrap();

        assert!(prompt.contains("8枚のスライド"));
        assert!(prompt.contains("テーマ: モダン"));
        assert!(prompt.contains("\"type\": \"two-column\""));
    }

    #[test]
    fn test_render_with_explicit_options() {
        let mut request = PromptRequest::new("決算報告", 12);
        request.theme = Some("ミニマル".to_string());
        request.tags = vec!["財務".to_string(), "四半期".to_string()];

        let prompt = render_system_prompt(&request).unwrap();

        assert!(prompt.contains("テーマ: ミニマル"));
        assert!(prompt.contains("タグ: 財務, 四半期"));
    }
}
