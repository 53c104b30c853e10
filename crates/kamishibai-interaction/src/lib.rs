//! Interaction layer: prompt templating and concrete generation providers.

pub mod gemini;
pub mod openai;
pub mod prompt;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use prompt::{PromptRequest, render_system_prompt};
