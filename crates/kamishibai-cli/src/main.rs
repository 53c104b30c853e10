use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kamishibai_application::GenerationService;
use kamishibai_core::deck;
use kamishibai_core::provider::{GenerationProvider, ProviderTag};
use kamishibai_core::session::{DEFAULT_SESSION_KEY, EditSessionManager};
use kamishibai_infrastructure::JsonSessionStore;
use kamishibai_interaction::prompt::PromptRequest;
use kamishibai_interaction::{GeminiProvider, OpenAiProvider};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "kamishibai")]
#[command(about = "Kamishibai - prompt-to-slide-deck generation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProviderKind {
    Openai,
    Gemini,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a slide deck from a prompt
    Generate {
        /// Topic prompt for the deck
        prompt: String,
        #[arg(long, value_enum, default_value_t = ProviderKind::Openai)]
        provider: ProviderKind,
        /// Number of slides, bookends included
        #[arg(long, default_value_t = 8)]
        slides: usize,
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        style: Option<String>,
        #[arg(long)]
        detail_level: Option<String>,
        #[arg(long)]
        language_style: Option<String>,
        #[arg(long)]
        slide_structure: Option<String>,
        /// May be given multiple times
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Fall back to a placeholder deck when the response is unusable
        #[arg(long)]
        placeholder_fallback: bool,
        /// Also open an edit session in the local store, under this key
        /// (or the single-session default key when given without a value)
        #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_SESSION_KEY)]
        session: Option<String>,
        /// Write the deck JSON here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Normalize raw model output into a canonical deck
    Normalize {
        /// Input file; reads stdin when omitted
        #[arg(long, short)]
        input: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = ProviderKind::Openai)]
        provider: ProviderKind,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            prompt,
            provider,
            slides,
            theme,
            style,
            detail_level,
            language_style,
            slide_structure,
            tags,
            placeholder_fallback,
            session,
            output,
        } => {
            let provider = build_provider(provider)?;
            let service =
                GenerationService::new(provider).with_placeholder_fallback(placeholder_fallback);

            let mut request = PromptRequest::new(prompt, slides);
            request.theme = theme;
            request.style = style;
            request.detail_level = detail_level;
            request.language_style = language_style;
            request.slide_structure = slide_structure;
            request.tags = tags;

            let generated = service.generate(&request).await?;

            if let Some(key) = session {
                let store = JsonSessionStore::default_location()
                    .await
                    .context("failed to open the local session store")?;
                let manager = EditSessionManager::new(Arc::new(store));
                manager.start(&key, &generated.deck).await?;
                eprintln!("edit session opened: {key}");
            }

            let json = serde_json::to_string_pretty(&generated.deck)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("deck {} written to {}", generated.id, path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Normalize { input, provider } => {
            let raw = match input {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read stdin")?;
                    buf
                }
            };

            let tag = match provider {
                ProviderKind::Openai => ProviderTag::OpenAi,
                ProviderKind::Gemini => ProviderTag::Gemini,
            };
            let deck = deck::normalize(&raw, tag)?;
            println!("{}", serde_json::to_string_pretty(&deck)?);
        }
    }

    Ok(())
}

fn build_provider(kind: ProviderKind) -> Result<Arc<dyn GenerationProvider>> {
    Ok(match kind {
        ProviderKind::Openai => Arc::new(OpenAiProvider::try_from_env()?),
        ProviderKind::Gemini => Arc::new(GeminiProvider::try_from_env()?),
    })
}
