//! Application layer: use-case services composed from core and interaction.

pub mod generation_service;

pub use generation_service::{GeneratedDeck, GenerationService, reconcile_slide_count};
