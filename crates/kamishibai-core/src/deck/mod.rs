//! Deck domain module.
//!
//! - `model`: canonical deck document and the slide tagged union
//! - `normalizer`: raw provider text → canonical deck

mod model;
mod normalizer;

pub use model::{
    DEFAULT_AUTHOR, DEFAULT_CONTACT_INFO, DEFAULT_CONTENT, DEFAULT_IMAGE_CONTENT,
    DEFAULT_LEFT_CONTENT, DEFAULT_QUOTE, DEFAULT_RIGHT_CONTENT, DEFAULT_TITLE, Deck, Slide,
    default_points, default_slide_title,
};
pub use normalizer::normalize;
