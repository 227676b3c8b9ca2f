//! # songcritic-service
//!
//! The remote generative-model call used to produce a song critique.
//!
//! ## Key Types
//!
//! - [`CritiqueService`] - The opaque remote procedure (request in, text out)
//! - [`CritiqueRequest`] - Wire payload: model, content parts, generation config
//! - [`GeminiService`] - HTTP implementation against the Gemini REST API
//! - [`CritiqueModel`] - Supported models and their fixed temperatures

mod gemini;
mod model;
mod request;
mod traits;

pub use gemini::{GeminiService, DEFAULT_BASE_URL};
pub use model::CritiqueModel;
pub use request::{Contents, CritiqueRequest, GenerationConfig, InlineMedia, Part};
pub use traits::{CritiqueService, ServiceError, ServiceResponse};
