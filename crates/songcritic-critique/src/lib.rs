//! # songcritic-critique
//!
//! The critique request/response contract.
//!
//! ## Key Types
//!
//! - [`Schema`] / [`critique_schema`] - The response shape the remote service must follow
//! - [`CritiqueResult`] - Typed critique, produced by [`CritiqueResult::parse`]
//! - [`ParseContext`] / [`ConsistencyPolicy`] - How business-rule violations are handled
//! - [`render`] - Projection into the full document and the score summary
//! - [`CritiquePrompts`] / [`SYSTEM_INSTRUCTION`] - Instruction text sent with each request

mod consistency;
pub mod markdown;
mod parser;
mod prompts;
pub mod render;
mod result;
pub mod sanitize;
pub mod schema;

pub use consistency::{check_consistency, ConsistencyPolicy, Inconsistency, ParseContext};
pub use parser::ParseError;
pub use prompts::{CritiquePrompts, SYSTEM_INSTRUCTION};
pub use render::{
    render, render_document, render_score_summary, RenderedCritique, ScoreSummary, SummaryRow,
    INSTRUMENTAL_NOTICE,
};
pub use result::{
    format_number, AiDetection, CritiqueResult, LyricalAnalysis, MusicalAnalysis, ScoreCategory,
    ScoreEntry, SCORE_CATEGORIES,
};
pub use schema::{critique_schema, Schema, SchemaViolation};
