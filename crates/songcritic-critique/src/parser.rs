use thiserror::Error;
use tracing::{debug, warn};

use crate::consistency::{check_consistency, ConsistencyPolicy, Inconsistency, ParseContext};
use crate::schema::{critique_schema, SchemaViolation};
use crate::CritiqueResult;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Response is not a JSON object")]
    NotAnObject,

    #[error("Response does not match the critique schema: {}", join(.0))]
    SchemaMismatch(Vec<SchemaViolation>),

    #[error("Response is internally inconsistent: {}", join(.0))]
    Inconsistent(Vec<Inconsistency>),
}

impl ParseError {
    /// True when the text could not be decoded into the critique shape at all
    pub fn is_malformed(&self) -> bool {
        !matches!(self, ParseError::Inconsistent(_))
    }
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl CritiqueResult {
    /// Parse the raw text returned by the remote service.
    ///
    /// Decoding and schema checks are all-or-nothing. Business-rule
    /// violations are handled according to `context.policy`: logged under
    /// [`ConsistencyPolicy::Lenient`], rejected under
    /// [`ConsistencyPolicy::Strict`].
    pub fn parse(raw: &str, context: &ParseContext) -> Result<Self, ParseError> {
        Self::parse_checked(raw, context).map(|(result, _)| result)
    }

    /// Like [`CritiqueResult::parse`], also returning the inconsistencies
    /// tolerated under the lenient policy. Empty under the strict policy.
    pub fn parse_checked(
        raw: &str,
        context: &ParseContext,
    ) -> Result<(Self, Vec<Inconsistency>), ParseError> {
        let text = strip_code_fence(raw.trim());
        debug!(response_len = text.len(), "Parsing critique response");

        let value: serde_json::Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(ParseError::NotAnObject);
        }

        critique_schema()
            .validate(&value)
            .map_err(ParseError::SchemaMismatch)?;

        let result: CritiqueResult = serde_json::from_value(value)?;

        let issues = check_consistency(&result, context);
        if !issues.is_empty() {
            match context.policy {
                ConsistencyPolicy::Strict => return Err(ParseError::Inconsistent(issues)),
                ConsistencyPolicy::Lenient => {
                    for issue in &issues {
                        warn!(issue = %issue, "Critique response inconsistency");
                    }
                }
            }
        }

        Ok((result, issues))
    }
}

/// Remove a surrounding Markdown code fence (```json ... ```), if any
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop the info string (e.g. "json") on the opening line
    match body.find('\n') {
        Some(pos) => body[pos + 1..].trim(),
        None => body.trim(),
    }
}
