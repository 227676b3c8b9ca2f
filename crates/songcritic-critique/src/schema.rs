//! Data-level description of the critique response shape.
//!
//! The same [`Schema`] value is sent to the remote service as its response
//! schema and used by the parser to check what comes back.

use serde_json::{json, Map, Value};
use std::fmt;

/// A node in the response schema
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub kind: SchemaKind,
    pub nullable: bool,
    pub description: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Object {
        /// Properties in the order the producer should emit them
        properties: Vec<(&'static str, Schema)>,
        required: Vec<&'static str>,
    },
    Array(Box<Schema>),
    String,
    Number,
    Boolean,
}

impl Schema {
    fn of(kind: SchemaKind) -> Self {
        Self {
            kind,
            nullable: false,
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::of(SchemaKind::String)
    }

    pub fn number() -> Self {
        Self::of(SchemaKind::Number)
    }

    pub fn boolean() -> Self {
        Self::of(SchemaKind::Boolean)
    }

    pub fn array(items: Schema) -> Self {
        Self::of(SchemaKind::Array(Box::new(items)))
    }

    /// Object whose properties are all required
    pub fn object(properties: Vec<(&'static str, Schema)>) -> Self {
        let required = properties.iter().map(|(name, _)| *name).collect();
        Self::of(SchemaKind::Object {
            properties,
            required,
        })
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    fn type_name(&self) -> &'static str {
        match self.kind {
            SchemaKind::Object { .. } => "OBJECT",
            SchemaKind::Array(_) => "ARRAY",
            SchemaKind::String => "STRING",
            SchemaKind::Number => "NUMBER",
            SchemaKind::Boolean => "BOOLEAN",
        }
    }

    /// Render in the remote service's response-schema dialect
    pub fn to_response_schema(&self) -> Value {
        let mut node = Map::new();
        node.insert("type".into(), json!(self.type_name()));
        if let Some(description) = self.description {
            node.insert("description".into(), json!(description));
        }
        if self.nullable {
            node.insert("nullable".into(), json!(true));
        }

        match &self.kind {
            SchemaKind::Object {
                properties,
                required,
            } => {
                let props: Map<String, Value> = properties
                    .iter()
                    .map(|(name, schema)| (name.to_string(), schema.to_response_schema()))
                    .collect();
                let ordering: Vec<&str> = properties.iter().map(|(name, _)| *name).collect();
                node.insert("properties".into(), Value::Object(props));
                node.insert("required".into(), json!(required));
                node.insert("propertyOrdering".into(), json!(ordering));
            }
            SchemaKind::Array(items) => {
                node.insert("items".into(), items.to_response_schema());
            }
            SchemaKind::String | SchemaKind::Number | SchemaKind::Boolean => {}
        }

        Value::Object(node)
    }

    /// Check a decoded value against this schema.
    ///
    /// A required property whose schema is nullable may be omitted entirely;
    /// absence is treated the same as an explicit `null`. Unknown properties
    /// are ignored.
    pub fn validate(&self, value: &Value) -> Result<(), Vec<SchemaViolation>> {
        let mut violations = Vec::new();
        self.validate_at("$", value, &mut violations);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    fn validate_at(&self, path: &str, value: &Value, out: &mut Vec<SchemaViolation>) {
        if value.is_null() {
            if !self.nullable {
                out.push(SchemaViolation::new(path, ViolationKind::UnexpectedNull));
            }
            return;
        }

        match (&self.kind, value) {
            (
                SchemaKind::Object {
                    properties,
                    required,
                },
                Value::Object(map),
            ) => {
                for (name, schema) in properties {
                    let child_path = format!("{}.{}", path, name);
                    match map.get(*name) {
                        Some(child) => schema.validate_at(&child_path, child, out),
                        None if required.contains(name) && !schema.nullable => {
                            let violation =
                                SchemaViolation::new(&child_path, ViolationKind::MissingField);
                            out.push(violation);
                        }
                        None => {}
                    }
                }
            }
            (SchemaKind::Array(items), Value::Array(elements)) => {
                for (i, element) in elements.iter().enumerate() {
                    items.validate_at(&format!("{}[{}]", path, i), element, out);
                }
            }
            (SchemaKind::String, Value::String(_))
            | (SchemaKind::Number, Value::Number(_))
            | (SchemaKind::Boolean, Value::Bool(_)) => {}
            (_, other) => out.push(SchemaViolation::new(
                path,
                ViolationKind::WrongType {
                    expected: self.type_name(),
                    found: json_type_name(other),
                },
            )),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NULL",
        Value::Bool(_) => "BOOLEAN",
        Value::Number(_) => "NUMBER",
        Value::String(_) => "STRING",
        Value::Array(_) => "ARRAY",
        Value::Object(_) => "OBJECT",
    }
}

/// A single structural mismatch between a value and the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub path: String,
    pub kind: ViolationKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    MissingField,
    UnexpectedNull,
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
}

impl SchemaViolation {
    fn new(path: &str, kind: ViolationKind) -> Self {
        Self {
            path: path.to_string(),
            kind,
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::MissingField => write!(f, "{}: required field missing", self.path),
            ViolationKind::UnexpectedNull => write!(f, "{}: must not be null", self.path),
            ViolationKind::WrongType { expected, found } => {
                write!(f, "{}: expected {}, found {}", self.path, expected, found)
            }
        }
    }
}

fn ai_detection(subject: &'static str) -> Schema {
    Schema::object(vec![
        ("isDetected", Schema::boolean()),
        (
            "justification",
            Schema::string().describe("Evidence supporting the detection verdict."),
        ),
    ])
    .nullable()
    .describe(subject)
}

fn score_entry() -> Schema {
    Schema::object(vec![
        (
            "category",
            Schema::string().describe("Rubric category name, exactly as listed in the rubric."),
        ),
        ("score", Schema::number().describe("Points awarded, 0 to maxScore.")),
        ("maxScore", Schema::number().describe("Maximum points for the category.")),
        (
            "justification",
            Schema::string().describe("Markdown justification citing specific lines."),
        ),
    ])
}

/// The response schema every critique must follow
pub fn critique_schema() -> Schema {
    Schema::object(vec![
        (
            "isInstrumental",
            Schema::boolean()
                .describe("True only if the track has no discernible sung or rapped vocals."),
        ),
        (
            "aiGeneratedLyrics",
            ai_detection(
                "Present only when lyrics exist and confidence is moderate to high; otherwise null.",
            ),
        ),
        (
            "aiGeneratedMusic",
            ai_detection(
                "Present only when audio was analyzed and confidence is moderate to high; otherwise null.",
            ),
        ),
        (
            "musicalAnalysis",
            Schema::object(vec![
                ("instrumentationAndArrangement", Schema::string()),
                ("productionAndMix", Schema::string()),
                ("compositionAndStructure", Schema::string()),
                ("overallImpression", Schema::string()),
            ])
            .nullable()
            .describe("Required when audio was provided. Must be null when no audio was provided."),
        ),
        (
            "lyricalAnalysis",
            Schema::object(vec![
                ("scorecard", Schema::array(score_entry())),
                ("subtotal", Schema::number().describe("Sum of all scorecard scores.")),
                ("penalties", Schema::number().describe("Total deductions, zero or positive.")),
                ("finalScore", Schema::number().describe("Subtotal minus penalties, rounded.")),
                ("scoreLowerBound", Schema::number()),
                ("scoreUpperBound", Schema::number()),
                (
                    "interpretation",
                    Schema::string().describe("Interpretation band for the final score."),
                ),
                (
                    "areasForImprovement",
                    Schema::string()
                        .nullable()
                        .describe("Markdown list of concrete revisions, or null when none apply."),
                ),
            ])
            .nullable()
            .describe("Must be null when isInstrumental is true; required otherwise."),
        ),
    ])
}
