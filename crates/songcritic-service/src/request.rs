use serde::{Deserialize, Serialize};

/// Payload accepted by the remote critique call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CritiqueRequest {
    pub model: String,
    pub contents: Contents,
    pub config: GenerationConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contents {
    pub parts: Vec<Part>,
}

/// One content part: instruction text or an inlined media attachment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineMedia {
        #[serde(rename = "inlineData")]
        inline_data: InlineMedia,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn media(media: InlineMedia) -> Self {
        Part::InlineMedia { inline_data: media }
    }
}

/// Raw media already base64-encoded, with its declared MIME type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineMedia {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub system_instruction: String,
    pub temperature: f64,
    pub response_mime_type: String,
    pub response_schema: serde_json::Value,
}

impl CritiqueRequest {
    /// Number of inline media parts attached to the request
    pub fn media_count(&self) -> usize {
        self.contents
            .parts
            .iter()
            .filter(|p| matches!(p, Part::InlineMedia { .. }))
            .count()
    }

    /// Concatenated text parts
    pub fn instruction_text(&self) -> String {
        self.contents
            .parts
            .iter()
            .filter_map(|p| match p {
                Part::Text { text } => Some(text.as_str()),
                Part::InlineMedia { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
