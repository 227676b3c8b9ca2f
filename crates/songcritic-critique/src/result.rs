use serde::{Deserialize, Serialize};

/// A structured critique as returned by the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CritiqueResult {
    pub is_instrumental: bool,
    #[serde(default)]
    pub ai_generated_lyrics: Option<AiDetection>,
    #[serde(default)]
    pub ai_generated_music: Option<AiDetection>,
    #[serde(default)]
    pub musical_analysis: Option<MusicalAnalysis>,
    #[serde(default)]
    pub lyrical_analysis: Option<LyricalAnalysis>,
}

/// Verdict on whether lyrics or music appear machine-generated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiDetection {
    pub is_detected: bool,
    pub justification: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicalAnalysis {
    pub instrumentation_and_arrangement: String,
    pub production_and_mix: String,
    pub composition_and_structure: String,
    pub overall_impression: String,
}

impl MusicalAnalysis {
    /// Sub-sections with their display headings, in render order
    pub fn sections(&self) -> [(&'static str, &str); 4] {
        [
            (
                "Instrumentation & Arrangement",
                &self.instrumentation_and_arrangement,
            ),
            ("Production & Mix", &self.production_and_mix),
            ("Composition & Structure", &self.composition_and_structure),
            ("Overall Impression", &self.overall_impression),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricalAnalysis {
    pub scorecard: Vec<ScoreEntry>,
    pub subtotal: f64,
    pub penalties: f64,
    pub final_score: f64,
    pub score_lower_bound: f64,
    pub score_upper_bound: f64,
    pub interpretation: String,
    #[serde(default)]
    pub areas_for_improvement: Option<String>,
}

impl LyricalAnalysis {
    /// Sum of the scorecard scores
    pub fn computed_subtotal(&self) -> f64 {
        self.scorecard.iter().map(|e| e.score).sum()
    }

    /// The final score implied by subtotal and penalties
    pub fn expected_final_score(&self) -> f64 {
        (self.subtotal - self.penalties).round()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub category: String,
    pub score: f64,
    pub max_score: f64,
    pub justification: String,
}

/// A fixed rubric category and its maximum score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreCategory {
    pub name: &'static str,
    pub max_score: u32,
}

/// The ten rubric categories, in rubric order. Maximums sum to 100.
pub const SCORE_CATEGORIES: [ScoreCategory; 10] = [
    ScoreCategory::new("Theme and Concept", 10),
    ScoreCategory::new("Imagery and Language", 15),
    ScoreCategory::new("Narrative and Structure", 10),
    ScoreCategory::new("Voice and Point of View", 8),
    ScoreCategory::new("Emotional Authenticity and Impact", 15),
    ScoreCategory::new("Prosody and Singability", 10),
    ScoreCategory::new("Rhyme and Poetic Technique", 10),
    ScoreCategory::new("Originality and Risk", 10),
    ScoreCategory::new("Cohesion and Line Economy", 6),
    ScoreCategory::new("Memorability and Hook Quotient", 6),
];

impl ScoreCategory {
    const fn new(name: &'static str, max_score: u32) -> Self {
        Self { name, max_score }
    }

    /// Look up a category by name, ignoring case and surrounding whitespace
    pub fn find(name: &str) -> Option<&'static ScoreCategory> {
        let name = name.trim();
        SCORE_CATEGORIES
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// Format a score for display: whole numbers without a fractional part
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{}", value as i64)
    } else {
        let formatted = format!("{:.2}", value);
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_maximums_sum_to_100() {
        let total: u32 = SCORE_CATEGORIES.iter().map(|c| c.max_score).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_find_category() {
        let category = ScoreCategory::find(" prosody and singability ").unwrap();
        assert_eq!(category.max_score, 10);
        assert!(ScoreCategory::find("Vibes").is_none());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(77.0), "77");
        assert_eq!(format_number(7.5), "7.5");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(2.25), "2.25");
    }

    #[test]
    fn test_final_score_arithmetic() {
        let analysis = LyricalAnalysis {
            scorecard: vec![ScoreEntry {
                category: "Theme and Concept".into(),
                score: 8.5,
                max_score: 10.0,
                justification: String::new(),
            }],
            subtotal: 82.0,
            penalties: 5.0,
            final_score: 77.0,
            score_lower_bound: 74.0,
            score_upper_bound: 80.0,
            interpretation: String::new(),
            areas_for_improvement: None,
        };
        assert_eq!(analysis.expected_final_score(), 77.0);
        assert_eq!(analysis.computed_subtotal(), 8.5);
    }

    #[test]
    fn test_deserialize_with_absent_optionals() {
        let result: CritiqueResult = serde_json::from_value(json!({
            "isInstrumental": true,
            "aiGeneratedMusic": {"isDetected": false, "justification": "organic timing"}
        }))
        .unwrap();

        assert!(result.is_instrumental);
        assert!(result.ai_generated_lyrics.is_none());
        assert!(result.musical_analysis.is_none());
        assert!(!result.ai_generated_music.unwrap().is_detected);
    }
}
