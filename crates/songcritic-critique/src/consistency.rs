//! Business-rule checks applied after a response decodes.
//!
//! These are kept apart from structural decoding so a payload that is
//! well-formed but self-contradictory can be reported precisely.

use std::fmt;

use crate::{format_number, CritiqueResult, ScoreCategory};

/// Tolerance for comparing model-produced arithmetic
const EPSILON: f64 = 0.01;

/// What the parser knows about the request that produced a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseContext {
    /// An audio file was attached to the request
    pub audio_submitted: bool,
    pub policy: ConsistencyPolicy,
}

impl ParseContext {
    pub fn for_audio() -> Self {
        Self {
            audio_submitted: true,
            policy: ConsistencyPolicy::default(),
        }
    }

    pub fn for_lyrics_only() -> Self {
        Self {
            audio_submitted: false,
            policy: ConsistencyPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ConsistencyPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// How to treat a decoded response that breaks a business rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsistencyPolicy {
    /// Log inconsistencies and let the renderer omit what it cannot show
    #[default]
    Lenient,
    /// Reject the response
    Strict,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inconsistency {
    InstrumentalWithLyricalAnalysis,
    MissingLyricalAnalysis,
    MusicalAnalysisWithoutAudio,
    MissingMusicalAnalysis,
    AiMusicWithoutAudio,
    LyricsOnlyMarkedInstrumental,
    EmptyMusicalField(&'static str),
    ScoreOutOfRange {
        category: String,
        score: f64,
        max_score: f64,
    },
    UnknownCategory(String),
    MaxScoreMismatch {
        category: String,
        expected: u32,
        found: f64,
    },
    SubtotalMismatch {
        expected: f64,
        found: f64,
    },
    FinalScoreMismatch {
        expected: f64,
        found: f64,
    },
    NegativePenalties(f64),
    BoundsOutOfRange {
        lower: f64,
        upper: f64,
    },
    BoundsExcludeFinalScore {
        lower: f64,
        upper: f64,
        final_score: f64,
    },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstrumentalWithLyricalAnalysis => {
                write!(f, "lyricalAnalysis present on an instrumental track")
            }
            Self::MissingLyricalAnalysis => {
                write!(f, "lyricalAnalysis missing on a track with lyrics")
            }
            Self::MusicalAnalysisWithoutAudio => {
                write!(f, "musicalAnalysis present although no audio was submitted")
            }
            Self::MissingMusicalAnalysis => {
                write!(f, "musicalAnalysis missing although audio was submitted")
            }
            Self::AiMusicWithoutAudio => {
                write!(f, "aiGeneratedMusic present although no audio was submitted")
            }
            Self::LyricsOnlyMarkedInstrumental => {
                write!(f, "isInstrumental is true for a lyrics-only submission")
            }
            Self::EmptyMusicalField(field) => write!(f, "musicalAnalysis.{} is empty", field),
            Self::ScoreOutOfRange {
                category,
                score,
                max_score,
            } => write!(
                f,
                "{} score {} outside 0..={}",
                category,
                format_number(*score),
                format_number(*max_score)
            ),
            Self::UnknownCategory(category) => write!(f, "unknown category '{}'", category),
            Self::MaxScoreMismatch {
                category,
                expected,
                found,
            } => write!(
                f,
                "{} maxScore is {}, rubric says {}",
                category,
                format_number(*found),
                expected
            ),
            Self::SubtotalMismatch { expected, found } => write!(
                f,
                "subtotal is {}, scorecard sums to {}",
                format_number(*found),
                format_number(*expected)
            ),
            Self::FinalScoreMismatch { expected, found } => write!(
                f,
                "finalScore is {}, subtotal minus penalties rounds to {}",
                format_number(*found),
                format_number(*expected)
            ),
            Self::NegativePenalties(p) => {
                write!(f, "penalties is negative ({})", format_number(*p))
            }
            Self::BoundsOutOfRange { lower, upper } => write!(
                f,
                "confidence bounds {}..{} outside 0..100",
                format_number(*lower),
                format_number(*upper)
            ),
            Self::BoundsExcludeFinalScore {
                lower,
                upper,
                final_score,
            } => write!(
                f,
                "finalScore {} outside confidence bounds {}..{}",
                format_number(*final_score),
                format_number(*lower),
                format_number(*upper)
            ),
        }
    }
}

/// Collect every business-rule violation in a decoded critique
pub fn check_consistency(result: &CritiqueResult, context: &ParseContext) -> Vec<Inconsistency> {
    let mut issues = Vec::new();

    if result.is_instrumental && result.lyrical_analysis.is_some() {
        issues.push(Inconsistency::InstrumentalWithLyricalAnalysis);
    }
    if !result.is_instrumental && result.lyrical_analysis.is_none() {
        issues.push(Inconsistency::MissingLyricalAnalysis);
    }

    if context.audio_submitted {
        match &result.musical_analysis {
            None => issues.push(Inconsistency::MissingMusicalAnalysis),
            Some(musical) => {
                let fields = [
                    ("instrumentationAndArrangement", &musical.instrumentation_and_arrangement),
                    ("productionAndMix", &musical.production_and_mix),
                    ("compositionAndStructure", &musical.composition_and_structure),
                    ("overallImpression", &musical.overall_impression),
                ];
                for (name, value) in fields {
                    if value.trim().is_empty() {
                        issues.push(Inconsistency::EmptyMusicalField(name));
                    }
                }
            }
        }
    } else {
        if result.musical_analysis.is_some() {
            issues.push(Inconsistency::MusicalAnalysisWithoutAudio);
        }
        if result.ai_generated_music.is_some() {
            issues.push(Inconsistency::AiMusicWithoutAudio);
        }
        if result.is_instrumental {
            issues.push(Inconsistency::LyricsOnlyMarkedInstrumental);
        }
    }

    if let Some(lyrical) = &result.lyrical_analysis {
        for entry in &lyrical.scorecard {
            if entry.score < 0.0 || entry.score > entry.max_score + EPSILON {
                issues.push(Inconsistency::ScoreOutOfRange {
                    category: entry.category.clone(),
                    score: entry.score,
                    max_score: entry.max_score,
                });
            }
            match ScoreCategory::find(&entry.category) {
                None => issues.push(Inconsistency::UnknownCategory(entry.category.clone())),
                Some(category) if (category.max_score as f64 - entry.max_score).abs() > EPSILON => {
                    issues.push(Inconsistency::MaxScoreMismatch {
                        category: entry.category.clone(),
                        expected: category.max_score,
                        found: entry.max_score,
                    });
                }
                Some(_) => {}
            }
        }

        let computed = lyrical.computed_subtotal();
        if (computed - lyrical.subtotal).abs() > EPSILON {
            issues.push(Inconsistency::SubtotalMismatch {
                expected: computed,
                found: lyrical.subtotal,
            });
        }

        if lyrical.penalties < 0.0 {
            issues.push(Inconsistency::NegativePenalties(lyrical.penalties));
        }

        let expected_final = lyrical.expected_final_score();
        if (expected_final - lyrical.final_score).abs() > EPSILON {
            issues.push(Inconsistency::FinalScoreMismatch {
                expected: expected_final,
                found: lyrical.final_score,
            });
        }

        let (lower, upper) = (lyrical.score_lower_bound, lyrical.score_upper_bound);
        if !(0.0..=100.0).contains(&lower) || !(0.0..=100.0).contains(&upper) {
            issues.push(Inconsistency::BoundsOutOfRange { lower, upper });
        }
        if lyrical.final_score < lower || lyrical.final_score > upper {
            issues.push(Inconsistency::BoundsExcludeFinalScore {
                lower,
                upper,
                final_score: lyrical.final_score,
            });
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AiDetection, LyricalAnalysis, MusicalAnalysis, ScoreEntry, SCORE_CATEGORIES};

    /// Ten entries summing to 82, penalties 5, final 77
    fn valid_lyrical() -> LyricalAnalysis {
        let scores = [8.0, 12.0, 8.0, 7.0, 12.0, 8.0, 8.0, 9.0, 5.0, 5.0];
        let scorecard = SCORE_CATEGORIES
            .iter()
            .zip(scores)
            .map(|(c, score)| ScoreEntry {
                category: c.name.to_string(),
                score,
                max_score: c.max_score as f64,
                justification: "solid".to_string(),
            })
            .collect();
        LyricalAnalysis {
            scorecard,
            subtotal: 82.0,
            penalties: 5.0,
            final_score: 77.0,
            score_lower_bound: 74.0,
            score_upper_bound: 80.0,
            interpretation: "Strong".to_string(),
            areas_for_improvement: Some("- tighten verse two".to_string()),
        }
    }

    fn musical() -> MusicalAnalysis {
        MusicalAnalysis {
            instrumentation_and_arrangement: "guitars".into(),
            production_and_mix: "warm".into(),
            composition_and_structure: "verse chorus".into(),
            overall_impression: "good".into(),
        }
    }

    #[test]
    fn test_valid_fixture_has_no_issues() {
        let result = CritiqueResult {
            is_instrumental: false,
            ai_generated_lyrics: None,
            ai_generated_music: None,
            musical_analysis: Some(musical()),
            lyrical_analysis: Some(valid_lyrical()),
        };
        assert!(check_consistency(&result, &ParseContext::for_audio()).is_empty());
    }

    #[test]
    fn test_final_score_must_match_subtotal_minus_penalties() {
        let mut lyrical = valid_lyrical();
        lyrical.final_score = 82.0;
        lyrical.score_upper_bound = 85.0;
        let result = CritiqueResult {
            is_instrumental: false,
            ai_generated_lyrics: None,
            ai_generated_music: None,
            musical_analysis: None,
            lyrical_analysis: Some(lyrical),
        };

        let issues = check_consistency(&result, &ParseContext::for_lyrics_only());
        assert_eq!(
            issues,
            vec![Inconsistency::FinalScoreMismatch {
                expected: 77.0,
                found: 82.0
            }]
        );
    }

    #[test]
    fn test_lyrics_only_rejects_audio_fields() {
        let result = CritiqueResult {
            is_instrumental: true,
            ai_generated_lyrics: None,
            ai_generated_music: Some(AiDetection {
                is_detected: true,
                justification: "artifacts".into(),
            }),
            musical_analysis: Some(musical()),
            lyrical_analysis: None,
        };

        let issues = check_consistency(&result, &ParseContext::for_lyrics_only());
        assert!(issues.contains(&Inconsistency::MusicalAnalysisWithoutAudio));
        assert!(issues.contains(&Inconsistency::AiMusicWithoutAudio));
        assert!(issues.contains(&Inconsistency::LyricsOnlyMarkedInstrumental));
    }

    #[test]
    fn test_instrumental_with_lyrics_flagged() {
        let result = CritiqueResult {
            is_instrumental: true,
            ai_generated_lyrics: None,
            ai_generated_music: None,
            musical_analysis: Some(musical()),
            lyrical_analysis: Some(valid_lyrical()),
        };
        let issues = check_consistency(&result, &ParseContext::for_audio());
        assert_eq!(issues, vec![Inconsistency::InstrumentalWithLyricalAnalysis]);
    }

    #[test]
    fn test_scorecard_entry_rules() {
        let mut lyrical = valid_lyrical();
        lyrical.scorecard[0].score = 11.0;
        lyrical.scorecard[1].max_score = 20.0;
        lyrical.scorecard[2].category = "Vibes".into();
        lyrical.subtotal = lyrical.computed_subtotal();
        lyrical.final_score = lyrical.expected_final_score();
        lyrical.score_upper_bound = 100.0;

        let result = CritiqueResult {
            is_instrumental: false,
            ai_generated_lyrics: None,
            ai_generated_music: None,
            musical_analysis: None,
            lyrical_analysis: Some(lyrical),
        };
        let issues = check_consistency(&result, &ParseContext::for_lyrics_only());

        assert!(issues.contains(&Inconsistency::ScoreOutOfRange {
            category: "Theme and Concept".into(),
            score: 11.0,
            max_score: 10.0
        }));
        assert!(issues.contains(&Inconsistency::MaxScoreMismatch {
            category: "Imagery and Language".into(),
            expected: 15,
            found: 20.0
        }));
        assert!(issues.contains(&Inconsistency::UnknownCategory("Vibes".into())));
        assert_eq!(issues.len(), 3);
    }

    #[test]
    fn test_bounds_and_penalties() {
        let mut lyrical = valid_lyrical();
        lyrical.penalties = -3.0;
        lyrical.final_score = 85.0;
        lyrical.score_lower_bound = 86.0;
        lyrical.score_upper_bound = 104.0;

        let result = CritiqueResult {
            is_instrumental: false,
            ai_generated_lyrics: None,
            ai_generated_music: None,
            musical_analysis: None,
            lyrical_analysis: Some(lyrical),
        };
        let issues = check_consistency(&result, &ParseContext::for_lyrics_only());

        assert!(issues.contains(&Inconsistency::NegativePenalties(-3.0)));
        assert!(issues.contains(&Inconsistency::BoundsOutOfRange {
            lower: 86.0,
            upper: 104.0
        }));
        assert!(issues.contains(&Inconsistency::BoundsExcludeFinalScore {
            lower: 86.0,
            upper: 104.0,
            final_score: 85.0
        }));
    }

    #[test]
    fn test_display_is_readable() {
        let issue = Inconsistency::SubtotalMismatch {
            expected: 82.0,
            found: 80.5,
        };
        assert_eq!(issue.to_string(), "subtotal is 80.5, scorecard sums to 82");
    }
}
