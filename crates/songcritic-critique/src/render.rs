//! Projections of a [`CritiqueResult`] into its two display views.
//!
//! Both functions are pure: the same result always renders to the same
//! bytes, and neither view depends on the other having been produced.

use serde::Serialize;
use std::fmt::Write;

use crate::markdown;
use crate::sanitize::{self, AllowList};
use crate::{format_number, AiDetection, CritiqueResult, LyricalAnalysis, MusicalAnalysis};

pub const INSTRUMENTAL_NOTICE: &str = "Instrumental track detected. Lyrical analysis skipped.";

/// Both views of one critique
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedCritique {
    /// Sanitized HTML for the full critique document
    pub document: String,
    /// Condensed score table; `None` when it should be hidden
    pub summary: Option<ScoreSummary>,
}

impl RenderedCritique {
    /// Summary markup, empty when the summary is hidden
    pub fn summary_html(&self) -> String {
        self.summary
            .as_ref()
            .map(ScoreSummary::to_html)
            .unwrap_or_default()
    }
}

/// Render both views
pub fn render(result: &CritiqueResult) -> RenderedCritique {
    RenderedCritique {
        document: render_document(result),
        summary: render_score_summary(result),
    }
}

#[derive(Debug, Clone, Copy)]
enum DetectionSubject {
    Music,
    Lyrics,
}

impl DetectionSubject {
    fn noun(self) -> &'static str {
        match self {
            DetectionSubject::Music => "music",
            DetectionSubject::Lyrics => "lyrics",
        }
    }
}

/// Full critique document, sanitized
pub fn render_document(result: &CritiqueResult) -> String {
    let mut html = String::new();

    if let Some(musical) = &result.musical_analysis {
        push_musical_section(&mut html, musical, result.ai_generated_music.as_ref());
    }

    if result.is_instrumental {
        html.push_str("<section class=\"lyrical-analysis\">\n<h2>Lyrical Analysis</h2>\n");
        let _ = writeln!(html, "<p class=\"instrumental-notice\">{}</p>", INSTRUMENTAL_NOTICE);
        html.push_str("</section>\n");
    } else if let Some(lyrical) = &result.lyrical_analysis {
        push_lyrical_section(&mut html, lyrical, result.ai_generated_lyrics.as_ref());
    }

    sanitize::clean(&html, &AllowList::DOCUMENT)
}

fn push_detection_banner(
    html: &mut String,
    detection: Option<&AiDetection>,
    subject: DetectionSubject,
) {
    let detected = detection.map(|d| d.is_detected).unwrap_or(false);
    let (class, headline) = if detected {
        (
            "ai-detection detected",
            format!("Likely AI-generated {}.", subject.noun()),
        )
    } else {
        (
            "ai-detection not-detected",
            format!("No strong indicators of AI-generated {}.", subject.noun()),
        )
    };

    let _ = writeln!(html, "<div class=\"{}\">", class);
    let _ = writeln!(html, "<p><strong>{}</strong></p>", headline);
    if let Some(detection) = detection {
        if !detection.justification.trim().is_empty() {
            html.push_str(&markdown::to_html(&detection.justification));
        }
    }
    html.push_str("</div>\n");
}

fn push_musical_section(html: &mut String, musical: &MusicalAnalysis, ai: Option<&AiDetection>) {
    html.push_str("<section class=\"musical-analysis\">\n<h2>Musical Analysis</h2>\n");
    push_detection_banner(html, ai, DetectionSubject::Music);

    for (heading, body) in musical.sections() {
        if body.trim().is_empty() {
            continue;
        }
        let _ = writeln!(html, "<h3>{}</h3>", heading);
        html.push_str(&markdown::to_html(body));
    }

    html.push_str("</section>\n");
}

fn push_lyrical_section(html: &mut String, lyrical: &LyricalAnalysis, ai: Option<&AiDetection>) {
    html.push_str("<section class=\"lyrical-analysis\">\n<h2>Lyrical Analysis</h2>\n");
    push_detection_banner(html, ai, DetectionSubject::Lyrics);

    for entry in &lyrical.scorecard {
        let _ = writeln!(
            html,
            "<h3>{}: {} / {}</h3>",
            sanitize::clean_field(&entry.category),
            format_number(entry.score),
            format_number(entry.max_score)
        );
        html.push_str(&markdown::to_html(&entry.justification));
    }

    html.push_str("<div class=\"score-totals\">\n");
    let _ = writeln!(
        html,
        "<p><strong>Subtotal:</strong> {} / 100</p>",
        format_number(lyrical.subtotal)
    );
    if lyrical.penalties > 0.0 {
        let _ = writeln!(
            html,
            "<p><strong>Penalties:</strong> \u{2212}{}</p>",
            format_number(lyrical.penalties)
        );
    }
    let _ = writeln!(
        html,
        "<p><strong>Final Score:</strong> {} / 100</p>",
        format_number(lyrical.final_score)
    );
    let _ = writeln!(
        html,
        "<p><strong>Confidence Interval:</strong> {} \u{2013} {}</p>",
        format_number(lyrical.score_lower_bound),
        format_number(lyrical.score_upper_bound)
    );
    let _ = writeln!(
        html,
        "<h3>Interpretation</h3>\n<p>{}</p>",
        sanitize::clean_field(&lyrical.interpretation)
    );
    if let Some(areas) = lyrical
        .areas_for_improvement
        .as_deref()
        .filter(|a| !a.trim().is_empty())
    {
        html.push_str("<h3>Areas for Improvement</h3>\n");
        html.push_str(&markdown::to_html(areas));
    }
    html.push_str("</div>\n</section>\n");
}

/// One scorecard line in the condensed view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    /// Sanitized category name
    pub category: String,
    /// "{score} / {maxScore}"
    pub score: String,
}

/// Condensed score table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreSummary {
    pub rows: Vec<SummaryRow>,
    /// "{finalScore} / 100"
    pub total: String,
}

impl ScoreSummary {
    pub fn to_html(&self) -> String {
        let mut html = String::from("<table class=\"score-summary\">\n<tbody>\n");
        for row in &self.rows {
            let _ = writeln!(
                html,
                "<tr><td class=\"category\">{}</td><td class=\"score\">{}</td></tr>",
                row.category, row.score
            );
        }
        let _ = writeln!(
            html,
            "<tr class=\"total\"><td class=\"category\">Total</td><td class=\"score\">{}</td></tr>",
            self.total
        );
        html.push_str("</tbody>\n</table>\n");
        html
    }
}

/// Condensed score view; hidden for instrumentals and when there is no lyrical analysis
pub fn render_score_summary(result: &CritiqueResult) -> Option<ScoreSummary> {
    if result.is_instrumental {
        return None;
    }
    let lyrical = result.lyrical_analysis.as_ref()?;

    let rows = lyrical
        .scorecard
        .iter()
        .map(|entry| SummaryRow {
            category: sanitize::clean_field(&entry.category),
            score: format!(
                "{} / {}",
                format_number(entry.score),
                format_number(entry.max_score)
            ),
        })
        .collect();

    Some(ScoreSummary {
        rows,
        total: format!("{} / 100", format_number(lyrical.final_score)),
    })
}
