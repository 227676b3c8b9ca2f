use serde_json::json;
use songcritic_critique::{
    check_consistency, render, render_document, render_score_summary, CritiqueResult,
    ParseContext, INSTRUMENTAL_NOTICE, SCORE_CATEGORIES,
};

/// Full-band response for an audio submission with vocals
fn audio_response(penalties: f64) -> serde_json::Value {
    let scores = [8.0, 12.0, 8.0, 7.0, 12.0, 8.0, 8.0, 9.0, 5.0, 5.0];
    let scorecard: Vec<_> = SCORE_CATEGORIES
        .iter()
        .zip(scores)
        .map(|(c, score)| {
            json!({
                "category": c.name,
                "score": score,
                "maxScore": c.max_score,
                "justification": format!("Notes on *{}*.", c.name)
            })
        })
        .collect();
    let final_score = (82.0 - penalties).round();

    json!({
        "isInstrumental": false,
        "aiGeneratedLyrics": null,
        "aiGeneratedMusic": {"isDetected": false, "justification": "Human timing drift."},
        "musicalAnalysis": {
            "instrumentationAndArrangement": "Fingerpicked acoustic, brushed drums.",
            "productionAndMix": "Warm and **intimate**.",
            "compositionAndStructure": "Verse, chorus, bridge.",
            "overallImpression": "A confident folk single."
        },
        "lyricalAnalysis": {
            "scorecard": scorecard,
            "subtotal": 82,
            "penalties": penalties,
            "finalScore": final_score,
            "scoreLowerBound": final_score - 3.0,
            "scoreUpperBound": final_score + 3.0,
            "interpretation": "Strong. Skilled writing with a few weak spots.",
            "areasForImprovement": "- Cut the second pre-chorus."
        }
    })
}

fn parse(value: serde_json::Value, context: &ParseContext) -> CritiqueResult {
    CritiqueResult::parse(&value.to_string(), context).unwrap()
}

#[test]
fn test_instrumental_renders_notice_and_hides_summary() {
    let result = parse(
        json!({
            "isInstrumental": true,
            "aiGeneratedLyrics": null,
            "aiGeneratedMusic": null,
            "musicalAnalysis": {
                "instrumentationAndArrangement": "Modular synth arpeggios.",
                "productionAndMix": "Wide stereo field.",
                "compositionAndStructure": "Slow build over eight minutes.",
                "overallImpression": "Hypnotic."
            },
            "lyricalAnalysis": null
        }),
        &ParseContext::for_audio(),
    );

    let rendered = render(&result);
    assert!(rendered.document.contains(INSTRUMENTAL_NOTICE));
    assert!(!rendered.document.contains("Subtotal"));
    assert!(!rendered.document.contains("Theme and Concept"));
    assert!(rendered.summary.is_none());
    assert_eq!(rendered.summary_html(), "");
}

#[test]
fn test_instrumental_masks_stray_lyrical_analysis() {
    // Inconsistent producer output: lyrics scored on an instrumental
    let mut value = audio_response(0.0);
    value["isInstrumental"] = json!(true);
    let result = parse(value, &ParseContext::for_audio());

    assert!(result.lyrical_analysis.is_some());
    let rendered = render(&result);
    assert!(rendered.document.contains(INSTRUMENTAL_NOTICE));
    assert!(!rendered.document.contains("Theme and Concept"));
    assert!(rendered.summary.is_none());
}

#[test]
fn test_lyrics_only_omits_musical_heading() {
    let mut value = audio_response(0.0);
    value["musicalAnalysis"] = json!(null);
    value["aiGeneratedMusic"] = json!(null);
    let result = parse(value, &ParseContext::for_lyrics_only());

    assert!(check_consistency(&result, &ParseContext::for_lyrics_only()).is_empty());
    let doc = render_document(&result);
    assert!(!doc.contains("Musical Analysis"));
    assert!(!doc.contains("AI-generated music"));
    assert!(doc.contains("<h2>Lyrical Analysis</h2>"));
}

#[test]
fn test_summary_rows_match_scorecard() {
    let result = parse(audio_response(5.0), &ParseContext::for_audio());
    let summary = render_score_summary(&result).unwrap();
    let scorecard = &result.lyrical_analysis.as_ref().unwrap().scorecard;

    assert_eq!(summary.rows.len(), scorecard.len());
    for (row, entry) in summary.rows.iter().zip(scorecard) {
        assert_eq!(row.category, entry.category);
        assert_eq!(
            row.score,
            format!("{} / {}", entry.score as i64, entry.max_score as i64)
        );
    }
    assert_eq!(summary.total, "77 / 100");
}

#[test]
fn test_rendering_is_idempotent() {
    let result = parse(audio_response(5.0), &ParseContext::for_audio());

    let first = render(&result);
    let second = render(&result);
    assert_eq!(first, second);
    assert_eq!(first.summary_html(), second.summary_html());

    // Order of the two projections has no effect
    let summary_first = render_score_summary(&result);
    let document_second = render_document(&result);
    assert_eq!(summary_first, first.summary);
    assert_eq!(document_second, first.document);
}

#[test]
fn test_zero_penalties_never_rendered() {
    let result = parse(audio_response(0.0), &ParseContext::for_audio());
    let doc = render_document(&result);

    assert!(!doc.contains("Penalties"));
    assert!(!doc.contains("\u{2212}0"));
    assert!(doc.contains("<strong>Final Score:</strong> 82 / 100"));
}

#[test]
fn test_scorecard_summing_to_82_with_5_penalty_is_77() {
    let result = parse(audio_response(5.0), &ParseContext::for_audio());
    let lyrical = result.lyrical_analysis.as_ref().unwrap();

    assert_eq!(lyrical.computed_subtotal(), 82.0);
    assert_eq!(lyrical.final_score, 77.0);
    assert!(check_consistency(&result, &ParseContext::for_audio()).is_empty());

    let doc = render_document(&result);
    assert!(doc.contains("<strong>Penalties:</strong> \u{2212}5"));
    assert!(doc.contains("<strong>Final Score:</strong> 77 / 100"));
    assert!(doc.contains("No strong indicators of AI-generated music."));
    assert!(doc.contains("Human timing drift."));
}
