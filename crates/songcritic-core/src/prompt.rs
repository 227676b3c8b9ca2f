use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;
use tracing::debug;

use songcritic_critique::{CritiquePrompts, ParseContext};
use songcritic_service::{InlineMedia, Part};

use crate::input::{InputMode, InputState};

/// No usable input for the active mode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInputError {
    #[error("No audio file staged")]
    NoAudioFile,

    #[error("No lyrics entered")]
    NoLyrics,
}

/// The three request shapes the builder can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    /// Audio only; the service decides whether it is instrumental
    AudioAutoDetect,
    /// Audio plus user-supplied lyrics as ground truth
    AudioWithLyrics,
    /// Lyrics only; no audio-derived fields
    LyricsOnly,
}

impl PromptMode {
    pub fn has_audio(&self) -> bool {
        !matches!(self, PromptMode::LyricsOnly)
    }

    /// Parser expectations matching this request shape
    pub fn parse_context(&self) -> ParseContext {
        if self.has_audio() {
            ParseContext::for_audio()
        } else {
            ParseContext::for_lyrics_only()
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptMode::AudioAutoDetect => "audio",
            PromptMode::AudioWithLyrics => "audio_with_lyrics",
            PromptMode::LyricsOnly => "lyrics_only",
        }
    }
}

/// Instruction text plus optional media, ready to be wrapped in a request
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPayload {
    pub mode: PromptMode,
    pub instruction: String,
    pub media: Option<InlineMedia>,
}

impl PromptPayload {
    /// Content parts in send order: instruction first, then media
    pub fn parts(&self) -> Vec<Part> {
        let mut parts = vec![Part::text(self.instruction.clone())];
        if let Some(media) = &self.media {
            parts.push(Part::media(media.clone()));
        }
        parts
    }
}

/// Builds the per-request prompt from a snapshot of the input state
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn build(state: &InputState) -> Result<PromptPayload, InvalidInputError> {
        match state.mode() {
            InputMode::Upload => {
                let file = state.staged_file().ok_or(InvalidInputError::NoAudioFile)?;
                let media = InlineMedia {
                    mime_type: file.mime_type().to_string(),
                    data: general_purpose::STANDARD.encode(file.bytes()),
                };

                debug!(
                    file = file.name(),
                    bytes = file.len(),
                    encoded_len = media.data.len(),
                    "Encoded audio for inline upload"
                );

                let (mode, instruction) = match state.auxiliary_lyrics() {
                    Some(lyrics) => (
                        PromptMode::AudioWithLyrics,
                        CritiquePrompts::build_audio_with_lyrics_prompt(lyrics),
                    ),
                    None => (
                        PromptMode::AudioAutoDetect,
                        CritiquePrompts::build_audio_prompt(),
                    ),
                };

                Ok(PromptPayload {
                    mode,
                    instruction,
                    media: Some(media),
                })
            }
            InputMode::Lyrics => {
                let lyrics = state.staged_lyrics().ok_or(InvalidInputError::NoLyrics)?;
                Ok(PromptPayload {
                    mode: PromptMode::LyricsOnly,
                    instruction: CritiquePrompts::build_lyrics_only_prompt(lyrics),
                    media: None,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_without_lyrics() {
        let mut state = InputState::new();
        state
            .stage_file(vec![7u8; 3 * 1024 * 1024], "audio/mpeg", "demo.mp3")
            .unwrap();

        let payload = PromptBuilder::build(&state).unwrap();
        assert_eq!(payload.mode, PromptMode::AudioAutoDetect);

        let parts = payload.parts();
        assert_eq!(parts.len(), 2);
        let media_parts: Vec<_> = parts
            .iter()
            .filter(|p| matches!(p, Part::InlineMedia { .. }))
            .collect();
        assert_eq!(media_parts.len(), 1);

        let media = payload.media.unwrap();
        assert_eq!(media.mime_type, "audio/mpeg");
        let decoded = general_purpose::STANDARD.decode(media.data).unwrap();
        assert_eq!(decoded.len(), 3 * 1024 * 1024);
    }

    #[test]
    fn test_audio_with_auxiliary_lyrics() {
        let mut state = InputState::new();
        state.stage_file(vec![1u8; 32], "audio/wav", "take.wav").unwrap();
        state.set_auxiliary_lyrics("we were young and the night was long");

        let payload = PromptBuilder::build(&state).unwrap();
        assert_eq!(payload.mode, PromptMode::AudioWithLyrics);
        assert!(payload
            .instruction
            .contains("we were young and the night was long"));
        assert!(payload.media.is_some());
    }

    #[test]
    fn test_blank_auxiliary_lyrics_fall_back_to_auto_detect() {
        let mut state = InputState::new();
        state.stage_file(vec![1u8; 32], "audio/wav", "take.wav").unwrap();
        state.set_auxiliary_lyrics("   ");

        let payload = PromptBuilder::build(&state).unwrap();
        assert_eq!(payload.mode, PromptMode::AudioAutoDetect);
    }

    #[test]
    fn test_lyrics_only() {
        let mut state = InputState::new();
        state.select_mode(InputMode::Lyrics);
        state.set_lyrics("walking down the old road alone");

        let payload = PromptBuilder::build(&state).unwrap();
        assert_eq!(payload.mode, PromptMode::LyricsOnly);
        assert!(payload.media.is_none());
        assert_eq!(payload.parts().len(), 1);
        assert!(payload.instruction.contains("walking down the old road alone"));
        assert!(payload.instruction.contains("isInstrumental MUST be false"));
        assert!(payload.instruction.contains("musicalAnalysis MUST be null"));
        assert!(!payload.mode.parse_context().audio_submitted);
    }

    #[test]
    fn test_lyrics_mode_ignores_staged_file() {
        let mut state = InputState::new();
        state.stage_file(vec![1u8; 32], "audio/wav", "take.wav").unwrap();
        state.select_mode(InputMode::Lyrics);

        assert_eq!(
            PromptBuilder::build(&state).unwrap_err(),
            InvalidInputError::NoLyrics
        );
    }

    #[test]
    fn test_upload_mode_without_file() {
        let mut state = InputState::new();
        state.set_lyrics("some lyrics that do not count in upload mode");
        assert_eq!(
            PromptBuilder::build(&state).unwrap_err(),
            InvalidInputError::NoAudioFile
        );
    }
}
