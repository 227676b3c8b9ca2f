use std::path::Path;
use thiserror::Error;

/// Largest audio file accepted for upload
pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

/// Which input the user is working with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InputMode {
    /// An audio file, optionally with the user's own lyrics
    #[default]
    Upload,
    /// Lyric text only
    Lyrics,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputMode::Upload => write!(f, "upload"),
            InputMode::Lyrics => write!(f, "lyrics"),
        }
    }
}

/// Reasons a file is refused before it can be staged
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileRejected {
    #[error("File is too large ({size} bytes). Maximum size is 10 MB.")]
    TooLarge { size: usize },

    #[error("Unsupported file type '{0}'. Please choose an audio file.")]
    UnsupportedType(String),

    #[error("File is empty.")]
    Empty,
}

/// An audio file accepted for submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    bytes: Vec<u8>,
    mime_type: String,
    name: String,
}

impl StagedFile {
    /// Validate size and type. Only validated files can be staged.
    pub fn new(bytes: Vec<u8>, mime_type: &str, name: &str) -> Result<Self, FileRejected> {
        if bytes.is_empty() {
            return Err(FileRejected::Empty);
        }
        if bytes.len() > MAX_FILE_BYTES {
            return Err(FileRejected::TooLarge { size: bytes.len() });
        }
        let mime_type = mime_type.trim().to_lowercase();
        if !mime_type.starts_with("audio/") {
            return Err(FileRejected::UnsupportedType(mime_type));
        }

        Ok(Self {
            bytes,
            mime_type,
            name: name.to_string(),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Guess an audio MIME type from a file extension
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let mime = match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "ogg" | "oga" => "audio/ogg",
        "opus" => "audio/opus",
        "m4a" | "mp4a" => "audio/mp4",
        "aac" => "audio/aac",
        "aif" | "aiff" => "audio/aiff",
        "webm" | "weba" => "audio/webm",
        _ => return None,
    };
    Some(mime)
}

/// What the user has staged for the next submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    mode: InputMode,
    staged_file: Option<StagedFile>,
    staged_lyrics: Option<String>,
    auxiliary_lyrics: Option<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn staged_file(&self) -> Option<&StagedFile> {
        self.staged_file.as_ref()
    }

    pub fn staged_lyrics(&self) -> Option<&str> {
        self.staged_lyrics.as_deref()
    }

    pub fn auxiliary_lyrics(&self) -> Option<&str> {
        self.auxiliary_lyrics.as_deref()
    }

    pub fn select_mode(&mut self, mode: InputMode) {
        self.mode = mode;
    }

    /// Validate and stage an audio file. A rejected file leaves nothing staged.
    pub fn stage_file(
        &mut self,
        bytes: Vec<u8>,
        mime_type: &str,
        name: &str,
    ) -> Result<(), FileRejected> {
        match StagedFile::new(bytes, mime_type, name) {
            Ok(file) => {
                self.staged_file = Some(file);
                Ok(())
            }
            Err(e) => {
                self.staged_file = None;
                Err(e)
            }
        }
    }

    pub fn clear_file(&mut self) {
        self.staged_file = None;
    }

    pub fn set_lyrics(&mut self, text: &str) {
        self.staged_lyrics = non_blank(text);
    }

    pub fn set_auxiliary_lyrics(&mut self, text: &str) {
        self.auxiliary_lyrics = non_blank(text);
    }

    /// Whether the active mode has something to submit
    pub fn can_submit(&self) -> bool {
        match self.mode {
            InputMode::Upload => self.staged_file.is_some(),
            InputMode::Lyrics => self.staged_lyrics.is_some(),
        }
    }
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_valid_audio() {
        let mut state = InputState::new();
        state
            .stage_file(vec![0u8; 3 * 1024 * 1024], "audio/mpeg", "demo.mp3")
            .unwrap();

        assert!(state.can_submit());
        assert_eq!(state.staged_file().unwrap().mime_type(), "audio/mpeg");
    }

    #[test]
    fn test_oversized_file_rejected_and_cleared() {
        let mut state = InputState::new();
        state.stage_file(vec![1u8; 16], "audio/wav", "ok.wav").unwrap();

        let err = state
            .stage_file(vec![0u8; 11 * 1024 * 1024], "audio/mpeg", "big.mp3")
            .unwrap_err();

        assert_eq!(err, FileRejected::TooLarge { size: 11 * 1024 * 1024 });
        assert!(state.staged_file().is_none());
        assert!(!state.can_submit());
    }

    #[test]
    fn test_exactly_max_size_accepted() {
        assert!(StagedFile::new(vec![0u8; MAX_FILE_BYTES], "audio/flac", "max.flac").is_ok());
    }

    #[test]
    fn test_non_audio_rejected() {
        let err = StagedFile::new(vec![1, 2, 3], "video/mp4", "clip.mp4").unwrap_err();
        assert_eq!(err, FileRejected::UnsupportedType("video/mp4".into()));
        assert_eq!(
            StagedFile::new(vec![], "audio/mpeg", "empty.mp3").unwrap_err(),
            FileRejected::Empty
        );
    }

    #[test]
    fn test_lyrics_mode_requires_text() {
        let mut state = InputState::new();
        state.select_mode(InputMode::Lyrics);
        assert!(!state.can_submit());

        state.set_lyrics("   \n ");
        assert!(!state.can_submit());

        state.set_lyrics("  walking down the old road alone\n");
        assert!(state.can_submit());
        assert_eq!(state.staged_lyrics(), Some("walking down the old road alone"));
    }

    #[test]
    fn test_mode_switch_keeps_staged_inputs() {
        let mut state = InputState::new();
        state.stage_file(vec![1u8; 8], "audio/ogg", "a.ogg").unwrap();
        state.select_mode(InputMode::Lyrics);
        assert!(!state.can_submit());
        state.select_mode(InputMode::Upload);
        assert!(state.can_submit());
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("song.MP3")), Some("audio/mpeg"));
        assert_eq!(mime_for_path(Path::new("take2.wav")), Some("audio/wav"));
        assert_eq!(mime_for_path(Path::new("notes.txt")), None);
        assert_eq!(mime_for_path(Path::new("noext")), None);
    }
}
