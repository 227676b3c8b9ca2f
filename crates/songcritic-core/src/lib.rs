mod error;
mod input;
mod pipeline;
mod prompt;
mod requester;
mod session;

pub use error::CritiqueError;
pub use input::{mime_for_path, FileRejected, InputMode, InputState, StagedFile, MAX_FILE_BYTES};
pub use pipeline::CritiquePipeline;
pub use prompt::{InvalidInputError, PromptBuilder, PromptMode, PromptPayload};
pub use requester::CritiqueRequester;
pub use session::{CritiqueSession, DisplayArea};
