use thiserror::Error;

use songcritic_critique::{Inconsistency, ParseError};
use songcritic_service::ServiceError;

use crate::prompt::InvalidInputError;

#[derive(Error, Debug)]
pub enum CritiqueError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    #[error("Remote service error: {0}")]
    RemoteService(#[from] ServiceError),

    #[error("Malformed response: {0}")]
    MalformedResponse(ParseError),

    #[error("Inconsistent response: {} issue(s)", .0.len())]
    InconsistentResponse(Vec<Inconsistency>),

    #[error("A submission is already in progress")]
    SubmissionInProgress,
}

impl From<ParseError> for CritiqueError {
    fn from(error: ParseError) -> Self {
        match error {
            ParseError::Inconsistent(issues) => CritiqueError::InconsistentResponse(issues),
            other => CritiqueError::MalformedResponse(other),
        }
    }
}

impl CritiqueError {
    /// Short machine-readable kind for logs
    pub fn kind(&self) -> &'static str {
        match self {
            CritiqueError::InvalidInput(_) => "invalid_input",
            CritiqueError::RemoteService(_) => "remote_service",
            CritiqueError::MalformedResponse(_) => "malformed_response",
            CritiqueError::InconsistentResponse(_) => "inconsistent_response",
            CritiqueError::SubmissionInProgress => "submission_in_progress",
        }
    }

    /// Fixed message shown to the user. Details stay in the diagnostic log.
    pub fn user_message(&self) -> &'static str {
        match self {
            CritiqueError::InvalidInput(_) => {
                "Please upload an audio file or enter lyrics before requesting a critique."
            }
            CritiqueError::RemoteService(_) => {
                "The critique service could not process your request. Files larger than 10 MB are a common cause; please try a smaller file."
            }
            CritiqueError::MalformedResponse(_) => {
                "The critique could not be read because the response was not in the expected format. Please try again."
            }
            CritiqueError::InconsistentResponse(_) => {
                "The critique contained contradictory results and was discarded. Please try again."
            }
            CritiqueError::SubmissionInProgress => "A critique is already in progress.",
        }
    }
}
