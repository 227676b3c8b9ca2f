use tracing::debug;

use songcritic_critique::{critique_schema, SYSTEM_INSTRUCTION};
use songcritic_service::{
    Contents, CritiqueModel, CritiqueRequest, CritiqueService, GenerationConfig, ServiceError,
};

use crate::prompt::PromptPayload;

const RESPONSE_MIME_TYPE: &str = "application/json";

/// Issues one call to the remote critique service
pub struct CritiqueRequester<'a> {
    service: &'a dyn CritiqueService,
}

impl<'a> CritiqueRequester<'a> {
    pub fn new(service: &'a dyn CritiqueService) -> Self {
        Self { service }
    }

    /// Wrap a prompt with the schema, system instruction and tier temperature
    pub fn build_request(payload: &PromptPayload, model: CritiqueModel) -> CritiqueRequest {
        CritiqueRequest {
            model: model.id().to_string(),
            contents: Contents {
                parts: payload.parts(),
            },
            config: GenerationConfig {
                system_instruction: SYSTEM_INSTRUCTION.to_string(),
                temperature: model.temperature(),
                response_mime_type: RESPONSE_MIME_TYPE.to_string(),
                response_schema: critique_schema().to_response_schema(),
            },
        }
    }

    /// Send the request once and return the raw response text
    pub async fn request(
        &self,
        payload: &PromptPayload,
        model: CritiqueModel,
    ) -> Result<String, ServiceError> {
        let request = Self::build_request(payload, model);

        debug!(
            service = self.service.name(),
            model = %model,
            mode = payload.mode.as_str(),
            "Requesting critique"
        );

        let response = self.service.generate(&request).await?;
        Ok(response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InputMode, InputState, PromptBuilder};

    #[test]
    fn test_request_carries_schema_and_tier_temperature() {
        let mut state = InputState::new();
        state.select_mode(InputMode::Lyrics);
        state.set_lyrics("walking down the old road alone");
        let payload = PromptBuilder::build(&state).unwrap();

        let flash = CritiqueRequester::build_request(&payload, CritiqueModel::Flash);
        assert_eq!(flash.model, "gemini-2.5-flash");
        assert_eq!(flash.config.temperature, 0.0);
        assert_eq!(flash.config.response_mime_type, "application/json");
        assert_eq!(flash.config.response_schema["type"], "OBJECT");
        assert_eq!(flash.config.system_instruction, SYSTEM_INSTRUCTION);
        assert_eq!(flash.media_count(), 0);

        let pro = CritiqueRequester::build_request(&payload, CritiqueModel::Pro);
        assert_eq!(pro.model, "gemini-2.5-pro");
        assert!((pro.config.temperature - 0.1).abs() < f64::EPSILON);
    }
}
