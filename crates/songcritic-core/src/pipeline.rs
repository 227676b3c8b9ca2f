use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use songcritic_critique::{render, ConsistencyPolicy, CritiqueResult, RenderedCritique};
use songcritic_logging::{LogEvent, Logger};
use songcritic_service::{CritiqueModel, CritiqueService};

use crate::error::CritiqueError;
use crate::input::InputState;
use crate::prompt::PromptBuilder;
use crate::requester::CritiqueRequester;

/// Build -> request -> parse -> render, for one input snapshot
pub struct CritiquePipeline<'a> {
    service: &'a dyn CritiqueService,
    model: CritiqueModel,
    policy: ConsistencyPolicy,
    logger: Arc<Logger>,
}

impl<'a> CritiquePipeline<'a> {
    pub fn new(service: &'a dyn CritiqueService, logger: Arc<Logger>) -> Self {
        Self {
            service,
            model: CritiqueModel::default(),
            policy: ConsistencyPolicy::default(),
            logger,
        }
    }

    pub fn with_model(mut self, model: CritiqueModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_policy(mut self, policy: ConsistencyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn model(&self) -> CritiqueModel {
        self.model
    }

    pub(crate) fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Produce a validated critique without rendering it
    pub async fn fetch(&self, input: &InputState) -> Result<CritiqueResult, CritiqueError> {
        let payload = PromptBuilder::build(input)?;

        if let (Some(file), Some(media)) = (input.staged_file(), payload.media.as_ref()) {
            self.logger.log(&LogEvent::MediaEncoded {
                name: file.name().to_string(),
                mime_type: media.mime_type.clone(),
                bytes: file.len(),
            });
        }

        self.logger.log(&LogEvent::RequestSent {
            model: self.model.id().to_string(),
            temperature: self.model.temperature(),
            media_parts: usize::from(payload.media.is_some()),
            instruction_len: payload.instruction.len(),
        });

        let start = Instant::now();
        let text = CritiqueRequester::new(self.service)
            .request(&payload, self.model)
            .await?;

        self.logger.log(&LogEvent::ResponseReceived {
            response_len: text.len(),
            duration_secs: start.elapsed().as_secs_f64(),
        });

        let context = payload.mode.parse_context().with_policy(self.policy);
        let (result, issues) = CritiqueResult::parse_checked(&text, &context).map_err(|e| {
            error!(error = %e, raw_response = %text, "Critique response rejected");
            CritiqueError::from(e)
        })?;

        if !issues.is_empty() {
            self.logger.log(&LogEvent::ResponseInconsistent {
                issues: issues.iter().map(|i| i.to_string()).collect(),
            });
        }

        Ok(result)
    }

    /// Produce both rendered views
    pub async fn run(&self, input: &InputState) -> Result<RenderedCritique, CritiqueError> {
        let result = self.fetch(input).await?;
        let rendered = render(&result);

        info!(
            is_instrumental = result.is_instrumental,
            has_summary = rendered.summary.is_some(),
            "Critique rendered"
        );
        self.logger.log(&LogEvent::CritiqueRendered {
            is_instrumental: result.is_instrumental,
            final_score: result.lyrical_analysis.as_ref().map(|l| l.final_score),
            document_len: rendered.document.len(),
        });

        Ok(rendered)
    }
}
