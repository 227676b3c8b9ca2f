use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;
use tracing::{error, info};

use songcritic_critique::RenderedCritique;
use songcritic_logging::LogEvent;

use crate::error::CritiqueError;
use crate::input::InputState;
use crate::pipeline::CritiquePipeline;

/// What the display surface currently shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DisplayArea {
    #[default]
    Empty,
    Loading,
    Critique(RenderedCritique),
    Failed { message: String },
}

/// Input state, display state and the submit-in-progress flag for one user
#[derive(Debug, Default)]
pub struct CritiqueSession {
    input: Mutex<InputState>,
    display: Mutex<DisplayArea>,
    submitting: AtomicBool,
}

/// Held for the duration of a submission. Dropping it re-enables submission
/// and hides the loading indicator, whatever the outcome.
struct SubmissionGuard<'a> {
    flag: &'a AtomicBool,
    display: &'a Mutex<DisplayArea>,
}

impl<'a> SubmissionGuard<'a> {
    fn acquire(flag: &'a AtomicBool, display: &'a Mutex<DisplayArea>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { flag, display })
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        let mut display = lock(self.display);
        if *display == DisplayArea::Loading {
            *display = DisplayArea::Empty;
        }
        self.flag.store(false, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl CritiqueSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutate the staged input. Refused while a submission is in flight.
    pub fn update_input<R>(
        &self,
        f: impl FnOnce(&mut InputState) -> R,
    ) -> Result<R, CritiqueError> {
        let mut input = lock(&self.input);
        if self.is_submitting() {
            return Err(CritiqueError::SubmissionInProgress);
        }
        Ok(f(&mut input))
    }

    pub fn input(&self) -> InputState {
        lock(&self.input).clone()
    }

    pub fn display(&self) -> DisplayArea {
        lock(&self.display).clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// Whether the submit control should be enabled
    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && lock(&self.input).can_submit()
    }

    /// Run one submission against the current input.
    ///
    /// The display is cleared before the request starts and ends up showing
    /// either the new critique or a fixed failure message, never a stale
    /// critique from an earlier submission.
    pub async fn submit(&self, pipeline: &CritiquePipeline<'_>) -> Result<(), CritiqueError> {
        let _guard = SubmissionGuard::acquire(&self.submitting, &self.display)
            .ok_or(CritiqueError::SubmissionInProgress)?;

        let snapshot = lock(&self.input).clone();
        *lock(&self.display) = DisplayArea::Loading;

        let logger = pipeline.logger();
        logger.log(&LogEvent::SubmissionStarted {
            mode: snapshot.mode().to_string(),
            model: pipeline.model().id().to_string(),
        });
        let start = Instant::now();

        let outcome = pipeline.run(&snapshot).await;

        let success = outcome.is_ok();
        let result = match outcome {
            Ok(rendered) => {
                *lock(&self.display) = DisplayArea::Critique(rendered);
                Ok(())
            }
            Err(e) => {
                error!(kind = e.kind(), error = %e, "Submission failed");
                logger.log(&LogEvent::SubmissionFailed {
                    kind: e.kind().to_string(),
                    detail: e.to_string(),
                });
                *lock(&self.display) = DisplayArea::Failed {
                    message: e.user_message().to_string(),
                };
                Err(e)
            }
        };

        let duration_secs = start.elapsed().as_secs_f64();
        info!(success, duration_secs, "Submission finished");
        logger.log(&LogEvent::SubmissionFinished {
            success,
            duration_secs,
        });

        result
    }
}
