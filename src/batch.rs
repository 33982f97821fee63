//! Batch Generation Orchestrator
//!
//! Fans out one generation request per image, all concurrent, and joins
//! them back into a result list positionally aligned with the input.
//! Per-image failures are contained into placeholder outcomes; partial
//! success is the normal case, not an exceptional one. Only faults in
//! the orchestration itself abort the batch.

use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::activity_log;
use crate::gemini_client::{GenerationError, PromptGenerator};
use crate::options::{GenerationOptions, SourceImage};

/// Default per-image request timeout. The upstream call has no
/// cancellation path of its own, so a stalled request would otherwise
/// hold its slot open forever.
pub const DEFAULT_ITEM_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-image result, positionally aligned with the input images
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The generated prompt text
    Prompt(String),
    /// Placeholder error marker naming the failing image
    Failed(String),
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// The displayable text for this slot: the prompt, or the error marker
    pub fn into_text(self) -> String {
        match self {
            Outcome::Prompt(text) => text,
            Outcome::Failed(message) => message,
        }
    }

    pub fn as_text(&self) -> &str {
        match self {
            Outcome::Prompt(text) => text,
            Outcome::Failed(message) => message,
        }
    }
}

/// Batch-level failures. None of these carry partial results: when the
/// orchestration itself faults, the whole batch is aborted.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("No images were provided for generation")]
    NoInput,

    #[error("Gemini API key is not configured")]
    MissingCredential,

    #[error("Batch orchestration failed: {0}")]
    Orchestration(String),
}

impl From<GenerationError> for BatchError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::MissingCredential => BatchError::MissingCredential,
            other => BatchError::Orchestration(other.to_string()),
        }
    }
}

/// Run one generation batch with the default per-image timeout
pub async fn generate_batch<C>(
    client: Arc<C>,
    images: Vec<SourceImage>,
    options: &GenerationOptions,
) -> Result<Vec<Outcome>, BatchError>
where
    C: PromptGenerator + 'static,
{
    generate_batch_with_timeout(client, images, options, DEFAULT_ITEM_TIMEOUT).await
}

/// Run one generation batch.
///
/// Spawns one task per image; every task gets its own clone of the
/// read-only option set, so there is no shared mutable state between
/// requests. Outcomes are collected by joining the handles in input
/// order, so outcome[i] always corresponds to images[i] regardless of
/// completion order. A task that panics or is cancelled is an
/// orchestration fault and aborts the batch.
pub async fn generate_batch_with_timeout<C>(
    client: Arc<C>,
    images: Vec<SourceImage>,
    options: &GenerationOptions,
    item_timeout: Duration,
) -> Result<Vec<Outcome>, BatchError>
where
    C: PromptGenerator + 'static,
{
    if images.is_empty() {
        return Err(BatchError::NoInput);
    }

    let total = images.len();
    let started = Instant::now();
    activity_log::log_batch_start(
        total,
        options.style.name(),
        options.tone.name(),
        options.language.name(),
        options.enhanced,
        options.aspect_ratio.tag(),
    );

    let mut handles = Vec::with_capacity(total);
    for (index, image) in images.into_iter().enumerate() {
        let client = Arc::clone(&client);
        let options = options.clone();
        handles.push(tokio::spawn(async move {
            let request = client.generate_prompt_for_image(&image, &options);
            match tokio::time::timeout(item_timeout, request).await {
                Ok(Ok(prompt)) => Outcome::Prompt(prompt),
                Ok(Err(e)) => {
                    activity_log::log_item_failure(index + 1, &e.to_string());
                    Outcome::Failed(format!(
                        "Error generating prompt for image {}: {}",
                        index + 1,
                        e
                    ))
                }
                Err(_) => {
                    activity_log::log_item_failure(index + 1, "request timed out");
                    Outcome::Failed(format!(
                        "Error generating prompt for image {}: request timed out",
                        index + 1
                    ))
                }
            }
        }));
    }

    let mut outcomes = Vec::with_capacity(total);
    for (index, handle) in handles.into_iter().enumerate() {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                return Err(BatchError::Orchestration(format!(
                    "worker for image {} did not complete: {}",
                    index + 1,
                    e
                )));
            }
        }
    }

    let failed = outcomes.iter().filter(|o| o.is_failed()).count();
    activity_log::log_batch_complete(total, failed, started.elapsed().as_millis() as u64);

    Ok(outcomes)
}
