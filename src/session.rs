//! Studio session state
//!
//! Owns the "current results" view and the history store on behalf of
//! whatever shell embeds this crate. Batch outcomes become frozen
//! prompt cards here; per-card regeneration replaces one card's text in
//! place and never touches history entries already recorded.

use std::sync::Arc;

use crate::activity_log;
use crate::batch::{generate_batch_with_timeout, BatchError, Outcome};
use crate::config::Config;
use crate::gemini_client::{GeminiClient, PromptGenerator};
use crate::history::{HistoryItem, HistoryStore};
use crate::options::{GenerationOptions, PromptResult, SourceImage};

pub struct StudioSession {
    history: HistoryStore,
    results: Vec<PromptResult>,
}

impl StudioSession {
    /// Construct once at process start; the session owns the store
    pub fn new(history: HistoryStore) -> Self {
        Self {
            history,
            results: Vec::new(),
        }
    }

    /// The current results view, in batch input order
    pub fn results(&self) -> &[PromptResult] {
        &self.results
    }

    /// Past batches, newest first
    pub fn history(&self) -> &[HistoryItem] {
        self.history.items()
    }

    /// Turn a completed batch into the current results view and record
    /// it into history.
    ///
    /// `previews` are the per-image preview data URLs and must align
    /// positionally with `outcomes`, one per image; a length mismatch is
    /// a caller bug and panics rather than silently truncating. Failed
    /// slots become cards carrying their error marker as text, so a
    /// partially failed batch still renders one card per image.
    pub fn apply_batch(
        &mut self,
        previews: Vec<String>,
        outcomes: Vec<Outcome>,
        options: &GenerationOptions,
    ) -> &[PromptResult] {
        assert_eq!(
            previews.len(),
            outcomes.len(),
            "previews must align positionally with outcomes"
        );

        let results: Vec<PromptResult> = outcomes
            .into_iter()
            .zip(previews)
            .map(|(outcome, preview)| PromptResult::new(outcome.into_text(), preview, options))
            .collect();

        self.history.record(results.clone());
        self.results = results;
        &self.results
    }

    /// Run a full generation batch against the configured Gemini client
    /// and install the outcome as the current view.
    ///
    /// Credential resolution happens before any network attempt: a
    /// missing key surfaces as [`BatchError::MissingCredential`] and
    /// halts the batch, exactly like any other batch-level fault.
    pub async fn run_batch(
        &mut self,
        config: &Config,
        images: Vec<SourceImage>,
        options: &GenerationOptions,
    ) -> Result<&[PromptResult], BatchError> {
        let client = Arc::new(GeminiClient::from_config(config)?);
        let previews: Vec<String> = images.iter().map(|i| i.preview_data_url()).collect();
        let outcomes =
            generate_batch_with_timeout(client, images, options, config.request_timeout()).await?;
        Ok(self.apply_batch(previews, outcomes, options))
    }

    /// Reword one card in place. On failure the prior text stays and the
    /// error is returned for card-scoped display.
    pub async fn regenerate_card<C>(&mut self, client: &C, id: &str) -> Result<(), String>
    where
        C: PromptGenerator,
    {
        let card = match self.results.iter_mut().find(|r| r.id == id) {
            Some(card) => card,
            None => return Err(format!("No prompt card with id {}", id)),
        };

        match client
            .regenerate_prompt(&card.prompt, card.style, card.tone)
            .await
        {
            Ok(new_prompt) => {
                card.replace_prompt(new_prompt);
                activity_log::log_regenerate(id, true, None);
                Ok(())
            }
            Err(e) => {
                activity_log::log_regenerate(id, false, Some(&e.to_string()));
                Err(e.to_string())
            }
        }
    }

    /// Restore a past batch's results as the current view
    pub fn reuse(&mut self, item: &HistoryItem) {
        self.results = item.results.clone();
    }
}
