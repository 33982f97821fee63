//! Prompt Studio core
//!
//! The engine behind an image-to-prompt studio: fan out one Gemini
//! request per uploaded image, join the outcomes in input order, keep a
//! capped local history of past batches, and export result sets as text
//! or JSON. The visual shell lives elsewhere; this crate is everything
//! underneath it.

pub mod activity_log;
pub mod batch;
pub mod config;
pub mod export;
pub mod gemini_client;
pub mod history;
pub mod options;
pub mod prompts;
pub mod session;

pub use batch::{generate_batch, generate_batch_with_timeout, BatchError, Outcome};
pub use config::Config;
pub use gemini_client::{GeminiClient, GenerationError, PromptGenerator};
pub use history::{HistoryItem, HistoryStore, HISTORY_CAP};
pub use options::{
    AspectRatio, GenerationOptions, Language, PromptResult, PromptStyle, PromptTone, SourceImage,
};
pub use session::StudioSession;
