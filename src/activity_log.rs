//! Activity Logging Module
//!
//! Provides structured activity logging for auditing and debugging.
//! IMPORTANT: This module must NEVER log user content.
//!
//! What IS logged:
//! - Batch sizes, result counts, and positions
//! - Timestamps and durations
//! - Event types and outcomes (success/failure)
//! - Payload sizes and file names
//! - Option names (style, tone, language, aspect ratio)
//! - Error messages (sanitized)
//!
//! What is NOT logged:
//! - Generated prompt text
//! - Negative-prompt text
//! - Image bytes or preview data URLs
//! - Any free-text user content

use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Guard that must be held for the duration of the application
/// to ensure logs are flushed before exit
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize the activity logging system
///
/// Sets up dual logging:
/// - Console output (human-readable, for development)
/// - File output (JSON, for auditing and analysis)
///
/// Log files are stored in ~/.promptstudio/logs/
/// with daily rotation
pub fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    // Create rolling file appender (daily rotation)
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "activity.log");

    // Non-blocking writer for file output
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Store the guard to keep logging active
    LOG_GUARD.set(guard).ok();

    // File layer - JSON format for structured logging with explicit UTC timestamps
    let file_layer = fmt::layer()
        .json()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(non_blocking)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // Console layer - human-readable format
    let console_layer = fmt::layer()
        .with_target(true)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    // Combine layers
    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .init();

    info!(
        event = "logging_initialized",
        log_dir = %log_dir.display(),
        "Activity logging system initialized"
    );

    Ok(())
}

/// Get the log directory path
fn get_log_directory() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let home = dirs::home_dir().ok_or("Could not determine home directory")?;
    Ok(home.join(".promptstudio").join("logs"))
}

// ============================================================================
// Application Lifecycle Events
// ============================================================================

/// Log application start
pub fn log_app_start(version: &str) {
    info!(
        event = "app_start",
        version = %version,
        "Application started"
    );
}

// ============================================================================
// Batch Generation Events
// ============================================================================

/// Log batch fan-out start (option names only, no free text)
pub fn log_batch_start(
    batch_size: usize,
    style: &str,
    tone: &str,
    language: &str,
    enhanced: bool,
    aspect_ratio: &str,
) {
    info!(
        event = "batch_start",
        batch_size = batch_size,
        style = %style,
        tone = %tone,
        language = %language,
        enhanced = enhanced,
        aspect_ratio = %aspect_ratio,
        "Prompt generation batch started"
    );
}

/// Log batch completion
pub fn log_batch_complete(batch_size: usize, failed_count: usize, duration_ms: u64) {
    info!(
        event = "batch_complete",
        batch_size = batch_size,
        failed_count = failed_count,
        duration_ms = duration_ms,
        "Prompt generation batch completed"
    );
}

/// Log a single contained per-image failure (position, not content)
pub fn log_item_failure(image_index: usize, error: &str) {
    warn!(
        event = "item_failure",
        image_index = image_index,
        error = %error,
        "Prompt generation failed for one image"
    );
}

/// Log a single-card regeneration attempt
pub fn log_regenerate(result_id: &str, success: bool, error: Option<&str>) {
    if success {
        info!(
            event = "regenerate",
            result_id = %result_id,
            success = true,
            "Prompt regenerated"
        );
    } else {
        warn!(
            event = "regenerate",
            result_id = %result_id,
            success = false,
            error = error,
            "Prompt regeneration failed"
        );
    }
}

// ============================================================================
// History Events
// ============================================================================

/// Log a batch being recorded into history
pub fn log_history_record(batch_size: usize, total_items: usize, evicted: bool) {
    info!(
        event = "history_record",
        batch_size = batch_size,
        total_items = total_items,
        evicted = evicted,
        "Batch recorded to history"
    );
}

/// Log a history persistence problem (best-effort cache, never fatal)
pub fn log_persistence_warning(context: &str, error: &str) {
    warn!(
        event = "persistence_warning",
        context = %context,
        error = %error,
        "History persistence problem"
    );
}

// ============================================================================
// Export Events
// ============================================================================

/// Log an export (format and sizes, not content)
pub fn log_export(format: &str, prompt_count: usize, size_bytes: usize) {
    info!(
        event = "export",
        format = %format,
        prompt_count = prompt_count,
        size_bytes = size_bytes,
        "Results exported"
    );
}
