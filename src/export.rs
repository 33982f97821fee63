//! Export Encoder
//!
//! Pure transforms from a result set to downloadable artifacts: a
//! human-readable text report and a structured JSON document. Result
//! ids and image previews are deliberately left out of the JSON payload;
//! they are session-local, and a preview data URL can be megabytes of
//! inline binary. Delivering the encoded string to disk is the separate
//! `save_to_dir` collaborator.

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::activity_log;
use crate::options::{Language, PromptResult, PromptStyle, PromptTone};

const DELIMITER: &str = "========================================";

/// JSON export schema: ids and preview URLs are excluded by construction
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub exported_at: String,
    pub prompt_count: usize,
    pub prompts: Vec<ExportedPrompt>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportedPrompt {
    pub style: PromptStyle,
    pub tone: PromptTone,
    pub language: Language,
    pub prompt: String,
}

/// Encode the results as a human-readable text report, in input order
pub fn to_text(results: &[PromptResult]) -> String {
    let mut content = format!(
        "Image Prompt Studio Export\nGenerated on: {}\n\n{}\n\n",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        DELIMITER
    );

    for (index, result) in results.iter().enumerate() {
        content.push_str(&format!("--- Prompt {} ---\n", index + 1));
        content.push_str(&format!("Style: {}\n", result.style.name()));
        content.push_str(&format!("Tone: {}\n", result.tone.name()));
        content.push_str(&format!("Language: {}\n\n", result.language.name()));
        content.push_str(&format!("{}\n\n", result.prompt));
        content.push_str(DELIMITER);
        content.push_str("\n\n");
    }

    activity_log::log_export("txt", results.len(), content.len());
    content
}

/// Encode the results as a pretty-printed JSON document, in input order
pub fn to_json(results: &[PromptResult]) -> String {
    let document = ExportDocument {
        exported_at: Utc::now().to_rfc3339(),
        prompt_count: results.len(),
        prompts: results
            .iter()
            .map(|result| ExportedPrompt {
                style: result.style,
                tone: result.tone,
                language: result.language,
                prompt: result.prompt.clone(),
            })
            .collect(),
    };

    // The document is plain strings and counts; serialization cannot fail
    let content =
        serde_json::to_string_pretty(&document).expect("export document is serializable");
    activity_log::log_export("json", results.len(), content.len());
    content
}

/// Filename for a text export, unique per millisecond
pub fn text_filename() -> String {
    format!("prompts_{}.txt", Utc::now().timestamp_millis())
}

/// Filename for a JSON export, unique per millisecond
pub fn json_filename() -> String {
    format!("prompts_{}.json", Utc::now().timestamp_millis())
}

/// Deliver an encoded export to disk
pub fn save_to_dir(dir: &Path, filename: &str, contents: &str) -> Result<PathBuf, String> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create export directory: {}", e))?;

    let path = dir.join(filename);
    let mut file =
        File::create(&path).map_err(|e| format!("Failed to create export file: {}", e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| format!("Failed to write export file: {}", e))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::GenerationOptions;
    use tempfile::TempDir;

    fn sample_results() -> Vec<PromptResult> {
        let first = GenerationOptions {
            style: PromptStyle::Anime,
            tone: PromptTone::Happy,
            language: Language::Japanese,
            ..GenerationOptions::default()
        };
        let second = GenerationOptions::default();
        vec![
            PromptResult::new("a shrine under sakura", "data:image/png;base64,AA==", &first),
            PromptResult::new("a harbor in fog", "data:image/jpeg;base64,BB==", &second),
        ]
    }

    #[test]
    fn test_text_contains_prompts_in_order() {
        let results = sample_results();
        let text = to_text(&results);

        let first = text.find("a shrine under sakura").unwrap();
        let second = text.find("a harbor in fog").unwrap();
        assert!(first < second);
        assert!(text.starts_with("Image Prompt Studio Export"));
        assert!(text.contains("--- Prompt 1 ---"));
        assert!(text.contains("--- Prompt 2 ---"));
        assert!(text.contains("Style: Anime"));
        assert!(text.contains("Language: Japanese"));
    }

    #[test]
    fn test_text_for_empty_results_is_just_the_header() {
        let text = to_text(&[]);
        assert!(text.starts_with("Image Prompt Studio Export"));
        assert!(!text.contains("--- Prompt"));
    }

    #[test]
    fn test_json_round_trips() {
        let results = sample_results();
        let json = to_json(&results);

        let parsed: ExportDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.prompt_count, results.len());
        for (i, prompt) in parsed.prompts.iter().enumerate() {
            assert_eq!(prompt.prompt, results[i].prompt);
        }
        assert_eq!(parsed.prompts[0].style, PromptStyle::Anime);
    }

    #[test]
    fn test_json_excludes_session_local_fields() {
        let results = sample_results();
        let json = to_json(&results);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for prompt in value["prompts"].as_array().unwrap() {
            let fields = prompt.as_object().unwrap();
            assert!(!fields.contains_key("id"));
            assert!(!fields.contains_key("imagePreviewUrl"));
        }
        assert!(!json.contains("base64,AA=="));
    }

    #[test]
    fn test_filenames_carry_extension() {
        assert!(text_filename().starts_with("prompts_"));
        assert!(text_filename().ends_with(".txt"));
        assert!(json_filename().ends_with(".json"));
    }

    #[test]
    fn test_save_to_dir_writes_contents() {
        let dir = TempDir::new().unwrap();
        let path = save_to_dir(dir.path(), "prompts_test.txt", "report body").unwrap();

        assert!(path.ends_with("prompts_test.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "report body");
    }

    #[test]
    fn test_save_to_dir_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("exports").join("today");
        let path = save_to_dir(&nested, "prompts_test.json", "{}").unwrap();
        assert!(path.exists());
    }
}
