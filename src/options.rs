//! Data model for prompt generation.
//!
//! Everything a batch needs travels through here: the fixed option
//! enumerations the UI exposes, the immutable per-batch
//! [`GenerationOptions`] value object, the raw [`SourceImage`] inputs,
//! and the [`PromptResult`] cards a batch produces.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Artistic style applied to every prompt in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptStyle {
    Cinematic,
    Photorealistic,
    Anime,
    #[serde(rename = "Fantasy Art")]
    FantasyArt,
    Minimalist,
    Portrait,
    #[serde(rename = "Product Photography")]
    ProductPhotography,
}

impl PromptStyle {
    /// Human-readable name as shown in the style picker
    pub fn name(&self) -> &'static str {
        match self {
            PromptStyle::Cinematic => "Cinematic",
            PromptStyle::Photorealistic => "Photorealistic",
            PromptStyle::Anime => "Anime",
            PromptStyle::FantasyArt => "Fantasy Art",
            PromptStyle::Minimalist => "Minimalist",
            PromptStyle::Portrait => "Portrait",
            PromptStyle::ProductPhotography => "Product Photography",
        }
    }

    /// Parse a style from its display name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "cinematic" => Some(PromptStyle::Cinematic),
            "photorealistic" => Some(PromptStyle::Photorealistic),
            "anime" => Some(PromptStyle::Anime),
            "fantasy art" => Some(PromptStyle::FantasyArt),
            "minimalist" => Some(PromptStyle::Minimalist),
            "portrait" => Some(PromptStyle::Portrait),
            "product photography" => Some(PromptStyle::ProductPhotography),
            _ => None,
        }
    }

    /// All styles, in picker order
    pub fn all() -> Vec<PromptStyle> {
        vec![
            PromptStyle::Cinematic,
            PromptStyle::Photorealistic,
            PromptStyle::Anime,
            PromptStyle::FantasyArt,
            PromptStyle::Minimalist,
            PromptStyle::Portrait,
            PromptStyle::ProductPhotography,
        ]
    }
}

/// Mood applied to every prompt in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptTone {
    Cinematic,
    Dramatic,
    Happy,
    Eerie,
    Mystical,
}

impl PromptTone {
    pub fn name(&self) -> &'static str {
        match self {
            PromptTone::Cinematic => "Cinematic",
            PromptTone::Dramatic => "Dramatic",
            PromptTone::Happy => "Happy",
            PromptTone::Eerie => "Eerie",
            PromptTone::Mystical => "Mystical",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "cinematic" => Some(PromptTone::Cinematic),
            "dramatic" => Some(PromptTone::Dramatic),
            "happy" => Some(PromptTone::Happy),
            "eerie" => Some(PromptTone::Eerie),
            "mystical" => Some(PromptTone::Mystical),
            _ => None,
        }
    }
}

/// Output language for the generated prompt text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    English,
    French,
    Japanese,
    Bengali,
}

impl Language {
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::French => "French",
            Language::Japanese => "Japanese",
            Language::Bengali => "Bengali",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "english" => Some(Language::English),
            "french" => Some(Language::French),
            "japanese" => Some(Language::Japanese),
            "bengali" => Some(Language::Bengali),
            _ => None,
        }
    }
}

/// Aspect ratio directive appended to generated prompts.
///
/// `Auto` lets the model pick a ratio that suits the source image;
/// the fixed variants force a specific `W:H` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "9:16")]
    Vertical,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "3:4")]
    Portrait,
}

impl AspectRatio {
    /// The `W:H` tag string ("auto" for the automatic variant)
    pub fn tag(&self) -> &'static str {
        match self {
            AspectRatio::Auto => "auto",
            AspectRatio::Square => "1:1",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Vertical => "9:16",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Portrait => "3:4",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "auto" => Some(AspectRatio::Auto),
            "1:1" => Some(AspectRatio::Square),
            "16:9" => Some(AspectRatio::Widescreen),
            "9:16" => Some(AspectRatio::Vertical),
            "4:3" => Some(AspectRatio::Landscape),
            "3:4" => Some(AspectRatio::Portrait),
            _ => None,
        }
    }
}

/// The shared option set for one batch.
///
/// Passed by value into every request of a batch and never mutated
/// mid-batch; requests share it read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    pub style: PromptStyle,
    pub tone: PromptTone,
    pub language: Language,
    /// Elements the generated prompt should steer away from; may be empty
    pub negative_prompt: String,
    /// Ask the model for extra fine-grained detail
    pub enhanced: bool,
    pub aspect_ratio: AspectRatio,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            style: PromptStyle::Cinematic,
            tone: PromptTone::Cinematic,
            language: Language::English,
            negative_prompt: String::new(),
            enhanced: false,
            aspect_ratio: AspectRatio::Auto,
        }
    }
}

/// One uploaded image, as raw bytes plus its MIME type
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl SourceImage {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    /// Base64 payload for the Gemini inline-data part
    pub fn base64_data(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// Data URL used as the card preview for this image
    pub fn preview_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data())
    }
}

/// One generated prompt card.
///
/// Style, tone and language are denormalized copies of the options in
/// effect at generation time; they stay frozen even if the user later
/// changes the global options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptResult {
    pub id: String,
    pub prompt: String,
    pub image_preview_url: String,
    pub style: PromptStyle,
    pub tone: PromptTone,
    pub language: Language,
}

impl PromptResult {
    pub fn new(
        prompt: impl Into<String>,
        image_preview_url: impl Into<String>,
        options: &GenerationOptions,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            prompt: prompt.into(),
            image_preview_url: image_preview_url.into(),
            style: options.style,
            tone: options.tone,
            language: options.language,
        }
    }

    /// Replace the prompt text in place (single-card regenerate)
    pub fn replace_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }
}
