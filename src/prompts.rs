//! Prompt construction for the Gemini requests.
//!
//! The master instruction below is what turns an uploaded image into an
//! image-generator prompt; the regenerate instruction rephrases an
//! existing prompt while preserving its subject. Both are pure string
//! builders so they can be tested without a network.

use crate::options::{AspectRatio, GenerationOptions, PromptStyle, PromptTone};

/// Build the master instruction sent alongside an image
pub fn image_prompt(options: &GenerationOptions) -> String {
    let mut prompt = String::from(
        "You are a world-class prompt engineer specialised in creating prompts \
for AI image generation tools (like Midjourney, Leonardo, etc.).\n\
\n\
Your job is to generate a single, high-quality prompt based on the provided \
image that a creative user can input into an AI image-generator.\n\
\n\
Your prompt must include:\n\
- A concise description of the main subject of the image.\n\
- The environment / background / scene setting.\n\
- The camera angle & lens style (if relevant), e.g. \"wide-angle\", \"close-up\", \"bird's-eye view\".\n\
- The lighting mood & tone, e.g. \"golden hour\", \"soft diffused light\", \"dramatic chiaroscuro\".\n\
- The art style or medium matching the requested style.\n",
    );

    prompt.push_str(&format!(
        "\nTarget art style: {}.\nOverall tone and mood: {}.\n",
        options.style.name(),
        options.tone.name()
    ));

    prompt.push_str(&format!(
        "Write the prompt in {}.\n",
        options.language.name()
    ));

    if options.enhanced {
        prompt.push_str(
            "Enrich the prompt with fine-grained detail: colour palette, \
texture hints, time of day, and weather if relevant.\n",
        );
    }

    let negative = options.negative_prompt.trim();
    if !negative.is_empty() {
        prompt.push_str(&format!(
            "The prompt must steer the generator away from the following \
elements: {}.\n",
            negative
        ));
    }

    match options.aspect_ratio {
        AspectRatio::Auto => prompt.push_str(
            "End the prompt with an aspect ratio tag (for example: \"--ar 9:16\") \
suitable for the image provided.\n",
        ),
        ratio => prompt.push_str(&format!(
            "End the prompt with the aspect ratio tag \"--ar {}\".\n",
            ratio.tag()
        )),
    }

    prompt.push_str(
        "\nGenerate exactly one prompt. Do not add any extra commentary, \
titles, or explanations. Only output the prompt itself.",
    );

    prompt
}

/// Build the instruction for rewording one existing prompt
pub fn regenerate_prompt(existing: &str, style: PromptStyle, tone: PromptTone) -> String {
    format!(
        "You are a world-class prompt engineer for AI image generation tools.\n\
\n\
Rephrase the following prompt into a fresh variant. Preserve the core \
subject matter and composition, keep the \"{}\" art style and the \"{}\" \
tone, but vary the wording, descriptive details, and emphasis.\n\
\n\
Prompt to rephrase:\n{}\n\
\n\
Output only the rephrased prompt, with no commentary.",
        style.name(),
        tone.name(),
        existing
    )
}
