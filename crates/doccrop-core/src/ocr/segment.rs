//! Re-segmentation of recognized text into headed sections by an LLM.
//!
//! The page posts `{"ocrText": ...}` to a relay, the relay forwards a chat
//! completion request upstream and passes the JSON answer straight back.
//! The answer is read as one formatted string at
//! `choices[0].message.content`: sections separated by blank lines, each
//! starting with its heading line.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RecognitionError;
use crate::config::ServiceConfig;

pub const LLM_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const LLM_MODEL: &str = "llama3-70b-8192";

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 500;

/// Shown when the answer carries no content.
pub const UNSEGMENTED_TEXT: &str = "Please try again with a sharper image or clearer text.";
/// Shown when the relay could not be reached.
pub const SEGMENTATION_FAILED_TEXT: &str = "Error categorizing content.";

pub const SEGMENTATION_PROMPT: &str = "\
You are an AI assistant specialized in organizing and cleaning OCR-extracted content from documents.
When given OCR-extracted content, your job is to:

- Divide the OCR text into logical sections based on meaning, not just formatting.
- Generate a clear, concise, human-friendly heading for each section. Do not paraphrase or change the original text; only generate headings that summarize each section.
- Output a formatted string, where each section follows this format: Heading- line break- content paragraph- skip one line
- Preserve the exact text from the OCR in each section.
- Ensure all OCR content is included in one of the sections.
- Do not add explanations, commentary, or extra text.
- Correct only spacing, punctuation, or obvious OCR errors to improve readability.
- Return only the formatted string as described";

/// Body the page sends to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationInput {
    pub ocr_text: String,
}

impl SegmentationInput {
    /// `None` when there is nothing to segment.
    pub fn new(ocr_text: impl Into<String>) -> Option<Self> {
        let ocr_text = ocr_text.into();
        if ocr_text.is_empty() {
            None
        } else {
            Some(Self { ocr_text })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Upstream chat completion request built by the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    pub fn for_input(input: &SegmentationInput) -> Self {
        Self {
            model: LLM_MODEL.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SEGMENTATION_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: input.ocr_text.clone(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    /// `Authorization` header value for the upstream call.
    pub fn authorization(config: &ServiceConfig) -> Result<String, RecognitionError> {
        Ok(format!("Bearer {}", config.llm_key()?))
    }
}

/// Text to show for a relay answer.
pub fn segmented_text(response: Result<&Value, &RecognitionError>) -> String {
    match response {
        Ok(value) => value["choices"][0]["message"]["content"]
            .as_str()
            .filter(|content| !content.is_empty())
            .unwrap_or(UNSEGMENTED_TEXT)
            .to_string(),
        Err(e) => {
            log::error!("Error categorizing content: {}", e);
            SEGMENTATION_FAILED_TEXT.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub heading: String,
    pub content: String,
}

/// Split formatted text into sections on blank lines. The first line of a
/// block is its heading; a block with one line has empty content.
pub fn split_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            push_section(&mut sections, &mut block);
        } else {
            block.push(line);
        }
    }
    push_section(&mut sections, &mut block);
    sections
}

fn push_section(sections: &mut Vec<Section>, block: &mut Vec<&str>) {
    if let Some((heading, content)) = block.split_first() {
        sections.push(Section {
            heading: heading.trim().to_string(),
            content: content.join("\n"),
        });
    }
    block.clear();
}
