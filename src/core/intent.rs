//! # Intent Detection
//!
//! A deliberately coarse keyword match over the last AI message. The result is
//! passed to the backend as a soft hint about what the conversation is about.
//! It only ever looks at one message, never the whole history.

/// Coarse category inferred from AI text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Intent {
    ImageGeneration,
    Coding,
    #[default]
    None,
}

impl Intent {
    /// Value sent in the request body. `None` is omitted from the wire.
    pub fn as_wire(self) -> Option<&'static str> {
        match self {
            Intent::ImageGeneration => Some("image_generation"),
            Intent::Coding => Some("coding"),
            Intent::None => None,
        }
    }
}

const IMAGE_KEYWORDS: &[&str] = &["image", "photo", "generate"];
const CODING_KEYWORDS: &[&str] = &["code", "function"];

/// Maps the most recent AI message text to an intent.
///
/// Rules are checked in order and the first match wins: image keywords
/// before coding keywords. Matching is case-insensitive substring search.
pub fn detect(last_ai_text: Option<&str>) -> Intent {
    let Some(text) = last_ai_text.filter(|t| !t.is_empty()) else {
        return Intent::None;
    };
    let text = text.to_lowercase();

    if IMAGE_KEYWORDS.iter().any(|k| text.contains(k)) {
        Intent::ImageGeneration
    } else if CODING_KEYWORDS.iter().any(|k| text.contains(k)) {
        Intent::Coding
    } else {
        Intent::None
    }
}
