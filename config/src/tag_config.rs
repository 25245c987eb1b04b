use serde::{
    Deserialize,
    Serialize,
};
use std::path::PathBuf;

/// Marker placed in `sound` to speak text instead of playing a file.
pub const SPEAK_MARKER: &str = "speak";

/// One tag to poll and the alert to raise for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagConfig {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Sound")]
    pub sound: String,
    #[serde(default, alias = "Text", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertMode {
    PlayFile(PathBuf),
    SpeakText(String),
}

impl TagConfig {
    pub fn new(name: impl ToString, sound: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            sound: sound.to_string(),
            text: None,
        }
    }

    pub fn speaking(name: impl ToString, text: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            sound: SPEAK_MARKER.to_string(),
            text: Some(text.to_string()),
        }
    }

    /// Speaking without configured text says the tag name.
    pub fn alert_mode(&self) -> AlertMode {
        if self.sound.trim().eq_ignore_ascii_case(SPEAK_MARKER) {
            let text = self
                .text
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .unwrap_or(&self.name);
            AlertMode::SpeakText(text.to_string())
        } else {
            AlertMode::PlayFile(PathBuf::from(&self.sound))
        }
    }
}
