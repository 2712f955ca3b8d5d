use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::CultureTag;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfigResponse {
    pub configured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CulturesResponse {
    pub cultures: Vec<CultureTag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateStoryRequest {
    pub prompt: String,
    pub culture: CultureTag,
}

/// A generated story as returned by the service.
///
/// A story decoded with [`StoryResult::from_wire`] remembers the exact body it
/// came from, so video generation can send the service back what it produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryResult {
    #[serde(default)]
    pub culture: CultureTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub story: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moral: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scenes: Vec<String>,
    /// Body the story was decoded from, if it came off the wire.
    #[serde(skip)]
    pub wire: Option<Value>,
}

impl StoryResult {
    pub fn from_wire(body: Value) -> Result<Self, serde_json::Error> {
        let mut story = Self::deserialize(&body)?;
        story.wire = Some(body);
        Ok(story)
    }

    /// The body to send back to the service: the original one when known.
    pub fn wire_body(&self) -> Result<Value, serde_json::Error> {
        match &self.wire {
            Some(body) => Ok(body.clone()),
            None => serde_json::to_value(self),
        }
    }

    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or("Untitled Story")
    }

    pub fn moral_text(&self) -> Option<&str> {
        self.moral.as_deref().filter(|moral| !moral.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateAudioRequest {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl GenerateAudioRequest {
    pub fn for_story(story: &StoryResult) -> Self {
        Self {
            text: story.story.clone(),
            title: story.title.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioResponse {
    pub audio_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}
