use shared::protocol::StoryResult;

/// The most recent story and which media renderings exist for it.
#[derive(Default, Debug, Clone)]
pub struct SessionState {
    current_story: Option<StoryResult>,
    has_audio: bool,
    has_video: bool,
}

impl SessionState {
    /// Replaces the story and forgets any media generated for the previous one.
    pub fn replace_story(&mut self, story: StoryResult) {
        self.current_story = Some(story);
        self.has_audio = false;
        self.has_video = false;
    }

    pub fn current_story(&self) -> Option<&StoryResult> {
        self.current_story.as_ref()
    }

    /// The current story when it has body text to narrate.
    pub fn narratable_story(&self) -> Option<&StoryResult> {
        self.current_story
            .as_ref()
            .filter(|story| !story.story.is_empty())
    }

    pub fn has_audio(&self) -> bool {
        self.has_audio
    }

    pub fn has_video(&self) -> bool {
        self.has_video
    }

    pub fn mark_audio(&mut self) {
        self.has_audio = true;
    }

    pub fn mark_video(&mut self) {
        self.has_video = true;
    }
}
