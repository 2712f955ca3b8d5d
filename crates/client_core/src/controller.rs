//! Client interaction controller: user actions in, backend calls out, page updates back.

use shared::{
    domain::CultureTag,
    protocol::{GenerateAudioRequest, GenerateStoryRequest},
};
use tracing::{error, info, warn};

use crate::{
    backend::StoryBackend,
    error::ClientError,
    media::{cache_busted_url, now_millis},
    render::{render_story, Control, Element, Player, Renderer, ScrollAlign},
    session::SessionState,
};

pub const EMPTY_PROMPT_ALERT: &str = "Please enter a story idea!";
pub const NO_STORY_ALERT: &str = "Please generate a story first!";
pub const STORY_LOADING_TEXT: &str = "Weaving your cultural tale...";
pub const AUDIO_LOADING_TEXT: &str = "Generating audio narration...";
pub const VIDEO_LOADING_TEXT: &str = "Creating your story video... This may take a minute.";

/// How a user-triggered operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// Preconditions failed; no request was sent.
    Rejected,
    /// The request was sent and failed; the user was alerted.
    Failed,
}

pub struct StoryController<B, R> {
    backend: B,
    renderer: R,
    session: SessionState,
}

impl<B: StoryBackend, R: Renderer> StoryController<B, R> {
    pub fn new(backend: B, renderer: R) -> Self {
        Self {
            backend,
            renderer,
            session: SessionState::default(),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Reveals the config warning when the service reports it is not configured.
    /// Failures are logged and never reach the user.
    pub async fn check_configuration(&mut self) {
        match self.backend.check_config().await {
            Ok(status) if !status.configured => {
                self.renderer.set_visible(Element::ConfigWarning, true);
                self.renderer.set_text(
                    Element::ConfigMessage,
                    status.message.as_deref().unwrap_or_default(),
                );
            }
            Ok(_) => info!("storytelling service is configured"),
            Err(err) => error!(error = %err, "configuration check failed"),
        }
    }

    pub async fn available_cultures(&self) -> Vec<CultureTag> {
        match self.backend.list_cultures().await {
            Ok(cultures) if !cultures.is_empty() => cultures,
            Ok(_) => {
                warn!("service returned no cultures; using built-in list");
                CultureTag::builtin()
            }
            Err(err) => {
                warn!(error = %err, "failed to list cultures; using built-in list");
                CultureTag::builtin()
            }
        }
    }

    pub async fn generate_story(&mut self, prompt: &str, culture: &CultureTag) -> Outcome {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            self.renderer.alert(EMPTY_PROMPT_ALERT);
            self.renderer.focus(Control::StoryPrompt);
            return Outcome::Rejected;
        }

        self.show_loading(STORY_LOADING_TEXT);
        info!(%culture, "requesting story");

        let request = GenerateStoryRequest {
            prompt: prompt.to_string(),
            culture: culture.clone(),
        };
        let outcome = match self.backend.generate_story(&request).await {
            Ok(story) => {
                render_story(&mut self.renderer, &story);
                self.session.replace_story(story);
                Outcome::Completed
            }
            Err(err) => self.report_failure("story generation", err),
        };

        self.hide_loading();
        outcome
    }

    pub async fn generate_audio(&mut self) -> Outcome {
        let Some(story) = self.session.narratable_story() else {
            self.renderer.alert(NO_STORY_ALERT);
            return Outcome::Rejected;
        };
        let request = GenerateAudioRequest::for_story(story);

        self.show_media_loading(AUDIO_LOADING_TEXT);
        info!("requesting audio narration");

        let outcome = match self.backend.generate_audio(&request).await {
            Ok(audio) => {
                self.show_audio(&audio.audio_url);
                self.renderer
                    .scroll_into_view(Element::AudioPanel, ScrollAlign::Center);
                Outcome::Completed
            }
            Err(err) => self.report_failure("audio generation", err),
        };

        self.hide_media_loading();
        outcome
    }

    pub async fn generate_video(&mut self) -> Outcome {
        let Some(story) = self.session.current_story().cloned() else {
            self.renderer.alert(NO_STORY_ALERT);
            return Outcome::Rejected;
        };

        self.show_media_loading(VIDEO_LOADING_TEXT);
        info!("requesting story video");

        let outcome = match self.backend.generate_video(&story).await {
            Ok(video) => {
                let video_url = video.video_url.as_deref().filter(|url| !url.is_empty());
                let audio_url = video.audio_url.as_deref().filter(|url| !url.is_empty());
                if let Some(video_url) = video_url {
                    let src = self.media_src(video_url);
                    self.renderer.set_source(Player::Video, &src);
                    self.renderer.set_visible(Element::VideoPanel, true);
                    self.session.mark_video();
                }
                if let Some(audio_url) = audio_url {
                    if !self.session.has_audio() {
                        self.show_audio(audio_url);
                    }
                }
                self.renderer
                    .scroll_into_view(Element::VideoPanel, ScrollAlign::Center);
                Outcome::Completed
            }
            Err(err) => self.report_failure("video generation", err),
        };

        self.hide_media_loading();
        outcome
    }

    fn show_audio(&mut self, audio_url: &str) {
        let src = self.media_src(audio_url);
        self.renderer.set_source(Player::Audio, &src);
        self.renderer.set_visible(Element::AudioPanel, true);
        self.session.mark_audio();
    }

    fn media_src(&self, raw: &str) -> String {
        cache_busted_url(raw, self.backend.media_base(), now_millis())
    }

    fn report_failure(&mut self, operation: &str, err: ClientError) -> Outcome {
        error!(operation, error = %err, status = ?err.status_code(), "operation failed");
        self.renderer.alert(&err.alert_message());
        Outcome::Failed
    }

    fn show_loading(&mut self, message: &str) {
        self.renderer.set_visible(Element::LoadingSection, true);
        self.renderer.set_text(Element::LoadingText, message);
        self.renderer.set_visible(Element::OutputSection, false);
        self.renderer.set_disabled(Control::GenerateButton, true);
    }

    fn hide_loading(&mut self) {
        self.renderer.set_visible(Element::LoadingSection, false);
        self.renderer.set_disabled(Control::GenerateButton, false);
    }

    fn show_media_loading(&mut self, message: &str) {
        self.renderer.set_visible(Element::MediaLoading, true);
        self.renderer.set_text(Element::MediaLoadingText, message);
        self.renderer.set_disabled(Control::AudioButton, true);
        self.renderer.set_disabled(Control::VideoButton, true);
    }

    fn hide_media_loading(&mut self) {
        self.renderer.set_visible(Element::MediaLoading, false);
        self.renderer.set_disabled(Control::AudioButton, false);
        self.renderer.set_disabled(Control::VideoButton, false);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
