//! Backend seam: the storytelling service's HTTP endpoints.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    domain::CultureTag,
    error::error_message,
    protocol::{
        AudioResponse, CheckConfigResponse, CulturesResponse, GenerateAudioRequest,
        GenerateStoryRequest, StoryResult, VideoResponse,
    },
};
use tracing::debug;
use url::Url;

use crate::error::ClientError;

#[async_trait]
pub trait StoryBackend: Send + Sync {
    async fn check_config(&self) -> Result<CheckConfigResponse, ClientError>;
    async fn list_cultures(&self) -> Result<Vec<CultureTag>, ClientError>;
    async fn generate_story(
        &self,
        request: &GenerateStoryRequest,
    ) -> Result<StoryResult, ClientError>;
    async fn generate_audio(
        &self,
        request: &GenerateAudioRequest,
    ) -> Result<AudioResponse, ClientError>;
    async fn generate_video(&self, story: &StoryResult) -> Result<VideoResponse, ClientError>;

    /// Base against which relative media URLs returned by the service are resolved.
    fn media_base(&self) -> Option<&Url> {
        None
    }
}

pub struct HttpStoryBackend {
    http: Client,
    server_url: Url,
}

impl HttpStoryBackend {
    pub fn new(server_url: Url) -> Self {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, mut server_url: Url) -> Self {
        // Endpoint paths are joined relative to the base, which needs a trailing slash.
        if !server_url.path().ends_with('/') {
            let path = format!("{}/", server_url.path());
            server_url.set_path(&path);
        }
        Self { http, server_url }
    }

    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.server_url
            .join(path)
            .map_err(|err| ClientError::Decode(format!("invalid endpoint {path}: {err}")))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ClientError> {
        let body = self.send_raw(request, fallback).await?;
        serde_json::from_value(body).map_err(decode_error)
    }

    /// Sends `request` and returns the successful JSON body untouched.
    async fn send_raw(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<Value, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body: Value = match response.json().await {
            Ok(body) => body,
            // A failed request with a non-JSON body still reports its status.
            Err(err) if err.is_decode() && !status.is_success() => Value::Null,
            Err(err) if err.is_decode() => return Err(ClientError::Decode(err.to_string())),
            Err(err) => return Err(err.into()),
        };

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: error_message(&body).unwrap_or_else(|| fallback.to_string()),
            });
        }
        if let Some(message) = error_message(&body) {
            return Err(ClientError::Application(message));
        }

        Ok(body)
    }
}

fn decode_error(err: serde_json::Error) -> ClientError {
    ClientError::Decode(err.to_string())
}

#[async_trait]
impl StoryBackend for HttpStoryBackend {
    async fn check_config(&self) -> Result<CheckConfigResponse, ClientError> {
        let url = self.endpoint("api/check-config")?;
        debug!(%url, "checking service configuration");
        self.send(self.http.get(url), "Failed to check configuration")
            .await
    }

    async fn list_cultures(&self) -> Result<Vec<CultureTag>, ClientError> {
        let url = self.endpoint("api/cultures")?;
        let body: CulturesResponse = self
            .send(self.http.get(url), "Failed to list cultures")
            .await?;
        Ok(body.cultures)
    }

    async fn generate_story(
        &self,
        request: &GenerateStoryRequest,
    ) -> Result<StoryResult, ClientError> {
        let url = self.endpoint("api/generate-story")?;
        let body = self
            .send_raw(self.http.post(url).json(request), "Failed to generate story")
            .await?;
        StoryResult::from_wire(body).map_err(decode_error)
    }

    async fn generate_audio(
        &self,
        request: &GenerateAudioRequest,
    ) -> Result<AudioResponse, ClientError> {
        let url = self.endpoint("api/generate-audio")?;
        self.send(self.http.post(url).json(request), "Failed to generate audio")
            .await
    }

    async fn generate_video(&self, story: &StoryResult) -> Result<VideoResponse, ClientError> {
        let url = self.endpoint("api/generate-video")?;
        let body = story.wire_body().map_err(decode_error)?;
        self.send(self.http.post(url).json(&body), "Failed to generate video")
            .await
    }

    fn media_base(&self) -> Option<&Url> {
        Some(&self.server_url)
    }
}

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod tests;
