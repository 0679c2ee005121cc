//! Client for the transcription, speech, voice reference and chat endpoints.

use crate::endpoint::audio::AudioFile;
use crate::endpoint::error::EndpointError;
use crate::endpoint::http::{HttpClient, HttpTimeouts};
use crate::endpoint::stream::SpeechStream;
use crate::endpoint::types::{
    ChatRequest, Endpoints, REFERENCE_FILE_FIELD, REFERENCE_LANGUAGE, REFERENCE_LANGUAGE_FIELD,
    REFERENCE_TEXT_FIELD, SpeechRequest, TRANSCRIPTION_FILE_FIELD,
};
use reqwest::multipart::Form;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Stateless client over four externally configured endpoints.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct EndpointClient {
    http: HttpClient,
    endpoints: Arc<Endpoints>,
}

impl EndpointClient {
    /// Create a client with default timeouts.
    pub fn new(endpoints: Endpoints) -> Self {
        Self::with_timeouts(endpoints, HttpTimeouts::default())
    }

    pub fn with_timeouts(endpoints: Endpoints, timeouts: HttpTimeouts) -> Self {
        Self {
            http: HttpClient::new(timeouts),
            endpoints: Arc::new(endpoints),
        }
    }

    /// Create a client from loaded configuration.
    pub fn from_config(config: &crate::config::Config) -> crate::error::Result<Self> {
        Ok(Self::with_timeouts(config.endpoints()?, config.timeouts()))
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Upload audio for speech-to-text and return the parsed JSON response.
    pub async fn submit_audio_for_transcription(
        &self,
        file: AudioFile,
    ) -> Result<Value, EndpointError> {
        let url = &self.endpoints.transcription;
        tracing::debug!(
            endpoint = "transcription",
            url = %url,
            file = %file.file_name(),
            bytes = file.len(),
            "Submitting audio"
        );

        let form = file
            .into_part()
            .map(|part| Form::new().part(TRANSCRIPTION_FILE_FIELD, part));
        self.post_form("transcription", url, form).await
    }

    /// Open a text-to-speech event stream for `text`.
    ///
    /// Returns immediately without touching the network; the POST is sent
    /// when the returned stream is first polled.
    pub fn open_speech_stream(
        &self,
        text: impl Into<String>,
    ) -> Result<SpeechStream, EndpointError> {
        let raw_url = &self.endpoints.speech;
        let url = Url::parse(raw_url).map_err(|e| EndpointError::InvalidUrl {
            url: raw_url.clone(),
            reason: e.to_string(),
        })?;

        let payload = SpeechRequest::new(text);
        let body =
            serde_json::to_vec(&payload).map_err(|e| EndpointError::Payload(e.to_string()))?;
        let request = self.http.stream_request(url.clone(), body);

        Ok(SpeechStream::new(url, payload, request))
    }

    /// Upload a voice reference sample with its transcript.
    ///
    /// The reference language is always sent as `en`.
    pub async fn submit_voice_embedding_reference(
        &self,
        file: AudioFile,
        text: impl Into<String>,
    ) -> Result<Value, EndpointError> {
        let url = &self.endpoints.voice_reference;
        tracing::debug!(
            endpoint = "voice_reference",
            url = %url,
            file = %file.file_name(),
            bytes = file.len(),
            "Submitting voice reference"
        );

        let text = text.into();
        let form = file.into_part().map(|part| {
            Form::new()
                .part(REFERENCE_FILE_FIELD, part)
                .text(REFERENCE_TEXT_FIELD, text)
                .text(REFERENCE_LANGUAGE_FIELD, REFERENCE_LANGUAGE)
        });
        self.post_form("voice_reference", url, form).await
    }

    /// Send a chat query and return the parsed JSON response.
    pub async fn submit_chat_query(
        &self,
        query: impl Into<String>,
    ) -> Result<Value, EndpointError> {
        let url = &self.endpoints.chat;
        let body = ChatRequest {
            query: query.into(),
        };
        tracing::debug!(
            endpoint = "chat",
            url = %url,
            chars = body.query.len(),
            "Submitting chat query"
        );

        let result = self.http.post_json(url, &body).await;
        log_failure("chat", url, result)
    }

    async fn post_form(
        &self,
        endpoint: &'static str,
        url: &str,
        form: Result<Form, EndpointError>,
    ) -> Result<Value, EndpointError> {
        let result = match form {
            Ok(form) => self.http.post_multipart(url, form).await,
            Err(e) => Err(e),
        };
        log_failure(endpoint, url, result)
    }
}

/// Emit a diagnostic for a failed call and pass the result through.
fn log_failure(
    endpoint: &'static str,
    url: &str,
    result: Result<Value, EndpointError>,
) -> Result<Value, EndpointError> {
    result.inspect_err(|e| {
        tracing::warn!(endpoint, url, error = %e, "Endpoint request failed");
    })
}
