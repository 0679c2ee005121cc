//! Network access to the speech and chat services.
//!
//! Three request/response calls (transcription, voice reference, chat) and
//! one server-sent-event stream (speech). Every call returns a tagged
//! [`EndpointError`] on failure; `.ok()` collapses it to `None`.

mod audio;
mod client;
mod error;
pub mod http;
mod stream;
mod types;


pub use audio::AudioFile;
pub use client::EndpointClient;
pub use error::{EndpointError, format_error_body};
pub use http::{HttpTimeouts, SseEvent};
pub use stream::SpeechStream;
pub use types::{
    ChatRequest, Endpoints, REFERENCE_LANGUAGE, SPEECH_TEXT_LANGUAGE, SpeechRequest,
};
