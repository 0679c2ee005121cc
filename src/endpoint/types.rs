//! Endpoint addresses and request bodies.

use serde::{Deserialize, Serialize};

/// Language tag sent with every speech stream request.
pub const SPEECH_TEXT_LANGUAGE: &str = "auto";
/// Language tag sent with every voice reference upload.
pub const REFERENCE_LANGUAGE: &str = "en";

/// Multipart field carrying the audio for transcription.
pub const TRANSCRIPTION_FILE_FIELD: &str = "file";
/// Multipart fields of a voice reference upload.
pub const REFERENCE_FILE_FIELD: &str = "default_refer_file";
pub const REFERENCE_TEXT_FIELD: &str = "default_refer_text";
pub const REFERENCE_LANGUAGE_FIELD: &str = "default_refer_language";

/// The four remote endpoints a client talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Speech-to-text upload.
    pub transcription: String,
    /// Text-to-speech event stream.
    pub speech: String,
    /// Voice reference (cloning sample) upload.
    pub voice_reference: String,
    /// Chat query.
    pub chat: String,
}

/// JSON body of a speech stream request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeechRequest {
    pub text: String,
    pub text_language: String,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            text_language: SPEECH_TEXT_LANGUAGE.to_string(),
        }
    }
}

/// JSON body of a chat query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub query: String,
}
