//! Audio file payloads for multipart uploads.

use crate::endpoint::error::EndpointError;
use bytes::Bytes;
use reqwest::multipart::Part;
use std::path::Path;

const FALLBACK_MIME: &str = "application/octet-stream";

/// A binary audio file to upload.
#[derive(Debug, Clone)]
pub struct AudioFile {
    file_name: String,
    mime_type: String,
    bytes: Bytes,
}

impl AudioFile {
    /// Wrap in-memory audio. The MIME type is guessed from the file name.
    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let mime_type = guess_mime(&file_name).to_string();
        Self {
            file_name,
            mime_type,
            bytes: bytes.into(),
        }
    }

    /// Read audio from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        Ok(Self::from_bytes(file_name, bytes))
    }

    /// Override the guessed MIME type.
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Convert into a multipart file part.
    pub(crate) fn into_part(self) -> Result<Part, EndpointError> {
        let len = self.bytes.len() as u64;
        Part::stream_with_length(reqwest::Body::from(self.bytes), len)
            .file_name(self.file_name)
            .mime_str(&self.mime_type)
            .map_err(|e| EndpointError::Payload(format!("invalid MIME type: {e}")))
    }
}

fn guess_mime(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("ogg" | "oga" | "opus") => "audio/ogg",
        Some("webm") => "audio/webm",
        Some("flac") => "audio/flac",
        Some("m4a" | "mp4") => "audio/mp4",
        _ => FALLBACK_MIME,
    }
}
