use crate::endpoint::{Endpoints, HttpTimeouts};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variables that override the endpoint URLs in the config file.
pub const ASR_URL_ENV: &str = "ASR_URL";
pub const TTS_URL_ENV: &str = "TTS_URL";
pub const UPLOAD_URL_ENV: &str = "UPLOAD_URL";
pub const CHAT_URL_ENV: &str = "CHAT_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Speech-to-text endpoint. Overridden by `ASR_URL`.
    pub transcription_url: Option<String>,
    /// Text-to-speech stream endpoint. Overridden by `TTS_URL`.
    pub speech_url: Option<String>,
    /// Voice reference upload endpoint. Overridden by `UPLOAD_URL`.
    pub voice_reference_url: Option<String>,
    /// Chat endpoint. Overridden by `CHAT_URL`.
    pub chat_url: Option<String>,

    /// Total timeout for request/response calls in seconds. 0 disables it.
    pub request_timeout_secs: u64,
    /// Connection timeout in seconds. 0 disables it.
    pub connect_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        let timeouts = HttpTimeouts::default();
        Self {
            transcription_url: None,
            speech_url: None,
            voice_reference_url: None,
            chat_url: None,
            request_timeout_secs: timeouts.request.map_or(0, |t| t.as_secs()),
            connect_timeout_secs: timeouts.connect.map_or(0, |t| t.as_secs()),
        }
    }
}

impl Config {
    /// Default config location: `<config dir>/voxline/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("voxline").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".voxline/config.toml"))
    }

    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load from `path` (defaults if it doesn't exist), then apply environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Override endpoint URLs from `lookup`. Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let overrides = [
            (ASR_URL_ENV, &mut self.transcription_url),
            (TTS_URL_ENV, &mut self.speech_url),
            (UPLOAD_URL_ENV, &mut self.voice_reference_url),
            (CHAT_URL_ENV, &mut self.chat_url),
        ];

        for (key, slot) in overrides {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *slot = Some(value.trim().to_string());
            }
        }
    }

    /// Resolve all four endpoints, failing if any is unset.
    pub fn endpoints(&self) -> Result<Endpoints> {
        let fields = [
            ("transcription_url", ASR_URL_ENV, &self.transcription_url),
            ("speech_url", TTS_URL_ENV, &self.speech_url),
            ("voice_reference_url", UPLOAD_URL_ENV, &self.voice_reference_url),
            ("chat_url", CHAT_URL_ENV, &self.chat_url),
        ];

        let missing: Vec<String> = fields
            .iter()
            .filter(|(_, _, value)| value.is_none())
            .map(|(field, env, _)| format!("{field} ({env})"))
            .collect();
        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "Missing endpoint URL: {}",
                missing.join(", ")
            )));
        }

        let get = |value: &Option<String>| value.clone().unwrap_or_default();
        Ok(Endpoints {
            transcription: get(&self.transcription_url),
            speech: get(&self.speech_url),
            voice_reference: get(&self.voice_reference_url),
            chat: get(&self.chat_url),
        })
    }

    pub fn timeouts(&self) -> HttpTimeouts {
        let secs = |value: u64| (value > 0).then(|| Duration::from_secs(value));
        HttpTimeouts {
            request: secs(self.request_timeout_secs),
            connect: secs(self.connect_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_config() -> Config {
        Config {
            transcription_url: Some("http://asr/v1/asr".into()),
            speech_url: Some("http://tts/v1/tts".into()),
            voice_reference_url: Some("http://tts/v1/upload".into()),
            chat_url: Some("http://chat/v1/audioqna".into()),
            ..Config::default()
        }
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::read_file(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.request_timeout_secs, 120);
        assert_eq!(config.connect_timeout_secs, 10);
    }

    #[test]
    fn test_read_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
transcription_url = "http://localhost:3001/v1/asr"
chat_url = "http://localhost:3008/v1/audioqna"
request_timeout_secs = 30
"#,
        )
        .unwrap();

        let config = Config::read_file(&path).unwrap();
        assert_eq!(
            config.transcription_url.as_deref(),
            Some("http://localhost:3001/v1/asr")
        );
        assert_eq!(config.request_timeout_secs, 30);
        // Unset fields keep defaults
        assert_eq!(config.connect_timeout_secs, 10);
        assert!(config.speech_url.is_none());
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "chat_url = [").unwrap();

        let err = Config::read_file(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_env_overrides_file() {
        let env: HashMap<&str, &str> = HashMap::from([
            (TTS_URL_ENV, "http://override/tts"),
            (CHAT_URL_ENV, "   "),
        ]);
        let mut config = full_config();
        config.apply_env(|key| env.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.speech_url.as_deref(), Some("http://override/tts"));
        // Blank values don't clobber
        assert_eq!(config.chat_url.as_deref(), Some("http://chat/v1/audioqna"));
    }

    #[test]
    fn test_endpoints_resolved() {
        let endpoints = full_config().endpoints().unwrap();
        assert_eq!(endpoints.transcription, "http://asr/v1/asr");
        assert_eq!(endpoints.speech, "http://tts/v1/tts");
        assert_eq!(endpoints.voice_reference, "http://tts/v1/upload");
        assert_eq!(endpoints.chat, "http://chat/v1/audioqna");
    }

    #[test]
    fn test_endpoints_report_missing() {
        let config = Config {
            chat_url: None,
            speech_url: None,
            ..full_config()
        };
        let msg = config.endpoints().unwrap_err().to_string();
        assert!(msg.contains("speech_url (TTS_URL)"));
        assert!(msg.contains("chat_url (CHAT_URL)"));
        assert!(!msg.contains("transcription_url"));
    }

    #[test]
    fn test_zero_request_timeout_disables() {
        let config = Config {
            request_timeout_secs: 0,
            connect_timeout_secs: 3,
            ..Config::default()
        };
        let timeouts = config.timeouts();
        assert_eq!(timeouts.request, None);
        assert_eq!(timeouts.connect, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_zero_connect_timeout_disables() {
        let config = Config {
            connect_timeout_secs: 0,
            ..Config::default()
        };
        let timeouts = config.timeouts();
        assert_eq!(timeouts.connect, None);
        assert_eq!(timeouts.request, Some(Duration::from_secs(120)));
    }
}
